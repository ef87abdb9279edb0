//! Run one checkout customization the way the host does: input JSON on
//! stdin, operations JSON on stdout.
//!
//! ```sh
//! RUST_LOG=debug cargo run --example checkout -- hide-payment < input.json
//! ```

use std::io::{Read, Write};

use checkout_rules::{Feature, run_json};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let feature: Feature = std::env::args()
        .nth(1)
        .unwrap_or_else(|| Feature::HidePayment.as_str().to_owned())
        .parse()?;

    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;

    tracing::info!(%feature, bytes = input.len(), "evaluating");
    let output = run_json(feature, &input)?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.write_all(b"\n")?;
    Ok(())
}
