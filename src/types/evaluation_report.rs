use std::fmt;

/// Detailed result of folding a condition set, returned by
/// [`ConditionSet::evaluate_detailed()`](super::ConditionSet::evaluate_detailed).
///
/// Unlike [`ConditionSet::evaluate()`](super::ConditionSet::evaluate), every
/// condition is visited, so `matched` lists all matching positions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct EvaluationReport {
    matched: Vec<usize>,
    ignored: Vec<usize>,
    evaluated: usize,
}

impl EvaluationReport {
    pub(crate) fn new(matched: Vec<usize>, ignored: Vec<usize>, evaluated: usize) -> Self {
        Self {
            matched,
            ignored,
            evaluated,
        }
    }

    /// Whether any condition matched (the OR of the set).
    #[must_use]
    pub fn triggered(&self) -> bool {
        !self.matched.is_empty()
    }

    /// Zero-based positions of conditions that matched.
    #[must_use]
    pub fn matched(&self) -> &[usize] {
        &self.matched
    }

    /// Positions skipped because they were unrecognized or not honored by the feature.
    #[must_use]
    pub fn ignored(&self) -> &[usize] {
        &self.ignored
    }

    /// Number of conditions actually tested against the cart.
    #[must_use]
    pub fn evaluated(&self) -> usize {
        self.evaluated
    }
}

fn join(positions: &[usize]) -> String {
    positions
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "triggered: {}", self.triggered())?;
        write!(f, ", matched: [{}]", join(&self.matched))?;
        write!(f, ", ignored: [{}]", join(&self.ignored))?;
        write!(f, ", evaluated: {}", self.evaluated)?;
        Ok(())
    }
}
