//! Progress snapshots emitted by animated solvers

use std::fmt;

/// A human-readable snapshot of a solver's progress
///
/// Animated solvers hand these to a caller-provided sink while they run.
/// Steps arrive in computation order; how many are emitted is up to each
/// solver and carries no meaning for the final answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationStep {
    /// One-line summary of what just happened
    pub description: String,
    /// Lines of text visualizing the current state
    pub visualization: Vec<String>,
    /// The running value of the answer at this point
    pub current_value: u64,
}

impl AnimationStep {
    /// Create a new step
    pub fn new(
        description: impl Into<String>,
        visualization: Vec<String>,
        current_value: u64,
    ) -> Self {
        Self {
            description: description.into(),
            visualization,
            current_value,
        }
    }

    /// Create a step without any visualization lines
    pub fn message(description: impl Into<String>, current_value: u64) -> Self {
        Self::new(description, Vec::new(), current_value)
    }
}

impl fmt::Display for AnimationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.description, self.current_value)?;
        for line in &self.visualization {
            write!(f, "\n    {}", line)?;
        }
        Ok(())
    }
}
