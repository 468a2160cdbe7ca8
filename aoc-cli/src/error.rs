//! Error types for the CLI

use std::path::PathBuf;
use thiserror::Error;
use thiserror_ext::Arc as ArcDerive;

/// Main CLI error type
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Registration error
    #[error("Registration error: {0}")]
    Registration(#[from] aoc_solver::RegistrationError),

    /// Executor error (wraps Arc for cheap cloning)
    #[error("{0}")]
    Executor(#[from] ArcExecutorError),
}

/// Executor-specific errors
#[derive(Error, Debug, ArcDerive)]
#[thiserror_ext(newtype(name = ArcExecutorError))]
pub enum ExecutorError {
    /// Input could not be read
    #[error("Input read failed for {year}/{day}: {source}")]
    InputRead {
        year: u16,
        day: u8,
        #[source]
        source: InputError,
    },

    /// Channel send error
    #[error("Channel send error")]
    ChannelSend,

    /// Thread pool creation failed
    #[error("Thread pool creation failed: {0}")]
    ThreadPool(String),

    /// Multiple errors collected during parallel execution
    #[error("Multiple errors occurred ({} total)", .0.len())]
    Multiple(Vec<ArcExecutorError>),
}

impl ArcExecutorError {
    /// Combine two Arc-wrapped errors into one flat `Multiple`
    ///
    /// Existing `Multiple` lists are spliced rather than nested, keeping
    /// `first`'s errors before `second`'s.
    pub fn combine(first: ArcExecutorError, second: ArcExecutorError) -> ArcExecutorError {
        let errors = match (first.inner(), second.inner()) {
            (ExecutorError::Multiple(v1), ExecutorError::Multiple(v2)) => {
                let mut combined = v1.clone();
                combined.extend(v2.iter().cloned());
                combined
            }
            (_, ExecutorError::Multiple(v)) => {
                let mut combined = vec![first];
                combined.extend(v.iter().cloned());
                combined
            }
            (ExecutorError::Multiple(v), _) => {
                let mut combined = v.clone();
                combined.push(second);
                combined
            }
            _ => vec![first, second],
        };
        ExecutorError::Multiple(errors).into()
    }

    /// Combine an optional error with a new error
    pub fn combine_opt(
        existing: Option<ArcExecutorError>,
        new: ArcExecutorError,
    ) -> ArcExecutorError {
        match existing {
            Some(e) => Self::combine(e, new),
            None => new,
        }
    }
}

/// Errors reading puzzle inputs from the input directory
#[derive(Error, Debug)]
pub enum InputError {
    /// No input file at the expected path
    #[error("no input file at {}", .0.display())]
    Missing(PathBuf),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel_error() -> ArcExecutorError {
        ExecutorError::ChannelSend.into()
    }

    fn thread_pool_error(msg: &str) -> ArcExecutorError {
        ExecutorError::ThreadPool(msg.to_string()).into()
    }

    fn multiple_len(err: &ArcExecutorError) -> Option<usize> {
        match err.inner() {
            ExecutorError::Multiple(v) => Some(v.len()),
            _ => None,
        }
    }

    #[test]
    fn test_combine_singles() {
        let combined = ArcExecutorError::combine(channel_error(), thread_pool_error("a"));
        assert_eq!(multiple_len(&combined), Some(2));
        assert_eq!(combined.to_string(), "Multiple errors occurred (2 total)");
    }

    #[test]
    fn test_combine_flattens_multiples() {
        let left = ArcExecutorError::combine(channel_error(), thread_pool_error("a"));
        let right = ArcExecutorError::combine(thread_pool_error("b"), thread_pool_error("c"));
        let combined = ArcExecutorError::combine(left.clone(), right);
        assert_eq!(multiple_len(&combined), Some(4));

        let appended = ArcExecutorError::combine(left.clone(), channel_error());
        assert_eq!(multiple_len(&appended), Some(3));
        let prepended = ArcExecutorError::combine(channel_error(), left);
        match prepended.inner() {
            ExecutorError::Multiple(v) => assert!(matches!(v[0].inner(), ExecutorError::ChannelSend)),
            other => panic!("expected Multiple, got {:?}", other),
        }
    }

    #[test]
    fn test_combine_opt() {
        let single = ArcExecutorError::combine_opt(None, channel_error());
        assert_eq!(multiple_len(&single), None);
        let both = ArcExecutorError::combine_opt(Some(single), channel_error());
        assert_eq!(multiple_len(&both), Some(2));
    }

    #[test]
    fn test_input_error_display() {
        let err = ExecutorError::InputRead {
            year: 2025,
            day: 3,
            source: InputError::Missing(PathBuf::from("inputs/2025_day03.txt")),
        };
        assert_eq!(
            err.to_string(),
            "Input read failed for 2025/3: no input file at inputs/2025_day03.txt"
        );
    }
}
