/// Result of one kernel invocation, counted in operation units.
///
/// Cancellation is not an error: a canceled run still reports the work it
/// finished, so the caller can derive a throughput figure from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Ran to the end.
    Completed(u64),
    /// Stopped by the deadline after this many units.
    Canceled(u64),
}

impl Outcome {
    pub fn ops(&self) -> u64 {
        match *self {
            Self::Completed(ops) | Self::Canceled(ops) => ops,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled(_))
    }
}

impl From<Outcome> for Result<u64, u64> {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Completed(ops) => Ok(ops),
            Outcome::Canceled(ops) => Err(ops),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ops_kept_on_cancel() {
        assert_eq!(64, Outcome::Completed(64).ops());
        assert_eq!(48, Outcome::Canceled(48).ops());
        assert!(Outcome::Canceled(48).is_canceled());
        assert!(!Outcome::Canceled(48).is_completed());
    }

    #[test]
    fn test_into_result() {
        assert_eq!(Ok(64), Result::<u64, u64>::from(Outcome::Completed(64)));
        assert_eq!(Err(0), Result::<u64, u64>::from(Outcome::Canceled(0)));
    }
}
