//! Sync error types.

use std::fmt;

use crate::open511::{Endpoint, FetchError, PayloadError};
use crate::store::StoreError;

/// Why one fetch-then-parse stage failed.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Payload(#[from] PayloadError),
}

/// A failed stage, named by the endpoint it read.
#[derive(Debug, thiserror::Error)]
#[error("{stage}: {error}")]
pub struct StageFailure {
    pub stage: Endpoint,
    #[source]
    pub error: StageError,
}

impl StageFailure {
    pub fn new(stage: Endpoint, error: impl Into<StageError>) -> Self {
        Self {
            stage,
            error: error.into(),
        }
    }
}

/// A sync cycle failed. Nothing was written if the stages failed.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// One or more stages failed; every failure is listed.
    #[error("{}", StagesDisplay(.0))]
    Stages(Vec<StageFailure>),

    /// Writing the staged update failed.
    #[error("store write failed: {0}")]
    Store(#[from] StoreError),
}

struct StagesDisplay<'a>(&'a [StageFailure]);

impl fmt::Display for StagesDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} stage(s) failed", self.0.len())?;
        for failure in self.0 {
            write!(f, "; {failure}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LineType;

    #[test]
    fn lists_every_failure() {
        let err = SyncError::Stages(vec![
            StageFailure::new(Endpoint::Holidays, FetchError::RateLimited),
            StageFailure::new(
                Endpoint::Timetable(LineType::Limited),
                PayloadError::MissingField {
                    endpoint: Endpoint::Timetable(LineType::Limited),
                    path: "Content".into(),
                },
            ),
        ]);

        assert_eq!(
            err.to_string(),
            "2 stage(s) failed; holidays: rate limited by 511.org; \
             timetable(LIMITED): timetable(LIMITED): missing required field Content"
        );
    }
}
