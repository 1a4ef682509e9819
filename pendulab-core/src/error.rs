use crate::diagnostics::Diagnostics;
use thiserror::Error;

/// Errors raised by the simulation API
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("invalid {field} = {value}: expected {expected}")]
    InvalidParameter {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("trail length must be positive, got {0}")]
    InvalidTrailLength(usize),

    #[error("time scale must be within [0, {max}], got {0}", max = crate::params::MAX_TIME_SCALE)]
    InvalidTimeScale(f64),

    #[error("instance limit of {max} reached")]
    InstanceLimit { max: usize },

    #[error("a simulation needs between 1 and {max} instances, got {actual}")]
    InstanceCount { max: usize, actual: usize },

    #[error("no instance at index {0}")]
    NoSuchInstance(usize),
}

impl SimError {
    pub fn invalid(field: &'static str, value: f64, expected: &'static str) -> Self {
        Self::InvalidParameter {
            field,
            value,
            expected,
        }
    }
}

/// Errors raised while loading a scenario file
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("parse error at line {line}, column {column}: {message}")]
    Parse {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("scenario rejected with {} error(s)", .0.error_count())]
    Invalid(Diagnostics),

    #[error(transparent)]
    Sim(#[from] SimError),
}

impl From<ron::error::SpannedError> for ScenarioError {
    fn from(err: ron::error::SpannedError) -> Self {
        Self::Parse {
            message: err.code.to_string(),
            line: err.position.line,
            column: err.position.col,
        }
    }
}
