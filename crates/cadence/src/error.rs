//! Error types for Cadence operations.
//!
//! [`CadenceError`] covers every fatal condition. Structural errors are raised
//! by the call that would introduce the invalid state, so a [`Diagram`] that
//! exists is always internally consistent. Non-fatal conditions are reported
//! as [`Warning`] values alongside a successful result.
//!
//! [`Diagram`]: crate::structure::Diagram

use std::fmt;

use thiserror::Error;

use cadence_core::{identifier::Id, semantic::ElementCategory};

/// The main error type for Cadence operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CadenceError {
    #[error("duplicate {category} id `{id}`")]
    DuplicateId { category: ElementCategory, id: Id },

    #[error("{category} `{owner}` references unknown node `{missing}`")]
    DanglingReference {
        category: ElementCategory,
        owner: Id,
        missing: Id,
    },

    #[error("cluster `{id}` has no members")]
    EmptyCluster { id: Id },

    #[error("cannot lay out a diagram without nodes")]
    EmptyDiagram,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CadenceError {
    /// Build a [`CadenceError::InvalidConfig`] value.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

/// Non-fatal conditions reported next to a successful result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Simplification stopped above the node budget because no further merge
    /// was possible.
    SimplificationBudgetUnreachable { budget: usize, remaining: usize },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SimplificationBudgetUnreachable { budget, remaining } => write!(
                f,
                "node budget of {budget} unreachable, {remaining} nodes remain after simplification"
            ),
        }
    }
}

/// Checks that a configuration value is finite and strictly positive.
pub(crate) fn ensure_positive<T>(name: &str, value: T) -> Result<(), CadenceError>
where
    T: Into<f64> + Copy,
{
    let value: f64 = value.into();
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CadenceError::invalid_config(format!(
            "`{name}` must be a positive number, got {value}"
        )))
    }
}

/// Checks that a configuration value is finite and not negative.
pub(crate) fn ensure_non_negative<T>(name: &str, value: T) -> Result<(), CadenceError>
where
    T: Into<f64> + Copy,
{
    let value: f64 = value.into();
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CadenceError::invalid_config(format!(
            "`{name}` must be zero or a positive number, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CadenceError::DuplicateId {
            category: ElementCategory::Node,
            id: Id::new("api"),
        };
        assert_eq!(err.to_string(), "duplicate node id `api`");

        let err = CadenceError::DanglingReference {
            category: ElementCategory::Edge,
            owner: Id::new("api->ghost"),
            missing: Id::new("ghost"),
        };
        assert_eq!(
            err.to_string(),
            "edge `api->ghost` references unknown node `ghost`"
        );
    }

    #[test]
    fn test_ensure_positive() {
        assert!(ensure_positive("fps", 30.0).is_ok());
        assert!(ensure_positive("fps", 0.0).is_err());
        assert!(ensure_positive("fps", -1.0).is_err());
        assert!(ensure_positive("fps", f64::NAN).is_err());
        assert!(ensure_positive("width", 1920.0f32).is_ok());
    }

    #[test]
    fn test_ensure_non_negative() {
        assert!(ensure_non_negative("padding", 0.0).is_ok());
        assert!(ensure_non_negative("padding", -0.5).is_err());
        assert!(ensure_non_negative("padding", f64::INFINITY).is_err());
    }

    #[test]
    fn test_warning_display() {
        let warning = Warning::SimplificationBudgetUnreachable {
            budget: 3,
            remaining: 5,
        };
        assert_eq!(
            warning.to_string(),
            "node budget of 3 unreachable, 5 nodes remain after simplification"
        );
    }
}
