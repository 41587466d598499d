//! Error types for the recipe flow.
//!
//! Nothing here is recovered internally: every variant is fatal to the
//! current invocation and surfaces to the caller (and, from the CLI, to the
//! process exit code).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::build::DriverState;
use crate::toolchain::ToolchainError;

pub type Result<T, E = RecipeError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("invalid value '{value}' for option '{option}' (allowed: {allowed})")]
    InvalidOption {
        option: String,
        value: String,
        allowed: String,
    },

    #[error("unknown option '{0}' (known options: shared, fPIC)")]
    UnknownOption(String),

    #[error("invalid value '{value}' for setting '{setting}'")]
    InvalidSetting { setting: String, value: String },

    #[error("invalid requirement reference '{0}', expected <name>/<version>")]
    InvalidReference(String),

    #[error("dependency {name}/{version} is not available in {}", .cache.display())]
    UnresolvedDependency {
        name: String,
        version: String,
        cache: PathBuf,
    },

    #[error("configuration failed")]
    ConfigurationFailure {
        #[source]
        cause: Box<RecipeError>,
    },

    #[error("build failed")]
    BuildFailure(#[source] ToolchainError),

    #[error("cannot {operation}() while the driver is {state}")]
    IllegalState {
        operation: &'static str,
        state: DriverState,
    },

    #[error("failed to load profile {}: {message}", .path.display())]
    Profile { path: PathBuf, message: String },

    #[error(transparent)]
    Toolchain(#[from] ToolchainError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl RecipeError {
    /// Innermost error of a configuration failure, or `self` otherwise.
    pub fn root_cause(&self) -> &RecipeError {
        match self {
            RecipeError::ConfigurationFailure { cause } => cause.root_cause(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_cause_unwraps_configuration_failure() {
        let err = RecipeError::ConfigurationFailure {
            cause: Box::new(RecipeError::UnresolvedDependency {
                name: "fmt".into(),
                version: "10.2.1".into(),
                cache: PathBuf::from("/tmp/cache"),
            }),
        };
        assert!(matches!(
            err.root_cause(),
            RecipeError::UnresolvedDependency { name, .. } if name == "fmt"
        ));
    }

    #[test]
    fn test_invalid_option_message_lists_domain() {
        let err = RecipeError::InvalidOption {
            option: "shared".into(),
            value: "maybe".into(),
            allowed: "true, false".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("maybe"));
        assert!(msg.contains("true, false"));
    }

    #[test]
    fn test_illegal_state_message_names_operation() {
        let err = RecipeError::IllegalState {
            operation: "build",
            state: DriverState::Idle,
        };
        assert_eq!(err.to_string(), "cannot build() while the driver is Idle");
    }
}
