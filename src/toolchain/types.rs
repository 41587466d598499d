use std::path::PathBuf;

use thiserror::Error;

use crate::settings::BuildType;

/// Inputs of the configure step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigureStep {
    pub source_dir: PathBuf,
    pub build_dir: PathBuf,
    pub toolchain_file: PathBuf,
    /// `None` for multi-config generators, where the build type is chosen at
    /// build time instead.
    pub build_type: Option<BuildType>,
}

/// Inputs of the build step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildStep {
    pub build_dir: PathBuf,
    pub config: BuildType,
}

/// Error type for toolchain operations
#[derive(Debug, Error)]
pub enum ToolchainError {
    #[error("toolchain not found: {0}")]
    NotFound(String),

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{step} step exited with {}{}", exit_label(.status), stderr_tail(.stderr))]
    StepFailed {
        step: &'static str,
        status: Option<i32>,
        stderr: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn exit_label(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.trim_end().lines().collect();
    if lines.is_empty() {
        return String::new();
    }
    let start = lines.len().saturating_sub(10);
    format!(":\n{}", lines[start..].join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_failed_message_includes_tail() {
        let err = ToolchainError::StepFailed {
            step: "configure",
            status: Some(1),
            stderr: "CMake Error: could not find fmt\n".into(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("configure step exited with status 1"));
        assert!(msg.contains("could not find fmt"));
    }

    #[test]
    fn test_stderr_tail_keeps_last_lines() {
        let stderr: String = (0..25).map(|i| format!("line {i}\n")).collect();
        let tail = stderr_tail(&stderr);
        assert!(tail.contains("line 24"));
        assert!(!tail.contains("line 14\n"));
    }

    #[test]
    fn test_signal_exit_label() {
        assert_eq!(exit_label(&None), "a signal");
    }
}
