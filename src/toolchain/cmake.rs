use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use super::types::{BuildStep, ConfigureStep, ToolchainError};
use super::Toolchain;

/// Drives an installed `cmake`.
#[derive(Debug, Clone)]
pub struct CMake {
    program: PathBuf,
    version: String,
    verbose: bool,
}

impl CMake {
    /// Find cmake: `$CMAKE` if set, otherwise `cmake` on PATH.
    pub fn detect() -> Result<Self, ToolchainError> {
        let program = std::env::var_os("CMAKE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("cmake"));
        Self::with_program(program)
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Result<Self, ToolchainError> {
        let program = program.into();
        let output = Command::new(&program)
            .arg("--version")
            .output()
            .map_err(|_| {
                ToolchainError::NotFound(format!(
                    "'{}' could not be executed. Please install CMake 3.15 or newer.",
                    program.display()
                ))
            })?;

        let version = String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .unwrap_or("unknown")
            .to_string();

        debug!(program = %program.display(), %version, "cmake detected");
        Ok(Self {
            program,
            version,
            verbose: false,
        })
    }

    /// Stream cmake output instead of showing a spinner.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn configure_args(step: &ConfigureStep) -> Vec<String> {
        let mut args = vec![
            "-S".to_string(),
            step.source_dir.to_string_lossy().to_string(),
            "-B".to_string(),
            step.build_dir.to_string_lossy().to_string(),
            format!("-DCMAKE_TOOLCHAIN_FILE={}", step.toolchain_file.display()),
        ];
        if let Some(build_type) = step.build_type {
            args.push(format!("-DCMAKE_BUILD_TYPE={}", build_type));
        }
        args
    }

    pub fn build_args(step: &BuildStep) -> Vec<String> {
        vec![
            "--build".to_string(),
            step.build_dir.to_string_lossy().to_string(),
            "--config".to_string(),
            step.config.to_string(),
        ]
    }

    fn run(&self, step: &'static str, args: &[String]) -> Result<(), ToolchainError> {
        info!(step, command = %format!("{} {}", self.program.display(), args.join(" ")), "running cmake");

        let mut cmd = Command::new(&self.program);
        cmd.args(args);

        if self.verbose {
            let status = cmd.status().map_err(|source| ToolchainError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;
            if !status.success() {
                return Err(ToolchainError::StepFailed {
                    step,
                    status: status.code(),
                    stderr: String::new(),
                });
            }
            return Ok(());
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed}] {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("cmake {step}..."));
        pb.enable_steady_tick(Duration::from_millis(100));

        let output = cmd
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ToolchainError::Spawn {
                program: self.program.display().to_string(),
                source,
            });
        pb.finish_and_clear();
        let output = output?;

        if !output.status.success() {
            let mut stderr = String::from_utf8_lossy(&output.stderr).to_string();
            if stderr.trim().is_empty() {
                // cmake reports some errors (missing CMakeLists.txt) on stdout
                stderr = String::from_utf8_lossy(&output.stdout).to_string();
            }
            return Err(ToolchainError::StepFailed {
                step,
                status: output.status.code(),
                stderr,
            });
        }
        Ok(())
    }
}

impl Toolchain for CMake {
    fn configure(&mut self, step: &ConfigureStep) -> Result<(), ToolchainError> {
        self.run("configure", &Self::configure_args(step))
    }

    fn build(&mut self, step: &BuildStep) -> Result<(), ToolchainError> {
        self.run("build", &Self::build_args(step))
    }
}
