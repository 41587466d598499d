//! External build toolchain.
//!
//! The [`Toolchain`] trait is the seam between the build driver and whatever
//! actually compiles the library. [`CMake`] is the production implementation.
//! This module also detects the host compiler so that profiles may leave the
//! `compiler` setting out.

mod cmake;
pub mod types;

pub use cmake::CMake;
pub use types::{BuildStep, ConfigureStep, ToolchainError};

use std::process::Command;

use crate::settings::{Compiler, CompilerKind};

/// Configure-then-build interface to an external toolchain.
pub trait Toolchain {
    fn configure(&mut self, step: &ConfigureStep) -> Result<(), ToolchainError>;
    fn build(&mut self, step: &BuildStep) -> Result<(), ToolchainError>;
}

/// Detect the host C++ compiler, honouring a preferred family first.
///
/// MSVC is never detected here; Windows profiles name it explicitly.
pub fn detect_compiler(preferred: Option<CompilerKind>) -> Option<Compiler> {
    let candidates = match preferred {
        Some(CompilerKind::Clang) | Some(CompilerKind::AppleClang) => {
            vec![("clang", CompilerKind::Clang), ("gcc", CompilerKind::Gcc)]
        }
        _ => vec![("gcc", CompilerKind::Gcc), ("clang", CompilerKind::Clang)],
    };

    for (cmd, mut kind) in candidates {
        let Ok(output) = Command::new(cmd).arg("--version").output() else {
            continue;
        };
        if !output.status.success() {
            continue;
        }

        let banner = String::from_utf8_lossy(&output.stdout).to_string();
        if banner.contains("Apple clang") {
            kind = CompilerKind::AppleClang;
        } else if kind == CompilerKind::Gcc && banner.contains("clang") {
            // macOS ships `gcc` as an alias for clang
            kind = CompilerKind::Clang;
        }

        let compiler = Compiler::new(kind);
        return Some(match major_version(cmd) {
            Some(v) => compiler.with_version(v),
            None => compiler,
        });
    }

    None
}

fn major_version(cmd: &str) -> Option<String> {
    let output = Command::new(cmd).arg("-dumpversion").output().ok()?;
    parse_major(&String::from_utf8_lossy(&output.stdout))
}

fn parse_major(dumpversion: &str) -> Option<String> {
    let major = dumpversion.trim().split('.').next()?;
    if !major.is_empty() && major.chars().all(|c| c.is_ascii_digit()) {
        Some(major.to_string())
    } else {
        None
    }
}
