//! # emu-recipe - Package descriptor and build driver for `emu`
//!
//! `emu` is a set of utilities for C++, CUDA and python. This crate describes
//! how the library is packaged and drives its CMake build:
//!
//! - **Identity**: name, version, license, author, url, description
//! - **Options**: `shared` (default `false`) and `fPIC` (default `true`)
//! - **Requirements**: `fmt/10.2.1` and `open62541/1.3.9`, both with
//!   transitive headers
//! - **Layout**: source/build/generators/package folders per settings tuple
//! - **Build**: configure, then build, through an external toolchain
//!
//! ## Quick Start
//!
//! ```bash
//! # Build with host settings and default options
//! emu-recipe build
//!
//! # Shared debug build
//! emu-recipe build -s build_type=Debug -o shared=True
//! ```
//!
//! ## Module Organization
//!
//! - [`descriptor`] - Identity and typed build options
//! - [`deps`] - Requirement resolution and package lookup
//! - [`layout`] - Directory conventions
//! - [`build`] - Build driver state machine and CMake file generation
//! - [`toolchain`] - CMake invocation and compiler detection

/// Build driver and generator files.
pub mod build;

/// Profile loading (`[settings]`, `[options]`).
pub mod config;

/// Requirement resolution and local package lookup.
pub mod deps;

/// Package identity, options and manifest.
pub mod descriptor;

/// Error taxonomy.
pub mod error;

/// Directory layout planning.
pub mod layout;

/// The `(os, compiler, build_type, arch)` settings tuple.
pub mod settings;

/// External toolchain (CMake) and compiler detection.
pub mod toolchain;

/// Requirement tree rendering.
pub mod tree;

/// Terminal UI utilities (tables).
pub mod ui;

pub use build::{BuildDriver, DriverState};
pub use descriptor::{BuildOptions, OptionName, PackageDescriptor, PackageIdentity};
pub use error::{RecipeError, Result};
pub use settings::Settings;
