//! Profiles: settings and option values for an invocation.
//!
//! ```toml
//! [settings]
//! os = "Linux"
//! compiler = "gcc"
//! "compiler.version" = "13"
//! build_type = "Release"
//! arch = "x86_64"
//!
//! [options]
//! shared = false
//! fPIC = true
//! ```
//!
//! Anything a profile leaves out is detected from the host. Command-line
//! `-s`/`-o` values are applied on top of the profile.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::descriptor::PackageDescriptor;
use crate::error::{RecipeError, Result};
use crate::settings::{CompilerKind, Settings};
use crate::toolchain;

#[derive(Deserialize, Debug, Default, Clone)]
pub struct Profile {
    #[serde(default)]
    pub settings: BTreeMap<String, toml::Value>,
    #[serde(default)]
    pub options: BTreeMap<String, toml::Value>,
}

impl Profile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| RecipeError::Profile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&content).map_err(|message| RecipeError::Profile {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// `~/.emu/profiles/default.toml`, if present.
    pub fn default_path() -> Option<PathBuf> {
        let path = dirs::home_dir()?
            .join(".emu")
            .join("profiles")
            .join("default.toml");
        path.is_file().then_some(path)
    }

    pub fn settings(&self) -> impl Iterator<Item = (&str, String)> {
        self.settings.iter().map(|(k, v)| (k.as_str(), value_text(v)))
    }

    pub fn options(&self) -> impl Iterator<Item = (&str, String)> {
        self.options.iter().map(|(k, v)| (k.as_str(), value_text(v)))
    }
}

fn value_text(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Settings for this invocation: host defaults, then the profile, then
/// command-line overrides.
pub fn resolve_settings(profile: &Profile, overrides: &[(String, String)]) -> Result<Settings> {
    let mut settings = Settings::host();

    let names_compiler = profile.settings.contains_key("compiler")
        || overrides.iter().any(|(k, _)| k == "compiler");
    if !names_compiler
        && settings.compiler.kind != CompilerKind::Msvc
        && let Some(detected) = toolchain::detect_compiler(Some(settings.compiler.kind))
    {
        debug!(compiler = %detected, "compiler detected");
        settings.compiler = detected;
    }

    for (key, value) in profile.settings() {
        settings.set(key, &value)?;
    }
    for (key, value) in overrides {
        settings.set(key, value)?;
    }
    Ok(settings)
}

/// Apply profile options, then command-line overrides, to `descriptor`.
pub fn apply_options(
    mut descriptor: PackageDescriptor,
    profile: &Profile,
    overrides: &[(String, String)],
) -> Result<PackageDescriptor> {
    for (name, value) in profile.options() {
        descriptor = descriptor.with_option_str(name, &value)?;
    }
    for (name, value) in overrides {
        descriptor = descriptor.with_option_str(name, value)?;
    }
    Ok(descriptor)
}

/// Parse a `key=value` command-line pair.
pub fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{s}'"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}
