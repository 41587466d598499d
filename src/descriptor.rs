//! Package descriptor: identity, build options and declared requirements.
//!
//! A descriptor is an immutable value built once per invocation. Options are
//! a closed set ([`OptionName`]); assigning a value outside an option's domain
//! fails with [`RecipeError::InvalidOption`] before any build step can run.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::deps::{DependencyRequirement, DependencyResolver};
use crate::error::{RecipeError, Result};
use crate::settings::{Os, Settings};

/// Identity metadata published to a package index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageIdentity {
    pub name: String,
    pub version: String,
    pub license: String,
    pub author: String,
    pub url: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionName {
    Shared,
    Fpic,
}

impl OptionName {
    pub const ALL: [OptionName; 2] = [OptionName::Shared, OptionName::Fpic];

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionName::Shared => "shared",
            OptionName::Fpic => "fPIC",
        }
    }

    /// Allowed values, in declaration order.
    pub fn domain(&self) -> &'static [bool] {
        &[true, false]
    }

    pub fn default_value(&self) -> bool {
        match self {
            OptionName::Shared => false,
            OptionName::Fpic => true,
        }
    }

    fn parse_value(&self, value: &str) -> Result<bool> {
        let parsed = match value.trim() {
            "true" | "True" => Some(true),
            "false" | "False" => Some(false),
            _ => None,
        };
        parsed
            .filter(|v| self.domain().contains(v))
            .ok_or_else(|| RecipeError::InvalidOption {
                option: self.as_str().to_string(),
                value: value.to_string(),
                allowed: self
                    .domain()
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

impl FromStr for OptionName {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "shared" => Ok(OptionName::Shared),
            "fPIC" => Ok(OptionName::Fpic),
            other => Err(RecipeError::UnknownOption(other.to_string())),
        }
    }
}

impl fmt::Display for OptionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuildOptions {
    pub shared: bool,
    #[serde(rename = "fPIC")]
    pub fpic: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            shared: OptionName::Shared.default_value(),
            fpic: OptionName::Fpic.default_value(),
        }
    }
}

impl BuildOptions {
    pub fn get(&self, name: OptionName) -> bool {
        match name {
            OptionName::Shared => self.shared,
            OptionName::Fpic => self.fpic,
        }
    }

    fn set(&mut self, name: OptionName, value: bool) {
        match name {
            OptionName::Shared => self.shared = value,
            OptionName::Fpic => self.fpic = value,
        }
    }

    /// Whether position-independent code is requested for these settings.
    /// `None` means the option does not apply (shared libraries are always
    /// PIC; Windows has no such flag).
    pub fn effective_fpic(&self, settings: &Settings) -> Option<bool> {
        if self.shared || settings.os == Os::Windows {
            None
        } else {
            Some(self.fpic)
        }
    }
}

#[derive(Debug, Clone)]
pub struct PackageDescriptor {
    identity: PackageIdentity,
    options: BuildOptions,
    requirements: DependencyResolver,
}

impl PackageDescriptor {
    pub fn new(identity: PackageIdentity, requirements: DependencyResolver) -> Self {
        Self {
            identity,
            options: BuildOptions::default(),
            requirements,
        }
    }

    /// The `emu` package as published.
    pub fn emu() -> Self {
        let identity = PackageIdentity {
            name: "emu".into(),
            version: "1.0.0".into(),
            license: "MIT".into(),
            author: "Julien Bernard jbernard@obspm.fr".into(),
            url: "https://gitlab.obspm.fr/cosmic/tools/emu".into(),
            description: "Set of utilities for C++, CUDA and python".into(),
        };

        let mut requirements = DependencyResolver::new();
        requirements.declare("fmt", "10.2.1", true);
        requirements.declare("open62541", "1.3.9", true);

        Self::new(identity, requirements)
    }

    pub fn identity(&self) -> &PackageIdentity {
        &self.identity
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    pub fn requirements(&self) -> &DependencyResolver {
        &self.requirements
    }

    /// Returns a descriptor with `name` set to `value`.
    pub fn with_option(mut self, name: OptionName, value: &str) -> Result<Self> {
        let value = name.parse_value(value)?;
        self.options.set(name, value);
        Ok(self)
    }

    /// Like [`with_option`](Self::with_option) but takes the option name as
    /// text, as it appears in profiles and on the command line.
    pub fn with_option_str(self, name: &str, value: &str) -> Result<Self> {
        let name: OptionName = name.parse()?;
        self.with_option(name, value)
    }

    /// Binary package id: a digest over settings, effective options and
    /// resolved requirements.
    pub fn package_id(&self, settings: &Settings) -> String {
        let mut hasher = Sha256::new();
        hasher.update(settings.canonical().as_bytes());
        hasher.update(format!(";shared={}", self.options.shared).as_bytes());
        if let Some(fpic) = self.options.effective_fpic(settings) {
            hasher.update(format!(";fPIC={fpic}").as_bytes());
        }
        for req in self.requirements.resolve() {
            hasher.update(format!(";requires={}", req.reference()).as_bytes());
        }
        let digest = format!("{:x}", hasher.finalize());
        digest[..40].to_string()
    }

    pub fn manifest(&self) -> Manifest {
        Manifest {
            identity: self.identity.clone(),
            options: OptionName::ALL
                .iter()
                .map(|name| OptionEntry {
                    name: name.as_str(),
                    domain: name.domain().to_vec(),
                    default: name.default_value(),
                    value: self.options.get(*name),
                })
                .collect(),
            requires: self.requirements.resolve(),
        }
    }
}

/// Serializable view of a descriptor, as consumed by a package index.
#[derive(Debug, Serialize)]
pub struct Manifest {
    #[serde(flatten)]
    pub identity: PackageIdentity,
    pub options: Vec<OptionEntry>,
    pub requires: Vec<DependencyRequirement>,
}

#[derive(Debug, Serialize)]
pub struct OptionEntry {
    pub name: &'static str,
    pub domain: Vec<bool>,
    pub default: bool,
    pub value: bool,
}
