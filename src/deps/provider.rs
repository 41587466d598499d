//! Locating resolved requirements on disk.
//!
//! Packages are expected in a local cache laid out as
//! `<root>/<name>/<version>/{include,lib}`. Fetching packages into the cache
//! is somebody else's job; a missing entry is an unresolved dependency.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use super::DependencyRequirement;
use crate::error::{RecipeError, Result};

/// Where a requirement was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedDependency {
    pub requirement: DependencyRequirement,
    pub prefix: PathBuf,
    pub include_dir: PathBuf,
    pub lib_dir: PathBuf,
}

pub trait DependencyProvider {
    fn locate(&self, requirement: &DependencyRequirement) -> Result<LocatedDependency>;

    fn locate_all(&self, requirements: &[DependencyRequirement]) -> Result<Vec<LocatedDependency>> {
        requirements.iter().map(|r| self.locate(r)).collect()
    }
}

#[derive(Debug, Clone)]
pub struct LocalCache {
    root: PathBuf,
}

impl LocalCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `$EMU_CACHE`, falling back to `~/.emu/cache`.
    pub fn from_env() -> anyhow::Result<Self> {
        if let Some(root) = std::env::var_os("EMU_CACHE") {
            return Ok(Self::new(root));
        }
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(Self::new(home.join(".emu").join("cache")))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn package_dir(&self, requirement: &DependencyRequirement) -> PathBuf {
        self.root.join(&requirement.name).join(&requirement.version)
    }
}

impl DependencyProvider for LocalCache {
    fn locate(&self, requirement: &DependencyRequirement) -> Result<LocatedDependency> {
        let prefix = self.package_dir(requirement);
        if !prefix.is_dir() {
            return Err(RecipeError::UnresolvedDependency {
                name: requirement.name.clone(),
                version: requirement.version.clone(),
                cache: self.root.clone(),
            });
        }

        debug!(dependency = %requirement, prefix = %prefix.display(), "dependency located");
        Ok(LocatedDependency {
            requirement: requirement.clone(),
            include_dir: prefix.join("include"),
            lib_dir: prefix.join("lib"),
            prefix,
        })
    }
}
