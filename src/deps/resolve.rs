use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{RecipeError, Result};

/// A pinned requirement on an external package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DependencyRequirement {
    pub name: String,
    pub version: String,
    /// Headers of this dependency stay visible to consumers of the package.
    pub transitive_headers: bool,
}

impl DependencyRequirement {
    /// Parse the `name/version` reference form.
    pub fn parse(reference: &str, transitive_headers: bool) -> Result<Self> {
        let (name, version) = reference
            .trim()
            .split_once('/')
            .filter(|(n, v)| !n.is_empty() && !v.is_empty() && !v.contains('/'))
            .ok_or_else(|| RecipeError::InvalidReference(reference.to_string()))?;
        Ok(Self {
            name: name.to_string(),
            version: version.to_string(),
            transitive_headers,
        })
    }

    pub fn reference(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }
}

impl fmt::Display for DependencyRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

/// Ordered name → requirement mapping with last-write-wins semantics.
///
/// Redeclaring a name replaces its version and flag in place: the entry keeps
/// the position of its first declaration.
#[derive(Debug, Clone, Default)]
pub struct DependencyResolver {
    entries: Vec<DependencyRequirement>,
    index: HashMap<String, usize>,
}

impl DependencyResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, name: &str, version: &str, transitive_headers: bool) {
        let requirement = DependencyRequirement {
            name: name.to_string(),
            version: version.to_string(),
            transitive_headers,
        };

        match self.index.get(name) {
            Some(&pos) => {
                let previous = &self.entries[pos];
                if previous.version != version {
                    warn!(
                        dependency = name,
                        from = %previous.version,
                        to = version,
                        downgrade = is_downgrade(&previous.version, version),
                        "requirement overridden"
                    );
                }
                self.entries[pos] = requirement;
            }
            None => {
                debug!(dependency = name, version, transitive_headers, "requirement declared");
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push(requirement);
            }
        }
    }

    /// Declare from a `name/version` reference.
    pub fn declare_ref(&mut self, reference: &str, transitive_headers: bool) -> Result<()> {
        let req = DependencyRequirement::parse(reference, transitive_headers)?;
        self.declare(&req.name, &req.version, req.transitive_headers);
        Ok(())
    }

    /// One requirement per distinct name, in first-declaration order.
    pub fn resolve(&self) -> Vec<DependencyRequirement> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Only meaningful for semver-shaped versions; anything else is not
/// reported as a downgrade.
fn is_downgrade(from: &str, to: &str) -> bool {
    match (semver::Version::parse(from), semver::Version::parse(to)) {
        (Ok(from), Ok(to)) => to < from,
        _ => false,
    }
}
