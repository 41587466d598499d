//! Directory conventions for a build.
//!
//! ```text
//! single-config (gcc, clang, apple-clang)   multi-config (msvc)
//! .                      source             .
//! build/Release          build              build
//! build/Release/generators                  build/generators
//! package/<digest>       package            package/<digest>
//! ```
//!
//! Planning only computes names; nothing here touches the filesystem.

use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::settings::Settings;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub source: PathBuf,
    pub build: PathBuf,
    pub generators: PathBuf,
    pub package: PathBuf,
}

impl Layout {
    /// All paths joined onto `root`.
    pub fn under(&self, root: &Path) -> Layout {
        Layout {
            source: root.join(&self.source),
            build: root.join(&self.build),
            generators: root.join(&self.generators),
            package: root.join(&self.package),
        }
    }
}

pub fn plan(settings: &Settings) -> Layout {
    let build = if settings.compiler.kind.is_multi_config() {
        PathBuf::from("build")
    } else {
        Path::new("build").join(settings.build_type.as_str())
    };

    Layout {
        source: PathBuf::from("."),
        generators: build.join("generators"),
        build,
        package: Path::new("package").join(settings_digest(settings)),
    }
}

/// Short digest identifying a settings tuple.
pub fn settings_digest(settings: &Settings) -> String {
    let digest = Sha256::digest(settings.canonical().as_bytes());
    format!("{:x}", digest)[..12].to_string()
}
