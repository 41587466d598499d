//! Build settings: the `(os, compiler, build_type, arch)` tuple.
//!
//! Settings arrive as text (profile files, `-s key=value` on the command
//! line) and are parsed into closed enums. Rendering a parsed value yields the
//! exact spelling it was parsed from, so settings pass through unmodified.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{RecipeError, Result};

macro_rules! setting_enum {
    ($(#[$meta:meta])* $name:ident, $setting:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = RecipeError;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err(RecipeError::InvalidSetting {
                        setting: $setting.to_string(),
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
                s.serialize_str(self.as_str())
            }
        }
    };
}

setting_enum!(
    /// Target operating system.
    Os, "os", {
        Linux => "Linux",
        Windows => "Windows",
        Macos => "Macos",
        FreeBsd => "FreeBSD",
    }
);

setting_enum!(
    /// Compiler family.
    CompilerKind, "compiler", {
        Gcc => "gcc",
        Clang => "clang",
        AppleClang => "apple-clang",
        Msvc => "msvc",
    }
);

setting_enum!(
    BuildType, "build_type", {
        Debug => "Debug",
        Release => "Release",
        RelWithDebInfo => "RelWithDebInfo",
        MinSizeRel => "MinSizeRel",
    }
);

setting_enum!(
    /// Target architecture.
    Arch, "arch", {
        X86_64 => "x86_64",
        X86 => "x86",
        Armv8 => "armv8",
        Armv7 => "armv7",
    }
);

impl CompilerKind {
    /// Multi-config generators (Visual Studio) keep every build type in one
    /// build tree.
    pub fn is_multi_config(&self) -> bool {
        matches!(self, CompilerKind::Msvc)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Compiler {
    pub kind: CompilerKind,
    pub version: Option<String>,
}

impl Compiler {
    pub fn new(kind: CompilerKind) -> Self {
        Self {
            kind,
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

impl fmt::Display for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{} {}", self.kind, v),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// The settings tuple for one build invocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Settings {
    pub os: Os,
    pub compiler: Compiler,
    pub build_type: BuildType,
    pub arch: Arch,
}

impl Settings {
    pub fn new(os: Os, compiler: Compiler, build_type: BuildType, arch: Arch) -> Self {
        Self {
            os,
            compiler,
            build_type,
            arch,
        }
    }

    /// Apply a single `key=value` setting.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key.trim() {
            "os" => self.os = value.parse()?,
            "compiler" => self.compiler = Compiler::new(value.parse()?),
            "compiler.version" => {
                if value.is_empty() {
                    return Err(RecipeError::InvalidSetting {
                        setting: "compiler.version".into(),
                        value: value.into(),
                    });
                }
                self.compiler.version = Some(value.to_string());
            }
            "build_type" => self.build_type = value.parse()?,
            "arch" => self.arch = value.parse()?,
            other => {
                return Err(RecipeError::InvalidSetting {
                    setting: other.to_string(),
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Stable `key=value;...` rendering used for digests.
    pub fn canonical(&self) -> String {
        let mut out = format!(
            "os={};compiler={};build_type={};arch={}",
            self.os, self.compiler.kind, self.build_type, self.arch
        );
        if let Some(v) = &self.compiler.version {
            out.push_str(";compiler.version=");
            out.push_str(v);
        }
        out
    }

    /// Settings for the machine running this process. The compiler is a
    /// platform default; callers refine it with toolchain detection.
    pub fn host() -> Self {
        let os = match std::env::consts::OS {
            "windows" => Os::Windows,
            "macos" => Os::Macos,
            "freebsd" => Os::FreeBsd,
            _ => Os::Linux,
        };
        let arch = match std::env::consts::ARCH {
            "x86" => Arch::X86,
            "aarch64" => Arch::Armv8,
            "arm" => Arch::Armv7,
            _ => Arch::X86_64,
        };
        let compiler = match os {
            Os::Windows => CompilerKind::Msvc,
            Os::Macos => CompilerKind::AppleClang,
            Os::FreeBsd => CompilerKind::Clang,
            Os::Linux => CompilerKind::Gcc,
        };
        Self::new(os, Compiler::new(compiler), BuildType::Release, arch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linux_gcc() -> Settings {
        Settings::new(
            Os::Linux,
            Compiler::new(CompilerKind::Gcc),
            BuildType::Release,
            Arch::X86_64,
        )
    }

    #[test]
    fn test_values_render_as_parsed() {
        for text in ["Linux", "Windows", "Macos", "FreeBSD"] {
            assert_eq!(text.parse::<Os>().unwrap().to_string(), text);
        }
        for text in ["gcc", "clang", "apple-clang", "msvc"] {
            assert_eq!(text.parse::<CompilerKind>().unwrap().to_string(), text);
        }
        for text in ["Debug", "Release", "RelWithDebInfo", "MinSizeRel"] {
            assert_eq!(text.parse::<BuildType>().unwrap().to_string(), text);
        }
        for text in ["x86_64", "x86", "armv8", "armv7"] {
            assert_eq!(text.parse::<Arch>().unwrap().to_string(), text);
        }
    }

    #[test]
    fn test_unknown_value_is_invalid_setting() {
        let err = "Plan9".parse::<Os>().unwrap_err();
        assert!(matches!(
            err,
            RecipeError::InvalidSetting { ref setting, ref value } if setting == "os" && value == "Plan9"
        ));
    }

    #[test]
    fn test_set_updates_fields() {
        let mut s = linux_gcc();
        s.set("build_type", "Debug").unwrap();
        s.set("compiler", "clang").unwrap();
        s.set("compiler.version", "17").unwrap();
        s.set("arch", "armv8").unwrap();
        assert_eq!(s.build_type, BuildType::Debug);
        assert_eq!(s.compiler, Compiler::new(CompilerKind::Clang).with_version("17"));
        assert_eq!(s.arch, Arch::Armv8);
    }

    #[test]
    fn test_set_compiler_resets_version() {
        let mut s = linux_gcc();
        s.set("compiler.version", "13").unwrap();
        s.set("compiler", "clang").unwrap();
        assert_eq!(s.compiler.version, None);
    }

    #[test]
    fn test_set_unknown_key_fails() {
        let mut s = linux_gcc();
        assert!(s.set("libc", "musl").is_err());
        assert_eq!(s, linux_gcc());
    }

    #[test]
    fn test_canonical_includes_compiler_version() {
        let mut s = linux_gcc();
        assert_eq!(
            s.canonical(),
            "os=Linux;compiler=gcc;build_type=Release;arch=x86_64"
        );
        s.set("compiler.version", "13").unwrap();
        assert!(s.canonical().ends_with(";compiler.version=13"));
    }

    #[test]
    fn test_host_defaults_to_release() {
        assert_eq!(Settings::host().build_type, BuildType::Release);
    }
}
