//! CMake integration files written during configure.
//!
//! - `emu_toolchain.cmake`: options and settings as cache variables, plus a
//!   prefix path pointing at the generators folder and every dependency
//! - `<name>-config.cmake`: one imported `<name>::<name>` target per
//!   dependency, found by `find_package(<name> CONFIG)`

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::deps::LocatedDependency;
use crate::descriptor::PackageDescriptor;
use crate::layout::Layout;
use crate::settings::Settings;

pub const TOOLCHAIN_FILE: &str = "emu_toolchain.cmake";

/// Write every generator file into `layout.generators` and return the path of
/// the toolchain file.
pub fn write_all(
    descriptor: &PackageDescriptor,
    settings: &Settings,
    layout: &Layout,
    deps: &[LocatedDependency],
) -> std::io::Result<PathBuf> {
    fs::create_dir_all(&layout.generators)?;

    for dep in deps {
        let path = layout
            .generators
            .join(format!("{}-config.cmake", dep.requirement.name));
        fs::write(&path, dependency_config(dep))?;
        debug!(path = %path.display(), "wrote dependency config");
    }

    let path = layout.generators.join(TOOLCHAIN_FILE);
    fs::write(&path, toolchain_file(descriptor, settings, &layout.generators, deps))?;
    debug!(path = %path.display(), "wrote toolchain file");
    Ok(path)
}

pub fn toolchain_file(
    descriptor: &PackageDescriptor,
    settings: &Settings,
    generators_dir: &Path,
    deps: &[LocatedDependency],
) -> String {
    let id = descriptor.identity();
    let options = descriptor.options();
    let mut out = String::new();

    let _ = writeln!(out, "# Generated for {}/{} ({})", id.name, id.version, settings.canonical());
    let _ = writeln!(out, "set(BUILD_SHARED_LIBS {} CACHE BOOL \"\" FORCE)", on_off(options.shared));
    if let Some(fpic) = options.effective_fpic(settings) {
        let _ = writeln!(
            out,
            "set(CMAKE_POSITION_INDEPENDENT_CODE {} CACHE BOOL \"\" FORCE)",
            on_off(fpic)
        );
    }
    if !settings.compiler.kind.is_multi_config() {
        let _ = writeln!(
            out,
            "set(CMAKE_BUILD_TYPE \"{}\" CACHE STRING \"\" FORCE)",
            settings.build_type
        );
    }

    let mut prefixes = vec![cmake_path(generators_dir)];
    prefixes.extend(deps.iter().map(|d| cmake_path(&d.prefix)));
    let quoted: Vec<String> = prefixes.iter().map(|p| format!("\"{p}\"")).collect();
    let _ = writeln!(out, "list(PREPEND CMAKE_PREFIX_PATH {})", quoted.join(" "));

    out
}

pub fn dependency_config(dep: &LocatedDependency) -> String {
    let req = &dep.requirement;
    let target = format!("{0}::{0}", req.name);
    let mut out = String::new();

    let _ = writeln!(out, "# {}", req.reference());
    let _ = writeln!(out, "if(NOT TARGET {target})");
    let _ = writeln!(out, "  add_library({target} INTERFACE IMPORTED)");
    let _ = writeln!(out, "  set_target_properties({target} PROPERTIES");
    let _ = writeln!(out, "    INTERFACE_INCLUDE_DIRECTORIES \"{}\"", cmake_path(&dep.include_dir));
    let _ = writeln!(out, "    INTERFACE_LINK_DIRECTORIES \"{}\")", cmake_path(&dep.lib_dir));
    let _ = writeln!(out, "endif()");
    let _ = writeln!(out, "set({}_FOUND TRUE)", req.name);
    let _ = writeln!(out, "set({}_VERSION \"{}\")", req.name, req.version);
    let _ = writeln!(
        out,
        "set({}_TRANSITIVE_HEADERS {})",
        req.name.to_uppercase(),
        on_off(req.transitive_headers)
    );

    out
}

fn on_off(value: bool) -> &'static str {
    if value { "ON" } else { "OFF" }
}

/// CMake wants forward slashes on every platform.
fn cmake_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
