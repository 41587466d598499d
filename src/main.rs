//! # emu-recipe CLI Entry Point
//!
//! Commands:
//! - **Build**: `build`, `configure`
//! - **Inspection**: `inspect`, `layout`, `requires`
//! - **Shell**: `completions`
//!
//! The process exit code reflects the driver's final state: 0 once built,
//! non-zero otherwise.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use colored::*;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use emu_recipe::config::{self, Profile, parse_key_value};
use emu_recipe::deps::LocalCache;
use emu_recipe::descriptor::Manifest;
use emu_recipe::layout;
use emu_recipe::toolchain::CMake;
use emu_recipe::tree;
use emu_recipe::ui;
use emu_recipe::{BuildDriver, DriverState, PackageDescriptor, RecipeError, Settings};

#[derive(Parser)]
#[command(name = "emu-recipe")]
#[command(about = "Package descriptor and build driver for emu", version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
struct Cli {
    /// Stream toolchain output and enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Debug)]
struct Invocation {
    /// Setting override (os, compiler, compiler.version, build_type, arch)
    #[arg(short = 's', long = "setting", value_parser = parse_key_value)]
    settings: Vec<(String, String)>,
    /// Option override (shared, fPIC)
    #[arg(short = 'o', long = "option", value_parser = parse_key_value)]
    options: Vec<(String, String)>,
    /// Profile file [default: ~/.emu/profiles/default.toml if present]
    #[arg(long)]
    profile: Option<PathBuf>,
}

#[derive(Args, Clone, Debug)]
struct Workspace {
    /// Source root of the emu library
    #[arg(long, default_value = ".")]
    root: PathBuf,
    /// Package cache [default: $EMU_CACHE or ~/.emu/cache]
    #[arg(long)]
    cache: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure and build the library
    Build {
        #[command(flatten)]
        invocation: Invocation,
        #[command(flatten)]
        workspace: Workspace,
    },
    /// Run only the configure step
    Configure {
        #[command(flatten)]
        invocation: Invocation,
        #[command(flatten)]
        workspace: Workspace,
    },
    /// Print package metadata, options and requirements as JSON
    Inspect {
        #[command(flatten)]
        invocation: Invocation,
    },
    /// Show the directory layout for the current settings
    Layout {
        #[command(flatten)]
        invocation: Invocation,
    },
    /// Show resolved requirements
    Requires,
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "x".red(), e);
            1
        }
    };
    std::process::exit(code);
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("emu_recipe=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .init();
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Build {
            invocation,
            workspace,
        } => cmd_build(&invocation, &workspace, cli.verbose, false),
        Commands::Configure {
            invocation,
            workspace,
        } => cmd_build(&invocation, &workspace, cli.verbose, true),
        Commands::Inspect { invocation } => cmd_inspect(&invocation),
        Commands::Layout { invocation } => cmd_layout(&invocation),
        Commands::Requires => {
            tree::print_tree(&PackageDescriptor::emu());
            Ok(0)
        }
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "emu-recipe", &mut io::stdout());
            Ok(0)
        }
    }
}

/// Descriptor and settings for this invocation. Option values are validated
/// here, before anything touches the build tree.
fn load(invocation: &Invocation) -> Result<(PackageDescriptor, Settings)> {
    let profile = match invocation.profile.clone().or_else(Profile::default_path) {
        Some(path) => Profile::load(&path)?,
        None => Profile::default(),
    };
    let descriptor =
        config::apply_options(PackageDescriptor::emu(), &profile, &invocation.options)?;
    let settings = config::resolve_settings(&profile, &invocation.settings)?;
    Ok((descriptor, settings))
}

fn cmd_build(
    invocation: &Invocation,
    workspace: &Workspace,
    verbose: bool,
    configure_only: bool,
) -> Result<i32> {
    let start_time = Instant::now();
    let (descriptor, settings) = load(invocation)?;
    let id = descriptor.identity();

    println!(
        "{} Package: {}/{} ({})",
        "📦".blue(),
        id.name.bold(),
        id.version,
        settings.canonical().dimmed()
    );

    let cache = match &workspace.cache {
        Some(dir) => LocalCache::new(dir),
        None => LocalCache::from_env()?,
    };
    let root = workspace
        .root
        .canonicalize()
        .with_context(|| format!("Source root not found: {}", workspace.root.display()))?;

    let toolchain = CMake::detect()
        .map_err(|e| RecipeError::ConfigurationFailure {
            cause: Box::new(e.into()),
        })?
        .verbose(verbose);
    println!("   {} Toolchain: {}", "🔧".cyan(), toolchain.version());

    let mut driver = BuildDriver::new(&descriptor, &settings, &root, cache, toolchain);

    println!("   {} Configuring...", "⚙".blue());
    if let Err(e) = driver.configure() {
        report_failure("Configuration failed", &e);
        return Ok(driver.exit_code());
    }

    if configure_only {
        println!(
            "{} Configured in {}",
            "✓".green(),
            relative(&driver.layout().build, &root).display()
        );
        return Ok(if driver.state() == DriverState::Configured { 0 } else { 1 });
    }

    println!("   {} Building...", "🔥".red());
    if let Err(e) = driver.build() {
        report_failure("Build failed", &e);
        return Ok(driver.exit_code());
    }

    println!(
        "{} Build finished in {:.2?}",
        "✓".green(),
        start_time.elapsed()
    );
    Ok(driver.exit_code())
}

fn report_failure(what: &str, err: &RecipeError) {
    let detail = match err {
        RecipeError::BuildFailure(e) => e.to_string(),
        other => other.root_cause().to_string(),
    };
    eprintln!("{} {}: {}", "x".red(), what, detail);
}

fn relative<'p>(path: &'p Path, root: &Path) -> &'p Path {
    path.strip_prefix(root).unwrap_or(path)
}

#[derive(Serialize)]
struct InspectOutput<'a> {
    #[serde(flatten)]
    manifest: Manifest,
    settings: &'a Settings,
    package_id: String,
}

fn cmd_inspect(invocation: &Invocation) -> Result<i32> {
    let (descriptor, settings) = load(invocation)?;
    let output = InspectOutput {
        manifest: descriptor.manifest(),
        settings: &settings,
        package_id: descriptor.package_id(&settings),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(0)
}

fn cmd_layout(invocation: &Invocation) -> Result<i32> {
    let (descriptor, settings) = load(invocation)?;
    let layout = layout::plan(&settings);

    let mut table = ui::Table::new(&["Folder", "Path"]);
    for (name, path) in [
        ("source", &layout.source),
        ("build", &layout.build),
        ("generators", &layout.generators),
        ("package", &layout.package),
    ] {
        table.add_row(vec![name.to_string(), path.display().to_string()]);
    }
    table.add_row(vec![
        "package id".to_string(),
        descriptor.package_id(&settings),
    ]);
    table.print();
    Ok(0)
}
