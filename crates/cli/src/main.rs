use anyhow::Result;
use clap::{Parser, Subcommand};
use console::{style, Term};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use aedif_lua::{Runtime, BUILD_SCRIPT};
use aedif_platform::PlatformError;

mod prompts;

// Helper to convert the lua-layer error to anyhow::Error (works around
// mlua not being Send+Sync)
fn map_lua_err<T>(result: aedif_lua::Result<T>) -> Result<T> {
    result.map_err(|e| anyhow::anyhow!("{}", e))
}

/// aedif - A tiny C/C++ building tool
#[derive(Parser)]
#[command(name = "aedif")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory to build into when no subcommand is given
    #[arg(long, default_value = "./build")]
    dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the project described by aedif.lua
    Build {
        /// Directory to build into
        #[arg(long, default_value = "./build")]
        dir: PathBuf,
    },

    /// Remove the build directory
    Clean {
        /// Directory to clean
        #[arg(long, default_value = "./build")]
        dir: PathBuf,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Build, then move the produced binaries into an install directory
    Install {
        /// Directory to install binaries into
        #[arg(long, default_value = "~/.local/bin")]
        dir: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging; default to `info` so configuration warnings
    // are visible without RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .without_time()
        .init();

    let cli = Cli::parse();

    match cli.command {
        // Bare `aedif` builds, like `aedif build`.
        None => cmd_build(&cli.dir),
        Some(Commands::Build { dir }) => cmd_build(&dir),
        Some(Commands::Clean { dir, yes }) => cmd_clean(&dir, yes),
        Some(Commands::Install { dir }) => cmd_install(&dir),
    }
}

fn cmd_build(build_dir: &Path) -> Result<()> {
    let term = Term::stderr();

    if let Err(e) = aedif_platform::ensure_build_dir(build_dir) {
        term.write_line(&format!("{} {}", style("error:").red().bold(), e))?;
        if matches!(e, PlatformError::ForeignBuildDir(_)) {
            term.write_line(&format!(
                "{} aedif only builds into directories it created; remove '{}' or pass a different --dir",
                style("note:").cyan().bold(),
                build_dir.display()
            ))?;
        }
        std::process::exit(1);
    }

    run_script(build_dir)
}

fn run_script(build_dir: &Path) -> Result<()> {
    let term = Term::stderr();
    let script = Path::new(BUILD_SCRIPT);

    let runtime = map_lua_err(Runtime::new(build_dir, false))?;
    if let Err(e) = runtime.run_file(script) {
        term.write_line(&format!("{} {}", style("error:").red().bold(), e))?;
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_clean(build_dir: &Path, yes: bool) -> Result<()> {
    let term = Term::stderr();

    if !build_dir.exists() {
        term.write_line(&format!(
            "{} Nothing to clean at {}",
            style("::").cyan().bold(),
            build_dir.display()
        ))?;
        return Ok(());
    }

    if !aedif_platform::is_aedif_dir(build_dir) {
        term.write_line(&format!(
            "{} '{}' was not created by aedif",
            style("error:").red().bold(),
            build_dir.display()
        ))?;
        term.write_line(&format!(
            "{} refusing to delete a directory without a valid '{}' sentinel",
            style("note:").cyan().bold(),
            aedif_platform::SENTINEL_FILE
        ))?;
        std::process::exit(1);
    }

    let message = format!("Do you really want to delete {}?", build_dir.display());
    if !prompts::confirm(&message, yes)? {
        return Ok(());
    }

    std::fs::remove_dir_all(build_dir)?;
    term.write_line(&format!(
        "{} Removed {}",
        style("::").green().bold(),
        build_dir.display()
    ))?;

    Ok(())
}

fn cmd_install(install_dir: &Path) -> Result<()> {
    let term = Term::stderr();
    let build_dir = PathBuf::from("./build");

    cmd_build(&build_dir)?;

    let dest = aedif_platform::expand_path(install_dir)?;
    std::fs::create_dir_all(&dest)?;

    let bin_dir = build_dir.join("bin");
    let mut moved = 0usize;
    for entry in std::fs::read_dir(&bin_dir)? {
        let path = entry?.path();
        if path.is_file() {
            aedif_platform::move_into(&path, &dest)?;
            moved += 1;
        }
    }

    term.write_line(&format!(
        "{} Installed {} file(s) in '{}'. Add this directory to PATH to use them",
        style("::").green().bold(),
        moved,
        dest.display()
    ))?;

    Ok(())
}
