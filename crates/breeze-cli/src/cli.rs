//! Command-line interface definition.
//!
//! Defines the CLI structure using clap's derive macros.
//!
//! # Command Structure
//!
//! - `breeze build` - Process the project stylesheet and write it to the
//!   static destination
//! - `breeze install` - Download the standalone Tailwind CLI and scaffold
//!   project defaults

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Breeze - Tailwind CSS integration for server-rendered Rust web apps
#[derive(Parser, Debug)]
#[command(
    name = "breeze",
    version,
    about = "Tailwind CSS integration for server-rendered Rust web apps",
    long_about = "Breeze processes utility-class stylesheets at build time:\n\
                  it scans your templates for class usage, generates the CSS\n\
                  they need, and writes the result to your static directory.\n\
                  The install command fetches the standalone Tailwind CLI for\n\
                  full engine fidelity."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute. Omitting it runs `build` with defaults.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Process the stylesheet and write it to the static destination
    Build(BuildArgs),
    /// Download the Tailwind CLI and scaffold project defaults
    Install(InstallArgs),
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Project root directory
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Stylesheet source: a path (./src/styles.css) or literal CSS
    #[arg(short, long)]
    pub css: Option<String>,

    /// Output path, relative to the project root
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// Static content directory
    #[arg(long, default_value = "./static")]
    pub static_dir: PathBuf,

    /// Explicit config file (tailwind.config.toml or .json)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Minify the generated CSS
    #[arg(short, long)]
    pub minify: bool,

    /// Emit a source map next to the generated CSS
    #[arg(long)]
    pub map: bool,
}

// Must stay in sync with the clap default values above.
impl Default for BuildArgs {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            css: None,
            dest: None,
            static_dir: PathBuf::from("./static"),
            config: None,
            minify: false,
            map: false,
        }
    }
}

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Project root directory
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Skip writing config, stylesheet, and task-file defaults
    #[arg(long)]
    pub no_scaffold: bool,
}
