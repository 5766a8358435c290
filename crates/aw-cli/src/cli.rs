use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "aw", version, about = "Agentic workflow compiler: Markdown + front-matter -> GitHub Actions lock files")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Promote every warning to a fatal error (spec §6 CLI surface).
    #[arg(long, global = true)]
    pub strict: bool,

    /// Emit diagnostics as JSON instead of the human-readable text form.
    #[arg(long, global = true)]
    pub format_json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile one or more workflow sources into `.lock.yml` files.
    Compile {
        /// Workflow Markdown source files.
        sources: Vec<PathBuf>,

        /// Don't auto-apply suggested schema fixes.
        #[arg(long)]
        no_fix: bool,

        /// Fail instead of resolving and recording a missing action pin.
        #[arg(long)]
        no_pin_update: bool,
    },
    /// Validate sources and report diagnostics without writing any files.
    Lint {
        sources: Vec<PathBuf>,
    },
    /// Resolve and record every action pin a set of sources reference.
    PinUpdate {
        sources: Vec<PathBuf>,
    },
}
