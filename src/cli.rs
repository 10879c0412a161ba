// src/cli.rs
//
// Command line definition, shared with build.rs for the man page

use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "pkgsack")]
#[command(author, version, about = "Query packages and repositories from a local repository index", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Query packages (patterns with *, ? or [ are matched as globs)
    Query {
        /// Path to the repository index (JSON)
        index: String,
        /// Package name or NEVRA (shows all visible packages if omitted)
        spec: Option<String>,
        /// Path to a sack configuration file (JSON)
        #[arg(short, long)]
        config: Option<String>,
        /// Filter by architecture
        #[arg(short, long)]
        arch: Option<String>,
        /// Filter by repository id
        #[arg(short, long)]
        repo: Option<String>,
        /// Filter by provided capability
        #[arg(short, long)]
        provides: Option<String>,
        /// Show installed packages only
        #[arg(long, conflicts_with = "available")]
        installed: bool,
        /// Show packages that are not installed only
        #[arg(long)]
        available: bool,
        /// Ignore excludepkgs from the configuration
        #[arg(long)]
        disable_excludes: bool,
    },
    /// List repositories
    Repolist {
        /// Path to the repository index (JSON)
        index: String,
        /// Show all repositories (including disabled)
        #[arg(short, long)]
        all: bool,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type
        shell: Shell,
    },
}
