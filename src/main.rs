// src/main.rs

mod cli;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use pkgsack::utils::glob_or_exact;
use pkgsack::{Base, RepositoryIndex, SackConfig};
use std::io;
use tracing::info;

fn load_base(index: &str, config: Option<&str>, disable_excludes: bool) -> Result<Base> {
    let mut config = match config {
        Some(path) => SackConfig::load(path)?,
        None => SackConfig::default(),
    };
    config.disable_excludes |= disable_excludes;

    let index = RepositoryIndex::load(index)
        .with_context(|| format!("Failed to load repository index {}", index))?;
    let mut base = Base::with_config(config);
    base.load_index(&index)?;
    Ok(base)
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Query {
            index,
            spec,
            config,
            arch,
            repo,
            provides,
            installed,
            available,
            disable_excludes,
        } => {
            let base = load_base(&index, config.as_deref(), disable_excludes)?;
            let mut query = base.get_package_sack().new_query();

            if let Some(spec) = &spec {
                info!("Resolving package spec: {}", spec);
                query.resolve_spec(spec)?;
            }
            if let Some(arch) = &arch {
                query.filter_arch(arch, glob_or_exact(arch))?;
            }
            if let Some(repo) = &repo {
                query.filter_repo_id(repo, glob_or_exact(repo))?;
            }
            if let Some(provides) = &provides {
                query.filter_provides(provides, glob_or_exact(provides))?;
            }
            if installed {
                query.filter_installed()?;
            }
            if available {
                query.filter_available()?;
            }

            let nevras = query.nevras()?;
            if nevras.is_empty() {
                println!("No packages found.");
            } else {
                for nevra in nevras {
                    println!("{}", nevra);
                }
            }
            Ok(())
        }
        Commands::Repolist { index, all } => {
            let base = load_base(&index, None, false)?;
            let mut query = base.get_repo_sack().new_query();
            if !all {
                query.filter_enabled(true)?;
            }

            let mut repos = query
                .iter()
                .map(|repo| repo.get())
                .collect::<pkgsack::Result<Vec<_>>>()?;
            repos.sort_by(|a, b| a.id().cmp(b.id()));

            if repos.is_empty() {
                println!("No repositories configured.");
                return Ok(());
            }

            println!("{:<24} {:<40} {:>8}  {}", "repo id", "repo name", "priority", "status");
            for repo in repos {
                println!(
                    "{:<24} {:<40} {:>8}  {}",
                    repo.id(),
                    repo.name(),
                    repo.priority(),
                    if repo.is_enabled() { "enabled" } else { "disabled" }
                );
            }
            Ok(())
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "pkgsack", &mut io::stdout());
            Ok(())
        }
    }
}
