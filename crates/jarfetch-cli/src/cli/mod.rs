//! CLI for the jarfetch post-build plugin download.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use jarfetch_core::config;
use jarfetch_core::run::{self, ProjectDir};
use std::io;
use std::path::PathBuf;

/// Top-level CLI. Without a subcommand it performs the download.
#[derive(Debug, Parser)]
#[command(name = "jarfetch", version)]
#[command(
    about = "Download the plugin jar named by pom.xml into config/plugin.jar",
    long_about = None
)]
pub struct Cli {
    /// Transfer settings file (defaults to ~/.config/jarfetch/config.toml when present).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Read pom.xml and download the plugin jar (the default).
    Fetch,

    /// Print the download URL resolved from pom.xml without downloading.
    Url,

    /// Print a shell completion script.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print the man page (roff).
    Man,
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        Cli::parse().dispatch()
    }

    pub fn dispatch(self) -> Result<()> {
        match self.command.unwrap_or(CliCommand::Fetch) {
            CliCommand::Fetch => {
                let cfg = config::load(self.config.as_deref())?;
                tracing::debug!("loaded settings: {:?}", cfg);
                let project = ProjectDir::current().context("cannot determine working directory")?;
                run::run(&project, &cfg)?;
            }
            CliCommand::Url => {
                let project = ProjectDir::current().context("cannot determine working directory")?;
                println!("{}", run::resolve_url(&project)?);
            }
            CliCommand::Completions { shell } => {
                let mut cmd = Cli::command();
                clap_complete::generate(shell, &mut cmd, "jarfetch", &mut io::stdout());
            }
            CliCommand::Man => {
                let man = clap_mangen::Man::new(Cli::command());
                man.render(&mut io::stdout())
                    .context("failed to render man page")?;
            }
        }
        Ok(())
    }
}
