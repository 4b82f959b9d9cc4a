//! CLI routing and command dispatch.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod check;
pub mod genpass;
pub mod run;

#[derive(Parser, Debug)]
#[command(
    name = "ipsk-provisioner",
    version,
    about = "Batch identity PSK provisioning for dashboard-managed wireless networks"
)]
pub struct Cli {
    /// Run in non-interactive mode (no prompts, suitable for automation)
    #[arg(long, global = true, env = "IPSK_NON_INTERACTIVE")]
    pub non_interactive: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Run(args) => run::run(self.non_interactive, args),
            Commands::Genpass(args) => genpass::run(args),
            Commands::Check(args) => check::run(args),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Provision identity PSKs for every unit in the input list
    Run(run::RunArgs),
    /// Generate passphrases without touching the network
    Genpass(genpass::GenpassArgs),
    /// Diagnose configuration and input files (safe, read-only)
    Check(check::CheckArgs),
}
