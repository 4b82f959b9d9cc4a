//! The batch provisioning command.

use crate::api::DashboardClient;
use crate::config::{Config, RunOptions};
use crate::constants::{
    DEFAULT_APARTMENT_FILE, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_OUTPUT_FILE,
    DEFAULT_PASSPHRASE_LENGTH,
};
use crate::core::batch::{BatchOutcome, BatchRunner};
use crate::core::provision::{Provisioner, RetryPolicy};
use anyhow::{bail, Context, Result};
use clap::Args;
use comfy_table::{presets::UTF8_FULL, Table};
use dialoguer::Confirm;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Unit list, one identifier per line
    #[arg(long, env = "APARTMENT_FILE", default_value = DEFAULT_APARTMENT_FILE, value_name = "PATH")]
    pub input: PathBuf,

    /// Report destination (one record per unit)
    #[arg(long, env = "OUTPUT_FILE", default_value = DEFAULT_OUTPUT_FILE, value_name = "PATH")]
    pub output: PathBuf,

    /// Provisioning attempts per unit
    #[arg(long, env = "MAX_RETRIES", default_value_t = DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,

    /// Generated passphrase length
    #[arg(long, env = "PASSWORD_LENGTH", default_value_t = DEFAULT_PASSPHRASE_LENGTH)]
    pub length: usize,

    /// Dashboard API base URL
    #[arg(long, env = "MERAKI_BASE_URL", default_value = DEFAULT_BASE_URL, value_name = "URL")]
    pub base_url: String,

    /// Skip the confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

pub fn run(non_interactive: bool, args: RunArgs) -> Result<()> {
    let config = Config::from_env(RunOptions {
        input: args.input,
        output: args.output,
        max_retries: args.max_retries,
        passphrase_length: args.length,
        base_url: args.base_url,
    })?;

    let unit_count = count_units(&config.input_path)?;
    println!(
        "Provisioning {} unit(s) on network {} under group policy {}",
        unit_count, config.network_id, config.group_policy_id
    );

    // Creating credentials is a live change on the controller; require an
    // explicit go-ahead.
    if !args.yes {
        if non_interactive {
            bail!("--non-interactive requires --yes for run");
        }
        let proceed = Confirm::new()
            .with_prompt("Create identity PSKs on the live network?")
            .default(false)
            .interact()
            .context("read confirmation")?;
        if !proceed {
            bail!("aborted by operator");
        }
    }

    let client = DashboardClient::new(&config.base_url, config.api_key.clone())?;
    let provisioner = Provisioner::new(
        client,
        RetryPolicy::new(config.max_retries),
        config.target(),
    );
    let runner = BatchRunner::new(provisioner, config.passphrase_length, &config.output_path);
    let outcome = runner.run(&config.input_path)?;

    print_summary(&outcome);
    if outcome.summary.failed > 0 {
        eprintln!(
            "warning: {} unit(s) failed provisioning; see the report for details",
            outcome.summary.failed
        );
    }
    println!("Report:  {}", config.output_path.display());
    println!("Archive: {}", outcome.archive_path.display());
    Ok(())
}

fn count_units(input_path: &Path) -> Result<usize> {
    let file = File::open(input_path)
        .with_context(|| format!("open unit list {}", input_path.display()))?;
    Ok(BufReader::new(file).lines().count())
}

fn print_summary(outcome: &BatchOutcome) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Total", "Succeeded", "Failed"]);
    table.add_row(vec![
        outcome.summary.total.to_string(),
        outcome.summary.succeeded.to_string(),
        outcome.summary.failed.to_string(),
    ]);
    println!("{table}");
}
