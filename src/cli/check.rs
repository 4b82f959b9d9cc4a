//! Read-only diagnostics for configuration and input files.
//!
//! Mirrors what `run` validates, without touching the network or writing
//! anything, so an operator can vet a run before pointing it at a live
//! controller.

use crate::constants::{
    API_KEY_ENV_VAR, DEFAULT_APARTMENT_FILE, DEFAULT_MAX_RETRIES, DEFAULT_OUTPUT_FILE,
    DEFAULT_PASSPHRASE_LENGTH, GROUP_POLICY_ID_ENV_VAR, MIN_PASSPHRASE_LENGTH,
    NETWORK_ID_ENV_VAR,
};
use anyhow::{bail, Context, Result};
use clap::Args;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Unit list, one identifier per line
    #[arg(long, env = "APARTMENT_FILE", default_value = DEFAULT_APARTMENT_FILE, value_name = "PATH")]
    pub input: PathBuf,

    /// Report destination
    #[arg(long, env = "OUTPUT_FILE", default_value = DEFAULT_OUTPUT_FILE, value_name = "PATH")]
    pub output: PathBuf,

    /// Provisioning attempts per unit
    #[arg(long, env = "MAX_RETRIES", default_value_t = DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,

    /// Generated passphrase length
    #[arg(long, env = "PASSWORD_LENGTH", default_value_t = DEFAULT_PASSPHRASE_LENGTH)]
    pub length: usize,
}

pub fn run(args: CheckArgs) -> Result<()> {
    let mut ok = 0u32;
    let mut warn = 0u32;
    let mut fail = 0u32;

    println!("Check: provisioning configuration");

    for var in [API_KEY_ENV_VAR, NETWORK_ID_ENV_VAR, GROUP_POLICY_ID_ENV_VAR] {
        match std::env::var(var) {
            Ok(value) if !value.is_empty() => {
                println!("  [PASS] {} is set", var);
                ok += 1;
            }
            _ => {
                println!("  [FAIL] {} is not set", var);
                fail += 1;
            }
        }
    }

    if args.max_retries == 0 {
        println!("  [FAIL] max retries must be at least 1");
        fail += 1;
    } else {
        println!("  [PASS] max retries: {}", args.max_retries);
        ok += 1;
    }

    if args.length < MIN_PASSPHRASE_LENGTH {
        println!(
            "  [FAIL] passphrase length {} below minimum {}",
            args.length, MIN_PASSPHRASE_LENGTH
        );
        fail += 1;
    } else {
        println!("  [PASS] passphrase length: {}", args.length);
        ok += 1;
    }

    match File::open(&args.input) {
        Ok(file) => {
            let mut units = 0usize;
            let mut blank = 0usize;
            for line in BufReader::new(file).lines() {
                let line = line
                    .with_context(|| format!("read unit list {}", args.input.display()))?;
                units += 1;
                if line.trim().is_empty() {
                    blank += 1;
                }
            }
            println!(
                "  [PASS] unit list {}: {} line(s)",
                args.input.display(),
                units
            );
            ok += 1;
            if blank > 0 {
                // Blank lines are not filtered by the batch loop.
                println!(
                    "  [WARN] {} blank line(s) would be provisioned as empty unit names",
                    blank
                );
                warn += 1;
            }
        }
        Err(e) => {
            println!("  [FAIL] unit list {}: {}", args.input.display(), e);
            fail += 1;
        }
    }

    let out_dir = match args.output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if out_dir.is_dir() {
        println!("  [PASS] report directory exists: {}", out_dir.display());
        ok += 1;
    } else {
        println!(
            "  [WARN] report directory missing (created at run time): {}",
            out_dir.display()
        );
        warn += 1;
    }

    println!();
    println!("{} passed, {} warning(s), {} failed", ok, warn, fail);
    if fail > 0 {
        bail!("{} check(s) failed", fail);
    }
    Ok(())
}
