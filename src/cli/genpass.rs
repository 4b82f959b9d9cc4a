//! Generate passphrases without touching the network.

use crate::constants::DEFAULT_PASSPHRASE_LENGTH;
use crate::core::passphrase;
use anyhow::Result;
use clap::Args;

#[derive(Args, Debug)]
pub struct GenpassArgs {
    /// Passphrase length
    #[arg(long, env = "PASSWORD_LENGTH", default_value_t = DEFAULT_PASSPHRASE_LENGTH)]
    pub length: usize,

    /// How many passphrases to print, one per line
    #[arg(long, default_value_t = 1)]
    pub count: usize,
}

pub fn run(args: GenpassArgs) -> Result<()> {
    for _ in 0..args.count {
        println!("{}", passphrase::generate(args.length)?);
    }
    Ok(())
}
