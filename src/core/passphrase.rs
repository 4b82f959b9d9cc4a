//! Secure passphrase generation for identity PSKs.
//!
//! Passphrases end up in a comma-delimited report, so every character set
//! here excludes the comma. Randomness comes from the operating system
//! (`OsRng`), not a seeded statistical PRNG.

use crate::constants::MIN_PASSPHRASE_LENGTH;
use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";

/// ASCII punctuation with the comma removed (the report's field delimiter).
const PUNCTUATION: &[u8] = br##"!"#$%&'()*+-./:;<=>?@[\]^_`{|}~"##;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PassphraseError {
    #[error("passphrase length must be at least {min}, got {0}", min = MIN_PASSPHRASE_LENGTH)]
    InvalidLength(usize),
}

/// Generate a passphrase of exactly `length` characters containing at least
/// one lowercase letter, one uppercase letter, one digit, and one
/// punctuation character, with the final order uniformly shuffled.
pub fn generate(length: usize) -> Result<String, PassphraseError> {
    if length < MIN_PASSPHRASE_LENGTH {
        return Err(PassphraseError::InvalidLength(length));
    }

    let mut rng = OsRng;
    let mut chars: Vec<u8> = Vec::with_capacity(length);

    // One character from each class, so composition rules hold even at the
    // minimum length.
    chars.push(pick(LOWERCASE, &mut rng));
    chars.push(pick(UPPERCASE, &mut rng));
    chars.push(pick(DIGITS, &mut rng));
    chars.push(pick(PUNCTUATION, &mut rng));

    // Filler draws uniformly from the union of all classes. The classes are
    // disjoint, so concatenation keeps the distribution uniform.
    let filler_alphabet = [LOWERCASE, UPPERCASE, DIGITS, PUNCTUATION].concat();
    for _ in 0..length - MIN_PASSPHRASE_LENGTH {
        chars.push(pick(&filler_alphabet, &mut rng));
    }

    // The four seed characters would otherwise always lead.
    chars.shuffle(&mut rng);

    Ok(chars.into_iter().map(char::from).collect())
}

fn pick(set: &[u8], rng: &mut OsRng) -> u8 {
    set[rng.gen_range(0..set.len())]
}
