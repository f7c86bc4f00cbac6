//! Verify a secret against a stored PHC string

use colored::Colorize;

use pwdhash::{PasswordHasher, Result};

use super::read_secret;

/// Returns whether the secret matched
pub fn run(hasher: &PasswordHasher, encoded: &str, from_stdin: bool) -> Result<bool> {
    let secret = read_secret(from_stdin, false)?;
    let matched = hasher.verify(secret, encoded)?;

    if matched {
        println!("{}", "match".green().bold());
        if hasher.needs_rehash(encoded)? {
            println!("{}", "Stored hash is stale; hash the secret again.".yellow());
        }
    } else {
        println!("{}", "no match".red().bold());
    }

    Ok(matched)
}
