//! Hash a secret with the active algorithm

use pwdhash::{PasswordHasher, Result};

use super::read_secret;

pub fn run(hasher: &PasswordHasher, from_stdin: bool) -> Result<()> {
    let secret = read_secret(from_stdin, true)?;
    let encoded = hasher.hash(secret)?;

    // Plain output so the string can be piped into storage.
    println!("{}", encoded);
    Ok(())
}
