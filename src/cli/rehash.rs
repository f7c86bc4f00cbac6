//! Report whether a stored PHC string should be regenerated

use pwdhash::{PasswordHasher, Result};

pub fn run(hasher: &PasswordHasher, encoded: &str) -> Result<bool> {
    let needs = hasher.needs_rehash(encoded)?;
    println!("{}", if needs { "yes" } else { "no" });
    Ok(needs)
}
