//! Show the metadata of a PHC string

use colored::Colorize;

use pwdhash::{phc, PasswordHasher, Result};

pub fn run(hasher: &PasswordHasher, encoded: &str) -> Result<()> {
    let record = phc::decode(encoded)?;

    println!("{:<12} {}", "algorithm".bold(), record.algorithm);
    println!("{:<12} {}", "version".bold(), record.version);
    for (key, value) in &record.params {
        println!("{:<12} {}", format!("param {}", key).bold(), value);
    }
    println!("{:<12} {} bytes", "salt".bold(), record.salt.len());
    println!("{:<12} {} bytes", "digest".bold(), record.digest.len());

    let known = hasher.algorithms().contains(&record.algorithm.as_str());
    let stale = hasher.needs_rehash(encoded)?;
    println!(
        "{:<12} {}",
        "status".bold(),
        match (known, stale) {
            (false, _) => "unknown algorithm".red(),
            (true, true) => "stale".yellow(),
            (true, false) => "current".green(),
        }
    );

    Ok(())
}
