//! CLI command implementations

pub mod hash;
pub mod inspect;
pub mod policy;
pub mod rehash;
pub mod verify;

use std::io::{self, BufRead};

use colored::Colorize;
use zeroize::Zeroize;

use pwdhash::{HasherConfig, PasswordHasher, Result, SecureBytes};

/// Build the hasher from `--config` and `--policy`
pub fn build_hasher(config: Option<&std::path::Path>, policy: Option<&str>) -> Result<PasswordHasher> {
    let mut cfg = match config {
        Some(path) => HasherConfig::load(path)?,
        None => HasherConfig::default(),
    };
    if let Some(tier) = policy {
        cfg = cfg.with_policy(tier);
    }
    PasswordHasher::from_config(&cfg)
}

/// Prompt for a new secret with confirmation
pub fn prompt_new_secret() -> Result<SecureBytes> {
    loop {
        let mut secret = rpassword::prompt_password("Secret: ")?;

        if secret.is_empty() {
            println!("{} Secret must not be empty", "Error:".red());
            continue;
        }

        let mut confirm = rpassword::prompt_password("Confirm secret: ")?;
        let matches = secret == confirm;
        confirm.zeroize();

        if !matches {
            secret.zeroize();
            println!("{} Secrets do not match", "Error:".red());
            continue;
        }

        return Ok(SecureBytes::from(secret));
    }
}

/// Prompt for an existing secret
pub fn prompt_secret() -> Result<SecureBytes> {
    let secret = rpassword::prompt_password("Secret: ")?;
    Ok(SecureBytes::from(secret))
}

/// Read one line from stdin, without its line terminator
pub fn read_secret_line() -> Result<SecureBytes> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    secret_from_line(line)
}

fn secret_from_line(mut line: String) -> Result<SecureBytes> {
    let trimmed = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed);

    if line.is_empty() {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no secret on stdin").into());
    }
    Ok(SecureBytes::from(line))
}

/// Secret source shared by `hash` and `verify`
pub fn read_secret(from_stdin: bool, confirm: bool) -> Result<SecureBytes> {
    match (from_stdin, confirm) {
        (true, _) => read_secret_line(),
        (false, true) => prompt_new_secret(),
        (false, false) => prompt_secret(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pwdhash::PwdHashError;

    #[test]
    fn test_line_terminator_is_stripped() {
        let secret = secret_from_line("hunter2\r\n".to_string()).unwrap();
        assert_eq!(&*secret, b"hunter2");
    }

    #[test]
    fn test_empty_line_is_eof() {
        for line in ["", "\n", "\r\n"] {
            let err = secret_from_line(line.to_string()).unwrap_err();
            assert!(
                matches!(err, PwdHashError::Io(ref e) if e.kind() == io::ErrorKind::UnexpectedEof),
                "{:?}",
                line
            );
        }
    }
}
