//! Print the policy table

use colored::Colorize;

use pwdhash::{Policy, Result};

pub fn run(tier: Option<&str>) -> Result<()> {
    let policies = match tier {
        Some(name) => vec![name.parse::<Policy>()?],
        None => Policy::ALL.to_vec(),
    };

    println!(
        "{:<12} {:>12} {:>6} {:>6}",
        "TIER".bold(),
        "MEMORY KiB".bold(),
        "TIME".bold(),
        "LANES".bold()
    );
    println!("{}", "─".repeat(39).dimmed());

    for policy in policies {
        let params = policy.params();
        println!(
            "{:<12} {:>12} {:>6} {:>6}",
            policy.as_str(),
            params.memory_cost,
            params.time_cost,
            params.parallelism
        );
    }

    Ok(())
}
