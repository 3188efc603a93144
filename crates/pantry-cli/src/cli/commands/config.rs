//! `pantry config` – show where the config lives and what is in effect.

use anyhow::Result;
use pantry_core::config::{self, PantryConfig};

use super::output::print_json;

pub fn run_config(cfg: &PantryConfig, json: bool) -> Result<()> {
    let shown = cfg.redacted();
    if json {
        return print_json(&shown);
    }
    println!("# {}", config::config_path()?.display());
    print!("{}", toml::to_string_pretty(&shown)?);

    match cfg.backoff_policy() {
        Ok(policy) => {
            let schedule: Vec<String> = policy
                .schedule()
                .iter()
                .map(|d| format!("{}ms", d.as_millis()))
                .collect();
            println!("# retry schedule: [{}]", schedule.join(", "));
        }
        Err(e) => println!("# {e}"),
    }
    if let Err(e) = cfg.connection_config() {
        println!("# {e}");
    }
    Ok(())
}
