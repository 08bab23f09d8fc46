use std::env;

use crate::models::CLIConfig;
use crate::saved;

const DEFAULT_URL: &str = "http://localhost:8080";
const DEFAULT_TRIES: usize = 6;

pub fn parse_config() -> CLIConfig {
    let mut cfg = CLIConfig {
        base_url: env_or("WOTD_URL", DEFAULT_URL.to_string()),
        max_tries: DEFAULT_TRIES,
        state_path: saved::default_path(),
    };

    let args: Vec<String> = env::args().collect();
    let mut idx = 1;
    while idx < args.len() {
        match args[idx].as_str() {
            "--base" => {
                if let Some(value) = args.get(idx + 1) {
                    cfg.base_url = value.clone();
                    idx += 1;
                }
            }
            "--tries" => {
                if let Some(value) = args.get(idx + 1) {
                    if let Ok(parsed) = value.parse::<usize>() {
                        if parsed > 0 {
                            cfg.max_tries = parsed;
                        }
                    }
                    idx += 1;
                }
            }
            "--state" => {
                if let Some(value) = args.get(idx + 1) {
                    cfg.state_path = value.into();
                    idx += 1;
                }
            }
            _ => {}
        }
        idx += 1;
    }

    cfg
}

fn env_or(key: &str, fallback: String) -> String {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => fallback,
    }
}
