//! Environment configuration.
//!
//! The service reads `PORT` (listen port, default 5000) and `TODO_ENV`
//! (`development` turns on error detail in 500 bodies).

use std::env;

pub fn port() -> u16 {
    env_u16("PORT", 5000)
}

/// True when `TODO_ENV=development`.
pub fn dev_mode() -> bool {
    env::var("TODO_ENV").is_ok_and(|value| value == "development")
}

fn env_u16(name: &str, default: u16) -> u16 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
