//! Provider credentials. Tokens come from the environment; the only baked-in
//! values are the public demo tokens, reachable solely through `--dev-keys`.

use anyhow::{Result, bail};

pub const WAQI_TOKEN_VAR: &str = "WAQI_TOKEN";
pub const OPENWEATHER_KEY_VAR: &str = "OPENWEATHER_API_KEY";

const DEV_WAQI_TOKEN: &str = "demo";
const DEV_OPENWEATHER_KEY: &str = "demo";

#[derive(Debug, Clone)]
pub struct Credentials {
    pub waqi_token: String,
    pub openweather_key: String,
}

impl Credentials {
    pub fn from_env(dev_keys: bool) -> Result<Self> {
        Ok(Self {
            waqi_token: resolve(
                WAQI_TOKEN_VAR,
                std::env::var(WAQI_TOKEN_VAR).ok(),
                dev_keys,
                DEV_WAQI_TOKEN,
            )?,
            openweather_key: resolve(
                OPENWEATHER_KEY_VAR,
                std::env::var(OPENWEATHER_KEY_VAR).ok(),
                dev_keys,
                DEV_OPENWEATHER_KEY,
            )?,
        })
    }
}

fn resolve(name: &str, value: Option<String>, dev_keys: bool, dev_value: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ if dev_keys => Ok(dev_value.to_string()),
        _ => bail!("{name} is not set; export it, or pass --dev-keys to use the demo tokens"),
    }
}
