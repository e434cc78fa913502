use std::{collections::HashMap, fs, io, path::Path, time::Duration};

use shared::domain::Address;
use url::Url;

use crate::error::ClientError;

pub const SETTINGS_FILE: &str = "voting.toml";
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";
/// First contract deployed by the default account on a fresh development node.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub rpc_url: Url,
    pub contract_address: Address,
    pub receipt_poll_interval_ms: u64,
    pub log_filter: String,
}

impl Settings {
    pub fn receipt_poll_interval(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_interval_ms)
    }

    pub fn set_rpc_url(&mut self, raw: &str) -> Result<(), ClientError> {
        self.rpc_url = parse_rpc_url(raw)?;
        Ok(())
    }

    pub fn set_contract_address(&mut self, raw: &str) -> Result<(), ClientError> {
        self.contract_address = parse_contract_address(raw)?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct RawSettings {
    rpc_url: String,
    contract_address: String,
    receipt_poll_interval_ms: String,
    log_filter: String,
}

impl Default for RawSettings {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.into(),
            contract_address: DEFAULT_CONTRACT_ADDRESS.into(),
            receipt_poll_interval_ms: "500".into(),
            log_filter: "info".into(),
        }
    }
}

impl RawSettings {
    fn into_settings(self) -> Result<Settings, ClientError> {
        let receipt_poll_interval_ms = self
            .receipt_poll_interval_ms
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|ms| *ms > 0)
            .ok_or_else(|| {
                ClientError::config(format!(
                    "receipt_poll_interval_ms must be a positive integer, got '{}'",
                    self.receipt_poll_interval_ms
                ))
            })?;

        Ok(Settings {
            rpc_url: parse_rpc_url(&self.rpc_url)?,
            contract_address: parse_contract_address(&self.contract_address)?,
            receipt_poll_interval_ms,
            log_filter: self.log_filter,
        })
    }
}

/// Loads settings from `voting.toml` in the working directory and the
/// process environment.
pub fn load_settings() -> Result<Settings, ClientError> {
    load_settings_from(Path::new(SETTINGS_FILE), |name| std::env::var(name).ok())
}

/// Defaults, then the file at `path` if it exists, then environment
/// variables as seen through `env`. Later sources win.
pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings, ClientError> {
    let mut settings = RawSettings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg = parse_settings_file(&raw)
                .map_err(|err| ClientError::config(format!("{}: {err}", path.display())))?;
            if let Some(v) = file_cfg.get("rpc_url") {
                settings.rpc_url = v.clone();
            }
            if let Some(v) = file_cfg.get("contract_address") {
                settings.contract_address = v.clone();
            }
            if let Some(v) = file_cfg.get("receipt_poll_interval_ms") {
                settings.receipt_poll_interval_ms = v.clone();
            }
            if let Some(v) = file_cfg.get("log_filter") {
                settings.log_filter = v.clone();
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(ClientError::config(format!(
                "failed to read {}: {err}",
                path.display()
            )))
        }
    }

    if let Some(v) = env("VOTING_RPC_URL") {
        settings.rpc_url = v;
    }
    if let Some(v) = env("APP__RPC_URL") {
        settings.rpc_url = v;
    }

    if let Some(v) = env("VOTING_CONTRACT_ADDRESS") {
        settings.contract_address = v;
    }
    if let Some(v) = env("APP__CONTRACT_ADDRESS") {
        settings.contract_address = v;
    }

    if let Some(v) = env("APP__RECEIPT_POLL_INTERVAL_MS") {
        settings.receipt_poll_interval_ms = v;
    }

    if let Some(v) = env("RUST_LOG") {
        settings.log_filter = v;
    }

    settings.into_settings()
}

/// Flat `key = value` pairs. Integers and booleans are accepted and kept in
/// their textual form.
fn parse_settings_file(raw: &str) -> Result<HashMap<String, String>, String> {
    let table = toml::from_str::<HashMap<String, toml::Value>>(raw).map_err(|err| err.to_string())?;
    table
        .into_iter()
        .map(|(key, value)| {
            let text = match value {
                toml::Value::String(text) => text,
                toml::Value::Integer(number) => number.to_string(),
                toml::Value::Boolean(flag) => flag.to_string(),
                other => return Err(format!("'{key}' must be a scalar, got {}", other.type_str())),
            };
            Ok((key, text))
        })
        .collect()
}

fn parse_rpc_url(raw: &str) -> Result<Url, ClientError> {
    let url = Url::parse(raw.trim())
        .map_err(|err| ClientError::config(format!("invalid rpc_url '{raw}': {err}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ClientError::config(format!(
            "rpc_url must use http or https, got '{scheme}'"
        ))),
    }
}

fn parse_contract_address(raw: &str) -> Result<Address, ClientError> {
    raw.trim()
        .parse()
        .map_err(|err| ClientError::config(format!("invalid contract_address '{raw}': {err}")))
}
