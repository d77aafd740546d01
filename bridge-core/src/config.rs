use crate::state::BridgeAccount;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use solana_program::pubkey::Pubkey;
use std::collections::BTreeMap;
use std::fs;
use std::str::FromStr;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BridgeClientConfig {
    pub cluster: ClusterConfig,
    pub program: ProgramConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ClusterConfig {
    pub rpc_url: String,
    #[serde(default = "default_commitment")]
    pub commitment: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ProgramConfig {
    pub program_id: String,
    pub config_account: String,
    #[serde(default = "default_token_program")]
    pub token_program_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MonitoringConfig {
    pub log_level: String,
}

/// A named route, `[routes.<name>]` in the config file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RouteConfig {
    #[serde(default)]
    pub name: String,
    pub bridge_account: String,
    pub token_mint: String,
    pub destination: u32,
}

impl RouteConfig {
    pub fn bridge_account(&self) -> Result<Pubkey> {
        parse_pubkey("bridge_account", &self.bridge_account)
    }

    pub fn token_mint(&self) -> Result<Pubkey> {
        parse_pubkey("token_mint", &self.token_mint)
    }

    /// Fields of the on-ledger route that disagree with this entry or with the
    /// configured token program.
    pub fn mismatches(&self, account: &BridgeAccount, token_program_id: &Pubkey) -> Result<Vec<String>> {
        let token_mint = self.token_mint()?;
        let mut found = Vec::new();
        if account.token_mint != token_mint {
            found.push(format!("token mint {} (configured {})", account.token_mint, token_mint));
        }
        if account.destination != self.destination {
            found.push(format!(
                "destination {} (configured {})",
                account.destination, self.destination
            ));
        }
        if account.token_program_id != *token_program_id {
            found.push(format!(
                "token program {} (configured {})",
                account.token_program_id, token_program_id
            ));
        }
        Ok(found)
    }
}

#[derive(Serialize, Deserialize, Debug)]
struct ConfigFile {
    #[serde(flatten)]
    client: BridgeClientConfig,
    #[serde(default)]
    routes: BTreeMap<String, RouteConfig>,
}

fn default_commitment() -> String {
    "confirmed".to_string()
}

fn default_token_program() -> String {
    spl_token_2022::id().to_string()
}

fn parse_pubkey(field: &str, value: &str) -> Result<Pubkey> {
    Pubkey::from_str(value).with_context(|| format!("invalid {} address {:?}", field, value))
}

impl BridgeClientConfig {
    pub fn load_from_file(path: &str) -> Result<(Self, Vec<RouteConfig>)> {
        let content =
            fs::read_to_string(path).with_context(|| format!("reading config {}", path))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<(Self, Vec<RouteConfig>)> {
        let config: ConfigFile = toml::from_str(content)?;

        let routes = config
            .routes
            .into_iter()
            .map(|(name, mut route)| {
                route.name = name;
                route
            })
            .collect();

        Ok((config.client, routes))
    }

    pub fn program_id(&self) -> Result<Pubkey> {
        parse_pubkey("program_id", &self.program.program_id)
    }

    pub fn config_account(&self) -> Result<Pubkey> {
        parse_pubkey("config_account", &self.program.config_account)
    }

    pub fn token_program_id(&self) -> Result<Pubkey> {
        parse_pubkey("token_program_id", &self.program.token_program_id)
    }

    pub fn default_test_config() -> Self {
        Self {
            cluster: ClusterConfig {
                rpc_url: "http://localhost:8899".to_string(),
                commitment: default_commitment(),
            },
            program: ProgramConfig {
                program_id: "4vDVx3HbCz4aTRYyTTtFBp3MDj2ddUVsm8kj4Mv2Edtu".to_string(),
                config_account: "BuG6iUV9eLKsSRFxy6JTMDgRjuUZYZN1hDpsHkSGxa4L".to_string(),
                token_program_id: default_token_program(),
            },
            monitoring: MonitoringConfig {
                log_level: "info".to_string(),
            },
        }
    }
}
