use airdrop_core::ChainDescriptor;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub rpc: RpcConfig,
    pub eligibility: EligibilityConfig,
    pub portfolio: PortfolioConfig,
    /// Extra or replacement chain descriptors on top of the builtin table
    #[serde(default)]
    pub chains: Vec<ChainDescriptor>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RpcConfig {
    /// Per-attempt budget for one endpoint
    pub timeout_ms: u64,
    #[serde(default)]
    pub alchemy_api_key: Option<String>,
    pub fetch_block_height: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EligibilityConfig {
    pub timeout_ms: u64,
    /// Chain whose nonce drives the activity profile and predictions
    pub primary_chain_id: u64,
    pub expiring_window_days: i64,
    /// Mix labeled demo records into responses
    pub demo_mode: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PortfolioConfig {
    pub enabled: bool,
    pub api_url: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("rpc.timeout_ms", 5000)?
            .set_default("rpc.alchemy_api_key", "")?
            .set_default("rpc.fetch_block_height", true)?
            .set_default("eligibility.timeout_ms", 10000)?
            .set_default("eligibility.primary_chain_id", 1)?
            .set_default("eligibility.expiring_window_days", 7)?
            .set_default("eligibility.demo_mode", false)?
            .set_default("portfolio.enabled", false)?
            .set_default("portfolio.api_url", "https://api.debank.com/user/addr")?
            // Load from config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Override with environment variables (AIRDROP__RPC__ALCHEMY_API_KEY, etc.)
            .add_source(
                Environment::with_prefix("AIRDROP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// The metered key, if one is actually set.
    pub fn alchemy_api_key(&self) -> Option<String> {
        self.rpc
            .alchemy_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(String::from)
    }
}

#[cfg(test)]
impl AppConfig {
    /// Defaults without touching files or the environment.
    pub fn for_tests() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            rpc: RpcConfig {
                timeout_ms: 500,
                alchemy_api_key: None,
                fetch_block_height: false,
            },
            eligibility: EligibilityConfig {
                timeout_ms: 500,
                primary_chain_id: 1,
                expiring_window_days: 7,
                demo_mode: false,
            },
            portfolio: PortfolioConfig {
                enabled: false,
                api_url: "http://127.0.0.1:9/user/addr".to_string(),
            },
            chains: vec![],
        }
    }
}
