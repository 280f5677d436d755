use std::env;

/// Config holds all application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    /// Device configuration templates (`mktModelo.txt`, `fortigateMpls.conf`, ...)
    pub templates_dir: String,
    /// Backup-system snippet templates
    pub oxidized_templates_dir: String,
    /// Address-allocation table (`P/32  block/30  ASN` rows)
    pub ip_table_path: String,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn load() -> Self {
        Self {
            listen_addr: get_env("LISTEN_ADDR", "0.0.0.0:8080"),
            templates_dir: get_env("TEMPLATES_DIR", "data/ccs"),
            oxidized_templates_dir: get_env("OXIDIZED_TEMPLATES_DIR", "data/oxidized"),
            ip_table_path: get_env("IP_TABLE_PATH", "data/ip-table.txt"),
        }
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
