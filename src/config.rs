// ⚙️ Server configuration - flags with environment fallbacks

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "receipt-server", version, about = "Receipt points HTTP service")]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "RECEIPTS_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "RECEIPTS_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Log filter used when RUST_LOG is not set (e.g. "info", "receipt_points=debug")
    #[arg(long, env = "RECEIPTS_LOG", default_value = "info")]
    pub log_level: String,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
