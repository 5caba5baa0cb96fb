use clap::Parser;

/// IPL chase win-probability service
#[derive(Parser, Debug, Clone)]
#[command(name = "ipl-win-predictor", version, about)]
pub struct Config {
    /// Path to the JSON model artifact exported by the training pipeline
    #[arg(long, env = "MODEL_PATH", default_value = "model/pipe.json")]
    pub model_path: String,

    /// HTTP listen address for the predictor page and API
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    pub listen_addr: String,

    /// Accept the same franchise as batting and bowling side (off by
    /// default; restores the historical permissive behaviour)
    #[arg(long, env = "ALLOW_SAME_TEAM", default_value = "false")]
    pub allow_same_team: bool,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.model_path.trim().is_empty() {
            anyhow::bail!("model_path must not be empty");
        }
        if self.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            anyhow::bail!(
                "listen_addr must be a host:port address, got '{}'",
                self.listen_addr
            );
        }
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
