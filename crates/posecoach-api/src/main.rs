//! Pose Coach server binary.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use posecoach_api::ApiConfig;

#[derive(Parser, Debug)]
#[command(name = "posecoach", about = "Pose Coach exercise feedback server")]
struct Args {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the bind address
    #[arg(long, value_name = "ADDR")]
    bind: Option<SocketAddr>,

    /// Log dataset samples for clients that do not choose
    #[arg(long)]
    log_dataset: bool,

    /// Enable voice announcements
    #[arg(long)]
    voice: bool,
}

impl Args {
    fn apply(&self, config: &mut ApiConfig) {
        if let Some(bind) = self.bind {
            config.http.bind_addr = bind;
        }
        if self.log_dataset {
            config.dataset.enabled = true;
        }
        if self.voice {
            config.voice.enabled = true;
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = match ApiConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    args.apply(&mut config);

    match posecoach_api::serve(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from(["posecoach", "--bind", "127.0.0.1:9000", "--voice"]);
        let mut config = ApiConfig::default();
        args.apply(&mut config);
        assert_eq!(config.http.bind_addr.port(), 9000);
        assert!(config.voice.enabled);
        assert!(!config.dataset.enabled);
    }
}
