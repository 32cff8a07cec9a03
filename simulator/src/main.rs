use anyhow::Context;
use clap::Parser;
use commonware_runtime::{tokio as runtime, Runner};
use hotline_simulator::{Api, Config, Simulator};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long)]
    port: Option<u16>,

    #[arg(short, long)]
    seed: Option<u64>,
}

impl Args {
    /// Load the config file (if any) and apply command-line overrides.
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(port) = self.port {
            config.port = port;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    // Parse args
    let args = Args::parse();

    // Load config
    let config = args.config()?;

    // Create logger
    let level = config.level()?;
    if config.json_logs {
        tracing_subscriber::fmt().json().with_max_level(level).init();
    } else {
        tracing_subscriber::fmt().with_max_level(level).init();
    }

    let seed = config.seed.unwrap_or_else(rand::random);
    let executor = runtime::Runner::new(runtime::Config::default());
    executor.start(|context| async move {
        let simulator = Arc::new(Simulator::new(
            context,
            seed,
            config.viewport_width,
            config.schedule(),
        ));
        let app = Api::new(simulator).router();

        // Start server
        let addr = format!("0.0.0.0:{}", config.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        info!(seed, "Listening on {}", addr);
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .context("axum server error")?;

        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_flags() {
        let args = Args::parse_from(["hotline-simulator"]);
        assert_eq!(args.config().unwrap(), Config::default());
    }

    #[test]
    fn test_flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port: 7000\nseed: 9\nviewport_width: 600").unwrap();
        let path = file.path().to_str().unwrap();

        let args = Args::parse_from(["hotline-simulator", "--config", path, "--port", "9001"]);
        let config = args.config().unwrap();
        assert_eq!(config.port, 9001);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.viewport_width, 600);

        let args = Args::parse_from(["hotline-simulator", "-c", path, "-s", "77"]);
        let config = args.config().unwrap();
        assert_eq!(config.port, 7000);
        assert_eq!(config.seed, Some(77));
    }
}
