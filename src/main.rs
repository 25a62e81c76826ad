use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::io;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ngc_access_check::config::{
    Config, DEFAULT_INFERENCE_URL, DEFAULT_MODEL, DEFAULT_REGISTRY_URL, DEFAULT_TIMEOUT_SECS,
};
use ngc_access_check::Session;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Base URL of the inference API
    #[arg(long, global = true, default_value = DEFAULT_INFERENCE_URL)]
    inference_url: String,
    /// Base URL of the container registry
    #[arg(long, global = true, default_value = DEFAULT_REGISTRY_URL)]
    registry_url: String,
    /// Model used for the inference check
    #[arg(long, global = true, default_value = DEFAULT_MODEL)]
    model: String,
    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive menu (default)
    Menu,
    /// Validate an API key against the inference API
    #[command(visible_alias = "i")]
    Inference,
    /// Test whether an API key can pull a container image
    #[command(visible_alias = "c")]
    Container {
        /// Image to check (e.g., nvcr.io/nvidia/tensorrt:24.03-py3), prompted if omitted
        image: Option<String>,
    },
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            inference_url: self.inference_url.clone(),
            registry_url: self.registry_url.clone(),
            model: self.model.clone(),
            timeout: Duration::from_secs(self.timeout),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr so they stay out of the menu
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.config();
    let http_client = config.http_client()?;
    let mut session = Session::new(io::stdin().lock(), io::stdout(), http_client, config);

    let succeeded = match cli.command {
        None | Some(Commands::Menu) => return session.run().await,
        Some(Commands::Inference) => session.validate_key().await?,
        Some(Commands::Container { image }) => session.test_container(image).await?,
    };

    match succeeded {
        Some(true) => Ok(()),
        Some(false) => bail!("Access check failed"),
        None => bail!("No API key or container given"),
    }
}
