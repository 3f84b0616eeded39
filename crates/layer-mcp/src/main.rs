mod flags;
mod handlers;
mod protocol;
mod server;

use anyhow::Context;
use layer_core::{ConfigFile, LayerApi, LayerConfig};
use tokio::io::BufReader;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Tracing to stderr only: stdout is the protocol channel
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let discovered = ConfigFile::discover();
    let (cli, overrides) =
        match flags::parse_args(flags::auth_flags_of(&discovered), std::env::args_os()) {
            Ok(parsed) => parsed,
            Err(e) => e.exit(),
        };
    let file_config = discovered?;

    let api_key = cli.api_key.or(file_config.api_key).context(
        "missing Layer API key: pass --api-key, set LAYER_API_KEY, or add apiKey to .layer/config.json",
    )?;
    let config = LayerConfig::builder(api_key)
        .environment(cli.environment.or(file_config.environment).unwrap_or_default())
        .base_url(cli.base_url.or(file_config.base_url))
        .timeout_secs(cli.timeout)
        .build()?;

    info!(
        environment = %config.environment,
        base_url = %config.base_url,
        overrides = overrides.len(),
        "server running on stdio"
    );

    let api = LayerApi::new(config, overrides)?;
    server::serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout(), api).await?;

    Ok(())
}
