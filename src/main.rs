use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use agentdesk::api::DeskCoreBuilder;
use agentdesk::config::{Config, Settings};
use agentdesk::web::{auth, WebServer};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Config::parse_args();

    // Setup logging
    setup_logging(cli.debug);

    // Load settings (file < env < CLI)
    let mut settings = Settings::load(cli.config.as_ref())?;
    settings.merge_env();
    settings.merge_cli(&cli);
    settings.validate();

    let token = match settings.web.token.clone() {
        Some(token) => token,
        None => {
            let token = auth::generate_token();
            tracing::info!("Generated API token: {}", token);
            token
        }
    };

    let core = DeskCoreBuilder::new(settings).open()?;
    WebServer::new(Arc::new(core), token).run().await
}

fn setup_logging(debug: bool) {
    let default_filter = if debug {
        "agentdesk=debug,agentdesk_core=debug"
    } else {
        "agentdesk=info,agentdesk_core=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
