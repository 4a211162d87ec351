use counsel_config::Config;
use tracing::{info, warn};

use crate::environment::ConfigProvider;

pub async fn serve(config: Config) -> anyhow::Result<()> {
    if config.crm.api_token.is_empty() {
        warn!("No CRM api token configured, contact form submissions will fall back to email");
    }

    let server = ConfigProvider::new(&config)?.rest_server();

    info!(
        "Starting http server on {}:{}",
        config.http.host, config.http.port
    );
    server.serve(config.http.host, config.http.port).await
}
