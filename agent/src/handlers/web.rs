//! Web command handler
//!
//! Start the proxy server.

use anyhow::Result;

use super::CommandContext;
use crate::web::{self, WebConfig};

/// Handle the `serve` command
pub async fn run_web(
    ctx: &CommandContext,
    port: Option<u16>,
    generate_url: Option<String>,
    model: Option<String>,
) -> Result<()> {
    let mut config = WebConfig::from_file_config(&ctx.file_config);
    config.llm_url = ctx.llm_url.clone();
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(url) = generate_url {
        config.generate_url = url;
    }
    if let Some(model) = model {
        config.model = model;
    }

    web::serve(config).await
}
