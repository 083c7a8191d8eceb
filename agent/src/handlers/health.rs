//! Health check command handler
//!
//! Checks that Ollama and the proxy are reachable.

use anyhow::Result;

use super::CommandContext;
use crate::agent::proxy_endpoint;
use crate::llm::ServiceState;

/// Handle the `health` command
pub async fn run_health(ctx: &CommandContext) -> Result<()> {
    println!("=== Health Check ===\n");

    let mut checks_passed = 0;
    let checks_run = 2;

    // 1. Ollama, called directly
    print!("Ollama ({}): ", ctx.llm_url);
    let status = ctx.llm()?.check_service().await;
    let online = status.status == ServiceState::Online;
    println!("{} {}", mark(online), status.message);
    if online {
        checks_passed += 1;
    }

    // 2. Proxy server
    print!("Proxy ({}): ", ctx.proxy_url);
    let proxy_ok = check_proxy(&ctx.proxy_url).await;
    match &proxy_ok {
        Ok(()) => {
            println!("{} reachable", mark(true));
            checks_passed += 1;
        }
        Err(e) => println!("{} {}", mark(false), e),
    }

    println!("\n=== Summary ===");
    println!("Checks: {}/{} passed", checks_passed, checks_run);

    if checks_passed == checks_run {
        println!("\nAll health checks passed!");
        Ok(())
    } else {
        anyhow::bail!("Some health checks failed")
    }
}

fn mark(passed: bool) -> &'static str {
    if passed {
        "✓"
    } else {
        "✗"
    }
}

async fn check_proxy(proxy_url: &str) -> Result<()> {
    let url = proxy_endpoint(proxy_url, "/api/health")?;
    let client = reqwest::Client::builder()
        .timeout(crate::llm::REQUEST_TIMEOUT)
        .build()?;
    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        anyhow::bail!("HTTP {}", response.status());
    }
    Ok(())
}
