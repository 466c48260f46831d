use serde_json::json;

use super::output::{print_json, report_error};
use super::session::Session;
use crate::cli::args::OutputFormat;
use crate::exit_codes;

pub async fn init(session: &Session, format: OutputFormat) -> anyhow::Result<i32> {
    if let Err(e) = session.client.initialize().await {
        return Ok(report_error(&e));
    }

    let platform = session.client.platform_name();
    match format {
        OutputFormat::Text => println!("initialized ({platform})"),
        OutputFormat::Json => print_json(&json!({ "initialized": true, "platform": platform }))?,
    }
    Ok(exit_codes::SUCCESS)
}

pub async fn banner(session: &Session, format: OutputFormat) -> anyhow::Result<i32> {
    if let Err(e) = session.client.initialize().await {
        return Ok(report_error(&e));
    }
    session.client.show_consent_banner().await;
    acknowledge("banner", format)?;
    Ok(exit_codes::SUCCESS)
}

pub async fn preference_center(session: &Session, format: OutputFormat) -> anyhow::Result<i32> {
    if let Err(e) = session.client.initialize().await {
        return Ok(report_error(&e));
    }
    session.client.show_consent_preferences().await;
    acknowledge("preference_center", format)?;
    Ok(exit_codes::SUCCESS)
}

// Display is fire-and-forget; only the request is reported.
fn acknowledge(surface: &str, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => println!("{surface} requested"),
        OutputFormat::Json => print_json(&json!({ "requested": surface }))?,
    }
    Ok(())
}
