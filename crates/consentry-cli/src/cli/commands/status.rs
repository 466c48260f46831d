use consentry_core::Purpose;
use serde::Serialize;

use super::output::{degraded_reason, print_json, render_status, yes_no};
use super::session::Session;
use crate::cli::args::{CategoryArgs, OutputFormat};
use crate::exit_codes;

pub async fn status(session: &Session, format: OutputFormat) -> anyhow::Result<i32> {
    session.start_tolerant().await;
    render_status(&session.client, format).await?;
    Ok(exit_codes::SUCCESS)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RequiredReport {
    consent_required: bool,
    degraded: Option<String>,
}

pub async fn required(session: &Session, format: OutputFormat) -> anyhow::Result<i32> {
    session.start_tolerant().await;
    let outcome = session.client.is_consent_required().await;
    let report = RequiredReport {
        degraded: degraded_reason(&outcome),
        consent_required: outcome.into_value(),
    };

    match format {
        OutputFormat::Text => {
            println!("consent required: {}", yes_no(report.consent_required));
            if let Some(reason) = &report.degraded {
                println!("degraded: {reason}");
            }
        }
        OutputFormat::Json => print_json(&report)?,
    }
    Ok(exit_codes::SUCCESS)
}

#[derive(Serialize)]
struct CategoryReport {
    category: String,
    purpose: Option<Purpose>,
    status: i32,
    degraded: Option<String>,
}

/// The client initializes on demand here, so no explicit start.
pub async fn category(
    session: &Session,
    args: CategoryArgs,
    format: OutputFormat,
) -> anyhow::Result<i32> {
    let outcome = session.client.consent_status_for_category(&args.code).await;
    let report = CategoryReport {
        degraded: degraded_reason(&outcome),
        status: outcome.into_value(),
        purpose: session.client.config().categories.purpose(&args.code),
        category: args.code,
    };

    match format {
        OutputFormat::Text => {
            match report.purpose {
                Some(purpose) => println!("{} ({purpose}): {}", report.category, report.status),
                None => println!("{}: {}", report.category, report.status),
            }
            if let Some(reason) = &report.degraded {
                println!("degraded: {reason}");
            }
        }
        OutputFormat::Json => print_json(&report)?,
    }
    Ok(exit_codes::SUCCESS)
}
