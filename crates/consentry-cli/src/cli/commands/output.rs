use consentry_core::{ConsentClient, ConsentError, ConsentStatus, Purpose, ReadOutcome};
use serde::Serialize;

use crate::cli::args::OutputFormat;
use crate::exit_codes;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub platform: &'static str,
    pub domain_id: String,
    pub region: String,
    pub language: String,
    pub initialized: bool,
    #[serde(flatten)]
    pub status: ConsentStatus,
    pub degraded: Option<String>,
}

impl StatusReport {
    pub fn new(client: &ConsentClient, outcome: ReadOutcome<ConsentStatus>) -> Self {
        let config = client.config();
        let degraded = degraded_reason(&outcome);
        Self {
            platform: client.platform_name(),
            domain_id: config.domain_id.clone(),
            region: config.region.clone(),
            language: config.language.clone(),
            initialized: client.is_initialized(),
            status: outcome.into_value(),
            degraded,
        }
    }

    pub fn print_text(&self) {
        let prefs = &self.status.consent_preferences;
        println!("platform:     {}", self.platform);
        println!(
            "domain:       {} (region {}, language {})",
            self.domain_id, self.region, self.language
        );
        println!("initialized:  {}", yes_no(self.initialized));
        println!("has consent:  {}", yes_no(self.status.has_consent));
        for purpose in Purpose::ALL {
            println!("  {:<12} {}", purpose.as_str(), granted(prefs.get(purpose)));
        }
        if let Some(reason) = &self.degraded {
            println!("degraded:     {reason}");
        }
    }
}

pub fn degraded_reason<T>(outcome: &ReadOutcome<T>) -> Option<String> {
    outcome.cause().map(ToString::to_string)
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn render_status(client: &ConsentClient, format: OutputFormat) -> anyhow::Result<()> {
    let report = StatusReport::new(client, client.consent_status().await);
    match format {
        OutputFormat::Text => report.print_text(),
        OutputFormat::Json => print_json(&report)?,
    }
    Ok(())
}

/// Print a lifecycle or write error and return its exit code.
pub fn report_error(err: &ConsentError) -> i32 {
    eprintln!("error: {err}");
    exit_codes::for_consent_error(err)
}

pub fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn granted(value: bool) -> &'static str {
    if value {
        "granted"
    } else {
        "denied"
    }
}
