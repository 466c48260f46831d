use consentry_core::ConsentPreferences;
use serde::Serialize;

use super::output::{print_json, report_error, StatusReport};
use super::session::Session;
use crate::cli::args::{OutputFormat, UpdateArgs};
use crate::exit_codes;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateReport {
    interaction: consentry_core::InteractionType,
    interaction_type: i32,
    status: StatusReport,
}

pub async fn run(session: &Session, args: UpdateArgs, format: OutputFormat) -> anyhow::Result<i32> {
    let client = &session.client;
    if let Err(e) = client.initialize().await {
        return Ok(report_error(&e));
    }

    let preferences = ConsentPreferences::new(args.analytics, args.marketing, args.preferences);
    let interaction = match client.update_consent_preferences(&preferences).await {
        Ok(interaction) => interaction,
        Err(e) => return Ok(report_error(&e)),
    };

    let status = StatusReport::new(client, client.consent_status().await);
    match format {
        OutputFormat::Text => {
            println!("saved: {interaction}");
            status.print_text();
        }
        OutputFormat::Json => print_json(&UpdateReport {
            interaction,
            interaction_type: interaction.code(),
            status,
        })?,
    }
    Ok(exit_codes::SUCCESS)
}
