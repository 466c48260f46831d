use super::output::{render_status, report_error};
use super::session::Session;
use crate::cli::args::{OutputFormat, ResetArgs};
use crate::exit_codes;

pub async fn run(session: &Session, args: ResetArgs, format: OutputFormat) -> anyhow::Result<i32> {
    if !args.yes {
        eprintln!("refusing to clear stored consent without --yes");
        return Ok(exit_codes::INTERNAL_ERROR);
    }

    // Without a platform the reset itself is a no-op, not a startup failure.
    let client = &session.client;
    if client.is_available() {
        if let Err(e) = client.initialize().await {
            return Ok(report_error(&e));
        }
    }
    if let Err(e) = client.reset_consent().await {
        return Ok(report_error(&e));
    }

    if format == OutputFormat::Text {
        if client.is_available() {
            println!("consent reset");
        } else {
            println!("consent platform not available, nothing to reset");
        }
    }
    render_status(client, format).await?;
    Ok(exit_codes::SUCCESS)
}
