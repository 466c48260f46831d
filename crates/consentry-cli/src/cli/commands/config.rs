use super::output::print_json;
use super::session::resolve_config;
use crate::cli::args::{GlobalArgs, OutputFormat};
use crate::exit_codes;

pub fn run(global: &GlobalArgs) -> anyhow::Result<i32> {
    let config = resolve_config(global)?;
    match global.format {
        OutputFormat::Text => print!("{}", serde_yaml::to_string(&config)?),
        OutputFormat::Json => print_json(&config)?,
    }
    Ok(exit_codes::SUCCESS)
}
