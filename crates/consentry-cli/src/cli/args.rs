use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "consentry",
    version,
    about = "Inspect and change user consent through a consent-management platform"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Tenant config file (YAML). Without it the CONSENTRY_* variables are used.
    #[arg(long, global = true, env = "CONSENTRY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Platform state file, loaded before and saved after the command
    #[arg(long, global = true, env = "CONSENTRY_STATE")]
    pub state: Option<PathBuf>,

    /// Run without a consent platform
    #[arg(long, global = true)]
    pub offline: bool,

    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the consent platform
    Init,
    /// Show consent state and per-purpose preferences
    Status,
    /// Show whether the consent banner is still owed
    Required,
    /// Show the raw platform status for one category code
    Category(CategoryArgs),
    /// Record a consent decision
    Update(UpdateArgs),
    /// Forget the stored consent decision
    Reset(ResetArgs),
    /// Show the consent banner
    Banner,
    /// Show the preference center
    PreferenceCenter,
    /// Print the effective configuration
    Config,
}

impl Command {
    /// Commands that only read consent state.
    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::Status | Self::Required | Self::Category(_))
    }
}

#[derive(Args, Debug, Clone)]
pub struct CategoryArgs {
    /// Platform category code, e.g. C0002
    pub code: String,
}

#[derive(Args, Debug, Clone)]
pub struct UpdateArgs {
    #[arg(long, action = ArgAction::Set)]
    pub analytics: bool,

    #[arg(long, action = ArgAction::Set)]
    pub marketing: bool,

    #[arg(long, action = ArgAction::Set)]
    pub preferences: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ResetArgs {
    /// Confirm that stored consent should be cleared
    #[arg(long)]
    pub yes: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_requires_explicit_values() {
        let cli = Cli::try_parse_from([
            "consentry",
            "update",
            "--analytics",
            "true",
            "--marketing",
            "false",
            "--preferences",
            "true",
        ])
        .unwrap();
        match cli.cmd {
            Command::Update(args) => {
                assert!(args.analytics);
                assert!(!args.marketing);
                assert!(args.preferences);
            }
            other => panic!("unexpected command: {other:?}"),
        }

        assert!(Cli::try_parse_from(["consentry", "update", "--analytics", "true"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["consentry", "status", "--offline", "--format", "json"])
            .unwrap();
        assert!(cli.global.offline);
        assert_eq!(cli.global.format, OutputFormat::Json);
    }
}
