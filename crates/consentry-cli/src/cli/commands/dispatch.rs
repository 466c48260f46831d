use super::super::args::*;
use super::session::Session;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    let format = cli.global.format;

    // Needs no platform and no state file.
    if let Command::Config = cli.cmd {
        return super::config::run(&cli.global);
    }

    let session = Session::open(&cli.global, cli.cmd.is_read_only()).await?;
    let code = match cli.cmd {
        Command::Init => super::lifecycle::init(&session, format).await?,
        Command::Status => super::status::status(&session, format).await?,
        Command::Required => super::status::required(&session, format).await?,
        Command::Category(args) => super::status::category(&session, args, format).await?,
        Command::Update(args) => super::update::run(&session, args, format).await?,
        Command::Reset(args) => super::reset::run(&session, args, format).await?,
        Command::Banner => super::lifecycle::banner(&session, format).await?,
        Command::PreferenceCenter => super::lifecycle::preference_center(&session, format).await?,
        Command::Config => super::config::run(&cli.global)?,
    };
    session.close().await?;
    Ok(code)
}
