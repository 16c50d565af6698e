use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

use warlog::cli::{Cli, Command};
use warlog::config::ConfigError;

fn main() -> ExitCode {
    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            exit_code(&err)
        }
    }
}

fn try_main() -> anyhow::Result<()> {
    warlog::logging::init().context("init logging")?;
    warlog::config::load_dotenv();

    let cli = Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        Command::Update(args) => warlog::update::run(args).context("update")?,
        Command::Apply(args) => warlog::apply::run(args).context("apply")?,
        Command::Status(args) => warlog::status::run(args).context("status")?,
    }

    Ok(())
}

fn exit_code(err: &anyhow::Error) -> ExitCode {
    if err.chain().any(|cause| cause.is::<ConfigError>()) {
        ExitCode::from(2)
    } else {
        ExitCode::FAILURE
    }
}
