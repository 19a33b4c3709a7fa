use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use slashctl::client::Client;
use slashctl::config::load_config;
use slashctl::executor::{Console, Session};
use slashctl::input::{InterruptFlag, default_reader};
use slashctl::prompt::Prompter;

#[derive(Debug, Parser)]
#[command(name = "slashctl", version, about = "Manage Discord application commands")]
struct Cli {
    /// JSON file with client_id, bot_token and guild_context
    #[arg(short, long = "configfile")]
    configfile: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = load_config(cli.configfile.as_deref()).context("loading configuration")?;

    let interrupt = InterruptFlag::install().context("installing the interrupt handler")?;
    let mut prompter = Prompter::new(default_reader(interrupt.clone())).with_interrupt(interrupt);
    let credentials = match config.credentials(&mut prompter) {
        Ok(credentials) => credentials,
        Err(slashctl::Error::Interrupted | slashctl::Error::EndOfInput) => {
            println!();
            return Ok(());
        }
        Err(e) => return Err(e).context("reading credentials"),
    };
    log::info!("Managing commands of application {}", credentials.application);

    let client = Client::new(credentials.application, &credentials.token);
    let session = Session::new(client, config.guild_context);
    Console::new(session, prompter).run()?;
    Ok(())
}
