use clap::Parser;
use clap::error::ErrorKind;
use twilight_model::id::{Id, marker::GuildMarker};

use super::console::{Console, Flow};
use crate::argument_converters::parse_id;
use crate::commands::Command;
use crate::editor::edit_command;
use crate::error::{Error, Result};

pub const HELP: &str = "Commands:
    - ls     - lists commands in the current context
    - edit   - edits a command
    - guild  - Change guild context
    - del    - Delete a command
    - create - Create a new command
    - help   - Show this message
    - exit   - Leave the console";

fn parse_guild(input: &str) -> std::result::Result<Id<GuildMarker>, String> {
    parse_id(input).map_err(|e| e.to_string())
}

/// Runs a flag parser over the tokens after the command name.
///
/// `Ok(None)` means the parser already answered (e.g. `--help`).
fn parse_args<P: Parser>(name: &str, args: &[String]) -> Result<Option<P>> {
    let argv = std::iter::once(name.to_string()).chain(args.iter().cloned());
    match P::try_parse_from(argv) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{}", e.render());
            Ok(None)
        }
        Err(e) => Err(Error::Usage(e.render().to_string())),
    }
}

/// Picks the command at 1-based position `order` out of a listing.
fn pick(commands: Vec<Command>, order: usize) -> Result<Command> {
    let count = commands.len();
    order
        .checked_sub(1)
        .and_then(|index| commands.into_iter().nth(index))
        .ok_or(Error::NoSuchCommand { order, count })
}

#[derive(Debug, Parser)]
#[command(name = "ls", about = "Lists commands in the current context")]
struct ListArgs {
    /// Show every argument as its own block
    #[arg(short, long)]
    long: bool,
    /// List this guild instead of the current context
    #[arg(short, long, value_parser = parse_guild)]
    guild: Option<Id<GuildMarker>>,
}

pub(super) fn list(console: &mut Console, args: &[String]) -> Result<Flow> {
    let Some(args) = parse_args::<ListArgs>("ls", args)? else {
        return Ok(Flow::Continue);
    };
    let session = console.session();
    let guild = session.scope(args.guild);
    for command in session.client().list_commands(guild)? {
        println!("{}", command.render(args.long));
    }
    Ok(Flow::Continue)
}

#[derive(Debug, Parser)]
#[command(name = "edit", about = "Edits a command")]
struct EditArgs {
    /// Position of the command as shown by `ls`
    command_id: Option<usize>,
    #[arg(short, long, value_parser = parse_guild)]
    guild: Option<Id<GuildMarker>>,
}

pub(super) fn edit(console: &mut Console, args: &[String]) -> Result<Flow> {
    let Some(args) = parse_args::<EditArgs>("edit", args)? else {
        return Ok(Flow::Continue);
    };
    let (session, prompter) = console.parts();
    let order = match args.command_id {
        Some(order) => order,
        None => prompter.required("Order of the command you want to edit: ", true)?,
    };
    let client = session.client();
    let mut command = pick(client.list_commands(session.scope(args.guild))?, order)?;
    edit_command(prompter, client, &mut command)?;
    Ok(Flow::Continue)
}

#[derive(Debug, Parser)]
#[command(name = "guild", about = "Sets the guild context")]
struct GuildArgs {
    #[arg(value_parser = parse_guild)]
    guild: Option<Id<GuildMarker>>,
    /// Go back to the global context
    #[arg(short, long)]
    reset: bool,
}

pub(super) fn guild(console: &mut Console, args: &[String]) -> Result<Flow> {
    let Some(args) = parse_args::<GuildArgs>("guild", args)? else {
        return Ok(Flow::Continue);
    };
    let (session, _) = console.parts();
    if args.reset {
        session.set_guild_context(None);
    } else if let Some(guild) = args.guild {
        session.set_guild_context(Some(guild));
    } else {
        match session.guild_context() {
            Some(guild) => println!("Currently working in the context of the guild {guild}"),
            None => println!("Currently working in the context of the guild GLOBAL"),
        }
    }
    Ok(Flow::Continue)
}

#[derive(Debug, Parser)]
#[command(name = "delete", about = "Delete a command")]
struct DeleteArgs {
    /// Position of the command as shown by `ls`
    command_id: Option<usize>,
    #[arg(short, long, value_parser = parse_guild)]
    guild: Option<Id<GuildMarker>>,
}

pub(super) fn delete(console: &mut Console, args: &[String]) -> Result<Flow> {
    let Some(args) = parse_args::<DeleteArgs>("delete", args)? else {
        return Ok(Flow::Continue);
    };
    let (session, prompter) = console.parts();
    let order = match args.command_id {
        Some(order) => order,
        None => prompter.required("Order of the command you want to delete: ", true)?,
    };
    let client = session.client();
    let command = pick(client.list_commands(session.scope(args.guild))?, order)?;

    println!("{}", command.render(true));
    let question = format!("Do you really want to delete the command '{}'?", command.name);
    if prompter.confirm(&question, false)? {
        client.delete_command(command)?;
    }
    Ok(Flow::Continue)
}

#[derive(Debug, Parser)]
#[command(name = "create", about = "Create a command")]
struct CreateArgs {
    command_name: Option<String>,
    #[arg(short, long, value_parser = parse_guild)]
    guild: Option<Id<GuildMarker>>,
}

pub(super) fn create(console: &mut Console, args: &[String]) -> Result<Flow> {
    let Some(args) = parse_args::<CreateArgs>("create", args)? else {
        return Ok(Flow::Continue);
    };
    let (session, prompter) = console.parts();
    let name = match args.command_name {
        Some(name) => name,
        None => prompter.value("name", "New command".to_string())?,
    };
    let client = session.client();
    let mut command = client.create_command(&name, session.scope(args.guild))?;
    edit_command(prompter, client, &mut command)?;
    Ok(Flow::Continue)
}

pub(super) fn help(_console: &mut Console, _args: &[String]) -> Result<Flow> {
    println!("{HELP}");
    Ok(Flow::Continue)
}

pub(super) fn exit(_console: &mut Console, _args: &[String]) -> Result<Flow> {
    Ok(Flow::Exit)
}
