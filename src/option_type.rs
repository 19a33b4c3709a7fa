use std::fmt;

use twilight_model::application::command::CommandOptionType;

use crate::error::{Error, Result};

const TYPES: [(CommandOptionType, &str); 8] = [
    (CommandOptionType::SubCommand, "subcommand"),
    (CommandOptionType::SubCommandGroup, "subcommand group"),
    (CommandOptionType::String, "string"),
    (CommandOptionType::Integer, "integer"),
    (CommandOptionType::Boolean, "boolean"),
    (CommandOptionType::User, "user"),
    (CommandOptionType::Channel, "channel"),
    (CommandOptionType::Role, "role"),
];

/// An option type that is guaranteed to be in the table. Discord numbers
/// option types from 1; only the first eight are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionType(CommandOptionType);

impl OptionType {
    pub const SUB_COMMAND: OptionType = OptionType(CommandOptionType::SubCommand);
    pub const SUB_COMMAND_GROUP: OptionType = OptionType(CommandOptionType::SubCommandGroup);
    pub const STRING: OptionType = OptionType(CommandOptionType::String);
    pub const INTEGER: OptionType = OptionType(CommandOptionType::Integer);

    /// Looks up a numeric type code.
    pub fn resolve(code: u8) -> Result<Self> {
        match code {
            1..=8 => Ok(OptionType(TYPES[usize::from(code) - 1].0)),
            _ => Err(Error::UnknownOptionType(code)),
        }
    }

    fn index(self) -> usize {
        TYPES
            .iter()
            .position(|(kind, _)| *kind == self.0)
            .unwrap_or_default()
    }

    /// The numeric code sent over the wire.
    pub fn code(self) -> u8 {
        // The table has eight entries, so this never truncates.
        self.index() as u8 + 1
    }

    /// Human readable name, e.g. `subcommand group`.
    pub fn name(self) -> &'static str {
        TYPES[self.index()].1
    }

    /// Subcommands and subcommand groups carry nested options instead of a value.
    pub fn is_group(self) -> bool {
        matches!(
            self.0,
            CommandOptionType::SubCommand | CommandOptionType::SubCommandGroup
        )
    }

    /// Only string and integer options can offer fixed choices.
    pub fn accepts_choices(self) -> bool {
        matches!(
            self.0,
            CommandOptionType::String | CommandOptionType::Integer
        )
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `1: subcommand, 2: subcommand group, ...` for display before a type prompt.
pub fn legend() -> String {
    TYPES
        .iter()
        .enumerate()
        .map(|(i, (_, name))| format!("{}: {}", i + 1, name))
        .collect::<Vec<_>>()
        .join(", ")
}
