use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use twilight_model::id::{
    Id,
    marker::{CommandMarker, GuildMarker},
};

use crate::arguments::{
    CommandOption, NO_DESCRIPTION, OptionContainer, OptionPayload, WireOption, report_unknown,
};
use crate::error::Result;

/// A slash command as registered with Discord, global or guild-scoped.
#[derive(Debug, Clone)]
pub struct Command {
    /// 1-based position in the listing it came from. Display only.
    pub order: usize,
    pub id: Id<CommandMarker>,
    /// Cannot be changed once the command exists.
    pub name: String,
    pub description: String,
    /// `None` for global commands.
    pub guild: Option<Id<GuildMarker>>,
    pub default_permission: bool,
    pub version: Option<String>,
    /// 1 chat input, 2 user, 3 message. Missing means chat input.
    pub kind: Option<u8>,
    pub options: Vec<CommandOption>,
}

/// The body sent when a command is first created.
#[derive(Debug, Serialize)]
pub struct NewCommand<'a> {
    pub name: &'a str,
    pub description: &'a str,
}

impl<'a> NewCommand<'a> {
    pub fn new(name: &'a str) -> Self {
        NewCommand {
            name,
            description: NO_DESCRIPTION,
        }
    }
}

/// The fields Discord accepts when creating or overwriting a command.
#[derive(Debug, Serialize)]
pub struct WireCommand<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub default_permission: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<WireOption<'a>>,
}

#[derive(Debug, Deserialize)]
struct CommandPayload {
    id: Id<CommandMarker>,
    #[serde(default, rename = "application_id")]
    _application_id: Option<IgnoredAny>,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    options: Vec<OptionPayload>,
    #[serde(default)]
    guild_id: Option<Id<GuildMarker>>,
    #[serde(default = "default_permission")]
    default_permission: bool,
    #[serde(default)]
    version: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<u8>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

fn default_permission() -> bool {
    true
}

impl Command {
    /// Builds a command from a JSON object returned by the API.
    ///
    /// Fields the console does not know about are logged and dropped.
    pub fn from_payload(order: usize, payload: Value) -> Result<Self> {
        let payload: CommandPayload = serde_json::from_value(payload)?;
        report_unknown(&payload.name, &payload.extra);

        let options = payload
            .options
            .into_iter()
            .enumerate()
            .map(|(i, option)| CommandOption::from_payload(i + 1, option, &payload.name))
            .collect::<Result<Vec<_>>>()?;

        Ok(Command {
            order,
            id: payload.id,
            name: payload.name,
            description: payload.description,
            guild: payload.guild_id,
            default_permission: payload.default_permission,
            version: payload.version,
            kind: payload.kind,
            options,
        })
    }

    /// Human readable description.
    ///
    /// The compact form lists options inline after the name; the long form
    /// renders each option as its own block.
    pub fn render(&self, long: bool) -> String {
        let mut options = String::new();
        if !long {
            options = self
                .options
                .iter()
                .map(CommandOption::short_name)
                .collect::<Vec<_>>()
                .join(" ");
            if !options.is_empty() {
                options.insert(0, ' ');
            }
        }

        let mut ret = format!(
            "{}. {} {}Command '{}{}'\n",
            self.order,
            if self.guild.is_some() {
                "Guild-only"
            } else {
                "Global"
            },
            self.kind_label(),
            self.name,
            options
        );
        if long {
            ret += &format!("   Id: {}", self.id);
            if let Some(version) = &self.version {
                ret += &format!(" (version {version})");
            }
            ret.push('\n');
        }
        if self.description != NO_DESCRIPTION {
            ret += &format!("   Description: {}\n", self.description);
        }
        if long && !self.options.is_empty() {
            ret += "   Arguments: \n";
            for option in &self.options {
                ret += &option.render(6);
            }
        }
        ret
    }

    fn kind_label(&self) -> &'static str {
        match self.kind {
            Some(2) => "User ",
            Some(3) => "Message ",
            _ => "",
        }
    }

    pub fn to_wire(&self) -> WireCommand<'_> {
        WireCommand {
            name: &self.name,
            description: &self.description,
            default_permission: self.default_permission,
            options: self.options.iter().map(CommandOption::to_wire).collect(),
        }
    }
}

/// Rewrites `order` so the listing is numbered 1..N again.
pub fn renumber(commands: &mut [Command]) {
    for (i, command) in commands.iter_mut().enumerate() {
        command.order = i + 1;
    }
}

impl OptionContainer for Command {
    fn container_name(&self) -> &str {
        &self.name
    }

    fn options_mut(&mut self) -> &mut Vec<CommandOption> {
        &mut self.options
    }
}

// Identity is the remote id; ordering is the listing position.
impl PartialEq for Command {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Command {}

impl Hash for Command {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Command {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.order.cmp(&other.order))
    }
}
