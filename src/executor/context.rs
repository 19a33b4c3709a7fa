use twilight_model::id::{Id, marker::GuildMarker};

use crate::client::Client;

/// State shared by every console command: the API client and the guild
/// the operator is currently working in.
pub struct Session {
    client: Client,
    guild_context: Option<Id<GuildMarker>>,
}

impl Session {
    pub fn new(client: Client, guild_context: Option<Id<GuildMarker>>) -> Self {
        Session {
            client,
            guild_context,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// `None` means global.
    pub fn guild_context(&self) -> Option<Id<GuildMarker>> {
        self.guild_context
    }

    pub fn set_guild_context(&mut self, guild: Option<Id<GuildMarker>>) {
        match guild {
            Some(guild) => log::info!("Switched to guild {guild}"),
            None => log::info!("Switched to global context"),
        }
        self.guild_context = guild;
    }

    /// The scope for one call: an explicit `--guild` wins over the context.
    pub fn scope(&self, guild: Option<Id<GuildMarker>>) -> Option<Id<GuildMarker>> {
        guild.or(self.guild_context)
    }

    /// `555> ` inside a guild, `global> ` otherwise.
    pub fn prompt(&self) -> String {
        match self.guild_context {
            Some(guild) => format!("{guild}> "),
            None => "global> ".to_string(),
        }
    }
}
