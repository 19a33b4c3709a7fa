use std::fmt;
use std::time::Duration;

use serde_json::Value;
use twilight_model::id::{
    Id,
    marker::{ApplicationMarker, CommandMarker, GuildMarker},
};

use crate::commands::{Command, NewCommand};
use crate::error::{Error, Result};

pub const API_BASE: &str = "https://discord.com/api/v8";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        })
    }
}

/// Status and body of a finished request, successful or not.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a request and returns whatever the server answered.
///
/// Only failures to get an answer at all are errors.
pub trait Transport {
    fn send(&self, method: Method, url: &str, body: Option<&Value>) -> Result<Response>;
}

/// [`Transport`] over a single `ureq` agent carrying the bot token.
pub struct HttpTransport {
    agent: ureq::Agent,
    authorization: String,
}

impl HttpTransport {
    pub fn new(token: &str) -> Self {
        HttpTransport {
            agent: ureq::AgentBuilder::new()
                .timeout(Duration::from_secs(30))
                .build(),
            authorization: format!("Bot {token}"),
        }
    }
}

impl Transport for HttpTransport {
    fn send(&self, method: Method, url: &str, body: Option<&Value>) -> Result<Response> {
        let request = match method {
            Method::Get => self.agent.get(url),
            Method::Post => self.agent.post(url),
            Method::Delete => self.agent.delete(url),
        }
        .set("Authorization", &self.authorization);

        let result = match body {
            Some(body) => request.send_json(body),
            None => request.call(),
        };
        let response = match result {
            Ok(response) => response,
            Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(t)) => return Err(Error::Transport(t.to_string())),
        };
        let status = response.status();
        let body = response.into_string()?;
        Ok(Response { status, body })
    }
}

pub struct Client {
    transport: Box<dyn Transport>,
    base: String,
}

impl Client {
    /// Client for `application`, authenticated with a bot token.
    pub fn new(application: Id<ApplicationMarker>, token: &str) -> Self {
        Client::with_transport(
            format!("{API_BASE}/applications/{application}"),
            Box::new(HttpTransport::new(token)),
        )
    }

    /// `base` is the application URL, e.g. `.../applications/{id}`.
    pub fn with_transport(base: impl Into<String>, transport: Box<dyn Transport>) -> Self {
        Client {
            transport,
            base: base.into(),
        }
    }

    fn commands_url(&self, guild: Option<Id<GuildMarker>>) -> String {
        match guild {
            Some(guild) => format!("{}/guilds/{}/commands", self.base, guild),
            None => format!("{}/commands", self.base),
        }
    }

    fn command_url(&self, guild: Option<Id<GuildMarker>>, id: Id<CommandMarker>) -> String {
        format!("{}/{}", self.commands_url(guild), id)
    }

    fn send(&self, method: Method, url: &str, body: Option<&Value>) -> Result<Response> {
        log::debug!("{method} {url}");
        let response = self.transport.send(method, url, body)?;
        log::debug!("{method} {url} -> {}", response.status);
        Ok(response)
    }

    /// Commands of exactly one scope, numbered from `first_order`.
    fn list_scope(&self, guild: Option<Id<GuildMarker>>, first_order: usize) -> Result<Vec<Command>> {
        let response = self.send(Method::Get, &self.commands_url(guild), None)?;
        if response.status != 200 {
            return Err(Error::Http {
                status: response.status,
                body: response.body,
            });
        }
        let payloads: Vec<Value> = serde_json::from_str(&response.body)?;
        let mut commands = Vec::with_capacity(payloads.len());
        for (i, payload) in payloads.into_iter().enumerate() {
            let mut command = Command::from_payload(first_order + i, payload)?;
            if command.guild.is_none() {
                command.guild = guild;
            }
            commands.push(command);
        }
        Ok(commands)
    }

    /// Lists the commands visible in a scope.
    ///
    /// In a guild, the global commands come first because they can be used
    /// there too; guild commands are numbered after them. A scope the server
    /// refuses to list is reported and skipped.
    pub fn list_commands(&self, guild: Option<Id<GuildMarker>>) -> Result<Vec<Command>> {
        let mut scopes = vec![None];
        if guild.is_some() {
            scopes.push(guild);
        }

        let mut commands: Vec<Command> = Vec::new();
        for scope in scopes {
            match self.list_scope(scope, commands.len() + 1) {
                Ok(listed) => {
                    for command in listed {
                        if !commands.contains(&command) {
                            commands.push(command);
                        }
                    }
                }
                Err(Error::Http { status, body }) => {
                    println!("Error retrieving commands! Code: {status} Reason: {body}");
                }
                Err(e) => return Err(e),
            }
        }
        crate::commands::renumber(&mut commands);
        Ok(commands)
    }

    /// POSTs a body to the commands endpoint of a scope.
    fn post(&self, guild: Option<Id<GuildMarker>>, body: &Value) -> Result<Value> {
        let response = self.send(Method::Post, &self.commands_url(guild), Some(body))?;
        if !response.is_success() {
            return Err(Error::Http {
                status: response.status,
                body: response.body,
            });
        }
        Ok(serde_json::from_str(&response.body)?)
    }

    /// Registers a new command with a placeholder description.
    pub fn create_command(&self, name: &str, guild: Option<Id<GuildMarker>>) -> Result<Command> {
        let order = self.list_commands(guild)?.len() + 1;
        let body = serde_json::to_value(NewCommand::new(name))?;
        let mut command = Command::from_payload(order, self.post(guild, &body)?)?;
        if command.guild.is_none() {
            command.guild = guild;
        }
        log::info!("Created command '{}' ({})", command.name, command.id);
        Ok(command)
    }

    /// Overwrites a command with its local state.
    ///
    /// Returns the server's view of the command, or `None` when the server
    /// refused the update; the refusal has already been printed.
    pub fn update_command(&self, command: &Command) -> Result<Option<Value>> {
        let body = serde_json::to_value(command.to_wire())?;
        match self.post(command.guild, &body) {
            Ok(saved) => {
                println!("Updated successfully!");
                Ok(Some(saved))
            }
            Err(Error::Http { status, body }) => {
                println!(
                    "Update failed! Your changes were not recorded. Code: {status} Reason: {body}"
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Deletes a command. Only a 204 counts as deleted.
    pub fn delete_command(&self, command: Command) -> Result<bool> {
        let url = self.command_url(command.guild, command.id);
        let response = self.send(Method::Delete, &url, None)?;
        if response.status != 204 {
            println!(
                "Delete failed! Code [{}]: {}",
                response.status, response.body
            );
            return Ok(false);
        }
        println!("Command '{}' deleted successfully.", command.name);
        Ok(true)
    }
}
