use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use twilight_model::id::{
    Id,
    marker::{ApplicationMarker, GuildMarker},
};

use crate::argument_converters::parse_id;
use crate::error::{Error, Result};
use crate::prompt::Prompter;

/// Startup settings from an optional JSON file. Whatever is missing is
/// asked for on the terminal.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub client_id: Option<Id<ApplicationMarker>>,
    pub bot_token: Option<String>,
    pub guild_context: Option<Id<GuildMarker>>,
}

/// What the API client needs to authenticate.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub application: Id<ApplicationMarker>,
    pub token: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    client_id: Option<Value>,
    bot_token: Option<String>,
    guild_context: Option<Value>,
}

/// Loads the config file, or an empty config when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> Result<Config> {
    let raw: RawConfig = serde_json::from_str(contents)?;
    Ok(Config {
        client_id: id_field("client_id", raw.client_id.as_ref())?,
        bot_token: raw.bot_token.filter(|token| !token.is_empty()),
        guild_context: id_field("guild_context", raw.guild_context.as_ref())?,
    })
}

/// Reads an id given as a JSON number or string. `null` and `""` are unset.
fn id_field<T>(key: &str, value: Option<&Value>) -> Result<Option<Id<T>>> {
    let text = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(text)) if text.is_empty() => return Ok(None),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(other) => {
            return Err(Error::Config(format!("{key} must be an id, got {other}")));
        }
    };
    parse_id(&text)
        .map(Some)
        .map_err(|_| Error::Config(format!("{key} must be an id, got {text}")))
}

impl Config {
    /// Fills in the client id and token, asking for whichever is missing.
    pub fn credentials(&self, prompter: &mut Prompter) -> Result<Credentials> {
        let application = match self.client_id {
            Some(id) => id,
            None => prompter.required("Client ID: ", true)?,
        };
        let token = match &self.bot_token {
            Some(token) => token.clone(),
            None => prompter.required("Bot token: ", false)?,
        };
        Ok(Credentials { application, token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ScriptedReader;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn no_path_means_empty_config() {
        let config = load_config(None).unwrap();
        assert!(config.client_id.is_none());
        assert!(config.bot_token.is_none());
        assert!(config.guild_context.is_none());
    }

    #[test]
    fn loads_ids_as_numbers_or_strings() {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"client_id": 770000000000000001, "bot_token": "abc", "guild_context": "555", "extra": 1}}"#
        )
        .expect("write config");

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.client_id.map(Id::get), Some(770000000000000001));
        assert_eq!(config.bot_token.as_deref(), Some("abc"));
        assert_eq!(config.guild_context.map(Id::get), Some(555));
    }

    #[test]
    fn empty_values_count_as_missing() {
        let config =
            parse_config(r#"{"client_id": "", "bot_token": "", "guild_context": null}"#).unwrap();
        assert!(config.client_id.is_none());
        assert!(config.bot_token.is_none());
        assert!(config.guild_context.is_none());
    }

    #[test]
    fn rejects_malformed_ids() {
        assert!(matches!(
            parse_config(r#"{"client_id": "app"}"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            parse_config(r#"{"guild_context": [1]}"#),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let result = load_config(Some(Path::new("/nonexistent/slashctl.json")));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn prompts_for_missing_credentials() {
        let reader = ScriptedReader::new(&["nope", "42", "secret"]);
        let mut prompter = Prompter::new(Box::new(reader.clone()));

        let credentials = Config::default().credentials(&mut prompter).unwrap();
        assert_eq!(credentials.application.get(), 42);
        assert_eq!(credentials.token, "secret");
        assert_eq!(
            reader.prompts(),
            vec!["Client ID: ", "Client ID: ", "Bot token: "]
        );
        assert_eq!(reader.echoes(), vec![true, true, false]);
    }

    #[test]
    fn configured_credentials_skip_the_prompts() {
        let reader = ScriptedReader::new(&[]);
        let mut prompter = Prompter::new(Box::new(reader.clone()));
        let config = parse_config(r#"{"client_id": "42", "bot_token": "t"}"#).unwrap();

        let credentials = config.credentials(&mut prompter).unwrap();
        assert_eq!(credentials.token, "t");
        assert!(reader.prompts().is_empty());
    }
}
