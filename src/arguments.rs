use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use twilight_model::application::command::CommandOptionChoiceValue;

use crate::error::Result;
use crate::option_type::OptionType;

/// Placeholder description used for freshly created commands and options.
pub const NO_DESCRIPTION: &str = "No Description.";

/// A fixed value offered for a string or integer option.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionChoice {
    pub name: String,
    pub value: CommandOptionChoiceValue,
}

/// A single argument, subcommand or subcommand group of a command.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOption {
    /// 1-based position among its siblings. Display only.
    pub order: usize,
    pub kind: OptionType,
    pub name: String,
    pub description: String,
    pub required: bool,
    /// Nested options, only for subcommands and subcommand groups.
    pub options: Vec<CommandOption>,
    /// Only for string and integer options.
    pub choices: Vec<OptionChoice>,
}

/// Anything that owns a list of options: a command or a grouping option.
pub trait OptionContainer {
    fn container_name(&self) -> &str;
    fn options_mut(&mut self) -> &mut Vec<CommandOption>;
}

impl OptionContainer for CommandOption {
    fn container_name(&self) -> &str {
        &self.name
    }

    fn options_mut(&mut self) -> &mut Vec<CommandOption> {
        &mut self.options
    }
}

impl OptionChoice {
    pub fn new(name: &str, value: CommandOptionChoiceValue) -> Self {
        OptionChoice {
            name: name.to_string(),
            value,
        }
    }
}

impl CommandOption {
    pub fn new(kind: OptionType) -> Self {
        CommandOption {
            order: 1,
            kind,
            name: String::new(),
            description: NO_DESCRIPTION.to_string(),
            required: false,
            options: Vec::new(),
            choices: Vec::new(),
        }
    }

    pub fn order(mut self, order: usize) -> Self {
        self.order = order;
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn choice(mut self, choice: OptionChoice) -> Self {
        self.choices.push(choice);
        self
    }

    pub fn option(mut self, option: CommandOption) -> Self {
        let order = self.options.len() + 1;
        self.options.push(option.order(order));
        self
    }

    /// Changes the type, dropping children the new type cannot carry.
    pub fn set_kind(&mut self, kind: OptionType) {
        if kind.is_group() {
            self.choices.clear();
        } else {
            self.options.clear();
        }
        if !kind.accepts_choices() {
            self.choices.clear();
        } else if kind != self.kind {
            self.choices.retain(|choice| value_fits(kind, &choice.value));
        }
        self.kind = kind;
    }

    /// `[?name: type (choices)]`, the inline form used in compact listings.
    pub fn short_name(&self) -> String {
        format!(
            "[{}{}: {}{}]",
            if self.required { "" } else { "?" },
            self.name,
            self.kind.name(),
            if self.choices.is_empty() {
                ""
            } else {
                " (choices)"
            }
        )
    }

    /// Multi-line block used by `ls --long`, indented by `offset` spaces.
    pub fn render(&self, offset: usize) -> String {
        let pad = " ".repeat(offset);
        let mut ret = format!(
            "{pad}{}Argument {}: '{}'\n",
            if self.required { "Required " } else { "" },
            self.order,
            self.name
        );
        if self.description != NO_DESCRIPTION {
            ret += &format!("{pad}    Description: {}\n", self.description);
        }
        ret += &format!("{pad}    Type: {}\n", self.kind.name());
        if !self.choices.is_empty() {
            ret += &format!("{pad}    Choices: \n");
            for choice in &self.choices {
                ret += &format!(
                    "{pad}       {}: {} \n",
                    choice.name,
                    display_value(&choice.value)
                );
            }
        }
        for option in &self.options {
            ret += &option.render(offset + 6);
        }
        ret
    }

    pub(crate) fn from_payload(order: usize, payload: OptionPayload, owner: &str) -> Result<Self> {
        let kind = OptionType::resolve(payload.kind)?;
        report_unknown(&payload.name, &payload.extra);

        let options = if kind.is_group() {
            payload
                .options
                .into_iter()
                .enumerate()
                .map(|(i, option)| CommandOption::from_payload(i + 1, option, &payload.name))
                .collect::<Result<Vec<_>>>()?
        } else {
            if !payload.options.is_empty() {
                log::warn!(
                    "Dropping nested options of '{}' in '{}': type {} cannot carry them",
                    payload.name,
                    owner,
                    kind
                );
            }
            Vec::new()
        };

        let choices = payload
            .choices
            .into_iter()
            .map(|choice| {
                report_unknown(&choice.name, &choice.extra);
                OptionChoice {
                    name: choice.name,
                    value: choice.value,
                }
            })
            .collect();

        Ok(CommandOption {
            order,
            kind,
            name: payload.name,
            description: payload.description,
            required: payload.required,
            options,
            choices,
        })
    }

    pub fn to_wire(&self) -> WireOption<'_> {
        WireOption {
            kind: self.kind.code(),
            name: &self.name,
            description: &self.description,
            required: (!self.kind.is_group()).then_some(self.required),
            choices: self
                .choices
                .iter()
                .map(|choice| WireChoice {
                    name: &choice.name,
                    value: &choice.value,
                })
                .collect(),
            options: self.options.iter().map(CommandOption::to_wire).collect(),
        }
    }
}

/// Rewrites `order` so siblings are numbered 1..N again.
pub fn renumber(options: &mut [CommandOption]) {
    for (i, option) in options.iter_mut().enumerate() {
        option.order = i + 1;
    }
}

pub fn display_value(value: &CommandOptionChoiceValue) -> String {
    match value {
        CommandOptionChoiceValue::String(value) => value.clone(),
        CommandOptionChoiceValue::Integer(value) => value.to_string(),
        CommandOptionChoiceValue::Number(value) => value.to_string(),
    }
}

fn value_fits(kind: OptionType, value: &CommandOptionChoiceValue) -> bool {
    match value {
        CommandOptionChoiceValue::String(_) => kind == OptionType::STRING,
        CommandOptionChoiceValue::Integer(_) => kind == OptionType::INTEGER,
        CommandOptionChoiceValue::Number(_) => false,
    }
}

pub(crate) fn report_unknown(name: &str, extra: &Map<String, Value>) {
    if !extra.is_empty() {
        log::warn!("Unknown param passed for {}: {}", name, Value::Object(extra.clone()));
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct OptionPayload {
    #[serde(rename = "type")]
    kind: u8,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    choices: Vec<ChoicePayload>,
    #[serde(default)]
    options: Vec<OptionPayload>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChoicePayload {
    name: String,
    value: CommandOptionChoiceValue,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct WireOption<'a> {
    #[serde(rename = "type")]
    pub kind: u8,
    pub name: &'a str,
    pub description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<WireChoice<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<WireOption<'a>>,
}

#[derive(Debug, Serialize)]
pub struct WireChoice<'a> {
    pub name: &'a str,
    pub value: &'a CommandOptionChoiceValue,
}
