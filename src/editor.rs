use serde_json::Value;
use twilight_model::application::command::CommandOptionChoiceValue;

use crate::argument_converters::{InputConverter, choice_value};
use crate::arguments::{
    CommandOption, NO_DESCRIPTION, OptionChoice, OptionContainer, display_value, renumber,
};
use crate::client::Client;
use crate::commands::Command;
use crate::error::Result;
use crate::option_type::{self, OptionType};
use crate::prompt::Prompter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionEdit {
    Kept,
    Removed,
}

/// Edits description, permission and options, then saves the command.
///
/// Returns the saved command as the server sees it, or `None` when the
/// server refused the update.
pub fn edit_command(
    prompter: &mut Prompter,
    client: &Client,
    command: &mut Command,
) -> Result<Option<Value>> {
    println!("-- Now editing the command '{}' --", command.name);
    command.description = prompter.value("description", command.description.clone())?;
    command.default_permission =
        prompter.confirm("default_permission", command.default_permission)?;

    edit_options(prompter, &mut *command)?;

    client.update_command(command)
}

/// Walks the existing options of `container`, then offers to add new ones.
pub fn edit_options<C: OptionContainer>(prompter: &mut Prompter, container: &mut C) -> Result<()> {
    let parent = container.container_name().to_string();
    println!("-- Now editing options of '{parent}' --");
    let options = container.options_mut();

    let mut index = 0;
    while index < options.len() {
        let question = format!("Do you want to edit the option '{}'?", options[index].name);
        if prompter.confirm(&question, false)?
            && edit_option(prompter, &mut options[index], &parent)? == OptionEdit::Removed
        {
            options.remove(index);
            continue;
        }
        index += 1;
    }

    while prompter.confirm("Do you want to add an option?", false)? {
        let option = CommandOption::new(OptionType::STRING)
            .order(options.len() + 1)
            .name("new option")
            .description(NO_DESCRIPTION);
        options.push(option);
        let last = options.len() - 1;
        if edit_option(prompter, &mut options[last], &parent)? == OptionEdit::Removed {
            options.pop();
        }
    }

    renumber(options);
    println!("-- Finished editing the options of '{parent}' --");
    Ok(())
}

/// Edits a single option. The caller removes it on [`OptionEdit::Removed`].
pub fn edit_option(
    prompter: &mut Prompter,
    option: &mut CommandOption,
    parent: &str,
) -> Result<OptionEdit> {
    let question = format!("Do you want to REMOVE the option '{}'?", option.name);
    if prompter.confirm(&question, false)? {
        return Ok(OptionEdit::Removed);
    }

    println!("-- Editing the option '{}' of '{}' --", option.name, parent);
    println!("Types: {}", option_type::legend());
    let kind = prompter.value_with(
        "type",
        option.kind,
        &option.kind.code().to_string(),
        OptionType::convert,
    )?;
    option.set_kind(kind);
    option.name = prompter.value("option name", option.name.clone())?;
    option.description = prompter.value("option description", option.description.clone())?;

    if kind.is_group() {
        edit_options(prompter, &mut *option)?;
    } else {
        option.required = prompter.confirm("Is this argument required?", option.required)?;
    }

    if kind.accepts_choices() {
        edit_choices(prompter, option)?;
    }

    println!("-- Back to editing '{parent}' --");
    Ok(OptionEdit::Kept)
}

/// Offers to edit or remove each choice, then to append new ones.
pub fn edit_choices(prompter: &mut Prompter, option: &mut CommandOption) -> Result<()> {
    let kind = option.kind;
    let add = if option.choices.is_empty() {
        prompter.confirm(
            "There are no choices. Do you want to populate this option with choices?",
            false,
        )?
    } else {
        let mut index = 0;
        while index < option.choices.len() {
            let choice = &mut option.choices[index];
            let action = prompter.value(
                &format!("'{}' e to edit, r to remove, blank to move on", choice.name),
                String::new(),
            )?;
            match action.as_str() {
                "e" => {
                    choice.name = prompter.value("name", choice.name.clone())?;
                    let shown = display_value(&choice.value);
                    choice.value =
                        prompter.value_with("value", choice.value.clone(), &shown, |input| {
                            choice_value(kind, input)
                        })?;
                }
                "r" => {
                    option.choices.remove(index);
                    continue;
                }
                _ => {}
            }
            index += 1;
        }
        prompter.confirm("Do you want to add more choices?", false)?
    };

    if add {
        loop {
            let name = prompter.value("name (empty for end)", String::new())?;
            if name.is_empty() {
                break;
            }
            let default = random_value(kind);
            let shown = display_value(&default);
            let value = prompter.value_with("value", default, &shown, |input| {
                choice_value(kind, input)
            })?;
            option.choices.push(OptionChoice::new(&name, value));
        }
    }
    Ok(())
}

fn random_value(kind: OptionType) -> CommandOptionChoiceValue {
    let value: i64 = rand::random_range(0..10000);
    if kind == OptionType::INTEGER {
        CommandOptionChoiceValue::Integer(value)
    } else {
        CommandOptionChoiceValue::String(value.to_string())
    }
}
