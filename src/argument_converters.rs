use twilight_model::{application::command::CommandOptionChoiceValue, id::Id};

use crate::error::{Error, Result};
use crate::option_type::OptionType;

pub trait InputConverter: Sized {
    fn convert(input: &str) -> Result<Self>;
}

impl InputConverter for String {
    fn convert(input: &str) -> Result<Self> {
        Ok(input.to_string())
    }
}

macro_rules! numeric_converter {
    ($ty:ty) => {
        impl InputConverter for $ty {
            fn convert(input: &str) -> Result<Self> {
                input.trim().parse::<$ty>().map_err(|e| {
                    Error::Conversion(format!(
                        "invalid {} '{}': {}",
                        stringify!($ty),
                        input,
                        e
                    ))
                })
            }
        }
    };
}

numeric_converter!(i64);
numeric_converter!(u8);
numeric_converter!(usize);

impl InputConverter for bool {
    fn convert(input: &str) -> Result<Self> {
        match input.trim().to_lowercase().as_str() {
            "y" | "yes" | "true" | "1" => Ok(true),
            "n" | "no" | "false" | "0" => Ok(false),
            _ => Err(Error::Conversion(format!("'{}' is not yes or no", input))),
        }
    }
}

impl InputConverter for OptionType {
    fn convert(input: &str) -> Result<Self> {
        OptionType::resolve(u8::convert(input)?)
    }
}

impl<T> InputConverter for Id<T> {
    fn convert(input: &str) -> Result<Self> {
        parse_id(input)
    }
}

/// Parses a snowflake. Zero is not a valid id.
pub fn parse_id<T>(input: &str) -> Result<Id<T>> {
    input
        .trim()
        .parse::<u64>()
        .ok()
        .and_then(Id::new_checked)
        .ok_or_else(|| Error::InvalidId(input.to_string()))
}

/// Parses a choice value for an option of the given type.
pub fn choice_value(kind: OptionType, input: &str) -> Result<CommandOptionChoiceValue> {
    if kind == OptionType::INTEGER {
        Ok(CommandOptionChoiceValue::Integer(i64::convert(input)?))
    } else {
        Ok(CommandOptionChoiceValue::String(input.to_string()))
    }
}
