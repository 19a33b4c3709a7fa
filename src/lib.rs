pub mod argument_converters;
pub mod arguments;
pub mod client;
pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod executor;
pub mod input;
pub mod option_type;
pub mod prompt;

#[cfg(test)]
mod test_utils;

pub use error::{Error, Result};
