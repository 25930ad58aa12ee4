mod character;
mod config_cmd;

pub use character::{CharacterCommand, OutputFormat};
pub use config_cmd::ConfigCommand;
