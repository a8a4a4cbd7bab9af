pub mod clone;

pub use clone::{handle_clone_command, handle_clone_command_with, CloneCommandConfig};
