//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the quill binary.

mod commands;
mod generate;
mod recipes;

pub use commands::{Cli, Commands, RecipeCommand};
pub use generate::{
    handle_describe_command, handle_generate_command, handle_test_prompt_command,
    prompt_overrides,
};
pub use recipes::handle_recipe_command;

/// Print the not-found message and exit with status 2.
fn exit_not_found(content_type: &str) -> ! {
    eprintln!("Error: content type not found: {}", content_type);
    std::process::exit(2);
}
