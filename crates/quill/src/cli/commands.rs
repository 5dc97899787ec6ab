//! Command-line argument definitions.

use clap::{Parser, Subcommand};
use quill::LogFormat;
use std::path::PathBuf;

/// Command-line arguments for the quill binary.
#[derive(Parser, Debug)]
#[command(name = "quill")]
#[command(about = "Quill - multi-step content recipes over Gemini")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (default: ./quill.toml and the user config directory)
    #[arg(short, long, global = true, env = "QUILL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log output format (pretty or json)
    #[arg(long, global = true, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate content from a stored recipe and print the JSON result
    Generate {
        /// Content type to generate; overrides the one in the request file
        content_type: Option<String>,

        /// JSON file in the generation request shape
        #[arg(short, long)]
        request: Option<PathBuf>,

        /// Template variable as name=value (repeatable)
        #[arg(short = 'v', long = "var", value_parser = parse_key_val)]
        vars: Vec<(String, String)>,

        /// Print only the final content
        #[arg(long)]
        content_only: bool,
    },

    /// Manage stored recipes
    Recipes {
        #[command(subcommand)]
        action: RecipeCommand,
    },

    /// List a recipe's steps with prompt keys and effective settings
    Describe {
        /// Content type to describe
        content_type: String,
    },

    /// Send one prompt through the settings merge and outcome classification
    TestPrompt {
        /// Prompt text, sent verbatim
        prompt: String,

        /// Model identifier
        #[arg(long)]
        model: Option<String>,

        /// Sampling temperature
        #[arg(long)]
        temperature: Option<f64>,

        /// Nucleus sampling threshold
        #[arg(long)]
        top_p: Option<f64>,

        /// Maximum output tokens (raised to the configured floor)
        #[arg(long)]
        max_tokens: Option<u32>,

        /// Request markdown output
        #[arg(long)]
        markdown: bool,
    },
}

/// Recipe management commands.
#[derive(Subcommand, Debug)]
pub enum RecipeCommand {
    /// List stored recipes
    List,

    /// Print a stored recipe as JSON
    Show {
        /// Content type
        name: String,
    },

    /// Store a new recipe from a JSON or TOML file
    Create {
        /// JSON or TOML file in the recipe shape
        file: PathBuf,
    },

    /// Replace the description and steps of a stored recipe from a JSON or TOML file
    Update {
        /// JSON or TOML file in the recipe shape; its name selects the recipe
        file: PathBuf,
    },

    /// Delete a stored recipe
    Delete {
        /// Content type
        name: String,
    },
}

/// Parse a `name=value` pair.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", s))?;
    if name.trim().is_empty() {
        return Err(format!("empty variable name in '{}'", s));
    }
    Ok((name.trim().to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("city=Oslo=Norway").unwrap(),
            ("city".to_string(), "Oslo=Norway".to_string())
        );
        assert!(parse_key_val("city").is_err());
        assert!(parse_key_val("=Oslo").is_err());
    }

    #[test]
    fn test_generate_arguments() {
        let cli = Cli::try_parse_from([
            "quill", "generate", "blog", "--var", "city=Oslo", "--log-format", "json",
        ])
        .unwrap();

        assert_eq!(cli.log_format, LogFormat::Json);
        match cli.command {
            Commands::Generate {
                content_type, vars, ..
            } => {
                assert_eq!(content_type.as_deref(), Some("blog"));
                assert_eq!(vars, vec![("city".to_string(), "Oslo".to_string())]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
