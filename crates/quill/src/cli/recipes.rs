//! Recipe management command handlers.

use super::{RecipeCommand, exit_not_found};
use quill::{Recipe, RecipeStore};
use std::path::Path;
use tracing::instrument;

/// Read a recipe file; `.toml` files are parsed as TOML, anything else as JSON.
fn read_recipe(path: &Path) -> anyhow::Result<Recipe> {
    let text = std::fs::read_to_string(path)?;
    parse_recipe(path, &text)
}

fn parse_recipe(path: &Path, text: &str) -> anyhow::Result<Recipe> {
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    if is_toml {
        Ok(toml::from_str(text)?)
    } else {
        Ok(serde_json::from_str(text)?)
    }
}

/// Handles the recipes subcommands.
#[instrument(skip(store))]
pub async fn handle_recipe_command<S: RecipeStore>(
    store: &S,
    action: RecipeCommand,
) -> anyhow::Result<()> {
    match action {
        RecipeCommand::List => {
            let summaries = store.list_recipes().await?;
            if summaries.is_empty() {
                eprintln!("No recipes stored");
            }
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }
        RecipeCommand::Show { name } => match store.find_recipe(&name).await? {
            Some(stored) => println!("{}", serde_json::to_string_pretty(&stored)?),
            None => exit_not_found(&name),
        },
        RecipeCommand::Create { file } => {
            let recipe = read_recipe(&file)?;
            let stored = store.create_recipe(&recipe).await?;
            println!("{}", serde_json::to_string_pretty(&stored)?);
        }
        RecipeCommand::Update { file } => {
            let recipe = read_recipe(&file)?;
            match store
                .update_recipe(recipe.name(), recipe.description(), recipe.steps())
                .await
            {
                Ok(stored) => println!("{}", serde_json::to_string_pretty(&stored)?),
                Err(e) if e.is_not_found() => exit_not_found(recipe.name()),
                Err(e) => return Err(e.into()),
            }
        }
        RecipeCommand::Delete { name } => match store.delete_recipe(&name).await {
            Ok(()) => eprintln!("Deleted {}", name),
            Err(e) if e.is_not_found() => exit_not_found(&name),
            Err(e) => return Err(e.into()),
        },
    }
    Ok(())
}
