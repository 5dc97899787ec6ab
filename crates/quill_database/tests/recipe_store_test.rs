//! Tests for the SQLite recipe store using temporary database files.

use quill_core::{Recipe, ResponseFormat, SettingsOverride, StepDefinition};
use quill_database::DatabaseRecipeStore;
use quill_error::{QuillErrorKind, RecipeErrorKind};
use quill_interface::RecipeStore;
use tempfile::TempDir;

async fn store() -> (TempDir, DatabaseRecipeStore) {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = dir.path().join("quill.db").to_string_lossy().into_owned();
    let store = DatabaseRecipeStore::connect(&url, 2)
        .await
        .expect("database opens");
    (dir, store)
}

fn blog_recipe() -> Recipe {
    Recipe::builder()
        .name("blog")
        .description("Blog posts about a city")
        .steps(vec![
            StepDefinition::new(1, "Research {city}."),
            StepDefinition::new(2, "Write a post about {city}.").with_settings(
                SettingsOverride::default()
                    .with_model("gemini-2.5-pro")
                    .with_response_format(ResponseFormat::Markdown),
            ),
        ])
        .build()
        .unwrap()
}

fn recipe_kind(err: &quill_error::QuillError) -> Option<RecipeErrorKind> {
    match err.kind() {
        QuillErrorKind::Recipe(e) => Some(e.kind.clone()),
        _ => None,
    }
}

#[tokio::test]
async fn test_create_and_find_round_trips_settings() {
    let (_dir, store) = store().await;

    let created = store.create_recipe(&blog_recipe()).await.unwrap();
    assert_eq!(created.recipe, blog_recipe());

    let found = store.find_recipe("blog").await.unwrap().expect("recipe stored");
    assert_eq!(found.id, created.id);
    assert_eq!(found.recipe, blog_recipe());
    let stored = found.recipe.steps()[1].settings().as_ref().unwrap();
    assert_eq!(stored.response_format, Some(ResponseFormat::Markdown));
}

#[tokio::test]
async fn test_find_unknown_is_none() {
    let (_dir, store) = store().await;
    assert!(store.find_recipe("poetry").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_create_is_rejected() {
    let (_dir, store) = store().await;
    store.create_recipe(&blog_recipe()).await.unwrap();

    let err = store.create_recipe(&blog_recipe()).await.unwrap_err();
    assert_eq!(
        recipe_kind(&err),
        Some(RecipeErrorKind::AlreadyExists("blog".to_string()))
    );
    assert_eq!(store.list_recipes().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_recipe_is_not_written() {
    let (_dir, store) = store().await;
    let recipe = Recipe::builder()
        .name("dup")
        .steps(vec![StepDefinition::new(1, "a"), StepDefinition::new(1, "b")])
        .build()
        .unwrap();

    assert!(store.create_recipe(&recipe).await.is_err());
    assert!(store.find_recipe("dup").await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_replaces_content() {
    let (_dir, store) = store().await;
    let created = store.create_recipe(&blog_recipe()).await.unwrap();

    let updated = store
        .update_recipe("blog", "Short posts", &[StepDefinition::new(5, "Summarize {city}.")])
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.recipe.description(), "Short posts");
    assert_eq!(updated.recipe.steps(), &vec![StepDefinition::new(5, "Summarize {city}.")]);

    let err = store.update_recipe("ghost", "", &[]).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_list_and_delete() {
    let (_dir, store) = store().await;
    store.create_recipe(&blog_recipe()).await.unwrap();
    let news = Recipe::builder()
        .name("news")
        .steps(vec![StepDefinition::new(1, "Summarize {topic}.")])
        .build()
        .unwrap();
    store.create_recipe(&news).await.unwrap();

    let list = store.list_recipes().await.unwrap();
    let names: Vec<&str> = list.iter().map(|s| s.content_type.as_str()).collect();
    assert_eq!(names, vec!["blog", "news"]);
    assert_eq!(list[0].prompt_count, 2);

    store.delete_recipe("blog").await.unwrap();
    assert!(store.find_recipe("blog").await.unwrap().is_none());
    assert!(store.delete_recipe("blog").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_reopen_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let url = dir.path().join("quill.db").to_string_lossy().into_owned();

    {
        let store = DatabaseRecipeStore::connect(&url, 1).await.unwrap();
        store.create_recipe(&blog_recipe()).await.unwrap();
    }

    let reopened = DatabaseRecipeStore::connect(&url, 1).await.unwrap();
    assert!(reopened.find_recipe("blog").await.unwrap().is_some());
}
