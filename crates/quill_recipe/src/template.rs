//! Placeholder substitution for prompt templates.

use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]*)\}").expect("placeholder pattern is valid"));

/// Substitute `{name}` placeholders in `template`.
///
/// Every occurrence of `{key}` whose key is present in `variables` is
/// replaced by the value. Placeholders with no matching variable stay
/// verbatim. Substitution is a single pass, so a value that itself contains
/// `{other}` is never expanded.
///
/// # Examples
///
/// ```
/// use quill_recipe::resolve;
/// use std::collections::BTreeMap;
///
/// let mut vars = BTreeMap::new();
/// vars.insert("city".to_string(), "Oslo".to_string());
///
/// assert_eq!(resolve("Visit {city}, {city}!", &vars), "Visit Oslo, Oslo!");
/// assert_eq!(resolve("Hi {name}", &vars), "Hi {name}");
/// ```
pub fn resolve(template: &str, variables: &BTreeMap<String, String>) -> String {
    if variables.is_empty() {
        return template.to_string();
    }

    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| match variables.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}
