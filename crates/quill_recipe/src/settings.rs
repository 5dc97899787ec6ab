//! Layered resolution of generation settings.

use quill_core::{GenerationDefaults, GenerationSettings, SettingsOverride};

/// Overlay one partial layer onto a complete settings value.
///
/// Only fields the layer sets are replaced.
fn apply_layer(mut base: GenerationSettings, layer: &SettingsOverride) -> GenerationSettings {
    if let Some(model) = &layer.model {
        base.model = model.clone();
    }
    if let Some(temperature) = layer.temperature {
        base.temperature = temperature;
    }
    if let Some(top_p) = layer.top_p {
        base.top_p = top_p;
    }
    if let Some(format) = layer.response_format {
        base.response_format = format;
    }
    if let Some(max) = layer.max_output_tokens {
        base.max_output_tokens = max;
    }
    base
}

/// Merge the three settings layers and enforce the output token floor.
///
/// Precedence, lowest to highest: `base` (process defaults), `step`
/// (settings stored on the step definition), `caller` (request override for
/// that step). `max_output_tokens` is raised to `floor` if it ends up below.
///
/// # Examples
///
/// ```
/// use quill_core::{GenerationSettings, SettingsOverride};
/// use quill_recipe::merge_settings;
///
/// let step = SettingsOverride::default().with_temperature(0.2).with_max_output_tokens(100u32);
/// let caller = SettingsOverride::default().with_temperature(0.9);
///
/// let merged = merge_settings(&GenerationSettings::default(), Some(&step), Some(&caller), 8000);
/// assert_eq!(merged.temperature, 0.9);
/// assert_eq!(merged.max_output_tokens, 8000);
/// ```
pub fn merge_settings(
    base: &GenerationSettings,
    step: Option<&SettingsOverride>,
    caller: Option<&SettingsOverride>,
    floor: u32,
) -> GenerationSettings {
    let merged = [step, caller]
        .into_iter()
        .flatten()
        .fold(base.clone(), apply_layer);

    if merged.max_output_tokens < floor {
        tracing::debug!(
            requested = merged.max_output_tokens,
            floor,
            "Raising max_output_tokens to floor"
        );
        GenerationSettings {
            max_output_tokens: floor,
            ..merged
        }
    } else {
        merged
    }
}

/// Settings merger bound to the process defaults and token floor.
#[derive(Debug, Clone, PartialEq, derive_getters::Getters)]
pub struct SettingsMerger {
    /// Lowest precedence layer
    defaults: GenerationSettings,
    /// Minimum `max_output_tokens`
    floor: u32,
}

impl SettingsMerger {
    /// Creates a merger from explicit defaults and floor.
    pub fn new(defaults: GenerationSettings, floor: u32) -> Self {
        Self { defaults, floor }
    }

    /// Resolve the settings for one step.
    pub fn merge(
        &self,
        step: Option<&SettingsOverride>,
        caller: Option<&SettingsOverride>,
    ) -> GenerationSettings {
        merge_settings(&self.defaults, step, caller, self.floor)
    }
}

impl From<&GenerationDefaults> for SettingsMerger {
    fn from(defaults: &GenerationDefaults) -> Self {
        Self::new(defaults.settings(), *defaults.min_output_tokens())
    }
}
