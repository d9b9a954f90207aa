#[cfg(test)]
#[path = "model_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;

/// Answer generation models the backend can address. The first variant is
/// the default.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    EnumIter,
    EnumVariantNames,
    Serialize,
    Deserialize,
    strum::Display
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ModelName {
    #[default]
    OpenAI,
    Ollama,
}

impl ModelName {
    pub fn parse(text: &str) -> Option<ModelName> {
        let text = text.trim().to_lowercase();
        return ModelName::iter().find(|e| {
            return e.to_string() == text || e.display_name().to_lowercase() == text;
        });
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ModelName::OpenAI => return "GPT-4o mini",
            ModelName::Ollama => return "Llama 3",
        }
    }
}
