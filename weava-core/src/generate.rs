//! AI story setup generation.
//!
//! Turns a validated seed into a [`StorySetup`]: the title and synopsis a
//! new story starts from. The [`StoryGenerator`] trait is the seam between
//! the creation flow and the model; production uses
//! [`GeminiStoryGenerator`], tests use the scripted generator from
//! [`crate::testing`].

use crate::seed::StorySeed;
use futures::future::BoxFuture;
use gemini::{Gemini, Message, Request};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SYSTEM_PROMPT: &str = "You are a creative writing assistant for an interactive fiction platform. Given a reader's story idea, produce the setup for a new interactive story: a title and a synopsis.\n\nThe title must be engaging, memorable, and 2-8 words long.\n\nThe synopsis must be 50-75 words that set up the story world, the main conflict, and hook the reader. Do not reveal major plot twists.\n\nRespond with JSON matching the provided schema.";

/// Errors from story setup generation.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Gemini API error: {0}")]
    Api(#[from] gemini::Error),

    #[error("Model returned a malformed story setup: {0}")]
    Malformed(String),
}

/// The generated setup for a new story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorySetup {
    pub title: String,
    pub synopsis: String,
}

/// Anything that can turn a seed into a story setup.
pub trait StoryGenerator: Send + Sync {
    fn generate_setup<'a>(
        &'a self,
        seed: &'a StorySeed,
    ) -> BoxFuture<'a, Result<StorySetup, GenerationError>>;
}

impl<G: StoryGenerator + ?Sized> StoryGenerator for std::sync::Arc<G> {
    fn generate_setup<'a>(
        &'a self,
        seed: &'a StorySeed,
    ) -> BoxFuture<'a, Result<StorySetup, GenerationError>> {
        (**self).generate_setup(seed)
    }
}

/// Configuration for the Gemini-backed generator.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Model override. None uses the client default.
    pub model: Option<String>,
    pub max_output_tokens: usize,
    pub temperature: Option<f32>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: None,
            max_output_tokens: 1024,
            temperature: Some(0.9),
        }
    }
}

/// Production generator backed by the Gemini API.
pub struct GeminiStoryGenerator {
    client: Gemini,
    config: GeneratorConfig,
}

impl GeminiStoryGenerator {
    pub fn new(client: Gemini) -> Self {
        Self {
            client,
            config: GeneratorConfig::default(),
        }
    }

    /// Create a generator from the GEMINI_API_KEY environment variable.
    pub fn from_env() -> Result<Self, gemini::Error> {
        Ok(Self::new(Gemini::from_env()?))
    }

    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }
}

impl StoryGenerator for GeminiStoryGenerator {
    fn generate_setup<'a>(
        &'a self,
        seed: &'a StorySeed,
    ) -> BoxFuture<'a, Result<StorySetup, GenerationError>> {
        Box::pin(async move {
            let mut request = Request::new(vec![Message::user(seed_prompt(seed))])
                .with_system(SYSTEM_PROMPT)
                .with_max_output_tokens(self.config.max_output_tokens)
                .with_response_schema(response_schema());
            if let Some(model) = &self.config.model {
                request = request.with_model(model.clone());
            }
            if let Some(temperature) = self.config.temperature {
                request = request.with_temperature(temperature);
            }

            tracing::debug!(seed_chars = seed.as_str().chars().count(), "requesting story setup");
            let response = self.client.complete(request).await?;
            let setup = parse_setup(response.json()?)?;
            tracing::info!(title = %setup.title, "story setup generated");
            Ok(setup)
        })
    }
}

fn seed_prompt(seed: &StorySeed) -> String {
    format!("User's story idea: \"{seed}\"")
}

/// Schema sent with every setup request, in Gemini's REST schema dialect.
fn response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "title": {
                "type": "STRING",
                "description": "Engaging, memorable, and 2-8 words."
            },
            "synopsis": {
                "type": "STRING",
                "description": "50-75 words that set up the story world, main conflict, and hook the reader. Do not reveal major plot twists."
            }
        },
        "required": ["title", "synopsis"],
        "propertyOrdering": ["title", "synopsis"]
    })
}

fn parse_setup(value: serde_json::Value) -> Result<StorySetup, GenerationError> {
    let setup: StorySetup =
        serde_json::from_value(value).map_err(|e| GenerationError::Malformed(e.to_string()))?;
    if setup.title.trim().is_empty() || setup.synopsis.trim().is_empty() {
        return Err(GenerationError::Malformed(
            "empty title or synopsis".to_string(),
        ));
    }
    Ok(setup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::validate_seed;

    #[test]
    fn test_seed_prompt_quotes_the_idea() {
        let seed = validate_seed("A city where rain falls upward")
            .into_result()
            .unwrap();
        assert_eq!(
            seed_prompt(&seed),
            "User's story idea: \"A city where rain falls upward\""
        );
    }

    #[test]
    fn test_response_schema_shape() {
        let schema = response_schema();
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["properties"]["title"]["type"], "STRING");
        assert_eq!(schema["properties"]["synopsis"]["type"], "STRING");
        assert_eq!(schema["required"][0], "title");
        assert_eq!(schema["required"][1], "synopsis");
    }

    #[test]
    fn test_parse_setup_well_formed() {
        let setup = parse_setup(serde_json::json!({
            "title": "The Upward Rain",
            "synopsis": "In a city where gravity forgot the weather, a cartographer maps the falling sky."
        }))
        .unwrap();
        assert_eq!(setup.title, "The Upward Rain");
        assert!(setup.synopsis.contains("cartographer"));
    }

    #[test]
    fn test_parse_setup_missing_field() {
        let err = parse_setup(serde_json::json!({"title": "No Synopsis"})).unwrap_err();
        assert!(matches!(err, GenerationError::Malformed(_)));
    }

    #[test]
    fn test_parse_setup_rejects_blank_title() {
        let err = parse_setup(serde_json::json!({
            "title": "   ",
            "synopsis": "Something happened somewhere."
        }))
        .unwrap_err();
        assert!(matches!(err, GenerationError::Malformed(_)));
    }

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();
        assert!(config.model.is_none());
        assert_eq!(config.max_output_tokens, 1024);
        assert_eq!(config.temperature, Some(0.9));
    }
}
