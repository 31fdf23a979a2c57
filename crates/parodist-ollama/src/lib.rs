//! `TextCompleter` backed by a local Ollama daemon.
//!
//! `verify` hits `/api/tags` and checks the model is pulled; `complete`
//! POSTs `/api/generate` with `stream: false` and reads the `response`
//! field. The completer owns its HTTP agent and per-call timeout; the
//! engine never sees the wire.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use parodist_core::{CompleterError, TextCompleter};

// ─── Wire types ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    pub temperature: f64,
    pub top_p: f64,
    pub num_predict: u32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            temperature: 0.8,
            top_p: 0.9,
            num_predict: 128,
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: &'a GenerateOptions,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagModel>,
}

#[derive(Deserialize)]
struct TagModel {
    name: String,
}

// ─── Completer ───────────────────────────────────────────────────

pub struct OllamaCompleter {
    base_url: String,
    model: String,
    options: GenerateOptions,
    agent: ureq::Agent,
}

impl OllamaCompleter {
    /// Create a completer for `model` on an Ollama daemon at `base_url`
    /// (e.g. "http://localhost:11434"). `timeout` bounds every HTTP call.
    pub fn new(base_url: &str, model: &str, options: GenerateOptions, timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            options,
            agent,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl TextCompleter for OllamaCompleter {
    fn verify(&self) -> Result<(), CompleterError> {
        let url = format!("{}/api/tags", self.base_url);
        let mut resp = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| CompleterError::Unavailable(format!("cannot reach {}: {}", url, e)))?;

        let tags: TagsResponse = resp
            .body_mut()
            .read_json()
            .map_err(|e| CompleterError::Malformed(format!("bad /api/tags response: {}", e)))?;

        let names: Vec<&str> = tags.models.iter().map(|m| m.name.as_str()).collect();
        if model_installed(&self.model, &names) {
            Ok(())
        } else {
            Err(CompleterError::ModelMissing(self.model.clone()))
        }
    }

    fn complete(&self, prompt: &str) -> Result<String, CompleterError> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: &self.options,
        };

        tracing::debug!(model = %self.model, bytes = prompt.len(), "POST /api/generate");
        let mut resp = self
            .agent
            .post(&url)
            .send_json(&request)
            .map_err(map_transport)?;

        let body: GenerateResponse = resp
            .body_mut()
            .read_json()
            .map_err(|e| CompleterError::Malformed(format!("bad /api/generate response: {}", e)))?;

        match body.response {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(CompleterError::Malformed(
                "missing or empty `response` field".to_string(),
            )),
        }
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

/// The daemon may report "model:tag" while the user asked for "model", or
/// the other way around; accept either direction of prefixing.
fn model_installed(wanted: &str, installed: &[&str]) -> bool {
    installed.iter().any(|name| {
        name.starts_with(wanted) || wanted.starts_with(name.split(':').next().unwrap_or(""))
    })
}

fn map_transport(e: ureq::Error) -> CompleterError {
    let message = e.to_string();
    if message.to_lowercase().contains("timed out") || message.to_lowercase().contains("timeout") {
        CompleterError::Timeout
    } else {
        CompleterError::Transport(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_ollama_shape() {
        let options = GenerateOptions::default();
        let request = GenerateRequest {
            model: "llama3.2",
            prompt: "write a line",
            stream: false,
            options: &options,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "llama3.2");
        assert_eq!(value["prompt"], "write a line");
        assert_eq!(value["stream"], false);
        assert_eq!(value["options"]["temperature"], 0.8);
        assert_eq!(value["options"]["top_p"], 0.9);
        assert_eq!(value["options"]["num_predict"], 128);
    }

    #[test]
    fn response_field_deserializes() {
        let body: GenerateResponse =
            serde_json::from_str(r#"{"response": "a line", "done": true}"#).unwrap();
        assert_eq!(body.response.as_deref(), Some("a line"));

        let body: GenerateResponse = serde_json::from_str(r#"{"done": true}"#).unwrap();
        assert!(body.response.is_none());
    }

    #[test]
    fn tags_response_tolerates_missing_models() {
        let tags: TagsResponse = serde_json::from_str("{}").unwrap();
        assert!(tags.models.is_empty());

        let tags: TagsResponse =
            serde_json::from_str(r#"{"models": [{"name": "llama3.2:latest", "size": 1}]}"#)
                .unwrap();
        assert_eq!(tags.models[0].name, "llama3.2:latest");
    }

    #[test]
    fn model_matching_accepts_tag_variants() {
        assert!(model_installed("llama3.2", &["llama3.2:latest"]));
        assert!(model_installed("llama3.2:latest", &["llama3.2:latest"]));
        assert!(model_installed("llama3.2:latest", &["llama3.2"]));
        assert!(!model_installed("mistral", &["llama3.2:latest"]));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let completer = OllamaCompleter::new(
            "http://localhost:11434/",
            "llama3.2",
            GenerateOptions::default(),
            Duration::from_secs(30),
        );
        assert_eq!(completer.base_url, "http://localhost:11434");
        assert_eq!(completer.model(), "llama3.2");
    }
}
