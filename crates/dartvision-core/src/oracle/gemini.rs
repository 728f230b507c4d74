use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::detection::{CalibrationReport, Detection};
use crate::error::{DartError, Result};
use crate::frame::PreparedInput;
use crate::pipeline::config::OracleConfig;

use super::wire::{calibration_schema, parse_calibration, parse_detection, scoring_schema};
use super::AnalysisOracle;

const CALIBRATION_PROMPT: &str =
    "Is the dartboard centred in the frame? Are the sector numbers 1-20 readable? Answer in JSON.";

const SCORING_PROMPT: &str = "Geometric board analysis:
1. Orient the board (20 at the top, 3 at the bottom, 6 on the right, 11 on the left).
2. Find every dart. Follow the shaft to the exact point where the TIP enters the board.
3. Distinguish carefully between:
   - the treble ring (narrow, roughly half way out)
   - the double ring (narrow, on the outer edge)
   - the bullseye (red centre, 50 points) and the outer bull (green ring, 25 points)
4. If the tip touches the wire (spider), score the sector the tip is mostly inside.
Return JSON with the X,Y coordinates (0-1000) of each tip.";

const EDGE_HINT: &str = "The second image is an edge map of the same frame; use it to follow dart shafts.";

const SCORING_SYSTEM: &str = "You are a professional darts referee. Precision is everything. \
Do not invent darts that are not clearly stuck in the board. \
Ignore darts that fell out or do not touch the board.";

/// Oracle backed by the Gemini `generateContent` REST API.
pub struct GeminiOracle {
    client: Client,
    api_key: String,
    config: OracleConfig,
}

impl GeminiOracle {
    /// Create an oracle, reading the API key from `config.api_key_env`.
    pub fn new(config: &OracleConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| DartError::MissingApiKey(config.api_key_env.clone()))?;
        Ok(Self::with_api_key(config, api_key))
    }

    pub fn with_api_key(config: &OracleConfig, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            config: config.clone(),
        }
    }

    fn image_parts(&self, input: &PreparedInput, with_edges: bool) -> Vec<Value> {
        input
            .images()
            .take(if with_edges { 2 } else { 1 })
            .map(|img| {
                json!({
                    "inlineData": {
                        "mimeType": img.mime_type,
                        "data": img.to_base64()
                    }
                })
            })
            .collect()
    }

    async fn generate(&self, model: &str, body: Value) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            model
        );
        debug!(model, "Oracle request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| DartError::OracleTransport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(DartError::OracleTransport(format!("HTTP {}: {}", status.as_u16(), text)));
        }

        let envelope: Value = response
            .json()
            .await
            .map_err(|e| DartError::OracleFormat(e.to_string()))?;
        response_text(&envelope)
    }
}

/// Concatenate the answer parts of the first candidate, skipping thought parts.
fn response_text(envelope: &Value) -> Result<String> {
    let parts = envelope["candidates"][0]["content"]["parts"]
        .as_array()
        .ok_or_else(|| DartError::OracleFormat("Missing content in response".to_string()))?;

    let text: String = parts
        .iter()
        .filter(|p| !p["thought"].as_bool().unwrap_or(false))
        .filter_map(|p| p["text"].as_str())
        .collect();

    if text.trim().is_empty() {
        return Err(DartError::OracleFormat("Empty response text".to_string()));
    }
    Ok(text)
}

#[async_trait]
impl AnalysisOracle for GeminiOracle {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn check_calibration(&self, input: &PreparedInput) -> Result<CalibrationReport> {
        let mut parts = self.image_parts(input, false);
        parts.push(json!({ "text": CALIBRATION_PROMPT }));

        let body = json!({
            "contents": [{ "role": "user", "parts": parts }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": calibration_schema()
            }
        });

        let text = self.generate(&self.config.calibration_model, body).await?;
        parse_calibration(&text)
    }

    async fn score_frame(&self, input: &PreparedInput) -> Result<Detection> {
        let with_edges = self.config.send_edges && input.edges.is_some();
        let mut parts = self.image_parts(input, with_edges);
        parts.push(json!({ "text": SCORING_PROMPT }));
        if with_edges {
            parts.push(json!({ "text": EDGE_HINT }));
        }

        let mut generation = json!({
            "responseMimeType": "application/json",
            "responseSchema": scoring_schema()
        });
        if self.config.thinking_budget > 0 {
            generation["thinkingConfig"] = json!({ "thinkingBudget": self.config.thinking_budget });
        }

        let body = json!({
            "contents": [{ "role": "user", "parts": parts }],
            "systemInstruction": { "parts": [{ "text": SCORING_SYSTEM }] },
            "generationConfig": generation
        });

        let text = self.generate(&self.config.scoring_model, body).await?;
        parse_detection(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text_skips_thoughts() {
        let envelope = json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "thinking...", "thought": true },
                        { "text": "{\"detected\": true}" }
                    ]
                }
            }]
        });
        assert_eq!(response_text(&envelope).unwrap(), "{\"detected\": true}");
    }

    #[test]
    fn test_response_text_missing_candidates() {
        let envelope = json!({ "error": { "code": 400 } });
        assert!(matches!(response_text(&envelope), Err(DartError::OracleFormat(_))));
    }

    #[test]
    fn test_with_api_key_name() {
        let oracle = GeminiOracle::with_api_key(&OracleConfig::default(), "test-key");
        assert_eq!(oracle.name(), "gemini");
    }

    #[test]
    fn test_new_without_key_fails() {
        let config = OracleConfig {
            api_key_env: "DARTVISION_TEST_KEY_THAT_IS_NOT_SET".to_string(),
            ..Default::default()
        };
        assert!(matches!(GeminiOracle::new(&config), Err(DartError::MissingApiKey(_))));
    }
}
