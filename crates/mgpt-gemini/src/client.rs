//! Gemini REST client implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, warn};

use mgpt_core::{
    ChatModel, ChatRequest, ChatTurn, Embedder, Error, GenerationConfig, GenerationResult, Result,
    Role,
};

use crate::config::GeminiConfig;

/// Gemini client for chat generation and query embeddings
pub struct GeminiClient {
    config: GeminiConfig,
    client: Client,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub(crate) struct Part {
    #[serde(default)]
    pub(crate) text: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub(crate) struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) role: Option<String>,
    #[serde(default)]
    pub(crate) parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    pub(crate) contents: Vec<Content>,
    pub(crate) generation_config: WireGenerationConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    total_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EmbedContentRequest {
    model: String,
    content: Content,
    task_type: String,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmbedContentResponse {
    embedding: ContentEmbedding,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    status: Option<String>,
}

/// `gemini-1.5-pro` and `models/gemini-1.5-pro` both name the same resource
pub(crate) fn model_path(model: &str) -> String {
    if model.starts_with("models/") || model.starts_with("tunedModels/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    }
}

/// Map the instruction and the conversation onto Gemini `contents`.
///
/// The instruction travels as a leading user content, followed by every
/// turn including the greeting, so roles alternate from the first content.
/// Consecutive contents from the same role share one entry.
pub(crate) fn to_contents(instruction: &str, turns: &[ChatTurn]) -> Vec<Content> {
    let mut contents: Vec<Content> = Vec::new();
    if !instruction.trim().is_empty() {
        contents.push(Content::text(Some("user"), instruction));
    }

    for turn in turns {
        let role = match turn.role() {
            Role::User => "user",
            Role::Assistant => "model",
        };
        match contents.last_mut() {
            Some(last) if last.role.as_deref() == Some(role) => last.parts.push(Part {
                text: turn.text().to_string(),
            }),
            _ => contents.push(Content::text(Some(role), turn.text())),
        }
    }
    contents
}

pub(crate) fn build_generate_request(
    request: &ChatRequest<'_>,
    config: &GenerationConfig,
) -> Result<GenerateContentRequest> {
    if !request.turns.iter().any(|t| t.role() == Role::User) {
        return Err(Error::InvalidInput(
            "Generation request contains no user turn".to_string(),
        ));
    }

    Ok(GenerateContentRequest {
        contents: to_contents(&request.system_instruction, request.turns),
        generation_config: WireGenerationConfig {
            temperature: config.temperature,
        },
    })
}

pub(crate) fn parse_generate_response(
    response: GenerateContentResponse,
    model_id: &str,
) -> Result<GenerationResult> {
    let tokens_used = response.usage_metadata.and_then(|u| u.total_token_count);

    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "no candidates returned".to_string());
        return Err(Error::LLMProvider(format!("Gemini returned no answer: {}", reason)));
    };

    let text = candidate
        .content
        .map(|c| {
            c.parts
                .into_iter()
                .map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(Error::LLMProvider(format!(
            "Empty response from Gemini (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        )));
    }

    Ok(GenerationResult {
        text: text.trim().to_string(),
        model_id: model_id.to_string(),
        tokens_used,
        finish_reason: candidate.finish_reason,
    })
}

pub(crate) fn api_error(status: u16, body: &str) -> Error {
    let message = match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => match parsed.error.status {
            Some(code) => format!("{} ({})", parsed.error.message, code),
            None => parsed.error.message,
        },
        Err(_) => body.to_string(),
    };

    match status {
        401 | 403 => Error::Authentication(format!("Gemini rejected the API key: {}", message)),
        _ => Error::LLMProvider(format!(
            "Gemini API request failed with status {}: {}",
            status, message
        )),
    }
}

impl GeminiClient {
    /// Create a new Gemini client from configuration
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/v1beta/{}:{}", self.config.api_url, model_path(model), method)
    }

    async fn post_json<B, R>(&self, url: &str, body: &B) -> Result<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout(e.to_string())
                } else {
                    Error::Network(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(status, "Gemini request failed");
            return Err(api_error(status, &error_text));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))
    }
}

#[async_trait]
impl ChatModel for GeminiClient {
    async fn generate(&self, request: &ChatRequest<'_>) -> Result<GenerationResult> {
        let config = GenerationConfig {
            model_id: self.config.chat_model.clone(),
            temperature: Some(self.config.temperature),
            timeout: self.config.timeout(),
        };
        self.generate_with_config(request, &config).await
    }

    async fn generate_with_config(
        &self,
        request: &ChatRequest<'_>,
        config: &GenerationConfig,
    ) -> Result<GenerationResult> {
        let body = build_generate_request(request, config)?;
        let url = self.endpoint(&config.model_id, "generateContent");

        debug!(
            model = %config.model_id,
            contents = body.contents.len(),
            "Sending generateContent request"
        );
        let started = Instant::now();

        let response = match timeout(
            config.timeout,
            self.post_json::<_, GenerateContentResponse>(&url, &body),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => return Err(Error::Timeout("Request timed out".to_string())),
        };

        let result = parse_generate_response(response, &config.model_id)?;
        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            tokens = ?result.tokens_used,
            "Gemini reply received"
        );
        Ok(result)
    }

    fn model_id(&self) -> &str {
        &self.config.chat_model
    }
}

#[async_trait]
impl Embedder for GeminiClient {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let model = model_path(&self.config.embedding_model);
        let body = EmbedContentRequest {
            model: model.clone(),
            content: Content::text(None, text),
            task_type: "RETRIEVAL_QUERY".to_string(),
        };
        let url = self.endpoint(&model, "embedContent");

        let response: EmbedContentResponse = self
            .post_json(&url, &body)
            .await
            .map_err(|e| match e {
                Error::LLMProvider(msg) => Error::Embedding(msg),
                other => other,
            })?;

        if response.embedding.values.is_empty() {
            return Err(Error::Embedding("Gemini returned an empty embedding".to_string()));
        }
        Ok(response.embedding.values)
    }

    fn model_id(&self) -> &str {
        &self.config.embedding_model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_path() {
        assert_eq!(model_path("gemini-1.5-pro"), "models/gemini-1.5-pro");
        assert_eq!(
            model_path("models/text-embedding-004"),
            "models/text-embedding-004"
        );
    }

    #[test]
    fn test_contents_keep_greeting() {
        let turns = vec![
            ChatTurn::assistant("Pranam, seeker of truth."),
            ChatTurn::user("Karna kaun tha"),
            ChatTurn::assistant("Karna Kunti ka putra tha."),
            ChatTurn::user("Aur Arjuna?"),
        ];

        let contents = to_contents("You are Sanjaya", &turns);
        let roles: Vec<_> = contents.iter().map(|c| c.role.as_deref().unwrap()).collect();
        assert_eq!(roles, vec!["user", "model", "user", "model", "user"]);
        assert_eq!(contents[0].parts[0].text, "You are Sanjaya");
        assert_eq!(contents[1].parts[0].text, "Pranam, seeker of truth.");
        assert_eq!(contents[2].parts[0].text, "Karna kaun tha");
    }

    #[test]
    fn test_contents_merge_same_role() {
        let turns = vec![ChatTurn::user("first"), ChatTurn::user("second")];
        let contents = to_contents("system", &turns);
        assert_eq!(contents.len(), 1);
        let texts: Vec<_> = contents[0].parts.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["system", "first", "second"]);
    }

    #[test]
    fn test_request_without_user_turn_is_rejected() {
        let turns = vec![ChatTurn::assistant("Pranam")];
        let request = ChatRequest::new("system", &turns);
        let err = build_generate_request(&request, &GenerationConfig::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_parse_response_joins_parts() {
        let raw = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Karna was "}, {"text": "Kunti's son."}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 10, "totalTokenCount": 42}
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let result = parse_generate_response(response, "gemini-1.5-pro").unwrap();

        assert_eq!(result.text, "Karna was Kunti's son.");
        assert_eq!(result.tokens_used, Some(42));
        assert_eq!(result.finish_reason.as_deref(), Some("STOP"));
    }

    #[test]
    fn test_parse_blocked_response() {
        let raw = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let err = parse_generate_response(response, "gemini-1.5-pro").unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_parse_empty_candidate() {
        let raw = r#"{"candidates": [{"finishReason": "MAX_TOKENS"}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let err = parse_generate_response(response, "gemini-1.5-pro").unwrap_err();
        assert!(err.to_string().contains("MAX_TOKENS"));
    }

    #[test]
    fn test_api_error_mapping() {
        let body = r#"{"error": {"code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED"}}"#;
        assert!(matches!(api_error(403, body), Error::Authentication(_)));

        let err = api_error(500, "upstream exploded");
        assert_eq!(
            err.to_string(),
            "LLM provider error: Gemini API request failed with status 500: upstream exploded"
        );
    }

    #[test]
    fn test_embedding_response_parsing() {
        let raw = r#"{"embedding": {"values": [0.1, 0.2, 0.3]}}"#;
        let response: EmbedContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.embedding.values.len(), 3);
    }
}
