//! Google Gemini provider.

use super::{GenerationRequest, GenerationService, LlmError};
use crate::ai::config::AiConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Gemini `generateContent` provider.
#[derive(Debug)]
pub struct GeminiProvider {
    api_key: Option<String>,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(config: &AiConfig) -> Result<Self, LlmError> {
        if config.api_key.is_none() {
            tracing::warn!("GEMINI_API_KEY is not set; generation calls will fail");
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::RequestFailed(e.to_string()))?;

        Ok(Self {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    system_instruction: GeminiContent<'a>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiApiError,
}

#[derive(Debug, Deserialize)]
struct GeminiApiError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

#[async_trait]
impl GenerationService for GeminiProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| LlmError::NotConfigured("GEMINI_API_KEY not set".to_string()))?;

        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![RequestPart {
                    text: &request.user,
                }],
            }],
            system_instruction: GeminiContent {
                parts: vec![RequestPart {
                    text: &request.system,
                }],
            },
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: &request.schema,
                temperature: request.temperature,
            },
        };

        tracing::debug!(
            task = %request.task,
            model = %self.model,
            "Calling Gemini API"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::RequestFailed(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(LlmError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| LlmError::RequestFailed(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(api_error(status, &body));
        }

        let response: GeminiResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::ParseError(e.to_string()))?;

        let text = response
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
            .ok_or(LlmError::EmptyResponse)?;

        Ok(text)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Classify a non-success response body. Quota exhaustion can arrive with
/// a status other than 429, so the error status string is checked too.
fn api_error(status: u16, body: &str) -> LlmError {
    match serde_json::from_str::<GeminiErrorResponse>(body) {
        Ok(parsed) if parsed.error.status == "RESOURCE_EXHAUSTED" => {
            LlmError::RateLimited {
                retry_after_secs: None,
            }
        }
        Ok(parsed) => LlmError::ApiError {
            status,
            message: parsed.error.message,
        },
        Err(_) if body.contains("RESOURCE_EXHAUSTED") => LlmError::RateLimited {
            retry_after_secs: None,
        },
        Err(_) => LlmError::ApiError {
            status,
            message: body.to_string(),
        },
    }
}
