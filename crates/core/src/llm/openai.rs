use crate::config::Settings;
use crate::domain::part::PartCategory;
use crate::llm::error::LlmError;
use crate::llm::{GenerateInput, Provider, RecommendationGenerator};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo-1106";
const DEFAULT_MAX_TOKENS: u32 = 800;
const TEMPERATURE: f64 = 0.7;

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    settings: Settings,
    base_url: String,
    model: String,
    max_tokens: u32,
    json_mode: bool,
}

impl OpenAiClient {
    /// Builds the client even without an API key; generation then fails with a config error.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let base_url =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let max_tokens = std::env::var("OPENAI_MAX_TOKENS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_MAX_TOKENS);
        let json_mode = std::env::var("OPENAI_JSON_MODE")
            .ok()
            .map(|s| !matches!(s.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"))
            .unwrap_or(true);

        // No timeout unless configured; the completion can legitimately take a while.
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = std::env::var("OPENAI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().context("failed to build reqwest client")?;

        Ok(Self {
            http,
            settings: settings.clone(),
            base_url,
            model,
            max_tokens,
            json_mode,
        })
    }

    async fn create_chat_completion(
        &self,
        req: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, LlmError> {
        let api_key = self
            .settings
            .require_openai_api_key()
            .map_err(|e| LlmError::Config {
                provider: Provider::OpenAI,
                detail: format!("{e:#}"),
            })?;

        let url = format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'));
        let res = self
            .http
            .post(url)
            .bearer_auth(api_key)
            .json(req)
            .send()
            .await
            .map_err(|source| LlmError::Transport {
                provider: Provider::OpenAI,
                source,
            })?;

        let status = res.status();
        let text = res.text().await.map_err(|source| LlmError::Transport {
            provider: Provider::OpenAI,
            source,
        })?;
        if !status.is_success() {
            return Err(LlmError::Http {
                provider: Provider::OpenAI,
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str::<ChatCompletionResponse>(&text).map_err(|e| LlmError::Decode {
            provider: Provider::OpenAI,
            detail: format!("failed to decode chat completion response: {e}"),
        })
    }

    fn build_request(&self, input: &GenerateInput) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system",
                    content: Self::system_prompt(),
                },
                Message {
                    role: "user",
                    content: Self::user_prompt(input),
                },
            ],
            max_tokens: self.max_tokens,
            temperature: TEMPERATURE,
            response_format: self.json_mode.then_some(ResponseFormat {
                kind: "json_object",
            }),
        }
    }

    fn parts_list() -> String {
        PartCategory::ALL
            .iter()
            .map(|c| c.label())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn example_output() -> String {
        let example: Vec<_> = PartCategory::ALL
            .iter()
            .map(|c| {
                serde_json::json!({
                    "part": c.label(),
                    "candidates": [{
                        "name": c.fallback_product_name(),
                        "reason": "추천 이유를 2~4문장으로 구체적으로 작성."
                    }]
                })
            })
            .collect();
        serde_json::Value::Array(example).to_string()
    }

    fn system_prompt() -> String {
        [
            "너는 조립식 PC 전문가야.".to_string(),
            "아래 쇼핑 검색에서 가져온 부품별 후보 목록 중에서만 부품을 골라.".to_string(),
            format!(
                "{} 이 7가지 부품을 반드시 모두 추천하고, 하나라도 누락하면 안 돼.",
                Self::parts_list()
            ),
            "각 부품마다 1개 이상의 후보를 추천하고, 후보마다 구체적인 추천 이유(reason)를 2~4문장으로 작성해."
                .to_string(),
            "'없음'이라는 단어는 절대 출력하지 마. 후보가 부족해도 목록에 있는 부품 중에서 골라."
                .to_string(),
            "완제품 PC, 미니PC, 노트북, 브랜드PC, 조립PC, 본체, 세트PC, 올인원 상품은 절대 추천하지 마."
                .to_string(),
            "JSON 배열 형식으로만 출력해. 각 원소는 part(부품 종류)와 candidates(name, reason 배열)만 포함하고, 가격과 링크는 넣지 마."
                .to_string(),
            "JSON 외의 설명이나 텍스트, 마크다운은 절대 출력하지 마.".to_string(),
            format!("예시: {}", Self::example_output()),
        ]
        .join("\n")
    }

    fn user_prompt(input: &GenerateInput) -> String {
        format!(
            "아래 부품별 후보 목록에서만 골라서 조립 PC를 추천해줘. {} 7가지 부품을 빠짐없이 JSON 배열로 보여줘.\n\n{}\n\n사용자의 요청: \"{}\"",
            Self::parts_list(),
            input.product_block,
            input.user_prompt.trim()
        )
    }

    fn response_text(res: ChatCompletionResponse) -> Result<String, LlmError> {
        let text = res
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(LlmError::EmptyResponse {
                provider: Provider::OpenAI,
            });
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl RecommendationGenerator for OpenAiClient {
    fn provider(&self) -> Provider {
        Provider::OpenAI
    }

    async fn generate_recommendation(&self, input: GenerateInput) -> Result<String, LlmError> {
        let req = self.build_request(&input);
        let res = self.create_chat_completion(&req).await?;

        if let Some(usage) = &res.usage {
            tracing::debug!(
                model = %self.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "OpenAI completion usage"
            );
        }
        if res
            .choices
            .first()
            .and_then(|c| c.finish_reason.as_deref())
            == Some("length")
        {
            tracing::warn!(
                max_tokens = self.max_tokens,
                "OpenAI finish_reason=length; recommendation may be truncated"
            );
        }

        let text = Self::response_text(res)?;
        tracing::debug!(chars = text.chars().count(), "OpenAI completion received");
        Ok(text)
    }
}

#[derive(Debug, Clone, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Clone, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Clone, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}
