use anyhow::{bail, Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use spendwise_core::InsightService;
use std::future::Future;

use crate::config::{AdvisorSection, Provider};

#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    model: String,
    image_model: String,
    http: reqwest::Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    image_config: ImageConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl GenerateResponse {
    fn first_parts(&self) -> &[Part] {
        self.candidates.first().map(|c| c.content.parts.as_slice()).unwrap_or(&[])
    }

    fn text(&self) -> String {
        self.first_parts()
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect::<String>()
            .trim()
            .to_string()
    }

    fn image_reference(&self) -> Option<String> {
        self.candidates
            .iter()
            .flat_map(|c| c.content.parts.iter())
            .find_map(|p| p.inline_data.as_ref())
            .map(|d| format!("data:{};base64,{}", d.mime_type, d.data))
    }
}

fn text_request(prompt: &str, generation_config: Option<GenerationConfig>) -> GenerateRequest {
    GenerateRequest {
        contents: vec![Content {
            parts: vec![Part {
                text: Some(prompt.to_string()),
                inline_data: None,
            }],
        }],
        generation_config,
    }
}

/// Runs an async call from sync shell code, inside or outside a runtime.
fn block_on<F: Future<Output = Result<T>>, T>(fut: F) -> Result<T> {
    if let Ok(handle) = tokio::runtime::Handle::try_current() {
        tokio::task::block_in_place(|| handle.block_on(fut))
    } else {
        let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
        rt.block_on(fut)
    }
}

impl GeminiClient {
    pub fn new(advisor: &AdvisorSection, api_key: String) -> Result<Self> {
        match advisor.provider()? {
            Provider::Gemini => {}
        }
        Ok(Self {
            api_key,
            base_url: advisor.base_url.trim_end_matches('/').to_string(),
            model: advisor.model.clone(),
            image_model: advisor.image_model.clone(),
            http: reqwest::Client::new(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    async fn generate(&self, model: &str, body: &GenerateRequest) -> Result<GenerateResponse> {
        let mut headers = HeaderMap::new();
        headers.insert("x-goog-api-key", HeaderValue::from_str(&self.api_key).context("api key header")?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let resp = self
            .http
            .post(self.endpoint(model))
            .headers(headers)
            .json(body)
            .send()
            .await
            .context("gemini request")?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            bail!("gemini error: {status} {txt}");
        }

        resp.json().await.context("parse gemini response")
    }

    async fn generate_text_async(&self, prompt: &str) -> Result<String> {
        let body = text_request(prompt, None);
        Ok(self.generate(&self.model, &body).await?.text())
    }

    async fn generate_image_async(&self, prompt: &str) -> Result<Option<String>> {
        let body = text_request(
            prompt,
            Some(GenerationConfig {
                image_config: ImageConfig {
                    aspect_ratio: "1:1".to_string(),
                },
            }),
        );
        Ok(self.generate(&self.image_model, &body).await?.image_reference())
    }
}

impl InsightService for GeminiClient {
    fn generate_text(&self, prompt: &str) -> Result<String> {
        block_on(self.generate_text_async(prompt))
    }

    fn generate_image(&self, prompt: &str) -> Result<Option<String>> {
        block_on(self.generate_image_async(prompt))
    }
}
