use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::change::{ChangeSummary, HandoffDraft};
use crate::domain::ticket::Ticket;
use crate::error::{AppError, AppResult};
use crate::parse::parse_json_detailed;
use crate::services::LanguageModelService;

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const MAX_OUTPUT_TOKENS: u32 = 1024;

pub struct GeminiClient {
    http: Client,
    api_key: Option<String>,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, model: String) -> Self {
        Self {
            http: Client::new(),
            api_key,
            model,
        }
    }

    fn endpoint(&self) -> String {
        format!("{GEMINI_API_URL}/{}:generateContent", self.model)
    }
}

#[async_trait]
impl LanguageModelService for GeminiClient {
    async fn draft_handoff(
        &self,
        changes: &ChangeSummary,
        ticket: Option<&Ticket>,
    ) -> AppResult<HandoffDraft> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Gemini API key not configured".to_string()))?;

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(changes, ticket),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.2,
                max_output_tokens: MAX_OUTPUT_TOKENS,
                response_mime_type: "application/json",
            },
        };

        debug!(model = %self.model, files = changes.files_changed, "requesting handoff draft");
        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await
            .map_err(|err| AppError::LanguageModel(format!("failed to call Gemini: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::LanguageModel(format!(
                "Gemini responded with {status}: {body}"
            )));
        }

        let payload: GenerateContentResponse = response.json().await.map_err(|err| {
            AppError::LanguageModel(format!("failed to parse Gemini response: {err}"))
        })?;
        let candidate = payload
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| AppError::LanguageModel("Gemini returned no candidates".to_string()))?;
        let text = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        draft_from_text(&text, candidate.finish_reason.as_deref())
    }
}

fn build_prompt(changes: &ChangeSummary, ticket: Option<&Ticket>) -> String {
    let mut prompt = String::from(
        "You prepare a change for review. Reply with one JSON object and nothing else:\n\
         {\"commit_message\": string, \"branch_summary\": string, \"pr_summary\": string}\n\n\
         Rules:\n\
         - commit_message: one line, \"<type>: <description>\", type is one of feat, fix, docs, test, refactor, chore; imperative mood; no ticket id; no trailers.\n\
         - branch_summary: three to six words describing the change.\n\
         - pr_summary: a short paragraph for reviewers.\n\n",
    );
    if let Some(ticket) = ticket {
        prompt.push_str(&format!("Ticket {}: {}\n", ticket.id, ticket.title));
        if !ticket.description.trim().is_empty() {
            prompt.push_str(ticket.description.trim());
            prompt.push('\n');
        }
        prompt.push('\n');
    }
    prompt.push_str(&format!(
        "Files changed: {}\n{}\n\nDiff:\n{}\n",
        changes.files_changed, changes.summary, changes.diff
    ));
    prompt
}

fn draft_from_text(text: &str, finish_reason: Option<&str>) -> AppResult<HandoffDraft> {
    let outcome = parse_json_detailed(text)?;
    if outcome.truncated || finish_reason == Some("MAX_TOKENS") {
        warn!("language model output looks truncated; the draft may be incomplete");
    }
    if outcome.repaired {
        debug!("language model output needed JSON repair");
    }
    serde_json::from_value(outcome.data).map_err(|err| {
        AppError::LanguageModel(format!("draft is missing expected fields: {err}"))
    })
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    response_mime_type: &'static str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}
