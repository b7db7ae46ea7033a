use async_trait::async_trait;
use base64::prelude::{BASE64_STANDARD, Engine as _};
use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION},
};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::domain::ticket::{Ticket, TicketId};
use crate::error::{AppError, AppResult};
use crate::services::IssueTrackerService;

pub struct JiraClient {
    http: Client,
    base_url: Option<String>,
    email: Option<String>,
    token: Option<String>,
}

impl JiraClient {
    pub fn new(base_url: Option<String>, email: Option<String>, token: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url,
            email,
            token,
        }
    }

    fn api_details(&self) -> AppResult<(&str, &str, &str)> {
        let base_url = self
            .base_url
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Jira base URL not configured".to_string()))?;
        let email = self
            .email
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Jira email not configured".to_string()))?;
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Jira API token not configured".to_string()))?;
        Ok((base_url, email, token))
    }

    fn auth_header(email: &str, token: &str) -> String {
        let credentials = format!("{email}:{token}");
        let encoded = BASE64_STANDARD.encode(credentials);
        format!("Basic {encoded}")
    }

    fn issue_endpoint(base_url: &str, key: &str) -> String {
        format!(
            "{}/rest/api/3/issue/{key}?fields=summary,description",
            base_url.trim_end_matches('/')
        )
    }

    fn browse_url(base_url: &str, key: &str) -> String {
        format!("{}/browse/{}", base_url.trim_end_matches('/'), key)
    }
}

#[async_trait]
impl IssueTrackerService for JiraClient {
    async fn fetch_ticket(&self, id: &TicketId) -> AppResult<Ticket> {
        let (base_url, email, token) = self.api_details()?;
        debug!(ticket = %id, "fetching ticket from Jira");

        let response = self
            .http
            .get(Self::issue_endpoint(base_url, id.as_str()))
            .header(AUTHORIZATION, Self::auth_header(email, token))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to call Jira: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::IssueTracker(format!(
                "Jira responded with {status}: {body}"
            )));
        }

        let payload: JiraIssueResponse = response.json().await.map_err(|err| {
            AppError::IssueTracker(format!("failed to parse Jira response: {err}"))
        })?;

        Ok(payload.into_ticket(id.clone(), Self::browse_url(base_url, id.as_str())))
    }
}

#[derive(Deserialize)]
struct JiraIssueResponse {
    fields: JiraIssueFields,
}

#[derive(Deserialize)]
struct JiraIssueFields {
    #[serde(default)]
    summary: String,
    /// Atlassian Document Format, or a plain string on older instances.
    #[serde(default)]
    description: Option<Value>,
}

impl JiraIssueResponse {
    fn into_ticket(self, id: TicketId, url: String) -> Ticket {
        let description = match self.fields.description {
            Some(Value::String(text)) => text,
            Some(doc) => adf_to_text(&doc),
            None => String::new(),
        };
        Ticket {
            id,
            title: self.fields.summary.trim().to_string(),
            description,
            url: Some(url),
        }
    }
}

/// Flattens an ADF document: block nodes become paragraphs separated by a blank line.
fn adf_to_text(doc: &Value) -> String {
    let blocks = doc
        .get("content")
        .and_then(Value::as_array)
        .map(|nodes| {
            nodes
                .iter()
                .map(|node| {
                    let mut text = String::new();
                    collect_text(node, &mut text);
                    text.trim().to_string()
                })
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    blocks.join("\n\n")
}

fn collect_text(node: &Value, out: &mut String) {
    match node.get("type").and_then(Value::as_str) {
        Some("text") => {
            if let Some(text) = node.get("text").and_then(Value::as_str) {
                out.push_str(text);
            }
        }
        Some("hardBreak") => out.push('\n'),
        Some("listItem") => {
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("- ");
        }
        _ => {}
    }
    if let Some(children) = node.get("content").and_then(Value::as_array) {
        for child in children {
            collect_text(child, out);
        }
    }
}
