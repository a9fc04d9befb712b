use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DemoError, DemoResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

/// A configured mock route and the canned response it returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockEndpoint {
    pub id: Uuid,
    pub name: String,
    pub method: HttpMethod,
    pub path: String,
    pub status_code: u16,
    pub response_body: serde_json::Value,
    pub delay_ms: u64,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full body for create (POST) and replace (PUT).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockInput {
    pub name: String,
    pub method: HttpMethod,
    pub path: String,
    #[serde(default = "default_status")]
    pub status_code: u16,
    #[serde(default)]
    pub response_body: serde_json::Value,
    #[serde(default)]
    pub delay_ms: u64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_status() -> u16 {
    200
}

fn default_enabled() -> bool {
    true
}

/// Partial update (PATCH); absent fields stay as they are.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockPatch {
    pub name: Option<String>,
    pub method: Option<HttpMethod>,
    pub path: Option<String>,
    pub status_code: Option<u16>,
    pub response_body: Option<serde_json::Value>,
    pub delay_ms: Option<u64>,
    pub enabled: Option<bool>,
}

pub(crate) fn validate_fields(name: &str, path: &str, status_code: u16) -> DemoResult<()> {
    if name.trim().is_empty() {
        return Err(DemoError::InvalidInput("name required".into()));
    }
    if !path.starts_with('/') {
        return Err(DemoError::InvalidInput("path must start with '/'".into()));
    }
    if !(100..=599).contains(&status_code) {
        return Err(DemoError::InvalidInput(format!(
            "status code {status_code} outside 100..=599"
        )));
    }
    Ok(())
}

impl MockEndpoint {
    pub fn from_input(input: MockInput) -> DemoResult<Self> {
        validate_fields(&input.name, &input.path, input.status_code)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            method: input.method,
            path: input.path,
            status_code: input.status_code,
            response_body: input.response_body,
            delay_ms: input.delay_ms,
            enabled: input.enabled,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn replace(&mut self, input: MockInput) -> DemoResult<()> {
        validate_fields(&input.name, &input.path, input.status_code)?;
        self.name = input.name.trim().to_string();
        self.method = input.method;
        self.path = input.path;
        self.status_code = input.status_code;
        self.response_body = input.response_body;
        self.delay_ms = input.delay_ms;
        self.enabled = input.enabled;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn apply(&mut self, patch: MockPatch) -> DemoResult<()> {
        let name = patch.name.unwrap_or_else(|| self.name.clone());
        let path = patch.path.unwrap_or_else(|| self.path.clone());
        let status_code = patch.status_code.unwrap_or(self.status_code);
        validate_fields(&name, &path, status_code)?;

        self.name = name.trim().to_string();
        self.path = path;
        self.status_code = status_code;
        if let Some(method) = patch.method {
            self.method = method;
        }
        if let Some(body) = patch.response_body {
            self.response_body = body;
        }
        if let Some(delay) = patch.delay_ms {
            self.delay_ms = delay;
        }
        if let Some(enabled) = patch.enabled {
            self.enabled = enabled;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}
