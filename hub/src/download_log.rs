use anyhow::{anyhow, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use cz_core::export::{append_log, Requester};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::HubConfig;

/// Appends download records to a log file kept in a GitHub repository,
/// through the contents API (read, append, write back with the old sha).
pub struct DownloadLog {
    http: Client,
    /// `None` ⇒ remote logging disabled.
    token: Option<String>,
    url: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct ContentsFile {
    content: String,
    sha: String,
}

#[derive(Debug, Serialize)]
struct ContentsPut<'a> {
    message: String,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

/// What happened to one download record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutcome {
    Written,
    Skipped,
}

impl DownloadLog {
    pub fn new(cfg: &HubConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent("cz-hub")
            .build()
            .context("build reqwest client")?;
        Ok(Self {
            http,
            token: cfg.github_token.clone(),
            url: format!(
                "{}/repos/{}/contents/{}",
                cfg.download_log_api.trim_end_matches('/'),
                cfg.download_log_repo.trim_matches('/'),
                cfg.download_log_path.trim_start_matches('/'),
            ),
            timeout: Duration::from_millis(cfg.download_log_timeout_ms.max(1)),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.token.is_some()
    }

    pub async fn record(&self, who: &Requester, at: DateTime<Utc>) -> Result<LogOutcome> {
        let Some(token) = self.token.as_deref() else {
            return Ok(LogOutcome::Skipped);
        };
        let auth = format!("token {token}");

        let resp = self
            .http
            .get(&self.url)
            .header("Authorization", &auth)
            .header("Accept", "application/vnd.github.v3+json")
            .timeout(self.timeout)
            .send()
            .await
            .context("download log GET")?;

        let (existing, sha) = match resp.status() {
            StatusCode::OK => {
                let file: ContentsFile = resp.json().await.context("download log GET json")?;
                (decode_content(&file.content)?, Some(file.sha))
            }
            StatusCode::NOT_FOUND => (String::new(), None),
            status => return Err(anyhow!("download log GET HTTP {status}")),
        };

        let body = ContentsPut {
            message: format!("[log] Download by {} ({})", who.name, who.institution),
            content: STANDARD.encode(append_log(&existing, &who.log_line(at))),
            sha: sha.as_deref(),
        };

        let resp = self
            .http
            .put(&self.url)
            .header("Authorization", &auth)
            .header("Accept", "application/vnd.github.v3+json")
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .context("download log PUT")?;

        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("download log PUT HTTP {status}"));
        }
        Ok(LogOutcome::Written)
    }
}

/// The contents API wraps base64 at 60 columns.
fn decode_content(content: &str) -> Result<String> {
    let compact: String = content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD.decode(compact).context("download log base64")?;
    String::from_utf8(bytes).context("download log utf-8")
}
