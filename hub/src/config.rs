use std::env;
use std::path::PathBuf;

/// Hub configuration derived from environment variables.
///
/// `PORT` is the platform-provided port and keeps its bare name.
#[derive(Debug, Clone)]
pub struct HubConfig {
    pub bind: String,
    pub port: u16,

    // ── Data files ─────────────────────────────────────────────────
    pub data_path: PathBuf,
    pub asset_metadata_path: PathBuf,
    pub static_dir: PathBuf,

    // ── Download log ───────────────────────────────────────────────
    /// `None` ⇒ the remote log is skipped.
    pub github_token: Option<String>,
    /// Base URL of the GitHub REST API.
    pub download_log_api: String,
    /// `owner/name` of the repository holding the log file.
    pub download_log_repo: String,
    pub download_log_path: String,
    pub download_log_timeout_ms: u64,
}

fn env_str(name: &str, default: &str) -> String {
    env_opt(name).unwrap_or_else(|| default.to_string())
}

fn env_opt(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_u16(name: &str, default: u16) -> u16 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_path(name: &str, default: &str) -> PathBuf {
    PathBuf::from(env_str(name, default))
}

impl HubConfig {
    pub fn from_env() -> Self {
        Self {
            bind: env_str("CZ_BIND", "0.0.0.0"),
            port: env_u16("PORT", 8051),
            data_path: env_path("CZ_DATA_PATH", "data/full_data.csv"),
            asset_metadata_path: env_path(
                "CZ_ASSET_METADATA",
                "data/reference/asset-metadata.csv",
            ),
            static_dir: env_path("CZ_STATIC_DIR", "frontend/dist"),
            github_token: env_opt("GITHUB_TOKEN"),
            download_log_api: env_str("CZ_DOWNLOAD_LOG_API", "https://api.github.com"),
            download_log_repo: env_str(
                "CZ_DOWNLOAD_LOG_REPO",
                "emigiupponi/asymmetric-cryptoization",
            ),
            download_log_path: env_str("CZ_DOWNLOAD_LOG_PATH", "downloads.log"),
            download_log_timeout_ms: env_u64("CZ_DOWNLOAD_LOG_TIMEOUT_MS", 10_000),
        }
    }
}
