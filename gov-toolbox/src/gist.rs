use serde_json::json;
use std::thread::sleep;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

pub const GITHUB_API_URL: &str = "https://api.github.com";

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("gist update failed after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },
}

/// Everything needed to patch one file of an existing Gist. Credentials are
/// read from the environment by the CLI and passed in here explicitly.
#[derive(Clone, Debug)]
pub struct GistTarget {
    pub api_url: String,
    pub gist_id: String,
    pub token: String,
    pub filename: String,
    pub description: String,
    pub retries: u32,
    pub retry_delay: Duration,
}

impl GistTarget {
    pub fn new(gist_id: String, token: String, filename: String, description: String) -> Self {
        Self {
            api_url: GITHUB_API_URL.to_string(),
            gist_id,
            token,
            filename,
            description,
            retries: 3,
            retry_delay: Duration::from_secs(5),
        }
    }

    pub fn payload(&self, content: &str) -> serde_json::Value {
        let mut files = serde_json::Map::new();
        files.insert(self.filename.clone(), json!({ "content": content }));
        json!({
            "description": self.description,
            "files": files,
        })
    }
}

/// Replaces the target file's content, retrying a bounded number of times on
/// failure.
pub fn update_gist(target: &GistTarget, content: &str) -> Result<(), Error> {
    let url = format!("{}/gists/{}", target.api_url, target.gist_id);
    let payload = target.payload(content);
    let client = reqwest::blocking::Client::new();

    let attempts = target.retries.max(1);
    for attempt in 1..=attempts {
        let result = client
            .patch(&url)
            .header("Authorization", format!("token {}", target.token))
            .header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", "gov-toolbox")
            .json(&payload)
            .send()
            .and_then(|response| response.error_for_status());

        match result {
            Ok(_) => {
                info!(gist_id = %target.gist_id, "gist updated");
                return Ok(());
            }
            Err(err) if attempt < attempts => {
                warn!(attempt, %err, "gist update failed, retrying");
                sleep(target.retry_delay);
            }
            Err(err) => {
                warn!(attempt, %err, "gist update failed, giving up");
                return Err(Error::RetriesExhausted { attempts });
            }
        }
    }
    unreachable!("retry loop always returns")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_nests_content_under_filename() {
        let target = GistTarget::new(
            "abc123".to_string(),
            "token".to_string(),
            "governance-report.json".to_string(),
            "SPO governance tallies".to_string(),
        );
        let payload = target.payload("{}");
        assert_eq!(payload["description"], "SPO governance tallies");
        assert_eq!(payload["files"]["governance-report.json"]["content"], "{}");
    }
}
