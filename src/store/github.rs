//! GitHub contents-API implementation of the content store.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use super::error::{StoreError, WireError};
use super::{Blob, ContentStore, VersionToken};

const API_ROOT: &str = "https://api.github.com";
const ACCEPT: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!("tallybot/", env!("CARGO_PKG_VERSION"));

/// Client for one repository's contents API.
#[derive(Debug, Clone)]
pub struct GithubStore {
    http: reqwest::Client,
    repo: String,
    token: String,
}

#[derive(Deserialize)]
struct ContentsResponse {
    content: String,
    sha: String,
}

#[derive(Serialize)]
struct PutRequest<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

impl GithubStore {
    /// `repo` is `owner/name`; `accept_invalid_certs` is the per-deployment
    /// trust override for restrictive intermediaries, never on by default.
    pub fn new(
        repo: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
        accept_invalid_certs: bool,
    ) -> Result<Self, StoreError> {
        let http = reqwest::ClientBuilder::new()
            .timeout(timeout)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()?;
        Ok(Self {
            http,
            repo: repo.into(),
            token: token.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{API_ROOT}/repos/{}/contents/{path}", self.repo)
    }
}

impl ContentStore for GithubStore {
    async fn fetch(&self, path: &str) -> Result<Option<Blob>, StoreError> {
        let resp = self
            .http
            .get(self.url(path))
            .bearer_auth(&self.token)
            .header("Accept", ACCEPT)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;
        match resp.status().as_u16() {
            200 => {
                let body: ContentsResponse = resp.json().await?;
                // The API line-wraps base64 content; strip the whitespace
                // before decoding.
                let compact: String = body
                    .content
                    .chars()
                    .filter(|c| !c.is_ascii_whitespace())
                    .collect();
                let bytes = STANDARD.decode(compact).map_err(WireError::from)?;
                Ok(Some(Blob {
                    bytes,
                    token: VersionToken::new(body.sha),
                }))
            }
            404 => Ok(None),
            status => Err(StoreError::Get(status)),
        }
    }

    async fn put(
        &self,
        path: &str,
        bytes: &[u8],
        message: &str,
        token: Option<&VersionToken>,
    ) -> Result<(), StoreError> {
        let body = PutRequest {
            message,
            content: STANDARD.encode(bytes),
            sha: token.map(VersionToken::as_str),
        };
        let resp = self
            .http
            .put(self.url(path))
            .bearer_auth(&self.token)
            .header("Accept", ACCEPT)
            .header("User-Agent", USER_AGENT)
            .json(&body)
            .send()
            .await?;
        match resp.status().as_u16() {
            200 | 201 => Ok(()),
            409 => Err(StoreError::Conflict),
            status => Err(StoreError::Put(status)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_targets_repo_contents() {
        let store = GithubStore::new(
            "acme/fund-site",
            "tok",
            Duration::from_secs(5),
            false,
        )
        .unwrap();
        assert_eq!(
            store.url("data.json"),
            "https://api.github.com/repos/acme/fund-site/contents/data.json"
        );
    }

    #[test]
    fn put_request_omits_sha_for_creation() {
        let req = PutRequest {
            message: "m",
            content: "YQ==".into(),
            sha: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("sha").is_none());

        let req = PutRequest {
            message: "m",
            content: "YQ==".into(),
            sha: Some("abc123"),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["sha"], "abc123");
    }
}
