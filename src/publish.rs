//! Publishing sinks: a GitHub contents-API upload (create-or-update-by-path)
//! and a local TRMNL redirect descriptor pointing at the raw image URL.
//! Both are best-effort — a failed publish leaves the local artifacts intact.

use crate::config::Config;
use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Local};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const GITHUB_API: &str = "https://api.github.com";
const COMMIT_MESSAGE: &str = "Update schedule card";

/// The descriptor the TRMNL redirect plugin polls.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RedirectDescriptor {
    pub url: String,
    pub filename: String,
    pub refresh_rate: u32,
}

pub fn write_redirect_descriptor(cfg: &Config) -> Result<()> {
    let descriptor = build_redirect_descriptor(cfg, Local::now());
    let path = Path::new(&cfg.redirect_path);
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(&descriptor).context("serializing descriptor")?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    info!("wrote redirect descriptor {}", cfg.redirect_path);
    Ok(())
}

fn build_redirect_descriptor(cfg: &Config, now: DateTime<Local>) -> RedirectDescriptor {
    let github = &cfg.github;
    let stem = Path::new(&cfg.image_path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("schedule");
    RedirectDescriptor {
        url: format!(
            "https://raw.githubusercontent.com/{}/{}/{}/{}",
            github.owner, github.repo, github.branch, cfg.image_path
        ),
        // Timestamped so the display treats every generation as a fresh file.
        filename: format!("{stem}_{}.png", now.format("%Y%m%d%H%M%S")),
        refresh_rate: cfg.refresh_rate_secs,
    }
}

/// Upload the rendered image to the configured repository. Skipped (not an
/// error) when credentials or repo coordinates are still placeholders.
pub async fn upload_image(client: &reqwest::Client, cfg: &Config) -> Result<()> {
    if !cfg.github.upload_enabled() {
        info!("github upload skipped: credentials or repository not configured");
        return Ok(());
    }
    upload_image_to(client, cfg, GITHUB_API).await
}

async fn upload_image_to(client: &reqwest::Client, cfg: &Config, api_base: &str) -> Result<()> {
    let github = &cfg.github;
    let token = github.token.as_deref().unwrap_or_default();
    let bytes = fs::read(&cfg.image_path)
        .with_context(|| format!("reading {}", cfg.image_path))?;

    let url = format!(
        "{api_base}/repos/{}/{}/contents/{}",
        github.owner, github.repo, cfg.image_path
    );
    let existing_sha = fetch_existing_sha(client, &url, &github.branch, token).await?;

    let body = UpdateFileRequest {
        message: COMMIT_MESSAGE,
        content: BASE64.encode(&bytes),
        branch: &github.branch,
        sha: existing_sha,
    };
    client
        .put(&url)
        .bearer_auth(token)
        .header(reqwest::header::USER_AGENT, "trmnl-mlb")
        .json(&body)
        .send()
        .await
        .context("github upload request failed")?
        .error_for_status()
        .context("github upload rejected")?;
    info!(
        "uploaded {} to {}/{}@{}",
        cfg.image_path, github.owner, github.repo, github.branch
    );
    Ok(())
}

/// Current blob sha for the path, required by the contents API to update an
/// existing file. 404 means the file does not exist yet (create).
async fn fetch_existing_sha(
    client: &reqwest::Client,
    url: &str,
    branch: &str,
    token: &str,
) -> Result<Option<String>> {
    let response = client
        .get(url)
        .query(&[("ref", branch)])
        .bearer_auth(token)
        .header(reqwest::header::USER_AGENT, "trmnl-mlb")
        .send()
        .await
        .context("github contents lookup failed")?;
    if response.status() == reqwest::StatusCode::NOT_FOUND {
        return Ok(None);
    }
    let contents: ContentsResponse = response
        .error_for_status()
        .context("github contents lookup rejected")?
        .json()
        .await
        .context("github contents response malformed")?;
    Ok(contents.sha)
}

#[derive(Debug, Deserialize, Default)]
struct ContentsResponse {
    sha: Option<String>,
}

#[derive(Debug, Serialize)]
struct UpdateFileRequest<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, GithubConfig};
    use chrono::TimeZone;

    fn test_config(owner: &str, repo: &str, token: Option<&str>) -> Config {
        Config {
            team_id: 138,
            team_name: "St. Louis Cardinals".into(),
            days_ahead: 4,
            display_tz: chrono_tz::America::Chicago,
            canvas_width: 800,
            canvas_height: 480,
            logo_url: String::new(),
            logo_size: (130, 130),
            font_regular_candidates: vec![],
            font_bold_candidates: vec![],
            image_path: "trmnl_images/cardinals_schedule.png".into(),
            redirect_path: "trmnl_redirect.json".into(),
            refresh_rate_secs: 21_600,
            github: GithubConfig {
                owner: owner.into(),
                repo: repo.into(),
                branch: "main".into(),
                token: token.map(Into::into),
            },
        }
    }

    #[test]
    fn descriptor_points_at_the_raw_image_url() {
        let cfg = test_config("holynakamoto", "trmnl-mlb", Some("t"));
        let now = Local.with_ymd_and_hms(2024, 5, 20, 18, 10, 0).unwrap();
        let descriptor = build_redirect_descriptor(&cfg, now);
        assert_eq!(
            descriptor.url,
            "https://raw.githubusercontent.com/holynakamoto/trmnl-mlb/main/trmnl_images/cardinals_schedule.png"
        );
        assert_eq!(descriptor.filename, "cardinals_schedule_20240520181000.png");
        assert_eq!(descriptor.refresh_rate, 21_600);
    }

    #[test]
    fn descriptor_serializes_with_the_expected_keys() {
        let cfg = test_config("o", "r", None);
        let descriptor = build_redirect_descriptor(&cfg, Local::now());
        let value: serde_json::Value = serde_json::from_str(&serde_json::to_string(&descriptor).unwrap()).unwrap();
        assert!(value.get("url").is_some());
        assert!(value.get("filename").is_some());
        assert!(value["refresh_rate"].is_u64());
    }

    #[tokio::test]
    async fn upload_with_placeholders_is_a_no_op() {
        let cfg = test_config(crate::config::PLACEHOLDER_OWNER, "repo", Some("t"));
        let client = reqwest::Client::new();
        // No server involved: the placeholder check short-circuits.
        upload_image(&client, &cfg).await.unwrap();
    }

    #[tokio::test]
    async fn upload_updates_an_existing_file_with_its_sha() {
        let mut server = mockito::Server::new_async().await;
        let mut cfg = test_config("owner", "repo", Some("token"));

        // Point the image path at a real temp file.
        let dir = std::env::temp_dir().join("trmnl-mlb-publish-test");
        fs::create_dir_all(&dir).unwrap();
        let image = dir.join("card.png");
        fs::write(&image, b"png-bytes").unwrap();
        cfg.image_path = image.to_str().unwrap().to_owned();

        let contents_path = format!("/repos/owner/repo/contents/{}", cfg.image_path);
        let lookup = server
            .mock("GET", mockito::Matcher::Regex("^/repos/owner/repo/contents".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"sha": "abc123"}"#)
            .create_async()
            .await;
        let update = server
            .mock("PUT", contents_path.as_str())
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "message": "Update schedule card",
                "branch": "main",
                "sha": "abc123"
            })))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = reqwest::Client::new();
        upload_image_to(&client, &cfg, &server.url()).await.unwrap();
        lookup.assert_async().await;
        update.assert_async().await;
        fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn missing_remote_file_is_created_without_a_sha() {
        let mut server = mockito::Server::new_async().await;
        let _lookup = server
            .mock("GET", mockito::Matcher::Regex("^/repos/o/r/contents".into()))
            .with_status(404)
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let sha = fetch_existing_sha(&client, &format!("{}/repos/o/r/contents/p.png", server.url()), "main", "t")
            .await
            .unwrap();
        assert!(sha.is_none());
    }
}
