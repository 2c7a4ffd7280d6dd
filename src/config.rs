use chrono_tz::Tz;
use log::warn;
use std::env;
use std::str::FromStr;

/// Placeholder defaults matching the CI workflow variables. Leaving them
/// unset intentionally disables the GitHub upload step.
pub const PLACEHOLDER_OWNER: &str = "YOUR_GITHUB_USERNAME";
pub const PLACEHOLDER_REPO: &str = "YOUR_REPOSITORY_NAME";

const DEFAULT_TEAM_ID: u32 = 138; // St. Louis Cardinals
const DEFAULT_TEAM_NAME: &str = "St. Louis Cardinals";
const DEFAULT_DAYS_AHEAD: u32 = 4;
const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Chicago;
const DEFAULT_LOGO_URL: &str = "https://a.espncdn.com/i/teamlogos/mlb/500/stl.png";
const DEFAULT_IMAGE_PATH: &str = "trmnl_images/cardinals_schedule.png";
const DEFAULT_REDIRECT_PATH: &str = "trmnl_redirect.json";
const DEFAULT_REFRESH_RATE_SECS: u32 = 21_600; // 6 hours

/// Well-known font locations, tried in order after any configured override.
const FONT_REGULAR_CANDIDATES: [&str; 3] = [
    "LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/liberation2/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
];
const FONT_BOLD_CANDIDATES: [&str; 3] = [
    "LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation2/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
];

/// Run configuration, built once in `main` from the environment and passed
/// into each pipeline stage. No ambient globals.
#[derive(Debug, Clone)]
pub struct Config {
    pub team_id: u32,
    pub team_name: String,
    pub days_ahead: u32,
    pub display_tz: Tz,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub logo_url: String,
    pub logo_size: (u32, u32),
    pub font_regular_candidates: Vec<String>,
    pub font_bold_candidates: Vec<String>,
    /// Local save path; doubles as the path within the publish repository.
    pub image_path: String,
    pub redirect_path: String,
    pub refresh_rate_secs: u32,
    pub github: GithubConfig,
}

#[derive(Debug, Clone)]
pub struct GithubConfig {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub token: Option<String>,
}

impl GithubConfig {
    /// Upload runs only when a token is present and both repo coordinates
    /// have been changed from their placeholders.
    pub fn upload_enabled(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
            && self.owner != PLACEHOLDER_OWNER
            && self.repo != PLACEHOLDER_REPO
    }
}

impl Config {
    pub fn from_env() -> Self {
        let owner = env::var("GITHUB_REPOSITORY_OWNER").unwrap_or_else(|_| PLACEHOLDER_OWNER.to_owned());
        let repo = env::var("GITHUB_REPOSITORY")
            .map(|full| repo_name(&full))
            .unwrap_or_else(|_| PLACEHOLDER_REPO.to_owned());

        Self {
            team_id: env_parse("TRMNL_TEAM_ID", DEFAULT_TEAM_ID),
            team_name: env::var("TRMNL_TEAM_NAME").unwrap_or_else(|_| DEFAULT_TEAM_NAME.to_owned()),
            days_ahead: env_parse("TRMNL_DAYS_AHEAD", DEFAULT_DAYS_AHEAD),
            display_tz: env_parse("TRMNL_TIMEZONE", DEFAULT_TIMEZONE),
            canvas_width: 800,
            canvas_height: 480,
            logo_url: env::var("TRMNL_LOGO_URL").unwrap_or_else(|_| DEFAULT_LOGO_URL.to_owned()),
            logo_size: (130, 130),
            font_regular_candidates: font_candidates("TRMNL_FONT_REGULAR", &FONT_REGULAR_CANDIDATES),
            font_bold_candidates: font_candidates("TRMNL_FONT_BOLD", &FONT_BOLD_CANDIDATES),
            image_path: env::var("TRMNL_IMAGE_PATH").unwrap_or_else(|_| DEFAULT_IMAGE_PATH.to_owned()),
            redirect_path: env::var("TRMNL_REDIRECT_PATH")
                .unwrap_or_else(|_| DEFAULT_REDIRECT_PATH.to_owned()),
            refresh_rate_secs: env_parse("TRMNL_REFRESH_RATE", DEFAULT_REFRESH_RATE_SECS),
            github: GithubConfig {
                owner,
                repo,
                branch: env::var("TRMNL_BRANCH").unwrap_or_else(|_| "main".to_owned()),
                token: env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()),
            },
        }
    }
}

/// "owner/name" → "name"; Actions sets GITHUB_REPOSITORY in that form.
fn repo_name(full: &str) -> String {
    full.rsplit('/').next().unwrap_or(full).to_owned()
}

fn env_parse<T: FromStr + Copy>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("invalid {key}={raw}, using default");
            default
        }),
        Err(_) => default,
    }
}

fn font_candidates(key: &str, defaults: &[&str]) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();
    if let Ok(configured) = env::var(key)
        && !configured.is_empty()
    {
        candidates.push(configured);
    }
    candidates.extend(defaults.iter().map(|p| (*p).to_owned()));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn github(owner: &str, repo: &str, token: Option<&str>) -> GithubConfig {
        GithubConfig {
            owner: owner.into(),
            repo: repo.into(),
            branch: "main".into(),
            token: token.map(Into::into),
        }
    }

    #[test]
    fn repo_name_strips_the_owner_prefix() {
        assert_eq!(repo_name("holynakamoto/trmnl-mlb"), "trmnl-mlb");
        assert_eq!(repo_name("bare-name"), "bare-name");
    }

    #[test]
    fn placeholders_disable_the_upload() {
        assert!(!github(PLACEHOLDER_OWNER, "repo", Some("t")).upload_enabled());
        assert!(!github("owner", PLACEHOLDER_REPO, Some("t")).upload_enabled());
        assert!(!github("owner", "repo", None).upload_enabled());
        assert!(!github("owner", "repo", Some("")).upload_enabled());
        assert!(github("owner", "repo", Some("t")).upload_enabled());
    }
}
