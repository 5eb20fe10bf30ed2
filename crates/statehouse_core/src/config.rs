use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct ScraperConfig {
    pub site: SiteConfig,
    pub fetch: FetchConfig,
    pub votes: VoteConfig,
    pub bills: BillConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://le.utah.gov".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
    pub retries: u32,
    /// Body substrings that mark a transient server-side failure page.
    pub reject_markers: Vec<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("statehouse/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
            retries: 3,
            reject_markers: vec![
                "com.microsoft.jdbc.base.BaseSQLException".to_string(),
                "java.sql.SQLException".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VoteConfig {
    pub voice_vote_marker: String,
    /// Matched case-insensitively.
    pub committee_marker: String,
    pub passed_marker: String,
    pub failed_marker: String,
    /// Heading the site shows on vote pages that carry no vote.
    pub banner: String,
}

impl Default for VoteConfig {
    fn default() -> Self {
        Self {
            voice_vote_marker: "on voice vote".to_string(),
            committee_marker: "committee".to_string(),
            passed_marker: "Passed".to_string(),
            failed_marker: "Failed".to_string(),
            banner: "UTAH STATE LEGISLATURE".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BillConfig {
    /// Stripped from listed bill ids; substitute pages share the original's id.
    pub substitutions: Vec<String>,
}

impl Default for BillConfig {
    fn default() -> Self {
        let substitutions = [
            "Second Substitute",
            "Third Substitute",
            "Fourth Substitute",
            "Fifth Substitute",
            "Sixth Substitute",
            "Seventh Substitute",
            "Eighth Substitute",
            "Ninth Substitute",
            "Substitute",
        ];
        Self {
            substitutions: substitutions.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ScraperFile {
    site: SiteConfig,
    fetch: FetchConfig,
    votes: VoteConfig,
}

#[derive(Debug, Clone, Deserialize)]
struct SubstitutionsFile {
    substitutions: Vec<String>,
}

impl ScraperConfig {
    /// Reads `scraper.toml` and `substitutions.yaml` from `path`.
    /// A missing `substitutions.yaml` keeps the built-in list.
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let scraper_path = path.join("scraper.toml");
        let scraper_str = fs::read_to_string(&scraper_path)
            .with_context(|| format!("reading {}", scraper_path.display()))?;
        let file: ScraperFile = toml::from_str(&scraper_str)
            .with_context(|| format!("parsing {}", scraper_path.display()))?;

        let substitutions_path = path.join("substitutions.yaml");
        let bills = if substitutions_path.exists() {
            let raw = fs::read_to_string(&substitutions_path)
                .with_context(|| format!("reading {}", substitutions_path.display()))?;
            let parsed: SubstitutionsFile = serde_yaml::from_str(&raw)
                .with_context(|| format!("parsing {}", substitutions_path.display()))?;
            BillConfig {
                substitutions: parsed.substitutions,
            }
        } else {
            BillConfig::default()
        };

        Ok(Self {
            site: file.site,
            fetch: file.fetch,
            votes: file.votes,
            bills,
        })
    }
}
