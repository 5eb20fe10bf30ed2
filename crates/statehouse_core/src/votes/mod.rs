//! Roll-call extraction for the three vote record layouts the site publishes.
//!
//! * `.txt` links are fixed-format floor roll calls ([`text`]).
//! * other links are HTML pages; the first bold heading tells whether the page is a
//!   floor vote laid out as heading/table pairs ([`table`]), a compact committee
//!   vote ([`committee`]), or a page with nothing to record.

pub mod committee;
pub mod table;
pub mod text;

use crate::config::VoteConfig;
use crate::error::ScrapeError;
use crate::fetch::PageFetcher;
use crate::html;
use crate::schema::{Actor, Ballots, Vote, VoteCategory};
use chrono::NaiveDate;
use scraper::Html;
use text::TextVoteParser;
use tracing::{debug, info, warn};

/// Everything a parser needs to know about the action a vote belongs to.
#[derive(Debug, Clone)]
pub struct VoteContext<'a> {
    pub actor: &'a Actor,
    pub date: NaiveDate,
    pub motion: &'a str,
    pub url: &'a str,
    pub sequence_id: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteFormat {
    Text,
    Html,
}

impl VoteFormat {
    pub fn for_url(url: &str) -> Self {
        if url.ends_with("txt") {
            Self::Text
        } else {
            Self::Html
        }
    }
}

/// What the description heading of an HTML vote page says about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    VoiceVote,
    Committee,
    Recorded { passed: bool },
    Banner,
}

pub fn page_kind(description: &str, config: &VoteConfig) -> Result<PageKind, ScrapeError> {
    if description.contains(&config.voice_vote_marker) {
        return Ok(PageKind::VoiceVote);
    }
    if description
        .to_lowercase()
        .contains(&config.committee_marker.to_lowercase())
    {
        return Ok(PageKind::Committee);
    }
    if description.contains(&config.passed_marker) {
        Ok(PageKind::Recorded { passed: true })
    } else if description.contains(&config.failed_marker) {
        Ok(PageKind::Recorded { passed: false })
    } else if description.contains(&config.banner) {
        Ok(PageKind::Banner)
    } else {
        Err(ScrapeError::UnrecognizedFormat {
            description: description.to_string(),
        })
    }
}

pub struct VoteDispatcher<'a, F: PageFetcher + ?Sized> {
    fetcher: &'a F,
    config: &'a VoteConfig,
    text: TextVoteParser,
}

impl<'a, F: PageFetcher + ?Sized> VoteDispatcher<'a, F> {
    pub fn new(fetcher: &'a F, config: &'a VoteConfig) -> Result<Self, ScrapeError> {
        Ok(Self {
            fetcher,
            config,
            text: TextVoteParser::new()?,
        })
    }

    /// Fetches the vote behind `ctx.url`. `Ok(None)` means the page records no
    /// roll call (voice votes, banner-only pages).
    pub fn fetch_vote(&self, ctx: &VoteContext<'_>) -> Result<Option<Vote>, ScrapeError> {
        let body = self.fetcher.fetch(ctx.url)?;
        match VoteFormat::for_url(ctx.url) {
            VoteFormat::Text => self.text.parse(&body, ctx).map(Some),
            VoteFormat::Html => parse_html_vote(&Html::parse_document(&body), ctx, self.config),
        }
    }
}

pub fn parse_html_vote(
    doc: &Html,
    ctx: &VoteContext<'_>,
    config: &VoteConfig,
) -> Result<Option<Vote>, ScrapeError> {
    let bold = html::selector("b")?;
    let description = doc
        .select(&bold)
        .next()
        .map(html::text_content)
        .ok_or_else(|| {
            ScrapeError::mismatch("html vote", format!("no description heading on {}", ctx.url))
        })?;

    match page_kind(&description, config)? {
        PageKind::VoiceVote => {
            debug!(url = ctx.url, "voice vote, nothing recorded");
            Ok(None)
        }
        PageKind::Banner => {
            debug!(url = ctx.url, "vote page without vote content");
            Ok(None)
        }
        PageKind::Committee => committee::parse(doc, ctx).map(Some),
        PageKind::Recorded { passed } => table::parse(doc, ctx, passed).map(Some),
    }
}

/// Folds the parsed categories into a [`Vote`], splitting the actor into a
/// chamber or a free-text location.
pub(crate) fn build_vote(
    ctx: &VoteContext<'_>,
    passed: bool,
    [yes, no, other]: [VoteCategory; 3],
    committee: Option<String>,
) -> Vote {
    for (label, category) in [("yes", &yes), ("no", &no), ("other", &other)] {
        if let Some(count) = category.count {
            if count as usize != category.members.len() {
                warn!(
                    url = ctx.url,
                    category = label,
                    count,
                    members = category.members.len(),
                    "vote count differs from member list"
                );
            }
        }
    }

    let (chamber, location) = match ctx.actor.chamber() {
        Some(chamber) => (chamber.to_string(), String::new()),
        None => (String::new(), ctx.actor.to_string()),
    };

    let vote = Vote {
        chamber,
        location,
        date: ctx.date,
        motion: ctx.motion.to_string(),
        passed,
        yes_count: yes.count.unwrap_or(0),
        no_count: no.count.unwrap_or(0),
        other_count: other.count.unwrap_or(0),
        ballots: Ballots {
            yes: yes.members,
            no: no.members,
            other: other.members,
        },
        committee,
        sources: vec![ctx.url.to_string()],
        sequence_id: ctx.sequence_id,
    };
    info!(
        url = ctx.url,
        motion = %vote.motion,
        passed = vote.passed,
        yes = vote.yes_count,
        no = vote.no_count,
        other = vote.other_count,
        "recorded vote"
    );
    vote
}
