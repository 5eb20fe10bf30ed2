//! Turns a bill's status page into its ordered action list.
//!
//! Status rows look like
//!
//! ```text
//! | 1/27/2015 | House/ to standing committee | <a onmouseover="writetxt('...')"> | <a href="vote.txt"> |
//! ```
//!
//! Each row becomes one [`Action`] with the next sequence id; links in the fourth
//! cell are resolved to votes and attached to that action.

use crate::classify::Classifier;
use crate::config::VoteConfig;
use crate::error::ScrapeError;
use crate::fetch::PageFetcher;
use crate::html;
use crate::schema::{Action, Chamber};
use crate::votes::{VoteContext, VoteDispatcher};
use chrono::NaiveDate;
use scraper::{ElementRef, Html};
use tracing::debug;

const DATE_FORMAT: &str = "%m/%d/%Y";

pub struct StatusTimeline<'a, F: PageFetcher + ?Sized> {
    classifier: Classifier,
    votes: VoteDispatcher<'a, F>,
}

impl<'a, F: PageFetcher + ?Sized> StatusTimeline<'a, F> {
    pub fn new(fetcher: &'a F, config: &'a VoteConfig) -> Result<Self, ScrapeError> {
        Ok(Self {
            classifier: Classifier::new()?,
            votes: VoteDispatcher::new(fetcher, config)?,
        })
    }

    /// Walks the status table top to bottom. `page_url` is used to resolve
    /// relative vote links.
    pub fn build(
        &self,
        page: &Html,
        page_url: &str,
        home: Chamber,
    ) -> Result<Vec<Action>, ScrapeError> {
        let rows = html::selector("table > tbody > tr, table > thead > tr, table > tr")?;
        let links = html::selector("a")?;
        let committee_link = html::selector("font > font > a")?;

        let mut actions = Vec::new();
        let mut sequence_id = 0u32;

        for row in page.select(&rows).skip(1) {
            sequence_id += 1;
            let cells = html::cells(row);

            let date = parse_date(cells.first().copied())?;
            let raw_action = cells
                .get(1)
                .map(|cell| html::text_content(*cell))
                .ok_or_else(|| ScrapeError::mismatch("status row", "missing action cell"))?;

            let hover = cells
                .get(2)
                .and_then(|cell| cell.select(&committee_link).next())
                .and_then(|link| link.value().attr("onmouseover"));
            let classified = self.classifier.classify(&raw_action, home, hover);
            debug!(
                sequence_id,
                actor = %classified.actor,
                action = %classified.description,
                "status row"
            );

            let mut votes = Vec::new();
            if let Some(cell) = cells.get(3) {
                for href in cell.select(&links).filter_map(|a| a.value().attr("href")) {
                    let url = html::absolutize(page_url, href);
                    let ctx = VoteContext {
                        actor: &classified.actor,
                        date,
                        motion: &classified.description,
                        url: &url,
                        sequence_id,
                    };
                    if let Some(vote) = self.votes.fetch_vote(&ctx)? {
                        votes.push(vote);
                    }
                }
            }

            actions.push(Action {
                actor: classified.actor,
                description: classified.description,
                date,
                types: classified.types,
                sequence_id,
                committee: classified.committee,
                votes,
            });
        }

        Ok(actions)
    }
}

fn parse_date(cell: Option<ElementRef<'_>>) -> Result<NaiveDate, ScrapeError> {
    let raw = cell
        .map(html::text_content)
        .ok_or_else(|| ScrapeError::mismatch("status row", "missing date cell"))?;
    let raw = html::clean_text(&raw);
    NaiveDate::parse_from_str(&raw, DATE_FORMAT)
        .map_err(|err| ScrapeError::mismatch("status row", format!("bad date {raw:?}: {err}")))
}
