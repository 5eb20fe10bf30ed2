use super::{build_vote, VoteContext};
use crate::error::ScrapeError;
use crate::html;
use crate::schema::{Vote, VoteCategory};
use scraper::Html;
use std::collections::HashMap;

const YEAS: &str = "Yeas";
const NAYS: &str = "Nays";
const ABSENT: &str = "Absent or not voting";

/// Parses a floor vote page: after the description heading, every bold
/// `"<label> - <count>"` heading describes the table at the same position.
pub fn parse(doc: &Html, ctx: &VoteContext<'_>, passed: bool) -> Result<Vote, ScrapeError> {
    let bold = html::selector("b")?;
    let tables = html::selector("table")?;
    let member = html::selector("font[face='Arial']")?;

    let mut categories: HashMap<String, VoteCategory> = HashMap::new();
    for (heading, table) in doc.select(&bold).skip(1).zip(doc.select(&tables)) {
        let text = html::text_content(heading);
        let Some((label, count)) = text.split_once('-') else {
            continue;
        };
        let (label, count) = (label.trim(), count.trim());
        let count: u32 = count.parse().map_err(|_| {
            ScrapeError::mismatch("html vote", format!("bad count in heading {text:?}"))
        })?;

        let members = table
            .select(&member)
            .map(|font| html::text_content(font).trim().to_string())
            .collect();

        categories.insert(
            label.to_string(),
            VoteCategory {
                label: Some(label.to_string()),
                count: Some(count),
                members,
            },
        );
    }

    let mut take = |label: &str| {
        categories.remove(label).ok_or_else(|| {
            ScrapeError::mismatch("html vote", format!("no {label:?} category on {}", ctx.url))
        })
    };
    let yes = take(YEAS)?;
    let no = take(NAYS)?;
    let other = take(ABSENT)?;

    Ok(build_vote(ctx, passed, [yes, no, other], None))
}
