// Plain-text floor roll calls:
//
//     YEAS - 3
//     Adams          Baker          Clark
//     NAYS - 1
//     Davis
//     ABSENT OR NOT VOTING - 0

use super::{build_vote, VoteContext};
use crate::error::ScrapeError;
use crate::schema::{Vote, VoteCategory};
use regex::{Captures, Regex};

const ROLL_CALL: &str =
    r"(?ms)YEAS -?\s?(\d+)(.*)NAYS -?\s?(\d+)(.*)ABSENT( OR NOT VOTING)? -?\s?(\d+)(.*)";
const NAME_SEPARATOR: &str = r"\s{2,}";

/// Compiled roll-call patterns, shared by every text vote of a run.
#[derive(Debug, Clone)]
pub struct TextVoteParser {
    roll_call: Regex,
    names: Regex,
}

impl TextVoteParser {
    pub fn new() -> Result<Self, ScrapeError> {
        Ok(Self {
            roll_call: Regex::new(ROLL_CALL)?,
            names: Regex::new(NAME_SEPARATOR)?,
        })
    }

    pub fn parse(&self, content: &str, ctx: &VoteContext<'_>) -> Result<Vote, ScrapeError> {
        let caps = self.roll_call.captures(content).ok_or_else(|| {
            ScrapeError::mismatch("text vote", format!("no roll call in {}", ctx.url))
        })?;

        let category = |count: usize, members: usize| -> Result<VoteCategory, ScrapeError> {
            Ok(VoteCategory {
                label: None,
                count: Some(count_at(&caps, count)?),
                members: split_names(&self.names, group(&caps, members)),
            })
        };
        let yes = category(1, 2)?;
        let no = category(3, 4)?;
        let other = category(6, 7)?;

        // a tie fails
        let passed = yes.count > no.count;
        Ok(build_vote(ctx, passed, [yes, no, other], None))
    }
}

fn group<'t>(caps: &Captures<'t>, index: usize) -> &'t str {
    caps.get(index).map_or("", |m| m.as_str())
}

fn count_at(caps: &Captures<'_>, index: usize) -> Result<u32, ScrapeError> {
    let raw = group(caps, index);
    raw.parse()
        .map_err(|_| ScrapeError::mismatch("text vote", format!("bad count {raw:?}")))
}

/// Names are separated by runs of two or more whitespace characters.
fn split_names(separator: &Regex, blob: &str) -> Vec<String> {
    separator
        .split(blob.trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
