// Committee votes are a single table row with one cell per ballot kind:
//
//     <b>House Judiciary Committee</b>
//     <table><tr>
//       <td><b>Yeas</b> - 2<br>Adams<br>Baker</td>
//       <td><b>Nays</b> - 1<br>Clark</td>
//       <td><b>Absent</b> - 0</td>
//     </tr></table>
//
// Unanimous votes drop the nay/absent cells.

use super::{build_vote, VoteContext};
use crate::error::ScrapeError;
use crate::html;
use crate::schema::{Vote, VoteCategory};
use scraper::{ElementRef, Html};
use tracing::debug;

const CONTEXT: &str = "committee vote";

pub fn parse(doc: &Html, ctx: &VoteContext<'_>) -> Result<Vote, ScrapeError> {
    let bold = html::selector("b")?;
    let tables = html::selector("table")?;
    let rows = html::selector("tr")?;
    let cells = html::selector("td")?;

    let committee = doc
        .select(&bold)
        .next()
        .map(|b| html::clean_text(&html::text_content(b)))
        .ok_or_else(|| {
            ScrapeError::mismatch(CONTEXT, format!("no committee name on {}", ctx.url))
        })?;

    let row = doc
        .select(&tables)
        .next()
        .and_then(|table| table.select(&rows).next())
        .ok_or_else(|| ScrapeError::mismatch(CONTEXT, format!("no vote table on {}", ctx.url)))?;
    let blocks: Vec<ElementRef<'_>> = row.select(&cells).collect();

    let (yes, no, other) = match blocks.as_slice() {
        [] => return Err(ScrapeError::mismatch(CONTEXT, "vote row has no cells")),
        [yes, no, other, ..] => (Some(*yes), Some(*no), Some(*other)),
        [yes, ..] => (Some(*yes), None, None),
    };

    let yes = block(yes)?;
    let no = block(no)?;
    let other = block(other)?;
    debug!(committee = %committee, yes = ?yes.count, no = ?no.count, "committee vote");

    let passed = yes.count.unwrap_or(0) > no.count.unwrap_or(0);
    Ok(build_vote(ctx, passed, [yes, no, other], Some(committee)))
}

/// An absent cell stands for a ballot kind nobody cast.
fn block(cell: Option<ElementRef<'_>>) -> Result<VoteCategory, ScrapeError> {
    let Some(cell) = cell else {
        return Ok(VoteCategory::default());
    };

    let label = html::child_elements(cell, "b")
        .into_iter()
        .next()
        .map(|b| html::text_content(b).trim().to_string())
        .ok_or_else(|| ScrapeError::mismatch(CONTEXT, "ballot cell without a bold label"))?;

    let bold = html::selector("b")?;
    let first_bold = cell
        .select(&bold)
        .next()
        .ok_or_else(|| ScrapeError::mismatch(CONTEXT, "ballot cell without a bold label"))?;
    let raw_count = html::tail_text(first_bold)
        .ok_or_else(|| ScrapeError::mismatch(CONTEXT, format!("no count after {label:?}")))?;
    let count = raw_count.replace('-', "");
    let count: u32 = count.trim().parse().map_err(|_| {
        ScrapeError::mismatch(CONTEXT, format!("bad count {raw_count:?} after {label:?}"))
    })?;

    let br = html::selector("br")?;
    let members = cell
        .select(&br)
        .filter_map(html::tail_text)
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();

    Ok(VoteCategory {
        label: Some(label),
        count: Some(count),
        members,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Actor;
    use chrono::NaiveDate;

    fn ctx(actor: &Actor) -> VoteContext<'_> {
        VoteContext {
            actor,
            date: NaiveDate::from_ymd_opt(2015, 2, 2).unwrap(),
            motion: "House Comm - Favorable Recommendation",
            url: "https://le.utah.gov/DynaBill/cvotes.jsp?sessionid=2015GS&voteid=101",
            sequence_id: 3,
        }
    }

    #[test]
    fn three_column_vote() {
        let doc = Html::parse_document(
            "<html><body><b>House Judiciary Committee</b>
            <table><tr>
              <td><b>Yeas</b> - 2<br>Adams<br> Baker </td>
              <td><b>Nays</b> - 1<br>Clark</td>
              <td><b>Absent</b> - 1<br>Davis<br></td>
            </tr></table></body></html>",
        );
        let actor = Actor::Lower;
        let vote = parse(&doc, &ctx(&actor)).unwrap();

        assert_eq!((vote.yes_count, vote.no_count, vote.other_count), (2, 1, 1));
        assert_eq!(vote.ballots.yes, vec!["Adams", "Baker"]);
        assert_eq!(vote.ballots.no, vec!["Clark"]);
        assert_eq!(vote.ballots.other, vec!["Davis"]);
        assert!(vote.passed);
        assert_eq!(vote.committee.as_deref(), Some("House Judiciary Committee"));
        assert_eq!(vote.chamber, "lower");
    }

    #[test]
    fn yes_only_vote_defaults_other_blocks() {
        let doc = Html::parse_document(
            "<html><body><b>Senate Education Committee</b>
            <table><tr><td><b>Yeas</b> - 3<br>Adams<br>Baker<br>Clark</td></tr></table>
            </body></html>",
        );
        let actor = Actor::Upper;
        let vote = parse(&doc, &ctx(&actor)).unwrap();

        assert_eq!((vote.yes_count, vote.no_count, vote.other_count), (3, 0, 0));
        assert!(vote.ballots.no.is_empty());
        assert!(vote.ballots.other.is_empty());
        assert!(vote.passed);
    }

    #[test]
    fn absent_block_has_no_type_or_count() {
        assert_eq!(block(None).unwrap(), VoteCategory::default());
        assert_eq!(VoteCategory::default().label, None);
        assert_eq!(VoteCategory::default().count, None);
    }

    #[test]
    fn two_cells_count_as_yes_only() {
        let doc = Html::parse_document(
            "<html><body><b>Senate Rules Committee</b>
            <table><tr><td><b>Yeas</b> - 1<br>Adams</td><td>&nbsp;</td></tr></table>
            </body></html>",
        );
        let actor = Actor::Upper;
        let vote = parse(&doc, &ctx(&actor)).unwrap();
        assert_eq!((vote.yes_count, vote.no_count), (1, 0));
    }

    #[test]
    fn zero_yeas_fail() {
        let doc = Html::parse_document(
            "<html><body><b>House Rules Committee</b>
            <table><tr>
              <td><b>Yeas</b> - 0</td>
              <td><b>Nays</b> - 0</td>
              <td><b>Absent</b> - 4<br>A<br>B<br>C<br>D</td>
            </tr></table></body></html>",
        );
        let actor = Actor::Lower;
        let vote = parse(&doc, &ctx(&actor)).unwrap();
        assert!(!vote.passed);
        assert_eq!(vote.other_count, 4);
    }

    #[test]
    fn cell_without_count_is_a_format_mismatch() {
        let doc = Html::parse_document(
            "<html><body><b>House Rules Committee</b>
            <table><tr><td><b>Yeas</b><br>Adams</td></tr></table></body></html>",
        );
        let actor = Actor::Lower;
        assert!(matches!(
            parse(&doc, &ctx(&actor)),
            Err(ScrapeError::FormatMismatch { .. })
        ));
    }

    #[test]
    fn page_without_table_is_a_format_mismatch() {
        let doc = Html::parse_document("<html><body><b>House Rules Committee</b></body></html>");
        let actor = Actor::Lower;
        assert!(matches!(
            parse(&doc, &ctx(&actor)),
            Err(ScrapeError::FormatMismatch { .. })
        ));
    }
}
