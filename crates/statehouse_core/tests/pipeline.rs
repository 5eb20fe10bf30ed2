use statehouse_core::bill::scrape_bill;
use statehouse_core::config::ScraperConfig;
use statehouse_core::schema::{ActionType, Actor, BillType, Chamber};
use statehouse_core::{FetchError, MapFetcher, PageFetcher, ScrapeError};

const BILL_URL: &str = "https://le.utah.gov/~2015/bills/static/HB0012.html";
const STATUS_URL: &str = "https://le.utah.gov/~2015/status/hbillsta/HB0012.htm";

const BILL_PAGE: &str = r#"<html><body>
<h3>H.B. 12<br>Criminal Code Amendments -- Rep. Ray, Paul</h3>
<p>Introduced <a href="/~2015/bills/hbillint/HB0012.htm">HTML</a> <a href="/~2015/bills/hbillint/HB0012.pdf">PDF</a></p>
<a href="/~2015/status/hbillsta/HB0012.htm">Bill Status</a>
</body></html>"#;

const STATUS_PAGE: &str = r#"<html><body><table>
<tr><td><b>Date</b></td><td><b>Action</b></td><td><b>Location</b></td><td><b>Vote</b></td></tr>
<tr><td>1/26/2015</td><td>House/ 1st reading (Introduced)</td><td></td><td></td></tr>
<tr><td>1/27/2015</td><td>House/ to standing committee</td>
    <td><font><font><a href='#' onmouseover="writetxt('House Judiciary Committee')">HJUD</a></font></font></td><td></td></tr>
<tr><td>2/2/2015</td><td>House Judiciary Comm - Favorable Recommendation</td><td></td>
    <td><a href="/DynaBill/cvotes.jsp?voteid=101">Vote</a></td></tr>
<tr><td>2/5/2015</td><td>House/ passed 3rd reading</td><td></td>
    <td><a href="../../votes/hvote012.txt">Vote</a></td></tr>
<tr><td>2/20/2015</td><td>Senate/ passed 2nd reading</td><td></td>
    <td><a href="/DynaBill/svotes.jsp?voteid=355">Vote</a></td></tr>
<tr><td>2/23/2015</td><td>Senate/ 3rd reading</td><td></td>
    <td><a href="/DynaBill/svotes.jsp?voteid=360">Vote</a></td></tr>
<tr><td>3/20/2015</td><td>Governor Signed</td><td></td><td></td></tr>
</table></body></html>"#;

const COMMITTEE_VOTE: &str = r#"<html><body><b>House Judiciary Committee</b>
<table><tr>
  <td><b>Yeas</b> - 3<br>Adams<br>Baker<br>Clark</td>
  <td><b>Nays</b> - 1<br>Davis</td>
  <td><b>Absent</b> - 0</td>
</tr></table></body></html>"#;

const TEXT_VOTE: &str = "H.B. 12 Passed 3rd Reading
YEAS - 2
Adams          Baker
NAYS - 1
Clark
ABSENT OR NOT VOTING - 1
Davis
";

const SENATE_VOTE: &str = r#"<html><body><b>H.B. 12 Passed 2nd Reading</b>
<p><b>Yeas - 2</b></p><table><tr><td><font face="Arial">Evans</font></td><td><font face="Arial">Fox</font></td></tr></table>
<p><b>Nays - 0</b></p><table><tr></tr></table>
<p><b>Absent or not voting - 1</b></p><table><tr><td><font face="Arial">Grant</font></td></tr></table>
</body></html>"#;

const VOICE_VOTE: &str = "<html><body><b>H.B. 12 Passed on voice vote</b></body></html>";

fn fetcher() -> MapFetcher {
    MapFetcher::new()
        .with_page(BILL_URL, BILL_PAGE)
        .with_page(STATUS_URL, STATUS_PAGE)
        .with_page("https://le.utah.gov/DynaBill/cvotes.jsp?voteid=101", COMMITTEE_VOTE)
        .with_page("https://le.utah.gov/~2015/votes/hvote012.txt", TEXT_VOTE)
        .with_page("https://le.utah.gov/DynaBill/svotes.jsp?voteid=355", SENATE_VOTE)
        .with_page("https://le.utah.gov/DynaBill/svotes.jsp?voteid=360", VOICE_VOTE)
}

#[test]
fn scrapes_bill_with_every_vote_format() {
    let fetcher = fetcher();
    let config = ScraperConfig::default();
    let bill = scrape_bill(
        &fetcher,
        &config,
        "2015GS",
        Chamber::Lower,
        "Second Substitute H.B. 12",
        BILL_URL,
    )
    .unwrap();

    assert_eq!(bill.bill_id, "H.B. 12");
    assert_eq!(bill.bill_type, BillType::Bill);
    assert_eq!(bill.title, "Criminal Code Amendments");
    assert_eq!(bill.sponsors[0].name, "Rep. Ray, Paul");
    assert_eq!(bill.versions.len(), 2);
    assert_eq!(bill.sources, vec![BILL_URL, STATUS_URL]);

    let ids: Vec<u32> = bill.actions.iter().map(|a| a.sequence_id).collect();
    assert_eq!(ids, (1..=7).collect::<Vec<_>>());

    let committee = &bill.actions[2].votes[0];
    assert_eq!(bill.actions[2].types, vec![ActionType::CommitteePassedFavorable]);
    assert_eq!(bill.actions[2].actor, Actor::Lower);
    assert_eq!(committee.committee.as_deref(), Some("House Judiciary Committee"));
    assert_eq!((committee.yes_count, committee.no_count, committee.other_count), (3, 1, 0));

    let floor = &bill.actions[3].votes[0];
    assert_eq!(floor.ballots.yes, vec!["Adams", "Baker"]);
    assert_eq!(floor.ballots.other, vec!["Davis"]);
    assert!(floor.passed);

    let senate = &bill.actions[4].votes[0];
    assert_eq!(senate.chamber, "upper");
    assert_eq!(senate.ballots.yes, vec!["Evans", "Fox"]);
    assert_eq!(senate.no_count, 0);
    assert_eq!(senate.ballots.other, vec!["Grant"]);

    assert!(bill.actions[5].votes.is_empty(), "voice votes are not recorded");
    assert_eq!(bill.actions[6].actor, Actor::Executive);
    assert_eq!(bill.votes().count(), 3);

    assert_eq!(
        fetcher.requests(),
        vec![
            BILL_URL,
            STATUS_URL,
            "https://le.utah.gov/DynaBill/cvotes.jsp?voteid=101",
            "https://le.utah.gov/~2015/votes/hvote012.txt",
            "https://le.utah.gov/DynaBill/svotes.jsp?voteid=355",
            "https://le.utah.gov/DynaBill/svotes.jsp?voteid=360",
        ]
    );
}

#[test]
fn scraping_twice_gives_the_same_bill() {
    let fetcher = fetcher();
    let config = ScraperConfig::default();
    let scrape = || scrape_bill(&fetcher, &config, "2015GS", Chamber::Lower, "H.B. 12", BILL_URL);
    assert_eq!(scrape().unwrap(), scrape().unwrap());
}

#[test]
fn missing_vote_page_fails_only_that_bill() {
    struct Flaky(MapFetcher);

    impl PageFetcher for Flaky {
        fn fetch(&self, url: &str) -> Result<String, FetchError> {
            if url.ends_with(".txt") {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status: 503,
                });
            }
            self.0.fetch(url)
        }
    }

    let fetcher = Flaky(fetcher());
    let config = ScraperConfig::default();
    let err = scrape_bill(&fetcher, &config, "2015GS", Chamber::Lower, "H.B. 12", BILL_URL)
        .unwrap_err();
    assert!(matches!(err, ScrapeError::Fetch(FetchError::Status { status: 503, .. })));
}
