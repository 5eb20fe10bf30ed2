use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::fetch::PageFetcher;
use crate::html;
use crate::schema::{Bill, BillDocument, BillType, BillVersion, Chamber, Sponsor};
use crate::timeline::StatusTimeline;
use scraper::Html;
use tracing::{info, warn};

const CONTEXT: &str = "bill page";

/// Fields read from a bill's landing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillPage {
    pub title: String,
    pub primary_sponsor: String,
    pub versions: Vec<BillVersion>,
    pub documents: Vec<BillDocument>,
    pub subjects: Vec<String>,
    pub status_url: String,
}

pub fn parse_bill_page(doc: &Html, page_url: &str) -> Result<BillPage, ScrapeError> {
    let header_break = html::selector("h3 > br")?;
    let header = doc
        .select(&header_break)
        .next()
        .and_then(html::tail_text)
        .ok_or_else(|| ScrapeError::mismatch(CONTEXT, "no title header"))?;
    let header = header.replace('\u{00A0}', " ");
    let (title, sponsor) = header
        .split_once(" -- ")
        .ok_or_else(|| {
            ScrapeError::mismatch(CONTEXT, format!("header without sponsor: {header:?}"))
        })?;

    let links = html::selector("a[href]")?;
    let mut versions = Vec::new();
    let mut documents = Vec::new();
    let mut subjects = Vec::new();
    let mut status_url = None;

    for link in doc.select(&links) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let text = html::text_content(link);

        if href.contains("bills/") && text == "HTML" {
            let Some(name) = html::lead_text(link).map(|name| html::clean_text(&name)) else {
                warn!(href, "version link without a name, skipping");
                continue;
            };
            versions.push(BillVersion {
                name: name.clone(),
                url: html::absolutize(page_url, href),
                mimetype: "text/html".to_string(),
            });
            if let Some(next) = html::next_element(link) {
                let next_text = html::text_content(next);
                if let (Some(pdf_href), "PDF") = (next.value().attr("href"), next_text.as_str()) {
                    versions.push(BillVersion {
                        name,
                        url: html::absolutize(page_url, pdf_href),
                        mimetype: "application/pdf".to_string(),
                    });
                }
            }
        } else if href.contains("fnotes") && text == "HTML" {
            documents.push(BillDocument {
                name: "Fiscal Note".to_string(),
                url: html::absolutize(page_url, href),
            });
        }

        if href.contains("RelatedBill") {
            subjects.push(html::clean_text(&text));
        }
        if status_url.is_none() && href.contains("billsta") {
            status_url = Some(html::absolutize(page_url, href));
        }
    }

    Ok(BillPage {
        title: title.trim().to_string(),
        primary_sponsor: sponsor.trim().to_string(),
        versions,
        documents,
        subjects,
        status_url: status_url.ok_or_else(|| ScrapeError::mismatch(CONTEXT, "no status link"))?,
    })
}

/// Strips substitute markers so substitutes share the original bill's id.
pub fn normalize_bill_id(raw: &str, substitutions: &[String]) -> String {
    let mut id = raw.to_string();
    for flag in substitutions {
        if id.contains(flag.as_str()) {
            id = id.replace(flag.as_str(), " ");
        }
    }
    id.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn bill_type(bill_id: &str) -> Result<BillType, ScrapeError> {
    const PREFIXES: &[(&str, BillType)] = &[
        ("H.B.", BillType::Bill),
        ("S.B.", BillType::Bill),
        ("H.R.", BillType::Resolution),
        ("S.R.", BillType::Resolution),
        ("H.C.R.", BillType::ConcurrentResolution),
        ("S.C.R.", BillType::ConcurrentResolution),
        ("H.J.R.", BillType::JointResolution),
        ("S.J.R.", BillType::JointResolution),
    ];
    PREFIXES
        .iter()
        .find(|(prefix, _)| bill_id.starts_with(prefix))
        .map(|(_, kind)| *kind)
        .ok_or_else(|| ScrapeError::mismatch(CONTEXT, format!("unknown bill type for {bill_id:?}")))
}

/// Scrapes one bill: landing page, status page and every linked vote.
pub fn scrape_bill<F: PageFetcher + ?Sized>(
    fetcher: &F,
    config: &ScraperConfig,
    session: &str,
    chamber: Chamber,
    listed_id: &str,
    url: &str,
) -> Result<Bill, ScrapeError> {
    let body = fetcher.fetch(url)?;
    let page = parse_bill_page(&Html::parse_document(&body), url)?;

    let bill_id = normalize_bill_id(listed_id, &config.bills.substitutions);
    let bill_type = bill_type(&bill_id)?;

    let status_body = fetcher.fetch(&page.status_url)?;
    let status = Html::parse_document(&status_body);
    let actions =
        StatusTimeline::new(fetcher, &config.votes)?.build(&status, &page.status_url, chamber)?;

    info!(
        session,
        bill_id = %bill_id,
        actions = actions.len(),
        votes = actions.iter().map(|a| a.votes.len()).sum::<usize>(),
        "scraped bill"
    );

    Ok(Bill {
        session: session.to_string(),
        chamber,
        bill_id,
        title: page.title,
        bill_type,
        sponsors: vec![Sponsor {
            role: "primary".to_string(),
            name: page.primary_sponsor,
        }],
        versions: page.versions,
        documents: page.documents,
        subjects: page.subjects,
        sources: vec![url.to_string(), page.status_url],
        actions,
    })
}
