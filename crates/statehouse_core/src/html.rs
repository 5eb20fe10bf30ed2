// Small helpers over `scraper` for the text-node lookups the site pages need.

use crate::error::ScrapeError;
use scraper::{ElementRef, Selector};
use url::Url;

const NON_BREAKING_SPACE: char = '\u{00A0}';

pub fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|err| ScrapeError::InvalidSelector {
        selector: css.to_string(),
        message: format!("{err:?}"),
    })
}

/// All text below `el`, concatenated in document order.
pub fn text_content(el: ElementRef<'_>) -> String {
    el.text().collect()
}

pub fn clean_text(raw: &str) -> String {
    raw.replace(NON_BREAKING_SPACE, " ").trim().to_string()
}

/// Text directly following `el` up to the next element.
pub fn tail_text(el: ElementRef<'_>) -> Option<String> {
    let sibling = el.next_sibling()?;
    sibling.value().as_text().map(|text| text.to_string())
}

/// Text directly preceding `el` back to the previous element.
pub fn lead_text(el: ElementRef<'_>) -> Option<String> {
    let sibling = el.prev_sibling()?;
    sibling.value().as_text().map(|text| text.to_string())
}

pub fn next_element(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.next_siblings().find_map(ElementRef::wrap)
}

/// Direct `<td>` children of a row; cells of nested tables are not included.
pub fn cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "td")
        .collect()
}

/// Direct children of `el` with the given tag name.
pub fn child_elements<'a>(el: ElementRef<'a>, name: &str) -> Vec<ElementRef<'a>> {
    el.children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == name)
        .collect()
}

/// Resolves `href` against the page it was found on. Unresolvable links are kept as written.
pub fn absolutize(base: &str, href: &str) -> String {
    Url::parse(base)
        .and_then(|base| base.join(href))
        .map(|url| url.to_string())
        .unwrap_or_else(|_| href.to_string())
}
