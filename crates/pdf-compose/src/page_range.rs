//! Page selection
//!
//! Resolves a page range against a document's page count. Expressions are
//! parsed leniently: a token that is malformed or out of range is dropped on
//! its own and never invalidates the rest of the expression.

use crate::types::PageRange;

/// Resolve a page range into sorted, de-duplicated 0-based page indices.
///
/// A `Specific` range with a blank expression selects every page.
pub fn select_pages(range: &PageRange, total_pages: usize) -> Vec<usize> {
    match range {
        PageRange::Specific(expr) if !expr.trim().is_empty() => {
            parse_page_numbers(expr, total_pages)
        }
        _ => (0..total_pages).collect(),
    }
}

/// Parse a 1-based page-number expression such as `"1,3,5-10"`.
///
/// Grammar: `expr := token (',' token)*`, `token := INT | INT '-' INT`.
/// A token is kept only when every bound is a positive integer within
/// `1..=total_pages` and `start <= end`.
pub fn parse_page_numbers(expr: &str, total_pages: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = expr
        .split(',')
        .filter_map(|token| parse_token(token, total_pages))
        .flat_map(|(start, end)| (start - 1)..end)
        .collect();

    indices.sort_unstable();
    indices.dedup();
    indices
}

/// Parse one token into an inclusive 1-based `(start, end)` pair.
fn parse_token(token: &str, total_pages: usize) -> Option<(usize, usize)> {
    let token = token.trim();
    let (start, end) = match token.split_once('-') {
        Some((start, end)) => (parse_page(start)?, parse_page(end)?),
        None => {
            let page = parse_page(token)?;
            (page, page)
        }
    };

    (start >= 1 && start <= end && end <= total_pages).then_some((start, end))
}

fn parse_page(text: &str) -> Option<usize> {
    let text = text.trim();
    // usize::from_str accepts a leading '+', page numbers don't
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
