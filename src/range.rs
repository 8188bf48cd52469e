//! Page range expressions.
//!
//! An expression is a comma-separated list of tokens, each either a single
//! page (`"5"`) or an inclusive range (`"1-3"`). Whitespace around tokens
//! and around the hyphen is ignored and empty tokens are skipped, so
//! `" 1 - 3 ,, 5 "` is the same selection as `"1-3,5"`.
//!
//! [`parse`] keeps the ranges in the order they were written. Callers that
//! need a flat page set go through [`expand`], and [`pages_to_expression`]
//! turns such a set back into the shortest expression.
//!
//! # Examples
//!
//! ```
//! use pdfdeck::range::{self, PageRange};
//!
//! let ranges = range::parse("3, 1-2", 5).unwrap();
//! assert_eq!(ranges, vec![PageRange::single(3), PageRange::new(1, 2).unwrap()]);
//!
//! let pages: Vec<u32> = range::expand(&ranges).into_iter().collect();
//! assert_eq!(pages, vec![1, 2, 3]);
//! assert_eq!(range::pages_to_expression(&pages), "1-3");
//! ```

use std::collections::BTreeSet;
use std::fmt;

use crate::error::{PdfDeckError, Result};

/// An inclusive, 1-based range of pages with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRange {
    start: u32,
    end: u32,
}

impl PageRange {
    /// Create a range, returning `None` unless `1 <= start <= end`.
    pub fn new(start: u32, end: u32) -> Option<Self> {
        (start >= 1 && start <= end).then_some(Self { start, end })
    }

    /// Create a range covering a single page.
    ///
    /// # Panics
    ///
    /// Panics if `page` is zero.
    pub fn single(page: u32) -> Self {
        assert!(page >= 1, "page numbers are 1-based");
        Self {
            start: page,
            end: page,
        }
    }

    /// First page of the range.
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Last page of the range (inclusive).
    pub fn end(&self) -> u32 {
        self.end
    }

    /// Number of pages covered.
    pub fn len(&self) -> u32 {
        self.end - self.start + 1
    }

    /// Always false; a range covers at least one page.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Check if a page falls inside this range.
    pub fn contains(&self, page: u32) -> bool {
        (self.start..=self.end).contains(&page)
    }

    /// Iterate over the pages of this range in ascending order.
    pub fn pages(&self) -> impl Iterator<Item = u32> {
        self.start..=self.end
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Parse a page range expression against a document with `page_count` pages.
///
/// # Errors
///
/// - [`PdfDeckError::EmptyExpression`] if the expression is blank or
///   consists only of separators.
/// - [`PdfDeckError::InvalidRange`] for the first token that is not a valid
///   page or range within `1..=page_count`.
pub fn parse(expression: &str, page_count: u32) -> Result<Vec<PageRange>> {
    if expression.trim().is_empty() {
        return Err(PdfDeckError::EmptyExpression);
    }

    let ranges = expression
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| parse_token(token, page_count))
        .collect::<Result<Vec<_>>>()?;

    if ranges.is_empty() {
        return Err(PdfDeckError::EmptyExpression);
    }

    Ok(ranges)
}

fn parse_token(token: &str, page_count: u32) -> Result<PageRange> {
    let invalid = || PdfDeckError::invalid_range(token);

    let (start, end) = match token.split_once('-') {
        Some((start, end)) => (
            parse_page_number(start).ok_or_else(invalid)?,
            parse_page_number(end).ok_or_else(invalid)?,
        ),
        None => {
            let page = parse_page_number(token).ok_or_else(invalid)?;
            (page, page)
        }
    };

    if end > page_count {
        return Err(invalid());
    }

    PageRange::new(start, end).ok_or_else(invalid)
}

/// Digits only: no sign, no embedded spaces, no second hyphen.
fn parse_page_number(s: &str) -> Option<u32> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Flatten ranges into a sorted set of page numbers.
///
/// Overlapping and repeated ranges collapse.
pub fn expand(ranges: &[PageRange]) -> BTreeSet<u32> {
    ranges.iter().flat_map(PageRange::pages).collect()
}

/// Produce the shortest expression for an ascending list of distinct pages.
///
/// Runs of consecutive pages collapse to `N-M`; everything else stays a
/// single number. An empty list yields an empty string.
///
/// ```
/// use pdfdeck::range::pages_to_expression;
///
/// assert_eq!(pages_to_expression(&[1, 2, 3, 5, 7, 8]), "1-3,5,7-8");
/// ```
pub fn pages_to_expression(pages: &[u32]) -> String {
    let mut runs: Vec<PageRange> = Vec::new();

    for &page in pages {
        match runs.last_mut() {
            Some(run) if page == run.end + 1 => run.end = page,
            _ => runs.push(PageRange {
                start: page,
                end: page,
            }),
        }
    }

    runs.iter()
        .map(PageRange::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Rewrite an expression in its canonical form.
///
/// `"3, 1-2, 2"` becomes `"1-3"`.
pub fn normalize(expression: &str, page_count: u32) -> Result<String> {
    let pages: Vec<u32> = expand(&parse(expression, page_count)?).into_iter().collect();
    Ok(pages_to_expression(&pages))
}

/// Pages to highlight for a selection.
///
/// A blank selection highlights nothing and is not an error; anything else
/// must parse.
pub fn selected_pages(expression: &str, page_count: u32) -> Result<BTreeSet<u32>> {
    if expression.trim().is_empty() {
        return Ok(BTreeSet::new());
    }
    Ok(expand(&parse(expression, page_count)?))
}

/// Add `page` to a selection, or remove it if already selected, and return
/// the canonical expression.
///
/// A selection that does not currently parse is treated as empty.
pub fn toggle_page(expression: &str, page: u32, page_count: u32) -> Result<String> {
    if page == 0 || page > page_count {
        return Err(PdfDeckError::invalid_range(page.to_string()));
    }

    let mut pages = selected_pages(expression, page_count).unwrap_or_default();
    if !pages.remove(&page) {
        pages.insert(page);
    }

    let pages: Vec<u32> = pages.into_iter().collect();
    Ok(pages_to_expression(&pages))
}
