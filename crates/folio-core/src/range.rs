// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page-range resolution — turns a user-typed expression such as "1-3, 7, 12-15"
// into the ascending, de-duplicated, zero-based page indices a tool acts on.
//
// Grammar:
//
//   expr    := term (',' term)*
//   term    := INTEGER | INTEGER '-' INTEGER
//   INTEGER := one or more ASCII digits
//
// Parsing is best-effort: a malformed or out-of-range term is skipped and
// recorded in `PageSelection::rejected`, it never aborts the whole expression.
// An empty expression selects every page.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::RangeInclusive;

use tracing::warn;

/// Why a single term of a page-range expression was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The term (or one side of a range) is not a plain base-10 integer.
    NotANumber,
    /// Page 0 was named; numbering is 1-based.
    ZeroPage,
    /// A page number past the end of the document. Ranges are not clamped.
    BeyondLastPage { page: usize, total: usize },
    /// `start > end`. Ranges are not swapped.
    ReversedRange { start: usize, end: usize },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotANumber => write!(f, "not a page number"),
            Self::ZeroPage => write!(f, "page 0 is invalid (pages start at 1)"),
            Self::BeyondLastPage { page, total } => {
                write!(f, "page {page} exceeds document page count ({total})")
            }
            Self::ReversedRange { start, end } => {
                write!(f, "range {start}-{end} runs backwards")
            }
        }
    }
}

/// A skipped term together with the reason it was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedTerm {
    /// The trimmed term as the user typed it.
    pub term: String,
    pub reason: RejectReason,
}

impl fmt::Display for RejectedTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}': {}", self.term, self.reason)
    }
}

/// The resolved outcome of a page-range expression.
///
/// `indices` is always ascending, unique, and within `0..total_pages`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSelection {
    indices: Vec<usize>,
    rejected: Vec<RejectedTerm>,
}

impl PageSelection {
    /// Resolve `expression` against a document of `total_pages` pages.
    pub fn parse(expression: &str, total_pages: usize) -> Self {
        if expression.trim().is_empty() {
            return Self::all(total_pages);
        }

        let mut selected = BTreeSet::new();
        let mut rejected = Vec::new();

        for term in expression.split(',').map(str::trim) {
            if term.is_empty() {
                continue;
            }

            match resolve_term(term, total_pages) {
                Ok(pages) => selected.extend(pages),
                Err(reason) => {
                    warn!(term, %reason, "ignoring invalid page range term");
                    rejected.push(RejectedTerm {
                        term: term.to_string(),
                        reason,
                    });
                }
            }
        }

        Self {
            indices: selected.into_iter().collect(),
            rejected,
        }
    }

    /// Every page of a `total_pages` document.
    pub fn all(total_pages: usize) -> Self {
        Self {
            indices: (0..total_pages).collect(),
            rejected: Vec::new(),
        }
    }

    /// Selected zero-based indices, ascending.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }

    /// Terms that were skipped, in the order they appeared.
    pub fn rejected(&self) -> &[RejectedTerm] {
        &self.rejected
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.binary_search(&index).is_ok()
    }

    /// Zero-based indices in `0..total_pages` that are *not* selected.
    pub fn complement(&self, total_pages: usize) -> Vec<usize> {
        (0..total_pages)
            .filter(|index| !self.contains(*index))
            .collect()
    }
}

/// Resolve `expression` to zero-based page indices, discarding diagnostics.
///
/// An empty or whitespace-only expression selects all pages.
pub fn resolve(expression: &str, total_pages: usize) -> Vec<usize> {
    PageSelection::parse(expression, total_pages).into_indices()
}

/// Resolve `expression` as an explicit page *order*: terms keep their
/// position and repeats are kept, so "3, 1-2, 1" yields `[2, 0, 1, 0]`.
///
/// Uses the same term grammar and rejection rules as [`PageSelection::parse`],
/// but an empty expression yields an empty order rather than every page.
pub fn resolve_sequence(expression: &str, total_pages: usize) -> (Vec<usize>, Vec<RejectedTerm>) {
    let mut order = Vec::new();
    let mut rejected = Vec::new();

    for term in expression.split(',').map(str::trim) {
        if term.is_empty() {
            continue;
        }

        match resolve_term(term, total_pages) {
            Ok(pages) => order.extend(pages),
            Err(reason) => {
                warn!(term, %reason, "ignoring invalid page order term");
                rejected.push(RejectedTerm {
                    term: term.to_string(),
                    reason,
                });
            }
        }
    }

    (order, rejected)
}

/// Parse a single non-negative page number made of ASCII digits only.
///
/// Unlike a range term, zero is accepted here: callers such as blank-page
/// insertion use 0 to mean "before the first page".
pub fn parse_page_number(text: &str) -> Option<usize> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn resolve_term(term: &str, total_pages: usize) -> Result<RangeInclusive<usize>, RejectReason> {
    match term.split_once('-') {
        Some((start, end)) => {
            let start = parse_integer(start.trim())?;
            let end = parse_integer(end.trim())?;

            if start == 0 || end == 0 {
                return Err(RejectReason::ZeroPage);
            }
            if end > total_pages {
                return Err(RejectReason::BeyondLastPage {
                    page: end,
                    total: total_pages,
                });
            }
            if start > end {
                return Err(RejectReason::ReversedRange { start, end });
            }

            Ok(start - 1..=end - 1)
        }
        None => {
            let page = parse_integer(term)?;

            if page == 0 {
                return Err(RejectReason::ZeroPage);
            }
            if page > total_pages {
                return Err(RejectReason::BeyondLastPage {
                    page,
                    total: total_pages,
                });
            }

            Ok(page - 1..=page - 1)
        }
    }
}

/// Digits only; no sign, no exponent. Digit strings too long for `usize`
/// saturate so they fall out as "beyond last page" rather than "not a number".
fn parse_integer(text: &str) -> Result<usize, RejectReason> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RejectReason::NotANumber);
    }
    Ok(text.parse().unwrap_or(usize::MAX))
}
