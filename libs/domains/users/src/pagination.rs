//! Offset pagination.
//!
//! A page token is the decimal offset of the next page. An empty token is the
//! first page; an empty next token means there is nothing after this page.

use std::num::ParseIntError;

/// Bounds of one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: u64,
    pub offset: u64,
}

/// Largest offset the store accepts as a bind parameter.
const MAX_OFFSET: u64 = i64::MAX as u64;

#[derive(Debug, thiserror::Error)]
pub enum PageTokenError {
    #[error("not a decimal offset: {0}")]
    NotANumber(#[from] ParseIntError),
    #[error("offset {0} is out of range")]
    OutOfRange(u64),
}

pub fn parse_page_token(token: &str) -> Result<u64, PageTokenError> {
    if token.is_empty() {
        return Ok(0);
    }
    let offset: u64 = token.parse()?;
    if offset > MAX_OFFSET {
        return Err(PageTokenError::OutOfRange(offset));
    }
    Ok(offset)
}

/// Token for the page after `page`, given how many rows it returned.
///
/// A full page may be followed by more rows, so its token points past it. A
/// short page ends the listing.
pub fn next_page_token(page: PageRequest, returned: usize) -> String {
    if returned as u64 == page.limit {
        page.offset.saturating_add(page.limit).to_string()
    } else {
        String::new()
    }
}
