//! Opaque cursor and page envelope primitives shared by listing endpoints.
//!
//! Listing endpoints accept an optional cursor and return a [`Page`] whose
//! `next_cursor` continues the listing. The cursor encodes its position as
//! URL-safe base64 over a small JSON document so clients treat it as opaque
//! and the encoding can evolve without breaking them.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

/// Items returned per page when the caller does not say otherwise.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Errors raised when decoding a client-supplied cursor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CursorError {
    /// The cursor is not valid base64.
    #[error("cursor is not valid base64")]
    Encoding,
    /// The decoded cursor payload has an unexpected shape.
    #[error("cursor payload is malformed")]
    Payload,
}

#[derive(Debug, Serialize, Deserialize)]
struct CursorPayload {
    page: u32,
}

/// Opaque continuation token for a listing.
///
/// Pages are numbered from 1. The first page needs no cursor; every
/// subsequent page is reached through the `next_cursor` of its predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    page: u32,
}

impl Cursor {
    /// Cursor for the first page.
    #[must_use]
    pub const fn first() -> Self {
        Self { page: 1 }
    }

    /// Cursor for a specific 1-based page. Page 0 is clamped to 1.
    #[must_use]
    pub const fn at_page(page: u32) -> Self {
        Self {
            page: if page == 0 { 1 } else { page },
        }
    }

    /// The 1-based page this cursor points at.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Offset of the first item on this page for the given page size.
    #[must_use]
    pub const fn offset(&self, page_size: u32) -> u64 {
        (self.page as u64 - 1) * page_size as u64
    }

    /// Cursor for the page after this one.
    #[must_use]
    pub const fn next(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
        }
    }

    /// Encode the cursor into its wire form.
    #[must_use]
    pub fn encode(&self) -> String {
        let payload = CursorPayload { page: self.page };
        // Serialising a two-field struct of plain integers cannot fail.
        let json = serde_json::to_vec(&payload).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Decode a client-supplied cursor.
    ///
    /// # Errors
    /// Returns [`CursorError::Encoding`] for invalid base64 and
    /// [`CursorError::Payload`] when the decoded bytes are not a cursor
    /// document.
    pub fn decode(raw: &str) -> Result<Self, CursorError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(raw.trim())
            .map_err(|_| CursorError::Encoding)?;
        let payload: CursorPayload =
            serde_json::from_slice(&bytes).map_err(|_| CursorError::Payload)?;
        Ok(Self::at_page(payload.page))
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::first()
    }
}

/// One page of a listing plus continuation metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page, in listing order.
    pub items: Vec<T>,
    /// Total number of items across all pages.
    pub total: u64,
    /// Cursor for the next page; `None` when this is the last page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// Build a page, deriving `next_cursor` from the position and total.
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, cursor: Cursor, page_size: u32) -> Self {
        let consumed = cursor.offset(page_size) + items.len() as u64;
        let next_cursor = (consumed < total).then(|| cursor.next().encode());
        Self {
            items,
            total,
            next_cursor,
        }
    }

    /// Map the items of the page while keeping the envelope intact.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            next_cursor: self.next_cursor,
        }
    }
}
