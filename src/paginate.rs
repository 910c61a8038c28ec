//! Offset based cursor pagination over an ordered collection.
//!
//! A cursor is the decimal string of a zero-based index into the collection.
//! The empty cursor means "start at the beginning". Every edge carries the
//! cursor of its own position and `PageInfo::end_cursor` points at the first
//! item that was not returned. Feeding that cursor back in yields the
//! following page.
//!
//! Nothing in here knows about GraphQL or HTTP: callers pass a slice, a page
//! size and a cursor string and get plain data back.

use std::fmt;

use serde::Deserialize;

use crate::prelude::*;


/// Opaque resume position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub(crate) struct Cursor(String);

impl Cursor {
    /// The cursor pointing at the start of the collection, `""`.
    pub(crate) fn start() -> Self {
        Self(String::new())
    }

    pub(crate) fn from_offset(offset: usize) -> Self {
        Self(offset.to_string())
    }

    /// Decodes a cursor string into an offset. Only the empty string and
    /// strings of ASCII digits are valid. Numbers too large for `usize` are
    /// past the end of every collection and decode to `usize::MAX`.
    pub(crate) fn decode(raw: &str) -> Result<usize, InvalidCursor> {
        if raw.is_empty() {
            return Ok(0);
        }

        if !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidCursor(raw.to_owned()));
        }

        // Only overflow is left as parse error.
        Ok(raw.parse().unwrap_or(usize::MAX))
    }
}

impl From<Cursor> for String {
    fn from(value: Cursor) -> Self {
        value.0
    }
}

/// The given cursor is neither empty nor a non-negative integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InvalidCursor(pub(crate) String);

impl fmt::Display for InvalidCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a valid cursor (expected a non-negative integer)", self.0)
    }
}

impl std::error::Error for InvalidCursor {}

/// What to do with a cursor that cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum CursorPolicy {
    /// Reject the request with `InvalidCursor`.
    Strict,

    /// Start from the beginning, as if no cursor was given.
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Edge<T> {
    pub(crate) node: T,
    pub(crate) cursor: Cursor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PageInfo {
    pub(crate) has_next_page: bool,

    /// Cursor of the first item after this page, or `""` if there is none.
    pub(crate) end_cursor: Cursor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Page<T> {
    pub(crate) edges: Vec<Edge<T>>,
    pub(crate) page_info: PageInfo,
}

impl<T> Page<T> {
    /// Maps every node while keeping cursors and page info.
    pub(crate) fn map<U>(self, mut f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            edges: self.edges.into_iter()
                .map(|Edge { node, cursor }| Edge { node: f(node), cursor })
                .collect(),
            page_info: self.page_info,
        }
    }
}

/// Returns the page of at most `page_size` items starting at the position
/// `cursor` refers to. Page sizes `<= 0` result in an empty page; offsets at
/// or past the end of `items` do as well.
pub(crate) fn paginate<'a, T>(
    items: &'a [T],
    page_size: i32,
    cursor: &str,
) -> Result<Page<&'a T>, InvalidCursor> {
    let offset = Cursor::decode(cursor)?;
    Ok(page_at(items, page_size, offset))
}

/// Like [`paginate`], but invalid cursors are handled according to `policy`.
pub(crate) fn paginate_with_policy<'a, T>(
    items: &'a [T],
    page_size: i32,
    cursor: &str,
    policy: CursorPolicy,
) -> Result<Page<&'a T>, InvalidCursor> {
    match (paginate(items, page_size, cursor), policy) {
        (Err(e), CursorPolicy::Lenient) => {
            debug!("{e}, starting from the beginning instead");
            Ok(page_at(items, page_size, 0))
        }
        (res, _) => res,
    }
}

fn page_at<T>(items: &[T], page_size: i32, offset: usize) -> Page<&T> {
    let len = items.len();
    let page_size = usize::try_from(page_size).unwrap_or(0);
    let end = offset.saturating_add(page_size);

    let start = offset.min(len);
    let edges = items[start..end.min(len)]
        .iter()
        .enumerate()
        .map(|(i, node)| Edge { node, cursor: Cursor::from_offset(start + i) })
        .collect();

    let has_next_page = end < len;
    let end_cursor = if has_next_page { Cursor::from_offset(end) } else { Cursor::start() };

    Page {
        edges,
        page_info: PageInfo { has_next_page, end_cursor },
    }
}
