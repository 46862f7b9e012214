//! Cursor-based (relay style) pagination types.
//!
//! Lists are paged over a sequence ordered newest first. Cursors are
//! opaque URL-safe base64 strings wrapping the row id.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

/// Default page size when neither `first` nor `last` is given.
const DEFAULT_PAGE_SIZE: usize = 20;
/// Maximum page size.
const MAX_PAGE_SIZE: usize = 100;

/// Pagination arguments for a connection field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionArgs {
    /// Take at most this many items from the front of the window.
    #[serde(default)]
    pub first: Option<usize>,
    /// Only items after this cursor.
    #[serde(default)]
    pub after: Option<String>,
    /// Take at most this many items from the back of the window.
    #[serde(default)]
    pub last: Option<usize>,
    /// Only items before this cursor.
    #[serde(default)]
    pub before: Option<String>,
}

impl ConnectionArgs {
    /// Forward paging from the start of the list.
    pub fn first(n: usize) -> Self {
        Self {
            first: Some(n),
            ..Self::default()
        }
    }

    /// Sets the `after` cursor.
    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    /// Sets the `before` cursor.
    pub fn before(mut self, cursor: impl Into<String>) -> Self {
        self.before = Some(cursor.into());
        self
    }
}

/// Opaque cursor codec.
pub struct Cursor;

impl Cursor {
    /// Encodes a row id as an opaque cursor.
    pub fn encode(id: i64) -> String {
        URL_SAFE_NO_PAD.encode(id.to_string())
    }

    /// Decodes a cursor produced by [`Cursor::encode`].
    pub fn decode(cursor: &str) -> AppResult<i64> {
        let bytes = URL_SAFE_NO_PAD
            .decode(cursor)
            .map_err(|_| AppError::validation("Malformed cursor"))?;
        std::str::from_utf8(&bytes)
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .ok_or_else(|| AppError::validation("Malformed cursor"))
    }
}

/// One item of a page plus its cursor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge<T> {
    /// Cursor pointing at this item.
    pub cursor: String,
    /// The item.
    pub node: T,
}

/// Whether more items exist on either side of the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Items exist after the last edge.
    pub has_next_page: bool,
    /// Items exist before the first edge.
    pub has_previous_page: bool,
}

/// A page of items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection<T> {
    /// The items on this page.
    pub edges: Vec<Edge<T>>,
    /// Paging flags.
    pub page_info: PageInfo,
}

impl<T> Connection<T> {
    /// Slices `items` (ordered newest first, by descending `key`) into a page.
    pub fn paginate<F>(items: Vec<T>, args: &ConnectionArgs, key: F) -> AppResult<Self>
    where
        F: Fn(&T) -> i64,
    {
        let len = items.len();
        let mut start = 0;
        let mut end = len;

        if let Some(after) = args.after.as_deref() {
            let after = Cursor::decode(after)?;
            start = items.iter().position(|i| key(i) < after).unwrap_or(len);
        }
        if let Some(before) = args.before.as_deref() {
            let before = Cursor::decode(before)?;
            end = items
                .iter()
                .position(|i| key(i) <= before)
                .unwrap_or(len)
                .max(start);
        }

        match (args.first, args.last) {
            (None, None) => end = end.min(start + DEFAULT_PAGE_SIZE),
            (first, last) => {
                if let Some(n) = first {
                    end = end.min(start + n.min(MAX_PAGE_SIZE));
                }
                if let Some(n) = last {
                    start = start.max(end.saturating_sub(n.min(MAX_PAGE_SIZE)));
                }
            }
        }

        let edges = items
            .into_iter()
            .skip(start)
            .take(end - start)
            .map(|node| Edge {
                cursor: Cursor::encode(key(&node)),
                node,
            })
            .collect();

        Ok(Self {
            edges,
            page_info: PageInfo {
                has_next_page: end < len,
                has_previous_page: start > 0,
            },
        })
    }

    /// Returns the page items without their cursors.
    pub fn into_nodes(self) -> Vec<T> {
        self.edges.into_iter().map(|e| e.node).collect()
    }
}
