//! Offset cursors threaded through successive search-result requests.
//!
//! The server keeps no session state: the page echoes `next_page` and
//! `previous_page` back in its form, and the next request carries them along
//! with the button that was pressed.

use serde::Serialize;

use crate::data::PAGE_SIZE;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageCursors {
    pub next: u32,
    pub previous: u32,
}

/// Which button produced the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    First,
    Next(PageCursors),
    Previous(PageCursors),
}

impl Navigation {
    /// Offset to request from upstream.
    pub fn offset(self) -> u32 {
        match self {
            Self::First => 0,
            Self::Next(cursors) => cursors.next,
            Self::Previous(cursors) => cursors.previous.saturating_sub(PAGE_SIZE),
        }
    }

    /// Cursors to hand back once upstream reported `results_shown` entries.
    /// Every subtraction floors at zero.
    pub fn advance(self, results_shown: u32) -> PageCursors {
        match self {
            Self::First => PageCursors {
                next: results_shown.saturating_add(1),
                previous: 0,
            },
            Self::Next(cursors) => PageCursors {
                next: cursors.next.saturating_add(results_shown),
                previous: cursors.previous.saturating_add(PAGE_SIZE),
            },
            Self::Previous(cursors) => PageCursors {
                next: cursors.next.saturating_sub(results_shown),
                previous: cursors.previous.saturating_sub(PAGE_SIZE),
            },
        }
    }
}
