use std::fmt::{Display, Formatter};

/// Identifies one filter callback of one statement.
///
/// Evaluators append handles into the match sink; the engine uses them to
/// route the event to the interested statements. Handles are ordered by
/// statement first so a sorted match list groups callbacks per statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FilterHandle {
    statement_id: u64,
    filter_id: u32,
}

impl FilterHandle {
    pub const fn new(statement_id: u64, filter_id: u32) -> Self {
        FilterHandle {
            statement_id,
            filter_id,
        }
    }

    #[inline]
    pub fn statement_id(&self) -> u64 {
        self.statement_id
    }

    #[inline]
    pub fn filter_id(&self) -> u32 {
        self.filter_id
    }
}

impl Display for FilterHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "FilterHandle({}:{})", self.statement_id, self.filter_id)
    }
}
