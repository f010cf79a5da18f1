/// inclusive index range exposed over the flattened view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisibleWindow {
    first: usize,
    last: usize,
}

impl VisibleWindow {
    /// the whole range `[0, len - 1]`, or `[0, 0]` when there is nothing
    pub fn full(len: usize) -> Self {
        Self {
            first: 0,
            last: len.saturating_sub(1),
        }
    }

    pub fn first(&self) -> usize {
        self.first
    }

    pub fn last(&self) -> usize {
        self.last
    }

    /// negative values reset to 0, anything else is taken as is
    pub fn set_first(&mut self, index: i64) {
        self.first = to_index(index).unwrap_or(0);
    }

    /// negative values reset to `len - 1`, anything else is taken as is
    pub fn set_last(&mut self, index: i64, len: usize) {
        self.last = to_index(index).unwrap_or(len.saturating_sub(1));
    }

    /// the visible part of `items`; empty when the bounds fall outside it
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        if self.first >= items.len() || self.first > self.last {
            return &[];
        }

        let end = self.last.min(items.len() - 1);
        &items[self.first..=end]
    }
}

fn to_index(index: i64) -> Option<usize> {
    if index < 0 {
        return None;
    }
    Some(usize::try_from(index).unwrap_or(usize::MAX))
}
