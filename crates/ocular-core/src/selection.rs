//! Single-part highlight state
//!
//! At most one part is highlighted. Every transition reports which part must
//! get its original material back before the new highlight is applied.

/// Material changes a caller must apply, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightChange<T> {
    /// Part whose original material must be restored first
    pub restore: Option<T>,
    /// Part that receives the highlight material
    pub apply: Option<T>,
}

impl<T> HighlightChange<T> {
    pub fn is_noop(&self) -> bool {
        self.restore.is_none() && self.apply.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection<T> {
    highlighted: Option<T>,
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Self { highlighted: None }
    }
}

impl<T: Copy + PartialEq> Selection<T> {
    pub fn highlighted(&self) -> Option<T> {
        self.highlighted
    }

    pub fn is_highlighted(&self, part: T) -> bool {
        self.highlighted == Some(part)
    }

    /// Highlight `part`, releasing whatever was highlighted before
    ///
    /// Re-selecting the current part changes nothing.
    pub fn select(&mut self, part: T) -> HighlightChange<T> {
        if self.highlighted == Some(part) {
            return HighlightChange {
                restore: None,
                apply: None,
            };
        }
        let restore = self.highlighted.replace(part);
        HighlightChange {
            restore,
            apply: Some(part),
        }
    }

    /// Apply the outcome of a pick; a miss leaves the selection unchanged
    pub fn select_hit(&mut self, hit: Option<T>) -> HighlightChange<T> {
        match hit {
            Some(part) => self.select(part),
            None => HighlightChange {
                restore: None,
                apply: None,
            },
        }
    }

    /// Drop the highlight
    pub fn clear(&mut self) -> HighlightChange<T> {
        HighlightChange {
            restore: self.highlighted.take(),
            apply: None,
        }
    }
}
