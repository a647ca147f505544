use std::fmt;

/// Rectangular selection in cell coordinates.
///
/// `top`/`left` are inclusive, `bottom`/`right` exclusive. The renderer keeps
/// an `Option<Selection>`, so there is no partially-set state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selection {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl Selection {
    pub const fn new(top: u32, bottom: u32, left: u32, right: u32) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    /// Converts edges where a negative value means "unset". Any unset edge
    /// yields no selection.
    pub fn from_signed(top: i64, bottom: i64, left: i64, right: i64) -> Option<Self> {
        Some(Self::new(
            u32::try_from(top).ok()?,
            u32::try_from(bottom).ok()?,
            u32::try_from(left).ok()?,
            u32::try_from(right).ok()?,
        ))
    }

    /// Selection spanning two cells `(column, row)`, both included, in any order.
    pub fn from_cells(anchor: (u32, u32), focus: (u32, u32)) -> Self {
        let (left, right) = (anchor.0.min(focus.0), anchor.0.max(focus.0));
        let (top, bottom) = (anchor.1.min(focus.1), anchor.1.max(focus.1));
        Self::new(top, bottom.saturating_add(1), left, right.saturating_add(1))
    }

    pub fn columns(&self) -> u32 {
        self.right.abs_diff(self.left)
    }

    pub fn rows(&self) -> u32 {
        self.bottom.abs_diff(self.top)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.columns(), self.rows())
    }
}
