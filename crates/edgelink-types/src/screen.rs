//! Screen geometry and the virtual-plane edge model.

use serde::{Deserialize, Serialize};

/// Which host a screen belongs to in the virtual plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenOwner {
    Local,
    Remote,
}

/// A rectangle in the shared virtual plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Screen {
    /// Stable identifier, unique per owning host.
    pub id: String,
    /// Display name shown to the user.
    pub name: String,
    pub origin_x: i32,
    pub origin_y: i32,
    pub width: u32,
    pub height: u32,
    pub is_primary: bool,
    pub owner: ScreenOwner,
}

impl Screen {
    #[must_use]
    pub fn right(&self) -> i32 {
        self.origin_x + i32::try_from(self.width).unwrap_or(i32::MAX) - 1
    }

    #[must_use]
    pub fn bottom(&self) -> i32 {
        self.origin_y + i32::try_from(self.height).unwrap_or(i32::MAX) - 1
    }

    /// Whether `(px, py)` lies within `threshold` pixels of the given edge,
    /// and within the screen's bounds on the other axis.
    #[must_use]
    pub fn near_edge(&self, px: i32, py: i32, edge: ScreenEdge, threshold: i32) -> bool {
        match edge {
            ScreenEdge::Left => {
                px <= self.origin_x + threshold - 1
                    && (self.origin_y..=self.bottom()).contains(&py)
            }
            ScreenEdge::Right => {
                px >= self.right() - threshold + 1 && (self.origin_y..=self.bottom()).contains(&py)
            }
            ScreenEdge::Top => {
                py <= self.origin_y + threshold - 1 && (self.origin_x..=self.right()).contains(&px)
            }
            ScreenEdge::Bottom => {
                py >= self.bottom() - threshold + 1 && (self.origin_x..=self.right()).contains(&px)
            }
        }
    }

    /// Clamp a point into this screen's bounds.
    #[must_use]
    pub fn clamp_point(&self, x: i32, y: i32) -> (i32, i32) {
        (
            x.clamp(self.origin_x, self.right()),
            y.clamp(self.origin_y, self.bottom()),
        )
    }
}

/// One of the four edges of a rectangle in the virtual plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenEdge {
    Left,
    Right,
    Top,
    Bottom,
}

impl ScreenEdge {
    /// The edge a cursor re-enters on when it leaves through `self`.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
        }
    }

    /// Whether this edge runs vertically (left/right) or horizontally (top/bottom).
    #[must_use]
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

impl std::fmt::Display for ScreenEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
        };
        write!(f, "{s}")
    }
}
