//! Screen arrangement: the virtual plane that maps a local pointer sample to
//! a remote screen coordinate (spec.md §3/§4.1, "Arrangement").
//!
//! [`Arrangement`] holds the LOCAL region (fixed at startup, refreshed on
//! display change) and the REMOTE region (published by the peer's `hello`),
//! and owns the active transfer edge. Resolving the "multi-screen walk on
//! the REMOTE side" open question in spec.md §9: this implementation clamps
//! the virtual cursor to the active remote screen rather than walking to an
//! adjacent one, which the spec explicitly permits as a v1 choice.

use crate::screen::{Screen, ScreenEdge};

/// Pixel distance from a transfer edge that counts as "at" it.
pub const EDGE_THRESHOLD: i32 = 3;
/// Inward offset applied when computing an entry point.
pub const ENTRY_INSET: i32 = 50;
/// Inward offset applied when computing an exit point.
pub const EXIT_INSET: i32 = 50;

/// Owns the LOCAL/REMOTE geometry and the active transfer edge.
///
/// `remote` holds REMOTE screens repositioned flush against the active edge
/// of the LOCAL region — used for hit-testing and cross-axis screen
/// selection in the shared virtual plane. `remote_native` holds the same
/// screens exactly as the peer published them, in the peer's own 0-based
/// frame. Any coordinate that crosses the wire (`entry_point`, `exit_point`,
/// the virtual cursor tracked while REMOTE) must be expressed in the native
/// frame, since that's the frame `synthesise_mouse_move`/`warp_pointer` on
/// the *other* host actually operate in.
#[derive(Debug, Clone)]
pub struct Arrangement {
    local: Vec<Screen>,
    remote: Vec<Screen>,
    remote_native: Vec<Screen>,
    edge: ScreenEdge,
}

impl Default for Arrangement {
    fn default() -> Self {
        Self {
            local: Vec::new(),
            remote: Vec::new(),
            remote_native: Vec::new(),
            edge: ScreenEdge::Right,
        }
    }
}

impl Arrangement {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the LOCAL geometry. Called at startup and on display-change.
    pub fn set_local_screens(&mut self, screens: Vec<Screen>) {
        self.local = screens;
        self.reposition_remote();
    }

    /// Replace the REMOTE geometry, published by the peer on hello.
    pub fn set_remote_screens(&mut self, screens: Vec<Screen>) {
        self.remote_native = screens.clone();
        self.remote = screens;
        self.reposition_remote();
    }

    /// Change the active transfer edge, repositioning REMOTE flush against it.
    pub fn set_transfer_edge(&mut self, edge: ScreenEdge) {
        self.edge = edge;
        self.reposition_remote();
    }

    #[must_use]
    pub fn transfer_edge(&self) -> ScreenEdge {
        self.edge
    }

    #[must_use]
    pub fn remote_screens(&self) -> &[Screen] {
        &self.remote
    }

    #[must_use]
    pub fn local_screens(&self) -> &[Screen] {
        &self.local
    }

    /// True iff `(x, y)` is within [`EDGE_THRESHOLD`] of the active transfer
    /// edge of the LOCAL region AND a REMOTE screen exists along that edge at
    /// that cross-axis coordinate.
    #[must_use]
    pub fn hit_edge(&self, x: i32, y: i32) -> bool {
        let cross = if self.edge.is_vertical() { y } else { x };
        self.local
            .iter()
            .any(|s| s.near_edge(x, y, self.edge, EDGE_THRESHOLD))
            && self.remote_index_at_cross(cross).is_some()
    }

    /// The REMOTE-coordinate point to start the virtual cursor on, by
    /// projecting `(x, y)` across the transfer edge and insetting inward.
    ///
    /// Returned in the remote screen's own native frame (spec.md §8 scenario
    /// 1), not the virtual-plane frame used for hit-testing — this is the
    /// value that travels on the wire and reaches the peer's `warp_pointer`.
    #[must_use]
    pub fn entry_point(&self, x: i32, y: i32) -> Option<(usize, i32, i32)> {
        let cross = if self.edge.is_vertical() { y } else { x };
        let idx = self.remote_index_at_cross(cross)?;
        let screen = &self.remote[idx];
        let (rx, ry) = match self.edge {
            ScreenEdge::Right => (screen.origin_x + ENTRY_INSET, y),
            ScreenEdge::Left => (screen.right() - ENTRY_INSET, y),
            ScreenEdge::Bottom => (x, screen.origin_y + ENTRY_INSET),
            ScreenEdge::Top => (x, screen.bottom() - ENTRY_INSET),
        };
        let (rx, ry) = screen.clamp_point(rx, ry);
        let (nx, ny) = self.to_native(idx, rx, ry);
        Some((idx, nx, ny))
    }

    /// The LOCAL point to place the real pointer on return: the mirror of
    /// [`entry_point`](Self::entry_point) on the LOCAL side. `rx`/`ry` are in
    /// `remote_idx`'s native frame, matching `entry_point`'s output and the
    /// virtual cursor tracked while REMOTE.
    #[must_use]
    pub fn exit_point(&self, remote_idx: usize, rx: i32, ry: i32) -> Option<(i32, i32)> {
        let (lx0, ly0, lx1, ly1) = self.local_bounds()?;
        let (prx, pry) = self.to_placed(remote_idx, rx, ry);
        let (x, y) = match self.edge {
            ScreenEdge::Right => (lx1 - EXIT_INSET, pry),
            ScreenEdge::Left => (lx0 + EXIT_INSET, pry),
            ScreenEdge::Bottom => (prx, ly1 - EXIT_INSET),
            ScreenEdge::Top => (prx, ly0 + EXIT_INSET),
        };
        Some((x.clamp(lx0, lx1), y.clamp(ly0, ly1)))
    }

    /// True iff the virtual cursor at `(x, y)` (native frame) on `remote_idx`
    /// has crossed the inverse edge of that screen — the signal to return to
    /// LOCAL.
    #[must_use]
    pub fn crossed_back(&self, remote_idx: usize, x: i32, y: i32) -> bool {
        let Some(screen) = self.remote.get(remote_idx) else {
            return true;
        };
        let (px, py) = self.to_placed(remote_idx, x, y);
        match self.edge {
            ScreenEdge::Right => px < screen.origin_x,
            ScreenEdge::Left => px > screen.right(),
            ScreenEdge::Bottom => py < screen.origin_y,
            ScreenEdge::Top => py > screen.bottom(),
        }
    }

    /// Clamp a native-frame virtual cursor sample into the bounds of
    /// `remote_idx`.
    #[must_use]
    pub fn clamp_to_remote(&self, remote_idx: usize, x: i32, y: i32) -> (i32, i32) {
        match self.remote.get(remote_idx) {
            Some(screen) => {
                let (px, py) = self.to_placed(remote_idx, x, y);
                let (cpx, cpy) = screen.clamp_point(px, py);
                self.to_native(remote_idx, cpx, cpy)
            }
            None => (x, y),
        }
    }

    /// Translate a point from the virtual-plane (placed) frame of
    /// `remote[idx]` into `remote_native[idx]`'s own 0-based frame.
    fn to_native(&self, idx: usize, x: i32, y: i32) -> (i32, i32) {
        let (Some(placed), Some(native)) = (self.remote.get(idx), self.remote_native.get(idx)) else {
            return (x, y);
        };
        (
            x - placed.origin_x + native.origin_x,
            y - placed.origin_y + native.origin_y,
        )
    }

    /// The inverse of [`to_native`](Self::to_native).
    fn to_placed(&self, idx: usize, x: i32, y: i32) -> (i32, i32) {
        let (Some(placed), Some(native)) = (self.remote.get(idx), self.remote_native.get(idx)) else {
            return (x, y);
        };
        (
            x - native.origin_x + placed.origin_x,
            y - native.origin_y + placed.origin_y,
        )
    }

    fn local_bounds(&self) -> Option<(i32, i32, i32, i32)> {
        bounds_of(&self.local)
    }

    fn remote_bounds(&self) -> Option<(i32, i32, i32, i32)> {
        bounds_of(&self.remote)
    }

    /// The index of the REMOTE screen whose span along the cross axis
    /// (perpendicular to the transfer edge) contains `cross`. Ties are
    /// broken by the smallest cross-axis origin (spec.md §4.1).
    fn remote_index_at_cross(&self, cross: i32) -> Option<usize> {
        let mut best: Option<(usize, i32)> = None;
        for (i, s) in self.remote.iter().enumerate() {
            let (lo, hi, origin) = if self.edge.is_vertical() {
                (s.origin_y, s.bottom(), s.origin_y)
            } else {
                (s.origin_x, s.right(), s.origin_x)
            };
            if (lo..=hi).contains(&cross) {
                match best {
                    Some((_, o)) if o <= origin => {}
                    _ => best = Some((i, origin)),
                }
            }
        }
        best.map(|(i, _)| i)
    }

    /// Recompute each REMOTE screen's origin so the REMOTE region sits flush
    /// against the active transfer edge of the LOCAL region, stacked in
    /// published order and centered on the cross axis.
    fn reposition_remote(&mut self) {
        let Some((lx0, ly0, lx1, ly1)) = self.local_bounds() else {
            return;
        };
        if self.remote.is_empty() {
            return;
        }
        let Some((_, _, rx1, ry1)) = self.remote_bounds() else {
            return;
        };

        match self.edge {
            ScreenEdge::Right | ScreenEdge::Left => {
                let total_height: i32 = self
                    .remote
                    .iter()
                    .map(|s| i32::try_from(s.height).unwrap_or(0))
                    .sum();
                let center_y = (ly0 + ly1) / 2;
                let mut y = center_y - total_height / 2;
                for screen in &mut self.remote {
                    let w = i32::try_from(screen.width).unwrap_or(0);
                    let h = i32::try_from(screen.height).unwrap_or(0);
                    screen.origin_x = if self.edge == ScreenEdge::Right {
                        lx1 + 1
                    } else {
                        lx0 - w
                    };
                    screen.origin_y = y;
                    y += h;
                }
            }
            ScreenEdge::Top | ScreenEdge::Bottom => {
                let total_width: i32 = self
                    .remote
                    .iter()
                    .map(|s| i32::try_from(s.width).unwrap_or(0))
                    .sum();
                let center_x = (lx0 + lx1) / 2;
                let mut x = center_x - total_width / 2;
                for screen in &mut self.remote {
                    let w = i32::try_from(screen.width).unwrap_or(0);
                    let h = i32::try_from(screen.height).unwrap_or(0);
                    screen.origin_y = if self.edge == ScreenEdge::Bottom {
                        ly1 + 1
                    } else {
                        ly0 - h
                    };
                    screen.origin_x = x;
                    x += w;
                }
            }
        }
        let _ = (rx1, ry1);
    }
}

fn bounds_of(screens: &[Screen]) -> Option<(i32, i32, i32, i32)> {
    let mut iter = screens.iter();
    let first = iter.next()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) =
        (first.origin_x, first.origin_y, first.right(), first.bottom());
    for s in iter {
        min_x = min_x.min(s.origin_x);
        min_y = min_y.min(s.origin_y);
        max_x = max_x.max(s.right());
        max_y = max_y.max(s.bottom());
    }
    Some((min_x, min_y, max_x, max_y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::ScreenOwner;

    fn local_screen() -> Screen {
        Screen {
            id: "local".into(),
            name: "local".into(),
            origin_x: 0,
            origin_y: 0,
            width: 1920,
            height: 1080,
            is_primary: true,
            owner: ScreenOwner::Local,
        }
    }

    fn remote_screen(id: &str, height: u32) -> Screen {
        Screen {
            id: id.into(),
            name: id.into(),
            origin_x: 0,
            origin_y: 0,
            width: 1920,
            height,
            is_primary: false,
            owner: ScreenOwner::Remote,
        }
    }

    #[test]
    fn right_edge_crossing_example_from_spec() {
        let mut arr = Arrangement::new();
        arr.set_local_screens(vec![local_screen()]);
        arr.set_remote_screens(vec![remote_screen("r0", 1080)]);
        arr.set_transfer_edge(ScreenEdge::Right);

        let screen = &arr.remote_screens()[0];
        assert_eq!(screen.origin_x, 1920);
        assert_eq!(screen.origin_y, 0);

        assert!(arr.hit_edge(1920, 540));
        // Native frame: the remote screen's own origin is (0, 0), so the
        // entry point is the inset from its native edge, not the placed one.
        let (idx, rx, ry) = arr.entry_point(1920, 540).unwrap();
        assert_eq!((idx, rx, ry), (0, 50, 540));
    }

    #[test]
    fn entry_then_exit_round_trips_within_insets() {
        let mut arr = Arrangement::new();
        arr.set_local_screens(vec![local_screen()]);
        arr.set_remote_screens(vec![remote_screen("r0", 1080)]);
        arr.set_transfer_edge(ScreenEdge::Right);

        let (idx, rx, ry) = arr.entry_point(1920, 540).unwrap();
        let (lx, ly) = arr.exit_point(idx, rx, ry).unwrap();

        assert_eq!(ly, 540);
        assert!((lx - 1919).abs() <= ENTRY_INSET + EXIT_INSET);
    }

    #[test]
    fn crossed_back_detects_inverse_edge() {
        let mut arr = Arrangement::new();
        arr.set_local_screens(vec![local_screen()]);
        arr.set_remote_screens(vec![remote_screen("r0", 1080)]);
        arr.set_transfer_edge(ScreenEdge::Right);

        // Native frame: x=0 is the screen's own left edge (the seam), x=-1
        // is one pixel past it.
        assert!(!arr.crossed_back(0, 0, 540));
        assert!(arr.crossed_back(0, -1, 540));
    }

    #[test]
    fn tie_break_picks_smallest_cross_axis_origin() {
        let mut arr = Arrangement::new();
        arr.set_local_screens(vec![local_screen()]);
        // Two stacked remote screens of equal height; published order first.
        arr.set_remote_screens(vec![remote_screen("top", 540), remote_screen("bottom", 540)]);
        arr.set_transfer_edge(ScreenEdge::Right);

        // Boundary y=540 sits exactly at the seam; the top screen (smaller
        // origin_y) wins the tie.
        let (idx, _, _) = arr.entry_point(1920, 540).unwrap();
        assert_eq!(idx, 0);
    }

    #[test]
    fn clamp_to_remote_stays_within_screen_bounds() {
        let mut arr = Arrangement::new();
        arr.set_local_screens(vec![local_screen()]);
        arr.set_remote_screens(vec![remote_screen("r0", 1080)]);
        arr.set_transfer_edge(ScreenEdge::Right);

        // Native frame: this screen's own bounds are (0,0)-(1919,1079).
        let (x, y) = arr.clamp_to_remote(0, 5000, -10);
        assert_eq!((x, y), (1919, 0));
    }

    #[test]
    fn hit_edge_false_without_remote_screen_at_cross() {
        let mut arr = Arrangement::new();
        arr.set_local_screens(vec![local_screen()]);
        arr.set_transfer_edge(ScreenEdge::Right);
        assert!(!arr.hit_edge(1920, 540));
    }
}
