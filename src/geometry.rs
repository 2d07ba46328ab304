use crate::host::DisplayQuery;

/// Rectangle in global display coordinates: signed origin, unsigned size.
///
/// Window frames can start at negative coordinates when a monitor sits left
/// of or above the primary one, so the origin is signed while sizes stay
/// unsigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    pub fn bottom(&self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect {
            x,
            y,
            width: (right - i64::from(x)) as u32,
            height: (bottom - i64::from(y)) as u32,
        }
    }

    pub fn contains_rect(&self, other: Rect) -> bool {
        self.x <= other.x
            && self.y <= other.y
            && self.right() >= other.right()
            && self.bottom() >= other.bottom()
    }
}

/// Per-refresh snapshot of the monitor arrangement.
///
/// Captured fresh from the display on every refresh; monitors can be plugged
/// or unplugged between any two events, so this is never cached.
#[derive(Debug, Clone, Default)]
pub struct MonitorLayout {
    monitors: Vec<Rect>,
    fullscreen_primary: Option<Rect>,
}

impl MonitorLayout {
    pub fn capture(display: &dyn DisplayQuery) -> Self {
        let monitors: Vec<Rect> = (0..display.monitor_count())
            .map(|index| display.monitor_rect(index))
            .collect();
        let primary = display.primary_monitor();
        let fullscreen_primary = (primary < monitors.len()
            && display.monitor_in_fullscreen(primary))
        .then(|| monitors[primary]);
        Self {
            monitors,
            fullscreen_primary,
        }
    }

    pub fn monitors(&self) -> &[Rect] {
        &self.monitors
    }

    /// Bounding rectangle of `seed` and every monitor.
    ///
    /// Seeding with the focused window's frame guarantees the overlay covers
    /// the window even when it hangs partially off-screen.
    pub fn union_with(&self, seed: Rect) -> Rect {
        self.monitors
            .iter()
            .fold(seed, |bounds, monitor| bounds.union(*monitor))
    }

    /// The primary monitor's rect when it is currently fullscreen.
    pub fn fullscreen_primary(&self) -> Option<Rect> {
        self.fullscreen_primary
    }
}
