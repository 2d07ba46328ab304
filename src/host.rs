//! Interfaces to the host compositor.
//!
//! The plugin never touches the shell directly: signals, settings, timers,
//! display queries, the scene graph, and keybindings all arrive as trait
//! objects injected at construction. That keeps the core single-threaded,
//! side-effect-explicit, and swappable for fakes under test.

use std::rc::Rc;
use std::time::Duration;

use crate::geometry::Rect;
use crate::paint::PaintPlan;

/// Handle returned by [`SignalHub::connect`]; opaque to the plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SignalId(pub u64);

/// Handle for a scheduled callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

/// Handle for an overlay visual attached to the scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OverlayId(pub u64);

pub type SignalHandler = Box<dyn Fn()>;
pub type TimerCallback = Box<dyn FnMut()>;

/// A source of named lifecycle signals (the display or the window manager).
pub trait SignalHub {
    fn connect(&self, signal: &str, handler: SignalHandler) -> SignalId;

    /// Disconnecting an already-disconnected handler is a host error; the
    /// router guarantees each id is disconnected at most once.
    fn disconnect(&self, id: SignalId);
}

/// The externally-owned settings store.
pub trait SettingsStore {
    fn int(&self, key: &str) -> i64;
    fn string(&self, key: &str) -> String;
    fn boolean(&self, key: &str) -> bool;

    /// Subscribe to changes of a single key.
    fn connect_changed(&self, key: &str, handler: SignalHandler) -> SignalId;
    fn disconnect(&self, id: SignalId);
}

/// One-shot and repeating callbacks on the host's event loop.
pub trait TimerScheduler {
    fn schedule(&self, delay: Duration, repeating: bool, callback: TimerCallback) -> TimerId;

    /// Must be idempotent: cancelling a timer that already fired (or was
    /// already cancelled) is a no-op, not an error.
    fn cancel(&self, id: TimerId);
}

/// State of the focused window at the instant of a refresh.
///
/// Has no identity beyond the current refresh and is never cached across
/// refreshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusedWindowSnapshot {
    /// Frame rect including decorations, in global display coordinates.
    pub frame: Rect,
    pub is_fullscreen: bool,
    pub maximized_horizontally: bool,
    pub maximized_vertically: bool,
}

impl FocusedWindowSnapshot {
    /// Fullscreen and both-ways-maximized windows have square corners, so
    /// the highlight hole must not round its corners either.
    pub fn has_square_corners(&self) -> bool {
        self.is_fullscreen || (self.maximized_horizontally && self.maximized_vertically)
    }
}

/// Read-only queries about the focused window and monitor arrangement.
pub trait DisplayQuery {
    fn focused_window(&self) -> Option<FocusedWindowSnapshot>;
    fn monitor_count(&self) -> usize;
    fn monitor_rect(&self, index: usize) -> Rect;
    fn primary_monitor(&self) -> usize;
    fn monitor_in_fullscreen(&self, index: usize) -> bool;
}

/// Attach/detach of overlay visuals above the window stack.
pub trait SceneGraph {
    /// Create a visual covering `bounds`, replay `plan` onto its drawing
    /// surface, and attach it above the window stack.
    fn attach_overlay(&self, bounds: Rect, plan: &PaintPlan) -> OverlayId;

    /// Destroy a visual. Returns `false` when the visual was already gone
    /// (destroyed externally); callers treat that as routine.
    fn destroy_overlay(&self, id: OverlayId) -> bool;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeybindingFlags {
    pub ignore_autorepeat: bool,
}

/// Shell action modes in which a keybinding stays active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionModes {
    pub normal: bool,
    pub overview: bool,
}

pub trait KeybindingRegistry {
    fn add(&self, name: &str, flags: KeybindingFlags, modes: ActionModes, handler: SignalHandler);

    /// Removing a binding that was never added is a no-op.
    fn remove(&self, name: &str);
}

/// Everything the plugin needs from the shell, bundled for injection.
#[derive(Clone)]
pub struct ShellServices {
    /// Focus and grab signals (`notify::focus-window`, `grab-op-*`).
    pub display_signals: Rc<dyn SignalHub>,
    /// Window-manager signals (`size-change`, `size-changed`, `unminimize`).
    pub wm_signals: Rc<dyn SignalHub>,
    pub display: Rc<dyn DisplayQuery>,
    pub scene: Rc<dyn SceneGraph>,
    pub timers: Rc<dyn TimerScheduler>,
    pub settings: Rc<dyn SettingsStore>,
    pub keybindings: Rc<dyn KeybindingRegistry>,
}
