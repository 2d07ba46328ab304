//! Overlay lifecycle and the suppression state machine.
//!
//! The controller decides, for every window or compositor event, whether to
//! suppress, recompute, or tear down the overlay. It owns the single live
//! overlay handle and every pending timer; both are released exactly once,
//! with double-release tolerated because teardown paths can race in event
//! order (a hide timer firing right before a fresh refresh).

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::config::HighlightConfig;
use crate::geometry::MonitorLayout;
use crate::host::{DisplayQuery, OverlayId, SceneGraph, TimerId, TimerScheduler};
use crate::paint;

/// How long a missed `size-changed`/`unminimize` pairing may keep refreshes
/// suppressed before the controller forces itself back to [`SuppressionState::Active`].
pub const FAILSAFE_DELAY: Duration = Duration::from_millis(1000);

/// Whether `refresh()` is currently allowed to show an overlay.
///
/// `Suppressed` covers active resizes and unminimize animations, where the
/// window's frame rect is still in flux and a highlight would trail it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressionState {
    Active,
    Suppressed,
}

pub struct OverlayController {
    display: Rc<dyn DisplayQuery>,
    scene: Rc<dyn SceneGraph>,
    timers: Rc<dyn TimerScheduler>,
    config: HighlightConfig,
    suppression: SuppressionState,
    disposed: bool,
    overlay: Option<OverlayId>,
    hide_timer: Option<TimerId>,
    failsafe_timer: Option<TimerId>,
    weak_self: Weak<RefCell<OverlayController>>,
}

impl OverlayController {
    pub fn new(
        display: Rc<dyn DisplayQuery>,
        scene: Rc<dyn SceneGraph>,
        timers: Rc<dyn TimerScheduler>,
        config: HighlightConfig,
    ) -> Rc<RefCell<Self>> {
        Rc::new_cyclic(|weak| {
            RefCell::new(Self {
                display,
                scene,
                timers,
                config,
                suppression: SuppressionState::Active,
                disposed: false,
                overlay: None,
                hide_timer: None,
                failsafe_timer: None,
                weak_self: weak.clone(),
            })
        })
    }

    pub fn suppression(&self) -> SuppressionState {
        self.suppression
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn config(&self) -> &HighlightConfig {
        &self.config
    }

    /// Handle of the currently attached overlay, if any.
    pub fn overlay(&self) -> Option<OverlayId> {
        self.overlay
    }

    /// Tear down the current overlay and recompute it for the focused window.
    pub fn refresh(&mut self) {
        if self.disposed {
            return;
        }
        if self.suppression == SuppressionState::Suppressed {
            tracing::debug!("refresh skipped: a resize or unminimize is in flight");
            return;
        }
        self.clear();

        let Some(window) = self.display.focused_window() else {
            tracing::debug!("refresh skipped: no focused window");
            return;
        };
        let layout = MonitorLayout::capture(self.display.as_ref());
        let bounds = layout.union_with(window.frame);
        let corner_radius = if window.has_square_corners() {
            0
        } else {
            self.config.border_radius
        };
        let plan = paint::plan(
            window.frame,
            bounds,
            layout.fullscreen_primary(),
            corner_radius,
            &self.config,
        );
        let id = self.scene.attach_overlay(bounds, &plan);
        tracing::debug!(
            overlay = ?id,
            window = ?window.frame,
            bounds = ?bounds,
            corner_radius,
            "overlay attached"
        );
        self.overlay = Some(id);

        if !self.config.hiding_disabled {
            self.arm_hide_timer();
        }
    }

    /// Destroy the tracked overlay and cancel every pending timer.
    ///
    /// Safe when nothing is displayed and safe to call twice in a row.
    pub fn clear(&mut self) {
        if let Some(id) = self.overlay.take()
            && !self.scene.destroy_overlay(id)
        {
            tracing::debug!(overlay = ?id, "overlay was already destroyed");
        }
        for timer in [self.hide_timer.take(), self.failsafe_timer.take()]
            .into_iter()
            .flatten()
        {
            self.timers.cancel(timer);
        }
    }

    /// Swap in a fresh settings snapshot and repaint immediately.
    pub fn apply_config(&mut self, config: HighlightConfig) {
        if self.disposed {
            return;
        }
        self.config = config;
        self.refresh();
    }

    /// Enter `Suppressed` and arm the failsafe that un-sticks the state if
    /// the matching end signal never arrives.
    pub fn set_suppressed(&mut self) {
        if self.disposed {
            return;
        }
        self.suppression = SuppressionState::Suppressed;
        self.arm_failsafe();
    }

    /// Leave `Suppressed`; the failsafe is no longer needed.
    pub fn set_active(&mut self) {
        if self.disposed {
            return;
        }
        self.suppression = SuppressionState::Active;
        if let Some(timer) = self.failsafe_timer.take() {
            self.timers.cancel(timer);
        }
    }

    /// Final teardown. Every later `refresh`/`apply_config`/suppression call
    /// becomes a no-op; the host guarantees it won't call them post-disposal,
    /// this guard just makes that a correctness property instead of a hope.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.clear();
        tracing::debug!("overlay controller disposed");
    }

    fn arm_hide_timer(&mut self) {
        if let Some(timer) = self.hide_timer.take() {
            self.timers.cancel(timer);
        }
        let weak = self.weak_self.clone();
        let id = self.timers.schedule(
            self.config.hide_delay,
            false,
            Box::new(move || {
                let Some(controller) = weak.upgrade() else {
                    return;
                };
                let mut controller = controller.borrow_mut();
                controller.hide_timer = None;
                tracing::debug!("hide delay elapsed");
                controller.clear();
            }),
        );
        self.hide_timer = Some(id);
    }

    fn arm_failsafe(&mut self) {
        if let Some(timer) = self.failsafe_timer.take() {
            self.timers.cancel(timer);
        }
        let weak = self.weak_self.clone();
        let id = self.timers.schedule(
            FAILSAFE_DELAY,
            false,
            Box::new(move || {
                let Some(controller) = weak.upgrade() else {
                    return;
                };
                let mut controller = controller.borrow_mut();
                controller.failsafe_timer = None;
                if !controller.disposed
                    && controller.suppression == SuppressionState::Suppressed
                {
                    tracing::warn!("no end signal within the failsafe window; forcing active");
                    controller.suppression = SuppressionState::Active;
                }
            }),
        );
        self.failsafe_timer = Some(id);
    }
}
