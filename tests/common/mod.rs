//! Shared in-memory fakes standing in for the host compositor.
//!
//! Everything the plugin reaches through `focus_shade::host` has a
//! deterministic fake here: recording signal hubs, an in-memory settings
//! store, a manual-advance timer scheduler (virtual clock), a recording
//! scene graph, and a scripted display. Integration tests wire them into a
//! `ShellServices` bundle via [`TestShell`].

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use focus_shade::geometry::Rect;
use focus_shade::host::{
    ActionModes, DisplayQuery, FocusedWindowSnapshot, KeybindingFlags, KeybindingRegistry,
    OverlayId, SceneGraph, SettingsStore, ShellServices, SignalHandler, SignalHub, SignalId,
    TimerCallback, TimerId, TimerScheduler,
};
use focus_shade::paint::PaintPlan;

// ---------------------------------------------------------------------------
// Signals

#[derive(Default)]
pub struct FakeSignalHub {
    next_id: Cell<u64>,
    handlers: RefCell<Vec<(SignalId, String, SignalHandler)>>,
}

impl FakeSignalHub {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Fire every handler registered for `signal`.
    pub fn emit(&self, signal: &str) {
        let handlers = self.handlers.borrow();
        for (_, name, handler) in handlers.iter() {
            if name == signal {
                handler();
            }
        }
    }

    pub fn listener_count(&self, signal: &str) -> usize {
        self.handlers
            .borrow()
            .iter()
            .filter(|(_, name, _)| name == signal)
            .count()
    }

    pub fn total_listeners(&self) -> usize {
        self.handlers.borrow().len()
    }
}

impl SignalHub for FakeSignalHub {
    fn connect(&self, signal: &str, handler: SignalHandler) -> SignalId {
        let id = SignalId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.handlers
            .borrow_mut()
            .push((id, signal.to_string(), handler));
        id
    }

    fn disconnect(&self, id: SignalId) {
        self.handlers.borrow_mut().retain(|(h, _, _)| *h != id);
    }
}

// ---------------------------------------------------------------------------
// Settings

#[derive(Default)]
pub struct FakeSettings {
    ints: RefCell<HashMap<String, i64>>,
    strings: RefCell<HashMap<String, String>>,
    bools: RefCell<HashMap<String, bool>>,
    next_id: Cell<u64>,
    handlers: RefCell<Vec<(SignalId, String, SignalHandler)>>,
}

impl FakeSettings {
    /// Fresh store populated with the extension's stock settings.
    pub fn stock() -> Rc<Self> {
        let settings = Self::default();
        settings.set_int("hide-delay", 2000);
        settings.set_int("border-width", 2);
        settings.set_int("border-radius", 14);
        settings.set_int("background-opacity", 50);
        settings.set_string("border-color", "#000000");
        settings.set_bool("disable-hiding", false);
        Rc::new(settings)
    }

    pub fn set_int(&self, key: &str, value: i64) {
        self.ints.borrow_mut().insert(key.to_string(), value);
    }

    pub fn set_string(&self, key: &str, value: &str) {
        self.strings
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    pub fn set_bool(&self, key: &str, value: bool) {
        self.bools.borrow_mut().insert(key.to_string(), value);
    }

    /// Fire the changed handlers for `key`, as the host does after a write.
    pub fn emit_changed(&self, key: &str) {
        let handlers = self.handlers.borrow();
        for (_, watched, handler) in handlers.iter() {
            if watched == key {
                handler();
            }
        }
    }

    pub fn watched_keys(&self) -> Vec<String> {
        self.handlers
            .borrow()
            .iter()
            .map(|(_, key, _)| key.clone())
            .collect()
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }
}

impl SettingsStore for FakeSettings {
    fn int(&self, key: &str) -> i64 {
        self.ints.borrow().get(key).copied().unwrap_or(0)
    }

    fn string(&self, key: &str) -> String {
        self.strings.borrow().get(key).cloned().unwrap_or_default()
    }

    fn boolean(&self, key: &str) -> bool {
        self.bools.borrow().get(key).copied().unwrap_or(false)
    }

    fn connect_changed(&self, key: &str, handler: SignalHandler) -> SignalId {
        let id = SignalId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.handlers
            .borrow_mut()
            .push((id, key.to_string(), handler));
        id
    }

    fn disconnect(&self, id: SignalId) {
        self.handlers.borrow_mut().retain(|(h, _, _)| *h != id);
    }
}

// ---------------------------------------------------------------------------
// Timers (virtual clock)

struct ScheduledTimer {
    id: TimerId,
    deadline_ms: u64,
    period_ms: u64,
    repeating: bool,
    callback: TimerCallback,
}

/// Manual-advance scheduler: nothing fires until the test moves the clock.
#[derive(Default)]
pub struct FakeTimers {
    now_ms: Cell<u64>,
    next_id: Cell<u64>,
    pending: RefCell<Vec<ScheduledTimer>>,
    fired: Cell<usize>,
}

impl FakeTimers {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Delays-to-fire of every pending timer, in milliseconds from now.
    pub fn pending_delays(&self) -> Vec<u64> {
        let now = self.now_ms.get();
        self.pending
            .borrow()
            .iter()
            .map(|timer| timer.deadline_ms.saturating_sub(now))
            .collect()
    }

    pub fn fired_count(&self) -> usize {
        self.fired.get()
    }

    /// Advance the virtual clock, firing due timers in deadline order.
    ///
    /// A due timer is removed from the pending set *before* its callback
    /// runs, so a callback cancelling its own handle sees the idempotent
    /// no-op the contract promises. Callbacks may schedule and cancel other
    /// timers freely; no borrow is held while they run.
    pub fn advance(&self, delta: Duration) {
        let target = self.now_ms.get() + delta.as_millis() as u64;
        loop {
            let next = {
                let pending = self.pending.borrow();
                pending
                    .iter()
                    .filter(|timer| timer.deadline_ms <= target)
                    .min_by_key(|timer| (timer.deadline_ms, timer.id.0))
                    .map(|timer| timer.id)
            };
            let Some(id) = next else {
                break;
            };
            let mut timer = {
                let mut pending = self.pending.borrow_mut();
                let index = pending
                    .iter()
                    .position(|timer| timer.id == id)
                    .expect("due timer vanished");
                pending.remove(index)
            };
            self.now_ms.set(timer.deadline_ms);
            (timer.callback)();
            self.fired.set(self.fired.get() + 1);
            if timer.repeating {
                timer.deadline_ms += timer.period_ms.max(1);
                self.pending.borrow_mut().push(timer);
            }
        }
        self.now_ms.set(target);
    }
}

impl TimerScheduler for FakeTimers {
    fn schedule(&self, delay: Duration, repeating: bool, callback: TimerCallback) -> TimerId {
        let id = TimerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let period_ms = delay.as_millis() as u64;
        self.pending.borrow_mut().push(ScheduledTimer {
            id,
            deadline_ms: self.now_ms.get() + period_ms,
            period_ms,
            repeating,
            callback,
        });
        id
    }

    fn cancel(&self, id: TimerId) {
        // Idempotent: already-fired handles are simply absent.
        self.pending.borrow_mut().retain(|timer| timer.id != id);
    }
}

// ---------------------------------------------------------------------------
// Scene graph

#[derive(Clone)]
pub struct AttachedOverlay {
    pub id: OverlayId,
    pub bounds: Rect,
    pub plan: PaintPlan,
}

#[derive(Default)]
pub struct FakeScene {
    next_id: Cell<u64>,
    live: RefCell<Vec<AttachedOverlay>>,
    attach_count: Cell<usize>,
    stale_destroys: Cell<usize>,
    panic_on_attach: Cell<bool>,
}

impl FakeScene {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn live_count(&self) -> usize {
        self.live.borrow().len()
    }

    pub fn attach_count(&self) -> usize {
        self.attach_count.get()
    }

    /// Destroys requested for visuals that were already gone.
    pub fn stale_destroys(&self) -> usize {
        self.stale_destroys.get()
    }

    pub fn last_attached(&self) -> Option<AttachedOverlay> {
        self.live.borrow().last().cloned()
    }

    /// Destroy a visual out from under the controller, as the shell can.
    pub fn destroy_externally(&self, id: OverlayId) {
        self.live.borrow_mut().retain(|overlay| overlay.id != id);
    }

    /// Make the next attach panic, to exercise the router's dispatch guard.
    pub fn set_panic_on_attach(&self, panic: bool) {
        self.panic_on_attach.set(panic);
    }
}

impl SceneGraph for FakeScene {
    fn attach_overlay(&self, bounds: Rect, plan: &PaintPlan) -> OverlayId {
        if self.panic_on_attach.get() {
            self.panic_on_attach.set(false);
            panic!("scene graph rejected the visual");
        }
        let id = OverlayId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.live.borrow_mut().push(AttachedOverlay {
            id,
            bounds,
            plan: plan.clone(),
        });
        self.attach_count.set(self.attach_count.get() + 1);
        id
    }

    fn destroy_overlay(&self, id: OverlayId) -> bool {
        let mut live = self.live.borrow_mut();
        let before = live.len();
        live.retain(|overlay| overlay.id != id);
        let destroyed = live.len() < before;
        if !destroyed {
            self.stale_destroys.set(self.stale_destroys.get() + 1);
        }
        destroyed
    }
}

// ---------------------------------------------------------------------------
// Display

#[derive(Default)]
pub struct FakeDisplay {
    focused: RefCell<Option<FocusedWindowSnapshot>>,
    monitors: RefCell<Vec<Rect>>,
    primary: Cell<usize>,
    fullscreen: RefCell<Vec<bool>>,
}

impl FakeDisplay {
    /// One 1920x1080 monitor, one plain focused window at (100,100,800,600).
    pub fn single_monitor() -> Rc<Self> {
        let display = Self::default();
        display.set_monitors(&[Rect::new(0, 0, 1920, 1080)]);
        display.set_focused(Some(plain_window(Rect::new(100, 100, 800, 600))));
        Rc::new(display)
    }

    pub fn set_focused(&self, window: Option<FocusedWindowSnapshot>) {
        *self.focused.borrow_mut() = window;
    }

    pub fn set_monitors(&self, monitors: &[Rect]) {
        *self.monitors.borrow_mut() = monitors.to_vec();
        *self.fullscreen.borrow_mut() = vec![false; monitors.len()];
    }

    pub fn set_primary(&self, index: usize) {
        self.primary.set(index);
    }

    pub fn set_monitor_fullscreen(&self, index: usize, fullscreen: bool) {
        self.fullscreen.borrow_mut()[index] = fullscreen;
    }
}

pub fn plain_window(frame: Rect) -> FocusedWindowSnapshot {
    FocusedWindowSnapshot {
        frame,
        is_fullscreen: false,
        maximized_horizontally: false,
        maximized_vertically: false,
    }
}

impl DisplayQuery for FakeDisplay {
    fn focused_window(&self) -> Option<FocusedWindowSnapshot> {
        *self.focused.borrow()
    }

    fn monitor_count(&self) -> usize {
        self.monitors.borrow().len()
    }

    fn monitor_rect(&self, index: usize) -> Rect {
        self.monitors.borrow()[index]
    }

    fn primary_monitor(&self) -> usize {
        self.primary.get()
    }

    fn monitor_in_fullscreen(&self, index: usize) -> bool {
        self.fullscreen.borrow()[index]
    }
}

// ---------------------------------------------------------------------------
// Keybindings

pub struct RegisteredBinding {
    pub flags: KeybindingFlags,
    pub modes: ActionModes,
    handler: SignalHandler,
}

#[derive(Default)]
pub struct FakeKeybindings {
    bindings: RefCell<HashMap<String, RegisteredBinding>>,
}

impl FakeKeybindings {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.bindings.borrow().contains_key(name)
    }

    pub fn flags(&self, name: &str) -> Option<KeybindingFlags> {
        self.bindings.borrow().get(name).map(|b| b.flags)
    }

    pub fn modes(&self, name: &str) -> Option<ActionModes> {
        self.bindings.borrow().get(name).map(|b| b.modes)
    }

    /// Simulate the user pressing the bound keys.
    pub fn press(&self, name: &str) {
        let bindings = self.bindings.borrow();
        if let Some(binding) = bindings.get(name) {
            (binding.handler)();
        }
    }
}

impl KeybindingRegistry for FakeKeybindings {
    fn add(&self, name: &str, flags: KeybindingFlags, modes: ActionModes, handler: SignalHandler) {
        self.bindings.borrow_mut().insert(
            name.to_string(),
            RegisteredBinding {
                flags,
                modes,
                handler,
            },
        );
    }

    fn remove(&self, name: &str) {
        self.bindings.borrow_mut().remove(name);
    }
}

// ---------------------------------------------------------------------------
// Bundle

/// All fakes plus the `ShellServices` view the plugin consumes.
pub struct TestShell {
    pub display_signals: Rc<FakeSignalHub>,
    pub wm_signals: Rc<FakeSignalHub>,
    pub display: Rc<FakeDisplay>,
    pub scene: Rc<FakeScene>,
    pub timers: Rc<FakeTimers>,
    pub settings: Rc<FakeSettings>,
    pub keybindings: Rc<FakeKeybindings>,
}

impl TestShell {
    pub fn new() -> Self {
        Self {
            display_signals: FakeSignalHub::new(),
            wm_signals: FakeSignalHub::new(),
            display: FakeDisplay::single_monitor(),
            scene: FakeScene::new(),
            timers: FakeTimers::new(),
            settings: FakeSettings::stock(),
            keybindings: FakeKeybindings::new(),
        }
    }

    pub fn services(&self) -> ShellServices {
        ShellServices {
            display_signals: self.display_signals.clone(),
            wm_signals: self.wm_signals.clone(),
            display: self.display.clone(),
            scene: self.scene.clone(),
            timers: self.timers.clone(),
            settings: self.settings.clone(),
            keybindings: self.keybindings.clone(),
        }
    }
}
