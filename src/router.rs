//! Translation of compositor and settings signals into controller calls.
//!
//! The router is the only place signal handles live: exactly one listener is
//! registered per (source, signal) pair, and teardown disconnects everything
//! it registered, idempotently. Handlers never unwind past this boundary —
//! the host may abort the rest of a signal-dispatch chain on an unhandled
//! panic, so a panicking handler is converted into a logged error instead.

use std::any::Any;
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use crate::config::{self, HighlightConfig};
use crate::host::{SettingsStore, ShellServices, SignalHub, SignalId};
use crate::overlay::OverlayController;

enum Registration {
    Display(SignalId),
    WindowManager(SignalId),
    Settings(SignalId),
}

pub struct EventRouter {
    display_signals: Rc<dyn SignalHub>,
    wm_signals: Rc<dyn SignalHub>,
    settings: Rc<dyn SettingsStore>,
    registrations: Vec<Registration>,
}

impl EventRouter {
    /// Subscribe to every signal the plugin reacts to.
    pub fn connect(
        services: &ShellServices,
        controller: &Rc<RefCell<OverlayController>>,
    ) -> Self {
        let mut router = Self {
            display_signals: Rc::clone(&services.display_signals),
            wm_signals: Rc::clone(&services.wm_signals),
            settings: Rc::clone(&services.settings),
            registrations: Vec::new(),
        };

        router.on_display("notify::focus-window", controller, |c| c.refresh());
        router.on_display("grab-op-begin", controller, |c| c.clear());
        router.on_display("grab-op-end", controller, |c| {
            c.clear();
            c.refresh();
        });
        router.on_wm("size-change", controller, |c| {
            c.clear();
            c.set_suppressed();
        });
        router.on_wm("size-changed", controller, |c| {
            c.set_active();
            c.refresh();
        });
        router.on_wm("unminimize", controller, |c| c.set_suppressed());

        for key in config::keys::ALL {
            let weak = Rc::downgrade(controller);
            let settings = Rc::clone(&router.settings);
            let id = router.settings.connect_changed(
                key,
                Box::new(move || {
                    dispatch_guarded(key, || {
                        if let Some(controller) = weak.upgrade() {
                            let snapshot = HighlightConfig::load(settings.as_ref());
                            controller.borrow_mut().apply_config(snapshot);
                        }
                    });
                }),
            );
            router.registrations.push(Registration::Settings(id));
        }

        tracing::debug!(
            listeners = router.registrations.len(),
            "event router connected"
        );
        router
    }

    fn on_display<F>(
        &mut self,
        signal: &'static str,
        controller: &Rc<RefCell<OverlayController>>,
        action: F,
    ) where
        F: Fn(&mut OverlayController) + 'static,
    {
        let id = connect_controller(self.display_signals.as_ref(), signal, controller, action);
        self.registrations.push(Registration::Display(id));
    }

    fn on_wm<F>(
        &mut self,
        signal: &'static str,
        controller: &Rc<RefCell<OverlayController>>,
        action: F,
    ) where
        F: Fn(&mut OverlayController) + 'static,
    {
        let id = connect_controller(self.wm_signals.as_ref(), signal, controller, action);
        self.registrations.push(Registration::WindowManager(id));
    }

    /// Disconnect every listener this router registered. Idempotent: calling
    /// with nothing registered is a no-op.
    pub fn teardown(&mut self) {
        for registration in self.registrations.drain(..) {
            match registration {
                Registration::Display(id) => self.display_signals.disconnect(id),
                Registration::WindowManager(id) => self.wm_signals.disconnect(id),
                Registration::Settings(id) => self.settings.disconnect(id),
            }
        }
    }
}

impl Drop for EventRouter {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn connect_controller<F>(
    hub: &dyn SignalHub,
    signal: &'static str,
    controller: &Rc<RefCell<OverlayController>>,
    action: F,
) -> SignalId
where
    F: Fn(&mut OverlayController) + 'static,
{
    let weak: Weak<RefCell<OverlayController>> = Rc::downgrade(controller);
    hub.connect(
        signal,
        Box::new(move || {
            dispatch_guarded(signal, || {
                if let Some(controller) = weak.upgrade() {
                    action(&mut controller.borrow_mut());
                }
            });
        }),
    )
}

fn dispatch_guarded(signal: &'static str, handler: impl FnOnce()) {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(handler)) {
        tracing::error!(
            signal,
            panic = panic_message(payload.as_ref()),
            "signal handler panicked"
        );
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}
