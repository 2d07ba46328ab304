//! Plugin façade: wiring and lifecycle.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::HighlightConfig;
use crate::host::{ActionModes, KeybindingFlags, ShellServices};
use crate::overlay::OverlayController;
use crate::router::EventRouter;

/// Name under which the "highlight the focused window now" action is
/// registered with the host's keybinding registry.
pub const HIGHLIGHT_NOW_KEYBINDING: &str = "keybinding-highlight-now";

/// The assembled plugin. Constructed by [`FocusShade::enable`], torn down by
/// [`FocusShade::disable`] (or drop).
pub struct FocusShade {
    services: ShellServices,
    controller: Rc<RefCell<OverlayController>>,
    router: Option<EventRouter>,
}

impl FocusShade {
    /// Wire the plugin into the shell: load the settings snapshot, build the
    /// controller, connect every signal, register the highlight keybinding,
    /// and paint the initial highlight.
    pub fn enable(services: ShellServices) -> Self {
        let config = HighlightConfig::load(services.settings.as_ref());
        let controller = OverlayController::new(
            Rc::clone(&services.display),
            Rc::clone(&services.scene),
            Rc::clone(&services.timers),
            config,
        );
        let router = EventRouter::connect(&services, &controller);

        let weak = Rc::downgrade(&controller);
        services.keybindings.add(
            HIGHLIGHT_NOW_KEYBINDING,
            KeybindingFlags {
                ignore_autorepeat: true,
            },
            ActionModes {
                normal: true,
                overview: true,
            },
            Box::new(move || {
                if let Some(controller) = weak.upgrade() {
                    controller.borrow_mut().refresh();
                }
            }),
        );

        controller.borrow_mut().refresh();
        tracing::debug!("focus-shade enabled");

        Self {
            services,
            controller,
            router: Some(router),
        }
    }

    /// Undo everything `enable` did: disconnect signals, remove the
    /// keybinding, destroy the overlay, cancel timers. Idempotent.
    pub fn disable(&mut self) {
        if let Some(mut router) = self.router.take() {
            router.teardown();
        }
        self.controller.borrow_mut().dispose();
        self.services.keybindings.remove(HIGHLIGHT_NOW_KEYBINDING);
        tracing::debug!("focus-shade disabled");
    }

    /// The controller, exposed for hosts that drive it directly and for
    /// tests.
    pub fn controller(&self) -> &Rc<RefCell<OverlayController>> {
        &self.controller
    }
}

impl Drop for FocusShade {
    fn drop(&mut self) {
        self.disable();
    }
}
