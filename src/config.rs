use std::time::Duration;

use crate::color::Rgb;
use crate::host::SettingsStore;

/// Settings keys watched by the plugin.
pub mod keys {
    pub const HIDE_DELAY: &str = "hide-delay";
    pub const BORDER_WIDTH: &str = "border-width";
    pub const BORDER_RADIUS: &str = "border-radius";
    pub const BACKGROUND_OPACITY: &str = "background-opacity";
    pub const BORDER_COLOR: &str = "border-color";
    pub const DISABLE_HIDING: &str = "disable-hiding";

    pub const ALL: [&str; 6] = [
        HIDE_DELAY,
        BORDER_WIDTH,
        BORDER_RADIUS,
        BACKGROUND_OPACITY,
        BORDER_COLOR,
        DISABLE_HIDING,
    ];
}

/// Immutable per-refresh snapshot of the user settings.
///
/// Replaced wholesale whenever any watched key changes; never mutated in
/// place.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightConfig {
    pub border_width: u32,
    pub border_radius: u32,
    pub border_color: Rgb,
    /// Shade opacity in percent, clamped to `0..=100`.
    pub background_opacity_percent: u8,
    pub hide_delay: Duration,
    pub hiding_disabled: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            border_width: 2,
            border_radius: 14,
            border_color: Rgb::BLACK,
            background_opacity_percent: 50,
            hide_delay: Duration::from_millis(2000),
            hiding_disabled: false,
        }
    }
}

impl HighlightConfig {
    /// Read every watched key from the settings store into a fresh snapshot.
    ///
    /// Out-of-range integers are clamped rather than rejected, and a
    /// malformed color string falls back to the default border color; the
    /// host's settings schema is the authority on validation, this is just a
    /// safety net.
    pub fn load(settings: &dyn SettingsStore) -> Self {
        let defaults = Self::default();
        let border_color = match Rgb::parse_hex(&settings.string(keys::BORDER_COLOR)) {
            Ok(color) => color,
            Err(err) => {
                tracing::warn!(%err, "ignoring invalid border color");
                defaults.border_color
            }
        };
        Self {
            border_width: clamp_px(settings.int(keys::BORDER_WIDTH)),
            border_radius: clamp_px(settings.int(keys::BORDER_RADIUS)),
            border_color,
            background_opacity_percent: settings.int(keys::BACKGROUND_OPACITY).clamp(0, 100) as u8,
            hide_delay: Duration::from_millis(settings.int(keys::HIDE_DELAY).max(0) as u64),
            hiding_disabled: settings.boolean(keys::DISABLE_HIDING),
        }
    }
}

fn clamp_px(value: i64) -> u32 {
    value.clamp(0, i64::from(u32::MAX)) as u32
}
