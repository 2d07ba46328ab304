//! Core of a compositor plugin that highlights the focused window.
//!
//! The shell draws a translucent shade over every monitor, punches a
//! rounded-corner hole where the focused window sits, and strokes a border
//! around the hole. This crate owns the overlay lifecycle — when to repaint,
//! when to suppress, when to tear down — and the pure computation of the
//! drawing program. Everything the host compositor provides (signals,
//! settings, timers, the scene graph and its drawing surface) is reached
//! through the traits in [`host`], so the whole plugin can run against fakes.
//!
//! Entry point for hosts is [`plugin::FocusShade::enable`].

pub mod color;
pub mod config;
pub mod geometry;
pub mod host;
pub mod overlay;
pub mod paint;
pub mod plugin;
pub mod router;
pub mod tracing_sub;
