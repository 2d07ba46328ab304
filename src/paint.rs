//! Pure computation of the overlay's drawing program.
//!
//! [`plan`] turns the focused window's frame, the multi-monitor bounding
//! rect, and the current config into an ordered list of drawing-surface
//! primitives. Nothing here touches the scene graph; the host replays the
//! ops against its 2D surface. Identical inputs always yield an identical
//! op sequence.

use std::f64::consts::PI;

use crate::color::Rgb;
use crate::config::HighlightConfig;
use crate::geometry::Rect;

/// Compositing operator for fill and stroke operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Normal painting (source-over).
    Over,
    /// Erase to fully transparent.
    Clear,
}

/// One drawing-surface primitive, in surface-local coordinates (origin at
/// the overlay bounds' top-left corner).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaintOp {
    SetOperator(Operator),
    SetSourceRgba { color: Rgb, alpha: f64 },
    SetLineWidth(f64),
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    /// Clockwise arc around `(cx, cy)`, angles in radians.
    Arc {
        cx: f64,
        cy: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
    RectPath { x: f64, y: f64, width: f64, height: f64 },
    ClosePath,
    Fill,
    Stroke,
}

/// An ordered drawing program for one overlay surface.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PaintPlan {
    ops: Vec<PaintOp>,
}

impl PaintPlan {
    pub fn ops(&self) -> &[PaintOp] {
        &self.ops
    }

    fn push(&mut self, op: PaintOp) {
        self.ops.push(op);
    }
}

/// Compute the drawing program for one refresh.
///
/// * `window` — focused window's frame rect, global coordinates.
/// * `bounds` — union rect the overlay surface covers; all ops are emitted
///   relative to its top-left corner.
/// * `fullscreen_monitor` — a monitor rect to re-clear entirely, used when
///   the primary monitor runs a fullscreen app (likely screen sharing, so
///   the shade must not darken what viewers see).
/// * `corner_radius` — already 0 for square-cornered windows.
pub fn plan(
    window: Rect,
    bounds: Rect,
    fullscreen_monitor: Option<Rect>,
    corner_radius: u32,
    config: &HighlightConfig,
) -> PaintPlan {
    let mut plan = PaintPlan::default();
    let local = |rect: Rect| {
        (
            f64::from(rect.x - bounds.x),
            f64::from(rect.y - bounds.y),
            f64::from(rect.width),
            f64::from(rect.height),
        )
    };

    // Shade every monitor with the translucent background.
    plan.push(PaintOp::SetSourceRgba {
        color: Rgb::BLACK,
        alpha: f64::from(config.background_opacity_percent) / 100.0,
    });
    plan.push(PaintOp::SetOperator(Operator::Over));
    plan.push(PaintOp::RectPath {
        x: 0.0,
        y: 0.0,
        width: f64::from(bounds.width),
        height: f64::from(bounds.height),
    });
    plan.push(PaintOp::Fill);

    // Punch the hole for the focused window.
    let (wx, wy, ww, wh) = local(window);
    plan.push(PaintOp::SetOperator(Operator::Clear));
    rounded_top_rect_path(&mut plan, wx, wy, ww, wh, f64::from(corner_radius));
    plan.push(PaintOp::Fill);

    // Never dim a fullscreen app on the primary monitor.
    if let Some(monitor) = fullscreen_monitor {
        let (mx, my, mw, mh) = local(monitor);
        plan.push(PaintOp::SetOperator(Operator::Clear));
        plan.push(PaintOp::RectPath {
            x: mx,
            y: my,
            width: mw,
            height: mh,
        });
        plan.push(PaintOp::Fill);
    }

    // Border, inset by half its width so the stroke hugs the hole's edge.
    let inset = f64::from(config.border_width) / 2.0;
    plan.push(PaintOp::SetOperator(Operator::Over));
    rounded_top_rect_path(
        &mut plan,
        wx + inset,
        wy + inset,
        ww - 2.0 * inset,
        wh - 2.0 * inset,
        f64::from(corner_radius) - inset,
    );
    plan.push(PaintOp::SetSourceRgba {
        color: config.border_color,
        alpha: 1.0,
    });
    plan.push(PaintOp::SetLineWidth(f64::from(config.border_width)));
    plan.push(PaintOp::Stroke);

    plan
}

/// Rectangle path with rounded top corners and square bottom corners,
/// matching the decoration convention where only a window's top is rounded.
fn rounded_top_rect_path(plan: &mut PaintPlan, x: f64, y: f64, w: f64, h: f64, radius: f64) {
    let r = radius.max(0.0);

    // Top edge.
    plan.push(PaintOp::MoveTo { x: x + r, y });
    plan.push(PaintOp::LineTo { x: x + w - r, y });

    if r > 0.0 {
        // Top-right corner, sweeping -90° to 0°.
        plan.push(PaintOp::Arc {
            cx: x + w - r,
            cy: y + r,
            radius: r,
            start_angle: -PI / 2.0,
            end_angle: 0.0,
        });
    }

    // Right, bottom, and left edges.
    plan.push(PaintOp::LineTo { x: x + w, y: y + h });
    plan.push(PaintOp::LineTo { x, y: y + h });
    plan.push(PaintOp::LineTo { x, y: y + r });

    if r > 0.0 {
        // Top-left corner, sweeping 180° to 270°.
        plan.push(PaintOp::Arc {
            cx: x + r,
            cy: y + r,
            radius: r,
            start_angle: PI,
            end_angle: PI * 1.5,
        });
    }

    plan.push(PaintOp::ClosePath);
}
