//! Continuous-time rectangle test over a single step.
//!
//! A rectangle moving by `disp` over `t` in `[0, 1]` is tested against a stationary
//! rectangle with the slab method: each axis yields a window of `t` in which the two
//! projections overlap, and the rectangles meet iff the windows intersect inside the step.

use crate::{
    config::{Config, AXIS_THRESHOLD},
    narrow::{Intersect, Rect},
    Fp, Vec2,
};

// ---------- Sweep Helper Functions ---------- //

#[inline]
fn axis_window(m_min: Fp, m_max: Fp, t_min: Fp, t_max: Fp, d: Fp, threshold: Fp) -> Option<(Fp, Fp)> {
    //! Returns the `(entry, exit)` times during which the moving projection overlaps the target's.
    if d.abs() < threshold {
        // a stationary axis either never constrains the sweep or rules it out entirely
        if m_max <= t_min || m_min >= t_max {
            None
        } else {
            Some((Fp::NEG_INFINITY, Fp::INFINITY))
        }
    } else if d > 0.0 {
        Some(((t_min - m_max) / d, (t_max - m_min) / d))
    } else {
        Some(((t_max - m_min) / d, (t_min - m_max) / d))
    }
}

// ---------- Sweep ---------- //

pub fn rect_rect_sweep(moving: &Rect, disp: Vec2, target: &Rect, axis_threshold: Fp) -> Option<Fp> {
    //! Returns the earliest time in `[0, 1]` at which `moving`, displaced by `disp` over the step, overlaps `target`.
    if moving.is_degenerate() || target.is_degenerate() {
        return None;
    }
    let (m_max, t_max) = (moving.max(), target.max());
    let (tx_entry, tx_exit) = axis_window(moving.pos.x, m_max.x, target.pos.x, t_max.x, disp.x, axis_threshold)?;
    let (ty_entry, ty_exit) = axis_window(moving.pos.y, m_max.y, target.pos.y, t_max.y, disp.y, axis_threshold)?;

    let entry = Fp::max(tx_entry, ty_entry);
    let exit = Fp::min(tx_exit, ty_exit);
    if entry <= exit && (0.0..=1.0).contains(&entry) {
        Some(entry)
    } else {
        None
    }
}

#[inline]
pub fn sweep_test(moving: &Rect, disp: Vec2, target: &Rect) -> bool {
    //! Returns whether `moving` overlaps `target` at any point of the step.
    rect_rect_sweep(moving, disp, target, AXIS_THRESHOLD).is_some()
}

pub fn sweep(moving: &Rect, disp: Vec2, target: &Rect, config: &Config) -> Option<Fp> {
    //! The continuous check as run during detection: negligible motion is never swept, and the
    //! swept bounds must touch `target` before the precise test runs.
    if !config.is_sweepable(disp) {
        return None;
    }
    if !moving.broaden(disp).rect_test(target, config.rect_tolerance) {
        return None;
    }
    rect_rect_sweep(moving, disp, target, config.axis_threshold)
}
