// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides the preview scale computation and the safe-area
//! clip inset derived from the four margins.

use std::fmt;

/// Size of the application viewport in logical points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Space reserved around the preview surface (side panels, toolbars).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedInset {
    pub horizontal: f32,
    pub vertical: f32,
}

impl Default for FixedInset {
    fn default() -> Self {
        Self {
            horizontal: 600.0,
            vertical: 100.0,
        }
    }
}

/// Compute the uniform scale that fits a `width` x `height` canvas into the
/// viewport minus the fixed inset. Never upscales and never goes negative.
pub fn fit_scale(viewport: Viewport, inset: FixedInset, width: u32, height: u32) -> f32 {
    let by_height = (viewport.height - inset.vertical) / height as f32;
    let by_width = (viewport.width - inset.horizontal) / width as f32;
    1.0_f32.min(by_height).min(by_width).max(0.0)
}

/// Safe-area clip region: inset from each edge by the respective margin,
/// in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClipInset {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl ClipInset {
    /// Rectangle left visible by the clip, as fractions (0.0 to 1.0) of the
    /// canvas: `(min_x, min_y, max_x, max_y)`. Collapses to an empty rect
    /// when opposing margins overlap.
    pub fn visible_fraction(&self, width: u32, height: u32) -> (f32, f32, f32, f32) {
        let w = width.max(1) as f32;
        let h = height.max(1) as f32;
        let min_x = (self.left as f32 / w).min(1.0);
        let min_y = (self.top as f32 / h).min(1.0);
        let max_x = (1.0 - self.right as f32 / w).max(min_x);
        let max_y = (1.0 - self.bottom as f32 / h).max(min_y);
        (min_x, min_y, max_x, max_y)
    }
}

impl fmt::Display for ClipInset {
    /// CSS `inset()` order: top, right, bottom, left.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "inset({}px {}px {}px {}px)",
            self.top, self.right, self.bottom, self.left
        )
    }
}
