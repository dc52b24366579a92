// Copyright 2026 the Inkpane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-rectangle tracking.
//!
//! Every pixel buffer embeds a [`DirtyRect`]: the running bounding box of all
//! pixels written since the last flush. The compositor drains it once per
//! render tick and pushes exactly that region to the display.
//!
//! # Invariants
//!
//! - After [`reset`](DirtyRect::reset) (or [`take`](DirtyRect::take)) the
//!   tracker is empty.
//! - The tracked box always contains every pixel marked since the last reset.
//!   It may over-approximate: two small writes in opposite corners yield a
//!   box spanning both.
//! - Degenerate rectangles never grow the box. Upstream clamping can produce
//!   negative widths, and those must not be mistaken for damage.

use crate::geometry::{PixelPoint, PixelRect};

/// Bounding box of the pixels written since the last reset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirtyRect {
    bounds: PixelRect,
}

impl DirtyRect {
    /// Creates an empty tracker.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bounds: PixelRect::EMPTY,
        }
    }

    /// Grows the tracked box to include `rect`. Degenerate rects are ignored.
    #[inline]
    pub fn mark(&mut self, rect: PixelRect) {
        self.bounds = self.bounds.union(rect);
    }

    /// Grows the tracked box to include a single pixel.
    #[inline]
    pub fn mark_point(&mut self, p: PixelPoint) {
        self.mark(PixelRect::new(p.x, p.y, p.x + 1, p.y + 1));
    }

    /// Returns the tracked box, or [`PixelRect::EMPTY`] if nothing is dirty.
    #[inline]
    #[must_use]
    pub const fn get(&self) -> PixelRect {
        self.bounds
    }

    /// Returns `true` if nothing has been written since the last reset.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// Clears the tracker.
    #[inline]
    pub fn reset(&mut self) {
        self.bounds = PixelRect::EMPTY;
    }

    /// Returns the tracked box and clears the tracker.
    #[inline]
    pub fn take(&mut self) -> PixelRect {
        core::mem::replace(&mut self.bounds, PixelRect::EMPTY)
    }
}
