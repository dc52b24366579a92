// Copyright 2026 the Inkpane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Off-screen layers with single-level clipping.
//!
//! A [`Layer`] owns one [`PixelBuffer`]. While clipped, a scissor rectangle
//! confines every write: pixels outside it are never touched and never
//! reported as damage, and pixels inside it keep whatever was drawn after
//! [`unclip`](Layer::unclip).

use inkpane_core::geometry::{PixelPoint, PixelRect};

use crate::buffer::{BufferError, PixelBuffer};
use crate::pixel::{Dither, Gray};

/// An off-screen pixel buffer composited onto the display.
#[derive(Clone, Debug)]
pub struct Layer {
    buffer: PixelBuffer,
    /// Scissor, `Some` iff clipped. Always inside the buffer bounds.
    clip: Option<PixelRect>,
    dither: Dither,
}

impl Layer {
    /// Creates an unclipped layer filled with `background`.
    ///
    /// # Panics
    ///
    /// Panics if the pixel storage cannot be allocated.
    #[must_use]
    pub fn new(width: u32, height: u32, background: Gray) -> Self {
        Self::from_buffer(PixelBuffer::new(width, height, background))
    }

    /// Fallible variant of [`new`](Self::new).
    pub fn try_new(width: u32, height: u32, background: Gray) -> Result<Self, BufferError> {
        Ok(Self::from_buffer(PixelBuffer::try_new(
            width, height, background,
        )?))
    }

    /// Wraps an existing buffer.
    #[must_use]
    pub fn from_buffer(buffer: PixelBuffer) -> Self {
        Self {
            buffer,
            clip: None,
            dither: Dither::None,
        }
    }

    /// Read access to the pixels and damage.
    #[inline]
    #[must_use]
    pub const fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Returns the damage and clears it.
    pub fn take_dirty(&mut self) -> PixelRect {
        self.buffer.take_dirty()
    }

    /// Grows the damage without writing (explicit update hint). Not limited
    /// by the scissor.
    pub fn mark_dirty(&mut self, rect: PixelRect) {
        self.buffer.mark_dirty(rect);
    }

    /// The dithering applied to non-bi-level grays.
    #[must_use]
    pub const fn dither(&self) -> Dither {
        self.dither
    }

    /// Sets the dithering applied to subsequent writes.
    pub fn set_dither(&mut self, dither: Dither) {
        self.dither = dither;
    }

    /// Confines subsequent writes to `rect`, clamped to the buffer.
    ///
    /// A rect entirely outside the buffer leaves an empty scissor: every
    /// write is discarded until [`unclip`](Self::unclip).
    ///
    /// # Panics
    ///
    /// Panics if the layer is already clipped. Clipping does not nest.
    pub fn clip(&mut self, rect: PixelRect) {
        assert!(
            self.clip.is_none(),
            "Layer::clip called while already clipped (at {:?})",
            self.clip
        );
        let rect = rect.intersect(self.buffer.bounds());
        log::trace!("layer clipped to {rect:?}");
        self.clip = Some(rect);
    }

    /// Removes the scissor. Does nothing if the layer is not clipped.
    pub fn unclip(&mut self) {
        if self.clip.take().is_some() {
            log::trace!("layer unclipped");
        }
    }

    /// Returns `true` while a scissor is installed.
    #[inline]
    #[must_use]
    pub const fn is_clipped(&self) -> bool {
        self.clip.is_some()
    }

    /// The scissor, if clipped.
    #[must_use]
    pub const fn clip_rect(&self) -> Option<PixelRect> {
        self.clip
    }

    /// The region writes can currently reach: the buffer, narrowed by the
    /// scissor.
    #[must_use]
    pub fn writable(&self) -> PixelRect {
        match self.clip {
            Some(clip) => clip,
            None => self.buffer.bounds(),
        }
    }

    /// Writes one pixel through the scissor and dithering.
    #[inline]
    pub fn put(&mut self, p: PixelPoint, gray: Gray) {
        if self.writable().contains_point(p) {
            self.buffer.set(p, self.dither.apply(gray, p));
        }
    }

    /// Fills `rect` through the scissor and dithering. Returns the region
    /// written.
    pub fn fill(&mut self, rect: PixelRect, gray: Gray) -> PixelRect {
        let rect = rect.intersect(self.writable());
        if rect.is_empty() {
            return PixelRect::EMPTY;
        }
        if self.dither == Dither::None || gray.is_bilevel() {
            return self.buffer.fill_rect(rect, gray);
        }
        for y in rect.y0..rect.y1 {
            for x in rect.x0..rect.x1 {
                let p = PixelPoint::new(x, y);
                self.buffer.set(p, self.dither.apply(gray, p));
            }
        }
        rect
    }

    /// Fills the inclusive span `x0..=x1` of row `y`.
    pub fn hspan(&mut self, y: i32, x0: i32, x1: i32, gray: Gray) {
        let (lo, hi) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        self.fill(PixelRect::new(lo, y, hi.saturating_add(1), y + 1), gray);
    }

    /// Copies `src_rect` of `src` to `dst_origin` through the scissor,
    /// without dithering. Returns the region written.
    pub fn copy_from(
        &mut self,
        src: &PixelBuffer,
        src_rect: PixelRect,
        dst_origin: PixelPoint,
    ) -> PixelRect {
        let offset = dst_origin - src_rect.origin();
        let dst = src_rect.translate(offset).intersect(self.writable());
        if dst.is_empty() {
            return PixelRect::EMPTY;
        }
        let from = dst.translate(PixelPoint::ZERO - offset);
        self.buffer.copy_rect(src, from, dst.origin())
    }
}
