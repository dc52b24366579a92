// Copyright 2026 the Inkpane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Owned gray pixel storage with embedded damage tracking.

use alloc::vec::Vec;
use core::fmt;

use inkpane_core::dirty::DirtyRect;
use inkpane_core::geometry::{PixelPoint, PixelRect};

use crate::pixel::Gray;

/// Failure to create a [`PixelBuffer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferError {
    /// A dimension does not fit pixel coordinates, or the pixel count
    /// overflows `usize`.
    TooLarge {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// The allocator refused the pixel storage.
    AllocationFailed {
        /// Number of pixels requested.
        pixels: usize,
    },
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLarge { width, height } => {
                write!(f, "pixel buffer of {width}x{height} is too large")
            }
            Self::AllocationFailed { pixels } => {
                write!(f, "failed to allocate {pixels} pixels")
            }
        }
    }
}

impl core::error::Error for BufferError {}

/// A `width × height` grid of [`Gray`] pixels in row-major order.
///
/// Every write through the buffer's methods grows its [`DirtyRect`] by the
/// region actually written; coordinates outside the buffer are skipped.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Gray>,
    dirty: DirtyRect,
}

impl PixelBuffer {
    /// Creates a buffer filled with `fill`, reporting allocation failure.
    ///
    /// The new buffer has no damage.
    pub fn try_new(width: u32, height: u32, fill: Gray) -> Result<Self, BufferError> {
        let too_large = BufferError::TooLarge { width, height };
        if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
            return Err(too_large);
        }
        let len = usize::try_from(width)
            .ok()
            .zip(usize::try_from(height).ok())
            .and_then(|(w, h)| w.checked_mul(h))
            .ok_or(too_large)?;

        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| BufferError::AllocationFailed { pixels: len })?;
        pixels.resize(len, fill);

        Ok(Self {
            width,
            height,
            pixels,
            dirty: DirtyRect::new(),
        })
    }

    /// Creates a buffer filled with `fill`.
    ///
    /// # Panics
    ///
    /// Panics if the buffer cannot be allocated. Use
    /// [`try_new`](Self::try_new) to handle that case.
    #[must_use]
    pub fn new(width: u32, height: u32, fill: Gray) -> Self {
        match Self::try_new(width, height, fill) {
            Ok(buffer) => buffer,
            Err(err) => panic!("{err}"),
        }
    }

    /// Width in pixels.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// The rectangle `0..width × 0..height`.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> PixelRect {
        PixelRect::from_size(self.width, self.height)
    }

    /// All pixels, row-major.
    #[must_use]
    pub fn pixels(&self) -> &[Gray] {
        &self.pixels
    }

    /// Returns the pixel at `p`, or `None` outside the buffer.
    #[must_use]
    pub fn get(&self, p: PixelPoint) -> Option<Gray> {
        self.bounds()
            .contains_point(p)
            .then(|| self.pixels[self.index(p.x, p.y)])
    }

    /// Writes one pixel. Returns `false` (and writes nothing) outside the
    /// buffer.
    pub fn set(&mut self, p: PixelPoint, gray: Gray) -> bool {
        if !self.bounds().contains_point(p) {
            return false;
        }
        let i = self.index(p.x, p.y);
        self.pixels[i] = gray;
        self.dirty.mark_point(p);
        true
    }

    /// Fills `rect`, clipped to the buffer, and returns the region written.
    pub fn fill_rect(&mut self, rect: PixelRect, gray: Gray) -> PixelRect {
        let rect = rect.intersect(self.bounds());
        if rect.is_empty() {
            return PixelRect::EMPTY;
        }
        for y in rect.y0..rect.y1 {
            let start = self.index(rect.x0, y);
            let end = self.index(rect.x1, y);
            self.pixels[start..end].fill(gray);
        }
        self.dirty.mark(rect);
        rect
    }

    /// Copies `src_rect` of `src` so that its top-left lands on
    /// `dst_origin`, clipping against both buffers. Returns the region
    /// written in `self`.
    pub fn copy_rect(
        &mut self,
        src: &Self,
        src_rect: PixelRect,
        dst_origin: PixelPoint,
    ) -> PixelRect {
        let offset = dst_origin - src_rect.origin();
        let dst = src_rect
            .intersect(src.bounds())
            .translate(offset)
            .intersect(self.bounds());
        if dst.is_empty() {
            return PixelRect::EMPTY;
        }
        let from = dst.translate(PixelPoint::ZERO - offset);
        let w = dst.width() as usize;
        for row in 0..dst.height() {
            let s = src.index(from.x0, from.y0 + row);
            let d = self.index(dst.x0, dst.y0 + row);
            self.pixels[d..d + w].copy_from_slice(&src.pixels[s..s + w]);
        }
        self.dirty.mark(dst);
        dst
    }

    /// Smallest rectangle inside `within` holding every pixel that differs
    /// from `background`, found by scanning inward from each edge.
    ///
    /// Returns [`PixelRect::EMPTY`] if the area is uniformly `background`.
    #[must_use]
    pub fn content_bounds(&self, within: PixelRect, background: Gray) -> PixelRect {
        let area = within.intersect(self.bounds());
        if area.is_empty() {
            return PixelRect::EMPTY;
        }
        let row_has_content = |y: i32| {
            let start = self.index(area.x0, y);
            let end = self.index(area.x1, y);
            self.pixels[start..end].iter().any(|&g| g != background)
        };
        let Some(top) = (area.y0..area.y1).find(|&y| row_has_content(y)) else {
            return PixelRect::EMPTY;
        };
        let bottom = (top..area.y1)
            .rev()
            .find(|&y| row_has_content(y))
            .map_or(top + 1, |y| y + 1);

        let column_has_content =
            |x: i32| (top..bottom).any(|y| self.pixels[self.index(x, y)] != background);
        let left = (area.x0..area.x1)
            .find(|&x| column_has_content(x))
            .unwrap_or(area.x0);
        let right = (left..area.x1)
            .rev()
            .find(|&x| column_has_content(x))
            .map_or(left + 1, |x| x + 1);

        PixelRect::new(left, top, right, bottom)
    }

    /// Damage accumulated since the last reset.
    #[inline]
    #[must_use]
    pub const fn dirty(&self) -> PixelRect {
        self.dirty.get()
    }

    /// Grows the damage by `rect` without writing pixels, clipped to the
    /// buffer.
    pub fn mark_dirty(&mut self, rect: PixelRect) {
        self.dirty.mark(rect.intersect(self.bounds()));
    }

    /// Returns the damage and clears it.
    pub fn take_dirty(&mut self) -> PixelRect {
        self.dirty.take()
    }

    /// Clears the damage.
    pub fn reset_dirty(&mut self) {
        self.dirty.reset();
    }

    /// Row-major index of an in-bounds pixel.
    #[inline]
    fn index(&self, x: i32, y: i32) -> usize {
        debug_assert!(
            x >= 0 && y >= 0 && x <= self.width as i32 && y < self.height as i32,
            "pixel ({x}, {y}) outside {}x{}",
            self.width,
            self.height
        );
        y as usize * self.width as usize + x as usize
    }
}

impl fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("dirty", &self.dirty.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buf(w: u32, h: u32) -> PixelBuffer {
        PixelBuffer::new(w, h, Gray::WHITE)
    }

    #[test]
    fn new_buffer_is_clean() {
        let b = buf(4, 3);
        assert_eq!(b.pixels().len(), 12);
        assert!(b.dirty().is_empty());
        assert_eq!(b.bounds(), PixelRect::new(0, 0, 4, 3));
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        let err = PixelBuffer::try_new(u32::MAX, 2, Gray::WHITE).unwrap_err();
        assert_eq!(
            err,
            BufferError::TooLarge {
                width: u32::MAX,
                height: 2
            }
        );
    }

    #[test]
    fn set_outside_is_ignored() {
        let mut b = buf(4, 4);
        assert!(!b.set(PixelPoint::new(4, 0), Gray::BLACK));
        assert!(!b.set(PixelPoint::new(-1, 2), Gray::BLACK));
        assert!(b.dirty().is_empty());
        assert!(b.set(PixelPoint::new(3, 3), Gray::BLACK));
        assert_eq!(b.get(PixelPoint::new(3, 3)), Some(Gray::BLACK));
        assert_eq!(b.dirty(), PixelRect::new(3, 3, 4, 4));
    }

    #[test]
    fn fill_clips_and_marks() {
        let mut b = buf(10, 10);
        let written = b.fill_rect(PixelRect::new(-5, 8, 3, 20), Gray::BLACK);
        assert_eq!(written, PixelRect::new(0, 8, 3, 10));
        assert_eq!(b.dirty(), written);
        assert_eq!(b.get(PixelPoint::new(2, 9)), Some(Gray::BLACK));
        assert_eq!(b.get(PixelPoint::new(3, 9)), Some(Gray::WHITE));
    }

    #[test]
    fn degenerate_fill_is_noop() {
        let mut b = buf(10, 10);
        let written = b.fill_rect(PixelRect::from_origin_size(5, 5, -3, 4), Gray::BLACK);
        assert!(written.is_empty());
        assert!(b.dirty().is_empty());
    }

    #[test]
    fn copy_rect_clips_against_both_buffers() {
        let mut src = buf(4, 4);
        src.fill_rect(PixelRect::new(0, 0, 4, 4), Gray(7));
        let mut dst = buf(6, 6);
        let written = dst.copy_rect(&src, PixelRect::new(-2, 0, 4, 4), PixelPoint::new(3, 3));
        // Source clipped to x 0..4, landing at x 5..9 then clipped to 5..6.
        assert_eq!(written, PixelRect::new(5, 3, 6, 6));
        assert_eq!(dst.get(PixelPoint::new(5, 5)), Some(Gray(7)));
        assert_eq!(dst.get(PixelPoint::new(4, 5)), Some(Gray::WHITE));
        assert_eq!(dst.dirty(), written);
    }

    #[test]
    fn content_bounds_shrinks_to_drawn_pixels() {
        let mut b = buf(20, 20);
        assert!(b.content_bounds(b.bounds(), Gray::WHITE).is_empty());

        b.set(PixelPoint::new(3, 12), Gray::BLACK);
        b.set(PixelPoint::new(15, 5), Gray(90));
        assert_eq!(
            b.content_bounds(b.bounds(), Gray::WHITE),
            PixelRect::new(3, 5, 16, 13)
        );
        assert_eq!(
            b.content_bounds(PixelRect::new(0, 0, 10, 20), Gray::WHITE),
            PixelRect::new(3, 12, 4, 13)
        );
    }

    #[test]
    fn take_dirty_resets() {
        let mut b = buf(8, 8);
        b.mark_dirty(PixelRect::new(6, 6, 12, 12));
        assert_eq!(b.take_dirty(), PixelRect::new(6, 6, 8, 8));
        assert!(b.dirty().is_empty());
    }
}
