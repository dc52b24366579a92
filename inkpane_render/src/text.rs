// Copyright 2026 the Inkpane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text bitmaps and their placement.
//!
//! Shaping and glyph rendering are supplied by the host through
//! [`TextRasterizer`]; this module only decides where the resulting
//! [`GlyphMask`] lands relative to the anchor point the engine gave.

use alloc::vec::Vec;

use inkpane_core::geometry::PixelPoint;

bitflags::bitflags! {
    /// Anchor of a text run relative to its position.
    ///
    /// With no flags the position is the top-left corner of the bitmap.
    /// Vertical and horizontal flags combine; within one axis the first
    /// listed flag wins.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TextAlign: u8 {
        /// Position is on the baseline: the bitmap moves up by the font size.
        const BASELINE = 1 << 0;
        /// Position is the vertical center: the bitmap moves up by half the
        /// font size.
        const VCENTER = 1 << 1;
        /// Position is the horizontal center.
        const HCENTER = 1 << 2;
        /// Position is the right edge.
        const RIGHT = 1 << 3;
    }
}

impl TextAlign {
    /// Top-left corner of a `width`-wide bitmap anchored at `pos`.
    ///
    /// The font size stands in for the line height.
    #[must_use]
    pub fn place(self, pos: PixelPoint, size: u32, width: u32) -> PixelPoint {
        let size = i32::try_from(size).unwrap_or(i32::MAX);
        let width = i32::try_from(width).unwrap_or(i32::MAX);
        let mut origin = pos;
        if self.contains(Self::BASELINE) {
            origin.y = origin.y.saturating_sub(size);
        } else if self.contains(Self::VCENTER) {
            origin.y = origin.y.saturating_sub(size / 2);
        }
        if self.contains(Self::HCENTER) {
            origin.x = origin.x.saturating_sub(width / 2);
        } else if self.contains(Self::RIGHT) {
            origin.x = origin.x.saturating_sub(width);
        }
        origin
    }
}

/// A one-bit coverage bitmap for a rendered run of text.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct GlyphMask {
    width: u32,
    height: u32,
    coverage: Vec<bool>,
}

impl GlyphMask {
    /// Creates a mask from row-major coverage.
    ///
    /// # Panics
    ///
    /// Panics if `coverage.len()` is not `width * height`.
    #[must_use]
    pub fn new(width: u32, height: u32, coverage: Vec<bool>) -> Self {
        assert_eq!(
            coverage.len() as u64,
            u64::from(width) * u64::from(height),
            "glyph mask coverage does not match {width}x{height}"
        );
        Self {
            width,
            height,
            coverage,
        }
    }

    /// Creates a mask by evaluating `covered(x, y)` for every pixel.
    #[must_use]
    pub fn from_fn(width: u32, height: u32, mut covered: impl FnMut(u32, u32) -> bool) -> Self {
        let coverage = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| covered(x, y))
            .collect();
        Self {
            width,
            height,
            coverage,
        }
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Iterates over the covered pixels as offsets from the top-left.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "mask dimensions fit in i32 pixel coordinates"
    )]
    pub fn covered(&self) -> impl Iterator<Item = PixelPoint> + '_ {
        let width = self.width.max(1) as usize;
        self.coverage
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c)
            .map(move |(i, _)| PixelPoint::new((i % width) as i32, (i / width) as i32))
    }
}

impl core::fmt::Debug for GlyphMask {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GlyphMask")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Renders strings to coverage bitmaps. Implemented by the host's font
/// stack.
pub trait TextRasterizer {
    /// Renders `text` at `size` pixels.
    fn rasterize(&mut self, text: &str, size: u32) -> GlyphMask;
}
