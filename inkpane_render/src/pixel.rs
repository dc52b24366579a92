// Copyright 2026 the Inkpane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gray pixels, engine palettes and ordered dithering.

use alloc::vec::Vec;
use core::fmt;

use inkpane_core::geometry::PixelPoint;

/// An 8-bit gray level, `0` black, `255` white.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Gray(pub u8);

impl Gray {
    /// Full black.
    pub const BLACK: Self = Self(0);
    /// Full white, the panel's resting state.
    pub const WHITE: Self = Self(255);

    /// Converts linear RGB components in `0.0..=1.0` to a gray level using
    /// Rec. 601 luma weights. Out-of-range and NaN components clamp.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "luma is clamped to 0..=255 before the cast"
    )]
    pub fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        let luma = 0.299 * unit(r) + 0.587 * unit(g) + 0.114 * unit(b);
        Self((luma * 255.0 + 0.5).clamp(0.0, 255.0) as u8)
    }

    /// Returns `true` for pure black or pure white.
    #[inline]
    #[must_use]
    pub const fn is_bilevel(self) -> bool {
        self.0 == 0 || self.0 == 255
    }
}

impl Default for Gray {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Debug for Gray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Gray({:#04x})", self.0)
    }
}

fn unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// How non-bi-level grays are written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Dither {
    /// Store the gray level unchanged.
    #[default]
    None,
    /// Threshold against a 2×2 ordered Bayer matrix, producing a pattern of
    /// pure black and white.
    Bayer2,
}

/// Bayer 2×2 thresholds, `(index * 64 + 32)` for the matrix `[[0, 2], [3, 1]]`.
const BAYER2: [[u8; 2]; 2] = [[32, 160], [224, 96]];

impl Dither {
    /// Returns the gray actually written for `gray` at pixel `at`.
    #[inline]
    #[must_use]
    pub fn apply(self, gray: Gray, at: PixelPoint) -> Gray {
        match self {
            Self::None => gray,
            Self::Bayer2 if gray.is_bilevel() => gray,
            Self::Bayer2 => {
                let threshold = BAYER2[(at.y & 1) as usize][(at.x & 1) as usize];
                if gray.0 < threshold {
                    Gray::BLACK
                } else {
                    Gray::WHITE
                }
            }
        }
    }
}

/// Maps engine color indices to grays.
///
/// Game engines describe their colors as RGB triples and then refer to them
/// by index. The palette converts each triple once, and lets the frontend
/// override individual entries (for instance to force a highlight color to
/// pure black so it survives fast waveforms).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Palette {
    grays: Vec<Gray>,
}

impl Palette {
    /// Builds a palette from RGB triples in `0.0..=1.0`.
    #[must_use]
    pub fn from_rgb(colors: &[[f32; 3]]) -> Self {
        Self {
            grays: colors
                .iter()
                .map(|&[r, g, b]| Gray::from_rgb(r, g, b))
                .collect(),
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.grays.len()
    }

    /// Returns `true` if the palette has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grays.is_empty()
    }

    /// Returns the gray for `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn gray(&self, index: usize) -> Gray {
        assert!(
            index < self.grays.len(),
            "color index {index} out of range (palette has {} entries)",
            self.grays.len()
        );
        self.grays[index]
    }

    /// Resolves an optional engine color, where `None` means "no fill".
    #[must_use]
    pub fn resolve(&self, index: Option<usize>) -> Option<Gray> {
        index.map(|i| self.gray(i))
    }

    /// Replaces the gray of one entry.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn set_override(&mut self, index: usize, gray: Gray) {
        assert!(
            index < self.grays.len(),
            "color index {index} out of range (palette has {} entries)",
            self.grays.len()
        );
        self.grays[index] = gray;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luma_conversion() {
        assert_eq!(Gray::from_rgb(1.0, 1.0, 1.0), Gray::WHITE);
        assert_eq!(Gray::from_rgb(0.0, 0.0, 0.0), Gray::BLACK);
        // Pure green is brighter than pure blue.
        assert!(Gray::from_rgb(0.0, 1.0, 0.0) > Gray::from_rgb(0.0, 0.0, 1.0));
        assert_eq!(Gray::from_rgb(2.0, f32::NAN, -1.0), Gray::from_rgb(1.0, 0.0, 0.0));
    }

    #[test]
    fn bayer_leaves_bilevel_alone() {
        for y in 0..2 {
            for x in 0..2 {
                let p = PixelPoint::new(x, y);
                assert_eq!(Dither::Bayer2.apply(Gray::BLACK, p), Gray::BLACK);
                assert_eq!(Dither::Bayer2.apply(Gray::WHITE, p), Gray::WHITE);
            }
        }
    }

    #[test]
    fn bayer_mid_gray_is_half_covered() {
        let mid = Gray(128);
        let black = (0..2)
            .flat_map(|y| (0..2).map(move |x| PixelPoint::new(x, y)))
            .filter(|&p| Dither::Bayer2.apply(mid, p) == Gray::BLACK)
            .count();
        assert_eq!(black, 2);
    }

    #[test]
    fn bayer_pattern_repeats() {
        let g = Gray(100);
        assert_eq!(
            Dither::Bayer2.apply(g, PixelPoint::new(0, 0)),
            Dither::Bayer2.apply(g, PixelPoint::new(6, -4))
        );
    }

    #[test]
    fn palette_overrides() {
        let mut palette = Palette::from_rgb(&[[1.0, 1.0, 1.0], [0.5, 0.5, 0.5]]);
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.gray(0), Gray::WHITE);
        palette.set_override(1, Gray::BLACK);
        assert_eq!(palette.resolve(Some(1)), Some(Gray::BLACK));
        assert_eq!(palette.resolve(None), None);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn palette_index_out_of_range_panics() {
        let palette = Palette::from_rgb(&[[0.0, 0.0, 0.0]]);
        let _ = palette.gray(3);
    }
}
