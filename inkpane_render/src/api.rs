// Copyright 2026 the Inkpane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The draw-primitive interface consumed by application engines.
//!
//! Engine adapters hold a `&mut dyn DrawingApi` and translate their own
//! callbacks into these calls. Colors arrive already resolved to [`Gray`]
//! (see [`Palette`](crate::Palette)); `None` as a fill means "outline only".

use kurbo::Point;

use inkpane_core::geometry::{PixelPoint, PixelRect};

use crate::blitter::BlitterId;
use crate::pixel::Gray;
use crate::text::{TextAlign, TextRasterizer};

/// Draw primitives, clipping, damage hints and blitters.
///
/// Coordinates are in the implementor's drawing space. Drawing outside the
/// surface is clipped; degenerate shapes draw nothing.
pub trait DrawingApi {
    /// Fills a rectangle.
    fn draw_rect(&mut self, rect: PixelRect, color: Gray);

    /// Draws a one-pixel line, both endpoints included.
    fn draw_line(&mut self, from: PixelPoint, to: PixelPoint, color: Gray);

    /// Draws a line `thickness` pixels wide.
    fn draw_thick_line(&mut self, from: Point, to: Point, thickness: f64, color: Gray);

    /// Draws a closed polygon, optionally filled.
    fn draw_polygon(&mut self, points: &[PixelPoint], fill: Option<Gray>, outline: Gray);

    /// Draws a circle, optionally filled.
    fn draw_circle(&mut self, center: PixelPoint, radius: i32, fill: Option<Gray>, outline: Gray);

    /// Renders `text` with `fonts` and draws it anchored at `pos`.
    fn draw_text(
        &mut self,
        pos: PixelPoint,
        size: u32,
        align: TextAlign,
        color: Gray,
        text: &str,
        fonts: &mut dyn TextRasterizer,
    );

    /// Marks `rect` as changed without drawing.
    fn draw_update(&mut self, rect: PixelRect);

    /// Confines subsequent drawing to `rect` until [`unclip`](Self::unclip).
    fn clip(&mut self, rect: PixelRect);

    /// Lifts the clip installed by [`clip`](Self::clip).
    fn unclip(&mut self);

    /// Allocates a `width × height` blitter.
    fn blitter_new(&mut self, width: u32, height: u32) -> BlitterId;

    /// Frees a blitter. The handle must not be used afterwards.
    fn blitter_free(&mut self, id: BlitterId);

    /// Saves the region at `pos` into the blitter.
    fn blitter_save(&mut self, id: BlitterId, pos: PixelPoint);

    /// Restores the blitter at `pos`, or where it was saved from if `None`.
    fn blitter_load(&mut self, id: BlitterId, pos: Option<PixelPoint>);
}
