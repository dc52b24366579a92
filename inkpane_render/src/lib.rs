// Copyright 2026 the Inkpane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Software compositor and draw primitives for partial-refresh displays.
//!
//! This crate turns draw calls from an application engine into the smallest
//! correct display refresh. It defines:
//!
//! - [`Gray`], [`Palette`] and [`Dither`]: the pixel model
//! - [`PixelBuffer`]: owned pixels with an embedded dirty rectangle
//! - [`Layer`]: a buffer plus single-level scissor clipping
//! - [`raster`]: lines, thick lines, polygons, circles and text placement
//! - [`BlitterStore`]: saved pixel regions behind generational handles
//! - [`DrawingApi`]: the object-safe draw-primitive interface
//! - [`Framebuffer`]: the explicitly passed display memory handle
//! - [`Canvas`]: layers, damage flushing and the deferred full-quality pass
//!
//! Geometry, timestamps, the [`Panel`](inkpane_core::panel::Panel) contract
//! and tracing come from [`inkpane_core`].
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Forwards to `inkpane_core/trace`.

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

mod api;
mod blitter;
mod buffer;
mod canvas;
mod framebuffer;
mod layer;
mod pixel;
pub mod raster;
mod text;

pub use api::DrawingApi;
pub use blitter::{BlitterId, BlitterStore};
pub use buffer::{BufferError, PixelBuffer};
pub use canvas::{Canvas, CanvasConfig, RenderOutcome, RenderTick};
pub use framebuffer::Framebuffer;
pub use layer::Layer;
pub use pixel::{Dither, Gray, Palette};
pub use text::{GlyphMask, TextAlign, TextRasterizer};
