// Copyright 2026 the Inkpane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for driving a partial-refresh (e-ink) display from an
//! interactive application.
//!
//! `inkpane_core` holds everything that does not touch pixels: integer
//! geometry, damage tracking, timestamps, the pointer gesture recognizer, the
//! hardware [`Panel`](panel::Panel) contract and frame-loop tracing. It is
//! `no_std` compatible (with `alloc`). Pixel storage and compositing live in
//! `inkpane_render`.
//!
//! # Architecture
//!
//! A single-threaded loop ties the pieces together:
//!
//! ```text
//!   pointer events ──► GestureRecognizer::handle() ──► GestureEvent
//!                                                          │
//!                       (controller / engine) ◄────────────┘
//!                                │ draw primitives
//!                                ▼
//!   Canvas (inkpane_render) ──► DirtyRect per layer
//!                                │ render tick
//!                                ▼
//!   Framebuffer ──► Panel::refresh(region, RefreshMode, RefreshSync)
//! ```
//!
//! **[`geometry`]**: Half-open integer rectangles and points, with
//! conversions to and from `kurbo`.
//!
//! **[`dirty`]**: The running bounding box of pixels written since the last
//! flush.
//!
//! **[`gesture`]**: Classifies a down/move/up/leave stream into short
//! clicks, long clicks and drags.
//!
//! **[`panel`]**: The [`Panel`](panel::Panel) trait hardware backends
//! implement, and the refresh modes they understand.
//!
//! **[`time`]** / **[`timer`]**: Monotonic timestamps and the repeating
//! animation timer requested by the application engine.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! compositor and input instrumentation, with zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod dirty;
pub mod geometry;
pub mod gesture;
pub mod panel;
pub mod time;
pub mod timer;
pub mod trace;
