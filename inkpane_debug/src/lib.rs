// Copyright 2026 the Inkpane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and Chrome trace export for inkpane
//! diagnostics.
//!
//! This crate provides [`TraceSink`](inkpane_core::trace::TraceSink)
//! implementations for development and post-mortem analysis of a frame loop:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`chrome::export`]: writes Chrome Trace Event Format JSON from recorded
//!   bytes, with input, compositor and panel activity on separate lanes.

pub mod chrome;
pub mod pretty;
pub mod recorder;
