// Copyright 2026 the Inkpane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer gesture classification.
//!
//! A touch panel reports one continuous stream of down, move, up and leave
//! samples. [`GestureRecognizer`] turns each press into exactly one of:
//!
//! - a [`ShortClick`](GestureEvent::ShortClick),
//! - a [`LongClick`](GestureEvent::LongClick) (held at least
//!   [`long_click_delay`](GestureConfig::long_click_delay) without moving), or
//! - a drag: one [`DragStart`](GestureEvent::DragStart), any number of
//!   [`Dragging`](GestureEvent::Dragging) samples and one
//!   [`DragEnd`](GestureEvent::DragEnd).
//!
//! # State machine
//!
//! ```text
//!            down(primary)                move > start tolerance
//!   Idle ─────────────────────► Pressed ─────────────────────────► Dragging
//!    ▲                            │  up: long/short click             │ move > dragging tolerance:
//!    │                            │  leave: nothing                   │   Dragging(pos)
//!    └────────────────────────────┴───────────────────────────────────┘ up/leave: DragEnd(pos)
//! ```
//!
//! A `down` in any state discards the gesture in progress without emitting an
//! end event. The panel is single-touch, so overlapping presses do not occur
//! in practice and no pointer identifiers are tracked.

mod event;
mod recognizer;

pub use event::{GestureEvent, PointerButton, PointerEvent};
pub use recognizer::{GestureConfig, GestureRecognizer};
