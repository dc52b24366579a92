// Copyright 2026 the Inkpane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture recognizer state machine.

use core::time::Duration;

use super::event::{GestureEvent, PointerButton, PointerEvent};
use crate::geometry::PixelPoint;
use crate::time::Timestamp;
use crate::trace::{GestureTraceEvent, Tracer};

/// Thresholds for [`GestureRecognizer`].
///
/// Tolerances are compared per axis: a move exceeds tolerance `t` when
/// `|dx| > t` or `|dy| > t`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GestureConfig {
    /// Distance from the press origin beyond which a press becomes a drag.
    pub drag_start_tolerance: i32,
    /// Once dragging, movement since the last reported sample required to
    /// report another one.
    pub dragging_tolerance: i32,
    /// Minimum hold time for a release to count as a long click.
    pub long_click_delay: Duration,
}

impl GestureConfig {
    /// Thresholds tuned for a finger on a capacitive e-reader panel.
    #[must_use]
    pub const fn touch() -> Self {
        Self {
            drag_start_tolerance: 50,
            dragging_tolerance: 25,
            long_click_delay: Duration::from_millis(500),
        }
    }

    /// Returns a copy with both drag tolerances replaced.
    #[must_use]
    pub const fn with_drag_tolerances(mut self, start: i32, dragging: i32) -> Self {
        self.drag_start_tolerance = start;
        self.dragging_tolerance = dragging;
        self
    }

    /// Returns a copy with a different long-click delay.
    #[must_use]
    pub const fn with_long_click_delay(mut self, delay: Duration) -> Self {
        self.long_click_delay = delay;
        self
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self::touch()
    }
}

/// The press in progress.
#[derive(Clone, Copy, Debug)]
struct Press {
    origin: PixelPoint,
    started_at: Timestamp,
    /// Reference point for the next tolerance check.
    last_sample: PixelPoint,
    dragging: bool,
}

impl Press {
    fn moved_beyond(&self, pos: PixelPoint, tolerance: i32) -> bool {
        let t = i64::from(tolerance);
        let dx = i64::from(pos.x) - i64::from(self.last_sample.x);
        let dy = i64::from(pos.y) - i64::from(self.last_sample.y);
        dx.abs() > t || dy.abs() > t
    }
}

/// Classifies one pointer stream into [`GestureEvent`]s.
///
/// Feed every raw sample to [`handle`](Self::handle); at most one gesture
/// event results per sample.
#[derive(Clone, Debug, Default)]
pub struct GestureRecognizer {
    config: GestureConfig,
    press: Option<Press>,
}

impl GestureRecognizer {
    /// Creates an idle recognizer.
    #[must_use]
    pub const fn new(config: GestureConfig) -> Self {
        Self {
            config,
            press: None,
        }
    }

    /// Returns the active thresholds.
    #[must_use]
    pub const fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Replaces the thresholds. A press in progress keeps going under the
    /// new values.
    pub fn set_config(&mut self, config: GestureConfig) {
        self.config = config;
    }

    /// Returns `true` while a press is in progress.
    #[must_use]
    pub const fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    /// Returns `true` while the press in progress has become a drag.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.press.is_some_and(|p| p.dragging)
    }

    /// Drops the gesture in progress without emitting anything.
    pub fn reset(&mut self) {
        self.press = None;
    }

    /// Advances the state machine by one sample.
    pub fn handle(&mut self, event: PointerEvent) -> Option<GestureEvent> {
        match event {
            PointerEvent::Down { pos, button, time } => {
                if self.press.is_some() {
                    log::debug!("gesture discarded by new press at {pos:?}");
                }
                self.press = (button == PointerButton::Primary).then_some(Press {
                    origin: pos,
                    started_at: time,
                    last_sample: pos,
                    dragging: false,
                });
                None
            }
            PointerEvent::Move { pos, .. } => {
                let press = self.press.as_mut()?;
                if press.dragging {
                    if !press.moved_beyond(pos, self.config.dragging_tolerance) {
                        return None;
                    }
                    press.last_sample = pos;
                    Some(GestureEvent::Dragging(pos))
                } else {
                    if !press.moved_beyond(pos, self.config.drag_start_tolerance) {
                        return None;
                    }
                    press.dragging = true;
                    press.last_sample = pos;
                    log::debug!("drag started at {:?}", press.origin);
                    Some(GestureEvent::DragStart(press.origin))
                }
            }
            PointerEvent::Up { pos, time } => {
                let press = self.press.take()?;
                let event = if press.dragging {
                    GestureEvent::DragEnd(pos)
                } else if time.saturating_duration_since(press.started_at)
                    >= self.config.long_click_delay
                {
                    GestureEvent::LongClick(pos)
                } else {
                    GestureEvent::ShortClick(pos)
                };
                log::debug!("gesture ended: {event:?}");
                Some(event)
            }
            PointerEvent::Leave { pos, .. } => {
                let press = self.press.take()?;
                press.dragging.then_some(GestureEvent::DragEnd(pos))
            }
        }
    }

    /// [`handle`](Self::handle), reporting any emitted event to `tracer`.
    pub fn handle_traced(
        &mut self,
        event: PointerEvent,
        tracer: &mut Tracer<'_>,
    ) -> Option<GestureEvent> {
        let out = self.handle(event);
        if let Some(gesture) = out {
            tracer.gesture(&GestureTraceEvent {
                at: event.time(),
                event: gesture,
            });
        }
        out
    }
}
