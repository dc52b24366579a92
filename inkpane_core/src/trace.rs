// Copyright 2026 the Inkpane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the compositor and input path.
//!
//! This module provides a [`TraceSink`] trait with one method per event that
//! the compositor, framebuffer and gesture recognizer report. All method
//! bodies default to no-ops, so implementing only the events you care about
//! is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).

use crate::geometry::PixelRect;
use crate::gesture::GestureEvent;
use crate::panel::{RefreshMode, RefreshRequest, RefreshSync};
use crate::time::Timestamp;
use crate::timer::Tick;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// How a deferred full-quality pass ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FullRefreshOutcome {
    /// The shrunk content rectangle was refreshed.
    Refreshed(PixelRect),
    /// An overlay was visible when the pass came due.
    Cancelled,
    /// The canvas held only background pixels.
    NothingToRefresh,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a layer's damage is copied into the framebuffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlushEvent {
    /// Render tick time.
    pub at: Timestamp,
    /// Index of the flushed layer.
    pub layer: u32,
    /// Damage in layer coordinates.
    pub source: PixelRect,
    /// Where it landed on screen.
    pub screen: PixelRect,
    /// Waveform selected for the next present.
    pub mode: RefreshMode,
}

/// Emitted when a full-quality pass is scheduled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FullRefreshScheduledEvent {
    /// Render tick time.
    pub at: Timestamp,
    /// When the pass becomes due.
    pub due: Timestamp,
}

/// Emitted when a deferred full-quality pass runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FullRefreshEvent {
    /// Time the pass ran.
    pub at: Timestamp,
    /// What it did.
    pub outcome: FullRefreshOutcome,
}

/// Emitted when a refresh request is issued to a panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PresentEvent {
    /// Refreshed screen region.
    pub region: PixelRect,
    /// Waveform.
    pub mode: RefreshMode,
    /// Synchronization.
    pub sync: RefreshSync,
}

impl From<&RefreshRequest> for PresentEvent {
    fn from(request: &RefreshRequest) -> Self {
        Self {
            region: request.region,
            mode: request.mode,
            sync: request.sync,
        }
    }
}

/// Emitted when the recognizer classifies a gesture event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GestureTraceEvent {
    /// Time of the pointer sample that produced the event.
    pub at: Timestamp,
    /// The classified event.
    pub event: GestureEvent,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when layer damage is flushed into the framebuffer.
    fn on_flush(&mut self, e: &FlushEvent) {
        _ = e;
    }

    /// Called when a full-quality pass is scheduled.
    fn on_full_refresh_scheduled(&mut self, e: &FullRefreshScheduledEvent) {
        _ = e;
    }

    /// Called when a deferred full-quality pass runs.
    fn on_full_refresh(&mut self, e: &FullRefreshEvent) {
        _ = e;
    }

    /// Called when a refresh request reaches the panel.
    fn on_present(&mut self, e: &PresentEvent) {
        _ = e;
    }

    /// Called for every classified gesture event.
    fn on_gesture(&mut self, e: &GestureTraceEvent) {
        _ = e;
    }

    /// Called when the animation timer fires.
    fn on_timer_tick(&mut self, tick: &Tick) {
        _ = tick;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`FlushEvent`].
    #[inline]
    pub fn flush(&mut self, e: &FlushEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_flush(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FullRefreshScheduledEvent`].
    #[inline]
    pub fn full_refresh_scheduled(&mut self, e: &FullRefreshScheduledEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_full_refresh_scheduled(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FullRefreshEvent`].
    #[inline]
    pub fn full_refresh(&mut self, e: &FullRefreshEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_full_refresh(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PresentEvent`].
    #[inline]
    pub fn present(&mut self, e: &PresentEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_present(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`GestureTraceEvent`].
    #[inline]
    pub fn gesture(&mut self, e: &GestureTraceEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_gesture(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a timer [`Tick`].
    #[inline]
    pub fn timer_tick(&mut self, tick: &Tick) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_timer_tick(tick);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = tick;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PixelPoint;

    fn sample_flush() -> FlushEvent {
        FlushEvent {
            at: Timestamp::from_millis(10),
            layer: 0,
            source: PixelRect::new(0, 0, 8, 8),
            screen: PixelRect::new(100, 50, 108, 58),
            mode: RefreshMode::Auto,
        }
    }

    #[test]
    fn present_event_from_request() {
        let request = RefreshRequest {
            region: PixelRect::new(1, 2, 3, 4),
            mode: RefreshMode::Quality,
            sync: RefreshSync::Blocking,
        };
        let evt = PresentEvent::from(&request);
        assert_eq!(evt.region, request.region);
        assert_eq!(evt.mode, RefreshMode::Quality);
        assert_eq!(evt.sync, RefreshSync::Blocking);
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_flush(&sample_flush());
        sink.on_full_refresh(&FullRefreshEvent {
            at: Timestamp::from_micros(0),
            outcome: FullRefreshOutcome::Cancelled,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.flush(&sample_flush());
        tracer.gesture(&GestureTraceEvent {
            at: Timestamp::from_millis(1),
            event: GestureEvent::ShortClick(PixelPoint::new(1, 1)),
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            flushed: Vec<PixelRect>,
            gestures: Vec<GestureEvent>,
        }
        impl TraceSink for RecordingSink {
            fn on_flush(&mut self, e: &FlushEvent) {
                self.flushed.push(e.screen);
            }
            fn on_gesture(&mut self, e: &GestureTraceEvent) {
                self.gestures.push(e.event);
            }
        }

        let mut sink = RecordingSink {
            flushed: Vec::new(),
            gestures: Vec::new(),
        };
        let mut tracer = Tracer::new(&mut sink);
        tracer.flush(&sample_flush());
        tracer.gesture(&GestureTraceEvent {
            at: Timestamp::from_millis(2),
            event: GestureEvent::DragStart(PixelPoint::new(4, 4)),
        });
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.flushed, &[PixelRect::new(100, 50, 108, 58)]);
        assert_eq!(sink.gestures, &[GestureEvent::DragStart(PixelPoint::new(4, 4))]);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn recognizer_reports_through_tracer() {
        use alloc::vec::Vec;

        use crate::gesture::{GestureRecognizer, PointerButton, PointerEvent};

        #[derive(Default)]
        struct Gestures(Vec<(Timestamp, GestureEvent)>);
        impl TraceSink for Gestures {
            fn on_gesture(&mut self, e: &GestureTraceEvent) {
                self.0.push((e.at, e.event));
            }
        }

        let mut sink = Gestures::default();
        let mut tracer = Tracer::new(&mut sink);
        let mut r = GestureRecognizer::default();
        let pos = PixelPoint::new(3, 3);
        r.handle_traced(
            PointerEvent::Down {
                pos,
                button: PointerButton::Primary,
                time: Timestamp::from_millis(0),
            },
            &mut tracer,
        );
        r.handle_traced(
            PointerEvent::Up {
                pos,
                time: Timestamp::from_millis(20),
            },
            &mut tracer,
        );
        drop(tracer);
        assert_eq!(
            sink.0,
            &[(Timestamp::from_millis(20), GestureEvent::ShortClick(pos))]
        );
    }
}
