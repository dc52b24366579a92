// Copyright 2026 the Inkpane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Times are
//! printed in milliseconds.

use std::io::Write;

use inkpane_core::geometry::PixelRect;
use inkpane_core::gesture::GestureEvent;
use inkpane_core::time::Timestamp;
use inkpane_core::timer::Tick;
use inkpane_core::trace::{
    FlushEvent, FullRefreshEvent, FullRefreshOutcome, FullRefreshScheduledEvent,
    GestureTraceEvent, PresentEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn ms(t: Timestamp) -> f64 {
    t.micros() as f64 / 1000.0
}

struct R(PixelRect);

impl std::fmt::Display for R {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{}+{}+{}",
            self.0.width(),
            self.0.height(),
            self.0.x0,
            self.0.y0
        )
    }
}

fn gesture_name(e: &GestureEvent) -> &'static str {
    match e {
        GestureEvent::ShortClick(_) => "click",
        GestureEvent::LongClick(_) => "long-click",
        GestureEvent::DragStart(_) => "drag-start",
        GestureEvent::Dragging(_) => "drag",
        GestureEvent::DragEnd(_) => "drag-end",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_flush(&mut self, e: &FlushEvent) {
        let _ = writeln!(
            self.writer,
            "[flush] at={:.1}ms layer={} src={} screen={} mode={:?}",
            ms(e.at),
            e.layer,
            R(e.source),
            R(e.screen),
            e.mode,
        );
    }

    fn on_full_refresh_scheduled(&mut self, e: &FullRefreshScheduledEvent) {
        let _ = writeln!(
            self.writer,
            "[full:scheduled] at={:.1}ms due={:.1}ms",
            ms(e.at),
            ms(e.due),
        );
    }

    fn on_full_refresh(&mut self, e: &FullRefreshEvent) {
        let outcome = match e.outcome {
            FullRefreshOutcome::Refreshed(r) => format!("refreshed {}", R(r)),
            FullRefreshOutcome::Cancelled => "cancelled".to_owned(),
            FullRefreshOutcome::NothingToRefresh => "blank".to_owned(),
        };
        let _ = writeln!(self.writer, "[full] at={:.1}ms {outcome}", ms(e.at));
    }

    fn on_present(&mut self, e: &PresentEvent) {
        let _ = writeln!(
            self.writer,
            "[present] region={} mode={:?} sync={:?}",
            R(e.region),
            e.mode,
            e.sync,
        );
    }

    fn on_gesture(&mut self, e: &GestureTraceEvent) {
        let p = e.event.pos();
        let _ = writeln!(
            self.writer,
            "[gesture] at={:.1}ms {} ({}, {})",
            ms(e.at),
            gesture_name(&e.event),
            p.x,
            p.y,
        );
    }

    fn on_timer_tick(&mut self, tick: &Tick) {
        let _ = writeln!(
            self.writer,
            "[timer] at={:.1}ms elapsed={}ms",
            ms(tick.now),
            tick.elapsed.as_millis(),
        );
    }
}
