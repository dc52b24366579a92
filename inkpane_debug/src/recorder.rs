// Copyright 2026 the Inkpane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as tagged little-endian records. [`decode`] reads them back as
//! an iterator of [`RecordedEvent`].
//!
//! Rectangles are stored as four `i32` edges, timestamps as `u64`
//! microseconds and enums as a single byte.

use std::time::Duration;

use inkpane_core::geometry::{PixelPoint, PixelRect};
use inkpane_core::gesture::GestureEvent;
use inkpane_core::panel::{RefreshMode, RefreshSync};
use inkpane_core::time::Timestamp;
use inkpane_core::timer::Tick;
use inkpane_core::trace::{
    FlushEvent, FullRefreshEvent, FullRefreshOutcome, FullRefreshScheduledEvent,
    GestureTraceEvent, PresentEvent, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_FLUSH: u8 = 1;
const TAG_FULL_REFRESH_SCHEDULED: u8 = 2;
const TAG_FULL_REFRESH: u8 = 3;
const TAG_PRESENT: u8 = 4;
const TAG_GESTURE: u8 = 5;
const TAG_TIMER_TICK: u8 = 6;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_time(&mut self, t: Timestamp) {
        self.write_u64(t.micros());
    }

    fn write_rect(&mut self, r: PixelRect) {
        self.write_i32(r.x0);
        self.write_i32(r.y0);
        self.write_i32(r.x1);
        self.write_i32(r.y1);
    }

    fn write_point(&mut self, p: PixelPoint) {
        self.write_i32(p.x);
        self.write_i32(p.y);
    }

    fn write_mode(&mut self, m: RefreshMode) {
        self.write_u8(match m {
            RefreshMode::Fast => 0,
            RefreshMode::Auto => 1,
            RefreshMode::Quality => 2,
        });
    }

    fn write_sync(&mut self, s: RefreshSync) {
        self.write_u8(match s {
            RefreshSync::Async => 0,
            RefreshSync::Blocking => 1,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_flush(&mut self, e: &FlushEvent) {
        self.write_u8(TAG_FLUSH);
        self.write_time(e.at);
        self.write_u32(e.layer);
        self.write_rect(e.source);
        self.write_rect(e.screen);
        self.write_mode(e.mode);
    }

    fn on_full_refresh_scheduled(&mut self, e: &FullRefreshScheduledEvent) {
        self.write_u8(TAG_FULL_REFRESH_SCHEDULED);
        self.write_time(e.at);
        self.write_time(e.due);
    }

    fn on_full_refresh(&mut self, e: &FullRefreshEvent) {
        self.write_u8(TAG_FULL_REFRESH);
        self.write_time(e.at);
        // The rect is always written so records stay fixed-size per tag.
        let (kind, rect) = match e.outcome {
            FullRefreshOutcome::Refreshed(r) => (0, r),
            FullRefreshOutcome::Cancelled => (1, PixelRect::EMPTY),
            FullRefreshOutcome::NothingToRefresh => (2, PixelRect::EMPTY),
        };
        self.write_u8(kind);
        self.write_rect(rect);
    }

    fn on_present(&mut self, e: &PresentEvent) {
        self.write_u8(TAG_PRESENT);
        self.write_rect(e.region);
        self.write_mode(e.mode);
        self.write_sync(e.sync);
    }

    fn on_gesture(&mut self, e: &GestureTraceEvent) {
        self.write_u8(TAG_GESTURE);
        self.write_time(e.at);
        self.write_u8(match e.event {
            GestureEvent::ShortClick(_) => 0,
            GestureEvent::LongClick(_) => 1,
            GestureEvent::DragStart(_) => 2,
            GestureEvent::Dragging(_) => 3,
            GestureEvent::DragEnd(_) => 4,
        });
        self.write_point(e.event.pos());
    }

    fn on_timer_tick(&mut self, tick: &Tick) {
        self.write_u8(TAG_TIMER_TICK);
        self.write_time(tick.now);
        self.write_u64(u64::try_from(tick.elapsed.as_micros()).unwrap_or(u64::MAX));
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedEvent {
    /// A [`FlushEvent`].
    Flush(FlushEvent),
    /// A [`FullRefreshScheduledEvent`].
    FullRefreshScheduled(FullRefreshScheduledEvent),
    /// A [`FullRefreshEvent`].
    FullRefresh(FullRefreshEvent),
    /// A [`PresentEvent`].
    Present(PresentEvent),
    /// A [`GestureTraceEvent`].
    Gesture(GestureTraceEvent),
    /// A timer [`Tick`].
    TimerTick(Tick),
}

impl RecordedEvent {
    /// Time the event was recorded at, if it carries one.
    ///
    /// Present events are issued within the render tick that precedes them
    /// and carry no time of their own.
    #[must_use]
    pub fn at(&self) -> Option<Timestamp> {
        match self {
            Self::Flush(e) => Some(e.at),
            Self::FullRefreshScheduled(e) => Some(e.at),
            Self::FullRefresh(e) => Some(e.at),
            Self::Present(_) => None,
            Self::Gesture(e) => Some(e.at),
            Self::TimerTick(t) => Some(t.now),
        }
    }
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
///
/// Stops at the first unknown tag or truncated record.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?;
        self.pos += N;
        bytes.try_into().ok()
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[b]| b)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_i32(&mut self) -> Option<i32> {
        self.take().map(i32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_time(&mut self) -> Option<Timestamp> {
        self.read_u64().map(Timestamp::from_micros)
    }

    fn read_rect(&mut self) -> Option<PixelRect> {
        Some(PixelRect::new(
            self.read_i32()?,
            self.read_i32()?,
            self.read_i32()?,
            self.read_i32()?,
        ))
    }

    fn read_point(&mut self) -> Option<PixelPoint> {
        Some(PixelPoint::new(self.read_i32()?, self.read_i32()?))
    }

    fn read_mode(&mut self) -> Option<RefreshMode> {
        Some(match self.read_u8()? {
            0 => RefreshMode::Fast,
            1 => RefreshMode::Auto,
            _ => RefreshMode::Quality,
        })
    }

    fn read_sync(&mut self) -> Option<RefreshSync> {
        Some(match self.read_u8()? {
            0 => RefreshSync::Async,
            _ => RefreshSync::Blocking,
        })
    }

    fn decode_flush(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Flush(FlushEvent {
            at: self.read_time()?,
            layer: self.read_u32()?,
            source: self.read_rect()?,
            screen: self.read_rect()?,
            mode: self.read_mode()?,
        }))
    }

    fn decode_full_refresh_scheduled(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FullRefreshScheduled(
            FullRefreshScheduledEvent {
                at: self.read_time()?,
                due: self.read_time()?,
            },
        ))
    }

    fn decode_full_refresh(&mut self) -> Option<RecordedEvent> {
        let at = self.read_time()?;
        let kind = self.read_u8()?;
        let rect = self.read_rect()?;
        let outcome = match kind {
            0 => FullRefreshOutcome::Refreshed(rect),
            1 => FullRefreshOutcome::Cancelled,
            _ => FullRefreshOutcome::NothingToRefresh,
        };
        Some(RecordedEvent::FullRefresh(FullRefreshEvent { at, outcome }))
    }

    fn decode_present(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Present(PresentEvent {
            region: self.read_rect()?,
            mode: self.read_mode()?,
            sync: self.read_sync()?,
        }))
    }

    fn decode_gesture(&mut self) -> Option<RecordedEvent> {
        let at = self.read_time()?;
        let kind = self.read_u8()?;
        let pos = self.read_point()?;
        let event = match kind {
            0 => GestureEvent::ShortClick(pos),
            1 => GestureEvent::LongClick(pos),
            2 => GestureEvent::DragStart(pos),
            3 => GestureEvent::Dragging(pos),
            _ => GestureEvent::DragEnd(pos),
        };
        Some(RecordedEvent::Gesture(GestureTraceEvent { at, event }))
    }

    fn decode_timer_tick(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::TimerTick(Tick {
            now: self.read_time()?,
            elapsed: Duration::from_micros(self.read_u64()?),
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_FLUSH => self.decode_flush(),
            TAG_FULL_REFRESH_SCHEDULED => self.decode_full_refresh_scheduled(),
            TAG_FULL_REFRESH => self.decode_full_refresh(),
            TAG_PRESENT => self.decode_present(),
            TAG_GESTURE => self.decode_gesture(),
            TAG_TIMER_TICK => self.decode_timer_tick(),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
