// Copyright 2026 the Inkpane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! Input, compositor and panel activity land on separate threads (`tid`), so
//! a frame loop reads as one lane per stage in the viewer.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use inkpane_core::geometry::PixelRect;
use inkpane_core::gesture::GestureEvent;
use inkpane_core::trace::FullRefreshOutcome;

use crate::recorder::{RecordedEvent, decode};

const TID_INPUT: u32 = 0;
const TID_COMPOSITOR: u32 = 1;
const TID_PANEL: u32 = 2;

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Present events carry no time of their own and are stamped with the time
/// of the closest preceding event.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut last_us = 0_u64;

    for recorded in decode(bytes) {
        if let Some(at) = recorded.at() {
            last_us = at.micros();
        }
        match recorded {
            RecordedEvent::Flush(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Flush",
                    "cat": "Compositor",
                    "ts": last_us,
                    "pid": 0,
                    "tid": TID_COMPOSITOR,
                    "s": "t",
                    "args": {
                        "layer": e.layer,
                        "source": rect_json(e.source),
                        "screen": rect_json(e.screen),
                        "mode": format!("{:?}", e.mode),
                    }
                }));
            }
            RecordedEvent::FullRefreshScheduled(e) => {
                // Spans from scheduling to the due time.
                events.push(json!({
                    "ph": "X",
                    "name": "FullRefreshPending",
                    "cat": "Compositor",
                    "ts": last_us,
                    "dur": e.due.micros().saturating_sub(last_us),
                    "pid": 0,
                    "tid": TID_COMPOSITOR,
                }));
            }
            RecordedEvent::FullRefresh(e) => {
                let (outcome, region) = match e.outcome {
                    FullRefreshOutcome::Refreshed(r) => ("refreshed", Some(rect_json(r))),
                    FullRefreshOutcome::Cancelled => ("cancelled", None),
                    FullRefreshOutcome::NothingToRefresh => ("blank", None),
                };
                events.push(json!({
                    "ph": "i",
                    "name": "FullRefresh",
                    "cat": "Compositor",
                    "ts": last_us,
                    "pid": 0,
                    "tid": TID_COMPOSITOR,
                    "s": "p",
                    "args": {
                        "outcome": outcome,
                        "region": region,
                    }
                }));
            }
            RecordedEvent::Present(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": format!("Present{:?}", e.mode),
                    "cat": "Panel",
                    "ts": last_us,
                    "pid": 0,
                    "tid": TID_PANEL,
                    "s": "t",
                    "args": {
                        "region": rect_json(e.region),
                        "sync": format!("{:?}", e.sync),
                    }
                }));
            }
            RecordedEvent::Gesture(e) => {
                let p = e.event.pos();
                events.push(json!({
                    "ph": "i",
                    "name": gesture_name(&e.event),
                    "cat": "Input",
                    "ts": last_us,
                    "pid": 0,
                    "tid": TID_INPUT,
                    "s": "t",
                    "args": {
                        "x": p.x,
                        "y": p.y,
                    }
                }));
            }
            RecordedEvent::TimerTick(t) => {
                events.push(json!({
                    "ph": "i",
                    "name": "TimerTick",
                    "cat": "Input",
                    "ts": last_us,
                    "pid": 0,
                    "tid": TID_INPUT,
                    "s": "g",
                    "args": {
                        "elapsed_us": u64::try_from(t.elapsed.as_micros()).unwrap_or(u64::MAX),
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn gesture_name(e: &GestureEvent) -> &'static str {
    match e {
        GestureEvent::ShortClick(_) => "ShortClick",
        GestureEvent::LongClick(_) => "LongClick",
        GestureEvent::DragStart(_) => "DragStart",
        GestureEvent::Dragging(_) => "Dragging",
        GestureEvent::DragEnd(_) => "DragEnd",
    }
}

fn rect_json(r: PixelRect) -> Value {
    json!([r.x0, r.y0, r.x1, r.y1])
}
