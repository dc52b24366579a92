// Copyright 2026 the Inkpane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hardware contract for partial-refresh panels.
//!
//! An e-ink controller does not scan out a framebuffer continuously. Pixels
//! written to display memory only become visible when the driver is asked to
//! refresh a region, and it offers several *waveforms* trading speed for
//! quality:
//!
//! - fast waveforms update a region in a few hundred milliseconds but leave
//!   faint residue ("ghosting") that accumulates over many updates;
//! - full-quality waveforms flash the region through black and white, clearing
//!   residue, and take an order of magnitude longer.
//!
//! Backends implement [`Panel`]. The compositor decides *which* region to
//! refresh and *how*; the panel only executes the request.
//!
//! # Frame loop pseudocode
//!
//! ```rust,ignore
//! fn on_tick(now: Timestamp) {
//!     let tick = RenderTick { now, overlay_visible: dialog.is_shown() };
//!     canvas.render(&mut framebuffer, &tick);
//!     framebuffer.present(&mut panel);
//!     if canvas.next_deadline().is_some_and(|due| due <= now) {
//!         canvas.run_deferred(&mut framebuffer, &mut panel, &tick);
//!     }
//! }
//! ```

use crate::geometry::PixelRect;

/// Waveform used for a refresh.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RefreshMode {
    /// Direct black/white update. Fastest, most ghosting, grays lost.
    Fast,
    /// Let the controller pick per pixel (fast for bi-level content, grayscale
    /// otherwise).
    #[default]
    Auto,
    /// Full-quality flashing update that clears accumulated ghosting.
    Quality,
}

/// Whether the caller waits for the refresh to complete.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RefreshSync {
    /// Queue the refresh and return immediately.
    #[default]
    Async,
    /// Return only after the panel has finished updating.
    Blocking,
}

/// A single refresh request, as issued to a [`Panel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RefreshRequest {
    /// Screen-space region to refresh. Never empty.
    pub region: PixelRect,
    /// Waveform.
    pub mode: RefreshMode,
    /// Synchronization.
    pub sync: RefreshSync,
}

/// Applies refresh requests to a physical display.
///
/// The display memory itself is owned by the caller's framebuffer; a panel
/// implementation reads from it (or from a shared mapping of it) when
/// servicing a request.
pub trait Panel {
    /// Refreshes `request.region` with the requested waveform.
    fn refresh(&mut self, request: &RefreshRequest);
}

impl<P: Panel + ?Sized> Panel for &mut P {
    fn refresh(&mut self, request: &RefreshRequest) {
        (**self).refresh(request);
    }
}
