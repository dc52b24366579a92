// Copyright 2026 the Inkpane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The physical display buffer.

use inkpane_core::geometry::PixelRect;
use inkpane_core::panel::{Panel, RefreshMode, RefreshRequest, RefreshSync};

use crate::buffer::{BufferError, PixelBuffer};
use crate::pixel::Gray;

/// Handle to the display memory a [`Panel`] refreshes from.
///
/// Created once at startup and passed explicitly to whoever renders into it.
/// Damage accumulates on the embedded [`PixelBuffer`] until
/// [`present`](Self::present) turns it into one refresh request.
#[derive(Clone, Debug)]
pub struct Framebuffer {
    buffer: PixelBuffer,
    mode: RefreshMode,
}

impl Framebuffer {
    /// Creates a white framebuffer.
    ///
    /// # Panics
    ///
    /// Panics if the pixel storage cannot be allocated.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::from_buffer(PixelBuffer::new(width, height, Gray::WHITE))
    }

    /// Fallible variant of [`new`](Self::new).
    pub fn try_new(width: u32, height: u32) -> Result<Self, BufferError> {
        PixelBuffer::try_new(width, height, Gray::WHITE).map(Self::from_buffer)
    }

    /// Wraps an existing buffer.
    #[must_use]
    pub fn from_buffer(buffer: PixelBuffer) -> Self {
        Self {
            buffer,
            mode: RefreshMode::default(),
        }
    }

    /// Display memory.
    #[inline]
    #[must_use]
    pub const fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Mutable display memory. Writes accumulate damage.
    #[inline]
    pub fn buffer_mut(&mut self) -> &mut PixelBuffer {
        &mut self.buffer
    }

    /// Waveform the next [`present`](Self::present) will use.
    #[must_use]
    pub const fn mode(&self) -> RefreshMode {
        self.mode
    }

    /// Selects the waveform for the next present.
    pub fn set_mode(&mut self, mode: RefreshMode) {
        self.mode = mode;
    }

    /// Damage not yet presented.
    #[must_use]
    pub const fn damage(&self) -> PixelRect {
        self.buffer.dirty()
    }

    /// Issues one asynchronous refresh of the accumulated damage and clears
    /// it. Returns the request, or `None` if nothing was damaged.
    pub fn present(&mut self, panel: &mut (impl Panel + ?Sized)) -> Option<RefreshRequest> {
        let region = self.buffer.take_dirty();
        if region.is_empty() {
            return None;
        }
        let request = RefreshRequest {
            region,
            mode: self.mode,
            sync: RefreshSync::Async,
        };
        log::trace!("present {request:?}");
        panel.refresh(&request);
        Some(request)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use inkpane_core::geometry::PixelPoint;

    use super::*;

    #[derive(Default)]
    struct Requests(Vec<RefreshRequest>);

    impl Panel for Requests {
        fn refresh(&mut self, request: &RefreshRequest) {
            self.0.push(*request);
        }
    }

    #[test]
    fn clean_framebuffer_presents_nothing() {
        let mut fb = Framebuffer::new(10, 10);
        let mut panel = Requests::default();
        assert_eq!(fb.present(&mut panel), None);
        assert!(panel.0.is_empty());
    }

    #[test]
    fn present_issues_damage_once() {
        let mut fb = Framebuffer::new(10, 10);
        fb.set_mode(RefreshMode::Fast);
        fb.buffer_mut().set(PixelPoint::new(2, 3), Gray::BLACK);
        fb.buffer_mut().set(PixelPoint::new(5, 1), Gray::BLACK);

        let mut panel = Requests::default();
        let request = fb.present(&mut panel).unwrap();
        assert_eq!(request.region, PixelRect::new(2, 1, 6, 4));
        assert_eq!(request.mode, RefreshMode::Fast);
        assert_eq!(request.sync, RefreshSync::Async);
        assert_eq!(fb.present(&mut panel), None);
        assert_eq!(panel.0.len(), 1);
    }
}
