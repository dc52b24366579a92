// Copyright 2026 the Inkpane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layered compositor.
//!
//! A [`Canvas`] occupies a rectangle of the screen. Engines draw into its
//! background layer through [`DrawingApi`]; once per tick the owning loop
//! calls [`render`](Canvas::render), which copies exactly the damaged
//! rectangle into the [`Framebuffer`], and then presents the framebuffer.
//!
//! # Full-quality refresh
//!
//! Partial waveforms leave ghosting that builds up over many updates. The
//! consumer periodically calls
//! [`request_full_refresh`](Canvas::request_full_refresh). The next render
//! without a visible overlay schedules one deferred pass
//! [`full_refresh_delay`](CanvasConfig::full_refresh_delay) later, so that
//! the partial refreshes of the current tick settle first. When the loop
//! calls [`run_deferred`](Canvas::run_deferred) at or after
//! [`next_deadline`](Canvas::next_deadline), the canvas finds the bounding
//! box of all non-background pixels (scanning inward from each edge) and
//! refreshes only that box with [`RefreshMode::Quality`], blocking until the
//! panel is done. Requests made while a pass is outstanding fold into it.
//!
//! ```text
//!  request_full_refresh()        render(no overlay)          run_deferred(now >= due)
//!  latch = true ───────────────► latch = false ─────────────► overlay? cancel
//!                                pending = now + delay        else flush, shrink, Quality refresh
//! ```

use alloc::vec::Vec;
use core::time::Duration;

use kurbo::Point;

use inkpane_core::geometry::{PixelPoint, PixelRect};
use inkpane_core::panel::{Panel, RefreshMode, RefreshRequest, RefreshSync};
use inkpane_core::time::Timestamp;
use inkpane_core::trace::{
    FlushEvent, FullRefreshEvent, FullRefreshOutcome, FullRefreshScheduledEvent, Tracer,
};

use crate::api::DrawingApi;
use crate::blitter::{BlitterId, BlitterStore};
use crate::buffer::BufferError;
use crate::framebuffer::Framebuffer;
use crate::layer::Layer;
use crate::pixel::{Dither, Gray};
use crate::raster;
use crate::text::{TextAlign, TextRasterizer};

/// Configuration for [`Canvas`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CanvasConfig {
    /// Color of an empty canvas; the full-refresh scan treats it as "no
    /// content".
    pub background: Gray,
    /// Delay between scheduling a full-quality pass and running it.
    pub full_refresh_delay: Duration,
    /// Waveform for regular damage flushes.
    pub partial_mode: RefreshMode,
    /// Dithering for the canvas layers.
    pub dither: Dither,
}

impl CanvasConfig {
    /// Defaults for an e-ink tablet: white paper, automatic waveform
    /// selection, ordered dithering, 50 ms settling delay.
    #[must_use]
    pub const fn eink() -> Self {
        Self {
            background: Gray::WHITE,
            full_refresh_delay: Duration::from_millis(50),
            partial_mode: RefreshMode::Auto,
            dither: Dither::Bayer2,
        }
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self::eink()
    }
}

/// Inputs for one render tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderTick {
    /// Current time.
    pub now: Timestamp,
    /// Whether a modal overlay (dialog, menu) currently covers the screen.
    pub overlay_visible: bool,
}

impl RenderTick {
    /// A tick with no overlay shown.
    #[must_use]
    pub const fn new(now: Timestamp) -> Self {
        Self {
            now,
            overlay_visible: false,
        }
    }
}

/// What a [`Canvas::render`] call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Nothing was damaged.
    Idle,
    /// Background-layer damage was copied into the framebuffer.
    Flushed {
        /// Damage in layer coordinates.
        source: PixelRect,
        /// Region written in the framebuffer.
        screen: PixelRect,
        /// Waveform selected on the framebuffer.
        mode: RefreshMode,
    },
    /// A full-quality pass is (or already was) scheduled; nothing was
    /// copied.
    FullRefreshScheduled {
        /// When the pass is due.
        due: Timestamp,
    },
}

impl RenderOutcome {
    /// Reports the outcome of a render at `at` to `tracer`.
    pub fn report(&self, at: Timestamp, tracer: &mut Tracer<'_>) {
        match *self {
            Self::Idle => {}
            Self::Flushed {
                source,
                screen,
                mode,
            } => tracer.flush(&FlushEvent {
                at,
                layer: 0,
                source,
                screen,
                mode,
            }),
            Self::FullRefreshScheduled { due } => {
                tracer.full_refresh_scheduled(&FullRefreshScheduledEvent { at, due });
            }
        }
    }
}

/// A screen region backed by off-screen layers.
///
/// Layer 0 is the background layer: it receives all [`DrawingApi`] calls
/// and is the one flushed to the display.
#[derive(Clone, Debug)]
pub struct Canvas {
    layers: Vec<Layer>,
    origin: PixelPoint,
    width: u32,
    height: u32,
    translation: PixelPoint,
    config: CanvasConfig,
    full_refresh_requested: bool,
    pending_full_refresh: Option<Timestamp>,
    blitters: BlitterStore,
}

impl Canvas {
    /// Creates a canvas at `origin` on screen, with one background layer
    /// cleared to [`CanvasConfig::background`] and fully damaged.
    pub fn try_new(
        origin: PixelPoint,
        width: u32,
        height: u32,
        config: CanvasConfig,
    ) -> Result<Self, BufferError> {
        let mut canvas = Self {
            layers: Vec::new(),
            origin,
            width,
            height,
            translation: PixelPoint::ZERO,
            config,
            full_refresh_requested: false,
            pending_full_refresh: None,
            blitters: BlitterStore::new(),
        };
        canvas.push_layer()?;
        canvas.clear();
        Ok(canvas)
    }

    /// Infallible variant of [`try_new`](Self::try_new).
    ///
    /// # Panics
    ///
    /// Panics if the background layer cannot be allocated.
    #[must_use]
    pub fn new(origin: PixelPoint, width: u32, height: u32, config: CanvasConfig) -> Self {
        match Self::try_new(origin, width, height, config) {
            Ok(canvas) => canvas,
            Err(err) => panic!("{err}"),
        }
    }

    /// The configuration.
    #[must_use]
    pub const fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Screen extent of the canvas (before translation).
    #[must_use]
    pub fn bounds(&self) -> PixelRect {
        PixelRect::from_size(self.width, self.height).translate(self.origin)
    }

    /// Offset of the content inside the canvas.
    #[must_use]
    pub const fn translation(&self) -> PixelPoint {
        self.translation
    }

    /// Sets the offset of the content inside the canvas, typically to center
    /// content smaller than the canvas. Changing it damages the whole
    /// background layer so the content is repainted at its new place.
    pub fn set_translation(&mut self, offset: PixelPoint) {
        if offset != self.translation {
            self.translation = offset;
            let bounds = self.layers[0].buffer().bounds();
            self.layers[0].mark_dirty(bounds);
        }
    }

    /// Maps a screen coordinate to drawing space.
    #[must_use]
    pub fn logical(&self, screen: PixelPoint) -> PixelPoint {
        screen - self.translation - self.origin
    }

    /// Maps a drawing-space coordinate to the screen.
    #[must_use]
    pub fn screen(&self, logical: PixelPoint) -> PixelPoint {
        logical + self.translation + self.origin
    }

    /// Fills the background layer with the background color.
    pub fn clear(&mut self) {
        let background = self.config.background;
        let layer = &mut self.layers[0];
        let bounds = layer.buffer().bounds();
        layer.fill(bounds, background);
    }

    /// Adds a layer above the others and returns its index.
    ///
    /// # Panics
    ///
    /// Panics if the layer cannot be allocated.
    pub fn add_layer(&mut self) -> usize {
        match self.push_layer() {
            Ok(index) => index,
            Err(err) => panic!("{err}"),
        }
    }

    /// Number of layers, including the background.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Returns layer `n`.
    ///
    /// # Panics
    ///
    /// Panics if `n` is out of range.
    #[must_use]
    pub fn layer(&self, n: usize) -> &Layer {
        self.assert_layer(n);
        &self.layers[n]
    }

    /// Returns layer `n` mutably.
    ///
    /// # Panics
    ///
    /// Panics if `n` is out of range.
    pub fn layer_mut(&mut self, n: usize) -> &mut Layer {
        self.assert_layer(n);
        &mut self.layers[n]
    }

    /// Latches a request for a full-quality refresh pass.
    pub fn request_full_refresh(&mut self) {
        self.full_refresh_requested = true;
    }

    /// Returns `true` while a full-quality pass is requested or scheduled.
    #[must_use]
    pub const fn full_refresh_pending(&self) -> bool {
        self.full_refresh_requested || self.pending_full_refresh.is_some()
    }

    /// When [`run_deferred`](Self::run_deferred) next has work, if ever.
    #[must_use]
    pub const fn next_deadline(&self) -> Option<Timestamp> {
        self.pending_full_refresh
    }

    /// Pushes this tick's changes into `fb`.
    ///
    /// If a full refresh is latched and no overlay is visible, schedules the
    /// deferred pass and copies nothing. Otherwise copies the background
    /// layer's damage to its screen position and selects the partial
    /// waveform.
    pub fn render(&mut self, fb: &mut Framebuffer, tick: &RenderTick) -> RenderOutcome {
        if self.full_refresh_requested && !tick.overlay_visible {
            self.full_refresh_requested = false;
            let due = *self
                .pending_full_refresh
                .get_or_insert(tick.now + self.config.full_refresh_delay);
            log::debug!("full refresh due at {due:?}");
            return RenderOutcome::FullRefreshScheduled { due };
        }
        self.flush(fb)
    }

    /// Runs the deferred full-quality pass if it is due.
    ///
    /// Returns `None` if nothing was due. A due pass is consumed even when
    /// an overlay cancels it. A pass that runs also satisfies any request
    /// latched since it was scheduled.
    pub fn run_deferred(
        &mut self,
        fb: &mut Framebuffer,
        panel: &mut (impl Panel + ?Sized),
        tick: &RenderTick,
    ) -> Option<FullRefreshOutcome> {
        let due = self.pending_full_refresh?;
        if tick.now < due {
            return None;
        }
        self.pending_full_refresh = None;
        if tick.overlay_visible {
            log::debug!("full refresh cancelled by overlay");
            return Some(FullRefreshOutcome::Cancelled);
        }
        // The content scan below postdates every pending request.
        self.full_refresh_requested = false;

        self.flush(fb);
        let extent = self.bounds();
        let content = fb
            .buffer()
            .content_bounds(extent, self.config.background);
        if content.is_empty() {
            return Some(FullRefreshOutcome::NothingToRefresh);
        }

        let request = RefreshRequest {
            region: content,
            mode: RefreshMode::Quality,
            sync: RefreshSync::Blocking,
        };
        log::debug!("full refresh {request:?}");
        panel.refresh(&request);
        if content.contains_rect(fb.damage()) {
            fb.buffer_mut().reset_dirty();
        }
        Some(FullRefreshOutcome::Refreshed(content))
    }

    /// [`run_deferred`](Self::run_deferred), reporting the outcome to
    /// `tracer`.
    pub fn run_deferred_traced(
        &mut self,
        fb: &mut Framebuffer,
        panel: &mut (impl Panel + ?Sized),
        tick: &RenderTick,
        tracer: &mut Tracer<'_>,
    ) -> Option<FullRefreshOutcome> {
        let outcome = self.run_deferred(fb, panel, tick)?;
        tracer.full_refresh(&FullRefreshEvent {
            at: tick.now,
            outcome,
        });
        Some(outcome)
    }

    fn flush(&mut self, fb: &mut Framebuffer) -> RenderOutcome {
        let layer = &mut self.layers[0];
        let source = layer.take_dirty();
        if source.is_empty() {
            return RenderOutcome::Idle;
        }
        let offset = self.origin + self.translation;
        let screen = fb
            .buffer_mut()
            .copy_rect(layer.buffer(), source, source.origin() + offset);
        let mode = self.config.partial_mode;
        fb.set_mode(mode);
        log::trace!("flushed {source:?} to {screen:?}");
        RenderOutcome::Flushed {
            source,
            screen,
            mode,
        }
    }

    fn push_layer(&mut self) -> Result<usize, BufferError> {
        let mut layer = Layer::try_new(self.width, self.height, self.config.background)?;
        layer.set_dither(self.config.dither);
        self.layers.push(layer);
        Ok(self.layers.len() - 1)
    }

    fn assert_layer(&self, n: usize) {
        assert!(
            n < self.layers.len(),
            "layer index {n} out of range ({} layers)",
            self.layers.len()
        );
    }
}

impl DrawingApi for Canvas {
    fn draw_rect(&mut self, rect: PixelRect, color: Gray) {
        raster::fill_rect(&mut self.layers[0], rect, color);
    }

    fn draw_line(&mut self, from: PixelPoint, to: PixelPoint, color: Gray) {
        raster::line(&mut self.layers[0], from, to, color);
    }

    fn draw_thick_line(&mut self, from: Point, to: Point, thickness: f64, color: Gray) {
        raster::thick_line(&mut self.layers[0], from, to, thickness, color);
    }

    fn draw_polygon(&mut self, points: &[PixelPoint], fill: Option<Gray>, outline: Gray) {
        raster::polygon(&mut self.layers[0], points, fill, outline);
    }

    fn draw_circle(&mut self, center: PixelPoint, radius: i32, fill: Option<Gray>, outline: Gray) {
        raster::circle(&mut self.layers[0], center, radius, fill, outline);
    }

    fn draw_text(
        &mut self,
        pos: PixelPoint,
        size: u32,
        align: TextAlign,
        color: Gray,
        text: &str,
        fonts: &mut dyn TextRasterizer,
    ) {
        let mask = fonts.rasterize(text, size);
        raster::text(&mut self.layers[0], pos, size, align, color, &mask);
    }

    fn draw_update(&mut self, rect: PixelRect) {
        self.layers[0].mark_dirty(rect);
    }

    fn clip(&mut self, rect: PixelRect) {
        self.layers[0].clip(rect);
    }

    fn unclip(&mut self) {
        self.layers[0].unclip();
    }

    fn blitter_new(&mut self, width: u32, height: u32) -> BlitterId {
        self.blitters.create(width, height)
    }

    fn blitter_free(&mut self, id: BlitterId) {
        self.blitters.destroy(id);
    }

    fn blitter_save(&mut self, id: BlitterId, pos: PixelPoint) {
        self.blitters.save(id, self.layers[0].buffer(), pos);
    }

    fn blitter_load(&mut self, id: BlitterId, pos: Option<PixelPoint>) {
        self.blitters.load(id, &mut self.layers[0], pos);
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::text::GlyphMask;

    #[derive(Default)]
    struct RecordingPanel {
        requests: Vec<RefreshRequest>,
    }

    impl Panel for RecordingPanel {
        fn refresh(&mut self, request: &RefreshRequest) {
            self.requests.push(*request);
        }
    }

    struct BlockFont;

    impl TextRasterizer for BlockFont {
        fn rasterize(&mut self, text: &str, size: u32) -> GlyphMask {
            let width = u32::try_from(text.len()).unwrap() * size / 2;
            GlyphMask::from_fn(width, size, |_, _| true)
        }
    }

    fn config() -> CanvasConfig {
        CanvasConfig {
            dither: Dither::None,
            ..CanvasConfig::eink()
        }
    }

    fn at(ms: u64) -> RenderTick {
        RenderTick::new(Timestamp::from_millis(ms))
    }

    /// A 40×30 canvas at (10, 20) on a 100×100 screen, with its initial
    /// clear already flushed and presented.
    fn setup() -> (Canvas, Framebuffer, RecordingPanel) {
        let mut canvas = Canvas::new(PixelPoint::new(10, 20), 40, 30, config());
        let mut fb = Framebuffer::new(100, 100);
        let mut panel = RecordingPanel::default();
        canvas.render(&mut fb, &at(0));
        fb.present(&mut panel);
        panel.requests.clear();
        (canvas, fb, panel)
    }

    #[test]
    fn first_render_paints_whole_canvas() {
        let mut canvas = Canvas::new(PixelPoint::new(10, 20), 40, 30, config());
        let mut fb = Framebuffer::new(100, 100);
        let outcome = canvas.render(&mut fb, &at(0));
        assert_eq!(
            outcome,
            RenderOutcome::Flushed {
                source: PixelRect::new(0, 0, 40, 30),
                screen: PixelRect::new(10, 20, 50, 50),
                mode: RefreshMode::Auto,
            }
        );
        assert_eq!(fb.damage(), PixelRect::new(10, 20, 50, 50));
    }

    #[test]
    fn second_render_without_draws_is_idle() {
        let (mut canvas, mut fb, _) = setup();
        assert_eq!(canvas.render(&mut fb, &at(10)), RenderOutcome::Idle);
        assert!(fb.damage().is_empty());
    }

    #[test]
    fn render_copies_only_damage() {
        let (mut canvas, mut fb, mut panel) = setup();
        canvas.draw_rect(PixelRect::new(2, 3, 6, 5), Gray::BLACK);
        let outcome = canvas.render(&mut fb, &at(10));
        assert_eq!(
            outcome,
            RenderOutcome::Flushed {
                source: PixelRect::new(2, 3, 6, 5),
                screen: PixelRect::new(12, 23, 16, 25),
                mode: RefreshMode::Auto,
            }
        );
        assert_eq!(fb.buffer().get(PixelPoint::new(12, 23)), Some(Gray::BLACK));

        let request = fb.present(&mut panel).unwrap();
        assert_eq!(request.region, PixelRect::new(12, 23, 16, 25));
        assert!(canvas.layer(0).buffer().dirty().is_empty());
    }

    #[test]
    fn translation_maps_both_ways() {
        let (mut canvas, mut fb, _) = setup();
        canvas.set_translation(PixelPoint::new(5, 2));
        let p = PixelPoint::new(3, 4);
        assert_eq!(canvas.screen(p), PixelPoint::new(18, 26));
        assert_eq!(canvas.logical(canvas.screen(p)), p);

        // Moving the content repaints it at the new offset.
        let outcome = canvas.render(&mut fb, &at(5));
        assert!(matches!(
            outcome,
            RenderOutcome::Flushed { screen, .. } if screen == PixelRect::new(15, 22, 55, 52)
        ));

        canvas.draw_rect(PixelRect::new(0, 0, 1, 1), Gray::BLACK);
        canvas.render(&mut fb, &at(10));
        assert_eq!(fb.buffer().get(PixelPoint::new(15, 22)), Some(Gray::BLACK));
    }

    #[test]
    fn out_of_bounds_draws_are_clipped() {
        let (mut canvas, mut fb, _) = setup();
        canvas.draw_rect(PixelRect::new(-10, -10, 100, 2), Gray::BLACK);
        let outcome = canvas.render(&mut fb, &at(10));
        assert!(matches!(
            outcome,
            RenderOutcome::Flushed { source, .. } if source == PixelRect::new(0, 0, 40, 2)
        ));
        // Nothing leaked outside the canvas on screen.
        assert_eq!(fb.buffer().get(PixelPoint::new(9, 20)), Some(Gray::WHITE));
    }

    #[test]
    fn full_refresh_is_deferred_and_shrunk() {
        let (mut canvas, mut fb, mut panel) = setup();
        canvas.draw_rect(PixelRect::new(5, 5, 10, 8), Gray::BLACK);
        canvas.request_full_refresh();

        // The scheduling tick copies nothing.
        let outcome = canvas.render(&mut fb, &at(100));
        assert_eq!(
            outcome,
            RenderOutcome::FullRefreshScheduled {
                due: Timestamp::from_millis(150)
            }
        );
        assert!(fb.damage().is_empty());
        assert_eq!(canvas.next_deadline(), Some(Timestamp::from_millis(150)));

        assert_eq!(canvas.run_deferred(&mut fb, &mut panel, &at(149)), None);

        let outcome = canvas.run_deferred(&mut fb, &mut panel, &at(150));
        let content = PixelRect::new(15, 25, 20, 28);
        assert_eq!(outcome, Some(FullRefreshOutcome::Refreshed(content)));
        assert_eq!(
            panel.requests,
            [RefreshRequest {
                region: content,
                mode: RefreshMode::Quality,
                sync: RefreshSync::Blocking,
            }]
        );
        // The flushed damage was covered by the quality pass.
        assert!(fb.damage().is_empty());
        assert!(!canvas.full_refresh_pending());
        assert_eq!(canvas.run_deferred(&mut fb, &mut panel, &at(500)), None);
    }

    #[test]
    fn repeated_requests_run_one_pass() {
        let (mut canvas, mut fb, mut panel) = setup();
        canvas.draw_rect(PixelRect::new(0, 0, 2, 2), Gray::BLACK);
        canvas.request_full_refresh();
        canvas.request_full_refresh();
        canvas.render(&mut fb, &at(0));
        canvas.request_full_refresh();
        assert_eq!(
            canvas.render(&mut fb, &at(30)),
            RenderOutcome::FullRefreshScheduled {
                due: Timestamp::from_millis(50)
            }
        );

        for ms in [50, 60, 70] {
            canvas.run_deferred(&mut fb, &mut panel, &at(ms));
        }
        let quality = panel
            .requests
            .iter()
            .filter(|r| r.mode == RefreshMode::Quality)
            .count();
        assert_eq!(quality, 1);
    }

    #[test]
    fn request_between_schedule_and_pass_is_absorbed() {
        let (mut canvas, mut fb, mut panel) = setup();
        canvas.draw_rect(PixelRect::new(0, 0, 2, 2), Gray::BLACK);
        canvas.request_full_refresh();
        assert!(matches!(
            canvas.render(&mut fb, &at(100)),
            RenderOutcome::FullRefreshScheduled { .. }
        ));
        canvas.request_full_refresh();

        assert!(matches!(
            canvas.run_deferred(&mut fb, &mut panel, &at(150)),
            Some(FullRefreshOutcome::Refreshed(_))
        ));
        assert!(!canvas.full_refresh_pending());
        assert_eq!(canvas.render(&mut fb, &at(200)), RenderOutcome::Idle);
        assert_eq!(canvas.next_deadline(), None);
        assert_eq!(canvas.run_deferred(&mut fb, &mut panel, &at(250)), None);
        assert_eq!(panel.requests.len(), 1);
    }

    #[test]
    fn overlay_postpones_scheduling() {
        let (mut canvas, mut fb, _) = setup();
        canvas.request_full_refresh();
        let covered = RenderTick {
            now: Timestamp::from_millis(0),
            overlay_visible: true,
        };
        assert_eq!(canvas.render(&mut fb, &covered), RenderOutcome::Idle);
        assert_eq!(canvas.next_deadline(), None);
        assert!(canvas.full_refresh_pending());

        assert!(matches!(
            canvas.render(&mut fb, &at(10)),
            RenderOutcome::FullRefreshScheduled { .. }
        ));
    }

    #[test]
    fn overlay_cancels_due_pass() {
        let (mut canvas, mut fb, mut panel) = setup();
        canvas.draw_rect(PixelRect::new(0, 0, 2, 2), Gray::BLACK);
        canvas.request_full_refresh();
        canvas.render(&mut fb, &at(0));

        let covered = RenderTick {
            now: Timestamp::from_millis(60),
            overlay_visible: true,
        };
        assert_eq!(
            canvas.run_deferred(&mut fb, &mut panel, &covered),
            Some(FullRefreshOutcome::Cancelled)
        );
        assert!(panel.requests.is_empty());
        assert_eq!(canvas.next_deadline(), None);
        // The drawing is still pending on the layer.
        assert!(!canvas.layer(0).buffer().dirty().is_empty());
    }

    #[test]
    fn blank_canvas_needs_no_quality_pass() {
        let (mut canvas, mut fb, mut panel) = setup();
        canvas.request_full_refresh();
        canvas.render(&mut fb, &at(0));
        assert_eq!(
            canvas.run_deferred(&mut fb, &mut panel, &at(50)),
            Some(FullRefreshOutcome::NothingToRefresh)
        );
        assert!(panel.requests.is_empty());
    }

    #[test]
    fn clip_through_drawing_api() {
        let (mut canvas, mut fb, _) = setup();
        let api: &mut dyn DrawingApi = &mut canvas;
        api.clip(PixelRect::new(0, 0, 4, 4));
        api.draw_circle(PixelPoint::new(4, 4), 3, Some(Gray::BLACK), Gray::BLACK);
        api.unclip();
        let outcome = canvas.render(&mut fb, &at(10));
        assert!(matches!(
            outcome,
            RenderOutcome::Flushed { source, .. } if PixelRect::new(0, 0, 4, 4).contains_rect(source)
        ));
    }

    #[test]
    fn blitter_round_trip_through_drawing_api() {
        let (mut canvas, mut fb, _) = setup();
        canvas.draw_rect(PixelRect::new(0, 0, 40, 30), Gray::BLACK);
        canvas.render(&mut fb, &at(0));

        let id = canvas.blitter_new(4, 4);
        canvas.blitter_save(id, PixelPoint::new(8, 8));
        canvas.draw_rect(PixelRect::new(8, 8, 12, 12), Gray::WHITE);
        canvas.render(&mut fb, &at(10));
        canvas.blitter_load(id, None);
        let outcome = canvas.render(&mut fb, &at(20));
        assert!(matches!(
            outcome,
            RenderOutcome::Flushed { source, .. } if source == PixelRect::new(8, 8, 12, 12)
        ));
        assert_eq!(fb.buffer().get(PixelPoint::new(19, 29)), Some(Gray::BLACK));
        canvas.blitter_free(id);
    }

    #[test]
    fn draw_update_marks_without_drawing() {
        let (mut canvas, mut fb, _) = setup();
        canvas.draw_update(PixelRect::new(1, 1, 3, 3));
        assert!(matches!(
            canvas.render(&mut fb, &at(0)),
            RenderOutcome::Flushed { source, .. } if source == PixelRect::new(1, 1, 3, 3)
        ));
    }

    #[test]
    fn text_is_drawn_from_rasterizer() {
        let (mut canvas, mut fb, _) = setup();
        canvas.draw_text(
            PixelPoint::new(20, 10),
            4,
            TextAlign::HCENTER,
            Gray::BLACK,
            "ab",
            &mut BlockFont,
        );
        assert!(matches!(
            canvas.render(&mut fb, &at(0)),
            RenderOutcome::Flushed { source, .. } if source == PixelRect::new(18, 10, 22, 14)
        ));
    }

    #[test]
    fn extra_layers_share_canvas_size() {
        let mut canvas = Canvas::new(PixelPoint::ZERO, 8, 6, config());
        let idx = canvas.add_layer();
        assert_eq!(idx, 1);
        assert_eq!(canvas.layer_count(), 2);
        assert_eq!(canvas.layer(1).buffer().bounds(), PixelRect::new(0, 0, 8, 6));
        canvas.layer_mut(1).fill(PixelRect::new(0, 0, 2, 2), Gray::BLACK);
        assert_eq!(canvas.layer(1).buffer().dirty(), PixelRect::new(0, 0, 2, 2));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn missing_layer_panics() {
        let canvas = Canvas::new(PixelPoint::ZERO, 8, 6, config());
        let _ = canvas.layer(3);
    }

    #[test]
    fn allocation_failure_is_reported() {
        let err = Canvas::try_new(PixelPoint::ZERO, u32::MAX, u32::MAX, config()).unwrap_err();
        assert!(matches!(err, BufferError::TooLarge { .. }));
    }

    #[test]
    fn dithered_canvas_by_default() {
        let mut canvas = Canvas::new(PixelPoint::ZERO, 4, 4, CanvasConfig::default());
        canvas.draw_rect(PixelRect::new(0, 0, 4, 4), Gray(128));
        let pixels = canvas.layer(0).buffer().pixels().to_vec();
        assert!(pixels.iter().all(|g| g.is_bilevel()));
        assert_ne!(pixels, vec![Gray::WHITE; 16]);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn outcomes_reach_trace_sink() {
        use inkpane_core::trace::TraceSink;

        #[derive(Default)]
        struct Sink {
            flushes: Vec<PixelRect>,
            scheduled: Vec<Timestamp>,
            passes: Vec<FullRefreshOutcome>,
        }
        impl TraceSink for Sink {
            fn on_flush(&mut self, e: &FlushEvent) {
                self.flushes.push(e.screen);
            }
            fn on_full_refresh_scheduled(&mut self, e: &FullRefreshScheduledEvent) {
                self.scheduled.push(e.due);
            }
            fn on_full_refresh(&mut self, e: &FullRefreshEvent) {
                self.passes.push(e.outcome);
            }
        }

        let (mut canvas, mut fb, mut panel) = setup();
        let mut sink = Sink::default();
        let mut tracer = Tracer::new(&mut sink);

        canvas.draw_rect(PixelRect::new(0, 0, 1, 1), Gray::BLACK);
        let tick = at(0);
        canvas.render(&mut fb, &tick).report(tick.now, &mut tracer);
        canvas.request_full_refresh();
        canvas.render(&mut fb, &tick).report(tick.now, &mut tracer);
        canvas.run_deferred_traced(&mut fb, &mut panel, &at(50), &mut tracer);
        drop(tracer);

        assert_eq!(sink.flushes, [PixelRect::new(10, 20, 11, 21)]);
        assert_eq!(sink.scheduled, [Timestamp::from_millis(50)]);
        assert_eq!(
            sink.passes,
            [FullRefreshOutcome::Refreshed(PixelRect::new(10, 20, 11, 21))]
        );
    }
}
