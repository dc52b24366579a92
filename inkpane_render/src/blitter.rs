// Copyright 2026 the Inkpane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Saved pixel regions ("blitters").
//!
//! Engines that animate a sprite save the background under it, draw, and
//! later restore the saved pixels. [`BlitterStore`] holds those snapshots in
//! reusable slots addressed by generational [`BlitterId`] handles, so a
//! handle used after [`destroy`](BlitterStore::destroy) is caught instead of
//! reading another blitter's pixels.

use alloc::vec::Vec;

use inkpane_core::geometry::{PixelPoint, PixelRect};

use crate::buffer::PixelBuffer;
use crate::layer::Layer;
use crate::pixel::Gray;

/// Handle returned by [`BlitterStore::create`].
///
/// `reuse` counts how many times the slot had been freed when the handle was
/// issued; a freed and refilled slot no longer matches old handles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlitterId {
    slot: u32,
    reuse: u32,
}

#[derive(Clone, Debug)]
struct Snapshot {
    /// Where the last save read from; `None` until the first save.
    saved_at: Option<PixelPoint>,
    pixels: PixelBuffer,
}

#[derive(Clone, Debug, Default)]
struct Slot {
    reuse: u32,
    snapshot: Option<Snapshot>,
}

/// Slot storage for blitter snapshots.
#[derive(Clone, Debug, Default)]
pub struct BlitterStore {
    slots: Vec<Slot>,
    vacant: Vec<u32>,
}

impl BlitterStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            vacant: Vec::new(),
        }
    }

    /// Allocates a `width × height` snapshot and returns its handle.
    ///
    /// # Panics
    ///
    /// Panics if the pixel storage cannot be allocated.
    pub fn create(&mut self, width: u32, height: u32) -> BlitterId {
        let snapshot = Snapshot {
            saved_at: None,
            pixels: PixelBuffer::new(width, height, Gray::WHITE),
        };
        let slot = match self.vacant.pop() {
            Some(slot) => slot,
            None => {
                self.slots.push(Slot::default());
                u32::try_from(self.slots.len() - 1).unwrap_or(u32::MAX)
            }
        };
        let entry = &mut self.slots[slot as usize];
        entry.snapshot = Some(snapshot);
        BlitterId {
            slot,
            reuse: entry.reuse,
        }
    }

    /// Frees a snapshot, invalidating its handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn destroy(&mut self, id: BlitterId) {
        self.validate(id);
        let entry = &mut self.slots[id.slot as usize];
        entry.snapshot = None;
        entry.reuse = entry.reuse.wrapping_add(1);
        self.vacant.push(id.slot);
    }

    /// Returns whether the handle refers to a live snapshot.
    #[must_use]
    pub fn is_alive(&self, id: BlitterId) -> bool {
        self.slots
            .get(id.slot as usize)
            .is_some_and(|entry| entry.reuse == id.reuse && entry.snapshot.is_some())
    }

    /// Number of live snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.vacant.len()
    }

    /// Returns `true` if no snapshot is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size of a snapshot.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn size(&self, id: BlitterId) -> (u32, u32) {
        let pixels = &self.snapshot(id).pixels;
        (pixels.width(), pixels.height())
    }

    /// Copies the snapshot-sized region at `pos` out of `src`. Parts of the
    /// region outside `src` are left as they were.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn save(&mut self, id: BlitterId, src: &PixelBuffer, pos: PixelPoint) {
        let snapshot = self.snapshot_mut(id);
        let region = snapshot.pixels.bounds().translate(pos);
        snapshot.saved_at = Some(pos);
        snapshot.pixels.copy_rect(src, region, PixelPoint::ZERO);
        snapshot.pixels.reset_dirty();
    }

    /// Writes the snapshot into `dst` at `pos`, or where it was saved from
    /// when `pos` is `None`. Returns the region written.
    ///
    /// A snapshot that was never saved restores nothing.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn load(&self, id: BlitterId, dst: &mut Layer, pos: Option<PixelPoint>) -> PixelRect {
        let snapshot = self.snapshot(id);
        let Some(saved_at) = snapshot.saved_at else {
            log::debug!("{id:?} loaded before any save");
            return PixelRect::EMPTY;
        };
        let at = pos.unwrap_or(saved_at);
        dst.copy_from(&snapshot.pixels, snapshot.pixels.bounds(), at)
    }

    fn snapshot(&self, id: BlitterId) -> &Snapshot {
        self.validate(id);
        match &self.slots[id.slot as usize].snapshot {
            Some(snapshot) => snapshot,
            None => unreachable!("validated slot is occupied"),
        }
    }

    fn snapshot_mut(&mut self, id: BlitterId) -> &mut Snapshot {
        self.validate(id);
        match &mut self.slots[id.slot as usize].snapshot {
            Some(snapshot) => snapshot,
            None => unreachable!("validated slot is occupied"),
        }
    }

    fn validate(&self, id: BlitterId) {
        assert!(self.is_alive(id), "blitter {id:?} used after free");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_and_destroy() {
        let mut store = BlitterStore::new();
        let id = store.create(4, 4);
        assert!(store.is_alive(id));
        assert_eq!(store.len(), 1);
        store.destroy(id);
        assert!(!store.is_alive(id));
        assert!(store.is_empty());
    }

    #[test]
    fn refilled_slot_rejects_old_handle() {
        let mut store = BlitterStore::new();
        let old = store.create(2, 2);
        store.destroy(old);
        let new = store.create(3, 3);
        assert_eq!(store.slots.len(), 1);
        assert_ne!(old, new);
        assert!(!store.is_alive(old));
        assert!(store.is_alive(new));
        assert_eq!(store.size(new), (3, 3));
    }

    #[test]
    #[should_panic(expected = "used after free")]
    fn use_after_free_panics() {
        let mut store = BlitterStore::new();
        let id = store.create(2, 2);
        store.destroy(id);
        let buffer = PixelBuffer::new(4, 4, Gray::WHITE);
        store.save(id, &buffer, PixelPoint::ZERO);
    }

    #[test]
    fn save_then_restore_in_place() {
        let mut store = BlitterStore::new();
        let id = store.create(3, 3);
        let mut layer = Layer::new(10, 10, Gray::WHITE);
        layer.fill(PixelRect::new(4, 4, 6, 6), Gray::BLACK);
        let before = layer.buffer().clone();

        store.save(id, layer.buffer(), PixelPoint::new(3, 3));
        layer.fill(PixelRect::new(0, 0, 10, 10), Gray(50));
        layer.take_dirty();

        let written = store.load(id, &mut layer, None);
        assert_eq!(written, PixelRect::new(3, 3, 6, 6));
        assert_eq!(layer.buffer().dirty(), written);
        for y in 3..6 {
            for x in 3..6 {
                let p = PixelPoint::new(x, y);
                assert_eq!(layer.buffer().get(p), before.get(p));
            }
        }
    }

    #[test]
    fn save_and_load_clamp_at_edges() {
        let mut store = BlitterStore::new();
        let id = store.create(4, 4);
        let mut layer = Layer::new(8, 8, Gray::BLACK);
        store.save(id, layer.buffer(), PixelPoint::new(-2, 6));
        let written = store.load(id, &mut layer, Some(PixelPoint::new(6, -1)));
        assert_eq!(written, PixelRect::new(6, 0, 8, 3));
    }

    #[test]
    fn load_before_save_restores_nothing() {
        let mut store = BlitterStore::new();
        let id = store.create(2, 2);
        let mut layer = Layer::new(4, 4, Gray::WHITE);
        assert!(store.load(id, &mut layer, Some(PixelPoint::ZERO)).is_empty());
        assert!(layer.buffer().dirty().is_empty());
    }
}
