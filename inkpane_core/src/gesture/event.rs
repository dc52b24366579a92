// Copyright 2026 the Inkpane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw pointer input and the semantic events derived from it.

use crate::geometry::PixelPoint;
use crate::time::Timestamp;

/// Which button (or touch equivalent) started a press.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Finger contact, pen tip or left mouse button.
    Primary,
    /// Right mouse button or pen barrel button.
    Secondary,
    /// Middle mouse button.
    Middle,
}

/// A raw sample from the input surface, in surface-local coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerEvent {
    /// Contact began.
    Down {
        /// Where contact began.
        pos: PixelPoint,
        /// Which button.
        button: PointerButton,
        /// When.
        time: Timestamp,
    },
    /// Contact moved.
    Move {
        /// Current position.
        pos: PixelPoint,
        /// When.
        time: Timestamp,
    },
    /// Contact ended.
    Up {
        /// Where contact ended.
        pos: PixelPoint,
        /// When.
        time: Timestamp,
    },
    /// The pointer left the surface while in contact.
    Leave {
        /// Last position on the surface.
        pos: PixelPoint,
        /// When.
        time: Timestamp,
    },
}

impl PointerEvent {
    /// Position carried by the sample.
    #[must_use]
    pub const fn pos(&self) -> PixelPoint {
        match *self {
            Self::Down { pos, .. }
            | Self::Move { pos, .. }
            | Self::Up { pos, .. }
            | Self::Leave { pos, .. } => pos,
        }
    }

    /// Time the sample was observed.
    #[must_use]
    pub const fn time(&self) -> Timestamp {
        match *self {
            Self::Down { time, .. }
            | Self::Move { time, .. }
            | Self::Up { time, .. }
            | Self::Leave { time, .. } => time,
        }
    }
}

/// A classified interaction, in surface-local coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureEvent {
    /// Press released quickly without moving.
    ShortClick(PixelPoint),
    /// Press held in place for at least the long-click delay.
    LongClick(PixelPoint),
    /// Press promoted to a drag. Carries the *press origin*, so the drag
    /// begins exactly where the finger went down.
    DragStart(PixelPoint),
    /// Drag moved far enough since the last reported sample.
    Dragging(PixelPoint),
    /// Drag finished (release or leaving the surface).
    DragEnd(PixelPoint),
}

impl GestureEvent {
    /// Position carried by the event.
    #[must_use]
    pub const fn pos(&self) -> PixelPoint {
        match *self {
            Self::ShortClick(p)
            | Self::LongClick(p)
            | Self::DragStart(p)
            | Self::Dragging(p)
            | Self::DragEnd(p) => p,
        }
    }

    /// Returns `true` for the three drag phases.
    #[must_use]
    pub const fn is_drag(&self) -> bool {
        matches!(
            self,
            Self::DragStart(_) | Self::Dragging(_) | Self::DragEnd(_)
        )
    }
}
