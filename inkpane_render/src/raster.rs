// Copyright 2026 the Inkpane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw primitives.
//!
//! Every primitive writes through [`Layer`], so the scissor, dithering and
//! damage tracking apply uniformly. Integer coordinates name pixels; a
//! floating-point coordinate `(x, y)` lies on pixel `(x, y)`.

use kurbo::{Circle, Line, ParamCurveNearest, Point, Rect, Shape};

use inkpane_core::geometry::{PixelPoint, PixelRect};

use crate::layer::Layer;
use crate::pixel::Gray;
use crate::text::{GlyphMask, TextAlign};

/// Fills `rect`. Degenerate rectangles draw nothing.
pub fn fill_rect(layer: &mut Layer, rect: PixelRect, gray: Gray) {
    layer.fill(rect, gray);
}

/// One-pixel line with both endpoints included.
///
/// Steps along the longer axis, one pixel per column (or row), and rounds
/// the other coordinate to the nearest pixel. Only the stretch of the
/// longer axis inside the writable area is visited.
pub fn line(layer: &mut Layer, from: PixelPoint, to: PixelPoint, gray: Gray) {
    let bounds = PixelRect::new(
        from.x.min(to.x),
        from.y.min(to.y),
        from.x.max(to.x).saturating_add(1),
        from.y.max(to.y).saturating_add(1),
    );
    if bounds.intersect(layer.writable()).is_empty() {
        return;
    }
    if from.y == to.y {
        layer.hspan(from.y, from.x, to.x, gray);
        return;
    }
    if from.x == to.x {
        layer.fill(bounds, gray);
        return;
    }

    let area = layer.writable();
    let dx = i64::from(to.x) - i64::from(from.x);
    let dy = i64::from(to.y) - i64::from(from.y);
    if dx.abs() >= dy.abs() {
        let lo = from.x.min(to.x).max(area.x0);
        let hi = from.x.max(to.x).min(area.x1.saturating_sub(1));
        for x in lo..=hi {
            let y = along(from.x, from.y, dx, dy, x);
            layer.put(PixelPoint::new(x, y), gray);
        }
    } else {
        let lo = from.y.min(to.y).max(area.y0);
        let hi = from.y.max(to.y).min(area.y1.saturating_sub(1));
        for y in lo..=hi {
            let x = along(from.y, from.x, dy, dx, y);
            layer.put(PixelPoint::new(x, y), gray);
        }
    }
}

/// Minor coordinate of the line at `major`, rounded half away from the
/// start. `major` must lie between the endpoints.
#[expect(
    clippy::cast_possible_truncation,
    reason = "the result lies between the endpoints' minor coordinates"
)]
fn along(major0: i32, minor0: i32, d_major: i64, d_minor: i64, major: i32) -> i32 {
    let t = (i128::from(major) - i128::from(major0)).abs();
    let (run, rise) = (i128::from(d_major.abs()), i128::from(d_minor.abs()));
    let offset = (2 * t * rise + run) / (2 * run);
    (i128::from(minor0) + offset * i128::from(d_minor.signum())) as i32
}

/// Line of the given width: every pixel within `thickness / 2` of the
/// segment. Widths of one pixel or less (and NaN) draw a plain [`line`].
pub fn thick_line(layer: &mut Layer, from: Point, to: Point, thickness: f64, gray: Gray) {
    if thickness.is_nan() || thickness <= 1.0 {
        line(layer, round_point(from), round_point(to), gray);
        return;
    }
    let half = thickness / 2.0;
    let segment = Line::new(from, to);
    let area = PixelRect::from_kurbo_outer(Rect::from_points(from, to).inflate(half, half))
        .intersect(layer.writable());
    let limit = half * half;
    for y in area.y0..area.y1 {
        for x in area.x0..area.x1 {
            let p = PixelPoint::new(x, y);
            if segment.nearest(p.into(), 1e-6).distance_sq <= limit {
                layer.put(p, gray);
            }
        }
    }
}

/// Closed polygon through `points`.
///
/// The fill covers, on every row, the span between the leftmost and the
/// rightmost edge crossing, which is exact for convex shapes. The outline
/// is drawn last, closing back to the first point. No points draws
/// nothing; a single point plots that pixel.
pub fn polygon(layer: &mut Layer, points: &[PixelPoint], fill: Option<Gray>, outline: Gray) {
    let Some(&first) = points.first() else {
        return;
    };
    if let Some(fill) = fill {
        let (min_y, max_y) = points
            .iter()
            .fold((first.y, first.y), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
        let area = layer.writable();
        for y in min_y.max(area.y0)..=max_y.min(area.y1 - 1) {
            let mut span = None;
            for (a, b) in edges(points) {
                extend_row(y, a, b, &mut span);
            }
            if let Some((lo, hi)) = span {
                layer.hspan(y, lo, hi, fill);
            }
        }
    }
    for (a, b) in edges(points) {
        line(layer, a, b, outline);
    }
}

/// Circle of integer `radius` around `center`.
///
/// The outline is the one-pixel ring of pixels at distance
/// `radius - 0.5 ..radius + 0.5` from the center; `fill`, when given, covers
/// the inside of the ring. Passing the outline color as `fill` draws one
/// solid disk. Negative radii draw nothing.
pub fn circle(
    layer: &mut Layer,
    center: PixelPoint,
    radius: i32,
    fill: Option<Gray>,
    outline: Gray,
) {
    if radius < 0 {
        return;
    }
    let c = Point::from(center);
    let r = f64::from(radius);
    let outer = Circle::new(c, r + 0.5);
    let inner = Circle::new(c, (r - 0.5).max(0.0));
    let area = PixelRect::new(
        center.x.saturating_sub(radius),
        center.y.saturating_sub(radius),
        center.x.saturating_add(radius).saturating_add(1),
        center.y.saturating_add(radius).saturating_add(1),
    )
    .intersect(layer.writable());
    for y in area.y0..area.y1 {
        for x in area.x0..area.x1 {
            let p = PixelPoint::new(x, y);
            let pt = Point::from(p);
            if !outer.contains(pt) {
                continue;
            }
            if !inner.contains(pt) {
                layer.put(p, outline);
            } else if let Some(fill) = fill {
                layer.put(p, fill);
            }
        }
    }
}

/// Writes the covered pixels of `mask`, anchored at `pos` per `align`.
pub fn text(
    layer: &mut Layer,
    pos: PixelPoint,
    size: u32,
    align: TextAlign,
    gray: Gray,
    mask: &GlyphMask,
) {
    let origin = align.place(pos, size, mask.width());
    for offset in mask.covered() {
        layer.put(origin + offset, gray);
    }
}

/// Edges of the closed polygon, including the closing edge.
fn edges(points: &[PixelPoint]) -> impl Iterator<Item = (PixelPoint, PixelPoint)> + '_ {
    points
        .iter()
        .copied()
        .zip(points.iter().copied().cycle().skip(1))
}

/// Widens `span` to include where edge `a`–`b` crosses row `y`.
#[expect(
    clippy::cast_possible_truncation,
    reason = "the crossing lies between the edge's endpoints"
)]
fn extend_row(y: i32, a: PixelPoint, b: PixelPoint, span: &mut Option<(i32, i32)>) {
    if y < a.y.min(b.y) || y > a.y.max(b.y) {
        return;
    }
    let mut include = |x: i32| {
        *span = Some(match *span {
            None => (x, x),
            Some((lo, hi)) => (lo.min(x), hi.max(x)),
        });
    };
    if a.y == b.y {
        include(a.x);
        include(b.x);
        return;
    }
    let num = (i64::from(y) - i64::from(a.y)) * (i64::from(b.x) - i64::from(a.x));
    let x = i64::from(a.x) + num / (i64::from(b.y) - i64::from(a.y));
    include(x as i32);
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "pixel coordinates are saturated into i32 range"
)]
fn round_point(p: Point) -> PixelPoint {
    let p = p.round();
    PixelPoint::new(p.x as i32, p.y as i32)
}
