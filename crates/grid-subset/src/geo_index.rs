//! Geographic bounding box to index rectangle.
//!
//! For lat/lon grids the rectangle is intersected directly with the axis
//! cells. For projected grids the rectangle is forward-projected (split at
//! the projection's seam) and each plane rectangle is intersected with the
//! x/y cells; the index spans of the pieces are unioned.

use geo_common::LatLonRect;
use tracing::{debug, trace, warn};

use crate::axis::CoordinateAxis;
use crate::coord_sys::GridCoordSystem;
use crate::error::{Result, SubsetError};
use crate::range::Range;

type Span = (usize, usize);

fn hull(a: Option<Span>, b: Option<Span>) -> Option<Span> {
    match (a, b) {
        (Some(a), Some(b)) => Some((a.0.min(b.0), a.1.max(b.1))),
        (a, None) => a,
        (None, b) => b,
    }
}

/// Index ranges `(y, x)` of the cells of `cs` covered by `rect`, strided.
///
/// A rectangle larger than the grid yields the full axes; one that misses
/// the grid entirely is an `EmptySubsetResult`.
pub fn lat_lon_to_index(
    cs: &GridCoordSystem,
    rect: &LatLonRect,
    stride_y: usize,
    stride_x: usize,
) -> Result<(Range, Range)> {
    let spans = if cs.is_lat_lon() {
        lat_lon_spans(cs.y_axis(), cs.x_axis(), rect)
    } else {
        projected_spans(cs, rect)
    };

    let ((y0, y1), (x0, x1)) = spans.ok_or_else(|| {
        let grid = match cs.lat_lon_bounding_box() {
            Some(bb) => bb.to_string(),
            None => cs.bounding_box().to_string(),
        };
        SubsetError::empty_subset(rect, grid)
    })?;

    let y = Range::with_stride(y0, y1, stride_y)?;
    let x = Range::with_stride(x0, x1, stride_x)?;
    debug!(bbox = %rect, y = %y, x = %x, "Resolved bounding box to index ranges");
    Ok((y, x))
}

fn lat_lon_spans(
    lat: &CoordinateAxis,
    lon: &CoordinateAxis,
    rect: &LatLonRect,
) -> Option<(Span, Span)> {
    let y = lat.index_span(rect.lat_min(), rect.lat_max())?;

    // express the rectangle in the longitude window the axis lives in
    let (base, _) = lon.extent();
    let x = rect
        .lon_spans_from(base)
        .into_iter()
        .map(|(lo, hi)| {
            let span = lon.index_span(lo, hi);
            trace!(lo, hi, span = ?span, "Longitude piece");
            span
        })
        .fold(None, hull)?;
    Some((y, x))
}

fn projected_spans(cs: &GridCoordSystem, rect: &LatLonRect) -> Option<(Span, Span)> {
    let projection = cs.projection()?;
    let scale = cs.plane_scale();
    let pieces = projection.lat_lon_to_proj_rects(rect, cs.config().boundary_samples);
    if pieces.is_empty() {
        warn!(
            bbox = %rect,
            projection = projection.name(),
            "No point of the bounding box is representable in the projection"
        );
        return None;
    }

    let mut y = None;
    let mut x = None;
    for piece in &pieces {
        let py = cs.y_axis().index_span(piece.min_y / scale, piece.max_y / scale);
        let px = cs.x_axis().index_span(piece.min_x / scale, piece.max_x / scale);
        trace!(piece = %piece, y = ?py, x = ?px, "Projected piece");
        if let (Some(py), Some(px)) = (py, px) {
            y = hull(y, Some(py));
            x = hull(x, Some(px));
        }
    }
    Some((y?, x?))
}
