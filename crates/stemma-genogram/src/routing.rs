//! Route geometry for parent→child links and identical-sibling anchors.

use stemma::Point;

use crate::model::LinkStyle;

/// Vertices for a link leaving a couple: the route drops from the midpoint
/// between the partners, then swings toward the child (or toward the shared
/// fork x of a multiple-birth group). Orthogonal style runs axis-aligned
/// from the source symbol instead of the couple midpoint.
pub(crate) fn couple_source_vertices(
    style: LinkStyle,
    source: Point,
    partner: Point,
    target: Point,
    fork_x: Option<f64>,
) -> Vec<Point> {
    let mid_x = (source.x + partner.x) / 2.0;
    let mid_y = (source.y + partner.y) / 2.0;

    match style {
        LinkStyle::Orthogonal => {
            let third_y = mid_y + (target.y - mid_y) / 3.0;
            let two_thirds_y = mid_y + 2.0 * (target.y - mid_y) / 3.0;
            let end_x = fork_x.unwrap_or(target.x);
            vec![
                Point { x: source.x, y: third_y },
                Point { x: mid_x, y: third_y },
                Point { x: mid_x, y: two_thirds_y },
                Point { x: end_x, y: two_thirds_y },
            ]
        }
        LinkStyle::Fan => {
            let halfway_y = (mid_y + target.y) / 2.0;
            let end_x = fork_x.unwrap_or(target.x);
            vec![
                Point { x: mid_x, y: mid_y },
                Point { x: mid_x, y: halfway_y },
                Point { x: end_x, y: halfway_y },
            ]
        }
    }
}

/// Vertices for a solo parent whose child sits inside a couple container:
/// the route bends at a horizontal run partway down so it enters the right
/// member instead of the container center.
pub(crate) fn solo_to_couple_vertices(
    style: LinkStyle,
    source: Point,
    source_height: f64,
    target: Point,
) -> Vec<Point> {
    match style {
        LinkStyle::Orthogonal => {
            let mid_y = source.y + source_height / 2.0;
            let third_y = mid_y + (target.y - mid_y) / 3.0;
            vec![
                Point { x: source.x, y: third_y },
                Point { x: target.x, y: third_y },
            ]
        }
        LinkStyle::Fan => {
            let halfway_y = (source.y + target.y) / 2.0;
            vec![
                Point { x: source.x, y: halfway_y },
                Point { x: target.x, y: halfway_y },
            ]
        }
    }
}

/// Ratio along a polyline (0 at the start, 1 at the end) of the point lying
/// `vertical_offset` above the end, measured by walking segments backwards
/// and consuming their vertical extent. Zero-length routes get the midpoint;
/// the result is clamped away from the exact endpoints so an anchor never
/// degenerates onto a symbol.
pub(crate) fn anchor_ratio(points: &[Point], vertical_offset: f64) -> f64 {
    let mut seg_lengths = Vec::with_capacity(points.len().saturating_sub(1));
    for pair in points.windows(2) {
        let dx = pair[1].x - pair[0].x;
        let dy = pair[1].y - pair[0].y;
        seg_lengths.push((dx * dx + dy * dy).sqrt());
    }
    let total: f64 = seg_lengths.iter().sum();
    if total == 0.0 {
        return 0.5;
    }

    let mut remaining_vertical = vertical_offset;
    let mut dist_from_end = 0.0;
    for i in (1..points.len()).rev() {
        let dy = (points[i].y - points[i - 1].y).abs();
        let seg_len = seg_lengths[i - 1];
        if dy >= remaining_vertical && dy > 0.0 {
            dist_from_end += (remaining_vertical / dy) * seg_len;
            break;
        }
        remaining_vertical -= dy;
        dist_from_end += seg_len;
    }

    (1.0 - dist_from_end / total).clamp(0.01, 0.99)
}
