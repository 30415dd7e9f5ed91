//! Edge routing and cluster fitting.
//!
//! Run after node placement. Each edge gets three waypoints: where it leaves
//! the source rectangle, a control point for a gentle curve, and where it
//! enters the target rectangle. Each cluster gets the union of its member
//! rectangles expanded by the cluster margin.

use cadence_core::geometry::{Bounds, Insets, Point};

use crate::structure::{Diagram, Edge};

/// Fraction of the edge length used as the curve offset.
const CURVE_FACTOR: f32 = 0.15;

/// Upper bound of the curve offset.
const MAX_CURVE_OFFSET: f32 = 50.0;

/// Routes every edge of `diagram` from the current node geometry.
pub(crate) fn route_edges(diagram: &mut Diagram) {
    let routes: Vec<_> = diagram
        .edges()
        .filter_map(|edge| Some((edge.id(), route(diagram, edge)?)))
        .collect();
    for (id, waypoints) in routes {
        if let Some(edge) = diagram.edge_mut(id) {
            edge.set_waypoints(waypoints);
        }
    }
}

fn route(diagram: &Diagram, edge: &Edge) -> Option<Vec<Point>> {
    let source = diagram.node(edge.source())?.bounds();
    if edge.is_self_loop() {
        return Some(self_loop(source));
    }
    let target = diagram.node(edge.target())?.bounds();
    Some(curve_between(source, target))
}

/// A short arc above the node, leaving and re-entering its top side.
fn self_loop(bounds: Bounds) -> Vec<Point> {
    let center = bounds.center();
    let quarter = bounds.width() / 4.0;
    let top = bounds.min_y();
    vec![
        Point::new(center.x() - quarter, top),
        Point::new(center.x(), top - bounds.height() / 2.0),
        Point::new(center.x() + quarter, top),
    ]
}

fn curve_between(source: Bounds, target: Bounds) -> Vec<Point> {
    let start = source.clip_toward(target.center());
    let end = target.clip_toward(source.center());

    let delta = end.sub_point(start);
    let length = start.distance(end);
    let control = if length > f32::EPSILON {
        let offset = (length * CURVE_FACTOR).min(MAX_CURVE_OFFSET);
        let normal = Point::new(-delta.y() / length, delta.x() / length);
        start
            .midpoint(end)
            .add_point(Point::new(normal.x() * offset, normal.y() * offset))
    } else {
        start.midpoint(end)
    };
    vec![start, control, end]
}

/// Sets every cluster's bounds to the union of its members plus `margin`.
pub(crate) fn fit_clusters(diagram: &mut Diagram, margin: f32) {
    let fitted: Vec<_> = diagram
        .clusters()
        .filter_map(|cluster| {
            let bounds = cluster
                .members()
                .iter()
                .filter_map(|member| diagram.node(*member))
                .map(|node| node.bounds())
                .reduce(|acc, bounds| acc.merge(&bounds))?;
            Some((cluster.id(), bounds.add_padding(Insets::uniform(margin))))
        })
        .collect();
    for (id, bounds) in fitted {
        if let Some(cluster) = diagram.cluster_mut(id) {
            cluster.set_bounds(bounds);
        }
    }
}
