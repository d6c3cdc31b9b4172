//! Anchor-pair selection and S-curve synthesis for connections.

use super::anchors::{NODE_SIZE, Side, anchors};
use super::geometry::Point;
use super::graph::Graph;
use super::types::Connection;

/// Smallest distance between a path end and its control point.
pub const MIN_CONTROL_OFFSET: f64 = 50.0;

/// Candidate (source side, target side) pairings, in tie-break order.
pub const CANDIDATE_PAIRS: [(Side, Side); 8] = [
	(Side::Bottom, Side::Top),
	(Side::Right, Side::Left),
	(Side::Left, Side::Right),
	(Side::Top, Side::Bottom),
	(Side::Bottom, Side::Left),
	(Side::Bottom, Side::Right),
	(Side::Right, Side::Top),
	(Side::Left, Side::Top),
];

/// The chosen anchor pair between two nodes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Route {
	/// Side of the source node the path leaves from.
	pub from: Side,
	/// Side of the target node the path enters.
	pub to: Side,
	/// World-space start point.
	pub start: Point,
	/// World-space end point.
	pub end: Point,
}

/// Pick the shortest candidate pairing between nodes at `source` and `target`.
/// Equal distances resolve to the earlier entry of [`CANDIDATE_PAIRS`].
pub fn best_route(source: Point, target: Point) -> Route {
	let (s, t) = (anchors(source, NODE_SIZE), anchors(target, NODE_SIZE));
	let route_for = |(from, to): (Side, Side)| Route {
		from,
		to,
		start: s.get(from),
		end: t.get(to),
	};
	let mut best = route_for(CANDIDATE_PAIRS[0]);
	let mut best_dist = best.start.distance(best.end);
	for &pair in &CANDIDATE_PAIRS[1..] {
		let route = route_for(pair);
		let dist = route.start.distance(route.end);
		if dist < best_dist {
			best = route;
			best_dist = dist;
		}
	}
	best
}

/// A cubic Bézier segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicPath {
	/// Start point.
	pub start: Point,
	/// Control point near the start.
	pub c1: Point,
	/// Control point near the end.
	pub c2: Point,
	/// End point.
	pub end: Point,
}

impl CubicPath {
	/// S-curve from `start` to `end`, bending along whichever axis dominates.
	pub fn between(start: Point, end: Point) -> Self {
		let (dx, dy) = ((end.x - start.x).abs(), (end.y - start.y).abs());
		let (c1, c2) = if dy > dx {
			let k = (dy * 0.5).max(MIN_CONTROL_OFFSET);
			(Point::new(start.x, start.y + k), Point::new(end.x, end.y - k))
		} else {
			let k = (dx * 0.5).max(MIN_CONTROL_OFFSET);
			(Point::new(start.x + k, start.y), Point::new(end.x - k, end.y))
		};
		Self { start, c1, c2, end }
	}
}

/// A connection resolved to a drawable path.
#[derive(Clone, Debug)]
pub struct RoutedConnection<'a> {
	/// The registry entry.
	pub connection: &'a Connection,
	/// Anchor pair chosen for it.
	pub route: Route,
	/// Path between the anchors.
	pub path: CubicPath,
	/// Draw the animated dashed overlay.
	pub active: bool,
}

/// Route every connection whose endpoints both exist; orphans are skipped.
pub fn route_connections(graph: &Graph) -> Vec<RoutedConnection<'_>> {
	graph
		.connections()
		.iter()
		.filter_map(|connection| {
			let source = graph.node(&connection.source_node_id)?;
			let target = graph.node(&connection.target_node_id)?;
			let route = best_route(source.position, target.position);
			Some(RoutedConnection {
				connection,
				route,
				path: CubicPath::between(route.start, route.end),
				active: true,
			})
		})
		.collect()
}
