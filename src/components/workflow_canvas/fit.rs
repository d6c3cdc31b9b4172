use super::geometry::{Point, Size, Viewport, clamp_scale};
use super::graph::Graph;

/// World units kept around the content when fitting.
pub const FIT_PADDING: f64 = 100.0;

/// Viewport that frames every node with `padding` world units around them, never zooming in
/// past 100%. `None` for an empty graph.
pub fn fit_to_content(graph: &Graph, canvas: Size, padding: f64) -> Option<Viewport> {
	let bounds = graph.bounds()?;
	let content = Size::new(
		bounds.width + padding * 2.0,
		bounds.height + padding * 2.0,
	);
	let scale = clamp_scale(
		(canvas.width / content.width)
			.min(canvas.height / content.height)
			.min(1.0),
	);
	let middle = bounds.center();
	Some(Viewport {
		offset: Point::new(
			canvas.width / 2.0 - middle.x * scale,
			canvas.height / 2.0 - middle.y * scale,
		),
		scale,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::workflow_canvas::types::{NodeData, NodeKind};

	fn spanning(max: Point) -> Graph {
		let mut g = Graph::new();
		g.add_node(NodeKind::Input, Point::new(0.0, 0.0), NodeData::default());
		g.add_node(NodeKind::Output, max - Point::new(240.0, 140.0), NodeData::default());
		g
	}

	#[test]
	fn content_midpoint_lands_on_screen_midpoint() {
		let g = spanning(Point::new(1000.0, 800.0));
		let canvas = Size::new(1600.0, 900.0);
		let vp = fit_to_content(&g, canvas, 100.0).unwrap();
		assert!(vp.scale <= 1.0);
		assert!((vp.scale - 0.9).abs() < 1e-9);
		let mid = vp.to_screen(Point::new(500.0, 400.0));
		assert!(mid.distance(Point::new(800.0, 450.0)) < 1e-9);
	}

	#[test]
	fn small_content_is_not_magnified() {
		let g = spanning(Point::new(300.0, 200.0));
		let vp = fit_to_content(&g, Size::new(1920.0, 1080.0), FIT_PADDING).unwrap();
		assert_eq!(vp.scale, 1.0);
		let mid = vp.to_screen(Point::new(150.0, 100.0));
		assert!(mid.distance(Point::new(960.0, 540.0)) < 1e-9);
	}

	#[test]
	fn empty_graph_yields_nothing() {
		assert!(fit_to_content(&Graph::new(), Size::new(800.0, 600.0), FIT_PADDING).is_none());
	}
}
