//! Projection of the whole graph into a fixed-size overview box.

use super::geometry::{Point, Rect, Size, Viewport};
use super::graph::Graph;
use super::types::{NodeId, NodeKind};

/// Size of the minimap box, screen units.
pub const MINIMAP_SIZE: Size = Size::new(240.0, 160.0);
/// World units added around the node bounds before projecting.
pub const MINIMAP_PADDING: f64 = 100.0;
const MARGIN_RIGHT: f64 = 80.0;
const MARGIN_BOTTOM: f64 = 24.0;
const MIN_GLYPH: Size = Size::new(6.0, 4.0);

/// A node glyph in minimap-local coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct MinimapNode {
	/// Node the glyph stands for.
	pub id: NodeId,
	/// Kind, for colouring.
	pub kind: NodeKind,
	/// Glyph box, minimap-local.
	pub rect: Rect,
	/// Highlight as the current selection.
	pub selected: bool,
}

/// A laid-out minimap. All rectangles are relative to the minimap's top-left corner.
#[derive(Clone, Debug, PartialEq)]
pub struct Minimap {
	/// Minimap units per world unit.
	pub scale: f64,
	world: Rect,
	inset: Point,
	/// Node glyphs in draw order.
	pub nodes: Vec<MinimapNode>,
	/// The currently visible world region.
	pub frame: Rect,
}

impl Minimap {
	/// Lay out the overview for `graph` as seen through `viewport` on a `screen`-sized canvas.
	/// Returns `None` when there is nothing to show.
	pub fn layout(
		graph: &Graph,
		viewport: &Viewport,
		screen: Size,
		selected: Option<&str>,
		map: Size,
	) -> Option<Self> {
		let bounds = graph.bounds()?.expand(MINIMAP_PADDING);
		let world = Rect::new(
			bounds.x,
			bounds.y,
			bounds.width.max(1.0),
			bounds.height.max(1.0),
		);
		let scale = (map.width / world.width).min(map.height / world.height);
		let inset = Point::new(
			(map.width - world.width * scale) / 2.0,
			(map.height - world.height * scale) / 2.0,
		);

		let mut minimap = Self {
			scale,
			world,
			inset,
			nodes: Vec::with_capacity(graph.nodes().len()),
			frame: Rect::default(),
		};
		minimap.nodes = graph
			.nodes()
			.iter()
			.map(|node| {
				let b = node.bounds();
				let origin = minimap.to_map(Point::new(b.x, b.y));
				MinimapNode {
					id: node.id.clone(),
					kind: node.kind,
					rect: Rect::new(
						origin.x,
						origin.y,
						(b.width * scale).max(MIN_GLYPH.width),
						(b.height * scale).max(MIN_GLYPH.height),
					),
					selected: selected == Some(node.id.as_str()),
				}
			})
			.collect();

		let visible = viewport.visible_world(screen);
		let origin = minimap.to_map(Point::new(visible.x, visible.y));
		minimap.frame = Rect::new(
			origin.x,
			origin.y,
			(visible.width * scale).max(0.0),
			(visible.height * scale).max(0.0),
		);
		Some(minimap)
	}

	/// World point to minimap-local point.
	pub fn to_map(&self, world: Point) -> Point {
		self.inset + (world - Point::new(self.world.x, self.world.y)) * self.scale
	}

	/// Minimap-local point to world point.
	pub fn to_world(&self, map: Point) -> Point {
		(map - self.inset) / self.scale + Point::new(self.world.x, self.world.y)
	}
}

/// Screen placement of the minimap box, anchored to the bottom-right corner.
pub fn minimap_rect(screen: Size) -> Rect {
	Rect::new(
		screen.width - MARGIN_RIGHT - MINIMAP_SIZE.width,
		screen.height - MARGIN_BOTTOM - MINIMAP_SIZE.height,
		MINIMAP_SIZE.width,
		MINIMAP_SIZE.height,
	)
}
