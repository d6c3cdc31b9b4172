use log::{debug, info};

use super::anchors::{NODE_SIZE, Side};
use super::fit::{FIT_PADDING, fit_to_content};
use super::geometry::{Point, Rect, Size, Viewport};
use super::graph::{AdjacentNode, Graph, GraphError};
use super::interaction::{ConnectionDraft, Interaction};
use super::minimap::{MINIMAP_SIZE, Minimap, minimap_rect};
use super::types::{
	AddNodeRequest, Connection, Node, NodeData, NodeId, NodeKind, NodePatch, NodeStatus,
};

/// Scale change per wheel tick while the zoom modifier is held.
pub const WHEEL_ZOOM_STEP: f64 = 0.05;
/// Scale change per zoom button press.
pub const BUTTON_ZOOM_STEP: f64 = 0.1;

/// Notifications for the surrounding application.
#[derive(Clone, Debug, PartialEq)]
pub enum CanvasEvent {
	/// Selection changed.
	NodeSelected(Option<NodeId>),
	/// Node positions changed during a drag.
	NodesChanged(Vec<Node>),
	/// A connection gesture completed.
	Connected(Connection),
	/// The "+" affordance on a node edge was pressed.
	AddNodeRequested(AddNodeRequest),
}

/// Everything the canvas mutates: the registry, the viewport, the active gesture and the
/// selection. Each handler updates them together before returning.
pub struct CanvasState {
	pub(super) graph: Graph,
	pub(super) viewport: Viewport,
	pub(super) interaction: Interaction,
	pub(super) selected: Option<NodeId>,
	pub(super) size: Size,
	/// Whether the minimap overlay is drawn and interactive.
	pub show_minimap: bool,
	/// Seconds of animation clock, drives the connection flow dashes.
	pub flow_time: f64,
}

impl CanvasState {
	/// Canvas over `graph` with the default viewport and no size yet.
	pub fn new(graph: Graph) -> Self {
		Self {
			graph,
			viewport: Viewport::default(),
			interaction: Interaction::Idle,
			selected: None,
			size: Size::default(),
			show_minimap: false,
			flow_time: 0.0,
		}
	}

	/// The registry, read-only.
	pub fn graph(&self) -> &Graph {
		&self.graph
	}

	/// Current pan and zoom.
	pub fn viewport(&self) -> Viewport {
		self.viewport
	}

	/// Currently selected node.
	pub fn selected(&self) -> Option<&str> {
		self.selected.as_deref()
	}

	/// Active gesture.
	pub fn interaction(&self) -> &Interaction {
		&self.interaction
	}

	/// Size of the host surface.
	pub fn size(&self) -> Size {
		self.size
	}

	/// In-progress connection, if one is being drawn.
	pub fn draft(&self) -> Option<&ConnectionDraft> {
		match &self.interaction {
			Interaction::DrawingConnection(draft) => Some(draft),
			_ => None,
		}
	}

	/// Record a new host size. Node positions are left alone.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.size = Size::new(width, height);
	}

	pub(super) fn select(&mut self, id: Option<NodeId>) -> Vec<CanvasEvent> {
		if self.selected == id {
			return Vec::new();
		}
		debug!("Selection {:?} -> {:?}", self.selected, id);
		self.selected = id.clone();
		vec![CanvasEvent::NodeSelected(id)]
	}

	fn view_center(&self) -> Point {
		Point::new(self.size.width / 2.0, self.size.height / 2.0)
	}

	/// Step the zoom, anchored at the view centre.
	pub fn zoom_by(&mut self, step: f64) {
		let center = self.view_center();
		self.viewport.zoom_about(self.viewport.scale + step, center);
	}

	/// Zoom in by one button step.
	pub fn zoom_in(&mut self) {
		self.zoom_by(BUTTON_ZOOM_STEP);
	}

	/// Zoom out by one button step.
	pub fn zoom_out(&mut self) {
		self.zoom_by(-BUTTON_ZOOM_STEP);
	}

	/// Scroll input: zooms by one step per tick with the modifier held, pans otherwise.
	pub fn wheel(&mut self, delta: Point, zoom_modifier: bool) {
		if zoom_modifier {
			if delta.y != 0.0 {
				self.zoom_by(-delta.y.signum() * WHEEL_ZOOM_STEP);
			}
		} else {
			self.viewport.pan_by(Point::new(-delta.x, -delta.y));
		}
	}

	/// Frame every node; does nothing on an empty graph.
	pub fn fit_view(&mut self) {
		if let Some(viewport) = fit_to_content(&self.graph, self.size, FIT_PADDING) {
			debug!("Fit view: scale {:.2}", viewport.scale);
			self.viewport = viewport;
		}
	}

	/// Show or hide the minimap.
	pub fn toggle_minimap(&mut self) {
		self.show_minimap = !self.show_minimap;
	}

	/// Minimap layout for the current frame, or `None` when hidden or empty.
	pub fn minimap(&self) -> Option<Minimap> {
		if !self.show_minimap {
			return None;
		}
		Minimap::layout(
			&self.graph,
			&self.viewport,
			self.size,
			self.selected(),
			MINIMAP_SIZE,
		)
	}

	/// Screen rectangle of the minimap box.
	pub fn minimap_bounds(&self) -> Rect {
		minimap_rect(self.size)
	}

	/// Instantiate a palette entry, centred under `screen` or under the view centre.
	pub fn place_node(&mut self, kind: NodeKind, screen: Option<Point>) -> NodeId {
		let at = self.viewport.to_world(screen.unwrap_or_else(|| self.view_center()));
		let position = at - Point::new(NODE_SIZE.width / 2.0, NODE_SIZE.height / 2.0);
		self.graph.add_node(
			kind,
			position,
			NodeData {
				label: format!("New {kind}"),
				description: Some("Added from library".into()),
				status: NodeStatus::Idle,
			},
		)
	}

	/// Resolve an add-adjacent request with the chosen node kind.
	pub fn add_adjacent(
		&mut self,
		source_id: &str,
		side: Side,
		kind: NodeKind,
	) -> Result<AdjacentNode, GraphError> {
		self.graph.add_adjacent(source_id, side, kind)
	}

	/// Apply a field-level update to a node.
	pub fn update_node(&mut self, id: &str, patch: NodePatch) -> Result<(), GraphError> {
		self.graph.update_node(id, patch)
	}

	/// Delete a node (and its connections), dropping any selection or gesture that referred to it.
	pub fn delete_node(&mut self, id: &str) -> Result<Vec<CanvasEvent>, GraphError> {
		self.graph.delete_node(id)?;
		let involved = match &self.interaction {
			Interaction::DraggingNode(drag) => drag.node_id == id,
			Interaction::DrawingConnection(draft) => draft.source_node_id == id,
			_ => false,
		};
		if involved {
			self.cancel_gesture();
		}
		Ok(if self.selected.as_deref() == Some(id) {
			self.select(None)
		} else {
			Vec::new()
		})
	}

	/// Delete the selected node, if any.
	pub fn delete_selected(&mut self) -> Vec<CanvasEvent> {
		let Some(id) = self.selected.clone() else {
			return Vec::new();
		};
		info!("Deleting selected node {id}");
		self.delete_node(&id).unwrap_or_default()
	}

	/// Advance the animation clock.
	pub fn tick(&mut self, dt: f64) {
		self.flow_time += dt;
	}
}
