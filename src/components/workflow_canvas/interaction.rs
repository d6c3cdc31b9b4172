//! Pointer gesture state machine.
//!
//! Exactly one [`Interaction`] is live at a time. Pointer-down starts a gesture from
//! [`Interaction::Idle`], pointer-move feeds it, and pointer-up (or a cancel) always returns to
//! `Idle`, committing a connection only when the release lands on a valid target handle.

use log::debug;

use super::anchors::{
	ADD_BUTTON_RADIUS, PortKind, Side, add_button_center, add_button_sides, node_anchor,
};
use super::geometry::Point;
use super::graph::HandleHit;
use super::state::{CanvasEvent, CanvasState};
use super::types::{AddNodeRequest, ConnectRequest, NodeId};

/// A node being dragged.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeDrag {
	/// Dragged node.
	pub node_id: NodeId,
	/// Screen pointer at pointer-down.
	pub pointer_start: Point,
	/// World position of the node at pointer-down.
	pub origin: Point,
}

/// A connection being drawn from a source handle.
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectionDraft {
	/// Node the drag started on.
	pub source_node_id: NodeId,
	/// Source port id.
	pub source_handle: String,
	/// World anchor of the source handle.
	pub start: Point,
	/// World point under the pointer.
	pub end: Point,
}

/// The active gesture.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Interaction {
	/// No gesture.
	#[default]
	Idle,
	/// Background drag; `last` is the previous screen pointer.
	PanningCanvas {
		/// Previous screen pointer.
		last: Point,
	},
	/// Node drag.
	DraggingNode(NodeDrag),
	/// Connection drag.
	DrawingConnection(ConnectionDraft),
	/// Minimap frame drag.
	DraggingMinimap {
		/// Previous screen pointer.
		last: Point,
		/// Minimap pixels per world unit at pointer-down.
		map_scale: f64,
	},
}

/// What lies under a screen point, in hit priority order.
#[derive(Clone, Debug, PartialEq)]
pub enum Hit {
	/// Inside the visible minimap box.
	Minimap,
	/// An add-adjacent button of the selected node.
	AddButton(NodeId, Side),
	/// A port handle.
	Handle(HandleHit),
	/// A node body.
	Node(NodeId),
	/// Empty canvas.
	Canvas,
}

/// Mouse button behind a pointer-down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
	/// Main button; hit-tested against the canvas.
	Primary,
	/// Wheel button; always pans.
	Middle,
	/// Anything else; ignored.
	Other,
}

impl From<i16> for PointerButton {
	fn from(button: i16) -> Self {
		match button {
			0 => PointerButton::Primary,
			1 => PointerButton::Middle,
			_ => PointerButton::Other,
		}
	}
}

impl CanvasState {
	/// Resolve a screen point to the element under it.
	pub fn hit_test(&self, screen: Point) -> Hit {
		if self.show_minimap
			&& !self.graph.nodes().is_empty()
			&& self.minimap_bounds().contains(screen)
		{
			return Hit::Minimap;
		}
		let world = self.viewport.to_world(screen);
		if let Some(node) = self.selected.as_deref().and_then(|id| self.graph.node(id)) {
			let button = add_button_sides(node.kind).find(|&side| {
				add_button_center(node.position, side).distance(world) <= ADD_BUTTON_RADIUS
			});
			if let Some(side) = button {
				return Hit::AddButton(node.id.clone(), side);
			}
		}
		if let Some(handle) = self.graph.handle_at(world) {
			return Hit::Handle(handle);
		}
		match self.graph.node_at(world) {
			Some(node) => Hit::Node(node.id.clone()),
			None => Hit::Canvas,
		}
	}

	/// Start a gesture. Ignored unless the machine is idle.
	pub fn pointer_down(&mut self, screen: Point) -> Vec<CanvasEvent> {
		if self.interaction != Interaction::Idle {
			return Vec::new();
		}
		match self.hit_test(screen) {
			Hit::Minimap => {
				self.begin_minimap_drag(screen);
				Vec::new()
			}
			Hit::AddButton(node_id, side) => {
				debug!("Add-node requested on {} of {node_id}", side.as_str());
				vec![CanvasEvent::AddNodeRequested(AddNodeRequest {
					source_node_id: node_id,
					side,
				})]
			}
			Hit::Handle(handle) => {
				if handle.kind == PortKind::Source {
					self.begin_connection(handle);
				}
				Vec::new()
			}
			Hit::Node(node_id) => {
				let Some(origin) = self.graph.node(&node_id).map(|n| n.position) else {
					return Vec::new();
				};
				debug!("Dragging node {node_id}");
				self.interaction = Interaction::DraggingNode(NodeDrag {
					node_id: node_id.clone(),
					pointer_start: screen,
					origin,
				});
				self.select(Some(node_id))
			}
			Hit::Canvas => {
				self.interaction = Interaction::PanningCanvas { last: screen };
				self.select(None)
			}
		}
	}

	/// Start a gesture for a specific button. The middle button pans from anywhere.
	pub fn pointer_down_with(&mut self, screen: Point, button: PointerButton) -> Vec<CanvasEvent> {
		match button {
			PointerButton::Primary => self.pointer_down(screen),
			PointerButton::Middle if self.interaction == Interaction::Idle => {
				self.interaction = Interaction::PanningCanvas { last: screen };
				self.select(None)
			}
			PointerButton::Middle | PointerButton::Other => Vec::new(),
		}
	}

	fn begin_connection(&mut self, handle: HandleHit) {
		let Some(node) = self.graph.node(&handle.node_id) else {
			return;
		};
		let start = node_anchor(node.position, handle.side);
		debug!(
			"Drawing connection from {}:{} ({})",
			handle.node_id,
			handle.handle_id,
			handle.side.as_str()
		);
		self.interaction = Interaction::DrawingConnection(ConnectionDraft {
			source_node_id: handle.node_id,
			source_handle: handle.handle_id,
			start,
			end: start,
		});
	}

	fn begin_minimap_drag(&mut self, screen: Point) {
		let Some(map) = self.minimap() else {
			return;
		};
		let local = screen - Point::new(self.minimap_bounds().x, self.minimap_bounds().y);
		if !map.frame.contains(local) {
			self.viewport.center_on(map.to_world(local), self.size);
		}
		self.interaction = Interaction::DraggingMinimap {
			last: screen,
			map_scale: map.scale,
		};
	}

	/// Feed pointer motion to the active gesture.
	pub fn pointer_move(&mut self, screen: Point) -> Vec<CanvasEvent> {
		match &mut self.interaction {
			Interaction::Idle => Vec::new(),
			Interaction::PanningCanvas { last } => {
				let delta = screen - *last;
				*last = screen;
				self.viewport.pan_by(delta);
				Vec::new()
			}
			Interaction::DraggingNode(drag) => {
				let position = drag.origin + (screen - drag.pointer_start) / self.viewport.scale;
				let node_id = drag.node_id.clone();
				if self.graph.move_node(&node_id, position).is_err() {
					self.cancel_gesture();
					return Vec::new();
				}
				vec![CanvasEvent::NodesChanged(self.graph.nodes().to_vec())]
			}
			Interaction::DrawingConnection(draft) => {
				draft.end = self.viewport.to_world(screen);
				Vec::new()
			}
			Interaction::DraggingMinimap { last, map_scale } => {
				let world_delta = (screen - *last) / *map_scale;
				*last = screen;
				self.viewport.pan_by(world_delta * -self.viewport.scale);
				Vec::new()
			}
		}
	}

	/// End the active gesture, committing a drawn connection if it was released on a target.
	pub fn pointer_up(&mut self, screen: Point) -> Vec<CanvasEvent> {
		match std::mem::take(&mut self.interaction) {
			Interaction::DrawingConnection(draft) => self.finish_connection(draft, screen),
			Interaction::Idle => Vec::new(),
			other => {
				debug!("Gesture ended: {other:?}");
				Vec::new()
			}
		}
	}

	fn finish_connection(&mut self, draft: ConnectionDraft, screen: Point) -> Vec<CanvasEvent> {
		let world = self.viewport.to_world(screen);
		let target = match self.graph.handle_at(world) {
			Some(hit) if hit.kind == PortKind::Target && hit.node_id != draft.source_node_id => hit,
			_ => {
				debug!("Connection draft from {} discarded", draft.source_node_id);
				return Vec::new();
			}
		};
		let request = ConnectRequest {
			source_node_id: draft.source_node_id,
			source_handle: draft.source_handle,
			target_node_id: target.node_id,
			target_handle: target.handle_id,
		};
		match self.graph.add_connection(request) {
			Ok(id) => self
				.graph
				.connections()
				.iter()
				.find(|c| c.id == id)
				.cloned()
				.map(CanvasEvent::Connected)
				.into_iter()
				.collect(),
			Err(err) => {
				debug!("Connection rejected: {err}");
				Vec::new()
			}
		}
	}

	/// Drop the active gesture without committing anything.
	pub fn cancel_gesture(&mut self) {
		if self.interaction != Interaction::Idle {
			debug!("Gesture cancelled");
		}
		self.interaction = Interaction::Idle;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::workflow_canvas::graph::Graph;
	use crate::components::workflow_canvas::types::{NodeData, NodeKind};

	/// Input node at (0, 0) and detection node at (0, 300), 800x600 view.
	fn two_nodes() -> (CanvasState, NodeId, NodeId) {
		let mut graph = Graph::new();
		let a = graph.add_node(NodeKind::Input, Point::new(0.0, 0.0), NodeData::default());
		let b = graph.add_node(NodeKind::Detection, Point::new(0.0, 300.0), NodeData::default());
		let mut state = CanvasState::new(graph);
		state.resize(800.0, 600.0);
		(state, a, b)
	}

	#[test]
	fn pressing_empty_canvas_pans_and_clears_selection() {
		let (mut s, a, _) = two_nodes();
		s.pointer_down(Point::new(100.0, 50.0));
		s.pointer_up(Point::new(100.0, 50.0));
		assert_eq!(s.selected(), Some(a.as_str()));

		let events = s.pointer_down(Point::new(600.0, 500.0));
		assert_eq!(events, vec![CanvasEvent::NodeSelected(None)]);
		assert_eq!(
			s.interaction(),
			&Interaction::PanningCanvas {
				last: Point::new(600.0, 500.0)
			}
		);
		s.pointer_move(Point::new(610.0, 480.0));
		s.pointer_move(Point::new(630.0, 470.0));
		assert_eq!(s.viewport().offset, Point::new(30.0, -30.0));
		s.pointer_up(Point::new(630.0, 470.0));
		assert_eq!(s.interaction(), &Interaction::Idle);
	}

	#[test]
	fn click_without_drag_on_canvas_clears_selection() {
		let (mut s, ..) = two_nodes();
		s.pointer_down(Point::new(100.0, 50.0));
		s.pointer_up(Point::new(100.0, 50.0));
		s.pointer_down(Point::new(700.0, 100.0));
		s.pointer_up(Point::new(700.0, 100.0));
		assert_eq!(s.selected(), None);
		assert_eq!(s.viewport().offset, Point::default());
	}

	#[test]
	fn pressing_a_node_selects_it_alone() {
		let (mut s, a, b) = two_nodes();
		let events = s.pointer_down(Point::new(50.0, 350.0));
		assert_eq!(events, vec![CanvasEvent::NodeSelected(Some(b.clone()))]);
		s.pointer_up(Point::new(50.0, 350.0));
		s.pointer_down(Point::new(50.0, 50.0));
		assert_eq!(s.selected(), Some(a.as_str()));
	}

	#[test]
	fn node_drag_is_scale_compensated() {
		let (mut s, _, b) = two_nodes();
		s.viewport.scale = 2.0;
		// B spans screen (0,600)-(480,880) at this zoom
		s.pointer_down(Point::new(100.0, 700.0));
		let events = s.pointer_move(Point::new(140.0, 760.0));
		assert!(matches!(
			events.as_slice(),
			[CanvasEvent::NodesChanged(nodes)] if nodes.len() == 2
		));
		assert_eq!(s.graph().node(&b).unwrap().position, Point::new(20.0, 330.0));
		s.pointer_move(Point::new(100.0, 700.0));
		assert_eq!(s.graph().node(&b).unwrap().position, Point::new(0.0, 300.0));
		s.pointer_up(Point::new(100.0, 700.0));
		assert_eq!(s.interaction(), &Interaction::Idle);
	}

	#[test]
	fn connection_starts_at_the_handle_anchor() {
		let (mut s, a, _) = two_nodes();
		s.pointer_down(Point::new(123.0, 137.0));
		let draft = s.draft().unwrap();
		assert_eq!(draft.source_node_id, a);
		assert_eq!(draft.start, Point::new(120.0, 140.0));
		s.pointer_move(Point::new(400.0, 500.0));
		assert_eq!(s.draft().unwrap().end, Point::new(400.0, 500.0));
	}

	#[test]
	fn target_handles_do_not_start_connections() {
		let (mut s, ..) = two_nodes();
		s.pointer_down(Point::new(120.0, 300.0));
		assert_eq!(s.interaction(), &Interaction::Idle);
		assert_eq!(s.selected(), None);
	}

	#[test]
	fn releasing_over_empty_canvas_discards_the_draft() {
		let (mut s, ..) = two_nodes();
		s.pointer_down(Point::new(120.0, 140.0));
		s.pointer_move(Point::new(600.0, 500.0));
		let events = s.pointer_up(Point::new(600.0, 500.0));
		assert!(events.is_empty());
		assert!(s.graph().connections().is_empty());
		assert_eq!(s.interaction(), &Interaction::Idle);
	}

	#[test]
	fn releasing_on_own_target_is_rejected() {
		let mut graph = Graph::new();
		let n = graph.add_node(NodeKind::Logic, Point::new(0.0, 0.0), NodeData::default());
		let mut s = CanvasState::new(graph);
		s.resize(800.0, 600.0);
		// right source -> own top target
		s.pointer_down(Point::new(240.0, 70.0));
		assert_eq!(s.draft().unwrap().source_node_id, n);
		let events = s.pointer_up(Point::new(120.0, 0.0));
		assert!(events.is_empty());
		assert!(s.graph().connections().is_empty());
	}

	#[test]
	fn releasing_on_a_target_commits_once() {
		let (mut s, a, b) = two_nodes();
		s.pointer_down(Point::new(120.0, 140.0));
		s.pointer_move(Point::new(120.0, 298.0));
		let events = s.pointer_up(Point::new(120.0, 298.0));
		let [CanvasEvent::Connected(conn)] = events.as_slice() else {
			panic!("expected one connection, got {events:?}");
		};
		assert_eq!(conn.source_node_id, a);
		assert_eq!(conn.target_node_id, b);
		assert_eq!(conn.source_handle, "out-1");
		assert_eq!(conn.target_handle, "in-1");
		assert_eq!(s.graph().connections().len(), 1);
	}

	#[test]
	fn add_buttons_only_exist_on_the_selected_node() {
		let (mut s, _, b) = two_nodes();
		let below_b = Point::new(120.0, 440.0 + 26.0);
		s.pointer_down(below_b);
		s.pointer_up(below_b);
		assert_eq!(s.selected(), None);

		s.pointer_down(Point::new(50.0, 350.0));
		s.pointer_up(Point::new(50.0, 350.0));
		let events = s.pointer_down(below_b);
		assert_eq!(
			events,
			vec![CanvasEvent::AddNodeRequested(AddNodeRequest {
				source_node_id: b,
				side: Side::Bottom,
			})]
		);
		assert_eq!(s.interaction(), &Interaction::Idle);
	}

	#[test]
	fn deleting_the_dragged_node_ends_the_drag() {
		let (mut s, a, _) = two_nodes();
		s.pointer_down(Point::new(50.0, 50.0));
		s.delete_node(&a).unwrap();
		assert_eq!(s.interaction(), &Interaction::Idle);
		assert!(s.pointer_move(Point::new(60.0, 60.0)).is_empty());
	}

	#[test]
	fn minimap_drag_moves_the_view() {
		let (mut s, ..) = two_nodes();
		s.toggle_minimap();
		let frame = s.minimap().unwrap().frame;
		let bounds = s.minimap_bounds();
		let grab = Point::new(bounds.x + frame.center().x, bounds.y + frame.center().y);
		s.pointer_down(grab);
		let Interaction::DraggingMinimap { map_scale, .. } = *s.interaction() else {
			panic!("expected minimap drag");
		};
		assert_eq!(s.viewport().offset, Point::default());
		s.pointer_move(grab + Point::new(10.0, 0.0));
		let moved = s.viewport().offset;
		assert!((moved.x + 10.0 / map_scale).abs() < 1e-9);
		assert_eq!(moved.y, 0.0);
		s.pointer_up(grab);
		assert_eq!(s.interaction(), &Interaction::Idle);
	}

	#[test]
	fn minimap_press_outside_the_frame_recentres_then_drags() {
		let (mut s, ..) = two_nodes();
		s.toggle_minimap();
		let map = s.minimap().unwrap();
		let local = Point::new(5.0, 5.0);
		assert!(!map.frame.contains(local));
		let bounds = s.minimap_bounds();
		let press = Point::new(bounds.x, bounds.y) + local;

		s.pointer_down(press);
		assert!(matches!(s.interaction(), Interaction::DraggingMinimap { .. }));
		let target = map.to_world(local);
		let view_centre = Point::new(400.0, 300.0);
		assert!(s.viewport().to_world(view_centre).distance(target) < 1e-9);

		let recentred = s.viewport().offset;
		s.pointer_move(press + Point::new(0.0, 8.0));
		let panned = s.viewport().offset;
		assert_eq!(panned.x, recentred.x);
		assert!((panned.y - (recentred.y - 8.0 / map.scale)).abs() < 1e-9);
		s.pointer_up(press);
		assert_eq!(s.interaction(), &Interaction::Idle);
	}

	#[test]
	fn only_primary_and_middle_buttons_start_gestures() {
		let (mut s, a, _) = two_nodes();
		assert!(s.pointer_down_with(Point::new(120.0, 70.0), PointerButton::from(2)).is_empty());
		assert_eq!(s.interaction(), &Interaction::Idle);
		assert_eq!(s.selected(), None);

		let events = s.pointer_down_with(Point::new(120.0, 70.0), PointerButton::from(0));
		assert_eq!(events, vec![CanvasEvent::NodeSelected(Some(a.clone()))]);
		s.pointer_up(Point::new(120.0, 70.0));

		// middle button over a node pans instead of dragging it
		let events = s.pointer_down_with(Point::new(120.0, 70.0), PointerButton::from(1));
		assert_eq!(events, vec![CanvasEvent::NodeSelected(None)]);
		s.pointer_move(Point::new(150.0, 90.0));
		assert_eq!(s.viewport().offset, Point::new(30.0, 20.0));
		assert_eq!(s.graph().node(&a).unwrap().position, Point::new(0.0, 0.0));
	}

	#[test]
	fn cancel_discards_any_gesture() {
		let (mut s, ..) = two_nodes();
		s.pointer_down(Point::new(120.0, 140.0));
		s.cancel_gesture();
		assert_eq!(s.interaction(), &Interaction::Idle);
		assert!(s.pointer_up(Point::new(120.0, 300.0)).is_empty());
		assert!(s.graph().connections().is_empty());
	}
}
