//! Whole-gesture scenarios driven through the public canvas API.

use pipeline_canvas::components::workflow_canvas::anchors::add_button_center;
use pipeline_canvas::{
	CanvasEvent, CanvasState, Graph, Interaction, NodeData, NodeKind, Point, Side, Viewport,
};

fn pipeline() -> (CanvasState, String, String) {
	let mut graph = Graph::new();
	let a = graph.add_node(NodeKind::Input, Point::new(0.0, 0.0), NodeData::default());
	let b = graph.add_node(NodeKind::Detection, Point::new(0.0, 300.0), NodeData::default());
	let mut state = CanvasState::new(graph);
	state.resize(800.0, 600.0);
	(state, a, b)
}

fn connect_bottom_to_top(state: &mut CanvasState) -> Vec<CanvasEvent> {
	assert!(state.pointer_down(Point::new(120.0, 140.0)).is_empty());
	assert!(matches!(state.interaction(), Interaction::DrawingConnection(_)));
	state.pointer_move(Point::new(120.0, 220.0));
	state.pointer_move(Point::new(120.0, 300.0));
	state.pointer_up(Point::new(120.0, 300.0))
}

#[test]
fn dragging_between_handles_commits_a_connection() {
	let (mut state, a, b) = pipeline();

	let events = connect_bottom_to_top(&mut state);
	assert_eq!(events.len(), 1);
	let CanvasEvent::Connected(first) = &events[0] else {
		panic!("expected a connection, got {events:?}");
	};
	assert_eq!(first.source_node_id, a);
	assert_eq!(first.source_handle, "out-1");
	assert_eq!(first.target_node_id, b);
	assert_eq!(first.target_handle, "in-1");
	assert_eq!(state.interaction(), &Interaction::Idle);

	let events = connect_bottom_to_top(&mut state);
	let CanvasEvent::Connected(second) = &events[0] else {
		panic!("expected a second connection, got {events:?}");
	};
	assert_ne!(first.id, second.id);
	assert_eq!(state.graph().connections().len(), 2);
}

#[test]
fn releasing_on_empty_canvas_discards_the_draft() {
	let (mut state, _, _) = pipeline();
	state.pointer_down(Point::new(120.0, 140.0));
	state.pointer_move(Point::new(500.0, 500.0));
	assert!(state.pointer_up(Point::new(500.0, 500.0)).is_empty());
	assert!(state.graph().connections().is_empty());
	assert!(state.draft().is_none());
}

#[test]
fn dragging_a_node_moves_it_and_selects_it() {
	let (mut state, _, b) = pipeline();

	let events = state.pointer_down(Point::new(120.0, 370.0));
	assert_eq!(events, vec![CanvasEvent::NodeSelected(Some(b.clone()))]);

	let events = state.pointer_move(Point::new(220.0, 420.0));
	let Some(CanvasEvent::NodesChanged(nodes)) = events.first() else {
		panic!("expected a position update, got {events:?}");
	};
	let moved = nodes.iter().find(|n| n.id == b).map(|n| n.position);
	assert_eq!(moved, Some(Point::new(100.0, 350.0)));

	state.pointer_up(Point::new(220.0, 420.0));
	assert_eq!(state.selected(), Some(b.as_str()));
	assert_eq!(state.interaction(), &Interaction::Idle);
}

#[test]
fn add_button_request_resolves_to_a_wired_neighbour() {
	let (mut state, _, b) = pipeline();
	state.pointer_down(Point::new(120.0, 370.0));
	state.pointer_up(Point::new(120.0, 370.0));

	let button = add_button_center(Point::new(0.0, 300.0), Side::Bottom);
	let events = state.pointer_down(state.viewport().to_screen(button));
	let Some(CanvasEvent::AddNodeRequested(request)) = events.first() else {
		panic!("expected an add request, got {events:?}");
	};
	assert_eq!(request.source_node_id, b);
	assert_eq!(request.side, Side::Bottom);

	let added = state
		.add_adjacent(&request.source_node_id, request.side, NodeKind::Tracking)
		.unwrap();
	let node = state.graph().node(&added.node_id).unwrap();
	assert_eq!(node.position, Point::new(0.0, 550.0));
	assert_eq!(node.data.label, "New tracking");

	let id = added.connection_id.unwrap();
	let wire = state.graph().connections().iter().find(|c| c.id == id).unwrap();
	assert_eq!(wire.source_node_id, b);
	assert_eq!(wire.target_node_id, added.node_id);
}

#[test]
fn deleting_a_node_cascades_and_clears_selection() {
	let (mut state, a, b) = pipeline();
	connect_bottom_to_top(&mut state);
	state.pointer_down(Point::new(120.0, 70.0));
	state.pointer_up(Point::new(120.0, 70.0));
	assert_eq!(state.selected(), Some(a.as_str()));

	let events = state.delete_selected();
	assert_eq!(events, vec![CanvasEvent::NodeSelected(None)]);
	assert!(state.graph().node(&a).is_none());
	assert!(state.graph().node(&b).is_some());
	assert!(state.graph().connections().is_empty());
}

#[test]
fn drop_on_empty_canvas_then_fit() {
	let mut state = CanvasState::new(Graph::new());
	state.resize(800.0, 600.0);
	assert!(state.minimap().is_none());

	let id = state.place_node(NodeKind::Pose, Some(Point::new(400.0, 300.0)));
	let node = state.graph().node(&id).unwrap();
	assert_eq!(node.position, Point::new(280.0, 230.0));

	state.fit_view();
	assert_eq!(
		state.viewport(),
		Viewport {
			offset: Point::new(0.0, 0.0),
			scale: 1.0,
		}
	);
}
