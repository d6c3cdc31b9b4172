use leptos::prelude::*;
use log::{info, warn};
use web_sys::DragEvent;

use crate::components::workflow_canvas::{
	AddNodeRequest, CanvasHandle, CanvasState, Connection, DRAG_PAYLOAD, Graph, Node, NodeData,
	NodeId, NodeKind, NodePatch, NodeStatus, Point, WorkflowCanvas,
};

/// One stage of the demo pipeline with explicit port ids.
fn stage(
	id: &str,
	kind: NodeKind,
	y: f64,
	label: &str,
	description: &str,
	status: NodeStatus,
	ports: (Option<&str>, Option<&str>),
) -> Node {
	let mut node = Node::new(
		id,
		kind,
		Point::new(600.0, y),
		NodeData {
			label: label.into(),
			description: Some(description.into()),
			status,
		},
	);
	node.inputs = ports.0.map(String::from).into_iter().collect();
	node.outputs = ports.1.map(String::from).into_iter().collect();
	node
}

fn link(id: &str, source: (&str, &str), target: (&str, &str)) -> Connection {
	Connection {
		id: id.into(),
		source_node_id: source.0.into(),
		source_handle: source.1.into(),
		target_node_id: target.0.into(),
		target_handle: target.1.into(),
	}
}

/// A vertical five-stage detection pipeline to start from.
fn sample_pipeline() -> Graph {
	use NodeKind::*;
	use NodeStatus::*;

	let nodes = vec![
		stage("1", Input, 100.0, "Video Source", "RTSP Stream 01", Running, (None, Some("out-1"))),
		stage(
			"2",
			Detection,
			350.0,
			"YOLOv8 Detection",
			"Person, Car",
			Running,
			(Some("in-2"), Some("out-2")),
		),
		stage(
			"3",
			Tracking,
			600.0,
			"ByteTrack",
			"High speed tracking",
			Idle,
			(Some("in-3"), Some("out-3")),
		),
		stage(
			"4",
			Logic,
			850.0,
			"Zone Filter",
			"Exclude Safe Zone",
			Idle,
			(Some("in-4"), Some("out-4")),
		),
		stage("5", Output, 1100.0, "Database Sink", "PostgreSQL", Idle, (Some("in-5"), None)),
	];
	let connections = vec![
		link("c1", ("1", "out-1"), ("2", "in-2")),
		link("c2", ("2", "out-2"), ("3", "in-3")),
		link("c3", ("3", "out-3"), ("4", "in-4")),
		link("c4", ("4", "out-4"), ("5", "in-5")),
	];
	Graph::from_parts(nodes, connections)
}

/// Palette subtitle for a node kind.
fn palette_hint(kind: NodeKind) -> &'static str {
	match kind {
		NodeKind::Input => "Camera, RTSP, File",
		NodeKind::Detection => "YOLO, SSD, FasterRCNN",
		NodeKind::Tracking => "ByteTrack, DeepSort",
		NodeKind::Pose => "MoveNet, PoseNet",
		NodeKind::Classifier => "ResNet, MobileNet",
		NodeKind::Logic => "Filter, Switch, Merge",
		NodeKind::Output => "DB, API, File",
	}
}

/// Pipeline editor page with the node library and an inspector beside the canvas.
#[component]
pub fn Editor() -> impl IntoView {
	let canvas = CanvasHandle::new(sample_pipeline());
	let store = StoredValue::new_local(canvas.clone());

	let selected = RwSignal::new(None::<NodeId>);
	let pending_add = RwSignal::new(None::<AddNodeRequest>);
	// Bumped whenever the registry changes so inspector fields re-read it.
	let revision = RwSignal::new(0u64);
	let bump = move || revision.update(|r| *r += 1);
	let command = move |f: fn(&mut CanvasState)| store.with_value(|c| c.update(f));

	let on_node_select = Callback::new(move |id: Option<NodeId>| {
		pending_add.set(None);
		selected.set(id);
	});
	let on_nodes_change = Callback::new(move |_: Vec<Node>| bump());
	let on_connect = Callback::new(move |c: Connection| {
		info!("Pipeline gained {} -> {}", c.source_node_id, c.target_node_id);
		bump();
	});
	let on_add_node_requested =
		Callback::new(move |req: AddNodeRequest| pending_add.set(Some(req)));

	let palette = NodeKind::ALL
		.into_iter()
		.map(|kind| {
			let on_dragstart = move |ev: DragEvent| {
				if let Some(dt) = ev.data_transfer() {
					let _ = dt.set_data(DRAG_PAYLOAD, kind.as_str());
				}
			};
			let on_click = move |_| {
				store.with_value(|c| c.update(|s| s.place_node(kind, None)));
				bump();
			};
			view! {
				<button
					class="palette-item"
					draggable="true"
					style:border-left-color=kind.color()
					on:dragstart=on_dragstart
					on:click=on_click
				>
					<strong>{kind.title()}</strong>
					<small>{palette_hint(kind)}</small>
				</button>
			}
		})
		.collect_view();

	let chooser = move || {
		pending_add.get().map(|req| {
			let options = NodeKind::ALL
				.into_iter()
				.map(|kind| {
					let source = req.source_node_id.clone();
					let side = req.side;
					let on_click = move |_| {
						let added = store
							.with_value(|c| c.update(|s| s.add_adjacent(&source, side, kind)));
						match added {
							Ok(added) => info!("Added {} beside {source}", added.node_id),
							Err(err) => warn!("Add beside {source} failed: {err}"),
						}
						pending_add.set(None);
						bump();
					};
					view! { <button on:click=on_click>{kind.title()}</button> }
				})
				.collect_view();
			view! {
				<div class="add-node-chooser">
					<p>"Add node " {req.side.as_str()} " of " {req.source_node_id.clone()}</p>
					{options}
					<button class="cancel" on:click=move |_| pending_add.set(None)>"Cancel"</button>
				</div>
			}
		})
	};

	let inspector = move || {
		revision.track();
		let id = selected.get()?;
		let data = store.with_value(|c| c.with(|s| s.graph().node(&id).map(|n| n.data.clone())))?;

		let label_id = id.clone();
		let on_label = move |ev: web_sys::Event| {
			let label = event_target_value(&ev);
			let patch = NodePatch {
				label: Some(label),
				..NodePatch::default()
			};
			if let Err(err) = store.with_value(|c| c.update(|s| s.update_node(&label_id, patch))) {
				warn!("{err}");
			}
			bump();
		};

		let statuses = [
			NodeStatus::Idle,
			NodeStatus::Running,
			NodeStatus::Completed,
			NodeStatus::Error,
		]
		.into_iter()
		.map(|status| {
			let status_id = id.clone();
			let on_click = move |_| {
				let patch = NodePatch {
					status: Some(status),
					..NodePatch::default()
				};
				let updated = store.with_value(|c| c.update(|s| s.update_node(&status_id, patch)));
				if let Err(err) = updated {
					warn!("{err}");
				}
				bump();
			};
			view! {
				<button class:active={data.status == status} on:click=on_click>
					{status.as_str()}
				</button>
			}
		})
		.collect_view();

		let delete_id = id.clone();
		let on_delete = move |_| {
			if let Err(err) = store.with_value(|c| c.update(|s| s.delete_node(&delete_id))) {
				warn!("{err}");
			}
			selected.set(None);
			bump();
		};

		Some(view! {
			<aside class="inspector">
				<h2>{id}</h2>
				<label>
					"Label"
					<input type="text" prop:value=data.label on:change=on_label />
				</label>
				<p class="description">{data.description.unwrap_or_default()}</p>
				<div class="status-row">{statuses}</div>
				<button class="danger" on:click=on_delete>"Delete node"</button>
			</aside>
		})
	};

	view! {
		<div class="fullscreen-graph">
			<WorkflowCanvas
				canvas=canvas
				fullscreen=true
				show_minimap=true
				on_node_select=on_node_select
				on_nodes_change=on_nodes_change
				on_connect=on_connect
				on_add_node_requested=on_add_node_requested
			/>
			<div class="graph-overlay">
				<h1>"Pipeline Editor"</h1>
				<p class="subtitle">
					"Drag from the library or click to add. Drag handles to connect. "
					"Ctrl+scroll to zoom."
				</p>
				<nav class="palette">{palette}</nav>
			</div>
			<div class="toolbar">
				<button on:click=move |_| command(CanvasState::zoom_out)>"-"</button>
				<button on:click=move |_| command(CanvasState::zoom_in)>"+"</button>
				<button on:click=move |_| command(CanvasState::fit_view)>"Fit"</button>
				<button on:click=move |_| command(CanvasState::toggle_minimap)>"Minimap"</button>
			</div>
			{chooser}
			{inspector}
		</div>
	}
}
