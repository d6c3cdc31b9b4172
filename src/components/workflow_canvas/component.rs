use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, DragEvent, HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent,
	Window,
};

use super::geometry::Point;
use super::graph::Graph;
use super::interaction::{Interaction, PointerButton};
use super::render;
use super::state::{CanvasEvent, CanvasState};
use super::types::{AddNodeRequest, Connection, Node, NodeId, NodeKind};

/// Drag-and-drop payload type carrying a [`NodeKind`] from a palette.
pub const DRAG_PAYLOAD: &str = "application/x-pipeline-node";

/// Shared handle to the canvas state. The host page keeps a clone to issue commands against
/// the same registry the canvas draws.
#[derive(Clone)]
pub struct CanvasHandle(Rc<RefCell<CanvasState>>);

impl CanvasHandle {
	/// Wrap a fresh canvas over `graph`.
	pub fn new(graph: Graph) -> Self {
		Self(Rc::new(RefCell::new(CanvasState::new(graph))))
	}

	/// Read the state.
	pub fn with<R>(&self, f: impl FnOnce(&CanvasState) -> R) -> R {
		f(&self.0.borrow())
	}

	/// Mutate the state.
	pub fn update<R>(&self, f: impl FnOnce(&mut CanvasState) -> R) -> R {
		f(&mut self.0.borrow_mut())
	}
}

fn local_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> Point {
	let rect = canvas.get_bounding_client_rect();
	Point::new(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn set_cursor(element: &HtmlCanvasElement, interaction: &Interaction) {
	let cursor = match interaction {
		Interaction::Idle => "default",
		Interaction::PanningCanvas { .. }
		| Interaction::DraggingNode(_)
		| Interaction::DraggingMinimap { .. } => "grabbing",
		Interaction::DrawingConnection(_) => "crosshair",
	};
	let _ = web_sys::HtmlElement::style(element).set_property("cursor", cursor);
}

/// Pan/zoom canvas that edits a pipeline graph.
#[component]
pub fn WorkflowCanvas(
	canvas: CanvasHandle,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(default = false)] show_minimap: bool,
	#[prop(optional)] on_node_select: Option<Callback<Option<NodeId>>>,
	#[prop(optional)] on_nodes_change: Option<Callback<Vec<Node>>>,
	#[prop(optional)] on_connect: Option<Callback<Connection>>,
	#[prop(optional)] on_add_node_requested: Option<Callback<AddNodeRequest>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	canvas.update(|s| s.show_minimap = show_minimap);

	let dispatch = move |events: Vec<CanvasEvent>| {
		for event in events {
			match event {
				CanvasEvent::NodeSelected(id) => {
					if let Some(cb) = on_node_select {
						cb.run(id);
					}
				}
				CanvasEvent::NodesChanged(nodes) => {
					if let Some(cb) = on_nodes_change {
						cb.run(nodes);
					}
				}
				CanvasEvent::Connected(connection) => {
					if let Some(cb) = on_connect {
						cb.run(connection);
					}
				}
				CanvasEvent::AddNodeRequested(request) => {
					if let Some(cb) = on_add_node_requested {
						cb.run(request);
					}
				}
			}
		}
	};

	let (state_init, animate_init, resize_cb_init) =
		(canvas.clone(), animate.clone(), resize_cb.clone());
	Effect::new(move |_| {
		let Some(element) = canvas_ref.get() else {
			return;
		};
		let Some(window) = web_sys::window() else {
			warn!("No window; canvas stays inert");
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					element
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					element
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		element.set_width(w as u32);
		element.set_height(h as u32);
		state_init.update(|s| s.resize(w, h));

		let ctx: CanvasRenderingContext2d = match element.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => {
					warn!("2d context has an unexpected type");
					return;
				}
			},
			_ => {
				warn!("Canvas 2d context unavailable");
				return;
			}
		};

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), element.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				state_resize.update(|s| s.resize(nw, nh));
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			state_anim.update(|s| {
				s.tick(0.016);
				render::render(s, &ctx);
			});
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_md = canvas.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(element) = canvas_ref.get() else {
			return;
		};
		let _ = element.focus();
		let p = local_point(&element, &ev);
		let button = PointerButton::from(ev.button());
		let events = state_md.update(|s| {
			let events = s.pointer_down_with(p, button);
			set_cursor(&element, s.interaction());
			events
		});
		dispatch(events);
	};

	let state_mm = canvas.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(element) = canvas_ref.get() else {
			return;
		};
		let p = local_point(&element, &ev);
		dispatch(state_mm.update(|s| s.pointer_move(p)));
	};

	let state_mu = canvas.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some(element) = canvas_ref.get() else {
			return;
		};
		let p = local_point(&element, &ev);
		let events = state_mu.update(|s| {
			let events = s.pointer_up(p);
			set_cursor(&element, s.interaction());
			events
		});
		dispatch(events);
	};

	let state_ml = canvas.clone();
	let on_mouseleave = move |_: MouseEvent| {
		state_ml.update(|s| s.cancel_gesture());
		if let Some(element) = canvas_ref.get() {
			set_cursor(&element, &Interaction::Idle);
		}
	};

	let state_wh = canvas.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let delta = Point::new(ev.delta_x(), ev.delta_y());
		let zoom = ev.ctrl_key() || ev.meta_key();
		state_wh.update(|s| s.wheel(delta, zoom));
	};

	let state_kd = canvas.clone();
	let on_keydown = move |ev: KeyboardEvent| {
		let key = ev.key();
		match key.as_str() {
			"Delete" | "Backspace" => {
				ev.prevent_default();
				dispatch(state_kd.update(|s| s.delete_selected()));
			}
			"Escape" => state_kd.update(|s| s.cancel_gesture()),
			_ => {}
		}
	};

	let state_dr = canvas.clone();
	let on_drop = move |ev: DragEvent| {
		ev.prevent_default();
		let Some(element) = canvas_ref.get() else {
			return;
		};
		let Some(payload) = ev.data_transfer().and_then(|dt| dt.get_data(DRAG_PAYLOAD).ok()) else {
			return;
		};
		match payload.parse::<NodeKind>() {
			Ok(kind) => {
				let p = local_point(&element, &ev);
				let id = state_dr.update(|s| s.place_node(kind, Some(p)));
				debug!("Dropped {kind} as {id}");
			}
			Err(err) => debug!("Ignoring drop: {err}"),
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="workflow-canvas"
			tabindex="0"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			on:keydown=on_keydown
			on:dragover=|ev: DragEvent| ev.prevent_default()
			on:drop=on_drop
			style="display: block; cursor: default; outline: none;"
		/>
	}
}
