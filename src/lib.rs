//! Leptos client-side pipeline editor: app wiring, routes and the canvas API.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
pub mod components;
mod pages;

// Top-Level pages
use crate::pages::editor::Editor;
use crate::pages::not_found::NotFound;

pub use crate::components::workflow_canvas::{
	AddNodeRequest, CanvasEvent, CanvasHandle, CanvasState, ConnectRequest, Connection, CubicPath,
	Graph, GraphError, Interaction, Minimap, Node, NodeData, NodeKind, NodePatch, NodeStatus,
	Point, PortKind, Rect, Side, Size, Viewport, WorkflowCanvas, best_route, fit_to_content,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// An app router which renders the pipeline editor and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />

		// sets the document title
		<Title text="Pipeline Editor" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Editor />
			</Routes>
		</Router>
	}
}
