//! Browser entry point: installs logging and mounts the pipeline editor.

use pipeline_canvas::{App, init_logging};

fn main() {
	init_logging();
	leptos::mount::mount_to_body(App);
}
