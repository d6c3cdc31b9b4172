use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::anchors::{
	ADD_BUTTON_RADIUS, HANDLE_RADIUS, NODE_HEIGHT, NODE_WIDTH, add_button_center,
	add_button_sides, node_anchor, port_handles,
};
use super::geometry::Rect;
use super::router::{CubicPath, route_connections};
use super::state::CanvasState;
use super::types::{Node, NodeStatus};

const BACKGROUND: &str = "#0f121a";
const SURFACE: &str = "#1a1f2b";
const STROKE: &str = "#2e3648";
const TEXT: &str = "#e6e9f0";
const TEXT_SECONDARY: &str = "#8a93a6";
const PRIMARY: &str = "#3b82f6";
const RUNNING: &str = "#22c55e";

const GRID_SPACING: f64 = 24.0;
const CORNER_RADIUS: f64 = 16.0;
const FLOW_DASH: f64 = 8.0;
const FLOW_SPEED: f64 = 16.0;

/// Draw one frame of the canvas.
pub fn render(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	let size = state.size();
	let vp = state.viewport();
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, size.width, size.height);
	draw_grid(state, ctx);

	ctx.save();
	let _ = ctx.translate(vp.offset.x, vp.offset.y);
	let _ = ctx.scale(vp.scale, vp.scale);
	draw_connections(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();

	draw_minimap(state, ctx);
	draw_zoom_label(state, ctx);
}

fn draw_grid(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	let (size, vp) = (state.size(), state.viewport());
	let step = GRID_SPACING * vp.scale;
	if step < 6.0 {
		return;
	}
	let (start_x, start_y) = (vp.offset.x.rem_euclid(step), vp.offset.y.rem_euclid(step));
	ctx.set_fill_style_str("rgba(255, 255, 255, 0.08)");
	let mut y = start_y;
	while y < size.height {
		let mut x = start_x;
		while x < size.width {
			ctx.fill_rect(x, y, 1.5, 1.5);
			x += step;
		}
		y += step;
	}
}

fn trace_curve(ctx: &CanvasRenderingContext2d, path: &CubicPath) {
	ctx.begin_path();
	ctx.move_to(path.start.x, path.start.y);
	ctx.bezier_curve_to(
		path.c1.x, path.c1.y, path.c2.x, path.c2.y, path.end.x, path.end.y,
	);
}

fn draw_connections(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	let k = state.viewport().scale;
	let dash_offset = -(state.flow_time * FLOW_SPEED) % (FLOW_DASH * 2.0);

	for routed in route_connections(state.graph()) {
		trace_curve(ctx, &routed.path);
		ctx.set_stroke_style_str(STROKE);
		ctx.set_line_width(2.0);
		ctx.stroke();

		if routed.active {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(FLOW_DASH),
				&JsValue::from_f64(FLOW_DASH),
			));
			ctx.set_line_dash_offset(dash_offset);
			ctx.set_stroke_style_str(PRIMARY);
			ctx.stroke();
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}
	}

	if let Some(draft) = state.draft() {
		trace_curve(ctx, &CubicPath::between(draft.start, draft.end));
		ctx.set_stroke_style_str(TEXT_SECONDARY);
		ctx.set_line_width(2.0 / k.max(0.5));
		ctx.stroke();
	}
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, r: Rect, radius: f64) {
	ctx.begin_path();
	ctx.move_to(r.x + radius, r.y);
	let _ = ctx.arc_to(r.right(), r.y, r.right(), r.bottom(), radius);
	let _ = ctx.arc_to(r.right(), r.bottom(), r.x, r.bottom(), radius);
	let _ = ctx.arc_to(r.x, r.bottom(), r.x, r.y, radius);
	let _ = ctx.arc_to(r.x, r.y, r.right(), r.y, radius);
	ctx.close_path();
}

fn draw_nodes(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	let selected = state.selected();
	for node in state.graph().nodes() {
		let is_selected = selected == Some(node.id.as_str());
		draw_node_body(node, is_selected, ctx);
		draw_handles(node, is_selected, ctx);
		if is_selected {
			draw_add_buttons(node, ctx);
		}
	}
}

fn draw_node_body(node: &Node, is_selected: bool, ctx: &CanvasRenderingContext2d) {
	let accent = node.kind.color();
	let b = node.bounds();

	rounded_rect(ctx, b, CORNER_RADIUS);
	ctx.set_fill_style_str(SURFACE);
	ctx.fill();
	ctx.set_stroke_style_str(if is_selected { accent } else { STROKE });
	ctx.set_line_width(if is_selected { 2.0 } else { 1.0 });
	ctx.stroke();

	if !is_selected {
		ctx.set_fill_style_str(accent);
		ctx.fill_rect(b.x + CORNER_RADIUS, b.y, NODE_WIDTH - CORNER_RADIUS * 2.0, 3.0);
	}

	// icon tile
	rounded_rect(ctx, Rect::new(b.x + 12.0, b.y + 12.0, 40.0, 40.0), 10.0);
	ctx.set_global_alpha(0.2);
	ctx.set_fill_style_str(accent);
	ctx.fill();
	ctx.set_global_alpha(1.0);

	ctx.set_text_align("left");
	ctx.set_text_baseline("alphabetic");
	ctx.set_fill_style_str(TEXT);
	ctx.set_font("bold 14px sans-serif");
	let _ = ctx.fill_text_with_max_width(&node.data.label, b.x + 64.0, b.y + 30.0, 160.0);
	ctx.set_fill_style_str(accent);
	ctx.set_font("bold 10px sans-serif");
	let _ = ctx.fill_text(&node.kind.as_str().to_uppercase(), b.x + 64.0, b.y + 46.0);

	if let Some(description) = &node.data.description {
		ctx.set_fill_style_str(TEXT_SECONDARY);
		ctx.set_font("12px sans-serif");
		let max_width = NODE_WIDTH - 32.0;
		let _ = ctx.fill_text_with_max_width(description, b.x + 16.0, b.y + 78.0, max_width);
	}

	let footer_y = b.y + NODE_HEIGHT - 34.0;
	ctx.set_fill_style_str(STROKE);
	ctx.fill_rect(b.x, footer_y, NODE_WIDTH, 1.0);
	let status_color = if node.data.status == NodeStatus::Running {
		RUNNING
	} else {
		TEXT_SECONDARY
	};
	ctx.begin_path();
	let _ = ctx.arc(b.x + 20.0, footer_y + 17.0, 3.0, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(status_color);
	ctx.fill();
	ctx.set_font("bold 10px monospace");
	let _ = ctx.fill_text(node.data.status.as_str(), b.x + 30.0, footer_y + 21.0);
}

fn draw_handles(node: &Node, is_selected: bool, ctx: &CanvasRenderingContext2d) {
	let ring = if is_selected { node.kind.color() } else { TEXT_SECONDARY };
	for handle in port_handles(node.kind) {
		let c = node_anchor(node.position, handle.side);
		ctx.begin_path();
		let _ = ctx.arc(c.x, c.y, HANDLE_RADIUS, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(BACKGROUND);
		ctx.fill();
		ctx.set_stroke_style_str(ring);
		ctx.set_line_width(2.0);
		ctx.stroke();
	}
}

fn draw_add_buttons(node: &Node, ctx: &CanvasRenderingContext2d) {
	let accent = node.kind.color();
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	ctx.set_font("bold 14px sans-serif");
	for side in add_button_sides(node.kind) {
		let c = add_button_center(node.position, side);
		ctx.begin_path();
		let _ = ctx.arc(c.x, c.y, ADD_BUTTON_RADIUS, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(SURFACE);
		ctx.fill();
		ctx.set_stroke_style_str(accent);
		ctx.set_line_width(1.0);
		ctx.stroke();
		ctx.set_fill_style_str(accent);
		let _ = ctx.fill_text("+", c.x, c.y + 1.0);
	}
}

fn draw_minimap(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	let Some(map) = state.minimap() else {
		return;
	};
	let area = state.minimap_bounds();

	ctx.save();
	rounded_rect(ctx, area, 12.0);
	ctx.set_fill_style_str("rgba(15, 18, 26, 0.85)");
	ctx.fill();
	ctx.set_stroke_style_str("rgba(255, 255, 255, 0.1)");
	ctx.set_line_width(1.0);
	ctx.stroke();
	ctx.clip();
	let _ = ctx.translate(area.x, area.y);

	for glyph in &map.nodes {
		let r = glyph.rect;
		ctx.set_fill_style_str(if glyph.selected {
			glyph.kind.color()
		} else {
			"rgba(255, 255, 255, 0.3)"
		});
		ctx.fill_rect(r.x, r.y, r.width, r.height);
	}

	let f = map.frame;
	ctx.set_stroke_style_str(PRIMARY);
	ctx.set_line_width(2.0);
	ctx.stroke_rect(f.x, f.y, f.width, f.height);
	ctx.restore();
}

fn draw_zoom_label(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	let size = state.size();
	ctx.set_text_align("left");
	ctx.set_text_baseline("alphabetic");
	ctx.set_font("bold 12px monospace");
	ctx.set_fill_style_str(TEXT_SECONDARY);
	let label = format!("{}%", (state.viewport().scale * 100.0).round());
	let _ = ctx.fill_text(&label, 24.0, size.height - 24.0);
}
