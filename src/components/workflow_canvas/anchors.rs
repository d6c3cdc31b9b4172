//! Cardinal anchor points on a node's box and the handle layout per node kind.

use super::geometry::{Point, Size};
use super::types::NodeKind;

/// Node box width, world units.
pub const NODE_WIDTH: f64 = 240.0;
/// Node box height, world units.
pub const NODE_HEIGHT: f64 = 140.0;
/// Node box size.
pub const NODE_SIZE: Size = Size::new(NODE_WIDTH, NODE_HEIGHT);

/// Drawn radius of a port handle, world units.
pub const HANDLE_RADIUS: f64 = 6.0;
/// Pick radius around a handle centre, world units.
pub const HANDLE_HIT_RADIUS: f64 = 10.0;
/// Distance of an add-button centre beyond the node edge.
pub const ADD_BUTTON_DISTANCE: f64 = 26.0;
/// Drawn and pick radius of an add button.
pub const ADD_BUTTON_RADIUS: f64 = 10.0;

/// One of the four edges of a node box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
	/// Upper edge.
	Top,
	/// Right edge.
	Right,
	/// Lower edge.
	Bottom,
	/// Left edge.
	Left,
}

impl Side {
	/// All sides, clockwise from the top.
	pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

	/// Unit vector pointing away from the node.
	pub fn outward(self) -> Point {
		match self {
			Side::Top => Point::new(0.0, -1.0),
			Side::Right => Point::new(1.0, 0.0),
			Side::Bottom => Point::new(0.0, 1.0),
			Side::Left => Point::new(-1.0, 0.0),
		}
	}

	/// Lowercase name.
	pub fn as_str(self) -> &'static str {
		match self {
			Side::Top => "top",
			Side::Right => "right",
			Side::Bottom => "bottom",
			Side::Left => "left",
		}
	}
}

/// The four anchor points of a node box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchors {
	/// Middle of the top edge.
	pub top: Point,
	/// Middle of the right edge.
	pub right: Point,
	/// Middle of the bottom edge.
	pub bottom: Point,
	/// Middle of the left edge.
	pub left: Point,
}

impl Anchors {
	/// Anchor on the given side.
	pub fn get(&self, side: Side) -> Point {
		match side {
			Side::Top => self.top,
			Side::Right => self.right,
			Side::Bottom => self.bottom,
			Side::Left => self.left,
		}
	}
}

/// Anchors of a box of `size` whose top-left corner is `position`.
pub fn anchors(position: Point, size: Size) -> Anchors {
	let Point { x, y } = position;
	let (w, h) = (size.width, size.height);
	Anchors {
		top: Point::new(x + w / 2.0, y),
		right: Point::new(x + w, y + h / 2.0),
		bottom: Point::new(x + w / 2.0, y + h),
		left: Point::new(x, y + h / 2.0),
	}
}

/// Anchor of a standard node box on `side`.
pub fn node_anchor(position: Point, side: Side) -> Point {
	anchors(position, NODE_SIZE).get(side)
}

/// Whether a handle starts connections or receives them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PortKind {
	/// Outgoing; a drag may start here.
	Source,
	/// Incoming; a drag may end here.
	Target,
}

/// A handle drawn on a node edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PortHandle {
	/// Edge the handle sits on.
	pub side: Side,
	/// Direction of the handle.
	pub kind: PortKind,
}

const fn handle(side: Side, kind: PortKind) -> PortHandle {
	PortHandle { side, kind }
}

const SOURCE_ONLY: [PortHandle; 3] = [
	handle(Side::Right, PortKind::Source),
	handle(Side::Bottom, PortKind::Source),
	handle(Side::Left, PortKind::Source),
];

const TARGET_ONLY: [PortHandle; 3] = [
	handle(Side::Top, PortKind::Target),
	handle(Side::Left, PortKind::Target),
	handle(Side::Right, PortKind::Target),
];

// top/left take input, bottom/right give output
const BOTH: [PortHandle; 4] = [
	handle(Side::Top, PortKind::Target),
	handle(Side::Right, PortKind::Source),
	handle(Side::Bottom, PortKind::Source),
	handle(Side::Left, PortKind::Target),
];

/// Handles shown on a node of `kind`.
pub fn port_handles(kind: NodeKind) -> &'static [PortHandle] {
	match kind {
		NodeKind::Input => &SOURCE_ONLY,
		NodeKind::Output => &TARGET_ONLY,
		_ => &BOTH,
	}
}

/// Sides showing an add-adjacent button when a node of `kind` is selected.
pub fn add_button_sides(kind: NodeKind) -> impl Iterator<Item = Side> {
	Side::ALL.into_iter().filter(move |side| match side {
		Side::Top => kind != NodeKind::Input,
		Side::Bottom => kind != NodeKind::Output,
		Side::Left | Side::Right => true,
	})
}

/// World-space centre of the add button on `side`.
pub fn add_button_center(position: Point, side: Side) -> Point {
	node_anchor(position, side) + side.outward() * ADD_BUTTON_DISTANCE
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn anchors_of_a_standard_box() {
		let a = anchors(Point::new(100.0, 100.0), Size::new(240.0, 140.0));
		assert_eq!(a.top, Point::new(220.0, 100.0));
		assert_eq!(a.right, Point::new(340.0, 170.0));
		assert_eq!(a.bottom, Point::new(220.0, 240.0));
		assert_eq!(a.left, Point::new(100.0, 170.0));
	}

	#[test]
	fn input_nodes_have_no_targets() {
		let handles = port_handles(NodeKind::Input);
		assert!(handles.iter().all(|h| h.kind == PortKind::Source));
		assert!(!handles.iter().any(|h| h.side == Side::Top));
	}

	#[test]
	fn output_nodes_have_no_sources() {
		let handles = port_handles(NodeKind::Output);
		assert!(handles.iter().all(|h| h.kind == PortKind::Target));
		assert!(!handles.iter().any(|h| h.side == Side::Bottom));
	}

	#[test]
	fn model_nodes_split_incoming_and_outgoing() {
		for kind in [NodeKind::Detection, NodeKind::Logic] {
			let handles = port_handles(kind);
			assert_eq!(handles.len(), 4);
			for h in handles {
				let expected = match h.side {
					Side::Top | Side::Left => PortKind::Target,
					Side::Bottom | Side::Right => PortKind::Source,
				};
				assert_eq!(h.kind, expected);
			}
		}
	}

	#[test]
	fn add_buttons_skip_missing_ports() {
		let input: Vec<_> = add_button_sides(NodeKind::Input).collect();
		assert_eq!(input, vec![Side::Right, Side::Bottom, Side::Left]);
		let output: Vec<_> = add_button_sides(NodeKind::Output).collect();
		assert_eq!(output, vec![Side::Top, Side::Right, Side::Left]);
		assert_eq!(
			add_button_center(Point::new(0.0, 0.0), Side::Top),
			Point::new(120.0, -ADD_BUTTON_DISTANCE)
		);
	}
}
