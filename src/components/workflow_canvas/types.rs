use std::fmt;
use std::str::FromStr;

use super::anchors::{NODE_SIZE, PortKind, Side};
use super::geometry::{Point, Rect};

/// Node identifier.
pub type NodeId = String;
/// Connection identifier.
pub type ConnectionId = String;

/// The fixed set of pipeline stages a node can represent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
	/// Video source; produces frames, accepts nothing.
	Input,
	/// Object detection model.
	Detection,
	/// Object tracking model.
	Tracking,
	/// Pose estimation model.
	Pose,
	/// Image classification model.
	Classifier,
	/// Filter/switch/merge logic.
	Logic,
	/// Sink; accepts results, produces nothing.
	Output,
}

impl NodeKind {
	/// Palette order.
	pub const ALL: [NodeKind; 7] = [
		NodeKind::Input,
		NodeKind::Detection,
		NodeKind::Tracking,
		NodeKind::Pose,
		NodeKind::Classifier,
		NodeKind::Logic,
		NodeKind::Output,
	];

	/// Lowercase identifier, also used as drag-and-drop payload.
	pub fn as_str(self) -> &'static str {
		match self {
			NodeKind::Input => "input",
			NodeKind::Detection => "detection",
			NodeKind::Tracking => "tracking",
			NodeKind::Pose => "pose",
			NodeKind::Classifier => "classifier",
			NodeKind::Logic => "logic",
			NodeKind::Output => "output",
		}
	}

	/// Human-readable palette title.
	pub fn title(self) -> &'static str {
		match self {
			NodeKind::Input => "Video Source",
			NodeKind::Detection => "Object Detection",
			NodeKind::Tracking => "Object Tracking",
			NodeKind::Pose => "Pose Estimation",
			NodeKind::Classifier => "Classification",
			NodeKind::Logic => "Logic Gate",
			NodeKind::Output => "Output Sink",
		}
	}

	/// Accent colour used for the node header, minimap glyph and handles.
	pub fn color(self) -> &'static str {
		match self {
			NodeKind::Input => "#3b82f6",
			NodeKind::Detection => "#a855f7",
			NodeKind::Tracking => "#f97316",
			NodeKind::Pose => "#ec4899",
			NodeKind::Classifier => "#6366f1",
			NodeKind::Logic => "#06b6d4",
			NodeKind::Output => "#ef4444",
		}
	}

	/// Whether the kind can receive connections.
	pub fn accepts_input(self) -> bool {
		self != NodeKind::Input
	}

	/// Whether the kind can originate connections.
	pub fn produces_output(self) -> bool {
		self != NodeKind::Output
	}
}

impl fmt::Display for NodeKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for NodeKind {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		NodeKind::ALL
			.into_iter()
			.find(|k| k.as_str() == s)
			.ok_or_else(|| format!("unknown node kind '{s}'"))
	}
}

/// Lifecycle status shown in the node footer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NodeStatus {
	/// Not running.
	#[default]
	Idle,
	/// Currently processing.
	Running,
	/// Finished successfully.
	Completed,
	/// Failed.
	Error,
}

impl NodeStatus {
	/// Uppercase footer text.
	pub fn as_str(self) -> &'static str {
		match self {
			NodeStatus::Idle => "IDLE",
			NodeStatus::Running => "RUNNING",
			NodeStatus::Completed => "COMPLETED",
			NodeStatus::Error => "ERROR",
		}
	}
}

/// Display data carried by a node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeData {
	/// Title line.
	pub label: String,
	/// Optional body text.
	pub description: Option<String>,
	/// Lifecycle status.
	pub status: NodeStatus,
}

/// A pipeline stage placed on the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	/// Stable identifier.
	pub id: NodeId,
	/// Stage kind; decides which ports exist.
	pub kind: NodeKind,
	/// World-space top-left corner.
	pub position: Point,
	/// Display data.
	pub data: NodeData,
	/// Incoming port ids.
	pub inputs: Vec<String>,
	/// Outgoing port ids.
	pub outputs: Vec<String>,
}

impl Node {
	/// A node with the default ports for its kind.
	pub fn new(id: impl Into<NodeId>, kind: NodeKind, position: Point, data: NodeData) -> Self {
		Self {
			id: id.into(),
			kind,
			position,
			data,
			inputs: if kind.accepts_input() {
				vec!["in-1".into()]
			} else {
				Vec::new()
			},
			outputs: if kind.produces_output() {
				vec!["out-1".into()]
			} else {
				Vec::new()
			},
		}
	}

	/// World-space box of the node.
	pub fn bounds(&self) -> Rect {
		Rect::from_origin(self.position, NODE_SIZE)
	}

	/// The port id a handle of the given kind refers to, if the node has one.
	pub fn handle_id(&self, kind: PortKind) -> Option<&str> {
		match kind {
			PortKind::Source => self.outputs.first(),
			PortKind::Target => self.inputs.first(),
		}
		.map(String::as_str)
	}
}

/// A committed edge between a source port and a target port.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connection {
	/// Stable identifier.
	pub id: ConnectionId,
	/// Upstream node.
	pub source_node_id: NodeId,
	/// Port on the upstream node's `outputs`.
	pub source_handle: String,
	/// Downstream node.
	pub target_node_id: NodeId,
	/// Port on the downstream node's `inputs`.
	pub target_handle: String,
}

impl Connection {
	/// Whether the connection touches `node_id` at either end.
	pub fn touches(&self, node_id: &str) -> bool {
		self.source_node_id == node_id || self.target_node_id == node_id
	}
}

/// Payload of a completed connection gesture, before an id is assigned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectRequest {
	/// Upstream node.
	pub source_node_id: NodeId,
	/// Port on the upstream node.
	pub source_handle: String,
	/// Downstream node.
	pub target_node_id: NodeId,
	/// Port on the downstream node.
	pub target_handle: String,
}

/// Field-level update of a node's display data; `None` leaves a field untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodePatch {
	/// New title.
	pub label: Option<String>,
	/// New description; `Some(None)` clears it.
	pub description: Option<Option<String>>,
	/// New status.
	pub status: Option<NodeStatus>,
}

/// Request from the "+" affordance on a node edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddNodeRequest {
	/// Node the affordance belongs to.
	pub source_node_id: NodeId,
	/// Edge the button sits on.
	pub side: Side,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn kind_names_parse_back() {
		for kind in NodeKind::ALL {
			assert_eq!(kind.as_str().parse::<NodeKind>(), Ok(kind));
			assert_eq!(kind.to_string(), kind.as_str());
		}
	}

	#[test]
	fn unknown_kind_is_rejected() {
		assert!("camera".parse::<NodeKind>().is_err());
		assert!("".parse::<NodeKind>().is_err());
		assert!("Input".parse::<NodeKind>().is_err());
	}

	#[test]
	fn default_ports_follow_the_kind() {
		let source = Node::new("a", NodeKind::Input, Point::default(), NodeData::default());
		assert!(source.inputs.is_empty());
		assert_eq!(source.handle_id(PortKind::Source), Some("out-1"));
		let sink = Node::new("b", NodeKind::Output, Point::default(), NodeData::default());
		assert_eq!(sink.handle_id(PortKind::Source), None);
		assert_eq!(sink.handle_id(PortKind::Target), Some("in-1"));
	}
}
