//! The node registry: the single owner of nodes and connections.
//!
//! All mutation goes through the command methods here so that cascading deletes and the
//! connection rules hold no matter which surface asks.

use log::info;
use thiserror::Error;

use super::anchors::{HANDLE_HIT_RADIUS, PortKind, Side, node_anchor, port_handles};
use super::geometry::{Point, Rect};
use super::types::{
	ConnectRequest, Connection, ConnectionId, Node, NodeData, NodeId, NodeKind, NodePatch,
	NodeStatus,
};

/// Horizontal distance of a node added beside another.
pub const ADJACENT_OFFSET_X: f64 = 350.0;
/// Vertical distance of a node added above or below another.
pub const ADJACENT_OFFSET_Y: f64 = 250.0;

/// Reasons a registry command was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
	/// No node has the id.
	#[error("Node '{0}' not found")]
	UnknownNode(NodeId),

	/// No connection has the id.
	#[error("Connection '{0}' not found")]
	UnknownConnection(ConnectionId),

	/// Source and target are the same node.
	#[error("Node '{0}' cannot be connected to itself")]
	SelfLoop(NodeId),

	/// The source handle is not among the node's outputs.
	#[error("Handle '{handle}' is not an output of node '{node_id}'")]
	NotASourceHandle {
		/// Node the handle was looked up on.
		node_id: NodeId,
		/// Offending handle id.
		handle: String,
	},

	/// The target handle is not among the node's inputs.
	#[error("Handle '{handle}' is not an input of node '{node_id}'")]
	NotATargetHandle {
		/// Node the handle was looked up on.
		node_id: NodeId,
		/// Offending handle id.
		handle: String,
	},
}

/// A port handle found under a world point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandleHit {
	/// Owner of the handle.
	pub node_id: NodeId,
	/// Port id the handle stands for.
	pub handle_id: String,
	/// Edge the handle sits on.
	pub side: Side,
	/// Direction of the handle.
	pub kind: PortKind,
}

/// Result of [`Graph::add_adjacent`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdjacentNode {
	/// The new node.
	pub node_id: NodeId,
	/// The wire created along with it, if any.
	pub connection_id: Option<ConnectionId>,
}

/// Ordered nodes plus connections. Later nodes draw on top and win hit tests.
#[derive(Clone, Debug, Default)]
pub struct Graph {
	nodes: Vec<Node>,
	connections: Vec<Connection>,
	next_id: u64,
}

impl Graph {
	/// An empty graph.
	pub fn new() -> Self {
		Self::default()
	}

	/// Build from existing records, e.g. a saved pipeline.
	pub fn from_parts(nodes: Vec<Node>, connections: Vec<Connection>) -> Self {
		Self {
			nodes,
			connections,
			next_id: 0,
		}
	}

	/// All nodes in draw order.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// All connections, including any whose endpoints are missing.
	pub fn connections(&self) -> &[Connection] {
		&self.connections
	}

	/// Look a node up by id.
	pub fn node(&self, id: &str) -> Option<&Node> {
		self.nodes.iter().find(|n| n.id == id)
	}

	fn node_mut(&mut self, id: &str) -> Result<&mut Node, GraphError> {
		self.nodes
			.iter_mut()
			.find(|n| n.id == id)
			.ok_or_else(|| GraphError::UnknownNode(id.to_owned()))
	}

	fn fresh_id(&mut self, prefix: &str) -> String {
		loop {
			self.next_id += 1;
			let id = format!("{prefix}-{}", self.next_id);
			let taken = self.nodes.iter().any(|n| n.id == id)
				|| self.connections.iter().any(|c| c.id == id);
			if !taken {
				return id;
			}
		}
	}

	/// Insert a node of `kind` with the default ports and a generated id.
	pub fn add_node(&mut self, kind: NodeKind, position: Point, data: NodeData) -> NodeId {
		let id = self.fresh_id("node");
		info!("Added {kind} node {id} at ({:.0}, {:.0})", position.x, position.y);
		self.nodes.push(Node::new(id.clone(), kind, position, data));
		id
	}

	/// Apply a field-level update to a node's display data.
	pub fn update_node(&mut self, id: &str, patch: NodePatch) -> Result<(), GraphError> {
		let node = self.node_mut(id)?;
		if let Some(label) = patch.label {
			node.data.label = label;
		}
		if let Some(description) = patch.description {
			node.data.description = description;
		}
		if let Some(status) = patch.status {
			node.data.status = status;
		}
		Ok(())
	}

	/// Place a node's top-left corner at `position`.
	pub fn move_node(&mut self, id: &str, position: Point) -> Result<(), GraphError> {
		self.node_mut(id)?.position = position;
		Ok(())
	}

	/// Remove a node and every connection that references it.
	pub fn delete_node(&mut self, id: &str) -> Result<Node, GraphError> {
		let idx = self
			.nodes
			.iter()
			.position(|n| n.id == id)
			.ok_or_else(|| GraphError::UnknownNode(id.to_owned()))?;
		let node = self.nodes.remove(idx);
		let before = self.connections.len();
		self.connections.retain(|c| !c.touches(id));
		info!(
			"Deleted node {id} and {} connection(s)",
			before - self.connections.len()
		);
		Ok(node)
	}

	/// Commit a connection. Duplicates of an existing connection are allowed.
	pub fn add_connection(&mut self, request: ConnectRequest) -> Result<ConnectionId, GraphError> {
		if request.source_node_id == request.target_node_id {
			return Err(GraphError::SelfLoop(request.source_node_id));
		}
		let source = self
			.node(&request.source_node_id)
			.ok_or_else(|| GraphError::UnknownNode(request.source_node_id.clone()))?;
		if !source.outputs.contains(&request.source_handle) {
			return Err(GraphError::NotASourceHandle {
				node_id: request.source_node_id,
				handle: request.source_handle,
			});
		}
		let target = self
			.node(&request.target_node_id)
			.ok_or_else(|| GraphError::UnknownNode(request.target_node_id.clone()))?;
		if !target.inputs.contains(&request.target_handle) {
			return Err(GraphError::NotATargetHandle {
				node_id: request.target_node_id,
				handle: request.target_handle,
			});
		}

		let id = self.fresh_id("c");
		info!(
			"Connected {}:{} -> {}:{} as {id}",
			request.source_node_id,
			request.source_handle,
			request.target_node_id,
			request.target_handle
		);
		self.connections.push(Connection {
			id: id.clone(),
			source_node_id: request.source_node_id,
			source_handle: request.source_handle,
			target_node_id: request.target_node_id,
			target_handle: request.target_handle,
		});
		Ok(id)
	}

	/// Remove one connection by id.
	pub fn remove_connection(&mut self, id: &str) -> Result<Connection, GraphError> {
		let idx = self
			.connections
			.iter()
			.position(|c| c.id == id)
			.ok_or_else(|| GraphError::UnknownConnection(id.to_owned()))?;
		Ok(self.connections.remove(idx))
	}

	/// Insert a node next to `source_id` on `side` and wire it where that side implies a link.
	///
	/// Bottom and right wire source -> new, top wires new -> source, left adds no wire.
	/// A wire that the connection rules refuse (e.g. an output-only pairing) is skipped.
	pub fn add_adjacent(
		&mut self,
		source_id: &str,
		side: Side,
		kind: NodeKind,
	) -> Result<AdjacentNode, GraphError> {
		let source = self
			.node(source_id)
			.ok_or_else(|| GraphError::UnknownNode(source_id.to_owned()))?;
		let origin = source.position;
		let position = match side {
			Side::Bottom => Point::new(origin.x, origin.y + ADJACENT_OFFSET_Y),
			Side::Top => Point::new(origin.x, origin.y - ADJACENT_OFFSET_Y),
			Side::Right => Point::new(origin.x + ADJACENT_OFFSET_X, origin.y),
			Side::Left => Point::new(origin.x - ADJACENT_OFFSET_X, origin.y),
		};
		let node_id = self.add_node(
			kind,
			position,
			NodeData {
				label: format!("New {kind}"),
				description: Some("Newly added node".into()),
				status: NodeStatus::Idle,
			},
		);

		let (upstream, downstream) = match side {
			Side::Bottom | Side::Right => (source_id, node_id.as_str()),
			Side::Top => (node_id.as_str(), source_id),
			Side::Left => {
				return Ok(AdjacentNode {
					node_id,
					connection_id: None,
				});
			}
		};
		let connection_id = self
			.default_request(upstream, downstream)
			.and_then(|request| self.add_connection(request).ok());
		Ok(AdjacentNode {
			node_id,
			connection_id,
		})
	}

	fn default_request(&self, source_id: &str, target_id: &str) -> Option<ConnectRequest> {
		let source = self.node(source_id)?;
		let target = self.node(target_id)?;
		Some(ConnectRequest {
			source_node_id: source.id.clone(),
			source_handle: source.handle_id(PortKind::Source)?.to_owned(),
			target_node_id: target.id.clone(),
			target_handle: target.handle_id(PortKind::Target)?.to_owned(),
		})
	}

	/// Union of all node boxes, or `None` for an empty graph.
	pub fn bounds(&self) -> Option<Rect> {
		self.nodes
			.iter()
			.map(Node::bounds)
			.reduce(|acc, r| acc.union(&r))
	}

	/// Topmost node whose box contains `world`.
	pub fn node_at(&self, world: Point) -> Option<&Node> {
		self.nodes.iter().rev().find(|n| n.bounds().contains(world))
	}

	/// Topmost port handle within pick range of `world`.
	pub fn handle_at(&self, world: Point) -> Option<HandleHit> {
		self.nodes.iter().rev().find_map(|node| {
			port_handles(node.kind).iter().find_map(|h| {
				let centre = node_anchor(node.position, h.side);
				if centre.distance(world) > HANDLE_HIT_RADIUS {
					return None;
				}
				Some(HandleHit {
					node_id: node.id.clone(),
					handle_id: node.handle_id(h.kind)?.to_owned(),
					side: h.side,
					kind: h.kind,
				})
			})
		})
	}
}
