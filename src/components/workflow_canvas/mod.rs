//! Canvas editor for pipeline graphs: the registry, the pan/zoom viewport, the gesture state
//! machine, connection routing and the minimap, plus the Leptos component that draws them.

pub mod anchors;
mod component;
mod fit;
pub mod geometry;
mod graph;
mod interaction;
mod minimap;
mod render;
pub mod router;
mod state;
mod types;

pub use anchors::{PortKind, Side};
pub use component::{CanvasHandle, DRAG_PAYLOAD, WorkflowCanvas};
pub use fit::{FIT_PADDING, fit_to_content};
pub use geometry::{Point, Rect, Size, Viewport};
pub use graph::{AdjacentNode, Graph, GraphError, HandleHit};
pub use interaction::{ConnectionDraft, Hit, Interaction, NodeDrag, PointerButton};
pub use minimap::{MINIMAP_SIZE, Minimap, MinimapNode, minimap_rect};
pub use router::{CubicPath, Route, best_route, route_connections};
pub use state::{BUTTON_ZOOM_STEP, CanvasEvent, CanvasState, WHEEL_ZOOM_STEP};
pub use types::{
	AddNodeRequest, ConnectRequest, Connection, ConnectionId, Node, NodeData, NodeId, NodeKind,
	NodePatch, NodeStatus,
};
