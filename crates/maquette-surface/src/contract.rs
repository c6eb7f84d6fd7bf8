//! The render surface data contract

use maquette_geometry::{CanvasPoint, CanvasRect, Size};
use maquette_model::{ElementPath, GridCellCoordinates};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

/// Identity of a node in the live render tree.
///
/// Node identity is transient: it is only stable between two structural
/// mutations, which is why element paths, not node ids, key the metadata map.
pub type NodeId = u64;

/// Paths attached to a single node; almost always exactly one.
pub type PathAnnotations = SmallVec<[ElementPath; 1]>;

/// Which style map a property is read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StyleSource {
    /// The resolved computed style.
    Computed,
    /// Only what the element's inline style declares.
    Inline,
}

/// Whether a bounding rectangle includes overflowing text content.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextContentInclusion {
    WithoutTextContent,
    WithTextContent,
    OnlyTextContent,
}

/// A grid-cell overlay marker rendered by the controls layer.
#[derive(Clone, Debug, PartialEq)]
pub struct GridCellMarker {
    /// Path of the grid container the cell belongs to.
    pub grid_path: ElementPath,
    pub coordinates: GridCellCoordinates,
    /// Marker bounds in viewport coordinates.
    pub rect: CanvasRect,
}

/// The live render surface consumed by the walker and the strategies.
///
/// Implementations are external to this core; `maquette-testing` provides an
/// in-memory one for tests. All queries are synchronous. A node id obtained
/// from one call may be invalidated by the next structural mutation.
pub trait RenderSurface {
    /// The designated canvas container node, if mounted.
    fn container(&self) -> Option<NodeId>;

    /// The serialized valid-paths annotation on the container: element paths
    /// in scope for this walk, space separated.
    fn valid_paths_annotation(&self, container: NodeId) -> Option<String>;

    /// The canvas root path annotation on the container.
    fn root_element_path(&self, container: NodeId) -> Option<String>;

    fn children(&self, node: NodeId) -> Vec<NodeId>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Element paths the rendering layer attached to this node.
    fn path_annotations(&self, node: NodeId) -> PathAnnotations;

    /// The scene-boundary annotation, present on scene roots only.
    fn scene_id(&self, node: NodeId) -> Option<String>;

    /// Nodes annotated as opaque: their subtrees are skipped.
    fn do_not_traverse(&self, node: NodeId) -> bool;

    fn tag_name(&self, node: NodeId) -> String;

    /// Reads a single style property; `None` when unset.
    fn style_property(&self, node: NodeId, source: StyleSource, property: &str) -> Option<String>;

    /// Bounding rectangle in viewport coordinates.
    fn bounding_rect(&self, node: NodeId, inclusion: TextContentInclusion) -> CanvasRect;

    /// Offset from the offset parent (offsetLeft/offsetTop).
    fn offset_position(&self, node: NodeId) -> CanvasPoint;

    fn client_size(&self, node: NodeId) -> Size;

    fn offset_parent(&self, node: NodeId) -> Option<NodeId>;

    /// Natural size for replaced elements (images), `None` otherwise.
    fn natural_image_size(&self, node: NodeId) -> Option<Size>;

    /// Text content for leaf nodes, `None` when the node has element
    /// children.
    fn text_content(&self, node: NodeId) -> Option<String>;

    /// True when every child is a text node or line break.
    fn contains_only_text(&self, node: NodeId) -> bool;

    /// The shallowest node whose path annotation prefix-matches `prefix`,
    /// used by selective walks to find the root of a focused subtree.
    fn find_by_path_prefix(&self, prefix: &ElementPath) -> Option<NodeId>;

    /// Topmost-first hit test in viewport coordinates.
    fn elements_at_point(&self, point: CanvasPoint) -> Vec<NodeId>;

    /// The grid-cell marker data for overlay cells, `None` for other nodes.
    fn grid_cell_marker(&self, node: NodeId) -> Option<GridCellMarker>;

    /// Property names set on this node by stylesheet rules. Expensive;
    /// callers cache the result keyed by node identity.
    fn style_attribution(&self, node: NodeId) -> FxHashSet<String>;

    fn children_count(&self, node: NodeId) -> usize {
        self.children(node).len()
    }
}
