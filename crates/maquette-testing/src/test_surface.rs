//! In-memory render surface for tests

use maquette_geometry::{CanvasPoint, CanvasRect, Size};
use maquette_model::ElementPath;
use maquette_surface::{
    GridCellMarker, NodeId, PathAnnotations, RenderSurface, StyleSource, TextContentInclusion,
};
use rustc_hash::{FxHashMap, FxHashSet};

/// Declarative description of one test node, consumed by [`TestSurface`].
#[derive(Clone, Debug, Default)]
pub struct NodeSpec {
    pub tag: String,
    pub paths: Vec<ElementPath>,
    pub scene_id: Option<String>,
    pub do_not_traverse: bool,
    pub computed_style: FxHashMap<String, String>,
    pub inline_style: FxHashMap<String, String>,
    pub rect: CanvasRect,
    pub text_rect: Option<CanvasRect>,
    pub offset_position: CanvasPoint,
    pub client_size: Option<Size>,
    pub natural_size: Option<Size>,
    pub text: Option<String>,
    pub contains_only_text: bool,
    pub grid_marker: Option<GridCellMarker>,
    pub stylesheet_props: FxHashSet<String>,
    pub explicit_offset_parent: Option<NodeId>,
}

impl NodeSpec {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_owned(),
            ..Default::default()
        }
    }

    pub fn path(mut self, path: &str) -> Self {
        self.paths.push(ElementPath::from_string(path));
        self
    }

    pub fn scene(mut self, scene_id: &str) -> Self {
        self.scene_id = Some(scene_id.to_owned());
        self
    }

    pub fn rect(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.rect = CanvasRect::new(x, y, width, height);
        if self.client_size.is_none() {
            self.client_size = Some(Size::new(width, height));
        }
        self
    }

    pub fn style(mut self, property: &str, value: &str) -> Self {
        self.computed_style
            .insert(property.to_owned(), value.to_owned());
        self
    }

    pub fn inline(mut self, property: &str, value: &str) -> Self {
        self.inline_style
            .insert(property.to_owned(), value.to_owned());
        self.computed_style
            .insert(property.to_owned(), value.to_owned());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_owned());
        self.contains_only_text = true;
        self
    }

    pub fn grid_cell(mut self, grid_path: &str, row: i64, column: i64) -> Self {
        self.grid_marker = Some(GridCellMarker {
            grid_path: ElementPath::from_string(grid_path),
            coordinates: maquette_model::GridCellCoordinates::new(row, column),
            rect: self.rect,
        });
        self
    }

    pub fn from_stylesheet(mut self, property: &str) -> Self {
        self.stylesheet_props.insert(property.to_owned());
        self
    }
}

struct TestNode {
    spec: NodeSpec,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An in-memory live tree implementing [`RenderSurface`].
///
/// Node ids are indices into an arena; structural edits invalidate nothing,
/// matching the contract that ids are only stable between mutations.
#[derive(Default)]
pub struct TestSurface {
    nodes: Vec<TestNode>,
    container: Option<NodeId>,
    valid_paths: Option<String>,
    root_element_path: Option<String>,
}

impl TestSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the container node with its required annotations.
    pub fn with_container(root_element_path: &str, valid_paths: &[&str]) -> (Self, NodeId) {
        let mut surface = Self::new();
        let container = surface.push_node(NodeSpec::new("div"), None);
        surface.container = Some(container);
        surface.root_element_path = Some(root_element_path.to_owned());
        surface.valid_paths = Some(valid_paths.join(" "));
        (surface, container)
    }

    /// A container with no valid-paths annotation, for error-path tests.
    pub fn with_unannotated_container() -> (Self, NodeId) {
        let mut surface = Self::new();
        let container = surface.push_node(NodeSpec::new("div"), None);
        surface.container = Some(container);
        (surface, container)
    }

    pub fn add_node(&mut self, parent: NodeId, spec: NodeSpec) -> NodeId {
        self.push_node(spec, Some(parent))
    }

    fn push_node(&mut self, spec: NodeSpec, parent: Option<NodeId>) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(TestNode {
            spec,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent as usize].children.push(id);
        }
        id
    }

    pub fn node_spec_mut(&mut self, node: NodeId) -> &mut NodeSpec {
        &mut self.nodes[node as usize].spec
    }

    /// Replaces the measured rectangle of a node, simulating a resize.
    pub fn set_rect(&mut self, node: NodeId, rect: CanvasRect) {
        self.nodes[node as usize].spec.rect = rect;
        self.nodes[node as usize].spec.client_size = Some(rect.size());
    }

    fn spec(&self, node: NodeId) -> &NodeSpec {
        &self.nodes[node as usize].spec
    }

    fn is_positioned(&self, node: NodeId) -> bool {
        matches!(
            self.spec(node).computed_style.get("position").map(String::as_str),
            Some(value) if value != "static"
        )
    }

    fn derived_offset_parent(&self, node: NodeId) -> Option<NodeId> {
        if let Some(explicit) = self.spec(node).explicit_offset_parent {
            return Some(explicit);
        }
        let mut current = self.nodes[node as usize].parent;
        while let Some(candidate) = current {
            if self.is_positioned(candidate) || Some(candidate) == self.container {
                return Some(candidate);
            }
            current = self.nodes[candidate as usize].parent;
        }
        None
    }

    fn dfs_order(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack: Vec<NodeId> = match self.container {
            Some(container) => vec![container],
            None => return order,
        };
        while let Some(node) = stack.pop() {
            order.push(node);
            for child in self.nodes[node as usize].children.iter().rev() {
                stack.push(*child);
            }
        }
        order
    }
}

impl RenderSurface for TestSurface {
    fn container(&self) -> Option<NodeId> {
        self.container
    }

    fn valid_paths_annotation(&self, container: NodeId) -> Option<String> {
        if Some(container) == self.container {
            self.valid_paths.clone()
        } else {
            None
        }
    }

    fn root_element_path(&self, container: NodeId) -> Option<String> {
        if Some(container) == self.container {
            self.root_element_path.clone()
        } else {
            None
        }
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes[node as usize].children.clone()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node as usize].parent
    }

    fn path_annotations(&self, node: NodeId) -> PathAnnotations {
        self.spec(node).paths.iter().cloned().collect()
    }

    fn scene_id(&self, node: NodeId) -> Option<String> {
        self.spec(node).scene_id.clone()
    }

    fn do_not_traverse(&self, node: NodeId) -> bool {
        self.spec(node).do_not_traverse
    }

    fn tag_name(&self, node: NodeId) -> String {
        self.spec(node).tag.clone()
    }

    fn style_property(&self, node: NodeId, source: StyleSource, property: &str) -> Option<String> {
        let spec = self.spec(node);
        let map = match source {
            StyleSource::Computed => &spec.computed_style,
            StyleSource::Inline => &spec.inline_style,
        };
        map.get(property).cloned()
    }

    fn bounding_rect(&self, node: NodeId, inclusion: TextContentInclusion) -> CanvasRect {
        let spec = self.spec(node);
        match inclusion {
            TextContentInclusion::WithoutTextContent => spec.rect,
            TextContentInclusion::WithTextContent | TextContentInclusion::OnlyTextContent => {
                spec.text_rect.unwrap_or(spec.rect)
            }
        }
    }

    fn offset_position(&self, node: NodeId) -> CanvasPoint {
        self.spec(node).offset_position
    }

    fn client_size(&self, node: NodeId) -> Size {
        self.spec(node).client_size.unwrap_or(self.spec(node).rect.size())
    }

    fn offset_parent(&self, node: NodeId) -> Option<NodeId> {
        self.derived_offset_parent(node)
    }

    fn natural_image_size(&self, node: NodeId) -> Option<Size> {
        self.spec(node).natural_size
    }

    fn text_content(&self, node: NodeId) -> Option<String> {
        self.spec(node).text.clone()
    }

    fn contains_only_text(&self, node: NodeId) -> bool {
        self.spec(node).contains_only_text
    }

    fn find_by_path_prefix(&self, prefix: &ElementPath) -> Option<NodeId> {
        let prefix_string = prefix.to_path_string();
        // Breadth-first so the shallowest matching node wins.
        let mut queue: std::collections::VecDeque<NodeId> =
            self.container.into_iter().collect();
        while let Some(node) = queue.pop_front() {
            let matched = self
                .spec(node)
                .paths
                .iter()
                .any(|p| p.to_path_string().starts_with(&prefix_string));
            if matched {
                return Some(node);
            }
            queue.extend(self.nodes[node as usize].children.iter().copied());
        }
        None
    }

    fn elements_at_point(&self, point: CanvasPoint) -> Vec<NodeId> {
        // Paint order approximation: later/deeper nodes first.
        let mut hits: Vec<NodeId> = self
            .dfs_order()
            .into_iter()
            .filter(|node| self.spec(*node).rect.contains(point))
            .collect();
        hits.reverse();
        hits
    }

    fn grid_cell_marker(&self, node: NodeId) -> Option<GridCellMarker> {
        self.spec(node).grid_marker.clone()
    }

    fn style_attribution(&self, node: NodeId) -> FxHashSet<String> {
        self.spec(node).stylesheet_props.clone()
    }
}
