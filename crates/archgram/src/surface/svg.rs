//! In-memory drawing surface serialized to SVG.

use indexmap::IndexMap;
use log::{debug, info, trace};
use svg::{Document, node::element as svg_element};

use archgram_core::{
    draw::{
        BoxStyle, DropShadow, Fill, Gradient, LayeredOutput, RenderLayer, StrokeDefinition,
        SvgNode, TextDefinition,
    },
    geometry::{Bounds, Point, Size},
};

use super::{ConnectorPath, DrawingSurface, NodeHandle, SurfaceError};

/// The kind of a node on an [`SvgSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Frame,
    Group,
    Rectangle,
    Text,
    Line,
}

impl NodeKind {
    fn can_contain_children(self) -> bool {
        matches!(self, Self::Frame | Self::Group)
    }

    fn is_box(self) -> bool {
        matches!(self, Self::Frame | Self::Rectangle)
    }
}

#[derive(Debug, Clone)]
struct SceneNode {
    kind: NodeKind,
    name: String,
    parent: Option<NodeHandle>,
    children: Vec<NodeHandle>,
    position: Point,
    size: Size,
    corner_radius: f32,
    style: BoxStyle,
    text: Option<(String, TextDefinition)>,
    path: Option<ConnectorPath>,
    metadata: IndexMap<String, String>,
}

impl SceneNode {
    fn new(kind: NodeKind, name: &str, parent: Option<NodeHandle>) -> Self {
        Self {
            kind,
            name: name.to_string(),
            parent,
            children: Vec::new(),
            position: Point::default(),
            size: Size::default(),
            corner_radius: 0.0,
            style: BoxStyle::new(),
            text: None,
            path: None,
            metadata: IndexMap::new(),
        }
    }
}

/// A scene graph of frames, groups, boxes, text and lines that renders to an
/// SVG document.
///
/// # Examples
///
/// ```
/// use archgram::surface::{DrawingSurface, SvgSurface};
/// use archgram_core::geometry::{Point, Size};
///
/// let mut surface = SvgSurface::new();
/// let frame = surface.create_frame(None, "Main").unwrap();
/// surface.resize(frame, Size::new(400.0, 300.0)).unwrap();
///
/// let group = surface.create_group(frame, "Box").unwrap();
/// surface.set_position(group, Point::new(20.0, 50.0)).unwrap();
/// let rect = surface.create_rectangle(group, "Box", 12.0).unwrap();
/// surface.resize(rect, Size::new(200.0, 80.0)).unwrap();
///
/// let bounds = surface.absolute_bounds(group).unwrap();
/// assert_eq!(bounds.min_point(), Point::new(20.0, 50.0));
///
/// let markup = surface.to_svg_string();
/// assert!(markup.contains("rx=\"12\""));
/// ```
#[derive(Debug, Default)]
pub struct SvgSurface {
    nodes: IndexMap<NodeHandle, SceneNode>,
    roots: Vec<NodeHandle>,
    next_handle: u64,
    selection: Vec<NodeHandle>,
    viewport: Option<Bounds>,
    notifications: Vec<String>,
}

impl SvgSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes currently on the surface.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Top-level nodes in creation order.
    pub fn roots(&self) -> &[NodeHandle] {
        &self.roots
    }

    /// Children of `node` in creation order. Unknown nodes have none.
    pub fn children(&self, node: NodeHandle) -> &[NodeHandle] {
        self.nodes
            .get(&node)
            .map(|scene_node| scene_node.children.as_slice())
            .unwrap_or_default()
    }

    /// Every node of the given kind, in creation order.
    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = NodeHandle> + '_ {
        self.nodes
            .iter()
            .filter(move |(_, node)| node.kind == kind)
            .map(|(handle, _)| *handle)
    }

    pub fn kind(&self, node: NodeHandle) -> Option<NodeKind> {
        self.nodes.get(&node).map(|scene_node| scene_node.kind)
    }

    pub fn name(&self, node: NodeHandle) -> Option<&str> {
        self.nodes.get(&node).map(|scene_node| scene_node.name.as_str())
    }

    /// Position of `node` relative to its parent.
    pub fn position(&self, node: NodeHandle) -> Option<Point> {
        self.nodes.get(&node).map(|scene_node| scene_node.position)
    }

    /// The fill, stroke and shadow applied to `node`.
    pub fn style(&self, node: NodeHandle) -> Option<&BoxStyle> {
        self.nodes.get(&node).map(|scene_node| &scene_node.style)
    }

    pub fn corner_radius(&self, node: NodeHandle) -> Option<f32> {
        self.nodes.get(&node).map(|scene_node| scene_node.corner_radius)
    }

    pub fn text_content(&self, node: NodeHandle) -> Option<&str> {
        self.nodes
            .get(&node)
            .and_then(|scene_node| scene_node.text.as_ref())
            .map(|(content, _)| content.as_str())
    }

    pub fn line_path(&self, node: NodeHandle) -> Option<&ConnectorPath> {
        self.nodes
            .get(&node)
            .and_then(|scene_node| scene_node.path.as_ref())
    }

    pub fn metadata(&self, node: NodeHandle, key: &str) -> Option<&str> {
        self.nodes
            .get(&node)
            .and_then(|scene_node| scene_node.metadata.get(key))
            .map(String::as_str)
    }

    pub fn selection(&self) -> &[NodeHandle] {
        &self.selection
    }

    /// The area last scrolled into view.
    pub fn viewport(&self) -> Option<Bounds> {
        self.viewport
    }

    /// Every message passed to [`DrawingSurface::notify`] since the surface
    /// was created.
    pub fn notifications(&self) -> &[String] {
        &self.notifications
    }

    /// Serializes the surface to an SVG document.
    ///
    /// The document covers the area last scrolled into view, or every
    /// top-level node when nothing was.
    pub fn to_document(&self) -> Document {
        let viewport = self
            .viewport
            .or_else(|| Bounds::union(self.roots.iter().filter_map(|r| self.absolute_bounds(*r))))
            .unwrap_or_default();

        let mut doc = Document::new()
            .set(
                "viewBox",
                format!(
                    "{} {} {} {}",
                    viewport.min_x(),
                    viewport.min_y(),
                    viewport.width(),
                    viewport.height()
                ),
            )
            .set("width", viewport.width())
            .set("height", viewport.height());

        if let Some(defs) = self.definitions() {
            doc = doc.add(defs);
        }

        let mut output = LayeredOutput::new();
        for root in &self.roots {
            self.render_node(*root, &mut output);
        }

        for node in output.render() {
            doc = doc.add(node);
        }

        doc
    }

    /// Serializes the surface to SVG markup.
    pub fn to_svg_string(&self) -> String {
        self.to_document().to_string()
    }

    fn node(&self, handle: NodeHandle) -> Result<&SceneNode, SurfaceError> {
        self.nodes
            .get(&handle)
            .ok_or(SurfaceError::UnknownNode(handle))
    }

    fn node_mut(&mut self, handle: NodeHandle) -> Result<&mut SceneNode, SurfaceError> {
        self.nodes
            .get_mut(&handle)
            .ok_or(SurfaceError::UnknownNode(handle))
    }

    fn box_node_mut(
        &mut self,
        handle: NodeHandle,
        property: &str,
    ) -> Result<&mut SceneNode, SurfaceError> {
        let node = self.node_mut(handle)?;
        if !node.kind.is_box() {
            return Err(SurfaceError::Rejected(format!(
                "{property} cannot be applied to {:?} node {handle}",
                node.kind
            )));
        }
        Ok(node)
    }

    fn insert(&mut self, node: SceneNode) -> Result<NodeHandle, SurfaceError> {
        if let Some(parent) = node.parent {
            let parent_node = self.node(parent)?;
            if !parent_node.kind.can_contain_children() {
                return Err(SurfaceError::InvalidParent { parent });
            }
        }

        let handle = NodeHandle::new(self.next_handle);
        self.next_handle += 1;

        match node.parent {
            Some(parent) => self.node_mut(parent)?.children.push(handle),
            None => self.roots.push(handle),
        }

        trace!(handle:% = handle, kind:? = node.kind, name = node.name.as_str(); "Node created");
        self.nodes.insert(handle, node);

        Ok(handle)
    }

    fn absolute_position(&self, handle: NodeHandle) -> Option<Point> {
        let mut position = Point::default();
        let mut current = Some(handle);
        while let Some(handle) = current {
            let node = self.nodes.get(&handle)?;
            position = position.add_point(node.position);
            current = node.parent;
        }
        Some(position)
    }

    fn definitions(&self) -> Option<svg_element::Definitions> {
        let mut gradients: IndexMap<String, &Gradient> = IndexMap::new();
        let mut shadows: IndexMap<String, &DropShadow> = IndexMap::new();

        for node in self.nodes.values() {
            if let Some(gradient) = node.style.fill().and_then(Fill::gradient) {
                gradients
                    .entry(gradient.definition_id())
                    .or_insert(gradient);
            }
            if let Some(shadow) = node.style.shadow() {
                shadows.entry(shadow.filter_id()).or_insert(shadow);
            }
        }

        if gradients.is_empty() && shadows.is_empty() {
            return None;
        }

        let mut defs = svg_element::Definitions::new();
        for (id, gradient) in gradients {
            defs = defs.add(gradient.to_svg_definition(&id));
        }
        for shadow in shadows.values() {
            defs = defs.add(shadow.to_svg_filter());
        }
        Some(defs)
    }

    fn render_layer(node: &SceneNode) -> RenderLayer {
        match node.kind {
            NodeKind::Frame if node.parent.is_none() => RenderLayer::Background,
            NodeKind::Frame | NodeKind::Text => RenderLayer::Container,
            NodeKind::Line => RenderLayer::Connection,
            NodeKind::Group | NodeKind::Rectangle => RenderLayer::Content,
        }
    }

    /// Adds `handle` and, for frames, its descendants to `output`. Groups are
    /// emitted as a single `<g>` holding their children.
    fn render_node(&self, handle: NodeHandle, output: &mut LayeredOutput) {
        let Some(node) = self.nodes.get(&handle) else {
            return;
        };

        let layer = Self::render_layer(node);
        if let Some(element) = self.build_element(handle) {
            output.add_to_layer(layer, element);
        }

        if node.kind == NodeKind::Frame {
            for child in &node.children {
                self.render_node(*child, output);
            }
        }
    }

    fn build_element(&self, handle: NodeHandle) -> Option<SvgNode> {
        let node = self.nodes.get(&handle)?;
        let bounds = self.absolute_bounds(handle)?;

        let element: SvgNode = match node.kind {
            NodeKind::Frame | NodeKind::Rectangle => {
                let rect = with_metadata(box_element(node, bounds), node);
                Box::new(rect)
            }
            NodeKind::Group => {
                let mut group = with_metadata(svg_element::Group::new(), node);
                for child in &node.children {
                    if let Some(child_element) = self.build_element(*child) {
                        group = group.add(child_element);
                    }
                }
                Box::new(group)
            }
            NodeKind::Text => {
                let (content, style) = node.text.as_ref()?;
                Box::new(style.render_to_svg(content, bounds))
            }
            NodeKind::Line => {
                let path = node.path.as_ref()?;
                let origin = self.absolute_position(handle)?;
                let mut line = svg_element::Path::new()
                    .set("d", path.translate(origin).to_svg_data())
                    .set("fill", "none");
                if let Some(stroke) = node.style.stroke() {
                    line = archgram_core::apply_stroke!(line, stroke);
                }
                Box::new(with_metadata(line, node))
            }
        };

        Some(element)
    }
}

fn box_element(node: &SceneNode, bounds: Bounds) -> svg_element::Rectangle {
    let mut rect = svg_element::Rectangle::new()
        .set("x", bounds.min_x())
        .set("y", bounds.min_y())
        .set("width", bounds.width())
        .set("height", bounds.height());

    if node.corner_radius > 0.0 {
        rect = rect
            .set("rx", node.corner_radius)
            .set("ry", node.corner_radius);
    }

    rect = match node.style.fill() {
        Some(Fill::Solid(color)) => rect
            .set("fill", color.to_hex())
            .set("fill-opacity", color.alpha()),
        Some(Fill::LinearGradient(gradient)) => {
            rect.set("fill", format!("url(#{})", gradient.definition_id()))
        }
        None => rect.set("fill", "none"),
    };

    if let Some(stroke) = node.style.stroke() {
        rect = archgram_core::apply_stroke!(rect, stroke);
    }

    if let Some(shadow) = node.style.shadow() {
        rect = rect.set("filter", format!("url(#{})", shadow.filter_id()));
    }

    rect
}

fn with_metadata<T: svg::Node>(mut element: T, node: &SceneNode) -> T {
    element.assign("data-name", node.name.as_str());
    for (key, value) in &node.metadata {
        element.assign(data_attribute(key), value.as_str());
    }
    element
}

/// `componentId` becomes `data-component-id`.
fn data_attribute(key: &str) -> String {
    let mut attribute = String::from("data-");
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            attribute.push('-');
            attribute.push(c.to_ascii_lowercase());
        } else {
            attribute.push(c);
        }
    }
    attribute
}

impl DrawingSurface for SvgSurface {
    fn clear(&mut self) {
        debug!(nodes = self.nodes.len(); "Clearing surface");
        self.nodes.clear();
        self.roots.clear();
        self.selection.clear();
        self.viewport = None;
    }

    fn create_frame(
        &mut self,
        parent: Option<NodeHandle>,
        name: &str,
    ) -> Result<NodeHandle, SurfaceError> {
        self.insert(SceneNode::new(NodeKind::Frame, name, parent))
    }

    fn create_group(
        &mut self,
        parent: NodeHandle,
        name: &str,
    ) -> Result<NodeHandle, SurfaceError> {
        self.insert(SceneNode::new(NodeKind::Group, name, Some(parent)))
    }

    fn create_rectangle(
        &mut self,
        parent: NodeHandle,
        name: &str,
        corner_radius: f32,
    ) -> Result<NodeHandle, SurfaceError> {
        let mut node = SceneNode::new(NodeKind::Rectangle, name, Some(parent));
        node.corner_radius = corner_radius.max(0.0);
        self.insert(node)
    }

    fn create_text(
        &mut self,
        parent: NodeHandle,
        content: &str,
        style: &TextDefinition,
    ) -> Result<NodeHandle, SurfaceError> {
        let mut node = SceneNode::new(NodeKind::Text, content, Some(parent));
        node.text = Some((content.to_string(), style.clone()));
        self.insert(node)
    }

    fn create_line(
        &mut self,
        path: &ConnectorPath,
        stroke: &StrokeDefinition,
    ) -> Result<NodeHandle, SurfaceError> {
        let mut node = SceneNode::new(NodeKind::Line, "Connection", None);
        node.size = path.bounds().to_size();
        node.path = Some(path.clone());
        node.style = BoxStyle::new().with_stroke(stroke.clone());
        self.insert(node)
    }

    fn set_fill(&mut self, node: NodeHandle, fill: &Fill) -> Result<(), SurfaceError> {
        let scene_node = self.box_node_mut(node, "fill")?;
        scene_node.style = scene_node.style.clone().with_fill(fill.clone());
        Ok(())
    }

    fn set_stroke(
        &mut self,
        node: NodeHandle,
        stroke: &StrokeDefinition,
    ) -> Result<(), SurfaceError> {
        let scene_node = self.node_mut(node)?;
        if !scene_node.kind.is_box() && scene_node.kind != NodeKind::Line {
            return Err(SurfaceError::Rejected(format!(
                "stroke cannot be applied to {:?} node {node}",
                scene_node.kind
            )));
        }
        scene_node.style = scene_node.style.clone().with_stroke(stroke.clone());
        Ok(())
    }

    fn set_shadow(&mut self, node: NodeHandle, shadow: &DropShadow) -> Result<(), SurfaceError> {
        let scene_node = self.box_node_mut(node, "shadow")?;
        scene_node.style = scene_node.style.clone().with_shadow(*shadow);
        Ok(())
    }

    fn set_corner_radius(&mut self, node: NodeHandle, radius: f32) -> Result<(), SurfaceError> {
        let scene_node = self.box_node_mut(node, "corner radius")?;
        scene_node.corner_radius = radius.max(0.0);
        Ok(())
    }

    fn resize(&mut self, node: NodeHandle, size: Size) -> Result<(), SurfaceError> {
        let scene_node = self.node_mut(node)?;
        if size.is_invalid() {
            return Err(SurfaceError::InvalidSize {
                node,
                width: size.width(),
                height: size.height(),
            });
        }
        if matches!(scene_node.kind, NodeKind::Group | NodeKind::Line) {
            return Err(SurfaceError::Rejected(format!(
                "{:?} node {node} is sized by its content",
                scene_node.kind
            )));
        }
        scene_node.size = size;
        Ok(())
    }

    fn set_position(&mut self, node: NodeHandle, position: Point) -> Result<(), SurfaceError> {
        self.node_mut(node)?.position = position;
        Ok(())
    }

    fn set_metadata(
        &mut self,
        node: NodeHandle,
        key: &str,
        value: &str,
    ) -> Result<(), SurfaceError> {
        if key.is_empty() {
            return Err(SurfaceError::Rejected(String::from(
                "metadata key must not be empty",
            )));
        }
        self.node_mut(node)?
            .metadata
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn find_by_metadata(&self, key: &str, value: &str) -> Option<NodeHandle> {
        self.nodes
            .iter()
            .find(|(_, node)| node.metadata.get(key).is_some_and(|v| v == value))
            .map(|(handle, _)| *handle)
    }

    fn absolute_bounds(&self, node: NodeHandle) -> Option<Bounds> {
        let scene_node = self.nodes.get(&node)?;
        let origin = self.absolute_position(node)?;

        match scene_node.kind {
            NodeKind::Group => Bounds::union(
                scene_node
                    .children
                    .iter()
                    .filter_map(|child| self.absolute_bounds(*child)),
            )
            .or_else(|| Some(origin.to_bounds(Size::default()))),
            NodeKind::Line => scene_node
                .path
                .as_ref()
                .map(|path| path.bounds().translate(origin)),
            _ => Some(origin.to_bounds(scene_node.size)),
        }
    }

    fn select(&mut self, nodes: &[NodeHandle]) -> Result<(), SurfaceError> {
        for node in nodes {
            self.node(*node)?;
        }
        self.selection = nodes.to_vec();
        Ok(())
    }

    fn scroll_into_view(&mut self, nodes: &[NodeHandle]) -> Result<(), SurfaceError> {
        let mut bounds = Vec::with_capacity(nodes.len());
        for node in nodes {
            bounds.push(
                self.absolute_bounds(*node)
                    .ok_or(SurfaceError::UnknownNode(*node))?,
            );
        }
        self.viewport = Bounds::union(bounds);
        Ok(())
    }

    fn notify(&mut self, message: &str) {
        info!("{message}");
        self.notifications.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use archgram_core::{color::Color, draw::StrokeCap};

    use super::*;

    fn frame_with_box(surface: &mut SvgSurface) -> (NodeHandle, NodeHandle, NodeHandle) {
        let root = surface.create_frame(None, "Main").unwrap();
        surface.resize(root, Size::new(1920.0, 1080.0)).unwrap();

        let layer = surface.create_frame(Some(root), "Client Layer").unwrap();
        surface.set_position(layer, Point::new(50.0, 50.0)).unwrap();
        surface.resize(layer, Size::new(240.0, 260.0)).unwrap();

        let group = surface.create_group(layer, "Web").unwrap();
        surface.set_position(group, Point::new(20.0, 50.0)).unwrap();
        let rect = surface.create_rectangle(group, "Web", 12.0).unwrap();
        surface.resize(rect, Size::new(200.0, 80.0)).unwrap();

        (root, layer, group)
    }

    #[test]
    fn test_absolute_bounds_accumulate_parent_positions() {
        let mut surface = SvgSurface::new();
        let (_, layer, group) = frame_with_box(&mut surface);

        let layer_bounds = surface.absolute_bounds(layer).unwrap();
        assert_eq!(layer_bounds.min_point(), Point::new(50.0, 50.0));

        let group_bounds = surface.absolute_bounds(group).unwrap();
        assert_eq!(group_bounds.min_point(), Point::new(70.0, 100.0));
        assert_eq!(group_bounds.to_size(), Size::new(200.0, 80.0));
    }

    #[test]
    fn test_empty_group_has_zero_size() {
        let mut surface = SvgSurface::new();
        let root = surface.create_frame(None, "Main").unwrap();
        let group = surface.create_group(root, "Empty").unwrap();
        surface.set_position(group, Point::new(5.0, 6.0)).unwrap();

        let bounds = surface.absolute_bounds(group).unwrap();
        assert_eq!(bounds.min_point(), Point::new(5.0, 6.0));
        assert!(bounds.to_size().is_zero());
    }

    #[test]
    fn test_rejections() {
        let mut surface = SvgSurface::new();
        let (root, _, group) = frame_with_box(&mut surface);
        let text = surface
            .create_text(root, "Title", &TextDefinition::new())
            .unwrap();

        assert_eq!(
            surface.create_group(text, "Nested"),
            Err(SurfaceError::InvalidParent { parent: text })
        );
        assert!(matches!(
            surface.resize(root, Size::new(-1.0, 10.0)),
            Err(SurfaceError::InvalidSize { .. })
        ));
        assert!(matches!(
            surface.resize(group, Size::new(1.0, 1.0)),
            Err(SurfaceError::Rejected(_))
        ));
        assert!(matches!(
            surface.set_fill(group, &Fill::Solid(Color::default())),
            Err(SurfaceError::Rejected(_))
        ));
        assert!(matches!(
            surface.set_metadata(group, "", "x"),
            Err(SurfaceError::Rejected(_))
        ));
    }

    #[test]
    fn test_clear_invalidates_old_handles() {
        let mut surface = SvgSurface::new();
        let (root, _, _) = frame_with_box(&mut surface);

        surface.clear();
        assert!(surface.is_empty());
        assert!(surface.roots().is_empty());

        let new_root = surface.create_frame(None, "Main").unwrap();
        assert_ne!(root, new_root);
        assert_eq!(
            surface.set_position(root, Point::default()),
            Err(SurfaceError::UnknownNode(root))
        );
    }

    #[test]
    fn test_metadata_survives_moves() {
        let mut surface = SvgSurface::new();
        let (_, _, group) = frame_with_box(&mut surface);

        surface.set_metadata(group, "componentId", "web").unwrap();
        surface.set_position(group, Point::new(0.0, 0.0)).unwrap();

        assert_eq!(surface.find_by_metadata("componentId", "web"), Some(group));
        assert_eq!(surface.metadata(group, "componentId"), Some("web"));
        assert_eq!(surface.find_by_metadata("componentId", "mobile"), None);
    }

    #[test]
    fn test_find_by_metadata_returns_first_match() {
        let mut surface = SvgSurface::new();
        let root = surface.create_frame(None, "Main").unwrap();
        let first = surface.create_group(root, "a").unwrap();
        let second = surface.create_group(root, "b").unwrap();
        surface.set_metadata(second, "componentId", "dup").unwrap();
        surface.set_metadata(first, "componentId", "dup").unwrap();

        assert_eq!(surface.find_by_metadata("componentId", "dup"), Some(first));
    }

    #[test]
    fn test_line_bounds_and_markup() {
        let mut surface = SvgSurface::new();
        let mut stroke = StrokeDefinition::new(Color::from_rgba(0.0, 0.0, 0.0, 0.6), 2.0);
        stroke.set_cap(StrokeCap::Round);

        let path = ConnectorPath::new(Point::new(270.0, 140.0)).line_to(Point::new(420.0, 140.0));
        let line = surface.create_line(&path, &stroke).unwrap();

        let bounds = surface.absolute_bounds(line).unwrap();
        assert_eq!(bounds.min_point(), Point::new(270.0, 140.0));
        assert_eq!(bounds.width(), 150.0);

        let markup = surface.to_svg_string();
        assert!(markup.contains("d=\"M 270 140 L 420 140\""));
        assert!(markup.contains("stroke-linecap=\"round\""));
        assert!(markup.contains("data-layer=\"connection\""));
    }

    #[test]
    fn test_export_layers_and_definitions() {
        let mut surface = SvgSurface::new();
        let (root, layer, group) = frame_with_box(&mut surface);
        surface
            .set_fill(root, &Fill::Solid(Color::from_rgb(0.98, 0.98, 0.98)))
            .unwrap();
        surface
            .create_text(layer, "Client Layer", &TextDefinition::new())
            .unwrap();
        surface.set_metadata(group, "componentId", "web").unwrap();

        let rect = surface.children(group)[0];
        let gradient = Gradient::diagonal(
            Color::from_rgb(0.4, 0.49, 0.92),
            Color::from_rgb(0.46, 0.29, 0.64),
        );
        surface
            .set_fill(rect, &Fill::LinearGradient(gradient.clone()))
            .unwrap();
        surface.set_shadow(rect, &DropShadow::subtle()).unwrap();

        let markup = surface.to_svg_string();

        assert!(markup.contains("<linearGradient"));
        assert!(markup.contains(&format!("url(#{})", gradient.definition_id())));
        assert!(markup.contains(&format!("url(#{})", DropShadow::subtle().filter_id())));
        assert!(markup.contains("data-component-id=\"web\""));

        let background = markup.find("data-layer=\"background\"").unwrap();
        let container = markup.find("data-layer=\"container\"").unwrap();
        let content = markup.find("data-layer=\"content\"").unwrap();
        assert!(background < container);
        assert!(container < content);
    }

    #[test]
    fn test_text_renders_with_containers() {
        let mut surface = SvgSurface::new();
        let (root, _, _) = frame_with_box(&mut surface);
        surface
            .create_text(root, "X Algorithm Architecture", &TextDefinition::new())
            .unwrap();

        let markup = surface.to_svg_string();

        assert!(!markup.contains("data-layer=\"text\""));
        let container = markup.find("data-layer=\"container\"").unwrap();
        let title = markup.find("X Algorithm Architecture").unwrap();
        let content = markup.find("data-layer=\"content\"").unwrap();
        assert!(container < title);
        assert!(title < content);
    }

    #[test]
    fn test_viewport_follows_scroll_into_view() {
        let mut surface = SvgSurface::new();
        let (root, layer, _) = frame_with_box(&mut surface);

        assert!(
            surface
                .to_svg_string()
                .contains("viewBox=\"0 0 1920 1080\"")
        );

        surface.scroll_into_view(&[layer]).unwrap();
        assert!(
            surface
                .to_svg_string()
                .contains("viewBox=\"50 50 240 260\"")
        );

        surface.select(&[root]).unwrap();
        assert_eq!(surface.selection(), &[root]);
    }

    #[test]
    fn test_notifications_are_kept() {
        let mut surface = SvgSurface::new();
        surface.notify("done");
        assert_eq!(surface.notifications(), ["done".to_string()]);
    }

    #[test]
    fn test_data_attribute_names() {
        assert_eq!(data_attribute("componentId"), "data-component-id");
        assert_eq!(data_attribute("layer"), "data-layer");
    }
}
