//! Diagram layout engine.
//!
//! Layers are placed at the positions their description declares; nothing
//! about a layer's position is computed. Within a layer, components stack
//! vertically below the title at a fixed pitch:
//!
//! ```text
//!  layer.position
//!  ┌───────────────────────────┐
//!  │      Layer title          │  title at (20, 20)
//!  │  ┌─────────────────────┐  │  component 0 at (20, 50)
//!  │  │     Component 0     │  │
//!  │  └─────────────────────┘  │
//!  │  ┌─────────────────────┐  │  component 1 at (20, 150)
//!  │  │     Component 1     │  │
//!  │  └─────────────────────┘  │
//!  └───────────────────────────┘
//! ```
//!
//! The result of placement is a [`PlacedLayout`]: the explicit map from
//! component id to its node and bounding box on the surface. Holding one
//! means every box has been written and measured, which is what connection
//! drawing waits for.

use indexmap::{IndexMap, map::Entry};
use log::{debug, trace, warn};

use archgram_core::{
    color::Color,
    draw::{BoxStyle, Fill, FontWeight, StrokeDefinition, TextDefinition},
    geometry::{Bounds, Point, Size},
    identifier::Id,
    model::{Component, Diagram, Layer},
};

use crate::{
    config::{AppConfig, LayoutConfig},
    error::ArchgramError,
    style::{StyleResolver, apply_box_style},
    surface::{DrawingSurface, NodeHandle, SurfaceError},
};

/// Metadata key linking a component group to its component id.
pub const COMPONENT_ID_KEY: &str = "componentId";

/// Box geometry of the layout, in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutMetrics {
    canvas: Size,
    box_size: Size,
    corner_radius: f32,
    spacing: f32,
    container_margin: f32,
    header_height: f32,
    header_offset: f32,
    inset_x: f32,
    title_offset: Point,
    title_height: f32,
    label_inset: f32,
}

impl LayoutMetrics {
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            canvas: Size::new(config.canvas_width, config.canvas_height),
            box_size: Size::new(config.box_width, config.box_height),
            corner_radius: config.corner_radius,
            spacing: config.spacing,
            container_margin: config.container_margin,
            header_height: config.header_height,
            header_offset: config.header_offset,
            inset_x: config.inset_x,
            title_offset: Point::new(config.title_offset_x, config.title_offset_y),
            title_height: config.title_height,
            label_inset: config.label_inset,
        }
    }

    pub fn canvas(&self) -> Size {
        self.canvas
    }

    pub fn box_size(&self) -> Size {
        self.box_size
    }

    pub fn corner_radius(&self) -> f32 {
        self.corner_radius
    }

    /// Vertical distance between the tops of two consecutive boxes.
    pub fn pitch(&self) -> f32 {
        self.box_size.height() + self.spacing
    }

    /// Size of a layer container holding `count` components.
    ///
    /// A layer with no components still gets a container one header tall.
    ///
    /// # Examples
    ///
    /// ```
    /// # use archgram::layout::LayoutMetrics;
    /// # use archgram_core::geometry::Size;
    /// let metrics = LayoutMetrics::default();
    ///
    /// assert_eq!(metrics.container_size(2), Size::new(240.0, 260.0));
    /// assert_eq!(metrics.container_size(0), Size::new(240.0, 60.0));
    /// ```
    pub fn container_size(&self, count: usize) -> Size {
        Size::new(
            self.box_size.width() + self.container_margin,
            count as f32 * self.pitch() + self.header_height,
        )
    }

    /// Position of component `index` relative to its layer container.
    ///
    /// # Examples
    ///
    /// ```
    /// # use archgram::layout::LayoutMetrics;
    /// # use archgram_core::geometry::Point;
    /// let metrics = LayoutMetrics::default();
    ///
    /// assert_eq!(metrics.component_offset(0), Point::new(20.0, 50.0));
    /// assert_eq!(metrics.component_offset(1), Point::new(20.0, 150.0));
    /// ```
    pub fn component_offset(&self, index: usize) -> Point {
        Point::new(
            self.inset_x,
            self.header_offset + index as f32 * self.pitch(),
        )
    }

    /// Where the layer title sits inside its container.
    pub fn title_bounds(&self) -> Bounds {
        self.title_offset
            .to_bounds(Size::new(self.box_size.width(), self.title_height))
    }

    /// Where a component label sits inside its group.
    pub fn label_bounds(&self) -> Bounds {
        Point::new(self.label_inset, 0.0).to_bounds(Size::new(
            (self.box_size.width() - 2.0 * self.label_inset).max(0.0),
            self.box_size.height(),
        ))
    }
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self::from_config(&LayoutConfig::default())
    }
}

/// A layer container placed on the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLayer {
    index: usize,
    name: String,
    handle: NodeHandle,
    bounds: Bounds,
}

impl PlacedLayer {
    /// Index of the layer in the diagram.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handle(&self) -> NodeHandle {
        self.handle
    }

    /// Bounds of the container in canvas coordinates.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

/// A component box placed on the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedNode {
    id: Id,
    name: String,
    layer: usize,
    handle: NodeHandle,
    bounds: Bounds,
}

impl PlacedNode {
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index of the owning layer in the diagram.
    pub fn layer(&self) -> usize {
        self.layer
    }

    pub fn handle(&self) -> NodeHandle {
        self.handle
    }

    /// Bounds of the component group in canvas coordinates.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

/// Every placed component, keyed by id, in placement order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacedLayout {
    nodes: IndexMap<Id, PlacedNode>,
}

impl PlacedLayout {
    pub fn get(&self, id: Id) -> Option<&PlacedNode> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: Id) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlacedNode> {
        self.nodes.values()
    }

    /// Union of every placed component's bounds.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::union(self.nodes.values().map(PlacedNode::bounds))
    }

    /// Registers a node; the first registration of an id wins.
    fn register(&mut self, node: PlacedNode) {
        match self.nodes.entry(node.id) {
            Entry::Occupied(existing) => {
                warn!(
                    id:% = node.id,
                    kept:% = existing.get().handle;
                    "Component id placed twice, keeping the first node"
                );
            }
            Entry::Vacant(slot) => {
                slot.insert(node);
            }
        }
    }
}

/// Places layer containers and component boxes onto a [`DrawingSurface`].
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    metrics: LayoutMetrics,
    container_style: BoxStyle,
    title_style: TextDefinition,
    label_style: TextDefinition,
}

impl LayoutEngine {
    /// Creates an engine with the default container style and fonts.
    pub fn new(metrics: LayoutMetrics) -> Self {
        let mut title_style = TextDefinition::new();
        title_style.set_font_size(16);
        title_style.set_font_weight(FontWeight::SEMI_BOLD);

        let mut label_style = TextDefinition::new();
        label_style.set_font_size(14);
        label_style.set_font_weight(FontWeight::MEDIUM);
        label_style.set_color(Color::from_rgba(0.0, 0.0, 0.0, 0.8));

        Self {
            metrics,
            container_style: container_style(container_gray()),
            title_style,
            label_style,
        }
    }

    /// Creates an engine from the layout and style sections of `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ArchgramError::Style`] if a configured color is invalid.
    pub fn from_config(config: &AppConfig) -> Result<Self, ArchgramError> {
        let mut engine = Self::new(LayoutMetrics::from_config(config.layout()));

        if let Some(color) = config
            .style()
            .container_color()
            .map_err(ArchgramError::Style)?
        {
            engine.container_style = container_style(color);
        }

        if let Some(family) = config.style().font_family() {
            engine.title_style.set_font_family(family);
            engine.label_style.set_font_family(family);
        }

        Ok(engine)
    }

    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    /// Creates one container per layer inside `root`, at the layer's
    /// declared position, with its title.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface rejects any call.
    pub fn place_layers<S>(
        &self,
        surface: &mut S,
        root: NodeHandle,
        diagram: &Diagram,
    ) -> Result<Vec<PlacedLayer>, ArchgramError>
    where
        S: DrawingSurface + ?Sized,
    {
        let mut placed = Vec::with_capacity(diagram.layers().len());

        for (index, layer) in diagram.layers().iter().enumerate() {
            let handle = self.place_layer(surface, root, layer)?;
            let bounds = surface
                .absolute_bounds(handle)
                .ok_or(SurfaceError::UnknownNode(handle))?;

            trace!(layer = layer.name(), x = bounds.min_x(), y = bounds.min_y(); "Layer placed");
            placed.push(PlacedLayer {
                index,
                name: layer.name().to_string(),
                handle,
                bounds,
            });
        }

        debug!(layers = placed.len(); "Layers placed");
        Ok(placed)
    }

    fn place_layer<S>(
        &self,
        surface: &mut S,
        root: NodeHandle,
        layer: &Layer,
    ) -> Result<NodeHandle, SurfaceError>
    where
        S: DrawingSurface + ?Sized,
    {
        let container = surface.create_frame(Some(root), layer.name())?;
        surface.resize(
            container,
            self.metrics.container_size(layer.components().len()),
        )?;
        surface.set_position(container, layer.position().into())?;
        apply_box_style(surface, container, &self.container_style)?;
        surface.set_corner_radius(container, self.metrics.corner_radius)?;

        let title_bounds = self.metrics.title_bounds();
        let title = surface.create_text(container, layer.name(), &self.title_style)?;
        surface.resize(title, title_bounds.to_size())?;
        surface.set_position(title, title_bounds.min_point())?;

        Ok(container)
    }

    /// Creates a styled box with a label for every component of every layer
    /// and records where each one ended up.
    ///
    /// `layers` must be the result of [`place_layers`](Self::place_layers)
    /// for the same diagram. Each layer's color key is resolved once, so an
    /// unknown key is reported once per layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface rejects a call or a color key cannot
    /// be resolved under the resolver's policy.
    pub fn place_components<S>(
        &self,
        surface: &mut S,
        layers: &[PlacedLayer],
        diagram: &Diagram,
        resolver: &StyleResolver,
    ) -> Result<PlacedLayout, ArchgramError>
    where
        S: DrawingSurface + ?Sized,
    {
        let mut groups = Vec::with_capacity(diagram.component_count());

        for placed_layer in layers {
            let Some(layer) = diagram.layers().get(placed_layer.index) else {
                continue;
            };
            let style = resolver.resolve(layer.color_key())?;

            for (index, component) in layer.components().iter().enumerate() {
                let group =
                    self.place_component(surface, placed_layer.handle, component, &style)?;
                surface.set_position(group, self.metrics.component_offset(index))?;
                groups.push((placed_layer.index, component, group));
            }
        }

        // Bounds are read back only once every box is in place.
        let mut layout = PlacedLayout::default();
        for (layer, component, handle) in groups {
            let bounds = surface
                .absolute_bounds(handle)
                .ok_or(SurfaceError::UnknownNode(handle))?;
            layout.register(PlacedNode {
                id: component.id(),
                name: component.name().to_string(),
                layer,
                handle,
                bounds,
            });
        }

        debug!(components = layout.len(); "Components placed");
        Ok(layout)
    }

    fn place_component<S>(
        &self,
        surface: &mut S,
        container: NodeHandle,
        component: &Component,
        style: &BoxStyle,
    ) -> Result<NodeHandle, SurfaceError>
    where
        S: DrawingSurface + ?Sized,
    {
        let group = surface.create_group(container, component.name())?;
        surface.set_metadata(group, COMPONENT_ID_KEY, &component.id().to_string())?;

        let rect =
            surface.create_rectangle(group, component.name(), self.metrics.corner_radius)?;
        surface.resize(rect, self.metrics.box_size)?;
        apply_box_style(surface, rect, style)?;

        let label_bounds = self.metrics.label_bounds();
        let label = surface.create_text(group, component.name(), &self.label_style)?;
        surface.resize(label, label_bounds.to_size())?;
        surface.set_position(label, label_bounds.min_point())?;

        Ok(group)
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(LayoutMetrics::default())
    }
}

fn container_gray() -> Color {
    Color::from_rgb(0.98, 0.98, 0.98)
}

fn container_style(fill: Color) -> BoxStyle {
    BoxStyle::new()
        .with_fill(Fill::Solid(fill))
        .with_stroke(StrokeDefinition::solid(
            Color::from_rgba(0.0, 0.0, 0.0, 0.1),
            1.0,
        ))
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use proptest::prelude::*;

    use archgram_core::model::{Connection, Position};

    use super::*;
    use crate::{
        style::UnknownColorKeyPolicy,
        surface::{NodeKind, SvgSurface},
    };

    fn layer(name: &str, color: &str, x: f32, y: f32, ids: &[&str]) -> Layer {
        Layer::new(
            name,
            color,
            Position::new(x, y),
            ids.iter().map(|id| Component::new(*id, *id)).collect(),
        )
    }

    fn place(diagram: &Diagram) -> (SvgSurface, Vec<PlacedLayer>, PlacedLayout) {
        let engine = LayoutEngine::default();
        let mut surface = SvgSurface::new();
        let root = surface.create_frame(None, diagram.name()).unwrap();
        surface.resize(root, engine.metrics().canvas()).unwrap();

        let layers = engine.place_layers(&mut surface, root, diagram).unwrap();
        let layout = engine
            .place_components(&mut surface, &layers, diagram, &StyleResolver::default())
            .unwrap();
        (surface, layers, layout)
    }

    #[test]
    fn test_two_components_stack_at_fixed_pitch() {
        let diagram = Diagram::new(
            "pitch",
            vec![layer("Client Layer", "client", 50.0, 50.0, &["a", "b"])],
            vec![],
        )
        .unwrap();

        let (surface, layers, layout) = place(&diagram);

        let a = layout.get(Id::new("a")).unwrap();
        let b = layout.get(Id::new("b")).unwrap();
        assert_eq!(surface.position(a.handle()), Some(Point::new(20.0, 50.0)));
        assert_eq!(surface.position(b.handle()), Some(Point::new(20.0, 150.0)));

        assert_approx_eq!(f32, a.bounds().min_x(), 70.0);
        assert_approx_eq!(f32, a.bounds().min_y(), 100.0);
        assert_approx_eq!(f32, b.bounds().min_y(), 200.0);
        assert_eq!(a.bounds().to_size(), Size::new(200.0, 80.0));

        assert_eq!(layers[0].bounds().to_size(), Size::new(240.0, 260.0));
    }

    #[test]
    fn test_layer_position_is_taken_verbatim() {
        let diagram = Diagram::new(
            "positions",
            vec![
                layer("API Layer", "api", 400.0, 50.0, &["http"]),
                layer("Data Sources", "data", 1100.0, 350.0, &["index"]),
            ],
            vec![],
        )
        .unwrap();

        let (surface, layers, _) = place(&diagram);

        assert_eq!(layers[0].bounds().min_point(), Point::new(400.0, 50.0));
        assert_eq!(layers[1].bounds().min_point(), Point::new(1100.0, 350.0));
        assert_eq!(surface.corner_radius(layers[0].handle()), Some(12.0));
    }

    #[test]
    fn test_empty_layer_gets_header_only_container() {
        let diagram = Diagram::new(
            "empty",
            vec![layer("Empty", "data", 0.0, 0.0, &[])],
            vec![],
        )
        .unwrap();

        let (surface, layers, layout) = place(&diagram);

        assert!(layout.is_empty());
        assert_eq!(layers[0].bounds().to_size(), Size::new(240.0, 60.0));

        // Only the title lives in the container
        let children = surface.children(layers[0].handle());
        assert_eq!(children.len(), 1);
        assert_eq!(surface.kind(children[0]), Some(NodeKind::Text));
        assert_eq!(surface.text_content(children[0]), Some("Empty"));
    }

    #[test]
    fn test_component_group_structure() {
        let diagram = Diagram::new(
            "group",
            vec![layer("Product", "product", 50.0, 200.0, &["foryou"])],
            vec![],
        )
        .unwrap();

        let (surface, _, layout) = place(&diagram);
        let node = layout.get(Id::new("foryou")).unwrap();

        assert_eq!(surface.kind(node.handle()), Some(NodeKind::Group));
        assert_eq!(surface.metadata(node.handle(), COMPONENT_ID_KEY), Some("foryou"));
        assert_eq!(
            surface.find_by_metadata(COMPONENT_ID_KEY, "foryou"),
            Some(node.handle())
        );

        let children = surface.children(node.handle());
        assert_eq!(children.len(), 2);
        assert_eq!(surface.kind(children[0]), Some(NodeKind::Rectangle));
        assert_eq!(surface.kind(children[1]), Some(NodeKind::Text));
        assert_eq!(surface.position(children[1]), Some(Point::new(10.0, 0.0)));

        let rect_style = surface.style(children[0]).unwrap();
        assert!(rect_style.fill().and_then(Fill::gradient).is_some());
        assert!(rect_style.stroke().is_none());
    }

    #[test]
    fn test_unknown_color_key_policy() {
        let diagram = Diagram::new(
            "unknown",
            vec![layer("Odd", "accent", 0.0, 0.0, &["x"])],
            vec![],
        )
        .unwrap();

        let (_, _, layout) = place(&diagram);
        assert_eq!(layout.len(), 1);

        let engine = LayoutEngine::default();
        let mut surface = SvgSurface::new();
        let root = surface.create_frame(None, "Main").unwrap();
        let layers = engine.place_layers(&mut surface, root, &diagram).unwrap();
        let result = engine.place_components(
            &mut surface,
            &layers,
            &diagram,
            &StyleResolver::new(UnknownColorKeyPolicy::Error),
        );
        assert!(matches!(result, Err(ArchgramError::Style(_))));
    }

    #[test]
    fn test_register_keeps_first_node() {
        let mut layout = PlacedLayout::default();
        let first = PlacedNode {
            id: Id::new("dup"),
            name: String::from("first"),
            layer: 0,
            handle: NodeHandle::new(1),
            bounds: Bounds::default(),
        };
        let second = PlacedNode {
            name: String::from("second"),
            handle: NodeHandle::new(2),
            ..first.clone()
        };

        layout.register(first);
        layout.register(second);

        assert_eq!(layout.len(), 1);
        assert_eq!(layout.get(Id::new("dup")).unwrap().name(), "first");
    }

    #[test]
    fn test_from_config_rejects_bad_container_color() {
        let config: AppConfig = toml::from_str(
            r#"
            [style]
            container_color = "nope"
            "#,
        )
        .unwrap();

        assert!(matches!(
            LayoutEngine::from_config(&config),
            Err(ArchgramError::Style(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_layout_is_deterministic(
            counts in proptest::collection::vec(0usize..6, 1..5),
            x in 0.0f32..1500.0,
            y in 0.0f32..800.0,
        ) {
            let mut next = 0;
            let layers: Vec<Layer> = counts
                .iter()
                .enumerate()
                .map(|(i, count)| {
                    let components = (0..*count)
                        .map(|_| {
                            next += 1;
                            let id = format!("c{next}");
                            Component::new(id.clone(), id.as_str())
                        })
                        .collect();
                    Layer::new(format!("L{i}"), "data", Position::new(x + i as f32 * 10.0, y), components)
                })
                .collect();
            let diagram = Diagram::new("prop", layers, Vec::<Connection>::new()).unwrap();

            let (_, first_layers, first) = place(&diagram);
            let (_, second_layers, second) = place(&diagram);

            let bounds = |layout: &PlacedLayout| -> Vec<(String, Bounds)> {
                layout.iter().map(|n| (n.id().to_string(), n.bounds())).collect()
            };
            prop_assert_eq!(bounds(&first), bounds(&second));
            prop_assert_eq!(first.len(), diagram.component_count());

            let layer_bounds = |layers: &[PlacedLayer]| -> Vec<Bounds> {
                layers.iter().map(PlacedLayer::bounds).collect()
            };
            prop_assert_eq!(layer_bounds(&first_layers), layer_bounds(&second_layers));
        }
    }
}
