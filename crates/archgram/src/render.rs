//! The render pipeline.
//!
//! Rendering a diagram moves through a fixed sequence of stages:
//!
//! ```text
//! Empty ─► LayersPlaced ─► ComponentsPlaced ─► ConnectionsDrawn ─► Complete
//! ```
//!
//! Each stage is a type parameter of [`Render`] and each transition consumes
//! the previous stage, so connections cannot be drawn before every component
//! has been placed and measured, and no stage can be revisited.
//! [`DiagramRenderer`] runs the whole sequence.

use std::fmt;

use log::{debug, info};

use archgram_core::{
    color::Color,
    draw::{BoxStyle, Fill},
    model::Diagram,
};

use crate::{
    config::AppConfig,
    connection::{ConnectionOutcome, ConnectionRenderer, MissingEndpoint},
    error::ArchgramError,
    layout::{LayoutEngine, PlacedLayer, PlacedLayout},
    style::{StyleResolver, apply_box_style},
    surface::{DrawingSurface, NodeHandle},
};

/// The stage a render has reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RenderStage {
    Empty,
    LayersPlaced,
    ComponentsPlaced,
    ConnectionsDrawn,
    Complete,
}

impl fmt::Display for RenderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Empty => "empty",
            Self::LayersPlaced => "layers-placed",
            Self::ComponentsPlaced => "components-placed",
            Self::ConnectionsDrawn => "connections-drawn",
            Self::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// Marker for the stage types of [`Render`].
pub trait Stage {
    const STAGE: RenderStage;
}

/// The surface is cleared and holds only the main frame.
#[derive(Debug)]
pub struct Empty;

/// Every layer container exists.
#[derive(Debug)]
pub struct LayersPlaced {
    layers: Vec<PlacedLayer>,
}

/// Every component box exists and has been measured.
#[derive(Debug)]
pub struct ComponentsPlaced {
    layers: Vec<PlacedLayer>,
    layout: PlacedLayout,
}

/// Every resolvable connection has been drawn.
#[derive(Debug)]
pub struct ConnectionsDrawn {
    layers: Vec<PlacedLayer>,
    layout: PlacedLayout,
    outcomes: Vec<ConnectionOutcome>,
}

/// The diagram is selected, in view and announced.
#[derive(Debug)]
pub struct Complete {
    report: RenderReport,
}

impl Stage for Empty {
    const STAGE: RenderStage = RenderStage::Empty;
}

impl Stage for LayersPlaced {
    const STAGE: RenderStage = RenderStage::LayersPlaced;
}

impl Stage for ComponentsPlaced {
    const STAGE: RenderStage = RenderStage::ComponentsPlaced;
}

impl Stage for ConnectionsDrawn {
    const STAGE: RenderStage = RenderStage::ConnectionsDrawn;
}

impl Stage for Complete {
    const STAGE: RenderStage = RenderStage::Complete;
}

/// Summary of a finished render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderReport {
    stage: RenderStage,
    root: NodeHandle,
    layers_placed: usize,
    lines_drawn: usize,
    skipped: Vec<MissingEndpoint>,
    layout: PlacedLayout,
}

impl RenderReport {
    pub fn stage(&self) -> RenderStage {
        self.stage
    }

    /// The main frame holding the diagram.
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    pub fn layers_placed(&self) -> usize {
        self.layers_placed
    }

    pub fn components_placed(&self) -> usize {
        self.layout.len()
    }

    pub fn lines_drawn(&self) -> usize {
        self.lines_drawn
    }

    /// Connections that were not drawn because an endpoint was missing.
    pub fn skipped(&self) -> &[MissingEndpoint] {
        &self.skipped
    }

    pub fn layout(&self) -> &PlacedLayout {
        &self.layout
    }
}

/// Everything a render needs besides the surface and the diagram.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    engine: LayoutEngine,
    resolver: StyleResolver,
    connections: ConnectionRenderer,
    background: Color,
}

impl RenderSettings {
    pub fn new(
        engine: LayoutEngine,
        resolver: StyleResolver,
        connections: ConnectionRenderer,
        background: Color,
    ) -> Self {
        Self {
            engine,
            resolver,
            connections,
            background,
        }
    }

    /// Builds the settings described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ArchgramError::Style`] if a configured color or stroke is
    /// invalid.
    pub fn from_config(config: &AppConfig) -> Result<Self, ArchgramError> {
        let background = config
            .style()
            .background_color()
            .map_err(ArchgramError::Style)?
            .unwrap_or_else(default_background);

        Ok(Self::new(
            LayoutEngine::from_config(config)?,
            StyleResolver::from_config(config.style()),
            ConnectionRenderer::from_config(config.connection())?,
            background,
        ))
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::new(
            LayoutEngine::default(),
            StyleResolver::default(),
            ConnectionRenderer::default(),
            default_background(),
        )
    }
}

fn default_background() -> Color {
    Color::from_rgb(0.98, 0.98, 0.98)
}

/// A render in progress, at stage `St`.
pub struct Render<'r, S: ?Sized, St> {
    surface: &'r mut S,
    diagram: &'r Diagram,
    settings: &'r RenderSettings,
    root: NodeHandle,
    stage: St,
}

impl<'r, S: ?Sized, St: Stage> Render<'r, S, St> {
    pub fn stage(&self) -> RenderStage {
        St::STAGE
    }

    /// The main frame holding the diagram.
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    fn advance<Next: Stage>(self, stage: Next) -> Render<'r, S, Next> {
        debug!(from:% = St::STAGE, to:% = Next::STAGE; "Render stage advanced");
        Render {
            surface: self.surface,
            diagram: self.diagram,
            settings: self.settings,
            root: self.root,
            stage,
        }
    }
}

impl<'r, S: DrawingSurface + ?Sized> Render<'r, S, Empty> {
    /// Clears `surface` and creates the main frame for `diagram`.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface rejects any call.
    pub fn begin(
        surface: &'r mut S,
        diagram: &'r Diagram,
        settings: &'r RenderSettings,
    ) -> Result<Self, ArchgramError> {
        surface.clear();

        let root = surface.create_frame(None, diagram.name())?;
        surface.resize(root, settings.engine.metrics().canvas())?;
        apply_box_style(
            surface,
            root,
            &BoxStyle::new().with_fill(Fill::Solid(settings.background)),
        )?;

        debug!(diagram = diagram.name(); "Render started");
        Ok(Self {
            surface,
            diagram,
            settings,
            root,
            stage: Empty,
        })
    }

    /// Creates the layer containers.
    pub fn place_layers(self) -> Result<Render<'r, S, LayersPlaced>, ArchgramError> {
        let layers = self
            .settings
            .engine
            .place_layers(self.surface, self.root, self.diagram)?;
        Ok(self.advance(LayersPlaced { layers }))
    }
}

impl<'r, S: DrawingSurface + ?Sized> Render<'r, S, LayersPlaced> {
    pub fn layers(&self) -> &[PlacedLayer] {
        &self.stage.layers
    }

    /// Creates the component boxes and measures them.
    pub fn place_components(mut self) -> Result<Render<'r, S, ComponentsPlaced>, ArchgramError> {
        let layout = self.settings.engine.place_components(
            self.surface,
            &self.stage.layers,
            self.diagram,
            &self.settings.resolver,
        )?;
        let layers = std::mem::take(&mut self.stage.layers);
        Ok(self.advance(ComponentsPlaced { layers, layout }))
    }
}

impl<'r, S: DrawingSurface + ?Sized> Render<'r, S, ComponentsPlaced> {
    pub fn layout(&self) -> &PlacedLayout {
        &self.stage.layout
    }

    /// Draws every connection whose endpoints were both placed.
    pub fn draw_connections(
        mut self,
    ) -> Result<Render<'r, S, ConnectionsDrawn>, ArchgramError> {
        let outcomes = self.settings.connections.draw_all(
            self.surface,
            &self.stage.layout,
            self.diagram.connections(),
        )?;
        let layers = std::mem::take(&mut self.stage.layers);
        let layout = std::mem::take(&mut self.stage.layout);
        Ok(self.advance(ConnectionsDrawn {
            layers,
            layout,
            outcomes,
        }))
    }
}

impl<'r, S: DrawingSurface + ?Sized> Render<'r, S, ConnectionsDrawn> {
    pub fn outcomes(&self) -> &[ConnectionOutcome] {
        &self.stage.outcomes
    }

    /// Selects the main frame, brings it into view and announces the result.
    pub fn finish(mut self) -> Result<Render<'r, S, Complete>, ArchgramError> {
        self.surface.select(&[self.root])?;
        self.surface.scroll_into_view(&[self.root])?;
        self.surface.notify(&format!(
            "{} diagram created successfully!",
            self.diagram.name()
        ));

        let ConnectionsDrawn {
            layers,
            layout,
            outcomes,
        } = std::mem::replace(
            &mut self.stage,
            ConnectionsDrawn {
                layers: Vec::new(),
                layout: PlacedLayout::default(),
                outcomes: Vec::new(),
            },
        );

        let mut lines_drawn = 0;
        let mut skipped = Vec::new();
        for outcome in outcomes {
            match outcome {
                ConnectionOutcome::Drawn(_) => lines_drawn += 1,
                ConnectionOutcome::Skipped(missing) => skipped.push(missing),
            }
        }

        let report = RenderReport {
            stage: RenderStage::Complete,
            root: self.root,
            layers_placed: layers.len(),
            lines_drawn,
            skipped,
            layout,
        };
        Ok(self.advance(Complete { report }))
    }
}

impl<S: ?Sized> Render<'_, S, Complete> {
    pub fn report(&self) -> &RenderReport {
        &self.stage.report
    }

    pub fn into_report(self) -> RenderReport {
        self.stage.report
    }
}

/// Renders one diagram onto one surface.
///
/// # Examples
///
/// ```
/// use archgram::render::{DiagramRenderer, RenderSettings, RenderStage};
/// use archgram::surface::SvgSurface;
/// use archgram_core::model::{Component, Connection, Diagram, Layer, Position};
///
/// let diagram = Diagram::new(
///     "Example",
///     vec![Layer::new(
///         "Client Layer",
///         "client",
///         Position::new(50.0, 50.0),
///         vec![Component::new("Web", "web"), Component::new("Mobile", "mobile")],
///     )],
///     vec![Connection::new("web", "mobile"), Connection::new("web", "ghost")],
/// )
/// .unwrap();
///
/// let mut surface = SvgSurface::new();
/// let mut renderer = DiagramRenderer::new(&mut surface, &diagram, RenderSettings::default());
/// let report = renderer.render_full_diagram().unwrap();
///
/// assert_eq!(report.stage(), RenderStage::Complete);
/// assert_eq!(report.lines_drawn(), 1);
/// assert_eq!(report.skipped().len(), 1);
/// ```
pub struct DiagramRenderer<'a, S: ?Sized> {
    surface: &'a mut S,
    diagram: &'a Diagram,
    settings: RenderSettings,
}

impl<'a, S: DrawingSurface + ?Sized> DiagramRenderer<'a, S> {
    pub fn new(surface: &'a mut S, diagram: &'a Diagram, settings: RenderSettings) -> Self {
        Self {
            surface,
            diagram,
            settings,
        }
    }

    /// Clears the surface and draws the whole diagram.
    ///
    /// Running it again replaces the previous drawing rather than adding a
    /// second copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface rejects a call or a color key cannot
    /// be resolved. Connections with missing endpoints are not errors; they
    /// are listed in [`RenderReport::skipped`].
    pub fn render_full_diagram(&mut self) -> Result<RenderReport, ArchgramError> {
        let report = Render::begin(&mut *self.surface, self.diagram, &self.settings)?
            .place_layers()?
            .place_components()?
            .draw_connections()?
            .finish()?
            .into_report();

        info!(
            diagram = self.diagram.name(),
            layers = report.layers_placed(),
            components = report.components_placed(),
            lines = report.lines_drawn(),
            skipped = report.skipped().len();
            "Diagram rendered"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use archgram_core::{
        draw::{DropShadow, StrokeDefinition, TextDefinition},
        geometry::{Bounds, Point, Size},
        identifier::Id,
        model::{Component, Connection, Layer, Position},
    };

    use super::*;
    use crate::surface::{ConnectorPath, NodeKind, SurfaceError, SvgSurface};

    fn diagram(connections: Vec<Connection>) -> Diagram {
        Diagram::new(
            "Test",
            vec![
                Layer::new(
                    "Client Layer",
                    "client",
                    Position::new(50.0, 50.0),
                    vec![
                        Component::new("Twitter App/Web", "twitter-app"),
                        Component::new("Mobile Clients", "mobile-clients"),
                    ],
                ),
                Layer::new(
                    "API Layer",
                    "api",
                    Position::new(400.0, 50.0),
                    vec![Component::new("HTTP Controller", "http-controller")],
                ),
            ],
            connections,
        )
        .unwrap()
    }

    fn render(diagram: &Diagram, surface: &mut SvgSurface) -> RenderReport {
        DiagramRenderer::new(surface, diagram, RenderSettings::default())
            .render_full_diagram()
            .unwrap()
    }

    #[test]
    fn test_full_render_counts() {
        let diagram = diagram(vec![
            Connection::new("twitter-app", "http-controller"),
            Connection::new("mobile-clients", "http-controller"),
        ]);
        let mut surface = SvgSurface::new();
        let report = render(&diagram, &mut surface);

        assert_eq!(report.stage(), RenderStage::Complete);
        assert_eq!(report.layers_placed(), 2);
        assert_eq!(report.components_placed(), 3);
        assert_eq!(report.lines_drawn(), 2);
        assert!(report.skipped().is_empty());
        assert_eq!(surface.nodes_of_kind(NodeKind::Line).count(), 2);
    }

    #[test]
    fn test_missing_endpoint_still_completes() {
        let diagram = diagram(vec![Connection::new("twitter-app", "ghost")]);
        let mut surface = SvgSurface::new();
        let report = render(&diagram, &mut surface);

        assert_eq!(report.stage(), RenderStage::Complete);
        assert_eq!(report.lines_drawn(), 0);
        assert_eq!(report.skipped().len(), 1);
        assert_eq!(report.skipped()[0].missing_ids(), vec![Id::new("ghost")]);
        assert_eq!(surface.nodes_of_kind(NodeKind::Line).count(), 0);
    }

    #[test]
    fn test_rendering_twice_leaves_one_copy() {
        let diagram = diagram(vec![Connection::new("twitter-app", "http-controller")]);
        let mut surface = SvgSurface::new();

        render(&diagram, &mut surface);
        let first_count = surface.len();
        let first_svg = surface.to_svg_string();

        let report = render(&diagram, &mut surface);

        let frames: Vec<_> = surface
            .roots()
            .iter()
            .copied()
            .filter(|root| surface.kind(*root) == Some(NodeKind::Frame))
            .collect();
        assert_eq!(frames, vec![report.root()]);
        assert_eq!(surface.len(), first_count);
        assert_eq!(surface.nodes_of_kind(NodeKind::Line).count(), 1);
        assert_eq!(surface.to_svg_string(), first_svg);
    }

    #[test]
    fn test_finish_selects_and_announces() {
        let diagram = diagram(vec![]);
        let mut surface = SvgSurface::new();
        let report = render(&diagram, &mut surface);

        assert_eq!(surface.selection(), &[report.root()]);
        assert_eq!(
            surface.viewport(),
            Some(Bounds::new_from_top_left(
                Point::default(),
                Size::new(1920.0, 1080.0)
            ))
        );
        assert_eq!(
            surface.notifications(),
            ["Test diagram created successfully!".to_string()]
        );
    }

    #[test]
    fn test_stages_advance_in_order() {
        let diagram = diagram(vec![Connection::new("twitter-app", "http-controller")]);
        let settings = RenderSettings::default();
        let mut surface = SvgSurface::new();

        let render = Render::begin(&mut surface, &diagram, &settings).unwrap();
        assert_eq!(render.stage(), RenderStage::Empty);

        let render = render.place_layers().unwrap();
        assert_eq!(render.stage(), RenderStage::LayersPlaced);
        assert_eq!(render.layers().len(), 2);

        let render = render.place_components().unwrap();
        assert_eq!(render.stage(), RenderStage::ComponentsPlaced);
        assert!(render.layout().contains(Id::new("mobile-clients")));

        let render = render.draw_connections().unwrap();
        assert_eq!(render.stage(), RenderStage::ConnectionsDrawn);
        assert!(render.outcomes()[0].is_drawn());

        let render = render.finish().unwrap();
        assert_eq!(render.stage(), RenderStage::Complete);
        assert_eq!(render.report().lines_drawn(), 1);
    }

    #[test]
    fn test_settings_from_config() {
        let config: AppConfig = toml::from_str(
            r##"
            [style]
            background_color = "#ffffff"
            "##,
        )
        .unwrap();
        let settings = RenderSettings::from_config(&config).unwrap();

        let mut surface = SvgSurface::new();
        let diagram = diagram(vec![]);
        let report = DiagramRenderer::new(&mut surface, &diagram, settings)
            .render_full_diagram()
            .unwrap();

        let fill = surface.style(report.root()).and_then(|s| s.fill()).cloned();
        assert_eq!(fill, Some(Fill::Solid(Color::new("#ffffff").unwrap())));
    }

    /// Delegates to an [`SvgSurface`] but refuses to draw lines.
    struct NoLines(SvgSurface);

    impl DrawingSurface for NoLines {
        fn clear(&mut self) {
            self.0.clear();
        }

        fn create_frame(
            &mut self,
            parent: Option<NodeHandle>,
            name: &str,
        ) -> Result<NodeHandle, SurfaceError> {
            self.0.create_frame(parent, name)
        }

        fn create_group(
            &mut self,
            parent: NodeHandle,
            name: &str,
        ) -> Result<NodeHandle, SurfaceError> {
            self.0.create_group(parent, name)
        }

        fn create_rectangle(
            &mut self,
            parent: NodeHandle,
            name: &str,
            corner_radius: f32,
        ) -> Result<NodeHandle, SurfaceError> {
            self.0.create_rectangle(parent, name, corner_radius)
        }

        fn create_text(
            &mut self,
            parent: NodeHandle,
            content: &str,
            style: &TextDefinition,
        ) -> Result<NodeHandle, SurfaceError> {
            self.0.create_text(parent, content, style)
        }

        fn create_line(
            &mut self,
            _path: &ConnectorPath,
            _stroke: &StrokeDefinition,
        ) -> Result<NodeHandle, SurfaceError> {
            Err(SurfaceError::Rejected(String::from("lines are disabled")))
        }

        fn set_fill(&mut self, node: NodeHandle, fill: &Fill) -> Result<(), SurfaceError> {
            self.0.set_fill(node, fill)
        }

        fn set_stroke(
            &mut self,
            node: NodeHandle,
            stroke: &StrokeDefinition,
        ) -> Result<(), SurfaceError> {
            self.0.set_stroke(node, stroke)
        }

        fn set_shadow(
            &mut self,
            node: NodeHandle,
            shadow: &DropShadow,
        ) -> Result<(), SurfaceError> {
            self.0.set_shadow(node, shadow)
        }

        fn set_corner_radius(
            &mut self,
            node: NodeHandle,
            radius: f32,
        ) -> Result<(), SurfaceError> {
            self.0.set_corner_radius(node, radius)
        }

        fn resize(&mut self, node: NodeHandle, size: Size) -> Result<(), SurfaceError> {
            self.0.resize(node, size)
        }

        fn set_position(&mut self, node: NodeHandle, position: Point) -> Result<(), SurfaceError> {
            self.0.set_position(node, position)
        }

        fn set_metadata(
            &mut self,
            node: NodeHandle,
            key: &str,
            value: &str,
        ) -> Result<(), SurfaceError> {
            self.0.set_metadata(node, key, value)
        }

        fn find_by_metadata(&self, key: &str, value: &str) -> Option<NodeHandle> {
            self.0.find_by_metadata(key, value)
        }

        fn absolute_bounds(&self, node: NodeHandle) -> Option<Bounds> {
            self.0.absolute_bounds(node)
        }

        fn select(&mut self, nodes: &[NodeHandle]) -> Result<(), SurfaceError> {
            self.0.select(nodes)
        }

        fn scroll_into_view(&mut self, nodes: &[NodeHandle]) -> Result<(), SurfaceError> {
            self.0.scroll_into_view(nodes)
        }

        fn notify(&mut self, message: &str) {
            self.0.notify(message);
        }
    }

    #[test]
    fn test_surface_rejection_is_fatal() {
        let diagram = diagram(vec![Connection::new("twitter-app", "http-controller")]);
        let mut surface = NoLines(SvgSurface::new());

        let result = DiagramRenderer::new(&mut surface, &diagram, RenderSettings::default())
            .render_full_diagram();

        assert!(matches!(
            result,
            Err(ArchgramError::Surface(SurfaceError::Rejected(_)))
        ));
        assert!(surface.0.notifications().is_empty());
    }
}
