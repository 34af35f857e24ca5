//! The drawing surface the diagram is rendered onto.
//!
//! [`DrawingSurface`] is the narrow set of primitives the renderer needs from
//! a host drawing tool: create containers, groups, rectangles, text and
//! lines, style and move them, attach metadata, read bounding boxes back, and
//! bring the result into view. [`SvgSurface`] implements it in memory and
//! serializes to SVG.
//!
//! Every mutating call can be rejected by the host. A rejection is a
//! [`SurfaceError`] and aborts the render that issued it.

mod svg;

pub use self::svg::{NodeKind, SvgSurface};

use std::fmt;

use thiserror::Error;

use archgram_core::{
    draw::{DropShadow, Fill, StrokeDefinition, TextDefinition},
    geometry::{Bounds, Point, Size},
};

/// Opaque reference to a node created on a surface.
///
/// Handles stay unique for the lifetime of a surface, so a handle obtained
/// before [`DrawingSurface::clear`] never aliases a node created after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(u64);

impl NodeHandle {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// A host rejection of a drawing call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurfaceError {
    #[error("unknown node {0}")]
    UnknownNode(NodeHandle),

    #[error("node {parent} cannot contain children")]
    InvalidParent { parent: NodeHandle },

    #[error("invalid size {width}x{height} for node {node}")]
    InvalidSize {
        node: NodeHandle,
        width: f32,
        height: f32,
    },

    #[error("{0}")]
    Rejected(String),
}

/// A single segment of a [`ConnectorPath`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    Line(Point),
    Cubic {
        ctrl1: Point,
        ctrl2: Point,
        end: Point,
    },
}

impl PathSegment {
    fn end(self) -> Point {
        match self {
            Self::Line(end) | Self::Cubic { end, .. } => end,
        }
    }
}

/// The geometry of a connector line in absolute canvas coordinates.
///
/// # Examples
///
/// ```
/// # use archgram::surface::ConnectorPath;
/// # use archgram_core::geometry::Point;
/// let path = ConnectorPath::new(Point::new(270.0, 140.0)).line_to(Point::new(420.0, 140.0));
///
/// assert_eq!(path.end(), Point::new(420.0, 140.0));
/// assert_eq!(path.to_svg_data(), "M 270 140 L 420 140");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorPath {
    start: Point,
    segments: Vec<PathSegment>,
}

impl ConnectorPath {
    pub fn new(start: Point) -> Self {
        Self {
            start,
            segments: Vec::new(),
        }
    }

    pub fn line_to(mut self, end: Point) -> Self {
        self.segments.push(PathSegment::Line(end));
        self
    }

    pub fn cubic_to(mut self, ctrl1: Point, ctrl2: Point, end: Point) -> Self {
        self.segments.push(PathSegment::Cubic { ctrl1, ctrl2, end });
        self
    }

    pub fn start(&self) -> Point {
        self.start
    }

    /// The last point of the path, or its start if it has no segments.
    pub fn end(&self) -> Point {
        self.segments
            .last()
            .map_or(self.start, |segment| segment.end())
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Bounds of every point of the path, control points included.
    pub fn bounds(&self) -> Bounds {
        let points = self.segments.iter().flat_map(|segment| match *segment {
            PathSegment::Line(end) => vec![end],
            PathSegment::Cubic { ctrl1, ctrl2, end } => vec![ctrl1, ctrl2, end],
        });

        Bounds::union(
            std::iter::once(self.start)
                .chain(points)
                .map(|point| point.to_bounds(Size::default())),
        )
        .unwrap_or_default()
    }

    /// Returns a copy moved by `offset`.
    pub fn translate(&self, offset: Point) -> Self {
        let shift = |point: Point| point.add_point(offset);
        Self {
            start: shift(self.start),
            segments: self
                .segments
                .iter()
                .map(|segment| match *segment {
                    PathSegment::Line(end) => PathSegment::Line(shift(end)),
                    PathSegment::Cubic { ctrl1, ctrl2, end } => PathSegment::Cubic {
                        ctrl1: shift(ctrl1),
                        ctrl2: shift(ctrl2),
                        end: shift(end),
                    },
                })
                .collect(),
        }
    }

    /// Formats the path as SVG path data.
    pub fn to_svg_data(&self) -> String {
        let mut data = format!("M {} {}", self.start.x(), self.start.y());
        for segment in &self.segments {
            let command = match *segment {
                PathSegment::Line(end) => format!(" L {} {}", end.x(), end.y()),
                PathSegment::Cubic { ctrl1, ctrl2, end } => format!(
                    " C {} {}, {} {}, {} {}",
                    ctrl1.x(),
                    ctrl1.y(),
                    ctrl2.x(),
                    ctrl2.y(),
                    end.x(),
                    end.y()
                ),
            };
            data.push_str(&command);
        }
        data
    }
}

/// Primitives a host drawing tool provides to the renderer.
///
/// Positions passed to [`set_position`](Self::set_position) are relative to
/// the node's parent; [`absolute_bounds`](Self::absolute_bounds) reports
/// canvas coordinates. Lines are created at the top level in canvas
/// coordinates.
pub trait DrawingSurface {
    /// Removes every node from the surface.
    fn clear(&mut self);

    /// Creates a frame, a container that clips and styles like a box.
    fn create_frame(
        &mut self,
        parent: Option<NodeHandle>,
        name: &str,
    ) -> Result<NodeHandle, SurfaceError>;

    /// Creates an unstyled group. A group's bounds are the union of its
    /// children's bounds.
    fn create_group(&mut self, parent: NodeHandle, name: &str)
    -> Result<NodeHandle, SurfaceError>;

    fn create_rectangle(
        &mut self,
        parent: NodeHandle,
        name: &str,
        corner_radius: f32,
    ) -> Result<NodeHandle, SurfaceError>;

    fn create_text(
        &mut self,
        parent: NodeHandle,
        content: &str,
        style: &TextDefinition,
    ) -> Result<NodeHandle, SurfaceError>;

    fn create_line(
        &mut self,
        path: &ConnectorPath,
        stroke: &StrokeDefinition,
    ) -> Result<NodeHandle, SurfaceError>;

    fn set_fill(&mut self, node: NodeHandle, fill: &Fill) -> Result<(), SurfaceError>;

    fn set_stroke(&mut self, node: NodeHandle, stroke: &StrokeDefinition)
    -> Result<(), SurfaceError>;

    fn set_shadow(&mut self, node: NodeHandle, shadow: &DropShadow) -> Result<(), SurfaceError>;

    fn set_corner_radius(&mut self, node: NodeHandle, radius: f32) -> Result<(), SurfaceError>;

    fn resize(&mut self, node: NodeHandle, size: Size) -> Result<(), SurfaceError>;

    fn set_position(&mut self, node: NodeHandle, position: Point) -> Result<(), SurfaceError>;

    /// Attaches a key-value pair to a node. Metadata survives moves and
    /// resizes.
    fn set_metadata(&mut self, node: NodeHandle, key: &str, value: &str)
    -> Result<(), SurfaceError>;

    /// Returns the first node, in creation order, whose metadata maps `key`
    /// to `value`.
    fn find_by_metadata(&self, key: &str, value: &str) -> Option<NodeHandle>;

    /// Bounding box of a node in canvas coordinates.
    fn absolute_bounds(&self, node: NodeHandle) -> Option<Bounds>;

    fn select(&mut self, nodes: &[NodeHandle]) -> Result<(), SurfaceError>;

    fn scroll_into_view(&mut self, nodes: &[NodeHandle]) -> Result<(), SurfaceError>;

    /// Shows a transient message to the user.
    fn notify(&mut self, message: &str);
}
