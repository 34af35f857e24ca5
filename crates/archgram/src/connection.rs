//! Connection renderer: one line per connection between placed components.
//!
//! Endpoints are looked up in a [`PlacedLayout`], never on the surface, so a
//! connection can only be drawn once placement has finished. A connection
//! whose endpoint was never placed is skipped with a warning; it does not
//! fail the render.

use std::{fmt, str::FromStr};

use log::{trace, warn};
use serde::Deserialize;

use archgram_core::{
    color::Color,
    draw::{StrokeCap, StrokeDefinition},
    geometry::{Bounds, Point, Side},
    identifier::Id,
    model::Connection,
};

use crate::{
    config::ConnectionConfig,
    error::ArchgramError,
    layout::PlacedLayout,
    surface::{ConnectorPath, DrawingSurface, NodeHandle, SurfaceError},
};

/// How a connector travels between its two anchors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Routing {
    /// A single straight segment.
    #[default]
    Straight,
    /// A cubic curve leaving and entering horizontally.
    Curved,
    /// Horizontal and vertical segments with one elbow pair.
    Orthogonal,
}

impl Routing {
    /// Builds the path from `start` to `end`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use archgram::connection::Routing;
    /// # use archgram_core::geometry::Point;
    /// let start = Point::new(0.0, 0.0);
    /// let end = Point::new(100.0, 40.0);
    ///
    /// assert_eq!(Routing::Straight.path(start, end).to_svg_data(), "M 0 0 L 100 40");
    /// assert_eq!(
    ///     Routing::Orthogonal.path(start, end).to_svg_data(),
    ///     "M 0 0 L 50 0 L 50 40 L 100 40"
    /// );
    /// ```
    pub fn path(self, start: Point, end: Point) -> ConnectorPath {
        match self {
            Self::Straight => ConnectorPath::new(start).line_to(end),
            Self::Curved => {
                let half = (end.x() - start.x()) / 2.0;
                ConnectorPath::new(start).cubic_to(
                    Point::new(start.x() + half, start.y()),
                    Point::new(end.x() - half, end.y()),
                    end,
                )
            }
            Self::Orthogonal => {
                let mid = start.midpoint(end);
                let (first, second) =
                    if (end.x() - start.x()).abs() >= (end.y() - start.y()).abs() {
                        (Point::new(mid.x(), start.y()), Point::new(mid.x(), end.y()))
                    } else {
                        (Point::new(start.x(), mid.y()), Point::new(end.x(), mid.y()))
                    };
                ConnectorPath::new(start)
                    .line_to(first)
                    .line_to(second)
                    .line_to(end)
            }
        }
    }
}

impl FromStr for Routing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "straight" => Ok(Self::Straight),
            "curved" => Ok(Self::Curved),
            "orthogonal" => Ok(Self::Orthogonal),
            _ => Err(format!(
                "invalid routing `{s}`, valid values: straight, curved, orthogonal"
            )),
        }
    }
}

/// A connection that could not be drawn because an endpoint was never
/// placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingEndpoint {
    from: Id,
    to: Id,
    from_missing: bool,
    to_missing: bool,
}

impl MissingEndpoint {
    pub fn from(&self) -> Id {
        self.from
    }

    pub fn to(&self) -> Id {
        self.to
    }

    /// The endpoint ids that were not found, source first.
    pub fn missing_ids(&self) -> Vec<Id> {
        [
            (self.from_missing, self.from),
            (self.to_missing, self.to),
        ]
        .into_iter()
        .filter_map(|(missing, id)| missing.then_some(id))
        .collect()
    }
}

impl fmt::Display for MissingEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let missing: Vec<String> = self.missing_ids().iter().map(Id::to_string).collect();
        write!(
            f,
            "could not find components for connection: {} -> {} (missing: {})",
            self.from,
            self.to,
            missing.join(", ")
        )
    }
}

/// What happened to a single connection.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionOutcome {
    Drawn(NodeHandle),
    Skipped(MissingEndpoint),
}

impl ConnectionOutcome {
    pub fn is_drawn(&self) -> bool {
        matches!(self, Self::Drawn(_))
    }
}

/// Draws connector lines between placed components.
#[derive(Debug, Clone)]
pub struct ConnectionRenderer {
    routing: Routing,
    source_anchor: Side,
    target_anchor: Side,
    stroke: StrokeDefinition,
}

impl ConnectionRenderer {
    pub fn new(
        routing: Routing,
        source_anchor: Side,
        target_anchor: Side,
        stroke: StrokeDefinition,
    ) -> Self {
        Self {
            routing,
            source_anchor,
            target_anchor,
            stroke,
        }
    }

    /// Creates a renderer from the connection section of the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ArchgramError::Style`] if the configured stroke is invalid.
    pub fn from_config(config: &ConnectionConfig) -> Result<Self, ArchgramError> {
        let stroke = config.stroke().map_err(ArchgramError::Style)?;
        Ok(Self::new(
            config.routing(),
            config.source_anchor(),
            config.target_anchor(),
            stroke,
        ))
    }

    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }

    /// The connector path from the source box to the target box.
    pub fn path_between(&self, from: Bounds, to: Bounds) -> ConnectorPath {
        self.routing
            .path(from.anchor(self.source_anchor), to.anchor(self.target_anchor))
    }

    /// Draws `connection` if both of its endpoints are in `layout`.
    ///
    /// # Errors
    ///
    /// Returns an error only if the surface rejects the line. A missing
    /// endpoint is reported as [`ConnectionOutcome::Skipped`].
    pub fn draw<S>(
        &self,
        surface: &mut S,
        layout: &PlacedLayout,
        connection: &Connection,
    ) -> Result<ConnectionOutcome, SurfaceError>
    where
        S: DrawingSurface + ?Sized,
    {
        let from = layout.get(connection.from());
        let to = layout.get(connection.to());

        let (Some(from), Some(to)) = (from, to) else {
            let missing = MissingEndpoint {
                from: connection.from(),
                to: connection.to(),
                from_missing: from.is_none(),
                to_missing: to.is_none(),
            };
            warn!(from:% = connection.from(), to:% = connection.to(); "{missing}");
            return Ok(ConnectionOutcome::Skipped(missing));
        };

        let path = self.path_between(from.bounds(), to.bounds());
        let line = surface.create_line(&path, &self.stroke)?;
        trace!(from:% = from.id(), to:% = to.id(), line:% = line; "Connection drawn");

        Ok(ConnectionOutcome::Drawn(line))
    }

    /// Draws every connection in order.
    pub fn draw_all<S>(
        &self,
        surface: &mut S,
        layout: &PlacedLayout,
        connections: &[Connection],
    ) -> Result<Vec<ConnectionOutcome>, SurfaceError>
    where
        S: DrawingSurface + ?Sized,
    {
        connections
            .iter()
            .map(|connection| self.draw(surface, layout, connection))
            .collect()
    }
}

impl Default for ConnectionRenderer {
    fn default() -> Self {
        let mut stroke = StrokeDefinition::new(Color::from_rgba(0.0, 0.0, 0.0, 0.6), 2.0);
        stroke.set_cap(StrokeCap::Round);
        Self::new(Routing::default(), Side::Right, Side::Left, stroke)
    }
}
