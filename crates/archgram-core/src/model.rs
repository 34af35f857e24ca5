//! Diagram model: layers, components and connections.
//!
//! A [`Diagram`] is the static description of an architecture diagram. It is
//! loaded once, validated on construction and treated as read-only by every
//! later stage.
//!
//! # Description format
//!
//! The model deserializes from any `serde` format. In TOML:
//!
//! ```toml
//! name = "Example"
//!
//! [[layers]]
//! name = "Client Layer"
//! color_key = "client"
//! position = { x = 50, y = 50 }
//! components = [
//!     { name = "Mobile Clients", id = "mobile-clients" },
//! ]
//!
//! [[connections]]
//! from = "mobile-clients"
//! to = "http-controller"
//! ```
//!
//! Deserialization goes through [`DiagramDescription`], so a successfully
//! deserialized [`Diagram`] always satisfies the uniqueness invariant.

use std::collections::HashSet;

use serde::Deserialize;
use thiserror::Error;

use crate::{geometry::Point, identifier::Id};

/// Errors raised when a diagram violates a construction precondition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("duplicate component id `{id}` (in layer `{layer}`)")]
    DuplicateComponentId { id: String, layer: String },

    #[error("component `{name}` in layer `{layer}` has an empty id")]
    EmptyComponentId { name: String, layer: String },
}

/// Top-left anchor of a layer on the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<Position> for Point {
    fn from(position: Position) -> Self {
        Point::new(position.x, position.y)
    }
}

/// A single labeled box representing one architectural element.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Component {
    name: String,
    id: Id,
}

impl Component {
    pub fn new(name: impl Into<String>, id: impl Into<Id>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> Id {
        self.id
    }
}

/// A named group of components sharing a visual style and a base position.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Layer {
    name: String,
    #[serde(alias = "color")]
    color_key: String,
    #[serde(default)]
    components: Vec<Component>,
    position: Position,
}

impl Layer {
    pub fn new(
        name: impl Into<String>,
        color_key: impl Into<String>,
        position: Position,
        components: Vec<Component>,
    ) -> Self {
        Self {
            name: name.into(),
            color_key: color_key.into(),
            components,
            position,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The symbolic style name of this layer, resolved at render time.
    pub fn color_key(&self) -> &str {
        &self.color_key
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn position(&self) -> Position {
        self.position
    }
}

/// A directed edge between two component ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Connection {
    from: Id,
    to: Id,
}

impl Connection {
    pub fn new(from: impl Into<Id>, to: impl Into<Id>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn from(&self) -> Id {
        self.from
    }

    pub fn to(&self) -> Id {
        self.to
    }
}

/// Unvalidated diagram description as read from a file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiagramDescription {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

/// A validated architecture diagram.
///
/// # Examples
///
/// ```
/// use archgram_core::model::{Component, Connection, Diagram, Layer, Position};
///
/// let diagram = Diagram::new(
///     "Tiny",
///     vec![Layer::new(
///         "Client Layer",
///         "client",
///         Position::new(50.0, 50.0),
///         vec![Component::new("Web", "web"), Component::new("Mobile", "mobile")],
///     )],
///     vec![Connection::new("web", "mobile")],
/// )
/// .unwrap();
///
/// assert_eq!(diagram.component_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "DiagramDescription")]
pub struct Diagram {
    name: String,
    layers: Vec<Layer>,
    connections: Vec<Connection>,
}

impl Diagram {
    /// Creates a diagram, checking that every component id is non-empty and
    /// unique across all layers.
    ///
    /// Connections are not checked against the component set; an endpoint
    /// that never gets placed is reported when connections are drawn.
    pub fn new(
        name: impl Into<String>,
        layers: Vec<Layer>,
        connections: Vec<Connection>,
    ) -> Result<Self, ModelError> {
        let mut seen = HashSet::new();
        for layer in &layers {
            for component in layer.components() {
                if component.id().is_empty() {
                    return Err(ModelError::EmptyComponentId {
                        name: component.name().to_string(),
                        layer: layer.name().to_string(),
                    });
                }
                if !seen.insert(component.id()) {
                    return Err(ModelError::DuplicateComponentId {
                        id: component.id().to_string(),
                        layer: layer.name().to_string(),
                    });
                }
            }
        }

        Ok(Self {
            name: name.into(),
            layers,
            connections,
        })
    }

    /// Name used when a description does not provide one.
    pub fn default_name() -> &'static str {
        "Architecture"
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Iterates over every component in layer order.
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.layers.iter().flat_map(|layer| layer.components())
    }

    pub fn component_count(&self) -> usize {
        self.layers.iter().map(|layer| layer.components().len()).sum()
    }
}

impl TryFrom<DiagramDescription> for Diagram {
    type Error = ModelError;

    fn try_from(description: DiagramDescription) -> Result<Self, Self::Error> {
        let name = description
            .name
            .unwrap_or_else(|| Self::default_name().to_string());
        Self::new(name, description.layers, description.connections)
    }
}
