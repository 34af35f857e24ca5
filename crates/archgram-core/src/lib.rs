//! Archgram Core Types and Definitions
//!
//! This crate provides the foundational types for archgram, a generator for
//! layered architecture diagrams. It includes:
//!
//! - **Identifiers**: Interned component identifiers ([`identifier::Id`])
//! - **Colors**: Color handling with CSS and RGBA support ([`color::Color`])
//! - **Geometry**: Points, sizes, bounds and anchors ([`geometry`] module)
//! - **Draw**: Visual definitions for fills, strokes, shadows and text ([`draw`] module)
//! - **Model**: The diagram description of layers, components and connections ([`model`] module)

pub mod color;
pub mod draw;
pub mod geometry;
pub mod identifier;
pub mod model;
