//! Stencil Core Types and Definitions
//!
//! This crate provides the foundation that Stencil shapes are drawn with:
//!
//! - **Geometry**: Points, sizes and bounding boxes ([`geometry`] module)
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Draw**: Primitives, the [`draw::Surface`] trait, text measurement and
//!   SVG output ([`draw`] module)

pub mod color;
pub mod draw;
pub mod geometry;
