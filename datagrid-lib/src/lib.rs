//! Data grid state and render-cycle engine
//!
//! Owns the configuration, column schema, sort/filter/pagination state and
//! the fetch/rebuild cycle of a paged data grid. Each completed fetch yields
//! a fresh [`render::RenderTree`] built from [`tabledom`] elements. Rows come
//! from a [`source::DataSource`]; column preferences persist through a
//! [`store::ColumnStore`].

pub mod actions;
pub mod column;
pub mod error;
pub mod filter;
pub mod options;
pub mod pagination;
pub mod render;
pub mod result;
pub mod sort;
pub mod source;
pub mod store;

mod grid;

pub use grid::*;
