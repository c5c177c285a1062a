//! Research Elements Explorer: a read-only web browser over a spreadsheet of
//! research elements.
//!
//! The sheet is loaded once at startup ([`data::loader`]), filtered per
//! request ([`data::filter`]) and rendered as HTML ([`ui`]) by the axum
//! router in [`app`].

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod export;
pub mod state;
pub mod ui;
