//! Complementary product recommendations for storefront widgets.
//!
//! Each `POST /get-recommendations` call pulls a fresh catalog from the
//! storefront, weighs the visitor's view/click history, and returns up to
//! three products to show next to the one being viewed.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
