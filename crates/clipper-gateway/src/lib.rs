//! HTTP adapter for the Clipper URL shortener.
//!
//! The router only translates between HTTP and [`clipper_core::Shortener`];
//! every decision about URLs and slugs is made by the service behind it.

pub mod app;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use state::AppState;
