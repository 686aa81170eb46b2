//! HTTP front end for slackinviter.
//!
//! Serves the invite form, accepts submissions, renders the member-count
//! badge, and exposes counters at `/debug/vars`. All request handlers read
//! shared state through [`AppState`]; the directory sync runs beside the
//! server as a separate task (see `slackinviter_core::Syncer`).

pub mod app;
pub mod badge;
pub mod cli;
pub mod error;
pub mod middleware;
pub mod render;
pub mod routes;
pub mod shutdown;
pub mod state;

pub use app::build_router;
pub use state::{AppState, SiteSettings};
