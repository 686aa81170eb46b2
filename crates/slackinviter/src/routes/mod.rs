// HTTP routes
pub mod badge;
pub mod debug;
pub mod home;
pub mod invite;

pub use badge::*;
pub use debug::*;
pub use home::*;
pub use invite::*;

use axum::http::StatusCode;

/// Plain 404 for unknown paths and for unsupported methods on known ones.
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}
