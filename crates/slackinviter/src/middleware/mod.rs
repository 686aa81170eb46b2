// HTTP middleware
pub mod client_addr;
pub mod https;
pub mod session;

pub use client_addr::*;
pub use https::*;
pub use session::*;
