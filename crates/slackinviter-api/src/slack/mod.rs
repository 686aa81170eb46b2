// Slack Web API client modules
//
// Hand-written client for the handful of Slack methods the inviter needs:
// `users.list` (cursor-paginated), `team.info`, and `users.admin.invite`.
// Every response is wrapped in the `{ "ok": bool, "error": "..." }` envelope.

pub mod client;
pub mod invite;
pub mod models;
pub mod team;
pub mod users;

pub use client::{InviteEndpoint, SlackClient};
