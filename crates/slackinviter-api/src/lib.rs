// slackinviter-api: Async clients for the Slack Web API, Google reCAPTCHA and Ory sessions

pub mod captcha;
pub mod error;
pub mod session;
pub mod slack;
pub mod transport;

pub use captcha::RecaptchaClient;
pub use error::Error;
pub use session::{Session, SessionClient};
pub use slack::{InviteEndpoint, SlackClient};
pub use transport::TransportConfig;
