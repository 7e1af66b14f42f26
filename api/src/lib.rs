//! Client for the PlastiScan capture backend. Everything that talks to the
//! server lives here: configuration, the session handle, the capture
//! trigger, the image poller, and the auth calls.

pub mod cancel;
pub mod client;
pub mod config;
pub mod error;
pub mod images;
pub mod session;
pub mod timing;

pub use cancel::CancelToken;
pub use client::ApiClient;
pub use config::ApiConfig;
pub use error::ApiError;
pub use images::{PollOptions, PollOutcome};
pub use session::{Session, TokenPair};
