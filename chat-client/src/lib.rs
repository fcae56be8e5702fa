//! Chat client for the AI tutor.
//!
//! Holds one tutoring session, sends messages through a [`ChatTransport`] and
//! records the replies as chat turns.

pub mod controller;
pub mod error;
pub mod session;
pub mod transport;

pub use controller::{ChatController, SendOutcome};
pub use error::ClientError;
pub use session::{ChatTurn, SessionState, ERROR_REPLY, GRADES, SUBJECTS};
pub use transport::{ChatTransport, HttpTransport};
