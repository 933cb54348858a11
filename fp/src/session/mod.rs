//! Session state
//!
//! Each user session owns at most one current plan and the chat transcript
//! about it. Sessions never share state.

mod state;
mod store;

pub use state::{Phase, SessionState};
pub use store::{SessionHandle, SessionStore};
