//! The session engine and what feeds it.

pub mod event;
pub mod library;
pub mod session;
