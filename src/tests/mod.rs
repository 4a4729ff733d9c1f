//! integrated tests
pub mod toolkit;

mod session;
