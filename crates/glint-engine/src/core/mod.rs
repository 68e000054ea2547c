//! Host-facing application contract.

mod app;

pub use app::{App, Directive};
