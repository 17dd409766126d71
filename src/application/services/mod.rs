//! Application services, one module per use-case area.
//!
//! Each module imports only from `crate::domain` and
//! `crate::application::ports`. All I/O is routed through injected ports.

pub mod lifecycle;
pub mod reachability;
