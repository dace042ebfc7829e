//! Execution engine: CPU feature detection and kernel selection.

pub mod dispatcher;
