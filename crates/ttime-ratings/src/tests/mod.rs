//! Consolidated tests for the rating subsystem.

mod builtin;
mod loader;
