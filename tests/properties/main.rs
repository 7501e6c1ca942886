//! Property test suite entry point.

mod determinism_tests;
mod engine_properties;
