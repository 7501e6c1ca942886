//! Unit test suite entry point.

mod catalog_tests;
mod hash_embed_tests;
