//! Helpers shared by unit tests across the crate and by downstream test suites.

pub mod testing;
