//! # Binary Test Suite
//!
//! Tests for the command line layer: argument parsing and the location
//! resolution flow. The library crate carries its own unit tests next to
//! each module.
