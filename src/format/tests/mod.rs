//! Unit tests for session snapshot save/load.
//!
//! These tests verify snapshot validation, JSON parsing, and that a saved
//! session reproduces identical measurements when loaded.

mod roundtrip_tests;
