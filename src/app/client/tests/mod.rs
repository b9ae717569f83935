//! Tests for the Reddit client against local HTTP fixtures
//!
//! Fixtures are served by `wiremock`; request pacing and backoff units are
//! shrunk so the suites run quickly while keeping the same behavior.

pub mod fixtures;
mod real_authentication;
