//! Integration tests
//!
//! These tests use wiremock to stand up mock HTTP servers and drive the
//! fetcher, retry executor, limiter and dispatcher end to end.

mod dispatch_tests;
mod fetch_tests;
