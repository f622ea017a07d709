//! Integration tests for Title-Scout
//!
//! These tests use wiremock to create mock HTTP servers and raw TCP
//! listeners to simulate unreachable and unresponsive peers.

mod fetcher_tests;
