//! Endpoint tests against the in-memory store

mod admin_api_tests;
