//! End-to-end tests.
//!
//! These tests drive the session holder against the in-memory provider and
//! against the REST adapter talking to a local fake of the identity service.

mod common;
mod forms_to_routes;
mod rest_provider;
mod session_flows;
