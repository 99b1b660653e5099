//! Data Transfer Objects
//!
//! `transport` holds the request/reply pair exchanged with a `Transport`
//! implementation. `rest` holds the JSON bodies of the REST submission gateway.

pub mod rest;
pub mod transport;
