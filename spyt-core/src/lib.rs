//! SPYT Core
//!
//! Core types shared by the submission client and the launcher.
//!
//! This crate contains:
//! - Domain types: job descriptors, submission identifiers and the job state machine
//! - DTOs: the request/reply pair crossing the transport boundary and the REST bodies
//!   spoken by the HTTP transport

pub mod domain;
pub mod dto;
