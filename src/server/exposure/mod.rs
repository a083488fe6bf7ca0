//! API exposures
//!
//! An exposure consumes an `AppHost` and produces a router for its protocol.

pub mod rest;

pub use rest::RestExposure;
