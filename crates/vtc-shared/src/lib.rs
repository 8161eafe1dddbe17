//! Code shared between the dashboard, its client core and the edge server

#![warn(unused_crate_dependencies)]

pub mod const_config;
pub mod envelope;
pub mod errors;
pub mod id;
mod macros;
pub mod req_args;
pub mod resource;
pub mod token;
pub mod uac;

#[cfg(not(target_arch = "wasm32"))]
pub mod telemetry;
