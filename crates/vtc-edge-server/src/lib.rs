//! Serves the dashboard and keeps unauthenticated navigations away from
//! protected pages before any of the dashboard is loaded

#![warn(unused_crate_dependencies)]

mod configuration;
pub mod guard;
mod middleware;
mod routes;
pub mod startup;

use tokio as _; // Only used by the binary


pub use configuration::{
    get_configuration, ApplicationSettings, Configuration, NavigationSettings, UnlistedPolicy,
};
pub use guard::{GuardDecision, NavigationGuard, PathClass};
