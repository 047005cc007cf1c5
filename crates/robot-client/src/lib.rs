//! robot-client: fleet robot catalogs and dispatch
//!
//! This crate provides the blocking [`RobotClient`] capability used by the intent
//! pipeline: listing the positions and missions a robot knows about, and queueing
//! navigation or mission runs. The default build enables a `mock` backend so that
//! binaries and tests work without a robot on the network; `mir-http` adds the
//! REST backend for MiR robots.

mod types;
pub use types::{Catalog, CatalogEntry, Catalogs};

mod error;
pub use error::{ClientError, Result};

mod config;
pub use config::{load_fleet_config, FleetConfig, RobotProfile};

mod traits;
pub use traits::RobotClient;

#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "mock")]
pub use mock::{MockCall, MockRobot};

#[cfg(feature = "mir-http")]
mod mir_http;
#[cfg(feature = "mir-http")]
pub use mir_http::MirHttpClient;
