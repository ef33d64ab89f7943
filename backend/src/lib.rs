//! User registry library modules.
//!
//! The crate follows a hexagonal layout: [`domain`] holds the user model,
//! the record store and the ports; [`inbound`] adapts HTTP requests onto the
//! driving ports; [`outbound`] implements the repository port over a JSON
//! document on disk.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::{Cors, Trace};
