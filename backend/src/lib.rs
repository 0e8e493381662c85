//! Diary register backend library.
//!
//! Layered hexagonally: [`domain`] owns the register semantics and ports,
//! [`inbound`] adapts HTTP onto the driving ports, [`outbound`] implements
//! the repository ports with Diesel/PostgreSQL, and [`middleware`] carries
//! the cross-cutting request plumbing.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Request-tracing middleware applied to every route.
pub use middleware::Trace;
/// Request-scoped trace identifier.
pub use domain::TraceId;
