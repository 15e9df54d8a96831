//! Link resolution orchestration.
//!
//! Ties the resolver pool, the link store, and the id allocator together
//! behind [`LinkResolutionService`], and hosts the pure redirect
//! negotiation rule.

pub mod allocator;
pub mod error;
pub mod negotiator;
pub mod service;

pub use allocator::{IdGenerator, RandomIdGenerator};
pub use error::ServiceError;
pub use negotiator::{negotiate, Negotiation, RequestContext};
pub use service::{CreatedLink, LinkResolutionService, LinkResolver, ResolvedLink, ServiceSettings};
