//! Core types and traits for the unfurl media short-link service.
//!
//! This crate provides the shared vocabulary used by the resolver pool,
//! the link store implementations, and the resolution service: short
//! identifiers, platform detection, the canonical media descriptor, and
//! the persistence trait.

pub mod descriptor;
pub mod error;
pub mod platform;
pub mod short_id;
pub mod store;

pub use descriptor::{AssetKind, EngagementStats, MediaDescriptor, ProviderPayload};
pub use error::{CoreError, StorageError};
pub use platform::Platform;
pub use short_id::ShortId;
pub use store::{LinkRecord, LinkStore};
