//! Concrete HTTP providers, one module per upstream schema.

pub mod instagram;
pub mod tiktok;
