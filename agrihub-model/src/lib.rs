//! Entity model for the AgriHub client core.
//!
//! Defines the shapes that every provider caches:
//! - [`DomainEntity`] — a crop, livestock, fishery or machine record
//! - [`DocumentEntity`] — a file-bearing document owned by a user and
//!   optionally attached to one entity or one type
//! - [`DomainType`] — a grouping that entities reference by foreign key
//! - [`User`] and [`MediaResource`] — the admin and media domains
//!
//! All of them implement [`Resource`], which is the only thing the generic
//! provider engine needs to know about an entity shape.

mod document;
mod domain;
mod entity;
mod error;
mod media;
mod resource;
mod serde_helpers;
mod user;

pub use document::{DocumentEntity, DocumentParent};
pub use domain::Domain;
pub use entity::{DomainEntity, DomainType};
pub use error::{ModelError, ModelResult};
pub use media::{MediaKind, MediaResource};
pub use resource::Resource;
pub use user::{User, UserRole};
