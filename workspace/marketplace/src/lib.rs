//! Core of the listing marketplace.
//!
//! Every operation takes the acting user explicitly and checks the
//! authorization policy before writing anything.

pub mod actor;
pub mod dashboard;
pub mod error;
pub mod images;
pub mod listings;
pub mod moderation;
pub mod policy;
pub mod search;
pub mod users;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use actor::Actor;
pub use error::{FieldErrors, MarketplaceError, Result};
pub use images::{ImageStore, ImageUpload};
pub use listings::ListingDetails;
pub use validation::PropertyForm;
