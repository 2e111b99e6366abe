//! Post storage.

mod memory;

#[cfg(feature = "mongodb")]
mod connections;
#[cfg(feature = "mongodb")]
mod document;
#[cfg(feature = "mongodb")]
pub mod filter;
#[cfg(feature = "mongodb")]
mod mongo_repo;

pub use memory::InMemoryPostRepository;

#[cfg(feature = "mongodb")]
pub use connections::{MongoConfig, MongoPool};
#[cfg(feature = "mongodb")]
pub use document::PostDocument;
#[cfg(feature = "mongodb")]
pub use mongo_repo::MongoPostRepository;
