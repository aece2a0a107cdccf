//! External collaborators, reachable only through their request/response
//! contracts: blob storage, the identity directory, and the managed
//! search index.
//!
//! Every outbound client here carries an explicit timeout; a hung
//! dependency degrades a request, it never hangs it.

pub mod admin;
pub mod blob;
pub mod directory;
pub mod search_index;

pub use admin::{resolve_is_admin, AdminResolution};
pub use blob::{BlobError, BlobStore, InMemoryBlobStore, S3BlobStore};
pub use directory::{DirectoryApi, DirectoryError, DirectoryUser, GraphDirectory};
pub use search_index::{SearchIndexClient, SearchIndexConfig, SearchIndexDoc};
