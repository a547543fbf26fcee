//! Storage collection holding the segment logs and the rolled-up report.
//!
//! [`ObjectStore`] is the seam the pipeline talks to.
//! [`LocalStore`] serves a directory on disk, [`S3Store`] a bucket prefix.

mod local;
mod s3;

pub use local::LocalStore;
pub use s3::S3Store;

use anyhow::Result;

/// A flat collection of named objects.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Returns the names of every object in the collection.
    async fn list_names(&self) -> Result<Vec<String>>;

    /// Reads an object's full content. `Ok(None)` means the object does not exist.
    async fn read(&self, name: &str) -> Result<Option<Vec<u8>>>;

    /// Creates or overwrites an object with a text payload.
    async fn write_text(&self, name: &str, text: &str) -> Result<()>;
}
