use async_trait::async_trait;
use rand::{Rng, RngCore};

use crate::application::errors::StorageError;
use crate::domain::entities::Quote;

/// Store trait - named lists of quotes over a key-value engine
#[async_trait]
pub trait BucketStore: Send + Sync {
    /// Append a quote, creating the bucket on first write
    async fn append(&self, bucket: &str, quote: &str) -> Result<(), StorageError>;

    /// All quotes in insertion order. A bucket that resolves to no quotes
    /// is removed before returning; an absent bucket is not an error.
    async fn read_all(&self, bucket: &str) -> Result<Vec<Quote>, StorageError>;

    /// Names of every persisted bucket
    async fn bucket_names(&self) -> Result<Vec<String>, StorageError>;

    /// One quote chosen uniformly from the bucket, or the empty quote when
    /// there is nothing to choose from.
    async fn pick_random(
        &self,
        bucket: &str,
        rng: &mut (dyn RngCore + Send),
    ) -> Result<Quote, StorageError> {
        let mut entries = self.read_all(bucket).await?;
        if entries.is_empty() {
            return Ok(Quote::empty());
        }
        let index = rng.gen_range(0..entries.len());
        Ok(entries.swap_remove(index))
    }

    /// Existence check. This is a real read and prunes the bucket when empty.
    async fn exists(&self, bucket: &str) -> bool {
        match self.read_all(bucket).await {
            Ok(entries) => !entries.is_empty(),
            Err(e) => {
                tracing::debug!("Probe of bucket '{}' failed: {}", bucket, e);
                false
            }
        }
    }
}
