use async_trait::async_trait;

/// Where uploaded plant photos live. Keys are the opaque names returned by `save`.
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Store `bytes` under a fresh name ending in `.{extension}` and return the name.
    async fn save(&self, extension: &str, bytes: &[u8]) -> anyhow::Result<String>;
    async fn load(&self, key: &str) -> anyhow::Result<Vec<u8>>;
    /// Missing photos are not an error.
    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}
