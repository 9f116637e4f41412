pub mod http_fetcher;

use async_trait::async_trait;

use crate::app::Result;

/// A single outbound GET.
///
/// Implementations return the raw response body on success and an error for
/// transport failures, timeouts and non-success statuses alike. Source
/// adapters turn those errors into soft failures.
#[async_trait]
pub trait Fetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}
