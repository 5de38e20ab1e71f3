//! Client for the external trivia service.

use std::time::Duration;

use crate::models::RawClues;

/// Failure reaching or decoding the external trivia service. A single
/// request is made per batch; the caller decides whether to try again.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("trivia source unavailable: {0}")]
    Unavailable(#[from] reqwest::Error),
}

/// The seam between the assembly engine and the outside world. Batches come
/// back as-is: possibly short, possibly oversized, possibly with null values
/// or duplicates.
#[cfg_attr(test, mockall::automock)]
pub trait TriviaSource: Send + Sync {
    fn fetch_batch(
        &self,
        count: usize,
    ) -> impl std::future::Future<Output = Result<RawClues, SourceError>> + Send;
}

#[derive(Clone)]
pub struct TriviaClient {
    http: reqwest::Client,
    base_url: String,
}

impl TriviaClient {
    pub fn new(base_url: String) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { http, base_url })
    }
}

impl TriviaSource for TriviaClient {
    async fn fetch_batch(&self, count: usize) -> Result<RawClues, SourceError> {
        let url = format!("{}/api/random?count={count}", self.base_url);

        let clues = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<RawClues>()
            .await?;

        tracing::debug!("fetched {} clues (requested {count})", clues.len());
        Ok(clues)
    }
}
