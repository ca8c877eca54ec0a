use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moodmap_client::{MoodMapClient, UserSummary};

const DEFAULT_DELAY: Duration = Duration::from_millis(250);
const MIN_QUERY_CHARS: usize = 2;

/// Debounced user search: only the latest call within the delay window
/// reaches the backend.
pub(crate) struct UserSearchDebouncer {
    client: MoodMapClient,
    delay: Duration,
    generation: AtomicU64,
}

impl UserSearchDebouncer {
    pub(crate) fn new(client: MoodMapClient) -> Self {
        Self::with_delay(client, DEFAULT_DELAY)
    }

    pub(crate) fn with_delay(client: MoodMapClient, delay: Duration) -> Self {
        Self {
            client,
            delay,
            generation: AtomicU64::new(0),
        }
    }

    /// Returns `None` when a later call superseded this one before the
    /// delay elapsed. Queries under two characters resolve to an empty
    /// list without a request, as do failed requests.
    pub(crate) async fn search(&self, query: &str) -> Option<Vec<UserSummary>> {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return Some(Vec::new());
        }

        tokio::time::sleep(self.delay).await;
        if self.generation.load(Ordering::SeqCst) != ticket {
            tracing::debug!(query, "user search superseded");
            return None;
        }

        match self.client.search_users(query).await {
            Ok(users) => Some(users),
            Err(e) => {
                tracing::warn!(error = %e, query, "user search failed");
                Some(Vec::new())
            }
        }
    }
}
