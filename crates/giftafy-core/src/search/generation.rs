//! Request-generation tokens for overlapping searches.
//!
//! Every search begins a new generation, which cancels the previous one. A
//! results view only accepts an outcome stamped with the latest generation,
//! so a slow response can never overwrite a newer one.

use std::sync::Mutex;

use tokio_util::sync::CancellationToken;

#[derive(Debug, Default)]
struct GenerationState {
    latest: u64,
    token: CancellationToken,
}

/// Issues monotonically increasing search generations.
#[derive(Debug, Default)]
pub struct SearchGeneration {
    state: Mutex<GenerationState>,
}

impl SearchGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation, cancelling the one in flight.
    pub fn begin(&self) -> SearchTicket {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.token.cancel();
        state.latest += 1;
        state.token = CancellationToken::new();

        tracing::debug!(generation = state.latest, "search generation started");
        SearchTicket {
            generation: state.latest,
            token: state.token.clone(),
        }
    }

    /// The most recently issued generation (0 before any search).
    pub fn latest(&self) -> u64 {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).latest
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.latest() == generation
    }
}

/// Handle for one search generation.
#[derive(Debug, Clone)]
pub struct SearchTicket {
    generation: u64,
    token: CancellationToken,
}

impl SearchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once a newer generation has started.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generations_increase() {
        let generations = SearchGeneration::new();
        assert_eq!(generations.latest(), 0);

        let first = generations.begin();
        let second = generations.begin();
        assert_eq!(first.generation(), 1);
        assert_eq!(second.generation(), 2);
        assert!(generations.is_current(2));
        assert!(!generations.is_current(1));
    }

    #[test]
    fn test_begin_cancels_previous() {
        let generations = SearchGeneration::new();
        let first = generations.begin();
        assert!(!first.is_cancelled());

        let second = generations.begin();
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_future_resolves() {
        let generations = SearchGeneration::new();
        let first = generations.begin();
        let waiter = tokio::spawn(async move { first.cancelled().await });
        generations.begin();
        tokio::time::timeout(std::time::Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
    }
}
