use async_trait::async_trait;
use tracing::debug;

use crate::browser::DocumentPage;

/// Outcome of one strategy against the live page.
#[derive(Debug, Clone, PartialEq)]
pub enum Attempt<T> {
    Succeeded(T),
    NotApplicable(String),
}

#[async_trait]
pub trait Strategy: Send + Sync {
    type Output: Send;

    fn name(&self) -> &'static str;

    async fn attempt(&self, page: &dyn DocumentPage) -> Attempt<Self::Output>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Success<T> {
    pub strategy: &'static str,
    pub value: T,
}

/// Strategies tried in order until one succeeds.
pub struct Ranked<T> {
    strategies: Vec<Box<dyn Strategy<Output = T>>>,
}

impl<T: Send> Ranked<T> {
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    pub fn then(mut self, strategy: impl Strategy<Output = T> + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub async fn run(&self, page: &dyn DocumentPage) -> Option<Success<T>> {
        for strategy in &self.strategies {
            match strategy.attempt(page).await {
                Attempt::Succeeded(value) => {
                    debug!(strategy = strategy.name(), "strategy succeeded");
                    return Some(Success {
                        strategy: strategy.name(),
                        value,
                    });
                }
                Attempt::NotApplicable(reason) => {
                    debug!(strategy = strategy.name(), %reason, "strategy not applicable");
                }
            }
        }
        None
    }
}

impl<T: Send> Default for Ranked<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::fake::FakePage;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Fixed {
        name: &'static str,
        result: Option<u32>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Strategy for Fixed {
        type Output = u32;

        fn name(&self) -> &'static str {
            self.name
        }

        async fn attempt(&self, _page: &dyn DocumentPage) -> Attempt<u32> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.result {
                Some(v) => Attempt::Succeeded(v),
                None => Attempt::NotApplicable("nothing here".into()),
            }
        }
    }

    #[tokio::test]
    async fn first_success_wins_and_later_strategies_are_not_run() {
        let calls = Arc::new(AtomicUsize::new(0));
        let ranked = Ranked::new()
            .then(Fixed { name: "a", result: None, calls: calls.clone() })
            .then(Fixed { name: "b", result: Some(7), calls: calls.clone() })
            .then(Fixed { name: "c", result: Some(9), calls: calls.clone() });

        let page = FakePage::new(|_| None);
        let success = ranked.run(&page).await.unwrap();

        assert_eq!(success, Success { strategy: "b", value: 7 });
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn exhausted_ranking_yields_none() {
        let calls = Arc::new(AtomicUsize::new(0));
        let ranked = Ranked::new()
            .then(Fixed { name: "a", result: None, calls: calls.clone() })
            .then(Fixed { name: "b", result: None, calls: calls.clone() });

        let page = FakePage::new(|_| None);
        assert!(ranked.run(&page).await.is_none());
        assert_eq!(ranked.names(), vec!["a", "b"]);
    }
}
