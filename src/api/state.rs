//! Shared state for the plan API.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::ConfigLoader;

/// State handed to every plan request.
///
/// Holds the loaded configuration and an optional server-wide seed. Clones
/// share the same configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Shared>,
}

struct Shared {
    config: ConfigLoader,
    default_seed: Option<u64>,
}

impl AppState {
    /// State over `config`; requests without a seed draw from entropy.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            inner: Arc::new(Shared {
                config,
                default_seed: None,
            }),
        }
    }

    /// State whose requests fall back to `seed` when they carry none, so
    /// that repeated requests produce the same subsets.
    pub fn with_default_seed(config: ConfigLoader, seed: u64) -> Self {
        Self {
            inner: Arc::new(Shared {
                config,
                default_seed: Some(seed),
            }),
        }
    }

    /// The loaded configuration.
    pub fn config(&self) -> &ConfigLoader {
        &self.inner.config
    }

    /// The server-wide seed, if any.
    pub fn default_seed(&self) -> Option<u64> {
        self.inner.default_seed
    }

    /// Random source for one request: the request's seed, else the
    /// server-wide seed, else entropy.
    pub fn rng_for(&self, requested: Option<u64>) -> StdRng {
        match requested.or(self.inner.default_seed) {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn config() -> ConfigLoader {
        ConfigLoader::load("./config/default").unwrap()
    }

    #[test]
    fn test_app_state_can_back_a_router() {
        fn assert_state<T: Clone + Send + Sync + 'static>() {}
        assert_state::<AppState>();
    }

    #[test]
    fn test_clones_share_configuration() {
        let state = AppState::new(config());
        let clone = state.clone();
        assert!(std::ptr::eq(state.config(), clone.config()));
        assert_eq!(clone.config().allocation().daily_minutes, 480);
    }

    #[test]
    fn test_request_seed_wins_over_default() {
        let state = AppState::with_default_seed(config(), 1);
        let from_request: u64 = state.rng_for(Some(2)).r#gen();
        let expected: u64 = StdRng::seed_from_u64(2).r#gen();
        assert_eq!(from_request, expected);
    }

    #[test]
    fn test_default_seed_is_used_when_request_has_none() {
        let state = AppState::with_default_seed(config(), 5);
        assert_eq!(state.default_seed(), Some(5));
        let first: u64 = state.rng_for(None).r#gen();
        let second: u64 = state.rng_for(None).r#gen();
        assert_eq!(first, second);
    }
}
