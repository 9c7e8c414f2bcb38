//! Fan-out over many providers with an ordered merge.
//!
//! A [`Registry`] is itself a [`RateProvider`], so registries can be nested. Members are
//! fetched concurrently, but their results are concatenated in registration order: all
//! rates of member *i* precede those of member *i + 1*, and errors follow the same rule.
//!
//! Dropping the future returned by [`RateProvider::fetch_last`] or
//! [`RateProvider::fetch_history`] drops every member fetch still in flight.
//!
//! The registry adds errors of its own in one case: with [`RegistryOptions::timeout`] set, a
//! member that misses the deadline contributes a single [`RateError::Timeout`] in its slot.

use crate::core::{Fetched, RateError, RateProvider};
use async_trait::async_trait;
use futures::StreamExt;
use futures::future::BoxFuture;
use futures::stream;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const NAME_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryOptions {
    /// Deadline for each member fetch. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Members fetched at once. Defaults to all of them.
    pub max_concurrency: Option<usize>,
}

#[derive(Clone, Default)]
pub struct Registry {
    providers: Vec<Arc<dyn RateProvider>>,
    options: RegistryOptions,
}

#[derive(Clone, Copy)]
enum Operation {
    Last,
    History,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: RegistryOptions) -> Self {
        Self {
            providers: Vec::new(),
            options,
        }
    }

    pub fn register(&mut self, provider: Arc<dyn RateProvider>) {
        self.providers.push(provider);
    }

    pub fn with(mut self, provider: impl RateProvider + 'static) -> Self {
        self.register(Arc::new(provider));
        self
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    async fn fetch_all(&self, operation: Operation) -> Fetched {
        let limit = self
            .options
            .max_concurrency
            .unwrap_or(self.providers.len())
            .max(1);
        let timeout = self.options.timeout;
        debug!(providers = self.providers.len(), limit, "Fanning out fetch");

        let fetches: Vec<BoxFuture<'static, Fetched>> = self
            .providers
            .iter()
            .cloned()
            .map(|provider| fetch_one(provider, operation, timeout))
            .collect();
        // `buffered` yields in input order, so slot i always holds member i.
        let results: Vec<Fetched> = stream::iter(fetches).buffered(limit).collect().await;

        let mut merged = Fetched::default();
        for fetched in results {
            merged.append(fetched);
        }
        debug!(
            rates = merged.rates.len(),
            errors = merged.errors.len(),
            "Merged provider results"
        );
        merged
    }
}

fn fetch_one(
    provider: Arc<dyn RateProvider>,
    operation: Operation,
    timeout: Option<Duration>,
) -> BoxFuture<'static, Fetched> {
    Box::pin(async move {
        let fetch = async {
            match operation {
                Operation::Last => provider.fetch_last().await,
                Operation::History => provider.fetch_history().await,
            }
        };

        match timeout {
            None => fetch.await,
            Some(limit) => match tokio::time::timeout(limit, fetch).await {
                Ok(fetched) => fetched,
                Err(_) => {
                    let name = provider.name();
                    warn!(provider = %name, "Provider fetch timed out");
                    Fetched::from_error(RateError::Timeout {
                        provider: name,
                        millis: limit.as_millis(),
                    })
                }
            },
        }
    })
}

#[async_trait]
impl RateProvider for Registry {
    fn name(&self) -> String {
        self.providers
            .iter()
            .map(|p| p.name())
            .collect::<Vec<_>>()
            .join(NAME_SEPARATOR)
    }

    #[instrument(name = "RegistryFetchLast", skip(self))]
    async fn fetch_last(&self) -> Fetched {
        self.fetch_all(Operation::Last).await
    }

    #[instrument(name = "RegistryFetchHistory", skip(self))]
    async fn fetch_history(&self) -> Fetched {
        self.fetch_all(Operation::History).await
    }
}
