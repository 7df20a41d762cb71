use std::time::Duration;

use chrono::Utc;
use rand::{rngs::StdRng, Rng, SeedableRng};
use shared::{domain::StatusTriple, error::StatusFailure};
use tracing::{info, warn};

use crate::{
    backoff::Backoff,
    sheet::{cache_busted_url, extract_statuses, SheetSource},
    transport::{HttpTransport, SheetTransport},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollerConfig {
    /// Wait between successful polls.
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub backoff: Backoff,
    /// Consecutive failures that switch the board to the embedded sheet.
    /// Zero disables fallback.
    pub fallback_threshold: u32,
    pub cache_bust: bool,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            request_timeout: Duration::from_secs(3),
            backoff: Backoff::default(),
            fallback_threshold: 5,
            cache_bust: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackTransition {
    Engaged,
    Cleared,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PollReport {
    pub result: Result<StatusTriple, StatusFailure>,
    pub next_delay: Duration,
    pub transition: Option<FallbackTransition>,
    pub consecutive_failures: u32,
}

impl PollReport {
    /// The triple to display: the fetched values, or ERROR across the board.
    pub fn statuses(&self) -> StatusTriple {
        match &self.result {
            Ok(triple) => *triple,
            Err(_) => StatusTriple::error(),
        }
    }
}

pub struct StatusPoller<T, R = StdRng> {
    transport: T,
    source: SheetSource,
    config: PollerConfig,
    rng: R,
    consecutive_failures: u32,
    in_fallback: bool,
}

impl StatusPoller<HttpTransport, StdRng> {
    pub fn http(source: SheetSource, config: PollerConfig) -> Result<Self, StatusFailure> {
        let transport = HttpTransport::new(config.request_timeout)?;
        Ok(Self::with_rng(
            transport,
            source,
            config,
            StdRng::from_entropy(),
        ))
    }
}

impl<T: SheetTransport, R: Rng> StatusPoller<T, R> {
    pub fn with_rng(transport: T, source: SheetSource, config: PollerConfig, rng: R) -> Self {
        Self {
            transport,
            source,
            config,
            rng,
            consecutive_failures: 0,
            in_fallback: false,
        }
    }

    pub fn source(&self) -> &SheetSource {
        &self.source
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn is_in_fallback(&self) -> bool {
        self.in_fallback
    }

    pub fn embed_url(&self) -> String {
        self.source.embed_url()
    }

    /// Points the poller at a new sheet. Failure history belongs to the old
    /// source, so it is dropped; leaving fallback is reported.
    pub fn set_source(&mut self, source: SheetSource) -> Option<FallbackTransition> {
        self.source = source;
        self.consecutive_failures = 0;
        if std::mem::take(&mut self.in_fallback) {
            Some(FallbackTransition::Cleared)
        } else {
            None
        }
    }

    pub async fn poll(&mut self) -> Result<StatusTriple, StatusFailure> {
        self.poll_cycle().await.result
    }

    /// One fetch plus the bookkeeping that decides the next wait and any
    /// fallback switch.
    pub async fn poll_cycle(&mut self) -> PollReport {
        let result = self.fetch_statuses().await;

        let (next_delay, transition) = match &result {
            Ok(triple) => {
                if self.consecutive_failures > 0 {
                    info!(
                        failures = self.consecutive_failures,
                        statuses = %triple,
                        "status poll recovered"
                    );
                }
                self.consecutive_failures = 0;
                let transition = if std::mem::take(&mut self.in_fallback) {
                    info!("leaving fallback mode");
                    Some(FallbackTransition::Cleared)
                } else {
                    None
                };
                (self.config.poll_interval, transition)
            }
            Err(failure) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                let delay = self
                    .config
                    .backoff
                    .delay(self.consecutive_failures, &mut self.rng);
                warn!(
                    kind = ?failure.kind,
                    error = %failure.message,
                    failures = self.consecutive_failures,
                    retry_in_ms = delay.as_millis() as u64,
                    "status poll failed"
                );

                let threshold = self.config.fallback_threshold;
                let transition = if threshold > 0
                    && self.consecutive_failures == threshold
                    && !self.in_fallback
                {
                    self.in_fallback = true;
                    warn!(
                        threshold,
                        embed_url = %self.source.embed_url(),
                        "engaging fallback mode"
                    );
                    Some(FallbackTransition::Engaged)
                } else {
                    None
                };
                (delay, transition)
            }
        };

        PollReport {
            result,
            next_delay,
            transition,
            consecutive_failures: self.consecutive_failures,
        }
    }

    async fn fetch_statuses(&self) -> Result<StatusTriple, StatusFailure> {
        if self.source.url.trim().is_empty() {
            return Err(StatusFailure::invalid_input("no sheet link configured"));
        }

        let cells = self.source.cells.resolve()?;
        let url = if self.config.cache_bust {
            cache_busted_url(&self.source.url, Utc::now().timestamp_millis())?
        } else {
            self.source.url.trim().to_string()
        };

        let body = self.transport.fetch_csv(&url).await?;
        extract_statuses(&body, &cells)
    }
}

#[cfg(test)]
#[path = "tests/poller_tests.rs"]
mod tests;
