//! Core HTTP operations with rate limiting
//!
//! Every request is paced through a shared rate limiter and made exactly
//! once; callers decide what a failed attempt means for them.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::{clock::DefaultClock, state::InMemoryState, Jitter, Quota, RateLimiter};
use reqwest::Client;
use url::Url;

type DirectLimiter = RateLimiter<governor::state::NotKeyed, InMemoryState, DefaultClock>;

/// HTTP operations handler shared by listing and retrieval
#[derive(Debug)]
pub struct HttpHandler {
    client: Client,
    rate_limiter: DirectLimiter,
}

impl HttpHandler {
    /// Creates a new HttpHandler pacing requests at `rate_limit_rps`
    ///
    /// A zero rate is raised to one request per second.
    pub fn new(client: Client, rate_limit_rps: u32) -> Self {
        Self {
            client,
            rate_limiter: Self::build_rate_limiter(rate_limit_rps),
        }
    }

    fn build_rate_limiter(rate_limit_rps: u32) -> DirectLimiter {
        let rps = NonZeroU32::new(rate_limit_rps).unwrap_or(NonZeroU32::MIN);
        RateLimiter::direct(Quota::per_second(rps))
    }

    /// Issue one rate-limited GET
    ///
    /// Non-success statuses are returned as responses, not errors.
    pub async fn get(&self, url: &Url) -> reqwest::Result<reqwest::Response> {
        self.rate_limiter
            .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(50)))
            .await;

        let response = self.client.get(url.as_str()).send().await?;
        tracing::debug!("GET {} -> {}", url, response.status());
        Ok(response)
    }

    /// Get a reference to the underlying HTTP client
    pub fn client(&self) -> &Client {
        &self.client
    }
}
