use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{debug, warn};

use super::models::Video;
use crate::errors::ClientResult;

/// Monotonic time source, measured from an arbitrary origin.
pub trait Clock: Send + Sync {
    fn now(&self) -> Duration;
}

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Where the cached listing comes from.
#[async_trait]
pub trait VideoSource: Send + Sync {
    async fn list_videos(&self) -> ClientResult<Vec<Video>>;

    /// Register a new video by URL and return its id.
    async fn upload_video(&self, name: &str, url: &str) -> ClientResult<String>;
}

/// Single-slot, TTL-guarded memo of the video listing.
///
/// A failed refresh keeps the last good listing. Not synchronized: one
/// session owns it.
pub struct VideoCache<S, C = SystemClock> {
    source: S,
    clock: C,
    ttl: Duration,
    fetched_at: Option<Duration>,
    results: Vec<Video>,
}

impl<S: VideoSource> VideoCache<S, SystemClock> {
    pub fn new(source: S, ttl: Duration) -> Self {
        Self::with_clock(source, SystemClock::new(), ttl)
    }
}

impl<S: VideoSource, C: Clock> VideoCache<S, C> {
    pub fn with_clock(source: S, clock: C, ttl: Duration) -> Self {
        Self {
            source,
            clock,
            ttl,
            fetched_at: None,
            results: Vec::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn is_fresh(&self) -> bool {
        match self.fetched_at {
            Some(at) => self.clock.now().saturating_sub(at) <= self.ttl,
            None => false,
        }
    }

    /// Return the listing, refreshing it when stale. Never fails: on error the
    /// previous listing (possibly empty) is returned.
    pub async fn fetch(&mut self) -> Vec<Video> {
        if self.is_fresh() {
            debug!(count = self.results.len(), "Serving cached video list");
            return self.results.clone();
        }

        let now = self.clock.now();
        match self.source.list_videos().await {
            Ok(results) => {
                debug!(count = results.len(), "Refreshed video list");
                self.fetched_at = Some(now);
                self.results = results;
            }
            Err(e) => {
                warn!(error = %e, cached = self.results.len(), "Failed to refresh video list");
            }
        }
        self.results.clone()
    }

    /// Force the next [`VideoCache::fetch`] to go to the source.
    pub fn invalidate(&mut self) {
        self.fetched_at = None;
    }

    /// Upload through the source and invalidate on success.
    pub async fn upload(&mut self, name: &str, url: &str) -> ClientResult<String> {
        let video_id = self.source.upload_video(name, url).await?;
        self.invalidate();
        Ok(video_id)
    }
}
