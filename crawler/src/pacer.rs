use crate::cancel::CancelToken;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::{sleep_until, Instant};
use url::Url;

/// Hands out fetch slots per origin, at least `interval` apart, to every worker
/// that shares it.
#[derive(Debug)]
pub struct Pacer {
    interval: Duration,
    next_slot: Mutex<HashMap<String, Instant>>,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self { interval, next_slot: Mutex::new(HashMap::new()) }
    }

    pub fn interval(&self) -> Duration { self.interval }

    /// Reserve the next slot for `origin` and sleep until it. Returns `false`
    /// when cancelled first; the caller must then skip its fetch.
    pub async fn wait(&self, origin: &str, cancel: &CancelToken) -> bool {
        if cancel.is_cancelled() {
            return false;
        }
        let slot = self.reserve(origin);
        if slot > Instant::now() {
            tracing::debug!(origin, wait_ms = (slot - Instant::now()).as_millis() as u64, "politeness wait");
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return false,
                _ = sleep_until(slot) => {}
            }
        }
        !cancel.is_cancelled()
    }

    /// Like [`wait`](Self::wait), for requests that are not the crawl's own
    /// (robots.txt) but still count against the origin.
    pub async fn pace(&self, origin: &str) {
        sleep_until(self.reserve(origin)).await;
    }

    fn reserve(&self, origin: &str) -> Instant {
        let mut slots = self.next_slot.lock();
        let now = Instant::now();
        let slot = slots.get(origin).copied().filter(|s| *s > now).unwrap_or(now);
        slots.insert(origin.to_owned(), slot + self.interval);
        slot
    }
}

/// Scheme, host and port of an address; the address itself if it does not parse.
pub fn origin_of(address: &str) -> String {
    match Url::parse(address) {
        Ok(u) => u.origin().ascii_serialization(),
        Err(_) => address.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn spaces_fetches_to_one_origin() {
        let pacer = Pacer::new(Duration::from_secs(1));
        let cancel = CancelToken::new();
        let start = Instant::now();
        for _ in 0..3 {
            assert!(pacer.wait("https://en.wikipedia.org", &cancel).await);
        }
        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn pace_shares_slots_with_wait() {
        let pacer = Pacer::new(Duration::from_secs(1));
        let cancel = CancelToken::new();
        let start = Instant::now();
        assert!(pacer.wait("https://en.wikipedia.org", &cancel).await);
        pacer.pace("https://en.wikipedia.org").await;
        assert!(start.elapsed() >= Duration::from_secs(1));
        assert!(pacer.wait("https://en.wikipedia.org", &cancel).await);
        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn origins_are_paced_independently() {
        let pacer = Pacer::new(Duration::from_secs(5));
        let cancel = CancelToken::new();
        let start = Instant::now();
        assert!(pacer.wait("https://a.example", &cancel).await);
        assert!(pacer.wait("https://b.example", &cancel).await);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_interrupts_wait() {
        let pacer = std::sync::Arc::new(Pacer::new(Duration::from_secs(60)));
        let cancel = CancelToken::new();
        assert!(pacer.wait("https://en.wikipedia.org", &cancel).await);

        let (p, c) = (pacer.clone(), cancel.clone());
        let pending = tokio::spawn(async move { p.wait("https://en.wikipedia.org", &c).await });
        tokio::time::sleep(Duration::from_secs(1)).await;
        cancel.cancel();
        assert!(!pending.await.unwrap());
    }

    #[test]
    fn origin_ignores_path() {
        assert_eq!(origin_of("https://en.wikipedia.org/wiki/Nile#x"), "https://en.wikipedia.org");
        assert_eq!(origin_of("not a url"), "not a url");
    }
}
