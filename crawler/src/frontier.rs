use std::collections::{HashSet, VecDeque};
use url::Url;

/// Canonical form used for dedup: a parsed absolute URL without its fragment.
/// Query strings and trailing slashes are kept, so those variants stay distinct.
pub fn canonicalize(address: &str) -> Option<String> {
    let mut u = Url::parse(address.trim()).ok()?;
    u.set_fragment(None);
    Some(u.into())
}

/// Breadth-first work queue over canonical addresses.
///
/// An address moves queued -> in flight -> visited (or failed), and once it has
/// been seen in any of those states it is never queued again.
#[derive(Debug)]
pub struct Frontier {
    allowed_prefix: String,
    queue: VecDeque<String>,
    queued: HashSet<String>,
    in_flight: HashSet<String>,
    visited: HashSet<String>,
    failed: HashSet<String>,
    out_of_scope: usize,
}

impl Frontier {
    pub fn new(allowed_prefix: impl Into<String>) -> Self {
        Self {
            allowed_prefix: allowed_prefix.into(),
            queue: VecDeque::new(),
            queued: HashSet::new(),
            in_flight: HashSet::new(),
            visited: HashSet::new(),
            failed: HashSet::new(),
            out_of_scope: 0,
        }
    }

    pub fn in_scope(&self, address: &str) -> bool { address.starts_with(&self.allowed_prefix) }

    fn is_known(&self, address: &str) -> bool {
        self.queued.contains(address)
            || self.in_flight.contains(address)
            || self.visited.contains(address)
            || self.failed.contains(address)
    }

    /// Queue `address` unless it is out of scope or already known. Returns whether it was queued.
    pub fn push(&mut self, address: &str) -> bool {
        let Some(address) = canonicalize(address).filter(|a| self.in_scope(a)) else {
            self.out_of_scope += 1;
            tracing::debug!(address, "out of scope");
            return false;
        };
        if self.is_known(&address) {
            return false;
        }
        self.queued.insert(address.clone());
        self.queue.push_back(address);
        true
    }

    /// Dequeue the next address and mark it in flight in one step.
    pub fn claim(&mut self) -> Option<String> {
        while let Some(address) = self.queue.pop_front() {
            self.queued.remove(&address);
            if self.visited.contains(&address) || self.in_flight.contains(&address) || !self.in_scope(&address) {
                continue;
            }
            self.in_flight.insert(address.clone());
            return Some(address);
        }
        None
    }

    /// The fetch of a claimed address produced a document.
    pub fn complete(&mut self, address: &str) {
        self.in_flight.remove(address);
        self.visited.insert(address.to_string());
    }

    /// The fetch of a claimed address failed; it is not retried this run.
    pub fn abandon(&mut self, address: &str) {
        self.in_flight.remove(address);
        self.failed.insert(address.to_string());
    }

    pub fn is_visited(&self, address: &str) -> bool { self.visited.contains(address) }

    /// Addresses still waiting in the queue.
    pub fn len(&self) -> usize { self.queue.len() }

    pub fn is_empty(&self) -> bool { self.queue.is_empty() }

    pub fn in_flight(&self) -> usize { self.in_flight.len() }

    pub fn visited(&self) -> usize { self.visited.len() }

    pub fn out_of_scope(&self) -> usize { self.out_of_scope }
}
