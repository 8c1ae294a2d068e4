use crate::pacer::Pacer;
use parking_lot::Mutex;
use reqwest::{header, Client};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;
use url::Url;

/// Allow/Disallow rules of the `*` group of a robots.txt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RobotsRules {
    allows: Vec<String>,
    disallows: Vec<String>,
}

impl RobotsRules {
    pub fn parse(txt: &str) -> Self {
        // minimal parser for the '*' group
        let mut active = false;
        let mut rules = RobotsRules::default();
        for line in txt.lines() {
            let l = line.trim();
            if l.is_empty() || l.starts_with('#') { continue; }
            if let Some((k, v)) = l.split_once(':') {
                let key = k.trim().to_lowercase();
                let val = v.trim();
                match key.as_str() {
                    "user-agent" => { active = val == "*"; }
                    "allow" if active && !val.is_empty() => rules.allows.push(val.to_string()),
                    "disallow" if active && !val.is_empty() => rules.disallows.push(val.to_string()),
                    _ => {}
                }
            }
        }
        rules
    }

    /// Longest matching rule wins; Allow wins a tie.
    pub fn allows(&self, path: &str) -> bool {
        let longest = |rules: &[String]| rules.iter().filter(|r| path.starts_with(r.as_str())).map(String::len).max();
        match (longest(self.allows.as_slice()), longest(self.disallows.as_slice())) {
            (Some(a), Some(d)) => a >= d,
            (_, None) => true,
            (None, Some(_)) => false,
        }
    }
}

/// robots.txt rules per origin, fetched once on first use.
#[derive(Debug, Default)]
pub struct RobotsCache {
    origins: Mutex<HashMap<String, Arc<OnceCell<RobotsRules>>>>,
}

impl RobotsCache {
    pub fn new() -> Self { Self::default() }

    /// The first lookup for an origin downloads its robots.txt; concurrent
    /// lookups wait for that single request. With a `pacer`, the download takes
    /// a slot of the origin and the caller's own request waits for the next one.
    pub async fn allowed(&self, client: &Client, url: &Url, user_agent: &str, pacer: Option<&Pacer>) -> bool {
        if url.host_str().is_none() {
            return false;
        }
        let origin = url.origin().ascii_serialization();
        let cell = self.origins.lock().entry(origin.clone()).or_default().clone();
        let rules = cell.get_or_init(|| fetch_rules(client, &origin, user_agent, pacer)).await;
        rules.allows(url.path())
    }
}

async fn fetch_rules(client: &Client, origin: &str, user_agent: &str, pacer: Option<&Pacer>) -> RobotsRules {
    let robots_url = format!("{origin}/robots.txt");
    // A missing or unreadable robots.txt allows everything.
    let txt = match client.get(&robots_url).header(header::USER_AGENT, user_agent).send().await {
        Ok(resp) if resp.status().is_success() => resp.text().await.unwrap_or_default(),
        _ => String::new(),
    };
    tracing::debug!(origin, bytes = txt.len(), "fetched robots.txt");
    if let Some(pacer) = pacer {
        pacer.pace(origin).await;
    }
    RobotsRules::parse(&txt)
}
