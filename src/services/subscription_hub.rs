//! Subscription hub (C7) — process-wide route-id → subscriber fan-out.
//!
//! Sharded by route identifier so unrelated routes never contend on the
//! same mutex (spec.md §9 "Mutable in-process fan-out"). Deliveries within
//! one `broadcast` call are sequential in registration order; sinks that
//! fail to receive are pruned once the broadcast completes.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::types::RerouteResponse;

const SHARD_COUNT: usize = 16;

/// A registered delivery target for a route's reroute payloads.
#[async_trait]
pub trait Subscriber: Send + Sync {
    /// Deliver one payload. Any error removes this subscriber from the hub.
    async fn deliver(&self, payload: &RerouteResponse) -> Result<()>;

    /// Stable identity used for `unsubscribe` lookup and dead-sink pruning.
    fn id(&self) -> Uuid;
}

/// Sharded `route_id -> subscribers` registry.
#[derive(Default)]
pub struct SubscriptionHub {
    shards: Vec<Mutex<HashMap<Uuid, Vec<Arc<dyn Subscriber>>>>>,
}

/// Process-wide singleton, mutated by both the request path (subscribe/
/// unsubscribe) and the reroute path (broadcast).
pub static HUB: Lazy<SubscriptionHub> = Lazy::new(SubscriptionHub::new);

impl SubscriptionHub {
    pub fn new() -> Self {
        Self { shards: (0..SHARD_COUNT).map(|_| Mutex::new(HashMap::new())).collect() }
    }

    fn shard_index(&self, route_id: &Uuid) -> usize {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        route_id.hash(&mut hasher);
        (hasher.finish() as usize) % self.shards.len()
    }

    /// Register a sink for a route after its handshake completes.
    pub fn subscribe(&self, route_id: Uuid, sink: Arc<dyn Subscriber>) {
        let shard = &self.shards[self.shard_index(&route_id)];
        shard.lock().entry(route_id).or_default().push(sink);
    }

    /// Remove a sink from a route's subscriber set, by subscriber identity.
    pub fn unsubscribe(&self, route_id: Uuid, subscriber_id: Uuid) {
        let shard = &self.shards[self.shard_index(&route_id)];
        let mut map = shard.lock();
        if let Some(sinks) = map.get_mut(&route_id) {
            sinks.retain(|s| s.id() != subscriber_id);
            if sinks.is_empty() {
                map.remove(&route_id);
            }
        }
    }

    /// Deliver `payload` to every sink currently registered for `route_id`,
    /// in registration order. Sinks whose delivery errors are dropped once
    /// the broadcast completes; other subscribers are never blocked by one
    /// dead sink.
    pub async fn broadcast(&self, route_id: Uuid, payload: &RerouteResponse) {
        let sinks = {
            let shard = &self.shards[self.shard_index(&route_id)];
            match shard.lock().get(&route_id) {
                Some(sinks) => sinks.clone(),
                None => return,
            }
        };

        let mut dead = Vec::new();
        for sink in &sinks {
            if sink.deliver(payload).await.is_err() {
                dead.push(sink.id());
            }
        }

        if !dead.is_empty() {
            let shard = &self.shards[self.shard_index(&route_id)];
            let mut map = shard.lock();
            if let Some(sinks) = map.get_mut(&route_id) {
                sinks.retain(|s| !dead.contains(&s.id()));
                if sinks.is_empty() {
                    map.remove(&route_id);
                }
            }
        }
    }

    /// Number of subscribers currently registered for a route (for tests).
    #[cfg(test)]
    fn subscriber_count(&self, route_id: &Uuid) -> usize {
        let shard = &self.shards[self.shard_index(route_id)];
        shard.lock().get(route_id).map_or(0, |s| s.len())
    }
}
