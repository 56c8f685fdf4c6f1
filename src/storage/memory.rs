//! In-process key-value store
//!
//! Mirrors the Redis semantics the gateway relies on: score-ordered sorted
//! sets with unique members, empty sets vanish, `SET` clears the TTL and an
//! expiry in the past deletes the key. Expiry is evaluated lazily against the
//! injected clock. One mutex acquisition per transaction makes every
//! transaction atomic.

use super::transaction::{Reply, StoreOp, Transaction};
use super::KeyValueStore;
use crate::utils::error::{GatewayError, Result};
use crate::utils::time::SharedClock;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use tracing::debug;

/// Transactions between full sweeps of expired keys
const SWEEP_INTERVAL: u64 = 1024;

#[derive(Debug, Clone)]
enum Value {
    Str(String),
    /// Kept sorted by (score, member)
    ZSet(Vec<(f64, String)>),
}

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    expires_at: Option<i64>,
}

impl Entry {
    fn is_expired(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// In-process store used when Redis is disabled and in tests
#[derive(Debug)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
    clock: SharedClock,
    execs: AtomicU64,
}

impl MemoryStore {
    pub fn new(clock: SharedClock) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
            execs: AtomicU64::new(0),
        }
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        let now = self.clock.now_unix();
        self.entries
            .lock()
            .values()
            .filter(|e| !e.is_expired(now))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remaining TTL in seconds, `None` for a missing key or a key without TTL
    pub fn ttl(&self, key: &str) -> Option<i64> {
        let now = self.clock.now_unix();
        let entries = self.entries.lock();
        entries
            .get(key)
            .filter(|e| !e.is_expired(now))
            .and_then(|e| e.expires_at)
            .map(|at| at - now)
    }

    /// Drop every expired key
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now_unix();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, e| !e.is_expired(now));
        before - entries.len()
    }

    fn apply(entries: &mut HashMap<String, Entry>, op: StoreOp, now: i64) -> Result<Reply> {
        // Lazy expiry of the touched key
        if entries.get(op.key()).is_some_and(|e| e.is_expired(now)) {
            entries.remove(op.key());
        }

        match op {
            StoreOp::ZAdd { key, score, member } => {
                let entry = entries.entry(key).or_insert_with(|| Entry {
                    value: Value::ZSet(Vec::new()),
                    expires_at: None,
                });
                let set = zset_mut(entry)?;
                let added = match set.iter().position(|(_, m)| *m == member) {
                    Some(idx) => {
                        set.remove(idx);
                        0
                    }
                    None => 1,
                };
                let at = set.partition_point(|existing| cmp_entry(existing, (score, &member)).is_lt());
                set.insert(at, (score, member));
                Ok(Reply::Int(added))
            }
            StoreOp::ZAddIfBelow {
                key,
                score,
                member,
                limit,
                seconds,
            } => {
                let count = match entries.get(&key) {
                    Some(entry) => zset(entry)?.len(),
                    None => 0,
                };
                if (count as u64) < limit {
                    Self::apply(entries, StoreOp::ZAdd { key: key.clone(), score, member }, now)?;
                    set_expiry(entries, &key, now.saturating_add(seconds), now);
                }
                Ok(Reply::Int(count as i64))
            }
            StoreOp::ZRem { key, member } => {
                let Some(entry) = entries.get_mut(&key) else {
                    return Ok(Reply::Int(0));
                };
                let set = zset_mut(entry)?;
                let removed = match set.iter().position(|(_, m)| *m == member) {
                    Some(idx) => {
                        set.remove(idx);
                        1
                    }
                    None => 0,
                };
                if set.is_empty() {
                    entries.remove(&key);
                }
                Ok(Reply::Int(removed))
            }
            StoreOp::ZRemRangeByScore { key, min, max } => {
                let Some(entry) = entries.get_mut(&key) else {
                    return Ok(Reply::Int(0));
                };
                let set = zset_mut(entry)?;
                let before = set.len();
                set.retain(|(score, _)| *score < min || *score > max);
                let removed = (before - set.len()) as i64;
                if set.is_empty() {
                    entries.remove(&key);
                }
                Ok(Reply::Int(removed))
            }
            StoreOp::ZCard { key } => match entries.get(&key) {
                Some(entry) => Ok(Reply::Int(zset(entry)?.len() as i64)),
                None => Ok(Reply::Int(0)),
            },
            StoreOp::ZRangeWithScores { key, start, stop } => {
                let Some(entry) = entries.get(&key) else {
                    return Ok(Reply::Members(Vec::new()));
                };
                let set = zset(entry)?;
                let members = match rank_range(set.len(), start, stop) {
                    Some((from, to)) => set[from..=to]
                        .iter()
                        .map(|(score, member)| (member.clone(), *score))
                        .collect(),
                    None => Vec::new(),
                };
                Ok(Reply::Members(members))
            }
            StoreOp::Expire { key, seconds } => Ok(Reply::Bool(set_expiry(
                entries,
                &key,
                now.saturating_add(seconds),
                now,
            ))),
            StoreOp::ExpireAt { key, timestamp } => {
                Ok(Reply::Bool(set_expiry(entries, &key, timestamp, now)))
            }
            StoreOp::Set { key, value } => {
                entries.insert(
                    key,
                    Entry {
                        value: Value::Str(value),
                        expires_at: None,
                    },
                );
                Ok(Reply::Ok)
            }
            StoreOp::Exists { key } => Ok(Reply::Bool(entries.contains_key(&key))),
        }
    }
}

fn zset(entry: &Entry) -> Result<&Vec<(f64, String)>> {
    match &entry.value {
        Value::ZSet(set) => Ok(set),
        Value::Str(_) => Err(wrong_type()),
    }
}

fn zset_mut(entry: &mut Entry) -> Result<&mut Vec<(f64, String)>> {
    match &mut entry.value {
        Value::ZSet(set) => Ok(set),
        Value::Str(_) => Err(wrong_type()),
    }
}

fn wrong_type() -> GatewayError {
    GatewayError::storage("WRONGTYPE Operation against a key holding the wrong kind of value")
}

fn cmp_entry(a: &(f64, String), b: (f64, &String)) -> Ordering {
    a.0.total_cmp(&b.0).then_with(|| a.1.as_str().cmp(b.1.as_str()))
}

/// Apply an expiry; a deadline at or before `now` deletes the key.
fn set_expiry(entries: &mut HashMap<String, Entry>, key: &str, at: i64, now: i64) -> bool {
    if !entries.contains_key(key) {
        return false;
    }
    if at <= now {
        entries.remove(key);
    } else if let Some(entry) = entries.get_mut(key) {
        entry.expires_at = Some(at);
    }
    true
}

/// Resolve Redis-style rank bounds into an inclusive index range
fn rank_range(len: usize, start: isize, stop: isize) -> Option<(usize, usize)> {
    let len = len as isize;
    if len == 0 {
        return None;
    }
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
    if start > stop || start >= len || stop < 0 {
        return None;
    }
    Some((start as usize, stop as usize))
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn exec(&self, tx: Transaction) -> Result<Vec<Reply>> {
        let now = self.clock.now_unix();

        if self.execs.fetch_add(1, AtomicOrdering::Relaxed) % SWEEP_INTERVAL == SWEEP_INTERVAL - 1 {
            let purged = self.purge_expired();
            if purged > 0 {
                debug!("Purged {} expired keys", purged);
            }
        }

        let mut entries = self.entries.lock();
        let mut replies = Vec::with_capacity(tx.len());
        for op in tx.ops().iter().cloned() {
            replies.push(Self::apply(&mut entries, op, now)?);
        }
        Ok(replies)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
