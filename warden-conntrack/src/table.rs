use std::hash::{BuildHasher, Hash, Hasher};
use std::sync::Arc;

use warden_concurrency::sync::Mutex;
use warden_net::FiveTuple;

use crate::record::FlowRecord;

/// The connection table's key is exactly the packet's 5-tuple (§3 "Flow
/// key"); no separate type earns its keep.
pub type FlowKey = FiveTuple;

/// Fixed bucket count (§4.6: "2^16 buckets, chosen at construction time,
/// never rehashed"). A power of two so the hash-to-bucket mapping is a mask,
/// not a modulo.
const BUCKET_COUNT: usize = 1 << 16;

/// A generic concurrent map hashes the whole key with one `BuildHasher`/
/// `Hash` pair, but the bucket index here must deliberately ignore ports
/// (§4.6: "the hash combines source address, destination address and
/// protocol only, so that the two directions of one conversation and the
/// two halves of a NAT-translated flow collide into the same bucket
/// cluster"). That's a different contract than any off-the-shelf concurrent
/// map exposes, so the table is a hand-rolled fixed-size bucket vector
/// instead, with the same per-shard-mutex sharding idiom such maps use
/// internally.
fn bucket_index(key: &FlowKey) -> usize {
    let mut hasher = ahash::AHasher::default();
    key.src_ip.hash(&mut hasher);
    key.dst_ip.hash(&mut hasher);
    key.protocol.hash(&mut hasher);
    (hasher.finish() as usize) & (BUCKET_COUNT - 1)
}

type Bucket = Mutex<Vec<(FlowKey, Arc<FlowRecord>)>>;

/// The connection table (§4.6): a fixed array of mutex-guarded chains,
/// never resized after construction. Lookups and the creation race in
/// §4.7 are both scoped to a single bucket's lock.
pub struct ConnTable {
    buckets: Vec<Bucket>,
}

impl ConnTable {
    pub fn new() -> Self {
        let buckets = (0..BUCKET_COUNT).map(|_| Mutex::new(Vec::new())).collect();
        ConnTable { buckets }
    }

    fn bucket(&self, key: &FlowKey) -> &Bucket {
        &self.buckets[bucket_index(key)]
    }

    pub fn lookup(&self, key: &FlowKey) -> Option<Arc<FlowRecord>> {
        let bucket = self.bucket(key).lock();
        bucket
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, record)| Arc::clone(record))
    }

    /// Inserts `record` under `key`, unless a record for `key` already
    /// exists — in which case the existing record is returned and `record`
    /// is discarded. This is the idempotent-insert-on-race behavior §4.7
    /// requires when two threads observe the first packet of the same flow
    /// concurrently: both calls return the same record, and both then apply
    /// their own state observation to it.
    pub fn insert(&self, key: FlowKey, record: Arc<FlowRecord>) -> Arc<FlowRecord> {
        let mut bucket = self.bucket(&key).lock();
        if let Some((_, existing)) = bucket.iter().find(|(k, _)| *k == key) {
            return Arc::clone(existing);
        }
        bucket.push((key, Arc::clone(&record)));
        record
    }

    pub fn evict(&self, key: &FlowKey) {
        let mut bucket = self.bucket(key).lock();
        bucket.retain(|(k, _)| k != key);
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(|b| b.lock().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Visits every tracked flow. `visitor` returns `true` to keep the
    /// entry, `false` to evict it; used by both the reaper (§4.8) and the
    /// connection-table CSV export (§6), which only reads and always keeps.
    pub fn scan(&self, mut visitor: impl FnMut(&FlowKey, &FlowRecord) -> bool) {
        for bucket in &self.buckets {
            let mut guard = bucket.lock();
            guard.retain(|(key, record)| visitor(key, record));
        }
    }
}

impl Default for ConnTable {
    fn default() -> Self {
        ConnTable::new()
    }
}
