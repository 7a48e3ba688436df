//! Submission Rate Limiter (token bucket per queue)
//!
//! Limits how fast requests can be added to any single queue.

use std::collections::HashMap;
use std::sync::Arc;
use studentqueue_core::port::TimeProvider;
use tokio::sync::Mutex;

// Token counts are kept in thousandths to refill at sub-token resolution
const MILLI: u64 = 1000;

struct Bucket {
    milli_tokens: u64,
    last_refill_ms: i64,
}

pub struct SubmissionLimiter {
    buckets: Mutex<HashMap<String, Bucket>>,
    max_tokens: u32,
    refill_per_sec: u32,
    clock: Arc<dyn TimeProvider>,
}

impl SubmissionLimiter {
    /// # Arguments
    /// * `max_tokens` - Burst size per queue
    /// * `refill_per_sec` - Tokens added per second per queue
    pub fn new(max_tokens: u32, refill_per_sec: u32, clock: Arc<dyn TimeProvider>) -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            max_tokens,
            refill_per_sec,
            clock,
        }
    }

    /// Consume one token from `queue`'s bucket; false if it is empty
    pub async fn check(&self, queue: &str) -> bool {
        let now = self.clock.now_millis();
        let capacity = self.max_tokens as u64 * MILLI;

        let mut buckets = self.buckets.lock().await;
        let bucket = buckets
            .entry(queue.to_ascii_lowercase())
            .or_insert(Bucket {
                milli_tokens: capacity,
                last_refill_ms: now,
            });

        let elapsed_ms = now.saturating_sub(bucket.last_refill_ms).max(0) as u64;
        bucket.milli_tokens =
            (bucket.milli_tokens + elapsed_ms * self.refill_per_sec as u64).min(capacity);
        bucket.last_refill_ms = now;

        if bucket.milli_tokens >= MILLI {
            bucket.milli_tokens -= MILLI;
            true
        } else {
            false
        }
    }

    /// Drop the bucket of a queue that was deleted or renamed away
    pub async fn forget(&self, queue: &str) {
        self.buckets.lock().await.remove(&queue.to_ascii_lowercase());
    }

    /// Number of queues currently holding a bucket
    pub async fn bucket_count(&self) -> usize {
        self.buckets.lock().await.len()
    }
}
