use rand::Rng;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use vigil_common::types::{AlertRecord, RollingStats, SIM_TOP_ATTACKS};

/// Default bounded capacity of the in-memory alert buffer.
pub const DEFAULT_CAPACITY: usize = 200;

/// How many placeholder alerts `seed_if_empty` synthesizes.
const SEED_BATCH: usize = 10;

struct Inner {
    /// Newest-first. Front is the most recent record.
    alerts: VecDeque<AlertRecord>,
    stats: RollingStats,
}

/// Bounded, newest-first alert buffer plus rolling statistics.
///
/// Both live behind one mutex: the push and its stats update must be
/// atomic with respect to each other, because every request-handling task
/// and the synthetic traffic generator mutate them concurrently.
pub struct AlertStore {
    capacity: usize,
    inner: Mutex<Inner>,
}

impl AlertStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(Inner {
                alerts: VecDeque::with_capacity(capacity),
                stats: RollingStats::default(),
            }),
        }
    }

    /// Lock the buffer, recovering from a poisoned mutex if necessary.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn insert(inner: &mut Inner, record: AlertRecord, capacity: usize) {
        inner.alerts.push_front(record);
        while inner.alerts.len() > capacity {
            inner.alerts.pop_back();
        }
    }

    /// Records an organically scored alert: front-insert plus the scored
    /// path's stats update, as one critical section.
    pub fn push_scored(&self, record: AlertRecord) {
        let mut inner = self.lock();
        Self::insert(&mut inner, record, self.capacity);
        inner.stats.today_attempts += 1;
        inner.stats.top_attack = "AI".to_string();
    }

    /// Records a synthetic alert. Same insert path, but the stats draw
    /// from the simulator vocabulary and re-randomize the success rate.
    pub fn push_synthetic(&self, record: AlertRecord) {
        let mut rng = rand::thread_rng();
        let top = SIM_TOP_ATTACKS[rng.gen_range(0..SIM_TOP_ATTACKS.len())].to_string();
        let rate = rng.gen_range(40..=98);
        let mut inner = self.lock();
        Self::insert(&mut inner, record, self.capacity);
        inner.stats.today_attempts += 1;
        inner.stats.top_attack = top;
        inner.stats.success_rate = rate;
    }

    /// Returns up to `n` records, newest first. Never errors, never pads:
    /// a request beyond the current size returns exactly what is held.
    pub fn recent(&self, n: usize) -> Vec<AlertRecord> {
        let inner = self.lock();
        inner.alerts.iter().take(n).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().alerts.is_empty()
    }

    /// Snapshot of the rolling statistics.
    pub fn stats(&self) -> RollingStats {
        self.lock().stats.clone()
    }

    /// On first read while empty, synthesizes a batch of placeholder
    /// alerts so a freshly started dashboard is never blank. Idempotent
    /// once the store holds anything.
    pub fn seed_if_empty(&self) {
        let mut inner = self.lock();
        if !inner.alerts.is_empty() {
            return;
        }
        for _ in 0..SEED_BATCH {
            let record = AlertRecord::synthetic();
            Self::insert(&mut inner, record, self.capacity);
        }
        inner.stats.today_attempts = inner.alerts.len() as u64;
        inner.stats.top_attack = "SQLi".to_string();
        inner.stats.success_rate = rand::thread_rng().gen_range(50..=95);
        tracing::info!(count = SEED_BATCH, "Seeded empty alert store");
    }
}

impl Default for AlertStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
