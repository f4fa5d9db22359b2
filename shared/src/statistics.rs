//! Percentile/variance statistics and a response-time tracker (C3).
//!
//! The ring buffer here follows the corpus's `market::aggregator::RingBuffer`
//! shape (fixed-capacity, overwrite-oldest) but fixes its index arithmetic so
//! iteration order is oldest-to-newest regardless of wraparound.

use parking_lot::Mutex;

/// `rank = ceil(p/100 * n) - 1`, clamped to `[0, n-1]`.
///
/// A previous revision of this formula added a constant offset (`+50`) that
/// made a requested P99 behave like a P50; the corrected form has no such
/// offset.
pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }
    let n = sorted_values.len();
    let rank = ((p / 100.0) * n as f64).ceil() as i64 - 1;
    let rank = rank.clamp(0, n as i64 - 1) as usize;
    sorted_values[rank]
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

/// Exponentially-weighted moving average: `v <- alpha*x + (1-alpha)*v`.
#[derive(Debug, Clone, Copy)]
pub struct Ewma {
    alpha: f64,
    value: Option<f64>,
}

impl Ewma {
    pub fn new(alpha: f64) -> Self {
        Self { alpha, value: None }
    }

    pub fn update(&mut self, x: f64) -> f64 {
        let updated = match self.value {
            Some(v) => self.alpha * x + (1.0 - self.alpha) * v,
            None => x,
        };
        self.value = Some(updated);
        updated
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }
}

/// Fixed-capacity ring buffer of the most recent `capacity` samples.
struct RingBuffer<T> {
    buffer: Vec<Option<T>>,
    capacity: usize,
    head: usize,
    len: usize,
}

impl<T: Clone> RingBuffer<T> {
    fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![None; capacity.max(1)],
            capacity: capacity.max(1),
            head: 0,
            len: 0,
        }
    }

    fn push(&mut self, item: T) {
        self.buffer[self.head] = Some(item);
        self.head = (self.head + 1) % self.capacity;
        if self.len < self.capacity {
            self.len += 1;
        }
    }

    /// Oldest-to-newest iteration order.
    fn iter(&self) -> impl Iterator<Item = &T> {
        let start = if self.len < self.capacity {
            0
        } else {
            self.head
        };
        (0..self.len).map(move |i| {
            let idx = (start + i) % self.capacity;
            self.buffer[idx].as_ref().expect("within populated range")
        })
    }

    fn len(&self) -> usize {
        self.len
    }
}

/// Tracks recent response-time samples and exposes p50/p95/p99/avg/count.
pub struct ResponseTimeTracker {
    samples: Mutex<RingBuffer<f64>>,
}

impl ResponseTimeTracker {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: Mutex::new(RingBuffer::new(capacity)),
        }
    }

    pub fn record(&self, sample_ms: f64) {
        self.samples.lock().push(sample_ms);
    }

    fn sorted_samples(&self) -> Vec<f64> {
        let guard = self.samples.lock();
        let mut values: Vec<f64> = guard.iter().copied().collect();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap());
        values
    }

    pub fn p50(&self) -> f64 {
        percentile(&self.sorted_samples(), 50.0)
    }

    pub fn p95(&self) -> f64 {
        percentile(&self.sorted_samples(), 95.0)
    }

    pub fn p99(&self) -> f64 {
        percentile(&self.sorted_samples(), 99.0)
    }

    pub fn avg(&self) -> f64 {
        mean(&self.sorted_samples())
    }

    pub fn count(&self) -> usize {
        self.samples.lock().len()
    }
}
