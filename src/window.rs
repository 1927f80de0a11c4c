use std::time::Duration;
use anyhow::bail;


/// Immutable statistics of a [SampleWindow] at one point in time. This is what a
///  [crate::phi::PhiModel] gets to see - models never access the window itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    pub count: usize,
    /// arithmetic mean of the samples in seconds, `None` for an empty window
    pub mean: Option<f64>,
    /// sample standard deviation in seconds, 0.0 for fewer than two samples
    pub std_dev: f64,
}

/// A [SampleWindow] holds the most recent `capacity` inter-arrival intervals, evicting the oldest
///  sample when a new one is added to a full window.
///
/// Count and mean are available in O(1): the sum of all samples is maintained incrementally in
///  whole nanoseconds, so evicting samples never leaves rounding residue behind (a window
///  containing only zero intervals has a mean of exactly zero). The sum of squares is only used
///  for the standard deviation and is kept as a float.
#[derive(Debug)]
pub struct SampleWindow {
    buf: BufferImpl,
    cached_sum_nanos: u128,
    cached_square_sum: f64,
}
impl SampleWindow {
    pub fn new(capacity: usize) -> anyhow::Result<SampleWindow> {
        if capacity == 0 {
            bail!("sample window capacity must be positive");
        }

        Ok(SampleWindow {
            buf: BufferImpl::new(capacity),
            cached_sum_nanos: 0,
            cached_square_sum: 0.0,
        })
    }

    pub fn insert(&mut self, value: Duration) {
        if let Some(evicted) = self.buf.add_value(value) {
            self.cached_sum_nanos -= evicted.as_nanos();
            self.cached_square_sum -= evicted.as_secs_f64() * evicted.as_secs_f64();
        }

        self.cached_sum_nanos += value.as_nanos();
        self.cached_square_sum += value.as_secs_f64() * value.as_secs_f64();
    }

    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    pub fn count(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// mean in seconds, `None` if there are no samples
    pub fn mean(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        Some(self.cached_sum_nanos as f64 / self.count() as f64 / 1e9)
    }

    /// sample variance in seconds squared
    pub fn variance(&self) -> f64 {
        let n = self.count();
        if n < 2 {
            // pragmatic value that serves the purpose of variance in this context
            return 0.0;
        }

        let sum = self.cached_sum_nanos as f64 / 1e9;
        let diff_of_squares = self.cached_square_sum - sum * sum / n as f64;

        // the float square sum accumulates rounding errors as values are evicted
        (diff_of_squares / (n - 1) as f64).max(0.0)
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn stats(&self) -> WindowStats {
        WindowStats {
            count: self.count(),
            mean: self.mean(),
            std_dev: self.std_dev(),
        }
    }

    /// iterates over the samples from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = Duration> + '_ {
        self.buf.iter()
    }
}


#[derive(Debug)]
enum BufferImpl {
    Growing {
        buf: Vec<Duration>,
        capacity: usize,
    },
    Ring {
        buf: Vec<Duration>,
        next: usize,
    },
}
impl BufferImpl {
    fn new(capacity: usize) -> BufferImpl {
        BufferImpl::Growing {
            buf: Vec::with_capacity(capacity),
            capacity,
        }
    }

    fn capacity(&self) -> usize {
        match self {
            BufferImpl::Growing { capacity, .. } => *capacity,
            BufferImpl::Ring { buf, .. } => buf.len(),
        }
    }

    fn len(&self) -> usize {
        match self {
            BufferImpl::Growing { buf, .. } => buf.len(),
            BufferImpl::Ring { buf, .. } => buf.len(),
        }
    }

    /// adds a new value, returning the value that was evicted in its place (if any)
    #[must_use]
    fn add_value(&mut self, value: Duration) -> Option<Duration> {
        match self {
            BufferImpl::Growing { buf, capacity } => {
                buf.push(value);
                if buf.len() == *capacity {
                    let buf = std::mem::take(buf);
                    *self = BufferImpl::Ring { buf, next: 0 };
                }
                None
            }
            BufferImpl::Ring { buf, next } => {
                let evicted = std::mem::replace(&mut buf[*next], value);
                *next = (*next + 1) % buf.len();
                Some(evicted)
            }
        }
    }

    fn iter(&self) -> impl Iterator<Item = Duration> + '_ {
        let (newer, older): (&[Duration], &[Duration]) = match self {
            BufferImpl::Growing { buf, .. } => (buf.as_slice(), &[]),
            BufferImpl::Ring { buf, next } => buf.split_at(*next),
        };
        older.iter()
            .chain(newer.iter())
            .copied()
    }
}
