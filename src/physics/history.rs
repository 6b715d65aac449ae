//! Bounded, time-ordered record of simulation samples
//!
//! The buffer is a sliding window over simulated time: once it holds
//! `capacity` samples every push evicts the oldest one. Windowed queries
//! binary-search the time column, so plotting and export stay cheap even
//! at full capacity.

use super::math::Scalar;
use std::collections::VecDeque;
use std::collections::vec_deque;

/// Default number of samples retained
pub const DEFAULT_HISTORY_CAPACITY: usize = 20_000;

/// One recorded tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HistorySample {
    /// Simulated time, s
    pub time: Scalar,
    /// Position, m
    pub position: Scalar,
    /// Velocity, m/s
    pub velocity: Scalar,
    /// Applied force, N
    pub applied_force: Scalar,
    /// Friction force, N
    pub friction_force: Scalar,
    /// Drag force, N
    pub drag_force: Scalar,
    /// Net force, N
    pub net_force: Scalar,
}

#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    samples: VecDeque<HistorySample>,
    capacity: usize,
}

impl HistoryBuffer {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Buffer retaining at most `capacity` samples (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest once the buffer is full.
    ///
    /// Samples must arrive in non-decreasing time order.
    pub fn push(&mut self, sample: HistorySample) {
        debug_assert!(
            self.samples
                .back()
                .is_none_or(|last| sample.time >= last.time),
            "history samples must be pushed in time order"
        );

        while self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Samples whose time lies within `window_seconds` of the newest sample.
    ///
    /// The result is the contiguous tail starting at the first sample with
    /// `time >= t_last - window_seconds`. A window at least as long as the
    /// recorded span returns everything.
    pub fn query_window(&self, window_seconds: Scalar) -> HistoryWindow<'_> {
        let Some(last) = self.samples.back() else {
            return HistoryWindow {
                samples: &self.samples,
                start: 0,
            };
        };

        let window_start = last.time - window_seconds.max(0.0);
        let start = self
            .samples
            .partition_point(|sample| sample.time < window_start);

        HistoryWindow {
            samples: &self.samples,
            start,
        }
    }

    /// Whole buffer as a window
    pub fn all(&self) -> HistoryWindow<'_> {
        HistoryWindow {
            samples: &self.samples,
            start: 0,
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn first(&self) -> Option<&HistorySample> {
        self.samples.front()
    }

    pub fn last(&self) -> Option<&HistorySample> {
        self.samples.back()
    }

    pub fn get(&self, index: usize) -> Option<&HistorySample> {
        self.samples.get(index)
    }

    pub fn iter(&self) -> vec_deque::Iter<'_, HistorySample> {
        self.samples.iter()
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a HistoryBuffer {
    type Item = &'a HistorySample;
    type IntoIter = vec_deque::Iter<'a, HistorySample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Borrowed contiguous tail of a [`HistoryBuffer`]
#[derive(Debug, Clone, Copy)]
pub struct HistoryWindow<'a> {
    samples: &'a VecDeque<HistorySample>,
    start: usize,
}

impl<'a> HistoryWindow<'a> {
    /// Index of the first windowed sample within the buffer
    pub fn start_index(&self) -> usize {
        self.start
    }

    pub fn len(&self) -> usize {
        self.samples.len() - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn first(&self) -> Option<&'a HistorySample> {
        self.samples.get(self.start)
    }

    pub fn last(&self) -> Option<&'a HistorySample> {
        if self.is_empty() {
            None
        } else {
            self.samples.back()
        }
    }

    pub fn iter(&self) -> vec_deque::Iter<'a, HistorySample> {
        self.samples.range(self.start..)
    }
}

impl<'a> IntoIterator for HistoryWindow<'a> {
    type Item = &'a HistorySample;
    type IntoIter = vec_deque::Iter<'a, HistorySample>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
