//! Per-channel sliding window over an append-only history.

use std::collections::VecDeque;

use wavescope_foundation::IngestError;

use crate::provider::Chunk;

/// Holds, per channel, the full sample history and a bounded window over
/// its most recent samples. Written only by the ingest task; the refresh
/// task reads snapshots.
///
/// Invariant: `window[i]` is always the suffix of `history[i]` of length
/// `min(history[i].len(), capacity)`.
pub struct WindowBuffer {
    history: Vec<Vec<f64>>,
    window: Vec<VecDeque<f64>>,
    capacity: usize,
}

impl WindowBuffer {
    pub fn new(channel_count: usize, capacity: usize) -> Self {
        Self {
            history: vec![Vec::new(); channel_count],
            window: vec![VecDeque::with_capacity(capacity); channel_count],
            capacity,
        }
    }

    pub fn channel_count(&self) -> usize {
        self.history.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current window length (identical across channels).
    pub fn window_len(&self) -> usize {
        self.window.first().map(VecDeque::len).unwrap_or(0)
    }

    /// Full history of one channel.
    pub fn history(&self, channel: usize) -> &[f64] {
        &self.history[channel]
    }

    /// Append one chunk of sample-major rows. An empty chunk is a no-op;
    /// a row whose width disagrees with the channel count rejects the
    /// whole chunk without mutating any state.
    pub fn append(&mut self, chunk: &Chunk) -> Result<usize, IngestError> {
        if chunk.is_empty() {
            return Ok(0);
        }
        let channels = self.channel_count();
        for row in &chunk.rows {
            if row.len() != channels {
                return Err(IngestError::ShapeMismatch {
                    expected: channels,
                    got: row.len(),
                });
            }
        }

        for row in &chunk.rows {
            for (ch, &value) in row.iter().enumerate() {
                self.history[ch].push(value);
                self.window[ch].push_back(value);
            }
        }
        for win in &mut self.window {
            while win.len() > self.capacity {
                win.pop_front();
            }
        }
        Ok(chunk.len())
    }

    /// Copy of the current window, one contiguous array per channel.
    pub fn window_snapshot(&self) -> Vec<Vec<f64>> {
        self.window
            .iter()
            .map(|win| win.iter().copied().collect())
            .collect()
    }
}
