//! Mock stream provider shared by the integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use wavescope_foundation::StreamError;
use wavescope_stream::{
    ChannelInfo, Chunk, InletOptions, StreamCandidate, StreamInlet, StreamMetadata,
    StreamProvider,
};

pub struct MockProvider {
    pub resolve_calls: Arc<AtomicU32>,
    /// One entry per expected resolve call; exhausted entries resolve empty.
    results: Mutex<VecDeque<Vec<MockCandidate>>>,
}

impl MockProvider {
    pub fn new(results: Vec<Vec<MockCandidate>>) -> Self {
        Self {
            resolve_calls: Arc::new(AtomicU32::new(0)),
            results: Mutex::new(results.into()),
        }
    }

    /// A provider that never finds anything.
    pub fn always_empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn calls(&self) -> u32 {
        self.resolve_calls.load(Ordering::SeqCst)
    }
}

impl StreamProvider for MockProvider {
    type Candidate = MockCandidate;

    fn resolve(&self, _type_tag: &str, _timeout: Duration) -> Vec<MockCandidate> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        self.results.lock().pop_front().unwrap_or_default()
    }
}

pub struct MockCandidate {
    pub metadata: StreamMetadata,
    pub chunks: VecDeque<Chunk>,
}

impl MockCandidate {
    pub fn new(metadata: StreamMetadata, chunks: Vec<Chunk>) -> Self {
        Self {
            metadata,
            chunks: chunks.into(),
        }
    }
}

impl StreamCandidate for MockCandidate {
    type Inlet = MockInlet;

    fn open(self, options: InletOptions) -> Result<MockInlet, StreamError> {
        assert!(options.buffer_secs > 0);
        Ok(MockInlet {
            metadata: self.metadata,
            chunks: self.chunks,
        })
    }
}

pub struct MockInlet {
    metadata: StreamMetadata,
    chunks: VecDeque<Chunk>,
}

impl StreamInlet for MockInlet {
    fn metadata(&self) -> StreamMetadata {
        self.metadata.clone()
    }

    fn pull_chunk(&mut self) -> Result<Chunk, StreamError> {
        Ok(self.chunks.pop_front().unwrap_or_default())
    }
}

pub fn metadata(rate: f64, channel_count: usize) -> StreamMetadata {
    StreamMetadata {
        name: "MockAmp-3000".into(),
        nominal_sample_rate: rate,
        channel_count,
        channels: (0..channel_count)
            .map(|i| ChannelInfo {
                label: Some(format!("C{}", i + 1)),
                unit: Some("uV".into()),
            })
            .collect(),
    }
}

pub fn constant_chunk(rows: usize, values: &[f64]) -> Chunk {
    Chunk {
        rows: (0..rows).map(|_| values.to_vec()).collect(),
        timestamps: (0..rows).map(|i| i as f64).collect(),
    }
}

pub fn sine_chunk(rows: usize, channel_count: usize, start_index: usize, rate: f64) -> Chunk {
    let rows: Vec<Vec<f64>> = (0..rows)
        .map(|r| {
            let t = (start_index + r) as f64 / rate;
            (0..channel_count)
                .map(|ch| (2.0 * std::f64::consts::PI * 8.0 * t + ch as f64).sin())
                .collect()
        })
        .collect();
    let timestamps = rows.iter().enumerate().map(|(i, _)| i as f64).collect();
    Chunk { rows, timestamps }
}
