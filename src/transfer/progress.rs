//! Transfer progress snapshots

use bytes::Bytes;
use futures_util::stream::{self, Stream, StreamExt};
use serde::Serialize;
use std::sync::Arc;

/// Chunk size for streamed upload bodies (64 KB)
pub const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// Progress event payload for uploads and downloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransferProgress {
    pub loaded: u64,
    pub total: u64,
    pub percentage: u8,
}

impl TransferProgress {
    /// Snapshot for `loaded` of `total` bytes, `None` when the total is unknown.
    pub fn new(loaded: u64, total: u64) -> Option<Self> {
        if total == 0 {
            return None;
        }
        let percentage = ((loaded as f64 / total as f64) * 100.0).round().min(100.0) as u8;
        Some(Self {
            loaded,
            total,
            percentage,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.loaded >= self.total
    }
}

pub type ProgressCallback = Arc<dyn Fn(TransferProgress) + Send + Sync>;

/// Split `data` into chunks and report cumulative progress as each one is
/// handed to the transport.
pub fn progress_stream(
    data: Bytes,
    on_progress: ProgressCallback,
) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Send + Sync + 'static {
    let total = data.len() as u64;
    let chunks: Vec<Bytes> = (0..data.len())
        .step_by(UPLOAD_CHUNK_SIZE)
        .map(|start| data.slice(start..(start + UPLOAD_CHUNK_SIZE).min(data.len())))
        .collect();

    let mut loaded = 0u64;
    stream::iter(chunks).map(move |chunk| {
        loaded += chunk.len() as u64;
        if let Some(progress) = TransferProgress::new(loaded, total) {
            log::debug!("transfer progress: {}/{} ({}%)", loaded, total, progress.percentage);
            on_progress(progress);
        }
        Ok(chunk)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn percentage_is_rounded_and_bounded() {
        assert_eq!(TransferProgress::new(0, 10).unwrap().percentage, 0);
        assert_eq!(TransferProgress::new(1, 3).unwrap().percentage, 33);
        assert_eq!(TransferProgress::new(2, 3).unwrap().percentage, 67);
        assert_eq!(TransferProgress::new(1, 200).unwrap().percentage, 1);
        assert_eq!(TransferProgress::new(10, 10).unwrap().percentage, 100);
        assert_eq!(TransferProgress::new(u64::MAX, u64::MAX).unwrap().percentage, 100);
    }

    #[test]
    fn unknown_total_yields_no_snapshot() {
        assert!(TransferProgress::new(5, 0).is_none());
    }

    #[test]
    fn percentage_stays_in_range_for_all_fractions() {
        for total in 1..=64u64 {
            for loaded in 0..=total {
                let p = TransferProgress::new(loaded, total).unwrap();
                assert!(p.percentage <= 100);
                let expected = ((loaded as f64 / total as f64) * 100.0).round() as u8;
                assert_eq!(p.percentage, expected);
            }
        }
    }

    #[tokio::test]
    async fn stream_reports_non_decreasing_progress_ending_at_total() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let data = Bytes::from(vec![7u8; UPLOAD_CHUNK_SIZE * 2 + 10]);

        let chunks: Vec<Bytes> = progress_stream(
            data.clone(),
            Arc::new(move |p: TransferProgress| sink.lock().unwrap().push(p)),
        )
        .map(|chunk| chunk.unwrap())
        .collect()
        .await;

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks.concat(), data.to_vec());

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen.windows(2).all(|w| w[0].loaded <= w[1].loaded));
        let last = seen.last().unwrap();
        assert_eq!(last.loaded, last.total);
        assert_eq!(last.percentage, 100);
    }

    #[tokio::test]
    async fn empty_body_emits_nothing() {
        let calls = Arc::new(Mutex::new(0));
        let counter = calls.clone();
        let chunks: Vec<_> = progress_stream(
            Bytes::new(),
            Arc::new(move |_: TransferProgress| *counter.lock().unwrap() += 1),
        )
        .collect()
        .await;
        assert!(chunks.is_empty());
        assert_eq!(*calls.lock().unwrap(), 0);
    }
}
