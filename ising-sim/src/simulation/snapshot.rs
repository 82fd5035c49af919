use crate::spins::SpinGrid;

/// Snapshot spacing while the run is young.
pub const DENSE_INTERVAL: u64 = 10_000;
/// Snapshot spacing once the run is past [`DENSE_LIMIT`].
pub const SPARSE_INTERVAL: u64 = 100_000;
pub const DENSE_LIMIT: u64 = 100_000;

/// Step indices at which a recording run captures the lattice.
///
/// Step 0, every [`DENSE_INTERVAL`] steps below [`DENSE_LIMIT`], every
/// [`SPARSE_INTERVAL`] steps after that, and always the final step. Sorted and
/// free of duplicates.
pub fn schedule(steps: u64) -> Vec<u64> {
    let mut checkpoints = vec![0];
    let mut p = DENSE_INTERVAL;
    while p < steps {
        checkpoints.push(p);
        p += if p < DENSE_LIMIT {
            DENSE_INTERVAL
        } else {
            SPARSE_INTERVAL
        };
    }
    if checkpoints.last() != Some(&steps) {
        checkpoints.push(steps);
    }
    checkpoints
}

/// The lattice as it stood after `step` update attempts.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub step: u64,
    pub grid: SpinGrid,
}

pub struct SnapshotRecorder {
    checkpoints: Vec<u64>,
    next: usize,
    snapshots: Vec<Snapshot>,
}

impl SnapshotRecorder {
    pub fn new(steps: u64) -> Self {
        let checkpoints = schedule(steps);
        Self {
            snapshots: Vec::with_capacity(checkpoints.len()),
            checkpoints,
            next: 0,
        }
    }

    /// The next step index that still needs a snapshot.
    pub fn next_checkpoint(&self) -> Option<u64> {
        self.checkpoints.get(self.next).copied()
    }

    /// Record `grid` if `step` is the pending checkpoint. Returns whether it was.
    pub fn capture(&mut self, step: u64, grid: &SpinGrid) -> bool {
        if self.next_checkpoint() != Some(step) {
            return false;
        }
        self.snapshots.push(Snapshot {
            step,
            grid: grid.clone(),
        });
        self.next += 1;
        true
    }

    pub fn finish(self) -> Vec<Snapshot> {
        self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_dense_then_sparse() {
        let expected: Vec<u64> = vec![
            0, 10_000, 20_000, 30_000, 40_000, 50_000, 60_000, 70_000, 80_000, 90_000, 100_000,
            200_000, 250_000,
        ];
        assert_eq!(schedule(250_000), expected);
    }

    #[test]
    fn test_schedule_edges() {
        assert_eq!(schedule(0), vec![0]);
        assert_eq!(schedule(5_000), vec![0, 5_000]);
        assert_eq!(*schedule(100_000).last().unwrap(), 100_000);
        assert_eq!(schedule(100_000).len(), 11);

        let s = schedule(1_000_000);
        assert!(s.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(s.len(), 20);
    }

    #[test]
    fn test_recorder_captures_only_checkpoints() {
        let grid = SpinGrid::from_values(&[1, -1, -1, 1], 2, 2).unwrap();
        let mut rec = SnapshotRecorder::new(20_000);
        assert!(rec.capture(0, &grid));
        assert!(!rec.capture(5_000, &grid));
        assert_eq!(rec.next_checkpoint(), Some(10_000));
        assert!(rec.capture(10_000, &grid));
        assert!(rec.capture(20_000, &grid));
        assert_eq!(rec.next_checkpoint(), None);

        let steps: Vec<u64> = rec.finish().iter().map(|s| s.step).collect();
        assert_eq!(steps, vec![0, 10_000, 20_000]);
    }
}
