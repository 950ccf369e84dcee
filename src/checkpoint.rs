//! Scheduled snapshots of the best solution.
//!
//! A [`Checkpointer`] runs on its own thread next to the search. At each
//! scheduled offset from its start it clones the current content of a
//! [`BestSolution`] and writes it, in the textual form of
//! [`Solution::display`](crate::solution::Solution::display), to
//! `<dir>/<label>.txt`. The lock is held only for the clone.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::multistart::BestSolution;

/// Background snapshot writer.
pub struct Checkpointer;

/// Handle to a running [`Checkpointer`].
pub struct CheckpointHandle {
    stop: Sender<()>,
    thread: JoinHandle<io::Result<Vec<PathBuf>>>,
}

impl Checkpointer {
    /// Starts writing snapshots of `best` into `dir`.
    ///
    /// `schedule` pairs a file label with an offset from now; entries are
    /// served in offset order. A scheduled time at which `best` is still
    /// empty writes nothing. `num_servers` sizes the one-hot placement
    /// rows.
    pub fn spawn(
        best: Arc<BestSolution>,
        mut schedule: Vec<(String, Duration)>,
        dir: impl Into<PathBuf>,
        num_servers: usize,
    ) -> CheckpointHandle {
        let dir = dir.into();
        let (stop, stopped) = mpsc::channel::<()>();
        schedule.sort_by_key(|(_, offset)| *offset);

        let thread = thread::spawn(move || {
            let started = Instant::now();
            let mut written = Vec::new();
            for (label, offset) in schedule {
                let wait = offset.saturating_sub(started.elapsed());
                match stopped.recv_timeout(wait) {
                    Err(RecvTimeoutError::Timeout) => {}
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }

                let Some(snapshot) = best.snapshot() else {
                    debug!(label = %label, "no solution yet, checkpoint skipped");
                    continue;
                };
                let path = write_snapshot(&dir, &label, &snapshot.solution().display(num_servers))?;
                info!(path = %path.display(), power = snapshot.power(), "checkpoint written");
                written.push(path);
            }
            Ok(written)
        });

        CheckpointHandle { stop, thread }
    }
}

impl CheckpointHandle {
    /// Cancels the remaining schedule and returns the files written.
    pub fn finish(self) -> io::Result<Vec<PathBuf>> {
        // the thread may already be done with its schedule
        let _ = self.stop.send(());
        self.thread
            .join()
            .map_err(|_| io::Error::other("checkpoint thread panicked"))?
    }
}

fn write_snapshot(dir: &Path, label: &str, content: &impl std::fmt::Display) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{label}.txt"));
    fs::write(&path, content.to_string())?;
    Ok(path)
}
