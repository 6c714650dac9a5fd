//! Scripted worker interleavings.
//!
//! A [`ScheduleScript`] is a sequence of worker ids. Running it spawns
//! one thread per worker; the coordinator releases exactly one step at a
//! time, in script order, and waits for that step to finish before
//! releasing the next. The workers still run on real threads with their
//! own `&mut` state, but the order in which their steps land is fixed by
//! the script.

use std::time::Duration;

use crossbeam_channel::{bounded, unbounded};
use kiln_core::WorkerId;

/// How long the coordinator waits for a single step before giving up.
const STEP_TIMEOUT: Duration = Duration::from_secs(10);

/// An explicit order in which worker steps execute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleScript {
    order: Vec<WorkerId>,
}

impl ScheduleScript {
    pub fn new(order: Vec<WorkerId>) -> Self {
        Self { order }
    }

    /// Worker `i` takes `counts[i]` steps; all of worker 0 first, then
    /// worker 1, and so on. Shuffle the result for other schedules.
    pub fn sequential(counts: &[usize]) -> Self {
        let order = counts
            .iter()
            .enumerate()
            .flat_map(|(i, &n)| std::iter::repeat(WorkerId(i as u32)).take(n))
            .collect();
        Self { order }
    }

    /// Worker `i` takes `counts[i]` steps, one step per worker per round.
    pub fn round_robin(counts: &[usize]) -> Self {
        let rounds = counts.iter().copied().max().unwrap_or(0);
        let mut order = Vec::with_capacity(counts.iter().sum());
        for round in 0..rounds {
            for (i, &n) in counts.iter().enumerate() {
                if round < n {
                    order.push(WorkerId(i as u32));
                }
            }
        }
        Self { order }
    }

    pub fn order(&self) -> &[WorkerId] {
        &self.order
    }

    /// Number of steps the script assigns to `worker`.
    pub fn steps_for(&self, worker: WorkerId) -> usize {
        self.order.iter().filter(|&&w| w == worker).count()
    }

    /// Run the script over `workers`.
    ///
    /// `step(worker, n, state)` is called for the `n`-th step (counting
    /// from zero) of each worker, on that worker's thread.
    ///
    /// # Panics
    ///
    /// Panics if the script names a worker that is not in `workers`, or
    /// if a step panics or stalls.
    pub fn run<'a, S, F>(&self, workers: Vec<(WorkerId, &'a mut S)>, step: F)
    where
        S: Send + 'a,
        F: Fn(WorkerId, usize, &mut S) + Sync,
    {
        let (done_tx, done_rx) = unbounded::<WorkerId>();
        let step = &step;
        std::thread::scope(|scope| {
            let mut gates = Vec::with_capacity(workers.len());
            for (worker, state) in workers {
                let (go_tx, go_rx) = bounded::<usize>(1);
                gates.push((worker, go_tx, 0usize));
                let done = done_tx.clone();
                scope.spawn(move || {
                    while let Ok(n) = go_rx.recv() {
                        step(worker, n, state);
                        if done.send(worker).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(done_tx);

            for &worker in &self.order {
                let (_, gate, taken) = gates
                    .iter_mut()
                    .find(|(w, _, _)| *w == worker)
                    .unwrap_or_else(|| panic!("script names worker {worker} with no state"));
                gate.send(*taken)
                    .unwrap_or_else(|_| panic!("worker {worker} exited early"));
                *taken += 1;
                let finished = done_rx
                    .recv_timeout(STEP_TIMEOUT)
                    .unwrap_or_else(|_| panic!("worker {worker} did not finish its step"));
                assert_eq!(finished, worker);
            }
            // Closing the gates ends every worker loop; the scope joins them.
            gates.clear();
        });
    }
}
