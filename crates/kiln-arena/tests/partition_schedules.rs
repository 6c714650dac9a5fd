//! Integration test: partition slot lengths are independent of worker
//! scheduling.
//!
//! Each worker `i` appends `k_i` values to its own slot. Whatever order the
//! steps land in (sequential, round-robin, arbitrary shuffles, or real
//! free-running threads), slot `i` must end with exactly `k_i` elements in
//! its own append order, and every block must be disposed at the end.

use kiln_arena::{AllocDomain, PartitionConfig, PartitionedBuffer, Slot, WorkerId};
use kiln_test_utils::{LeakCheck, ScheduleScript};
use proptest::prelude::*;

/// Value appended by `worker` on its `n`-th step.
fn tag(worker: WorkerId, n: usize) -> u64 {
    ((worker.0 as u64) << 32) | n as u64
}

fn run_script(counts: &[usize], script: &ScheduleScript, hint: usize) {
    let check = LeakCheck::new();
    let config = PartitionConfig::new(counts.len())
        .with_slot_capacity(hint)
        .with_domain(AllocDomain::ScopedJob);
    let mut buffer = PartitionedBuffer::<u64>::create_tracked(&config, check.ledger()).unwrap();

    let workers: Vec<(WorkerId, &mut Slot<u64>)> = buffer.slots_mut().collect();
    script.run(workers, |worker, n, slot| slot.push(tag(worker, n)));

    for (i, &k) in counts.iter().enumerate() {
        let worker = WorkerId(i as u32);
        let slot = buffer.slot(worker);
        assert_eq!(slot.len(), k, "slot {i} length");
        let expected: Vec<u64> = (0..k).map(|n| tag(worker, n)).collect();
        assert_eq!(slot.as_slice(), expected.as_slice(), "slot {i} order");
    }
    assert_eq!(buffer.total_len(), counts.iter().sum::<usize>());
    buffer.dispose();
}

#[test]
fn sequential_schedule() {
    let counts = [5, 0, 17, 3];
    run_script(&counts, &ScheduleScript::sequential(&counts), 4);
}

#[test]
fn round_robin_schedule() {
    let counts = [9, 1, 0, 12, 4];
    run_script(&counts, &ScheduleScript::round_robin(&counts), 2);
}

#[test]
fn free_running_threads() {
    let check = LeakCheck::new();
    let config = PartitionConfig::new(16).with_slot_capacity(1);
    let mut buffer = PartitionedBuffer::<u64>::create_tracked(&config, check.ledger()).unwrap();

    buffer.run_phase(|worker, slot| {
        for n in 0..(worker.index() * 37) {
            slot.push(tag(worker, n));
        }
    });

    for i in 0..16u32 {
        let worker = WorkerId(i);
        assert_eq!(buffer.slot(worker).len(), i as usize * 37);
        assert!(buffer
            .slot(worker)
            .iter()
            .enumerate()
            .all(|(n, &v)| v == tag(worker, n)));
    }
    buffer.dispose();
}

#[test]
fn buffer_reused_across_phases() {
    let check = LeakCheck::new();
    let config = PartitionConfig::new(3).with_slot_capacity(8);
    let mut buffer = PartitionedBuffer::<u64>::create_tracked(&config, check.ledger()).unwrap();

    for phase in 0..4u64 {
        buffer.run_phase(|worker, slot| {
            for n in 0..=phase {
                slot.push(tag(worker, n as usize));
            }
        });
        assert_eq!(buffer.total_len(), 3 * (phase as usize + 1));
        buffer.clear();
    }
    buffer.dispose();
}

fn counts_and_script() -> impl Strategy<Value = (Vec<usize>, ScheduleScript)> {
    proptest::collection::vec(0usize..12, 1..6).prop_flat_map(|counts| {
        let order = ScheduleScript::sequential(&counts).order().to_vec();
        (Just(counts), Just(order).prop_shuffle())
            .prop_map(|(counts, order)| (counts, ScheduleScript::new(order)))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn slot_lengths_hold_for_every_interleaving(
        (counts, script) in counts_and_script(),
        hint in 0usize..6,
    ) {
        run_script(&counts, &script, hint);
    }
}
