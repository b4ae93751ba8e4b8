use crate::common::{Recorder, TestHarness};
use farmsim_core::*;
use std::sync::{Arc, RwLock};

fn staggered_jobs(n: usize) -> Vec<(f64, f64)> {
    (0..n)
        .map(|i| (i as f64 * 0.75, 1.0 + ((i * 7) % 5) as f64))
        .collect()
}

#[test]
fn test_round_robin_spreads_evenly() {
    for (k, n) in [(3, 10), (4, 4), (5, 23), (1, 7)] {
        let mut h = TestHarness::new(k, "RoundRobin");
        h.submit_all(&staggered_jobs(n));
        for count in h.jobs_per_server() {
            assert!(
                count == n / k || count == (n + k - 1) / k,
                "{k} servers / {n} jobs gave {count}"
            );
        }
    }
    let mut h = TestHarness::new(3, "RoundRobin");
    h.submit_all(&staggered_jobs(7));
    assert_eq!(h.assignments(), vec![0, 1, 2, 0, 1, 2, 0]);
}

#[test]
fn test_shortest_queue_picks_minimum_length() {
    let recorder = Arc::new(RwLock::new(Recorder::default()));
    let mut h = TestHarness::new(4, "ShortestQueue").with_observer(&recorder);
    h.submit_all(&staggered_jobs(200));

    let r = recorder.read().unwrap();
    assert_eq!(r.chosen.len(), 200);
    for (seen, &chosen) in r.pre_placement.iter().zip(&r.chosen) {
        let min = seen.iter().map(|(len, _)| *len).min().unwrap();
        assert_eq!(seen[chosen].0, min);
        let first = seen.iter().position(|(len, _)| *len == min).unwrap();
        assert_eq!(chosen, first, "ties go to the lowest index");
    }
}

#[test]
fn test_least_work_picks_minimum_work() {
    let recorder = Arc::new(RwLock::new(Recorder::default()));
    let mut h = TestHarness::new(4, "LeastWork").with_observer(&recorder);
    h.submit_all(&staggered_jobs(200));

    let r = recorder.read().unwrap();
    for (seen, &chosen) in r.pre_placement.iter().zip(&r.chosen) {
        for (_, work) in seen {
            assert!(seen[chosen].1 <= *work);
        }
    }
}

#[test]
fn test_random_is_seeded() {
    let run = |seed: u64| {
        let mut h = TestHarness::with_params(5, "Random", serde_json::json!({ "seed": seed }));
        h.submit_all(&staggered_jobs(100));
        h.assignments()
    };
    assert_eq!(run(9), run(9));
    assert_ne!(run(9), run(10));
    assert!(run(9).iter().all(|&s| s < 5));
}

#[test]
fn test_slowdown_avoids_long_queues_of_small_jobs() {
    let mut h = TestHarness::with_params(2, "Slowdown", serde_json::json!({ "alpha": 1.0 }));
    // server 0 gets one big job, server 1 many tiny ones
    // score(s0) = 1 + 10/0.5 + 1 = 22, score(s1) after k tiny jobs = 1 + 2k
    h.submit(0.0, 10.0);
    for _ in 0..15 {
        h.submit(0.0, 0.5);
    }
    let counts = h.jobs_per_server();
    assert_eq!(h.assignments()[1..12], [1; 11]);
    assert!(counts[0] > 1, "big-job server should eventually take small jobs");
}

#[test]
fn test_create_policy_by_name() {
    for (kind, _) in policy_catalog() {
        let policy = create_policy(&kind, serde_json::Value::Null).unwrap();
        assert_eq!(policy.kind(), kind);
    }
    assert_eq!(policy_catalog().len(), 5);
    assert!(create_policy("Nope", serde_json::Value::Null).is_none());

    let slowdown = create_policy("Slowdown", serde_json::json!({ "alpha": -1.0 })).unwrap();
    assert_eq!(slowdown.encode_config(), serde_json::json!({ "alpha": 0.0 }));
}

#[test]
fn test_least_work_beats_random_under_load() {
    let avg = |policy: &str| {
        let mut h = TestHarness::with_params(5, policy, serde_json::json!({ "seed": 3 }));
        let mut generator = JobGenerator::with_means(1.0, 4.0, 77).unwrap();
        h.run_generated(&mut generator, 5_000);
        h.dispatcher.average_waiting_time()
    };
    let least = avg("LeastWork");
    let random = avg("Random");
    assert!(least < random, "least work {least} vs random {random}");
}
