use crate::common::TestHarness;
use farmsim_core::*;

fn run(policy: &str, seed: u64) -> RunSummary {
    let mut h = TestHarness::with_params(8, policy, serde_json::json!({ "seed": seed }));
    let mut generator = JobGenerator::with_means(0.5, 3.5, seed).unwrap();
    h.run_generated(&mut generator, 4_000);
    h.dispatcher.summary().unwrap()
}

#[test]
fn test_determinism_across_runs() {
    for policy in ["Random", "RoundRobin", "ShortestQueue", "LeastWork", "Slowdown"] {
        assert_eq!(run(policy, 12345), run(policy, 12345), "{policy} not reproducible");
    }
}

#[test]
fn test_determinism_with_different_seeds() {
    let a = run("LeastWork", 100);
    let b = run("LeastWork", 200);
    assert_ne!(a.mean_wait, b.mean_wait, "different seeds should produce different results");
}

#[test]
fn test_summary_serializes() {
    let summary = run("Slowdown", 1);
    let value = serde_json::to_value(&summary).unwrap();
    assert_eq!(value["policy"], "Slowdown");
    assert_eq!(value["jobs_handled"], 4_000);
    let back: RunSummary = serde_json::from_value(value).unwrap();
    assert_eq!(back, summary);
}
