use crate::common::TestHarness;

#[test]
fn test_late_arrival_is_treated_as_now() {
    let mut h = TestHarness::new(1, "RoundRobin");
    h.submit(0.0, 2.0);
    h.submit(10.0, 1.0);
    assert_eq!(h.dispatcher.out_of_order_arrivals(), 0);

    h.submit(4.0, 3.0);
    assert_eq!(h.dispatcher.out_of_order_arrivals(), 1);
    assert_eq!(h.dispatcher.global_clock(), 10.0);
    assert_eq!(h.dispatcher.servers()[0].local_clock(), 10.0);

    h.dispatcher.finish_up();
    // Queued behind job 1 from t=10, so it waits 1 beyond its own 6 of lateness.
    assert_eq!(h.dispatcher.servers()[0].local_clock(), 14.0);
    assert_eq!(h.dispatcher.total_waiting_time(), 7.0);
    assert_eq!(h.dispatcher.summary().unwrap().out_of_order_arrivals, 1);
}

#[test]
fn test_clock_never_moves_backwards() {
    let mut h = TestHarness::new(2, "LeastWork");
    h.submit_all(&[(5.0, 1.0), (3.0, 1.0), (5.0, 1.0), (1.0, 1.0)]);
    assert_eq!(h.dispatcher.out_of_order_arrivals(), 2);
    assert_eq!(h.dispatcher.global_clock(), 5.0);
    h.assert_accounting();
}

#[test]
fn test_sliver_of_work_does_not_push_clock_past_arrival() {
    let mut h = TestHarness::new(1, "RoundRobin");
    h.submit(0.0, 1.0 + 1e-10);
    h.submit(1.0, 1.0);
    assert!(h.dispatcher.servers()[0].local_clock() <= 1.0);
    assert!(h.dispatcher.global_clock() <= 1.0);

    h.submit(1.0, 1.0);
    assert_eq!(h.dispatcher.out_of_order_arrivals(), 0);
    assert_eq!(h.dispatcher.global_clock(), 1.0);

    h.dispatcher.finish_up();
    assert_eq!(h.dispatcher.servers()[0].jobs_completed(), 3);
    assert!((h.dispatcher.total_waiting_time() - 1.0).abs() < 1e-9);
}
