//! Property tests over the pure schedule algebra.

use millrace::{Decision, Schedule, ScheduleCursor};
use proptest::prelude::*;
use std::time::Duration;

fn small_duration() -> impl Strategy<Value = Duration> {
    (0u64..=10_000).prop_map(Duration::from_millis)
}

proptest! {
    #[test]
    fn recurs_proceeds_exactly_n_times(n in 0u32..200, probe in 0u32..400) {
        let schedule = Schedule::recurs(n);
        let decision = schedule.decide(probe);
        prop_assert_eq!(decision.proceed, probe < n);
    }

    #[test]
    fn forever_and_spaced_never_halt(delay in small_duration(), index in 0u32..1000) {
        prop_assert!(Schedule::forever().decide(index).proceed);
        let spaced = Schedule::spaced(delay).decide(index);
        prop_assert!(spaced.proceed);
        prop_assert_eq!(spaced.delay, delay);
    }

    #[test]
    fn union_proceeds_iff_either_proceeds(
        n in 0u32..50,
        m in 0u32..50,
        index in 0u32..100,
    ) {
        let union = Schedule::recurs(n).union(Schedule::recurs(m));
        prop_assert_eq!(union.decide(index).proceed, index < n.max(m));
    }

    #[test]
    fn intersect_proceeds_iff_both_proceed(
        n in 0u32..50,
        m in 0u32..50,
        index in 0u32..100,
    ) {
        let intersect = Schedule::recurs(n).intersect(Schedule::recurs(m));
        prop_assert_eq!(intersect.decide(index).proceed, index < n.min(m));
    }

    #[test]
    fn union_waits_the_shorter_delay_while_both_live(
        a in small_duration(),
        b in small_duration(),
        index in 0u32..100,
    ) {
        let union = Schedule::spaced(a).union(Schedule::spaced(b));
        prop_assert_eq!(union.decide(index).delay, a.min(b));
    }

    #[test]
    fn intersect_waits_the_longer_delay(
        a in small_duration(),
        b in small_duration(),
        index in 0u32..100,
    ) {
        let intersect = Schedule::spaced(a).intersect(Schedule::spaced(b));
        prop_assert_eq!(intersect.decide(index).delay, a.max(b));
    }

    #[test]
    fn max_delay_is_an_upper_bound(
        base in small_duration(),
        cap in small_duration(),
        index in 0u32..32,
    ) {
        let schedule = Schedule::exponential(base).max_delay(cap);
        prop_assert!(schedule.decide(index).delay <= cap);
    }

    #[test]
    fn exponential_delays_are_monotonic(base in small_duration(), index in 0u32..20) {
        let schedule = Schedule::exponential(base);
        prop_assert!(schedule.decide(index).delay <= schedule.decide(index + 1).delay);
    }

    #[test]
    fn linear_delays_are_monotonic(base in small_duration(), index in 0u32..1000) {
        let schedule = Schedule::linear(base);
        prop_assert!(schedule.decide(index).delay <= schedule.decide(index + 1).delay);
    }

    #[test]
    fn decide_is_pure(n in 0u32..50, delay in small_duration(), index in 0u32..100) {
        let schedule = Schedule::spaced(delay).intersect(Schedule::recurs(n));
        let first = schedule.decide(index);
        let second = schedule.decide(index);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn cursor_walks_every_proceeding_decision_in_order(n in 0u32..100) {
        let schedule = Schedule::recurs(n);
        let mut cursor = ScheduleCursor::new();
        let mut steps = 0u32;
        loop {
            let Decision { proceed, .. } = cursor.next(&schedule);
            if !proceed {
                break;
            }
            steps += 1;
            prop_assert!(steps <= n, "cursor must halt after n proceeds");
        }
        prop_assert_eq!(steps, n);
        prop_assert_eq!(cursor.index(), n);
    }
}
