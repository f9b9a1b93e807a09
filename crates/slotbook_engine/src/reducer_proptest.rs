#[cfg(test)]
mod tests {
    use crate::reducer::{merge, subtract};
    use crate::slots::slice;
    use crate::time_range::TimeRange;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use proptest::prelude::*;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 5, 0, 0, 0).unwrap()
    }

    // Helper: a range from minute offsets relative to the base instant
    fn minutes_range(offset: i64, length: i64) -> TimeRange {
        let start = base() + Duration::minutes(offset);
        TimeRange::new(start, start + Duration::minutes(length)).unwrap()
    }

    fn busy_strategy() -> impl Strategy<Value = Vec<TimeRange>> {
        prop::collection::vec((0..1_440i64, 1..180i64), 0..12)
            .prop_map(|pairs| pairs.into_iter().map(|(o, l)| minutes_range(o, l)).collect())
    }

    fn window_strategy() -> impl Strategy<Value = TimeRange> {
        (0..720i64, 1..1_000i64).prop_map(|(o, l)| minutes_range(o, l))
    }

    proptest! {
        // Free ranges are sorted, disjoint, inside the window, and together with
        // the clipped busy ranges they rebuild the window exactly.
        #[test]
        fn test_free_and_busy_partition_window(window in window_strategy(), busy in busy_strategy()) {
            let free = subtract(window, &busy);
            let merged = merge(&busy);

            for pair in free.ranges().windows(2) {
                prop_assert!(pair[0].end() < pair[1].start(),
                    "free ranges must be sorted and separated: {} then {}", pair[0], pair[1]);
            }
            for f in free.iter() {
                prop_assert!(window.contains(f), "{} escapes window {}", f, window);
                for b in &merged {
                    prop_assert!(!f.overlaps(b), "free {} overlaps busy {}", f, b);
                }
            }

            let free_total = free.iter().fold(Duration::zero(), |acc, r| acc + r.duration());
            let busy_total = merged
                .iter()
                .filter_map(|b| b.clip_to(&window))
                .fold(Duration::zero(), |acc, r| acc + r.duration());
            prop_assert_eq!(free_total + busy_total, window.duration());
        }

        #[test]
        fn test_merge_is_idempotent(window in window_strategy(), busy in busy_strategy()) {
            let once = merge(&busy);
            let twice = merge(&once);
            prop_assert_eq!(&once, &twice);
            prop_assert_eq!(subtract(window, &once), subtract(window, &twice));
        }

        // Every slot fits in exactly one free range and the cap is honored.
        #[test]
        fn test_slots_stay_inside_one_free_range(
            window in window_strategy(),
            busy in busy_strategy(),
            duration_minutes in 1..240i64,
            max_slots in 1..50usize,
        ) {
            let free = subtract(window, &busy);
            let slots: Vec<_> = slice(&free, Duration::minutes(duration_minutes), max_slots)
                .unwrap()
                .collect();

            prop_assert!(slots.len() <= max_slots);
            for slot in &slots {
                prop_assert_eq!(slot.end - slot.start, Duration::minutes(duration_minutes));
                let containing = free.iter().filter(|r| r.contains(&slot.range())).count();
                prop_assert_eq!(containing, 1, "slot {} not inside exactly one free range", slot.range());
            }
            for pair in slots.windows(2) {
                prop_assert!(pair[0].end <= pair[1].start, "slots must not overlap");
            }
        }
    }
}
