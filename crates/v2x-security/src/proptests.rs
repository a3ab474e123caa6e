//! Property-based tests for delivery accounting.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use crate::binning::PdrByDistance;
    use crate::delivery::DeliveryAccountant;

    proptest! {
        // Expected count strictly increases on every observation, received
        // never exceeds expected, and PDR stays within [0, 1].
        #[test]
        fn property_accountant_counters(
            stream in prop::collection::vec((any::<i64>(), any::<bool>(), 0.0f64..1000.0), 1..200),
        ) {
            let mut acc = DeliveryAccountant::new();
            let mut last_expected = 0;
            for (seq, verified, distance) in stream {
                let obs = acc.observe(seq, verified, distance);
                prop_assert!(obs.delta >= 1 && obs.delta <= 256);
                prop_assert_eq!(obs.imputed_misses, obs.delta - 1);
                prop_assert!(acc.expected() > last_expected);
                prop_assert!(acc.received() <= acc.expected());
                prop_assert!(acc.verified() <= acc.received());
                let pdr = acc.pdr();
                prop_assert!((0.0..=1.0).contains(&pdr));
                last_expected = acc.expected();
            }
        }

        // Whatever the gaps, expected equals received plus imputed misses.
        #[test]
        fn property_misses_balance(
            seqs in prop::collection::vec(0i64..256, 1..100),
        ) {
            let mut acc = DeliveryAccountant::recording();
            let mut imputed = 0u64;
            for seq in &seqs {
                imputed += u64::from(acc.observe(*seq, true, 1.0).imputed_misses);
            }
            prop_assert_eq!(acc.expected(), acc.received() + imputed);
            prop_assert_eq!(acc.samples().len() as u64, acc.expected());
            prop_assert_eq!(acc.received(), seqs.len() as u64);
        }

        // Only the low byte of the sequence matters.
        #[test]
        fn property_sequence_wraps(base in 0i64..256, laps in -4i64..4, next in 0i64..256) {
            let mut a = DeliveryAccountant::new();
            let mut b = DeliveryAccountant::new();
            a.observe(base, true, 0.0);
            b.observe(base + laps * 256, true, 0.0);
            let oa = a.observe(next, true, 0.0);
            let ob = b.observe(next - laps * 256, true, 0.0);
            prop_assert_eq!(oa.delta, ob.delta);
            prop_assert_eq!(a.expected(), b.expected());
        }

        // Binning preserves every sample.
        #[test]
        fn property_bins_preserve_totals(
            samples in prop::collection::vec((any::<bool>(), 0.0f64..5000.0), 0..200),
            width in 1.0f64..500.0,
        ) {
            let mut by = PdrByDistance::new(width);
            for (delivered, distance) in &samples {
                by.record(crate::delivery::PdrSample { delivered: *delivered, distance: *distance });
            }
            prop_assert_eq!(by.total(), samples.len() as u64);
            let delivered: u64 = by.bins().iter().map(|b| b.delivered).sum();
            prop_assert_eq!(delivered, samples.iter().filter(|(d, _)| *d).count() as u64);
            for bin in by.bins() {
                prop_assert!(bin.lower_m < bin.upper_m);
                prop_assert!((0.0..=1.0).contains(&bin.pdr()));
            }
        }
    }
}
