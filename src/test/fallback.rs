#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal_macros::dec;

    use crate::{
        models::MarketSnapshot,
        services::{DataSource, FallbackPolicy, choose_snapshot, fallback::fallback_snapshot},
        test::support::quote,
    };

    fn live(indices: usize, stocks: usize) -> MarketSnapshot {
        let fallback = fallback_snapshot();
        MarketSnapshot::new(
            vec![quote("DIA", dec!(0.5)); indices],
            vec![quote("TCS.NS", dec!(-0.5)); stocks],
            fallback.sectors().clone(),
            fallback.news().clone(),
            Utc::now(),
        )
    }

    #[test]
    fn empty_live_snapshot_is_replaced() {
        let fallback = fallback_snapshot();
        let choice = choose_snapshot(
            MarketSnapshot::empty(),
            fallback.clone(),
            &FallbackPolicy::default(),
        );

        assert_eq!(*choice.source(), DataSource::Illustrative);
        assert!(choice.is_illustrative());
        assert_eq!(*choice.snapshot(), fallback);
    }

    #[test]
    fn complete_live_snapshot_is_kept() {
        let snapshot = live(2, 2);
        let choice = choose_snapshot(
            snapshot.clone(),
            fallback_snapshot(),
            &FallbackPolicy::default(),
        );

        assert_eq!(*choice.source(), DataSource::Live);
        assert_eq!(*choice.snapshot(), snapshot);
    }

    #[test]
    fn missing_sections_are_filled() {
        let choice = choose_snapshot(live(2, 0), fallback_snapshot(), &FallbackPolicy::default());

        assert_eq!(*choice.source(), DataSource::Mixed);
        assert_eq!(choice.snapshot().indices().len(), 2);
        assert_eq!(choice.snapshot().stocks(), fallback_snapshot().stocks());
    }

    #[test]
    fn too_few_indices_falls_back() {
        let policy = FallbackPolicy {
            min_indices: 3,
            ..FallbackPolicy::default()
        };
        let choice = choose_snapshot(live(2, 2), fallback_snapshot(), &policy);

        assert_eq!(*choice.source(), DataSource::Illustrative);
    }

    #[test]
    fn filling_can_be_disabled() {
        let policy = FallbackPolicy {
            fill_missing_sections: false,
            ..FallbackPolicy::default()
        };
        let choice = choose_snapshot(live(1, 0), fallback_snapshot(), &policy);

        assert_eq!(*choice.source(), DataSource::Live);
        assert!(choice.snapshot().stocks().is_empty());
    }

    #[test]
    fn data_source_displays() {
        assert_eq!(DataSource::Live.to_string(), "Live");
        assert_eq!(DataSource::Mixed.to_string(), "Mixed");
        assert_eq!(DataSource::Illustrative.to_string(), "Illustrative");
    }
}
