//! Property-based tests for the stock status classification and pagination
//! arithmetic, verifying invariants across a wide range of inputs.

use proptest::prelude::*;

use stockroom_api::entities::product::StockStatus;
use stockroom_api::handlers::common::PaginationMeta;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn zero_quantity_is_always_out_of_stock(threshold in 0i32..10_000) {
        prop_assert_eq!(StockStatus::classify(0, threshold), StockStatus::OutOfStock);
    }

    #[test]
    fn quantities_within_the_threshold_are_low_stock(
        threshold in 1i32..10_000,
        offset in 0i32..10_000,
    ) {
        let quantity = 1 + offset % threshold;
        prop_assert_eq!(StockStatus::classify(quantity, threshold), StockStatus::LowStock);
    }

    #[test]
    fn quantities_above_the_threshold_are_in_stock(
        threshold in 0i32..10_000,
        excess in 1i32..10_000,
    ) {
        prop_assert_eq!(
            StockStatus::classify(threshold + excess, threshold),
            StockStatus::InStock
        );
    }

    #[test]
    fn every_quantity_lands_in_exactly_one_bucket(
        quantity in 0i32..1_000_000,
        threshold in 0i32..1_000_000,
    ) {
        let status = StockStatus::classify(quantity, threshold);
        let expected = if quantity == 0 {
            StockStatus::OutOfStock
        } else if quantity <= threshold {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        };
        prop_assert_eq!(status, expected);
    }

    #[test]
    fn status_strings_round_trip(quantity in 0i32..1_000, threshold in 0i32..1_000) {
        let status = StockStatus::classify(quantity, threshold);
        prop_assert_eq!(StockStatus::from_str(status.as_str()), Some(status));
    }
}

proptest! {
    #[test]
    fn total_pages_covers_every_row(total in 0u64..1_000_000, per_page in 1u64..1_000) {
        let meta = PaginationMeta::new(1, per_page, total);
        prop_assert!(meta.total_pages * per_page >= total);
        if total > 0 {
            prop_assert!((meta.total_pages - 1) * per_page < total);
        } else {
            prop_assert_eq!(meta.total_pages, 0);
        }
    }
}
