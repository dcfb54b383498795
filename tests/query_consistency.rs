//! Query Consistency Tests
//!
//! Cross-query invariants over randomly generated batches:
//! - Quarter rows of revenue_breakdown sum to its Total row
//! - Per-product, per-category and per-customer revenue sum to the fact total
//! - Monthly and daily order counts agree
//! - Running a query twice gives the same rows

use proptest::prelude::*;
use rust_decimal::Decimal;
use salesdw::etl::{Loader, RawSaleRecord};
use salesdw::query::{
    category_comparison, customer_analysis, daily_trend, monthly_summary, product_performance,
    revenue_breakdown, revenue_by_category_month, QueryKind, QueryRunner,
};
use salesdw::warehouse::Warehouse;

const CATEGORIES: [&str; 3] = ["Peripherals", "Displays", "Storage"];

fn load(batch: Vec<RawSaleRecord>) -> Warehouse {
    let (wh, report) = Loader::new().load(batch);
    assert!(report.rejected.is_empty());
    wh
}

prop_compose! {
    fn arb_sale(order: usize)(
        product in 0..6usize,
        customer in 0..8u8,
        month in 1..13u32,
        day in 1..29u32,
        quantity in 1..20u32,
        cents in 1..50_000u32,
    ) -> RawSaleRecord {
        RawSaleRecord::new(
            &order.to_string(),
            &format!("P{}", product),
            &format!("C{}", customer),
            &format!("2023-{:02}-{:02}", month, day),
            &quantity.to_string(),
            &format!("{}.{:02}", cents / 100, cents % 100),
        )
        .with_product(
            &format!("Item {}", product),
            CATEGORIES[product % CATEGORIES.len()],
            "0.50",
        )
    }
}

fn arb_warehouse() -> impl Strategy<Value = Warehouse> {
    (1..60usize)
        .prop_flat_map(|n| (0..n).map(arb_sale).collect::<Vec<_>>())
        .prop_map(load)
}

fn fact_total(wh: &Warehouse) -> Decimal {
    wh.facts().iter().map(|f| f.revenue).sum()
}

proptest! {
    #[test]
    fn prop_quarters_sum_to_total(wh in arb_warehouse()) {
        let rows = revenue_breakdown(&wh).unwrap();
        let (total, quarters) = rows.split_first().unwrap();

        prop_assert!(total.is_total());
        prop_assert_eq!(total.total_revenue, fact_total(&wh));
        prop_assert_eq!(
            quarters.iter().map(|r| r.total_revenue).sum::<Decimal>(),
            total.total_revenue
        );
        prop_assert_eq!(
            quarters.iter().map(|r| r.number_of_orders).sum::<u64>(),
            total.number_of_orders
        );
    }

    #[test]
    fn prop_group_revenue_sums_to_total(wh in arb_warehouse()) {
        let total = fact_total(&wh);

        let by_product: Decimal = product_performance(&wh).unwrap().iter().map(|r| r.total_revenue).sum();
        let by_category: Decimal = category_comparison(&wh).unwrap().iter().map(|r| r.total_revenue).sum();
        let by_customer: Decimal = customer_analysis(&wh).unwrap().iter().map(|r| r.total_spent).sum();
        let by_cat_month: Decimal = revenue_by_category_month(&wh).unwrap().iter().map(|r| r.total_revenue).sum();

        prop_assert_eq!(by_product, total);
        prop_assert_eq!(by_category, total);
        prop_assert_eq!(by_customer, total);
        prop_assert_eq!(by_cat_month, total);
    }

    #[test]
    fn prop_monthly_and_daily_orders_agree(wh in arb_warehouse()) {
        let monthly: u64 = monthly_summary(&wh).unwrap().iter().map(|r| r.total_orders).sum();
        let daily: u64 = daily_trend(&wh).unwrap().iter().map(|r| r.number_of_orders).sum();

        prop_assert_eq!(monthly, wh.facts().len() as u64);
        prop_assert_eq!(daily, monthly);
    }

    #[test]
    fn prop_product_performance_ordered(wh in arb_warehouse()) {
        let rows = product_performance(&wh).unwrap();
        for pair in rows.windows(2) {
            prop_assert!(
                pair[0].total_revenue > pair[1].total_revenue
                    || (pair[0].total_revenue == pair[1].total_revenue
                        && pair[0].product_id < pair[1].product_id)
            );
        }
    }

    #[test]
    fn prop_queries_are_repeatable(wh in arb_warehouse()) {
        let runner = QueryRunner::new(&wh);
        for kind in QueryKind::all() {
            prop_assert_eq!(runner.run(kind).unwrap(), runner.run(kind).unwrap());
        }
    }
}

/// Queries over an empty warehouse return no rows, except the fixed
/// integrity checks and the Total row.
#[test]
fn test_empty_warehouse() {
    let wh = Warehouse::new();
    let runner = QueryRunner::new(&wh);

    for result in runner.run_all().unwrap() {
        match result.query {
            "data_quality" => assert_eq!(result.row_count, 3),
            "revenue_breakdown" => {
                assert_eq!(result.row_count, 1);
                assert_eq!(result.rows[0]["TotalRevenue"], "0.00");
            }
            other => assert!(result.is_empty(), "{} returned rows", other),
        }
    }
}
