//! The eight aggregations
//!
//! Each function is a pure read over the warehouse. Groups are collected in
//! ordered maps so output order is deterministic, then sorted where a query
//! orders by a measure. Facts whose joined dimension row is missing are
//! skipped by queries that join that dimension.
//!
//! Sums are exact and checked; a sum beyond the decimal range fails the
//! query with `QueryError::Overflow`. Rounding to two places happens once,
//! at output.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;

use crate::warehouse::{
    round_currency, rounded_average, rounded_percent, FactSales, IntegrityReport, Warehouse,
};

use super::errors::{QueryError, QueryResult};
use super::kind::QueryKind;
use super::rows::{
    CategoryComparison, CategoryMonthRevenue, CustomerAnalysis, DailyTrend, DataQualityCheck,
    MonthlySummary, ProductPerformance, RevenueBreakdown, BREAKDOWN_QUARTER, BREAKDOWN_TOTAL,
};

/// Running totals for one group of facts
#[derive(Debug, Default)]
struct Totals<'a> {
    orders: u64,
    quantity: u64,
    revenue: Decimal,
    price: Decimal,
    cost: Decimal,
    products: BTreeSet<&'a str>,
    customers: BTreeSet<&'a str>,
}

impl<'a> Totals<'a> {
    /// Adds one fact. Leaves the totals untouched on overflow.
    fn add(&mut self, fact: &'a FactSales, kind: QueryKind) -> QueryResult<()> {
        let revenue = self.revenue.checked_add(fact.revenue);
        let price = self.price.checked_add(fact.price);
        let (Some(revenue), Some(price)) = (revenue, price) else {
            return Err(QueryError::overflow(kind));
        };

        self.revenue = revenue;
        self.price = price;
        self.orders += 1;
        self.quantity += u64::from(fact.quantity);
        self.products.insert(&fact.product_id);
        self.customers.insert(&fact.customer_id);
        Ok(())
    }

    /// Adds `quantity` units at `unit_cost` to the cost of goods sold.
    fn add_cost(&mut self, unit_cost: Decimal, quantity: u32, kind: QueryKind) -> QueryResult<()> {
        self.cost = unit_cost
            .checked_mul(Decimal::from(quantity))
            .and_then(|cost| self.cost.checked_add(cost))
            .ok_or_else(|| QueryError::overflow(kind))?;
        Ok(())
    }

    fn revenue(&self) -> Decimal {
        round_currency(self.revenue)
    }

    /// Average revenue per order. Groups always hold at least one fact.
    fn average_order_value(&self) -> Decimal {
        rounded_average(self.revenue, self.orders).unwrap_or_default()
    }

    fn unique_products(&self) -> u64 {
        self.products.len() as u64
    }

    fn unique_customers(&self) -> u64 {
        self.customers.len() as u64
    }
}

/// Revenue, orders and quantity per (Year, Month, Category).
pub fn revenue_by_category_month(warehouse: &Warehouse) -> QueryResult<Vec<CategoryMonthRevenue>> {
    let kind = QueryKind::RevenueByCategoryMonth;
    let mut groups: BTreeMap<(i32, u32, &str), (&str, Totals)> = BTreeMap::new();

    for sale in warehouse.sales() {
        let (Some(product), Some(date)) = (sale.product, sale.date) else {
            continue;
        };
        groups
            .entry((date.year, date.month, product.category.as_str()))
            .or_insert_with(|| (date.month_name.as_str(), Totals::default()))
            .1
            .add(sale.fact, kind)?;
    }

    Ok(groups
        .into_iter()
        .map(|((year, month, category), (month_name, totals))| CategoryMonthRevenue {
            year,
            month,
            month_name: month_name.to_string(),
            category: category.to_string(),
            total_revenue: totals.revenue(),
            number_of_orders: totals.orders,
            total_quantity_sold: totals.quantity,
        })
        .collect())
}

/// Orders, quantity, revenue and distinct products per (Year, Month).
pub fn monthly_summary(warehouse: &Warehouse) -> QueryResult<Vec<MonthlySummary>> {
    let kind = QueryKind::MonthlySummary;
    let mut groups: BTreeMap<(i32, u32), (&str, Totals)> = BTreeMap::new();

    for sale in warehouse.sales() {
        let Some(date) = sale.date else {
            continue;
        };
        groups
            .entry((date.year, date.month))
            .or_insert_with(|| (date.month_name.as_str(), Totals::default()))
            .1
            .add(sale.fact, kind)?;
    }

    Ok(groups
        .into_iter()
        .map(|((year, month), (month_name, totals))| MonthlySummary {
            year,
            month,
            month_name: month_name.to_string(),
            unique_products: totals.unique_products(),
            total_orders: totals.orders,
            total_quantity: totals.quantity,
            total_revenue: totals.revenue(),
            average_order_value: totals.average_order_value(),
        })
        .collect())
}

/// Per-product totals with profit and margin, highest revenue first.
pub fn product_performance(warehouse: &Warehouse) -> QueryResult<Vec<ProductPerformance>> {
    let kind = QueryKind::ProductPerformance;
    let mut groups: BTreeMap<&str, Totals> = BTreeMap::new();

    for sale in warehouse.sales() {
        let Some(product) = sale.product else {
            continue;
        };
        let totals = groups.entry(product.product_id.as_str()).or_default();
        totals.add(sale.fact, kind)?;
        totals.add_cost(product.cost, sale.fact.quantity, kind)?;
    }

    let mut rows = Vec::with_capacity(groups.len());
    for (product_id, totals) in groups {
        let Some(product) = warehouse.product(product_id) else {
            continue;
        };
        let profit = totals
            .revenue
            .checked_sub(totals.cost)
            .ok_or_else(|| QueryError::overflow(kind))?;
        let profit_margin_percent = if totals.revenue.is_zero() {
            None
        } else {
            let margin = rounded_percent(profit, totals.revenue).ok_or_else(|| QueryError::overflow(kind))?;
            Some(margin)
        };

        rows.push(ProductPerformance {
            product_id: product.product_id.clone(),
            product_name: product.product_name.clone(),
            category: product.category.clone(),
            times_ordered: totals.orders,
            total_quantity_sold: totals.quantity,
            total_revenue: totals.revenue(),
            average_selling_price: rounded_average(totals.price, totals.orders).unwrap_or_default(),
            total_profit: round_currency(profit),
            profit_margin_percent,
        });
    }

    rows.sort_by(|a, b| {
        b.total_revenue
            .cmp(&a.total_revenue)
            .then_with(|| a.product_id.cmp(&b.product_id))
    });
    Ok(rows)
}

/// Per-customer totals over every fact, biggest spender first.
pub fn customer_analysis(warehouse: &Warehouse) -> QueryResult<Vec<CustomerAnalysis>> {
    let kind = QueryKind::CustomerAnalysis;
    let mut groups: BTreeMap<&str, Totals> = BTreeMap::new();

    for fact in warehouse.facts() {
        groups.entry(fact.customer_id.as_str()).or_default().add(fact, kind)?;
    }

    let mut rows: Vec<CustomerAnalysis> = groups
        .into_iter()
        .map(|(customer_id, totals)| CustomerAnalysis {
            customer_id: customer_id.to_string(),
            number_of_orders: totals.orders,
            total_items_purchased: totals.quantity,
            total_spent: totals.revenue(),
            average_order_value: totals.average_order_value(),
            unique_products_purchased: totals.unique_products(),
        })
        .collect();

    rows.sort_by(|a, b| {
        b.total_spent
            .cmp(&a.total_spent)
            .then_with(|| a.customer_id.cmp(&b.customer_id))
    });
    Ok(rows)
}

/// Per-day totals in date order.
pub fn daily_trend(warehouse: &Warehouse) -> QueryResult<Vec<DailyTrend>> {
    let kind = QueryKind::DailyTrend;
    let mut groups = BTreeMap::new();

    for sale in warehouse.sales() {
        let Some(date) = sale.date else {
            continue;
        };
        groups
            .entry(date.full_date)
            .or_insert_with(|| (date, Totals::default()))
            .1
            .add(sale.fact, kind)?;
    }

    Ok(groups
        .into_values()
        .map(|(date, totals)| DailyTrend {
            date_key: date.date_key.clone(),
            year: date.year,
            month: date.month,
            day: date.day,
            number_of_orders: totals.orders,
            total_quantity: totals.quantity,
            total_revenue: totals.revenue(),
            average_order_value: totals.average_order_value(),
            unique_customers: totals.unique_customers(),
        })
        .collect())
}

/// Per-category totals including revenue per distinct customer.
pub fn category_comparison(warehouse: &Warehouse) -> QueryResult<Vec<CategoryComparison>> {
    let kind = QueryKind::CategoryComparison;
    let mut groups: BTreeMap<&str, Totals> = BTreeMap::new();

    for sale in warehouse.sales() {
        let Some(product) = sale.product else {
            continue;
        };
        groups.entry(product.category.as_str()).or_default().add(sale.fact, kind)?;
    }

    let mut rows: Vec<CategoryComparison> = groups
        .into_iter()
        .map(|(category, totals)| CategoryComparison {
            category: category.to_string(),
            total_orders: totals.orders,
            unique_customers: totals.unique_customers(),
            total_quantity_sold: totals.quantity,
            total_revenue: totals.revenue(),
            average_order_value: totals.average_order_value(),
            revenue_per_customer: rounded_average(totals.revenue, totals.unique_customers())
                .unwrap_or_default(),
        })
        .collect();

    rows.sort_by(|a, b| {
        b.total_revenue
            .cmp(&a.total_revenue)
            .then_with(|| a.category.cmp(&b.category))
    });
    Ok(rows)
}

/// Orphaned fact rows per foreign-key relationship.
pub fn data_quality(warehouse: &Warehouse) -> Vec<DataQualityCheck> {
    IntegrityReport::check(warehouse)
        .checks()
        .iter()
        .map(|(label, count)| DataQualityCheck {
            check_type: label.to_string(),
            count: *count,
        })
        .collect()
}

/// A grand-total row followed by one row per (Year, Quarter).
///
/// Both levels cover the facts whose date resolves, so the quarter rows
/// always sum to the total.
pub fn revenue_breakdown(warehouse: &Warehouse) -> QueryResult<Vec<RevenueBreakdown>> {
    let kind = QueryKind::RevenueBreakdown;
    let mut total = Totals::default();
    let mut quarters: BTreeMap<(i32, u32), Totals> = BTreeMap::new();

    for sale in warehouse.sales() {
        let Some(date) = sale.date else {
            continue;
        };
        total.add(sale.fact, kind)?;
        quarters.entry((date.year, date.quarter)).or_default().add(sale.fact, kind)?;
    }

    let mut rows = vec![RevenueBreakdown {
        breakdown: BREAKDOWN_TOTAL.to_string(),
        year: None,
        quarter: None,
        total_revenue: total.revenue(),
        number_of_orders: total.orders,
    }];
    rows.extend(quarters.into_iter().map(|((year, quarter), totals)| RevenueBreakdown {
        breakdown: BREAKDOWN_QUARTER.to_string(),
        year: Some(year),
        quarter: Some(quarter),
        total_revenue: totals.revenue(),
        number_of_orders: totals.orders,
    }));
    Ok(rows)
}
