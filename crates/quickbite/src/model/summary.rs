//! Dashboard summaries for restaurants and drivers.
use crate::model::{EarningsRecord, Order};
use chrono::{DateTime, Days, Months, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How many recent orders a sales summary lists.
pub const RECENT_ORDERS: usize = 5;
/// How many recent ledger entries an earnings summary lists.
pub const RECENT_EARNINGS: usize = 10;

/// Reporting window, always ending now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Today,
    Week,
    Month,
}

impl Period {
    /// Inclusive start of the window.
    pub fn start(self, now: DateTime<Utc>) -> DateTime<Utc> {
        let day = match self {
            Self::Today => Some(now),
            Self::Week => now.checked_sub_days(Days::new(7)),
            Self::Month => now.checked_sub_months(Months::new(1)),
        }
        .unwrap_or(now);
        day.date_naive().and_time(NaiveTime::MIN).and_utc()
    }
}

fn average(total: Decimal, count: usize) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        (total / Decimal::from(count)).round_dp(2)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub period: Period,
    pub total_orders: usize,
    pub total_revenue: Decimal,
    pub average_order_value: Decimal,
    /// Newest first.
    pub recent_orders: Vec<Order>,
}

impl SalesSummary {
    /// Summarizes the orders created at or after the period start.
    pub fn from_orders(mut orders: Vec<Order>, period: Period, now: DateTime<Utc>) -> Self {
        let start = period.start(now);
        orders.retain(|order| order.created_at >= start);
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total_revenue: Decimal = orders.iter().map(|order| order.total).sum();
        Self {
            period,
            total_orders: orders.len(),
            average_order_value: average(total_revenue, orders.len()),
            total_revenue,
            recent_orders: orders.into_iter().take(RECENT_ORDERS).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsSummary {
    pub period: Period,
    pub total_deliveries: usize,
    pub total_earnings: Decimal,
    pub average_per_delivery: Decimal,
    /// Newest first.
    pub recent: Vec<EarningsRecord>,
}

impl EarningsSummary {
    pub fn from_history(history: &[EarningsRecord], period: Period, now: DateTime<Utc>) -> Self {
        let start = period.start(now);
        let mut records: Vec<EarningsRecord> = history
            .iter()
            .filter(|record| record.date >= start)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date));

        let total_earnings: Decimal = records.iter().map(|record| record.amount).sum();
        Self {
            period,
            total_deliveries: records.len(),
            average_per_delivery: average(total_earnings, records.len()),
            total_earnings,
            recent: records.into_iter().take(RECENT_EARNINGS).collect(),
        }
    }
}
