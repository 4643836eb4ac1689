/// Driver-facing deliveries and the earnings they turn into.
///
/// A [`Delivery`] is spawned when its order becomes ready and destroyed when the driver
/// drops it off. The completed delivery survives only as an [`EarningsRecord`] in the
/// driver's ledger.
use crate::model::{AccountId, DeliveryId, EarningsRecordId, OrderId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "driverId", rename_all = "camelCase")]
pub enum DeliveryStatus {
    Available,
    Assigned(AccountId),
    PickedUp(AccountId),
}

impl DeliveryStatus {
    /// The driver holding the delivery, if any.
    pub fn driver(&self) -> Option<AccountId> {
        match self {
            Self::Available => None,
            Self::Assigned(driver) | Self::PickedUp(driver) => Some(*driver),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    pub id: DeliveryId,
    pub order_id: OrderId,
    pub restaurant_id: AccountId,
    pub restaurant_name: String,
    pub restaurant_address: String,
    pub customer_id: AccountId,
    pub customer_name: String,
    pub order_total: Decimal,
    pub delivery_fee: Decimal,
    pub status: DeliveryStatus,
    pub created_at: DateTime<Utc>,
}

impl Delivery {
    pub fn is_available(&self) -> bool {
        self.status == DeliveryStatus::Available
    }
}

/// Snapshot of a ready order, used to spawn its delivery.
#[derive(Debug, Clone)]
pub struct DeliveryCreate {
    pub order_id: OrderId,
    pub restaurant_id: AccountId,
    pub restaurant_name: String,
    pub restaurant_address: String,
    pub customer_id: AccountId,
    pub customer_name: String,
    pub order_total: Decimal,
    pub delivery_fee: Decimal,
}

/// Ledger entry credited to a driver for one completed delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsRecord {
    pub id: EarningsRecordId,
    pub delivery_id: DeliveryId,
    pub order_id: OrderId,
    /// Equal to the delivery fee.
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    pub restaurant_name: String,
    pub customer_name: String,
}

impl EarningsRecord {
    pub fn for_delivery(delivery: &Delivery, date: DateTime<Utc>) -> Self {
        Self {
            id: EarningsRecordId::generate(),
            delivery_id: delivery.id,
            order_id: delivery.order_id,
            amount: delivery.delivery_fee,
            date,
            restaurant_name: delivery.restaurant_name.clone(),
            customer_name: delivery.customer_name.clone(),
        }
    }
}
