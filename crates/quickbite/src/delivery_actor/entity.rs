//! ActorEntity implementation for [`Delivery`].
//!
//! The actor serializes competing `Assign` requests, so of two drivers accepting the
//! same delivery exactly one wins and the other gets `AlreadyTaken`.

use super::actions::{DeliveryAction, DeliveryActionResult};
use super::error::DeliveryError;
use crate::model::{Delivery, DeliveryCreate, DeliveryId, DeliveryStatus};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;

#[async_trait]
impl ActorEntity for Delivery {
    type Id = DeliveryId;
    type Create = DeliveryCreate;
    type Update = ();
    type Action = DeliveryAction;
    type ActionResult = DeliveryActionResult;
    type Context = ();
    type Error = DeliveryError;

    fn id(&self) -> &DeliveryId {
        &self.id
    }

    fn from_create_params(id: DeliveryId, params: DeliveryCreate) -> Result<Self, Self::Error> {
        Ok(Self {
            id,
            order_id: params.order_id,
            restaurant_id: params.restaurant_id,
            restaurant_name: params.restaurant_name,
            restaurant_address: params.restaurant_address,
            customer_id: params.customer_id,
            customer_name: params.customer_name,
            order_total: params.order_total,
            delivery_fee: params.delivery_fee,
            status: DeliveryStatus::Available,
            created_at: Utc::now(),
        })
    }

    /// One delivery per order.
    fn check_conflict(&self, existing: &Self) -> Result<(), Self::Error> {
        if existing.order_id == self.order_id {
            return Err(DeliveryError::AlreadyTaken(existing.id));
        }
        Ok(())
    }

    async fn on_update(&mut self, _update: (), _ctx: &()) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: DeliveryAction,
        _ctx: &(),
    ) -> Result<DeliveryActionResult, Self::Error> {
        match action {
            DeliveryAction::Assign(driver) => {
                if !self.is_available() {
                    return Err(DeliveryError::AlreadyTaken(self.id));
                }
                self.status = DeliveryStatus::Assigned(driver);
                Ok(DeliveryActionResult::Assign(self.clone()))
            }
            DeliveryAction::Unassign(driver) => {
                let held = self.status == DeliveryStatus::Assigned(driver);
                if held {
                    self.status = DeliveryStatus::Available;
                }
                Ok(DeliveryActionResult::Unassign(held))
            }
            DeliveryAction::MarkPickedUp(driver) => match self.status {
                DeliveryStatus::Assigned(holder) if holder == driver => {
                    self.status = DeliveryStatus::PickedUp(driver);
                    Ok(DeliveryActionResult::MarkPickedUp(self.clone()))
                }
                _ => Err(DeliveryError::NotAssigned(self.id)),
            },
            DeliveryAction::RevertPickUp(driver) => {
                let held = self.status == DeliveryStatus::PickedUp(driver);
                if held {
                    self.status = DeliveryStatus::Assigned(driver);
                }
                Ok(DeliveryActionResult::RevertPickUp(held))
            }
            DeliveryAction::ConfirmDropOff(driver) => match self.status {
                DeliveryStatus::PickedUp(holder) if holder == driver => {
                    Ok(DeliveryActionResult::ConfirmDropOff(self.clone()))
                }
                DeliveryStatus::Assigned(holder) if holder == driver => {
                    Err(DeliveryError::NotPickedUp(self.id))
                }
                _ => Err(DeliveryError::NotAssigned(self.id)),
            },
        }
    }
}
