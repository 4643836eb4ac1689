//! # Menu Client
//!
//! High-level API for the `MenuItem` actor: restaurant menu management, browsing, and
//! adding items to a customer's cart.
use crate::account_actor::AccountError;
use crate::clients::AccountClient;
use crate::menu_actor::{MenuAction, MenuActionResult, MenuError};
use crate::model::{
    AccountId, CartLine, MenuItem, MenuItemCreate, MenuItemDraft, MenuItemEdit, MenuItemId,
    MenuItemUpdate, Profile, RestaurantListing, Role, Session,
};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

/// Client for interacting with the Menu actor.
#[derive(Clone)]
pub struct MenuClient {
    inner: ResourceClient<MenuItem>,
    accounts: AccountClient,
}

impl MenuClient {
    pub fn new(inner: ResourceClient<MenuItem>, accounts: AccountClient) -> Self {
        Self { inner, accounts }
    }
}

#[async_trait]
impl ActorClient<MenuItem> for MenuClient {
    type Error = MenuError;

    fn inner(&self) -> &ResourceClient<MenuItem> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        MenuError::from_framework(e)
    }
}

impl MenuClient {
    async fn create_for(
        &self,
        restaurant_id: AccountId,
        draft: MenuItemDraft,
    ) -> Result<MenuItem, MenuError> {
        let id = self
            .inner
            .create(MenuItemCreate {
                restaurant_id,
                draft,
            })
            .await
            .map_err(Self::map_error)?;
        self.get(id)
            .await?
            .ok_or_else(|| MenuError::NotFound(id.to_string()))
    }

    async fn existing(&self, id: MenuItemId) -> Result<MenuItem, MenuError> {
        self.get(id)
            .await?
            .ok_or_else(|| MenuError::NotFound(id.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn add_menu_item(
        &self,
        session: &Session,
        draft: MenuItemDraft,
    ) -> Result<MenuItem, MenuError> {
        session.require(Role::Restaurant)?;
        debug!("Sending request");
        self.create_for(session.account_id, draft).await
    }

    /// Seeds a new restaurant with the starter menu.
    #[instrument(skip(self, drafts))]
    pub async fn add_default_menu(
        &self,
        restaurant_id: AccountId,
        drafts: Vec<MenuItemDraft>,
    ) -> Result<Vec<MenuItem>, MenuError> {
        let mut items = Vec::with_capacity(drafts.len());
        for draft in drafts {
            items.push(self.create_for(restaurant_id, draft).await?);
        }
        info!(%restaurant_id, count = items.len(), "Default menu added");
        Ok(items)
    }

    #[instrument(skip(self))]
    pub async fn edit_menu_item(
        &self,
        session: &Session,
        id: MenuItemId,
        edit: MenuItemEdit,
    ) -> Result<MenuItem, MenuError> {
        session.require(Role::Restaurant)?;
        self.inner
            .update(
                id,
                MenuItemUpdate {
                    restaurant_id: session.account_id,
                    edit,
                },
            )
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn delete_menu_item(
        &self,
        session: &Session,
        id: MenuItemId,
    ) -> Result<(), MenuError> {
        session.require(Role::Restaurant)?;
        let item = self.existing(id).await?;
        if item.restaurant_id != session.account_id {
            return Err(MenuError::NotOwner(id));
        }
        self.delete(id).await
    }

    /// Flips availability. Returns the item afterwards.
    #[instrument(skip(self))]
    pub async fn toggle_availability(
        &self,
        session: &Session,
        id: MenuItemId,
    ) -> Result<MenuItem, MenuError> {
        session.require(Role::Restaurant)?;
        match self
            .inner
            .perform_action(
                id,
                MenuAction::ToggleAvailability {
                    restaurant_id: session.account_id,
                },
            )
            .await
            .map_err(Self::map_error)?
        {
            MenuActionResult::ToggleAvailability(item) => Ok(item),
        }
    }

    /// All items of one restaurant, available or not, grouped by category.
    #[instrument(skip(self))]
    pub async fn restaurant_menu(&self, restaurant_id: AccountId) -> Result<Vec<MenuItem>, MenuError> {
        let mut items: Vec<MenuItem> = self
            .list()
            .await?
            .into_iter()
            .filter(|item| item.restaurant_id == restaurant_id)
            .collect();
        items.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.name.cmp(&b.name)));
        Ok(items)
    }

    /// Every restaurant with the items customers can currently order.
    #[instrument(skip(self))]
    pub async fn browse_restaurants(&self) -> Result<Vec<RestaurantListing>, MenuError> {
        let restaurants = self.accounts.restaurants().await?;
        let items = self.list().await?;

        Ok(restaurants
            .into_iter()
            .filter_map(|account| match account.profile {
                Profile::Restaurant {
                    restaurant_name,
                    address,
                } => {
                    let mut menu: Vec<MenuItem> = items
                        .iter()
                        .filter(|item| item.restaurant_id == account.id && item.available)
                        .cloned()
                        .collect();
                    menu.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.name.cmp(&b.name)));
                    Some(RestaurantListing {
                        restaurant_id: account.id,
                        restaurant_name,
                        address,
                        items: menu,
                    })
                }
                _ => None,
            })
            .collect())
    }

    /// Restaurants whose name or any offered category contains `term`, ignoring case.
    /// A blank term lists every restaurant, as [`browse_restaurants`](Self::browse_restaurants).
    #[instrument(skip(self))]
    pub async fn search_restaurants(&self, term: &str) -> Result<Vec<RestaurantListing>, MenuError> {
        let listings = self.browse_restaurants().await?;
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Ok(listings);
        }

        let matches: Vec<RestaurantListing> = listings
            .into_iter()
            .filter(|listing| {
                listing.restaurant_name.to_lowercase().contains(&term)
                    || listing
                        .items
                        .iter()
                        .any(|item| item.category.to_lowercase().contains(&term))
            })
            .collect();
        debug!(%term, matches = matches.len(), "Restaurant search");
        Ok(matches)
    }

    /// Adds one of the item to the customer's cart. Returns the cart afterwards.
    ///
    /// # Errors
    /// `Unavailable` for switched-off items; `MixedRestaurantCart` (as an account
    /// error) when the cart holds another restaurant's items.
    #[instrument(skip(self))]
    pub async fn add_to_cart(
        &self,
        session: &Session,
        menu_item_id: MenuItemId,
    ) -> Result<Vec<CartLine>, MenuError> {
        session.require(Role::Customer)?;
        let item = self.existing(menu_item_id).await?;
        if !item.available {
            return Err(MenuError::Unavailable(menu_item_id));
        }

        let restaurant = self
            .accounts
            .find_by_id(item.restaurant_id)
            .await?
            .ok_or_else(|| AccountError::NotFound(item.restaurant_id.to_string()))?;
        let restaurant_name = restaurant
            .restaurant_name()
            .unwrap_or(restaurant.name.as_str())
            .to_string();

        let line = CartLine {
            menu_item_id,
            name: item.name,
            price: item.price,
            restaurant_id: item.restaurant_id,
            restaurant_name,
            quantity: 1,
        };
        Ok(self.accounts.add_line(session, line).await?)
    }
}
