//! # Mock Clients
//!
//! Test doubles that stand in for a running `ResourceActor`.
//!
//! | | MockClient | Real actor |
//! |---|---|---|
//! | **State** | scripted responses | real store |
//! | **Use case** | logic *around* a client, error injection | the entity itself, full flows |
//!
//! Two styles are available:
//!
//! - [`MockClient`]: queue expectations up front (`expect_get(id).return_ok(..)`), run the
//!   code under test, then [`MockClient::verify`] that every expectation was consumed.
//!   Requests must arrive in the queued order and for the queued ids.
//! - [`create_mock_client`]: receive the raw [`ResourceRequest`]s yourself and answer them
//!   with [`expect_create`], [`expect_get`], [`expect_list`] or [`expect_action`].
//!
//! The typical use is an actor under test whose context holds mocked dependencies,
//! e.g. a real order actor whose account and delivery clients are mocks.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// A scripted response for one expected request.
enum Expectation<T: ActorEntity> {
    Get {
        id: T::Id,
        response: Result<Option<T>, FrameworkError>,
    },
    Create {
        response: Result<T::Id, FrameworkError>,
    },
    List {
        response: Result<Vec<T>, FrameworkError>,
    },
    Update {
        id: T::Id,
        response: Result<T, FrameworkError>,
    },
    Delete {
        id: T::Id,
        response: Result<(), FrameworkError>,
    },
    Action {
        id: T::Id,
        response: Result<T::ActionResult, FrameworkError>,
    },
}

impl<T: ActorEntity> Expectation<T> {
    fn name(&self) -> &'static str {
        match self {
            Self::Get { .. } => "Get",
            Self::Create { .. } => "Create",
            Self::List { .. } => "List",
            Self::Update { .. } => "Update",
            Self::Delete { .. } => "Delete",
            Self::Action { .. } => "Action",
        }
    }
}

type Expectations<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

fn check_id<Id: PartialEq + std::fmt::Debug>(op: &str, expected: &Id, actual: &Id) {
    assert_eq!(expected, actual, "{op} sent for an unexpected id");
}

/// A mock client with expectation tracking for fluent testing.
///
/// ```rust,ignore
/// let mut accounts = MockClient::<Account>::new();
/// accounts
///     .expect_action(customer_id.clone())
///     .return_ok(AccountActionResult::CartTaken(taken));
///
/// let (actor, orders) = order_actor::new(8);
/// tokio::spawn(actor.run(OrderContext::new(accounts.client(), deliveries, fee)));
/// // ... drive the order actor ...
/// accounts.verify();
/// ```
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Expectations<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations.
    ///
    /// A request that does not match the next expectation panics the responder task,
    /// which surfaces to the caller as [`FrameworkError::ActorDropped`].
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Expectations<T> = Arc::new(Mutex::new(VecDeque::new()));
        let queue = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = queue.lock().unwrap().pop_front();

                match (request, expectation) {
                    (ResourceRequest::Get { id, respond_to }, Some(Expectation::Get { id: want, response })) => {
                        check_id("Get", &want, &id);
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::Create { respond_to, .. }, Some(Expectation::Create { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::List { respond_to }, Some(Expectation::List { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Update { id, respond_to, .. },
                        Some(Expectation::Update { id: want, response }),
                    ) => {
                        check_id("Update", &want, &id);
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::Delete { id, respond_to }, Some(Expectation::Delete { id: want, response })) => {
                        check_id("Delete", &want, &id);
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Action { id, respond_to, .. },
                        Some(Expectation::Action { id: want, response }),
                    ) => {
                        check_id("Action", &want, &id);
                        let _ = respond_to.send(response);
                    }
                    (_, Some(other)) => {
                        panic!("Unexpected request, next expectation was {}", other.name());
                    }
                    (_, None) => panic!("Unexpected request, no expectations left"),
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    fn push(&self, expectation: Expectation<T>) {
        self.expectations.lock().unwrap().push_back(expectation);
    }

    /// Expects a `get` for `id`.
    pub fn expect_get(&mut self, id: T::Id) -> GetExpectationBuilder<'_, T> {
        GetExpectationBuilder { mock: self, id }
    }

    /// Expects a `create`.
    pub fn expect_create(&mut self) -> CreateExpectationBuilder<'_, T> {
        CreateExpectationBuilder { mock: self }
    }

    /// Expects a `list`.
    pub fn expect_list(&mut self) -> ListExpectationBuilder<'_, T> {
        ListExpectationBuilder { mock: self }
    }

    /// Expects an `update` for `id`.
    pub fn expect_update(&mut self, id: T::Id) -> UpdateExpectationBuilder<'_, T> {
        UpdateExpectationBuilder { mock: self, id }
    }

    /// Expects a `delete` for `id`.
    pub fn expect_delete(&mut self, id: T::Id) -> DeleteExpectationBuilder<'_, T> {
        DeleteExpectationBuilder { mock: self, id }
    }

    /// Expects an `action` on `id`.
    pub fn expect_action(&mut self, id: T::Id) -> ActionExpectationBuilder<'_, T> {
        ActionExpectationBuilder { mock: self, id }
    }

    /// Panics unless every expectation was consumed.
    pub fn verify(&self) {
        let remaining = self.expectations.lock().unwrap().len();
        assert!(remaining == 0, "Not all expectations were met. {remaining} remaining");
    }
}

/// Builder for `get` expectations.
pub struct GetExpectationBuilder<'a, T: ActorEntity> {
    mock: &'a MockClient<T>,
    id: T::Id,
}

impl<T: ActorEntity> GetExpectationBuilder<'_, T> {
    pub fn return_ok(self, value: Option<T>) {
        self.mock.push(Expectation::Get { id: self.id, response: Ok(value) });
    }

    pub fn return_err(self, error: FrameworkError) {
        self.mock.push(Expectation::Get { id: self.id, response: Err(error) });
    }
}

/// Builder for `create` expectations.
pub struct CreateExpectationBuilder<'a, T: ActorEntity> {
    mock: &'a MockClient<T>,
}

impl<T: ActorEntity> CreateExpectationBuilder<'_, T> {
    pub fn return_ok(self, id: T::Id) {
        self.mock.push(Expectation::Create { response: Ok(id) });
    }

    pub fn return_err(self, error: FrameworkError) {
        self.mock.push(Expectation::Create { response: Err(error) });
    }
}

/// Builder for `list` expectations.
pub struct ListExpectationBuilder<'a, T: ActorEntity> {
    mock: &'a MockClient<T>,
}

impl<T: ActorEntity> ListExpectationBuilder<'_, T> {
    pub fn return_ok(self, items: Vec<T>) {
        self.mock.push(Expectation::List { response: Ok(items) });
    }

    pub fn return_err(self, error: FrameworkError) {
        self.mock.push(Expectation::List { response: Err(error) });
    }
}

/// Builder for `update` expectations.
pub struct UpdateExpectationBuilder<'a, T: ActorEntity> {
    mock: &'a MockClient<T>,
    id: T::Id,
}

impl<T: ActorEntity> UpdateExpectationBuilder<'_, T> {
    pub fn return_ok(self, updated: T) {
        self.mock.push(Expectation::Update { id: self.id, response: Ok(updated) });
    }

    pub fn return_err(self, error: FrameworkError) {
        self.mock.push(Expectation::Update { id: self.id, response: Err(error) });
    }
}

/// Builder for `delete` expectations.
pub struct DeleteExpectationBuilder<'a, T: ActorEntity> {
    mock: &'a MockClient<T>,
    id: T::Id,
}

impl<T: ActorEntity> DeleteExpectationBuilder<'_, T> {
    pub fn return_ok(self) {
        self.mock.push(Expectation::Delete { id: self.id, response: Ok(()) });
    }

    pub fn return_err(self, error: FrameworkError) {
        self.mock.push(Expectation::Delete { id: self.id, response: Err(error) });
    }
}

/// Builder for `action` expectations.
pub struct ActionExpectationBuilder<'a, T: ActorEntity> {
    mock: &'a MockClient<T>,
    id: T::Id,
}

impl<T: ActorEntity> ActionExpectationBuilder<'_, T> {
    pub fn return_ok(self, result: T::ActionResult) {
        self.mock.push(Expectation::Action { id: self.id, response: Ok(result) });
    }

    pub fn return_err(self, error: FrameworkError) {
        self.mock.push(Expectation::Action { id: self.id, response: Err(error) });
    }
}

// =============================================================================
// RAW CHANNEL HELPERS
// =============================================================================

/// Creates a client whose requests arrive on the returned receiver.
///
/// Use it when the test needs to inspect the request payload (e.g. which action an
/// order client sent) before answering.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Next message, if it is a Create request.
pub async fn expect_create<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Create, crate::Response<T::Id>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Next message, if it is a Get request.
pub async fn expect_get<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, crate::Response<Option<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Next message, if it is a List request.
pub async fn expect_list<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<crate::Response<Vec<T>>> {
    match receiver.recv().await {
        Some(ResourceRequest::List { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Next message, if it is an Action request.
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, crate::Response<T::ActionResult>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}
