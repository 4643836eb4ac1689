use actor_framework::{ActorEntity, FrameworkError, ResourceActor, ResourceClient};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};

// --- Test Entity ---

#[derive(Clone, Debug, PartialEq)]
struct Courier {
    id: u32,
    handle: String,
    on_shift: bool,
}

#[derive(Debug)]
struct CourierCreate {
    handle: String,
}

#[derive(Debug)]
struct CourierUpdate {
    handle: Option<String>,
}

#[derive(Debug)]
enum CourierAction {
    StartShift,
    #[allow(dead_code)]
    Rename(String),
}

#[derive(Debug, PartialEq, thiserror::Error)]
enum CourierError {
    #[error("handle must not be empty")]
    EmptyHandle,
    #[error("handle already taken: {0}")]
    HandleTaken(String),
}

#[async_trait]
impl ActorEntity for Courier {
    type Id = u32;
    type Create = CourierCreate;
    type Update = CourierUpdate;
    type Action = CourierAction;
    type ActionResult = bool;
    type Context = ();
    type Error = CourierError;

    fn id(&self) -> &u32 {
        &self.id
    }

    fn from_create_params(id: u32, params: CourierCreate) -> Result<Self, Self::Error> {
        if params.handle.is_empty() {
            return Err(CourierError::EmptyHandle);
        }
        Ok(Self {
            id,
            handle: params.handle,
            on_shift: false,
        })
    }

    fn check_conflict(&self, existing: &Self) -> Result<(), Self::Error> {
        if self.handle == existing.handle {
            return Err(CourierError::HandleTaken(self.handle.clone()));
        }
        Ok(())
    }

    async fn on_update(
        &mut self,
        update: CourierUpdate,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error> {
        if let Some(handle) = update.handle {
            if handle.is_empty() {
                return Err(CourierError::EmptyHandle);
            }
            self.handle = handle;
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: CourierAction,
        _ctx: &Self::Context,
    ) -> Result<bool, Self::Error> {
        match action {
            CourierAction::StartShift => {
                if self.on_shift {
                    Ok(false)
                } else {
                    self.on_shift = true;
                    Ok(true)
                }
            }
            CourierAction::Rename(handle) => {
                self.handle = handle;
                Ok(true)
            }
        }
    }
}

fn spawn_couriers() -> ResourceClient<Courier> {
    let counter = AtomicU32::new(0);
    let (actor, client) =
        ResourceActor::new(10, move || counter.fetch_add(1, Ordering::Relaxed) + 1);
    tokio::spawn(actor.run(()));
    client
}

// --- Tests ---

#[tokio::test]
async fn test_framework_full_lifecycle() {
    let client = spawn_couriers();

    // 1. Create
    let id = client
        .create(CourierCreate {
            handle: "rider-ana".into(),
        })
        .await
        .unwrap();
    assert_eq!(id, 1);

    // 2. Action
    let changed = client
        .perform_action(id, CourierAction::StartShift)
        .await
        .unwrap();
    assert!(changed);

    let courier = client.get(id).await.unwrap().unwrap();
    assert!(courier.on_shift);

    // 3. Same action again is a no-op
    let changed_again = client
        .perform_action(id, CourierAction::StartShift)
        .await
        .unwrap();
    assert!(!changed_again);

    // 4. Update
    let updated = client
        .update(
            id,
            CourierUpdate {
                handle: Some("rider-bo".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.handle, "rider-bo");

    // 5. Delete
    client.delete(id).await.unwrap();
    assert!(client.get(id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_check_conflict_rejects_create() {
    let client = spawn_couriers();

    client
        .create(CourierCreate {
            handle: "rider-ana".into(),
        })
        .await
        .unwrap();
    let err = client
        .create(CourierCreate {
            handle: "rider-ana".into(),
        })
        .await
        .unwrap_err();

    assert_eq!(
        err.into_entity_error::<CourierError>().unwrap(),
        CourierError::HandleTaken("rider-ana".into())
    );
    assert_eq!(client.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_failed_update_leaves_entity_untouched() {
    let client = spawn_couriers();
    let id = client
        .create(CourierCreate {
            handle: "rider-ana".into(),
        })
        .await
        .unwrap();

    let err = client
        .update(id, CourierUpdate { handle: Some(String::new()) })
        .await
        .unwrap_err();
    assert!(matches!(err, FrameworkError::EntityError(_)));

    let courier = client.get(id).await.unwrap().unwrap();
    assert_eq!(courier.handle, "rider-ana");
}

#[tokio::test]
async fn test_missing_entity_is_not_found() {
    let client = spawn_couriers();

    let err = client
        .perform_action(42, CourierAction::StartShift)
        .await
        .unwrap_err();
    assert!(matches!(err, FrameworkError::NotFound(id) if id == "42"));

    let err = client.delete(42).await.unwrap_err();
    assert!(matches!(err, FrameworkError::NotFound(_)));
}

#[tokio::test]
async fn test_seed_restores_under_own_ids() {
    let client = spawn_couriers();

    let size = client
        .seed(vec![
            Courier {
                id: 10,
                handle: "rider-ana".into(),
                on_shift: true,
            },
            Courier {
                id: 20,
                handle: "rider-bo".into(),
                on_shift: false,
            },
        ])
        .await
        .unwrap();
    assert_eq!(size, 2);

    let restored = client.get(10).await.unwrap().unwrap();
    assert!(restored.on_shift);

    // Seeded entities take part in conflict checks.
    let err = client
        .create(CourierCreate {
            handle: "rider-bo".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err.into_entity_error::<CourierError>(),
        Ok(CourierError::HandleTaken(_))
    ));
}

#[tokio::test]
async fn test_id_collision_is_reported() {
    let (actor, client) = ResourceActor::<Courier>::new(10, || 7);
    tokio::spawn(actor.run(()));

    client
        .create(CourierCreate {
            handle: "rider-ana".into(),
        })
        .await
        .unwrap();
    let err = client
        .create(CourierCreate {
            handle: "rider-bo".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, FrameworkError::IdCollision(id) if id == "7"));
}

#[tokio::test]
async fn test_client_reports_closed_actor() {
    let (actor, client) = ResourceActor::<Courier>::new(10, || 1);
    drop(actor);

    let err = client.get(1).await.unwrap_err();
    assert!(matches!(err, FrameworkError::ActorClosed));
}
