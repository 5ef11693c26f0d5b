//! # Pet API Module
//!
//! Pet management for the signed-in user. Every query is filtered by
//! `user_id` on top of the row-level security of the backend.

use super::{ApiError, parse_row, parse_rows, require_user, to_row};
use crate::{
    backend::{self, Query, Table},
    i18n::TrKey,
    metric, models,
};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

/// Lists the pets of the current user, newest first.
///
/// # Arguments
/// * `backend` - Backend client carrying the current session
///
/// # Returns
/// * `Result<Vec<models::pet::Pet>, ApiError>` - Pets ordered by `created_at`
///   descending
pub async fn get_pets(
    backend: &backend::ImplBackend,
) -> Result<Vec<models::pet::Pet>, ApiError> {
    let _span = logfire::span!("get_pets").entered();
    let user = require_user(backend).await?;

    let rows = backend
        .select(
            &Query::from(Table::Pets)
                .eq("user_id", user.id)
                .order_desc("created_at"),
        )
        .await
        .map_err(|e| ApiError::from_backend("fetching pets", e))?;

    parse_rows(rows)
}

/// Single pet of the current user; `Ok(None)` when it does not exist or
/// belongs to somebody else.
pub async fn get_pet(
    backend: &backend::ImplBackend,
    pet_id: Uuid,
) -> Result<Option<models::pet::Pet>, ApiError> {
    let _span = logfire::span!("get_pet").entered();
    let user = require_user(backend).await?;

    if pet_id.is_nil() {
        return Err(ApiError::Validation(TrKey::PetIdRequired));
    }

    let rows = backend
        .select(
            &Query::from(Table::Pets)
                .eq("id", pet_id)
                .eq("user_id", user.id)
                .limit(1),
        )
        .await
        .map_err(|e| ApiError::from_backend("fetching pet", e))?;

    rows.into_iter().next().map(parse_row).transpose()
}

/// Creates a pet owned by the current user.
///
/// # Arguments
/// * `backend` - Backend client carrying the current session
/// * `new_pet` - User supplied values; the name is trimmed
///
/// # Returns
/// * `Result<models::pet::Pet, ApiError>` - The stored row, with id and
///   timestamps
///
/// # Errors
/// Validation errors are returned before any backend call:
/// - `petNameRequired` when the trimmed name is empty
/// - `speciesRequired` when no species was chosen
pub async fn create_pet(
    backend: &backend::ImplBackend,
    new_pet: models::pet::NewPet,
) -> Result<models::pet::Pet, ApiError> {
    let _span = logfire::span!("create_pet").entered();
    let user = require_user(backend).await?;

    let name = new_pet.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::Validation(TrKey::PetNameRequired));
    }
    let Some(species) = new_pet.species else {
        return Err(ApiError::Validation(TrKey::SpeciesRequired));
    };

    let now = Utc::now();
    let mut row = to_row(&models::pet::NewPet {
        name,
        species: Some(species),
        ..new_pet
    })?;
    if let Some(object) = row.as_object_mut() {
        object.insert("user_id".to_string(), json!(user.id));
        object.insert("created_at".to_string(), json!(now));
        object.insert("updated_at".to_string(), json!(now));
    }

    let stored = backend
        .insert(Table::Pets, row)
        .await
        .map_err(|e| ApiError::from_backend("creating pet", e))?;

    metric::incr_user_action_statds("create_pet");
    parse_row(stored)
}

/// Applies `changes` to a pet of the current user.
///
/// A name that is present but blank is rejected; an absent name keeps the
/// stored one.
pub async fn update_pet(
    backend: &backend::ImplBackend,
    pet_id: Uuid,
    changes: models::pet::PetUpdate,
) -> Result<models::pet::Pet, ApiError> {
    let _span = logfire::span!("update_pet").entered();
    let user = require_user(backend).await?;

    if pet_id.is_nil() {
        return Err(ApiError::Validation(TrKey::PetIdRequired));
    }
    let name = match changes.name {
        Some(name) if name.trim().is_empty() => {
            return Err(ApiError::Validation(TrKey::PetNameEmpty));
        }
        name => name.map(|n| n.trim().to_string()),
    };

    let mut patch = to_row(&models::pet::PetUpdate { name, ..changes })?;
    if let Some(object) = patch.as_object_mut() {
        object.insert("updated_at".to_string(), json!(Utc::now()));
    }

    let stored = backend
        .update(
            &Query::from(Table::Pets)
                .eq("id", pet_id)
                .eq("user_id", user.id),
            patch,
        )
        .await
        .map_err(|e| ApiError::from_backend("updating pet", e))?;

    parse_row(stored)
}

/// Deletes a pet of the current user; its mood logs go with it through the
/// backend's cascading foreign key.
pub async fn delete_pet(backend: &backend::ImplBackend, pet_id: Uuid) -> Result<(), ApiError> {
    let _span = logfire::span!("delete_pet").entered();
    let user = require_user(backend).await?;

    if pet_id.is_nil() {
        return Err(ApiError::Validation(TrKey::PetIdRequired));
    }

    backend
        .delete(
            &Query::from(Table::Pets)
                .eq("id", pet_id)
                .eq("user_id", user.id),
        )
        .await
        .map_err(|e| ApiError::from_backend("deleting pet", e))?;

    metric::incr_user_action_statds("delete_pet");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::{auth, test_support},
        backend::{BackendError, memory::InMemoryBackend},
        models::pet::Species,
    };

    async fn signed_in_memory_backend() -> backend::ImplBackend {
        let backend: backend::ImplBackend = Box::new(InMemoryBackend::new());
        auth::sign_up(&backend, "a@b.com", "password1", "Rex")
            .await
            .unwrap();
        backend
    }

    fn new_pet(name: &str, species: Option<Species>) -> models::pet::NewPet {
        models::pet::NewPet {
            name: name.to_string(),
            species,
            ..Default::default()
        }
    }

    #[ntex::test]
    async fn test_get_pets_unauthenticated_runs_no_query() {
        let backend: backend::ImplBackend = Box::new(test_support::signed_out_mock());

        assert_eq!(get_pets(&backend).await, Err(ApiError::Unauthenticated));
    }

    #[ntex::test]
    async fn test_get_pets_scopes_by_owner_and_orders_newest_first() {
        let pet = test_support::pet("Luna");
        let rows = vec![serde_json::to_value(&pet).unwrap()];

        let mut mock = test_support::signed_in_mock();
        mock.expect_select()
            .withf(|query: &Query| {
                query.table == Table::Pets
                    && query.eq_value("user_id")
                        == Some(test_support::user().id.to_string().as_str())
                    && query
                        .order
                        .as_ref()
                        .is_some_and(|o| o.column == "created_at" && !o.ascending)
            })
            .times(1)
            .returning(move |_| Ok(rows.clone()));
        let backend: backend::ImplBackend = Box::new(mock);

        let result = get_pets(&backend).await;

        assert_eq!(result, Ok(vec![pet]));
    }

    #[ntex::test]
    async fn test_create_pet_requires_name_and_species_before_writing() {
        let mut mock = test_support::signed_in_mock();
        mock.expect_insert().never();
        let backend: backend::ImplBackend = Box::new(mock);

        assert_eq!(
            create_pet(&backend, new_pet("   ", Some(Species::Cat))).await,
            Err(ApiError::Validation(TrKey::PetNameRequired))
        );
        assert_eq!(
            create_pet(&backend, new_pet("Luna", None)).await,
            Err(ApiError::Validation(TrKey::SpeciesRequired))
        );
    }

    #[ntex::test]
    async fn test_create_pet_then_get_pets_includes_it() {
        let backend = signed_in_memory_backend().await;

        let created = create_pet(&backend, new_pet("  Luna ", Some(Species::Cat)))
            .await
            .unwrap();
        let pets = get_pets(&backend).await.unwrap();

        assert_eq!(created.name, "Luna");
        assert!(!created.id.is_nil());
        assert_eq!(created.created_at, created.updated_at);
        assert_eq!(pets, vec![created.clone()]);
        assert_eq!(get_pet(&backend, created.id).await, Ok(Some(created)));
    }

    #[ntex::test]
    async fn test_update_pet_rejects_blank_name_but_accepts_missing_one() {
        let backend = signed_in_memory_backend().await;
        let pet = create_pet(&backend, new_pet("Luna", Some(Species::Cat)))
            .await
            .unwrap();

        let blank = update_pet(
            &backend,
            pet.id,
            models::pet::PetUpdate {
                name: Some(" ".to_string()),
                ..Default::default()
            },
        )
        .await;
        assert_eq!(blank, Err(ApiError::Validation(TrKey::PetNameEmpty)));

        let updated = update_pet(
            &backend,
            pet.id,
            models::pet::PetUpdate {
                breed: Some("Siamese".to_string()),
                weight: Some(4.2),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Luna");
        assert_eq!(updated.breed.as_deref(), Some("Siamese"));
        assert!(updated.updated_at >= pet.updated_at);
    }

    #[ntex::test]
    async fn test_update_missing_pet_reports_backend_message() {
        let backend = signed_in_memory_backend().await;

        let result = update_pet(
            &backend,
            Uuid::new_v4(),
            models::pet::PetUpdate {
                name: Some("Max".to_string()),
                ..Default::default()
            },
        )
        .await;

        assert!(matches!(result, Err(ApiError::Backend(_))));
    }

    #[ntex::test]
    async fn test_delete_pet_requires_id_and_removes_row() {
        let backend = signed_in_memory_backend().await;
        let pet = create_pet(&backend, new_pet("Luna", Some(Species::Cat)))
            .await
            .unwrap();

        assert_eq!(
            delete_pet(&backend, Uuid::nil()).await,
            Err(ApiError::Validation(TrKey::PetIdRequired))
        );
        assert_eq!(delete_pet(&backend, pet.id).await, Ok(()));
        assert_eq!(get_pets(&backend).await, Ok(vec![]));
    }

    #[ntex::test]
    async fn test_delete_pet_network_failure() {
        let mut mock = test_support::signed_in_mock();
        mock.expect_delete()
            .times(1)
            .returning(|_| Err(BackendError::Transport("timeout".into())));
        let backend: backend::ImplBackend = Box::new(mock);

        let result = delete_pet(&backend, Uuid::new_v4()).await;

        assert_eq!(
            result,
            Err(ApiError::Network(
                "Network error occurred while deleting pet".to_string()
            ))
        );
    }
}
