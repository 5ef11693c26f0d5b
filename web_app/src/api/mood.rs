//! # Mood API Module
//!
//! Append-only mood logs of the current user's pets and the "today's mood"
//! lookup, where today is the user's local calendar day.

use super::{ApiError, parse_row, parse_rows, require_user, to_row};
use crate::{
    backend::{self, Query, Table},
    consts,
    i18n::TrKey,
    metric, models,
};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use uuid::Uuid;

/// Most recent mood logs of a pet.
///
/// # Arguments
/// * `backend` - Backend client carrying the current session
/// * `pet_id` - Pet whose history is requested
/// * `limit` - Maximum number of logs, [`consts::MOOD_HISTORY_LIMIT`] when `None`
///
/// # Returns
/// * `Result<Vec<models::mood::MoodLog>, ApiError>` - Logs ordered by
///   `logged_at` descending
pub async fn get_mood_logs(
    backend: &backend::ImplBackend,
    pet_id: Uuid,
    limit: Option<usize>,
) -> Result<Vec<models::mood::MoodLog>, ApiError> {
    let _span = logfire::span!("get_mood_logs").entered();
    let user = require_user(backend).await?;

    if pet_id.is_nil() {
        return Err(ApiError::Validation(TrKey::PetIdRequired));
    }

    let rows = backend
        .select(
            &Query::from(Table::MoodLogs)
                .eq("pet_id", pet_id)
                .eq("user_id", user.id)
                .order_desc("logged_at")
                .limit(limit.unwrap_or(consts::MOOD_HISTORY_LIMIT)),
        )
        .await
        .map_err(|e| ApiError::from_backend("fetching mood logs", e))?;

    parse_rows(rows)
}

/// Records the mood of a pet now.
///
/// `mood` comes straight from the submitted form and must be one of the six
/// known moods. A blank `note` is stored as null.
///
/// # Errors
/// Validation errors are returned before any backend call:
/// - `petIdRequired` for a nil pet id
/// - `moodRequired` when `mood` is empty
/// - `invalidMood` for any other unknown value
pub async fn log_mood(
    backend: &backend::ImplBackend,
    pet_id: Uuid,
    mood: &str,
    note: Option<&str>,
) -> Result<models::mood::MoodLog, ApiError> {
    let _span = logfire::span!("log_mood").entered();
    let user = require_user(backend).await?;

    if pet_id.is_nil() {
        return Err(ApiError::Validation(TrKey::PetIdRequired));
    }
    if mood.trim().is_empty() {
        return Err(ApiError::Validation(TrKey::MoodRequired));
    }
    let mood: models::mood::Mood = mood
        .trim()
        .parse()
        .map_err(|_| ApiError::Validation(TrKey::InvalidMood))?;

    let row = to_row(&models::mood::NewMoodLog {
        pet_id,
        user_id: user.id,
        mood,
        note: note
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string),
        logged_at: Utc::now(),
    })?;

    let stored = backend
        .insert(Table::MoodLogs, row)
        .await
        .map_err(|e| ApiError::from_backend("logging mood", e))?;

    metric::incr_user_action_statds("log_mood");
    parse_row(stored)
}

/// Most recent mood logged for a pet during the current local day of `tz`;
/// `Ok(None)` when nothing was logged yet.
pub async fn get_todays_mood(
    backend: &backend::ImplBackend,
    pet_id: Uuid,
    tz: Tz,
) -> Result<Option<models::mood::MoodLog>, ApiError> {
    get_todays_mood_at(backend, pet_id, tz, Utc::now()).await
}

/// [`get_todays_mood`] evaluated at `now`: logs in `[start of local day, now)`
pub async fn get_todays_mood_at(
    backend: &backend::ImplBackend,
    pet_id: Uuid,
    tz: Tz,
    now: DateTime<Utc>,
) -> Result<Option<models::mood::MoodLog>, ApiError> {
    let _span = logfire::span!("get_todays_mood").entered();
    let user = require_user(backend).await?;

    if pet_id.is_nil() {
        return Err(ApiError::Validation(TrKey::PetIdRequired));
    }

    let rows = backend
        .select(
            &Query::from(Table::MoodLogs)
                .eq("pet_id", pet_id)
                .eq("user_id", user.id)
                .gte("logged_at", start_of_local_day(now, tz).to_rfc3339())
                .lt("logged_at", now.to_rfc3339())
                .order_desc("logged_at")
                .limit(1),
        )
        .await
        .map_err(|e| ApiError::from_backend("fetching today's mood", e))?;

    rows.into_iter().next().map(parse_row).transpose()
}

/// Local midnight of the day containing `now`. When midnight does not exist
/// (DST change at 00:00) the first valid local instant after it is used.
pub fn start_of_local_day(now: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
    let midnight = now.with_timezone(&tz).date_naive().and_time(chrono::NaiveTime::MIN);

    (0..=2)
        .find_map(|hours| {
            tz.from_local_datetime(&(midnight + TimeDelta::hours(hours)))
                .earliest()
        })
        .map(|start| start.with_timezone(&Utc))
        .unwrap_or(now)
}
