//! Reusable widgets and the formatting helpers they share.

use super::document::Fragment;
use crate::{
    i18n::{self, Locale, TrKey},
    models::{mood::MoodLog, pet::Pet},
};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use serde_json::{Value, json};

pub const DASHBOARD_CONTENT: &str = "dashboard-content";
pub const TODAYS_MOOD_CONTENT: &str = "todays-mood-content";
pub const MOOD_HISTORY_CONTENT: &str = "mood-history-content";

/// Human readable age from the month difference between `birth_date` and
/// `today`: below a year it counts months, from there whole years
pub fn calculate_age(locale: Locale, birth_date: Option<NaiveDate>, today: NaiveDate) -> String {
    let Some(birth_date) = birth_date else {
        return i18n::t(locale, TrKey::UnknownAge, &[]);
    };

    let months = ((today.year() - birth_date.year()) * 12 + today.month() as i32
        - birth_date.month() as i32)
        .max(0);

    if months < 12 {
        format!("{months} {}", i18n::t(locale, TrKey::MonthsOld, &[]))
    } else {
        format!("{} {}", months / 12, i18n::t(locale, TrKey::YearsOld, &[]))
    }
}

/// Short local date: `M/D/YYYY` in English, `D/M/YYYY` in Italian
pub fn format_date(locale: Locale, date: NaiveDate) -> String {
    match locale {
        Locale::En => format!("{}/{}/{}", date.month(), date.day(), date.year()),
        Locale::It => format!("{}/{}/{}", date.day(), date.month(), date.year()),
    }
}

pub fn format_timestamp(locale: Locale, at: DateTime<Utc>, tz: Tz) -> String {
    format_date(locale, at.with_timezone(&tz).date_naive())
}

/// Local wall-clock time of `at`, 24h
pub fn format_time(at: DateTime<Utc>, tz: Tz) -> String {
    at.with_timezone(&tz).format("%H:%M").to_string()
}

/// Pet fields as templates read them, with the derived labels
pub fn pet_context(locale: Locale, pet: &Pet, today: NaiveDate) -> Value {
    json!({
        "id": pet.id,
        "name": pet.name,
        "species": pet.species.as_str(),
        "species_label": i18n::lookup(locale, pet.species.as_str()),
        "emoji": pet.species.emoji(),
        "avatar_url": pet.avatar_url,
        "age": calculate_age(locale, pet.birth_date, today),
        "breed": pet.breed,
        "birth_date": pet.birth_date.map(|d| format_date(locale, d)),
        "birth_date_value": pet.birth_date.map(|d| d.format("%Y-%m-%d").to_string()),
        "weight": pet.weight,
        "notes": pet.notes,
    })
}

pub fn mood_log_context(locale: Locale, log: &MoodLog, tz: Tz) -> Value {
    json!({
        "mood": log.mood.as_str(),
        "emoji": log.mood.emoji(),
        "color": log.mood.color(),
        "note": log.note,
        "date": format_timestamp(locale, log.logged_at, tz),
        "time": format_time(log.logged_at, tz),
    })
}

pub fn spinner() -> Fragment {
    Fragment::new("widgets/spinner.html", json!({}))
}

pub fn empty_state() -> Fragment {
    Fragment::new("widgets/empty_state.html", json!({}))
}

/// Message with a retry link, left when the pet list could not be loaded
pub fn load_failed() -> Fragment {
    Fragment::new("widgets/load_failed.html", json!({}))
}

/// Pet cards, quick actions and the today's-mood card, whose content is a
/// region of its own
pub fn pet_cards(locale: Locale, pets: &[Pet], current_pet_id: uuid::Uuid, today: NaiveDate) -> Fragment {
    Fragment::new(
        "widgets/pet_cards.html",
        json!({
            "pets": pets.iter().map(|p| pet_context(locale, p, today)).collect::<Vec<_>>(),
            "current_pet_id": current_pet_id,
        }),
    )
    .with_regions(&[TODAYS_MOOD_CONTENT])
}

/// Content of the today's-mood card: the log, or `None` for the call to
/// action. `failed` shows the generic error line instead.
pub fn todays_mood(locale: Locale, log: Option<&MoodLog>, tz: Tz, failed: bool) -> Fragment {
    Fragment::new(
        "widgets/todays_mood.html",
        json!({
            "log": log.map(|log| mood_log_context(locale, log, tz)),
            "failed": failed,
        }),
    )
}

/// Recent logs of the profile screen, newest first
pub fn mood_history(locale: Locale, logs: &[MoodLog], tz: Tz, failed: bool) -> Fragment {
    Fragment::new(
        "widgets/mood_history.html",
        json!({
            "logs": logs.iter().map(|log| mood_log_context(locale, log, tz)).collect::<Vec<_>>(),
            "failed": failed,
        }),
    )
}
