use chrono::{DateTime, NaiveDate, Utc};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    #[default]
    #[display("dog")]
    Dog,
    #[display("cat")]
    Cat,
    #[display("bird")]
    Bird,
    #[display("rabbit")]
    Rabbit,
    #[display("hamster")]
    Hamster,
    #[display("fish")]
    Fish,
    #[display("other")]
    Other,
}

#[derive(Debug, Display, Error, Clone, PartialEq)]
#[display("unknown species: {_0}")]
pub struct UnknownSpecies(#[error(not(source))] pub String);

impl Species {
    pub const ALL: [Species; 7] = [
        Species::Dog,
        Species::Cat,
        Species::Bird,
        Species::Rabbit,
        Species::Hamster,
        Species::Fish,
        Species::Other,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Species::Dog => "dog",
            Species::Cat => "cat",
            Species::Bird => "bird",
            Species::Rabbit => "rabbit",
            Species::Hamster => "hamster",
            Species::Fish => "fish",
            Species::Other => "other",
        }
    }

    pub const fn emoji(self) -> &'static str {
        match self {
            Species::Dog => "🐕",
            Species::Cat => "🐈",
            Species::Bird => "🐦",
            Species::Rabbit => "🐰",
            Species::Hamster => "🐹",
            Species::Fish => "🐠",
            Species::Other => "🐾",
        }
    }
}

impl FromStr for Species {
    type Err = UnknownSpecies;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        Species::ALL
            .into_iter()
            .find(|species| species.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| UnknownSpecies(value.to_string()))
    }
}

/// Row of the `pets` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub species: Species,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values supplied by the user to create a pet.
///
/// `species` stays optional so an unselected species reaches validation
/// instead of failing at parse time.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewPet {
    pub name: String,
    pub species: Option<Species>,
    pub breed: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub weight: Option<f64>,
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Changes applied to an existing pet.
///
/// `name` and `species` are only sent when present; the optional fields are
/// always sent so a `None` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PetUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub species: Option<Species>,
    pub breed: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub weight: Option<f64>,
    pub notes: Option<String>,
}
