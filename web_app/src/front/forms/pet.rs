use crate::{
    i18n::TrKey,
    models::{
        self,
        pet::{NewPet, PetUpdate, Species},
    },
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Add/edit pet form as submitted. Every field is kept as text so a failed
/// submit can render the modal again with exactly what the user typed.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub species: String,
    #[serde(default)]
    pub breed: String,
    #[serde(default)]
    pub birth_date: String,
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub notes: String,
}

fn optional_text(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl PetForm {
    /// Strips markup from the free-text fields
    pub fn sanitized(self) -> Self {
        Self {
            name: super::plain_text(&self.name),
            breed: super::plain_text(&self.breed),
            notes: super::plain_text(&self.notes),
            ..self
        }
    }

    pub fn species(&self) -> Option<Species> {
        self.species.parse().ok()
    }

    pub fn birth_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.birth_date.trim(), "%Y-%m-%d").ok()
    }

    /// Weight in kg; empty, unparsable and zero weights are left unset
    pub fn weight(&self) -> Option<f64> {
        self.weight
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|w| w.is_finite() && *w != 0.0)
    }

    /// Required fields, checked before anything is sent
    pub fn validate(&self) -> Result<(), TrKey> {
        if self.name.trim().is_empty() {
            return Err(TrKey::PetNameRequired);
        }
        if self.species().is_none() {
            return Err(TrKey::SpeciesRequired);
        }

        Ok(())
    }

    pub fn to_new_pet(&self) -> NewPet {
        NewPet {
            name: self.name.trim().to_string(),
            species: self.species(),
            breed: optional_text(&self.breed),
            birth_date: self.birth_date(),
            weight: self.weight(),
            notes: optional_text(&self.notes),
            avatar_url: None,
        }
    }

    pub fn to_update(&self) -> PetUpdate {
        PetUpdate {
            name: Some(self.name.trim().to_string()),
            species: self.species(),
            breed: optional_text(&self.breed),
            birth_date: self.birth_date(),
            weight: self.weight(),
            notes: optional_text(&self.notes),
        }
    }
}

impl From<&models::pet::Pet> for PetForm {
    fn from(pet: &models::pet::Pet) -> Self {
        Self {
            name: pet.name.clone(),
            species: pet.species.as_str().to_string(),
            breed: pet.breed.clone().unwrap_or_default(),
            birth_date: pet
                .birth_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            weight: pet.weight.map(|w| w.to_string()).unwrap_or_default(),
            notes: pet.notes.clone().unwrap_or_default(),
        }
    }
}
