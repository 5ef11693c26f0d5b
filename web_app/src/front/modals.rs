//! Modal dialogs: add pet, edit pet, log mood and delete confirmation.
//!
//! Open modals are remembered in [`super::state::ClientState`] as
//! [`OpenModal`] so they survive the next request; the rendered [`Modal`]
//! is rebuilt from it (or from the submitted form after a failed submit).

use super::{
    components,
    document::{self, Fragment},
    forms,
};
use crate::{
    i18n::{self, Locale, TrKey},
    models::{mood::Mood, pet::{Pet, Species}},
};
use chrono::NaiveDate;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModalKind {
    AddPet,
    EditPet,
    LogMood,
    ConfirmDelete,
}

#[derive(Debug, Display, Error, Clone, PartialEq)]
#[display("unknown modal: {_0}")]
pub struct UnknownModal(#[error(not(source))] pub String);

impl ModalKind {
    /// Element id of the modal, unique among open modals
    pub const fn id(self) -> &'static str {
        match self {
            ModalKind::AddPet => "add-pet-modal",
            ModalKind::EditPet => "edit-pet-modal",
            ModalKind::LogMood => "mood-modal",
            ModalKind::ConfirmDelete => "confirm-delete-modal",
        }
    }

    /// Path segment under `/modal/`
    pub const fn slug(self) -> &'static str {
        match self {
            ModalKind::AddPet => "add-pet",
            ModalKind::EditPet => "edit-pet",
            ModalKind::LogMood => "mood",
            ModalKind::ConfirmDelete => "confirm-delete",
        }
    }

    const fn template(self) -> &'static str {
        match self {
            ModalKind::AddPet => "modals/add_pet.html",
            ModalKind::EditPet => "modals/edit_pet.html",
            ModalKind::LogMood => "modals/mood.html",
            ModalKind::ConfirmDelete => "modals/confirm_delete.html",
        }
    }
}

impl FromStr for ModalKind {
    type Err = UnknownModal;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            ModalKind::AddPet,
            ModalKind::EditPet,
            ModalKind::LogMood,
            ModalKind::ConfirmDelete,
        ]
        .into_iter()
        .find(|kind| kind.slug() == s)
        .ok_or_else(|| UnknownModal(s.to_string()))
    }
}

/// Open modal as remembered between requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenModal {
    pub kind: ModalKind,
    #[serde(default)]
    pub pet_id: Option<Uuid>,
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CloseReason {
    #[display("close-button")]
    CloseButton,
    #[display("backdrop")]
    Backdrop,
    #[display("escape")]
    Escape,
}

/// Submit control of a modal form. While its request runs, htmx disables
/// it (`hx-disabled-elt`) and the stylesheet swaps in the pending label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitButton {
    pub label: String,
    pub pending_label: String,
}

impl SubmitButton {
    pub fn new(locale: Locale, label: TrKey, pending_label: TrKey) -> Self {
        Self {
            label: i18n::t(locale, label, &[]),
            pending_label: i18n::t(locale, pending_label, &[]),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Modal {
    pub open: OpenModal,
    pub title: String,
    pub body: Fragment,
    pub submit: Option<SubmitButton>,
}

impl Modal {
    pub fn id(&self) -> &'static str {
        self.open.kind.id()
    }

    pub fn kind(&self) -> ModalKind {
        self.open.kind
    }

    fn new(open: OpenModal, title: String, context: serde_json::Value, submit: Option<SubmitButton>) -> Self {
        Self {
            open,
            title,
            body: Fragment::new(open.kind.template(), context),
            submit,
        }
    }

    pub fn add_pet(locale: Locale, form: &forms::pet::PetForm) -> Self {
        Self::new(
            OpenModal {
                kind: ModalKind::AddPet,
                pet_id: None,
            },
            i18n::t(locale, TrKey::AddPet, &[]),
            json!({
                "form": form,
                "species": species_options(),
                "action": "/pets",
            }),
            Some(SubmitButton::new(locale, TrKey::Save, TrKey::Creating)),
        )
    }

    pub fn edit_pet(locale: Locale, pet_id: Uuid, form: &forms::pet::PetForm) -> Self {
        Self::new(
            OpenModal {
                kind: ModalKind::EditPet,
                pet_id: Some(pet_id),
            },
            i18n::t(locale, TrKey::EditPet, &[]),
            json!({
                "form": form,
                "species": species_options(),
                "action": format!("/pets/{pet_id}"),
                "pet_id": pet_id,
            }),
            Some(SubmitButton::new(locale, TrKey::Save, TrKey::Saving)),
        )
    }

    pub fn log_mood(locale: Locale, pet_id: Uuid, form: &forms::mood::MoodForm) -> Self {
        Self::new(
            OpenModal {
                kind: ModalKind::LogMood,
                pet_id: Some(pet_id),
            },
            i18n::t(locale, TrKey::HowIsFeeling, &[("name", &form.pet_name)]),
            json!({
                "moods": Mood::ALL.iter().map(|mood| json!({
                    "id": mood.as_str(),
                    "emoji": mood.emoji(),
                    "color": mood.color(),
                    "selected": form.mood.as_deref() == Some(mood.as_str()),
                })).collect::<Vec<_>>(),
                "note": form.note,
                "pet_name": form.pet_name,
                "action": format!("/pets/{pet_id}/mood"),
            }),
            Some(SubmitButton::new(locale, TrKey::LogMoodButton, TrKey::Logging)),
        )
    }

    pub fn confirm_delete(locale: Locale, pet: &Pet, today: NaiveDate) -> Self {
        Self::new(
            OpenModal {
                kind: ModalKind::ConfirmDelete,
                pet_id: Some(pet.id),
            },
            i18n::t(locale, TrKey::DeletePet, &[]),
            json!({
                "pet": components::pet_context(locale, pet, today),
                "action": format!("/pets/{}/delete", pet.id),
            }),
            Some(SubmitButton::new(
                locale,
                TrKey::ConfirmDeleteButton,
                TrKey::Deleting,
            )),
        )
    }

    pub fn render(&self, locale: Locale) -> Result<String, tera::Error> {
        let mut body = self.body.clone();
        if let (Some(context), Some(submit)) = (body.context.as_object_mut(), &self.submit) {
            context.insert("submit".to_string(), json!(submit));
        }
        let body_html = document::render_fragment(&body, locale)?;

        document::render_fragment(
            &Fragment::new(
                "modals/frame.html",
                json!({
                    "id": self.id(),
                    "slug": self.kind().slug(),
                    "title": self.title,
                    "body_html": body_html,
                }),
            ),
            locale,
        )
    }
}

fn species_options() -> Vec<&'static str> {
    Species::ALL.iter().map(|s| s.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::front::document::Document;

    #[test]
    fn test_modal_kind_slug_round_trip() {
        for kind in [
            ModalKind::AddPet,
            ModalKind::EditPet,
            ModalKind::LogMood,
            ModalKind::ConfirmDelete,
        ] {
            assert_eq!(kind.slug().parse::<ModalKind>(), Ok(kind));
        }
        assert!("settings".parse::<ModalKind>().is_err());
    }

    #[test]
    fn test_opening_same_modal_replaces_it() {
        let mut document = Document::new();
        let mut first = forms::pet::PetForm::default();
        first.name = "Luna".to_string();

        document.open_modal(Modal::add_pet(Locale::En, &first));
        document.open_modal(Modal::add_pet(Locale::En, &forms::pet::PetForm::default()));

        assert_eq!(document.modals().len(), 1);
        assert_eq!(
            document.modal("add-pet-modal").map(|m| m.body.context["form"]["name"].clone()),
            Some(json!(""))
        );
    }

    #[test]
    fn test_modal_form_disables_its_submit_while_pending() {
        let html = Modal::edit_pet(Locale::It, Uuid::new_v4(), &forms::pet::PetForm::default())
            .render(Locale::It)
            .unwrap();

        assert!(html.contains(r#"hx-disabled-elt="find button[type=submit]""#));
        assert!(html.contains(r#"<span class="label">Salva</span>"#));
        assert!(html.contains(r#"<span class="pending-label">Salvataggio...</span>"#));
    }

    #[test]
    fn test_close_reason_from_query_value() {
        #[derive(Deserialize)]
        struct Query {
            reason: CloseReason,
        }

        let query: Query = serde_json::from_str(r#"{"reason":"escape"}"#).unwrap();
        assert_eq!(query.reason, CloseReason::Escape);
        assert_eq!(CloseReason::CloseButton.to_string(), "close-button");
    }
}
