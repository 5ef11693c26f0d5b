//! Screen state machine run once per request.
//!
//! A [`Controller`] owns the [`ClientState`] restored from the session cookie
//! and an empty [`Document`]. Handlers feed it one user interaction, then
//! call [`Controller::respond`] to get the page to render and the state to
//! persist. Backend calls happen in sequence; results are written into
//! document regions, which skip writes to regions that are gone.

use super::{
    components::{self, DASHBOARD_CONTENT, MOOD_HISTORY_CONTENT, TODAYS_MOOD_CONTENT},
    document::{Document, Fragment, ToastKind},
    forms::{
        mood::MoodForm,
        pet::PetForm,
        user::{LoginForm, RegisterForm},
    },
    modals::{CloseReason, Modal, ModalKind, OpenModal},
    state::{ClientState, NavPage, Screen},
};
use crate::{
    api::{self, ApiError},
    backend,
    i18n::{self, Locale, TrKey},
    models::pet::Pet,
};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use serde_json::json;
use uuid::Uuid;

pub struct Controller<'a> {
    backend: &'a backend::ImplBackend,
    state: ClientState,
    tz: Tz,
    today: NaiveDate,
    document: Document,
}

impl<'a> Controller<'a> {
    pub fn new(backend: &'a backend::ImplBackend, state: ClientState, tz: Tz) -> Self {
        Self {
            backend,
            state,
            tz,
            today: Utc::now().with_timezone(&tz).date_naive(),
            document: Document::new(),
        }
    }

    pub fn locale(&self) -> Locale {
        self.state.locale
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn toast(&mut self, kind: ToastKind, key: TrKey) {
        let message = i18n::t(self.state.locale, key, &[]);
        self.document.toast(kind, message);
    }

    fn toast_api_error(&mut self, err: &ApiError) {
        let message = err.user_message(self.state.locale);
        self.document.toast(ToastKind::Error, message);
    }

    fn mount(&mut self, screen: Screen, fragment: Fragment) {
        self.state.screen = screen;
        self.document.mount(screen, fragment);
    }

    /// Page load: dashboard with a valid session, login otherwise. A stored
    /// session the provider rejects is signed out first.
    pub async fn init(&mut self) {
        self.state.modals.clear();

        if api::auth::check_auth(self.backend).await {
            self.load_dashboard().await;
            return;
        }

        if self.backend.session().is_some() {
            if let Err(e) = api::auth::sign_out(self.backend).await {
                logfire::warn!(
                    "stale session not signed out: {error}",
                    error = e.to_string()
                );
            }
        }
        self.state.current_pet_id = None;
        self.show_login();
    }

    pub fn show_login(&mut self) {
        self.show_login_with(&LoginForm::default());
    }

    fn show_login_with(&mut self, form: &LoginForm) {
        self.mount(
            Screen::Login,
            Fragment::new("screens/login.html", json!({ "email": form.email })),
        );
    }

    pub fn show_register(&mut self) {
        self.show_register_with(&RegisterForm::default());
    }

    fn show_register_with(&mut self, form: &RegisterForm) {
        self.mount(
            Screen::Register,
            Fragment::new(
                "screens/register.html",
                json!({ "name": form.name, "email": form.email }),
            ),
        );
    }

    pub fn show_settings(&mut self) {
        let Some(session) = self.backend.session() else {
            return self.show_login();
        };

        self.mount(
            Screen::Settings,
            Fragment::new(
                "screens/settings.html",
                json!({
                    "user_name": session.user.display_name(),
                    "user_email": session.user.email,
                }),
            ),
        );
    }

    /// Mounts the dashboard, then fills it: spinner, pets (or the empty
    /// state), and finally today's mood of the first pet, which becomes the
    /// current pet
    pub async fn load_dashboard(&mut self) {
        if self.backend.session().is_none() {
            return self.show_login();
        }

        self.mount(
            Screen::Dashboard,
            Fragment::new("screens/dashboard.html", json!({})).with_regions(&[DASHBOARD_CONTENT]),
        );
        self.document
            .write_region(DASHBOARD_CONTENT, components::spinner());

        let pets = match api::pet::get_pets(self.backend).await {
            Ok(pets) => pets,
            Err(ApiError::Unauthenticated) => return self.show_login(),
            Err(_) => {
                self.toast(ToastKind::Error, TrKey::SomethingWentWrong);
                self.document
                    .write_region(DASHBOARD_CONTENT, components::load_failed());
                return;
            }
        };

        let Some(first) = pets.first() else {
            self.state.current_pet_id = None;
            self.document
                .write_region(DASHBOARD_CONTENT, components::empty_state());
            return;
        };

        self.state.current_pet_id = Some(first.id);

        self.document.write_region(
            DASHBOARD_CONTENT,
            components::pet_cards(self.state.locale, &pets, first.id, self.today),
        );
        self.document
            .write_region(TODAYS_MOOD_CONTENT, components::spinner());
        self.document.set_fab(true);

        self.load_todays_mood().await;
    }

    /// Fills the today's-mood card of the current pet, if the card is shown
    pub async fn load_todays_mood(&mut self) {
        let Some(pet_id) = self.state.current_pet_id else {
            return;
        };
        if !self.document.has_region(TODAYS_MOOD_CONTENT) {
            return;
        }

        let fragment = match api::mood::get_todays_mood(self.backend, pet_id, self.tz).await {
            Ok(log) => components::todays_mood(self.state.locale, log.as_ref(), self.tz, false),
            Err(_) => components::todays_mood(self.state.locale, None, self.tz, true),
        };
        self.document.write_region(TODAYS_MOOD_CONTENT, fragment);
    }

    pub async fn open_pet_profile(&mut self, pet_id: Uuid) {
        match api::pet::get_pet(self.backend, pet_id).await {
            Ok(Some(pet)) => self.show_pet_profile(pet).await,
            Ok(None) => {
                if self.state.current_pet_id == Some(pet_id) {
                    self.state.current_pet_id = None;
                }
                self.toast(ToastKind::Error, TrKey::SomethingWentWrong);
            }
            Err(ApiError::Unauthenticated) => self.show_login(),
            Err(e) => self.toast_api_error(&e),
        }
    }

    /// Profile of `pet`, which becomes the current pet, with its mood history
    pub async fn show_pet_profile(&mut self, pet: Pet) {
        let locale = self.state.locale;
        self.state.current_pet_id = Some(pet.id);

        self.mount(
            Screen::Profile,
            Fragment::new(
                "screens/profile.html",
                json!({ "pet": components::pet_context(locale, &pet, self.today) }),
            )
            .with_regions(&[MOOD_HISTORY_CONTENT]),
        );
        self.document
            .write_region(MOOD_HISTORY_CONTENT, components::spinner());

        let fragment = match api::mood::get_mood_logs(self.backend, pet.id, None).await {
            Ok(logs) => components::mood_history(locale, &logs, self.tz, false),
            Err(_) => components::mood_history(locale, &[], self.tz, true),
        };
        self.document.write_region(MOOD_HISTORY_CONTENT, fragment);
    }

    /// Bottom navigation. Profile without a current pet stays where it is.
    pub async fn navigate(&mut self, page: NavPage) {
        match page {
            NavPage::Home => self.load_dashboard().await,
            NavPage::Profile => {
                if let Some(pet_id) = self.state.current_pet_id {
                    self.open_pet_profile(pet_id).await;
                }
            }
            NavPage::Settings => self.show_settings(),
        }
    }

    pub async fn set_language(&mut self, locale: Locale) {
        self.state.locale = locale;
        self.render_current_screen().await;
    }

    async fn render_current_screen(&mut self) {
        if self.state.screen.requires_auth() && self.backend.session().is_none() {
            return self.show_login();
        }

        match self.state.screen {
            Screen::Login => self.show_login(),
            Screen::Register => self.show_register(),
            Screen::Dashboard => self.load_dashboard().await,
            Screen::Profile => {
                if let Some(pet_id) = self.state.current_pet_id {
                    self.open_pet_profile(pet_id).await;
                }
                if self.document.mounted_screen().is_none() {
                    self.load_dashboard().await;
                }
            }
            Screen::Settings => self.show_settings(),
        }
    }

    /// Renders the current screen unless an event already mounted one
    async fn ensure_screen(&mut self) {
        if self.document.mounted_screen().is_none() {
            self.render_current_screen().await;
        }
    }

    /// State for a new account session: screen and pets are dropped, the
    /// language and the last seen timezone stay
    fn reset_state(&mut self) {
        self.state = ClientState {
            timezone: self.state.timezone.take(),
            ..ClientState::with_locale(self.state.locale)
        };
    }

    pub async fn submit_login(&mut self, form: LoginForm) {
        if let Err(key) = form.validate() {
            self.toast(ToastKind::Error, key);
            return self.show_login_with(&form);
        }

        match api::auth::sign_in(self.backend, &form.email, &form.password).await {
            Ok(_) => {
                self.reset_state();
                self.load_dashboard().await;
            }
            Err(e) => {
                self.toast_api_error(&e);
                self.show_login_with(&form);
            }
        }
    }

    pub async fn submit_register(&mut self, form: RegisterForm) {
        if let Err(key) = form.validate() {
            self.toast(ToastKind::Error, key);
            return self.show_register_with(&form);
        }

        match api::auth::sign_up(self.backend, &form.email, &form.password, &form.clean_name())
            .await
        {
            Ok(_) => {
                self.reset_state();
                self.toast(ToastKind::Success, TrKey::AccountCreated);
                self.load_dashboard().await;
            }
            Err(e) => {
                self.toast_api_error(&e);
                self.show_register_with(&form);
            }
        }
    }

    pub async fn sign_out(&mut self) {
        if let Err(e) = api::auth::sign_out(self.backend).await {
            self.toast_api_error(&e);
        }

        self.reset_state();
        self.show_login();
    }

    fn open_modal(&mut self, modal: Modal) {
        let open = modal.open;
        self.state.modals.retain(|m| m.kind != open.kind);
        self.state.modals.push(open);
        self.document.open_modal(modal);
    }

    pub fn close_modal(&mut self, kind: ModalKind, reason: Option<CloseReason>) {
        self.state.modals.retain(|m| m.kind != kind);
        self.document.close_modal(kind.id());

        if let Some(reason) = reason {
            logfire::debug!(
                "modal {modal} closed by {reason}",
                modal = kind.slug().to_string(),
                reason = reason.to_string()
            );
        }
    }

    async fn fetch_pet(&mut self, pet_id: Uuid) -> Option<Pet> {
        match api::pet::get_pet(self.backend, pet_id).await {
            Ok(Some(pet)) => Some(pet),
            Ok(None) => {
                self.toast(ToastKind::Error, TrKey::SomethingWentWrong);
                None
            }
            Err(e) => {
                self.toast_api_error(&e);
                None
            }
        }
    }

    async fn current_pet(&mut self) -> Option<Pet> {
        let Some(pet_id) = self.state.current_pet_id else {
            self.toast(ToastKind::Error, TrKey::NoPetSelected);
            return None;
        };

        self.fetch_pet(pet_id).await
    }

    pub fn open_add_pet(&mut self) {
        self.open_modal(Modal::add_pet(self.state.locale, &PetForm::default()));
    }

    pub async fn open_edit_pet(&mut self) {
        let Some(pet) = self.current_pet().await else {
            return;
        };

        self.open_modal(Modal::edit_pet(self.state.locale, pet.id, &PetForm::from(&pet)));
    }

    pub async fn open_mood_modal(&mut self) {
        let Some(pet) = self.current_pet().await else {
            return;
        };

        self.open_modal(Modal::log_mood(
            self.state.locale,
            pet.id,
            &MoodForm::for_pet(&pet.name),
        ));
    }

    pub async fn open_confirm_delete(&mut self, pet_id: Uuid) {
        let Some(pet) = self.fetch_pet(pet_id).await else {
            return;
        };

        self.open_modal(Modal::confirm_delete(self.state.locale, &pet, self.today));
    }

    pub async fn submit_add_pet(&mut self, form: PetForm) {
        let form = form.sanitized();
        let modal = Modal::add_pet(self.state.locale, &form);

        if let Err(key) = form.validate() {
            self.toast(ToastKind::Error, key);
            return self.open_modal(modal);
        }

        match api::pet::create_pet(self.backend, form.to_new_pet()).await {
            Ok(_) => {
                self.toast(ToastKind::Success, TrKey::PetAdded);
                self.close_modal(ModalKind::AddPet, None);
                self.load_dashboard().await;
            }
            Err(e) => {
                self.toast_api_error(&e);
                self.open_modal(modal);
            }
        }
    }

    pub async fn submit_edit_pet(&mut self, pet_id: Uuid, form: PetForm) {
        let form = form.sanitized();
        let modal = Modal::edit_pet(self.state.locale, pet_id, &form);

        if let Err(key) = form.validate() {
            self.toast(ToastKind::Error, key);
            return self.open_modal(modal);
        }

        match api::pet::update_pet(self.backend, pet_id, form.to_update()).await {
            Ok(pet) => {
                self.toast(ToastKind::Success, TrKey::PetUpdated);
                self.close_modal(ModalKind::EditPet, None);
                self.show_pet_profile(pet).await;
            }
            Err(e) => {
                self.toast_api_error(&e);
                self.open_modal(modal);
            }
        }
    }

    pub async fn submit_mood(&mut self, pet_id: Uuid, form: MoodForm) {
        let form = form.sanitized();
        let modal = Modal::log_mood(self.state.locale, pet_id, &form);

        let Some(mood) = form.selected_mood() else {
            self.toast(ToastKind::Error, TrKey::SelectMood);
            return self.open_modal(modal);
        };

        match api::mood::log_mood(self.backend, pet_id, mood, Some(&form.note)).await {
            Ok(_) => {
                self.toast(ToastKind::Success, TrKey::MoodLoggedSuccess);
                // respond renders the current screen with the new log
                self.close_modal(ModalKind::LogMood, None);
            }
            Err(e) => {
                self.toast_api_error(&e);
                self.open_modal(modal);
            }
        }
    }

    /// Second step of the delete flow. On failure the confirm modal stays
    /// open and is rebuilt by [`Controller::respond`].
    pub async fn submit_delete(&mut self, pet_id: Uuid) {
        if let Err(e) = api::pet::delete_pet(self.backend, pet_id).await {
            self.toast_api_error(&e);
            return;
        }

        self.toast(ToastKind::Success, TrKey::PetDeleted);
        self.close_modal(ModalKind::ConfirmDelete, None);
        self.close_modal(ModalKind::EditPet, None);
        self.state.current_pet_id = None;
        self.load_dashboard().await;
    }

    /// Modal remembered from an earlier request, built fresh. `None` when its
    /// pet is gone.
    async fn rebuild_modal(&self, open: OpenModal) -> Option<Modal> {
        let locale = self.state.locale;
        if open.kind == ModalKind::AddPet {
            return Some(Modal::add_pet(locale, &PetForm::default()));
        }

        let pet = api::pet::get_pet(self.backend, open.pet_id?)
            .await
            .ok()
            .flatten()?;

        Some(match open.kind {
            ModalKind::AddPet => Modal::add_pet(locale, &PetForm::default()),
            ModalKind::EditPet => Modal::edit_pet(locale, pet.id, &PetForm::from(&pet)),
            ModalKind::LogMood => Modal::log_mood(locale, pet.id, &MoodForm::for_pet(&pet.name)),
            ModalKind::ConfirmDelete => Modal::confirm_delete(locale, &pet, self.today),
        })
    }

    /// Finishes the request: makes sure a screen is mounted and that every
    /// modal still open is part of the document, in opening order.
    pub async fn respond(mut self) -> (Document, ClientState) {
        self.ensure_screen().await;

        if self.backend.session().is_none() {
            for open in std::mem::take(&mut self.state.modals) {
                self.document.close_modal(open.kind.id());
            }
        }

        let mut modals = Vec::new();
        for open in std::mem::take(&mut self.state.modals) {
            let modal = match self.document.close_modal(open.kind.id()) {
                Some(modal) => Some(modal),
                None => self.rebuild_modal(open).await,
            };
            modals.extend(modal);
        }
        for modal in modals {
            self.state.modals.push(modal.open);
            self.document.open_modal(modal);
        }

        (self.document, self.state)
    }
}
