//! Frontend route configuration module.
//!
//! Every route answers with the full page; htmx swaps the body so the
//! browser keeps a single document while the server owns the state.

use super::{auth, pet, server};
use ntex::web;

/// Configures authentication routes.
///
/// # Routes
/// - `GET /auth/login` - Login screen
/// - `POST /auth/login` - Password sign-in
/// - `GET /auth/register` - Registration screen
/// - `POST /auth/register` - Create account
/// - `POST /auth/sign-out` - Close user session
pub fn auth(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/auth").service((
        auth::get_login_view,
        auth::login,
        auth::get_register_view,
        auth::register,
        auth::sign_out,
    )));
}

/// Configures pet management routes. All of them fall back to the login
/// screen without a session.
///
/// # Routes
/// - `GET /pets/{pet_id}` - Pet profile with mood history
/// - `POST /pets` - Create pet
/// - `POST /pets/{pet_id}` - Update pet
/// - `POST /pets/{pet_id}/delete` - Delete pet
/// - `POST /pets/{pet_id}/mood` - Log a mood for the pet
pub fn pets(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/pets").service((
        pet::get_pet_profile_view,
        pet::create_pet,
        pet::edit_pet,
        pet::delete_pet,
        pet::log_mood,
    )));
}

/// Configures modal dialog routes.
///
/// # Routes
/// - `GET /modal/add-pet` - Open add pet modal
/// - `GET /modal/edit-pet` - Open edit modal of the current pet
/// - `GET /modal/mood` - Open mood modal of the current pet
/// - `GET /modal/confirm-delete/{pet_id}` - Open delete confirmation
/// - `GET /modal/{modal}/close?reason=` - Close a modal
pub fn modals(cfg: &mut web::ServiceConfig) {
    // close first: `/confirm-delete/close` must not read "close" as a pet id
    cfg.service(web::scope("/modal").service((
        pet::close_modal,
        pet::open_add_pet_modal,
        pet::open_edit_pet_modal,
        pet::open_mood_modal,
        pet::open_confirm_delete_modal,
    )));
}

/// Configures page load, navigation and language routes.
///
/// # Routes
/// - `GET /` - Page load
/// - `GET /nav/{page}` - Bottom navigation (home, profile, settings)
/// - `POST /language/{language}` - Switch language (en, it)
/// - `GET /favicon.svg` - Favicon
pub fn app(cfg: &mut web::ServiceConfig) {
    cfg.service((
        server::index,
        server::navigate,
        server::set_language,
        server::serve_favicon,
    ));
}
