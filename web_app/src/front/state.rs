//! Per-user application state carried between requests.

use super::modals::OpenModal;
use crate::i18n::Locale;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    #[default]
    #[display("login")]
    Login,
    #[display("register")]
    Register,
    #[display("dashboard")]
    Dashboard,
    #[display("profile")]
    Profile,
    #[display("settings")]
    Settings,
}

impl Screen {
    pub fn requires_auth(self) -> bool {
        !matches!(self, Screen::Login | Screen::Register)
    }

    /// Bottom navigation entry highlighted while the screen is shown
    pub fn nav_page(self) -> Option<NavPage> {
        match self {
            Screen::Dashboard => Some(NavPage::Home),
            Screen::Profile => Some(NavPage::Profile),
            Screen::Settings => Some(NavPage::Settings),
            Screen::Login | Screen::Register => None,
        }
    }
}

/// Targets of the bottom navigation
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavPage {
    #[display("home")]
    Home,
    #[display("profile")]
    Profile,
    #[display("settings")]
    Settings,
}

#[derive(Debug, Display, Error, Clone, PartialEq)]
#[display("unknown page: {_0}")]
pub struct UnknownPage(#[error(not(source))] pub String);

impl FromStr for NavPage {
    type Err = UnknownPage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "home" => Ok(NavPage::Home),
            "profile" => Ok(NavPage::Profile),
            "settings" => Ok(NavPage::Settings),
            other => Err(UnknownPage(other.to_string())),
        }
    }
}

/// The active screen, the selected pet and the open modals. Restored from the
/// session cookie at the start of every request and written back at the end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientState {
    #[serde(default)]
    pub screen: Screen,
    #[serde(default)]
    pub current_pet_id: Option<Uuid>,
    #[serde(default)]
    pub modals: Vec<OpenModal>,
    /// Last IANA zone the page reported, for requests sent without the
    /// timezone header (a full page load)
    #[serde(default)]
    pub timezone: Option<String>,
    /// persisted on its own under the `language` key
    #[serde(skip)]
    pub locale: Locale,
}

impl ClientState {
    pub fn with_locale(locale: Locale) -> Self {
        Self {
            locale,
            ..Default::default()
        }
    }
}
