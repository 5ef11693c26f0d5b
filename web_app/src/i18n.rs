//! # Translation table
//!
//! Static (locale, key) -> string lookup for every user-facing text of the
//! application. Keys are a closed enum so a missing English text is a compile
//! error; Italian entries are optional and fall back to English.
//!
//! Markup carries keys as strings (`data-translate="happy"`), so a string
//! lookup with the chain `locale -> English -> raw key` is also provided.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Supported interface languages
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    #[display("en")]
    En,
    #[display("it")]
    It,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::It];

    pub const fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::It => "it",
        }
    }

    /// Parses a language tag, tolerant of case and region suffixes (`it-IT`)
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.split(['-', '_']).next().unwrap_or_default() {
            "en" => Some(Locale::En),
            "it" => Some(Locale::It),
            _ => None,
        }
    }
}

macro_rules! translations {
    (@opt) => { None };
    (@opt $it:literal) => { Some($it) };
    ($($variant:ident => $key:literal { en: $en:literal $(, it: $it:literal)? $(,)? }),+ $(,)?) => {
        /// Every translatable text of the interface
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum TrKey {
            $($variant),+
        }

        impl TrKey {
            pub const ALL: &'static [TrKey] = &[$(TrKey::$variant),+];

            /// Key as written in markup (`data-translate` attributes)
            pub const fn as_key(self) -> &'static str {
                match self {
                    $(TrKey::$variant => $key),+
                }
            }

            pub fn from_key(key: &str) -> Option<Self> {
                match key {
                    $($key => Some(TrKey::$variant),)+
                    _ => None,
                }
            }

            const fn english(self) -> &'static str {
                match self {
                    $(TrKey::$variant => $en),+
                }
            }

            const fn italian(self) -> Option<&'static str> {
                match self {
                    $(TrKey::$variant => translations!(@opt $($it)?)),+
                }
            }
        }
    };
}

translations! {
    // app
    AppTitle => "appTitle" { en: "Pet Wellness Tracker", it: "Tracciatore Benessere Animali" },
    Loading => "loading" { en: "Loading...", it: "Caricamento..." },

    // auth
    WelcomeBack => "welcomeBack" { en: "Welcome Back!", it: "Bentornato!" },
    SignInToContinue => "signInToContinue" {
        en: "Sign in to continue tracking your pet's wellness",
        it: "Accedi per continuare a monitorare il benessere del tuo animale",
    },
    Email => "email" { en: "Email" },
    Password => "password" { en: "Password" },
    SignIn => "signIn" { en: "Sign In", it: "Accedi" },
    SignUp => "signUp" { en: "Sign Up", it: "Registrati" },
    SignOut => "signOut" { en: "Sign Out", it: "Esci" },
    ConfirmSignOut => "confirmSignOut" {
        en: "Are you sure you want to sign out?",
        it: "Sei sicuro di voler uscire?",
    },
    CreateAccount => "createAccount" { en: "Create Account", it: "Crea account" },
    StartJourney => "startJourney" {
        en: "Start your pet wellness journey today",
        it: "Inizia oggi il tuo percorso di benessere per animali",
    },
    FullName => "fullName" { en: "Full Name", it: "Nome completo" },
    ConfirmPassword => "confirmPassword" { en: "Confirm Password", it: "Conferma password" },
    DontHaveAccount => "dontHaveAccount" { en: "Don't have an account?", it: "Non hai un account?" },
    AlreadyHaveAccount => "alreadyHaveAccount" {
        en: "Already have an account?",
        it: "Hai già un account?",
    },
    AccountCreated => "accountCreated" {
        en: "Account created successfully!",
        it: "Account creato con successo!",
    },

    // navigation
    Home => "home" { en: "Home" },
    Profile => "profile" { en: "Profile", it: "Profilo" },
    Settings => "settings" { en: "Settings", it: "Impostazioni" },
    Language => "language" { en: "Language", it: "Lingua" },

    // dashboard
    NoPetsYet => "noPetsYet" { en: "No Pets Yet", it: "Nessun animale ancora" },
    AddFirstPet => "addFirstPet" {
        en: "Add your first pet to start tracking their wellness",
        it: "Aggiungi il tuo primo animale per iniziare a monitorare il suo benessere",
    },
    AddPet => "addPet" { en: "Add Pet", it: "Aggiungi animale" },
    QuickActions => "quickActions" { en: "Quick Actions", it: "Azioni rapide" },
    LogMood => "logMood" { en: "Log Mood", it: "Registra umore" },
    TodaysMood => "todaysMood" { en: "Today's Mood", it: "Umore di oggi" },
    NoMoodLogged => "noMoodLogged" { en: "No mood logged today", it: "Nessun umore registrato oggi" },

    // pet form
    PetName => "petName" { en: "Pet Name", it: "Nome dell'animale" },
    Species => "species" { en: "Species", it: "Specie" },
    SelectSpecies => "selectSpecies" { en: "Please select a species", it: "Seleziona una specie" },
    Dog => "dog" { en: "Dog", it: "Cane" },
    Cat => "cat" { en: "Cat", it: "Gatto" },
    Bird => "bird" { en: "Bird", it: "Uccello" },
    Rabbit => "rabbit" { en: "Rabbit", it: "Coniglio" },
    Hamster => "hamster" { en: "Hamster", it: "Criceto" },
    Fish => "fish" { en: "Fish", it: "Pesce" },
    Other => "other" { en: "Other", it: "Altro" },
    Breed => "breed" { en: "Breed", it: "Razza" },
    BirthDate => "birthDate" { en: "Birth Date", it: "Data di nascita" },
    Weight => "weight" { en: "Weight (kg)", it: "Peso (kg)" },
    Notes => "notes" { en: "Notes", it: "Note" },
    Optional => "optional" { en: "Optional", it: "Opzionale" },
    Save => "save" { en: "Save", it: "Salva" },
    Cancel => "cancel" { en: "Cancel", it: "Annulla" },
    EditPet => "editPet" { en: "Edit Pet", it: "Modifica animale" },
    DeletePet => "deletePet" { en: "Delete Pet", it: "Elimina animale" },
    PetAdded => "petAdded" { en: "Pet added successfully!", it: "Animale aggiunto con successo!" },
    PetUpdated => "petUpdated" {
        en: "Pet updated successfully!",
        it: "Animale aggiornato con successo!",
    },
    PetDeleted => "petDeleted" { en: "Pet deleted successfully", it: "Animale eliminato con successo" },
    ConfirmDeleteQuestion => "confirmDeleteQuestion" {
        en: "Are you sure you want to delete this pet?",
        it: "Sei sicuro di voler eliminare questo animale?",
    },
    ConfirmDeleteWarning => "confirmDeleteWarning" {
        en: "This action cannot be undone. All mood logs and data for this pet will be permanently deleted.",
        it: "Questa azione non può essere annullata. Tutti i dati e gli umori registrati verranno eliminati definitivamente.",
    },
    ConfirmDeleteButton => "confirmDeleteButton" { en: "Yes, Delete Pet", it: "Sì, elimina animale" },
    Creating => "creating" { en: "Creating...", it: "Creazione..." },
    Saving => "saving" { en: "Saving...", it: "Salvataggio..." },
    Deleting => "deleting" { en: "Deleting...", it: "Eliminazione..." },
    Logging => "logging" { en: "Logging...", it: "Registrazione..." },

    // pet profile
    BasicInformation => "basicInformation" { en: "Basic Information", it: "Informazioni di base" },
    Age => "age" { en: "Age", it: "Età" },
    YearsOld => "yearsOld" { en: "years old", it: "anni" },
    MonthsOld => "monthsOld" { en: "months old", it: "mesi" },
    UnknownAge => "unknownAge" { en: "Unknown age", it: "Età sconosciuta" },
    MoodHistory => "moodHistory" { en: "Mood History", it: "Storico umore" },
    NoMoodHistory => "noMoodHistory" { en: "No moods logged yet", it: "Nessun umore registrato" },

    // mood
    HowIsFeeling => "howIsFeeling" { en: "How is {name} feeling?", it: "Come si sente {name}?" },
    Happy => "happy" { en: "Happy", it: "Felice" },
    Content => "content" { en: "Content", it: "Contento" },
    Neutral => "neutral" { en: "Neutral", it: "Neutrale" },
    Anxious => "anxious" { en: "Anxious", it: "Ansioso" },
    Sad => "sad" { en: "Sad", it: "Triste" },
    Angry => "angry" { en: "Angry", it: "Arrabbiato" },
    AddNote => "addNote" { en: "Add a note (optional)", it: "Aggiungi una nota (opzionale)" },
    MoodNotePlaceholder => "moodNotePlaceholder" {
        en: "Any special activities or observations...",
        it: "Attività particolari o osservazioni...",
    },
    LogMoodButton => "logMoodButton" { en: "Log Mood", it: "Registra umore" },
    MoodLoggedSuccess => "moodLoggedSuccess" {
        en: "Mood logged successfully",
        it: "Umore registrato con successo",
    },
    SelectMood => "selectMood" { en: "Please select a mood first", it: "Seleziona prima un umore" },

    // errors
    EmailRequired => "emailRequired" { en: "Email is required", it: "Email richiesta" },
    PasswordRequired => "passwordRequired" { en: "Password is required", it: "Password richiesta" },
    InvalidEmail => "invalidEmail" { en: "Please enter a valid email", it: "Inserisci un'email valida" },
    PasswordTooShort => "passwordTooShort" {
        en: "Password must be at least 8 characters",
        it: "La password deve essere di almeno 8 caratteri",
    },
    PasswordsDontMatch => "passwordsDontMatch" {
        en: "Passwords do not match",
        it: "Le password non corrispondono",
    },
    NameRequired => "nameRequired" { en: "Name is required", it: "Nome richiesto" },
    PetNameRequired => "petNameRequired" { en: "Pet name is required", it: "Nome dell'animale richiesto" },
    PetNameEmpty => "petNameEmpty" {
        en: "Pet name cannot be empty",
        it: "Il nome dell'animale non può essere vuoto",
    },
    SpeciesRequired => "speciesRequired" { en: "Species is required", it: "Specie richiesta" },
    PetIdRequired => "petIdRequired" { en: "Pet ID is required", it: "ID animale richiesto" },
    MoodRequired => "moodRequired" { en: "Mood is required", it: "Umore richiesto" },
    InvalidMood => "invalidMood" { en: "Invalid mood selected", it: "Umore selezionato non valido" },
    NoPetSelected => "noPetSelected" { en: "No pet selected", it: "Nessun animale selezionato" },
    NotAuthenticated => "notAuthenticated" { en: "Not authenticated", it: "Non autenticato" },
    NotConfigured => "notConfigured" {
        en: "Service not configured",
        it: "Servizio non configurato",
    },
    NetworkError => "networkError" {
        en: "Network error. Please try again.",
        it: "Errore di rete. Riprova.",
    },
    Retry => "retry" { en: "Try again", it: "Riprova" },
    PageExpired => "pageExpired" {
        en: "This page has expired. Reload it and try again.",
        it: "Questa pagina è scaduta. Ricaricala e riprova.",
    },
    SomethingWentWrong => "somethingWentWrong" {
        en: "Something went wrong. Please try again.",
        it: "Qualcosa è andato storto. Riprova.",
    },
}

impl std::fmt::Display for TrKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_key())
    }
}

fn translate(locale: Locale, key: TrKey) -> &'static str {
    match locale {
        Locale::En => key.english(),
        Locale::It => key.italian().unwrap_or_else(|| key.english()),
    }
}

/// Localized text for `key`, replacing every `{param}` with its value
pub fn t(locale: Locale, key: TrKey, params: &[(&str, &str)]) -> String {
    params
        .iter()
        .fold(translate(locale, key).to_string(), |text, (name, value)| {
            text.replace(&format!("{{{name}}}"), value)
        })
}

/// Lookup by the string form of a key: `locale -> English -> raw key`
pub fn lookup(locale: Locale, key: &str) -> String {
    TrKey::from_key(key)
        .map(|key| translate(locale, key).to_string())
        .unwrap_or_else(|| key.to_string())
}

/// All texts of a locale keyed by their markup key, for template contexts
pub fn catalog(locale: Locale) -> BTreeMap<&'static str, &'static str> {
    TrKey::ALL
        .iter()
        .map(|key| (key.as_key(), translate(locale, *key)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_round_trip_through_their_markup_form() {
        for key in TrKey::ALL {
            assert_eq!(TrKey::from_key(key.as_key()), Some(*key));
        }
    }

    #[test]
    fn test_t_uses_italian_when_available() {
        assert_eq!(t(Locale::It, TrKey::SignIn, &[]), "Accedi");
        assert_eq!(t(Locale::En, TrKey::SignIn, &[]), "Sign In");
    }

    #[test]
    fn test_t_falls_back_to_english_for_missing_italian() {
        assert_eq!(t(Locale::It, TrKey::Email, &[]), "Email");
        assert_eq!(t(Locale::It, TrKey::Home, &[]), "Home");
    }

    #[test]
    fn test_t_replaces_params() {
        assert_eq!(
            t(Locale::En, TrKey::HowIsFeeling, &[("name", "Rex")]),
            "How is Rex feeling?"
        );
        assert_eq!(
            t(Locale::It, TrKey::HowIsFeeling, &[("name", "Rex")]),
            "Come si sente Rex?"
        );
    }

    #[test]
    fn test_lookup_unknown_key_returns_raw_key() {
        assert_eq!(lookup(Locale::It, "doesNotExist"), "doesNotExist");
        assert_eq!(lookup(Locale::It, "happy"), "Felice");
    }

    #[test]
    fn test_catalog_has_every_key() {
        let catalog = catalog(Locale::It);
        assert_eq!(catalog.len(), TrKey::ALL.len());
        assert_eq!(catalog.get("addPet"), Some(&"Aggiungi animale"));
    }

    #[test]
    fn test_locale_parse() {
        assert_eq!(Locale::parse("it-IT"), Some(Locale::It));
        assert_eq!(Locale::parse(" EN "), Some(Locale::En));
        assert_eq!(Locale::parse("fr"), None);
        assert_eq!(Locale::parse(""), None);
    }
}
