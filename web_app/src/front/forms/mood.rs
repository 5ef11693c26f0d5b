use serde::{Deserialize, Serialize};

/// Mood modal form; `mood` is absent until one of the radios is picked.
/// `pet_name` rides along as a hidden field for the modal title.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodForm {
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub pet_name: String,
}

impl MoodForm {
    pub fn for_pet(pet_name: &str) -> Self {
        Self {
            pet_name: pet_name.to_string(),
            ..Default::default()
        }
    }

    pub fn sanitized(self) -> Self {
        Self {
            note: super::plain_text(&self.note),
            pet_name: super::plain_text(&self.pet_name),
            ..self
        }
    }

    pub fn selected_mood(&self) -> Option<&str> {
        self.mood.as_deref().map(str::trim).filter(|m| !m.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selected_mood_ignores_blank_value() {
        let form = MoodForm {
            mood: Some(" ".to_string()),
            ..MoodForm::for_pet("Luna")
        };
        assert_eq!(form.selected_mood(), None);

        let form = MoodForm {
            mood: Some("happy".to_string()),
            ..form
        };
        assert_eq!(form.selected_mood(), Some("happy"));
    }
}
