use crate::{api::auth, i18n::TrKey};

#[derive(serde::Deserialize, serde::Serialize, Debug, Default, Clone)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), TrKey> {
        if !auth::validate_email(self.email.trim()) {
            return Err(TrKey::InvalidEmail);
        }
        if !auth::validate_password(&self.password) {
            return Err(TrKey::PasswordTooShort);
        }

        Ok(())
    }
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Default, Clone)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl RegisterForm {
    /// Display name as stored: trimmed and stripped of markup
    pub fn clean_name(&self) -> String {
        super::plain_text(self.name.trim())
    }

    pub fn validate(&self) -> Result<(), TrKey> {
        if self.name.trim().is_empty() {
            return Err(TrKey::NameRequired);
        }
        if !auth::validate_email(self.email.trim()) {
            return Err(TrKey::InvalidEmail);
        }
        if !auth::validate_password(&self.password) {
            return Err(TrKey::PasswordTooShort);
        }
        if self.password != self.confirm_password {
            return Err(TrKey::PasswordsDontMatch);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(name: &str, email: &str, password: &str, confirm: &str) -> RegisterForm {
        RegisterForm {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn test_register_validation_order() {
        assert_eq!(
            register(" ", "bad", "short", "x").validate(),
            Err(TrKey::NameRequired)
        );
        assert_eq!(
            register("Rex", "bad", "short", "x").validate(),
            Err(TrKey::InvalidEmail)
        );
        assert_eq!(
            register("Rex", "a@b.com", "short", "x").validate(),
            Err(TrKey::PasswordTooShort)
        );
        assert_eq!(
            register("Rex", "a@b.com", "password1", "password2").validate(),
            Err(TrKey::PasswordsDontMatch)
        );
        assert_eq!(
            register("Rex", "a@b.com", "password1", "password1").validate(),
            Ok(())
        );
    }

    #[test]
    fn test_login_validation() {
        let form = LoginForm {
            email: "a@b.com".to_string(),
            password: "1234567".to_string(),
        };
        assert_eq!(form.validate(), Err(TrKey::PasswordTooShort));

        let form = LoginForm {
            email: "a@b".to_string(),
            password: "password1".to_string(),
        };
        assert_eq!(form.validate(), Err(TrKey::InvalidEmail));
    }

    #[test]
    fn test_clean_name_strips_markup() {
        let form = register("  <script>x</script>Rex ", "a@b.com", "", "");

        assert_eq!(form.clean_name(), "Rex");

        let form = register(" Anna & Marco ", "a@b.com", "", "");
        assert_eq!(form.clean_name(), "Anna & Marco");
    }
}
