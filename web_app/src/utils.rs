//! Helper functions could be used in backend/, front/, ...

use anyhow::anyhow;
use argon2::Argon2;
use std::{str::FromStr, sync::LazyLock};
use uuid::Uuid;

/// Derives a 32 bytes cookie key from two uuid strings
pub fn build_cookie_key(pwd: &str, salt: &str) -> anyhow::Result<[u8; 32]> {
    let mut cookie_key = [0u8; 32];
    Argon2::default()
        .hash_password_into(
            Uuid::from_str(pwd)?.as_bytes(),
            Uuid::from_str(salt)?.as_bytes(),
            &mut cookie_key,
        )
        .map_err(|err| anyhow!("cookie key couldn't be created: {}", err))?;

    Ok(cookie_key)
}

/// New key on every start: cookies issued by an earlier process are dropped
pub fn build_random_cookie_key() -> anyhow::Result<[u8; 32]> {
    build_cookie_key(&Uuid::new_v4().to_string(), &Uuid::new_v4().to_string())
}

/// Client to make http requests
pub static REQUEST_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(reqwest::Client::new);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_key_is_deterministic_per_input() {
        let pwd = "0b6f8a8e-3f0c-4c86-9a57-1f0f3b0c2d11";
        let salt = "5d2e4f3a-8b7c-4a1d-9e6f-2c3b4a5d6e7f";

        assert_eq!(
            build_cookie_key(pwd, salt).unwrap(),
            build_cookie_key(pwd, salt).unwrap()
        );
        assert!(build_cookie_key("not-a-uuid", salt).is_err());
        assert_ne!(
            build_random_cookie_key().unwrap(),
            build_random_cookie_key().unwrap()
        );
    }
}
