pub const LANGUAGE_SESSION_KEY: &str = "language";
pub const CLIENT_STATE_SESSION_KEY: &str = "client_state";
pub const SESSION_COOKIE_NAME: &str = "pet_mood_state";
pub const IDENTITY_COOKIE_NAME: &str = "pet_mood_auth";
pub const CSRF_COOKIE_SESSION_KEY: &str = "csrf_cookie";
pub const TIMEZONE_HEADER: &str = "timezone";
pub const CSRF_TOKEN_HEADER: &str = "x-csrf-token";
pub const HX_REQUEST_HEADER: &str = "hx-request";

pub const MOOD_HISTORY_LIMIT: usize = 30;

pub const PLACEHOLDER_SUPABASE_URL: &str = "YOUR_SUPABASE_URL_HERE";
pub const PLACEHOLDER_SUPABASE_ANON_KEY: &str = "YOUR_SUPABASE_ANON_KEY_HERE";

pub const MAX_AGE_COOKIES: i64 = chrono::TimeDelta::hours(4).num_seconds();
