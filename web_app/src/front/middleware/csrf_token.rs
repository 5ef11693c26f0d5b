use base64::{Engine, prelude::BASE64_STANDARD};
use csrf::CsrfProtection;
use ntex::{http::Payload, web};
use ntex_session::UserSession;

use crate::{
    consts,
    front::{AppState, errors},
};

/// Guard for state-changing requests: the token sent in the
/// `x-csrf-token` header must pair with the cookie half kept in the session
pub struct CsrfToken;

fn is_csrf_valid(req: &web::HttpRequest) -> bool {
    let token = req
        .headers()
        .get(consts::CSRF_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());

    if let (Some(token), Ok(Some(cookie)), Some(app_state)) = (
        token,
        req.get_session()
            .get::<String>(consts::CSRF_COOKIE_SESSION_KEY),
        req.app_state::<AppState>(),
    ) {
        let token = BASE64_STANDARD
            .decode(token.as_bytes())
            .map(|token| app_state.csrf_protec.parse_token(&token));
        let cookie = BASE64_STANDARD
            .decode(cookie.as_bytes())
            .map(|cookie| app_state.csrf_protec.parse_cookie(&cookie));

        if let (Ok(Ok(token)), Ok(Ok(cookie))) = (token, cookie) {
            return app_state
                .csrf_protec
                .verify_token_pair(&token, &cookie)
                .is_ok();
        }
    }

    false
}

/// Token value sealed in the cookie half already kept in the session
fn stored_token_value(app_state: &AppState, cookie: &ntex_session::Session) -> Option<[u8; 64]> {
    let stored = cookie
        .get::<String>(consts::CSRF_COOKIE_SESSION_KEY)
        .ok()
        .flatten()?;
    let decoded = BASE64_STANDARD.decode(stored.as_bytes()).ok()?;
    let parsed = app_state.csrf_protec.parse_cookie(&decoded).ok()?;

    parsed.value().try_into().ok()
}

/// Token pair for the page being rendered: the cookie half goes into the
/// session, the token half is returned to be embedded in the page. The
/// token value of the session is kept, so pages rendered earlier (other
/// tabs, overlapping requests) still validate; only the expiry moves.
pub fn issue_token(
    app_state: &AppState,
    cookie: &ntex_session::Session,
) -> Result<String, errors::ServerError> {
    let previous = stored_token_value(app_state, cookie);
    let (token, csrf_cookie) = app_state
        .csrf_protec
        .generate_token_pair(previous.as_ref(), consts::MAX_AGE_COOKIES)
        .map_err(|e| {
            errors::ServerError::InternalServerError(format!("cant set token csrf protection: {e}"))
        })?;

    cookie
        .set(consts::CSRF_COOKIE_SESSION_KEY, csrf_cookie.b64_string())
        .map_err(|e| {
            errors::ServerError::InternalServerError(format!("cant store csrf cookie: {e}"))
        })?;

    Ok(token.b64_string())
}

impl<Err> web::FromRequest<Err> for CsrfToken {
    type Error = web::Error;

    fn from_request(
        req: &web::HttpRequest,
        _: &mut Payload,
    ) -> impl std::future::Future<Output = Result<Self, Self::Error>> {
        if !is_csrf_valid(req) {
            return futures::future::ready(Err(errors::ServerError::InvalidCsrfToken.into()));
        }

        futures::future::ready(Ok(Self))
    }
}
