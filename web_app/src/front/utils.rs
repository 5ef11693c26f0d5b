use super::{AppState, controller::Controller, errors, middleware, session, state::ClientState};
use crate::{backend, consts};
use chrono_tz::Tz;
use ntex::web;
use ntex_identity::Identity;

/// Time zone sent by the page in the `timezone` header; UTC when the zone
/// is unknown, `None` when the header is missing
pub fn extract_usertimezone(request_headers: &ntex::http::HeaderMap) -> Option<Tz> {
    request_headers.get(consts::TIMEZONE_HEADER).map(|v| {
        v.to_str()
            .ok()
            .and_then(|tz| tz.parse::<Tz>().ok())
            .unwrap_or(Tz::UTC)
    })
}

/// Zone of the request. A reported zone is remembered in `state`, a request
/// without the header falls back to the remembered one, then to UTC.
pub fn resolve_timezone(request_headers: &ntex::http::HeaderMap, state: &mut ClientState) -> Tz {
    match extract_usertimezone(request_headers) {
        Some(tz) => {
            state.timezone = Some(tz.name().to_string());
            tz
        }
        None => state
            .timezone
            .as_deref()
            .and_then(|tz| tz.parse::<Tz>().ok())
            .unwrap_or(Tz::UTC),
    }
}

/// Ends the request: persists state and auth session, renders the page
pub async fn render_page(
    controller: Controller<'_>,
    app_state: &AppState,
    backend: &backend::ImplBackend,
    cookie: &ntex_session::Session,
    identity: &Identity,
) -> Result<web::HttpResponse, web::Error> {
    let (mut document, state) = controller.respond().await;
    document.set_sync_timezone(state.timezone.is_none());

    session::persist_client_state(cookie, &state)?;
    session::persist_auth_session(identity, backend.session());
    document.set_csrf_token(middleware::csrf_token::issue_token(app_state, cookie)?);

    let html = document.render(state.locale).map_err(|e| {
        errors::ServerError::TemplateError(format!(
            "page for screen {screen:?} couldnt be rendered: {e}",
            screen = state.screen
        ))
    })?;

    Ok(web::HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ntex::http::{HeaderMap, header::HeaderName, header::HeaderValue};

    #[test]
    fn test_extract_usertimezone_reads_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_usertimezone(&headers), None);

        headers.insert(
            HeaderName::from_static("timezone"),
            HeaderValue::from_static("Europe/Rome"),
        );
        assert_eq!(extract_usertimezone(&headers), Some(Tz::Europe__Rome));

        headers.insert(
            HeaderName::from_static("timezone"),
            HeaderValue::from_static("Mars/Olympus"),
        );
        assert_eq!(extract_usertimezone(&headers), Some(Tz::UTC));
    }

    #[test]
    fn test_resolve_timezone_falls_back_to_last_reported_zone() {
        let mut state = ClientState::default();
        assert_eq!(resolve_timezone(&HeaderMap::new(), &mut state), Tz::UTC);
        assert_eq!(state.timezone, None);

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("timezone"),
            HeaderValue::from_static("America/New_York"),
        );
        assert_eq!(resolve_timezone(&headers, &mut state), Tz::America__New_York);
        assert_eq!(state.timezone.as_deref(), Some("America/New_York"));

        // full page load: no header
        assert_eq!(
            resolve_timezone(&HeaderMap::new(), &mut state),
            Tz::America__New_York
        );
    }
}
