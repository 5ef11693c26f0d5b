use super::{
    AppState,
    document::{self, Fragment, Toast, ToastKind},
    templates,
};
use crate::{
    consts,
    i18n::{self, Locale, TrKey},
};
use derive_more::{Display, Error};
use log::error;
use ntex::{http, web};
use ntex_session::UserSession;
use serde_json::json;

#[derive(Debug, Display, Error)]
pub enum UserError {
    UrlNotFound,
    #[display("invalid path value: {_0}")]
    InvalidPathValue(#[error(not(source))] String),
}

impl web::error::WebResponseError for UserError {
    fn error_response(&self, _: &web::HttpRequest) -> web::HttpResponse {
        let mut context = tera::Context::new();
        error!("{:#?}", self);

        let template_name = match self {
            UserError::UrlNotFound => {
                context.insert("msg_details", "resource not found");
                "errors/url_not_found.html"
            }
            UserError::InvalidPathValue(value) => {
                context.insert("msg_details", &format!("invalid value: {value}"));
                "errors/url_not_found.html"
            }
        };

        web::HttpResponse::build(self.status_code())
            .set_header("content-type", "text/html; charset=utf-8")
            .body(
                templates::WEB_TEMPLATES
                    .render(template_name, &context)
                    .unwrap_or(self.to_string()),
            )
    }

    fn status_code(&self) -> http::StatusCode {
        match *self {
            UserError::UrlNotFound => http::StatusCode::NOT_FOUND,
            UserError::InvalidPathValue(_) => http::StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Debug, Display, Error)]
pub enum ServerError {
    TemplateError(#[error(not(source))] String),
    InternalServerError(#[error(not(source))] String),
    InvalidCsrfToken,
}

impl ServerError {
    fn get_error_message(&self) -> String {
        match self {
            ServerError::TemplateError(msg) => format!("[TemplateError] {:#?}", msg),
            ServerError::InternalServerError(msg) => format!("[InternalServerError] {:#?}", msg),
            ServerError::InvalidCsrfToken => "[InvalidCsrfToken]".to_string(),
        }
    }
}

/// Toast appended to the page of an htmx request; the page stays as it is
fn toast_response(req: &web::HttpRequest, key: TrKey) -> web::HttpResponse {
    let locale = req
        .get_session()
        .get::<String>(consts::LANGUAGE_SESSION_KEY)
        .ok()
        .flatten()
        .and_then(|language| Locale::parse(&language))
        .or_else(|| {
            req.app_state::<AppState>()
                .map(|app_state| app_state.app_config.default_locale())
        })
        .unwrap_or_default();
    let toast = Toast {
        kind: ToastKind::Error,
        message: i18n::t(locale, key, &[]),
    };

    // will be a success status code cause htmx only swaps those
    web::HttpResponse::Ok()
        .set_header("content-type", "text/html; charset=utf-8")
        .set_header("hx-retarget", "#toasts")
        .set_header("hx-reswap", "beforeend")
        .body(
            document::render_fragment(
                &Fragment::new("partials/toast.html", json!({ "toast": &toast })),
                locale,
            )
            .unwrap_or(toast.message),
        )
}

impl web::error::WebResponseError for ServerError {
    fn error_response(&self, req: &web::HttpRequest) -> web::HttpResponse {
        error!("{}", self.get_error_message());

        if matches!(self, ServerError::InvalidCsrfToken)
            && req.headers().contains_key(consts::HX_REQUEST_HEADER)
        {
            return toast_response(req, TrKey::PageExpired);
        }

        web::HttpResponse::build(self.status_code())
            .set_header("content-type", "text/html; charset=utf-8")
            .body(
                templates::WEB_TEMPLATES
                    .render("errors/internal_error.html", &tera::Context::new())
                    .unwrap_or(self.to_string()),
            )
    }

    fn status_code(&self) -> http::StatusCode {
        match *self {
            ServerError::InvalidCsrfToken => http::StatusCode::FORBIDDEN,
            _ => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
