//! In-memory model of the page being built for one response.
//!
//! A screen is mounted first; it declares named regions (slots) that later,
//! possibly after a backend call, get content written into them. Writing a
//! region that is no longer part of the document is skipped, so a slow
//! result can never land in a screen that was replaced meanwhile. Rendering
//! to HTML happens once, at the end of the request.

use super::{modals::Modal, state::Screen, templates};
use crate::{
    i18n::{self, Locale},
    metric,
};
use serde::Serialize;
use serde_json::json;

/// Template plus its context, optionally declaring child regions
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub template: &'static str,
    pub context: serde_json::Value,
    pub regions: Vec<&'static str>,
}

impl Fragment {
    pub fn new(template: &'static str, context: serde_json::Value) -> Self {
        Self {
            template,
            context,
            regions: vec![],
        }
    }

    pub fn with_regions(mut self, regions: &[&'static str]) -> Self {
        self.regions = regions.to_vec();
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Region {
    id: &'static str,
    parent: Option<&'static str>,
    content: Option<Fragment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
}

/// Transient message shown on top of the page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
struct Mounted {
    screen: Screen,
    fragment: Fragment,
}

#[derive(Debug, Default)]
pub struct Document {
    mounted: Option<Mounted>,
    // parents always precede their children
    regions: Vec<Region>,
    modals: Vec<Modal>,
    toasts: Vec<Toast>,
    fab: bool,
    csrf_token: Option<String>,
    sync_timezone: bool,
}

/// Markup the `region` template function emits for an empty slot
pub fn placeholder(id: &str) -> String {
    format!(r#"<div id="{id}" data-region="{id}"></div>"#)
}

/// Renders one fragment with the translation catalog of `locale` in scope
pub fn render_fragment(fragment: &Fragment, locale: Locale) -> Result<String, tera::Error> {
    let mut context = tera::Context::from_value(fragment.context.clone()).unwrap_or_default();
    context.insert("tr", &i18n::catalog(locale));
    context.insert("locale", locale.as_str());

    templates::WEB_TEMPLATES.render(fragment.template, &context)
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the screen and every region; modals and toasts stay
    pub fn mount(&mut self, screen: Screen, fragment: Fragment) {
        self.regions = fragment
            .regions
            .iter()
            .map(|id| Region {
                id: *id,
                parent: None,
                content: None,
            })
            .collect();
        self.mounted = Some(Mounted { screen, fragment });
        self.fab = false;
    }

    pub fn mounted_screen(&self) -> Option<Screen> {
        self.mounted.as_ref().map(|m| m.screen)
    }

    pub fn has_region(&self, id: &str) -> bool {
        self.regions.iter().any(|r| r.id == id)
    }

    pub fn region_content(&self, id: &str) -> Option<&Fragment> {
        self.regions
            .iter()
            .find(|r| r.id == id)
            .and_then(|r| r.content.as_ref())
    }

    /// Writes `fragment` into region `id`, replacing whatever it held
    /// (including nested regions). Returns `false`, logging it, when the
    /// region is not part of the document.
    pub fn write_region(&mut self, id: &str, fragment: Fragment) -> bool {
        let Some(position) = self.regions.iter().position(|r| r.id == id) else {
            logfire::warn!("region {id} not found, write skipped", id = id.to_string());
            return false;
        };

        let region_id = self.regions[position].id;
        self.remove_descendants(region_id);

        self.regions.extend(fragment.regions.iter().map(|child| Region {
            id: *child,
            parent: Some(region_id),
            content: None,
        }));
        if let Some(region) = self.regions.iter_mut().find(|r| r.id == region_id) {
            region.content = Some(fragment);
        }

        true
    }

    fn remove_descendants(&mut self, id: &'static str) {
        let mut pending = vec![id];
        while let Some(parent) = pending.pop() {
            pending.extend(
                self.regions
                    .iter()
                    .filter(|r| r.parent == Some(parent))
                    .map(|r| r.id),
            );
            self.regions.retain(|r| r.parent != Some(parent));
        }
    }

    /// Opens `modal`, replacing an open modal with the same id
    pub fn open_modal(&mut self, modal: Modal) {
        self.modals.retain(|m| m.id() != modal.id());
        self.modals.push(modal);
    }

    pub fn close_modal(&mut self, id: &str) -> Option<Modal> {
        let position = self.modals.iter().position(|m| m.id() == id)?;
        Some(self.modals.remove(position))
    }

    pub fn modal(&self, id: &str) -> Option<&Modal> {
        self.modals.iter().find(|m| m.id() == id)
    }

    pub fn modal_mut(&mut self, id: &str) -> Option<&mut Modal> {
        self.modals.iter_mut().find(|m| m.id() == id)
    }

    pub fn modals(&self) -> &[Modal] {
        &self.modals
    }

    pub fn toast(&mut self, kind: ToastKind, message: String) {
        metric::incr_toast_statds(match kind {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
        });
        self.toasts.push(Toast { kind, message });
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn set_fab(&mut self, visible: bool) {
        self.fab = visible;
    }

    pub fn fab(&self) -> bool {
        self.fab
    }

    /// Token the page sends back with every htmx request
    pub fn set_csrf_token(&mut self, token: String) {
        self.csrf_token = Some(token);
    }

    /// Asks the page to load itself again through htmx, which reports the
    /// browser timezone
    pub fn set_sync_timezone(&mut self, sync: bool) {
        self.sync_timezone = sync;
    }

    fn fill_regions(&self, mut html: String, locale: Locale) -> Result<String, tera::Error> {
        for region in &self.regions {
            let Some(content) = &region.content else {
                continue;
            };
            let slot = placeholder(region.id);
            if let Some(at) = html.find(&slot) {
                let inner = render_fragment(content, locale)?;
                html.insert_str(at + slot.len() - "</div>".len(), &inner);
            }
        }

        Ok(html)
    }

    /// Full page HTML
    pub fn render(&self, locale: Locale) -> Result<String, tera::Error> {
        let screen_html = match &self.mounted {
            Some(mounted) => {
                self.fill_regions(render_fragment(&mounted.fragment, locale)?, locale)?
            }
            None => String::new(),
        };

        let modals_html = self
            .modals
            .iter()
            .map(|modal| modal.render(locale))
            .collect::<Result<Vec<String>, tera::Error>>()?;

        let nav = self
            .mounted_screen()
            .and_then(Screen::nav_page)
            .map(|page| page.to_string());

        render_fragment(
            &Fragment::new(
                "base.html",
                json!({
                    "screen_html": screen_html,
                    "modals_html": modals_html,
                    "top_modal": self.modals.last().map(|modal| modal.kind().slug()),
                    "toasts": self.toasts,
                    "fab": self.fab,
                    "nav": nav,
                    "csrf_token": self.csrf_token,
                    "sync_timezone": self.sync_timezone,
                    "locales": Locale::ALL.map(Locale::as_str),
                }),
            ),
            locale,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen_with(regions: &[&'static str]) -> Fragment {
        Fragment::new("screens/settings.html", json!({})).with_regions(regions)
    }

    fn spinner() -> Fragment {
        Fragment::new("widgets/spinner.html", json!({}))
    }

    #[test]
    fn test_write_region_missing_is_skipped() {
        let mut document = Document::new();
        document.mount(Screen::Settings, screen_with(&[]));

        assert!(!document.write_region("todays-mood-content", spinner()));
        assert!(document.region_content("todays-mood-content").is_none());
    }

    #[test]
    fn test_rewriting_region_drops_nested_regions() {
        let mut document = Document::new();
        document.mount(Screen::Dashboard, screen_with(&["dashboard-content"]));

        assert!(document.write_region(
            "dashboard-content",
            spinner().with_regions(&["todays-mood-content"])
        ));
        assert!(document.write_region("todays-mood-content", spinner()));

        assert!(document.write_region("dashboard-content", spinner()));
        assert!(!document.has_region("todays-mood-content"));
    }

    #[test]
    fn test_mount_replaces_regions_but_keeps_toasts() {
        let mut document = Document::new();
        document.mount(Screen::Dashboard, screen_with(&["dashboard-content"]));
        document.set_fab(true);
        document.toast(ToastKind::Success, "saved".to_string());

        document.mount(Screen::Settings, screen_with(&[]));

        assert!(!document.has_region("dashboard-content"));
        assert!(!document.fab());
        assert_eq!(document.toasts().len(), 1);
        assert_eq!(document.mounted_screen(), Some(Screen::Settings));
    }

    #[test]
    fn test_fill_regions_nests_content_in_order() {
        let mut document = Document::new();
        document.mount(Screen::Dashboard, screen_with(&["outer"]));
        document.write_region(
            "outer",
            Fragment::new("widgets/spinner.html", json!({})).with_regions(&["inner"]),
        );
        document.write_region("inner", spinner());

        let html = format!("<main>{}</main>", placeholder("outer"));
        let spinner_html = render_fragment(&spinner(), Locale::En).unwrap();

        // spinner has no slot of its own, so "inner" has nowhere to go
        let filled = document.fill_regions(html, Locale::En).unwrap();
        assert_eq!(
            filled,
            format!(
                r#"<main><div id="outer" data-region="outer">{spinner_html}</div></main>"#
            )
        );
    }

    #[test]
    fn test_page_without_known_timezone_reloads_itself() {
        let mut document = Document::new();
        document.mount(Screen::Login, Fragment::new("screens/login.html", json!({})));

        let html = document.render(Locale::En).unwrap();
        assert!(!html.contains(r#"hx-trigger="load""#));

        document.set_sync_timezone(true);
        let html = document.render(Locale::En).unwrap();
        assert!(html.contains(r#"<span hidden hx-get="/" hx-trigger="load"></span>"#));
    }
}
