use super::document;
use std::{collections::HashMap, sync::LazyLock};
use tera::Tera;

/// Emits the empty slot of a document region: `{{ region(id="x") | safe }}`
fn region(args: &HashMap<String, tera::Value>) -> tera::Result<tera::Value> {
    let id = args
        .get("id")
        .and_then(tera::Value::as_str)
        .ok_or_else(|| tera::Error::msg("region() needs a string `id`"))?;

    Ok(tera::Value::String(document::placeholder(id)))
}

pub static WEB_TEMPLATES: LazyLock<Tera> = LazyLock::new(|| {
    let mut tera = Tera::new("web/templates/**/*.html").unwrap();
    tera.register_function("region", region);
    tera
});
