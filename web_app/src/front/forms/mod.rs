pub mod mood;
pub mod pet;
pub mod user;

use std::sync::LazyLock;

static STRIP_ALL: LazyLock<ammonia::Builder<'static>> = LazyLock::new(ammonia::Builder::empty);

/// Free text with every tag removed, kept unescaped: templates escape on
/// output. Only the entities the serializer writes for text nodes occur.
pub fn plain_text(value: &str) -> String {
    STRIP_ALL
        .clean(value)
        .to_string()
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_keeps_special_characters() {
        assert_eq!(plain_text("Tom & Jerry"), "Tom & Jerry");
        assert_eq!(plain_text("walks & treats <3"), "walks & treats <3");
        assert_eq!(plain_text("5 > 3 \"quoted\""), "5 > 3 \"quoted\"");
    }

    #[test]
    fn test_plain_text_drops_markup() {
        assert_eq!(plain_text("<b>Luna</b>"), "Luna");
        assert_eq!(plain_text("<img src=x onerror=alert(1)>good boy"), "good boy");
        assert_eq!(plain_text("<script>alert(1)</script>Rex"), "Rex");
    }
}
