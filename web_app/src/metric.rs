use opentelemetry::{KeyValue, metrics::UpDownCounter};
use std::sync::LazyLock;

static STATDS: LazyLock<UpDownCounter<i64>> = LazyLock::new(|| {
    logfire::i64_up_down_counter("pet_mood_statds")
        .with_description("Pet mood app statistics")
        .with_unit("attempt")
        .build()
});

fn incr_statds(metric: String, value: String) {
    STATDS.add(1, &[KeyValue::new(metric, value)]);
}

/// Counts one successful user action: sign_up, create_pet, delete_pet, log_mood
pub fn incr_user_action_statds(action: &str) {
    incr_statds("user_action".to_string(), action.into())
}

/// Counts toasts by kind, a rough signal of how often users hit errors
pub fn incr_toast_statds(kind: &str) {
    incr_statds("toast".to_string(), kind.into())
}
