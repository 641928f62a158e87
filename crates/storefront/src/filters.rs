//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// CSS modifier class for a status word (`completed`, `pending`, `banned`, ...).
///
/// Usage in templates: `<span class="badge {{ order.status|status_class }}">`
#[askama::filter_fn]
pub fn status_class(
    status: impl Display,
    _env: &dyn askama::Values,
) -> askama::Result<&'static str> {
    Ok(status_css(&status.to_string()))
}

fn status_css(status: &str) -> &'static str {
    match status.to_ascii_lowercase().as_str() {
        "completed" | "active" | "visible" => "badge--success",
        "pending" | "inactive" | "hidden" => "badge--warning",
        "failed" | "banned" | "refunded" => "badge--danger",
        _ => "badge--neutral",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_css() {
        assert_eq!(status_css("completed"), "badge--success");
        assert_eq!(status_css("Pending"), "badge--warning");
        assert_eq!(status_css("banned"), "badge--danger");
        assert_eq!(status_css("mystery"), "badge--neutral");
    }
}
