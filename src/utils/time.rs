use chrono::{DateTime, Utc};

/// Renders the distance between `then` and `now` as "3 hours ago" style text.
pub fn diff_for_humans(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    if seconds < 60 {
        return "just now".to_string();
    }

    let (amount, unit) = match seconds {
        s if s < 3_600 => (s / 60, "minute"),
        s if s < 86_400 => (s / 3_600, "hour"),
        s if s < 30 * 86_400 => (s / 86_400, "day"),
        s if s < 365 * 86_400 => (s / (30 * 86_400), "month"),
        s => (s / (365 * 86_400), "year"),
    };

    if amount == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", amount, unit)
    }
}
