//! Subcommand implementations

pub mod assistants;
pub mod audio;
pub mod chat;
pub mod conversation;
pub mod models;
pub mod rate_test;
pub mod threads;

use chrono::{DateTime, Utc};

/// Short local rendering of an optional server timestamp
pub(crate) fn format_time(time: Option<DateTime<Utc>>) -> String {
    time.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// First `max` characters of `text`, with an ellipsis when cut
pub(crate) fn truncate(text: &str, max: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly", 7), "exactly");
        assert_eq!(truncate("bonjour à tous", 7), "bonjour…");
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(None), "-");
        let time = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
        assert_eq!(format_time(Some(time)), "2024-03-09 14:05");
    }
}
