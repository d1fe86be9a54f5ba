//! Context resolution around a validated name.
//!
//! Given a name and the full content blob, pulls nearby sport, title, and
//! contact information using windowed text search. Title and sport use a
//! narrower window than contact info: they are usually adjacent to the name,
//! while emails and phone numbers often sit a column or a line away.

use std::sync::LazyLock;

use regex::Regex;

use super::titles;

pub const DEFAULT_SPORT: &str = "General Athletics";

const TITLE_WINDOW: usize = 200;
const CONTACT_WINDOW: usize = 300;

/// Ordered sport keyword table; first match wins. Multi-word keys come
/// before any single word they could be confused with.
const SPORT_KEYWORDS: &[(&str, &str)] = &[
    ("cross country", "Cross Country"),
    ("track", "Track and Field"),
    ("swimming", "Swimming & Diving"),
    ("diving", "Swimming & Diving"),
    ("football", "Football"),
    ("basketball", "Basketball"),
    ("baseball", "Baseball"),
    ("softball", "Softball"),
    ("soccer", "Soccer"),
    ("volleyball", "Volleyball"),
    ("lacrosse", "Lacrosse"),
    ("wrestling", "Wrestling"),
    ("gymnastics", "Gymnastics"),
    ("tennis", "Tennis"),
    ("golf", "Golf"),
    ("hockey", "Hockey"),
    ("rowing", "Rowing"),
    ("cheer", "Cheerleading"),
];

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid regex")
});

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+?1[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b").expect("valid regex")
});

static PHOTO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://[^\s"')>]+\.(?:jpg|jpeg|png|webp)"#).expect("valid regex")
});

/// Resolved context for one name.
#[derive(Debug, Clone)]
pub struct StaffContext {
    pub sport: String,
    pub title: String,
    /// The text the title was classified from — a pattern's title fragment
    /// when one exists, the title window otherwise. Kept for the final
    /// faculty-exclusion check.
    pub raw_title: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
}

/// Resolve sport, title, and contact info for `name` within `content`.
///
/// `title_hint` is a title fragment captured by the extraction pattern
/// itself (e.g. the second cell of a table row); when present it takes
/// precedence over the windowed text for title and sport classification.
#[must_use]
pub fn resolve_context(name: &str, content: &str, title_hint: Option<&str>) -> StaffContext {
    let position = content.to_lowercase().find(&name.to_lowercase());

    let title_window = position.map_or(content, |p| window(content, p, name.len(), TITLE_WINDOW));
    let contact_window =
        position.map_or(content, |p| window(content, p, name.len(), CONTACT_WINDOW));

    let raw_title = title_hint
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .unwrap_or(title_window)
        .to_string();

    let title = titles::normalize_title(&raw_title).to_string();
    let sport = detect_sport(&raw_title)
        .or_else(|| detect_sport(title_window))
        .unwrap_or(DEFAULT_SPORT)
        .to_string();

    let email = EMAIL_RE
        .find(contact_window)
        .map(|m| m.as_str().to_lowercase());
    let phone = PHONE_RE.find(contact_window).map(|m| m.as_str().to_string());
    let photo_url = PHOTO_RE
        .find(contact_window)
        .map(|m| m.as_str().to_string());

    StaffContext {
        sport,
        title,
        raw_title,
        email,
        phone,
        photo_url,
    }
}

/// First matching sport keyword in `text`, if any.
#[must_use]
pub fn detect_sport(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    SPORT_KEYWORDS
        .iter()
        .find(|(needle, _)| lowered.contains(needle))
        .map(|(_, sport)| *sport)
}

/// A slice of `content` spanning `radius` bytes on each side of the match at
/// `pos`, clamped to char boundaries.
fn window(content: &str, pos: usize, match_len: usize, radius: usize) -> &str {
    let mut start = pos.saturating_sub(radius);
    while start > 0 && !content.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (pos + match_len + radius).min(content.len());
    while end < content.len() && !content.is_char_boundary(end) {
        end += 1;
    }
    &content[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_sport_and_title_near_name() {
        let content = "Staff Directory\nJane Doe serves as Head Basketball Coach for the varsity program.";
        let ctx = resolve_context("Jane Doe", content, None);
        assert_eq!(ctx.sport, "Basketball");
        assert_eq!(ctx.title, "Head Coach");
    }

    #[test]
    fn title_hint_wins_over_window() {
        let content = "Jane Doe | Associate Head Coach | also mentioned near head coach text";
        let ctx = resolve_context("Jane Doe", content, Some("Associate Head Coach"));
        assert_eq!(ctx.title, "Associate Head Coach");
    }

    #[test]
    fn more_specific_title_wins_over_general() {
        let content = "Jane Doe, Associate Head Coach. The Head Coach position is vacant.";
        let ctx = resolve_context("Jane Doe", content, None);
        assert_eq!(
            ctx.title, "Associate Head Coach",
            "specific pattern must win over the general one"
        );
    }

    #[test]
    fn defaults_when_no_patterns_match() {
        let content = "Jane Doe works with our student athletes.";
        let ctx = resolve_context("Jane Doe", content, None);
        assert_eq!(ctx.sport, DEFAULT_SPORT);
        assert_eq!(ctx.title, "Assistant Coach");
    }

    #[test]
    fn extracts_email_and_phone_from_window() {
        let content =
            "John Smith - Assistant Football Coach, john.smith@school.edu, 555-123-4567";
        let ctx = resolve_context("John Smith", content, None);
        assert_eq!(ctx.email.as_deref(), Some("john.smith@school.edu"));
        assert_eq!(ctx.phone.as_deref(), Some("555-123-4567"));
    }

    #[test]
    fn contact_outside_window_is_ignored() {
        let filler = "x".repeat(400);
        let content = format!("webmaster@school.edu {filler} Jane Doe, Head Soccer Coach");
        let ctx = resolve_context("Jane Doe", &content, None);
        assert_eq!(ctx.email, None, "email 400 chars away must not attach");
    }

    #[test]
    fn extracts_photo_url_from_window() {
        let content = "Jane Doe, Head Coach. https://cdn.school.edu/staff/jane-doe.jpg";
        let ctx = resolve_context("Jane Doe", content, None);
        assert_eq!(
            ctx.photo_url.as_deref(),
            Some("https://cdn.school.edu/staff/jane-doe.jpg")
        );
    }

    #[test]
    fn first_sport_keyword_wins() {
        assert_eq!(
            detect_sport("Director of Track and Field and Cross Country"),
            Some("Cross Country"),
            "multi-word keys are checked before their single-word prefixes"
        );
        assert_eq!(detect_sport("Head Softball Coach"), Some("Softball"));
        assert_eq!(detect_sport("no sport here"), None);
    }

    #[test]
    fn window_respects_char_boundaries() {
        let content = "é".repeat(300) + "Jane Doe" + &"é".repeat(300);
        // Must not panic on non-ASCII boundaries.
        let ctx = resolve_context("Jane Doe", &content, None);
        assert_eq!(ctx.title, "Assistant Coach");
    }
}
