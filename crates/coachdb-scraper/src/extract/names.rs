//! Person-name cleaning and validation.
//!
//! Extraction quality hinges on precision here: a false positive pollutes
//! every downstream record, so the validator is deliberately strict. It is a
//! pure function — no I/O, no state — and idempotent on already-clean names.

/// Leading tokens stripped before validation: articles and honorifics that
/// page markup routinely glues onto names.
const LEADING_NOISE: &[&str] = &[
    "the", "a", "an", "dr", "dr.", "mr", "mr.", "mrs", "mrs.", "ms", "ms.", "prof", "prof.",
    "coach",
];

/// Trailing tokens stripped before validation: role and department words that
/// run-on table cells append to names.
const TRAILING_NOISE: &[&str] = &[
    "coach",
    "coaches",
    "head",
    "assistant",
    "associate",
    "director",
    "coordinator",
    "athletics",
    "athletic",
    "staff",
    "department",
];

/// Any remaining part matching one of these rejects the whole candidate:
/// role words, UI chrome, social networks, and sport names are never parts of
/// a person's name.
const PART_DENYLIST: &[&str] = &[
    // role / org words
    "coach",
    "coaches",
    "coaching",
    "head",
    "assistant",
    "associate",
    "volunteer",
    "director",
    "coordinator",
    "athletics",
    "athletic",
    "university",
    "college",
    "school",
    "department",
    "staff",
    "roster",
    "team",
    // UI chrome
    "menu",
    "loading",
    "search",
    "login",
    "logout",
    "home",
    "directory",
    "schedule",
    "tickets",
    "news",
    "skip",
    "content",
    "navigation",
    "footer",
    "header",
    "contact",
    "about",
    "email",
    "phone",
    "office",
    "profile",
    "view",
    "read",
    "more",
    "full",
    "bio",
    "click",
    "here",
    "privacy",
    "policy",
    "terms",
    // social networks
    "facebook",
    "twitter",
    "instagram",
    "youtube",
    "tiktok",
    "linkedin",
    // sports
    "football",
    "basketball",
    "baseball",
    "softball",
    "soccer",
    "volleyball",
    "tennis",
    "golf",
    "track",
    "swimming",
    "wrestling",
    "lacrosse",
    "hockey",
    "gymnastics",
];

const MIN_LEN: usize = 4;
const MAX_LEN: usize = 40;

/// Clean a raw text span into a person name, or reject it.
///
/// Rules, in order: strip leading articles/honorifics and trailing
/// role/department words, collapse whitespace, require 2–4 parts each
/// starting with an uppercase letter, reject denylisted parts, reject
/// digits and disallowed punctuation, and reject lengths outside [4, 40].
///
/// Validating an already-clean name returns it unchanged.
#[must_use]
pub fn clean_person_name(raw: &str) -> Option<String> {
    let mut parts: Vec<&str> = raw.split_whitespace().collect();

    while let Some(first) = parts.first() {
        if LEADING_NOISE.contains(&first.to_lowercase().as_str()) {
            parts.remove(0);
        } else {
            break;
        }
    }
    while let Some(last) = parts.last() {
        if TRAILING_NOISE.contains(&last.to_lowercase().as_str()) {
            parts.pop();
        } else {
            break;
        }
    }

    if !(2..=4).contains(&parts.len()) {
        return None;
    }

    for part in &parts {
        let mut chars = part.chars();
        match chars.next() {
            Some(c) if c.is_uppercase() => {}
            _ => return None,
        }
        if !chars.all(|c| c.is_alphabetic() || c == '\'' || c == '-' || c == '.') {
            return None;
        }
        let bare = part.trim_matches(|c: char| !c.is_alphabetic()).to_lowercase();
        if PART_DENYLIST.contains(&bare.as_str()) {
            return None;
        }
    }

    let cleaned = parts.join(" ");
    if !(MIN_LEN..=MAX_LEN).contains(&cleaned.len()) {
        return None;
    }

    Some(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_two_part_name() {
        assert_eq!(clean_person_name("Jane Doe").as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn is_idempotent_on_clean_names() {
        let first = clean_person_name("Sarah O'Brien-Smith").unwrap();
        let second = clean_person_name(&first).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(
            clean_person_name("John   \t Smith").as_deref(),
            Some("John Smith")
        );
    }

    #[test]
    fn strips_leading_honorific() {
        assert_eq!(
            clean_person_name("Dr. Amanda Lee").as_deref(),
            Some("Amanda Lee")
        );
        assert_eq!(
            clean_person_name("Coach Mike Johnson").as_deref(),
            Some("Mike Johnson")
        );
    }

    #[test]
    fn strips_trailing_role_words() {
        assert_eq!(
            clean_person_name("Jane Doe Head Coach").as_deref(),
            Some("Jane Doe")
        );
    }

    #[test]
    fn rejects_single_word() {
        assert_eq!(clean_person_name("Smith"), None);
        // A lone honorific leaves nothing behind.
        assert_eq!(clean_person_name("Coach Smith"), None);
    }

    #[test]
    fn rejects_too_many_parts() {
        assert_eq!(clean_person_name("One Two Three Four Five"), None);
    }

    #[test]
    fn rejects_digits() {
        assert_eq!(clean_person_name("John Sm1th"), None);
        assert_eq!(clean_person_name("John Smith3"), None);
    }

    #[test]
    fn rejects_ui_chrome_terms() {
        assert_eq!(clean_person_name("Loading Page"), None);
        assert_eq!(clean_person_name("Main Menu"), None);
        assert_eq!(clean_person_name("Skip Navigation"), None);
    }

    #[test]
    fn rejects_social_network_names() {
        assert_eq!(clean_person_name("Follow Facebook"), None);
    }

    #[test]
    fn rejects_lowercase_parts() {
        assert_eq!(clean_person_name("jane doe"), None);
        assert_eq!(clean_person_name("Jane doe"), None);
    }

    #[test]
    fn rejects_sport_words_as_name_parts() {
        assert_eq!(clean_person_name("Womens Basketball"), None);
    }

    #[test]
    fn rejects_names_outside_length_bounds() {
        // 3 chars after join
        assert_eq!(clean_person_name("A B"), None);
        let long = "Maximiliano Alexandrovich Konstantinopoulos Wolfeschlegelstein";
        assert_eq!(clean_person_name(long), None);
    }

    #[test]
    fn allows_hyphens_apostrophes_and_initials() {
        assert_eq!(
            clean_person_name("Mary-Kate O'Neil").as_deref(),
            Some("Mary-Kate O'Neil")
        );
        assert_eq!(
            clean_person_name("James T. Kirk").as_deref(),
            Some("James T. Kirk")
        );
    }
}
