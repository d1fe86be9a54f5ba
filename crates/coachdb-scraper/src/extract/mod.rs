//! Pattern extraction engine.
//!
//! Runs the ordered content-pattern cascade over a raw content blob and
//! yields deduplicated, validated staff records. Candidates flow through
//! four gates in order: name validation, the coaching-context check, context
//! resolution, and the faculty-exclusion classifier. Rejections at any gate
//! are expected high-frequency noise filtering, not errors.

pub mod context;
pub mod names;
pub mod patterns;
pub mod titles;

use std::collections::HashSet;

use chrono::Utc;

use crate::types::{RawContent, StaffRecord};

pub use context::{resolve_context, StaffContext, DEFAULT_SPORT};
pub use names::clean_person_name;
pub use patterns::{default_patterns, ContentPattern, RawCandidate};
pub use titles::{is_coaching_position, normalize_title, NORMALIZED_TITLES};

const CONTEXT_WINDOW: usize = 150;

/// A candidate name must co-occur with one of these within the context
/// window; this suppresses names that appear in unrelated page furniture.
const COACHING_CONTEXT_KEYWORDS: &[&str] =
    &["coach", "coaching", "athletic", "recruiting", "strength"];

/// Extract deduplicated staff records from one piece of raw content.
///
/// Patterns run in cascade order; the first pattern to fully validate a name
/// wins it, and later duplicate matches (case-insensitive) are discarded.
#[must_use]
pub fn extract_staff_records(raw: &RawContent) -> Vec<StaffRecord> {
    let cascade = patterns::default_patterns();
    let mut seen: HashSet<String> = HashSet::new();
    let mut records = Vec::new();

    for pattern in &cascade {
        let candidates = pattern.find(&raw.text);
        if candidates.is_empty() {
            continue;
        }
        tracing::debug!(
            pattern = pattern.name(),
            candidates = candidates.len(),
            source_url = %raw.source_url,
            "pattern produced candidates"
        );

        for candidate in candidates {
            let Some(name) = names::clean_person_name(&candidate.name) else {
                continue;
            };
            let key = name.to_lowercase();
            if seen.contains(&key) {
                continue;
            }
            if !has_coaching_context(&raw.text, &name) {
                continue;
            }

            let ctx = context::resolve_context(&name, &raw.text, candidate.title_hint.as_deref());
            if !titles::is_coaching_position(&ctx.raw_title) {
                tracing::debug!(%name, raw_title = %ctx.raw_title, "dropped faculty/administrative entry");
                continue;
            }

            seen.insert(key);
            records.push(StaffRecord {
                name,
                title: ctx.title,
                sport: ctx.sport,
                email: ctx.email,
                phone: ctx.phone,
                bio: None,
                photo_url: ctx.photo_url,
                confidence: pattern.confidence(),
                method: raw.method,
                extracted_at: Utc::now(),
            });
        }
    }

    records
}

/// Whether `name` co-occurs with a coaching keyword within the bounded
/// window around its first occurrence, scanning both directions.
fn has_coaching_context(content: &str, name: &str) -> bool {
    let lowered = content.to_lowercase();
    let Some(pos) = lowered.find(&name.to_lowercase()) else {
        return false;
    };

    let mut start = pos.saturating_sub(CONTEXT_WINDOW);
    while start > 0 && !lowered.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (pos + name.len() + CONTEXT_WINDOW).min(lowered.len());
    while end < lowered.len() && !lowered.is_char_boundary(end) {
        end += 1;
    }
    let window = &lowered[start..end];

    COACHING_CONTEXT_KEYWORDS.iter().any(|k| window.contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AcquisitionMethod;

    fn raw(text: &str) -> RawContent {
        RawContent {
            source_url: "https://athletics.test/coaches".to_string(),
            text: text.to_string(),
            method: AcquisitionMethod::RemoteExtraction,
        }
    }

    #[test]
    fn linked_table_row_end_to_end() {
        let records = extract_staff_records(&raw(
            "| [Jane Doe](https://athletics.test/jane) | Head Basketball Coach |",
        ));
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.name, "Jane Doe");
        assert_eq!(r.title, "Head Coach");
        assert_eq!(r.sport, "Basketball");
    }

    #[test]
    fn prose_with_contact_end_to_end() {
        let records = extract_staff_records(&raw(
            "John Smith - Assistant Football Coach, john.smith@school.edu, 555-123-4567",
        ));
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.name, "John Smith");
        assert_eq!(r.title, "Assistant Coach");
        assert_eq!(r.sport, "Football");
        assert_eq!(r.email.as_deref(), Some("john.smith@school.edu"));
        assert_eq!(r.phone.as_deref(), Some("555-123-4567"));
    }

    #[test]
    fn faculty_entry_yields_no_records() {
        let records = extract_staff_records(&raw("Dr. Amanda Lee, Professor of Kinesiology"));
        assert!(records.is_empty(), "faculty must be excluded: {records:?}");
    }

    #[test]
    fn faculty_title_rejected_even_in_coaching_context() {
        let records = extract_staff_records(&raw(
            "Athletics Department\nAmanda Lee - Director of Admissions\nJane Doe - Head Soccer Coach",
        ));
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Jane Doe"]);
    }

    #[test]
    fn name_without_coaching_context_is_dropped() {
        let filler = "donor wall and campus library renovations. ".repeat(10);
        let records = extract_staff_records(&raw(&format!(
            "{filler}\nJane Doe - Director of Library Services\n{filler}"
        )));
        assert!(
            records.is_empty(),
            "page-furniture names must not survive: {records:?}"
        );
    }

    #[test]
    fn duplicate_names_across_patterns_are_deduplicated() {
        // Jane appears in a table row (pattern 1) and a prose line (pattern 4).
        let records = extract_staff_records(&raw(
            "| [Jane Doe](x) | Head Basketball Coach |\nJane Doe - Assistant Coach",
        ));
        assert_eq!(records.len(), 1, "one record per unique name");
        assert_eq!(
            records[0].title, "Head Coach",
            "first pattern in the cascade wins"
        );
        assert!(
            (records[0].confidence - 0.8).abs() < f64::EPSILON,
            "confidence comes from the winning pattern"
        );
    }

    #[test]
    fn dedup_is_case_insensitive() {
        let records = extract_staff_records(&raw(
            "| [Jane Doe](x) | Head Coach |\n| [JANE DOE](y) | Assistant Coach |",
        ));
        // "JANE DOE" fails name validation anyway (all-caps parts pass —
        // they start uppercase) so assert on the invariant itself:
        let mut keys: Vec<String> = records.iter().map(|r| r.name.to_lowercase()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), records.len(), "names must be unique: {records:?}");
    }

    #[test]
    fn title_precedence_associate_head_over_head() {
        // Both "Associate Head Coach" and "Head Coach" appear near the name;
        // the more specific title must win.
        let records = extract_staff_records(&raw(
            "Associate Head Coach: Maria Santos\nShe reports to the Head Coach.",
        ));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Associate Head Coach");
    }

    #[test]
    fn confidence_is_always_in_bounds() {
        let records = extract_staff_records(&raw(
            "| [Jane Doe](x) | Head Coach |\n\
             | Tom Bell | Recruiting Coordinator |\n\
             Head Coach: Maria Santos\n\
             John Smith - Assistant Football Coach\n\
             Pat Lee\nVolunteer Coach",
        ));
        assert!(!records.is_empty());
        for r in &records {
            assert!(
                (0.0..=1.0).contains(&r.confidence),
                "{} has confidence {}",
                r.name,
                r.confidence
            );
        }
    }

    #[test]
    fn multiple_rows_yield_multiple_records() {
        let records = extract_staff_records(&raw(
            "| [Jane Doe](x) | Head Soccer Coach |\n\
             | [Mike Ross](y) | Assistant Soccer Coach |\n\
             | [Tom Bell](z) | Recruiting Coordinator |",
        ));
        assert_eq!(records.len(), 3);
        let sports: HashSet<&str> = records.iter().map(|r| r.sport.as_str()).collect();
        assert!(sports.contains("Soccer"));
    }

    #[test]
    fn empty_content_yields_nothing() {
        assert!(extract_staff_records(&raw("")).is_empty());
    }
}
