//! Title normalization and the coaching/faculty boundary.

/// The closed set of normalized coaching titles. Every emitted record's
/// title is one of these.
pub const NORMALIZED_TITLES: &[&str] = &[
    "Head Coach",
    "Associate Head Coach",
    "Assistant Coach",
    "Volunteer Coach",
    "Graduate Assistant Coach",
    "Recruiting Coordinator",
    "Athletics Director",
    "Strength & Conditioning Coach",
];

/// Map a raw title fragment onto the closed title set.
///
/// Checks are ordered most-specific first: "Associate Head Coach" must win
/// over "Head Coach", "Graduate Assistant" over "Assistant". Sport words
/// embedded in the fragment ("Head Basketball Coach") do not affect the
/// mapping. Falls back to "Assistant Coach" when nothing matches.
#[must_use]
pub fn normalize_title(raw: &str) -> &'static str {
    let t = raw.to_lowercase();

    if t.contains("associate head") {
        return "Associate Head Coach";
    }
    if t.contains("graduate assistant") {
        return "Graduate Assistant Coach";
    }
    if t.contains("volunteer") {
        return "Volunteer Coach";
    }
    if t.contains("recruiting coordinator") {
        return "Recruiting Coordinator";
    }
    if t.contains("strength") {
        return "Strength & Conditioning Coach";
    }
    if t.contains("athletic director")
        || t.contains("athletics director")
        || t.contains("director of athletics")
    {
        return "Athletics Director";
    }
    if t.contains("assistant") {
        return "Assistant Coach";
    }
    if t.contains("head") && t.contains("coach") {
        return "Head Coach";
    }
    "Assistant Coach"
}

const FACULTY_MARKERS: &[&str] = &[
    "professor",
    "lecturer",
    "advisor",
    "adviser",
    "administrator",
    "admissions",
    "registrar",
    "dean",
    "faculty",
    "instructor",
    "counselor",
    "librarian",
    "principal",
    "teacher",
];

const COACHING_MARKERS: &[&str] = &[
    "coach",
    "coordinator",
    "athletic director",
    "athletics director",
    "director of athletics",
    "strength and conditioning",
    "trainer",
];

/// Final classifier: only coaching staff are retained, never academic staff.
///
/// A label containing a faculty/administrative marker is rejected unless it
/// also explicitly contains a coaching term ("Professor of Kinesiology" is
/// out; "Professor and Head Swim Coach" stays).
#[must_use]
pub fn is_coaching_position(raw: &str) -> bool {
    let t = raw.to_lowercase();
    let faculty = FACULTY_MARKERS.iter().any(|m| t.contains(m));
    if faculty {
        return COACHING_MARKERS.iter().any(|m| t.contains(m));
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn associate_head_wins_over_head() {
        assert_eq!(
            normalize_title("Associate Head Coach, Women's Soccer"),
            "Associate Head Coach"
        );
    }

    #[test]
    fn sport_interleaved_head_title() {
        assert_eq!(normalize_title("Head Basketball Coach"), "Head Coach");
    }

    #[test]
    fn sport_interleaved_assistant_title() {
        assert_eq!(
            normalize_title("Assistant Football Coach"),
            "Assistant Coach"
        );
    }

    #[test]
    fn graduate_assistant_wins_over_assistant() {
        assert_eq!(
            normalize_title("Graduate Assistant - Track"),
            "Graduate Assistant Coach"
        );
    }

    #[test]
    fn director_of_athletics_variants() {
        assert_eq!(normalize_title("Director of Athletics"), "Athletics Director");
        assert_eq!(normalize_title("Athletic Director"), "Athletics Director");
    }

    #[test]
    fn strength_and_conditioning() {
        assert_eq!(
            normalize_title("Head Strength & Conditioning Coach"),
            "Strength & Conditioning Coach"
        );
    }

    #[test]
    fn unknown_defaults_to_assistant() {
        assert_eq!(normalize_title("Team Liaison"), "Assistant Coach");
    }

    #[test]
    fn every_output_is_in_the_closed_set() {
        for raw in [
            "Associate Head Coach",
            "Head Volleyball Coach",
            "Volunteer Assistant",
            "Graduate Assistant",
            "Recruiting Coordinator",
            "Director of Athletics",
            "Strength and Conditioning",
            "something else entirely",
        ] {
            assert!(
                NORMALIZED_TITLES.contains(&normalize_title(raw)),
                "'{raw}' normalized outside the closed set"
            );
        }
    }

    #[test]
    fn faculty_titles_are_rejected() {
        assert!(!is_coaching_position("Professor of Kinesiology"));
        assert!(!is_coaching_position("Academic Advisor"));
        assert!(!is_coaching_position("Athletics Administrator"));
    }

    #[test]
    fn faculty_with_explicit_coaching_term_is_kept() {
        assert!(is_coaching_position("Professor and Head Swim Coach"));
    }

    #[test]
    fn plain_coaching_titles_pass() {
        assert!(is_coaching_position("Assistant Coach"));
        assert!(is_coaching_position("Recruiting Coordinator"));
    }

    #[test]
    fn unmarked_text_passes() {
        // Plain surrounding text with no marker either way is not grounds
        // for rejection; the coaching-context gate handles it upstream.
        assert!(is_coaching_position("joined the program in 2019"));
    }
}
