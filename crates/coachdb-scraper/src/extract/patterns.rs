//! Content patterns: the ordered extraction cascade.
//!
//! Each pattern is a pure matcher from a content blob to unvalidated
//! candidates. The engine evaluates them in the order returned by
//! [`default_patterns`]; precedence is therefore explicit and testable
//! rather than an accident of inline regex ordering.

use std::sync::LazyLock;

use regex::Regex;

/// An unvalidated candidate produced by a pattern: a name span plus the
/// title fragment the pattern saw next to it, when it saw one.
#[derive(Debug, Clone)]
pub struct RawCandidate {
    pub name: String,
    pub title_hint: Option<String>,
}

pub trait ContentPattern: Send + Sync {
    fn name(&self) -> &'static str;

    /// Confidence assigned to records this pattern produced.
    fn confidence(&self) -> f64;

    fn find(&self, content: &str) -> Vec<RawCandidate>;
}

/// The cascade, in precedence order: structured tabular layouts first,
/// prose forms after, bare list layouts last.
#[must_use]
pub fn default_patterns() -> Vec<Box<dyn ContentPattern>> {
    vec![
        Box::new(LinkedTableRow),
        Box::new(TableRow),
        Box::new(TitleColonName),
        Box::new(NameDashTitle),
        Box::new(NameOverTitle),
    ]
}

fn title_cell_is_plausible(cell: &str) -> bool {
    let lowered = cell.to_lowercase();
    lowered.contains("coach") || lowered.contains("coordinator") || lowered.contains("director")
}

// ---------------------------------------------------------------------------
// Tabular layouts
// ---------------------------------------------------------------------------

/// `| [Jane Doe](link) | Head Basketball Coach |` — markdown table rows where
/// the name cell is a link.
struct LinkedTableRow;

static LINKED_ROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*\|\s*\[([^\]]+)\]\([^)]*\)\s*\|\s*([^|\n]+)").expect("valid regex")
});

impl ContentPattern for LinkedTableRow {
    fn name(&self) -> &'static str {
        "linked_table_row"
    }

    fn confidence(&self) -> f64 {
        0.8
    }

    fn find(&self, content: &str) -> Vec<RawCandidate> {
        LINKED_ROW_RE
            .captures_iter(content)
            .map(|c| RawCandidate {
                name: c[1].trim().to_string(),
                title_hint: Some(c[2].trim().to_string()),
            })
            .collect()
    }
}

/// `| Jane Doe | Head Coach |` — plain table rows. The title cell must look
/// like a coaching role, otherwise schedule and result tables flood the
/// cascade with false candidates.
struct TableRow;

static TABLE_ROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*\|\s*([^|\[\]\n]{3,40}?)\s*\|\s*([^|\n]{3,60}?)\s*\|").expect("valid regex")
});

impl ContentPattern for TableRow {
    fn name(&self) -> &'static str {
        "table_row"
    }

    fn confidence(&self) -> f64 {
        0.75
    }

    fn find(&self, content: &str) -> Vec<RawCandidate> {
        TABLE_ROW_RE
            .captures_iter(content)
            .filter(|c| title_cell_is_plausible(&c[2]))
            .map(|c| RawCandidate {
                name: c[1].trim().to_string(),
                title_hint: Some(c[2].trim().to_string()),
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Prose forms
// ---------------------------------------------------------------------------

/// `Head Coach: Jane Doe` — a role label, a colon, a name.
struct TitleColonName;

static TITLE_COLON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"((?i:[a-z&'. -]*(?:coach|coordinator|director)))\s*:\s*([A-Z][A-Za-z.'-]+(?:[ \t]+[A-Z][A-Za-z.'-]+){1,3})",
    )
    .expect("valid regex")
});

impl ContentPattern for TitleColonName {
    fn name(&self) -> &'static str {
        "title_colon_name"
    }

    fn confidence(&self) -> f64 {
        0.72
    }

    fn find(&self, content: &str) -> Vec<RawCandidate> {
        TITLE_COLON_RE
            .captures_iter(content)
            .map(|c| RawCandidate {
                name: c[2].trim().to_string(),
                title_hint: Some(c[1].trim().to_string()),
            })
            .collect()
    }
}

/// `Jane Doe - Head Coach` / `Jane Doe, Head Volleyball Coach` — a name, a
/// separator, a role. The role side must contain a coaching word.
struct NameDashTitle;

static NAME_DASH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"([A-Z][A-Za-z.'-]+(?:[ \t]+[A-Z][A-Za-z.'-]+){1,3})[ \t]*[-–—,][ \t]*([^\n,]*(?i:coach|coordinator|director)[^\n,]*)",
    )
    .expect("valid regex")
});

impl ContentPattern for NameDashTitle {
    fn name(&self) -> &'static str {
        "name_dash_title"
    }

    fn confidence(&self) -> f64 {
        0.7
    }

    fn find(&self, content: &str) -> Vec<RawCandidate> {
        NAME_DASH_RE
            .captures_iter(content)
            .map(|c| RawCandidate {
                name: c[1].trim().to_string(),
                title_hint: Some(c[2].trim().to_string()),
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// List layouts
// ---------------------------------------------------------------------------

/// One name per line with the role on the following line — the layout staff
/// card grids collapse into once markup is flattened to text.
struct NameOverTitle;

static BARE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][A-Za-z.'-]+(?:\s+[A-Z][A-Za-z.'-]+){1,3}$").expect("valid regex")
});

impl ContentPattern for NameOverTitle {
    fn name(&self) -> &'static str {
        "name_over_title"
    }

    fn confidence(&self) -> f64 {
        0.7
    }

    fn find(&self, content: &str) -> Vec<RawCandidate> {
        let lines: Vec<&str> = content
            .lines()
            .map(|l| l.trim_start_matches(['#', '-', '*', '•', ' ', '\t']).trim())
            .collect();

        let mut candidates = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            if line.is_empty() || !BARE_NAME_RE.is_match(line) {
                continue;
            }
            // The role must be on the next non-empty line.
            let Some(next) = lines[i + 1..].iter().find(|l| !l.is_empty()) else {
                continue;
            };
            if title_cell_is_plausible(next) {
                candidates.push(RawCandidate {
                    name: (*line).to_string(),
                    title_hint: Some((*next).to_string()),
                });
            }
        }
        candidates
    }
}
