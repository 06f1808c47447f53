/*!
 * Chapter title normalization.
 *
 * Raw marker names carry publisher decoration: quotes, emphasis asterisks,
 * "(continued)" suffixes, dangling hyphens and bare disc headers. Each cleanup
 * is a separate stage so it can be tested on its own; `normalize` runs the
 * stages in order until the title stops changing.
 */

use once_cell::sync::Lazy;
use regex::Regex;

static ENCLOSING_QUOTES: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^"(.+)"$"#).unwrap());

static ENCLOSING_ASTERISKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\*(.+)\*$").unwrap());

static TRAILING_PARENTHETICAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\([^)]*\)$").unwrap());

static TRAILING_CONTINUED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+\(?continued\)?$").unwrap());

static TRAILING_HYPHEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+-\s*$").unwrap());

static DISC_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Dis[kc]\s+\d+\W*$").unwrap());

/// A single named rewrite applied to a title
#[derive(Clone, Copy)]
pub struct TitleStage {
    /// Short stage name used in debug logs
    pub name: &'static str,
    apply: fn(&str) -> String,
}

impl TitleStage {
    /// Run this stage on a title
    pub fn apply(&self, title: &str) -> String {
        (self.apply)(title)
    }
}

impl std::fmt::Debug for TitleStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TitleStage").field("name", &self.name).finish()
    }
}

/// Stages in application order
pub const STAGES: [TitleStage; 7] = [
    TitleStage { name: "quotes", apply: strip_quotes },
    TitleStage { name: "emphasis", apply: strip_emphasis },
    TitleStage { name: "parenthetical", apply: strip_parenthetical },
    TitleStage { name: "continued", apply: strip_continued },
    TitleStage { name: "hyphen", apply: strip_trailing_hyphen },
    TitleStage { name: "disc-header", apply: suppress_disc_header },
    TitleStage { name: "trim", apply: trim },
];

pub fn strip_quotes(title: &str) -> String {
    ENCLOSING_QUOTES.replace(title, "$1").into_owned()
}

pub fn strip_emphasis(title: &str) -> String {
    ENCLOSING_ASTERISKS.replace(title, "$1").into_owned()
}

pub fn strip_parenthetical(title: &str) -> String {
    TRAILING_PARENTHETICAL.replace(title, "").into_owned()
}

pub fn strip_continued(title: &str) -> String {
    TRAILING_CONTINUED.replace(title, "").into_owned()
}

pub fn strip_trailing_hyphen(title: &str) -> String {
    TRAILING_HYPHEN.replace(title, "").into_owned()
}

pub fn suppress_disc_header(title: &str) -> String {
    if DISC_HEADER.is_match(title) {
        String::new()
    } else {
        title.to_string()
    }
}

pub fn trim(title: &str) -> String {
    title.trim().to_string()
}

fn run_stages(title: &str) -> String {
    STAGES
        .iter()
        .fold(title.to_string(), |current, stage| stage.apply(&current))
}

/// Normalize a raw chapter title; an empty result means "drop this entry"
///
/// Nested decoration like `"*Part (1) (cont.)*"` needs more than one pass.
/// Every stage either returns its input unchanged or a strictly shorter
/// string, so the loop always reaches a fixpoint.
pub fn normalize(raw: &str) -> String {
    let mut current = run_stages(raw);
    loop {
        let next = run_stages(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}
