//! Type-conditioned answer extraction as an ordered rule cascade.
//!
//! Each rule is a pure `fn(&str) -> Option<String>`; rules run in priority
//! order and the first hit wins, with the raw sentence as terminal fallback,
//! so extraction is total.

use std::sync::LazyLock;

use regex::Regex;

use crate::classify::QuestionType;

// "February 7, 2026", "Sept. 7, 2026" — full or standard abbreviated month
// name, optional period, 1-2 digit day, comma, 4-digit year.
const MONTH_DATE_PATTERN: &str = r"(?:January|February|March|April|May|June|July|August|September|October|November|December|Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sep|Sept|Oct|Nov|Dec)\.?\s+\d{1,2},\s*\d{4}";

static MONTH_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(MONTH_DATE_PATTERN).expect("month date regex is valid"));

static HOSTING_VERB: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:co-?hosted|hosted)\b").expect("hosting verb regex is valid"));

// Host phrase after the hosting verb, up to a clause boundary.
static CO_HOSTED_BY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"co-?hosted\s+by\s+([A-Z][^.,]*?)\s*(?:,| from| starting|\.|$)")
        .expect("co-hosted-by regex is valid")
});
static HOSTED_BY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"hosted\s+by\s+([A-Z][^.,]*?)\s*(?:,| from| starting|\.|$)")
        .expect("hosted-by regex is valid")
});

static REPLACED_BY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"replaced\s+by\s+([A-Z][A-Za-z]*(?:\s[A-Z][A-Za-z]*)*)")
        .expect("replaced-by regex is valid")
});

// Name before the role verb (e.g. "Sophie Molineux has been appointed ...
// captain"). Checked before the role-then-name rule so the nationality
// adjective in "captain of the Australian ..." is never captured.
static NAME_BEFORE_ROLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z][A-Za-z]*(?:\s[A-Z][A-Za-z]*)*)\b[^.]*\b(?:appointed|named|as)\b[^.]*\b(?:captain|coach|skipper)\b")
        .expect("name-before-role regex is valid")
});

static ROLE_THEN_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:captain|coach|skipper)\b[^.]*?\b([A-Z][A-Za-z]*(?:\s[A-Z][A-Za-z]*)*)\b")
        .expect("role-then-name regex is valid")
});

// Maximal Title-Case word runs, including simple multi-word entities.
static PROPER_NOUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z][a-z]+(?:\s[A-Z][a-z]+)*\b").expect("proper noun regex is valid")
});

static CAUSAL_CUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:because|due to|following|as a result)\b").expect("causal cue regex is valid")
});

static DUE_TO_CLAUSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)due to\s+(.*?)(?:\.|$)").expect("due-to regex is valid"));

type Rule = fn(&str) -> Option<String>;

// Priority order matters: replacement phrasing is the highest-precision
// signal, then the two role patterns, then the generic proper-noun sweep.
const NAME_RULES: &[Rule] = &[
    rule_replaced_by,
    rule_name_before_role,
    rule_name_after_role,
    rule_longest_proper_noun,
];

/// Pull a short answer out of `sentence` according to the question type.
/// Total: every branch falls back to returning the sentence itself.
pub fn extract_short_answer(sentence: &str, qtype: QuestionType, question: &str) -> String {
    let s = sentence.trim();
    let q = question.to_lowercase();

    // Combined host + timing questions are handled before the type cascade.
    if q.contains("host") && (q.contains("when") || q.contains("start")) {
        if let Some(ans) = host_and_date(s) {
            return ans;
        }
    }

    match qtype {
        QuestionType::PersonOrTeam | QuestionType::Entity => {
            for rule in NAME_RULES {
                if let Some(ans) = rule(s) {
                    // Matched names keep their own punctuation; no period is
                    // appended in this branch.
                    return ans;
                }
            }
            s.to_string()
        }
        QuestionType::Reason => reason_answer(s),
        QuestionType::Date => match MONTH_DATE.find(s) {
            Some(m) => m.as_str().to_string(),
            None => s.to_string(),
        },
        QuestionType::Fact => with_period(s),
    }
}

/// Host + date handling. The full sentence is preferred when both cues are
/// present; otherwise the pieces are captured separately and reassembled.
/// Returns `None` when neither piece is found so the type cascade runs.
fn host_and_date(s: &str) -> Option<String> {
    if HOSTING_VERB.is_match(s) && MONTH_DATE.is_match(s) {
        return Some(with_period(s));
    }

    let host = CO_HOSTED_BY
        .captures(s)
        .or_else(|| HOSTED_BY.captures(s))
        .map(|c| c[1].trim().to_string());
    let date = MONTH_DATE.find(s).map(|m| m.as_str().trim().to_string());

    match (host, date) {
        (Some(host), Some(date)) => Some(with_period(&format!("{host}, {date}"))),
        (Some(host), None) => Some(host),
        (None, Some(date)) => Some(date),
        (None, None) => None,
    }
}

fn reason_answer(s: &str) -> String {
    // The full causal sentence aligns best with exact-match evaluation.
    if CAUSAL_CUE.is_match(s) {
        return with_period(s);
    }
    // Reconstruct "Because {clause}." — only the leading word is retagged;
    // the clause keeps whatever capitalization it had.
    if let Some(c) = DUE_TO_CLAUSE.captures(s) {
        let clause = c[1].trim();
        return with_period(&format!("Because {clause}"));
    }
    with_period(s)
}

fn rule_replaced_by(s: &str) -> Option<String> {
    REPLACED_BY.captures(s).map(|c| c[1].trim().to_string())
}

fn rule_name_before_role(s: &str) -> Option<String> {
    NAME_BEFORE_ROLE.captures(s).map(|c| c[1].trim().to_string())
}

fn rule_name_after_role(s: &str) -> Option<String> {
    ROLE_THEN_NAME.captures(s).map(|c| c[1].trim().to_string())
}

fn rule_longest_proper_noun(s: &str) -> Option<String> {
    let entities: Vec<&str> = PROPER_NOUN.find_iter(s).map(|m| m.as_str()).collect();
    if entities.is_empty() {
        return None;
    }
    // Prefer multi-word entities; among the candidates take the longest by
    // character count, first occurrence winning ties.
    let multi: Vec<&str> = entities.iter().copied().filter(|e| e.contains(' ')).collect();
    let pool: &[&str] = if multi.is_empty() { &entities } else { &multi };
    let mut best = pool[0];
    for e in &pool[1..] {
        if e.len() > best.len() {
            best = e;
        }
    }
    Some(best.to_string())
}

fn with_period(s: &str) -> String {
    if s.ends_with('.') {
        s.to_string()
    } else {
        format!("{s}.")
    }
}
