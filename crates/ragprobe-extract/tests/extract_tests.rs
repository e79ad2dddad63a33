use ragprobe_extract::{detect_question_type, extract_short_answer, normalize, QuestionType};

#[test]
fn classifies_by_leading_word() {
    assert_eq!(detect_question_type("Who is the captain?"), QuestionType::PersonOrTeam);
    assert_eq!(detect_question_type("Which group is Scotland in?"), QuestionType::Entity);
    assert_eq!(detect_question_type("When does it start?"), QuestionType::Date);
    assert_eq!(detect_question_type("Why was it changed?"), QuestionType::Reason);
    assert_eq!(detect_question_type("What time is it?"), QuestionType::Fact);
    // leading-word test is a plain prefix check
    assert_eq!(detect_question_type("  whoever decided this?"), QuestionType::PersonOrTeam);
}

#[test]
fn date_question_extracts_month_day_year() {
    let answer = extract_short_answer(
        "The tournament starts February 7, 2026.",
        QuestionType::Date,
        "When does the tournament start?",
    );
    assert_eq!(answer, "February 7, 2026");
}

#[test]
fn date_question_with_abbreviated_month() {
    let answer = extract_short_answer(
        "Qualifiers wrapped up on Sept. 30, 2025 in Muscat.",
        QuestionType::Date,
        "When did qualifiers end?",
    );
    assert_eq!(answer, "Sept. 30, 2025");
}

#[test]
fn date_question_without_date_returns_sentence_unmodified() {
    let answer = extract_short_answer(
        "No date has been announced",
        QuestionType::Date,
        "When does it start?",
    );
    assert_eq!(answer, "No date has been announced");
}

#[test]
fn host_and_timing_question_prefers_full_sentence() {
    let answer = extract_short_answer(
        "Co-hosted by India and Sri Lanka, starting February 7, 2026.",
        QuestionType::PersonOrTeam,
        "Who is hosting the tournament and when does it start?",
    );
    assert_eq!(answer, "Co-hosted by India and Sri Lanka, starting February 7, 2026.");
}

#[test]
fn host_and_timing_question_appends_missing_period() {
    let answer = extract_short_answer(
        "Co-hosted by India and Sri Lanka, starting February 7, 2026",
        QuestionType::PersonOrTeam,
        "Who will host and when does play start?",
    );
    assert_eq!(answer, "Co-hosted by India and Sri Lanka, starting February 7, 2026.");
}

#[test]
fn host_only_capture_when_no_date_present() {
    let answer = extract_short_answer(
        "The final stages will be hosted by India, with matches played nationwide.",
        QuestionType::Date,
        "When does it start and who will host?",
    );
    assert_eq!(answer, "India");
}

#[test]
fn date_only_capture_when_no_host_phrase_present() {
    let answer = extract_short_answer(
        "Play begins February 7, 2026 at ten venues.",
        QuestionType::Date,
        "When will the host nation start playing?",
    );
    assert_eq!(answer, "February 7, 2026");
}

#[test]
fn entity_replaced_by_rule() {
    let answer = extract_short_answer(
        "Bangladesh was replaced by Scotland.",
        QuestionType::Entity,
        "Which team replaced Bangladesh?",
    );
    assert_eq!(answer, "Scotland");
}

#[test]
fn name_before_role_beats_role_then_name() {
    // If the role-then-name rule ran first it would capture "Australian".
    let answer = extract_short_answer(
        "Sophie Molineux was named captain of the Australian squad.",
        QuestionType::PersonOrTeam,
        "Who is the new captain?",
    );
    assert_eq!(answer, "Sophie Molineux");
}

#[test]
fn name_after_role_rule() {
    let answer = extract_short_answer(
        "The team coach praised Mitchell Marsh after the win.",
        QuestionType::PersonOrTeam,
        "Who did the coach praise?",
    );
    assert_eq!(answer, "Mitchell Marsh");
}

#[test]
fn proper_noun_fallback_prefers_multi_word_entities() {
    let answer = extract_short_answer(
        "Scotland will face South Africa in Kolkata.",
        QuestionType::Entity,
        "Which opponent is next?",
    );
    assert_eq!(answer, "South Africa");
}

#[test]
fn proper_noun_fallback_single_word() {
    let answer = extract_short_answer(
        "Bangladesh withdrew from the event.",
        QuestionType::Entity,
        "Which team withdrew?",
    );
    assert_eq!(answer, "Bangladesh");
}

#[test]
fn entity_with_no_capitalized_words_returns_sentence() {
    let answer = extract_short_answer(
        "the quick brown fox jumps",
        QuestionType::Entity,
        "Which animal jumps?",
    );
    assert_eq!(answer, "the quick brown fox jumps");
}

#[test]
fn reason_keeps_causal_sentence_verbatim_with_period() {
    let answer = extract_short_answer(
        "Bangladesh refused to play matches in India due to security concerns",
        QuestionType::Reason,
        "Why was Bangladesh replaced?",
    );
    assert_eq!(answer, "Bangladesh refused to play matches in India due to security concerns.");
}

#[test]
fn reason_reconstructs_because_clause() {
    // "overdue to" defeats the word-bounded causal cue but still feeds the
    // clause capture; the clause keeps its own capitalization.
    let answer = extract_short_answer(
        "The schedule was overdue to Heavy rain delays",
        QuestionType::Reason,
        "Why was the schedule late?",
    );
    assert_eq!(answer, "Because Heavy rain delays.");
}

#[test]
fn reason_fallback_returns_sentence_with_period() {
    let answer = extract_short_answer(
        "The committee offered no explanation",
        QuestionType::Reason,
        "Why did this happen?",
    );
    assert_eq!(answer, "The committee offered no explanation.");
}

#[test]
fn fact_answer_ensures_trailing_period() {
    let answer = extract_short_answer(
        "The stadium holds fifty thousand people",
        QuestionType::Fact,
        "What is the capacity?",
    );
    assert_eq!(answer, "The stadium holds fifty thousand people.");

    let already = extract_short_answer(
        "The stadium holds fifty thousand people.",
        QuestionType::Fact,
        "What is the capacity?",
    );
    assert_eq!(already, "The stadium holds fifty thousand people.");
}

#[test]
fn normalize_strips_case_and_punctuation() {
    assert_eq!(normalize("Co-hosted, by  India!"), "cohosted by india");
    assert_eq!(normalize("  Scotland. "), "scotland");
    assert_eq!(normalize("February 7, 2026"), "february 7 2026");
}
