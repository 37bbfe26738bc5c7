//! Pure cleanup heuristics for the messy free-text fields of the legacy
//! tracker: status classification, note consolidation, link splitting, and
//! boolean coercion. Every function here is total over arbitrary input.

use crate::tracker::tools::model::Status;

/// Maps an arbitrary raw cell value to exactly one canonical status.
///
/// Matching is case-insensitive over the trimmed input and the first matching
/// rule wins: empty input is `Unknown`, exact yes/no tokens map directly,
/// partial markers (`y & n`, `y/n`, `partial`, `maybe`) beat the
/// `special`/`requires` markers, a literal `?` is `Unknown`, and any other
/// free text lands on `Special` so the nuance survives in the notes column.
pub fn normalize_status(raw: &str) -> Status {
    let value = raw.trim().to_lowercase();

    if value.is_empty() {
        return Status::Unknown;
    }
    if matches!(value.as_str(), "y" | "yes" | "true" | "1") {
        return Status::Yes;
    }
    if matches!(value.as_str(), "n" | "no" | "false" | "0" | "ntra" | "not trackable") {
        return Status::No;
    }
    if ["y & n", "y/n", "partial", "maybe"]
        .iter()
        .any(|marker| value.contains(marker))
    {
        return Status::Partial;
    }
    if value.contains("special") || value.contains("requires") {
        return Status::Special;
    }
    if value == "?" {
        return Status::Unknown;
    }

    Status::Special
}

/// Consolidates a raw tracking value and its inline comment into one notes
/// string. Non-empty parts are joined with `" | "`; no separator is emitted
/// when either side is missing.
pub fn merge_notes(raw: &str, comment: &str) -> String {
    match (raw.trim(), comment.trim()) {
        ("", "") => String::new(),
        (value, "") => value.to_string(),
        ("", note) => note.to_string(),
        (value, note) => format!("{value} | {note}"),
    }
}

/// Splits a semicolon-delimited link field into trimmed, non-empty parts.
pub fn split_links(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Coerces the string form of a spreadsheet cell into the recommended flag.
pub fn parse_recommended(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_question_mark_are_unknown() {
        assert_eq!(normalize_status(""), Status::Unknown);
        assert_eq!(normalize_status("   "), Status::Unknown);
        assert_eq!(normalize_status("?"), Status::Unknown);
    }

    #[test]
    fn yes_tokens_ignore_case_and_whitespace() {
        for raw in [" YES ", "yes", "Yes", "y", "TRUE", "1"] {
            assert_eq!(normalize_status(raw), Status::Yes, "raw: {raw:?}");
        }
    }

    #[test]
    fn no_tokens_cover_legacy_spellings() {
        for raw in ["n", "No", "FALSE", "0", "ntra", "Not Trackable"] {
            assert_eq!(normalize_status(raw), Status::No, "raw: {raw:?}");
        }
    }

    #[test]
    fn partial_markers_match_as_substrings() {
        assert_eq!(normalize_status("Y & N depending on plan"), Status::Partial);
        assert_eq!(normalize_status("y/n"), Status::Partial);
        assert_eq!(normalize_status("partially works"), Status::Partial);
        assert_eq!(normalize_status("maybe?"), Status::Partial);
    }

    #[test]
    fn partial_beats_special_when_both_match() {
        assert_eq!(
            normalize_status("partial and special requires review"),
            Status::Partial
        );
    }

    #[test]
    fn special_markers_match_as_substrings() {
        assert_eq!(normalize_status("special setup"), Status::Special);
        assert_eq!(normalize_status("Requires consent mode"), Status::Special);
    }

    #[test]
    fn unrecognized_free_text_defaults_to_special() {
        assert_eq!(normalize_status("ask vendor"), Status::Special);
        assert_eq!(normalize_status("see docs"), Status::Special);
    }

    #[test]
    fn every_input_yields_a_canonical_status() {
        let samples = [
            "", " ", "?", "yes", "no", "1", "0", "y/n", "maybe", "special",
            "requires", "ask vendor", "!!", "42", "true-ish", "\tY & N\t",
        ];
        for raw in samples {
            let status = normalize_status(raw);
            assert!(matches!(
                status,
                Status::Yes | Status::No | Status::Partial | Status::Special | Status::Unknown
            ));
        }
    }

    #[test]
    fn notes_join_value_and_comment_with_separator() {
        assert_eq!(merge_notes("Yes", "confirmed via support"), "Yes | confirmed via support");
    }

    #[test]
    fn notes_omit_separator_when_one_side_is_missing() {
        assert_eq!(merge_notes(" Yes ", ""), "Yes");
        assert_eq!(merge_notes("", " ping ops first "), "ping ops first");
        assert_eq!(merge_notes("", ""), "");
    }

    #[test]
    fn links_split_on_semicolons_and_drop_empty_parts() {
        assert_eq!(
            split_links("https://a.com ; https://b.com;;  "),
            vec!["https://a.com".to_string(), "https://b.com".to_string()]
        );
        assert!(split_links("").is_empty());
        assert!(split_links(" ; ;").is_empty());
    }

    #[test]
    fn recommended_flag_matches_true_case_insensitively() {
        assert!(parse_recommended("true"));
        assert!(parse_recommended(" TRUE "));
        assert!(!parse_recommended("FALSE"));
        assert!(!parse_recommended("yes"));
        assert!(!parse_recommended(""));
    }
}
