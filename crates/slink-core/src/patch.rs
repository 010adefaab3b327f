//! Locating the directive line inside fetched patch text.
//!
//! A stored record comes back as a `git format-patch` style blob. Exactly one
//! line in it matters:
//!
//! ```text
//! Subject: [PATCH] slink:{"v":1,"algo":"AES-GCM",...}   envelope record
//! Subject: [PATCH] https://example.com                  legacy URL record
//! +{"v":1,...}                                          pre-subject records
//! ```
//!
//! Precedence: subject envelope, then subject URL, then the first added diff
//! line that starts with `{`. All patterns are anchored at the start of a
//! line.

/// Marker that prefixes an envelope in a commit subject.
pub const ENVELOPE_MARKER: &str = "slink:";

const SUBJECT_PREFIX: &str = "Subject:";
const PATCH_TAG: &str = "[PATCH]";

/// What a record's text turned out to carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedDirective {
    /// Legacy record: a bare URL in the subject, no encryption.
    PlainUrl(String),
    /// Serialized envelope JSON, not yet decoded.
    Envelope(String),
    /// No directive anywhere in the text.
    NotFound,
}

impl ParsedDirective {
    /// The raw payload text, if any (URL or envelope JSON).
    pub fn payload(&self) -> Option<&str> {
        match self {
            ParsedDirective::PlainUrl(url) => Some(url),
            ParsedDirective::Envelope(json) => Some(json),
            ParsedDirective::NotFound => None,
        }
    }
}

/// Commit message the creation path stores for an encoded envelope.
pub fn commit_message(envelope_json: &str) -> String {
    format!("{}{}", ENVELOPE_MARKER, envelope_json)
}

/// The subject line a commit message renders as in patch text.
pub fn directive_line(message: &str) -> String {
    let subject = message.lines().next().unwrap_or_default();
    format!("{} {} {}", SUBJECT_PREFIX, PATCH_TAG, subject)
}

/// Extract the directive from patch text.
pub fn extract(patch_text: &str) -> ParsedDirective {
    let subjects: Vec<&str> = patch_text.lines().filter_map(subject_remainder).collect();

    for rest in &subjects {
        if let Some(json) = envelope_in_subject(rest) {
            return ParsedDirective::Envelope(json.to_string());
        }
    }

    for rest in &subjects {
        // a marked subject whose object is missing is not a legacy URL
        if !rest.starts_with(ENVELOPE_MARKER) && !rest.is_empty() {
            return ParsedDirective::PlainUrl(rest.to_string());
        }
    }

    patch_text
        .lines()
        .find_map(|line| line.strip_prefix('+').filter(|rest| rest.starts_with('{')))
        .map(|json| ParsedDirective::Envelope(json.trim_end().to_string()))
        .unwrap_or(ParsedDirective::NotFound)
}

/// Trimmed text after `Subject:<ws>[PATCH]` on a line that starts with it.
fn subject_remainder(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(SUBJECT_PREFIX)?;
    let rest = rest.trim_start_matches([' ', '\t']);
    let rest = rest.strip_prefix(PATCH_TAG)?;
    Some(rest.trim())
}

fn envelope_in_subject(rest: &str) -> Option<&str> {
    let marked = rest.strip_prefix(ENVELOPE_MARKER)?;
    let start = marked.find('{')?;
    Some(&marked[start..])
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENVELOPE_JSON: &str = r#"{"v":1,"algo":"AES-GCM","salt":"AAAA","iv":"BBBB","c":"CCCC"}"#;

    fn format_patch(subject: &str) -> String {
        format!(
            "From 3f2a9c1d0e4b5a6978c8d7e6f5a4b3c2d1e0f9a8 Mon Sep 17 00:00:00 2001\n\
             From: slink <slink@users.noreply.github.com>\n\
             Date: Fri, 16 Oct 2026 09:12:44 +0000\n\
             Subject: [PATCH] {}\n\
             \n\
             ---\n\
             \n\
             --\n\
             2.45.2\n",
            subject
        )
    }

    #[test]
    fn test_subject_envelope() {
        let text = format_patch(&commit_message(ENVELOPE_JSON));
        assert_eq!(
            extract(&text),
            ParsedDirective::Envelope(ENVELOPE_JSON.to_string())
        );
    }

    #[test]
    fn test_subject_plain_url() {
        let text = format_patch("http://legacy.example");
        assert_eq!(
            extract(&text),
            ParsedDirective::PlainUrl("http://legacy.example".to_string())
        );
    }

    #[test]
    fn test_subject_spacing_and_crlf() {
        let text = "Subject:[PATCH]   slink:{\"v\":1}\r\n";
        assert_eq!(
            extract(text),
            ParsedDirective::Envelope("{\"v\":1}".to_string())
        );

        let text = "Subject: \t[PATCH]  https://example.com/x  \r\n";
        assert_eq!(
            extract(text),
            ParsedDirective::PlainUrl("https://example.com/x".to_string())
        );
    }

    #[test]
    fn test_envelope_starts_at_first_brace() {
        let text = "Subject: [PATCH] slink: {\"v\":1}";
        assert_eq!(
            extract(text),
            ParsedDirective::Envelope("{\"v\":1}".to_string())
        );
    }

    #[test]
    fn test_subject_envelope_beats_diff_fallback() {
        let text = format!(
            "{}\ndiff --git a/links.txt b/links.txt\n+{{\"v\":1,\"from\":\"diff\"}}\n",
            format_patch(&commit_message(ENVELOPE_JSON))
        );
        assert_eq!(
            extract(&text),
            ParsedDirective::Envelope(ENVELOPE_JSON.to_string())
        );
    }

    #[test]
    fn test_subject_envelope_beats_subject_url() {
        let text = format!(
            "Subject: [PATCH] https://first.example\nSubject: [PATCH] {}\n",
            commit_message(ENVELOPE_JSON)
        );
        assert_eq!(
            extract(&text),
            ParsedDirective::Envelope(ENVELOPE_JSON.to_string())
        );
    }

    #[test]
    fn test_subject_url_beats_diff_fallback() {
        let text = format!("{}+{{\"v\":1}}\n", format_patch("https://example.com"));
        assert_eq!(
            extract(&text),
            ParsedDirective::PlainUrl("https://example.com".to_string())
        );
    }

    #[test]
    fn test_diff_fallback_takes_first_added_object() {
        let text = "From abc Mon Sep 17 00:00:00 2001\n\
                    Subject: [PATCH]\n\
                    \n\
                    diff --git a/l b/l\n\
                    +++ b/l\n\
                    @@ -0,0 +1,2 @@\n\
                    +{\"v\":1,\"n\":1}\n\
                    +{\"v\":1,\"n\":2}\n";
        assert_eq!(
            extract(text),
            ParsedDirective::Envelope("{\"v\":1,\"n\":1}".to_string())
        );
    }

    #[test]
    fn test_marked_subject_without_object_is_not_a_url() {
        let text = "Subject: [PATCH] slink:garbage\n";
        assert_eq!(extract(text), ParsedDirective::NotFound);
    }

    #[test]
    fn test_patterns_are_line_anchored() {
        let text = [
            " Subject: [PATCH] https://indented.example",
            "context Subject: [PATCH] slink:{\"v\":1}",
            " +{\"v\":1}",
            "-{\"v\":1}",
        ]
        .join("\n");
        assert_eq!(extract(&text), ParsedDirective::NotFound);
    }

    #[test]
    fn test_no_directive() {
        assert_eq!(extract(""), ParsedDirective::NotFound);
        assert_eq!(
            extract("From abc\nDate: today\n\nnothing here\n"),
            ParsedDirective::NotFound
        );
        assert_eq!(extract("Subject: [PATCH]   \n"), ParsedDirective::NotFound);
    }

    #[test]
    fn test_directive_line_is_what_extract_reads() {
        let line = directive_line(&commit_message(ENVELOPE_JSON));
        assert_eq!(line, format!("Subject: [PATCH] slink:{}", ENVELOPE_JSON));
        assert_eq!(
            extract(&line),
            ParsedDirective::Envelope(ENVELOPE_JSON.to_string())
        );
        assert_eq!(
            directive_line("https://a.example\n\nbody"),
            "Subject: [PATCH] https://a.example"
        );
    }

    #[test]
    fn test_payload_accessor() {
        assert_eq!(
            ParsedDirective::PlainUrl("https://a.example".into()).payload(),
            Some("https://a.example")
        );
        assert_eq!(ParsedDirective::NotFound.payload(), None);
    }
}
