use ariadne::{Color, Label, Report, ReportKind, Source};
use sieve::SieveError;

/// Format a SieveError for the terminal.
///
/// Parse errors are rendered with Ariadne when the expression text is known.
pub fn format_error(error: &SieveError, source: Option<(&str, &str)>) -> String {
    match (error, source) {
        (SieveError::Parse { message, span }, Some((source_id, text))) => {
            let start = char_offset(text, span.start);
            let end = if start < text.chars().count() { start + 1 } else { start };
            let mut output = Vec::new();

            let report = Report::build(ReportKind::Error, source_id, start)
                .with_message(format!("Parse error: {}", message))
                .with_label(
                    Label::new((source_id, start..end))
                        .with_message(message)
                        .with_color(Color::Red),
                )
                .finish();

            match report.write((source_id, Source::from(text)), &mut output) {
                Ok(_) => String::from_utf8_lossy(&output).to_string(),
                Err(_) => format!("{}", error),
            }
        }
        (
            SieveError::ResourceLimitExceeded {
                limit_name,
                limit_value,
                actual_value,
            },
            _,
        ) => format!(
            "Resource limit exceeded: {}\n  Limit: {}\n  Actual: {}",
            limit_name, limit_value, actual_value
        ),
        _ => format!("Error: {}", error),
    }
}

// pest spans are byte offsets, ariadne labels count chars
fn char_offset(text: &str, byte_offset: usize) -> usize {
    text.char_indices()
        .take_while(|(index, _)| *index < byte_offset)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sieve::Span;

    #[test]
    fn test_plain_errors() {
        let error = SieveError::UnknownOperation("nope".to_string());
        assert_eq!(format_error(&error, None), "Error: Unknown operation 'nope'");
    }

    #[test]
    fn test_parse_error_without_source_falls_back() {
        let error = SieveError::parse("expected operand", Span::at(2, 1, 3));
        assert_eq!(
            format_error(&error, None),
            "Error: Parse error: expected operand at 1:3"
        );
    }

    #[test]
    fn test_parse_error_with_source_mentions_message() {
        let error = SieveError::parse("expected operand", Span::at(3, 1, 4));
        let rendered = format_error(&error, Some(("<expression>", "1 +")));
        assert!(rendered.contains("expected operand"));
    }

    #[test]
    fn test_char_offset_counts_multibyte_text() {
        let text = "\"é\" && ";
        assert_eq!(char_offset(text, 0), 0);
        assert_eq!(char_offset(text, 8), 7);
        assert_eq!(char_offset("abc", 10), 3);
    }

    #[test]
    fn test_parse_error_after_multibyte_text() {
        let text = "name == \"Zoë\" &&";
        let error = sieve::Engine::new().compile(text).unwrap_err();
        let rendered = format_error(&error, Some(("<expression>", text)));
        assert!(rendered.contains("Parse error"));
    }
}
