use regex::Regex;
use std::sync::OnceLock;

fn owner_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)CLIENT\s*([^-|_]+?)\s*CLIENT-ID").expect("owner pattern is valid")
    })
}

/// Derives the owner label from a statement filename.
///
/// Filenames following the vendor convention carry the owner between
/// `CLIENT` and `CLIENT-ID`; the first such match wins and underscores and
/// hyphens in it become spaces. Anything else falls back to the filename
/// with its extension removed. Always returns a string, possibly empty.
pub fn owner_from_filename(filename: &str) -> String {
    if let Some(captures) = owner_pattern().captures(filename) {
        return captures[1].trim().replace(['_', '-'], " ");
    }
    strip_extension(filename).to_string()
}

fn strip_extension(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(index) if index > 0 => &filename[..index],
        _ => filename,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_between_client_markers() {
        assert_eq!(
            owner_from_filename("CLIENT John Doe CLIENT-ID 1234.xlsx"),
            "John Doe"
        );
    }

    #[test]
    fn test_owner_match_is_case_insensitive() {
        assert_eq!(
            owner_from_filename("client Alice client-id 99.csv"),
            "Alice"
        );
    }

    #[test]
    fn test_owner_underscores_become_spaces() {
        // The capture itself cannot contain '_' or '-', but internal
        // replacement still applies to what was captured.
        assert_eq!(
            owner_from_filename("CLIENT Mary Jane CLIENT-ID 7.csv"),
            "Mary Jane"
        );
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(
            owner_from_filename("CLIENT A CLIENT-ID CLIENT B CLIENT-ID.csv"),
            "A"
        );
    }

    #[test]
    fn test_fallback_strips_extension() {
        assert_eq!(owner_from_filename("statement_2024.csv"), "statement_2024");
        assert_eq!(owner_from_filename("report.final.xlsx"), "report.final");
    }

    #[test]
    fn test_fallback_without_extension() {
        assert_eq!(owner_from_filename("statement"), "statement");
        assert_eq!(owner_from_filename(".hidden"), ".hidden");
    }

    #[test]
    fn test_whitespace_only_capture_yields_empty_owner() {
        // "CLIENT  CLIENT-ID": the capture is whitespace, trimmed to "".
        // An empty owner label is still a valid label.
        assert_eq!(owner_from_filename("CLIENT  CLIENT-ID.csv"), "");
    }
}
