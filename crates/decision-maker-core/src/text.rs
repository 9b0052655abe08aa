//! Input rules shared by names, descriptions and choices.

/// Longest accepted name, description or choice, in characters.
pub const MAX_INPUT_CHARS: usize = 360;

/// Words that end choice entry. Matched case-sensitively.
pub const STOP_KEYWORDS: [&str; 8] = [
    "stop", "exit", "done", "good", "quit", "leave", "finish", "end",
];

/// Non-blank and at most [`MAX_INPUT_CHARS`] characters.
pub fn is_acceptable(input: &str) -> bool {
    !input.trim().is_empty() && input.chars().count() <= MAX_INPUT_CHARS
}

/// A stop keyword, or anything that parses as a number.
pub fn is_stop_command(input: &str) -> bool {
    let input = input.trim();
    STOP_KEYWORDS.contains(&input) || is_numeric(input)
}

pub fn is_numeric(input: &str) -> bool {
    let input = input.trim();
    !input.is_empty() && (input.parse::<i64>().is_ok() || input.parse::<f64>().is_ok())
}

/// Leaves the current menu level.
pub fn is_exit(input: &str) -> bool {
    matches!(
        input.trim().to_lowercase().as_str(),
        "exit" | "quit" | "back"
    )
}

/// Replaces characters that cannot appear in a file name.
pub fn sanitize_file_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '/' | '\\' => '-',
            ':' => ';',
            '*' => '+',
            '?' | '|' => '!',
            '"' => '\'',
            '<' => '(',
            '>' => ')',
            other => other,
        })
        .collect();

    replaced
        .trim()
        .trim_end_matches(['.', ' '])
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acceptable_rejects_blank() {
        assert!(!is_acceptable(""));
        assert!(!is_acceptable("   \t"));
        assert!(is_acceptable("Pizza"));
    }

    #[test]
    fn test_acceptable_length_limit() {
        let at_limit = "a".repeat(MAX_INPUT_CHARS);
        let over_limit = "a".repeat(MAX_INPUT_CHARS + 1);
        assert!(is_acceptable(&at_limit));
        assert!(!is_acceptable(&over_limit));
        // characters, not bytes
        assert!(is_acceptable(&"é".repeat(MAX_INPUT_CHARS)));
    }

    #[test]
    fn test_stop_commands() {
        for word in STOP_KEYWORDS {
            assert!(is_stop_command(word), "{word} should stop");
        }
        assert!(is_stop_command("3"));
        assert!(is_stop_command("-1.5"));
        assert!(!is_stop_command("Stop"));
        assert!(!is_stop_command("DONE"));
        assert!(!is_stop_command("pizza"));
    }

    #[test]
    fn test_exit_is_case_insensitive() {
        assert!(is_exit("EXIT"));
        assert!(is_exit(" back "));
        assert!(!is_exit("1"));
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("Movies/TV"), "Movies-TV");
        assert_eq!(sanitize_file_name("What? Where: *now*"), "What! Where; +now+");
        assert_eq!(sanitize_file_name("<a|b>"), "(a!b)");
        assert_eq!(sanitize_file_name("say \"hi\""), "say 'hi'");
        assert_eq!(sanitize_file_name("trailing..."), "trailing");
        assert_eq!(sanitize_file_name("Plain Name"), "Plain Name");
    }
}
