/// Badge prefix letter, compared case-insensitively.
const LETTER_PREFIX: char = 'f';
/// Badge prefix for numeric-only badges.
const DIGIT_PREFIX: &str = "88";

/// Check whether `id` looks like an employee badge.
///
/// Accepted ids start with `f`/`F` or with `88`, are at least two characters
/// long, and contain only ASCII digits after the first character.
pub fn validate_employee_id(id: &str) -> bool {
    if id.is_empty() {
        return false;
    }

    let mut chars = id.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let tail = chars.as_str();

    if tail.is_empty() {
        return false;
    }

    let has_prefix = first.to_ascii_lowercase() == LETTER_PREFIX || id.starts_with(DIGIT_PREFIX);
    if !has_prefix {
        return false;
    }

    tail.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_single_char() {
        assert!(!validate_employee_id(""));
        assert!(!validate_employee_id("f"));
        assert!(!validate_employee_id("8"));
    }

    #[test]
    fn accepts_letter_prefix_in_either_case() {
        assert!(validate_employee_id("f881234"));
        assert!(validate_employee_id("F1"));
        assert!(validate_employee_id("f0000"));
    }

    #[test]
    fn accepts_digit_prefix() {
        assert!(validate_employee_id("88"));
        assert!(validate_employee_id("881234"));
    }

    #[test]
    fn rejects_other_prefixes() {
        assert!(!validate_employee_id("g1234"));
        assert!(!validate_employee_id("81234"));
        assert!(!validate_employee_id("1881"));
        assert!(!validate_employee_id("8f12"));
    }

    #[test]
    fn rejects_any_non_digit_after_first() {
        for id in ["fa123", "f12a", "88 1", "f+12", "881-2", "ff12", "f１２"] {
            assert!(!validate_employee_id(id), "{id} should be rejected");
        }
    }
}
