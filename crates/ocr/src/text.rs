//! Line-level helpers shared by the amount and store-name extractors.

use std::sync::OnceLock;

use regex::Regex;

/// Digits, a `.` or `,` separator, then two digits. ASCII only, so that a
/// match start plus one byte is always a char boundary.
fn re_money_token() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"[0-9]+[.,][0-9]{2}").expect("invalid regex"))
}

/// All monetary tokens in `text`, in document order.
///
/// A token must carry exactly two fractional digits: a match directly
/// followed by another digit is discarded, so `12.505` yields nothing and
/// `1.234,56` yields `234,56`. Any match starting inside the rejected
/// integer run would end at the same place, so the search resumes just past
/// the separator and each byte is scanned a bounded number of times.
pub fn money_tokens(text: &str) -> Vec<&str> {
    let re = re_money_token();
    let mut tokens = Vec::new();
    let mut start = 0;
    while let Some(m) = re.find_at(text, start) {
        let followed_by_digit = text[m.end()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit());
        if followed_by_digit {
            let sep = m.as_str().find(['.', ',']).unwrap_or(0);
            start = m.start() + sep + 1;
        } else {
            tokens.push(m.as_str());
            start = m.end();
        }
    }
    tokens
}

/// Rewrites a locale decimal comma to a dot. No grouping logic.
pub fn canonical_decimal(token: &str) -> String {
    token.replace(',', ".")
}

/// ASCII digits only, matching the token scanner.
pub fn contains_digit(line: &str) -> bool {
    line.chars().any(|c| c.is_ascii_digit())
}

/// At least one cased letter and no lowercase ones (`"ALDI SÜD"`, `"DM-MARKT"`).
pub fn is_all_caps(line: &str) -> bool {
    line.chars().any(char::is_uppercase) && !line.chars().any(char::is_lowercase)
}

/// `capitalized_words >= word_count / 2` with integer division.
pub fn is_mostly_capitalized(line: &str) -> bool {
    let (words, capitalized) = line.split_whitespace().fold((0usize, 0usize), |(w, c), word| {
        let upper = word.chars().next().is_some_and(char::is_uppercase);
        (w + 1, c + usize::from(upper))
    });
    capitalized >= words / 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_in_document_order() {
        assert_eq!(money_tokens("a 3.50 b 7,25\nc 1.00"), vec!["3.50", "7,25", "1.00"]);
    }

    #[test]
    fn one_fractional_digit_is_not_a_token() {
        assert!(money_tokens("Summe 12.5").is_empty());
    }

    #[test]
    fn three_fractional_digits_is_not_a_token() {
        assert!(money_tokens("Gewicht 12.505 kg").is_empty());
    }

    #[test]
    fn grouped_amount_keeps_trailing_group() {
        assert_eq!(money_tokens("1.234,56"), vec!["234,56"]);
    }

    #[test]
    fn long_digit_run_scans_in_linear_time() {
        let text = format!("Summe {}.123", "1".repeat(100_000));
        let started = std::time::Instant::now();
        assert!(money_tokens(&text).is_empty());
        assert!(started.elapsed() < std::time::Duration::from_secs(2));
    }

    #[test]
    fn token_after_rejected_run_is_found() {
        let text = format!("{}.123 4,56", "7".repeat(50_000));
        assert_eq!(money_tokens(&text), vec!["4,56"]);
    }

    #[test]
    fn token_at_end_of_text() {
        assert_eq!(money_tokens("EUR 0,99"), vec!["0,99"]);
    }

    #[test]
    fn comma_becomes_dot() {
        assert_eq!(canonical_decimal("3,00"), "3.00");
        assert_eq!(canonical_decimal("3.00"), "3.00");
    }

    #[test]
    fn all_caps_needs_a_cased_letter() {
        assert!(is_all_caps("ALDI SÜD"));
        assert!(!is_all_caps("--- ***"));
        assert!(!is_all_caps("Aldi SÜD"));
    }

    #[test]
    fn capitalization_ratio_rounds_down() {
        assert!(is_mostly_capitalized("Bäckerei Schmidt"));
        assert!(is_mostly_capitalized("Vielen dank und"));
        assert!(!is_mostly_capitalized("vielen dank für ihren Einkauf"));
        // 1 / 2 == 0, so a lone lowercase word passes.
        assert!(is_mostly_capitalized("danke"));
    }

    #[test]
    fn digit_detection() {
        assert!(contains_digit("Bahnhofstr. 1"));
        assert!(!contains_digit("ALDI SÜD"));
        assert!(!contains_digit("BÄCKEREI ½ PREIS"));
        assert!(!contains_digit("KAPITEL Ⅻ"));
    }
}
