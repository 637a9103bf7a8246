use kuvert_core::Money;

use crate::config::ExtractionConfig;
use crate::text::{canonical_decimal, money_tokens};
use crate::types::{AmountCandidate, AmountSource, RawOcrText};

/// Finds the receipt total. Strategies run in [`AmountSource::ORDER`] and the
/// first one that produces a parseable amount wins.
#[derive(Debug, Clone)]
pub struct AmountExtractor {
    keywords: Vec<String>,
}

impl AmountExtractor {
    /// Keywords are matched against the lowercased line.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords.into_iter().map(|k| k.as_ref().to_lowercase()).collect(),
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(&config.keywords)
    }

    pub fn extract(&self, text: &RawOcrText<'_>) -> Option<AmountCandidate> {
        AmountSource::ORDER.iter().find_map(|source| match source {
            AmountSource::KeywordLine => self.keyword_line(text),
            AmountSource::LastMatch => last_match(text),
        })
    }

    pub fn is_keyword_line(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        self.keywords.iter().any(|kw| lower.contains(kw.as_str()))
    }

    fn keyword_line(&self, text: &RawOcrText<'_>) -> Option<AmountCandidate> {
        text.lines()
            .filter(|line| self.is_keyword_line(line))
            .find_map(|line| {
                let token = *money_tokens(line).last()?;
                parse_candidate(token, AmountSource::KeywordLine)
            })
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }
}

fn last_match(text: &RawOcrText<'_>) -> Option<AmountCandidate> {
    money_tokens(text.as_str())
        .into_iter()
        .rev()
        .find_map(|token| parse_candidate(token, AmountSource::LastMatch))
}

fn parse_candidate(token: &str, source: AmountSource) -> Option<AmountCandidate> {
    match canonical_decimal(token).parse::<Money>() {
        Ok(value) => Some(AmountCandidate { value, token: token.to_string(), source }),
        Err(e) => {
            tracing::debug!(token, %source, error = %e, "skipping unparseable amount token");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Option<AmountCandidate> {
        AmountExtractor::default().extract(&RawOcrText::new(text))
    }

    #[test]
    fn keyword_line_takes_last_token_on_line() {
        let c = extract("Bar 20,00\nSumme 2,50 MwSt 19% 12,49\nRückgeld 7,51").unwrap();
        assert_eq!(c.value, Money::from_cents(1249));
        assert_eq!(c.token, "12,49");
        assert_eq!(c.source, AmountSource::KeywordLine);
    }

    #[test]
    fn keywords_are_case_insensitive() {
        let c = extract("ZU ZAHLEN EUR 8,15\n9.99").unwrap();
        assert_eq!(c.value, Money::from_cents(815));
    }

    #[test]
    fn first_keyword_line_wins_over_larger_later_one() {
        let c = extract("Summe 10.00\nGesamt 12.50").unwrap();
        assert_eq!(c.value, Money::from_cents(1000));
    }

    #[test]
    fn keyword_line_without_token_is_skipped() {
        let c = extract("Gesamtbetrag\nEUR\nBetrag 4,20\n1,00").unwrap();
        assert_eq!(c.value, Money::from_cents(420));
        assert_eq!(c.source, AmountSource::KeywordLine);
    }

    #[test]
    fn unparseable_keyword_token_moves_to_next_line() {
        let huge = format!("Summe {}.00\nTotal 3.10", "9".repeat(40));
        let c = extract(&huge).unwrap();
        assert_eq!(c.value, Money::from_cents(310));
    }

    #[test]
    fn fallback_takes_last_token_in_text() {
        let c = extract("Brot 3.50\nMilch 7.25").unwrap();
        assert_eq!(c.value, Money::from_cents(725));
        assert_eq!(c.source, AmountSource::LastMatch);
    }

    #[test]
    fn fallback_skips_unparseable_trailing_token() {
        let text = format!("Brot 3.50\n{}.99", "9".repeat(40));
        let c = extract(&text).unwrap();
        assert_eq!(c.value, Money::from_cents(350));
    }

    #[test]
    fn no_token_means_absent() {
        assert!(extract("").is_none());
        assert!(extract("Summe 12.5\nDanke").is_none());
    }

    #[test]
    fn custom_keywords_replace_defaults() {
        let en = AmountExtractor::new(["Amount Due"]);
        let c = en.extract(&RawOcrText::new("Summe 1.00\nAmount due 7.10\nChange 2.90")).unwrap();
        assert_eq!(c.value, Money::from_cents(710));
        assert_eq!(c.source, AmountSource::KeywordLine);
    }
}
