//! Pattern extraction of funding facts from free text.
//!
//! Each rule is independent: a page can yield a round label with no amount,
//! an amount with no date, and so on. Scalar rules take the first match in
//! the text, so callers should feed headline material before body text.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use fundsignal_common::FundingFacts;

// "extension" alternatives come first: the engine prefers earlier
// alternatives at the same position, and the bare label is a prefix
// of the extension form.
static ROUND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(Series\s+[A-L]\s+extension|Series\s+[A-L]|Pre-Seed|Seed|Angel|Bridge|Convertible\s+Note|SAFE|Debt|Venture\s+Round|Equity\s+Round)\b",
    )
    .expect("valid regex")
});

// Magnitude words require a word boundary so "3 months" reads as a bare 3,
// not 3 million.
static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:USD\s*)?\$?\s*([0-9][\d,\.]*)(?:\s*(billion|bn|million|mm|m|thousand|k)\b)?")
        .expect("valid regex")
});

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b((?:19|20)\d{2}|\d{2})[-/\.](\d{1,2})[-/\.](\d{1,2})\b").expect("valid regex")
});

// Lead investors stop at the first comma; participation lists keep commas
// because they usually enumerate several names.
static LED_BY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:co-led by|led by)\s+([^.;,\n]+)").expect("valid regex")
});

static PARTICIPATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:with participation from|including)\s+([^.;\n]+)").expect("valid regex")
});

static INVESTOR_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",| and ").expect("valid regex"));

static TRAILING_PAREN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)\s*$").expect("valid regex"));

/// Extract whatever funding facts the text yields. Empty or irrelevant
/// input produces an empty record; extraction never fails.
pub fn extract_facts(text: &str) -> FundingFacts {
    if text.trim().is_empty() {
        return FundingFacts::default();
    }
    FundingFacts {
        round_type: first_round(text),
        amount_usd: first_amount(text),
        announced_on: first_valid_date(text),
        investors: extract_investors(text),
    }
}

fn first_round(text: &str) -> Option<String> {
    ROUND_RE.captures(text).and_then(|caps| caps.get(1)).map(|m| {
        let label = m.as_str().split_whitespace().collect::<Vec<_>>().join(" ");
        title_case(&label)
    })
}

/// First dollar-ish number in the text, scaled by its magnitude word.
///
/// A candidate directly preceded by a digit or `$` is the tail of a larger
/// token and is skipped. The first real candidate is final: if it fails to
/// parse or overflows, the text yields no amount at all.
fn first_amount(text: &str) -> Option<u64> {
    for caps in AMOUNT_RE.captures_iter(text) {
        let (Some(whole), Some(number)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let preceded = text[..whole.start()]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_digit() || c == '$');
        if preceded {
            continue;
        }
        let unit = caps.get(2).map(|m| m.as_str());
        return to_usd(number.as_str(), unit);
    }
    None
}

/// Scale a captured number by its magnitude word and round to whole
/// dollars. Zero, non-finite, and beyond-u64 values are rejected.
fn to_usd(raw: &str, unit: Option<&str>) -> Option<u64> {
    let number: f64 = raw.replace(',', "").parse().ok()?;
    let scaled = match unit.map(|u| u.to_lowercase()).as_deref() {
        Some("billion") | Some("bn") => number * 1e9,
        Some("million") | Some("mm") | Some("m") => number * 1e6,
        Some("thousand") | Some("k") => number * 1e3,
        _ => number,
    };
    if !scaled.is_finite() || scaled <= 0.0 {
        return None;
    }
    let rounded = scaled.round();
    if rounded >= u64::MAX as f64 {
        return None;
    }
    Some(rounded as u64)
}

/// First date token that forms a real calendar date. Tokens like
/// 2024-13-40 are skipped, not fatal. Two-digit years pivot at 70:
/// 00-69 land in the 2000s, 70-99 in the 1900s.
fn first_valid_date(text: &str) -> Option<NaiveDate> {
    for caps in DATE_RE.captures_iter(text) {
        let (Some(year_raw), Some(month_raw), Some(day_raw)) =
            (caps.get(1), caps.get(2), caps.get(3))
        else {
            continue;
        };
        let (Ok(year), Ok(month), Ok(day)) = (
            year_raw.as_str().parse::<i32>(),
            month_raw.as_str().parse::<u32>(),
            day_raw.as_str().parse::<u32>(),
        ) else {
            continue;
        };
        let year = if year_raw.as_str().len() == 2 {
            if year < 70 {
                2000 + year
            } else {
                1900 + year
            }
        } else {
            year
        };
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date);
        }
    }
    None
}

/// Names following "led by" / "co-led by" and "with participation from" /
/// "including". Deduplicated case-insensitively, sorted for stable output.
fn extract_investors(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for re in [&*LED_BY_RE, &*PARTICIPATION_RE] {
        let Some(chunk) = re.captures(text).and_then(|caps| caps.get(1)) else {
            continue;
        };
        for part in INVESTOR_SPLIT_RE.split(chunk.as_str()) {
            let cleaned = TRAILING_PAREN_RE.replace(part.trim(), "");
            let cleaned = cleaned.trim_matches(|c: char| " .;:()[]".contains(c));
            if !cleaned.is_empty() && cleaned.len() <= 100 {
                names.push(cleaned.to_string());
            }
        }
    }
    dedupe_and_sort(names)
}

fn dedupe_and_sort(names: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut out: Vec<String> = Vec::new();
    for name in names {
        let key = name.to_lowercase();
        if !seen.contains(&key) {
            seen.push(key);
            out.push(name);
        }
    }
    out.sort_by_key(|n| n.to_lowercase());
    out
}

/// Uppercase every letter that follows a non-letter, lowercase the rest.
/// "pre-seed" becomes "Pre-Seed", "SAFE" becomes "Safe".
fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut boundary = true;
    for c in raw.chars() {
        if c.is_alphabetic() {
            if boundary {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            boundary = false;
        } else {
            out.push(c);
            boundary = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_text_yields_empty_facts() {
        assert!(extract_facts("").is_empty());
        assert!(extract_facts("   \n\t ").is_empty());
    }

    #[test]
    fn irrelevant_text_yields_no_round() {
        let facts = extract_facts("We shipped a new dashboard for enterprise customers.");
        assert_eq!(facts.round_type, None);
        assert_eq!(facts.amount_usd, None);
        assert!(facts.investors.is_empty());
    }

    #[test]
    fn press_release_scenario() {
        let facts = extract_facts(
            "Acme Robotics raises $8 million Series A led by Acme Ventures and Beta Capital, \
             announced 2024-03-15.",
        );
        assert_eq!(facts.round_type.as_deref(), Some("Series A"));
        assert_eq!(facts.amount_usd, Some(8_000_000));
        assert_eq!(facts.announced_on, Some(date(2024, 3, 15)));
        assert_eq!(facts.investors, vec!["Acme Ventures", "Beta Capital"]);
    }

    #[test]
    fn amount_spelled_million() {
        let facts = extract_facts("The startup closed a $12.5 million round.");
        assert_eq!(facts.amount_usd, Some(12_500_000));
    }

    #[test]
    fn amount_with_thousands_separators() {
        let facts = extract_facts("raised $12,500,000 from new backers");
        assert_eq!(facts.amount_usd, Some(12_500_000));
    }

    #[test]
    fn amount_short_units() {
        assert_eq!(extract_facts("secured $1.2bn in debt").amount_usd, Some(1_200_000_000));
        assert_eq!(extract_facts("a $4m seed").amount_usd, Some(4_000_000));
        assert_eq!(extract_facts("grant of 2.3 k dollars").amount_usd, Some(2_300));
    }

    #[test]
    fn amount_unit_needs_word_boundary() {
        // "months" must not read as the m unit.
        let facts = extract_facts("after 3 months of talks");
        assert_eq!(facts.amount_usd, Some(3));
    }

    #[test]
    fn amount_overflow_is_dropped() {
        let facts = extract_facts("a valuation of $999999999999999999999");
        assert_eq!(facts.amount_usd, None);
    }

    #[test]
    fn amount_takes_first_number_even_when_unrelated() {
        // First-match semantics: a leading date wins over the real amount.
        let facts = extract_facts("On 2024-03-15 Acme raised $8 million.");
        assert_eq!(facts.amount_usd, Some(2024));
    }

    #[test]
    fn unparseable_first_number_suppresses_amount() {
        let facts = extract_facts("v1.2.3 ships as Acme raises $5 million");
        assert_eq!(facts.amount_usd, None);
    }

    #[test]
    fn round_labels_title_cased() {
        assert_eq!(extract_facts("closed a pre-seed round").round_type.as_deref(), Some("Pre-Seed"));
        assert_eq!(
            extract_facts("a convertible note was issued").round_type.as_deref(),
            Some("Convertible Note"),
        );
        assert_eq!(extract_facts("raised a series b").round_type.as_deref(), Some("Series B"));
    }

    #[test]
    fn round_extension_beats_bare_label() {
        let facts = extract_facts("announced a Series B extension today");
        assert_eq!(facts.round_type.as_deref(), Some("Series B Extension"));
    }

    #[test]
    fn round_accepts_late_alphabet_series() {
        let facts = extract_facts("closed its Series K round");
        assert_eq!(facts.round_type.as_deref(), Some("Series K"));
    }

    #[test]
    fn date_invalid_candidate_skipped() {
        let facts = extract_facts("posted 2024-13-40, corrected to 2024-03-15");
        assert_eq!(facts.announced_on, Some(date(2024, 3, 15)));
    }

    #[test]
    fn date_two_digit_year_pivots() {
        assert_eq!(extract_facts("filed 24/03/15").announced_on, Some(date(2024, 3, 15)));
        assert_eq!(extract_facts("filed 99-01-02").announced_on, Some(date(1999, 1, 2)));
    }

    #[test]
    fn date_slash_and_dot_separators() {
        assert_eq!(extract_facts("on 2024/3/5").announced_on, Some(date(2024, 3, 5)));
        assert_eq!(extract_facts("on 2024.12.01").announced_on, Some(date(2024, 12, 1)));
    }

    #[test]
    fn investors_led_by_stops_at_comma() {
        let facts = extract_facts("led by Alpha Fund, with offices in Berlin and Paris");
        assert_eq!(facts.investors, vec!["Alpha Fund"]);
    }

    #[test]
    fn investors_participation_allows_commas() {
        let facts =
            extract_facts("with participation from Alpha Fund, Beta Partners and Gamma Capital.");
        assert_eq!(facts.investors, vec!["Alpha Fund", "Beta Partners", "Gamma Capital"]);
    }

    #[test]
    fn investors_deduped_and_sorted() {
        let facts = extract_facts(
            "led by Zenith Partners and apex fund, with participation from Apex Fund and Midway VC.",
        );
        assert_eq!(facts.investors, vec!["apex fund", "Midway VC", "Zenith Partners"]);
    }

    #[test]
    fn investors_trailing_parenthetical_stripped() {
        let facts = extract_facts("led by Beta Capital (existing investor) and Alpha Fund");
        assert_eq!(facts.investors, vec!["Alpha Fund", "Beta Capital"]);
    }

    #[test]
    fn formatted_record_round_trips() {
        let facts = extract_facts(
            "Beacon raises $12,500,000 Series B led by Acme Ventures, announced 2023-11-02.",
        );
        assert_eq!(facts.round_type.as_deref(), Some("Series B"));
        assert_eq!(facts.amount_usd, Some(12_500_000));
        assert_eq!(facts.announced_on, Some(date(2023, 11, 2)));
        assert_eq!(facts.investors, vec!["Acme Ventures"]);
    }

    #[test]
    fn title_case_matches_round_labels() {
        assert_eq!(title_case("series a extension"), "Series A Extension");
        assert_eq!(title_case("SAFE"), "Safe");
        assert_eq!(title_case("pre-seed"), "Pre-Seed");
    }
}
