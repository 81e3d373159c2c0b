//! The priority-ordered normalization rule table
//!
//! Rules are sorted descending by priority; each rule scans the current
//! text with its regex and every match is replaced by the rule's handler.
//! Rule 100 (lexicon lookup) is handled separately by [`crate::normalizer`]
//! before this table runs, since it needs access to the caller-supplied
//! [`crate::lexicon::Lexicon`] rather than being a pure function of the
//! match.

use crate::korean_numbers::{digit_by_digit, spell_decimal, to_korean_number};
use crate::units::UNIT_TABLE;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

pub struct NormalizationRule {
    pub id: &'static str,
    pub priority: i32,
    pub category: &'static str,
    pub pattern: Regex,
    pub handler: fn(&Captures) -> String,
}

fn rule(id: &'static str, priority: i32, category: &'static str, pattern: &str, handler: fn(&Captures) -> String) -> NormalizationRule {
    NormalizationRule {
        id,
        priority,
        category,
        pattern: Regex::new(pattern).unwrap_or_else(|e| panic!("bad pattern for rule {id}: {e}")),
        handler,
    }
}

// --- Handlers -------------------------------------------------------------

fn handle_date_ymd(caps: &Captures) -> String {
    let y: u64 = caps[1].parse().unwrap_or(0);
    let m: u64 = caps[2].parse().unwrap_or(0);
    let d: u64 = caps[3].parse().unwrap_or(0);
    format!(
        "{}년 {}월 {}일",
        to_korean_number(y),
        to_korean_number(m),
        to_korean_number(d)
    )
}

fn handle_date_korean(caps: &Captures) -> String {
    let m: u64 = caps[1].parse().unwrap_or(0);
    let d: u64 = caps[2].parse().unwrap_or(0);
    format!("{}월 {}일", to_korean_number(m), to_korean_number(d))
}

fn handle_time(caps: &Captures) -> String {
    let h: u64 = caps[1].parse().unwrap_or(0);
    let min: u64 = caps[2].parse().unwrap_or(0);
    let sec = caps.get(3).and_then(|m| m.as_str().parse::<u64>().ok());
    let mut out = format!("{}시 {}분", to_korean_number(h), to_korean_number(min));
    if let Some(sec) = sec {
        out.push_str(&format!(" {}초", to_korean_number(sec)));
    }
    out
}

fn handle_currency_won_large(caps: &Captures) -> String {
    let digits: String = caps[1].chars().filter(|c| *c != ',').collect();
    let value: u64 = digits.parse().unwrap_or(0);
    let suffix = &caps[2];
    let magnitude = match suffix {
        "만" => 10_000u64,
        "억" => 100_000_000u64,
        "조" => 1_000_000_000_000u64,
        _ => 1,
    };
    format!("{} 원", to_korean_number(value * magnitude))
}

fn handle_currency_won_plain(caps: &Captures) -> String {
    let digits: String = caps[1].chars().filter(|c| *c != ',').collect();
    let value: u64 = digits.parse().unwrap_or(0);
    format!("{} 원", to_korean_number(value))
}

fn handle_currency_dollar(caps: &Captures) -> String {
    let raw = caps[1].replace(',', "");
    let suffix = caps.get(2).map(|m| m.as_str());
    let spelled = spell_decimal(&raw);
    match suffix {
        Some("K") | Some("k") => format!("{} 천 달러", spelled),
        Some("M") | Some("m") => format!("{} 백만 달러", spelled),
        Some("B") | Some("b") => format!("{} 십억 달러", spelled),
        _ => format!("{} 달러", spelled),
    }
}

fn handle_percentage(caps: &Captures) -> String {
    let raw = &caps[1];
    format!("{} 퍼센트", spell_decimal(raw))
}

fn handle_unit(caps: &Captures) -> String {
    let raw = &caps[1];
    let unit = &caps[2];
    let reading = UNIT_TABLE.get(unit).copied().unwrap_or(unit);
    format!("{} {}", spell_decimal(raw), reading)
}

const COUNTERS: &[&str] = &["개", "명", "번", "년", "월", "일", "시간", "분", "초", "원", "가지", "단계", "차례", "배"];

fn handle_range(caps: &Captures) -> String {
    let a: u64 = caps[1].parse().unwrap_or(0);
    let b: u64 = caps[2].parse().unwrap_or(0);
    let counter = &caps[3];
    format!("{} 에서 {} {}", to_korean_number(a), to_korean_number(b), counter)
}

fn handle_comma_number(caps: &Captures) -> String {
    let digits: String = caps[0].chars().filter(|c| *c != ',').collect();
    let value: u64 = digits.parse().unwrap_or(0);
    to_korean_number(value)
}

fn handle_magnitude_number(caps: &Captures) -> String {
    let value: u64 = caps[1].parse().unwrap_or(0);
    let suffix = &caps[2];
    let magnitude = match suffix {
        "만" => 10_000u64,
        "억" => 100_000_000u64,
        "조" => 1_000_000_000_000u64,
        _ => 1,
    };
    to_korean_number(value * magnitude)
}

fn handle_bare_large_number(caps: &Captures) -> String {
    let value: u64 = caps[0].parse().unwrap_or(0);
    to_korean_number(value)
}

fn handle_ordinal(caps: &Captures) -> String {
    let n: u64 = caps[1].parse().unwrap_or(0);
    format!("제{}", to_korean_number(n))
}

fn handle_version(caps: &Captures) -> String {
    let parts: Vec<String> = caps[1]
        .split('.')
        .map(|p| p.parse::<u64>().map(to_korean_number).unwrap_or_else(|_| p.to_string()))
        .collect();
    format!("버전 {}", parts.join(" 점 "))
}

fn handle_slash_or(caps: &Captures) -> String {
    format!("{} 또는 {}", &caps[1], &caps[2])
}

fn handle_bracket_removal(_caps: &Captures) -> String {
    String::new()
}

fn handle_ellipsis(_caps: &Captures) -> String {
    ", ".to_string()
}

fn handle_acronym(caps: &Captures) -> String {
    const LETTER_READINGS: [(char, &str); 26] = [
        ('A', "에이"), ('B', "비"), ('C', "씨"), ('D', "디"), ('E', "이"), ('F', "에프"),
        ('G', "지"), ('H', "에이치"), ('I', "아이"), ('J', "제이"), ('K', "케이"), ('L', "엘"),
        ('M', "엠"), ('N', "엔"), ('O', "오"), ('P', "피"), ('Q', "큐"), ('R', "알"),
        ('S', "에스"), ('T', "티"), ('U', "유"), ('V', "브이"), ('W', "더블유"), ('X', "엑스"),
        ('Y', "와이"), ('Z', "지"),
    ];
    caps[0]
        .chars()
        .map(|c| LETTER_READINGS.iter().find(|(l, _)| *l == c).map(|(_, r)| *r).unwrap_or(""))
        .collect::<Vec<_>>()
        .join("")
}

fn handle_camelcase_split(caps: &Captures) -> String {
    caps[0]
        .chars()
        .enumerate()
        .fold(String::new(), |mut acc, (i, c)| {
            if i > 0 && c.is_uppercase() {
                acc.push(' ');
            }
            acc.push(c);
            acc
        })
}

fn handle_space_collapse(_caps: &Captures) -> String {
    " ".to_string()
}

fn handle_particle_glue(caps: &Captures) -> String {
    format!("{}{}", &caps[1], &caps[2])
}

// --- Table construction ----------------------------------------------------

pub static RULES: Lazy<Vec<NormalizationRule>> = Lazy::new(|| {
    let counters_alt = COUNTERS.join("|");

    let mut rules = vec![
        rule("date_ymd", 98, "date", r"(\d{4})[-/](\d{1,2})[-/](\d{1,2})", handle_date_ymd),
        rule("date_korean", 95, "date", r"(\d{1,2})월\s*(\d{1,2})일", handle_date_korean),
        rule("time_hms", 96, "time", r"(\d{1,2}):(\d{2})(?::(\d{2}))?", handle_time),
        rule(
            "currency_won_large",
            93,
            "currency",
            r"([0-9][0-9,]*)(만|억|조)\s?원",
            handle_currency_won_large,
        ),
        rule("currency_won_plain", 92, "currency", r"([0-9][0-9,]*)\s?원", handle_currency_won_plain),
        rule(
            "currency_dollar",
            91,
            "currency",
            r"\$\s?([0-9][0-9,]*(?:\.[0-9]+)?)\s?([KkMmBb])?",
            handle_currency_dollar,
        ),
        rule("percentage_decimal", 88, "percentage", r"([0-9]+\.[0-9]+)\s?%", handle_percentage),
        rule("percentage_integer", 87, "percentage", r"([0-9]+)\s?%", handle_percentage),
    ];

    // Units: one rule per table entry, priority band 80-84, longest symbols first
    // so e.g. "km/h" is preferred over "km" at the same position.
    for symbol in crate::units::unit_symbols_by_length_desc() {
        let escaped = regex::escape(symbol);
        let pattern = format!(r"([0-9]+(?:\.[0-9]+)?)\s?{escaped}\b");
        if let Ok(pattern) = Regex::new(&pattern) {
            rules.push(NormalizationRule {
                id: "unit",
                priority: 82,
                category: "unit",
                pattern,
                handler: handle_unit,
            });
        }
    }

    rules.extend([
        rule(
            "range_tilde",
            78,
            "range",
            &format!(r"([0-9]+)\s?[~-]\s?([0-9]+)\s?({counters_alt})"),
            handle_range,
        ),
        rule("magnitude_number", 68, "number", r"([0-9]+)(만|억|조)(?!\s?원)", handle_magnitude_number),
        rule("comma_number", 64, "number", r"[0-9]{1,3}(?:,[0-9]{3})+", handle_comma_number),
        rule("bare_large_number", 60, "number", r"\d{5,}", handle_bare_large_number),
        rule("ordinal", 55, "ordinal", r"제(\d+)", handle_ordinal),
        rule("version", 54, "version", r"\bv(\d+(?:\.\d+)+)\b", handle_version),
        rule("slash_or", 45, "punctuation", r"(\S+)\s?/\s?(\S+)", handle_slash_or),
        rule("bracket_removal", 42, "punctuation", r"[\(\)\[\]（）【】]", handle_bracket_removal),
        rule("ellipsis", 40, "punctuation", r"\.\.\.|…", handle_ellipsis),
        rule("acronym", 37, "acronym", r"\b[A-Z]{2,5}\b", handle_acronym),
        rule("camelcase_split", 36, "acronym", r"\b[A-Z][a-z]+(?:[A-Z][a-z]+)+\b", handle_camelcase_split),
        rule("space_collapse", 31, "whitespace", r" {2,}", handle_space_collapse),
        rule("particle_glue", 30, "grammar", r"(\d)\s+(은|는|이|가|을|를|과|와|의|도|만)\b", handle_particle_glue),
    ]);

    rules.sort_by(|a, b| b.priority.cmp(&a.priority));
    rules
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_are_sorted_descending_by_priority() {
        for pair in RULES.windows(2) {
            assert!(pair[0].priority >= pair[1].priority);
        }
    }

    #[test]
    fn date_ymd_handler_spells_out_components() {
        let re = Regex::new(r"(\d{4})[-/](\d{1,2})[-/](\d{1,2})").unwrap();
        let caps = re.captures("2024-01-15").unwrap();
        assert_eq!(handle_date_ymd(&caps), "이천이십사년 일월 십오일");
    }

    #[test]
    fn currency_won_large_handler_spells_magnitude() {
        let re = Regex::new(r"([0-9][0-9,]*)(만|억|조)\s?원").unwrap();
        let caps = re.captures("2,400만원").unwrap();
        assert_eq!(handle_currency_won_large(&caps), "이천사백만 원");
    }

    #[test]
    fn percentage_decimal_handler_spells_fraction() {
        let re = Regex::new(r"([0-9]+\.[0-9]+)\s?%").unwrap();
        let caps = re.captures("3.14%").unwrap();
        assert_eq!(handle_percentage(&caps), "삼 점 일사 퍼센트");
    }

    #[test]
    fn acronym_handler_reads_each_letter() {
        let re = Regex::new(r"\b[A-Z]{2,5}\b").unwrap();
        let caps = re.captures("API").unwrap();
        assert_eq!(handle_acronym(&caps), "에이피아이");
    }
}
