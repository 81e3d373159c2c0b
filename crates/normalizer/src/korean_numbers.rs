//! Sino-Korean number spelling
//!
//! Numbers split into 4-digit chunks assigned magnitudes 만/억/조; within
//! a chunk, positions 천/백/십 use digit+place, omitting the digit when
//! it is "일" for 십/백/천. Zero is "영".

const DIGITS: [&str; 10] = ["영", "일", "이", "삼", "사", "오", "육", "칠", "팔", "구"];
const CHUNK_PLACES: [&str; 3] = ["천", "백", "십"];
const MAGNITUDES: [&str; 3] = ["조", "억", "만"];

/// Spell out a non-negative integer in sino-Korean.
pub fn to_korean_number(value: u64) -> String {
    if value == 0 {
        return DIGITS[0].to_string();
    }

    // Split into 4-digit chunks, most significant first, aligned to 조/억/만/(unit).
    let mut chunks = Vec::new();
    let mut remaining = value;
    while remaining > 0 {
        chunks.push((remaining % 10_000) as u32);
        remaining /= 10_000;
    }
    chunks.reverse();

    let chunk_count = chunks.len();
    let mut out = String::new();
    for (i, &chunk) in chunks.iter().enumerate() {
        if chunk == 0 {
            continue;
        }
        out.push_str(&spell_chunk(chunk));
        // Magnitude suffix: the last chunk (units, index chunk_count-1) has none.
        let distance_from_end = chunk_count - 1 - i;
        if distance_from_end >= 1 && distance_from_end <= MAGNITUDES.len() {
            out.push_str(MAGNITUDES[MAGNITUDES.len() - distance_from_end]);
        }
    }
    out
}

/// Spell a single 0..9999 chunk without any magnitude suffix.
fn spell_chunk(chunk: u32) -> String {
    debug_assert!(chunk < 10_000);
    let digits = [
        (chunk / 1000) % 10,
        (chunk / 100) % 10,
        (chunk / 10) % 10,
        chunk % 10,
    ];

    let mut out = String::new();
    for (place_index, &digit) in digits[..3].iter().enumerate() {
        if digit == 0 {
            continue;
        }
        // Omit the leading "일" before 천/백/십 (but "일십" wouldn't appear
        // at chunk granularity anyway since these are the place digits).
        if digit != 1 {
            out.push_str(DIGITS[digit as usize]);
        }
        out.push_str(CHUNK_PLACES[place_index]);
    }
    let units = digits[3];
    if units != 0 {
        out.push_str(DIGITS[units as usize]);
    }
    out
}

/// Read a decimal fraction's digits one at a time, e.g. "14" -> "일사".
pub fn digit_by_digit(digits: &str) -> String {
    digits
        .chars()
        .filter_map(|c| c.to_digit(10))
        .map(|d| DIGITS[d as usize])
        .collect()
}

/// Spell a possibly-decimal numeric string as "<integer part> 점 <digit-by-digit fraction>".
/// If there is no fractional part, just the integer spelling is returned.
pub fn spell_decimal(raw: &str) -> String {
    match raw.split_once('.') {
        Some((int_part, frac_part)) => {
            let int_val: u64 = int_part.parse().unwrap_or(0);
            format!("{} 점 {}", to_korean_number(int_val), digit_by_digit(frac_part))
        }
        None => {
            let int_val: u64 = raw.parse().unwrap_or(0);
            to_korean_number(int_val)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_영() {
        assert_eq!(to_korean_number(0), "영");
    }

    #[test]
    fn omits_leading_il_before_place_words() {
        assert_eq!(to_korean_number(10), "십");
        assert_eq!(to_korean_number(100), "백");
        assert_eq!(to_korean_number(1000), "천");
        assert_eq!(to_korean_number(11), "십일");
    }

    #[test]
    fn spells_large_numbers_with_magnitude_suffixes() {
        // 24,000,000 = 2400만
        assert_eq!(to_korean_number(24_000_000), "이천사백만");
    }

    #[test]
    fn digit_by_digit_reads_each_digit_separately() {
        assert_eq!(digit_by_digit("14"), "일사");
    }

    #[test]
    fn spell_decimal_handles_fraction() {
        assert_eq!(spell_decimal("3.14"), "삼 점 일사");
    }

    #[test]
    fn spell_decimal_handles_integer_only() {
        assert_eq!(spell_decimal("37"), "삼십칠");
    }
}
