//! Unit table
//!
//! Each supported unit symbol maps to a fixed Korean phrase. Decimal
//! values are split at the dot and read as "N 점 M ⟨unit⟩".

use once_cell::sync::Lazy;
use std::collections::HashMap;

pub static UNIT_TABLE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        // Length / area
        ("km", "킬로미터"),
        ("km2", "제곱킬로미터"),
        ("km²", "제곱킬로미터"),
        ("m", "미터"),
        ("m2", "제곱미터"),
        ("m²", "제곱미터"),
        ("㎡", "제곱미터"),
        ("평", "평"),
        ("cm", "센티미터"),
        ("mm", "밀리미터"),
        ("nm", "나노미터"),
        // Mass
        ("kg", "킬로그램"),
        ("g", "그램"),
        ("mg", "밀리그램"),
        ("t", "톤"),
        // Volume
        ("L", "리터"),
        ("l", "리터"),
        ("ml", "밀리리터"),
        ("cc", "시시"),
        // Speed
        ("km/h", "시속 킬로미터"),
        ("km·h⁻¹", "시속 킬로미터"),
        ("m/s", "초속 미터"),
        ("m·s⁻¹", "초속 미터"),
        ("mph", "마일퍼아워"),
        // Data
        ("GB", "기가바이트"),
        ("MB", "메가바이트"),
        ("KB", "킬로바이트"),
        ("TB", "테라바이트"),
        ("PB", "페타바이트"),
        ("Gbps", "기가비피에스"),
        ("Mbps", "메가비피에스"),
        // Time
        ("ms", "밀리초"),
        ("sec", "초"),
        ("min", "분"),
        ("hr", "시간"),
        // Electrical
        ("V", "볼트"),
        ("W", "와트"),
        ("kW", "킬로와트"),
        ("MW", "메가와트"),
        ("A", "암페어"),
        ("Hz", "헤르츠"),
        ("kHz", "킬로헤르츠"),
        ("MHz", "메가헤르츠"),
        ("GHz", "기가헤르츠"),
        // Temperature
        ("°C", "섭씨"),
        ("°F", "화씨"),
        // Misc
        ("%", "퍼센트"),
        ("px", "픽셀"),
        ("dpi", "디피아이"),
        ("fps", "프레임퍼초"),
    ])
});

/// Units ordered longest-symbol-first, so the unit regex prefers e.g. `km/h`
/// over `km` when both could match at a position.
pub fn unit_symbols_by_length_desc() -> Vec<&'static str> {
    let mut symbols: Vec<&'static str> = UNIT_TABLE.keys().copied().collect();
    symbols.sort_by_key(|s| std::cmp::Reverse(s.chars().count()));
    symbols
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_contains_common_units() {
        for unit in ["km", "㎡", "kg", "L", "GB", "ms", "Hz", "°C", "%", "fps"] {
            assert!(UNIT_TABLE.contains_key(unit), "missing unit {unit}");
        }
    }

    #[test]
    fn longer_symbols_sort_first() {
        let symbols = unit_symbols_by_length_desc();
        let km_h_pos = symbols.iter().position(|s| *s == "km/h").unwrap();
        let km_pos = symbols.iter().position(|s| *s == "km").unwrap();
        assert!(km_h_pos < km_pos);
    }
}
