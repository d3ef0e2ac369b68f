//! Utility functions for visualization: series colors, locale mapping, tick formatting.

use num_format::{Locale, ToFormattedString};

use super::Rgb8;

/// Microsoft Office (2013+) chart series palette.
/// Order: Blue, Orange, Gray, Gold, Light Blue, Green, Dark Blue, Dark Orange, Dark Gray, Brownish Gold.
const OFFICE10: [Rgb8; 10] = [
    Rgb8::new(68, 114, 196),  // blue      (#4472C4)
    Rgb8::new(237, 125, 49),  // orange    (#ED7D31)
    Rgb8::new(165, 165, 165), // gray      (#A5A5A5)
    Rgb8::new(255, 192, 0),   // gold      (#FFC000)
    Rgb8::new(91, 155, 213),  // light blue(#5B9BD5)
    Rgb8::new(112, 173, 71),  // green     (#70AD47)
    Rgb8::new(38, 68, 120),   // dark blue (#264478)
    Rgb8::new(158, 72, 14),   // dark org. (#9E480E)
    Rgb8::new(99, 99, 99),    // dark gray (#636363)
    Rgb8::new(153, 115, 0),   // brownish  (#997300)
];

/// Color of the `idx`-th series.
#[inline]
pub fn series_color(idx: usize) -> Rgb8 {
    OFFICE10[idx % OFFICE10.len()]
}

/// Map a user-provided locale tag to a `num_format::Locale`.
///
/// Supported tags (case-insensitive): `en`, `us`, `en_US`, `de`, `de_DE`, `german`,
/// `fr`, `es`, `it`, `pt`, `nl`. Defaults to English.
pub fn map_locale(tag: &str) -> &'static Locale {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => &Locale::de,
        "fr" | "fr_fr" => &Locale::fr,
        "es" | "es_es" => &Locale::es,
        "it" | "it_it" => &Locale::it,
        "pt" | "pt_pt" | "pt_br" => &Locale::pt,
        "nl" | "nl_nl" => &Locale::nl,
        _ => &Locale::en,
    }
}

/// Tick label: thousands separators for large magnitudes, a couple of
/// decimals for small ones.
pub fn format_tick(v: f64, locale: &Locale) -> String {
    let a = v.abs();
    if a >= 1000.0 {
        return (v.round() as i64).to_formatted_string(locale);
    }
    let prec = if a >= 100.0 || v.fract() == 0.0 {
        0
    } else if a >= 10.0 {
        1
    } else {
        2
    };
    let s = format!("{:.*}", prec, v);
    if prec > 0 {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_format_by_magnitude() {
        let en_locale = map_locale("en");
        assert_eq!(format_tick(2000.0, en_locale), "2,000");
        assert_eq!(format_tick(12.5, en_locale), "12.5");
        assert_eq!(format_tick(0.25, en_locale), "0.25");
        assert_eq!(format_tick(10.0, en_locale), "10");
        assert_eq!(format_tick(1_234_567.0, map_locale("de")), "1.234.567");
    }
}
