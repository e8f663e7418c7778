//! Daily signal: one quote per calendar day, picked by hashing the date.

use chrono::{Local, NaiveDate};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignalQuote {
    pub text: &'static str,
    pub author: &'static str,
}

pub const SIGNAL_QUOTES: &[SignalQuote] = &[
    SignalQuote {
        text: "The unexamined life is not worth living.",
        author: "Socrates",
    },
    SignalQuote {
        text: "He who has a why to live can bear almost any how.",
        author: "Nietzsche",
    },
    SignalQuote {
        text: "To understand the world, one must not be content with mere appearances.",
        author: "Spinoza",
    },
    SignalQuote {
        text: "Do not feel lonely, the entire universe is inside you.",
        author: "Rumi",
    },
    SignalQuote {
        text: "If you want to find the secrets of the universe, think in terms of energy, frequency and vibration.",
        author: "Nikola Tesla",
    },
    SignalQuote {
        text: "Waste no more time arguing about what a good man should be. Be one.",
        author: "Marcus Aurelius",
    },
    SignalQuote {
        text: "Knowing others is intelligence; knowing yourself is true wisdom.",
        author: "Laozi",
    },
];

/// Textual day key, e.g. `Fri Oct 16 2026`.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

/// Shift-five string hash. The shift operates on the running value truncated
/// to 32 bits while the subtraction and addition keep full width, so the
/// result only depends on the input text.
pub fn signal_hash(text: &str) -> i64 {
    text.encode_utf16().fold(0_i64, |hash, unit| {
        let shifted = (hash as i32).wrapping_shl(5) as i64;
        i64::from(unit) + (shifted - hash)
    })
}

pub fn signal_for_date(date: NaiveDate) -> &'static SignalQuote {
    let hash = signal_hash(&date_key(date));
    let index = (hash.unsigned_abs() % SIGNAL_QUOTES.len() as u64) as usize;
    &SIGNAL_QUOTES[index]
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn todays_signal() -> &'static SignalQuote {
    signal_for_date(today())
}

/// Short stamp shown next to the quote, e.g. `OCT 16, 2026`.
pub fn date_stamp(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string().to_uppercase()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::Duration;

    use super::*;

    fn day(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn date_key_pads_the_day() {
        assert_eq!(date_key(day(2026, 10, 16)), "Fri Oct 16 2026");
        assert_eq!(date_key(day(2024, 2, 3)), "Sat Feb 03 2024");
    }

    #[test]
    fn hash_matches_reference_values() {
        assert_eq!(signal_hash(""), 0);
        assert_eq!(signal_hash("a"), 97);
        // 98 + (97 << 5) - 97
        assert_eq!(signal_hash("ab"), 3105);
    }

    #[test]
    fn same_day_same_quote() {
        let date = day(2026, 10, 16);
        assert_eq!(signal_for_date(date), signal_for_date(date));
        assert_eq!(
            signal_for_date(date),
            signal_for_date(NaiveDate::parse_from_str("2026-10-16", "%Y-%m-%d").expect("date"))
        );
    }

    #[test]
    fn every_quote_is_reachable() {
        let start = day(2020, 1, 1);
        let reached = (0..(366 * 10))
            .map(|offset| signal_for_date(start + Duration::days(offset)).text)
            .collect::<HashSet<_>>();
        assert_eq!(reached.len(), SIGNAL_QUOTES.len());
    }

    #[test]
    fn date_stamp_is_upper_case() {
        assert_eq!(date_stamp(day(2026, 10, 6)), "OCT 6, 2026");
    }
}
