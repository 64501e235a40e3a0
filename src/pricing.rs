use std::sync::LazyLock;

use regex::Regex;

/// Slider default over the `$` ordinal scale when nothing parses.
pub const DEFAULT_BOUNDS: (i64, i64) = (0, 4);

static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$?(\d+)").expect("digit run pattern"));

/// Best-effort parse of a human-entered price into a comparable number.
///
/// "free" maps to 0, a run of `$` symbols to its length (ordinal 1-4
/// scale, not a currency amount), and otherwise the first digit run wins.
/// The heuristic is lossy; anything unrecognized is `None`, which callers
/// must treat as "unconstrained" rather than zero.
pub fn parse_price(text: Option<&str>) -> Option<i64> {
    let trimmed = text?.trim().to_lowercase();

    if trimmed.is_empty() {
        return None;
    }

    if trimmed == "free" {
        return Some(0);
    }

    if trimmed.chars().all(|c| c == '$') {
        return Some(trimmed.len() as i64);
    }

    let caps = DIGIT_RUN.captures(&trimmed)?;
    caps[1].parse().ok()
}

/// Inclusive bound check; unparseable prices are always in range so that
/// incompletely specified items are never hidden by filtering.
pub fn price_in_range(text: Option<&str>, min: i64, max: i64) -> bool {
    match parse_price(text) {
        Some(price) => price >= min && price <= max,
        None => true,
    }
}

/// Min/max over whatever parses; falls back to [`DEFAULT_BOUNDS`] when
/// nothing does, so range sliders get sane bounds with no data.
pub fn price_bounds<'a, I>(prices: I) -> (i64, i64)
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    prices
        .into_iter()
        .filter_map(parse_price)
        .fold(None, |acc: Option<(i64, i64)>, p| match acc {
            Some((min, max)) => Some((min.min(p), max.max(p))),
            None => Some((p, p)),
        })
        .unwrap_or(DEFAULT_BOUNDS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_free_as_zero() {
        assert_eq!(parse_price(Some("Free")), Some(0));
        assert_eq!(parse_price(Some("  FREE ")), Some(0));
    }

    #[test]
    fn dollar_runs_are_ordinal() {
        assert_eq!(parse_price(Some("$")), Some(1));
        assert_eq!(parse_price(Some("$$$")), Some(3));
        assert_eq!(parse_price(Some("$$$$")), Some(4));
    }

    #[test]
    fn first_digit_run_wins() {
        assert_eq!(parse_price(Some("$25")), Some(25));
        assert_eq!(parse_price(Some("$25 per person")), Some(25));
        assert_eq!(parse_price(Some("around 15 to 30 dollars")), Some(15));
        assert_eq!(parse_price(Some("100")), Some(100));
    }

    #[test]
    fn unparseable_is_none() {
        assert_eq!(parse_price(None), None);
        assert_eq!(parse_price(Some("")), None);
        assert_eq!(parse_price(Some("   ")), None);
        assert_eq!(parse_price(Some("ask staff")), None);
    }

    #[test]
    fn range_check_fails_open() {
        assert!(price_in_range(None, 5, 10));
        assert!(price_in_range(Some("no idea"), 5, 10));
    }

    #[test]
    fn range_check_is_inclusive() {
        assert!(price_in_range(Some("$5"), 5, 10));
        assert!(price_in_range(Some("$10"), 5, 10));
        assert!(!price_in_range(Some("$11"), 5, 10));
        assert!(!price_in_range(Some("$4"), 5, 10));
    }

    #[test]
    fn bounds_over_mixed_inputs() {
        let prices = [Some("$$$"), Some("Free"), None, Some("$25"), Some("???")];
        assert_eq!(price_bounds(prices), (0, 25));
    }

    #[test]
    fn bounds_default_when_nothing_parses() {
        assert_eq!(price_bounds([None, Some("call us")]), DEFAULT_BOUNDS);
        assert_eq!(price_bounds(std::iter::empty()), DEFAULT_BOUNDS);
    }
}
