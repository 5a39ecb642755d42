//! Floor range expressions.
//!
//! A range is a comma separated list of tokens, each either a single floor
//! (`7`), a closed interval (`3-5`) or an open-ended interval (`10-`).
//! Intervals are inclusive.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::{NovelError, Result};

static FLOOR_TEXT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)楼$").unwrap());

/// One inclusive interval; `end == None` means unbounded above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: u32,
    pub end: Option<u32>,
}

impl Interval {
    pub fn contains(&self, floor: u32) -> bool {
        floor >= self.start && self.end.is_none_or(|end| floor <= end)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) if end == self.start => write!(f, "{}", self.start),
            Some(end) => write!(f, "{}-{}", self.start, end),
            None => write!(f, "{}-", self.start),
        }
    }
}

/// An ordered set of inclusive floor intervals.
///
/// The default value has no intervals and matches every floor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FloorRange {
    intervals: Vec<Interval>,
}

impl FloorRange {
    /// A range that accepts every floor.
    pub fn all() -> Self {
        Self::default()
    }

    /// Parses a range expression such as `"1,3-5,10-"`.
    ///
    /// # Errors
    ///
    /// Returns [`NovelError::InvalidRangeSpec`] naming the first token that is
    /// empty, non-numeric, or has its lower bound above its upper bound.
    pub fn parse(spec: &str) -> Result<Self> {
        let mut intervals = Vec::new();

        for raw in spec.split(',') {
            let token = raw.trim();
            let invalid = || NovelError::InvalidRangeSpec { spec: spec.to_string(), token: token.to_string() };

            let interval = match token.split_once('-') {
                None => {
                    let floor = parse_bound(token).ok_or_else(invalid)?;
                    Interval { start: floor, end: Some(floor) }
                }
                Some((lo, hi)) => {
                    let start = parse_bound(lo.trim()).ok_or_else(invalid)?;
                    let hi = hi.trim();
                    let end = if hi.is_empty() { None } else { Some(parse_bound(hi).ok_or_else(invalid)?) };
                    if end.is_some_and(|end| end < start) {
                        return Err(invalid());
                    }
                    Interval { start, end }
                }
            };

            intervals.push(interval);
        }

        Ok(Self { intervals })
    }

    /// True when any interval contains `floor`, or when the range is unset.
    pub fn includes(&self, floor: u32) -> bool {
        self.intervals.is_empty() || self.intervals.iter().any(|interval| interval.contains(floor))
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn is_unbounded(&self) -> bool {
        self.intervals.is_empty()
    }
}

impl fmt::Display for FloorRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.intervals.is_empty() {
            return write!(f, "*");
        }
        let parts: Vec<String> = self.intervals.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join(","))
    }
}

impl std::str::FromStr for FloorRange {
    type Err = NovelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn parse_bound(text: &str) -> Option<u32> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Parses a post's displayed floor marker, e.g. `"7楼"`.
///
/// # Errors
///
/// Returns [`NovelError::FloorParseError`] when the trimmed text is not `<digits>楼`.
pub fn parse_floor(text: &str) -> Result<u32> {
    let text = text.trim();
    FLOOR_TEXT
        .captures(text)
        .and_then(|captures| captures[1].parse().ok())
        .ok_or_else(|| NovelError::FloorParseError(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_mixed_spec() {
        let range = FloorRange::parse("1,3-5,10-").unwrap();
        assert_eq!(
            range.intervals(),
            &[
                Interval { start: 1, end: Some(1) },
                Interval { start: 3, end: Some(5) },
                Interval { start: 10, end: None },
            ]
        );
    }

    #[rstest]
    #[case(1, true)]
    #[case(2, false)]
    #[case(3, true)]
    #[case(5, true)]
    #[case(6, false)]
    #[case(9, false)]
    #[case(10, true)]
    #[case(100_000, true)]
    fn test_includes(#[case] floor: u32, #[case] expected: bool) {
        let range = FloorRange::parse("1,3-5,10-").unwrap();
        assert_eq!(range.includes(floor), expected);
    }

    #[test]
    fn test_unset_range_matches_everything() {
        let range = FloorRange::all();
        assert!(range.is_unbounded());
        for floor in [0, 1, 7, u32::MAX] {
            assert!(range.includes(floor));
        }
    }

    #[test]
    fn test_whitespace_is_ignored() {
        let range = FloorRange::parse(" 2 , 4 - 6 ").unwrap();
        assert!(range.includes(2));
        assert!(range.includes(5));
        assert!(!range.includes(3));
    }

    #[rstest]
    #[case("", "")]
    #[case("1,,3", "")]
    #[case("a", "a")]
    #[case("1,x-3", "x-3")]
    #[case("5-2", "5-2")]
    #[case("-4", "-4")]
    #[case("3-4-5", "3-4-5")]
    fn test_invalid_specs(#[case] spec: &str, #[case] bad: &str) {
        match FloorRange::parse(spec) {
            Err(NovelError::InvalidRangeSpec { token, .. }) => assert_eq!(token, bad),
            other => panic!("expected InvalidRangeSpec, got {other:?}"),
        }
    }

    #[test]
    fn test_display_round_trips() {
        let range = FloorRange::parse("1,3-5,10-").unwrap();
        assert_eq!(range.to_string(), "1,3-5,10-");
        assert_eq!(range.to_string().parse::<FloorRange>().unwrap(), range);
    }

    #[test]
    fn test_floor_seven_excluded() {
        let range = FloorRange::parse("3-5,8-").unwrap();
        assert!(!range.includes(parse_floor("7楼").unwrap()));
    }

    #[rstest]
    #[case("7楼", 7)]
    #[case("  12楼\n", 12)]
    fn test_parse_floor(#[case] text: &str, #[case] expected: u32) {
        assert_eq!(parse_floor(text).unwrap(), expected);
    }

    #[rstest]
    #[case("楼主")]
    #[case("沙发")]
    #[case("#7")]
    fn test_parse_floor_rejects(#[case] text: &str) {
        assert!(matches!(parse_floor(text), Err(NovelError::FloorParseError(_))));
    }
}
