//! Cell value ordering shared by row sorting, group sorting and filter menus.

use std::cmp::Ordering;

/// Compares two cell values.
///
/// When both values trim to something that parses as a finite number they
/// compare numerically. Otherwise they compare naturally: case-insensitive,
/// with runs of ASCII digits ordered by their numeric value.
///
/// Numbers order before non-numbers. Numerically equal values such as `1`
/// and `1.0` compare equal, so a stable sort keeps them in input order.
pub fn compare_values(a: &str, b: &str) -> Ordering {
    match (parse_number(a), parse_number(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => natural_cmp(a, b),
    }
}

fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Natural, case-insensitive string ordering.
///
/// Strings that differ only in letter case, or in leading zeros of a digit
/// run, compare equal.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.char_indices().peekable();
    let mut right = b.char_indices().peekable();
    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some((i, x)), Some((j, y))) => {
                if x.is_ascii_digit() && y.is_ascii_digit() {
                    let left_run = digit_run(a, i);
                    let right_run = digit_run(b, j);
                    let ordering = compare_digit_runs(left_run, right_run);
                    if ordering != Ordering::Equal {
                        return ordering;
                    }
                    advance(&mut left, left_run.len());
                    advance(&mut right, right_run.len());
                    continue;
                }
                let ordering = match (x.is_ascii_digit(), y.is_ascii_digit()) {
                    (true, false) => Ordering::Less,
                    (false, true) => Ordering::Greater,
                    _ => fold(x).cmp(&fold(y)),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
                left.next();
                right.next();
            }
        }
    }
}

fn digit_run(s: &str, start: usize) -> &str {
    let rest = &s[start..];
    let end = rest
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(rest.len());
    &rest[..end]
}

fn advance<I: Iterator>(iter: &mut I, count: usize) {
    for _ in 0..count {
        iter.next();
    }
}

/// Orders two digit strings by value without overflowing.
fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn fold(ch: char) -> char {
    ch.to_lowercase().next().unwrap_or(ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(values: &[&str]) -> Vec<String> {
        let mut out: Vec<String> = values.iter().map(|v| (*v).to_string()).collect();
        out.sort_by(|a, b| compare_values(a, b));
        out
    }

    #[test]
    fn numbers_before_words() {
        assert_eq!(sorted(&["10", "2", "apple"]), vec!["2", "10", "apple"]);
    }

    #[test]
    fn numeric_values_compare_by_value() {
        assert_eq!(compare_values(" 2.5", "10"), Ordering::Less);
        assert_eq!(compare_values("-3", "1e1"), Ordering::Less);
        assert_eq!(compare_values("1", "1.0"), Ordering::Equal);
    }

    #[test]
    fn numeric_ties_keep_input_order() {
        assert_eq!(sorted(&["1.0", "01", "1"]), vec!["1.0", "01", "1"]);
        assert_eq!(sorted(&["1", "1.0"]), vec!["1", "1.0"]);
    }

    #[test]
    fn numbers_before_text_with_leading_digits() {
        assert_eq!(sorted(&["2a", "10", "1"]), vec!["1", "10", "2a"]);
    }

    #[test]
    fn embedded_digit_runs_are_natural() {
        assert_eq!(
            sorted(&["BL10", "bl2", "BL1", "BL002"]),
            vec!["BL1", "bl2", "BL002", "BL10"]
        );
    }

    #[test]
    fn case_insensitive_without_tiebreak() {
        assert_eq!(natural_cmp("apple", "Banana"), Ordering::Less);
        assert_eq!(natural_cmp("a", "A"), Ordering::Equal);
        assert_eq!(natural_cmp("BL01", "bl1"), Ordering::Equal);
        assert_eq!(sorted(&["Beta", "alpha", "beta", "BETA"]), vec!["alpha", "Beta", "beta", "BETA"]);
    }

    #[test]
    fn huge_digit_runs_do_not_overflow() {
        let big = "x99999999999999999999999999999";
        let bigger = "x100000000000000000000000000000";
        assert_eq!(natural_cmp(big, bigger), Ordering::Less);
    }
}
