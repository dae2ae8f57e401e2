/// Rounds to two decimals, resolving exact halves to the even neighbour.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// `numerator / denominator` rounded to two decimals. `None` for a zero
/// denominator.
pub fn ratio(numerator: u32, denominator: u32) -> Option<f64> {
    if denominator == 0 {
        return None;
    }
    Some(round2(f64::from(numerator) / f64::from(denominator)))
}

/// Runs per 100 balls. `None` when no balls were faced.
pub fn batting_strike_rate(runs: u32, balls: u32) -> Option<f64> {
    if balls == 0 {
        return None;
    }
    Some(round2(f64::from(runs) / f64::from(balls) * 100.0))
}

/// Runs conceded per six-ball over. `None` when no legal balls were bowled.
pub fn economy(runs: u32, balls: u32) -> Option<f64> {
    if balls == 0 {
        return None;
    }
    Some(round2(f64::from(runs) / (f64::from(balls) / 6.0)))
}

/// Overs in cricket notation: completed overs, then remaining balls after the
/// point. 20 balls is 3.2, not 3.33.
pub fn overs(balls: u32) -> f64 {
    f64::from(balls / 6) + f64::from(balls % 6) / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(333.3333), 333.33);
        assert_eq!(round2(7.5), 7.5);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_ratio_guards_zero() {
        assert_eq!(ratio(10, 0), None);
        assert_eq!(ratio(10, 3), Some(3.33));
    }

    #[test]
    fn test_batting_strike_rate() {
        assert_eq!(batting_strike_rate(10, 3), Some(333.33));
        assert_eq!(batting_strike_rate(50, 50), Some(100.0));
        assert_eq!(batting_strike_rate(0, 0), None);
    }

    #[test]
    fn test_economy() {
        assert_eq!(economy(30, 36), Some(5.0));
        assert_eq!(economy(7, 4), Some(10.5));
        assert_eq!(economy(5, 0), None);
    }

    #[test]
    fn test_overs_notation() {
        assert_eq!(overs(0), 0.0);
        assert_eq!(overs(6), 1.0);
        assert_eq!(overs(20), 3.2);
        assert_eq!(overs(59), 9.5);
    }
}
