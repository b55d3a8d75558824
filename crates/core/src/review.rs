//! Review score rules.

/// Lowest accepted review score.
pub const MIN_SCORE: f64 = 1.0;

/// Highest accepted review score.
pub const MAX_SCORE: f64 = 5.0;

/// Message attached to a rejected score.
pub const SCORE_MESSAGE: &str = "A avaliação precisa ser um inteiro entre 1 e 5";

/// A score is accepted only when it is a whole number between 1 and 5.
pub fn is_valid_score(score: f64) -> bool {
    score.is_finite() && score.fract() == 0.0 && (MIN_SCORE..=MAX_SCORE).contains(&score)
}

/// Round a course's average score to the nearest half point.
///
/// Ties go to the even half (4.25 -> 4.0, 4.75 -> 5.0). A course without
/// reviews averages to `0.0`.
pub fn round_to_half(average: Option<f64>) -> f64 {
    match average {
        Some(avg) => (avg * 2.0).round_ties_even() / 2.0,
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_scores_in_range_are_valid() {
        for score in [1.0, 2.0, 3.0, 4.0, 5.0] {
            assert!(is_valid_score(score), "{score} should be accepted");
        }
    }

    #[test]
    fn fractional_scores_are_rejected() {
        assert!(!is_valid_score(4.5));
        assert!(!is_valid_score(1.1));
    }

    #[test]
    fn out_of_range_scores_are_rejected() {
        assert!(!is_valid_score(0.0));
        assert!(!is_valid_score(6.0));
        assert!(!is_valid_score(-3.0));
        assert!(!is_valid_score(f64::NAN));
    }

    #[test]
    fn no_reviews_average_to_zero() {
        assert_eq!(round_to_half(None), 0.0);
    }

    #[test]
    fn averages_round_to_nearest_half() {
        assert_eq!(round_to_half(Some(4.0)), 4.0);
        assert_eq!(round_to_half(Some(3.6)), 3.5);
        assert_eq!(round_to_half(Some(3.8)), 4.0);
        assert_eq!(round_to_half(Some(2.333)), 2.5);
    }

    #[test]
    fn ties_round_to_even_half() {
        assert_eq!(round_to_half(Some(4.25)), 4.0);
        assert_eq!(round_to_half(Some(4.75)), 5.0);
    }
}
