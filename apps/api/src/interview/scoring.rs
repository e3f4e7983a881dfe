use std::fmt;

use serde::{Deserialize, Serialize};

/// Overall interview rating. Bands have inclusive lower bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    #[serde(rename = "Excellent")]
    Excellent,
    #[serde(rename = "Good")]
    Good,
    #[serde(rename = "Average")]
    Average,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
}

impl Rating {
    /// ≥85 Excellent, ≥70 Good, ≥50 Average, else Needs Improvement.
    pub fn from_score(score: f64) -> Self {
        if score >= 85.0 {
            Rating::Excellent
        } else if score >= 70.0 {
            Rating::Good
        } else if score >= 50.0 {
            Rating::Average
        } else {
            Rating::NeedsImprovement
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rating::Excellent => "Excellent",
            Rating::Good => "Good",
            Rating::Average => "Average",
            Rating::NeedsImprovement => "Needs Improvement",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Arithmetic mean of the scores. `None` when there are none.
pub fn aggregate_score<I: IntoIterator<Item = u32>>(scores: I) -> Option<f64> {
    let (sum, count) = scores
        .into_iter()
        .fold((0u64, 0u64), |(sum, count), s| (sum + u64::from(s), count + 1));
    if count == 0 {
        None
    } else {
        Some(sum as f64 / count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_of_four_scores_is_good() {
        let avg = aggregate_score([90, 85, 40, 65]).unwrap();
        assert!((avg - 70.0).abs() < f64::EPSILON);
        assert_eq!(Rating::from_score(avg), Rating::Good);
    }

    #[test]
    fn test_aggregate_empty_is_none() {
        assert_eq!(aggregate_score(Vec::<u32>::new()), None);
    }

    #[test]
    fn test_rating_bands_are_inclusive() {
        assert_eq!(Rating::from_score(85.0), Rating::Excellent);
        assert_eq!(Rating::from_score(84.99), Rating::Good);
        assert_eq!(Rating::from_score(70.0), Rating::Good);
        assert_eq!(Rating::from_score(50.0), Rating::Average);
        assert_eq!(Rating::from_score(49.9), Rating::NeedsImprovement);
        assert_eq!(Rating::from_score(0.0), Rating::NeedsImprovement);
    }

    #[test]
    fn test_rating_serializes_as_label() {
        assert_eq!(
            serde_json::to_string(&Rating::NeedsImprovement).unwrap(),
            "\"Needs Improvement\""
        );
    }
}
