//! Fixed vocabulary tables for one experiment.

use serde::{Deserialize, Serialize};

use crate::error::VocabError;
use crate::token::{FeatureType, Operator};

/// The ordered token tables a codec numbers.
///
/// Construction validates that every table is free of duplicates so the
/// action encoding stays a bijection. A vocabulary is immutable once
/// built; share it between codecs and environments behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "VocabularyTables", into = "VocabularyTables")]
pub struct Vocabulary {
    operators: Vec<Operator>,
    features: Vec<FeatureType>,
    delta_times: Vec<u32>,
    constants: Vec<f64>,
}

/// Unvalidated wire form of a [`Vocabulary`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct VocabularyTables {
    operators: Vec<Operator>,
    features: Vec<FeatureType>,
    delta_times: Vec<u32>,
    constants: Vec<f64>,
}

impl Vocabulary {
    /// Create a vocabulary from explicit tables.
    ///
    /// # Errors
    ///
    /// Returns an error if a table contains a duplicate, a constant is
    /// not finite, or a delta time is zero.
    pub fn new(
        operators: Vec<Operator>,
        features: Vec<FeatureType>,
        delta_times: Vec<u32>,
        constants: Vec<f64>,
    ) -> Result<Self, VocabError> {
        for (i, op) in operators.iter().enumerate() {
            if operators[..i].contains(op) {
                return Err(VocabError::DuplicateOperator(*op));
            }
        }
        for (i, feature) in features.iter().enumerate() {
            if features[..i].contains(feature) {
                return Err(VocabError::DuplicateFeature(*feature));
            }
        }
        for (i, &dt) in delta_times.iter().enumerate() {
            if dt == 0 {
                return Err(VocabError::ZeroDeltaTime);
            }
            if delta_times[..i].contains(&dt) {
                return Err(VocabError::DuplicateDeltaTime(dt));
            }
        }
        for (i, &c) in constants.iter().enumerate() {
            if !c.is_finite() {
                return Err(VocabError::NonFiniteConstant(c));
            }
            if constants[..i].contains(&c) {
                return Err(VocabError::DuplicateConstant(c));
            }
        }

        Ok(Self {
            operators,
            features,
            delta_times,
            constants,
        })
    }

    /// Tables used by the reference alpha-mining experiments.
    ///
    /// Layout (internal indices, null slot at 0):
    /// - 1..=23: operators `Abs` .. `Corr`
    /// - 24..=29: features `$open` .. `$vwap`
    /// - 30..=34: delta times 10d .. 50d
    /// - 35..=48: constants -30 .. 30
    /// - 49: SEP
    pub fn alphagen() -> Self {
        use Operator::*;

        Self {
            operators: vec![
                Abs, Log, CSRank, Add, Sub, Mul, Div, Greater, Less, Ref, Mean, Sum, Std, Var,
                Max, Min, Med, Mad, Delta, WMA, EMA, Cov, Corr,
            ],
            features: FeatureType::ALL.to_vec(),
            delta_times: vec![10, 20, 30, 40, 50],
            constants: vec![
                -30.0, -10.0, -5.0, -2.0, -1.0, -0.5, -0.01, 0.01, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0,
            ],
        }
    }

    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    pub fn features(&self) -> &[FeatureType] {
        &self.features
    }

    pub fn delta_times(&self) -> &[u32] {
        &self.delta_times
    }

    pub fn constants(&self) -> &[f64] {
        &self.constants
    }

    /// Number of tokens, terminator included.
    pub fn len(&self) -> usize {
        self.operators.len()
            + self.features.len()
            + self.delta_times.len()
            + self.constants.len()
            + 1
    }

    /// A vocabulary always holds at least the terminator.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::alphagen()
    }
}

impl TryFrom<VocabularyTables> for Vocabulary {
    type Error = VocabError;

    fn try_from(tables: VocabularyTables) -> Result<Self, Self::Error> {
        Vocabulary::new(
            tables.operators,
            tables.features,
            tables.delta_times,
            tables.constants,
        )
    }
}

impl From<Vocabulary> for VocabularyTables {
    fn from(vocab: Vocabulary) -> Self {
        Self {
            operators: vocab.operators,
            features: vocab.features,
            delta_times: vocab.delta_times,
            constants: vocab.constants,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphagen_sizes() {
        let vocab = Vocabulary::alphagen();
        assert_eq!(vocab.operators().len(), 23);
        assert_eq!(vocab.features().len(), 6);
        assert_eq!(vocab.delta_times().len(), 5);
        assert_eq!(vocab.constants().len(), 14);
        assert_eq!(vocab.len(), 23 + 6 + 5 + 14 + 1);
    }

    #[test]
    fn test_alphagen_tables_are_valid() {
        let vocab = Vocabulary::alphagen();
        let rebuilt = Vocabulary::new(
            vocab.operators().to_vec(),
            vocab.features().to_vec(),
            vocab.delta_times().to_vec(),
            vocab.constants().to_vec(),
        );
        assert_eq!(rebuilt, Ok(vocab));
    }

    #[test]
    fn test_duplicate_operator_rejected() {
        let result = Vocabulary::new(
            vec![Operator::Abs, Operator::Add, Operator::Abs],
            vec![],
            vec![],
            vec![],
        );
        assert_eq!(result, Err(VocabError::DuplicateOperator(Operator::Abs)));
    }

    #[test]
    fn test_duplicate_constant_rejected() {
        let result = Vocabulary::new(vec![], vec![], vec![], vec![1.0, 2.0, 1.0]);
        assert_eq!(result, Err(VocabError::DuplicateConstant(1.0)));
    }

    #[test]
    fn test_non_finite_constant_rejected() {
        let result = Vocabulary::new(vec![], vec![], vec![], vec![f64::INFINITY]);
        assert_eq!(result, Err(VocabError::NonFiniteConstant(f64::INFINITY)));
    }

    #[test]
    fn test_zero_delta_time_rejected() {
        let result = Vocabulary::new(vec![], vec![], vec![10, 0], vec![]);
        assert_eq!(result, Err(VocabError::ZeroDeltaTime));
    }

    #[test]
    fn test_terminator_only() {
        let vocab = Vocabulary::new(vec![], vec![], vec![], vec![]).unwrap();
        assert_eq!(vocab.len(), 1);
    }

    #[test]
    fn test_json_round_trip() {
        let vocab = Vocabulary::new(
            vec![Operator::Abs, Operator::Mean],
            vec![FeatureType::Close],
            vec![5],
            vec![-1.0, 1.0],
        )
        .unwrap();
        let json = serde_json::to_string(&vocab).unwrap();
        let back: Vocabulary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vocab);
    }

    #[test]
    fn test_json_validates() {
        let json = r#"{
            "operators": ["Add"],
            "features": ["close", "close"],
            "delta_times": [],
            "constants": []
        }"#;
        assert!(serde_json::from_str::<Vocabulary>(json).is_err());
    }
}
