//! Token vocabulary for alpha-factor expressions.
//!
//! This module defines the typed units an expression is built from.
//! An agent never emits these directly; it emits action ids which the
//! [`ActionCodec`](crate::codec::ActionCodec) maps onto tokens.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Operator category, used for masking by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OpCategory {
    /// Elementwise, one operand: `Abs(x)`.
    Unary,
    /// Elementwise, two operands: `Add(x, y)`.
    Binary,
    /// Time-windowed over one operand: `Mean(x, 20d)`.
    Rolling,
    /// Time-windowed over two operands: `Corr(x, y, 20d)`.
    PairRolling,
}

impl OpCategory {
    /// All categories, in mask order.
    pub const ALL: [OpCategory; 4] = [
        OpCategory::Unary,
        OpCategory::Binary,
        OpCategory::Rolling,
        OpCategory::PairRolling,
    ];

    /// Position of this category in [`OpCategory::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        match self {
            OpCategory::Unary => 0,
            OpCategory::Binary => 1,
            OpCategory::Rolling => 2,
            OpCategory::PairRolling => 3,
        }
    }
}

/// Operators understood by the downstream evaluator.
///
/// A [`Vocabulary`](crate::vocab::Vocabulary) picks an ordered subset of
/// these; the order decides their action ids.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    // === Unary ===
    Abs,
    Log,
    /// Cross-sectional rank.
    CSRank,

    // === Binary ===
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Greater,
    Less,

    // === Rolling ===
    Ref,
    Mean,
    Sum,
    Std,
    Var,
    Skew,
    Kurt,
    Max,
    Min,
    Med,
    Mad,
    Rank,
    Delta,
    WMA,
    EMA,

    // === Pair rolling ===
    Cov,
    Corr,
}

impl Operator {
    /// Every operator, in declaration order.
    pub const ALL: [Operator; 27] = [
        Operator::Abs,
        Operator::Log,
        Operator::CSRank,
        Operator::Add,
        Operator::Sub,
        Operator::Mul,
        Operator::Div,
        Operator::Pow,
        Operator::Greater,
        Operator::Less,
        Operator::Ref,
        Operator::Mean,
        Operator::Sum,
        Operator::Std,
        Operator::Var,
        Operator::Skew,
        Operator::Kurt,
        Operator::Max,
        Operator::Min,
        Operator::Med,
        Operator::Mad,
        Operator::Rank,
        Operator::Delta,
        Operator::WMA,
        Operator::EMA,
        Operator::Cov,
        Operator::Corr,
    ];

    /// The category this operator is masked under.
    pub fn category(self) -> OpCategory {
        use Operator::*;
        match self {
            Abs | Log | CSRank => OpCategory::Unary,
            Add | Sub | Mul | Div | Pow | Greater | Less => OpCategory::Binary,
            Ref | Mean | Sum | Std | Var | Skew | Kurt | Max | Min | Med | Mad | Rank | Delta
            | WMA | EMA => OpCategory::Rolling,
            Cov | Corr => OpCategory::PairRolling,
        }
    }

    /// Number of stack items this operator consumes, delta time included.
    pub fn arity(self) -> usize {
        match self.category() {
            OpCategory::Unary => 1,
            OpCategory::Binary | OpCategory::Rolling => 2,
            OpCategory::PairRolling => 3,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Named time-series inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureType {
    Open,
    Close,
    High,
    Low,
    Volume,
    Vwap,
}

impl FeatureType {
    /// Every feature, in declaration order.
    pub const ALL: [FeatureType; 6] = [
        FeatureType::Open,
        FeatureType::Close,
        FeatureType::High,
        FeatureType::Low,
        FeatureType::Volume,
        FeatureType::Vwap,
    ];

    /// Lower-case name as used by the evaluator (`$close`).
    pub fn name(self) -> &'static str {
        match self {
            FeatureType::Open => "open",
            FeatureType::Close => "close",
            FeatureType::High => "high",
            FeatureType::Low => "low",
            FeatureType::Volume => "volume",
            FeatureType::Vwap => "vwap",
        }
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.name())
    }
}

/// The five mutually exclusive token kinds, in action-id block order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Operator,
    Feature,
    DeltaTime,
    Constant,
    SequenceTerminator,
}

impl TokenKind {
    /// Every kind, in action-id block order.
    pub const ALL: [TokenKind; 5] = [
        TokenKind::Operator,
        TokenKind::Feature,
        TokenKind::DeltaTime,
        TokenKind::Constant,
        TokenKind::SequenceTerminator,
    ];
}

/// A typed unit of an alpha expression.
///
/// Tokens arrive in reverse Polish order: operands first, then the
/// operator that consumes them, then [`Token::SequenceTerminator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Operator(Operator),
    Feature(FeatureType),
    /// Time-lag magnitude in trading days.
    DeltaTime(u32),
    /// Scalar literal.
    Constant(f64),
    /// Marks the expression as complete ("SEP").
    SequenceTerminator,
}

impl Token {
    /// The kind this token belongs to.
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Operator(_) => TokenKind::Operator,
            Token::Feature(_) => TokenKind::Feature,
            Token::DeltaTime(_) => TokenKind::DeltaTime,
            Token::Constant(_) => TokenKind::Constant,
            Token::SequenceTerminator => TokenKind::SequenceTerminator,
        }
    }

    /// Convert to an operator if this is an operator token.
    pub fn as_operator(&self) -> Option<Operator> {
        match self {
            Token::Operator(op) => Some(*op),
            _ => None,
        }
    }

    /// Check if this is the sequence terminator.
    pub fn is_terminator(&self) -> bool {
        matches!(self, Token::SequenceTerminator)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Operator(op) => write!(f, "{op}"),
            Token::Feature(feature) => write!(f, "{feature}"),
            Token::DeltaTime(dt) => write!(f, "{dt}d"),
            Token::Constant(c) => write!(f, "{c}"),
            Token::SequenceTerminator => f.write_str("SEP"),
        }
    }
}
