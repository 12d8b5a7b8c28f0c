//! Boundary with the grammar state machine that tracks legality.
//!
//! The environment adapter never inspects expressions itself. It forwards
//! decoded tokens to an [`ExprGrammar`] and asks it which token kinds are
//! currently legal.

use crate::token::{OpCategory, Token};

/// Indices of the per-kind flags in [`ValidActionTypes::select`].
///
/// The order is a fixed convention shared with the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectKind {
    /// Some operator category is legal. Not consulted for masking; the
    /// per-category flags in [`ValidActionTypes::op`] are used instead.
    Operator = 0,
    Feature = 1,
    Constant = 2,
    DeltaTime = 3,
    /// The expression may be terminated.
    Separator = 4,
}

impl SelectKind {
    pub const COUNT: usize = 5;

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Legality per operator category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpValidity([bool; 4]);

impl OpValidity {
    /// Build from explicit per-category flags.
    pub fn new(unary: bool, binary: bool, rolling: bool, pair_rolling: bool) -> Self {
        Self([unary, binary, rolling, pair_rolling])
    }

    /// Every category legal.
    pub fn all() -> Self {
        Self([true; 4])
    }

    #[inline]
    pub fn get(&self, category: OpCategory) -> bool {
        self.0[category.index()]
    }

    pub fn set(&mut self, category: OpCategory, valid: bool) {
        self.0[category.index()] = valid;
    }

    /// True if at least one category is legal.
    pub fn any(&self) -> bool {
        self.0.iter().any(|&v| v)
    }
}

/// Immutable snapshot of which token kinds the grammar accepts next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidActionTypes {
    /// Per operator category.
    pub op: OpValidity,
    /// Per kind, indexed by [`SelectKind`].
    pub select: [bool; SelectKind::COUNT],
}

impl ValidActionTypes {
    /// Nothing legal.
    pub fn none() -> Self {
        Self::default()
    }

    /// Everything legal.
    pub fn all() -> Self {
        Self {
            op: OpValidity::all(),
            select: [true; SelectKind::COUNT],
        }
    }

    #[inline]
    pub fn select(&self, kind: SelectKind) -> bool {
        self.select[kind.index()]
    }

    /// Builder-style flag setter for a select kind.
    pub fn with_select(mut self, kind: SelectKind, valid: bool) -> Self {
        self.select[kind.index()] = valid;
        self
    }

    /// Builder-style flag setter for an operator category.
    pub fn with_op(mut self, category: OpCategory, valid: bool) -> Self {
        self.op.set(category, valid);
        self
    }
}

/// Result of forwarding one token to the grammar.
#[derive(Debug, Clone, PartialEq)]
pub struct GrammarStep<I> {
    /// Raw task reward, before shaping.
    pub reward: f64,
    /// The episode is over; the token was not appended.
    pub done: bool,
    pub info: I,
}

/// Grammar state machine consumed by the environment adapter.
///
/// Implementations decide legality and reward. A conforming grammar
/// must report `done` no later than the step that would append token
/// number `max_expr_length`.
pub trait ExprGrammar {
    /// Auxiliary per-step information passed through to the agent.
    type Info;

    /// Start a new, empty expression.
    fn reset(&mut self);

    /// Consume one token.
    fn step(&mut self, token: Token) -> GrammarStep<Self::Info>;

    /// Report which token kinds are legal next.
    fn valid_action_types(&self) -> ValidActionTypes;
}

/// Opaque evaluator scoring a finished expression.
pub trait ExprScorer {
    /// Score the expression given as tokens in reverse Polish order.
    fn score(&mut self, tokens: &[Token]) -> f64;
}

impl<F> ExprScorer for F
where
    F: FnMut(&[Token]) -> f64,
{
    fn score(&mut self, tokens: &[Token]) -> f64 {
        self(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_indices() {
        assert_eq!(SelectKind::Operator.index(), 0);
        assert_eq!(SelectKind::Feature.index(), 1);
        assert_eq!(SelectKind::Constant.index(), 2);
        assert_eq!(SelectKind::DeltaTime.index(), 3);
        assert_eq!(SelectKind::Separator.index(), 4);
    }

    #[test]
    fn test_op_validity() {
        let mut op = OpValidity::default();
        assert!(!op.any());
        op.set(OpCategory::Rolling, true);
        assert!(op.any());
        assert!(op.get(OpCategory::Rolling));
        assert!(!op.get(OpCategory::Unary));
    }

    #[test]
    fn test_builder_setters() {
        let valid = ValidActionTypes::none()
            .with_select(SelectKind::Feature, true)
            .with_op(OpCategory::Binary, true);
        assert!(valid.select(SelectKind::Feature));
        assert!(!valid.select(SelectKind::Constant));
        assert!(valid.op.get(OpCategory::Binary));
        assert!(!valid.op.get(OpCategory::PairRolling));
    }

    #[test]
    fn test_closure_scorer() {
        let mut calls = 0;
        let mut scorer = |tokens: &[Token]| {
            calls += 1;
            tokens.len() as f64
        };
        assert_eq!(scorer.score(&[Token::SequenceTerminator]), 1.0);
        drop(scorer);
        assert_eq!(calls, 1);
    }
}
