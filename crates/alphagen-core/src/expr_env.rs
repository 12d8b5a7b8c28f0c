//! Reference grammar: builds one expression per episode and scores it.

use tracing::{debug, warn};

use crate::builder::ExprBuilder;
use crate::grammar::{ExprGrammar, ExprScorer, GrammarStep, ValidActionTypes};
use crate::token::Token;

/// Reward for an expression that cannot be evaluated.
pub const INVALID_EXPR_REWARD: f64 = -1.0;

/// Auxiliary information reported with every step.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CoreInfo {
    /// Tokens accepted so far.
    pub expr_len: usize,
    /// The episode ended on a token the builder rejected.
    pub invalid: bool,
    /// Rendered expression, set on the terminal step if it is complete.
    pub expression: Option<String>,
}

/// Grammar state machine backed by [`ExprBuilder`].
///
/// The token list counts an implicit begin marker, so at most
/// `max_expr_length - 1` tokens are accepted before the episode is
/// forced to end.
#[derive(Debug)]
pub struct ExprEnvCore<S> {
    builder: ExprBuilder,
    tokens: Vec<Token>,
    max_expr_length: usize,
    scorer: S,
}

impl<S: ExprScorer> ExprEnvCore<S> {
    /// Create a grammar scoring finished expressions with `scorer`.
    pub fn new(scorer: S, max_expr_length: usize) -> Self {
        Self {
            builder: ExprBuilder::new(),
            tokens: Vec::with_capacity(max_expr_length),
            max_expr_length,
            scorer,
        }
    }

    /// Tokens accepted in the current episode.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn builder(&self) -> &ExprBuilder {
        &self.builder
    }

    pub fn max_expr_length(&self) -> usize {
        self.max_expr_length
    }

    fn info(&self, invalid: bool) -> CoreInfo {
        CoreInfo {
            expr_len: self.tokens.len(),
            invalid,
            expression: None,
        }
    }

    /// End the episode, scoring the expression if it is complete.
    fn finish(&mut self) -> GrammarStep<CoreInfo> {
        let mut info = self.info(false);
        let reward = match self.builder.expression() {
            Ok(expr) => {
                info.expression = Some(expr.to_string());
                self.scorer.score(&self.tokens)
            }
            Err(_) => INVALID_EXPR_REWARD,
        };
        debug!(
            len = self.tokens.len(),
            reward,
            expression = info.expression.as_deref().unwrap_or("<incomplete>"),
            "expression finished"
        );
        GrammarStep {
            reward,
            done: true,
            info,
        }
    }
}

impl<S: ExprScorer> ExprGrammar for ExprEnvCore<S> {
    type Info = CoreInfo;

    fn reset(&mut self) {
        self.builder = ExprBuilder::new();
        self.tokens.clear();
    }

    fn step(&mut self, token: Token) -> GrammarStep<CoreInfo> {
        if token.is_terminator() || self.tokens.len() + 1 >= self.max_expr_length {
            return self.finish();
        }

        match self.builder.push(token) {
            Ok(()) => {
                self.tokens.push(token);
                GrammarStep {
                    reward: 0.0,
                    done: false,
                    info: self.info(false),
                }
            }
            Err(err) => {
                warn!(%err, len = self.tokens.len(), "token rejected, ending episode");
                GrammarStep {
                    reward: INVALID_EXPR_REWARD,
                    done: true,
                    info: self.info(true),
                }
            }
        }
    }

    fn valid_action_types(&self) -> ValidActionTypes {
        self.builder.valid_action_types()
    }
}
