//! Reverse Polish expression builder.
//!
//! The builder consumes tokens one by one, keeps the operand stack and
//! rejects any token that would make the expression ill-formed. It
//! provides `valid_action_types()` for action masking.

use crate::error::BuildError;
use crate::grammar::{OpValidity, SelectKind, ValidActionTypes};
use crate::token::{OpCategory, Operator, Token};

/// One entry of the operand stack.
#[derive(Debug, Clone, PartialEq)]
enum StackItem {
    /// A sub-expression. `featured` is false for constant-only trees.
    Expr { repr: String, featured: bool },
    /// A pending time window for the next rolling operator.
    DeltaTime(u32),
}

impl StackItem {
    fn is_featured(&self) -> bool {
        matches!(self, StackItem::Expr { featured: true, .. })
    }

    fn is_expr(&self) -> bool {
        matches!(self, StackItem::Expr { .. })
    }

    fn is_delta_time(&self) -> bool {
        matches!(self, StackItem::DeltaTime(_))
    }
}

/// Stack machine enforcing the expression grammar.
///
/// - Operators pop their operands and push the combined expression
/// - Rolling operators need a delta time on top of the stack
/// - Constant-only sub-expressions are never combined with each other
#[derive(Debug, Clone, Default)]
pub struct ExprBuilder {
    stack: Vec<StackItem>,
}

impl ExprBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items on the operand stack.
    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }

    /// Check if the stack holds exactly one featured expression.
    pub fn is_valid(&self) -> bool {
        self.stack.len() == 1 && self.stack[0].is_featured()
    }

    /// Render the finished expression, e.g. `Mean($close,20d)`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Incomplete`] unless [`is_valid`](Self::is_valid).
    pub fn expression(&self) -> Result<&str, BuildError> {
        match self.stack.as_slice() {
            [StackItem::Expr {
                repr,
                featured: true,
            }] => Ok(repr.as_str()),
            _ => Err(BuildError::Incomplete(self.stack.len())),
        }
    }

    /// Feed a single token to the builder.
    ///
    /// A rejected token leaves the stack untouched.
    pub fn push(&mut self, token: Token) -> Result<(), BuildError> {
        let accepted = match token {
            Token::Operator(op) => self.validate_op(op.category()),
            Token::Feature(_) => self.validate_feature(),
            Token::DeltaTime(_) => self.validate_dt(),
            Token::Constant(_) => self.validate_const(),
            Token::SequenceTerminator => false,
        };
        if !accepted {
            return Err(BuildError::UnexpectedToken(token.to_string()));
        }

        match token {
            Token::Operator(op) => self.apply_op(op),
            Token::Feature(feature) => self.stack.push(StackItem::Expr {
                repr: feature.to_string(),
                featured: true,
            }),
            Token::DeltaTime(dt) => self.stack.push(StackItem::DeltaTime(dt)),
            Token::Constant(c) => self.stack.push(StackItem::Expr {
                repr: c.to_string(),
                featured: false,
            }),
            Token::SequenceTerminator => {}
        }
        Ok(())
    }

    /// Pop the operator's operands and push the combined expression.
    /// Callers validate the stack first.
    fn apply_op(&mut self, op: Operator) {
        let split = self.stack.len() - op.arity();
        let operands = self.stack.split_off(split);

        let mut featured = false;
        let mut parts = Vec::with_capacity(operands.len());
        for item in operands {
            match item {
                StackItem::Expr { repr, featured: f } => {
                    featured |= f;
                    parts.push(repr);
                }
                StackItem::DeltaTime(dt) => parts.push(format!("{dt}d")),
            }
        }

        self.stack.push(StackItem::Expr {
            repr: format!("{op}({})", parts.join(",")),
            featured,
        });
    }

    /// `n`-th item from the top, 1-based.
    fn top(&self, n: usize) -> Option<&StackItem> {
        self.stack.len().checked_sub(n).map(|i| &self.stack[i])
    }

    /// Check whether an operator of `category` may be pushed next.
    pub fn validate_op(&self, category: OpCategory) -> bool {
        match category {
            OpCategory::Unary => self.top(1).is_some_and(StackItem::is_featured),
            OpCategory::Binary => match (self.top(2), self.top(1)) {
                (Some(lhs), Some(rhs)) => {
                    lhs.is_expr() && rhs.is_expr() && (lhs.is_featured() || rhs.is_featured())
                }
                _ => false,
            },
            OpCategory::Rolling => {
                self.top(1).is_some_and(StackItem::is_delta_time)
                    && self.top(2).is_some_and(StackItem::is_featured)
            }
            OpCategory::PairRolling => {
                self.top(1).is_some_and(StackItem::is_delta_time)
                    && self.top(2).is_some_and(StackItem::is_featured)
                    && self.top(3).is_some_and(StackItem::is_featured)
            }
        }
    }

    /// A delta time must follow a featured expression.
    pub fn validate_dt(&self) -> bool {
        self.top(1).is_some_and(StackItem::is_featured)
    }

    /// A constant may start the expression or follow a featured one.
    pub fn validate_const(&self) -> bool {
        match self.top(1) {
            None => true,
            Some(item) => item.is_featured(),
        }
    }

    /// A feature may follow anything but a pending delta time.
    pub fn validate_feature(&self) -> bool {
        !self.top(1).is_some_and(StackItem::is_delta_time)
    }

    /// Snapshot of the token kinds legal next.
    pub fn valid_action_types(&self) -> ValidActionTypes {
        let op = OpValidity::new(
            self.validate_op(OpCategory::Unary),
            self.validate_op(OpCategory::Binary),
            self.validate_op(OpCategory::Rolling),
            self.validate_op(OpCategory::PairRolling),
        );

        ValidActionTypes {
            op,
            select: [false; SelectKind::COUNT],
        }
        .with_select(SelectKind::Operator, op.any())
        .with_select(SelectKind::Feature, self.validate_feature())
        .with_select(SelectKind::Constant, self.validate_const())
        .with_select(SelectKind::DeltaTime, self.validate_dt())
        .with_select(SelectKind::Separator, self.is_valid())
    }
}
