//! alphagen-core: token vocabulary and action codec for alpha-factor
//! expression search.
//!
//! # Overview
//!
//! An RL agent builds a formula over market features one token at a
//! time. This crate provides the pieces that do not depend on the
//! environment loop:
//!
//! - **Typed tokens**: operators, features, delta times, constants, SEP
//! - **Vocabulary tables**: the ordered, duplicate-free token lists of one experiment
//! - **Action codec**: gap-free bijection between action ids and tokens
//! - **Grammar boundary**: the [`ExprGrammar`] trait the environment drives
//! - **Reference grammar**: an RPN [`ExprBuilder`] and [`ExprEnvCore`]
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use alphagen_core::{ActionCodec, FeatureType, Operator, Token, Vocabulary};
//!
//! let vocab = Vocabulary::new(
//!     vec![Operator::Abs, Operator::Add, Operator::Mean],
//!     vec![FeatureType::Close, FeatureType::Volume],
//!     vec![10, 20],
//!     vec![1.0],
//! )
//! .unwrap();
//! let codec = ActionCodec::new(Arc::new(vocab));
//!
//! // 3 + 2 + 2 + 1 + SEP
//! assert_eq!(codec.size_action(), 9);
//! assert_eq!(codec.decode(0).unwrap(), Token::Operator(Operator::Abs));
//! assert_eq!(codec.decode(8).unwrap(), Token::SequenceTerminator);
//! assert!(codec.decode(9).is_err());
//! ```
//!
//! # Masking
//!
//! [`ExprBuilder::valid_action_types`] reports which token kinds may come
//! next. The environment turns that report into an action mask, so the
//! agent can only ever emit well-formed expressions:
//!
//! ```
//! use alphagen_core::{ExprBuilder, FeatureType, OpCategory, SelectKind, Token};
//!
//! let mut builder = ExprBuilder::new();
//! builder.push(Token::Feature(FeatureType::Close)).unwrap();
//! builder.push(Token::DeltaTime(20)).unwrap();
//!
//! // A pending delta time can only be consumed by a rolling operator
//! let valid = builder.valid_action_types();
//! assert!(valid.op.get(OpCategory::Rolling));
//! assert!(!valid.op.get(OpCategory::Binary));
//! assert!(!valid.select(SelectKind::Feature));
//! assert!(!valid.select(SelectKind::Separator));
//! ```

pub mod builder;
pub mod codec;
pub mod error;
pub mod expr_env;
pub mod grammar;
pub mod token;
pub mod vocab;

pub use builder::ExprBuilder;
pub use codec::{ActionCodec, ActionId, ActionLayout, INTERNAL_BASE_OFFSET, NULL_SLOTS};
pub use error::{BuildError, CodecError, VocabError};
pub use expr_env::{CoreInfo, ExprEnvCore, INVALID_EXPR_REWARD};
pub use grammar::{ExprGrammar, ExprScorer, GrammarStep, OpValidity, SelectKind, ValidActionTypes};
pub use token::{FeatureType, OpCategory, Operator, Token, TokenKind};
pub use vocab::Vocabulary;
