//! Masked discrete-action environment for alpha-factor search.
//!
//! This crate turns the flat action ids of an RL agent into expression
//! tokens, drives an [`ExprGrammar`](alphagen_core::ExprGrammar), and
//! exposes the fixed-length observation and legal-action mask a
//! maskable policy consumes.
//!
//! # Example
//!
//! ```
//! use alphagen_core::{ExprEnvCore, Token};
//! use alphagen_env::{AlphaEnv, EnvConfig};
//!
//! let config = EnvConfig::default().with_max_expr_length(5);
//! let grammar = ExprEnvCore::new(|_: &[Token]| 0.1, config.max_expr_length);
//! let mut env = AlphaEnv::from_config(grammar, &config).unwrap();
//!
//! assert_eq!(env.reset(), vec![0; 5]);
//!
//! // $close (feature block starts at id 23), then SEP (id 48)
//! let mask = env.action_masks();
//! assert!(mask.is_allowed(24));
//! assert!(!mask.is_allowed(48));
//!
//! let step = env.step(24).unwrap();
//! assert_eq!(step.obs, vec![24, 0, 0, 0, 0]);
//! assert!(env.action_masks().is_allowed(48));
//!
//! let step = env.step(48).unwrap();
//! assert!(step.done);
//! assert_eq!(step.reward, 0.1);
//! ```

pub mod config;
pub mod env;
pub mod error;
pub mod generator;
pub mod mask;

pub use alphagen_core;

pub use config::{ConfigError, EnvConfig, DEFAULT_MAX_EXPR_LENGTH};
pub use env::{AlphaEnv, Phase, Step};
pub use error::EnvError;
pub use generator::{action_mask, MaskGenerator};
pub use mask::ActionMask;
