//! Sequence environment adapter.

use alphagen_core::{ActionCodec, ActionId, ExprGrammar, GrammarStep};
use tracing::{debug, trace, warn};

use crate::config::{ConfigError, EnvConfig};
use crate::error::EnvError;
use crate::generator::action_mask;
use crate::mask::ActionMask;

/// Episode lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, never reset.
    Fresh,
    /// Accepting steps.
    Active,
    /// The grammar ended the episode.
    Terminal,
}

/// Result of one environment step.
#[derive(Debug, Clone, PartialEq)]
pub struct Step<I> {
    /// The full fixed-length observation buffer.
    pub obs: Vec<ActionId>,
    /// Raw grammar reward plus the per-step constant.
    pub reward: f64,
    pub done: bool,
    pub info: I,
}

/// Discrete-action environment over an expression grammar.
///
/// This struct owns one episode at a time: the observation buffer of
/// past action ids, the step counter and the grammar state. Actions are
/// decoded by the codec, forwarded to the grammar, and recorded in the
/// buffer while the episode stays open.
///
/// # Example
///
/// ```ignore
/// let mut env = AlphaEnv::from_config(grammar, &EnvConfig::default())?;
/// let mut obs = env.reset();
///
/// loop {
///     let mask = env.action_masks();
///     let action = policy.sample(&obs, &mask);
///     let step = env.step(action)?;
///     obs = step.obs;
///     if step.done {
///         break;
///     }
/// }
/// ```
#[derive(Debug)]
pub struct AlphaEnv<G> {
    grammar: G,
    codec: ActionCodec,
    reward_per_step: f64,
    state: Vec<ActionId>,
    counter: usize,
    phase: Phase,
}

impl<G: ExprGrammar> AlphaEnv<G> {
    /// Create an environment with an observation buffer of
    /// `max_expr_length` entries.
    ///
    /// The codec may be a clone shared with other environments.
    pub fn new(grammar: G, codec: ActionCodec, max_expr_length: usize, reward_per_step: f64) -> Self {
        Self {
            grammar,
            codec,
            reward_per_step,
            state: vec![0; max_expr_length],
            counter: 0,
            phase: Phase::Fresh,
        }
    }

    /// Create an environment from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn from_config(grammar: G, config: &EnvConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(
            grammar,
            config.codec(),
            config.max_expr_length,
            config.reward_per_step,
        ))
    }

    /// Start a new episode and return the zeroed observation.
    ///
    /// Any previous episode is discarded.
    pub fn reset(&mut self) -> Vec<ActionId> {
        self.state.fill(0);
        self.counter = 0;
        self.grammar.reset();
        self.phase = Phase::Active;
        debug!(capacity = self.state.len(), "episode reset");
        self.state.clone()
    }

    /// Apply one action.
    ///
    /// On a non-terminal step the action id is appended to the
    /// observation buffer. A terminal step leaves the buffer unchanged.
    ///
    /// # Errors
    ///
    /// - [`EnvError::NotActive`] before the first reset or after the
    ///   episode ended
    /// - [`EnvError::Codec`] if the action id is out of range
    /// - [`EnvError::CapacityExceeded`] if the grammar keeps the episode
    ///   open with a full buffer; the episode is then over
    pub fn step(&mut self, action: i64) -> Result<Step<G::Info>, EnvError> {
        if self.phase != Phase::Active {
            return Err(EnvError::NotActive(self.phase));
        }

        let token = self.codec.decode(action)?;
        trace!(action, %token, counter = self.counter, "step");

        let GrammarStep { reward, done, info } = self.grammar.step(token);

        if done {
            self.phase = Phase::Terminal;
            debug!(len = self.counter, reward, "episode done");
        } else {
            if self.counter >= self.state.len() {
                warn!(
                    capacity = self.state.len(),
                    "grammar did not terminate before the buffer filled"
                );
                self.phase = Phase::Terminal;
                return Err(EnvError::CapacityExceeded(self.state.len()));
            }
            // decode() bounded the action to [0, size_action)
            self.state[self.counter] = action as ActionId;
            self.counter += 1;
        }

        Ok(Step {
            obs: self.state.clone(),
            reward: self.shape_reward(reward),
            done,
            info,
        })
    }

    /// Add the per-step constant to a raw grammar reward.
    #[inline]
    pub fn shape_reward(&self, reward: f64) -> f64 {
        reward + self.reward_per_step
    }

    /// Legal actions for the current grammar state.
    ///
    /// Does not touch episode state.
    pub fn action_masks(&self) -> ActionMask {
        action_mask(&self.codec, &self.grammar.valid_action_types())
    }

    /// The current observation buffer.
    pub fn observation(&self) -> &[ActionId] {
        &self.state
    }

    /// Number of meaningful entries in the observation buffer.
    pub fn counter(&self) -> usize {
        self.counter
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn codec(&self) -> &ActionCodec {
        &self.codec
    }

    pub fn grammar(&self) -> &G {
        &self.grammar
    }

    pub fn reward_per_step(&self) -> f64 {
        self.reward_per_step
    }

    /// Size of the discrete action space.
    pub fn action_space_size(&self) -> usize {
        self.codec.size_action()
    }

    /// Length of every observation.
    pub fn observation_len(&self) -> usize {
        self.state.len()
    }
}
