//! Boolean action mask over the discrete action space.

use std::ops::Range;

use alphagen_core::ActionId;

/// A mask specifying which action ids are legal.
///
/// Always as long as the action space, regardless of how many ids are
/// currently allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionMask {
    allowed: Vec<bool>,
}

impl ActionMask {
    /// Create a mask that allows no actions.
    pub fn allow_none(size: usize) -> Self {
        Self {
            allowed: vec![false; size],
        }
    }

    /// Create a mask that allows all actions.
    pub fn allow_all(size: usize) -> Self {
        Self {
            allowed: vec![true; size],
        }
    }

    /// Mark one action id as allowed.
    ///
    /// # Panics
    ///
    /// Panics if `id` is outside the action space.
    pub fn allow(&mut self, id: usize) {
        self.allowed[id] = true;
    }

    /// Mark a contiguous block of action ids as allowed.
    ///
    /// # Panics
    ///
    /// Panics if `range` reaches outside the action space.
    pub fn allow_range(&mut self, range: Range<usize>) {
        self.allowed[range].fill(true);
    }

    /// Check if an action id is allowed. Out-of-range ids never are.
    pub fn is_allowed(&self, id: usize) -> bool {
        self.allowed.get(id).copied().unwrap_or(false)
    }

    /// The allowed action ids, ascending.
    pub fn allowed_ids(&self) -> Vec<ActionId> {
        self.allowed
            .iter()
            .enumerate()
            .filter(|(_, &allowed)| allowed)
            .map(|(id, _)| id as ActionId)
            .collect()
    }

    /// Get the number of allowed actions.
    pub fn allowed_count(&self) -> usize {
        self.allowed.iter().filter(|&&allowed| allowed).count()
    }

    /// Size of the action space.
    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    /// Check if the action space is empty.
    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }

    /// Check if no action is allowed.
    pub fn none_allowed(&self) -> bool {
        !self.allowed.contains(&true)
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.allowed
    }

    pub fn into_vec(self) -> Vec<bool> {
        self.allowed
    }

    /// Apply the mask to a logit vector.
    ///
    /// Sets all disallowed logits to negative infinity.
    ///
    /// # Panics
    ///
    /// Panics if `logits.len()` differs from the action space size.
    pub fn apply_to_logits(&self, logits: &mut [f32]) {
        assert_eq!(
            logits.len(),
            self.allowed.len(),
            "logits length {} != action space size {}",
            logits.len(),
            self.allowed.len()
        );

        for (logit, &allowed) in logits.iter_mut().zip(&self.allowed) {
            if !allowed {
                *logit = f32::NEG_INFINITY;
            }
        }
    }

    /// Apply the mask and return a new logit vector.
    pub fn apply_to_logits_cloned(&self, logits: &[f32]) -> Vec<f32> {
        let mut result = logits.to_vec();
        self.apply_to_logits(&mut result);
        result
    }
}

impl From<Vec<bool>> for ActionMask {
    fn from(allowed: Vec<bool>) -> Self {
        Self { allowed }
    }
}
