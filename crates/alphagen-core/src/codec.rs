//! Bijection between discrete action ids and vocabulary tokens.
//!
//! Internally the numbering reserves a null slot at index 0, followed by
//! contiguous blocks for operators, features, delta times, constants and
//! the terminator. Agents address only the non-null part, so the
//! external action id is the internal index minus
//! [`INTERNAL_BASE_OFFSET`].

use std::ops::Range;
use std::sync::Arc;

use crate::error::CodecError;
use crate::token::{Token, TokenKind};
use crate::vocab::Vocabulary;

/// External action id, in `[0, size_action)`.
pub type ActionId = u32;

/// Reserved slots at the low end of the internal numbering.
pub const NULL_SLOTS: usize = 1;

/// `external id = internal index - INTERNAL_BASE_OFFSET`.
pub const INTERNAL_BASE_OFFSET: usize = NULL_SLOTS;

/// Block offsets of the internal numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionLayout {
    pub offset_op: usize,
    pub offset_feature: usize,
    pub offset_delta_time: usize,
    pub offset_constant: usize,
    pub offset_sep: usize,
    /// Internal size, null slot included.
    pub size_all: usize,
}

impl ActionLayout {
    /// Lay out the blocks of `vocab` back to back.
    pub fn new(vocab: &Vocabulary) -> Self {
        let offset_op = NULL_SLOTS;
        let offset_feature = offset_op + vocab.operators().len();
        let offset_delta_time = offset_feature + vocab.features().len();
        let offset_constant = offset_delta_time + vocab.delta_times().len();
        let offset_sep = offset_constant + vocab.constants().len();

        Self {
            offset_op,
            offset_feature,
            offset_delta_time,
            offset_constant,
            offset_sep,
            size_all: offset_sep + 1,
        }
    }

    /// Number of externally addressable actions.
    pub fn size_action(&self) -> usize {
        self.size_all - NULL_SLOTS
    }

    /// Internal index range of a token kind.
    pub fn internal_range(&self, kind: TokenKind) -> Range<usize> {
        match kind {
            TokenKind::Operator => self.offset_op..self.offset_feature,
            TokenKind::Feature => self.offset_feature..self.offset_delta_time,
            TokenKind::DeltaTime => self.offset_delta_time..self.offset_constant,
            TokenKind::Constant => self.offset_constant..self.offset_sep,
            TokenKind::SequenceTerminator => self.offset_sep..self.size_all,
        }
    }

    /// External action-id range of a token kind.
    pub fn external_range(&self, kind: TokenKind) -> Range<usize> {
        let internal = self.internal_range(kind);
        internal.start - INTERNAL_BASE_OFFSET..internal.end - INTERNAL_BASE_OFFSET
    }
}

/// Stateless action-id codec over a shared vocabulary.
///
/// Cloning is cheap; the vocabulary tables are shared read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionCodec {
    vocab: Arc<Vocabulary>,
    layout: ActionLayout,
}

impl ActionCodec {
    /// Create a codec numbering `vocab`.
    pub fn new(vocab: Arc<Vocabulary>) -> Self {
        let layout = ActionLayout::new(&vocab);
        Self { vocab, layout }
    }

    /// Codec over [`Vocabulary::alphagen`].
    pub fn alphagen() -> Self {
        Self::new(Arc::new(Vocabulary::alphagen()))
    }

    pub fn vocabulary(&self) -> &Arc<Vocabulary> {
        &self.vocab
    }

    pub fn layout(&self) -> &ActionLayout {
        &self.layout
    }

    /// Size of the discrete action space.
    pub fn size_action(&self) -> usize {
        self.layout.size_action()
    }

    /// Internal size, null slot included.
    pub fn size_all(&self) -> usize {
        self.layout.size_all
    }

    /// External action ids occupied by `kind`.
    pub fn kind_range(&self, kind: TokenKind) -> Range<usize> {
        self.layout.external_range(kind)
    }

    /// Map an action id to its token.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::OutOfRange`] if `action` is negative or not
    /// below [`size_action`](Self::size_action).
    pub fn decode(&self, action: i64) -> Result<Token, CodecError> {
        let out_of_range = || CodecError::OutOfRange {
            action,
            size: self.size_action(),
        };

        let index = usize::try_from(action)
            .ok()
            .and_then(|a| a.checked_add(INTERNAL_BASE_OFFSET))
            .ok_or_else(out_of_range)?;

        let l = &self.layout;
        if index < l.offset_op {
            Err(out_of_range())
        } else if index < l.offset_feature {
            Ok(Token::Operator(self.vocab.operators()[index - l.offset_op]))
        } else if index < l.offset_delta_time {
            Ok(Token::Feature(self.vocab.features()[index - l.offset_feature]))
        } else if index < l.offset_constant {
            Ok(Token::DeltaTime(
                self.vocab.delta_times()[index - l.offset_delta_time],
            ))
        } else if index < l.offset_sep {
            Ok(Token::Constant(
                self.vocab.constants()[index - l.offset_constant],
            ))
        } else if index == l.offset_sep {
            Ok(Token::SequenceTerminator)
        } else {
            Err(out_of_range())
        }
    }

    /// Map a token back to its action id.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnknownToken`] if the token is not in the
    /// vocabulary.
    pub fn encode(&self, token: &Token) -> Result<ActionId, CodecError> {
        let l = &self.layout;
        let index = match *token {
            Token::Operator(op) => self
                .vocab
                .operators()
                .iter()
                .position(|&o| o == op)
                .map(|p| l.offset_op + p),
            Token::Feature(feature) => self
                .vocab
                .features()
                .iter()
                .position(|&f| f == feature)
                .map(|p| l.offset_feature + p),
            Token::DeltaTime(dt) => self
                .vocab
                .delta_times()
                .iter()
                .position(|&d| d == dt)
                .map(|p| l.offset_delta_time + p),
            Token::Constant(c) => self
                .vocab
                .constants()
                .iter()
                .position(|&k| k == c)
                .map(|p| l.offset_constant + p),
            Token::SequenceTerminator => Some(l.offset_sep),
        };

        index
            .map(|i| (i - INTERNAL_BASE_OFFSET) as ActionId)
            .ok_or_else(|| CodecError::UnknownToken(token.to_string()))
    }
}
