//! Mask generation from a grammar validity report.

use alphagen_core::{ActionCodec, ExprGrammar, SelectKind, TokenKind, ValidActionTypes};

use crate::mask::ActionMask;

/// Kinds masked as whole blocks, keyed by their select flag.
const BLOCK_KINDS: [(SelectKind, TokenKind); 4] = [
    (SelectKind::Feature, TokenKind::Feature),
    (SelectKind::Constant, TokenKind::Constant),
    (SelectKind::DeltaTime, TokenKind::DeltaTime),
    (SelectKind::Separator, TokenKind::SequenceTerminator),
];

/// Build the action mask for a validity snapshot.
///
/// An operator is allowed iff its category is reported valid; every
/// other kind is allowed or denied as a whole block. The any-operator
/// flag `select[Operator]` is not consulted.
pub fn action_mask(codec: &ActionCodec, valid: &ValidActionTypes) -> ActionMask {
    let mut mask = ActionMask::allow_none(codec.size_action());

    let op_base = codec.kind_range(TokenKind::Operator).start;
    for (i, op) in codec.vocabulary().operators().iter().enumerate() {
        if valid.op.get(op.category()) {
            mask.allow(op_base + i);
        }
    }

    for (select, kind) in BLOCK_KINDS {
        if valid.select(select) {
            mask.allow_range(codec.kind_range(kind));
        }
    }

    mask
}

/// Generates action masks for one codec.
#[derive(Debug, Clone)]
pub struct MaskGenerator {
    codec: ActionCodec,
}

impl MaskGenerator {
    /// Create a new mask generator.
    pub fn new(codec: ActionCodec) -> Self {
        Self { codec }
    }

    /// Get the codec.
    pub fn codec(&self) -> &ActionCodec {
        &self.codec
    }

    /// Generate a mask from a validity snapshot.
    pub fn generate(&self, valid: &ValidActionTypes) -> ActionMask {
        action_mask(&self.codec, valid)
    }

    /// Generate a mask from the grammar's current state.
    pub fn generate_from_grammar<G: ExprGrammar>(&self, grammar: &G) -> ActionMask {
        self.generate(&grammar.valid_action_types())
    }
}
