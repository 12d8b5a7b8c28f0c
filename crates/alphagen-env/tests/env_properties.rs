//! Property-based tests for masking, buffering and reward shaping.

use std::sync::Arc;

use alphagen_core::{
    ActionCodec, ExprGrammar, FeatureType, GrammarStep, OpValidity, Operator, SelectKind, Token,
    ValidActionTypes, Vocabulary,
};
use alphagen_env::{action_mask, AlphaEnv};
use proptest::prelude::*;

/// Grammar with a fixed reward that ends the episode on SEP only.
struct FixedGrammar {
    reward: f64,
}

impl ExprGrammar for FixedGrammar {
    type Info = ();

    fn reset(&mut self) {}

    fn step(&mut self, token: Token) -> GrammarStep<()> {
        GrammarStep {
            reward: self.reward,
            done: token.is_terminator(),
            info: (),
        }
    }

    fn valid_action_types(&self) -> ValidActionTypes {
        ValidActionTypes::all()
    }
}

/// Ids: Abs=0 Add=1 Mean=2 | close=3 volume=4 | 10d=5 20d=6 | 1.0=7 | SEP=8
fn small_codec() -> ActionCodec {
    let vocab = Vocabulary::new(
        vec![Operator::Abs, Operator::Add, Operator::Mean],
        vec![FeatureType::Close, FeatureType::Volume],
        vec![10, 20],
        vec![1.0],
    )
    .unwrap();
    ActionCodec::new(Arc::new(vocab))
}

fn vocabulary_strategy() -> impl Strategy<Value = Vocabulary> {
    (
        prop::sample::subsequence(Operator::ALL.to_vec(), 0..=Operator::ALL.len()),
        prop::sample::subsequence(FeatureType::ALL.to_vec(), 0..=FeatureType::ALL.len()),
        prop::collection::btree_set(1u32..=60, 0..6),
        prop::collection::btree_set(-40i32..40, 0..10),
    )
        .prop_map(|(operators, features, delta_times, constants)| {
            Vocabulary::new(
                operators,
                features,
                delta_times.into_iter().collect(),
                constants.into_iter().map(f64::from).collect(),
            )
            .expect("generated tables are duplicate-free")
        })
}

fn validity_strategy() -> impl Strategy<Value = ValidActionTypes> {
    (any::<[bool; 4]>(), any::<[bool; 5]>()).prop_map(|(op, select)| ValidActionTypes {
        op: OpValidity::new(op[0], op[1], op[2], op[3]),
        select,
    })
}

proptest! {
    // Property: an id is allowed iff its token's kind (or category) is valid
    #[test]
    fn test_mask_consistency(vocab in vocabulary_strategy(), valid in validity_strategy()) {
        let codec = ActionCodec::new(Arc::new(vocab));
        let mask = action_mask(&codec, &valid);
        prop_assert_eq!(mask.len(), codec.size_action());

        for id in 0..codec.size_action() {
            let expected = match codec.decode(id as i64).unwrap() {
                Token::Operator(op) => valid.op.get(op.category()),
                Token::Feature(_) => valid.select(SelectKind::Feature),
                Token::DeltaTime(_) => valid.select(SelectKind::DeltaTime),
                Token::Constant(_) => valid.select(SelectKind::Constant),
                Token::SequenceTerminator => valid.select(SelectKind::Separator),
            };
            prop_assert_eq!(mask.is_allowed(id), expected, "id {}", id);
        }
    }

    // Property: after k non-terminal steps the buffer holds exactly those ids
    #[test]
    fn test_buffer_growth(actions in prop::collection::vec(0i64..8, 0..=10), extra in 0usize..5) {
        let capacity = actions.len() + extra;
        let mut env = AlphaEnv::new(FixedGrammar { reward: 0.0 }, small_codec(), capacity, 0.0);
        env.reset();

        for &action in &actions {
            let step = env.step(action).unwrap();
            prop_assert!(!step.done);
            prop_assert_eq!(step.obs.len(), capacity);
        }

        let k = actions.len();
        prop_assert_eq!(env.counter(), k);
        for (i, &action) in actions.iter().enumerate() {
            prop_assert_eq!(env.observation()[i] as i64, action);
        }
        prop_assert!(env.observation()[k..].iter().all(|&v| v == 0));
    }

    // Property: a terminal step leaves buffer and counter untouched
    #[test]
    fn test_terminal_step_does_not_append(actions in prop::collection::vec(0i64..8, 0..=6)) {
        let mut env = AlphaEnv::new(FixedGrammar { reward: 0.0 }, small_codec(), 8, 0.0);
        env.reset();
        for &action in &actions {
            env.step(action).unwrap();
        }

        let before = env.observation().to_vec();
        let step = env.step(8).unwrap();
        prop_assert!(step.done);
        prop_assert_eq!(&step.obs, &before);
        prop_assert_eq!(env.counter(), actions.len());
    }

    // Property: shaped reward is raw reward plus the constant
    #[test]
    fn test_reward_shaping(raw in -1.0e6f64..1.0e6, per_step in -10.0f64..10.0, action in 0i64..9) {
        let mut env = AlphaEnv::new(FixedGrammar { reward: raw }, small_codec(), 4, per_step);
        env.reset();
        let step = env.step(action).unwrap();
        prop_assert_eq!(step.reward, raw + per_step);
    }
}
