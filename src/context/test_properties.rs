//! Property-based tests for shadow context invariants.
//!
//! Uses `proptest` to drive arbitrary push/set/pop/update sequences against a
//! naive model (a plain vector of maps) and checks that lookups, key unions,
//! depth, and the base-frame protection all agree.

use std::collections::BTreeMap;

use proptest::prelude::*;

use super::ShadowContext;
use crate::core::errors::UnderstudyError;

// ──────────────────── strategies ────────────────────

#[derive(Debug, Clone)]
enum Op {
    Push,
    Pop,
    Set(u8, i32),
    Update(Vec<(u8, i32)>),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Push),
        Just(Op::Pop),
        (0u8..8, -100i32..100).prop_map(|(k, v)| Op::Set(k, v)),
        prop::collection::vec((0u8..8, -100i32..100), 0..4).prop_map(Op::Update),
    ]
}

// ──────────────────── naive model ────────────────────

struct Model {
    stack: Vec<BTreeMap<u8, i32>>,
}

impl Model {
    fn new() -> Self {
        Self {
            stack: vec![BTreeMap::new()],
        }
    }

    fn get(&self, key: u8) -> i32 {
        self.stack
            .iter()
            .rev()
            .find_map(|frame| frame.get(&key).copied())
            .unwrap_or_default()
    }

    fn keys(&self) -> Vec<u8> {
        let mut keys: Vec<u8> = self
            .stack
            .iter()
            .flat_map(|frame| frame.keys().copied())
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }
}

fn check_agreement(ctx: &ShadowContext<u8, i32>, model: &Model) {
    assert_eq!(ctx.depth(), model.stack.len(), "depth diverged from model");
    for key in 0u8..8 {
        assert_eq!(ctx.get(&key), model.get(key), "lookup diverged for {key}");
    }
    assert_eq!(
        ctx.keys().into_iter().collect::<Vec<_>>(),
        model.keys(),
        "key union diverged from model"
    );
}

// ──────────────────── property tests ────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Any op sequence keeps the context in lockstep with the naive model,
    /// and popping below the base frame always fails without mutating state.
    #[test]
    fn context_matches_model(ops in prop::collection::vec(arb_op(), 1..60)) {
        let mut ctx: ShadowContext<u8, i32> = ShadowContext::new(i32::default);
        let mut model = Model::new();

        for op in ops {
            match op {
                Op::Push => {
                    ctx.push();
                    model.stack.push(BTreeMap::new());
                }
                Op::Pop => {
                    if model.stack.len() > 1 {
                        let frame = ctx.pop().unwrap();
                        let expected = model.stack.pop().unwrap();
                        prop_assert_eq!(frame, expected);
                    } else {
                        prop_assert!(matches!(
                            ctx.pop(),
                            Err(UnderstudyError::EmptyStack)
                        ));
                    }
                }
                Op::Set(key, value) => {
                    ctx.set(key, value);
                    model.stack.last_mut().unwrap().insert(key, value);
                }
                Op::Update(values) => {
                    ctx.update(values.clone());
                    model.stack.last_mut().unwrap().extend(values);
                }
            }
            check_agreement(&ctx, &model);
        }
    }

    /// After a push/pop pair, every lookup returns what was visible before.
    #[test]
    fn push_pop_restores_visibility(
        base in prop::collection::vec((0u8..8, -100i32..100), 0..8),
        shadow in prop::collection::vec((0u8..8, -100i32..100), 0..8),
    ) {
        let mut ctx: ShadowContext<u8, i32> = ShadowContext::new(i32::default);
        ctx.update(base.clone());

        let before: Vec<i32> = (0u8..8).map(|k| ctx.get(&k)).collect();

        ctx.push();
        ctx.update(shadow);
        ctx.pop().unwrap();

        let after: Vec<i32> = (0u8..8).map(|k| ctx.get(&k)).collect();
        prop_assert_eq!(before, after);
    }

    /// `items` always pairs the sorted key union with visible values.
    #[test]
    fn items_pair_keys_with_visible_values(ops in prop::collection::vec(arb_op(), 1..40)) {
        let mut ctx: ShadowContext<u8, i32> = ShadowContext::new(i32::default);
        for op in ops {
            match op {
                Op::Push => ctx.push(),
                Op::Pop => {
                    let _ = ctx.pop();
                }
                Op::Set(key, value) => ctx.set(key, value),
                Op::Update(values) => ctx.update(values),
            }
        }

        let items = ctx.items();
        let mut sorted = items.clone();
        sorted.sort_by_key(|(k, _)| *k);
        prop_assert_eq!(&items, &sorted, "items must be sorted by key");
        for (key, value) in items {
            prop_assert_eq!(ctx.get(&key), value);
        }
    }
}
