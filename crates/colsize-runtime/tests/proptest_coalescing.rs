//! Property-based tests for the multi-target engine under random trigger
//! sequences.
//!
//! 1. Every frame that follows at least one trigger runs exactly one
//!    recompute; frames with nothing pending run none.
//! 2. After the final frame, every key matches a direct allocation of its
//!    current width and percent vector.
//! 3. `triggers == frames + coalesced` throughout.

use std::rc::Rc;

use colsize_core::lab::{self, LabDocument, LabElement, LabFrames};
use colsize_layout::{SizingResult, allocate};
use colsize_runtime::{ColumnSizingMulti, HandleMap, Observable, PercentMap, SizingScope};
use proptest::prelude::*;

const KEYS: usize = 4;

#[derive(Debug, Clone)]
enum Op {
    Resize(usize, u32),
    Reflow(usize),
    Percents(usize, Vec<u32>),
    Frame,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (0..KEYS, 1u32..=2_000).prop_map(|(k, w)| Op::Resize(k, w)),
        2 => (0..KEYS).prop_map(Op::Reflow),
        2 => (0..KEYS, proptest::collection::vec(0u32..=20, 1..=5))
            .prop_map(|(k, p)| Op::Percents(k, p)),
        3 => Just(Op::Frame),
    ]
}

fn key(i: usize) -> String {
    format!("cell-{i}")
}

fn as_percents(weights: &[u32]) -> Vec<f64> {
    weights.iter().map(|&w| f64::from(w)).collect()
}

proptest! {
    #[test]
    fn random_triggers_coalesce_per_frame(
        initial in proptest::collection::vec(1u32..=2_000, KEYS),
        ops in proptest::collection::vec(op_strategy(), 1..60),
    ) {
        let doc = LabDocument::new();
        let frames = LabFrames::new();
        let scope = SizingScope::new(lab::host(&doc, &frames));

        let elements: Vec<Rc<LabElement>> = initial
            .iter()
            .map(|&w| doc.create_element(f64::from(w)))
            .collect();
        let mut widths = initial.clone();
        let handles: HandleMap = elements
            .iter()
            .enumerate()
            .map(|(i, el)| (key(i), Some(el.handle())))
            .collect();
        let mut model: PercentMap = (0..KEYS).map(|i| (key(i), vec![50.0, 50.0])).collect();

        let handles = Observable::new(handles);
        let percents = Observable::new(model.clone());
        let sizing = ColumnSizingMulti::new(&scope, &handles, &percents);

        // Construction schedules the first pass.
        let mut pending = true;
        let mut expected_recomputes = 0u64;

        for op in ops {
            match op {
                Op::Resize(i, w) => {
                    elements[i].set_width(f64::from(w));
                    if widths[i] != w {
                        widths[i] = w;
                        pending = true;
                    }
                }
                Op::Reflow(i) => {
                    elements[i].notify();
                    pending = true;
                }
                Op::Percents(i, weights) => {
                    let next = as_percents(&weights);
                    if model[&key(i)] != next {
                        model.insert(key(i), next.clone());
                        percents.update(|p| {
                            p.insert(key(i), next);
                        });
                        pending = true;
                    }
                }
                Op::Frame => {
                    let ran = frames.run_frame();
                    prop_assert_eq!(ran, usize::from(pending));
                    if pending {
                        expected_recomputes += 1;
                    }
                    pending = false;
                }
            }
            prop_assert_eq!(sizing.is_pending(), pending);
            let stats = sizing.stats();
            prop_assert_eq!(stats.triggers, stats.frames + stats.coalesced);
        }

        frames.run_frame();
        if pending {
            expected_recomputes += 1;
        }
        prop_assert_eq!(sizing.stats().recomputes, expected_recomputes);

        for (i, &w) in widths.iter().enumerate() {
            let pct = &model[&key(i)];
            let expected = SizingResult::from_allocation(w, allocate(w, pct));
            prop_assert_eq!(sizing.get(&key(i)), Some(expected), "key {}", key(i));
        }
    }
}
