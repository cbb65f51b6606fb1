//! Property tests for the ownership tree.
//!
//! Random sequences of insert/remove/reorder/destroy are replayed against
//! a plain `Vec` model of the root's children (front first). After every
//! step the arena must agree with the model on membership, z-order,
//! ownership, and which child is current.

use proptest::prelude::*;
use twin_core::geometry::Rect;
use twin_core::handle::ViewId;
use twin_core::source::ScriptedSource;
use twin_render::driver::HeadlessDriver;
use twin_views::{Options, Plain, Ui};

const VIEWS: usize = 6;

#[derive(Debug, Clone, Copy)]
enum Op {
    Insert(usize),
    Remove(usize),
    MakeFirst(usize),
    InFrontOf(usize, usize),
    ToBack(usize),
    Destroy(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let v = 0..VIEWS;
    prop_oneof![
        4 => v.clone().prop_map(Op::Insert),
        2 => v.clone().prop_map(Op::Remove),
        2 => v.clone().prop_map(Op::MakeFirst),
        2 => (v.clone(), v.clone()).prop_map(|(a, b)| Op::InFrontOf(a, b)),
        1 => v.clone().prop_map(Op::ToBack),
        1 => v.prop_map(Op::Destroy),
    ]
}

fn selectable(i: usize) -> bool {
    i % 2 == 0
}

fn apply(ui: &mut Ui, ids: &[ViewId], model: &mut Vec<usize>, alive: &mut [bool], op: Op) {
    let root = ui.root();
    match op {
        Op::Insert(i) => {
            ui.insert(root, ids[i]);
            if alive[i] && !model.contains(&i) {
                model.insert(0, i);
            }
        }
        Op::Remove(i) => {
            ui.remove(root, ids[i]);
            model.retain(|v| *v != i);
        }
        Op::MakeFirst(i) => {
            ui.make_first(ids[i]);
            if let Some(pos) = model.iter().position(|v| *v == i) {
                model.remove(pos);
                model.insert(0, i);
            }
        }
        Op::InFrontOf(i, j) => {
            ui.put_in_front_of(ids[i], Some(ids[j]));
            if i != j && model.contains(&i) && model.contains(&j) {
                model.retain(|v| *v != i);
                let at = model.iter().position(|v| *v == j).unwrap_or(0);
                model.insert(at, i);
            }
        }
        Op::ToBack(i) => {
            ui.put_in_front_of(ids[i], None);
            if model.contains(&i) {
                model.retain(|v| *v != i);
                model.push(i);
            }
        }
        Op::Destroy(i) => {
            ui.destroy(ids[i]);
            model.retain(|v| *v != i);
            alive[i] = false;
        }
    }
}

proptest! {
    #[test]
    fn tree_matches_model(ops in prop::collection::vec(op_strategy(), 0..48)) {
        let mut ui = Ui::new(HeadlessDriver::new(40, 12), ScriptedSource::new());
        let root = ui.root();
        let ids: Vec<ViewId> = (0..VIEWS)
            .map(|i| {
                let x = i as i16 * 3;
                let id = ui.add_view(Rect::new(x, 1, x + 8, 6), Plain);
                if selectable(i) {
                    ui.set_options(id, Options::SELECTABLE);
                }
                id
            })
            .collect();
        let mut model: Vec<usize> = Vec::new();
        let mut alive = [true; VIEWS];

        for op in ops {
            apply(&mut ui, &ids, &mut model, &mut alive, op);

            let expected: Vec<ViewId> = model.iter().map(|i| ids[*i]).collect();
            prop_assert_eq!(ui.children_front_to_back(root).to_vec(), expected.clone(), "after {:?}", op);

            for (i, id) in ids.iter().enumerate() {
                prop_assert_eq!(ui.contains(*id), alive[i]);
                let owned = ui.owner(*id) == Some(root);
                prop_assert_eq!(owned, model.contains(&i));
            }

            let want_current = model.iter().copied().find(|i| selectable(*i)).map(|i| ids[i]);
            prop_assert_eq!(ui.current(root), want_current, "after {:?}", op);
            prop_assert_eq!(ui.view_count(), 1 + alive.iter().filter(|a| **a).count());

            if let Some(front) = expected.first() {
                prop_assert_eq!(ui.last(root), Some(*front));
                prop_assert_eq!(ui.index_of(root, *front), Some(0));
            } else {
                prop_assert_eq!(ui.last(root), None);
            }
        }
    }
}
