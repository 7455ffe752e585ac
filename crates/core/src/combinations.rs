//! Order-preserving k-of-n selection.
//!
//! Enumeration is lexicographic by chosen index positions. Both the group
//! expander (over cards) and the optimizer (over pool indices) rely on that
//! order for their tie-breaks.

use std::ops::ControlFlow;

/// Every `k`-element selection of `items`, preserving input order.
pub fn combinations<T: Clone>(items: &[T], k: usize) -> Vec<Vec<T>> {
    let mut out = Vec::new();
    walk_combinations(
        items.len(),
        k,
        |_, _| true,
        |indices| {
            out.push(indices.iter().map(|idx| items[*idx].clone()).collect());
            ControlFlow::Continue(())
        },
    );
    out
}

/// Index-level walk over every `k`-of-`len` selection.
///
/// `admit(prefix, next)` is asked before `next` is appended to `prefix`;
/// returning `false` skips every selection that starts with that extension.
/// `visit` sees each complete selection and can stop the walk with
/// `ControlFlow::Break`. Returns `false` if the walk was stopped.
pub fn walk_combinations<A, V>(len: usize, k: usize, mut admit: A, mut visit: V) -> bool
where
    A: FnMut(&[usize], usize) -> bool,
    V: FnMut(&[usize]) -> ControlFlow<()>,
{
    if k == 0 || k > len {
        return true;
    }
    let mut chosen = Vec::with_capacity(k);
    descend(len, k, 0, &mut chosen, &mut admit, &mut visit).is_continue()
}

fn descend<A, V>(
    len: usize,
    k: usize,
    start: usize,
    chosen: &mut Vec<usize>,
    admit: &mut A,
    visit: &mut V,
) -> ControlFlow<()>
where
    A: FnMut(&[usize], usize) -> bool,
    V: FnMut(&[usize]) -> ControlFlow<()>,
{
    if chosen.len() == k {
        return visit(chosen);
    }
    let slots = k - chosen.len();
    for next in start..len {
        if len - next < slots {
            break;
        }
        if !admit(chosen, next) {
            continue;
        }
        chosen.push(next);
        let flow = descend(len, k, next + 1, chosen, admit, visit);
        chosen.pop();
        if flow.is_break() {
            return flow;
        }
    }
    ControlFlow::Continue(())
}

/// `C(n, k)`, saturating on overflow.
pub fn binomial(n: usize, k: usize) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut acc: u64 = 1;
    for step in 0..k {
        acc = match acc.checked_mul((n - step) as u64) {
            Some(value) => value / (step as u64 + 1),
            None => return u64::MAX,
        };
    }
    acc
}
