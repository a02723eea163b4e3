//! Generic, immutable, structurally-shared red-black tree core.
//!
//! Nodes carry no parent pointers: insert and delete are implemented
//! as recursions that rebuild the touched path and run fixups on the
//! way back up, the same shape as a left-leaning red-black tree's
//! `walkuprot_23`/`fixup` pattern, generalized two ways:
//!
//! - nodes are ordered by *rank* (a running subtree weight) rather
//!   than by a stored comparable key, so the same core serves both
//!   the piece table (ranked by byte offset) and the line index
//!   (ranked by line number);
//! - each node carries a domain-specific aggregate (`RbValue::Extra`)
//!   that is recomputed from children on every path-copy, in addition
//!   to the rank-dimension `count`.
//!
//! Left-leaning coloring (red links only ever lean left) is kept
//! throughout, which is what makes the delete-side fixups
//! (`move_red_left`/`move_red_right`) tractable without parent
//! pointers.

use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// A value stored in a node. `own_weight` is this node's contribution
/// to the rank dimension used for positional descent (byte length for
/// pieces, always 1 for lines). `Extra` is whatever additional
/// per-subtree aggregate the domain needs.
pub trait RbValue: Clone {
    type Extra: Clone;

    fn own_weight(&self) -> usize;
    fn own_extra(&self) -> Self::Extra;
    fn combine_extra(own: &Self::Extra, left: Option<&Agg<Self::Extra>>, right: Option<&Agg<Self::Extra>>) -> Self::Extra;
}

#[derive(Debug, Clone)]
pub struct Agg<E> {
    pub count: usize,
    pub extra: E,
}

pub struct RbNode<V: RbValue> {
    pub color: Color,
    pub left: Option<Rc<RbNode<V>>>,
    pub right: Option<Rc<RbNode<V>>>,
    pub value: V,
    pub agg: Agg<V::Extra>,
}

pub type Link<V> = Option<Rc<RbNode<V>>>;

fn count<V: RbValue>(n: &Link<V>) -> usize {
    n.as_ref().map(|n| n.agg.count).unwrap_or(0)
}

fn agg_of<V: RbValue>(n: &Link<V>) -> Option<&Agg<V::Extra>> {
    n.as_ref().map(|n| &n.agg)
}

pub fn is_red<V: RbValue>(n: &Link<V>) -> bool {
    matches!(n, Some(n) if n.color == Color::Red)
}

fn is_black<V: RbValue>(n: &Link<V>) -> bool {
    !is_red(n)
}

/// Rebuild a node from its parts, recomputing aggregates. This is the
/// only place a node is ever constructed; every mutation goes through
/// here so aggregates can never drift from children.
fn build<V: RbValue>(color: Color, left: Link<V>, value: V, right: Link<V>) -> Rc<RbNode<V>> {
    let own_extra = value.own_extra();
    let extra = V::combine_extra(&own_extra, agg_of(&left), agg_of(&right));
    let cnt = count(&left) + value.own_weight() + count(&right);
    Rc::new(RbNode {
        color,
        left,
        right,
        value,
        agg: Agg { count: cnt, extra },
    })
}

fn with_color<V: RbValue>(n: &Rc<RbNode<V>>, color: Color) -> Rc<RbNode<V>> {
    build(color, n.left.clone(), n.value.clone(), n.right.clone())
}

/// `rotate_left` / `rotate_right` move a red link in the named
/// direction; aggregates of both the old and new roots are
/// recomputed since their children changed.
fn rotate_left<V: RbValue>(n: &Rc<RbNode<V>>) -> Rc<RbNode<V>> {
    let r = n.right.clone().expect("rotate_left on node without right child");
    let new_left = build(Color::Red, n.left.clone(), n.value.clone(), r.left.clone());
    build(r.color, Some(new_left), r.value.clone(), r.right.clone())
}

fn rotate_right<V: RbValue>(n: &Rc<RbNode<V>>) -> Rc<RbNode<V>> {
    let l = n.left.clone().expect("rotate_right on node without left child");
    let new_right = build(Color::Red, l.right.clone(), n.value.clone(), n.right.clone());
    build(l.color, l.left.clone(), l.value.clone(), Some(new_right))
}

fn flip_colors<V: RbValue>(n: &Rc<RbNode<V>>) -> Rc<RbNode<V>> {
    let flip = |c: Color| if c == Color::Red { Color::Black } else { Color::Red };
    let left = n.left.as_ref().map(|l| with_color(l, flip(l.color)));
    let right = n.right.as_ref().map(|r| with_color(r, flip(r.color)));
    build(flip(n.color), left, n.value.clone(), right)
}

/// Standard LLRB fixup: lean red links left, split 4-nodes on the way
/// back up.
fn fixup<V: RbValue>(n: Rc<RbNode<V>>) -> Rc<RbNode<V>> {
    let mut n = n;
    if is_red(&n.right) && !is_red(&n.left) {
        n = rotate_left(&n);
    }
    if is_red(&n.left) && is_red(&n.left.as_ref().unwrap().left) {
        n = rotate_right(&n);
    }
    if is_red(&n.left) && is_red(&n.right) {
        n = flip_colors(&n);
    }
    n
}

fn move_red_left<V: RbValue>(n: &Rc<RbNode<V>>) -> Rc<RbNode<V>> {
    let mut n = flip_colors(n);
    if is_red(&n.right.as_ref().unwrap().left) {
        let new_right = rotate_right(n.right.as_ref().unwrap());
        n = build(n.color, n.left.clone(), n.value.clone(), Some(new_right));
        n = rotate_left(&n);
        n = flip_colors(&n);
    }
    n
}

fn move_red_right<V: RbValue>(n: &Rc<RbNode<V>>) -> Rc<RbNode<V>> {
    let mut n = flip_colors(n);
    if is_red(&n.left.as_ref().unwrap().left) {
        n = rotate_right(&n);
        n = flip_colors(&n);
    }
    n
}

/// Insert `value` so that it occupies rank `rank` in the in-order
/// sequence (0 = before everything). Returns the new root, always
/// colored black.
pub fn insert_at<V: RbValue>(root: &Link<V>, rank: usize, value: V) -> Rc<RbNode<V>> {
    fn go<V: RbValue>(node: &Link<V>, rank: usize, value: V) -> Rc<RbNode<V>> {
        match node {
            None => build(Color::Red, None, value, None),
            Some(n) => {
                let left_count = count(&n.left);
                let built = if rank <= left_count {
                    let new_left = Some(go(&n.left, rank, value));
                    build(n.color, new_left, n.value.clone(), n.right.clone())
                } else {
                    let sub_rank = rank - left_count - n.value.own_weight();
                    let new_right = Some(go(&n.right, sub_rank, value));
                    build(n.color, n.left.clone(), n.value.clone(), new_right)
                };
                fixup(built)
            }
        }
    }
    let new_root = go(root, rank, value);
    with_color(&new_root, Color::Black)
}

fn delete_min<V: RbValue>(n: &Rc<RbNode<V>>) -> (V, Link<V>) {
    match &n.left {
        None => (n.value.clone(), None),
        Some(_) => {
            let n = if !is_red(&n.left) && !is_red(&n.left.as_ref().unwrap().left) {
                move_red_left(n)
            } else {
                n.clone()
            };
            let (min_val, new_left) = delete_min(n.left.as_ref().unwrap());
            let built = build(n.color, new_left, n.value.clone(), n.right.clone());
            (min_val, Some(fixup(built)))
        }
    }
}

/// Remove whatever node currently occupies rank `rank`. `root` must
/// be non-empty and `rank` must be a valid in-order index into it.
pub fn remove_at<V: RbValue>(root: &Link<V>, rank: usize) -> Link<V> {
    fn go<V: RbValue>(node: &Rc<RbNode<V>>, rank: usize) -> Link<V> {
        let left_count = count(&node.left);
        if rank < left_count {
            let node = if !is_red(&node.left) && !is_red(&node.left.as_ref().unwrap().left) {
                move_red_left(node)
            } else {
                node.clone()
            };
            let new_left = go(node.left.as_ref().unwrap(), rank);
            Some(fixup(build(node.color, new_left, node.value.clone(), node.right.clone())))
        } else {
            let mut node = node.clone();
            if is_red(&node.left) {
                node = rotate_right(&node);
            }
            if rank == count(&node.left) && node.right.is_none() {
                return node.left.clone();
            }
            if !is_red(&node.right) && !is_red(&node.right.as_ref().map(|r| r.left.clone()).unwrap_or(None)) {
                node = move_red_right(&node);
            }
            let left_count2 = count(&node.left);
            if rank == left_count2 {
                let (succ_val, new_right) = delete_min(node.right.as_ref().unwrap());
                Some(fixup(build(node.color, node.left.clone(), succ_val, new_right)))
            } else {
                let sub_rank = rank - left_count2 - node.value.own_weight();
                let new_right = go(node.right.as_ref().unwrap(), sub_rank);
                Some(fixup(build(node.color, node.left.clone(), node.value.clone(), new_right)))
            }
        }
    }
    match root {
        None => None,
        Some(n) => go(n, rank).map(|n| with_color(&n, Color::Black)),
    }
}

/// Replace the value occupying rank `rank` with `value`, leaving tree
/// shape and coloring untouched (used for in-place shrink/grow edits
/// that do not change node count, e.g. adjusting one piece's length).
pub fn update_at<V: RbValue>(root: &Link<V>, rank: usize, value: V) -> Rc<RbNode<V>> {
    fn go<V: RbValue>(node: &Rc<RbNode<V>>, rank: usize, value: V) -> Rc<RbNode<V>> {
        let left_count = count(&node.left);
        if rank < left_count {
            let new_left = Some(go(node.left.as_ref().unwrap(), rank, value));
            build(node.color, new_left, node.value.clone(), node.right.clone())
        } else if rank == left_count {
            build(node.color, node.left.clone(), value, node.right.clone())
        } else {
            let sub_rank = rank - left_count - node.value.own_weight();
            let new_right = Some(go(node.right.as_ref().unwrap(), sub_rank, value));
            build(node.color, node.left.clone(), node.value.clone(), new_right)
        }
    }
    go(root.as_ref().expect("update_at on empty tree"), rank, value)
}

/// Find the node whose span `[base, base + own_weight)` contains
/// `pos` in the rank dimension, returning `(value, base)`.
pub fn find_at<V: RbValue>(root: &Link<V>, pos: usize) -> Option<(V, usize)> {
    fn go<V: RbValue>(node: &Link<V>, pos: usize, base: usize) -> Option<(V, usize)> {
        let n = node.as_ref()?;
        let left_count = count(&n.left);
        if pos < left_count {
            go(&n.left, pos, base)
        } else if pos < left_count + n.value.own_weight() {
            Some((n.value.clone(), base + left_count))
        } else {
            go(&n.right, pos - left_count - n.value.own_weight(), base + left_count + n.value.own_weight())
        }
    }
    go(root, pos, 0)
}

/// In-order walk, yielding `(value, base_rank)` pairs.
pub fn collect<V: RbValue>(root: &Link<V>) -> Vec<(V, usize)> {
    fn go<V: RbValue>(node: &Link<V>, base: usize, out: &mut Vec<(V, usize)>) {
        if let Some(n) = node {
            go(&n.left, base, out);
            let my_base = base + count(&n.left);
            out.push((n.value.clone(), my_base));
            go(&n.right, my_base + n.value.own_weight(), out);
        }
    }
    let mut out = Vec::new();
    go(root, 0, &mut out);
    out
}

pub fn total_count<V: RbValue>(root: &Link<V>) -> usize {
    count(root)
}

/// Sum of `extract(extra)` over every node whose rank is strictly
/// less than `rank` — the generalized form of "descend by count,
/// accumulating a chosen aggregate along the way" used by both the
/// piece table (byte offsets) and the line index (byte/char start
/// offsets).
pub fn prefix_extra<V: RbValue>(root: &Link<V>, rank: usize, extract: impl Fn(&V::Extra) -> usize + Copy) -> usize {
    fn go<V: RbValue>(node: &Link<V>, rank: usize, extract: impl Fn(&V::Extra) -> usize + Copy) -> usize {
        match node {
            None => 0,
            Some(n) => {
                let left_count = count(&n.left);
                let left_extra = agg_of(&n.left).map(|a| extract(&a.extra)).unwrap_or(0);
                if rank <= left_count {
                    go(&n.left, rank, extract)
                } else {
                    let own = extract(&n.value.own_extra());
                    left_extra + own + go(&n.right, rank - left_count - n.value.own_weight(), extract)
                }
            }
        }
    }
    go(root, rank, extract)
}

pub fn root_extra<V: RbValue>(root: &Link<V>) -> Option<V::Extra> {
    root.as_ref().map(|n| n.agg.extra.clone())
}

/// Recursive black-height computation, used only by `validate`.
fn black_height<V: RbValue>(node: &Link<V>) -> Result<usize, crate::error::Error> {
    match node {
        None => Ok(0),
        Some(n) => {
            if is_red(&Some(n.clone())) && (is_red(&n.left) || is_red(&n.right)) {
                return Err(crate::error::Error::Invariant("consecutive red nodes".into()));
            }
            let lh = black_height(&n.left)?;
            let rh = black_height(&n.right)?;
            if lh != rh {
                return Err(crate::error::Error::Invariant(format!(
                    "unbalanced black height: left={} right={}",
                    lh, rh
                )));
            }
            Ok(lh + if n.color == Color::Black { 1 } else { 0 })
        }
    }
}

/// Validate the core red-black properties: root is black, no red-red
/// violations, equal black height on every path. Returns the black
/// height on success.
pub fn validate<V: RbValue>(root: &Link<V>) -> Result<usize, crate::error::Error> {
    if is_red(root) {
        return Err(crate::error::Error::Invariant("root is red".into()));
    }
    black_height(root)
}

#[cfg(test)]
#[path = "rbtree_test.rs"]
mod rbtree_test;
