//! Binary space partition over the grid, stored as an arena of leaves.

use slotmap::{SlotMap, new_key_type};

use super::config::GenerationConfig;
use super::layout::Rect;
use super::random::RandomSource;

new_key_type! {
    pub struct LeafId;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Leaf {
    pub rect: Rect,
    pub left: Option<LeafId>,
    pub right: Option<LeafId>,
    /// Index into the room list of this attempt. Only terminal leaves own one.
    pub room: Option<usize>,
}

impl Leaf {
    fn new(rect: Rect) -> Self {
        Self { rect, left: None, right: None, room: None }
    }

    pub fn is_terminal(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub fn children(&self) -> Option<(LeafId, LeafId)> {
        self.left.zip(self.right)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitRules {
    pub min_leaf_size: usize,
    pub max_leaf_size: usize,
    pub split_chance: f64,
    pub aspect_ratio: f64,
}

impl From<&GenerationConfig> for SplitRules {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            min_leaf_size: config.min_leaf_size,
            max_leaf_size: config.max_leaf_size,
            split_chance: config.split_chance,
            aspect_ratio: config.split_aspect_ratio,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PartitionTree {
    leaves: SlotMap<LeafId, Leaf>,
    root: LeafId,
}

impl PartitionTree {
    pub fn new(bounds: Rect) -> Self {
        let mut leaves = SlotMap::with_key();
        let root = leaves.insert(Leaf::new(bounds));
        Self { leaves, root }
    }

    /// Keeps sweeping the leaf list, splitting oversized leaves always and the
    /// rest by chance, until a full sweep splits nothing.
    pub fn build(bounds: Rect, rules: SplitRules, rng: &mut RandomSource) -> Self {
        let mut tree = Self::new(bounds);
        let mut sweep = vec![tree.root];
        let mut did_split = true;
        while did_split {
            did_split = false;
            let mut index = 0;
            while index < sweep.len() {
                let leaf_id = sweep[index];
                index += 1;

                let Some(leaf) = tree.leaves.get(leaf_id) else {
                    continue;
                };
                if !leaf.is_terminal() {
                    continue;
                }
                let oversized = leaf.rect.width > rules.max_leaf_size
                    || leaf.rect.height > rules.max_leaf_size;
                if !oversized && !rng.chance(rules.split_chance) {
                    continue;
                }
                if tree.split(leaf_id, rules, rng) {
                    if let Some((left, right)) = tree.leaves[leaf_id].children() {
                        sweep.push(left);
                        sweep.push(right);
                    }
                    did_split = true;
                }
            }
        }
        log::trace!("partition finished with {} leaves", tree.terminal_leaves().len());
        tree
    }

    /// Splits a terminal leaf in two. Returns `false` and leaves the tree
    /// untouched when the leaf already has children or either half would fall
    /// below `min_leaf_size`.
    pub fn split(&mut self, leaf_id: LeafId, rules: SplitRules, rng: &mut RandomSource) -> bool {
        let Some(leaf) = self.leaves.get(leaf_id) else {
            return false;
        };
        if !leaf.is_terminal() {
            return false;
        }
        let rect = leaf.rect;

        let width = rect.width as f64;
        let height = rect.height as f64;
        let cut_rows = if width >= height * rules.aspect_ratio {
            false
        } else if height >= width * rules.aspect_ratio {
            true
        } else {
            rng.coin_flip()
        };

        let extent = if cut_rows { rect.height } else { rect.width };
        if extent < rules.min_leaf_size * 2 {
            return false;
        }
        let cut = rng.next_usize(rules.min_leaf_size, extent - rules.min_leaf_size);

        let (first, second) = if cut_rows {
            (
                Rect::new(rect.x, rect.y, rect.width, cut),
                Rect::new(rect.x, rect.y + cut, rect.width, rect.height - cut),
            )
        } else {
            (
                Rect::new(rect.x, rect.y, cut, rect.height),
                Rect::new(rect.x + cut, rect.y, rect.width - cut, rect.height),
            )
        };

        let left = self.leaves.insert(Leaf::new(first));
        let right = self.leaves.insert(Leaf::new(second));
        let parent = &mut self.leaves[leaf_id];
        parent.left = Some(left);
        parent.right = Some(right);
        true
    }

    pub fn root(&self) -> LeafId {
        self.root
    }

    pub fn leaf(&self, leaf_id: LeafId) -> Option<&Leaf> {
        self.leaves.get(leaf_id)
    }

    pub(super) fn assign_room(&mut self, leaf_id: LeafId, room_index: usize) {
        if let Some(leaf) = self.leaves.get_mut(leaf_id) {
            debug_assert!(leaf.is_terminal(), "split leaves never own a room");
            leaf.room = Some(room_index);
        }
    }

    /// Children before parents, left subtree before right.
    pub fn post_order(&self) -> Vec<LeafId> {
        let mut order = Vec::with_capacity(self.leaves.len());
        let mut stack = vec![(self.root, false)];
        while let Some((leaf_id, expanded)) = stack.pop() {
            let Some(leaf) = self.leaves.get(leaf_id) else {
                continue;
            };
            match leaf.children() {
                Some((left, right)) if !expanded => {
                    stack.push((leaf_id, true));
                    stack.push((right, false));
                    stack.push((left, false));
                }
                _ => order.push(leaf_id),
            }
        }
        order
    }

    pub fn terminal_leaves(&self) -> Vec<LeafId> {
        self.post_order()
            .into_iter()
            .filter(|&leaf_id| self.leaves[leaf_id].is_terminal())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }
}
