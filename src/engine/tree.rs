// src/engine/tree.rs
//! Immutable category forest with precomputed rollup sets.
//!
//! Building reads as three steps:
//!   1. Register categories in input order (first occurrence of an id wins)
//!   2. Link each category under its parent, dropping links that dangle or
//!      would close a cycle
//!   3. Precompute every node's descendant set once
//!
//! A tree is never mutated after `build`; reloading the category list
//! produces a new tree.

use crate::model::Category;
use crate::types::CategoryId;
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default)]
pub struct CategoryTree {
    /// Categories indexed by id, in input order
    nodes: IndexMap<CategoryId, Category>,
    /// Resolved parent links: child_id -> parent_id
    parents: HashMap<CategoryId, CategoryId>,
    /// Child links: parent_id -> child_ids in input order
    children: HashMap<CategoryId, Vec<CategoryId>>,
    /// Nodes without a resolved parent, in input order
    roots: Vec<CategoryId>,
    /// Rollup sets: id -> every id reachable through children
    descendants: HashMap<CategoryId, HashSet<CategoryId>>,
    empty: HashSet<CategoryId>,
}

impl CategoryTree {
    /// Builds the forest from a flat category list. Never fails: dangling
    /// parents, self-parents and cycles turn the affected node into a root.
    pub fn build(categories: impl IntoIterator<Item = Category>) -> Self {
        let mut tree = Self::default();

        for category in categories {
            if tree.nodes.contains_key(&category.id) {
                log::warn!("Ignoring duplicate category id {}", category.id);
                continue;
            }
            tree.nodes.insert(category.id.clone(), category);
        }

        tree.link_parents();
        tree.compute_descendants();

        log::debug!(
            "Built category tree: {} categories, {} roots",
            tree.nodes.len(),
            tree.roots.len()
        );
        tree
    }

    fn link_parents(&mut self) {
        for (id, category) in &self.nodes {
            let Some(parent_id) = &category.parent_id else {
                continue;
            };

            if !self.nodes.contains_key(parent_id) {
                log::debug!(
                    "Category {} references unknown parent {}; treating as root",
                    id,
                    parent_id
                );
                continue;
            }

            if parent_id == id || self.is_ancestor(id, parent_id) {
                log::warn!(
                    "Category {} -> {} would close a cycle; treating {} as root",
                    id,
                    parent_id,
                    id
                );
                continue;
            }

            self.parents.insert(id.clone(), parent_id.clone());
        }

        for id in self.nodes.keys() {
            match self.parents.get(id) {
                Some(parent_id) => self
                    .children
                    .entry(parent_id.clone())
                    .or_default()
                    .push(id.clone()),
                None => self.roots.push(id.clone()),
            }
        }
    }

    /// Whether `candidate` is `start` or one of its linked ancestors.
    /// Terminates because the links made so far are acyclic.
    fn is_ancestor(&self, candidate: &CategoryId, start: &CategoryId) -> bool {
        let mut current = Some(start);
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            current = self.parents.get(id);
        }
        false
    }

    fn compute_descendants(&mut self) {
        let mut descendants = HashMap::with_capacity(self.nodes.len());
        for id in self.nodes.keys() {
            let mut collected = HashSet::new();
            let mut stack: Vec<&CategoryId> = self
                .children
                .get(id)
                .map(|c| c.iter().collect())
                .unwrap_or_default();
            while let Some(child) = stack.pop() {
                if collected.insert(child.clone()) {
                    if let Some(grandchildren) = self.children.get(child) {
                        stack.extend(grandchildren.iter());
                    }
                }
            }
            descendants.insert(id.clone(), collected);
        }
        self.descendants = descendants;
    }

    // --- Queries ---

    pub fn get(&self, id: &CategoryId) -> Option<&Category> {
        self.nodes.get(id)
    }

    pub fn name_of(&self, id: &CategoryId) -> Option<&str> {
        self.nodes.get(id).map(|c| c.name.as_str())
    }

    /// Whether `id` names a main category. Unknown ids are not main.
    pub fn is_main(&self, id: &CategoryId) -> bool {
        self.nodes.get(id).is_some_and(Category::is_main)
    }

    /// Every id below `id` in the forest; empty for leaves and unknown ids.
    pub fn descendant_ids(&self, id: &CategoryId) -> &HashSet<CategoryId> {
        self.descendants.get(id).unwrap_or(&self.empty)
    }

    /// Rollup matching: exact match, or `target` is main and the product's
    /// category lies anywhere beneath it.
    pub fn matches(&self, product_category: &CategoryId, target: &CategoryId) -> bool {
        product_category == target
            || (self.is_main(target) && self.descendant_ids(target).contains(product_category))
    }

    pub fn parent(&self, id: &CategoryId) -> Option<&CategoryId> {
        self.parents.get(id)
    }

    pub fn children(&self, id: &CategoryId) -> &[CategoryId] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn roots(&self) -> &[CategoryId] {
        &self.roots
    }

    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
