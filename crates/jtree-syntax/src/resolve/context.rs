// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Resolution context: memoized per-block declaration sets.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::trace;

use crate::kinds::SyntaxKind;
use crate::roles::{find_child_by_role, Role};
use crate::tree::{NodeId, SyntaxTree};

use super::scope::statement_leaks;
use super::{declaration_of, Declaration, DeclarationKind};

/// A declaration made by one statement of a block.
#[derive(Debug, Clone)]
pub(crate) struct ScopeEntry {
    /// Child index in the block from which the declaration is visible.
    pub from: usize,
    pub decl: Declaration,
}

/// Everything a block declares for the statements inside it.
#[derive(Debug, Clone, Default)]
pub(crate) struct BlockScope {
    pub entries: Vec<ScopeEntry>,
    /// Names declared more than once with the same kind.
    pub conflicts: Vec<(String, DeclarationKind)>,
}

impl BlockScope {
    fn build(tree: &SyntaxTree, block: NodeId) -> BlockScope {
        let mut entries = Vec::new();
        for (index, &stmt) in tree.children(block).iter().enumerate() {
            match tree.kind(stmt) {
                SyntaxKind::DeclarationStatement => {
                    let Some(decl) = find_child_by_role(tree, stmt, Role::Declaration) else {
                        continue;
                    };
                    // A local class is in scope in its own body.
                    let from = if tree.kind(decl) == SyntaxKind::Class {
                        index
                    } else {
                        index + 1
                    };
                    if let Some(decl) = declaration_of(tree, decl) {
                        entries.push(ScopeEntry { from, decl });
                    }
                }
                SyntaxKind::IfStatement
                | SyntaxKind::WhileStatement
                | SyntaxKind::DoWhileStatement
                | SyntaxKind::ForStatement => {
                    for var in statement_leaks(tree, stmt) {
                        if let Some(decl) = declaration_of(tree, var) {
                            entries.push(ScopeEntry {
                                from: index + 1,
                                decl,
                            });
                        }
                    }
                }
                _ => {}
            }
        }

        let mut seen = HashSet::new();
        let mut conflicts = Vec::new();
        for entry in &entries {
            let key = (entry.decl.name.clone(), entry.decl.kind);
            if !seen.insert(key.clone()) && !conflicts.contains(&key) {
                conflicts.push(key);
            }
        }
        trace!(
            block = %block,
            entries = entries.len(),
            conflicts = conflicts.len(),
            "built block scope"
        );
        BlockScope { entries, conflicts }
    }

    pub fn is_conflicted(&self, decl: &Declaration) -> bool {
        self.conflicts
            .iter()
            .any(|(name, kind)| *name == decl.name && *kind == decl.kind)
    }
}

#[derive(Debug)]
struct CachedScope {
    stamp: u64,
    scope: Arc<BlockScope>,
}

/// Explicit context for visibility queries.
///
/// Holds the memoized declaration set of every block a query has passed
/// through. Each entry remembers the modification stamp of its block; an
/// edit anywhere inside the block changes that stamp, so the next query
/// rebuilds the entry. Edits elsewhere leave it alone.
#[derive(Debug, Default)]
pub struct ResolveContext {
    blocks: HashMap<NodeId, CachedScope>,
}

impl ResolveContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every memoized block.
    pub fn clear_caches(&mut self) {
        self.blocks.clear();
    }

    /// Is there a memoized entry for `block` that is still valid?
    pub fn is_cache_fresh(&self, tree: &SyntaxTree, block: NodeId) -> bool {
        self.blocks
            .get(&block)
            .is_some_and(|cached| cached.stamp == tree.stamp(block))
    }

    /// Number of memoized blocks, stale ones included.
    pub fn cached_blocks(&self) -> usize {
        self.blocks.len()
    }

    pub(crate) fn block_scope(&mut self, tree: &SyntaxTree, block: NodeId) -> Arc<BlockScope> {
        let stamp = tree.stamp(block);
        if let Some(cached) = self.blocks.get(&block) {
            if cached.stamp == stamp {
                return Arc::clone(&cached.scope);
            }
        }
        let scope = Arc::new(BlockScope::build(tree, block));
        self.blocks.insert(
            block,
            CachedScope {
                stamp,
                scope: Arc::clone(&scope),
            },
        );
        scope
    }
}
