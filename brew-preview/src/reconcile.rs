//! Positional tree reconciliation
//!
//! Patches a live tree so that it serializes identically to a freshly parsed
//! target tree, while leaving unchanged subtrees in place. Keeping node
//! identity is what avoids flicker and keeps transient UI state (open
//! `<details>`, scroll anchors) alive across re-renders.
//!
//! Walk, for a pair `(old, new)` at corresponding positions:
//!
//! 1. Children are matched strictly by index.
//!    - `new` has fewer children: `old` is trimmed from the end down to `new`'s length.
//!    - `old` has fewer children: deep copies of the extra `new` children are appended.
//!    - both present: recurse.
//! 2. After the child walk the serialized markup of both subtrees is compared.
//!    If it still differs (attribute or text changes, misaligned siblings) the
//!    whole `old` node is swapped for a deep copy of `new`.
//!
//! There are no keys. An insertion in the middle of a list misaligns every
//! following sibling, which then falls through to step 2. The output is still
//! correct, only coarser.

use crate::dom::TreeNode;
use crate::error::DomError;

/// Counters collected during one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Node pairs compared
    pub visited: usize,
    /// Children appended from the target tree
    pub inserted: usize,
    /// Trailing children dropped from the live tree
    pub removed: usize,
    /// Subtrees swapped wholesale
    pub replaced: usize,
}

impl ReconcileStats {
    /// True when the pass did not touch the live tree
    pub fn is_noop(&self) -> bool {
        self.inserted == 0 && self.removed == 0 && self.replaced == 0
    }
}

/// What the caller has to do with the node it passed as `old`.
#[derive(Debug)]
pub enum Patch<N> {
    /// `old` now matches `new`; leave it where it is
    Keep,
    /// `old` must be replaced by this detached copy of `new`
    Replace(N),
}

/// Reconcile `old` against `new`.
///
/// Children of `old` are patched in place. `old` itself cannot be swapped
/// from here since that needs its parent, so a whole-node replacement is
/// returned as [`Patch::Replace`].
pub fn reconcile<N: TreeNode>(
    old: &N,
    new: &N,
    stats: &mut ReconcileStats,
) -> Result<Patch<N>, DomError> {
    stats.visited += 1;
    reconcile_children(old, new, stats)?;

    if old.outer_html()? != new.outer_html()? {
        stats.replaced += 1;
        return Ok(Patch::Replace(new.deep_copy()));
    }
    Ok(Patch::Keep)
}

/// Reconcile the child lists of `old` and `new`, leaving `old` itself alone.
pub fn reconcile_children<N: TreeNode>(
    old: &N,
    new: &N,
    stats: &mut ReconcileStats,
) -> Result<(), DomError> {
    let target_len = new.child_count();
    let span = old.child_count().max(target_len);

    for index in 0..span {
        match (old.child(index), new.child(index)) {
            (_, None) => {
                while old.child_count() > target_len {
                    old.remove_child(old.child_count() - 1);
                    stats.removed += 1;
                }
                break;
            }
            (None, Some(new_child)) => {
                old.append_child(new_child.deep_copy());
                stats.inserted += 1;
            }
            (Some(old_child), Some(new_child)) => {
                if let Patch::Replace(replacement) = reconcile(&old_child, &new_child, stats)? {
                    old.replace_child(index, replacement);
                }
            }
        }
    }

    Ok(())
}
