//! Pruning of cached paths that no longer exist
//!
//! Cached file lists can outlive the files they name. Before a cached list is
//! compared against the current diff, every path missing from the target
//! commit's tree is dropped.

use crate::context::RunContext;
use crate::error::{DiffCacheError, Result};
use log::{info, warn};
use std::collections::HashSet;

/// Blob paths of the target revision
async fn query_tree(ctx: &RunContext) -> Result<HashSet<String>> {
    let sha = &ctx.revisions().target;
    let tree = ctx
        .client()
        .fetch_tree(ctx.owner(), ctx.repo(), sha)
        .await
        .map_err(|cause| DiffCacheError::TreeQueryFailed {
            sha: sha.clone(),
            cause,
        })?;

    if tree.truncated {
        warn!(
            "Tree of {} is truncated, pruning with {} entries",
            sha,
            tree.tree.len()
        );
    }
    Ok(tree.blob_paths().map(str::to_string).collect())
}

/// Keep the paths present in `tree`, in their original order
pub fn retain_present(paths: Vec<String>, tree: &HashSet<String>) -> Vec<String> {
    paths.into_iter().filter(|path| tree.contains(path)).collect()
}

/// Remove paths that are not part of the target revision
///
/// Fails open: when the tree cannot be listed the paths are returned as is.
pub async fn prune(ctx: &RunContext, paths: Vec<String>) -> Vec<String> {
    if paths.is_empty() {
        return paths;
    }

    match query_tree(ctx).await {
        Ok(tree) => {
            let before = paths.len();
            let kept = retain_present(paths, &tree);
            if kept.len() < before {
                info!("Pruned {} cached files missing from the tree", before - kept.len());
            }
            kept
        }
        Err(e) => {
            info!("{}; keeping cached files unpruned", e);
            paths
        }
    }
}
