//! Parallel cache warm-up.
//!
//! Loads the directories the walk will enter on a bounded rayon pool so the
//! serial passes that follow only read filled cache slots. A directory is
//! queued only after its parent's slot is filled, which the loader relies on
//! to derive the directory's configuration.

use filters::path;
use logging::trace_prefetch;
use rayon::{Scope, ThreadPoolBuilder};

use crate::dir_info::DirLoader;
use crate::mode::UpdatePolicy;

/// Fills the cache for every directory the walk will enter.
///
/// Ancestors of the starting directories are loaded on the calling thread
/// first. Nothing below a directory whose load is fatal is queued. A pool
/// that cannot be built leaves the cache cold; the serial passes then load
/// on demand.
pub(crate) fn prefetch(loader: &DirLoader<'_>, policy: &UpdatePolicy, workers: usize) {
    let pool = match ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|index| format!("walk-prefetch-{index}"))
        .build()
    {
        Ok(pool) => pool,
        Err(error) => {
            trace_prefetch!("prefetch pool unavailable, loading on demand: {error}");
            return;
        }
    };

    let recurse = policy.mode().recurses();
    let starts = start_dirs(policy);
    trace_prefetch!(
        "prefetching from {} start directories on {workers} workers (recursive: {recurse})",
        starts.len()
    );

    let starts: Vec<&str> = starts
        .into_iter()
        .filter(|start| load_ancestors(loader, start))
        .collect();

    pool.scope(|scope| {
        for start in starts {
            scope.spawn(move |scope| visit(loader, scope, start.to_owned(), recurse));
        }
    });
    trace_prefetch!("prefetch complete: {} directories cached", loader.cache.len());
}

/// Directories the traversal is started from.
///
/// Roots nested under another root are dropped when the walk recurses; the
/// outer root's traversal reaches them.
fn start_dirs(policy: &UpdatePolicy) -> Vec<&str> {
    if policy.mode().visits_all() {
        return vec![""];
    }
    let roots = policy.roots();
    if !policy.mode().recurses() {
        return roots.iter().map(String::as_str).collect();
    }
    roots
        .iter()
        .filter(|root| {
            !roots
                .iter()
                .any(|other| other != *root && path::is_within(root, other))
        })
        .map(String::as_str)
        .collect()
}

/// Loads the strict ancestors of `rel`, outermost first. Returns false if
/// one of them is fatal or no longer lists the next path segment.
fn load_ancestors(loader: &DirLoader<'_>, rel: &str) -> bool {
    let ancestors = path::ancestors(rel);
    for pair in ancestors.windows(2) {
        let result = loader.get(pair[0]);
        if result.is_fatal() || !result.info.subdirs().iter().any(|name| name == path::base(pair[1])) {
            trace_prefetch!("not prefetching {rel:?}: {:?} does not lead to it", pair[0]);
            return false;
        }
    }
    true
}

fn visit<'scope>(loader: &'scope DirLoader<'_>, scope: &Scope<'scope>, rel: String, recurse: bool) {
    let result = loader.get(&rel);
    if !recurse || result.is_fatal() {
        return;
    }
    for name in result.info.subdirs() {
        let child = path::join(&rel, name);
        scope.spawn(move |scope| visit(loader, scope, child, recurse));
    }
}
