//! The two serial passes of a walk.
//!
//! The configure pass runs top-down over the directories the policy enters,
//! resolving each directory's [`Config`] from its parent's and recording
//! the result in a plan tree. The visit pass then consumes the plan
//! bottom-up, rolling orphaned files into their parent and calling the
//! visitor. Both passes run on the calling thread and only read the
//! directory cache, which the prefetcher may already have filled.

use std::collections::BTreeSet;
use std::sync::Arc;

use filters::path;
use logging::{trace_walk, warn_directive};

use crate::config::{Configurer, WALK_DIRECTIVES};
use crate::dir_info::{DirLoader, DirResult};
use crate::mode::UpdatePolicy;
use crate::{BuildFile, Config, DirVisit, DirectoryError, Visitor, WalkError};

/// Counts and non-fatal errors of a finished walk.
#[derive(Clone, Debug, Default)]
pub struct WalkSummary {
    /// Number of visitor calls made.
    pub visited: usize,
    /// Directories entered in post-order, including those not called back
    /// for, as `(rel, called)`.
    pub entered: Vec<(String, bool)>,
    /// Load errors of entered directories, in post-order.
    pub errors: Vec<DirectoryError>,
}

impl WalkSummary {
    /// Returns true if no entered directory reported a load error.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A directory resolved by the configure pass.
struct PlanNode {
    rel: String,
    config: Config,
    result: DirResult,
    update: bool,
    call: bool,
    children: Vec<PlanNode>,
}

pub(crate) struct Driver<'a> {
    pub(crate) loader: &'a DirLoader<'a>,
    pub(crate) policy: &'a UpdatePolicy,
    pub(crate) configurers: &'a [&'a dyn Configurer],
}

impl Driver<'_> {
    /// Runs both passes from the repository root.
    ///
    /// # Errors
    ///
    /// Returns [`WalkError::Config`] if an entered directory declared an
    /// unknown generation mode. No visitor call is made in that case.
    pub(crate) fn run<V>(&self, root: &Config, visitor: &mut V) -> Result<WalkSummary, WalkError>
    where
        V: Visitor + ?Sized,
    {
        let plan = self.configure("", root, false)?;
        let mut summary = WalkSummary::default();
        self.visit(plan, visitor, &mut summary);
        trace_walk!(
            "walk finished: {} entered, {} visited, {} errors",
            summary.entered.len(),
            summary.visited,
            summary.errors.len()
        );
        Ok(summary)
    }

    fn configure(&self, rel: &str, parent: &Config, update_parent: bool) -> Result<PlanNode, WalkError> {
        let result = self.loader.get(rel);
        if let Some(fatal) = result.error.as_deref().and_then(|error| error.fatal()) {
            return Err(WalkError::Config(fatal.clone()));
        }

        let mut config = parent.clone();
        config.set_walk(result.info.config_arc());
        let file = result.info.file_arc();
        if let Some(file) = file.as_deref() {
            self.warn_unknown_directives(file);
        }
        for configurer in self.configurers {
            configurer.configure(&mut config, rel, file.as_deref());
        }
        trace_walk!("configured {rel:?}");

        let should_update = self.policy.should_update(rel, update_parent);
        let mut children = Vec::new();
        for name in result.info.subdirs() {
            let child = path::join(rel, name);
            if self.policy.should_visit(&child, should_update) {
                children.push(self.configure(&child, &config, should_update)?);
            }
        }

        let update = should_update && result.error.is_none() && !config.walk().ignore();
        let call = self.policy.should_call(rel, update_parent);
        Ok(PlanNode {
            rel: rel.to_owned(),
            config,
            result,
            update,
            call,
            children,
        })
    }

    /// Visits `node` after its children. Returns the node's files, relative
    /// to the node, when it is an orphan whose files belong to its parent.
    fn visit<V>(&self, node: PlanNode, visitor: &mut V, summary: &mut WalkSummary) -> Option<Vec<String>>
    where
        V: Visitor + ?Sized,
    {
        let PlanNode {
            rel,
            config,
            result,
            update,
            call,
            children,
        } = node;
        let info = &result.info;

        let mut regular_files = info.regular_files().to_vec();
        let mut rolled_up = BTreeSet::new();
        for child in children {
            let name = path::base(&child.rel).to_owned();
            if let Some(files) = self.visit(child, visitor, summary) {
                regular_files.extend(files.iter().map(|file| path::join(&name, file)));
                rolled_up.insert(name);
            }
        }

        if let Some(error) = &result.error {
            summary.errors.push(DirectoryError {
                rel: rel.clone(),
                error: Arc::clone(error),
            });
        }

        if config.walk().update_only() && info.file().is_none() {
            trace_walk!("rolling {} files of {rel:?} into its parent", regular_files.len());
            regular_files.extend(info.generated_files().iter().cloned());
            summary.entered.push((rel, false));
            return Some(regular_files);
        }

        if call {
            let subdirs: Vec<String> = info
                .subdirs()
                .iter()
                .filter(|name| !rolled_up.contains(*name))
                .cloned()
                .collect();
            let dir = self.loader.storage_path(&rel);
            visitor.visit(DirVisit {
                dir: &dir,
                rel: &rel,
                config: &config,
                update,
                file: info.file(),
                subdirs: &subdirs,
                regular_files: &regular_files,
                generated_files: info.generated_files(),
                errors: result.error.as_deref(),
            });
            summary.visited += 1;
        }
        summary.entered.push((rel, call));
        None
    }

    fn warn_unknown_directives(&self, file: &BuildFile) {
        let mut reported = BTreeSet::new();
        for directive in &file.directives {
            let key = directive.key.as_str();
            let known = WALK_DIRECTIVES.contains(&key)
                || self
                    .configurers
                    .iter()
                    .any(|configurer| configurer.known_directives().contains(&key));
            if !known && reported.insert(key) {
                warn_directive!(
                    "{}: unknown directive: {}:{key}",
                    file.path.display(),
                    self.loader.root.directive_prefix
                );
            }
        }
    }
}
