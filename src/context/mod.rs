//! Bounded project-context collection for prompts.
//!
//! [`DirectoryWalker`] lists the workspace through the host down to
//! [`MAX_EXPLORE_DEPTH`], filtering each directory with its own
//! [`IgnoreRules`]. [`ProjectContextCollector`] turns the walk into a text
//! digest of READMEs and dependency manifests, and
//! [`build_onboarding_prompt`] wraps that digest in instructions.

mod collector;
mod ignore_rules;
mod prompt;
mod walker;

pub use collector::{is_manifest, is_readme, ProjectContextCollector, MANIFEST_FILENAMES};
pub use ignore_rules::{gitignore_patterns, IgnoreRules, DEFAULT_IGNORE_DIRS, DEFAULT_IGNORE_FILES};
pub use prompt::{
    build_onboarding_prompt, MAX_ADDITIONAL_INSIGHTS, MAX_ARCHITECTURE_INSIGHTS, MAX_FOLDERS,
};
pub use walker::{DirectoryWalker, WalkEntry, MAX_EXPLORE_DEPTH};
