//! Actions: the per-file sources this tool builds, tests and deploys.
//!
//! - [`metadata`] - header extraction and schema validation
//! - [`bundler`] - the [`Bundler`] seam and its esbuild implementation
//! - [`build`] - discover, validate, bundle, report
//! - [`templates`] - embedded project and action templates
//! - [`watch`] - change notifications for the source directory

pub mod build;
pub mod bundler;
pub mod metadata;
pub mod templates;
pub mod watch;

pub use build::{
    action_names, build_workspace, discover_sources, ActionSource, BuildReport, BuiltArtifact,
};
pub use bundler::{BundleRequest, Bundler, EsbuildBundler};
pub use metadata::{insert_header_line, ActionMetadata, MetadataSchema};
pub use watch::SourceWatcher;
