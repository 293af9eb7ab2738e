//! Tunables for one assembly run.

use crate::config::{effective_concurrency, ConfigFile, DEFAULT_BUILD_TOOL, DEFAULT_SWIG_BUILDER_TARGET};
use crate::wheels::RetryPolicy;

/// Knobs the phases need, independent of where they came from.
///
/// # Example
///
/// ```
/// use pyassembler::orchestrator::AssemblyOptions;
/// use pyassembler::wheels::RetryPolicy;
///
/// let options = AssemblyOptions::new()
///     .with_max_concurrency(8)
///     .with_build_tool("buck2");
/// assert_eq!(options.max_concurrency(), 8);
/// assert_eq!(options.retry_policy(), RetryPolicy::single_retry());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyOptions {
    max_concurrency: usize,
    retry_policy: RetryPolicy,
    build_tool: String,
    swig_builder_target: String,
}

impl AssemblyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options from a loaded configuration file.
    pub fn from_config(config: &ConfigFile) -> Self {
        Self {
            max_concurrency: effective_concurrency(config.assembler.max_concurrency),
            retry_policy: RetryPolicy::new(config.wheels.fetch_attempts),
            build_tool: config.codegen.build_tool.clone(),
            swig_builder_target: config.codegen.swig_builder_target.clone(),
        }
    }

    /// Items in flight per phase; 0 picks the available parallelism.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = effective_concurrency(max_concurrency);
        self
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn with_build_tool(mut self, build_tool: impl Into<String>) -> Self {
        self.build_tool = build_tool.into();
        self
    }

    pub fn with_swig_builder_target(mut self, target: impl Into<String>) -> Self {
        self.swig_builder_target = target.into();
        self
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry_policy
    }

    pub fn build_tool(&self) -> &str {
        &self.build_tool
    }

    pub fn swig_builder_target(&self) -> &str {
        &self.swig_builder_target
    }
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            max_concurrency: effective_concurrency(0),
            retry_policy: RetryPolicy::single_retry(),
            build_tool: DEFAULT_BUILD_TOOL.to_string(),
            swig_builder_target: DEFAULT_SWIG_BUILDER_TARGET.to_string(),
        }
    }
}
