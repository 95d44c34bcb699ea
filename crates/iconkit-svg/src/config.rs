//! Scene builder options.

use serde::{Deserialize, Serialize};

/// What to do when a `d` attribute fails to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathErrorPolicy {
    /// Fail the whole document.
    #[default]
    FailDocument,
    /// Drop the offending element and log a warning.
    DropElement,
}

/// Options controlling how markup becomes a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    pub path_errors: PathErrorPolicy,
    /// Elements nested deeper than this are skipped.
    pub max_depth: usize,
    /// Resolve CSS `animation` properties against `@keyframes`.
    pub css_animations: bool,
    /// Parse `<animate>`, `<animateTransform>` and `<animateMotion>`.
    pub smil_animations: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            path_errors: PathErrorPolicy::FailDocument,
            max_depth: 256,
            css_animations: true,
            smil_animations: true,
        }
    }
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path_errors(mut self, policy: PathErrorPolicy) -> Self {
        self.path_errors = policy;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_css_animations(mut self, enabled: bool) -> Self {
        self.css_animations = enabled;
        self
    }

    pub fn with_smil_animations(mut self, enabled: bool) -> Self {
        self.smil_animations = enabled;
        self
    }
}
