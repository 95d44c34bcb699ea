//! JSON reports over a built icon.

use iconkit_animation::{completed_iterations, sample, AnimationDescriptor};
use iconkit_common::{IconKitError, ResultExt};
use iconkit_svg::{BuildOptions, Icon, Node};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;
use tracing::debug;

/// Read and build one icon file.
pub fn load_icon(path: &Path, options: &BuildOptions) -> Result<Icon, IconKitError> {
    let markup = std::fs::read_to_string(path)?;
    let icon = Icon::parse_with(&markup, options).parse_context(path.display().to_string())?;
    debug!(file = %path.display(), nodes = icon.nodes.len(), "Loaded icon");
    Ok(icon)
}

/// Build options from a JSON file; defaults when no file is given.
pub fn load_options(path: Option<&Path>) -> Result<BuildOptions, IconKitError> {
    let Some(path) = path else {
        return Ok(BuildOptions::default());
    };
    let json = std::fs::read_to_string(path)?;
    serde_json::from_str(&json).config_context(path.display().to_string())
}

// ==================== Tree ====================

/// One scene node as reported by `tree`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub styled: bool,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub animations: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn from_node(node: &Node) -> Self {
        Self {
            kind: node.kind().to_string(),
            id: node.id().map(str::to_string),
            styled: node.style().is_some(),
            animations: node
                .animations()
                .iter()
                .map(|a| a.property_name().to_string())
                .collect(),
            children: node.children().iter().map(TreeNode::from_node).collect(),
        }
    }
}

pub fn tree(icon: &Icon) -> Vec<TreeNode> {
    icon.nodes.iter().map(TreeNode::from_node).collect()
}

/// Indented text rendering, one node per line.
pub fn render_tree(nodes: &[TreeNode]) -> String {
    fn render(out: &mut String, node: &TreeNode, depth: usize) {
        let _ = write!(out, "{}{}", "  ".repeat(depth), node.kind);
        if let Some(id) = &node.id {
            let _ = write!(out, " #{}", id);
        }
        if node.styled {
            out.push_str(" [styled]");
        }
        if !node.animations.is_empty() {
            let _ = write!(out, " ~ {}", node.animations.join(", "));
        }
        out.push('\n');
        for child in &node.children {
            render(out, child, depth + 1);
        }
    }

    let mut out = String::new();
    for node in nodes {
        render(&mut out, node, 0);
    }
    out
}

// ==================== Sampling ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleReport {
    pub times_ms: Vec<f32>,
    pub nodes: Vec<AnimatedNodeReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimatedNodeReport {
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub animations: Vec<AnimationReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationReport {
    pub property: String,
    pub duration_ms: f32,
    pub delay_ms: f32,
    /// `None` entries are times at which the property keeps its base value.
    pub progress: Vec<Option<f32>>,
    pub completed_iterations: Vec<u32>,
}

impl AnimationReport {
    pub fn new(animation: &AnimationDescriptor, times_ms: &[f32]) -> Self {
        let timing = animation.timing();
        Self {
            property: animation.property_name().to_string(),
            duration_ms: timing.duration_ms,
            delay_ms: timing.delay_ms,
            progress: times_ms.iter().map(|&t| sample(timing, t).value()).collect(),
            completed_iterations: times_ms
                .iter()
                .map(|&t| completed_iterations(timing, t))
                .collect(),
        }
    }
}

/// Progress of every animation in the icon at each of `times_ms`.
pub fn sample_icon(icon: &Icon, times_ms: &[f32]) -> SampleReport {
    let nodes = icon
        .animated_nodes()
        .into_iter()
        .map(|node| AnimatedNodeReport {
            kind: node.kind().to_string(),
            id: node.id().map(str::to_string),
            animations: node
                .animations()
                .iter()
                .map(|a| AnimationReport::new(a, times_ms))
                .collect(),
        })
        .collect();

    SampleReport {
        times_ms: times_ms.to_vec(),
        nodes,
    }
}

// ==================== Check ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub file: String,
    pub ok: bool,
    /// Scene nodes, not counting style and animation wrappers.
    pub nodes: usize,
    pub animated: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckReport {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub files: Vec<CheckResult>,
}

pub fn check_file(path: &Path, options: &BuildOptions) -> CheckResult {
    let file = path.display().to_string();
    match load_icon(path, options) {
        Ok(icon) => {
            let mut nodes = 0;
            icon.walk(&mut |node| {
                if !matches!(node, Node::Styled { .. } | Node::Animated { .. }) {
                    nodes += 1;
                }
            });
            CheckResult {
                file,
                ok: true,
                nodes,
                animated: icon.animated_nodes().len(),
                category: None,
                error: None,
            }
        }
        Err(e) => CheckResult {
            file,
            ok: false,
            nodes: 0,
            animated: 0,
            category: Some(e.category().to_string()),
            error: Some(e.to_string()),
        },
    }
}

pub fn check_files(paths: &[impl AsRef<Path>], options: &BuildOptions) -> CheckReport {
    let files: Vec<CheckResult> = paths
        .iter()
        .map(|p| check_file(p.as_ref(), options))
        .collect();
    let passed = files.iter().filter(|r| r.ok).count();
    CheckReport {
        total: files.len(),
        passed,
        failed: files.len() - passed,
        files,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iconkit_svg::PathErrorPolicy;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const SPINNER: &str = r#"<svg viewBox="0 0 24 24">
        <g id="arms"><path d="M12 2v4"/><circle id="hub" r="2">
          <animate attributeName="opacity" from="1" to="0" dur="1s" fill="freeze"/>
        </circle></g></svg>"#;

    #[test]
    fn test_tree_report() {
        let icon = Icon::parse(SPINNER).unwrap();
        let nodes = tree(&icon);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].kind, "g");
        assert_eq!(nodes[0].id.as_deref(), Some("arms"));
        assert_eq!(nodes[0].children[1].animations, vec!["opacity"]);

        let text = render_tree(&nodes);
        assert!(text.starts_with("g #arms\n"));
        assert!(text.contains("  circle #hub ~ opacity"));
    }

    #[test]
    fn test_sample_report() {
        let icon = Icon::parse(SPINNER).unwrap();
        let report = sample_icon(&icon, &[0.0, 500.0, 2000.0]);
        assert_eq!(report.nodes.len(), 1);
        let animation = &report.nodes[0].animations[0];
        assert_eq!(animation.property, "opacity");
        assert_eq!(animation.progress, vec![Some(0.0), Some(0.5), Some(1.0)]);
        assert_eq!(animation.completed_iterations, vec![0, 0, 2]);

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"property\":\"opacity\""));
    }

    #[test]
    fn test_check_reports_failures() {
        let good = write_temp(SPINNER);
        let bad = write_temp(r#"<svg><path d="M0 0 L"/></svg>"#);
        let report = check_files(&[good.path(), bad.path()], &BuildOptions::default());
        assert_eq!((report.total, report.passed, report.failed), (2, 1, 1));
        assert_eq!(report.files[0].nodes, 3);
        assert_eq!(report.files[1].category.as_deref(), Some("parse"));

        let lenient = BuildOptions::new().with_path_errors(PathErrorPolicy::DropElement);
        assert!(check_file(bad.path(), &lenient).ok);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = check_file(Path::new("/definitely/not/here.svg"), &BuildOptions::default());
        assert_eq!(result.category.as_deref(), Some("io"));
    }

    #[test]
    fn test_load_options() {
        assert_eq!(load_options(None).unwrap(), BuildOptions::default());

        let file = write_temp(r#"{ "path_errors": "drop_element", "max_depth": 8 }"#);
        let options = load_options(Some(file.path())).unwrap();
        assert_eq!(options.path_errors, PathErrorPolicy::DropElement);
        assert_eq!(options.max_depth, 8);
        assert!(options.css_animations);

        let broken = write_temp("{ not json");
        let err = load_options(Some(broken.path())).unwrap_err();
        assert_eq!(err.category(), "config");
    }
}
