//! Classifier artifact
//!
//! The primary-use model is trained elsewhere and shipped as a JSON export of a
//! CART decision tree: parallel node arrays plus the class codes. Anything that
//! maps a feature vector to a class code can stand in for it through the
//! `Classifier` trait.

use crate::error::{ClassifierFault, ClassifierLoadError};
use crate::schema::FeatureSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Child index marking a leaf node
pub const TREE_LEAF: i64 = -1;

/// A fitted classifier: feature vector in, class code out
pub trait Classifier: Send + Sync {
    /// Predict the class code for one feature vector
    fn predict(&self, features: &[f64]) -> Result<i64, ClassifierFault>;

    /// Number of input features the classifier was fitted on
    fn n_features(&self) -> usize;

    /// Input feature names, if the artifact recorded them
    fn feature_names(&self) -> Option<&[String]> {
        None
    }

    /// Human-readable model name for logs and status output
    fn name(&self) -> &str {
        "classifier"
    }
}

/// Node arrays of a fitted tree. Node `i` is described by index `i` of every array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNodes {
    /// Split feature index (ignored on leaves)
    pub feature: Vec<i64>,
    /// Split threshold; samples with `x[feature] <= threshold` go left
    pub threshold: Vec<f64>,
    /// Left child index, or `TREE_LEAF`
    pub children_left: Vec<i64>,
    /// Right child index, or `TREE_LEAF`
    pub children_right: Vec<i64>,
    /// Per-class sample weights at each node
    pub value: Vec<Vec<f64>>,
}

/// Decision tree classifier loaded from a JSON artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    #[serde(default = "default_model_name")]
    pub model_name: String,
    pub n_features: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    /// Class codes, indexed like the rows of `nodes.value`
    pub classes: Vec<i64>,
    pub nodes: TreeNodes,
}

fn default_model_name() -> String {
    "decision_tree".to_string()
}

impl DecisionTree {
    /// Parse and structurally validate a tree artifact
    pub fn from_json(json: &str) -> Result<Self, ClassifierLoadError> {
        let tree: DecisionTree = serde_json::from_str(json)?;
        tree.validate_structure()?;
        Ok(tree)
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.children_left.len()
    }

    pub fn n_leaves(&self) -> usize {
        (0..self.n_nodes()).filter(|&i| self.is_leaf(i)).count()
    }

    /// Longest root-to-leaf path, in edges
    pub fn depth(&self) -> usize {
        let mut depths = vec![0usize; self.n_nodes()];
        let mut max_depth = 0;
        // Children always follow their parent, so one forward pass suffices
        for i in 0..self.n_nodes() {
            if self.is_leaf(i) {
                max_depth = max_depth.max(depths[i]);
                continue;
            }
            for child in [self.nodes.children_left[i], self.nodes.children_right[i]] {
                depths[child as usize] = depths[i] + 1;
            }
        }
        max_depth
    }

    fn is_leaf(&self, node: usize) -> bool {
        self.nodes.children_left[node] == TREE_LEAF && self.nodes.children_right[node] == TREE_LEAF
    }

    /// Check array shapes and node links.
    ///
    /// Every child index must point past its parent, which rules out cycles.
    pub fn validate_structure(&self) -> Result<(), ClassifierLoadError> {
        let nodes = &self.nodes;
        let n = nodes.children_left.len();

        if n == 0 {
            return Err(ClassifierLoadError::InvalidStructure(
                "tree has no nodes".to_string(),
            ));
        }
        if self.classes.is_empty() {
            return Err(ClassifierLoadError::InvalidStructure(
                "tree has no classes".to_string(),
            ));
        }
        if self.n_features == 0 {
            return Err(ClassifierLoadError::InvalidStructure(
                "tree has zero input features".to_string(),
            ));
        }

        let lengths = [
            ("feature", nodes.feature.len()),
            ("threshold", nodes.threshold.len()),
            ("children_right", nodes.children_right.len()),
            ("value", nodes.value.len()),
        ];
        for (name, len) in lengths {
            if len != n {
                return Err(ClassifierLoadError::InvalidStructure(format!(
                    "{name} has {len} entries, children_left has {n}"
                )));
            }
        }

        if let Some(names) = &self.feature_names {
            if names.len() != self.n_features {
                return Err(ClassifierLoadError::InvalidStructure(format!(
                    "{} feature names for {} features",
                    names.len(),
                    self.n_features
                )));
            }
        }

        for i in 0..n {
            let left = nodes.children_left[i];
            let right = nodes.children_right[i];

            if left == TREE_LEAF || right == TREE_LEAF {
                if left != right {
                    return Err(ClassifierLoadError::InvalidStructure(format!(
                        "node {i} has exactly one child"
                    )));
                }
                if nodes.value[i].len() != self.classes.len() {
                    return Err(ClassifierLoadError::InvalidStructure(format!(
                        "leaf {i} has {} class weights, expected {}",
                        nodes.value[i].len(),
                        self.classes.len()
                    )));
                }
                continue;
            }

            for child in [left, right] {
                if child <= i as i64 || child >= n as i64 {
                    return Err(ClassifierLoadError::InvalidStructure(format!(
                        "node {i} links to invalid child {child}"
                    )));
                }
            }

            let feature = nodes.feature[i];
            if feature < 0 || feature as usize >= self.n_features {
                return Err(ClassifierLoadError::InvalidStructure(format!(
                    "node {i} splits on invalid feature {feature}"
                )));
            }
            if !nodes.threshold[i].is_finite() {
                return Err(ClassifierLoadError::InvalidStructure(format!(
                    "node {i} has a non-finite threshold"
                )));
            }
        }

        Ok(())
    }

    fn leaf_class(&self, leaf: usize) -> i64 {
        let weights = &self.nodes.value[leaf];
        let mut best = 0;
        for (i, w) in weights.iter().enumerate() {
            if *w > weights[best] {
                best = i;
            }
        }
        self.classes[best]
    }
}

impl Classifier for DecisionTree {
    fn predict(&self, features: &[f64]) -> Result<i64, ClassifierFault> {
        if features.len() != self.n_features {
            return Err(ClassifierFault::FeatureCountMismatch {
                expected: self.n_features,
                actual: features.len(),
            });
        }
        if let Some(index) = features.iter().position(|x| !x.is_finite()) {
            return Err(ClassifierFault::NonFiniteFeature { index });
        }

        let mut node = 0usize;
        for _ in 0..self.n_nodes() {
            if self.is_leaf(node) {
                return Ok(self.leaf_class(node));
            }
            let feature = self.nodes.feature[node] as usize;
            node = if features[feature] <= self.nodes.threshold[node] {
                self.nodes.children_left[node] as usize
            } else {
                self.nodes.children_right[node] as usize
            };
        }

        Err(ClassifierFault::TraversalOverflow {
            steps: self.n_nodes(),
        })
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}

/// Load a classifier artifact and check it against the feature schema
pub fn load_classifier(path: &Path) -> Result<DecisionTree, ClassifierLoadError> {
    let json = fs::read_to_string(path).map_err(|e| ClassifierLoadError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let tree = DecisionTree::from_json(&json)?;
    FeatureSchema::default().check(&tree)?;

    log::info!(
        "Loaded classifier '{}' from {} ({} nodes, depth {})",
        tree.model_name,
        path.display(),
        tree.n_nodes(),
        tree.depth()
    );
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Root splits on screen time (feature 2) at 5.0; the right branch splits
    /// on gaming time (feature 9) at 2.0.
    fn sample_tree_json() -> &'static str {
        r#"{
            "model_name": "primary_use_tree",
            "n_features": 12,
            "classes": [0, 1, 2, 3],
            "nodes": {
                "feature":        [2,   -2,  9,   -2,  -2],
                "threshold":      [5.0, -2.0, 2.0, -2.0, -2.0],
                "children_left":  [1,   -1,  3,   -1,  -1],
                "children_right": [2,   -1,  4,   -1,  -1],
                "value": [
                    [10.0, 10.0, 10.0, 10.0],
                    [0.0, 1.0, 0.0, 9.0],
                    [10.0, 9.0, 10.0, 1.0],
                    [8.0, 0.0, 1.0, 1.0],
                    [2.0, 9.0, 1.0, 0.0]
                ]
            }
        }"#
    }

    fn features(screen_time: f64, gaming: f64) -> Vec<f64> {
        let mut x = vec![25.0, 0.0, 0.0, 30.0, 45.0, 25.0, 2.5, 2000.0, 1.5, 0.0, 699.0, 0.0];
        x[2] = screen_time;
        x[9] = gaming;
        x
    }

    #[test]
    fn test_parse_and_shape() {
        let tree = DecisionTree::from_json(sample_tree_json()).unwrap();
        assert_eq!(tree.n_nodes(), 5);
        assert_eq!(tree.n_leaves(), 3);
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.name(), "primary_use_tree");
    }

    #[test]
    fn test_predict_follows_splits() {
        let tree = DecisionTree::from_json(sample_tree_json()).unwrap();

        assert_eq!(tree.predict(&features(3.0, 0.0)), Ok(3));
        assert_eq!(tree.predict(&features(5.0, 0.0)), Ok(3));
        assert_eq!(tree.predict(&features(8.0, 1.0)), Ok(0));
        assert_eq!(tree.predict(&features(8.0, 4.0)), Ok(1));
    }

    #[test]
    fn test_predict_rejects_bad_vectors() {
        let tree = DecisionTree::from_json(sample_tree_json()).unwrap();

        assert_eq!(
            tree.predict(&[1.0, 2.0]),
            Err(ClassifierFault::FeatureCountMismatch {
                expected: 12,
                actual: 2
            })
        );
        assert_eq!(
            tree.predict(&features(f64::NAN, 0.0)),
            Err(ClassifierFault::NonFiniteFeature { index: 2 })
        );
    }

    #[test]
    fn test_rejects_backward_child_link() {
        let json = sample_tree_json().replace(
            r#""children_left":  [1,   -1,  3,   -1,  -1]"#,
            r#""children_left":  [1,   -1,  0,   -1,  -1]"#,
        );
        let err = DecisionTree::from_json(&json).unwrap_err();
        assert!(matches!(err, ClassifierLoadError::InvalidStructure(_)));
    }

    #[test]
    fn test_rejects_mismatched_array_lengths() {
        let json = sample_tree_json().replace(
            r#""threshold":      [5.0, -2.0, 2.0, -2.0, -2.0]"#,
            r#""threshold":      [5.0, -2.0, 2.0, -2.0]"#,
        );
        let err = DecisionTree::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("threshold has 4 entries"));
    }

    #[test]
    fn test_rejects_invalid_json() {
        let err = DecisionTree::from_json("not a tree").unwrap_err();
        assert!(matches!(err, ClassifierLoadError::Json(_)));
    }

    #[test]
    fn test_load_classifier_checks_schema() {
        let dir = tempfile::tempdir().unwrap();

        let good = dir.path().join("model.json");
        fs::write(&good, sample_tree_json()).unwrap();
        assert!(load_classifier(&good).is_ok());

        let narrow = dir.path().join("narrow.json");
        let json = sample_tree_json().replace(r#""n_features": 12"#, r#""n_features": 10"#);
        fs::write(&narrow, json).unwrap();
        assert!(matches!(
            load_classifier(&narrow),
            Err(ClassifierLoadError::SchemaMismatch(_))
        ));

        let missing = dir.path().join("missing.json");
        assert!(matches!(
            load_classifier(&missing),
            Err(ClassifierLoadError::Io { .. })
        ));
    }
}
