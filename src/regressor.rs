//! Gradient-boosting model artifact loading and prediction.
//!
//! The premium model is produced by an external training pipeline and
//! consumed here read-only. The artifact is a JSON document holding a base
//! score, a shrinkage factor, and a list of binary decision trees in
//! node-array form:
//!
//! ```text
//! prediction = base_score + learning_rate * Σ leaf(tree, row)
//! ```
//!
//! Loading happens once at process start; a missing or unreadable artifact
//! is fatal and the error names the path that failed. Invocation-time
//! faults (a corrupt node index, a runaway traversal, a non-finite output)
//! surface as [`RegressorError`] so the caller can report them without
//! tearing the process down.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::{Path, PathBuf};

/// One node of a decision tree.
///
/// Split nodes route a row left or right on a feature threshold; leaves
/// carry the tree's contribution to the prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// A single regression tree stored as a flat node array rooted at index 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Routes a feature row from the root to a leaf.
    ///
    /// The step counter bounds traversal at the node-table length; any walk
    /// longer than that can only mean a cycle in a corrupt artifact.
    fn evaluate(&self, tree_index: usize, row: &[f64]) -> Result<f64, RegressorError> {
        let mut node_index = 0;
        let mut steps = 0;

        loop {
            let node =
                self.nodes
                    .get(node_index)
                    .ok_or(RegressorError::NodeOutOfBounds {
                        tree: tree_index,
                        node: node_index,
                    })?;

            match node {
                TreeNode::Leaf { value } => return Ok(*value),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let x = row
                        .get(*feature)
                        .ok_or(RegressorError::FeatureOutOfBounds {
                            tree: tree_index,
                            feature: *feature,
                        })?;
                    node_index = if *x < *threshold { *left } else { *right };
                }
            }

            steps += 1;
            if steps > self.nodes.len() {
                return Err(RegressorError::TraversalLimit { tree: tree_index });
            }
        }
    }
}

/// Serialized form of the model artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ModelDocument {
    /// Artifact self-description, e.g. "gradient_boosting_regressor".
    #[serde(default)]
    model_type: Option<String>,
    /// Training-time feature column names, when the exporter recorded them.
    #[serde(default)]
    feature_names: Option<Vec<String>>,
    base_score: f64,
    learning_rate: f64,
    trees: Vec<DecisionTree>,
}

/// The pre-trained premium regression model, loaded once at startup and
/// shared read-only for the process lifetime.
pub struct PremiumRegressor {
    path: PathBuf,
    fingerprint: String,
    document: ModelDocument,
}

impl fmt::Debug for PremiumRegressor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PremiumRegressor")
            .field("path", &self.path)
            .field("fingerprint", &self.fingerprint)
            .field("tree_count", &self.document.trees.len())
            .finish()
    }
}

impl PremiumRegressor {
    /// Loads the model artifact from disk.
    ///
    /// Fails fast with the offending path in the error message when the file
    /// is absent, unreadable, or not a valid artifact document.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();

        let bytes = std::fs::read(path)
            .with_context(|| format!("model artifact not found at path: {}", path.display()))?;

        let fingerprint = hex::encode(Sha256::digest(&bytes));

        let document: ModelDocument = serde_json::from_slice(&bytes).with_context(|| {
            format!(
                "model artifact at {} is not a valid model document",
                path.display()
            )
        })?;

        if document.trees.is_empty() {
            anyhow::bail!(
                "model artifact at {} contains no trees",
                path.display()
            );
        }

        tracing::info!(
            "Model artifact loaded: {} ({} trees, fingerprint {})",
            path.display(),
            document.trees.len(),
            &fingerprint[..12]
        );

        Ok(Self {
            path: path.to_path_buf(),
            fingerprint,
            document,
        })
    }

    /// Verifies the artifact's recorded feature schema against the encoder's
    /// column order. Artifacts without recorded names are accepted as-is.
    pub fn ensure_feature_order(&self, expected: &[&str]) -> anyhow::Result<()> {
        if let Some(names) = &self.document.feature_names {
            let matches =
                names.len() == expected.len() && names.iter().zip(expected).all(|(a, b)| a == b);
            if !matches {
                anyhow::bail!(
                    "model artifact at {} was trained with feature columns {:?}, \
                     but this service encodes {:?}",
                    self.path.display(),
                    names,
                    expected
                );
            }
        }
        Ok(())
    }

    /// Predicts the premium for one encoded feature row.
    pub fn predict(&self, row: &[f64]) -> Result<f64, RegressorError> {
        let mut total = 0.0;
        for (tree_index, tree) in self.document.trees.iter().enumerate() {
            total += tree.evaluate(tree_index, row)?;
        }

        let prediction = self.document.base_score + self.document.learning_rate * total;
        if !prediction.is_finite() {
            return Err(RegressorError::NonFiniteOutput);
        }
        Ok(prediction)
    }

    /// SHA-256 of the raw artifact bytes, hex encoded.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Path the artifact was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of trees in the ensemble.
    pub fn tree_count(&self) -> usize {
        self.document.trees.len()
    }
}

/// Faults the model can raise while computing a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegressorError {
    /// A split routed to a node index past the tree's node table.
    NodeOutOfBounds { tree: usize, node: usize },
    /// A split referenced a feature column the row does not have.
    FeatureOutOfBounds { tree: usize, feature: usize },
    /// Tree traversal exceeded the node count without reaching a leaf.
    TraversalLimit { tree: usize },
    /// The ensemble summed to NaN or infinity.
    NonFiniteOutput,
}

impl fmt::Display for RegressorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegressorError::NodeOutOfBounds { tree, node } => {
                write!(f, "tree {} references missing node {}", tree, node)
            }
            RegressorError::FeatureOutOfBounds { tree, feature } => {
                write!(f, "tree {} references missing feature column {}", tree, feature)
            }
            RegressorError::TraversalLimit { tree } => {
                write!(f, "tree {} traversal did not reach a leaf", tree)
            }
            RegressorError::NonFiniteOutput => write!(f, "model output is not finite"),
        }
    }
}

impl std::error::Error for RegressorError {}
