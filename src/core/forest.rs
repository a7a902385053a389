//! Tree ensemble evaluation for binary XGBoost classifiers.

use crate::core::format::{GradientBooster, ModelTrees, Tree, XgbModel};
use crate::models::Prediction;
use thiserror::Error;

/// Errors raised while validating or evaluating a model
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid model JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unsupported booster type: {0} models are not supported for tree prediction")]
    UnsupportedBooster(&'static str),

    #[error("unsupported objective: {0} (expected binary:logistic or reg:logistic)")]
    UnsupportedObjective(String),

    #[error("expected a binary classifier, model has {0} classes")]
    NotBinary(i64),

    #[error("tree {0} has no nodes")]
    EmptyTree(usize),

    #[error("tree {tree}: {field} has {actual} entries but tree has {expected} nodes")]
    LengthMismatch {
        tree: usize,
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid node index in tree {tree}: node {node} references child {child} but tree has {num_nodes} nodes")]
    InvalidNodeIndex {
        tree: usize,
        node: usize,
        child: i32,
        num_nodes: usize,
    },

    #[error("tree {tree}: node {node} splits on feature {feature} but model has {num_features} features")]
    FeatureOutOfRange {
        tree: usize,
        node: usize,
        feature: i32,
        num_features: usize,
    },

    #[error("tree {tree}: node {node} uses a categorical split")]
    CategoricalSplit { tree: usize, node: usize },

    #[error("dart model has {weights} drop weights for {trees} trees")]
    DropWeightMismatch { weights: usize, trees: usize },

    #[error("feature shape mismatch, expected: {expected}, got {actual}")]
    FeatureCount { expected: usize, actual: usize },
}

#[derive(Debug, Clone, Copy)]
struct Node {
    left: u32,
    right: u32,
    feature: u32,
    /// Threshold for splits, output for leaves
    value: f32,
    default_left: bool,
    is_leaf: bool,
}

#[derive(Debug, Clone)]
struct RegressionTree {
    nodes: Vec<Node>,
    weight: f32,
}

impl RegressionTree {
    /// Walk from the root to a leaf and return the weighted leaf value
    #[inline]
    fn predict(&self, features: &[f32]) -> f32 {
        let mut idx = 0usize;
        loop {
            let node = &self.nodes[idx];
            if node.is_leaf {
                return node.value * self.weight;
            }
            let fvalue = features[node.feature as usize];
            let go_left = if fvalue.is_nan() {
                node.default_left
            } else {
                fvalue < node.value
            };
            let next = if go_left { node.left } else { node.right };
            idx = next as usize;
        }
    }
}

/// A validated, immutable binary classifier
///
/// Mirrors `XGBClassifier.predict` / `predict_proba` for models trained with
/// a logistic objective.
#[derive(Debug, Clone)]
pub struct BinaryClassifier {
    trees: Vec<RegressionTree>,
    base_margin: f32,
    num_features: usize,
    objective: String,
    feature_names: Vec<String>,
}

impl BinaryClassifier {
    /// Parse and validate an XGBoost JSON model document
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ModelError> {
        let model: XgbModel = serde_json::from_slice(bytes)?;
        Self::from_model(model)
    }

    pub fn from_model(model: XgbModel) -> Result<Self, ModelError> {
        let learner = model.learner;
        let objective = learner.objective.name.clone();
        if !matches!(objective.as_str(), "binary:logistic" | "reg:logistic") {
            return Err(ModelError::UnsupportedObjective(objective));
        }

        let num_class = learner.learner_model_param.num_class;
        if num_class > 1 {
            return Err(ModelError::NotBinary(num_class));
        }

        let best_iteration = learner.best_iteration();
        let (model_trees, weight_drop) = match learner.gradient_booster {
            GradientBooster::Gbtree { model } => (model, Vec::new()),
            GradientBooster::Dart { gbtree, weight_drop } => (gbtree.model, weight_drop),
            booster @ GradientBooster::Gblinear {} => {
                return Err(ModelError::UnsupportedBooster(booster.name()))
            }
        };

        if !weight_drop.is_empty() && weight_drop.len() != model_trees.trees.len() {
            return Err(ModelError::DropWeightMismatch {
                weights: weight_drop.len(),
                trees: model_trees.trees.len(),
            });
        }

        let num_features = learner.learner_model_param.num_feature.max(0) as usize;
        let tree_limit = tree_limit(&model_trees, best_iteration);

        let trees = model_trees
            .trees
            .iter()
            .take(tree_limit)
            .enumerate()
            .map(|(idx, tree)| {
                let weight = weight_drop.get(idx).copied().unwrap_or(1.0);
                convert_tree(tree, idx, num_features, weight)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            trees,
            base_margin: prob_to_margin(learner.learner_model_param.base_score),
            num_features,
            objective,
            feature_names: learner.feature_names,
        })
    }

    pub fn num_features(&self) -> usize {
        self.num_features
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn objective(&self) -> &str {
        &self.objective
    }

    /// Column names recorded at training time (empty when trained on arrays)
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Raw margin: base margin plus the sum of all tree outputs
    pub fn margin(&self, features: &[f32]) -> Result<f32, ModelError> {
        if features.len() != self.num_features {
            return Err(ModelError::FeatureCount {
                expected: self.num_features,
                actual: features.len(),
            });
        }

        Ok(self
            .trees
            .iter()
            .fold(self.base_margin, |acc, tree| acc + tree.predict(features)))
    }

    /// Probability of the positive class
    pub fn predict_proba(&self, features: &[f32]) -> Result<f32, ModelError> {
        Ok(sigmoid(self.margin(features)?))
    }

    /// Predicted class label (0 or 1)
    pub fn predict(&self, features: &[f32]) -> Result<u8, ModelError> {
        Ok(label_for(self.predict_proba(features)?))
    }

    /// Label and probability from a single pass over the trees
    pub fn classify(&self, features: &[f32]) -> Result<Prediction, ModelError> {
        let probability = self.predict_proba(features)?;
        Ok(Prediction {
            label: label_for(probability),
            probability: probability as f64,
        })
    }
}

#[inline]
fn label_for(probability: f32) -> u8 {
    u8::from(probability > 0.5)
}

#[inline]
fn sigmoid(x: f32) -> f32 {
    let x = (-x).min(88.7);
    1.0 / (x.exp() + 1.0)
}

/// Convert base_score from probability space to margin space.
fn prob_to_margin(base_score: f32) -> f32 {
    let p = base_score.clamp(1e-7, 1.0 - 1e-7);
    (p / (1.0 - p)).ln()
}

/// Number of trees used for prediction, honouring early stopping.
fn tree_limit(model_trees: &ModelTrees, best_iteration: Option<usize>) -> usize {
    let total = model_trees.trees.len();
    match best_iteration {
        Some(best) => {
            let per_round = model_trees.gbtree_model_param.num_parallel_tree.max(1) as usize;
            total.min((best + 1) * per_round)
        }
        None => total,
    }
}

fn convert_tree(
    tree: &Tree,
    tree_idx: usize,
    num_features: usize,
    weight: f32,
) -> Result<RegressionTree, ModelError> {
    let num_nodes = tree.tree_param.num_nodes.max(0) as usize;
    if num_nodes == 0 {
        return Err(ModelError::EmptyTree(tree_idx));
    }

    let check_len = |field: &'static str, actual: usize| {
        if actual == num_nodes {
            Ok(())
        } else {
            Err(ModelError::LengthMismatch {
                tree: tree_idx,
                field,
                expected: num_nodes,
                actual,
            })
        }
    };
    check_len("left_children", tree.left_children.len())?;
    check_len("right_children", tree.right_children.len())?;
    check_len("split_indices", tree.split_indices.len())?;
    check_len("split_conditions", tree.split_conditions.len())?;
    if !tree.default_left.is_empty() {
        check_len("default_left", tree.default_left.len())?;
    }
    if !tree.split_type.is_empty() {
        check_len("split_type", tree.split_type.len())?;
    }

    // Children always come after their parent, which also rules out cycles.
    let child_index = |node: usize, child: i32| {
        if child > node as i32 && (child as usize) < num_nodes {
            Ok(child as u32)
        } else {
            Err(ModelError::InvalidNodeIndex {
                tree: tree_idx,
                node,
                child,
                num_nodes,
            })
        }
    };

    let mut nodes = Vec::with_capacity(num_nodes);
    for node_idx in 0..num_nodes {
        let left_child = tree.left_children[node_idx];
        let value = tree.split_conditions[node_idx];

        if left_child == -1 {
            nodes.push(Node {
                left: 0,
                right: 0,
                feature: 0,
                value,
                default_left: false,
                is_leaf: true,
            });
            continue;
        }

        if tree.split_type.get(node_idx).copied().unwrap_or(0) != 0 {
            return Err(ModelError::CategoricalSplit {
                tree: tree_idx,
                node: node_idx,
            });
        }

        let feature = tree.split_indices[node_idx];
        if feature < 0 || feature as usize >= num_features {
            return Err(ModelError::FeatureOutOfRange {
                tree: tree_idx,
                node: node_idx,
                feature,
                num_features,
            });
        }

        nodes.push(Node {
            left: child_index(node_idx, left_child)?,
            right: child_index(node_idx, tree.right_children[node_idx])?,
            feature: feature as u32,
            value,
            default_left: tree.default_left.get(node_idx).copied().unwrap_or(false),
            is_leaf: false,
        });
    }

    Ok(RegressionTree { nodes, weight })
}
