//! Serde types for the XGBoost JSON model document.
//!
//! Only the parts needed for inference are modelled; everything else in the
//! document is ignored. Numeric parameters are written as strings by XGBoost,
//! so they accept both strings and plain numbers.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use std::collections::HashMap;

/// Deserialize base_score which can be:
/// - A single number: 0.5
/// - A stringified number: "5E-1"
/// - An array: [0.5]
/// - A bracketed string: "[5E-1]"
fn deserialize_base_score<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as SerdeError;

    let mut cur = Value::deserialize(deserializer)?;
    loop {
        match cur {
            Value::Number(n) => {
                return n
                    .as_f64()
                    .map(|f| f as f32)
                    .ok_or_else(|| SerdeError::custom("invalid number"));
            }
            Value::String(s) => {
                let t = s.trim();
                if let Ok(f) = t.parse::<f32>() {
                    return Ok(f);
                }
                if t.starts_with('[') && t.ends_with(']') {
                    if let Ok(f) = t[1..t.len() - 1].trim().parse::<f32>() {
                        return Ok(f);
                    }
                }
                return Err(SerdeError::custom(format!(
                    "cannot parse base_score from string: {}",
                    s
                )));
            }
            Value::Array(arr) => match arr.into_iter().next() {
                Some(first) => cur = first,
                None => return Err(SerdeError::custom("empty base_score array")),
            },
            _ => {
                return Err(SerdeError::custom(
                    "base_score must be number, string, or array",
                ));
            }
        }
    }
}

/// Deserialize a list of flags stored as bools or 0/1 integers.
fn deserialize_flags<'de, D>(deserializer: D) -> Result<Vec<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as SerdeError;

    Vec::<Value>::deserialize(deserializer)?
        .into_iter()
        .map(|value| match value {
            Value::Bool(b) => Ok(b),
            Value::Number(n) => n
                .as_f64()
                .map(|f| f != 0.0)
                .ok_or_else(|| SerdeError::custom("invalid number for flag")),
            other => Err(SerdeError::custom(format!("invalid flag: {}", other))),
        })
        .collect()
}

fn default_num_parallel_tree() -> i64 {
    1
}

// --- Tree / model level definitions -------------------------------------------------

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct TreeParam {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub num_nodes: i64,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default)]
    pub num_feature: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    pub tree_param: TreeParam,
    #[serde(default)]
    pub id: i32,
    pub left_children: Vec<i32>,
    pub right_children: Vec<i32>,
    pub split_indices: Vec<i32>,
    /// Split threshold for internal nodes, leaf value for leaves
    pub split_conditions: Vec<f32>,
    #[serde(default, deserialize_with = "deserialize_flags")]
    pub default_left: Vec<bool>,
    #[serde(default)]
    pub split_type: Vec<i32>,
}

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct GBTreeModelParam {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub num_trees: i64,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default = "default_num_parallel_tree")]
    pub num_parallel_tree: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelTrees {
    pub gbtree_model_param: GBTreeModelParam,
    pub trees: Vec<Tree>,
    #[serde(default)]
    pub tree_info: Vec<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GBTreeDefinition {
    pub model: ModelTrees,
}

// --- Gradient booster variants (gbtree | gblinear | dart) ---------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum GradientBooster {
    Gbtree {
        model: ModelTrees,
    },
    Gblinear {},
    Dart {
        gbtree: GBTreeDefinition,
        #[serde(default)]
        weight_drop: Vec<f32>,
    },
}

impl GradientBooster {
    pub fn name(&self) -> &'static str {
        match self {
            GradientBooster::Gbtree { .. } => "gbtree",
            GradientBooster::Gblinear {} => "gblinear",
            GradientBooster::Dart { .. } => "dart",
        }
    }
}

// --- Objective / learner-level definitions ---------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Objective {
    pub name: String,
}

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct LearnerModelParam {
    #[serde(deserialize_with = "deserialize_base_score")]
    pub base_score: f32,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default)]
    pub num_class: i64,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub num_feature: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Learner {
    #[serde(default)]
    pub feature_names: Vec<String>,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
    pub gradient_booster: GradientBooster,
    pub objective: Objective,
    pub learner_model_param: LearnerModelParam,
}

impl Learner {
    /// Best boosting round recorded by early stopping, if any
    pub fn best_iteration(&self) -> Option<usize> {
        self.attributes
            .get("best_iteration")
            .and_then(|v| v.trim().parse().ok())
    }
}

// --- Top-level model -------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct XgbModel {
    #[serde(default)]
    pub version: Vec<u32>,
    pub learner: Learner,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn base_score_parses_number_string_array_and_bracketed() {
        let v_num = json!({"base_score": 0.25, "num_class": "0", "num_feature": "3"});
        let p_num: LearnerModelParam = serde_json::from_value(v_num).unwrap();
        assert_eq!(p_num.base_score, 0.25);

        let v_str = json!({"base_score": "2.5E-1", "num_class": "0", "num_feature": "3"});
        let p_str: LearnerModelParam = serde_json::from_value(v_str).unwrap();
        assert_eq!(p_str.base_score, 0.25);

        let v_arr = json!({"base_score": [0.25], "num_class": "0", "num_feature": "3"});
        let p_arr: LearnerModelParam = serde_json::from_value(v_arr).unwrap();
        assert_eq!(p_arr.base_score, 0.25);

        let v_bracketed = json!({"base_score": "[2.5E-1]", "num_class": "0", "num_feature": "3"});
        let p_bracketed: LearnerModelParam = serde_json::from_value(v_bracketed).unwrap();
        assert_eq!(p_bracketed.base_score, 0.25);
    }

    #[test]
    fn params_accept_strings_and_numbers() {
        let p: LearnerModelParam =
            serde_json::from_value(json!({"base_score": 0.5, "num_feature": 8})).unwrap();
        assert_eq!(p.num_feature, 8);
        assert_eq!(p.num_class, 0);

        let t: TreeParam = serde_json::from_value(json!({"num_nodes": "3", "num_feature": "8"})).unwrap();
        assert_eq!(t.num_nodes, 3);
    }

    #[test]
    fn default_left_accepts_bools_and_ints() {
        let tree = json!({
            "tree_param": {"num_nodes": "3"},
            "left_children": [1, -1, -1],
            "right_children": [2, -1, -1],
            "split_indices": [0, 0, 0],
            "split_conditions": [0.5, -0.1, 0.1],
            "default_left": [1, 0, false]
        });
        let tree: Tree = serde_json::from_value(tree).unwrap();
        assert_eq!(tree.default_left, vec![true, false, false]);
        assert!(tree.split_type.is_empty());
    }

    #[test]
    fn booster_variants_are_tagged_by_name() {
        let linear: GradientBooster =
            serde_json::from_value(json!({"name": "gblinear", "model": {"weights": [0.1]}})).unwrap();
        assert_eq!(linear.name(), "gblinear");

        let dart: GradientBooster = serde_json::from_value(json!({
            "name": "dart",
            "gbtree": {
                "name": "gbtree",
                "model": {
                    "gbtree_model_param": {"num_trees": "0", "num_parallel_tree": "1"},
                    "trees": [],
                    "tree_info": []
                }
            },
            "weight_drop": []
        }))
        .unwrap();
        assert_eq!(dart.name(), "dart");
    }

    #[test]
    fn best_iteration_reads_attributes() {
        let learner: Learner = serde_json::from_value(json!({
            "attributes": {"best_iteration": "4", "best_score": "0.12"},
            "gradient_booster": {"name": "gblinear"},
            "objective": {"name": "binary:logistic"},
            "learner_model_param": {"base_score": "5E-1", "num_class": "0", "num_feature": "2"}
        }))
        .unwrap();
        assert_eq!(learner.best_iteration(), Some(4));
    }
}
