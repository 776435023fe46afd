//! Runtime estimators.
//!
//! Both estimators take the fully expanded and scaled input row and return one probability
//! per class, in the artifact's `classes` order.

use crate::artifact::{EstimatorSchema, TreeSchema, TREE_LEAF};
use crate::{ModelError, ModelResult};

#[derive(Debug, Clone)]
pub(crate) enum Estimator {
    Logistic(Logistic),
    Forest(Forest),
}

impl Estimator {
    /// Validate the wire form against the expanded input width and class count.
    pub(crate) fn from_schema(
        schema: EstimatorSchema,
        width: usize,
        n_classes: usize,
    ) -> ModelResult<Self> {
        match schema {
            EstimatorSchema::Logistic {
                coefficients,
                intercept,
                threshold,
            } => {
                if n_classes != 2 {
                    return Err(ModelError::Invalid(format!(
                        "logistic estimator needs exactly 2 classes, artifact declares {n_classes}"
                    )));
                }
                if coefficients.len() != width {
                    return Err(ModelError::Invalid(format!(
                        "logistic estimator has {} coefficients for {width} input columns",
                        coefficients.len()
                    )));
                }
                if !(0.0..1.0).contains(&threshold) {
                    return Err(ModelError::Invalid(format!(
                        "logistic threshold {threshold} must be in [0, 1)"
                    )));
                }
                Ok(Self::Logistic(Logistic {
                    coefficients,
                    intercept,
                    threshold,
                }))
            }
            EstimatorSchema::Forest { trees } => {
                if trees.is_empty() {
                    return Err(ModelError::Invalid("forest has no trees".into()));
                }
                let trees = trees
                    .into_iter()
                    .enumerate()
                    .map(|(i, tree)| {
                        Tree::from_schema(tree, width, n_classes)
                            .map_err(|e| ModelError::Invalid(format!("tree {i}: {e}")))
                    })
                    .collect::<ModelResult<Vec<_>>>()?;
                Ok(Self::Forest(Forest { trees }))
            }
        }
    }

    /// Index into `classes` of the predicted class.
    pub(crate) fn predict_index(&self, x: &[f64]) -> usize {
        let proba = self.predict_proba(x);
        match self {
            Estimator::Logistic(model) => usize::from(proba[1] > model.threshold),
            Estimator::Forest(_) => argmax(&proba),
        }
    }

    pub(crate) fn predict_proba(&self, x: &[f64]) -> Vec<f64> {
        match self {
            Estimator::Logistic(model) => {
                let p = model.probability(x);
                vec![1.0 - p, p]
            }
            Estimator::Forest(model) => model.predict_proba(x),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Logistic {
    coefficients: Vec<f64>,
    intercept: f64,
    threshold: f64,
}

impl Logistic {
    /// Probability of the second class.
    fn probability(&self, x: &[f64]) -> f64 {
        let z = self.intercept
            + self
                .coefficients
                .iter()
                .zip(x)
                .map(|(w, v)| w * v)
                .sum::<f64>();
        sigmoid(z)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Forest {
    trees: Vec<Tree>,
}

impl Forest {
    fn predict_proba(&self, x: &[f64]) -> Vec<f64> {
        let mut acc = vec![0.0; self.trees[0].n_classes];
        for tree in &self.trees {
            for (a, p) in acc.iter_mut().zip(tree.leaf_proba(x)) {
                *a += p;
            }
        }
        let n = self.trees.len() as f64;
        acc.iter_mut().for_each(|a| *a /= n);
        acc
    }
}

#[derive(Debug, Clone)]
struct Tree {
    children_left: Vec<usize>,
    children_right: Vec<usize>,
    feature: Vec<usize>,
    threshold: Vec<f64>,
    /// Normalised class distribution per node (only read at leaves).
    proba: Vec<Vec<f64>>,
    n_classes: usize,
}

impl Tree {
    fn from_schema(schema: TreeSchema, width: usize, n_classes: usize) -> Result<Self, String> {
        let n = schema.children_left.len();
        if n == 0 {
            return Err("tree has no nodes".into());
        }
        if schema.children_right.len() != n
            || schema.feature.len() != n
            || schema.threshold.len() != n
            || schema.value.len() != n
        {
            return Err("tree arrays differ in length".into());
        }

        let mut children_left = Vec::with_capacity(n);
        let mut children_right = Vec::with_capacity(n);
        let mut feature = Vec::with_capacity(n);
        let mut proba = Vec::with_capacity(n);

        for node in 0..n {
            let (left, right) = (schema.children_left[node], schema.children_right[node]);
            if left == TREE_LEAF {
                if right != TREE_LEAF {
                    return Err(format!("node {node} has only one child"));
                }
                children_left.push(node);
                children_right.push(node);
                feature.push(0);
            } else {
                // Children always come after their parent, which also rules out cycles.
                let child = |c: i64| -> Result<usize, String> {
                    usize::try_from(c)
                        .ok()
                        .filter(|&c| c > node && c < n)
                        .ok_or_else(|| format!("node {node} has invalid child {c}"))
                };
                children_left.push(child(left)?);
                children_right.push(child(right)?);
                let f = usize::try_from(schema.feature[node])
                    .ok()
                    .filter(|&f| f < width)
                    .ok_or_else(|| {
                        format!(
                            "node {node} splits on column {} of {width}",
                            schema.feature[node]
                        )
                    })?;
                feature.push(f);
            }

            let value = &schema.value[node];
            if value.len() != n_classes {
                return Err(format!(
                    "node {node} has {} class values, expected {n_classes}",
                    value.len()
                ));
            }
            proba.push(normalise(value));
        }

        Ok(Self {
            children_left,
            children_right,
            feature,
            threshold: schema.threshold,
            proba,
            n_classes,
        })
    }

    fn is_leaf(&self, node: usize) -> bool {
        self.children_left[node] == node
    }

    fn leaf_proba(&self, x: &[f64]) -> &[f64] {
        let mut node = 0;
        while !self.is_leaf(node) {
            node = if x[self.feature[node]] <= self.threshold[node] {
                self.children_left[node]
            } else {
                self.children_right[node]
            };
        }
        &self.proba[node]
    }
}

fn normalise(value: &[f64]) -> Vec<f64> {
    let total: f64 = value.iter().sum();
    if total > 0.0 {
        value.iter().map(|v| v / total).collect()
    } else {
        vec![0.0; value.len()]
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// First index of the largest value; ties go to the lower class, as scikit-learn does.
fn argmax(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(bi, bv), (i, &v)| {
            if v > bv {
                (i, v)
            } else {
                (bi, bv)
            }
        })
        .0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(threshold: f64, left: [f64; 2], right: [f64; 2]) -> TreeSchema {
        TreeSchema {
            children_left: vec![1, -1, -1],
            children_right: vec![2, -1, -1],
            feature: vec![0, -2, -2],
            threshold: vec![threshold, -2.0, -2.0],
            value: vec![vec![5.0, 5.0], left.to_vec(), right.to_vec()],
        }
    }

    #[test]
    fn test_logistic_threshold_splits_classes() {
        let est = Estimator::from_schema(
            EstimatorSchema::Logistic {
                coefficients: vec![1.0, -1.0],
                intercept: 0.0,
                threshold: 0.5,
            },
            2,
            2,
        )
        .unwrap();

        assert_eq!(est.predict_index(&[2.0, 1.0]), 1);
        assert_eq!(est.predict_index(&[1.0, 2.0]), 0);
        // z == 0 gives p == 0.5, which is not above the threshold.
        assert_eq!(est.predict_index(&[1.0, 1.0]), 0);

        let proba = est.predict_proba(&[0.0, 0.0]);
        assert!((proba[0] - 0.5).abs() < 1e-12);
        assert!((proba[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_logistic_rejects_wrong_width() {
        let err = Estimator::from_schema(
            EstimatorSchema::Logistic {
                coefficients: vec![1.0],
                intercept: 0.0,
                threshold: 0.5,
            },
            3,
            2,
        )
        .expect_err("width mismatch");
        assert!(matches!(err, ModelError::Invalid(msg) if msg.contains("1 coefficients")));
    }

    #[test]
    fn test_forest_averages_tree_probabilities() {
        let est = Estimator::from_schema(
            EstimatorSchema::Forest {
                trees: vec![
                    stump(10.0, [9.0, 1.0], [1.0, 9.0]),
                    stump(20.0, [8.0, 2.0], [0.0, 4.0]),
                ],
            },
            1,
            2,
        )
        .unwrap();

        // Left in both trees.
        assert_eq!(est.predict_index(&[5.0]), 0);
        // Right in the first, left in the second: (0.1 + 0.8) / 2 vs (0.9 + 0.2) / 2.
        let proba = est.predict_proba(&[15.0]);
        assert!((proba[0] - 0.45).abs() < 1e-12);
        assert!((proba[1] - 0.55).abs() < 1e-12);
        assert_eq!(est.predict_index(&[15.0]), 1);
        // Threshold is inclusive on the left.
        assert_eq!(est.predict_index(&[10.0]), 0);
    }

    #[test]
    fn test_tree_rejects_backward_child() {
        let mut tree = stump(1.0, [1.0, 0.0], [0.0, 1.0]);
        tree.children_left[0] = 0;
        let err = Estimator::from_schema(EstimatorSchema::Forest { trees: vec![tree] }, 1, 2)
            .expect_err("cycle");
        assert!(matches!(err, ModelError::Invalid(msg) if msg.contains("invalid child 0")));
    }

    #[test]
    fn test_tree_rejects_split_feature_out_of_range() {
        let mut tree = stump(1.0, [1.0, 0.0], [0.0, 1.0]);
        tree.feature[0] = 4;
        let err = Estimator::from_schema(EstimatorSchema::Forest { trees: vec![tree] }, 2, 2)
            .expect_err("feature out of range");
        assert!(matches!(err, ModelError::Invalid(msg) if msg.contains("column 4 of 2")));
    }

    #[test]
    fn test_argmax_prefers_lower_index_on_tie() {
        assert_eq!(argmax(&[0.5, 0.5]), 0);
        assert_eq!(argmax(&[0.2, 0.3, 0.3]), 1);
    }
}
