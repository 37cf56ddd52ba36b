use serde::Deserialize;

/// Number of model inputs
pub const FEATURE_COUNT: usize = 5;

/// Feature order the artifact was trained on
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] =
    ["year", "encoded_make", "encoded_model", "mileage", "condition"];

/// Fixed-order model input: `[year, encoded_make, encoded_model, mileage, condition]`
pub type Features = [f64; FEATURE_COUNT];

/// Marker used by scikit-learn for "no child" in tree arrays
const LEAF: i64 = -1;

/// Trained price regressor, deserialized from the model artifact
///
/// Output is a price in the source currency.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Regressor {
    /// `intercept + Σ coefficients[i] · x[i]`
    Linear {
        intercept: f64,
        coefficients: Vec<f64>,
    },
    /// Mean of the predictions of every tree
    Forest { trees: Vec<RegressionTree> },
}

/// A single regression tree in scikit-learn's flat array layout
///
/// Node `i` is a leaf when `children_left[i] == -1`. Otherwise the walk goes
/// to `children_left[i]` when `x[feature[i]] <= threshold[i]`, else to
/// `children_right[i]`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegressionTree {
    children_left: Vec<i64>,
    children_right: Vec<i64>,
    feature: Vec<i64>,
    threshold: Vec<f64>,
    value: Vec<f64>,
}

impl Regressor {
    pub fn kind(&self) -> &'static str {
        match self {
            Regressor::Linear { .. } => "linear",
            Regressor::Forest { .. } => "forest",
        }
    }

    /// Only reachable through a checked `Artifact`
    pub(crate) fn predict(&self, features: &Features) -> f64 {
        match self {
            Regressor::Linear {
                intercept,
                coefficients,
            } => {
                intercept
                    + coefficients
                        .iter()
                        .zip(features.iter())
                        .map(|(c, x)| c * x)
                        .sum::<f64>()
            }
            Regressor::Forest { trees } => {
                let total: f64 = trees.iter().map(|tree| tree.predict(features)).sum();
                total / trees.len() as f64
            }
        }
    }

    /// Check structural invariants so `predict` can never index out of
    /// bounds or loop
    pub(crate) fn check(&self) -> Result<(), String> {
        match self {
            Regressor::Linear {
                intercept,
                coefficients,
            } => {
                if coefficients.len() != FEATURE_COUNT {
                    return Err(format!(
                        "linear model expects {} coefficients, found {}",
                        FEATURE_COUNT,
                        coefficients.len()
                    ));
                }
                if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
                    return Err("linear model contains non-finite parameters".to_string());
                }
                Ok(())
            }
            Regressor::Forest { trees } => {
                if trees.is_empty() {
                    return Err("forest contains no trees".to_string());
                }
                for (idx, tree) in trees.iter().enumerate() {
                    tree.check().map_err(|e| format!("tree {}: {}", idx, e))?;
                }
                Ok(())
            }
        }
    }
}

impl RegressionTree {
    fn predict(&self, features: &Features) -> f64 {
        let mut node = 0usize;
        loop {
            let left = self.children_left[node];
            if left == LEAF {
                return self.value[node];
            }

            let feature = self.feature[node] as usize;
            node = if features[feature] <= self.threshold[node] {
                left as usize
            } else {
                self.children_right[node] as usize
            };
        }
    }

    fn check(&self) -> Result<(), String> {
        let len = self.children_left.len();
        if len == 0 {
            return Err("tree has no nodes".to_string());
        }
        if self.children_right.len() != len
            || self.feature.len() != len
            || self.threshold.len() != len
            || self.value.len() != len
        {
            return Err("node arrays have mismatched lengths".to_string());
        }

        for node in 0..len {
            let (left, right) = (self.children_left[node], self.children_right[node]);

            if left == LEAF {
                if right != LEAF {
                    return Err(format!("node {} has a right child but no left child", node));
                }
                if !self.value[node].is_finite() {
                    return Err(format!("leaf {} has a non-finite value", node));
                }
                continue;
            }

            // Children must point strictly forward so every walk terminates
            for child in [left, right] {
                if child <= node as i64 || child >= len as i64 {
                    return Err(format!("node {} has invalid child index {}", node, child));
                }
            }

            let feature = self.feature[node];
            if feature < 0 || feature >= FEATURE_COUNT as i64 {
                return Err(format!("node {} splits on unknown feature {}", node, feature));
            }
            if !self.threshold[node].is_finite() {
                return Err(format!("node {} has a non-finite threshold", node));
            }
        }

        Ok(())
    }
}
