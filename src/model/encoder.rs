use serde::Deserialize;
use thiserror::Error;

/// A categorical value the encoder never saw during training
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {field} '{value}': not seen during training")]
pub struct UnknownCategoryError {
    pub field: &'static str,
    pub value: String,
}

/// Label encoder mapping a category to its index in the sorted class list
///
/// Mirrors scikit-learn's `LabelEncoder`: `classes` is strictly ascending and
/// the code of a label is its position. Unknown labels are an error, never a
/// default code.
#[derive(Debug, Clone, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Result<Self, String> {
        let encoder = Self { classes };
        encoder.check()?;
        Ok(encoder)
    }

    /// Validate the invariants a deserialized encoder must hold
    pub(crate) fn check(&self) -> Result<(), String> {
        if self.classes.is_empty() {
            return Err("classes must not be empty".to_string());
        }

        if let Some(pair) = self.classes.windows(2).find(|w| w[0] >= w[1]) {
            return Err(format!(
                "classes must be sorted and unique, found '{}' before '{}'",
                pair[0], pair[1]
            ));
        }

        Ok(())
    }

    pub fn transform(&self, field: &'static str, value: &str) -> Result<usize, UnknownCategoryError> {
        self.classes
            .binary_search_by(|class| class.as_str().cmp(value))
            .map_err(|_| UnknownCategoryError {
                field,
                value: value.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
