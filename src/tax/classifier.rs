//! Keyword-based HSN code and GST rate classification

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// HSN code for sunglasses
pub const HSN_SUNGLASSES: &str = "90041000";
/// HSN code for spectacle frames and other eyewear
pub const HSN_EYEGLASSES: &str = "90031900";

/// HSN code and GST rate assigned to a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HsnClassification {
    pub hsn_code: String,
    /// Total GST rate percentage
    pub gst_rate: BigDecimal,
}

impl HsnClassification {
    pub fn new(hsn_code: impl Into<String>, gst_rate: BigDecimal) -> Self {
        Self {
            hsn_code: hsn_code.into(),
            gst_rate,
        }
    }

    /// Sunglasses: 18%
    pub fn sunglasses() -> Self {
        Self::new(HSN_SUNGLASSES, BigDecimal::from(18))
    }

    /// Eyeglasses and frames: 5%
    pub fn eyeglasses() -> Self {
        Self::new(HSN_EYEGLASSES, BigDecimal::from(5))
    }
}

/// Descriptions containing any keyword (case-insensitive) get the classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRule {
    pub keywords: Vec<String>,
    pub classification: HsnClassification,
}

impl ClassificationRule {
    pub fn new(keywords: &[&str], classification: HsnClassification) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            classification,
        }
    }

    fn matches(&self, description: &str) -> bool {
        self.keywords.iter().any(|k| description.contains(k.as_str()))
    }
}

/// Maps free-text product descriptions to `{hsn_code, gst_rate}`
///
/// Rules are tried in order; the first match wins and anything unmatched
/// gets the fallback classification. There is no error path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxClassifier {
    rules: Vec<ClassificationRule>,
    fallback: HsnClassification,
}

impl Default for TaxClassifier {
    fn default() -> Self {
        Self {
            rules: vec![ClassificationRule::new(
                &["sunglass", "sun glass"],
                HsnClassification::sunglasses(),
            )],
            fallback: HsnClassification::eyeglasses(),
        }
    }
}

impl TaxClassifier {
    /// Create a classifier with custom rules
    pub fn with_rules(rules: Vec<ClassificationRule>, fallback: HsnClassification) -> Self {
        Self { rules, fallback }
    }

    /// Classify a product description
    pub fn classify(&self, description: &str) -> HsnClassification {
        let description = description.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&description))
            .map(|rule| rule.classification.clone())
            .unwrap_or_else(|| self.fallback.clone())
    }
}
