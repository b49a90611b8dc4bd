//! Ordered substring classification of description fields.

use crate::constants::{exclusions, retailer};
use crate::table::Value;
use crate::types::ModuleName;

/// One ordered substring rule. Needles are stored lower-cased.
#[derive(Clone, Debug)]
pub struct Rule {
    needle: String,
    label: String,
}

impl Rule {
    /// Build a rule; the needle is lower-cased for case-insensitive matching.
    pub fn new(needle: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            needle: needle.into().to_lowercase(),
            label: label.into(),
        }
    }
}

/// Ordered substring classifier over a description field.
///
/// Rules are evaluated top-to-bottom against a lower-cased copy of the
/// input; the first match wins and a miss falls through to the default
/// label. Missing input coerces to the empty string, so classification
/// never fails and always yields a label from the closed set.
#[derive(Clone, Debug)]
pub struct Classifier {
    rules: Vec<Rule>,
    default_label: String,
}

impl Classifier {
    /// Build a classifier from ordered rules and a fall-through label.
    pub fn new(rules: Vec<Rule>, default_label: impl Into<String>) -> Self {
        Self {
            rules,
            default_label: default_label.into(),
        }
    }

    /// Production retailer rules: NPD Amazon feeds first, then any `.com`
    /// processing group, everything else brick-and-mortar.
    pub fn retailer() -> Self {
        Self::new(
            vec![
                Rule::new(retailer::AMAZON_NEEDLE, retailer::AMAZON),
                Rule::new(retailer::ECOM_NEEDLE, retailer::ECOM),
            ],
            retailer::BRICK_AND_MORTAR,
        )
    }

    /// Classify one description cell.
    pub fn classify(&self, value: &Value) -> &str {
        let text = value.as_str().unwrap_or("").to_lowercase();
        for rule in &self.rules {
            if text.contains(&rule.needle) {
                return &rule.label;
            }
        }
        &self.default_label
    }

    /// The closed set of labels this classifier can produce.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.rules.iter().map(|rule| rule.label.as_str()).collect();
        labels.push(&self.default_label);
        labels
    }
}

/// Leading segment of a `|`-separated item description, trimmed.
///
/// This is the category/module key used to stratify coverage sampling.
/// Missing descriptions yield an empty module name.
pub fn module_of(value: &Value) -> ModuleName {
    value
        .as_str()
        .unwrap_or("")
        .split(exclusions::MODULE_SEPARATOR)
        .next()
        .unwrap_or("")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> Value {
        Value::Text(value.to_string())
    }

    #[test]
    fn retailer_rules_match_case_insensitively_in_order() {
        let classifier = Classifier::retailer();
        assert_eq!(classifier.classify(&text("NPD Amazon (US) weekly")), "Amazon");
        assert_eq!(classifier.classify(&text("CHEWY.COM feed")), "Ecom");
        assert_eq!(classifier.classify(&text("KROGER STORES")), "B&M");
    }

    #[test]
    fn amazon_rule_wins_over_ecom_rule() {
        let classifier = Classifier::retailer();
        // An Amazon feed description also containing ".com" stays Amazon.
        assert_eq!(
            classifier.classify(&text("npd amazon (us) via amazon.com")),
            "Amazon"
        );
    }

    #[test]
    fn missing_input_falls_through_to_default() {
        let classifier = Classifier::retailer();
        assert_eq!(classifier.classify(&Value::Null), "B&M");
        assert_eq!(classifier.classify(&Value::Number(7.0)), "B&M");
    }

    #[test]
    fn classification_is_pure_and_closed() {
        let classifier = Classifier::retailer();
        let labels = classifier.labels();
        for input in ["npd amazon (us)", "shop.com", "corner store", ""] {
            let first = classifier.classify(&text(input)).to_string();
            let second = classifier.classify(&text(input)).to_string();
            assert_eq!(first, second);
            assert!(labels.contains(&first.as_str()));
        }
    }

    #[test]
    fn module_of_takes_leading_segment() {
        assert_eq!(module_of(&text("DOG FOOD WET|CANNED|12OZ")), "DOG FOOD WET");
        assert_eq!(module_of(&text(" BEER ")), "BEER");
        assert_eq!(module_of(&Value::Null), "");
    }
}
