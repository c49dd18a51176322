//! Registry binding attributes to conversion rules.

use std::collections::HashMap;

use super::rule::ConversionRule;
use crate::document::AttributeName;
use crate::error::{Error, Result};
use crate::view::ViewElement;

/// One rule per attribute, kept in registration order.
///
/// Registration order is the nesting order of downcast (first registered is
/// innermost) and the lookup order of upcast.
#[derive(Debug, Clone, Default)]
pub struct ConversionRegistry {
    rules: Vec<ConversionRule>,
    by_attribute: HashMap<AttributeName, usize>,
}

impl ConversionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule.
    ///
    /// Fails if the attribute already has a rule, or if another rule already
    /// recognizes the same element with the same required params.
    pub fn register(&mut self, rule: ConversionRule) -> Result<()> {
        let attribute = rule.attribute().clone();
        if self.by_attribute.contains_key(&attribute) {
            return Err(Error::DuplicateAttribute(attribute));
        }
        if let Some(existing) = self.rules.iter().find(|other| other.same_markup(&rule)) {
            return Err(Error::AmbiguousRule {
                attribute,
                existing: existing.attribute().clone(),
            });
        }
        tracing::debug!(
            attribute = %attribute,
            element = rule.element(),
            "registered conversion rule"
        );
        self.by_attribute.insert(attribute, self.rules.len());
        self.rules.push(rule);
        Ok(())
    }

    /// Rule for downcasting `name`.
    pub fn rule_for(&self, name: &str) -> Option<&ConversionRule> {
        self.by_attribute.get(name).map(|&index| &self.rules[index])
    }

    /// Registration index of the rule for `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.by_attribute.get(name).copied()
    }

    /// First rule, in registration order, recognizing `element`.
    pub fn rule_matching(&self, element: &ViewElement) -> Option<&ConversionRule> {
        self.rules.iter().find(|rule| rule.matches(element))
    }

    pub fn rules(&self) -> &[ConversionRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
