//! Conversion rules pairing a model attribute with a view element.

use std::fmt;
use std::sync::Arc;

use crate::document::AttributeName;
use crate::error::{Error, Result};
use crate::view::ViewElement;

type Producer = Arc<dyn Fn(&str) -> ViewElement + Send + Sync>;
type Extractor = Arc<dyn Fn(&ViewElement) -> Option<String> + Send + Sync>;

/// Binds one attribute to its view representation in both directions.
///
/// Downcast builds an empty wrapping element from the attribute value; the
/// converter fills in the children. Upcast recognizes an element by name and
/// required params, then extracts the value.
#[derive(Clone)]
pub struct ConversionRule {
    attribute: AttributeName,
    element: String,
    required_params: Vec<String>,
    producer: Producer,
    extractor: Extractor,
}

impl ConversionRule {
    /// Rule with custom producer and extractor.
    ///
    /// The extractor only runs on elements that already passed the name and
    /// required-param check; returning `None` still rejects the element.
    pub fn new<V, M>(
        attribute: impl Into<AttributeName>,
        element: impl Into<String>,
        required_params: Vec<String>,
        producer: V,
        extractor: M,
    ) -> Self
    where
        V: Fn(&str) -> ViewElement + Send + Sync + 'static,
        M: Fn(&ViewElement) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            attribute: attribute.into(),
            element: element.into(),
            required_params,
            producer: Arc::new(producer),
            extractor: Arc::new(extractor),
        }
    }

    /// The common shape: `<element param="value">`.
    pub fn attribute_to_element(
        attribute: impl Into<AttributeName>,
        element: impl Into<String>,
        param: impl Into<String>,
    ) -> Self {
        let element = element.into();
        let param = param.into();
        let view_element = element.clone();
        let view_param = param.clone();
        let model_param = param.clone();
        Self::new(
            attribute,
            element,
            vec![param],
            move |value| ViewElement::new(view_element.clone()).with_param(view_param.clone(), value),
            move |view| view.param(&model_param).map(ToString::to_string),
        )
    }

    /// `abbreviation` ↔ `<abbr title="...">`.
    pub fn abbreviation() -> Self {
        Self::attribute_to_element("abbreviation", "abbr", "title")
    }

    /// Parse `NAME=ELEMENT:PARAM` into an [`attribute_to_element`] rule.
    ///
    /// [`attribute_to_element`]: Self::attribute_to_element
    pub fn parse_spec(spec: &str) -> Result<Self> {
        let invalid = || Error::InvalidRule(spec.to_string());
        let (attribute, view) = spec.split_once('=').ok_or_else(invalid)?;
        let (element, param) = view.split_once(':').ok_or_else(invalid)?;
        let (attribute, element, param) = (attribute.trim(), element.trim(), param.trim());
        if attribute.is_empty() || !is_markup_name(element) || !is_markup_name(param) {
            return Err(invalid());
        }
        Ok(Self::attribute_to_element(attribute, element, param))
    }

    pub const fn attribute(&self) -> &AttributeName {
        &self.attribute
    }

    pub fn element(&self) -> &str {
        &self.element
    }

    pub fn required_params(&self) -> &[String] {
        &self.required_params
    }

    /// Build the wrapping element for `value`.
    pub fn view_for(&self, value: &str) -> ViewElement {
        (self.producer)(value)
    }

    /// Would both rules recognize exactly the same elements?
    pub fn same_markup(&self, other: &Self) -> bool {
        let mut ours: Vec<String> = self
            .required_params
            .iter()
            .map(|param| param.to_ascii_lowercase())
            .collect();
        let mut theirs: Vec<String> = other
            .required_params
            .iter()
            .map(|param| param.to_ascii_lowercase())
            .collect();
        ours.sort();
        ours.dedup();
        theirs.sort();
        theirs.dedup();
        self.element.eq_ignore_ascii_case(&other.element) && ours == theirs
    }

    /// Does `element` have this rule's name and every required param?
    pub fn matches(&self, element: &ViewElement) -> bool {
        element.name().eq_ignore_ascii_case(&self.element)
            && self
                .required_params
                .iter()
                .all(|param| element.param(param).is_some())
    }

    /// Extract the attribute value from a recognized element.
    pub fn extract(&self, element: &ViewElement) -> Option<String> {
        if self.matches(element) {
            (self.extractor)(element)
        } else {
            None
        }
    }
}

/// `[A-Za-z][A-Za-z0-9_-]*`: names the serializer writes back unchanged.
fn is_markup_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|first| first.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl fmt::Debug for ConversionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionRule")
            .field("attribute", &self.attribute)
            .field("element", &self.element)
            .field("required_params", &self.required_params)
            .finish_non_exhaustive()
    }
}
