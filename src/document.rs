//! Model documents that changes are resolved against.
//!
//! A document mirrors the parts of an SBML model that a change can address:
//! a root model element holding compartments, species, parameters and
//! reactions, where reactions may own local parameters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A loaded model document.
///
/// The root model element is optional: a document that failed to load its
/// model still exists, but nothing resolves against it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelDocument {
    #[serde(default)]
    pub model: Option<ModelElement>,
}

impl ModelDocument {
    pub fn new(model: ModelElement) -> Self {
        ModelDocument { model: Some(model) }
    }

    pub fn empty() -> Self {
        ModelDocument { model: None }
    }
}

/// Root model element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelElement {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl ModelElement {
    pub fn new(id: impl Into<String>) -> Self {
        ModelElement {
            id: id.into(),
            elements: Vec::new(),
        }
    }

    pub fn with(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }
}

/// Kind of an addressable model element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    Compartment,
    Species,
    Parameter,
    Reaction,
    LocalParameter,
}

impl ElementKind {
    /// Element tag name.
    pub fn tag(self) -> &'static str {
        match self {
            ElementKind::Compartment => "compartment",
            ElementKind::Species => "species",
            ElementKind::Parameter => "parameter",
            ElementKind::Reaction => "reaction",
            ElementKind::LocalParameter => "localParameter",
        }
    }

    /// Path from the parent element down to the list holding this kind.
    pub fn container(self) -> &'static str {
        match self {
            ElementKind::Compartment => "sbml:listOfCompartments",
            ElementKind::Species => "sbml:listOfSpecies",
            ElementKind::Parameter => "sbml:listOfParameters",
            ElementKind::Reaction => "sbml:listOfReactions",
            ElementKind::LocalParameter => "sbml:kineticLaw/sbml:listOfLocalParameters",
        }
    }
}

/// An addressable element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub kind: ElementKind,
    pub id: String,
    /// Declared attributes and their current text
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(kind: ElementKind, id: impl Into<String>) -> Self {
        Element {
            kind,
            id: id.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn compartment(id: impl Into<String>) -> Self {
        Element::new(ElementKind::Compartment, id)
    }

    pub fn species(id: impl Into<String>) -> Self {
        Element::new(ElementKind::Species, id)
    }

    pub fn parameter(id: impl Into<String>) -> Self {
        Element::new(ElementKind::Parameter, id)
    }

    pub fn reaction(id: impl Into<String>) -> Self {
        Element::new(ElementKind::Reaction, id)
    }

    pub fn local_parameter(id: impl Into<String>) -> Self {
        Element::new(ElementKind::LocalParameter, id)
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn child(&self, id: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.id == id)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Attribute that holds the element's numeric value, if it has one.
    ///
    /// Species use `initialAmount` only when it is declared and
    /// `initialConcentration` is not.
    pub fn value_attribute(&self) -> Option<&'static str> {
        match self.kind {
            ElementKind::Compartment => Some("size"),
            ElementKind::Species => {
                if self.has_attribute("initialAmount")
                    && !self.has_attribute("initialConcentration")
                {
                    Some("initialAmount")
                } else {
                    Some("initialConcentration")
                }
            }
            ElementKind::Parameter | ElementKind::LocalParameter => Some("value"),
            ElementKind::Reaction => None,
        }
    }
}

/// Attribute names that only ever hold an element's value.
pub const VALUE_ATTRIBUTES: [&str; 4] = ["size", "initialConcentration", "initialAmount", "value"];
