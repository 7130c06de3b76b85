#![allow(dead_code)]

use simchange::{
    Element, ModelDocument, ModelElement, ModelEntry, Registry, TaskEntry,
};

pub const S1: &str = "/sbml:sbml/sbml:model/sbml:listOfSpecies/sbml:species[@id='S1']";
pub const K: &str = "/sbml:sbml/sbml:model/sbml:listOfParameters/sbml:parameter[@id='k']";
pub const P: &str = "/sbml:sbml/sbml:model/sbml:listOfParameters/sbml:parameter[@id='p']";
pub const K1: &str = "/sbml:sbml/sbml:model/sbml:listOfReactions/sbml:reaction[@id='J0']/sbml:kineticLaw/sbml:listOfLocalParameters/sbml:localParameter[@id='k1']";

/// Compartment C, species S1 (with an extra attribute `x`), parameter k,
/// reaction J0 with local parameter k1.
pub fn oscillator() -> ModelDocument {
    ModelDocument::new(
        ModelElement::new("oscillator")
            .with(Element::compartment("C").with_attribute("size", "1"))
            .with(
                Element::species("S1")
                    .with_attribute("initialConcentration", "1")
                    .with_attribute("x", "3"),
            )
            .with(Element::species("S2").with_attribute("initialAmount", "10"))
            .with(Element::parameter("k").with_attribute("value", "1"))
            .with(
                Element::reaction("J0")
                    .with_child(Element::local_parameter("k1").with_attribute("value", "0.5")),
            ),
    )
}

/// Parameters k and p.
pub fn decay() -> ModelDocument {
    ModelDocument::new(
        ModelElement::new("decay")
            .with(Element::parameter("k").with_attribute("value", "2"))
            .with(Element::parameter("p").with_attribute("value", "4")),
    )
}

/// model1 (oscillator) run by task1, model2 (decay) run by task2.
pub fn registry() -> Registry {
    let mut registry = Registry::new();
    registry.add_model(ModelEntry::new("model1", oscillator()));
    registry.add_model(ModelEntry::new("model2", decay()));
    registry.add_task(TaskEntry::Simple {
        id: "task1".to_string(),
        model: "model1".to_string(),
    });
    registry.add_task(TaskEntry::Simple {
        id: "task2".to_string(),
        model: "model2".to_string(),
    });
    registry
}

pub fn attr(element: &str, attribute: &str) -> String {
    format!("{}/@{}", element, attribute)
}
