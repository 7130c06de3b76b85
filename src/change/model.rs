//! Changes that belong directly to a model definition.

use tracing::debug;

use super::{Change, ChangeKind};
use crate::{
    error::ChangeError,
    number::number_to_text,
    registry::Registry,
    sedml::SedModel,
    xpath::{attribute_location, element_location},
};

impl Change {
    fn owner(&self) -> &str {
        self.model.as_deref().unwrap_or_default()
    }

    fn unresolved(&self, model: &str) -> ChangeError {
        ChangeError::UnresolvedVariable {
            variable: self.variable_name(),
            model: model.to_string(),
        }
    }

    /// Emits this change into the model it belongs to.
    ///
    /// - value assignments become a `changeAttribute` on the resolved
    ///   attribute; an unresolved single-segment name is a local helper and
    ///   emits nothing, an unresolved qualified path is an error
    /// - formula assignments become a `computeChange` on the resolved
    ///   element; unresolved names are helpers
    /// - loops are rejected, they belong in a repeated task
    pub fn apply_to_model(
        &self,
        registry: &Registry,
        sed_model: &mut SedModel,
    ) -> Result<(), ChangeError> {
        let model_id = self.owner();
        let doc = registry.document(model_id)?;

        match &self.kind {
            ChangeKind::Value(value) => match attribute_location(&self.variable, doc) {
                Some(target) => {
                    let new_value = number_to_text(*value);
                    debug!(model = model_id, %target, %new_value, "changeAttribute");
                    sed_model.create_change_attribute(target, new_value);
                    Ok(())
                }
                None if self.variable.len() <= 1 => {
                    debug!(variable = %self.variable_name(), "local helper value, nothing emitted");
                    Ok(())
                }
                None => Err(self.unresolved(model_id)),
            },
            ChangeKind::UniformRange { .. } | ChangeKind::Vector(_) => Err(ChangeError::LoopInModel),
            ChangeKind::Formula(math) => match element_location(&self.variable, doc) {
                Some(target) => {
                    debug!(model = model_id, %target, %math, "computeChange");
                    sed_model.create_compute_change(target, math);
                    Ok(())
                }
                None => {
                    debug!(variable = %self.variable_name(), "local helper formula, nothing emitted");
                    Ok(())
                }
            },
        }
    }

    /// Checks a model-definition change before code generation.
    ///
    /// The owning model must exist and have a document, and a qualified
    /// path must resolve inside it.
    pub fn finalize_in_model(&self, registry: &Registry) -> Result<(), ChangeError> {
        let model_id = self.owner();
        let doc = registry.document(model_id)?;

        if self.variable.len() > 1 && element_location(&self.variable, doc).is_none() {
            return Err(self.unresolved(model_id));
        }
        Ok(())
    }
}
