//! Compilation driver.
//!
//! Runs the two passes over every change list: finalize (checks for model
//! definitions, model binding for repeated tasks), then code generation.
//! Processing stops at the first error, which is also recorded in the
//! [`Diagnostics`] of the compilation.

use tracing::{debug, info, instrument};

use crate::{
    change::Change,
    diagnostics::Diagnostics,
    error::ChangeError,
    registry::Registry,
    sedml::{SedDocument, SedModel, SedRepeatedTask},
};

/// A model definition with the changes applied to it.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDefinition {
    pub id: String,
    pub source: String,
    changes: Vec<Change>,
}

impl ModelDefinition {
    pub fn new(id: impl Into<String>, source: impl Into<String>) -> Self {
        ModelDefinition {
            id: id.into(),
            source: source.into(),
            changes: Vec::new(),
        }
    }

    /// Adds a change and makes this model its owner.
    pub fn add_change(&mut self, mut change: Change) {
        change.set_model(self.id.clone());
        self.changes.push(change);
    }

    pub fn with_change(mut self, change: Change) -> Self {
        self.add_change(change);
        self
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }
}

/// A repeated task definition with its per-iteration changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepeatedTaskDefinition {
    pub id: String,
    pub subtasks: Vec<String>,
    pub reset_model: bool,
    pub changes: Vec<Change>,
}

impl RepeatedTaskDefinition {
    pub fn new(id: impl Into<String>, subtasks: Vec<String>) -> Self {
        RepeatedTaskDefinition {
            id: id.into(),
            subtasks,
            reset_model: false,
            changes: Vec::new(),
        }
    }

    pub fn with_change(mut self, change: Change) -> Self {
        self.changes.push(change);
        self
    }
}

/// One compilation over a registry.
pub struct Compilation<'r> {
    registry: &'r Registry,
    diagnostics: Diagnostics,
}

impl<'r> Compilation<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Compilation {
            registry,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Continues with diagnostics collected earlier, e.g. while loading.
    pub fn with_diagnostics(registry: &'r Registry, diagnostics: Diagnostics) -> Self {
        Compilation {
            registry,
            diagnostics,
        }
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    fn fail<T>(&mut self, error: ChangeError) -> Result<T, ChangeError> {
        self.diagnostics.report_error(error.clone(), 0);
        Err(error)
    }

    /// Checks every change of a model definition.
    pub fn finalize_model(&mut self, definition: &ModelDefinition) -> Result<(), ChangeError> {
        for change in &definition.changes {
            if let Err(error) = change.finalize_in_model(self.registry) {
                return self.fail(error);
            }
        }
        Ok(())
    }

    /// Binds the changes of a repeated task to the models its subtasks run.
    pub fn finalize_repeated_task(
        &mut self,
        definition: &mut RepeatedTaskDefinition,
    ) -> Result<(), ChangeError> {
        let registry = self.registry;
        let models = match registry.models_for_tasks(&definition.subtasks) {
            Ok(models) => models,
            Err(error) => return self.fail(error),
        };
        for change in &mut definition.changes {
            change.finalize_in_task(&models, &mut self.diagnostics);
        }
        Ok(())
    }

    #[instrument(skip(self, definition), fields(model = %definition.id))]
    pub fn compile_model(&mut self, definition: &ModelDefinition) -> Result<SedModel, ChangeError> {
        let mut sed_model = SedModel::new(definition.id.clone(), definition.source.clone());
        for change in &definition.changes {
            if let Err(error) = change.apply_to_model(self.registry, &mut sed_model) {
                return self.fail(error);
            }
        }
        debug!(changes = sed_model.changes.len(), "model compiled");
        Ok(sed_model)
    }

    #[instrument(skip(self, definition), fields(task = %definition.id))]
    pub fn compile_repeated_task(
        &mut self,
        definition: &RepeatedTaskDefinition,
    ) -> Result<SedRepeatedTask, ChangeError> {
        let mut repeated_task = SedRepeatedTask::new(definition.id.clone());
        repeated_task.reset_model = definition.reset_model;
        repeated_task.subtasks = definition.subtasks.clone();

        for change in &definition.changes {
            if let Err(error) = change.apply_to_repeated_task(
                self.registry,
                &mut repeated_task,
                &definition.subtasks,
                &mut self.diagnostics,
            ) {
                return self.fail(error);
            }
        }
        debug!(
            ranges = repeated_task.ranges.len(),
            task_changes = repeated_task.task_changes.len(),
            "repeated task compiled"
        );
        Ok(repeated_task)
    }

    /// Finalizes every change, then generates the document.
    #[instrument(skip_all)]
    pub fn compile(
        &mut self,
        models: &[ModelDefinition],
        repeated_tasks: &mut [RepeatedTaskDefinition],
    ) -> Result<SedDocument, ChangeError> {
        for definition in models {
            self.finalize_model(definition)?;
        }
        for definition in repeated_tasks.iter_mut() {
            self.finalize_repeated_task(definition)?;
        }

        let mut document = SedDocument::default();
        for definition in models {
            document.models.push(self.compile_model(definition)?);
        }
        for definition in repeated_tasks.iter() {
            document
                .repeated_tasks
                .push(self.compile_repeated_task(definition)?);
        }

        info!(
            models = document.models.len(),
            repeated_tasks = document.repeated_tasks.len(),
            warnings = self.diagnostics.warnings().len(),
            "compilation finished"
        );
        Ok(document)
    }
}
