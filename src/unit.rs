//! JSON compilation units.
//!
//! A unit bundles everything one compilation needs: the model documents,
//! the tasks, and the change lists of model and repeated-task definitions.
//! Changes are written as statements, and nodes of an existing experiment
//! document can be imported alongside them.
//!
//! ```json
//! {
//!   "models": [{
//!     "id": "model1",
//!     "source": "oscillator.xml",
//!     "document": { "model": { "id": "osc", "elements": [
//!       { "kind": "parameter", "id": "k", "attributes": { "value": "1" } }
//!     ] } },
//!     "changes": [{ "target": "k", "value": 2.5 }]
//!   }],
//!   "tasks": [{ "id": "task1", "model": "model1" }],
//!   "repeatedTasks": [{
//!     "id": "repeat1",
//!     "subtasks": ["task1"],
//!     "changes": [{ "target": "k", "uniform": [0, 10, 5] }]
//!   }]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    change::{Change, ChangeType},
    compile::{ModelDefinition, RepeatedTaskDefinition},
    diagnostics::Diagnostics,
    document::ModelDocument,
    error::ChangeError,
    registry::{ModelEntry, Registry, TaskEntry},
    sedml::{SedChange, SedParameter, SedRange, SedSetValue},
};

/// Right-hand side of a change statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatementBody {
    /// `x = 5`
    Value(f64),
    /// `x = k * 2`
    Formula(String),
    /// `x in uniform(start, end, points)`
    Uniform(Vec<f64>),
    /// `x in logUniform(start, end, points)`
    LogUniform(Vec<f64>),
    /// `x in [v1, v2, ...]`
    Vector(Vec<f64>),
}

/// One change as written in a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeStatement {
    /// Dotted variable path, e.g. `S1` or `J0.k1`
    #[serde(default)]
    pub target: String,
    #[serde(flatten)]
    pub body: StatementBody,
}

impl ChangeStatement {
    pub fn to_change(&self) -> Result<Change, ChangeError> {
        let name: Vec<&str> = self.target.split('.').filter(|s| !s.is_empty()).collect();
        match &self.body {
            StatementBody::Value(value) => {
                Change::with_values(ChangeType::ValueAssignment, &name, &[*value])
            }
            StatementBody::Formula(formula) => Change::from_formula(&name, &[formula]),
            StatementBody::Uniform(values) => {
                Change::with_values(ChangeType::UniformLinearRange, &name, values)
            }
            StatementBody::LogUniform(values) => {
                Change::with_values(ChangeType::UniformLogRange, &name, values)
            }
            StatementBody::Vector(values) => {
                Change::with_values(ChangeType::VectorRange, &name, values)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitModel {
    pub id: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub document: Option<ModelDocument>,
    #[serde(default)]
    pub changes: Vec<ChangeStatement>,
    /// Changes imported from an existing experiment document
    #[serde(default)]
    pub sed_changes: Vec<SedChange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitTask {
    pub id: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitRepeatedTask {
    pub id: String,
    pub subtasks: Vec<String>,
    #[serde(default)]
    pub reset_model: bool,
    #[serde(default)]
    pub changes: Vec<ChangeStatement>,
    #[serde(default)]
    pub ranges: Vec<SedRange>,
    #[serde(default)]
    pub parameters: Vec<SedParameter>,
    #[serde(default)]
    pub set_values: Vec<SedSetValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilationUnit {
    #[serde(default)]
    pub models: Vec<UnitModel>,
    #[serde(default)]
    pub tasks: Vec<UnitTask>,
    #[serde(default)]
    pub repeated_tasks: Vec<UnitRepeatedTask>,
}

/// A unit turned into a registry and change lists, ready to compile.
#[derive(Debug, Clone, Default)]
pub struct LoadedUnit {
    pub registry: Registry,
    pub models: Vec<ModelDefinition>,
    pub repeated_tasks: Vec<RepeatedTaskDefinition>,
}

impl CompilationUnit {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Builds every change of the unit. Imported nodes come before the
    /// statements of the same definition.
    pub fn load(self, diagnostics: &mut Diagnostics) -> Result<LoadedUnit, ChangeError> {
        let mut loaded = LoadedUnit::default();

        for model in self.models {
            let mut definition = ModelDefinition::new(model.id.clone(), model.source.clone());
            for sed_change in &model.sed_changes {
                if let Some(change) = Change::from_sed_change(sed_change, diagnostics)? {
                    definition.add_change(change);
                }
            }
            for statement in &model.changes {
                definition.add_change(statement.to_change()?);
            }

            loaded.registry.add_model(ModelEntry {
                id: model.id,
                source: model.source,
                document: model.document,
            });
            loaded.models.push(definition);
        }

        for task in self.tasks {
            loaded.registry.add_task(TaskEntry::Simple {
                id: task.id,
                model: task.model,
            });
        }

        for repeated in self.repeated_tasks {
            let mut definition = RepeatedTaskDefinition::new(repeated.id.clone(), repeated.subtasks.clone());
            definition.reset_model = repeated.reset_model;

            for parameter in &repeated.parameters {
                definition.changes.push(Change::from_parameter(parameter));
            }
            for range in &repeated.ranges {
                definition.changes.push(Change::from_range(range, diagnostics));
            }
            for set_value in &repeated.set_values {
                definition.changes.push(Change::from_set_value(set_value));
            }
            for statement in &repeated.changes {
                definition.changes.push(statement.to_change()?);
            }

            loaded.registry.add_task(TaskEntry::Repeated {
                id: repeated.id,
                subtasks: repeated.subtasks,
            });
            loaded.repeated_tasks.push(definition);
        }

        Ok(loaded)
    }
}
