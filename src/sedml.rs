//! Target experiment-document nodes.
//!
//! [`SedModel`] and [`SedRepeatedTask`] double as the builders that change
//! code generation writes into: each `create_*` call appends one node.
//! The node types are also what a previously emitted document is loaded
//! back as, see [`crate::change::Change::from_sed_change`] and friends.

use serde::{Deserialize, Serialize};

use crate::math::MathExpr;

/// A change applied to a model before simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SedChange {
    /// Sets one attribute to a literal value
    #[serde(rename_all = "camelCase")]
    ChangeAttribute { target: String, new_value: String },

    /// Sets a target to the result of a formula
    ComputeChange { target: String, math: MathExpr },

    /// XML-level edits; loaded for completeness, never generated
    #[serde(rename = "addXML")]
    AddXml { target: String },
    #[serde(rename = "removeXML")]
    RemoveXml { target: String },
    #[serde(rename = "changeXML")]
    ChangeXml { target: String },
}

impl SedChange {
    pub fn target(&self) -> &str {
        match self {
            SedChange::ChangeAttribute { target, .. }
            | SedChange::ComputeChange { target, .. }
            | SedChange::AddXml { target }
            | SedChange::RemoveXml { target }
            | SedChange::ChangeXml { target } => target,
        }
    }

    /// Element name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            SedChange::ChangeAttribute { .. } => "changeAttribute",
            SedChange::ComputeChange { .. } => "computeChange",
            SedChange::AddXml { .. } => "addXML",
            SedChange::RemoveXml { .. } => "removeXML",
            SedChange::ChangeXml { .. } => "changeXML",
        }
    }
}

/// A model as referenced by the experiment, with its pre-simulation changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SedModel {
    pub id: String,
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<SedChange>,
}

impl SedModel {
    pub fn new(id: impl Into<String>, source: impl Into<String>) -> Self {
        SedModel {
            id: id.into(),
            source: source.into(),
            changes: Vec::new(),
        }
    }

    pub fn create_change_attribute(&mut self, target: impl Into<String>, new_value: impl Into<String>) {
        self.changes.push(SedChange::ChangeAttribute {
            target: target.into(),
            new_value: new_value.into(),
        });
    }

    /// The builder keeps its own copy of `math`.
    pub fn create_compute_change(&mut self, target: impl Into<String>, math: &MathExpr) {
        self.changes.push(SedChange::ComputeChange {
            target: target.into(),
            math: math.clone(),
        });
    }
}

/// Range of values a repeated task iterates over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SedRange {
    #[serde(rename_all = "camelCase")]
    UniformRange {
        id: String,
        start: f64,
        end: f64,
        number_of_points: i64,
        /// `linear` or `log`; free text when loaded from a document
        scale: String,
    },
    VectorRange { id: String, values: Vec<f64> },
    FunctionalRange {
        id: String,
        #[serde(default)]
        range: Option<String>,
        math: MathExpr,
    },
}

impl SedRange {
    pub fn id(&self) -> &str {
        match self {
            SedRange::UniformRange { id, .. }
            | SedRange::VectorRange { id, .. }
            | SedRange::FunctionalRange { id, .. } => id,
        }
    }
}

/// Per-iteration change of a repeated task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SedSetValue {
    pub target: String,
    pub model_reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    pub math: MathExpr,
}

/// Named constant available to the math of a task change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SedParameter {
    pub id: String,
    pub value: f64,
}

/// A task repeated once per value of its driving range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SedRepeatedTask {
    pub id: String,
    /// Id of the driving range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default)]
    pub reset_model: bool,
    #[serde(default)]
    pub subtasks: Vec<String>,
    #[serde(default)]
    pub ranges: Vec<SedRange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub task_changes: Vec<SedSetValue>,
}

impl SedRepeatedTask {
    pub fn new(id: impl Into<String>) -> Self {
        SedRepeatedTask {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn create_uniform_range(
        &mut self,
        id: impl Into<String>,
        scale: impl Into<String>,
        start: f64,
        end: f64,
        number_of_points: i64,
    ) {
        self.ranges.push(SedRange::UniformRange {
            id: id.into(),
            start,
            end,
            number_of_points,
            scale: scale.into(),
        });
    }

    pub fn create_vector_range(&mut self, id: impl Into<String>, values: &[f64]) {
        self.ranges.push(SedRange::VectorRange {
            id: id.into(),
            values: values.to_vec(),
        });
    }

    pub fn create_set_value(&mut self, set_value: SedSetValue) {
        self.task_changes.push(set_value);
    }

    /// Makes `id` the range that drives the iteration.
    pub fn set_range_id(&mut self, id: impl Into<String>) {
        self.range = Some(id.into());
    }

    pub fn range(&self, id: &str) -> Option<&SedRange> {
        self.ranges.iter().find(|r| r.id() == id)
    }
}

/// The emitted experiment document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SedDocument {
    pub models: Vec<SedModel>,
    pub repeated_tasks: Vec<SedRepeatedTask>,
}

impl SedDocument {
    pub fn model(&self, id: &str) -> Option<&SedModel> {
        self.models.iter().find(|m| m.id == id)
    }

    pub fn repeated_task(&self, id: &str) -> Option<&SedRepeatedTask> {
        self.repeated_tasks.iter().find(|t| t.id == id)
    }
}
