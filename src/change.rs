//! # Changes
//!
//! A [`Change`] is one assignment or loop construct from an experiment
//! description: `S1 = 5`, `k1 = k2 * 2`, `k in uniform(0, 10, 5)`,
//! `k in logUniform(1, 1000, 4)` or `k in [1, 3, 7]`.
//!
//! Changes are built by the front end (or converted from nodes of an
//! already emitted document), collected into a model definition or a
//! repeated-task definition, optionally finalized once, then turned into
//! document nodes by exactly one code generation call:
//!
//! - **[model]** - changes applied directly to a model: `changeAttribute`
//!   and `computeChange` nodes
//! - **[task]** - changes applied per iteration of a repeated task: ranges
//!   and `setValue` nodes
//!
//! ## Variable paths
//!
//! The variable is a dotted path such as `S1`, `J0.k1` or `model1.S1`. A
//! single segment is either a model variable or a local helper that only
//! other changes refer to; which one is decided at code generation time by
//! whether the path resolves in a document.
//!
//! ## Constant folding
//!
//! A formula that parses to a bare number becomes a value assignment:
//!
//! ```
//! use simchange::change::{Change, ChangeType};
//!
//! let change = Change::from_formula(&["S1"], &["-2"]).unwrap();
//! assert_eq!(change.change_type(), ChangeType::ValueAssignment);
//! assert_eq!(change.values(), vec![-2.0]);
//! assert!(change.math().is_none());
//! ```
pub mod model;
pub mod task;

use std::fmt;

use tracing::debug;

use crate::{
    diagnostics::Diagnostics,
    error::ChangeError,
    math::{MathExpr, parse_formula},
    number::{join_numbers, number_to_text},
    sedml::{SedChange, SedParameter, SedRange, SedSetValue},
    xpath::id_from_xpath,
};

/// The closed set of change constructs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    /// `x = 5`
    ValueAssignment,
    /// `x = k * 2`
    FormulaAssignment,
    /// `x in uniform(start, end, points)`
    UniformLinearRange,
    /// `x in logUniform(start, end, points)`
    UniformLogRange,
    /// `x in [v1, v2, ...]`
    VectorRange,
}

impl ChangeType {
    /// Loop constructs drive a repeated task.
    pub fn is_loop(self) -> bool {
        match self {
            ChangeType::ValueAssignment | ChangeType::FormulaAssignment => false,
            ChangeType::UniformLinearRange
            | ChangeType::UniformLogRange
            | ChangeType::VectorRange => true,
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChangeType::ValueAssignment => "value assignment",
            ChangeType::FormulaAssignment => "formula assignment",
            ChangeType::UniformLinearRange => "uniform range",
            ChangeType::UniformLogRange => "log-uniform range",
            ChangeType::VectorRange => "vector range",
        };
        write!(f, "{}", name)
    }
}

/// Spacing of the points of a uniform range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeScale {
    Linear,
    Log,
}

impl RangeScale {
    /// Type tag used in range nodes and synthesized range ids.
    pub fn as_str(self) -> &'static str {
        match self {
            RangeScale::Linear => "linear",
            RangeScale::Log => "log",
        }
    }

    /// Case-insensitive match of a range type tag.
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("linear") {
            Some(RangeScale::Linear)
        } else if name.eq_ignore_ascii_case("log") {
            Some(RangeScale::Log)
        } else {
            None
        }
    }
}

/// Payload of a change.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeKind {
    /// Literal value
    Value(f64),

    /// Formula; the change is the only owner of the tree
    Formula(Box<MathExpr>),

    /// `points` is kept as given and truncated when a range node is built
    UniformRange {
        scale: RangeScale,
        start: f64,
        end: f64,
        points: f64,
    },

    /// Explicit list of values
    Vector(Vec<f64>),
}

impl ChangeKind {
    /// Formula payload, folded to a value when the tree is a bare number.
    fn from_math(math: MathExpr) -> Self {
        match math.number() {
            Some(value) => ChangeKind::Value(value),
            None => ChangeKind::Formula(Box::new(math)),
        }
    }
}

/// One assignment or loop construct.
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    variable: Vec<String>,
    kind: ChangeKind,
    /// Owning model; only set for changes that belong to a model definition
    model: Option<String>,
}

fn to_path<S: AsRef<str>>(name: &[S]) -> Vec<String> {
    name.iter().map(|s| s.as_ref().to_string()).collect()
}

fn expect_count(change_type: ChangeType, values: &[f64], expected: usize) -> Result<(), ChangeError> {
    if values.len() != expected {
        return Err(ChangeError::ValueCount {
            change_type,
            expected,
            found: values.len(),
        });
    }
    Ok(())
}

impl Change {
    pub fn new(variable: Vec<String>, kind: ChangeKind) -> Self {
        Change {
            variable,
            kind,
            model: None,
        }
    }

    /// Builds a change from a variable name and the tokens of its formula.
    ///
    /// The tokens are joined with spaces and parsed. A bare number becomes a
    /// [`ChangeType::ValueAssignment`], anything else a
    /// [`ChangeType::FormulaAssignment`].
    pub fn from_formula<N, T>(name: &[N], formula: &[T]) -> Result<Self, ChangeError>
    where
        N: AsRef<str>,
        T: AsRef<str>,
    {
        let text = formula
            .iter()
            .map(|t| t.as_ref())
            .collect::<Vec<_>>()
            .join(" ");
        let math = parse_formula(&text)?;
        Ok(Change::new(to_path(name), ChangeKind::from_math(math)))
    }

    /// Builds a value assignment or a range from a list of numbers.
    ///
    /// Value assignments take one value, uniform ranges take
    /// `start, end, points`, vector ranges take one or more values.
    /// Formula assignments cannot be built this way.
    pub fn with_values<N: AsRef<str>>(
        change_type: ChangeType,
        name: &[N],
        values: &[f64],
    ) -> Result<Self, ChangeError> {
        if change_type.is_loop() && name.is_empty() {
            return Err(ChangeError::MissingVariable(change_type));
        }

        let kind = match change_type {
            ChangeType::ValueAssignment => {
                expect_count(change_type, values, 1)?;
                ChangeKind::Value(values[0])
            }
            ChangeType::FormulaAssignment => {
                return Err(ChangeError::ValueCount {
                    change_type,
                    expected: 0,
                    found: values.len(),
                });
            }
            ChangeType::UniformLinearRange | ChangeType::UniformLogRange => {
                expect_count(change_type, values, 3)?;
                let scale = if change_type == ChangeType::UniformLogRange {
                    RangeScale::Log
                } else {
                    RangeScale::Linear
                };
                ChangeKind::UniformRange {
                    scale,
                    start: values[0],
                    end: values[1],
                    points: values[2],
                }
            }
            ChangeType::VectorRange => {
                if values.is_empty() {
                    return Err(ChangeError::EmptyRange(change_type));
                }
                ChangeKind::Vector(values.to_vec())
            }
        };
        Ok(Change::new(to_path(name), kind))
    }

    /// Converts a model change loaded from an existing document.
    ///
    /// Only `changeAttribute` and `computeChange` have a counterpart; other
    /// change types are skipped with a warning and yield `Ok(None)`.
    pub fn from_sed_change(
        change: &SedChange,
        diagnostics: &mut Diagnostics,
    ) -> Result<Option<Self>, ChangeError> {
        let variable = id_from_xpath(change.target());

        let kind = match change {
            SedChange::ChangeAttribute { new_value, .. } => {
                let value = new_value
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| ChangeError::InvalidNumber(new_value.clone()))?;
                ChangeKind::Value(value)
            }
            SedChange::ComputeChange { math, .. } => ChangeKind::Formula(Box::new(math.clone())),
            SedChange::AddXml { .. } | SedChange::RemoveXml { .. } | SedChange::ChangeXml { .. } => {
                diagnostics.warn(format!(
                    "Unable to translate '{}' changes yet; skipping the change to '{}'.",
                    change.type_name(),
                    change.target()
                ));
                return Ok(None);
            }
        };
        Ok(Some(Change::new(variable, kind)))
    }

    /// Converts a range loaded from an existing document.
    ///
    /// Unknown uniform range types fall back to linear with a warning.
    /// Functional ranges keep their math and get no variable; their targets
    /// come from the task's set-value nodes.
    pub fn from_range(range: &SedRange, diagnostics: &mut Diagnostics) -> Self {
        match range {
            SedRange::UniformRange {
                id,
                start,
                end,
                number_of_points,
                scale,
            } => {
                let scale = RangeScale::from_name(scale).unwrap_or_else(|| {
                    diagnostics.warn(format!(
                        "Unknown range type '{}'; assuming 'linear'.",
                        scale
                    ));
                    RangeScale::Linear
                });
                Change::new(
                    vec![id.clone()],
                    ChangeKind::UniformRange {
                        scale,
                        start: *start,
                        end: *end,
                        points: *number_of_points as f64,
                    },
                )
            }
            SedRange::VectorRange { id, values } => {
                Change::new(vec![id.clone()], ChangeKind::Vector(values.clone()))
            }
            SedRange::FunctionalRange { math, .. } => {
                Change::new(Vec::new(), ChangeKind::Formula(Box::new(math.clone())))
            }
        }
    }

    /// Converts a task parameter into a helper value assignment.
    pub fn from_parameter(parameter: &SedParameter) -> Self {
        Change::new(vec![parameter.id.clone()], ChangeKind::Value(parameter.value))
    }

    /// Converts a task's set-value node.
    ///
    /// The model reference becomes the first path segment, and a bare number
    /// folds into a value assignment.
    pub fn from_set_value(set_value: &SedSetValue) -> Self {
        let mut variable = id_from_xpath(&set_value.target);
        variable.insert(0, set_value.model_reference.clone());
        Change::new(variable, ChangeKind::from_math(set_value.math.clone()))
    }

    pub fn kind(&self) -> &ChangeKind {
        &self.kind
    }

    pub fn change_type(&self) -> ChangeType {
        match &self.kind {
            ChangeKind::Value(_) => ChangeType::ValueAssignment,
            ChangeKind::Formula(_) => ChangeType::FormulaAssignment,
            ChangeKind::UniformRange {
                scale: RangeScale::Linear,
                ..
            } => ChangeType::UniformLinearRange,
            ChangeKind::UniformRange {
                scale: RangeScale::Log,
                ..
            } => ChangeType::UniformLogRange,
            ChangeKind::Vector(_) => ChangeType::VectorRange,
        }
    }

    pub fn is_loop(&self) -> bool {
        self.change_type().is_loop()
    }

    /// Numbers carried by the change: one for a value assignment,
    /// `start, end, points` for uniform ranges, the list for vector ranges,
    /// none for formulas.
    pub fn values(&self) -> Vec<f64> {
        match &self.kind {
            ChangeKind::Value(value) => vec![*value],
            ChangeKind::Formula(_) => Vec::new(),
            ChangeKind::UniformRange {
                start, end, points, ..
            } => vec![*start, *end, *points],
            ChangeKind::Vector(values) => values.clone(),
        }
    }

    pub fn math(&self) -> Option<&MathExpr> {
        match &self.kind {
            ChangeKind::Formula(math) => Some(math.as_ref()),
            _ => None,
        }
    }

    /// Canonical formula text, derived from the tree.
    pub fn formula_text(&self) -> Option<String> {
        self.math().map(|math| math.to_string())
    }

    /// Replaces the payload with a newly parsed formula.
    ///
    /// Leaves the change untouched when the text does not parse.
    pub fn set_formula(&mut self, text: &str) -> Result<(), ChangeError> {
        let math = parse_formula(text)?;
        self.kind = ChangeKind::from_math(math);
        Ok(())
    }

    pub fn variable(&self) -> &[String] {
        &self.variable
    }

    pub fn set_variable(&mut self, variable: Vec<String>) {
        self.variable = variable;
    }

    /// Dotted form of the variable path.
    pub fn variable_name(&self) -> String {
        self.variable.join(".")
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn set_model(&mut self, model: impl Into<String>) {
        let model = model.into();
        debug!(variable = %self.variable_name(), %model, "change bound to model");
        self.model = Some(model);
    }

    fn first_segment(&self) -> &str {
        self.variable.first().map(String::as_str).unwrap_or_default()
    }

    fn last_segment(&self) -> &str {
        self.variable.last().map(String::as_str).unwrap_or_default()
    }

    /// Source form of the change, e.g. `S1 = 5` or `k in uniform(0, 10, 5)`.
    pub fn to_source_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.variable_name())?;
        match &self.kind {
            ChangeKind::Value(value) => write!(f, " = {}", number_to_text(*value)),
            ChangeKind::Formula(math) => write!(f, " = {}", math),
            ChangeKind::UniformRange {
                scale,
                start,
                end,
                points,
            } => {
                let function = match scale {
                    RangeScale::Linear => "uniform",
                    RangeScale::Log => "logUniform",
                };
                write!(f, " in {}({})", function, join_numbers(&[*start, *end, *points]))
            }
            ChangeKind::Vector(values) => write!(f, " in [{}]", join_numbers(values)),
        }
    }
}
