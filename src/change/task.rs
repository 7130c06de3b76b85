//! Changes that belong to a repeated task.
//!
//! A repeated task can run several models, so a variable is looked up in
//! every model its subtasks use. A path whose first segment names a model
//! (`model1.k`) is looked up in that model only.

use tracing::debug;

use super::{Change, ChangeKind};
use crate::{
    diagnostics::Diagnostics,
    error::ChangeError,
    math::MathExpr,
    registry::{ModelEntry, Registry},
    sedml::{SedRepeatedTask, SedSetValue},
    xpath::element_location,
};

/// Where a task-level change lands.
#[derive(Debug, Default)]
struct Resolution {
    /// Element location; `None` for local helpers
    target: Option<String>,
    model_reference: String,
}

impl Change {
    /// Looks the variable up among `candidates`, or in the model named by
    /// the first path segment.
    ///
    /// Candidates are tried in order and the first that resolves wins.
    /// Further matches only produce a warning.
    fn resolve_in_task(
        &self,
        registry: &Registry,
        candidates: &[&ModelEntry],
        diagnostics: &mut Diagnostics,
    ) -> Resolution {
        if self.variable.len() > 1 {
            if let Some(model) = registry.model(&self.variable[0]) {
                if let Some(doc) = &model.document {
                    return Resolution {
                        target: element_location(&self.variable[1..], doc),
                        model_reference: model.id.clone(),
                    };
                }
            }
        }

        let matches: Vec<(&str, String)> = candidates
            .iter()
            .filter_map(|model| {
                let doc = model.document.as_ref()?;
                element_location(&self.variable, doc).map(|target| (model.id.as_str(), target))
            })
            .collect();

        match matches.as_slice() {
            [] => Resolution::default(),
            [(model, target), ..] => {
                let ids: Vec<&str> = matches.iter().map(|(id, _)| *id).collect();
                self.warn_if_ambiguous(&ids, diagnostics);
                Resolution {
                    target: Some(target.clone()),
                    model_reference: model.to_string(),
                }
            }
        }
    }

    /// Warns when more than one model resolves the variable; the first of
    /// `models` is the one used.
    fn warn_if_ambiguous(&self, models: &[&str], diagnostics: &mut Diagnostics) {
        if let [chosen, _, ..] = models {
            diagnostics.warn(format!(
                "The variable '{}' was found in more than one model ({}); using '{}'.",
                self.variable_name(),
                models.join(", "),
                chosen
            ));
        }
    }

    /// Id for a range built from this change: the variable itself when it is
    /// a local name, otherwise `prefix` plus the last path segment so the
    /// range cannot collide with a user-chosen id.
    fn range_id(&self, prefix: &str, resolution: &Resolution) -> String {
        match resolution.target {
            Some(_) => format!("{}{}", prefix, self.last_segment()),
            None => self.first_segment().to_string(),
        }
    }

    /// Makes `range_id` drive the task and, for model variables, adds the
    /// set-value that feeds the range into the model.
    fn drive_task(&self, repeated_task: &mut SedRepeatedTask, range_id: String, resolution: Resolution) {
        repeated_task.set_range_id(range_id.clone());

        if let Some(target) = resolution.target {
            debug!(task = %repeated_task.id, %target, range = %range_id, "setValue from range");
            repeated_task.create_set_value(SedSetValue {
                target,
                model_reference: resolution.model_reference,
                range: Some(range_id.clone()),
                math: MathExpr::Name(range_id),
            });
        }
    }

    /// Emits this change into a repeated task that runs `tasks`.
    ///
    /// - value and formula assignments become a `setValue` when the variable
    ///   resolves, and are local helpers otherwise
    /// - uniform and vector loops become a range that drives the task, plus
    ///   a `setValue` pointing the model variable at it when the variable
    ///   resolves
    pub fn apply_to_repeated_task<S: AsRef<str>>(
        &self,
        registry: &Registry,
        repeated_task: &mut SedRepeatedTask,
        tasks: &[S],
        diagnostics: &mut Diagnostics,
    ) -> Result<(), ChangeError> {
        let candidates = registry.models_for_tasks(tasks)?;
        let resolution = self.resolve_in_task(registry, &candidates, diagnostics);

        match &self.kind {
            ChangeKind::Value(value) => match resolution.target {
                Some(target) => {
                    debug!(task = %repeated_task.id, %target, value, "setValue");
                    repeated_task.create_set_value(SedSetValue {
                        target,
                        model_reference: resolution.model_reference,
                        range: None,
                        math: MathExpr::Number(*value),
                    });
                }
                None => {
                    debug!(variable = %self.variable_name(), "local helper value, nothing emitted");
                }
            },
            ChangeKind::UniformRange {
                scale,
                start,
                end,
                points,
            } => {
                let prefix = format!("uniform_{}_for_", scale.as_str());
                let range_id = self.range_id(&prefix, &resolution);
                debug!(task = %repeated_task.id, range = %range_id, scale = scale.as_str(), "uniformRange");
                repeated_task.create_uniform_range(
                    range_id.clone(),
                    scale.as_str(),
                    *start,
                    *end,
                    *points as i64,
                );
                self.drive_task(repeated_task, range_id, resolution);
            }
            ChangeKind::Vector(values) => {
                let range_id = self.range_id("vector_for_", &resolution);
                debug!(task = %repeated_task.id, range = %range_id, len = values.len(), "vectorRange");
                repeated_task.create_vector_range(range_id.clone(), values);
                self.drive_task(repeated_task, range_id, resolution);
            }
            ChangeKind::Formula(math) => match resolution.target {
                Some(target) => {
                    debug!(task = %repeated_task.id, %target, %math, "setValue");
                    repeated_task.create_set_value(SedSetValue {
                        target,
                        model_reference: resolution.model_reference,
                        range: None,
                        math: math.as_ref().clone(),
                    });
                }
                None => {
                    debug!(variable = %self.variable_name(), "local helper formula, nothing emitted");
                }
            },
        }
        Ok(())
    }

    /// Binds a bare variable to the first of `models` that contains it by
    /// prepending that model's id to the path. Returns whether it did.
    ///
    /// A path whose first segment is already one of `models` is left alone,
    /// so calling this again is a no-op. Finding nothing is fine: the
    /// variable is then a local helper. Finding it in several models binds
    /// the first and warns.
    pub fn finalize_in_task(&mut self, models: &[&ModelEntry], diagnostics: &mut Diagnostics) -> bool {
        if self.variable.len() > 1 && models.iter().any(|m| m.id == self.variable[0]) {
            return false;
        }

        let matches: Vec<&str> = models
            .iter()
            .filter(|model| {
                model
                    .document
                    .as_ref()
                    .is_some_and(|doc| doc.model.is_some() && element_location(&self.variable, doc).is_some())
            })
            .map(|model| model.id.as_str())
            .collect();

        let Some(chosen) = matches.first() else {
            return false;
        };
        self.warn_if_ambiguous(&matches, diagnostics);

        debug!(variable = %self.variable_name(), model = %chosen, "variable bound to model");
        self.variable.insert(0, chosen.to_string());
        true
    }
}
