use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{document::ModelDocument, error::ChangeError};

/// A model known to the compilation unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub id: String,
    #[serde(default)]
    pub source: String,
    /// `None` when the model's source could not be loaded
    #[serde(default)]
    pub document: Option<ModelDocument>,
}

impl ModelEntry {
    pub fn new(id: impl Into<String>, document: ModelDocument) -> Self {
        ModelEntry {
            id: id.into(),
            source: String::new(),
            document: Some(document),
        }
    }
}

/// A task known to the compilation unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskEntry {
    /// Runs one model
    Simple { id: String, model: String },
    /// Repeats other tasks
    Repeated { id: String, subtasks: Vec<String> },
}

impl TaskEntry {
    pub fn id(&self) -> &str {
        match self {
            TaskEntry::Simple { id, .. } | TaskEntry::Repeated { id, .. } => id,
        }
    }
}

/// Symbol table for models and tasks.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    models: HashMap<String, ModelEntry>,
    tasks: HashMap<String, TaskEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_model(&mut self, model: ModelEntry) {
        self.models.insert(model.id.clone(), model);
    }

    pub fn add_task(&mut self, task: TaskEntry) {
        self.tasks.insert(task.id().to_string(), task);
    }

    pub fn model(&self, id: &str) -> Option<&ModelEntry> {
        self.models.get(id)
    }

    pub fn task(&self, id: &str) -> Option<&TaskEntry> {
        self.tasks.get(id)
    }

    /// The loaded document of model `id`.
    pub fn document(&self, id: &str) -> Result<&ModelDocument, ChangeError> {
        let model = self
            .model(id)
            .ok_or_else(|| ChangeError::ModelNotFound(id.to_string()))?;
        model
            .document
            .as_ref()
            .ok_or_else(|| ChangeError::MissingDocument(id.to_string()))
    }

    /// Models run by task `id`, following repeated tasks down to their
    /// subtasks. Declaration order, each model once.
    pub fn task_models(&self, id: &str) -> Result<Vec<&ModelEntry>, ChangeError> {
        let mut models = Vec::new();
        let mut visited = Vec::new();
        self.collect_task_models(id, &mut visited, &mut models)?;
        Ok(models)
    }

    /// Union of [`Registry::task_models`] over `tasks`, in order.
    pub fn models_for_tasks<S: AsRef<str>>(
        &self,
        tasks: &[S],
    ) -> Result<Vec<&ModelEntry>, ChangeError> {
        let mut models = Vec::new();
        let mut visited = Vec::new();
        for task in tasks {
            self.collect_task_models(task.as_ref(), &mut visited, &mut models)?;
        }
        Ok(models)
    }

    fn collect_task_models<'r>(
        &'r self,
        id: &str,
        visited: &mut Vec<String>,
        models: &mut Vec<&'r ModelEntry>,
    ) -> Result<(), ChangeError> {
        // Repeated tasks may share subtasks or, if malformed, loop
        if visited.iter().any(|v| v == id) {
            return Ok(());
        }
        visited.push(id.to_string());

        match self.task(id) {
            None => Err(ChangeError::TaskNotFound(id.to_string())),
            Some(TaskEntry::Simple { model, .. }) => {
                // A task naming an unknown model contributes nothing
                if let Some(entry) = self.model(model) {
                    if !models.iter().any(|m| m.id == entry.id) {
                        models.push(entry);
                    }
                }
                Ok(())
            }
            Some(TaskEntry::Repeated { subtasks, .. }) => {
                for subtask in subtasks {
                    self.collect_task_models(subtask, visited, models)?;
                }
                Ok(())
            }
        }
    }
}
