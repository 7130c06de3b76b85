//! Print the changes of a unit in source form

use super::CliError;
use crate::{CompilationUnit, Diagnostics};

/// One line per change, prefixed with the id of the definition it belongs
/// to, e.g. `model1: S1 = 5` or `repeat1: k in uniform(0, 10, 5)`.
pub fn render_sources(input: &str) -> Result<Vec<String>, CliError> {
    let unit = CompilationUnit::from_json(input)?;
    let mut diagnostics = Diagnostics::new();
    let loaded = unit.load(&mut diagnostics)?;

    let model_lines = loaded.models.iter().flat_map(|definition| {
        definition
            .changes()
            .iter()
            .map(move |change| format!("{}: {}", definition.id, change))
    });
    let task_lines = loaded.repeated_tasks.iter().flat_map(|definition| {
        definition
            .changes
            .iter()
            .map(move |change| format!("{}: {}", definition.id, change))
    });

    Ok(model_lines.chain(task_lines).collect())
}
