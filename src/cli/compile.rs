//! Compile or check a unit

use super::CliError;
use crate::{Compilation, CompilationUnit, Diagnostics, SedDocument};

/// Options for the compile and check commands
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Compilation unit as JSON text
    pub input: Option<String>,
    /// Pretty-print the emitted document
    pub pretty: bool,
    /// Only finalize the changes, don't emit anything
    pub check_only: bool,
}

/// Result of a compile operation
#[derive(Debug)]
pub enum CompileOutcome {
    /// Every change finalized without error
    Valid { warnings: Vec<String> },
    /// The emitted document, as a value and as JSON text
    Compiled {
        document: SedDocument,
        json: String,
        warnings: Vec<String>,
    },
}

impl CompileOutcome {
    pub fn warnings(&self) -> &[String] {
        match self {
            CompileOutcome::Valid { warnings } | CompileOutcome::Compiled { warnings, .. } => {
                warnings
            }
        }
    }
}

/// Execute a compile or check operation
pub fn execute_compile(options: &CompileOptions) -> Result<CompileOutcome, CliError> {
    let text = options.input.as_ref().ok_or(CliError::NoInput)?;
    let unit = CompilationUnit::from_json(text)?;

    let mut diagnostics = Diagnostics::new();
    let mut loaded = unit.load(&mut diagnostics)?;

    let mut compilation = Compilation::with_diagnostics(&loaded.registry, diagnostics);

    if options.check_only {
        for definition in &loaded.models {
            compilation.finalize_model(definition)?;
        }
        for definition in loaded.repeated_tasks.iter_mut() {
            compilation.finalize_repeated_task(definition)?;
        }
        let warnings = compilation.into_diagnostics().warnings().to_vec();
        return Ok(CompileOutcome::Valid { warnings });
    }

    let document = compilation.compile(&loaded.models, &mut loaded.repeated_tasks)?;
    let json = if options.pretty {
        serde_json::to_string_pretty(&document)
    } else {
        serde_json::to_string(&document)
    }?;
    let warnings = compilation.into_diagnostics().warnings().to_vec();

    Ok(CompileOutcome::Compiled {
        document,
        json,
        warnings,
    })
}
