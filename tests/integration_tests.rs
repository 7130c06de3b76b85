mod common;

use common::{K, S1, attr};
use serde_json::{Value, json};
use simchange::cli::{self, CliError, CompileOptions, CompileOutcome};
use simchange::{ChangeError, SedDocument};

fn oscillator_json() -> Value {
    json!({
        "model": {
            "id": "oscillator",
            "elements": [
                { "kind": "species", "id": "S1", "attributes": { "initialConcentration": "1", "x": "3" } },
                { "kind": "parameter", "id": "k", "attributes": { "value": "1" } },
                { "kind": "reaction", "id": "J0", "children": [
                    { "kind": "localParameter", "id": "k1", "attributes": { "value": "0.5" } }
                ] }
            ]
        }
    })
}

fn unit(model_changes: Value, task_changes: Value) -> String {
    json!({
        "models": [{
            "id": "model1",
            "source": "oscillator.xml",
            "document": oscillator_json(),
            "changes": model_changes
        }],
        "tasks": [{ "id": "task1", "model": "model1" }],
        "repeatedTasks": [{
            "id": "repeat1",
            "subtasks": ["task1"],
            "resetModel": true,
            "changes": task_changes
        }]
    })
    .to_string()
}

fn compile(input: String) -> Result<CompileOutcome, CliError> {
    cli::execute_compile(&CompileOptions {
        input: Some(input),
        pretty: false,
        check_only: false,
    })
}

fn compiled(input: String) -> (SedDocument, Value, Vec<String>) {
    match compile(input).unwrap() {
        CompileOutcome::Compiled {
            document,
            json,
            warnings,
        } => (document, serde_json::from_str(&json).unwrap(), warnings),
        other => panic!("Expected a compiled document, got {:?}", other),
    }
}

// ============================================================================
// Compile
// ============================================================================

#[test]
fn test_model_and_task_changes() {
    let input = unit(
        json!([
            { "target": "S1.x", "value": 5 },
            { "target": "J0.k1", "formula": "k * 2" },
            { "target": "helper", "value": 1 }
        ]),
        json!([{ "target": "k", "uniform": [0, 10, 5] }]),
    );
    let (document, output, warnings) = compiled(input);
    assert!(warnings.is_empty());

    let model = &output["models"][0];
    assert_eq!(model["id"], "model1");
    assert_eq!(model["source"], "oscillator.xml");
    assert_eq!(model["changes"].as_array().unwrap().len(), 2);
    assert_eq!(model["changes"][0]["type"], "changeAttribute");
    assert_eq!(model["changes"][0]["target"], attr(S1, "x"));
    assert_eq!(model["changes"][0]["newValue"], "5");
    assert_eq!(model["changes"][1]["type"], "computeChange");
    assert_eq!(model["changes"][1]["math"], "k * 2");

    let task = &output["repeatedTasks"][0];
    assert_eq!(task["range"], "uniform_linear_for_k");
    assert_eq!(task["resetModel"], true);
    assert_eq!(task["ranges"][0]["type"], "uniformRange");
    assert_eq!(task["ranges"][0]["numberOfPoints"], 5);
    assert_eq!(task["ranges"][0]["scale"], "linear");
    assert_eq!(task["taskChanges"][0]["target"], K);
    assert_eq!(task["taskChanges"][0]["modelReference"], "model1");
    assert_eq!(task["taskChanges"][0]["math"], "uniform_linear_for_k");

    let reparsed: SedDocument = serde_json::from_value(output).unwrap();
    assert_eq!(reparsed, document);
}

#[test]
fn test_local_range_drives_task() {
    let input = unit(json!([]), json!([{ "target": "q", "vector": [1, 2, 3] }]));
    let (document, _, _) = compiled(input);

    let task = document.repeated_task("repeat1").unwrap();
    assert_eq!(task.range.as_deref(), Some("q"));
    assert!(task.task_changes.is_empty());
    assert!(document.model("model1").unwrap().changes.is_empty());
}

#[test]
fn test_imported_nodes() {
    let input = json!({
        "models": [{
            "id": "model1",
            "document": oscillator_json(),
            "sedChanges": [
                { "type": "changeAttribute", "target": attr(S1, "initialConcentration"), "newValue": "2" },
                { "type": "addXML", "target": K }
            ]
        }],
        "tasks": [{ "id": "task1", "model": "model1" }],
        "repeatedTasks": [{
            "id": "repeat1",
            "subtasks": ["task1"],
            "ranges": [
                { "type": "uniformRange", "id": "r1", "start": 0, "end": 1, "numberOfPoints": 3, "scale": "weird" }
            ],
            "setValues": [
                { "target": K, "modelReference": "model1", "range": "r1", "math": "r1" }
            ]
        }]
    })
    .to_string();

    let (document, _, warnings) = compiled(input);
    assert_eq!(warnings.len(), 2);
    assert!(warnings[0].contains("addXML"));
    assert_eq!(warnings[1], "Unknown range type 'weird'; assuming 'linear'.");

    let model = document.model("model1").unwrap();
    assert_eq!(model.changes.len(), 1);
    assert_eq!(model.changes[0].target(), attr(S1, "initialConcentration"));

    let task = document.repeated_task("repeat1").unwrap();
    assert_eq!(task.range.as_deref(), Some("r1"));
    assert_eq!(task.ranges[0].id(), "r1");
    assert_eq!(task.task_changes.len(), 1);
    assert_eq!(task.task_changes[0].target, K);
    assert_eq!(task.task_changes[0].math.to_string(), "r1");
}

#[test]
fn test_pretty_output() {
    let outcome = cli::execute_compile(&CompileOptions {
        input: Some(unit(json!([{ "target": "k", "value": 2 }]), json!([]))),
        pretty: true,
        check_only: false,
    })
    .unwrap();
    match outcome {
        CompileOutcome::Compiled { json, .. } => assert!(json.contains('\n')),
        other => panic!("Expected a compiled document, got {:?}", other),
    }
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_loop_in_model_fails() {
    let input = unit(json!([{ "target": "k", "uniform": [0, 10, 5] }]), json!([]));
    match compile(input) {
        Err(CliError::Change(ChangeError::LoopInModel)) => {}
        other => panic!("Expected LoopInModel, got {:?}", other),
    }
}

#[test]
fn test_unresolved_path_fails() {
    let input = unit(json!([{ "target": "S1.nothing", "value": 1 }]), json!([]));
    match compile(input) {
        Err(CliError::Change(ChangeError::UnresolvedVariable { variable, model })) => {
            assert_eq!(variable, "S1.nothing");
            assert_eq!(model, "model1");
        }
        other => panic!("Expected UnresolvedVariable, got {:?}", other),
    }
}

#[test]
fn test_bad_statement_fails_to_load() {
    let input = unit(json!([]), json!([{ "target": "k", "uniform": [0, 10] }]));
    assert!(matches!(
        compile(input),
        Err(CliError::Change(ChangeError::ValueCount { .. }))
    ));

    let input = unit(json!([]), json!([{ "target": "q", "vector": [] }]));
    assert!(matches!(
        compile(input),
        Err(CliError::Change(ChangeError::EmptyRange(_)))
    ));

    let input = unit(json!([{ "target": "k", "formula": "k *" }]), json!([]));
    assert!(matches!(
        compile(input),
        Err(CliError::Change(ChangeError::Formula(_)))
    ));
}

#[test]
fn test_invalid_json() {
    assert!(matches!(compile("{ not json".to_string()), Err(CliError::Json(_))));
}

#[test]
fn test_no_input() {
    let result = cli::execute_compile(&CompileOptions::default());
    assert!(matches!(result, Err(CliError::NoInput)));
}

// ============================================================================
// Check
// ============================================================================

#[test]
fn test_check_only() {
    let options = CompileOptions {
        input: Some(unit(
            json!([{ "target": "S1", "value": 5 }]),
            json!([{ "target": "k", "logUniform": [1, 100, 3] }]),
        )),
        pretty: false,
        check_only: true,
    };
    let outcome = cli::execute_compile(&options).unwrap();
    assert!(matches!(outcome, CompileOutcome::Valid { .. }));
    assert!(outcome.warnings().is_empty());
}

#[test]
fn test_check_only_reports_finalize_errors() {
    let options = CompileOptions {
        input: Some(unit(json!([{ "target": "J0.k9", "value": 5 }]), json!([]))),
        pretty: false,
        check_only: true,
    };
    assert!(matches!(
        cli::execute_compile(&options),
        Err(CliError::Change(ChangeError::UnresolvedVariable { .. }))
    ));
}

// ============================================================================
// Show
// ============================================================================

#[test]
fn test_render_sources() {
    let input = unit(
        json!([
            { "target": "S1.x", "value": 5 },
            { "target": "k", "formula": "k1*2" }
        ]),
        json!([
            { "target": "k", "uniform": [0, 10, 5] },
            { "target": "S1", "vector": [1, 2.5] }
        ]),
    );
    let lines = cli::render_sources(&input).unwrap();
    assert_eq!(
        lines,
        vec![
            "model1: S1.x = 5",
            "model1: k = k1 * 2",
            "repeat1: k in uniform(0, 10, 5)",
            "repeat1: S1 in [1, 2.5]",
        ]
    );
}
