mod common;

use common::{K, P, S1, decay, oscillator, registry};
use simchange::{
    Change, ChangeError, ChangeType, Compilation, Diagnostics, MathExpr, ModelDocument, ModelEntry,
    Registry, RepeatedTaskDefinition, SedRange, SedRepeatedTask, SedSetValue, TaskEntry,
};

fn uniform(name: &[&str], start: f64, end: f64, points: f64) -> Change {
    Change::with_values(ChangeType::UniformLinearRange, name, &[start, end, points]).unwrap()
}

/// Emits `change` into a fresh repeated task running `tasks`.
fn emit(change: &Change, tasks: &[&str]) -> (SedRepeatedTask, Diagnostics) {
    let registry = registry();
    let mut repeated_task = SedRepeatedTask::new("repeat1");
    let mut diagnostics = Diagnostics::new();
    change
        .apply_to_repeated_task(&registry, &mut repeated_task, tasks, &mut diagnostics)
        .unwrap();
    (repeated_task, diagnostics)
}

// ============================================================================
// Ranges
// ============================================================================

#[test]
fn test_uniform_range_on_model_variable() {
    let (task, diagnostics) = emit(&uniform(&["k"], 0.0, 10.0, 5.0), &["task1"]);

    assert_eq!(
        task.ranges,
        vec![SedRange::UniformRange {
            id: "uniform_linear_for_k".to_string(),
            start: 0.0,
            end: 10.0,
            number_of_points: 5,
            scale: "linear".to_string(),
        }]
    );
    assert_eq!(
        task.task_changes,
        vec![SedSetValue {
            target: K.to_string(),
            model_reference: "model1".to_string(),
            range: Some("uniform_linear_for_k".to_string()),
            math: MathExpr::name("uniform_linear_for_k"),
        }]
    );
    assert_eq!(task.range.as_deref(), Some("uniform_linear_for_k"));
    assert!(diagnostics.warnings().is_empty());
}

#[test]
fn test_uniform_range_on_local_name() {
    let (task, _) = emit(&uniform(&["q"], 0.0, 10.0, 5.0), &["task1"]);

    assert_eq!(task.ranges.len(), 1);
    assert_eq!(task.ranges[0].id(), "q");
    assert!(task.task_changes.is_empty());
    assert_eq!(task.range.as_deref(), Some("q"));
}

#[test]
fn test_log_range() {
    let change = Change::with_values(ChangeType::UniformLogRange, &["k"], &[1.0, 1000.0, 4.0]).unwrap();
    let (task, _) = emit(&change, &["task1"]);

    match task.range("uniform_log_for_k") {
        Some(SedRange::UniformRange { scale, number_of_points, .. }) => {
            assert_eq!(scale, "log");
            assert_eq!(*number_of_points, 4);
        }
        other => panic!("Expected a log range, got {:?}", other),
    }
    assert_eq!(task.task_changes[0].range.as_deref(), Some("uniform_log_for_k"));
}

#[test]
fn test_point_count_is_truncated() {
    let (task, _) = emit(&uniform(&["k"], 0.0, 1.0, 4.7), &["task1"]);
    match &task.ranges[0] {
        SedRange::UniformRange { number_of_points, .. } => assert_eq!(*number_of_points, 4),
        other => panic!("Expected a uniform range, got {:?}", other),
    }
}

#[test]
fn test_vector_range() {
    let change = Change::with_values(ChangeType::VectorRange, &["S1"], &[1.0, 2.0, 4.0]).unwrap();
    let (task, _) = emit(&change, &["task1"]);

    assert_eq!(
        task.ranges,
        vec![SedRange::VectorRange {
            id: "vector_for_S1".to_string(),
            values: vec![1.0, 2.0, 4.0],
        }]
    );
    assert_eq!(task.task_changes[0].target, S1);
    assert_eq!(task.task_changes[0].math, MathExpr::name("vector_for_S1"));
    assert_eq!(task.range.as_deref(), Some("vector_for_S1"));

    let local = Change::with_values(ChangeType::VectorRange, &["q"], &[1.0]).unwrap();
    let (task, _) = emit(&local, &["task1"]);
    assert_eq!(task.ranges[0].id(), "q");
    assert!(task.task_changes.is_empty());
}

#[test]
fn test_range_id_uses_last_segment() {
    let (task, _) = emit(&uniform(&["model2", "k"], 0.0, 1.0, 2.0), &["task1", "task2"]);
    assert_eq!(task.ranges[0].id(), "uniform_linear_for_k");
    assert_eq!(task.task_changes[0].model_reference, "model2");
}

#[test]
fn test_last_range_drives_the_task() {
    let registry = registry();
    let mut task = SedRepeatedTask::new("repeat1");
    let mut diagnostics = Diagnostics::new();
    for change in [uniform(&["k"], 0.0, 1.0, 2.0), uniform(&["q"], 0.0, 1.0, 2.0)] {
        change
            .apply_to_repeated_task(&registry, &mut task, &["task1"], &mut diagnostics)
            .unwrap();
    }
    assert_eq!(task.ranges.len(), 2);
    assert_eq!(task.range.as_deref(), Some("q"));
}

// ============================================================================
// Assignments
// ============================================================================

#[test]
fn test_value_assignment_sets_value() {
    let change = Change::from_formula(&["p"], &["3"]).unwrap();
    let (task, _) = emit(&change, &["task2"]);

    assert_eq!(
        task.task_changes,
        vec![SedSetValue {
            target: P.to_string(),
            model_reference: "model2".to_string(),
            range: None,
            math: MathExpr::Number(3.0),
        }]
    );
    assert!(task.ranges.is_empty());
    assert_eq!(task.range, None);
}

#[test]
fn test_formula_assignment_sets_value() {
    let change = Change::from_formula(&["k"], &["uniform_linear_for_k * 2"]).unwrap();
    let (task, _) = emit(&change, &["task1"]);

    assert_eq!(task.task_changes.len(), 1);
    assert_eq!(task.task_changes[0].target, K);
    assert_eq!(task.task_changes[0].math.to_string(), "uniform_linear_for_k * 2");
}

#[test]
fn test_unresolved_assignments_emit_nothing() {
    for change in [
        Change::from_formula(&["helper"], &["3"]).unwrap(),
        Change::from_formula(&["helper"], &["k * 3"]).unwrap(),
    ] {
        let (task, _) = emit(&change, &["task1"]);
        assert!(task.task_changes.is_empty());
        assert!(task.ranges.is_empty());
    }
}

// ============================================================================
// Resolution across models
// ============================================================================

#[test]
fn test_first_model_wins_with_warning() {
    let change = Change::from_formula(&["k"], &["1"]).unwrap();
    let (task, diagnostics) = emit(&change, &["task1", "task2"]);

    assert_eq!(task.task_changes[0].model_reference, "model1");
    assert_eq!(diagnostics.warnings().len(), 1);
    assert!(diagnostics.warnings()[0].contains("model1, model2"));

    let (task, _) = emit(&change, &["task2", "task1"]);
    assert_eq!(task.task_changes[0].model_reference, "model2");
}

#[test]
fn test_variable_in_one_model_only() {
    let change = Change::from_formula(&["p"], &["1"]).unwrap();
    let (task, diagnostics) = emit(&change, &["task1", "task2"]);
    assert_eq!(task.task_changes[0].model_reference, "model2");
    assert!(diagnostics.warnings().is_empty());
}

#[test]
fn test_model_prefix_selects_model() {
    let change = Change::from_formula(&["model2", "k"], &["1"]).unwrap();
    let (task, diagnostics) = emit(&change, &["task1", "task2"]);
    assert_eq!(task.task_changes[0].model_reference, "model2");
    assert_eq!(task.task_changes[0].target, K);
    assert!(diagnostics.warnings().is_empty());
}

#[test]
fn test_nested_repeated_task() {
    let mut registry = registry();
    registry.add_task(TaskEntry::Repeated {
        id: "inner".to_string(),
        subtasks: vec!["task2".to_string()],
    });

    let mut task = SedRepeatedTask::new("outer");
    let mut diagnostics = Diagnostics::new();
    Change::from_formula(&["p"], &["2"])
        .unwrap()
        .apply_to_repeated_task(&registry, &mut task, &["inner"], &mut diagnostics)
        .unwrap();
    assert_eq!(task.task_changes[0].model_reference, "model2");
}

#[test]
fn test_unknown_task() {
    let registry = registry();
    let mut task = SedRepeatedTask::new("repeat1");
    let mut diagnostics = Diagnostics::new();
    let err = uniform(&["k"], 0.0, 1.0, 2.0)
        .apply_to_repeated_task(&registry, &mut task, &["nope"], &mut diagnostics)
        .unwrap_err();
    assert_eq!(err, ChangeError::TaskNotFound("nope".to_string()));
    assert!(task.ranges.is_empty());
}

// ============================================================================
// Finalize
// ============================================================================

#[test]
fn test_finalize_binds_to_first_model() {
    let model1 = ModelEntry::new("model1", oscillator());
    let model2 = ModelEntry::new("model2", decay());
    let mut diagnostics = Diagnostics::new();

    let mut change = Change::from_formula(&["k"], &["1"]).unwrap();
    assert!(change.finalize_in_task(&[&model1, &model2], &mut diagnostics));
    assert_eq!(change.variable(), ["model1", "k"]);

    let mut change = Change::from_formula(&["k"], &["1"]).unwrap();
    assert!(change.finalize_in_task(&[&model2, &model1], &mut diagnostics));
    assert_eq!(change.variable(), ["model2", "k"]);
}

#[test]
fn test_finalize_warns_when_several_models_match() {
    let model1 = ModelEntry::new("model1", oscillator());
    let model2 = ModelEntry::new("model2", decay());

    let mut diagnostics = Diagnostics::new();
    let mut change = Change::from_formula(&["k"], &["1"]).unwrap();
    change.finalize_in_task(&[&model1, &model2], &mut diagnostics);
    assert_eq!(
        diagnostics.warnings(),
        ["The variable 'k' was found in more than one model (model1, model2); using 'model1'."]
    );

    let mut diagnostics = Diagnostics::new();
    let mut change = Change::from_formula(&["p"], &["1"]).unwrap();
    change.finalize_in_task(&[&model1, &model2], &mut diagnostics);
    assert!(diagnostics.warnings().is_empty());
}

#[test]
fn test_compile_warns_when_several_models_match() {
    let registry = registry();
    let mut repeated_tasks = [RepeatedTaskDefinition::new(
        "repeat1",
        vec!["task1".to_string(), "task2".to_string()],
    )
    .with_change(Change::from_formula(&["k"], &["1"]).unwrap())];

    let mut compilation = Compilation::new(&registry);
    let document = compilation.compile(&[], &mut repeated_tasks).unwrap();

    let task = document.repeated_task("repeat1").unwrap();
    assert_eq!(task.task_changes[0].model_reference, "model1");
    assert_eq!(repeated_tasks[0].changes[0].variable(), ["model1", "k"]);

    let warnings = compilation.diagnostics().warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("model1, model2"));
}

#[test]
fn test_finalize_twice_is_a_no_op() {
    let model1 = ModelEntry::new("model1", oscillator());
    let mut change = uniform(&["S1"], 0.0, 1.0, 2.0);

    assert!(change.finalize_in_task(&[&model1], &mut Diagnostics::new()));
    assert!(!change.finalize_in_task(&[&model1], &mut Diagnostics::new()));
    assert_eq!(change.variable(), ["model1", "S1"]);
}

#[test]
fn test_finalize_leaves_local_names() {
    let model1 = ModelEntry::new("model1", oscillator());
    let mut change = uniform(&["q"], 0.0, 1.0, 2.0);
    assert!(!change.finalize_in_task(&[&model1], &mut Diagnostics::new()));
    assert_eq!(change.variable(), ["q"]);
}

#[test]
fn test_finalize_skips_models_without_documents() {
    let unloaded = ModelEntry {
        id: "unloaded".to_string(),
        source: String::new(),
        document: None,
    };
    let empty = ModelEntry::new("empty", ModelDocument::empty());
    let model2 = ModelEntry::new("model2", decay());

    let mut change = Change::from_formula(&["p"], &["1"]).unwrap();
    assert!(change.finalize_in_task(&[&unloaded, &empty, &model2], &mut Diagnostics::new()));
    assert_eq!(change.variable(), ["model2", "p"]);
}

#[test]
fn test_finalized_change_emits_same_nodes() {
    let registry = registry();
    let mut definition = RepeatedTaskDefinition::new("repeat1", vec!["task1".to_string()])
        .with_change(uniform(&["k"], 0.0, 10.0, 5.0));

    let mut compilation = Compilation::new(&registry);
    compilation.finalize_repeated_task(&mut definition).unwrap();
    assert_eq!(definition.changes[0].variable(), ["model1", "k"]);

    let task = compilation.compile_repeated_task(&definition).unwrap();
    let (unfinalized, _) = emit(&uniform(&["k"], 0.0, 10.0, 5.0), &["task1"]);
    assert_eq!(task.ranges, unfinalized.ranges);
    assert_eq!(task.task_changes, unfinalized.task_changes);
    assert_eq!(task.range, unfinalized.range);
    assert_eq!(task.subtasks, vec!["task1".to_string()]);
}

#[test]
fn test_finalize_unknown_subtask_is_reported() {
    let registry = Registry::new();
    let mut definition = RepeatedTaskDefinition::new("repeat1", vec!["missing".to_string()]);

    let mut compilation = Compilation::new(&registry);
    let err = compilation.finalize_repeated_task(&mut definition).unwrap_err();
    assert_eq!(err, ChangeError::TaskNotFound("missing".to_string()));
    assert!(compilation.diagnostics().has_error());
}
