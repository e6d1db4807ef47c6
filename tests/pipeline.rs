use gantt_tj::ToolError;
use gantt_tj::block::{self, Block};
use gantt_tj::ident::normalize;
use gantt_tj::merge::{self, MergeConfig, PredecessorLinks, TaskRow, TreeRecord};
use gantt_tj::model::Resource;
use gantt_tj::render;
use gantt_tj::sync::{self, ProjectHeader};

fn task_row(name: &str, assigned: Option<&str>, duration: u32, wbs: &str) -> TaskRow {
    TaskRow {
        kind: Some("task".to_string()),
        name: Some(name.to_string()),
        assigned: assigned.map(str::to_string),
        duration: Some(duration),
        wbs: Some(wbs.to_string()),
    }
}

fn record(uid: u64, wbs: &str, predecessors: PredecessorLinks) -> TreeRecord {
    TreeRecord {
        uid,
        wbs: wbs.to_string(),
        predecessors,
    }
}

fn header() -> ProjectHeader {
    ProjectHeader {
        id: "pj".to_string(),
        name: "pj".to_string(),
        start: "2020-03-30".to_string(),
        end: "+2m".to_string(),
    }
}

#[test]
fn single_task_with_two_assignees() {
    let rows = vec![task_row("Design", Some("Alice, Bob"), 10, "1.1")];
    let records = vec![record(5, "0.1.1", PredecessorLinks::None)];

    let (resources, tasks) =
        merge::merge_sources(&rows, &records, &MergeConfig::default()).expect("merge");

    assert_eq!(tasks.len(), 1);
    let task = &tasks[0];
    assert_eq!(task.name, "design");
    assert_eq!(task.effort, 10);
    let assignees: Vec<&str> = task.assignee.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(assignees, ["alice", "bob"]);
    assert!(task.depends_on.is_empty());

    let extracted: Vec<&str> = resources.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(extracted, ["alice", "bob"]);

    let rendered = render::render(&block::task_block(task), 0);
    assert!(rendered.contains("  effort 10h\n"));
    assert!(rendered.contains("  allocate alice\n"));
    assert!(rendered.contains("  allocate bob\n"));
    assert!(!rendered.contains("depends"));
}

#[test]
fn single_link_predecessor_becomes_depends_line() {
    let rows = vec![
        task_row("One", Some("Alice"), 4, "1"),
        task_row("Two", Some("Alice"), 4, "2"),
    ];
    let records = vec![
        record(1, "0.1", PredecessorLinks::None),
        record(2, "0.2", PredecessorLinks::One(1)),
    ];

    let (_, tasks) = merge::merge_sources(&rows, &records, &MergeConfig::default()).expect("merge");

    assert_eq!(tasks.len(), 2);
    let deps: Vec<&str> = tasks[1].depends_on.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(deps, ["one"]);

    let rendered = render::render(&block::task_block(&tasks[1]), 0);
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(
        lines,
        [
            "task two \"two\" {",
            "  effort 4h",
            "  allocate alice",
            "  depends one",
            "}",
        ]
    );
}

#[test]
fn empty_project_with_report() {
    let doc = sync::build_document(&header(), &[], &[], true);

    assert!(doc.starts_with("project pj \"pj\" 2020-03-30 +2m {\n}\n\ntaskreport overview \"\" {"));
    assert!(doc.contains("\n  formats html\n"));
    assert!(doc.contains("headline"));
    assert!(doc.contains("columns"));
    assert!(doc.contains("timeformat"));
    assert!(doc.ends_with("}"));
}

#[test]
fn full_document_separates_top_level_blocks_with_blank_lines() {
    let rows = vec![task_row("Design", Some("Alice"), 10, "1")];
    let records = vec![record(1, "0.1", PredecessorLinks::None)];
    let (resources, tasks) =
        merge::merge_sources(&rows, &records, &MergeConfig::default()).expect("merge");

    let doc = sync::build_document(&header(), &resources, &tasks, false);
    assert!(doc.contains("}\n\nresource alice \"alice\" {"));
    assert!(doc.contains("}\n\ntask design \"design\" {"));
    assert!(!doc.contains("taskreport"));
}

#[test]
fn missing_assignee_gets_sentinel_resource() {
    let rows = vec![task_row("Setup", None, 2, "1")];

    let (resources, tasks) =
        merge::merge_sources(&rows, &[], &MergeConfig::default()).expect("merge");

    // The sentinel backs the allocation but is not an extracted resource.
    assert!(resources.is_empty());
    assert_eq!(tasks[0].assignee, [Resource::new("ghost")]);
}

#[test]
fn sentinel_and_hour_cap_are_configurable() {
    let rows = vec![task_row("Setup", None, 2, "1")];
    let config = MergeConfig {
        hours_per_day: 6,
        sentinel: "Nobody".to_string(),
    };

    let (_, tasks) = merge::merge_sources(&rows, &[], &config).expect("merge");
    assert_eq!(tasks[0].assignee, [Resource::with_hours_per_day("nobody", 6)]);
}

#[test]
fn predecessor_outside_row_source_is_skipped() {
    // Key "1" exists only in the tree source (a grouping row), so the
    // link from "2" to it resolves but is silently dropped.
    let rows = vec![task_row("Build", Some("Alice"), 8, "2")];
    let records = vec![
        record(1, "0.1", PredecessorLinks::None),
        record(2, "0.2", PredecessorLinks::One(1)),
    ];

    let (_, tasks) = merge::merge_sources(&rows, &records, &MergeConfig::default()).expect("merge");
    assert!(tasks[0].depends_on.is_empty());
}

#[test]
fn unknown_predecessor_uid_is_fatal() {
    let rows = vec![task_row("Build", Some("Alice"), 8, "2")];
    let records = vec![record(2, "0.2", PredecessorLinks::One(99))];

    let error = merge::merge_sources(&rows, &records, &MergeConfig::default()).unwrap_err();
    assert!(matches!(error, ToolError::UnresolvedReference(99)));
}

#[test]
fn unknown_uid_in_untracked_record_is_still_fatal() {
    // The linking record is a grouping row the spreadsheet does not
    // track, but its dangling link still marks the exports inconsistent.
    let rows = vec![task_row("Build", Some("Alice"), 8, "2")];
    let records = vec![
        record(2, "0.2", PredecessorLinks::None),
        record(7, "0.9", PredecessorLinks::One(99)),
    ];

    let error = merge::merge_sources(&rows, &records, &MergeConfig::default()).unwrap_err();
    assert!(matches!(error, ToolError::UnresolvedReference(99)));
}

#[test]
fn many_links_resolve_in_order() {
    let rows = vec![
        task_row("Alpha", Some("Alice"), 1, "1"),
        task_row("Beta", Some("Alice"), 1, "2"),
        task_row("Gamma", Some("Alice"), 1, "3"),
    ];
    let records = vec![
        record(1, "0.1", PredecessorLinks::None),
        record(2, "0.2", PredecessorLinks::None),
        record(3, "0.3", PredecessorLinks::Many(vec![1, 2])),
    ];

    let (_, tasks) = merge::merge_sources(&rows, &records, &MergeConfig::default()).expect("merge");

    let deps: Vec<&str> = tasks[2].depends_on.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(deps, ["alpha", "beta"]);
}

#[test]
fn dependency_entries_are_fully_formed() {
    let rows = vec![
        task_row("Alpha", Some("Alice"), 1, "1"),
        task_row("Beta", Some("Alice"), 1, "2"),
        task_row("Gamma", Some("Alice"), 1, "3"),
    ];
    let records = vec![
        record(1, "0.1", PredecessorLinks::None),
        record(2, "0.2", PredecessorLinks::One(1)),
        record(3, "0.3", PredecessorLinks::One(2)),
    ];

    let (_, tasks) = merge::merge_sources(&rows, &records, &MergeConfig::default()).expect("merge");

    // Gamma's dependency is the finished Beta, which in turn carries its
    // own dependency on Alpha.
    let beta = &tasks[2].depends_on[0];
    assert_eq!(beta.name, "beta");
    assert_eq!(beta.depends_on[0].name, "alpha");
}

#[test]
fn cyclic_links_are_rejected() {
    let rows = vec![
        task_row("One", Some("Alice"), 1, "1"),
        task_row("Two", Some("Alice"), 1, "2"),
    ];
    let records = vec![
        record(1, "0.1", PredecessorLinks::One(2)),
        record(2, "0.2", PredecessorLinks::One(1)),
    ];

    let error = merge::merge_sources(&rows, &records, &MergeConfig::default()).unwrap_err();
    assert!(matches!(error, ToolError::DependencyCycle(_)));
}

#[test]
fn row_missing_duration_is_fatal() {
    let mut row = task_row("Design", Some("Alice"), 0, "1");
    row.duration = None;

    let error = merge::merge_sources(&[row], &[], &MergeConfig::default()).unwrap_err();
    assert!(matches!(
        error,
        ToolError::MalformedRow {
            row: 0,
            field: "duration"
        }
    ));
}

#[test]
fn row_missing_kind_is_fatal() {
    let mut row = task_row("Design", Some("Alice"), 1, "1");
    row.kind = None;

    let error = merge::merge_sources(&[row], &[], &MergeConfig::default()).unwrap_err();
    assert!(matches!(
        error,
        ToolError::MalformedRow {
            row: 0,
            field: "type"
        }
    ));
}

#[test]
fn grouping_rows_are_discarded() {
    let group = TaskRow {
        kind: Some("project".to_string()),
        ..TaskRow::default()
    };
    let rows = vec![group, task_row("Design", Some("Alice"), 10, "1.1")];

    let (_, tasks) = merge::merge_sources(&rows, &[], &MergeConfig::default()).expect("merge");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].name, "design");
}

#[test]
fn duplicate_join_keys_are_rejected() {
    let rows = vec![
        task_row("One", Some("Alice"), 1, "1"),
        task_row("Two", Some("Alice"), 1, "1"),
    ];

    let error = merge::merge_sources(&rows, &[], &MergeConfig::default()).unwrap_err();
    assert!(matches!(error, ToolError::DuplicateJoinKey(key) if key == "1"));
}

#[test]
fn batch_merge_deduplicates_resources_across_projects() {
    let first = (
        vec![task_row("One", Some("Alice, Bob"), 1, "1")],
        Vec::new(),
    );
    let second = (
        vec![task_row("Two", Some("Bob, Carol"), 1, "1")],
        Vec::new(),
    );

    let (resources, tasks) =
        merge::merge_many(&[first, second], &MergeConfig::default()).expect("merge");

    let names: Vec<&str> = resources.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["alice", "bob", "carol"]);
    let task_names: Vec<&str> = tasks.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(task_names, ["one", "two"]);
}

#[test]
fn renormalizing_merged_names_is_identity() {
    let rows = vec![task_row("2nd Design Pass", Some("Alice M., Bob"), 10, "1.1")];

    let (_, tasks) = merge::merge_sources(&rows, &[], &MergeConfig::default()).expect("merge");

    let task = &tasks[0];
    assert_eq!(normalize(&task.name), task.name);
    for assignee in &task.assignee {
        assert_eq!(normalize(&assignee.name), assignee.name);
    }
}

#[test]
fn childless_block_renders_single_line_and_reparses() {
    let leaf = Block::leaf("allocate", vec!["alice".to_string()]);
    let rendered = render::render(&leaf, 0);

    assert!(!rendered.contains('{'));
    assert!(!rendered.contains('\n'));

    let mut parts = rendered.split_whitespace();
    assert_eq!(parts.next(), Some("allocate"));
    assert_eq!(parts.collect::<Vec<_>>(), ["alice"]);
}

#[test]
fn nested_blocks_indent_two_spaces_per_level() {
    let rendered = render::render(&block::resource_block(&Resource::new("alice")), 0);
    assert_eq!(
        rendered,
        "resource alice \"alice\" {\n  limit {\n    dailymax 8h\n  }\n}"
    );
}
