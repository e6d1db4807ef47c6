use std::collections::{HashMap, HashSet};

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::error::{Result, ToolError};
use crate::ident::normalize;
use crate::model::{DEFAULT_HOURS_PER_DAY, Resource, Task};

/// Row kind marking a leaf task in the spreadsheet export. Grouping and
/// milestone rows carry other kinds and are discarded.
const TASK_KIND: &str = "task";

/// Policy values the merger needs but that are not part of the export
/// data. Passed explicitly so tests can vary them.
#[derive(Debug, Clone)]
pub struct MergeConfig {
    /// Daily-hour cap given to every extracted resource.
    pub hours_per_day: u32,
    /// Display name substituted when a task row has no assignee.
    pub sentinel: String,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            hours_per_day: DEFAULT_HOURS_PER_DAY,
            sentinel: "Ghost".to_string(),
        }
    }
}

/// One row of the spreadsheet export. Every field is optional because the
/// export mixes task rows with grouping rows that omit most of them; the
/// merger decides which absences are fatal.
#[derive(Debug, Clone, Default)]
pub struct TaskRow {
    pub kind: Option<String>,
    pub name: Option<String>,
    pub assigned: Option<String>,
    pub duration: Option<u32>,
    pub wbs: Option<String>,
}

/// One task record of the XML export.
#[derive(Debug, Clone)]
pub struct TreeRecord {
    pub uid: u64,
    pub wbs: String,
    pub predecessors: PredecessorLinks,
}

/// Predecessor links of a tree record. The export represents zero, one,
/// and many links differently, so the three shapes are kept distinct and
/// matched exhaustively.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PredecessorLinks {
    #[default]
    None,
    One(u64),
    Many(Vec<u64>),
}

impl PredecessorLinks {
    /// Flattens the three shapes into a uniform slice of record ids.
    pub fn uids(&self) -> &[u64] {
        match self {
            PredecessorLinks::None => &[],
            PredecessorLinks::One(uid) => std::slice::from_ref(uid),
            PredecessorLinks::Many(uids) => uids,
        }
    }
}

/// Strips the synthetic top level the XML export adds to its position
/// numbers: everything up to and including the first `.` is dropped, so
/// `0.1.2` joins against the spreadsheet key `1.2`.
pub fn clean_join_key(raw: &str) -> &str {
    match raw.split_once('.') {
        Some((_, rest)) => rest,
        None => raw,
    }
}

/// Merges one project's spreadsheet rows and XML records into a
/// consistent (resources, tasks) pair.
///
/// Rows provide names, assignees, and effort; records provide dependency
/// links, joined via the position-number key. Names are normalized here,
/// so the returned values are ready for the block builder. Task order is
/// row insertion order; resource order is first-appearance order.
pub fn merge_sources(
    rows: &[TaskRow],
    records: &[TreeRecord],
    config: &MergeConfig,
) -> Result<(Vec<Resource>, Vec<Task>)> {
    let mut drafts: Vec<Draft> = Vec::new();
    let mut by_key: HashMap<String, usize> = HashMap::new();
    let mut resources: Vec<Resource> = Vec::new();
    let mut seen_resources: HashSet<String> = HashSet::new();

    for (row_idx, row) in rows.iter().enumerate() {
        let kind = row.kind.as_deref().ok_or(ToolError::MalformedRow {
            row: row_idx,
            field: "type",
        })?;
        if !kind.eq_ignore_ascii_case(TASK_KIND) {
            continue;
        }

        let name = require_field(row.name.as_deref(), row_idx, "name")?;
        let duration = row.duration.ok_or(ToolError::MalformedRow {
            row: row_idx,
            field: "duration",
        })?;
        let wbs = require_field(row.wbs.as_deref(), row_idx, "wbs")?;

        let assigned = row
            .assigned
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty());
        let assignee = match assigned {
            Some(list) => {
                let named: Vec<Resource> = list
                    .split(',')
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(|part| Resource::with_hours_per_day(normalize(part), config.hours_per_day))
                    .collect();
                for resource in &named {
                    if seen_resources.insert(resource.name.clone()) {
                        resources.push(resource.clone());
                    }
                }
                named
            }
            // Unassigned rows get the sentinel; it is not part of the
            // extracted resource set.
            None => vec![Resource::with_hours_per_day(
                normalize(&config.sentinel),
                config.hours_per_day,
            )],
        };

        if by_key.insert(wbs.to_string(), drafts.len()).is_some() {
            return Err(ToolError::DuplicateJoinKey(wbs.to_string()));
        }
        drafts.push(Draft {
            name: normalize(name),
            assignee,
            effort: duration,
        });
    }

    let mut key_by_uid: HashMap<u64, &str> = HashMap::new();
    for record in records {
        key_by_uid.insert(record.uid, clean_join_key(&record.wbs));
    }

    // Dependency lists as draft indices, in link order.
    let mut deps: Vec<Vec<usize>> = vec![Vec::new(); drafts.len()];
    for record in records {
        let uids = record.predecessors.uids();
        if uids.is_empty() {
            continue;
        }
        // Every link must resolve to a known record, even when the
        // linking record itself is an untracked grouping row; a dangling
        // uid means the exports are inconsistent.
        let mut pred_keys = Vec::with_capacity(uids.len());
        for &uid in uids {
            let pred_key = *key_by_uid
                .get(&uid)
                .ok_or(ToolError::UnresolvedReference(uid))?;
            pred_keys.push(pred_key);
        }
        let Some(&task_idx) = by_key.get(clean_join_key(&record.wbs)) else {
            continue;
        };
        for pred_key in pred_keys {
            // Predecessors whose key is not tracked by the spreadsheet are
            // grouping rows; they carry no effort and are dropped.
            if let Some(&pred_idx) = by_key.get(pred_key) {
                deps[task_idx].push(pred_idx);
            }
        }
    }

    let tasks = finalize_tasks(drafts, &deps)?;
    Ok((resources, tasks))
}

/// Merges several projects into one combined (resources, tasks) pair.
///
/// Each project merges independently; tasks are concatenated and
/// resources deduplicated by name across projects.
pub fn merge_many(
    projects: &[(Vec<TaskRow>, Vec<TreeRecord>)],
    config: &MergeConfig,
) -> Result<(Vec<Resource>, Vec<Task>)> {
    let mut all_resources: Vec<Resource> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut all_tasks: Vec<Task> = Vec::new();

    for (rows, records) in projects {
        let (resources, tasks) = merge_sources(rows, records, config)?;
        for resource in resources {
            if seen.insert(resource.name.clone()) {
                all_resources.push(resource);
            }
        }
        all_tasks.extend(tasks);
    }

    Ok((all_resources, all_tasks))
}

struct Draft {
    name: String,
    assignee: Vec<Resource>,
    effort: u32,
}

fn require_field<'a>(value: Option<&'a str>, row: usize, field: &'static str) -> Result<&'a str> {
    value.ok_or(ToolError::MalformedRow { row, field })
}

/// Turns drafts into final task values, dependencies first.
///
/// Tasks are finalised in topological order so every `depends_on` entry is
/// a complete task (own dependencies included) by the time it is stored.
/// A cycle in the links makes that order impossible and is rejected.
fn finalize_tasks(drafts: Vec<Draft>, deps: &[Vec<usize>]) -> Result<Vec<Task>> {
    let mut graph: DiGraph<usize, ()> = DiGraph::new();
    let nodes: Vec<NodeIndex> = (0..drafts.len()).map(|idx| graph.add_node(idx)).collect();
    for (task_idx, preds) in deps.iter().enumerate() {
        for &pred_idx in preds {
            graph.add_edge(nodes[pred_idx], nodes[task_idx], ());
        }
    }

    let order = toposort(&graph, None).map_err(|cycle| {
        let task_idx = graph[cycle.node_id()];
        ToolError::DependencyCycle(drafts[task_idx].name.clone())
    })?;

    let mut finished: Vec<Option<Task>> = drafts.iter().map(|_| None).collect();
    for node in order {
        let idx = graph[node];
        let draft = &drafts[idx];
        // Topological order guarantees every predecessor is finished.
        let depends_on: Vec<Task> = deps[idx]
            .iter()
            .filter_map(|&pred_idx| finished[pred_idx].clone())
            .collect();
        finished[idx] = Some(Task {
            name: draft.name.clone(),
            assignee: draft.assignee.clone(),
            effort: draft.effort,
            depends_on,
        });
    }

    Ok(finished.into_iter().flatten().collect())
}
