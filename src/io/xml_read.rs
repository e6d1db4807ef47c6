use std::fs;
use std::path::Path;

use crate::error::{Result, ToolError};
use crate::merge::{PredecessorLinks, TreeRecord};

/// Reads task records from an XML export file.
pub fn read_records(path: &Path) -> Result<Vec<TreeRecord>> {
    let source = fs::read_to_string(path)?;
    parse_records(&source)
}

/// Parses task records out of XML export text.
///
/// Elements are matched by local name because the exports are namespaced.
/// Each `Task` element must carry a numeric `UID` and a `WBS` position
/// number; `PredecessorLink` children collapse into the three link shapes
/// the merger distinguishes.
pub fn parse_records(source: &str) -> Result<Vec<TreeRecord>> {
    let document = roxmltree::Document::parse(source)?;
    document
        .descendants()
        .filter(|node| node.is_element() && node.tag_name().name() == "Task")
        .map(parse_task)
        .collect()
}

fn parse_task(task: roxmltree::Node<'_, '_>) -> Result<TreeRecord> {
    let uid_text = child_text(task, "UID")
        .ok_or_else(|| ToolError::InvalidExport("task record missing UID".into()))?;
    let uid: u64 = uid_text
        .trim()
        .parse()
        .map_err(|_| ToolError::InvalidExport(format!("task UID '{uid_text}' is not numeric")))?;
    let wbs = child_text(task, "WBS")
        .ok_or_else(|| ToolError::InvalidExport(format!("task {uid} missing WBS")))?;

    let mut uids = Vec::new();
    for link in task
        .children()
        .filter(|node| node.is_element() && node.tag_name().name() == "PredecessorLink")
    {
        let pred_text = child_text(link, "PredecessorUID").ok_or_else(|| {
            ToolError::UnexpectedShape(format!(
                "predecessor link of task {uid} carries no PredecessorUID"
            ))
        })?;
        let pred: u64 = pred_text.trim().parse().map_err(|_| {
            ToolError::UnexpectedShape(format!(
                "predecessor uid '{pred_text}' of task {uid} is not numeric"
            ))
        })?;
        uids.push(pred);
    }

    let predecessors = match uids.len() {
        0 => PredecessorLinks::None,
        1 => PredecessorLinks::One(uids[0]),
        _ => PredecessorLinks::Many(uids),
    };

    Ok(TreeRecord {
        uid,
        wbs: wbs.trim().to_string(),
        predecessors,
    })
}

fn child_text(node: roxmltree::Node<'_, '_>, name: &str) -> Option<String> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == name)
        .and_then(|child| child.text())
        .map(str::to_string)
}
