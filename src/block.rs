use crate::model::{Resource, Task};

/// A generic nested block: a type tag, space-joined properties, and
/// optional child blocks. Every piece of the generated project file maps
/// onto one of these before rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: String,
    pub props: Vec<String>,
    pub children: Vec<Block>,
}

impl Block {
    /// Creates a block without children.
    pub fn leaf(kind: impl Into<String>, props: Vec<String>) -> Self {
        Self::with_children(kind, props, Vec::new())
    }

    /// Creates a block with the given children.
    pub fn with_children(kind: impl Into<String>, props: Vec<String>, children: Vec<Block>) -> Self {
        Self {
            kind: kind.into(),
            props,
            children,
        }
    }
}

/// Wraps a name property in double quotes. Names are normalized before
/// they reach this point, so no escaping is needed.
fn quoted(value: &str) -> String {
    format!("\"{value}\"")
}

/// Builds the block for one task: effort first, then one allocation per
/// assignee, then one dependency per predecessor, all in source order.
pub fn task_block(task: &Task) -> Block {
    let mut children = vec![Block::leaf("effort", vec![format!("{}h", task.effort)])];
    children.extend(
        task.assignee
            .iter()
            .map(|assignee| Block::leaf("allocate", vec![assignee.name.clone()])),
    );
    children.extend(
        task.depends_on
            .iter()
            .map(|dep| Block::leaf("depends", vec![dep.name.clone()])),
    );

    Block::with_children(
        "task",
        vec![task.name.clone(), quoted(&task.name)],
        children,
    )
}

/// Builds the block for one resource, with its daily-hour cap nested
/// inside a limit block.
pub fn resource_block(resource: &Resource) -> Block {
    let cap = Block::leaf("dailymax", vec![format!("{}h", resource.hours_per_day)]);
    Block::with_children(
        "resource",
        vec![resource.name.clone(), quoted(&resource.name)],
        vec![Block::with_children("limit", Vec::new(), vec![cap])],
    )
}

/// Builds the project header block. `end` is either a date or a duration
/// offset such as `+2m`. The block has no children; the renderer still
/// gives it a body because the target grammar requires one on project
/// declarations.
pub fn project_block(id: &str, name: &str, start: &str, end: &str) -> Block {
    Block::leaf(
        "project",
        vec![
            id.to_string(),
            quoted(name),
            start.to_string(),
            end.to_string(),
        ],
    )
}

/// Builds the fixed report block appended when report output is
/// requested. The content is static.
pub fn report_block() -> Block {
    Block::with_children(
        "taskreport",
        vec!["overview".to_string(), quoted("")],
        vec![
            Block::leaf("formats", vec!["html".to_string()]),
            Block::leaf("headline", vec![quoted("Project Plan")]),
            Block::leaf("columns", vec!["name, start, end, effort, chart".to_string()]),
            Block::leaf("timeformat", vec![quoted("%Y-%m-%d")]),
        ],
    )
}
