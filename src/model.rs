use serde::{Deserialize, Serialize};

/// Default daily working-hour cap assigned to resources.
pub const DEFAULT_HOURS_PER_DAY: u32 = 8;

/// A person (or placeholder) that work can be allocated to.
///
/// Identity is the name, which is expected to be normalized (see
/// [`crate::ident::normalize`]) by the time a `Resource` reaches the block
/// builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub hours_per_day: u32,
}

impl Resource {
    /// Creates a resource with the default daily-hour cap.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_hours_per_day(name, DEFAULT_HOURS_PER_DAY)
    }

    /// Creates a resource with an explicit daily-hour cap.
    pub fn with_hours_per_day(name: impl Into<String>, hours_per_day: u32) -> Self {
        Self {
            name: name.into(),
            hours_per_day,
        }
    }
}

/// A leaf task with its allocations and dependencies.
///
/// Effort is whole person-hours. `depends_on` holds fully-formed task
/// values: the merger finalises tasks in dependency order, so every entry
/// is complete (including its own dependencies) when it is stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    pub assignee: Vec<Resource>,
    pub effort: u32,
    pub depends_on: Vec<Task>,
}

impl Task {
    /// Creates a task with no dependencies.
    pub fn new(name: impl Into<String>, assignee: Vec<Resource>, effort: u32) -> Self {
        Self {
            name: name.into(),
            assignee,
            effort,
            depends_on: Vec::new(),
        }
    }
}
