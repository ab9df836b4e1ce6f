pub mod codec;
pub mod drag;
pub mod slot;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of one of the three fixed board columns.
///
/// The set is closed: the persisted layout keys columns by these exact
/// strings, and every store operation takes a `ColumnId`, so an unknown
/// column is unrepresentable past the string boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnId {
    #[serde(rename = "todo")]
    Todo,
    #[serde(rename = "in progress")]
    InProgress,
    #[serde(rename = "done")]
    Done,
}

impl ColumnId {
    /// All columns in display and persisted order.
    pub const ALL: [ColumnId; 3] = [Self::Todo, Self::InProgress, Self::Done];

    /// The persisted key for this column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in progress",
            Self::Done => "done",
        }
    }

    /// The next column to the right, if any.
    pub fn next(self) -> Option<ColumnId> {
        match self {
            Self::Todo => Some(Self::InProgress),
            Self::InProgress => Some(Self::Done),
            Self::Done => None,
        }
    }

    /// The previous column to the left, if any.
    pub fn prev(self) -> Option<ColumnId> {
        match self {
            Self::Todo => None,
            Self::InProgress => Some(Self::Todo),
            Self::Done => Some(Self::InProgress),
        }
    }
}

/// Error for a column name outside the fixed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown column {0:?}: use todo, \"in progress\", or done")]
pub struct InvalidColumn(pub String);

impl std::str::FromStr for ColumnId {
    type Err = InvalidColumn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "todo" => Ok(Self::Todo),
            "in progress" | "in-progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            other => Err(InvalidColumn(other.to_string())),
        }
    }
}

impl std::fmt::Display for ColumnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single task on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Always empty for now; the stored layout reserves the field for a
    /// future commenting feature.
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// Placeholder for the unimplemented commenting feature. Nothing constructs
/// these yet; the type exists so stored `comments` arrays keep decoding once
/// they start carrying data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub author: String,
    pub body: String,
    pub posted_at: DateTime<Utc>,
}

impl Task {
    /// Create a task with a fresh unique id and `created_at == updated_at`.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: description.into(),
            created_at: now,
            updated_at: now,
            comments: Vec::new(),
        }
    }

    /// Refresh the `updated_at` timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// One named, ordered bucket of tasks. Item order is the visual and
/// persisted order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub title: String,
    #[serde(default)]
    pub items: Vec<Task>,
}

impl Column {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            items: Vec::new(),
        }
    }
}

/// The full three-column board. A struct rather than a map so the fixed
/// column set and their order are structural, not data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub todo: Column,
    #[serde(rename = "in progress")]
    pub in_progress: Column,
    pub done: Column,
}

impl Board {
    /// The default board: three empty columns with their display titles.
    pub fn seed() -> Self {
        Self {
            todo: Column::new("Todo"),
            in_progress: Column::new("In Progress"),
            done: Column::new("Done"),
        }
    }

    pub fn column(&self, id: ColumnId) -> &Column {
        match id {
            ColumnId::Todo => &self.todo,
            ColumnId::InProgress => &self.in_progress,
            ColumnId::Done => &self.done,
        }
    }

    pub fn column_mut(&mut self, id: ColumnId) -> &mut Column {
        match id {
            ColumnId::Todo => &mut self.todo,
            ColumnId::InProgress => &mut self.in_progress,
            ColumnId::Done => &mut self.done,
        }
    }

    /// Iterate columns in display order.
    pub fn columns(&self) -> impl Iterator<Item = (ColumnId, &Column)> {
        ColumnId::ALL.iter().map(move |&id| (id, self.column(id)))
    }

    /// Find which column a task is in and its index within that column.
    pub fn find_task(&self, task_id: &str) -> Option<(ColumnId, usize)> {
        for (id, col) in self.columns() {
            if let Some(idx) = col.items.iter().position(|t| t.id == task_id) {
                return Some((id, idx));
            }
        }
        None
    }

    /// Total task count across all columns.
    pub fn total_tasks(&self) -> usize {
        self.columns().map(|(_, col)| col.items.len()).sum()
    }
}
