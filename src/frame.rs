//! Columnar output frames
//!
//! The host consumes results as named equal-length columns in long
//! time-series form. A [`Frame`] is produced fresh per sub-query and handed
//! off; nothing here is retained by the pipeline.

use chrono::{DateTime, Utc};

/// One typed output column
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Time(Vec<DateTime<Utc>>),
    Int(Vec<i64>),
    Float(Vec<f64>),
    Str(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Self::Time(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Str(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named column within a frame
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub column: Column,
}

/// Named equal-length columns ready for presentation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub name: String,
    pub fields: Vec<Field>,
}

impl Frame {
    /// Long-format time-series frame, the only kind this engine emits.
    pub fn long() -> Self {
        Self {
            name: "long".to_string(),
            fields: Vec::new(),
        }
    }

    /// Append a named column.
    pub fn push(mut self, name: impl Into<String>, column: Column) -> Self {
        self.fields.push(Field {
            name: name.into(),
            column,
        });
        self
    }

    /// Row count, taken from the first column.
    pub fn rows(&self) -> usize {
        self.fields.first().map_or(0, |f| f.column.len())
    }

    /// All columns share one length. Holds for every frame the transformer
    /// builds; checked in tests rather than enforced at runtime.
    pub fn is_consistent(&self) -> bool {
        self.fields.iter().all(|f| f.column.len() == self.rows())
    }

    pub fn field(&self, name: &str) -> Option<&Column> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| &f.column)
    }
}
