//! Embedded structured databases: spreadsheet-like record sets with typed
//! columns, referenced from page content by id.
//!
//! Databases have an id space independent from pages. Cell values are stored
//! as raw JSON and are not validated against the column type at write time;
//! deleting a column likewise leaves stale cell keys in existing rows.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Cell type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Number,
    Select,
    Date,
    Checkbox,
    Relation,
}

/// Active presentation of a database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseView {
    Table,
    Kanban,
    Calendar,
    Gallery,
}

/// A typed column definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Choices for `Select` columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    /// Target database for `Relation` columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation_database_id: Option<Uuid>,
}

impl Column {
    /// Plain text column.
    pub fn text(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            column_type: ColumnType::Text,
            width: None,
            options: None,
            relation_database_id: None,
        }
    }

    /// Select column with the given choices.
    pub fn select(
        id: impl Into<String>,
        name: impl Into<String>,
        options: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            column_type: ColumnType::Select,
            width: None,
            options: Some(options),
            relation_database_id: None,
        }
    }

    /// Builder-style: set the display width.
    #[must_use]
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }
}

/// A single row: a synthetic id plus a mapping from column id to cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: String,
    #[serde(flatten)]
    pub cells: HashMap<String, Value>,
}

impl Row {
    /// Create an empty row with a fresh id.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            cells: HashMap::new(),
        }
    }

    /// Builder-style: set a cell value.
    #[must_use]
    pub fn with_cell(mut self, column_id: impl Into<String>, value: impl Into<Value>) -> Self {
        self.cells.insert(column_id.into(), value.into());
        self
    }

    /// Cell value for a column, if present.
    pub fn cell(&self, column_id: &str) -> Option<&Value> {
        self.cells.get(column_id)
    }
}

impl Default for Row {
    fn default() -> Self {
        Self::new()
    }
}

/// An embedded structured database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Database {
    pub id: Uuid,
    pub title: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
    pub current_view: DatabaseView,
}

impl Database {
    /// Create a database with the default starter schema: a text "Name"
    /// column, a "Status" select column, and one sample row. The defaults
    /// exist purely to make a fresh table immediately usable.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            columns: vec![
                Column::text("col-1", "Name").with_width(200),
                Column::select(
                    "col-2",
                    "Status",
                    vec![
                        "Todo".to_string(),
                        "In Progress".to_string(),
                        "Done".to_string(),
                    ],
                )
                .with_width(150),
            ],
            rows: vec![Row::new()
                .with_cell("col-1", "Sample Item")
                .with_cell("col-2", "Todo")],
            current_view: DatabaseView::Table,
        }
    }
}

/// Shallow partial update for a database record.
#[derive(Debug, Clone, Default)]
pub struct DatabasePatch {
    pub title: Option<String>,
    pub columns: Option<Vec<Column>>,
    pub rows: Option<Vec<Row>>,
    pub current_view: Option<DatabaseView>,
}

impl DatabasePatch {
    /// Patch that only switches the active view.
    pub fn view(view: DatabaseView) -> Self {
        Self {
            current_view: Some(view),
            ..Self::default()
        }
    }

    /// Patch that replaces the row set.
    pub fn rows(rows: Vec<Row>) -> Self {
        Self {
            rows: Some(rows),
            ..Self::default()
        }
    }

    /// Apply the patch, replacing only the fields that are set.
    pub fn apply(self, database: &mut Database) {
        if let Some(title) = self.title {
            database.title = title;
        }
        if let Some(columns) = self.columns {
            database.columns = columns;
        }
        if let Some(rows) = self.rows {
            database.rows = rows;
        }
        if let Some(view) = self.current_view {
            database.current_view = view;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schema() {
        let db = Database::new("Tasks");

        assert_eq!(db.title, "Tasks");
        assert_eq!(db.columns.len(), 2);
        assert_eq!(db.columns[0].name, "Name");
        assert_eq!(db.columns[0].column_type, ColumnType::Text);
        assert_eq!(db.columns[1].column_type, ColumnType::Select);
        assert_eq!(
            db.columns[1].options.as_deref(),
            Some(&["Todo".to_string(), "In Progress".to_string(), "Done".to_string()][..])
        );
        assert_eq!(db.rows.len(), 1);
        assert_eq!(db.current_view, DatabaseView::Table);
    }

    #[test]
    fn test_view_patch_preserves_other_fields() {
        let mut db = Database::new("Tasks");
        let columns = db.columns.clone();
        let rows = db.rows.clone();

        DatabasePatch::view(DatabaseView::Kanban).apply(&mut db);

        assert_eq!(db.current_view, DatabaseView::Kanban);
        assert_eq!(db.title, "Tasks");
        assert_eq!(db.columns, columns);
        assert_eq!(db.rows, rows);
    }

    #[test]
    fn test_row_serialization_flattens_cells() {
        let row = Row::new().with_cell("col-1", "Sample Item");
        let json = serde_json::to_value(&row).unwrap();

        assert_eq!(json["col-1"], "Sample Item");
        assert!(json["id"].is_string());

        let back: Row = serde_json::from_value(json).unwrap();
        assert_eq!(back, row);
    }

    #[test]
    fn test_column_type_wire_format() {
        let json = serde_json::to_string(&ColumnType::Checkbox).unwrap();
        assert_eq!(json, "\"checkbox\"");

        let view: DatabaseView = serde_json::from_str("\"kanban\"").unwrap();
        assert_eq!(view, DatabaseView::Kanban);
    }
}
