use chrono::NaiveDateTime;

use crate::error::{ProcessingError, Result};
use crate::models::variable::Variable;
use crate::utils::constants::{STATION_CODE_COLUMN, TIMESTAMP_COLUMN};

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Scaled(Vec<Option<f64>>),
    Integer(Vec<Option<i32>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Scaled(values) => values.len(),
            ColumnData::Integer(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_missing(&self, row: usize) -> bool {
        match self {
            ColumnData::Scaled(values) => values.get(row).map_or(true, |v| v.is_none()),
            ColumnData::Integer(values) => values.get(row).map_or(true, |v| v.is_none()),
        }
    }

    pub fn non_missing_count(&self) -> usize {
        match self {
            ColumnData::Scaled(values) => values.iter().filter(|v| v.is_some()).count(),
            ColumnData::Integer(values) => values.iter().filter(|v| v.is_some()).count(),
        }
    }

    /// Text form of a cell, `None` when missing
    pub fn format_value(&self, row: usize) -> Option<String> {
        match self {
            ColumnData::Scaled(values) => values.get(row).copied().flatten().map(|v| v.to_string()),
            ColumnData::Integer(values) => values.get(row).copied().flatten().map(|v| v.to_string()),
        }
    }

    fn extend(&mut self, other: ColumnData) -> Result<()> {
        match (self, other) {
            (ColumnData::Scaled(a), ColumnData::Scaled(b)) => a.extend(b),
            (ColumnData::Integer(a), ColumnData::Integer(b)) => a.extend(b),
            _ => {
                return Err(ProcessingError::InvalidFormat(
                    "Cannot append columns of different kinds".to_string(),
                ))
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub variable: Variable,
    pub data: ColumnData,
}

impl Column {
    pub fn new(variable: Variable, data: ColumnData) -> Self {
        Self { variable, data }
    }

    pub fn name(&self) -> &'static str {
        self.variable.display_name()
    }
}

/// Columnar output table: identity columns plus a selection of variables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationFrame {
    pub timestamps: Vec<NaiveDateTime>,
    pub station_codes: Vec<String>,
    pub columns: Vec<Column>,
}

impl ObservationFrame {
    pub fn from_parts(
        timestamps: Vec<NaiveDateTime>,
        station_codes: Vec<String>,
        columns: Vec<Column>,
    ) -> Self {
        Self {
            timestamps,
            station_codes,
            columns,
        }
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn column(&self, variable: Variable) -> Option<&Column> {
        self.columns.iter().find(|c| c.variable == variable)
    }

    pub fn has_column(&self, variable: Variable) -> bool {
        self.column(variable).is_some()
    }

    pub fn variables(&self) -> Vec<Variable> {
        self.columns.iter().map(|c| c.variable).collect()
    }

    /// Header names with the identity columns first
    pub fn column_names(&self) -> Vec<&'static str> {
        let mut names = vec![TIMESTAMP_COLUMN, STATION_CODE_COLUMN];
        names.extend(self.columns.iter().map(Column::name));
        names
    }

    /// The same frame without one variable column
    pub fn without(mut self, variable: Variable) -> Self {
        self.columns.retain(|c| c.variable != variable);
        self
    }

    /// Append another frame's rows; both must carry the same columns in the same order
    pub fn append(&mut self, other: ObservationFrame) -> Result<()> {
        if self.columns.is_empty() && self.timestamps.is_empty() {
            *self = other;
            return Ok(());
        }

        if self.variables() != other.variables() {
            return Err(ProcessingError::InvalidFormat(format!(
                "Cannot append frame with columns {:?} to frame with columns {:?}",
                other.column_names(),
                self.column_names()
            )));
        }

        self.timestamps.extend(other.timestamps);
        self.station_codes.extend(other.station_codes);
        for (column, incoming) in self.columns.iter_mut().zip(other.columns) {
            column.data.extend(incoming.data)?;
        }

        Ok(())
    }
}
