use std::collections::HashMap;

use super::Field;

/// The three fields of one setting occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct Entry {
    pub(super) value: Option<String>,
    pub(super) min: Option<String>,
    pub(super) max: Option<String>,
}

impl Entry {
    pub(super) fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::Value => self.value.as_deref(),
            Field::Min => self.min.as_deref(),
            Field::Max => self.max.as_deref(),
        }
    }

    pub(super) fn field_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Value => &mut self.value,
            Field::Min => &mut self.min,
            Field::Max => &mut self.max,
        }
    }
}

/// Occurrences of each setting name, in document order.
pub(super) type Table = HashMap<String, Vec<Entry>>;

pub(super) fn lookup(table: &Table, name: &str, index: usize, field: Field) -> Option<String> {
    table
        .get(name)?
        .get(index)?
        .field(field)
        .map(str::to_owned)
}
