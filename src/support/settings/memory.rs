use super::{
    Field, SettingsStore,
    entry::{self, Entry, Table},
};

/// An in-memory settings store.
///
/// Built up with [`with`](Self::with) and [`with_bounds`](Self::with_bounds);
/// each call appends occurrences to a name, so indices follow call order.
///
/// ```
/// use p2p_paralleling::support::settings::{Field, MemorySettings, SettingsStore};
///
/// let store = MemorySettings::new()
///     .with("mva", ["100", "50"])
///     .with_bounds("bandcenter", [("120", "100", "135")]);
///
/// assert_eq!(store.get("mva", 1, Field::Value), "50");
/// assert_eq!(store.get("bandcenter", 0, Field::Max), "135");
/// assert_eq!(store.get("mva", 2, Field::Value), "0");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    table: Table,
}

impl MemorySettings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends occurrences of `name` that only carry a `value` field.
    #[must_use]
    pub fn with<I>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.table
            .entry(name.to_owned())
            .or_default()
            .extend(values.into_iter().map(|value| Entry {
                value: Some(value.into()),
                ..Entry::default()
            }));
        self
    }

    /// Appends occurrences of `name` given as `(value, min, max)`.
    #[must_use]
    pub fn with_bounds<I, V>(mut self, name: &str, rows: I) -> Self
    where
        I: IntoIterator<Item = (V, V, V)>,
        V: Into<String>,
    {
        self.table
            .entry(name.to_owned())
            .or_default()
            .extend(rows.into_iter().map(|(value, min, max)| Entry {
                value: Some(value.into()),
                min: Some(min.into()),
                max: Some(max.into()),
            }));
        self
    }
}

impl SettingsStore for MemorySettings {
    fn lookup(&self, name: &str, index: usize, field: Field) -> Option<String> {
        entry::lookup(&self.table, name, index, field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_names_append() {
        let store = MemorySettings::new()
            .with("breakers", ["000", "100"])
            .with("breakers", ["110"]);

        assert_eq!(store.lookup("breakers", 2, Field::Value).as_deref(), Some("110"));
        assert_eq!(store.lookup("breakers", 3, Field::Value), None);
    }

    #[test]
    fn value_only_rows_have_no_bounds() {
        let store = MemorySettings::new().with("ct", ["5000"]);

        assert_eq!(store.lookup("ct", 0, Field::Min), None);
        assert_eq!(store.get("ct", 0, Field::Min), "0");
    }
}
