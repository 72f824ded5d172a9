use std::{fs, path::Path, str::FromStr};

use quick_xml::{Reader, events::Event, name::LocalName};
use tracing::{debug, warn};

use super::{
    Field, SettingsError, SettingsStore,
    entry::{self, Entry, Table},
};

/// A settings store backed by an XML setup document.
///
/// The document root may have any name. Its `<setting>` children each carry a
/// `<name>` and any of `<value>`, `<min>` and `<max>`:
///
/// ```
/// use p2p_paralleling::support::settings::{Field, SettingsStore, XmlSettings};
///
/// let store: XmlSettings = r#"
///     <settings>
///       <setting><name>ct</name><value>5000</value><min>1</min><max>9999</max></setting>
///       <setting><name>ct</name><value>4500</value></setting>
///     </settings>
/// "#.parse().unwrap();
///
/// assert_eq!(store.get("ct", 1, Field::Value), "4500");
/// assert_eq!(store.get("ct", 0, Field::Max), "9999");
/// ```
///
/// Only direct children of the root and of each `<setting>` count. A child's
/// text is all text inside it, CDATA included, so comments don't split a
/// value. A `<setting>` without a `<name>` can't be looked up and is skipped.
///
/// Loading fails on malformed XML. Once loaded, lookups follow the store
/// contract and read a missing entry as `"0"`.
#[derive(Debug, Clone, Default)]
pub struct XmlSettings {
    table: Table,
}

impl XmlSettings {
    /// Reads and parses a setup file.
    ///
    /// # Errors
    ///
    /// Returns a [`SettingsError`] if the file can't be read or isn't a valid
    /// setup document.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let doc = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = doc.parse::<Self>()?;
        debug!(path = %path.display(), names = settings.table.len(), "loaded setup file");
        Ok(settings)
    }
}

impl FromStr for XmlSettings {
    type Err = SettingsError;

    fn from_str(doc: &str) -> Result<Self, Self::Err> {
        Ok(Self {
            table: parse_document(doc)?,
        })
    }
}

impl SettingsStore for XmlSettings {
    fn lookup(&self, name: &str, index: usize, field: Field) -> Option<String> {
        entry::lookup(&self.table, name, index, field)
    }
}

/// A root-level `<setting>` element while its children are being read.
#[derive(Default)]
struct PendingSetting {
    name: Option<String>,
    entry: Entry,
}

impl PendingSetting {
    /// Records the text of a direct child. The first occurrence of a child wins.
    fn fill(&mut self, slot: Slot, text: String) {
        let target = match slot {
            Slot::Name => &mut self.name,
            Slot::Field(field) => self.entry.field_mut(field),
        };
        if target.is_none() {
            *target = Some(text);
        }
    }
}

/// Direct child of `<setting>` whose text is being collected.
#[derive(Clone, Copy)]
enum Slot {
    Name,
    Field(Field),
}

impl Slot {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "name" => Some(Self::Name),
            "value" => Some(Self::Field(Field::Value)),
            "min" => Some(Self::Field(Field::Min)),
            "max" => Some(Self::Field(Field::Max)),
            _ => None,
        }
    }
}

/// Open elements around a root-level `<setting>`.
const SETTING_DEPTH: usize = 1;

/// Open elements around the `<name>`, `<value>`, `<min>` and `<max>` children.
const SLOT_DEPTH: usize = 2;

fn parse_document(doc: &str) -> Result<Table, SettingsError> {
    let mut reader = Reader::from_str(doc);
    reader.trim_text(true);

    let mut table = Table::new();
    let mut depth = 0;
    let mut current: Option<PendingSetting> = None;
    let mut slot: Option<Slot> = None;
    let mut text = String::new();
    let mut position = 0;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                let tag = tag_name(e.local_name());
                if depth == SETTING_DEPTH && tag == "setting" {
                    current = Some(PendingSetting::default());
                } else if depth == SLOT_DEPTH && current.is_some() {
                    slot = Slot::from_tag(&tag);
                    text.clear();
                }
                depth += 1;
            }
            Event::Empty(ref e) => {
                let tag = tag_name(e.local_name());
                if depth == SETTING_DEPTH && tag == "setting" {
                    finish(&mut table, PendingSetting::default(), position);
                    position += 1;
                } else if let (SLOT_DEPTH, Some(setting), Some(target)) =
                    (depth, current.as_mut(), Slot::from_tag(&tag))
                {
                    // `<value/>` is present but empty.
                    setting.fill(target, String::new());
                }
            }
            Event::Text(e) => {
                if slot.is_some() {
                    text.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if slot.is_some() {
                    text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if depth == SLOT_DEPTH {
                    if let (Some(setting), Some(target)) = (current.as_mut(), slot.take()) {
                        setting.fill(target, text.trim().to_owned());
                    }
                } else if depth == SETTING_DEPTH {
                    if let Some(setting) = current.take() {
                        finish(&mut table, setting, position);
                        position += 1;
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(table)
}

/// Adds a completed setting to the table. Settings without a name can never
/// be looked up and are skipped.
fn finish(table: &mut Table, setting: PendingSetting, position: usize) {
    match setting.name {
        Some(name) => table.entry(name).or_default().push(setting.entry),
        None => warn!(position, "skipping setting without a name"),
    }
}

fn tag_name(name: LocalName<'_>) -> String {
    String::from_utf8_lossy(name.as_ref()).into_owned()
}
