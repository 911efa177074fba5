//! Core types of the strings database.
//!
//! A [`StringsFile`] owns every [`Row`] in an arena and keeps the section
//! structure as ordered lists of [`RowId`]s, so that rows can point at each
//! other (`ref = other_key`) without shared ownership.

use std::collections::HashMap;

/// Index of a row inside its [`StringsFile`].
pub type RowId = usize;

/// A single string key with its translations.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    /// Unique key of the row.
    pub key: String,

    /// Comment for translators, as written in the strings file.
    pub comment: Option<String>,

    /// `None` inherits the tags of the referenced row, `Some(vec![])` marks the
    /// row as explicitly untagged.
    pub tags: Option<Vec<String>>,

    /// Key of the row this one inherits from.
    pub reference_key: Option<String>,

    translations: HashMap<String, String>,
    reference: Option<RowId>,
}

impl Row {
    pub fn new(key: impl Into<String>) -> Self {
        Row {
            key: key.into(),
            ..Default::default()
        }
    }

    /// The row's own translation for `lang`, ignoring any reference.
    pub fn translation(&self, lang: &str) -> Option<&str> {
        self.translations.get(lang).map(String::as_str)
    }

    pub fn translations(&self) -> &HashMap<String, String> {
        &self.translations
    }

    pub fn set_translation(&mut self, lang: impl Into<String>, value: impl Into<String>) {
        self.translations.insert(lang.into(), value.into());
    }

    /// The resolved reference, if `reference_key` named an existing row.
    pub fn reference(&self) -> Option<RowId> {
        self.reference
    }

    pub fn with_translation(mut self, lang: &str, value: &str) -> Self {
        self.set_translation(lang, value);
        self
    }

    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = Some(tags.iter().map(|t| t.to_string()).collect());
        self
    }

    pub fn with_reference(mut self, key: &str) -> Self {
        self.reference_key = Some(key.to_string());
        self
    }
}

/// A named, ordered group of rows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Section {
    pub name: String,
    rows: Vec<RowId>,
    /// Holds rows that appeared before any `[[...]]` line.
    headerless: bool,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Section {
            name: name.into(),
            rows: Vec::new(),
            headerless: false,
        }
    }

    pub fn rows(&self) -> &[RowId] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn is_headerless(&self) -> bool {
        self.headerless
    }
}

/// The in-memory strings database.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StringsFile {
    sections: Vec<Section>,
    rows: Vec<Row>,
    index: HashMap<String, RowId>,
    language_codes: Vec<String>,
}

impl StringsFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Iterates over every row in file order, together with its id.
    pub fn rows(&self) -> impl Iterator<Item = (RowId, &Row)> {
        self.sections
            .iter()
            .flat_map(|section| section.rows.iter())
            .map(|&id| (id, &self.rows[id]))
    }

    pub fn row(&self, id: RowId) -> &Row {
        &self.rows[id]
    }

    pub fn row_mut(&mut self, id: RowId) -> &mut Row {
        &mut self.rows[id]
    }

    /// Looks up the row currently registered for `key`.
    pub fn id_of(&self, key: &str) -> Option<RowId> {
        self.index.get(key).copied()
    }

    pub fn get(&self, key: &str) -> Option<&Row> {
        self.id_of(key).map(|id| &self.rows[id])
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Row> {
        self.id_of(key).map(|id| &mut self.rows[id])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn language_codes(&self) -> &[String] {
        &self.language_codes
    }

    /// The first language code, which acts as source of truth and fallback.
    pub fn developer_language(&self) -> Option<&str> {
        self.language_codes.first().map(String::as_str)
    }

    /// Registers a language code.
    ///
    /// The first code ever added becomes the developer language. Later codes
    /// keep it in front and the remaining codes are kept sorted.
    pub fn add_language_code(&mut self, code: &str) {
        if self.language_codes.iter().any(|c| c == code) {
            return;
        }
        self.language_codes.push(code.to_string());
        if self.language_codes.len() > 2 {
            self.language_codes[1..].sort();
        }
    }

    pub(crate) fn set_language_codes(&mut self, codes: Vec<String>) {
        self.language_codes = codes;
    }

    /// Moves `code` to the front without reordering the other codes.
    pub fn set_developer_language(&mut self, code: &str) {
        self.language_codes.retain(|c| c != code);
        self.language_codes.insert(0, code.to_string());
    }

    /// Appends a section and returns its position.
    pub fn add_section(&mut self, name: impl Into<String>) -> usize {
        self.sections.push(Section::new(name));
        self.sections.len() - 1
    }

    /// Appends the unnamed section that collects rows written before the
    /// first section header.
    pub(crate) fn add_headerless_section(&mut self) -> usize {
        let mut section = Section::new("");
        section.headerless = true;
        self.sections.push(section);
        self.sections.len() - 1
    }

    /// Inserts a section at `position`.
    pub fn insert_section(&mut self, position: usize, name: impl Into<String>) {
        self.sections.insert(position, Section::new(name));
    }

    pub fn section_position(&self, name: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.name == name)
    }

    /// Appends `row` to the section at `section`, indexing it by key.
    ///
    /// A key that is already present is re-pointed at the new row; the old
    /// row stays in its section.
    pub fn push_row(&mut self, section: usize, row: Row) -> RowId {
        let id = self.rows.len();
        self.index.insert(row.key.clone(), id);
        self.rows.push(row);
        self.sections[section].rows.push(id);
        id
    }

    /// Attaches every `reference_key` to the row it names. Unknown keys are
    /// left unresolved.
    pub fn resolve_references(&mut self) {
        for id in 0..self.rows.len() {
            let reference = self.rows[id]
                .reference_key
                .as_ref()
                .and_then(|key| self.index.get(key).copied());
            self.rows[id].reference = reference;
        }
    }

    /// Walks from `id` along its references. Cycles end the walk once every
    /// row could have been visited.
    fn chain(&self, id: RowId) -> impl Iterator<Item = &Row> {
        let mut next = Some(id);
        let mut budget = self.rows.len();
        std::iter::from_fn(move || {
            let current = next?;
            if budget == 0 {
                return None;
            }
            budget -= 1;
            let row = &self.rows[current];
            next = row.reference;
            Some(row)
        })
    }

    /// Comment of the row, falling back to its reference.
    pub fn effective_comment(&self, id: RowId) -> Option<&str> {
        self.chain(id).find_map(|row| row.comment.as_deref())
    }

    /// Tags of the row, falling back to its reference.
    pub fn effective_tags(&self, id: RowId) -> Option<&[String]> {
        self.chain(id).find_map(|row| row.tags.as_deref())
    }

    /// Translation of the row for `lang`, falling back to its reference.
    pub fn translated(&self, id: RowId, lang: &str) -> Option<&str> {
        self.chain(id).find_map(|row| row.translation(lang))
    }

    /// Whether the row is selected by the tag filter `requested`.
    pub fn matches_tags(&self, id: RowId, requested: &[String], include_untagged: bool) -> bool {
        if requested.is_empty() {
            return true;
        }
        match self.effective_tags(id) {
            None | Some([]) => include_untagged,
            Some(tags) => tags.iter().any(|tag| requested.contains(tag)),
        }
    }
}
