use crate::mapping::MappingParse;
use crate::mapping::PromptTable;
use crate::mapping::default_table;
use crate::mapping::parse_mapping;
use crate::observer::SelectorObserver;

const LAST_RESORT_KEY: &str = "key1";
const LAST_RESORT_VALUE: &str = "value1";

/// One sentence produced from the paired word lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub sentence: String,
    pub index: usize,
}

/// Per-node state: the parsed prompt table and the word-list cursors.
#[derive(Debug, Default)]
pub struct SelectorInstance {
    table: PromptTable,
    last_raw_input: Option<String>,
    source_cursor: usize,
    target_cursor: usize,
}

impl SelectorInstance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the table from `raw` unless it matches the last input seen.
    ///
    /// A failed parse keeps the previous table. Whenever the table ends up
    /// empty the default pairs are installed.
    pub fn reparse(&mut self, raw: &str, observer: &dyn SelectorObserver) {
        if self.last_raw_input.as_deref() == Some(raw) {
            return;
        }

        match parse_mapping(raw) {
            MappingParse::Parsed(table) => self.table = table,
            MappingParse::WrongShape { key: Some(key) } => observer.on_warning(&format!(
                "prompt mapping value for key {key:?} is not a string, keeping {} existing keys: {raw}",
                self.table.len()
            )),
            MappingParse::WrongShape { key: None } => observer.on_warning(&format!(
                "prompt mapping is not a JSON object, keeping {} existing keys: {raw}",
                self.table.len()
            )),
            MappingParse::SyntaxError(err) => observer.on_warning(&format!(
                "failed to parse prompt mapping ({err}), keeping {} existing keys: {raw}",
                self.table.len()
            )),
        }
        self.last_raw_input = Some(raw.to_string());

        if self.table.is_empty() {
            observer.on_warning("prompt mapping is empty, installing default key/value pairs");
            self.table = default_table();
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.table.keys().cloned().collect()
    }

    pub fn table(&self) -> &PromptTable {
        &self.table
    }

    pub fn last_raw_input(&self) -> Option<&str> {
        self.last_raw_input.as_deref()
    }

    pub fn cursors(&self) -> (usize, usize) {
        (self.source_cursor, self.target_cursor)
    }

    /// Looks up `requested`, falling back to the first key in the table.
    pub fn resolve_value(&mut self, requested: &str, observer: &dyn SelectorObserver) -> String {
        if let Some(value) = self.table.get(requested) {
            return value.clone();
        }

        if let Some((key, value)) = self.table.first() {
            observer.on_info(&format!(
                "key {requested:?} not found, using first available key {key:?}"
            ));
            return value.clone();
        }

        observer.on_info(&format!(
            "prompt table is empty, using fallback key {LAST_RESORT_KEY:?}"
        ));
        self.table
            .insert(LAST_RESORT_KEY.to_string(), LAST_RESORT_VALUE.to_string());
        LAST_RESORT_VALUE.to_string()
    }

    /// Pairs the words at the current cursor and advances both cursors.
    ///
    /// Returns `None` without touching the cursors when either list is empty.
    pub fn substitute(
        &mut self,
        source_words: &[String],
        target_words: &[String],
        observer: &dyn SelectorObserver,
    ) -> Option<Substitution> {
        if source_words.is_empty() || target_words.is_empty() {
            return None;
        }

        let limit = source_words.len().min(target_words.len());
        let mut index = self.source_cursor.max(self.target_cursor);
        if index >= limit {
            observer.on_warning("word lists exhausted, wrapping around to the first entry");
            index = 0;
            self.source_cursor = 0;
            self.target_cursor = 0;
        }

        let sentence = format!(
            "把图片中的{}替换成{}",
            source_words[index], target_words[index]
        );
        self.source_cursor += 1;
        self.target_cursor += 1;

        Some(Substitution { sentence, index })
    }
}
