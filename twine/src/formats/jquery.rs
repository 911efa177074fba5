//! Support for jQuery localize JSON files: one flat object per language.

use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};

use crate::{
    consumer::Consumer,
    error::Error,
    formats::{FormatType, Formatter, escape_quotes, join_sections, language_from_file_stem},
    options::Options,
    processor::OutputProcessor,
    types::{RowId, Section, StringsFile},
};

lazy_static! {
    static ref FILE_LANGUAGE_REGEX: Regex = Regex::new(r"^.+-([^-]{2})\.json$").unwrap();
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JQueryFormatter;

impl Formatter for JQueryFormatter {
    fn format_type(&self) -> FormatType {
        FormatType::JQuery
    }

    fn extension(&self) -> &'static str {
        ".json"
    }

    fn default_file_name(&self) -> &'static str {
        "localize.json"
    }

    fn determine_language(&self, path: &Path, _strings: &StringsFile) -> Option<String> {
        path.file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| FILE_LANGUAGE_REGEX.captures(name))
            .map(|captures| captures[1].to_string())
            .or_else(|| language_from_file_stem(path))
    }

    fn read(&self, content: &str, lang: &str, consumer: &mut Consumer<'_>) -> Result<(), Error> {
        let object: Map<String, Value> = serde_json::from_str(content)?;
        for (key, value) in object {
            match value {
                Value::String(value) => consumer.set_translation(&key, lang, &value),
                other => consumer
                    .sink()
                    .warning(&format!("Ignoring non-string value for '{key}': {other}")),
            }
        }
        Ok(())
    }

    fn format_file(
        &self,
        strings: &StringsFile,
        lang: &str,
        options: &Options,
    ) -> Result<Option<String>, Error> {
        let processed = OutputProcessor::new(strings, options).process(lang);
        if processed.is_empty() {
            return Ok(None);
        }
        let sections = join_sections(self, &processed, lang, ",\n\n")?;
        Ok(Some(format!("{{\n{sections}\n}}\n")))
    }

    fn format_section(
        &self,
        strings: &StringsFile,
        section: &Section,
        lang: &str,
    ) -> Result<Option<String>, Error> {
        let rows = section
            .rows()
            .iter()
            .copied()
            .filter(|&id| self.should_include_row(strings, id, lang))
            .map(|id| self.format_row(strings, id, lang))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((!rows.is_empty()).then(|| rows.join(",\n")))
    }

    fn format_row(&self, strings: &StringsFile, id: RowId, lang: &str) -> Result<String, Error> {
        self.format_key_value(strings, id, lang)
    }

    fn render_key_value(&self, key: &str, value: &str) -> String {
        format!("\"{key}\":\"{value}\"")
    }

    fn format_key(&self, key: &str) -> String {
        escape_quotes(key)
    }

    fn format_value(&self, value: &str) -> Result<String, Error> {
        Ok(escape_quotes(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{diagnostics::CollectingSink, formats::test_support::*};
    use indoc::indoc;

    const SAMPLE: &str = indoc! {r#"
        {
        "key1":"value1-english",
        "key2":"value2-english",

        "key3":"value3-english",
        "key4":"value4-english"
        }
    "#};

    #[test]
    fn test_format_file() {
        let output = JQueryFormatter
            .format_file(&sample_strings(), "en", &Options::new())
            .unwrap()
            .unwrap();
        assert_eq!(output, SAMPLE);
    }

    #[test]
    fn test_read_generated_file() {
        let mut strings = empty_strings();
        let options = Options::new().with_consume_all(true);
        let mut sink = CollectingSink::new();
        let mut consumer = Consumer::new(&mut strings, &options, &mut sink);
        JQueryFormatter.read(SAMPLE, "en", &mut consumer).unwrap();
        assert_sample_translations(&strings);
        let keys: Vec<&str> = strings.rows().map(|(_, row)| row.key.as_str()).collect();
        assert_eq!(keys, ["key1", "key2", "key3", "key4"]);
    }

    #[test]
    fn test_read_warns_about_non_string_values() {
        let mut strings = empty_strings();
        let options = Options::new().with_consume_all(true);
        let mut sink = CollectingSink::new();
        let mut consumer = Consumer::new(&mut strings, &options, &mut sink);
        JQueryFormatter
            .read(indoc! {r#"{"ok": "fine", "count": 3}"#}, "en", &mut consumer)
            .unwrap();
        assert!(strings.get("ok").is_some());
        assert!(strings.get("count").is_none());
        assert!(sink.has_warning("count"));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let mut strings = empty_strings();
        let options = Options::new();
        let mut sink = CollectingSink::new();
        let mut consumer = Consumer::new(&mut strings, &options, &mut sink);
        let result = JQueryFormatter.read("not json", "en", &mut consumer);
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_language_from_file_name() {
        let strings = StringsFile::new();
        let lang = |path: &str| JQueryFormatter.determine_language(Path::new(path), &strings);
        assert_eq!(lang("i18n/app-fr.json").as_deref(), Some("fr"));
        assert_eq!(lang("i18n/de.json").as_deref(), Some("de"));
        assert_eq!(lang("i18n/localize.json"), None);
    }
}
