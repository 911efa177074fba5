//! Projection of the strings database onto a single output language.

use crate::{
    options::{IncludeMode, Options},
    types::{Row, RowId, StringsFile},
};

/// Languages tried before the developer language when a row has no
/// translation for the requested language.
const FALLBACK_LANGUAGES: &[(&str, &[&str])] = &[("zh-TW", &["zh-Hant"])];

/// Selects and resolves the rows that go into a generated file.
pub struct OutputProcessor<'a> {
    strings: &'a StringsFile,
    options: &'a Options,
}

impl<'a> OutputProcessor<'a> {
    pub fn new(strings: &'a StringsFile, options: &'a Options) -> Self {
        OutputProcessor { strings, options }
    }

    /// The language used as last fallback.
    pub fn default_language(&self) -> Option<&'a str> {
        self.options
            .developer_language
            .as_deref()
            .or_else(|| self.strings.developer_language())
    }

    /// Ordered fallback languages for `language`.
    pub fn fallback_languages(&self, language: &str) -> Vec<&'a str> {
        let mut chain: Vec<&'a str> = FALLBACK_LANGUAGES
            .iter()
            .filter(|(lang, _)| *lang == language)
            .flat_map(|(_, fallbacks)| fallbacks.iter().copied())
            .collect();
        chain.extend(self.default_language());
        chain
    }

    /// Builds a detached file holding, per selected row, one resolved value for
    /// `language`. Sections are kept even when they end up empty.
    pub fn process(&self, language: &str) -> StringsFile {
        let fallbacks = self.fallback_languages(language);
        let mut result = StringsFile::new();
        result.set_language_codes(self.strings.language_codes().to_vec());

        for section in self.strings.sections() {
            let target = result.add_section(section.name.clone());
            for &id in section.rows() {
                if !self
                    .strings
                    .matches_tags(id, &self.options.tags, self.options.untagged)
                {
                    continue;
                }
                if let Some(value) = self.resolve(id, language, &fallbacks) {
                    result.push_row(target, self.detached_row(id, language, value));
                }
            }
        }

        result
    }

    fn resolve(&self, id: RowId, language: &str, fallbacks: &[&str]) -> Option<&'a str> {
        let direct = self.strings.translated(id, language);
        let from_fallbacks = || {
            fallbacks
                .iter()
                .find_map(|lang| self.strings.translated(id, lang))
        };
        match self.options.include {
            IncludeMode::All => direct.or_else(from_fallbacks),
            IncludeMode::Translated => direct,
            IncludeMode::Untranslated => match direct {
                Some(_) => None,
                None => from_fallbacks(),
            },
        }
    }

    fn detached_row(&self, id: RowId, language: &str, value: &str) -> Row {
        let source = self.strings.row(id);
        let mut row = Row::new(source.key.clone());
        row.comment = self.strings.effective_comment(id).map(str::to_string);
        row.tags = self.strings.effective_tags(id).map(<[String]>::to_vec);
        for lang in self.strings.language_codes() {
            if let Some(translation) = self.strings.translated(id, lang) {
                row.set_translation(lang.as_str(), translation);
            }
        }
        row.set_translation(language, value);
        row
    }
}
