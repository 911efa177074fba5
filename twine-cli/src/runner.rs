//! The operations behind each command.

use std::{
    fs,
    path::{Path, PathBuf},
};

use ignore::WalkBuilder;
use twine::{
    Consumer, DiagnosticSink, Error, Formatter, Options, Registry, StringsFile, encoding,
    validate_strings_file,
};

use crate::{
    error::CliError,
    loc_drop::{self, LocDropWriter},
};

/// Settings of one run, after merging flags and config.
#[derive(Debug, Clone, Default)]
pub struct RunnerOptions {
    pub strings_file: PathBuf,
    pub languages: Vec<String>,
    pub format: Option<String>,
    pub output_file: Option<PathBuf>,
    pub file_name: Option<String>,
    pub create_folders: bool,
    pub encoding: Option<String>,
    pub validate: bool,
    pub pedantic: bool,
    pub twine: Options,
}

pub struct Runner<'a> {
    registry: &'a Registry,
    strings: StringsFile,
    options: RunnerOptions,
    sink: &'a mut dyn DiagnosticSink,
}

impl<'a> Runner<'a> {
    pub fn new(
        registry: &'a Registry,
        strings: StringsFile,
        options: RunnerOptions,
        sink: &'a mut dyn DiagnosticSink,
    ) -> Self {
        Runner {
            registry,
            strings,
            options,
            sink,
        }
    }

    pub fn strings(&self) -> &StringsFile {
        &self.strings
    }

    pub fn generate_string_file(&mut self, output_path: &Path) -> Result<(), CliError> {
        self.validate_if_requested()?;

        let lang = self.single_language()?;
        let (formatter, lang) = self.prepare_read_write(output_path, lang)?;
        let output = formatter
            .format_file(&self.strings, &lang, &self.options.twine)?
            .ok_or_else(|| {
                CliError::operation(
                    "Nothing to generate! The resulting file would not contain any strings.",
                )
            })?;

        self.write_output(output_path, &output)
    }

    pub fn generate_all_string_files(&mut self, output_dir: &Path) -> Result<(), CliError> {
        self.validate_if_requested()?;

        if !output_dir.is_dir() {
            if self.options.create_folders {
                fs::create_dir_all(output_dir)?;
            } else {
                return Err(CliError::operation(format!(
                    "Directory does not exist: {}",
                    output_dir.display()
                )));
            }
        }

        let formatter = match &self.options.format {
            Some(name) => self.formatter_by_name(name)?,
            None => self
                .registry
                .for_directory(output_dir)
                .ok_or_else(|| Error::FormatResolution(output_dir.to_path_buf()))?,
        };
        let file_name = self
            .options
            .file_name
            .clone()
            .unwrap_or_else(|| formatter.default_file_name().to_string());

        if self.options.create_folders {
            for lang in self.strings.language_codes().to_vec() {
                let lang_dir =
                    output_dir.join(formatter.output_path_for_language(&lang, &self.strings));
                fs::create_dir_all(&lang_dir)?;
                self.write_formatted(formatter, &lang, &lang_dir.join(&file_name))?;
            }
            return Ok(());
        }

        let mut language_found = false;
        for lang_dir in subdirectories(output_dir)? {
            let Some(lang) = formatter.determine_language(&lang_dir, &self.strings) else {
                continue;
            };
            language_found = true;
            self.write_formatted(formatter, &lang, &lang_dir.join(&file_name))?;
        }

        if !language_found {
            return Err(CliError::operation(format!(
                "Failed to generate any files: No languages found at {}",
                output_dir.display()
            )));
        }
        Ok(())
    }

    pub fn consume_string_file(&mut self, input_path: &Path) -> Result<(), CliError> {
        let lang = self.single_language()?;
        self.read_string_file(input_path, lang)?;
        self.write_strings_data()
    }

    pub fn consume_all_string_files(&mut self, input_dir: &Path) -> Result<(), CliError> {
        if !input_dir.is_dir() {
            return Err(CliError::operation(format!(
                "Directory does not exist: {}",
                input_dir.display()
            )));
        }

        let walker = WalkBuilder::new(input_dir)
            .standard_filters(false)
            .hidden(true)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    self.sink.warning(&e.to_string());
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            if let Err(e) = self.read_string_file(entry.path(), None) {
                self.sink.warning(&format!(
                    "Unable to consume file at {}: {e}",
                    entry.path().display()
                ));
            }
        }

        self.write_strings_data()
    }

    pub fn generate_loc_drop(&mut self, archive_path: &Path) -> Result<(), CliError> {
        self.validate_if_requested()?;

        let name = self.options.format.clone().ok_or_else(|| {
            CliError::usage("You must specify a format with --format to generate a loc drop.")
        })?;
        let formatter = self.formatter_by_name(&name)?;

        if archive_path.is_file() {
            fs::remove_file(archive_path)?;
        }

        let mut writer = LocDropWriter::create(archive_path)?;
        for lang in self.strings.language_codes().to_vec() {
            if !self.options.languages.is_empty() && !self.options.languages.contains(&lang) {
                continue;
            }
            let file_name = format!("{lang}{}", formatter.extension());
            match formatter.format_file(&self.strings, &lang, &self.options.twine)? {
                Some(output) => {
                    let bytes = encoding::encode(&output, self.options.encoding.as_deref())?;
                    writer.add_file(&file_name, &bytes)?;
                }
                None => self.sink.warning(&format!(
                    "Skipping file {file_name} since it would not contain any strings."
                )),
            }
        }
        writer.finish()
    }

    pub fn consume_loc_drop(&mut self, archive_path: &Path) -> Result<(), CliError> {
        if !archive_path.is_file() {
            return Err(CliError::operation(format!(
                "File does not exist: {}",
                archive_path.display()
            )));
        }

        for entry in loc_drop::read_entries(archive_path)? {
            let path = Path::new(&entry.name);
            if let Err(e) = self.read_string_content(path, &entry.content, None) {
                self.sink
                    .warning(&format!("Unable to consume file at {}: {e}", entry.name));
            }
        }

        self.write_strings_data()
    }

    pub fn validate_strings_file(&self) -> Result<(), CliError> {
        validate_strings_file(&self.strings, self.options.pedantic)?;
        Ok(())
    }

    fn validate_if_requested(&self) -> Result<(), CliError> {
        if self.options.validate {
            self.validate_strings_file()?;
        }
        Ok(())
    }

    fn single_language(&self) -> Result<Option<String>, CliError> {
        match self.options.languages.as_slice() {
            [] => Ok(None),
            [lang] => Ok(Some(lang.clone())),
            _ => Err(CliError::usage(
                "Only a single language may be given for this command.",
            )),
        }
    }

    fn formatter_by_name(&self, name: &str) -> Result<&'a dyn Formatter, CliError> {
        let registry = self.registry;
        registry
            .by_name(name)
            .ok_or_else(|| Error::UnknownFormat(name.to_string()).into())
    }

    /// The formatter and language for reading or writing `path`; the language
    /// is added to the strings file.
    fn prepare_read_write(
        &mut self,
        path: &Path,
        lang: Option<String>,
    ) -> Result<(&'a dyn Formatter, String), CliError> {
        let formatter = match &self.options.format {
            Some(name) => self.formatter_by_name(name)?,
            None => self
                .registry
                .for_path(path)
                .ok_or_else(|| Error::FormatResolution(path.to_path_buf()))?,
        };

        let lang = lang
            .or_else(|| self.known_language_from_file_stem(path))
            .or_else(|| formatter.determine_language(path, &self.strings))
            .ok_or_else(|| Error::LanguageResolution(path.to_path_buf()))?;

        self.strings.add_language_code(&lang);
        Ok((formatter, lang))
    }

    fn known_language_from_file_stem(&self, path: &Path) -> Option<String> {
        let stem = path.file_stem()?.to_str()?;
        self.strings
            .language_codes()
            .iter()
            .find(|code| *code == stem)
            .cloned()
    }

    fn read_string_file(&mut self, path: &Path, lang: Option<String>) -> Result<(), CliError> {
        if !path.is_file() {
            return Err(CliError::operation(format!(
                "File does not exist: {}",
                path.display()
            )));
        }
        let bytes = fs::read(path)?;
        self.read_string_content(path, &bytes, lang)
    }

    fn read_string_content(
        &mut self,
        path: &Path,
        bytes: &[u8],
        lang: Option<String>,
    ) -> Result<(), CliError> {
        let (formatter, lang) = self.prepare_read_write(path, lang)?;
        let content = encoding::decode(bytes, self.options.encoding.as_deref())?;
        tracing::debug!(path = %path.display(), format = formatter.format_name(), %lang, "consuming");

        let mut consumer = Consumer::new(&mut self.strings, &self.options.twine, &mut *self.sink);
        formatter.read(&content, &lang, &mut consumer)?;
        Ok(())
    }

    fn write_formatted(
        &mut self,
        formatter: &dyn Formatter,
        lang: &str,
        file_path: &Path,
    ) -> Result<(), CliError> {
        match formatter.format_file(&self.strings, lang, &self.options.twine)? {
            Some(output) => self.write_output(file_path, &output),
            None => {
                self.sink.warning(&format!(
                    "Skipping file at path {} since it would not contain any strings.",
                    file_path.display()
                ));
                Ok(())
            }
        }
    }

    fn write_output(&self, path: &Path, output: &str) -> Result<(), CliError> {
        encoding::write(path, output, self.options.encoding.as_deref())?;
        tracing::debug!(path = %path.display(), "wrote localization file");
        Ok(())
    }

    /// Writes the strings file to `--output-file` or back to its origin.
    fn write_strings_data(&mut self) -> Result<(), CliError> {
        if let Some(lang) = &self.options.twine.developer_language {
            self.strings.set_developer_language(lang);
        }
        let path = self
            .options
            .output_file
            .as_ref()
            .unwrap_or(&self.options.strings_file);
        self.strings.write_to(path, &mut *self.sink)?;
        Ok(())
    }
}

/// Subdirectories of `dir`, sorted by name.
fn subdirectories(dir: &Path) -> Result<Vec<PathBuf>, CliError> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use twine::{CollectingSink, IncludeMode};

    const STRINGS: &str = "[[General]]\n\
                           \t[yes]\n\
                           \t\ten = Yes\n\
                           \t\ttags = app\n\
                           \t\tfr = Oui\n\
                           \t[no]\n\
                           \t\ten = No\n\
                           \t\ttags = app\n";

    fn options(strings_file: &Path) -> RunnerOptions {
        RunnerOptions {
            strings_file: strings_file.to_path_buf(),
            ..RunnerOptions::default()
        }
    }

    fn strings() -> StringsFile {
        STRINGS.parse().unwrap()
    }

    #[test]
    fn test_generate_detects_format_and_language() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::builtin();
        let mut sink = CollectingSink::new();
        let mut runner = Runner::new(&registry, strings(), options(Path::new("s.txt")), &mut sink);

        let path = dir.path().join("fr.strings");
        runner.generate_string_file(&path).unwrap();
        let output = fs::read_to_string(&path).unwrap();
        assert!(output.contains("\"yes\" = \"Oui\";"));
        assert!(output.contains("\"no\" = \"No\";"));
    }

    #[test]
    fn test_generate_new_language_from_formatter_rule() {
        let dir = tempfile::tempdir().unwrap();
        let lang_dir = dir.path().join("values-de");
        fs::create_dir(&lang_dir).unwrap();
        let registry = Registry::builtin();
        let mut sink = CollectingSink::new();
        let mut runner = Runner::new(&registry, strings(), options(Path::new("s.txt")), &mut sink);

        runner
            .generate_string_file(&lang_dir.join("strings.xml"))
            .unwrap();
        assert!(runner.strings().language_codes().contains(&"de".to_string()));
    }

    #[test]
    fn test_generate_errors() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::builtin();
        let mut sink = CollectingSink::new();

        let mut runner = Runner::new(&registry, strings(), options(Path::new("s.txt")), &mut sink);
        assert!(matches!(
            runner.generate_string_file(&dir.path().join("fr.unknown")),
            Err(CliError::Twine(Error::FormatResolution(_)))
        ));
        assert!(matches!(
            runner.generate_string_file(&dir.path().join("strings.json")),
            Err(CliError::Twine(Error::LanguageResolution(_)))
        ));

        let mut opts = options(Path::new("s.txt"));
        opts.languages = vec!["fr".to_string(), "de".to_string()];
        let mut runner = Runner::new(&registry, strings(), opts, &mut sink);
        assert!(matches!(
            runner.generate_string_file(&dir.path().join("x.strings")),
            Err(CliError::Usage(_))
        ));
    }

    #[test]
    fn test_nothing_to_generate() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::builtin();
        let mut sink = CollectingSink::new();
        let mut opts = options(Path::new("s.txt"));
        opts.twine = Options::new().with_include(IncludeMode::Untranslated);
        let mut runner = Runner::new(&registry, strings(), opts, &mut sink);

        let error = runner
            .generate_string_file(&dir.path().join("en.strings"))
            .unwrap_err();
        assert!(error.to_string().starts_with("Nothing to generate!"));
        assert!(!dir.path().join("en.strings").exists());
    }

    #[test]
    fn test_generate_all_with_existing_folders() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("values")).unwrap();
        fs::create_dir(dir.path().join("values-fr")).unwrap();
        fs::create_dir(dir.path().join("drawable")).unwrap();
        fs::write(dir.path().join("values").join("strings.xml"), "<resources/>").unwrap();

        let registry = Registry::builtin();
        let mut sink = CollectingSink::new();
        let mut runner = Runner::new(&registry, strings(), options(Path::new("s.txt")), &mut sink);
        runner.generate_all_string_files(dir.path()).unwrap();

        let fr = fs::read_to_string(dir.path().join("values-fr/strings.xml")).unwrap();
        assert!(fr.contains("<string name=\"yes\">Oui</string>"));
        let en = fs::read_to_string(dir.path().join("values/strings.xml")).unwrap();
        assert!(en.contains("<string name=\"yes\">Yes</string>"));
        assert!(!dir.path().join("drawable/strings.xml").exists());
    }

    #[test]
    fn test_generate_all_creates_folders_and_skips_empty() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("Resources");
        let registry = Registry::builtin();
        let mut sink = CollectingSink::new();
        let mut opts = options(Path::new("s.txt"));
        opts.create_folders = true;
        opts.format = Some("apple".to_string());
        opts.twine = Options::new().with_include(IncludeMode::Untranslated);
        let mut runner = Runner::new(&registry, strings(), opts, &mut sink);
        runner.generate_all_string_files(&out).unwrap();
        drop(runner);

        // every English row is translated, so nothing is left for `en`
        assert!(out.join("en.lproj").is_dir());
        assert!(!out.join("en.lproj/Localizable.strings").exists());
        let fr = fs::read_to_string(out.join("fr.lproj/Localizable.strings")).unwrap();
        assert!(fr.contains("\"no\" = \"No\";"));
        assert!(!fr.contains("\"yes\""));
        assert!(sink.has_warning("Skipping file at path"));
    }

    #[test]
    fn test_generate_all_without_languages() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("assets")).unwrap();
        let registry = Registry::builtin();
        let mut sink = CollectingSink::new();
        let mut opts = options(Path::new("s.txt"));
        opts.format = Some("android".to_string());
        let mut runner = Runner::new(&registry, strings(), opts, &mut sink);

        let error = runner.generate_all_string_files(dir.path()).unwrap_err();
        assert!(error.to_string().starts_with("Failed to generate any files"));

        let missing = dir.path().join("missing");
        assert!(runner.generate_all_string_files(&missing).is_err());
    }

    #[test]
    fn test_consume_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let strings_file = dir.path().join("strings.txt");
        fs::write(&strings_file, STRINGS).unwrap();
        let input = dir.path().join("de.strings");
        fs::write(&input, "\"yes\" = \"Ja\";\n\"unknown\" = \"Unbekannt\";\n").unwrap();
        let output = dir.path().join("updated.txt");

        let registry = Registry::builtin();
        let mut sink = CollectingSink::new();
        let mut opts = options(&strings_file);
        opts.output_file = Some(output.clone());
        let mut runner = Runner::new(&registry, strings(), opts, &mut sink);
        runner.consume_string_file(&input).unwrap();
        drop(runner);

        let updated = fs::read_to_string(&output).unwrap();
        assert!(updated.contains("\t\tde = Ja\n"));
        assert!(!updated.contains("unknown"));
        assert_eq!(fs::read_to_string(&strings_file).unwrap(), STRINGS);
        assert!(sink.has_warning("'unknown' not found"));
    }

    #[test]
    fn test_consume_all_reports_failures_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        let strings_file = dir.path().join("strings.txt");
        let input = dir.path().join("locales");
        fs::create_dir_all(input.join("nested")).unwrap();
        fs::write(input.join("nested/de.json"), r#"{"yes":"Ja"}"#).unwrap();
        fs::write(input.join("notes.unknown"), "whatever").unwrap();
        fs::write(input.join("es.json"), "{ broken").unwrap();

        let registry = Registry::builtin();
        let mut sink = CollectingSink::new();
        let mut opts = options(&strings_file);
        opts.twine = Options::new().with_consume_all(true);
        opts.twine.developer_language = Some("en".to_string());
        let mut runner = Runner::new(&registry, strings(), opts, &mut sink);
        runner
            .consume_all_string_files(&input)
            .unwrap();
        drop(runner);

        let updated = fs::read_to_string(&strings_file).unwrap();
        assert!(updated.contains("\t\tde = Ja\n"));
        assert!(sink.has_warning("notes.unknown"));
        assert!(sink.has_warning("es.json"));
    }

    #[test]
    fn test_loc_drop_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let strings_file = dir.path().join("strings.txt");
        let archive = dir.path().join("drop.zip");
        let registry = Registry::builtin();
        let mut sink = CollectingSink::new();

        let mut opts = options(&strings_file);
        opts.format = Some("android".to_string());
        let mut runner = Runner::new(&registry, strings(), opts, &mut sink);
        runner.generate_loc_drop(&archive).unwrap();
        drop(runner);

        let names: Vec<String> = loc_drop::read_entries(&archive)
            .unwrap()
            .into_iter()
            .map(|entry| entry.name)
            .collect();
        assert_eq!(names, ["Locales/en.xml", "Locales/fr.xml"]);

        let mut empty = strings();
        for lang in ["en", "fr"] {
            for key in ["yes", "no"] {
                if let Some(row) = empty.get_mut(key) {
                    row.set_translation(lang, "");
                }
            }
        }
        let mut runner = Runner::new(&registry, empty, options(&strings_file), &mut sink);
        runner.consume_loc_drop(&archive).unwrap();
        assert_eq!(runner.strings().get("yes").unwrap().translation("fr"), Some("Oui"));
        assert_eq!(runner.strings().get("no").unwrap().translation("en"), Some("No"));
        assert!(strings_file.is_file());
    }

    #[test]
    fn test_loc_drop_requires_format() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::builtin();
        let mut sink = CollectingSink::new();
        let mut runner = Runner::new(&registry, strings(), options(Path::new("s.txt")), &mut sink);
        assert!(matches!(
            runner.generate_loc_drop(&dir.path().join("drop.zip")),
            Err(CliError::Usage(_))
        ));
        assert!(runner.consume_loc_drop(&dir.path().join("missing.zip")).is_err());
    }

    #[test]
    fn test_validate_before_generating() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::builtin();
        let mut sink = CollectingSink::new();
        let broken: StringsFile = "[[S]]\n\t[bad key]\n\t\ten = x\n".parse().unwrap();
        let mut opts = options(Path::new("s.txt"));
        opts.validate = true;
        let mut runner = Runner::new(&registry, broken, opts, &mut sink);

        let path = dir.path().join("en.strings");
        assert!(matches!(
            runner.generate_string_file(&path),
            Err(CliError::Twine(Error::Validation(_)))
        ));
        assert!(!path.exists());
    }
}
