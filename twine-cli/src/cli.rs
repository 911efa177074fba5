//! Command line arguments and dispatch to the [`Runner`].

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use twine::{DiagnosticSink, IncludeMode, Options, Registry, StringsFile};

use crate::{
    config::Config,
    error::CliError,
    runner::{Runner, RunnerOptions},
};

/// Keep every translation of a project in one strings file and generate or
/// consume platform localization files from it.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate one localization file. Format and language are guessed from
    /// the output path when not given, e.g. `ko.xml` is Korean for Android.
    GenerateStringFile {
        strings_file: PathBuf,
        output_path: PathBuf,
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Generate the localization files of every language below a project's
    /// locale directory.
    GenerateAllStringFiles {
        strings_file: PathBuf,
        output_dir: PathBuf,
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Read the translations of one localization file into the strings file.
    ConsumeStringFile {
        strings_file: PathBuf,
        input_path: PathBuf,
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Read every localization file below a directory into the strings file.
    ConsumeAllStringFiles {
        strings_file: PathBuf,
        input_dir: PathBuf,
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Create a zip archive with one file per language for translators.
    GenerateLocDrop {
        strings_file: PathBuf,
        archive: PathBuf,
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Read a translated archive created by `generate-loc-drop`.
    ConsumeLocDrop {
        strings_file: PathBuf,
        archive: PathBuf,
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Check the strings file for duplicate and malformed keys.
    ValidateStringsFile {
        strings_file: PathBuf,
        #[command(flatten)]
        common: CommonArgs,
    },
}

/// Flags shared by all commands.
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Language code(s) to use for the action
    #[arg(short = 'l', long = "lang", value_delimiter = ',')]
    pub languages: Vec<String>,

    /// Only process strings carrying one of these tags
    #[arg(short, long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// With --tags, also select strings without any tag
    #[arg(short, long)]
    pub untagged: bool,

    /// File format to read or write (apple, android, gettext, jquery, django, flash, tizen)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Add keys that are missing from the strings file while consuming
    #[arg(short = 'a', long)]
    pub consume_all: bool,

    /// Which strings to generate: all, translated or untranslated
    #[arg(short, long)]
    pub include: Option<IncludeMode>,

    /// Write the updated strings file here instead of replacing the original
    #[arg(short, long)]
    pub output_file: Option<PathBuf>,

    /// File name used by generate-all-string-files instead of the format's default
    #[arg(short = 'n', long)]
    pub file_name: Option<String>,

    /// Create output folders for every language in generate-all-string-files
    #[arg(short = 'r', long)]
    pub create_folders: bool,

    /// Language listed first in the strings file and used as fallback
    #[arg(short, long)]
    pub developer_language: Option<String>,

    /// Take over comments found while consuming
    #[arg(short, long)]
    pub consume_comments: bool,

    /// Encoding of generated files, and of input files without a byte order mark
    #[arg(short, long)]
    pub encoding: Option<String>,

    /// Validate the strings file before generating
    #[arg(long)]
    pub validate: bool,

    /// Also require every string to carry a tag when validating
    #[arg(short, long)]
    pub pedantic: bool,

    /// Config file, defaults to twine.toml next to the strings file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Command {
    pub fn strings_file(&self) -> &Path {
        match self {
            Command::GenerateStringFile { strings_file, .. }
            | Command::GenerateAllStringFiles { strings_file, .. }
            | Command::ConsumeStringFile { strings_file, .. }
            | Command::ConsumeAllStringFiles { strings_file, .. }
            | Command::GenerateLocDrop { strings_file, .. }
            | Command::ConsumeLocDrop { strings_file, .. }
            | Command::ValidateStringsFile { strings_file, .. } => strings_file,
        }
    }

    pub fn common(&self) -> &CommonArgs {
        match self {
            Command::GenerateStringFile { common, .. }
            | Command::GenerateAllStringFiles { common, .. }
            | Command::ConsumeStringFile { common, .. }
            | Command::ConsumeAllStringFiles { common, .. }
            | Command::GenerateLocDrop { common, .. }
            | Command::ConsumeLocDrop { common, .. }
            | Command::ValidateStringsFile { common, .. } => common,
        }
    }
}

/// Combines command line flags with config values; flags win.
pub fn runner_options(strings_file: &Path, args: &CommonArgs, config: &Config) -> RunnerOptions {
    let tags = if args.tags.is_empty() {
        config.tags.clone().unwrap_or_default()
    } else {
        args.tags.clone()
    };
    let options = Options::new()
        .with_tags(tags)
        .with_untagged(args.untagged || config.untagged.unwrap_or(false))
        .with_include(args.include.or(config.include).unwrap_or_default())
        .with_developer_language(
            args.developer_language
                .clone()
                .or_else(|| config.developer_language.clone()),
        )
        .with_consume_all(args.consume_all || config.consume_all.unwrap_or(false))
        .with_consume_comments(args.consume_comments || config.consume_comments.unwrap_or(false));

    RunnerOptions {
        strings_file: strings_file.to_path_buf(),
        languages: args.languages.clone(),
        format: args.format.clone().or_else(|| config.format.clone()),
        output_file: args.output_file.clone(),
        file_name: args.file_name.clone(),
        create_folders: args.create_folders,
        encoding: args.encoding.clone().or_else(|| config.encoding.clone()),
        validate: args.validate || config.validate.unwrap_or(false),
        pedantic: args.pedantic || config.pedantic.unwrap_or(false),
        twine: options,
    }
}

/// Executes the parsed command line.
pub fn run(cli: Cli, sink: &mut dyn DiagnosticSink) -> Result<(), CliError> {
    let command = cli.command;
    let strings_file = command.strings_file();
    let config = Config::discover(strings_file, command.common().config.as_deref())?;
    let options = runner_options(strings_file, command.common(), &config);

    let strings = StringsFile::read_from(strings_file)?;
    let registry = Registry::builtin();
    let mut runner = Runner::new(&registry, strings, options, sink);

    match &command {
        Command::GenerateStringFile { output_path, .. } => runner.generate_string_file(output_path),
        Command::GenerateAllStringFiles { output_dir, .. } => {
            runner.generate_all_string_files(output_dir)
        }
        Command::ConsumeStringFile { input_path, .. } => runner.consume_string_file(input_path),
        Command::ConsumeAllStringFiles { input_dir, .. } => {
            runner.consume_all_string_files(input_dir)
        }
        Command::GenerateLocDrop { archive, .. } => runner.generate_loc_drop(archive),
        Command::ConsumeLocDrop { archive, .. } => runner.consume_loc_drop(archive),
        Command::ValidateStringsFile { strings_file, .. } => {
            runner.validate_strings_file()?;
            println!("{} is valid.", strings_file.display());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("twine").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_generate_with_flags() {
        let cli = parse(&[
            "generate-string-file",
            "strings.txt",
            "fr.xml",
            "--lang",
            "fr",
            "-t",
            "app,web",
            "-u",
            "--include",
            "translated",
        ]);
        let Command::GenerateStringFile { output_path, common, .. } = &cli.command else {
            panic!("unexpected command {:?}", cli.command);
        };
        assert_eq!(output_path, Path::new("fr.xml"));
        assert_eq!(common.languages, ["fr"]);
        assert_eq!(common.tags, ["app", "web"]);
        assert!(common.untagged);
        assert_eq!(common.include, Some(IncludeMode::Translated));
        assert_eq!(cli.command.strings_file(), Path::new("strings.txt"));
    }

    #[test]
    fn test_validate_takes_only_the_strings_file() {
        let cli = parse(&["validate-strings-file", "strings.txt", "--pedantic"]);
        assert!(matches!(cli.command, Command::ValidateStringsFile { .. }));
        assert!(cli.command.common().pedantic);

        let error = Cli::try_parse_from(["twine", "validate-strings-file", "a.txt", "b.txt"]);
        assert!(error.is_err());
    }

    #[test]
    fn test_missing_path_is_rejected() {
        assert!(Cli::try_parse_from(["twine", "generate-loc-drop", "strings.txt"]).is_err());
        assert!(Cli::try_parse_from(["twine", "translate", "strings.txt"]).is_err());
    }

    #[test]
    fn test_invalid_include_mode_is_rejected() {
        let result = Cli::try_parse_from([
            "twine",
            "generate-string-file",
            "strings.txt",
            "fr.xml",
            "--include",
            "some",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let config = Config {
            developer_language: Some("de".to_string()),
            format: Some("apple".to_string()),
            tags: Some(vec!["web".to_string()]),
            include: Some(IncludeMode::Untranslated),
            encoding: Some("UTF-16".to_string()),
            validate: Some(true),
            ..Config::default()
        };
        let args = CommonArgs {
            format: Some("android".to_string()),
            tags: vec!["app".to_string()],
            consume_all: true,
            ..CommonArgs::default()
        };

        let options = runner_options(Path::new("strings.txt"), &args, &config);
        assert_eq!(options.format.as_deref(), Some("android"));
        assert_eq!(options.encoding.as_deref(), Some("UTF-16"));
        assert!(options.validate);
        assert!(!options.pedantic);
        assert_eq!(options.twine.tags, ["app"]);
        assert_eq!(options.twine.include, IncludeMode::Untranslated);
        assert_eq!(options.twine.developer_language.as_deref(), Some("de"));
        assert!(options.twine.consume_all);
        assert!(!options.twine.consume_comments);
    }

    #[test]
    fn test_defaults_without_config() {
        let options = runner_options(Path::new("s.txt"), &CommonArgs::default(), &Config::default());
        assert_eq!(options.twine, Options::new());
        assert!(options.languages.is_empty());
        assert_eq!(options.format, None);
        assert!(!options.create_folders);
    }
}
