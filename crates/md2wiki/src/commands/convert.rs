//! `md2wiki <INPUT> <OUTPUT>` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use md2wiki_config::{CliSettings, Config};
use md2wiki_core::{Converter, ConverterOptions};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the convert command.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// Markdown input file, then the wiki markup output file.
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Path to configuration file (never discovered automatically).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Language for labeled code blocks with an unknown extension (overrides config).
    #[arg(long, value_name = "LANG")]
    fallback_language: Option<String>,

    /// Let a fence's declared language take precedence over the file extension.
    #[arg(long)]
    prefer_declared_language: bool,
}

impl ConvertArgs {
    /// Execute the convert command.
    ///
    /// The input is read and converted completely before the output file is
    /// opened, so a failure never leaves a partial output behind.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Usage`] unless exactly two files were given, and
    /// propagates configuration and I/O failures.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let [input, target] = self.files.as_slice() else {
            return Err(CliError::Usage);
        };
        let output = Output::new();

        let cli_settings = CliSettings {
            fallback_language: self.fallback_language,
            prefer_declared_language: self.prefer_declared_language.then_some(true),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            tracing::info!(path = %path.display(), "Loaded configuration");
        }

        let markdown = read_input(input)?;
        let conversion = Converter::new(converter_options(config)).convert(&markdown);
        write_output(target, &conversion.output)?;

        tracing::info!(
            input = %input.display(),
            output = %target.display(),
            labeled_blocks = conversion.labeled_blocks,
            fenced_blocks = conversion.fenced_blocks,
            "Converted document"
        );
        output.success(&format!(
            "[✓] Converted to Confluence wiki format: {}",
            target.display()
        ));

        Ok(())
    }
}

fn converter_options(config: Config) -> ConverterOptions {
    ConverterOptions {
        fallback_language: config.converter.fallback_language,
        unlabeled_language: config.converter.unlabeled_language,
        prefer_declared_language: config.converter.prefer_declared_language,
        segment_separator: config.converter.segment_separator,
        languages: config.languages.into_iter().collect(),
    }
}

fn read_input(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn write_output(path: &Path, content: &str) -> Result<(), CliError> {
    std::fs::write(path, content).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_converter_options_from_default_config() {
        let options = converter_options(Config::default());
        assert_eq!(options.fallback_language, "bash");
        assert_eq!(options.unlabeled_language, "none");
        assert!(!options.prefer_declared_language);
        assert_eq!(options.segment_separator, "\n\n");
        assert!(options.languages.is_empty());
    }

    #[test]
    fn test_converter_options_carries_languages() {
        let config = Config {
            languages: BTreeMap::from([("rs".to_owned(), "rust".to_owned())]),
            ..Default::default()
        };
        let options = converter_options(config);
        assert_eq!(options.languages.get("rs").map(String::as_str), Some("rust"));
    }

    #[test]
    fn test_execute_rejects_wrong_argument_count() {
        let args = ConvertArgs {
            files: vec![PathBuf::from("only-one.md")],
            config: None,
            fallback_language: None,
            prefer_declared_language: false,
        };
        assert!(matches!(args.execute(), Err(CliError::Usage)));
    }
}
