/// Config file loading and creation for the insertrank CLI.
///
/// Config lives at ~/.config/insertrank/config.toml.
/// All fields are optional. CLI args override config values, and built-in
/// defaults fill whatever is left.
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::AdapterError;

pub const DEFAULT_INPUT: &str = "input.xlsx";
pub const DEFAULT_SHEET: &str = "Sheet1";
pub const DEFAULT_COLUMN: &str = "Elements";
pub const DEFAULT_SEPARATOR: &str = " ";
pub const DEFAULT_OUTPUT: &str = "output.xlsx";

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct InsertrankConfig {
    pub input: Option<PathBuf>,
    pub input_sheet: Option<String>,
    pub columns: Option<Vec<String>>,
    pub separator: Option<String>,
    pub output: Option<PathBuf>,
    pub output_sheet: Option<String>,
    pub output_column: Option<String>,
}

/// File locations and layout flags shared by `rank` and `status`.
#[derive(clap::Args, Debug, Default)]
pub struct IoArgs {
    /// Items to rank: a spreadsheet (.xlsx/.xls/.ods) or a text/JSON list
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Sheet to read items from
    #[arg(long)]
    pub sheet: Option<String>,

    /// Column holding item names (repeatable; values are joined into one label)
    #[arg(long = "column")]
    pub columns: Vec<String>,

    /// Text placed between joined column values
    #[arg(long)]
    pub separator: Option<String>,

    /// Ranking spreadsheet, created on first run and updated after every answer
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Sheet name in the ranking spreadsheet
    #[arg(long)]
    pub output_sheet: Option<String>,

    /// Header of the ranking column (default: first input column)
    #[arg(long)]
    pub output_column: Option<String>,

    /// Path to config file (default: ~/.config/insertrank/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub input: PathBuf,
    pub input_sheet: String,
    pub columns: Vec<String>,
    pub separator: String,
    pub output: PathBuf,
    pub output_sheet: String,
    pub output_column: String,
}

impl Settings {
    /// CLI args > config file > built-in defaults.
    pub fn resolve(args: &IoArgs, cfg: InsertrankConfig) -> Settings {
        let columns = if !args.columns.is_empty() {
            args.columns.clone()
        } else {
            cfg.columns
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| vec![DEFAULT_COLUMN.to_string()])
        };
        let output_column = args
            .output_column
            .clone()
            .or(cfg.output_column)
            .unwrap_or_else(|| columns[0].clone());

        Settings {
            input: args.input.clone().or(cfg.input).unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT)),
            input_sheet: args.sheet.clone().or(cfg.input_sheet).unwrap_or_else(|| DEFAULT_SHEET.to_string()),
            separator: args.separator.clone().or(cfg.separator).unwrap_or_else(|| DEFAULT_SEPARATOR.to_string()),
            output: args.output.clone().or(cfg.output).unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            output_sheet: args.output_sheet.clone().or(cfg.output_sheet).unwrap_or_else(|| DEFAULT_SHEET.to_string()),
            output_column,
            columns,
        }
    }
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# insertrank configuration
# All values here can be overridden by CLI flags.

# Items to rank: a spreadsheet, or a text file with one item per line
# input = \"input.xlsx\"

# Sheet and columns to read. Several columns are joined into one label.
# input_sheet = \"Sheet1\"
# columns = [\"Elements\"]
# separator = \" \"

# Where the ranking is kept. Progress is saved here after every answer,
# so a stopped session resumes where it left off.
# output = \"output.xlsx\"
# output_sheet = \"Sheet1\"
# output_column = \"Elements\"
";

/// Returns the default config path: ~/.config/insertrank/config.toml
pub fn config_path() -> Result<PathBuf, AdapterError> {
    let home = std::env::var_os("HOME").ok_or(AdapterError::NoHome)?;
    Ok(PathBuf::from(home).join(".config").join("insertrank").join("config.toml"))
}

/// Load config from a file path. Returns default (all None) if file doesn't exist.
pub fn load_config(path: &Path) -> Result<InsertrankConfig, AdapterError> {
    match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content).map_err(|source| AdapterError::Config {
            path: path.to_path_buf(),
            source,
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(InsertrankConfig::default()),
        Err(source) => Err(AdapterError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Create the default config file at `path`. Errors if it already exists.
pub fn create_default_config(path: &Path) -> Result<(), AdapterError> {
    if path.exists() {
        return Err(AdapterError::ConfigExists { path: path.to_path_buf() });
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| AdapterError::Create {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    std::fs::write(path, DEFAULT_CONFIG_TEMPLATE).map_err(|source| AdapterError::Create {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_match_original_layout() {
        let settings = Settings::resolve(&IoArgs::default(), InsertrankConfig::default());
        assert_eq!(settings.input, PathBuf::from("input.xlsx"));
        assert_eq!(settings.input_sheet, "Sheet1");
        assert_eq!(settings.columns, vec!["Elements".to_string()]);
        assert_eq!(settings.output, PathBuf::from("output.xlsx"));
        assert_eq!(settings.output_sheet, "Sheet1");
        assert_eq!(settings.output_column, "Elements");
    }

    #[test]
    fn test_cli_overrides_config() {
        let cfg = InsertrankConfig {
            input: Some("from-config.xlsx".into()),
            columns: Some(vec!["Title".into(), "Year".into()]),
            separator: Some(" - ".into()),
            ..Default::default()
        };
        let args = IoArgs {
            input: Some("from-cli.xlsx".into()),
            ..Default::default()
        };

        let settings = Settings::resolve(&args, cfg);
        assert_eq!(settings.input, PathBuf::from("from-cli.xlsx"));
        assert_eq!(settings.columns, vec!["Title".to_string(), "Year".to_string()]);
        assert_eq!(settings.separator, " - ");
        // Output header follows the first input column unless set.
        assert_eq!(settings.output_column, "Title");
    }

    #[test]
    fn test_template_parses_to_empty_config() {
        let cfg: InsertrankConfig = toml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert_eq!(cfg, InsertrankConfig::default());
    }

    #[test]
    fn test_load_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert_eq!(load_config(&path).unwrap(), InsertrankConfig::default());

        std::fs::write(&path, "input = \"movies.xlsx\"\ncolumns = [\"Title\"]\n").unwrap();
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.input, Some(PathBuf::from("movies.xlsx")));
        assert_eq!(cfg.columns, Some(vec!["Title".to_string()]));

        std::fs::write(&path, "colums = [\"Title\"]\n").unwrap();
        assert!(matches!(load_config(&path), Err(AdapterError::Config { .. })));
    }

    #[test]
    fn test_create_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        create_default_config(&path).unwrap();
        assert_eq!(load_config(&path).unwrap(), InsertrankConfig::default());

        let err = create_default_config(&path).unwrap_err();
        assert!(matches!(err, AdapterError::ConfigExists { .. }));
    }
}
