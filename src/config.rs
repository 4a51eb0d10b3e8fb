use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::{FireError, Result};
use crate::fire::clamp_probability;
use crate::forest::BurningCell;

/// Simulation parameters, read from the `KEY=value` text format or from JSON.
/// Missing keys keep their zero defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub height: i64,
    pub width: i64,
    pub burning_cells: Vec<BurningCell>,
    pub propagation_probability: f32,
}

/// Recoverable problems found while reading a config. Parsing never stops on these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigWarning {
    #[error("line {line}: cannot parse {key}={value:?}, using default")]
    MalformedValue {
        line: usize,
        key: String,
        value: String,
    },

    #[error("line {line}: propagation probability {value} outside [0, 1], clamped")]
    ProbabilityOutOfRange { line: usize, value: f32 },
}

fn parse_cell(value: &str) -> Option<BurningCell> {
    let (row, col) = value.split_once(',')?;
    Some(BurningCell::new(
        row.trim().parse().ok()?,
        col.trim().parse().ok()?,
    ))
}

impl Config {
    /// Parse the line-oriented format. `#` starts a comment line; unknown keys
    /// and lines without `=` are ignored.
    pub fn parse(text: &str) -> (Self, Vec<ConfigWarning>) {
        let mut config = Config::default();
        let mut warnings = Vec::new();

        for (i, raw) in text.lines().enumerate() {
            let line = i + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let Some((key, value)) = trimmed.split_once('=') else {
                debug!(line, "ignoring line without '='");
                continue;
            };
            let (key, value) = (key.trim(), value.trim());
            let malformed = || ConfigWarning::MalformedValue {
                line,
                key: key.to_string(),
                value: value.to_string(),
            };

            match key {
                "HEIGHT" => {
                    config.height = value.parse().unwrap_or_else(|_| {
                        warnings.push(malformed());
                        0
                    })
                }
                "WIDTH" => {
                    config.width = value.parse().unwrap_or_else(|_| {
                        warnings.push(malformed());
                        0
                    })
                }
                "BURNING_CELL" => match parse_cell(value) {
                    Some(cell) => config.burning_cells.push(cell),
                    None => warnings.push(malformed()),
                },
                "PROPAGATION_PROBABILITY" => match value.parse::<f32>() {
                    Ok(p) if (0.0..=1.0).contains(&p) => config.propagation_probability = p,
                    Ok(p) => {
                        warnings.push(ConfigWarning::ProbabilityOutOfRange { line, value: p });
                        config.propagation_probability = clamp_probability(p);
                    }
                    Err(_) => {
                        warnings.push(malformed());
                        config.propagation_probability = 0.0;
                    }
                },
                _ => debug!(line, key, "unrecognized key ignored"),
            }
        }

        for w in &warnings {
            warn!("{w}");
        }
        (config, warnings)
    }

    /// Read and parse a config file. A missing or unreadable file is the only
    /// fatal case.
    pub fn load(path: impl AsRef<Path>) -> Result<(Self, Vec<ConfigWarning>)> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| FireError::ConfigNotFound {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    /// Split ignitions into those inside the final grid and a count of the
    /// rejected ones. Checks `row` against height and `col` against width.
    pub fn partition_ignitions(&self) -> (Vec<BurningCell>, usize) {
        let height = self.height.max(0) as usize;
        let width = self.width.max(0) as usize;
        let (accepted, rejected): (Vec<_>, Vec<_>) = self
            .burning_cells
            .iter()
            .copied()
            .partition(|cell| cell.in_bounds(height, width));
        for cell in &rejected {
            debug!(row = cell.row, col = cell.col, "ignition out of range");
        }
        (accepted, rejected.len())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SAMPLE: &str = "\
# forest
HEIGHT=5
WIDTH=8
BURNING_CELL=2,3
BURNING_CELL = 0 , 7
PROPAGATION_PROBABILITY=0.4
";

    #[test]
    fn test_parse_sample() {
        let (config, warnings) = Config::parse(SAMPLE);
        assert!(warnings.is_empty());
        assert_eq!(config.height, 5);
        assert_eq!(config.width, 8);
        assert_eq!(
            config.burning_cells,
            vec![BurningCell::new(2, 3), BurningCell::new(0, 7)]
        );
        assert_eq!(config.propagation_probability, 0.4);
    }

    #[test]
    fn test_comments_and_unknown_lines_ignored() {
        let (config, warnings) =
            Config::parse("#HEIGHT=9\nCOLOR=green\nnonsense\n\nHEIGHT=2\n");
        assert!(warnings.is_empty());
        assert_eq!(config.height, 2);
        assert_eq!(config.width, 0);
    }

    #[test]
    fn test_last_probability_wins() {
        let (config, _) =
            Config::parse("PROPAGATION_PROBABILITY=0.2\nPROPAGATION_PROBABILITY=0.9\n");
        assert_eq!(config.propagation_probability, 0.9);
    }

    #[test]
    fn test_malformed_values_default_to_zero() {
        let (config, warnings) =
            Config::parse("HEIGHT=tall\nWIDTH=4\nBURNING_CELL=1;2\nPROPAGATION_PROBABILITY=x\n");
        assert_eq!(config.height, 0);
        assert_eq!(config.width, 4);
        assert!(config.burning_cells.is_empty());
        assert_eq!(config.propagation_probability, 0.0);
        assert_eq!(warnings.len(), 3);
        assert_eq!(
            warnings[0],
            ConfigWarning::MalformedValue {
                line: 1,
                key: "HEIGHT".into(),
                value: "tall".into()
            }
        );
    }

    #[test]
    fn test_probability_out_of_range_clamped() {
        let (config, warnings) = Config::parse("PROPAGATION_PROBABILITY=1.7\n");
        assert_eq!(config.propagation_probability, 1.0);
        assert_eq!(
            warnings,
            vec![ConfigWarning::ProbabilityOutOfRange {
                line: 1,
                value: 1.7
            }]
        );
    }

    #[test]
    fn test_out_of_range_ignition_counted() {
        let (config, _) = Config::parse("HEIGHT=3\nWIDTH=3\nBURNING_CELL=10,10\nBURNING_CELL=1,1\n");
        let (accepted, rejected) = config.partition_ignitions();
        assert_eq!(accepted, vec![BurningCell::new(1, 1)]);
        assert_eq!(rejected, 1);
    }

    #[test]
    fn test_partition_checks_row_against_height() {
        let config = Config {
            height: 2,
            width: 5,
            burning_cells: vec![
                BurningCell::new(1, 4),
                BurningCell::new(4, 1),
                BurningCell::new(2, 0),
                BurningCell::new(-1, 0),
            ],
            propagation_probability: 0.5,
        };
        let (accepted, rejected) = config.partition_ignitions();
        assert_eq!(accepted, vec![BurningCell::new(1, 4)]);
        assert_eq!(rejected, 3);
    }

    #[test]
    fn test_ignition_before_dimensions_is_accepted() {
        let (config, _) = Config::parse("BURNING_CELL=3,3\nHEIGHT=4\nWIDTH=4\n");
        assert_eq!(config.partition_ignitions().1, 0);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/definitely/not/here/config.txt").unwrap_err();
        assert!(matches!(err, FireError::ConfigNotFound { .. }));
        assert!(err.to_string().contains("config.txt"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let (config, warnings) = Config::load(file.path()).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(config.burning_cells.len(), 2);
    }

    #[test]
    fn test_json_defaults() {
        let config: Config = serde_json::from_str(r#"{"height": 4, "width": 2}"#).unwrap();
        assert_eq!(config.height, 4);
        assert!(config.burning_cells.is_empty());
        assert_eq!(config.propagation_probability, 0.0);
    }
}
