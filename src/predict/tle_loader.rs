use std::fs;
use std::path::{Path, PathBuf};

use crate::predict::error::PredictError;

/// One name/line1/line2 group from an element set file.
#[derive(Debug, Clone, PartialEq)]
pub struct TleEntry {
    pub name: Option<String>,
    pub line1: String,
    pub line2: String,
}

pub struct TleLoader {
    tle_file: PathBuf,
    entries: Vec<TleEntry>,
}

impl TleLoader {
    pub fn new(tle_file: PathBuf) -> Self {
        Self {
            tle_file,
            entries: Vec::new(),
        }
    }

    /// Load the element set file, replacing anything loaded before.
    pub fn load(&mut self) -> Result<(), PredictError> {
        let content = fs::read_to_string(&self.tle_file)?;
        self.entries = parse_tle_set(&content);
        log::info!(
            "Loaded {} element sets from {}",
            self.entries.len(),
            self.tle_file.display()
        );
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.tle_file
    }

    /// Entries whose name line contains one of `labels`, in file order.
    ///
    /// An entry matching several labels is returned once per label.
    pub fn select<'a>(&'a self, labels: &'a [String]) -> Vec<(&'a str, &'a TleEntry)> {
        let mut selected = Vec::new();
        for entry in &self.entries {
            let Some(name) = entry.name.as_deref() else {
                continue;
            };
            for label in labels {
                if name.contains(label.as_str()) {
                    selected.push((label.as_str(), entry));
                }
            }
        }
        selected
    }
}

/// Parse multi-satellite TLE content
pub fn parse_tle_set(content: &str) -> Vec<TleEntry> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut result = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].starts_with("1 ") && i + 1 < lines.len() && lines[i + 1].starts_with("2 ") {
            // 2-line TLE (no name)
            result.push(TleEntry {
                name: None,
                line1: lines[i].to_string(),
                line2: lines[i + 1].to_string(),
            });
            i += 2;
        } else if i + 2 < lines.len()
            && lines[i + 1].starts_with("1 ")
            && lines[i + 2].starts_with("2 ")
        {
            // 3-line TLE (with name)
            result.push(TleEntry {
                name: Some(lines[i].to_string()),
                line1: lines[i + 1].to_string(),
                line2: lines[i + 2].to_string(),
            });
            i += 3;
        } else {
            i += 1; // Skip unknown line
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const SET: &str = "\
ISS (ZARYA)
1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992
2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008

garbage line
1 00005U 58002B   98179.78495062  .00000023  00000-0  28098-4 0  4753
2 00005  34.2682 348.7242 1859667 331.7664  19.3264 10.82419157413667
NOAA 19 [+]
1 33591U 09005A   20194.52543432  .00000039  00000-0  45931-4 0  9998
2 33591  99.1832 195.6013 0013838 267.0399  92.9203 14.12465219589034
";

    #[test]
    fn parses_named_and_unnamed_entries() {
        let entries = parse_tle_set(SET);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].name.as_deref(), Some("ISS (ZARYA)"));
        assert_eq!(entries[1].name, None);
        assert!(entries[1].line1.starts_with("1 00005U"));
        assert_eq!(entries[2].name.as_deref(), Some("NOAA 19 [+]"));
    }

    #[test]
    fn selects_by_label_in_file_order() {
        let loader = TleLoader {
            tle_file: PathBuf::from("unused"),
            entries: parse_tle_set(SET),
        };
        let labels = vec!["NOAA 19".to_string(), "ISS".to_string(), "MISSING".to_string()];
        let selected = loader.select(&labels);

        let names: Vec<_> = selected.iter().map(|(label, _)| *label).collect();
        assert_eq!(names, vec!["ISS", "NOAA 19"]);
        assert!(selected[1].1.line1.starts_with("1 33591U"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let mut loader = TleLoader::new(PathBuf::from("/nonexistent/resource.txt"));
        assert!(matches!(loader.load(), Err(PredictError::FileRead(_))));
    }
}
