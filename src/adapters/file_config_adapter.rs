//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[database]
conninfo = host=wrds-pgdata.wharton.upenn.edu dbname=wrds

[panel]
start_date = 2018-01-01
min_price = 5.0

[output]
dir = data/raw
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("database", "conninfo"),
            Some("host=wrds-pgdata.wharton.upenn.edu dbname=wrds".to_string())
        );
        assert_eq!(
            adapter.get_string("panel", "start_date"),
            Some("2018-01-01".to_string())
        );
        assert_eq!(adapter.get_string("output", "dir"), Some("data/raw".to_string()));
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[panel]\nstart_date = 2018-01-01\n").unwrap();
        assert_eq!(adapter.get_string("panel", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_double_returns_value() {
        let adapter = FileConfigAdapter::from_string("[panel]\nmin_price = 2.5\n").unwrap();
        assert_eq!(adapter.get_double("panel", "min_price", 0.0), 2.5);
    }

    #[test]
    fn get_double_returns_default_for_missing() {
        let adapter = FileConfigAdapter::from_string("[panel]\n").unwrap();
        assert_eq!(adapter.get_double("panel", "min_price", 5.0), 5.0);
    }

    #[test]
    fn get_double_returns_default_for_non_numeric() {
        let adapter = FileConfigAdapter::from_string("[panel]\nmin_price = cheap\n").unwrap();
        assert_eq!(adapter.get_double("panel", "min_price", 5.0), 5.0);
    }

    #[test]
    fn from_file_reads_config() {
        let content = "[output]\ndir = /tmp/panel_out\n";
        let file = create_temp_config(content);
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("output", "dir"),
            Some("/tmp/panel_out".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(result.is_err());
    }
}
