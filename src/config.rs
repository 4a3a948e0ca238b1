use std::{env, path::PathBuf};

use lazy_static::lazy_static;
use once_cell::sync::OnceCell;
use serde::*;


/// The file path of the configuration file
#[cfg(target_family = "unix")]
pub const CONFIG_FILE_PATH: &str = "/etc/fandomdb/config.toml";
#[cfg(target_family = "windows")]
pub const CONFIG_FILE_PATH: &str = "C:\\Program Files\\fandomdb\\config.toml";

/// Environment variable that overrides [`CONFIG_FILE_PATH`].
pub const CONFIG_PATH_VAR: &str = "FANDOMDB_CONFIG";

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Config {
	pub database_path: String,
	#[serde(default = "default_diagram_path")]
	pub diagram_path: String,
	#[serde(default = "default_render_diagram")]
	pub render_diagram: bool,
}


fn default_diagram_path() -> String { "diagram.dot".to_string() }

fn default_render_diagram() -> bool { true }

/// The path to load the config from.
pub fn config_path() -> PathBuf {
	env::var_os(CONFIG_PATH_VAR)
		.map(PathBuf::from)
		.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_PATH))
}


impl Config {
	pub fn parse(content: &str) -> Result<Self, toml::de::Error> { toml::from_str(content) }
}

impl Default for Config {
	fn default() -> Self {
		Self {
			database_path: "fandom.sqlite".to_string(),
			diagram_path: default_diagram_path(),
			render_diagram: default_render_diagram(),
		}
	}
}


lazy_static! {
	pub static ref CONFIG: OnceCell<Config> = OnceCell::new();
}


#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_defaults() {
		let config = Config::parse("database_path = \"/var/lib/fandomdb/db.sqlite\"").unwrap();
		assert_eq!(config.database_path, "/var/lib/fandomdb/db.sqlite");
		assert_eq!(config.diagram_path, "diagram.dot");
		assert!(config.render_diagram);
	}

	#[test]
	fn test_parse_full() {
		let config = Config::parse(
			"database_path = \"db.sqlite\"\ndiagram_path = \"er.dot\"\nrender_diagram = false\n",
		)
		.unwrap();
		assert_eq!(config.diagram_path, "er.dot");
		assert!(!config.render_diagram);
	}

	#[test]
	fn test_parse_missing_database_path() {
		assert!(Config::parse("render_diagram = true").is_err());
	}
}
