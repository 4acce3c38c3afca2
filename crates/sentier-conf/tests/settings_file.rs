//! Loading router settings from files on disk

use sentier_conf::{EnvOverrides, RouterSettings};
use sentier_core::Error;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_settings(source: &str) -> NamedTempFile {
	let mut file = NamedTempFile::new().unwrap();
	file.write_all(source.as_bytes()).unwrap();
	file
}

#[test]
fn test_from_file_reads_all_sections() {
	let file = write_settings(
		r#"
base_path = "/admin"
separator = "."

[default_route]
pattern = "/<controller>/<action>/"
action = "list"

[pagination]
page_param = "p"
page_size = 30
"#,
	);

	let settings = RouterSettings::from_file(file.path()).unwrap();

	assert_eq!(settings.base_path, "/admin");
	assert_eq!(settings.separator, ".");
	let primary = settings.default_route.unwrap();
	assert_eq!(primary.pattern, "/<controller>/<action>/");
	assert_eq!(primary.controller, "index");
	assert_eq!(primary.action, "list");
	assert_eq!(settings.pagination.page_param, "p");
	assert_eq!(settings.pagination.page_size, 30);
}

#[test]
fn test_missing_file_is_a_configuration_error() {
	let dir = tempfile::tempdir().unwrap();
	let err = RouterSettings::from_file(dir.path().join("absent.toml")).unwrap_err();

	assert!(matches!(err, Error::Configuration(_)));
	assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn test_malformed_file_is_a_configuration_error() {
	let file = write_settings("base_path = [");
	let err = RouterSettings::from_file(file.path()).unwrap_err();
	assert!(matches!(err, Error::Configuration(_)));
}

#[test]
fn test_overrides_take_priority_over_file() {
	let file = write_settings("base_path = \"/from-file\"\n[pagination]\npage_size = 5\n");
	let mut settings = RouterSettings::from_file(file.path()).unwrap();

	EnvOverrides::from_vars([("SENTIER_BASE_PATH", "/from-env")])
		.apply(&mut settings)
		.unwrap();

	assert_eq!(settings.base_path, "/from-env");
	assert_eq!(settings.pagination.page_size, 5);
}
