use blogsync_common::observability::LogFormat;
use blogsync_config::BlogsyncConfigLoader;
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn loads_file_and_expands_placeholders() {
    let tmp = TempDir::new().unwrap();
    let file_yaml = r#"
blog_id: "1938689576098732827"
api:
  access_token: "${BLOGGER_TOKEN}"
  max_retries: 1
import:
  input: "/data/export.txt"
  audit_log: "/data/audit.txt"
  author_name: "Pontus"
logging:
  format: json
  stderr: false
"#;
    let p = write_yaml(&tmp, "blogsync.yaml", file_yaml);

    temp_env::with_var("BLOGGER_TOKEN", Some("tok-123"), || {
        let config = BlogsyncConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load config");

        assert_eq!(config.blog_id.as_deref(), Some("1938689576098732827"));
        assert_eq!(config.api.access_token.as_deref(), Some("tok-123"));
        assert_eq!(config.api.max_retries, 1);
        assert_eq!(config.import.input, PathBuf::from("/data/export.txt"));
        assert_eq!(config.import.audit_log, PathBuf::from("/data/audit.txt"));
        assert_eq!(config.import.author_name, "Pontus");
        assert_eq!(config.import.page_size, 100);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(!config.logging.stderr);
    });
}

#[test]
#[serial]
fn environment_overrides_file() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(
        &tmp,
        "blogsync.yaml",
        "import:\n  page_size: 25\n  comment_delay_secs: 5\n",
    );

    temp_env::with_vars(
        [
            ("BLOGSYNC__IMPORT__PAGE_SIZE", Some("50")),
            ("BLOGSYNC__BLOG_ID", Some("777")),
        ],
        || {
            let config = BlogsyncConfigLoader::new()
                .with_file(&p)
                .load()
                .expect("load config");
            assert_eq!(config.import.page_size, 50);
            assert_eq!(config.import.comment_delay_secs, 5);
            assert_eq!(config.blog_id.as_deref(), Some("777"));
        },
    );
}

#[test]
#[serial]
fn missing_optional_file_falls_back_to_defaults() {
    let tmp = TempDir::new().unwrap();
    let config = BlogsyncConfigLoader::new()
        .with_optional_file(tmp.path().join("absent.yaml"))
        .load()
        .expect("defaults");
    assert_eq!(config.import.max_pages, 10);
    assert_eq!(
        config.api.base_url,
        "https://www.googleapis.com/blogger/v3/"
    );
}

#[test]
#[serial]
fn missing_required_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let err = BlogsyncConfigLoader::new()
        .with_file(tmp.path().join("absent.yaml"))
        .load();
    assert!(err.is_err());
}
