use std::collections::HashSet;
use std::path::Path;

use supabase_migrate::config::{Config, ConfigError, EnvFile};
use supabase_migrate::migrations::{self, MigrationFile};

fn touch(dir: &Path, name: &str) {
    std::fs::write(dir.join(name), "select 1;").unwrap();
}

#[test]
fn enumerator_ignores_non_matching_files() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "20240101000000_init.sql");
    touch(dir.path(), "20240102000000_add_col.sql");
    touch(dir.path(), "README.md");
    touch(dir.path(), "notes.sql");
    touch(dir.path(), "2024_short.sql");
    touch(dir.path(), "20240101000000_init.sql.bak");
    std::fs::create_dir(dir.path().join("20240103000000_dir.sql")).unwrap();

    let files = migrations::list_migration_files(dir.path()).unwrap();
    let names: Vec<String> = files.iter().map(|m| m.file_name()).collect();
    assert_eq!(names, ["20240101000000_init.sql", "20240102000000_add_col.sql"]);
}

#[test]
fn enumerator_sorts_by_version() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "20240301000000_third.sql");
    touch(dir.path(), "20240101000000_first.sql");
    touch(dir.path(), "20240201000000_second.sql");

    let files = migrations::list_migration_files(dir.path()).unwrap();
    let versions: Vec<&str> = files.iter().map(|m| m.version.as_str()).collect();
    assert_eq!(versions, ["20240101000000", "20240201000000", "20240301000000"]);
    assert!(versions.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn enumerator_fails_on_missing_dir() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("no_such_dir");
    assert!(migrations::list_migration_files(&missing).is_err());
}

#[test]
fn parse_round_trips_enumerated_files() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "20240102030405_create_users_table.sql");

    let files = migrations::list_migration_files(dir.path()).unwrap();
    assert_eq!(files.len(), 1);
    let reparsed = MigrationFile::from_path(&files[0].path).unwrap();
    assert_eq!(reparsed.version, "20240102030405");
    assert_eq!(reparsed.name, "create_users_table");
    assert_eq!(reparsed.file_name(), "20240102030405_create_users_table.sql");
}

// first file already applied => only the second is pending
#[test]
fn pending_excludes_applied_versions() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "20240101000000_init.sql");
    touch(dir.path(), "20240102000000_add_col.sql");

    let files = migrations::list_migration_files(dir.path()).unwrap();
    let applied = HashSet::from(["20240101000000".to_string()]);
    let pending = migrations::pending(files, &applied);
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].file_name(), "20240102000000_add_col.sql");
}

#[test]
fn resolver_fails_without_required_vars() {
    // empty env file, no SUPABASE_* in the test environment
    let err = Config::resolve(&EnvFile::default()).unwrap_err();
    assert!(matches!(err, ConfigError::MissingVar(_)));
}

#[test]
fn env_file_load_missing_path_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let env_file = EnvFile::load(&dir.path().join(".env"));
    assert_eq!(env_file.var(&["ANYTHING"]), None);
}

#[test]
fn env_file_load_reads_key_value_pairs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env");
    std::fs::write(
        &path,
        "# local overrides\nSUPABASE_URL=https://abcdef.supabase.co\nSUPABASE_DB_PASSWORD=pw\n",
    )
    .unwrap();

    let env_file = EnvFile::load(&path);
    let config = Config::resolve(&env_file).unwrap();
    assert_eq!(config.host, "db.abcdef.supabase.co");
    assert_eq!(config.password, "pw");
}
