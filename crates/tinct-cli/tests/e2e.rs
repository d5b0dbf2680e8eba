//! End-to-end integration tests for the tinct CLI.
//!
//! Every test points the binary at its own temporary store so saved
//! overrides and preferences never leak between tests.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a Command for the tinct binary with a clean environment.
#[allow(deprecated)]
fn tinct_cmd(store: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tinct").unwrap();
    cmd.env("TINCT_STORE", store.path())
        .env_remove("TINCT_CONFIG")
        .env_remove("TINCT_SYSTEM_DARK")
        .env_remove("RUST_LOG");
    cmd
}

// =============================================================================
// Palette Output Tests
// =============================================================================

mod palette_output {
    use super::*;

    #[test]
    fn test_default_light_palette() {
        let store = TempDir::new().unwrap();
        tinct_cmd(&store)
            .arg("palette")
            .assert()
            .success()
            .stdout(predicate::str::starts_with("theme: light"))
            .stdout(predicate::str::contains("text-primary"))
            .stdout(predicate::str::contains("#111827"));
    }

    #[test]
    fn test_json_format() {
        let store = TempDir::new().unwrap();
        tinct_cmd(&store)
            .args(["palette", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""theme": "light""#))
            .stdout(predicate::str::contains(r##""accent-ring": "#f9b4b4""##));
    }

    #[test]
    fn test_css_format_for_dark() {
        let store = TempDir::new().unwrap();
        tinct_cmd(&store)
            .args(["palette", "--theme", "dark", "--format", "css"])
            .assert()
            .success()
            .stdout(predicate::str::contains(".theme-dark {"))
            .stdout(predicate::str::contains("--color-primary: #111827;"));
    }

    #[test]
    fn test_theme_flag_does_not_persist() {
        let store = TempDir::new().unwrap();
        tinct_cmd(&store).args(["palette", "-t", "dark"]).assert().success();
        tinct_cmd(&store)
            .arg("theme")
            .assert()
            .success()
            .stdout(predicate::eq("light\n"));
    }
}

// =============================================================================
// Theme Preference Tests
// =============================================================================

mod theme_preference {
    use super::*;

    #[test]
    fn test_system_dark_without_saved_preference() {
        let store = TempDir::new().unwrap();
        tinct_cmd(&store)
            .args(["theme", "--system-dark"])
            .assert()
            .success()
            .stdout(predicate::eq("dark\n"));
    }

    #[test]
    fn test_toggle_persists() {
        let store = TempDir::new().unwrap();
        tinct_cmd(&store)
            .arg("toggle")
            .assert()
            .success()
            .stdout(predicate::eq("dark\n"));
        assert_eq!(fs::read_to_string(store.path().join("preferred-theme")).unwrap(), "dark");

        // Saved preference wins over the system setting.
        tinct_cmd(&store)
            .env("TINCT_SYSTEM_DARK", "false")
            .arg("theme")
            .assert()
            .success()
            .stdout(predicate::eq("dark\n"));
    }
}

// =============================================================================
// Editing Tests
// =============================================================================

mod editing {
    use super::*;

    #[test]
    fn test_set_accent_is_shared() {
        let store = TempDir::new().unwrap();
        tinct_cmd(&store)
            .args(["set", "accent", "#22c55e"])
            .assert()
            .success()
            .stdout(predicate::eq("accent = #22c55e (shared)\n"));

        tinct_cmd(&store)
            .args(["palette", "--theme", "dark"])
            .assert()
            .success()
            .stdout(predicate::str::contains("#22c55e"));

        tinct_cmd(&store)
            .args(["overrides", "--theme", "dark"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r##""accent": "#22c55e""##))
            .stdout(predicate::str::contains("accent-hover"))
            .stdout(predicate::str::contains("accent-ring"));
    }

    #[test]
    fn test_set_secondary_repairs_text() {
        let store = TempDir::new().unwrap();
        tinct_cmd(&store)
            .args(["set", "secondary", "#777777"])
            .assert()
            .success()
            .stdout(predicate::eq("secondary = #777777 (light)\n"));

        tinct_cmd(&store)
            .args(["palette", "-f", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r##""text-primary": "#747474""##));

        // Primary/secondary edits stay with their theme.
        tinct_cmd(&store)
            .args(["overrides", "--theme", "dark"])
            .assert()
            .success()
            .stdout(predicate::str::contains("secondary").not());
    }

    #[test]
    fn test_set_derived_role_fails() {
        let store = TempDir::new().unwrap();
        tinct_cmd(&store)
            .args(["set", "text-muted", "#000000"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("derived"));
    }

    #[test]
    fn test_set_invalid_color_fails() {
        let store = TempDir::new().unwrap();
        tinct_cmd(&store)
            .args(["set", "accent", "green"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid hex color"));
    }

    #[test]
    fn test_reset_clears_overrides() {
        let store = TempDir::new().unwrap();
        tinct_cmd(&store).args(["set", "primary", "#fafafa"]).assert().success();
        tinct_cmd(&store).args(["set", "accent", "#3b82f6"]).assert().success();

        tinct_cmd(&store)
            .arg("reset")
            .assert()
            .success()
            .stdout(predicate::str::contains("reset light"));

        tinct_cmd(&store)
            .arg("overrides")
            .assert()
            .success()
            .stdout(predicate::eq("{}\n"));
    }
}

// =============================================================================
// Contrast Tests
// =============================================================================

mod contrast {
    use super::*;

    #[test]
    fn test_failing_pair_gets_suggestion() {
        let store = TempDir::new().unwrap();
        tinct_cmd(&store)
            .args(["contrast", "#777777", "#ffffff"])
            .assert()
            .success()
            .stdout(predicate::str::contains("4.48:1"))
            .stdout(predicate::str::contains("suggested text color: #747474"));
    }

    #[test]
    fn test_short_hex_accepted() {
        let store = TempDir::new().unwrap();
        tinct_cmd(&store)
            .args(["contrast", "#000", "#fff"])
            .assert()
            .success()
            .stdout(predicate::str::contains("21.00:1"));
    }
}

// =============================================================================
// Configuration & Storage Tests
// =============================================================================

mod configuration {
    use super::*;

    #[test]
    fn test_toml_config_defaults() {
        let store = TempDir::new().unwrap();
        let config = store.path().join("theme.toml");
        fs::write(&config, "[dark]\nprimary = \"#000000\"\n").unwrap();

        tinct_cmd(&store)
            .env("TINCT_CONFIG", &config)
            .args(["palette", "--theme", "dark", "--format", "css"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--color-primary: #000000;"));
    }

    #[test]
    fn test_unsupported_config_fails() {
        let store = TempDir::new().unwrap();
        let config = store.path().join("theme.ini");
        fs::write(&config, "primary=#000").unwrap();

        tinct_cmd(&store)
            .args(["palette", "--config"])
            .arg(&config)
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to load config"));
    }

    #[test]
    fn test_store_path_is_file_falls_back() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("not-a-dir");
        fs::write(&file, "").unwrap();

        tinct_cmd(&dir)
            .env("TINCT_STORE", &file)
            .arg("toggle")
            .assert()
            .success()
            .stdout(predicate::eq("dark\n"))
            .stderr(predicate::str::contains("not a directory"));
    }
}
