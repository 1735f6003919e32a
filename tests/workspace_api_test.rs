//! Integration tests for workspace resolution and the build pipeline.

use getlit::actions::{build_workspace, BundleRequest, Bundler};
use getlit::config::{parse_config, ToolConfig};
use getlit::ui::MockUI;
use getlit::workspace::{locate_workspace, require_credentials, ProjectSettings};
use getlit::GetlitError;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const MYPROJ_CONFIG: &str = r#"{
    "projectName": "myproj",
    "searchDepth": 3,
    "configFile": "getlit.json",
    "buildConfig": {
        "srcDir": "src",
        "outDir": "out",
        "testDir": "test",
        "inFileExt": ".action.ts",
        "outFileExt": ".action.js",
        "testFileExt": ".t.action.mjs"
    }
}"#;

fn config() -> ToolConfig {
    parse_config(MYPROJ_CONFIG, Path::new("test.json")).unwrap()
}

/// Copies the entry to the output, standing in for esbuild.
struct CopyBundler;

impl Bundler for CopyBundler {
    fn bundle(&self, request: &BundleRequest) -> getlit::Result<PathBuf> {
        fs::copy(&request.entry, &request.outfile)?;
        Ok(request.outfile.clone())
    }
}

#[test]
fn single_workspace_builds_one_artifact() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("myproj/src");
    fs::create_dir_all(&src).unwrap();
    fs::write(
        src.join("foo.action.ts"),
        "/**\n * NAME: foo\n * VAR: Foo\n */\nvar x = 1;\n",
    )
    .unwrap();

    let config = config();
    let paths = locate_workspace(temp.path(), &config).unwrap();
    let mut ui = MockUI::new();
    let report = build_workspace(&paths, &config, None, &CopyBundler, &mut ui).unwrap();

    assert_eq!(report.built.len(), 1);
    let artifact = temp.path().join("myproj/out/foo.action.js");
    assert!(artifact.is_file());
    let content = fs::read_to_string(artifact).unwrap();
    assert!(content.starts_with("/**\n"));
    assert!(content.contains(" * VAR: Foo"));
    assert!(content.ends_with("var x = 1;\n"));
}

#[test]
fn two_workspaces_are_ambiguous_and_untouched() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("one/myproj/src")).unwrap();
    fs::create_dir_all(temp.path().join("two/myproj/src")).unwrap();

    let err = locate_workspace(temp.path(), &config()).unwrap_err();

    match &err {
        GetlitError::AmbiguousWorkspace { candidates, .. } => {
            assert_eq!(
                candidates,
                &[
                    temp.path().join("one/myproj"),
                    temp.path().join("two/myproj")
                ]
            );
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(err.to_string().contains("one/myproj"));
    assert!(!temp.path().join("one/myproj/out").exists());
    assert!(!temp.path().join("two/myproj/out").exists());
}

#[test]
fn workspace_beyond_search_depth_is_not_found() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("a/b/c/d/e/myproj")).unwrap();

    let err = locate_workspace(temp.path(), &config()).unwrap_err();
    assert!(matches!(err, GetlitError::NoWorkspaceFound { .. }));
}

#[test]
fn missing_project_name_is_a_configuration_error() {
    let temp = TempDir::new().unwrap();
    let config = parse_config("{}", Path::new("empty.json")).unwrap();

    let err = locate_workspace(temp.path(), &config).unwrap_err();
    assert!(err.to_string().contains("projectName"));
}

#[test]
fn credentials_gate_follows_settings_file() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("myproj")).unwrap();
    let paths = locate_workspace(temp.path(), &config()).unwrap();

    assert!(require_credentials(&paths.config_file).is_err());

    fs::write(
        &paths.config_file,
        r#"{"authSig": {"sig": "0x1"}, "pkpPublicKey": "0x04", "theme": "dark"}"#,
    )
    .unwrap();
    let credentials = require_credentials(&paths.config_file).unwrap();
    assert_eq!(credentials.pkp_public_key, "0x04");

    let settings = ProjectSettings::load(&paths.config_file).unwrap();
    settings.save(&paths.config_file).unwrap();
    let saved = fs::read_to_string(&paths.config_file).unwrap();
    assert!(saved.contains("\"theme\": \"dark\""));
}

#[test]
fn relative_search_root_yields_absolute_paths() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("myproj/src")).unwrap();
    std::env::set_current_dir(temp.path()).unwrap();
    let cwd = std::env::current_dir().unwrap();

    let paths = locate_workspace(Path::new("."), &config()).unwrap();

    assert!(paths.root.is_absolute());
    assert_eq!(paths.root, cwd.join("myproj"));
    assert_eq!(paths.source_dir, cwd.join("myproj/src"));
}
