use projcat::rules::{builtin_patterns, parse_ignore_file};
use projcat::{
    BINARY_PLACEHOLDER, BinaryDetection, ContentStatus, ENCODING_PLACEHOLDER, IgnoreRuleSet,
    MatchMode, ProjcatBuilder, ProjcatError, TraversalOrder, snapshot, source_extension,
};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn rules(patterns: &[&str], mode: MatchMode) -> IgnoreRuleSet {
    IgnoreRuleSet::from_patterns(patterns, mode, false).unwrap()
}

#[test]
fn test_parse_ignore_file() {
    let text = "# deps\nnode_modules\n\n  *.log  \n#*.py\ndist/\n";
    assert_eq!(parse_ignore_file(text), vec!["node_modules", "*.log", "dist/"]);
    assert!(parse_ignore_file("").is_empty());
}

#[test]
fn test_whole_path_matching() {
    let set = rules(&["*.log", "build", "*/cache"], MatchMode::WholePath);
    assert!(set.is_excluded(Path::new("debug.log")));
    assert!(set.is_excluded(Path::new("logs/debug.log")));
    assert!(set.is_excluded(Path::new("build")));
    // A bare name is only the top-level entry.
    assert!(!set.is_excluded(Path::new("src/build")));
    assert!(set.is_excluded(Path::new("src/cache")));
    assert!(set.is_excluded(Path::new("a/b/cache")));
    assert!(!set.is_excluded(Path::new("cache")));
    assert!(!set.is_excluded(Path::new("app.py")));
}

#[test]
fn test_segment_matching() {
    let set = rules(&["build", "/docs", "src/*.py", "dist/"], MatchMode::Segment);
    assert!(set.is_excluded(Path::new("build")));
    assert!(set.is_excluded(Path::new("src/build")));
    assert!(set.is_excluded(Path::new("docs")));
    assert!(!set.is_excluded(Path::new("web/docs")));
    assert!(set.is_excluded(Path::new("src/main.py")));
    assert!(!set.is_excluded(Path::new("src/pkg/main.py")));
    assert!(set.is_excluded(Path::new("dist")));
    assert!(set.is_excluded(Path::new("web/dist")));
    assert_eq!(set.mode(), MatchMode::Segment);
}

#[test]
fn test_case_sensitivity() {
    let sensitive = rules(&["*.PY"], MatchMode::WholePath);
    assert!(!sensitive.is_excluded(Path::new("app.py")));
    let insensitive =
        IgnoreRuleSet::from_patterns(["*.PY"], MatchMode::WholePath, true).unwrap();
    assert!(insensitive.is_excluded(Path::new("app.py")));
}

#[test]
fn test_no_negation() {
    let set = rules(&["*.py", "!keep.py"], MatchMode::WholePath);
    assert!(set.is_excluded(Path::new("keep.py")));
}

#[test]
fn test_root_is_never_excluded() {
    let set = rules(&["*"], MatchMode::WholePath);
    assert!(!set.is_excluded(Path::new("")));
    assert!(set.is_excluded(Path::new("anything")));
}

#[test]
fn test_invalid_pattern_is_an_error() {
    let err = IgnoreRuleSet::from_patterns(["[oops"], MatchMode::WholePath, false).unwrap_err();
    assert!(matches!(err, ProjcatError::Pattern(_)));
}

#[test]
fn test_builtin_patterns() {
    let whole = builtin_patterns(MatchMode::WholePath);
    assert!(whole.contains(&"node_modules".to_string()));
    assert!(whole.contains(&"*/node_modules".to_string()));
    assert_eq!(whole.iter().filter(|p| p.contains("pyc")).count(), 1);
    let segment = builtin_patterns(MatchMode::Segment);
    assert!(segment.iter().all(|p| !p.contains('/')));
}

#[test]
fn test_load_skips_bad_ignore_lines() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".gitignore"), "[oops\n*.log\n").unwrap();
    let options = ProjcatBuilder::new(dir.path()).builtin_ignores(false).build();
    let set = IgnoreRuleSet::load(&options).unwrap();
    assert_eq!(set.patterns(), ["*.log"]);
}

#[test]
fn test_load_without_ignore_file() {
    let dir = tempdir().unwrap();
    let options = ProjcatBuilder::new(dir.path()).builtin_ignores(false).build();
    assert!(IgnoreRuleSet::load(&options).unwrap().is_empty());
}

#[test]
fn test_load_rejects_bad_extra_pattern() {
    let dir = tempdir().unwrap();
    let options = ProjcatBuilder::new(dir.path())
        .ignore_patterns(vec!["[oops".into()])
        .build();
    assert!(matches!(
        IgnoreRuleSet::load(&options),
        Err(ProjcatError::Pattern(_))
    ));
}

#[test]
fn test_source_extension() {
    assert_eq!(source_extension("app.py"), Some("py"));
    assert_eq!(source_extension("view.test.tsx"), Some("tsx"));
    assert_eq!(source_extension(".js"), Some("js"));
    assert_eq!(source_extension("App.PY"), None);
    assert_eq!(source_extension("README.md"), None);
    assert_eq!(source_extension("py"), None);
}

#[test]
fn test_sorted_tree_layout() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("z.txt"), "z").unwrap();
    fs::write(root.join("a.py"), "a = 1").unwrap();
    fs::create_dir_all(root.join("pkg/sub")).unwrap();
    fs::write(root.join("pkg/mod.py"), "").unwrap();
    fs::write(root.join("pkg/sub/deep.ts"), "export {}").unwrap();
    fs::create_dir(root.join("lib")).unwrap();
    fs::write(root.join("lib/util.js"), "").unwrap();

    let options = ProjcatBuilder::new(root).root_label("demo").build();
    let result = snapshot(&options).unwrap();
    assert_eq!(
        result.tree,
        vec![
            "demo/",
            "├── a.py",
            "├── z.txt",
            "├── lib/",
            "│   ├── util.js",
            "├── pkg/",
            "│   ├── mod.py",
            "│   ├── sub/",
            "│   │   ├── deep.ts",
        ]
    );
    let paths: Vec<_> = result.files.iter().map(|f| f.path.clone()).collect();
    assert_eq!(
        paths,
        vec![
            Path::new("a.py").to_path_buf(),
            Path::new("lib").join("util.js"),
            Path::new("pkg").join("mod.py"),
            Path::new("pkg").join("sub").join("deep.ts"),
        ]
    );
    assert_eq!(result.files[0].content, "a = 1");
    assert_eq!(result.files[0].language, "py");
    assert_eq!(result.files[3].language, "ts");
}

#[test]
fn test_gitignore_excludes_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".gitignore"), "*.log\n").unwrap();
    fs::write(dir.path().join("debug.log"), "noise").unwrap();
    fs::write(dir.path().join("app.py"), "print('hi')").unwrap();
    let result = snapshot(&ProjcatBuilder::new(dir.path()).build()).unwrap();
    assert!(result.tree.iter().any(|l| l.ends_with("app.py")));
    assert!(!result.tree.iter().any(|l| l.contains("debug.log")));
    assert_eq!(result.files.len(), 1);
    assert_eq!(result.files[0].path, Path::new("app.py"));
}

#[test]
fn test_excluded_directories_are_pruned() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("node_modules/lib")).unwrap();
    fs::write(root.join("node_modules/lib/index.js"), "x").unwrap();
    fs::create_dir_all(root.join("web/node_modules")).unwrap();
    fs::write(root.join("web/node_modules/dep.js"), "x").unwrap();
    fs::write(root.join("web/app.jsx"), "x").unwrap();
    fs::create_dir(root.join("__pycache__")).unwrap();
    fs::write(root.join("__pycache__/m.pyc"), [0u8, 1, 2]).unwrap();

    let result = snapshot(&ProjcatBuilder::new(root).build()).unwrap();
    let joined = result.tree.join("\n");
    assert!(!joined.contains("node_modules"));
    assert!(!joined.contains("index.js"));
    assert!(!joined.contains("dep.js"));
    assert!(!joined.contains("__pycache__"));
    assert!(joined.contains("app.jsx"));
    assert_eq!(result.files.len(), 1);
    assert_eq!(result.files[0].path, Path::new("web").join("app.jsx"));
}

#[test]
fn test_segment_mode_prunes_at_any_depth() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("src/build")).unwrap();
    fs::write(root.join("src/build/out.js"), "x").unwrap();
    fs::write(root.join("src/main.ts"), "x").unwrap();

    let whole = snapshot(
        &ProjcatBuilder::new(root)
            .ignore_patterns(vec!["build".into()])
            .build(),
    )
    .unwrap();
    assert_eq!(whole.files.len(), 2);

    let segment = snapshot(
        &ProjcatBuilder::new(root)
            .match_mode(MatchMode::Segment)
            .ignore_patterns(vec!["build".into()])
            .build(),
    )
    .unwrap();
    assert_eq!(segment.files.len(), 1);
    assert!(!segment.tree.iter().any(|l| l.contains("build")));
}

#[test]
fn test_undecodable_file_gets_placeholder() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("broken.py"), [0x66u8, 0xff, 0xfe, 0x80]).unwrap();
    fs::write(dir.path().join("ok.py"), "pass").unwrap();
    let result = snapshot(&ProjcatBuilder::new(dir.path()).build()).unwrap();
    assert_eq!(result.files.len(), 2);
    let broken = &result.files[0];
    assert_eq!(broken.path, Path::new("broken.py"));
    assert_eq!(broken.status, ContentStatus::Undecodable);
    assert_eq!(broken.content, ENCODING_PLACEHOLDER);
    assert_eq!(result.files[1].content, "pass");
}

#[test]
fn test_binary_detection_and_size_limit() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("blob.js"), [b'a', 0, b'b']).unwrap();
    fs::write(dir.path().join("big.ts"), "A".repeat(500)).unwrap();

    let plain = snapshot(&ProjcatBuilder::new(dir.path()).build()).unwrap();
    assert!(plain.files.iter().all(|f| f.status == ContentStatus::Text));

    let result = snapshot(
        &ProjcatBuilder::new(dir.path())
            .binary_detection(BinaryDetection::Simple)
            .file_size_limit(Some(100))
            .build(),
    )
    .unwrap();
    let big = &result.files[0];
    assert_eq!(big.status, ContentStatus::TooLarge);
    assert!(big.content.contains("too large"));
    assert_eq!(result.files[1].status, ContentStatus::Binary);
}

#[test]
fn test_skip_path_and_filesystem_order() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("main.py"), "").unwrap();
    fs::write(dir.path().join("project_structure.md"), "old").unwrap();
    let result = snapshot(
        &ProjcatBuilder::new(dir.path())
            .order(TraversalOrder::Filesystem)
            .skip_path(dir.path().join("project_structure.md"))
            .build(),
    )
    .unwrap();
    assert_eq!(result.tree.len(), 2);
    assert!(result.tree[1].ends_with("main.py"));
}

#[test]
fn test_missing_root() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");
    let err = snapshot(&ProjcatBuilder::new(&missing).build()).unwrap_err();
    assert!(matches!(err, ProjcatError::InvalidInput(_)));

    let file = dir.path().join("file.py");
    fs::write(&file, "").unwrap();
    let err = snapshot(&ProjcatBuilder::new(&file).build()).unwrap_err();
    assert!(matches!(err, ProjcatError::InvalidInput(_)));
}

#[test]
fn test_accurate_binary_detection() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("blob.js"), b"var a = 1;\0\0\x01\x02").unwrap();
    fs::write(dir.path().join("text.js"), "var b = '\u{e9}t\u{e9}';").unwrap();
    let result = snapshot(
        &ProjcatBuilder::new(dir.path())
            .binary_detection(BinaryDetection::Accurate)
            .build(),
    )
    .unwrap();
    assert_eq!(result.files[0].status, ContentStatus::Binary);
    assert_eq!(result.files[0].content, BINARY_PLACEHOLDER);
    assert_eq!(result.files[1].status, ContentStatus::Text);
    assert_eq!(result.files[1].content, "var b = '\u{e9}t\u{e9}';");
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_gets_placeholder() {
    use std::os::unix::fs::symlink;

    let dir = tempdir().unwrap();
    symlink(dir.path().join("gone.py"), dir.path().join("dangling.py")).unwrap();
    fs::create_dir(dir.path().join("real")).unwrap();
    fs::write(dir.path().join("real/a.py"), "a = 1").unwrap();

    let result = snapshot(&ProjcatBuilder::new(dir.path()).build()).unwrap();
    assert_eq!(result.files.len(), 2);
    let dangling = &result.files[0];
    assert_eq!(dangling.path, Path::new("dangling.py"));
    assert_eq!(dangling.status, ContentStatus::Unreadable);
    assert!(dangling.content.starts_with("# Unable to read file: "));
    assert_eq!(result.files[1].path, Path::new("real").join("a.py"));
    assert_eq!(result.files[1].content, "a = 1");
}

#[cfg(unix)]
#[test]
fn test_unlistable_directory_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("hidden.py"), "secret = 1").unwrap();
    fs::create_dir(dir.path().join("open")).unwrap();
    fs::write(dir.path().join("open/a.py"), "a = 1").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Permission bits do not stop a privileged user.
    let listable = fs::read_dir(&locked).is_ok();
    let result = snapshot(&ProjcatBuilder::new(dir.path()).build());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    if listable {
        return;
    }

    let result = result.unwrap();
    assert!(!result.tree.iter().any(|l| l.contains("hidden.py")));
    assert_eq!(result.files.len(), 1);
    assert_eq!(result.files[0].path, Path::new("open").join("a.py"));
}

#[cfg(unix)]
#[test]
fn test_symlinked_directory_sorts_as_file() {
    use std::os::unix::fs::symlink;

    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("real")).unwrap();
    fs::write(dir.path().join("real/a.py"), "").unwrap();
    fs::write(dir.path().join("z.py"), "").unwrap();
    symlink(dir.path().join("real"), dir.path().join("alias")).unwrap();

    let result = snapshot(&ProjcatBuilder::new(dir.path()).root_label("demo").build()).unwrap();
    assert_eq!(
        result.tree,
        vec!["demo/", "├── alias", "├── z.py", "├── real/", "│   ├── a.py"]
    );
}
