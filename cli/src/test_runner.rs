use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use blocks::metadata::LiveMetadata;

const FIXTURE_SUFFIX: &str = ".test.json";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FixtureConfig {
    /// Human-readable fixture description.
    pub description: Option<String>,

    /// Live metadata handed to the compiler.
    pub html_class: String,
    pub body_class: String,
    pub stylesheet_urls: Vec<String>,

    /// Expected exact document (trimmed comparison).
    pub expect_output: Option<String>,

    /// Substrings that must all appear in the document.
    pub expect_contains: Vec<String>,

    /// Substrings that must not appear in the document.
    pub expect_absent: Vec<String>,

    /// Expected compile error; its Display string must contain this substring.
    pub expect_error: Option<String>,

    /// If true, the fixture expects the layout JSON to be rejected.
    pub expect_parse_error: bool,

    /// If set, the exact number of parse warnings.
    pub expect_warnings: Option<usize>,
}

impl FixtureConfig {
    fn metadata(&self) -> LiveMetadata {
        LiveMetadata {
            html_class: self.html_class.clone(),
            body_class: self.body_class.clone(),
            stylesheet_urls: self.stylesheet_urls.clone(),
        }
    }
}

/// Split a fixture into its TOML frontmatter and layout JSON.
fn split_fixture(content: &str) -> Result<(FixtureConfig, &str), String> {
    let content = content.trim_start_matches('\u{feff}');

    let body = content
        .strip_prefix("---")
        .ok_or("missing opening --- frontmatter delimiter")?;
    let body = body
        .strip_prefix("\r\n")
        .or_else(|| body.strip_prefix('\n'))
        .unwrap_or(body);

    let close = body
        .find("\n---")
        .ok_or("missing closing --- frontmatter delimiter")?;
    let frontmatter = body[..close].trim_end_matches('\r');
    let layout = body[close + "\n---".len()..].trim_start_matches(['\r', '\n']);

    let config: FixtureConfig =
        toml::from_str(frontmatter).map_err(|e| format!("TOML parse error: {}", e))?;
    Ok((config, layout))
}

pub struct FixtureResult {
    pub path: PathBuf,
    pub description: Option<String>,
    /// `None` on success, otherwise why the fixture failed.
    pub failure: Option<String>,
}

impl FixtureResult {
    fn label(&self) -> &str {
        self.description.as_deref().unwrap_or_else(|| {
            self.path
                .file_name()
                .and_then(|s| s.to_str())
                .and_then(|s| s.strip_suffix(FIXTURE_SUFFIX))
                .unwrap_or("?")
        })
    }
}

fn run_fixture(path: &Path) -> FixtureResult {
    let (description, failure) = match std::fs::read_to_string(path) {
        Ok(content) => match split_fixture(&content) {
            Ok((config, layout)) => (config.description.clone(), check_fixture(&config, layout)),
            Err(e) => (None, Some(format!("frontmatter error: {}", e))),
        },
        Err(e) => (None, Some(format!("cannot read file: {}", e))),
    };

    FixtureResult {
        path: path.to_path_buf(),
        description,
        failure,
    }
}

/// Parse and compile one fixture layout. Returns `Some(reason)` on failure.
fn check_fixture(config: &FixtureConfig, layout_source: &str) -> Option<String> {
    let parsed = blocks::parser::Parser::new(layout_source.to_string(), 0).parse();

    if config.expect_parse_error {
        return match parsed {
            Err(_) => None,
            Ok(_) => Some("expected parse error, but parsing succeeded".into()),
        };
    }

    let layout = match parsed {
        Ok(layout) => layout,
        Err(errors) => {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            return Some(format!("unexpected parse error: {}", messages.join("; ")));
        }
    };

    if let Some(expected) = config.expect_warnings {
        let actual = layout.diagnostics.len();
        if actual != expected {
            let listed: Vec<String> = layout
                .diagnostics
                .iter()
                .map(|d| format!("  - {}", d))
                .collect();
            return Some(format!(
                "expected {} warning(s), got {}\n{}",
                expected,
                actual,
                listed.join("\n")
            ));
        }
    }

    let document = match (renderer::compile_layout(&layout, &config.metadata()), &config.expect_error) {
        (Err(err), Some(expected)) => {
            let message = err.to_string();
            return if message.contains(expected.as_str()) {
                None
            } else {
                Some(format!(
                    "expected error containing \"{}\", got: {}",
                    expected, message
                ))
            };
        }
        (Err(err), None) => return Some(format!("unexpected compile error: {}", err)),
        (Ok(_), Some(expected)) => {
            return Some(format!(
                "expected error containing \"{}\", but compilation succeeded",
                expected
            ));
        }
        (Ok(document), None) => document,
    };

    if let Some(expected) = &config.expect_output {
        if document.trim() != expected.trim() {
            return Some(format!(
                "output mismatch\n  expected: {}\n  actual:   {}",
                expected.trim(),
                document.trim()
            ));
        }
    }

    for needle in &config.expect_contains {
        if !document.contains(needle.as_str()) {
            return Some(format!(
                "expected output to contain \"{}\"\n  actual: {}",
                needle, document
            ));
        }
    }

    for needle in &config.expect_absent {
        if document.contains(needle.as_str()) {
            return Some(format!(
                "expected output not to contain \"{}\"\n  actual: {}",
                needle, document
            ));
        }
    }

    None
}

/// Discover fixtures grouped by category (subfolder relative to root).
/// Files directly in `root` get category "" (uncategorized).
fn discover_categorized(root: &Path) -> BTreeMap<String, Vec<PathBuf>> {
    let mut categories: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    collect_fixtures(root, root, &mut categories);
    for files in categories.values_mut() {
        files.sort();
    }
    categories
}

fn collect_fixtures(dir: &Path, root: &Path, out: &mut BTreeMap<String, Vec<PathBuf>>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|entry| entry.path()) {
        if path.is_dir() {
            collect_fixtures(&path, root, out);
            continue;
        }
        let is_fixture = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(FIXTURE_SUFFIX));
        if is_fixture {
            let category = path
                .parent()
                .and_then(|p| p.strip_prefix(root).ok())
                .map(|p| p.to_string_lossy().replace('\\', "/"))
                .unwrap_or_default();
            out.entry(category).or_default().push(path);
        }
    }
}

fn category_label(category: &str) -> &str {
    if category.is_empty() { "(root)" } else { category }
}

/// List available categories for the given fixture path.
pub fn list_categories(path: &Path) {
    if path.is_file() {
        eprintln!("(single file, no categories)");
        return;
    }

    let categories = discover_categorized(path);
    if categories.is_empty() {
        eprintln!("no {} files found in {}", FIXTURE_SUFFIX, path.display());
        return;
    }

    eprintln!("available categories:");
    for (category, files) in &categories {
        eprintln!("  {} ({} fixtures)", category_label(category), files.len());
    }
}

/// Terminal styling for the report.
struct Palette {
    no_color: bool,
}

impl Palette {
    fn paint(&self, code: &str, text: &str) -> String {
        if self.no_color {
            text.to_string()
        } else {
            format!("\x1b[{}m{}\x1b[0m", code, text)
        }
    }

    fn pass(&self) -> String {
        self.paint("32", "PASS")
    }

    fn fail(&self) -> String {
        self.paint("31", "FAIL")
    }

    fn bold(&self, text: &str) -> String {
        self.paint("1", text)
    }
}

/// Select fixtures to run: the single file, or every fixture in the
/// requested categories (all categories when none are requested).
fn select_fixtures(path: &Path, categories: &[String]) -> Vec<(String, Vec<PathBuf>)> {
    if path.is_file() {
        return vec![(String::new(), vec![path.to_path_buf()])];
    }

    let all = discover_categorized(path);
    if categories.is_empty() {
        return all.into_iter().collect();
    }

    let mut selected = BTreeMap::new();
    for requested in categories {
        let requested = requested.trim_matches('/');
        let prefix = format!("{}/", requested);
        let matching: Vec<_> = all
            .iter()
            .filter(|(category, _)| *category == requested || category.starts_with(&prefix))
            .collect();
        if matching.is_empty() {
            let available: Vec<&str> = all.keys().map(|k| category_label(k)).collect();
            eprintln!(
                "warning: category '{}' not found (available: {})",
                requested,
                available.join(", ")
            );
        }
        for (category, files) in matching {
            selected.insert(category.clone(), files.clone());
        }
    }
    selected.into_iter().collect()
}

/// Run fixtures under `path` (or a single fixture file).
/// Returns exit code: 0 = all pass, 1 = any failure or nothing to run.
pub fn run_tests(path: &Path, no_color: bool, categories: &[String]) -> i32 {
    let palette = Palette { no_color };
    let selected = select_fixtures(path, categories);

    if selected.iter().all(|(_, files)| files.is_empty()) {
        eprintln!("no {} files found in {}", FIXTURE_SUFFIX, path.display());
        return 1;
    }

    let single_file = path.is_file();
    let mut passed = 0usize;
    let mut failures: Vec<FixtureResult> = Vec::new();

    for (category, files) in &selected {
        if !single_file {
            eprintln!();
            eprintln!("{}", palette.bold(category_label(category)));
        }
        for file in files {
            let result = run_fixture(file);
            if result.failure.is_none() {
                passed += 1;
                eprintln!("  {}  {}", palette.pass(), result.label());
            } else {
                eprintln!("  {}  {}", palette.fail(), result.label());
                failures.push(result);
            }
        }
    }

    if !failures.is_empty() {
        eprintln!();
        eprintln!("failures:");
        for result in &failures {
            eprintln!();
            eprintln!("  --- {} ---", result.path.display());
            for line in result.failure.as_deref().unwrap_or_default().lines() {
                eprintln!("  {}", line);
            }
        }
    }

    eprintln!();
    if failures.is_empty() {
        eprintln!("test result: {}. {} passed, 0 failed", palette.paint("32", "ok"), passed);
        0
    } else {
        eprintln!(
            "test result: {}. {} passed, {} failed (of {})",
            palette.paint("31", "FAILED"),
            passed,
            failures.len(),
            passed + failures.len()
        );
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const PASSING: &str = r#"---
description = "raw image defaults"
body_class = "font-sans"
expect_contains = ['<img src="/a.png">', '<body class="font-sans">']
expect_absent = ["bp-"]
expect_warnings = 0
---
{ "data": { "blocks": [ { "tagName": "html", "children": [
  { "component": { "name": "Raw:Img", "options": { "image": "/a.png" } } }
] } ] } }
"#;

    #[test]
    fn splits_frontmatter_from_layout() {
        let (config, layout) = split_fixture(PASSING).unwrap();
        assert_eq!(config.description.as_deref(), Some("raw image defaults"));
        assert_eq!(config.metadata().body_class, "font-sans");
        assert!(layout.starts_with("{ \"data\""));
    }

    #[test]
    fn rejects_missing_delimiters() {
        assert!(split_fixture("{}").is_err());
        assert!(split_fixture("---\ndescription = \"x\"\n{}").is_err());
    }

    #[test]
    fn passing_and_failing_fixtures() {
        let (config, layout) = split_fixture(PASSING).unwrap();
        assert_eq!(check_fixture(&config, layout), None);

        let config = FixtureConfig {
            expect_contains: vec!["<picture>".to_string()],
            ..FixtureConfig::default()
        };
        let reason = check_fixture(&config, layout).expect("fixture should fail");
        assert!(reason.contains("<picture>"));
    }

    #[test]
    fn expected_errors() {
        let config = FixtureConfig {
            expect_error: Some("no root block".to_string()),
            ..FixtureConfig::default()
        };
        assert_eq!(check_fixture(&config, r#"{ "data": { "blocks": [] } }"#), None);

        let config = FixtureConfig {
            expect_parse_error: true,
            ..FixtureConfig::default()
        };
        assert_eq!(check_fixture(&config, "{ nope"), None);
    }

    #[test]
    fn runs_a_fixture_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("images")).unwrap();
        fs::write(dir.path().join("images/raw.test.json"), PASSING).unwrap();
        fs::write(dir.path().join("notes.md"), "not a fixture").unwrap();

        let categories = discover_categorized(dir.path());
        assert_eq!(categories.len(), 1);
        assert_eq!(categories["images"].len(), 1);

        assert_eq!(run_tests(dir.path(), true, &[]), 0);
        assert_eq!(run_tests(dir.path(), true, &["missing".to_string()]), 1);

        fs::write(
            dir.path().join("images/broken.test.json"),
            "---\nexpect_output = \"<p></p>\"\n---\n{}",
        )
        .unwrap();
        assert_eq!(run_tests(dir.path(), true, &["images".to_string()]), 1);
    }

    #[test]
    fn bundled_fixtures_pass() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../fixtures");
        assert_eq!(run_tests(&root, true, &[]), 0);
    }
}
