//! Module name inference from build descriptors.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Resolves the logical module a file path belongs to.
pub trait ModuleResolver: Send + Sync {
    /// Returns the module name for the given file path, or an empty string
    /// if no module encloses it.
    fn guess(&self, file_path: &str) -> String;
}

/// Resolver used when module detection is disabled; always answers with an
/// empty string so callers need not branch on the detection flag.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullResolver;

impl ModuleResolver for NullResolver {
    fn guess(&self, _file_path: &str) -> String {
        String::new()
    }
}

/// Descriptor precedence when one directory carries several build files.
/// Lower ranks win.
const RANK_MAVEN: u8 = 0;
const RANK_CARGO: u8 = 1;
const RANK_ANT: u8 = 2;

/// Module boundaries detected from build descriptors in a workspace.
///
/// The workspace is walked exactly once at construction; lookups afterwards
/// are pure map queries, so tagging thousands of annotations never re-walks
/// the filesystem. No instance outlives a single scan invocation.
pub struct WorkspaceModules {
    modules: HashMap<PathBuf, (u8, String)>,
}

impl WorkspaceModules {
    /// Scans the workspace root for recognized build descriptors
    /// (`pom.xml`, `Cargo.toml`, `build.xml`) and records each containing
    /// directory as a module boundary.
    #[must_use]
    pub fn scan(root: &Path) -> Self {
        let mut modules: HashMap<PathBuf, (u8, String)> = HashMap::new();

        for entry in WalkDir::new(root).into_iter().filter_map(Result::ok) {
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(file_name) = entry.file_name().to_str() else {
                continue;
            };
            let Some(dir) = entry.path().parent() else {
                continue;
            };

            let detected = match file_name {
                "pom.xml" => Some((RANK_MAVEN, maven_module_name(entry.path(), dir))),
                "Cargo.toml" => Some((RANK_CARGO, cargo_module_name(entry.path(), dir))),
                "build.xml" => Some((RANK_ANT, ant_module_name(entry.path(), dir))),
                _ => None,
            };

            if let Some((rank, name)) = detected {
                debug!("Detected module '{}' at {}", name, dir.display());
                let replace = match modules.get(dir) {
                    Some((existing, _)) => rank < *existing,
                    None => true,
                };
                if replace {
                    modules.insert(dir.to_path_buf(), (rank, name));
                }
            }
        }

        Self { modules }
    }

    /// Number of detected module boundaries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns true if no module boundary was detected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl ModuleResolver for WorkspaceModules {
    fn guess(&self, file_path: &str) -> String {
        if file_path.is_empty() {
            return String::new();
        }
        // Nearest enclosing boundary wins, so walk ancestors inside-out.
        for ancestor in Path::new(file_path).ancestors().skip(1) {
            if let Some((_, name)) = self.modules.get(ancestor) {
                return name.clone();
            }
        }
        String::new()
    }
}

/// Directory-name fallback shared by all descriptor readers.
fn dir_name(dir: &Path) -> String {
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Reads the module name from `[package] name` of a Cargo manifest.
fn cargo_module_name(manifest: &Path, dir: &Path) -> String {
    let Ok(content) = std::fs::read_to_string(manifest) else {
        return dir_name(dir);
    };
    content
        .parse::<toml::Table>()
        .ok()
        .and_then(|table| {
            table
                .get("package")
                .and_then(|package| package.get("name"))
                .and_then(|name| name.as_str())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| dir_name(dir))
}

/// Reads the module name from a Maven POM: the project-level `<name>`,
/// falling back to `<artifactId>`, falling back to the directory name.
/// Depth tracking keeps `<parent>` and `<developers>` children from
/// shadowing the project-level elements.
fn maven_module_name(pom: &Path, dir: &Path) -> String {
    let Ok(content) = std::fs::read_to_string(pom) else {
        return dir_name(dir);
    };

    let mut reader = Reader::from_str(&content);

    let mut depth = 0usize;
    let mut capture: Option<&str> = None;
    let mut name = None;
    let mut artifact_id = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) => {
                depth += 1;
                capture = match (depth, element.name().as_ref()) {
                    (2, b"name") => Some("name"),
                    (2, b"artifactId") => Some("artifactId"),
                    _ => None,
                };
            }
            Ok(Event::End(_)) => {
                depth = depth.saturating_sub(1);
                capture = None;
            }
            Ok(Event::Text(text)) => {
                if let Some(target) = capture {
                    if let Ok(value) = text.unescape() {
                        let value = value.trim().to_owned();
                        match target {
                            "name" => name = Some(value),
                            _ => artifact_id = Some(value),
                        }
                    }
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            Ok(_) => {}
        }
    }

    name.or(artifact_id)
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| dir_name(dir))
}

/// Reads the module name from an Ant build file: the `name` attribute of the
/// `<project>` element, falling back to the directory name.
fn ant_module_name(build: &Path, dir: &Path) -> String {
    let Ok(content) = std::fs::read_to_string(build) else {
        return dir_name(dir);
    };

    let mut reader = Reader::from_str(&content);
    loop {
        match reader.read_event() {
            Ok(Event::Start(element) | Event::Empty(element)) => {
                if element.name().as_ref() == b"project" {
                    let name = element.attributes().filter_map(Result::ok).find_map(|a| {
                        (a.key.as_ref() == b"name")
                            .then(|| String::from_utf8_lossy(&a.value).into_owned())
                    });
                    return name
                        .filter(|value| !value.is_empty())
                        .unwrap_or_else(|| dir_name(dir));
                }
                return dir_name(dir);
            }
            Ok(Event::Eof) | Err(_) => return dir_name(dir),
            Ok(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn null_resolver_always_answers_empty() {
        let resolver = NullResolver;
        assert_eq!(resolver.guess("any/path/File.java"), "");
        assert_eq!(resolver.guess(""), "");
    }

    #[test]
    fn maven_name_wins_over_artifact_id() {
        let workspace = tempfile::tempdir().unwrap();
        write(
            &workspace.path().join("module-a/pom.xml"),
            r"<project>
                <parent><artifactId>parent-app</artifactId></parent>
                <artifactId>module-a</artifactId>
                <name>Module A</name>
            </project>",
        );

        let modules = WorkspaceModules::scan(workspace.path());
        let file = workspace.path().join("module-a/src/main/java/Foo.java");
        assert_eq!(modules.guess(&file.to_string_lossy()), "Module A");
    }

    #[test]
    fn maven_falls_back_to_artifact_id_outside_parent_block() {
        let workspace = tempfile::tempdir().unwrap();
        write(
            &workspace.path().join("module-b/pom.xml"),
            r"<project>
                <parent><artifactId>parent-app</artifactId></parent>
                <artifactId>module-b</artifactId>
            </project>",
        );

        let modules = WorkspaceModules::scan(workspace.path());
        let file = workspace.path().join("module-b/src/Foo.java");
        assert_eq!(modules.guess(&file.to_string_lossy()), "module-b");
    }

    #[test]
    fn cargo_manifest_yields_package_name() {
        let workspace = tempfile::tempdir().unwrap();
        write(
            &workspace.path().join("engine/Cargo.toml"),
            "[package]\nname = \"engine-core\"\nversion = \"0.1.0\"\n",
        );

        let modules = WorkspaceModules::scan(workspace.path());
        let file = workspace.path().join("engine/src/lib.rs");
        assert_eq!(modules.guess(&file.to_string_lossy()), "engine-core");
    }

    #[test]
    fn ant_project_attribute_with_directory_fallback() {
        let workspace = tempfile::tempdir().unwrap();
        write(
            &workspace.path().join("legacy/build.xml"),
            r#"<project name="Legacy Build" default="compile"></project>"#,
        );
        write(
            &workspace.path().join("unnamed/build.xml"),
            r"<project></project>",
        );

        let modules = WorkspaceModules::scan(workspace.path());
        let in_legacy = workspace.path().join("legacy/src/Foo.java");
        let in_unnamed = workspace.path().join("unnamed/src/Foo.java");
        assert_eq!(modules.guess(&in_legacy.to_string_lossy()), "Legacy Build");
        assert_eq!(modules.guess(&in_unnamed.to_string_lossy()), "unnamed");
    }

    #[test]
    fn nearest_enclosing_module_wins() {
        let workspace = tempfile::tempdir().unwrap();
        write(
            &workspace.path().join("pom.xml"),
            r"<project><name>Top</name></project>",
        );
        write(
            &workspace.path().join("nested/pom.xml"),
            r"<project><name>Nested</name></project>",
        );

        let modules = WorkspaceModules::scan(workspace.path());
        let deep = workspace.path().join("nested/src/main/java/Foo.java");
        let shallow = workspace.path().join("other/Foo.java");
        assert_eq!(modules.guess(&deep.to_string_lossy()), "Nested");
        assert_eq!(modules.guess(&shallow.to_string_lossy()), "Top");
    }

    #[test]
    fn file_three_levels_below_descriptor_resolves() {
        let workspace = tempfile::tempdir().unwrap();
        write(
            &workspace.path().join("app/pom.xml"),
            r"<project><name>App</name></project>",
        );

        let modules = WorkspaceModules::scan(workspace.path());
        let file = workspace.path().join("app/src/main/java/App.java");
        assert_eq!(modules.guess(&file.to_string_lossy()), "App");
    }

    #[test]
    fn file_outside_any_module_resolves_empty() {
        let workspace = tempfile::tempdir().unwrap();
        write(
            &workspace.path().join("app/pom.xml"),
            r"<project><name>App</name></project>",
        );

        let modules = WorkspaceModules::scan(workspace.path());
        assert_eq!(modules.guess("/somewhere/else/Foo.java"), "");
        assert_eq!(modules.guess(""), "");
    }

    #[test]
    fn maven_descriptor_outranks_ant_in_same_directory() {
        let workspace = tempfile::tempdir().unwrap();
        write(
            &workspace.path().join("dual/pom.xml"),
            r"<project><name>Maven Name</name></project>",
        );
        write(
            &workspace.path().join("dual/build.xml"),
            r#"<project name="Ant Name"></project>"#,
        );

        let modules = WorkspaceModules::scan(workspace.path());
        let file = workspace.path().join("dual/src/Foo.java");
        assert_eq!(modules.guess(&file.to_string_lossy()), "Maven Name");
    }
}
