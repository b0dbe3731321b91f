//! File/pattern scan driver orchestrating parser execution.

use crate::annotation::Annotation;
use crate::modules::{ModuleResolver, NullResolver, WorkspaceModules};
use crate::parser::ParserBox;
use crate::registry::ParserRegistry;
use crate::result::ParserResult;

use encoding_rs::Encoding;
use std::collections::HashSet;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that terminate a scan.
///
/// Per-file failures never surface here; they are recorded as log lines in
/// the [`ParserResult`] and the scan continues. Only setup mistakes,
/// cancellation, and an unreadable console log abort the whole operation.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Neither file patterns nor console parsers were supplied.
    #[error("no warning parsers configured for the scan")]
    NoParsersConfigured,

    /// Console parser groups were supplied without a console log path.
    #[error("console parsers configured but no console log was provided")]
    MissingConsoleLog,

    /// The configured encoding label is not a known character encoding.
    #[error("unknown encoding label `{0}`")]
    UnknownEncoding(String),

    /// Cancellation was observed between units of work.
    #[error("scan canceled")]
    Canceled,

    /// The console log itself could not be read.
    #[error("console log {path} could not be read")]
    ConsoleLog {
        /// Path of the console log.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

/// Cooperative cancellation signal checked between files and patterns.
///
/// Clones share the same underlying flag, so a caller can keep one handle
/// and cancel a scan running elsewhere.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a new, un-canceled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of the scan holding this token.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Returns true once cancellation has been requested.
    #[must_use]
    pub fn is_canceled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// One file pattern and the parser group to run over its matches.
#[derive(Debug, Clone)]
pub struct FileScanConfig {
    /// Glob pattern, relative to the workspace root.
    pub pattern: String,
    /// Parser group name to resolve against the registry.
    pub parser_group: String,
}

impl FileScanConfig {
    /// Creates a new file scan configuration.
    #[must_use]
    pub fn new(pattern: impl Into<String>, parser_group: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            parser_group: parser_group.into(),
        }
    }
}

/// Builder for configuring a [`Scanner`].
#[derive(Default)]
pub struct ScannerBuilder {
    workspace: Option<PathBuf>,
    file_configs: Vec<FileScanConfig>,
    console_groups: Vec<String>,
    console_log: Option<PathBuf>,
    detect_modules: bool,
    encoding: Option<String>,
    cancel: Option<CancelToken>,
}

impl ScannerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the workspace root patterns are expanded against.
    #[must_use]
    pub fn workspace(mut self, path: impl Into<PathBuf>) -> Self {
        self.workspace = Some(path.into());
        self
    }

    /// Adds a file pattern with the parser group to apply to its matches.
    #[must_use]
    pub fn file_pattern(
        mut self,
        pattern: impl Into<String>,
        parser_group: impl Into<String>,
    ) -> Self {
        self.file_configs
            .push(FileScanConfig::new(pattern, parser_group));
        self
    }

    /// Adds a parser group to run over the console log.
    #[must_use]
    pub fn console_parser(mut self, parser_group: impl Into<String>) -> Self {
        self.console_groups.push(parser_group.into());
        self
    }

    /// Sets the console log file parsed by console parser groups.
    #[must_use]
    pub fn console_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.console_log = Some(path.into());
        self
    }

    /// Enables or disables module name detection (default: disabled).
    #[must_use]
    pub fn detect_modules(mut self, detect: bool) -> Self {
        self.detect_modules = detect;
        self
    }

    /// Sets the character encoding label used to decode input files
    /// (e.g. "ISO-8859-1"). Defaults to UTF-8 with lossy fallback.
    #[must_use]
    pub fn encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = Some(label.into());
        self
    }

    /// Attaches a cancellation token checked between files and patterns.
    #[must_use]
    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Builds the scanner.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::NoParsersConfigured`] if neither file patterns
    /// nor console parsers were supplied, [`ScanError::MissingConsoleLog`]
    /// if console parsers lack a console log path, and
    /// [`ScanError::UnknownEncoding`] for an unrecognized encoding label.
    pub fn build(self) -> Result<Scanner, ScanError> {
        if self.file_configs.is_empty() && self.console_groups.is_empty() {
            return Err(ScanError::NoParsersConfigured);
        }
        if !self.console_groups.is_empty() && self.console_log.is_none() {
            return Err(ScanError::MissingConsoleLog);
        }

        let encoding = match &self.encoding {
            Some(label) => Some(
                Encoding::for_label(label.as_bytes())
                    .ok_or_else(|| ScanError::UnknownEncoding(label.clone()))?,
            ),
            None => None,
        };

        Ok(Scanner {
            workspace: self.workspace.unwrap_or_else(|| PathBuf::from(".")),
            file_configs: self.file_configs,
            console_groups: self.console_groups,
            console_log: self.console_log,
            detect_modules: self.detect_modules,
            encoding,
            cancel: self.cancel.unwrap_or_default(),
        })
    }
}

/// The scan driver: expands patterns, applies parsers, and aggregates
/// annotations into a single [`ParserResult`].
///
/// Use [`Scanner::builder()`] to construct an instance.
pub struct Scanner {
    workspace: PathBuf,
    file_configs: Vec<FileScanConfig>,
    console_groups: Vec<String>,
    console_log: Option<PathBuf>,
    detect_modules: bool,
    encoding: Option<&'static Encoding>,
    cancel: CancelToken,
}

impl Scanner {
    /// Creates a new builder for configuring a scanner.
    #[must_use]
    pub fn builder() -> ScannerBuilder {
        ScannerBuilder::new()
    }

    /// Returns the workspace root being scanned.
    #[must_use]
    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    /// Runs the scan and returns the aggregated result.
    ///
    /// File read failures are folded into the result's log lines; the scan
    /// only fails as a whole on cancellation or an unreadable console log.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Canceled`] if cancellation is observed between
    /// files or patterns, and [`ScanError::ConsoleLog`] if the console log
    /// cannot be read.
    pub fn scan(&self, registry: &ParserRegistry) -> Result<ParserResult, ScanError> {
        info!("Starting scan in {}", self.workspace.display());
        let resolver = self.create_resolver();

        let mut result = ParserResult::new();

        if !self.file_configs.is_empty() {
            result.log(format!(
                "Parsing {} pattern(s) in {}.",
                self.file_configs.len(),
                self.workspace.display()
            ));
            for config in &self.file_configs {
                self.ensure_not_canceled()?;
                let project = self.parse_pattern(config, registry, resolver.as_ref())?;
                result.merge(project);
            }
        }

        if !self.console_groups.is_empty() {
            let log_path = self
                .console_log
                .as_deref()
                .ok_or(ScanError::MissingConsoleLog)?;
            result.log(format!(
                "Parsing console log with {} parser group(s).",
                self.console_groups.len()
            ));
            for group in &self.console_groups {
                self.ensure_not_canceled()?;
                let project = self.parse_console(log_path, group, registry, resolver.as_ref())?;
                result.merge(project);
            }
        }

        info!(
            "Scan complete: {} warning(s) found",
            result.number_of_warnings()
        );
        Ok(result)
    }

    /// Expands one pattern and runs its parser group over every match.
    ///
    /// Per-file failures are isolated: they become log lines and the
    /// remaining files are still processed.
    fn parse_pattern(
        &self,
        config: &FileScanConfig,
        registry: &ParserRegistry,
        resolver: &dyn ModuleResolver,
    ) -> Result<ParserResult, ScanError> {
        let mut project = ParserResult::new();
        project.log(format!(
            "Parsing warnings in files matching '{}' with parser group '{}'.",
            config.pattern, config.parser_group
        ));

        let parsers = registry.resolve(&config.parser_group);
        if parsers.is_empty() {
            warn!("No parsers registered for group '{}'", config.parser_group);
            project.log(format!(
                "No parsers registered for group '{}'.",
                config.parser_group
            ));
            return Ok(project);
        }

        let full_pattern = if Path::new(&config.pattern).is_absolute() {
            config.pattern.clone()
        } else {
            format!("{}/{}", self.workspace.display(), config.pattern)
        };

        let paths = match glob::glob(&full_pattern) {
            Ok(paths) => paths,
            Err(error) => {
                project.log(format!("Pattern '{}' is invalid: {error}", config.pattern));
                return Ok(project);
            }
        };

        let mut matched = 0_usize;
        for entry in paths {
            self.ensure_not_canceled()?;

            let path = match entry {
                Ok(path) => path,
                Err(error) => {
                    project.log(format!(
                        "Skipping file '{}': {}",
                        error.path().display(),
                        error
                    ));
                    continue;
                }
            };
            if path.is_dir() {
                continue;
            }
            matched += 1;

            match self.parse_file(&path, &parsers, resolver) {
                Ok(annotations) => {
                    debug!(
                        "Found {} warning(s) in {}",
                        annotations.len(),
                        path.display()
                    );
                    project.log(format!(
                        "Found {} warning(s) in '{}'.",
                        annotations.len(),
                        path.display()
                    ));
                    project.add_annotations(annotations);
                }
                Err(error) => {
                    warn!("Skipping {}: {}", path.display(), error);
                    project.log(format!("Skipping file '{}': {}", path.display(), error));
                }
            }
        }

        if matched == 0 {
            project.log(format!(
                "No files found for pattern '{}'. Configuration error?",
                config.pattern
            ));
        }

        Ok(project)
    }

    /// Reads and decodes one file, then applies every resolved parser and
    /// unions their annotations.
    fn parse_file(
        &self,
        path: &Path,
        parsers: &[ParserBox],
        resolver: &dyn ModuleResolver,
    ) -> std::io::Result<HashSet<Annotation>> {
        let bytes = std::fs::read(path)?;
        let content = self.decode(&bytes);
        let module_name = resolver.guess(&path.to_string_lossy());

        let mut annotations = HashSet::new();
        for parser in parsers {
            debug!("Applying parser '{}' to {}", parser.id(), path.display());
            let mut cursor = Cursor::new(content.as_bytes());
            annotations.extend(parser.parse(&mut cursor, &module_name)?);
        }
        Ok(annotations)
    }

    /// Runs one parser group over the console log stream.
    fn parse_console(
        &self,
        log_path: &Path,
        group: &str,
        registry: &ParserRegistry,
        resolver: &dyn ModuleResolver,
    ) -> Result<ParserResult, ScanError> {
        let mut project = ParserResult::new();
        project.log(format!(
            "Parsing warnings in console log with parser group '{group}'."
        ));

        let parsers = registry.resolve(group);
        if parsers.is_empty() {
            warn!("No parsers registered for group '{group}'");
            project.log(format!("No parsers registered for group '{group}'."));
            return Ok(project);
        }

        let bytes = std::fs::read(log_path).map_err(|source| ScanError::ConsoleLog {
            path: log_path.to_path_buf(),
            source,
        })?;
        let content = self.decode(&bytes);

        let mut annotations = HashSet::new();
        for parser in parsers {
            let mut cursor = Cursor::new(content.as_bytes());
            match parser.parse(&mut cursor, "") {
                Ok(found) => annotations.extend(found),
                Err(error) => {
                    project.log(format!("Parser '{}' failed on console log: {error}", parser.id()));
                }
            }
        }

        // Console-derived annotations carry their own file names, so modules
        // are resolved per annotation rather than from the input path.
        project.add_annotations(annotations.into_iter().map(|mut annotation| {
            let module_name = resolver.guess(annotation.file_name());
            annotation.set_module_name(module_name);
            annotation
        }));

        Ok(project)
    }

    fn create_resolver(&self) -> Box<dyn ModuleResolver> {
        if self.detect_modules {
            let modules = WorkspaceModules::scan(&self.workspace);
            info!(
                "Detected {} module(s) in {}",
                modules.len(),
                self.workspace.display()
            );
            Box::new(modules)
        } else {
            Box::new(NullResolver)
        }
    }

    fn decode(&self, bytes: &[u8]) -> String {
        match self.encoding {
            Some(encoding) => encoding.decode(bytes).0.into_owned(),
            None => String::from_utf8_lossy(bytes).into_owned(),
        }
    }

    fn ensure_not_canceled(&self) -> Result<(), ScanError> {
        if self.cancel.is_canceled() {
            Err(ScanError::Canceled)
        } else {
            Ok(())
        }
    }
}
