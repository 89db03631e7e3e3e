//! Chart generation engine
//!
//! [`generate_chart`] runs five phases in order and stops at the first error:
//!
//! 1. Structure: the `templates` directory, plus `templates/tests` and the
//!    connection test when a Service is requested
//! 2. Mandatory files: helpers and `.helmignore` copied verbatim, `Chart.yaml`
//!    and `values.yaml` rendered
//! 3. Conditional resources, in [`RESOURCES`] order
//! 4. `NOTES.txt`: objects-created render, then the default, ingress and
//!    service fragments appended in that fixed order
//! 5. Placeholder rewrite: every file under the root gets [`PLACEHOLDER_TOKEN`]
//!    replaced by the chart name
//!
//! Nothing is rolled back on failure; the output root is left as it was when
//! the failing operation ran.

use crate::error::{GenerationError, Result, TemplateError};
use crate::params::{ParameterSet, ResourceKind};
use crate::store::OutputStore;
use crate::templates::descriptor::{
    CONNECTION_TEST, MANDATORY, NOTES_DEFAULT, NOTES_INGRESS, NOTES_OBJECTS, NOTES_SERVICE,
    RESOURCES, TEMPLATES_DIR, TESTS_DIR,
};
use crate::templates::{Mode, TemplateDescriptor, TemplateSource};
use log::{debug, info, warn};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

/// Identifier baked into the catalog and replaced by the chart name
pub const PLACEHOLDER_TOKEN: &str = "example";

/// What a successful run produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Directories created, relative to the root
    pub directories: Vec<PathBuf>,
    /// Files created, relative to the root, in creation order (no duplicates)
    pub files: Vec<PathBuf>,
    /// Files visited by the placeholder rewrite
    pub rewritten: usize,
}

impl GenerationReport {
    fn record_file(&mut self, relative: &str) {
        let path = PathBuf::from(relative);
        if !self.files.contains(&path) {
            self.files.push(path);
        }
    }
}

/// Join a relative output path onto the root, refusing anything that could escape it
pub fn safe_join(root: &Path, relative: &str) -> io::Result<PathBuf> {
    let rel = Path::new(relative);
    let escapes = rel.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if relative.is_empty() || escapes {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("output path '{}' escapes the chart root", relative),
        ));
    }
    Ok(root.join(rel))
}

/// Generate a complete chart under `root`
pub fn generate_chart<S, O>(
    source: &S,
    store: &mut O,
    params: &ParameterSet,
    root: &Path,
) -> Result<GenerationReport>
where
    S: TemplateSource + ?Sized,
    O: OutputStore + ?Sized,
{
    let mut run = Run {
        source,
        store,
        params,
        root,
        report: GenerationReport::default(),
    };

    info!("Generating chart '{}' in {}", params.name(), root.display());
    run.create_structure()?;
    run.generate_mandatory_files()?;
    run.generate_resources()?;
    run.generate_notes()?;
    run.report.rewritten =
        rewrite_placeholders(&mut *run.store, root, PLACEHOLDER_TOKEN, params.name())?;

    Ok(run.report)
}

struct Run<'a, S: ?Sized, O: ?Sized> {
    source: &'a S,
    store: &'a mut O,
    params: &'a ParameterSet,
    root: &'a Path,
    report: GenerationReport,
}

impl<S, O> Run<'_, S, O>
where
    S: TemplateSource + ?Sized,
    O: OutputStore + ?Sized,
{
    fn create_structure(&mut self) -> Result<()> {
        info!("Creating chart structure");
        self.create_dir(TEMPLATES_DIR)?;

        if self.params.is_enabled(ResourceKind::Service) {
            self.create_dir(TESTS_DIR)?;
            self.apply(&CONNECTION_TEST)?;
        }
        Ok(())
    }

    fn generate_mandatory_files(&mut self) -> Result<()> {
        info!("Writing mandatory chart files");
        for descriptor in &MANDATORY {
            self.apply(descriptor)?;
        }
        Ok(())
    }

    fn generate_resources(&mut self) -> Result<()> {
        info!("Rendering resource templates");
        for (kind, descriptor) in &RESOURCES {
            if self.params.is_enabled(*kind) {
                debug!("{} enabled", kind);
                self.apply(descriptor)?;
            }
        }
        Ok(())
    }

    fn generate_notes(&mut self) -> Result<()> {
        info!("Assembling NOTES.txt");
        self.apply(&NOTES_OBJECTS)?;
        self.apply(&NOTES_DEFAULT)?;
        if self.params.is_enabled(ResourceKind::Ingress) {
            self.apply(&NOTES_INGRESS)?;
        }
        if self.params.is_enabled(ResourceKind::Service) {
            self.apply(&NOTES_SERVICE)?;
        }
        Ok(())
    }

    fn create_dir(&mut self, relative: &str) -> Result<()> {
        let path = self.output_path(relative)?;
        self.store
            .create_dir_all(&path)
            .map_err(|e| self.fs_error("create-directory", &path, e))?;
        debug!("Created directory {}", path.display());
        self.report.directories.push(PathBuf::from(relative));
        Ok(())
    }

    /// Produce one descriptor's output file
    fn apply(&mut self, descriptor: &TemplateDescriptor) -> Result<()> {
        let path = self.output_path(descriptor.output)?;
        match descriptor.mode {
            Mode::Render => {
                let content = self
                    .source
                    .render(descriptor.source, self.params)
                    .map_err(|e| self.template_error("render-template", &path, e))?;
                let mut out = self
                    .store
                    .create(&path)
                    .map_err(|e| fs_error(self.params, "create-file", &path, e))?;
                out.write_all(&content)
                    .and_then(|_| out.flush())
                    .map_err(|e| fs_error(self.params, "write-file", &path, e))?;
                debug!("Rendered {} -> {}", descriptor.source, path.display());
            }
            Mode::Copy => {
                let content = self
                    .source
                    .fetch_raw(descriptor.source)
                    .map_err(|e| self.template_error("read-template", &path, e))?;
                self.store
                    .write_all(&path, &content)
                    .map_err(|e| fs_error(self.params, "copy-file", &path, e))?;
                debug!("Copied {} -> {}", descriptor.source, path.display());
            }
            Mode::Append => {
                let content = self
                    .source
                    .fetch_raw(descriptor.source)
                    .map_err(|e| self.template_error("read-template", &path, e))?;
                let mut out = self
                    .store
                    .append(&path)
                    .map_err(|e| fs_error(self.params, "open-append", &path, e))?;
                out.write_all(&content)
                    .and_then(|_| out.flush())
                    .map_err(|e| fs_error(self.params, "append-file", &path, e))?;
                debug!("Appended {} -> {}", descriptor.source, path.display());
            }
        }
        self.report.record_file(descriptor.output);
        Ok(())
    }

    fn output_path(&self, relative: &str) -> Result<PathBuf> {
        safe_join(self.root, relative)
            .map_err(|e| self.fs_error("resolve-path", &self.root.join(relative), e))
    }

    fn fs_error(&self, operation: &'static str, path: &Path, source: io::Error) -> GenerationError {
        fs_error(self.params, operation, path, source)
    }

    fn template_error(
        &self,
        operation: &'static str,
        output: &Path,
        source: TemplateError,
    ) -> GenerationError {
        GenerationError::Template {
            operation,
            chart: self.params.name().to_string(),
            output: output.to_path_buf(),
            source,
        }
    }
}

fn fs_error(
    params: &ParameterSet,
    operation: &'static str,
    path: &Path,
    source: io::Error,
) -> GenerationError {
    GenerationError::FileSystem {
        operation,
        chart: params.name().to_string(),
        path: path.to_path_buf(),
        source,
    }
}

/// Replace every occurrence of `token` with `name` in every file under `root`
///
/// Directories and symlinks are skipped, so nothing outside `root` is ever
/// written. Files are read and written back whole; existing files keep their
/// permissions. Returns the number of files visited. Running it again on an
/// already rewritten tree changes nothing, unless `name` contains `token`.
pub fn rewrite_placeholders<O>(store: &mut O, root: &Path, token: &str, name: &str) -> Result<usize>
where
    O: OutputStore + ?Sized,
{
    info!("Replacing '{}' with '{}' under {}", token, name, root.display());
    let walk_error = |path: &Path, e: io::Error| GenerationError::FileSystem {
        operation: "walk-directory",
        chart: name.to_string(),
        path: path.to_path_buf(),
        source: e,
    };

    let entries = store.walk_files(root).map_err(|e| walk_error(root, e))?;
    let mut visited = 0;
    for entry in entries {
        let entry = entry.map_err(|e| walk_error(root, e))?;
        if entry.is_dir {
            continue;
        }
        if entry.is_symlink {
            debug!("Skipping symlink {}", entry.path.display());
            continue;
        }
        let path = entry.path;
        let file_error = |operation: &'static str, e: io::Error| GenerationError::FileSystem {
            operation,
            chart: name.to_string(),
            path: path.clone(),
            source: e,
        };

        let raw = store
            .read_all(&path)
            .map_err(|e| file_error("read-file", e))?;
        let text = String::from_utf8(raw).map_err(|e| {
            file_error(
                "read-file",
                io::Error::new(io::ErrorKind::InvalidData, e.utf8_error()),
            )
        })?;
        let replaced = text.replace(token, name);
        store
            .write_all(&path, replaced.as_bytes())
            .map_err(|e| file_error("write-file", e))?;
        debug!("Rewrote {}", path.display());
        visited += 1;
    }

    if visited == 0 {
        warn!("No files found under {}", root.display());
    }
    Ok(visited)
}
