//! File and directory runs.
//!
//! A directory run maps every input file to `output/<relative path>.<format>`
//! and processes the files on a dedicated rayon pool. Each file yields its own
//! [`FileOutcome`]; one failing file never stops the others.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::config::options::ResolvedJob;
use crate::fit::FitOptions;
use crate::foundation::error::{AspectFitError, AspectFitResult};
use crate::io::decode::load_image;
use crate::io::encode::{SaveOptions, save_image};

/// Decode, fit and encode one file.
#[tracing::instrument(skip_all, fields(input = %input.as_ref().display()))]
pub fn process_one(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    fit: &FitOptions,
    save: &SaveOptions,
) -> AspectFitResult<()> {
    let img = load_image(input.as_ref())?;
    let out = fit.apply(&img)?;
    save_image(&out, output, save)
}

#[derive(Clone, Debug)]
pub struct BatchJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub fit: FitOptions,
    pub save: SaveOptions,
    /// Descend into sub-directories of a directory input.
    pub recursive: bool,
    /// Worker threads; `None` uses the rayon default.
    pub threads: Option<usize>,
}

impl BatchJob {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>, job: ResolvedJob) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            fit: job.fit,
            save: job.save,
            recursive: job.recursive,
            threads: job.threads,
        }
    }
}

/// Result for a single input file.
#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub result: AspectFitResult<()>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }
}

/// Run `job` as a single-file or directory run, depending on the input.
///
/// Argument errors (wrong file/directory pairing, bad thread count) fail the
/// whole call; per-file errors are only recorded in the report.
pub fn run(job: &BatchJob) -> AspectFitResult<BatchReport> {
    let input_is_file = job.input.is_file();
    if !input_is_file && !job.input.is_dir() {
        return Err(AspectFitError::invalid_argument(format!(
            "input '{}' does not exist",
            job.input.display()
        )));
    }
    // A missing output counts as a directory unless it has an extension.
    let output_is_file = if job.output.exists() {
        !job.output.is_dir()
    } else {
        job.output.extension().is_some()
    };

    match (input_is_file, output_is_file) {
        (true, false) => Err(AspectFitError::invalid_argument(
            "when the input is a file, the output must be a file too",
        )),
        (false, true) => Err(AspectFitError::invalid_argument(
            "when the input is a directory, the output must be a directory too",
        )),
        (true, true) => {
            let result = process_one(&job.input, &job.output, &job.fit, &job.save);
            let outcome = FileOutcome {
                input: job.input.clone(),
                output: job.output.clone(),
                result,
            };
            log_outcome(&outcome);
            Ok(BatchReport {
                outcomes: vec![outcome],
            })
        }
        (false, false) => run_dir(job),
    }
}

fn run_dir(job: &BatchJob) -> AspectFitResult<BatchReport> {
    std::fs::create_dir_all(&job.output)?;
    let pool = build_thread_pool(job.threads)?;

    let mut inputs = Vec::new();
    let skip = job.output.canonicalize().ok();
    collect_files(&job.input, job.recursive, skip.as_deref(), &mut inputs)?;
    inputs.sort();
    tracing::info!(
        files = inputs.len(),
        input = %job.input.display(),
        output = %job.output.display(),
        "starting directory run"
    );

    let tasks = assign_outputs(job, inputs);
    let outcomes = pool.install(|| {
        tasks
            .into_par_iter()
            .map(|task| {
                let result = match task.taken_by {
                    Some(first) => Err(AspectFitError::invalid_argument(format!(
                        "output '{}' is already written for '{}'",
                        task.output.display(),
                        first.display()
                    ))),
                    None => process_one(&task.input, &task.output, &job.fit, &job.save),
                };
                let outcome = FileOutcome {
                    input: task.input,
                    output: task.output,
                    result,
                };
                log_outcome(&outcome);
                outcome
            })
            .collect::<Vec<_>>()
    });

    let report = BatchReport { outcomes };
    tracing::info!(
        ok = report.succeeded(),
        failed = report.failed(),
        "directory run finished"
    );
    Ok(report)
}

struct Task {
    input: PathBuf,
    output: PathBuf,
    /// Earlier input that maps to the same output.
    taken_by: Option<PathBuf>,
}

/// Map sorted inputs to outputs. When several inputs share an output (they
/// differ only by extension), the first one owns it and the rest fail.
fn assign_outputs(job: &BatchJob, inputs: Vec<PathBuf>) -> Vec<Task> {
    let mut owners: HashMap<PathBuf, PathBuf> = HashMap::with_capacity(inputs.len());
    inputs
        .into_iter()
        .map(|input| {
            let output = output_path(&job.input, &input, &job.output, &job.save.format);
            let taken_by = match owners.entry(output.clone()) {
                Entry::Occupied(e) => Some(e.get().clone()),
                Entry::Vacant(e) => {
                    e.insert(input.clone());
                    None
                }
            };
            Task {
                input,
                output,
                taken_by,
            }
        })
        .collect()
}

/// `output/<input relative to root, extension replaced by format>`.
pub fn output_path(root: &Path, input: &Path, output_dir: &Path, format: &str) -> PathBuf {
    let rel = input
        .strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| input.file_name().map(PathBuf::from).unwrap_or_default());
    output_dir.join(rel).with_extension(format)
}

/// Symlinked directories are never entered; symlinked files are kept.
/// `skip` (the canonical output directory) is left out of the walk.
fn collect_files(
    dir: &Path,
    recursive: bool,
    skip: Option<&Path>,
    out: &mut Vec<PathBuf>,
) -> AspectFitResult<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let path = entry.path();
        if file_type.is_dir() {
            let is_output = skip.is_some() && path.canonicalize().ok().as_deref() == skip;
            if recursive && !is_output {
                collect_files(&path, recursive, skip, out)?;
            }
        } else if file_type.is_file() || (file_type.is_symlink() && path.is_file()) {
            out.push(path);
        }
    }
    Ok(())
}

fn log_outcome(outcome: &FileOutcome) {
    match &outcome.result {
        Ok(()) => tracing::info!(
            "OK: {} -> {}",
            outcome.input.display(),
            outcome.output.display()
        ),
        Err(e) => tracing::warn!("FAIL: {} ({e})", outcome.input.display()),
    }
}

/// Pool for one directory run. Workers are named `aspectfit-<n>` so per-file
/// log lines can be told apart.
fn build_thread_pool(threads: Option<usize>) -> AspectFitResult<rayon::ThreadPool> {
    let builder = match threads {
        Some(0) => {
            return Err(AspectFitError::invalid_argument(
                "batch 'threads' must be >= 1 when set",
            ));
        }
        Some(n) => rayon::ThreadPoolBuilder::new().num_threads(n),
        None => rayon::ThreadPoolBuilder::new(),
    };
    builder
        .thread_name(|i| format!("aspectfit-{i}"))
        .build()
        .map_err(|e| AspectFitError::Other(anyhow::anyhow!("worker pool for batch run: {e}")))
}
