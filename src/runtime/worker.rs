//! Outline build worker
//!
//! One dedicated thread owns the tree-sitter parsers. Jobs arrive over an
//! mpsc channel; each finished build goes back as
//! `Msg::Outline(OutlineMsg::BuildCompleted)`.

use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::commands::Cmd;
use crate::messages::{BuildOutcome, Msg, OutlineMsg};
use crate::outline::{build_outline, BuildOptions, CancelToken, Cancelled};
use crate::syntax::{ElementIndex, FileSemantics, LanguageId, ParserState, SourceFile};

/// Snapshot of everything one build needs
#[derive(Debug, Clone)]
pub struct BuildJob {
    pub generation: u64,
    pub path: PathBuf,
    pub language: LanguageId,
    pub source: String,
    pub options: BuildOptions,
    pub cancel: CancelToken,
}

impl BuildJob {
    /// Extract the job from a `Cmd::RunOutlineBuild`
    pub fn from_cmd(cmd: Cmd) -> Option<Self> {
        match cmd {
            Cmd::RunOutlineBuild {
                generation,
                path,
                language,
                source,
                options,
                cancel,
            } => Some(Self {
                generation,
                path,
                language,
                source,
                options,
                cancel,
            }),
            _ => None,
        }
    }
}

/// Parse, analyze and build one outline.
///
/// A file that cannot be parsed yields an empty outline.
pub fn run_build(parser: &mut ParserState, job: &BuildJob) -> BuildOutcome {
    if job.cancel.is_cancelled() {
        return BuildOutcome::Cancelled;
    }

    let file = match parser.parse(&job.path, &job.source, job.language) {
        Ok(file) => file,
        Err(e) => {
            tracing::debug!("No outline for {}: {}", job.path.display(), e);
            SourceFile {
                path: job.path.clone(),
                language: job.language,
                len: job.source.len(),
                ..Default::default()
            }
        }
    };

    let semantics = FileSemantics::new(&file);
    match build_outline(&file, &semantics, &job.options, &job.cancel) {
        Ok(document) => BuildOutcome::Built {
            document,
            elements: Arc::new(ElementIndex::new(&file)),
        },
        Err(Cancelled) => BuildOutcome::Cancelled,
    }
}

pub struct OutlineWorker {
    job_tx: Option<Sender<BuildJob>>,
    handle: Option<JoinHandle<()>>,
}

impl OutlineWorker {
    /// Start the worker thread; results are sent to `msg_tx`
    pub fn spawn(msg_tx: Sender<Msg>) -> std::io::Result<Self> {
        let (job_tx, job_rx) = mpsc::channel::<BuildJob>();
        let handle = std::thread::Builder::new()
            .name("outline-worker".to_string())
            .spawn(move || {
                let mut parser = ParserState::new();
                while let Ok(job) = job_rx.recv() {
                    let outcome = run_build(&mut parser, &job);
                    let msg = Msg::Outline(OutlineMsg::BuildCompleted {
                        generation: job.generation,
                        path: job.path,
                        outcome,
                    });
                    if msg_tx.send(msg).is_err() {
                        break;
                    }
                }
                tracing::debug!("Outline worker stopped");
            })?;

        Ok(Self {
            job_tx: Some(job_tx),
            handle: Some(handle),
        })
    }

    /// Queue a job; false once the worker is gone
    pub fn submit(&self, job: BuildJob) -> bool {
        match &self.job_tx {
            Some(tx) => tx.send(job).is_ok(),
            None => false,
        }
    }

    /// Close the job channel and wait for the thread to finish
    pub fn shutdown(&mut self) {
        self.job_tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("Outline worker panicked");
            }
        }
    }
}

impl Drop for OutlineWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
