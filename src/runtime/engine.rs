//! Outline engine facade
//!
//! Owns the model, the worker thread and the message channel. Hosts feed
//! editor events in and read the published document back out; everything
//! in between goes through `update`.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};

use super::worker::{BuildJob, OutlineWorker};
use crate::commands::Cmd;
use crate::config::OutlineConfig;
use crate::messages::{Msg, OutlineMsg};
use crate::model::{OutlineModel, Position, RefreshState};
use crate::outline::CodeDocument;
use crate::syntax::LanguageId;
use crate::update::update;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("outline engine has been disposed")]
    Disposed,
    #[error("failed to start outline worker: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("outline worker stopped unexpectedly")]
    WorkerGone,
}

/// What a refresh request did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildTicket {
    /// A build with this generation is now running
    Started(u64),
    /// The running build was cancelled; a new one starts when it reports back
    Owed { cancelling: u64 },
    /// No active document
    Skipped,
}

pub struct OutlineEngine {
    model: OutlineModel,
    worker: Option<OutlineWorker>,
    msg_rx: Receiver<Msg>,
    redraw_requested: bool,
}

impl OutlineEngine {
    pub fn new(config: OutlineConfig) -> Result<Self, EngineError> {
        let (msg_tx, msg_rx) = mpsc::channel();
        let worker = OutlineWorker::spawn(msg_tx)?;
        Ok(Self {
            model: OutlineModel::new(config),
            worker: Some(worker),
            msg_rx,
            redraw_requested: false,
        })
    }

    fn ensure_live(&self) -> Result<(), EngineError> {
        if self.worker.is_none() {
            return Err(EngineError::Disposed);
        }
        Ok(())
    }

    /// Run one message through `update` and perform the resulting commands
    pub fn dispatch(&mut self, msg: Msg) -> Result<(), EngineError> {
        self.ensure_live()?;
        let cmd = update(&mut self.model, msg);
        self.process_cmd(cmd)
    }

    fn process_cmd(&mut self, cmd: Cmd) -> Result<(), EngineError> {
        match cmd {
            Cmd::None => {}
            Cmd::Redraw => self.redraw_requested = true,
            Cmd::ResizePanel { width } => {
                tracing::debug!("Outline panel width -> {}", width);
                self.redraw_requested = true;
            }
            cmd @ Cmd::RunOutlineBuild { .. } => {
                let worker = self.worker.as_ref().ok_or(EngineError::Disposed)?;
                if let Some(job) = BuildJob::from_cmd(cmd) {
                    if !worker.submit(job) {
                        return Err(EngineError::WorkerGone);
                    }
                }
            }
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.process_cmd(cmd)?;
                }
            }
        }
        Ok(())
    }

    fn ticket(&self) -> BuildTicket {
        match &self.model.scheduler.state {
            RefreshState::Idle => BuildTicket::Skipped,
            RefreshState::Running { generation, .. } => BuildTicket::Started(*generation),
            RefreshState::CancelPending { generation, .. } => BuildTicket::Owed {
                cancelling: *generation,
            },
        }
    }

    /// Make `path` the active document
    pub fn activate(
        &mut self,
        path: impl Into<PathBuf>,
        text: impl Into<String>,
    ) -> Result<BuildTicket, EngineError> {
        let path = path.into();
        let language = LanguageId::from_path(&path);
        self.activate_as(path, language, text)
    }

    /// Make `path` the active document with an explicit language
    pub fn activate_as(
        &mut self,
        path: impl Into<PathBuf>,
        language: LanguageId,
        text: impl Into<String>,
    ) -> Result<BuildTicket, EngineError> {
        self.dispatch(Msg::Outline(OutlineMsg::DocumentActivated {
            path: path.into(),
            language,
            text: text.into(),
        }))?;
        Ok(self.ticket())
    }

    /// Replace the active document's text
    pub fn edit(&mut self, text: impl Into<String>) -> Result<BuildTicket, EngineError> {
        self.dispatch(Msg::edit(text))?;
        Ok(self.ticket())
    }

    pub fn save(&mut self) -> Result<BuildTicket, EngineError> {
        self.dispatch(Msg::Outline(OutlineMsg::DocumentSaved))?;
        Ok(self.ticket())
    }

    pub fn request_refresh(&mut self) -> Result<BuildTicket, EngineError> {
        self.dispatch(Msg::Outline(OutlineMsg::Refresh))?;
        Ok(self.ticket())
    }

    pub fn set_use_xml_comments(&mut self, enabled: bool) -> Result<BuildTicket, EngineError> {
        self.dispatch(Msg::Outline(OutlineMsg::SetUseXmlComments(enabled)))?;
        Ok(self.ticket())
    }

    pub fn caret_moved(&mut self, position: Position) -> Result<(), EngineError> {
        self.dispatch(Msg::caret(position.line, position.column))
    }

    /// Apply every worker message that has already arrived
    pub fn pump(&mut self) -> Result<usize, EngineError> {
        self.ensure_live()?;
        let mut count = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.dispatch(msg)?;
            count += 1;
        }
        Ok(count)
    }

    /// Block until no build is in flight
    pub fn settle(&mut self) -> Result<(), EngineError> {
        self.ensure_live()?;
        while self.model.scheduler.in_flight().is_some() {
            let msg = self.msg_rx.recv().map_err(|_| EngineError::WorkerGone)?;
            self.dispatch(msg)?;
        }
        Ok(())
    }

    pub fn document(&self) -> Result<&CodeDocument, EngineError> {
        self.ensure_live()?;
        Ok(&self.model.document)
    }

    /// Full names under the caret, innermost first
    pub fn highlighted(&self) -> Result<&[String], EngineError> {
        self.ensure_live()?;
        Ok(&self.model.highlighted)
    }

    pub fn panel_width(&self) -> Result<u32, EngineError> {
        self.ensure_live()?;
        Ok(self.model.panel_width)
    }

    pub fn model(&self) -> Result<&OutlineModel, EngineError> {
        self.ensure_live()?;
        Ok(&self.model)
    }

    /// Whether anything visible changed since the last call
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    pub fn is_disposed(&self) -> bool {
        self.worker.is_none()
    }

    /// Cancel any in-flight build and stop the worker; later calls fail
    /// with [`EngineError::Disposed`]
    pub fn dispose(&mut self) {
        let Some(mut worker) = self.worker.take() else {
            return;
        };
        if let RefreshState::Running { cancel, .. } | RefreshState::CancelPending { cancel, .. } =
            &self.model.scheduler.state
        {
            cancel.cancel();
        }
        self.model.scheduler.owed = false;
        worker.shutdown();
        tracing::debug!("Outline engine disposed");
    }
}

impl Drop for OutlineEngine {
    fn drop(&mut self) {
        self.dispose();
    }
}
