use std::{
    fs, io,
    path::{Path, PathBuf},
};

use shared::{appearance::HtmlAppearance, domain::StatusTriple};
use thiserror::Error;
use tracing::debug;

use crate::render::{render_countdown, render_gonogo, render_gonogo_fallback};

pub const COUNTDOWN_FILE_NAME: &str = "countdown.html";
pub const GONOGO_FILE_NAME: &str = "gonogo.html";

#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("failed to prepare overlay directory '{path}': {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("failed to write overlay '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Owns the two overlay files inside the app directory.
#[derive(Debug, Clone)]
pub struct OverlayWriter {
    dir: PathBuf,
    countdown_path: PathBuf,
    gonogo_path: PathBuf,
}

impl OverlayWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            countdown_path: dir.join(COUNTDOWN_FILE_NAME),
            gonogo_path: dir.join(GONOGO_FILE_NAME),
            dir,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn countdown_path(&self) -> &Path {
        &self.countdown_path
    }

    pub fn gonogo_path(&self) -> &Path {
        &self.gonogo_path
    }

    pub fn write_countdown(
        &self,
        mission: &str,
        timer_text: &str,
        appearance: &HtmlAppearance,
        hide_mission: bool,
    ) -> Result<(), OverlayError> {
        let html = render_countdown(mission, timer_text, appearance, hide_mission);
        self.replace(&self.countdown_path, &html)
    }

    pub fn write_gonogo(
        &self,
        statuses: &StatusTriple,
        appearance: &HtmlAppearance,
    ) -> Result<(), OverlayError> {
        let html = render_gonogo(statuses, appearance);
        self.replace(&self.gonogo_path, &html)
    }

    pub fn write_gonogo_fallback(
        &self,
        embed_url: &str,
        appearance: &HtmlAppearance,
    ) -> Result<(), OverlayError> {
        let html = render_gonogo_fallback(embed_url, appearance);
        self.replace(&self.gonogo_path, &html)
    }

    /// Writes next to the target and renames over it so a browser reload
    /// never observes a half-written page.
    fn replace(&self, path: &Path, html: &str) -> Result<(), OverlayError> {
        fs::create_dir_all(&self.dir).map_err(|source| OverlayError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;

        let staging = path.with_extension("html.tmp");
        fs::write(&staging, html)
            .and_then(|()| fs::rename(&staging, path))
            .map_err(|source| OverlayError::Write {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(path = %path.display(), bytes = html.len(), "overlay written");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/writer_tests.rs"]
mod tests;
