use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, ensure, Context, Result};
use tracing::{debug, error, info, trace, warn};

use crate::ledger::{AnnotationRecord, SessionLedger};

/// One input from the display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Point(u32, u32),
    Reset,
    Next,
    Quit,
}

/// What a dispatched event did to the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Committed,
    Finished,
    Aborted,
}

/// Points captured so far for the image currently on screen.
#[derive(Debug, Clone)]
pub struct CaptureState {
    path: PathBuf,
    file_id: String,
    points: Vec<(u32, u32)>,
}

impl CaptureState {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_id(&self) -> &str {
        &self.file_id
    }

    pub fn points(&self) -> &[(u32, u32)] {
        &self.points
    }
}

/// The per-run state machine: work queue, current capture, ledger.
///
/// Every committed image is written through to disk before the next one is
/// shown, so an abort or crash loses at most the capture in progress.
pub struct Session {
    ledger: SessionLedger,
    queue: VecDeque<(String, PathBuf)>,
    current: Option<CaptureState>,
    aborted: bool,
}

impl Session {
    /// Builds the work queue: discovered images minus ledger keys, in
    /// discovery order. Paths without a usable file name are dropped.
    pub fn new(ledger: SessionLedger, images: Vec<PathBuf>) -> Self {
        let total = images.len();
        let queue: VecDeque<(String, PathBuf)> = images
            .into_iter()
            .filter_map(|path| {
                let file_id = path.file_name().and_then(|n| n.to_str())?.to_string();
                Some((file_id, path))
            })
            .filter(|(file_id, _)| !ledger.contains(file_id))
            .collect();

        debug!("{} of {} images still unlabeled", queue.len(), total);

        Session {
            ledger,
            queue,
            current: None,
            aborted: false,
        }
    }

    /// Pops the next queued image into a fresh capture if none is active.
    pub fn begin_next(&mut self) -> Option<&CaptureState> {
        if self.current.is_none() {
            if let Some((file_id, path)) = self.queue.pop_front() {
                trace!("capturing {}", file_id);
                self.current = Some(CaptureState {
                    path,
                    file_id,
                    points: Vec::new(),
                });
            }
        }
        self.current.as_ref()
    }

    pub fn current(&self) -> Option<&CaptureState> {
        self.current.as_ref()
    }

    pub fn apply(&mut self, event: InputEvent) -> Result<Step> {
        match event {
            InputEvent::Point(x, y) => {
                if let Some(capture) = self.current.as_mut() {
                    capture.points.push((x, y));
                }
                Ok(Step::Continue)
            }
            InputEvent::Reset => {
                if let Some(capture) = self.current.as_mut() {
                    capture.points.clear();
                }
                Ok(Step::Continue)
            }
            InputEvent::Next => {
                let Some(capture) = self.current.take() else {
                    return Ok(Step::Continue);
                };
                let file_id = capture.file_id.clone();
                let record = AnnotationRecord::new(capture.file_id, capture.points);
                let num = record.num;
                self.ledger.append_and_save(record)?;

                info!(
                    "committed {} ({} points), {} remaining",
                    file_id,
                    num,
                    self.queue.len()
                );

                if self.queue.is_empty() {
                    Ok(Step::Finished)
                } else {
                    Ok(Step::Committed)
                }
            }
            InputEvent::Quit => {
                if let Some(capture) = self.current.take() {
                    debug!(
                        "discarding {} uncommitted points for {}",
                        capture.points.len(),
                        capture.file_id
                    );
                }
                self.aborted = true;
                Ok(Step::Aborted)
            }
        }
    }

    /// Drops the current capture without committing, so the image is
    /// re-presented on a later run. Used when the surface cannot decode it.
    pub fn skip_current(&mut self) {
        if let Some(capture) = self.current.take() {
            warn!("skipping {}; it stays unlabeled", capture.file_id);
        }
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    pub fn is_finished(&self) -> bool {
        !self.aborted && self.current.is_none() && self.queue.is_empty()
    }

    /// Images not yet committed, counting the one on screen.
    pub fn remaining(&self) -> usize {
        self.queue.len() + usize::from(self.current.is_some())
    }

    pub fn ledger(&self) -> &SessionLedger {
        &self.ledger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names
            .iter()
            .map(|n| PathBuf::from(format!("imgs/{}", n)))
            .collect()
    }

    fn fresh_ledger(dir: &Path) -> SessionLedger {
        SessionLedger::load(SessionLedger::path_for(dir)).unwrap()
    }

    #[test]
    fn two_images_one_committed_empty() {
        let dir = tempdir().unwrap();
        let mut session = Session::new(fresh_ledger(dir.path()), paths(&["a.jpg", "b.png"]));

        session.begin_next();
        assert_eq!(session.current().unwrap().file_id(), "a.jpg");
        session.apply(InputEvent::Point(10, 20)).unwrap();
        session.apply(InputEvent::Point(30, 40)).unwrap();
        assert_eq!(session.apply(InputEvent::Next).unwrap(), Step::Committed);

        session.begin_next();
        assert_eq!(session.current().unwrap().file_id(), "b.png");
        assert_eq!(session.apply(InputEvent::Next).unwrap(), Step::Finished);
        assert!(session.is_finished());

        let reloaded = fresh_ledger(dir.path());
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.records()[0].file_id, "a.jpg");
        assert_eq!(reloaded.records()[0].num, 2);
        assert_eq!(reloaded.records()[0].coords, vec![(10, 20), (30, 40)]);
        assert_eq!(reloaded.records()[1].file_id, "b.png");
        assert_eq!(reloaded.records()[1].num, 0);
    }

    #[test]
    fn work_queue_excludes_labeled_files() {
        let dir = tempdir().unwrap();

        let mut session = Session::new(fresh_ledger(dir.path()), paths(&["a.jpg"]));
        session.begin_next();
        session.apply(InputEvent::Point(1, 2)).unwrap();
        session.apply(InputEvent::Next).unwrap();

        // a second run over the same directory never re-presents a.jpg
        let mut resumed = Session::new(
            fresh_ledger(dir.path()),
            paths(&["a.jpg", "b.png", "c.jpg"]),
        );
        assert_eq!(resumed.remaining(), 2);
        assert_eq!(resumed.begin_next().unwrap().file_id(), "b.png");
    }

    #[test]
    fn reset_clears_only_current_points() {
        let dir = tempdir().unwrap();
        let mut session = Session::new(fresh_ledger(dir.path()), paths(&["a.jpg", "b.png"]));

        session.begin_next();
        session.apply(InputEvent::Point(5, 5)).unwrap();
        session.apply(InputEvent::Next).unwrap();

        session.begin_next();
        session.apply(InputEvent::Point(7, 7)).unwrap();
        session.apply(InputEvent::Reset).unwrap();
        assert!(session.current().unwrap().points().is_empty());

        // the committed record for a.jpg is untouched
        assert_eq!(session.ledger().records()[0].coords, vec![(5, 5)]);
    }

    #[test]
    fn abort_keeps_prior_commits_and_discards_current() {
        let dir = tempdir().unwrap();
        let mut session = Session::new(
            fresh_ledger(dir.path()),
            paths(&["a.jpg", "b.png", "c.jpg"]),
        );

        session.begin_next();
        session.apply(InputEvent::Next).unwrap();
        session.begin_next();
        session.apply(InputEvent::Next).unwrap();

        session.begin_next();
        assert_eq!(session.current().unwrap().file_id(), "c.jpg");
        session.apply(InputEvent::Point(9, 9)).unwrap();
        assert_eq!(session.apply(InputEvent::Quit).unwrap(), Step::Aborted);
        assert!(session.is_aborted());
        assert!(!session.is_finished());

        let reloaded = fresh_ledger(dir.path());
        let ids: Vec<_> = reloaded.records().iter().map(|r| r.file_id.as_str()).collect();
        assert_eq!(ids, vec!["a.jpg", "b.png"]);

        // the next run picks up exactly where the abort left off
        let mut resumed = Session::new(reloaded, paths(&["a.jpg", "b.png", "c.jpg"]));
        assert_eq!(resumed.remaining(), 1);
        assert_eq!(resumed.begin_next().unwrap().file_id(), "c.jpg");
    }

    #[test]
    fn skip_current_commits_nothing() {
        let dir = tempdir().unwrap();
        let mut session = Session::new(fresh_ledger(dir.path()), paths(&["a.jpg", "b.png"]));

        session.begin_next();
        session.apply(InputEvent::Point(3, 3)).unwrap();
        session.skip_current();

        assert!(session.current().is_none());
        assert!(session.ledger().is_empty());
        assert_eq!(session.begin_next().unwrap().file_id(), "b.png");
    }

    #[test]
    fn events_without_a_capture_are_ignored() {
        let dir = tempdir().unwrap();
        let mut session = Session::new(fresh_ledger(dir.path()), paths(&["a.jpg"]));

        assert_eq!(session.apply(InputEvent::Point(1, 1)).unwrap(), Step::Continue);
        assert_eq!(session.apply(InputEvent::Reset).unwrap(), Step::Continue);
        assert_eq!(session.apply(InputEvent::Next).unwrap(), Step::Continue);
        assert!(session.ledger().is_empty());
    }
}
