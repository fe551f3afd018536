//! Run coordinator: validates settings, walks the tree, fans file tasks out to
//! a bounded worker pool and waits for them before taking the snapshot.
//!
//! A run moves through `Idle -> Walking -> Draining -> Done` exactly once;
//! [`RunCoordinator::run`] consumes the coordinator so it cannot be restarted.

use indicatif::ProgressBar;
use regex::Regex;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use super::{Aggregator, Dispatcher, Snapshot};
use crate::config::Config;
use crate::error::{CountError, Result};
use crate::scan::{IgnoreFilter, Walker};
use crate::utils::{BpeTokenizer, ContentClassifier, MimeSniffer, TokenCounter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Walking,
    Draining,
    Done,
}

impl RunState {
    fn can_advance_to(self, next: RunState) -> bool {
        matches!(
            (self, next),
            (RunState::Idle, RunState::Walking)
                | (RunState::Walking, RunState::Draining)
                | (RunState::Draining, RunState::Done)
        )
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Idle => "idle",
            RunState::Walking => "walking",
            RunState::Draining => "draining",
            RunState::Done => "done",
        };
        f.write_str(name)
    }
}

/// Compile the content-type filter. Matching is unanchored.
pub fn compile_mime_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| CountError::InvalidMimePattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Drives one counting run over a directory tree.
pub struct RunCoordinator {
    root: PathBuf,
    config: Config,
    state: RunState,
    classifier: Arc<dyn ContentClassifier>,
    tokenizer: Option<Arc<dyn TokenCounter>>,
    progress: Option<ProgressBar>,
}

impl RunCoordinator {
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            root: root.into(),
            config,
            state: RunState::Idle,
            classifier: Arc::new(MimeSniffer),
            tokenizer: None,
            progress: None,
        }
    }

    /// Use this tokenizer instead of resolving `config.model`.
    pub fn tokenizer(mut self, tokenizer: Arc<dyn TokenCounter>) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    pub fn classifier(mut self, classifier: Arc<dyn ContentClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Tick `bar` once per finished file task
    pub fn progress(mut self, bar: ProgressBar) -> Self {
        self.progress = Some(bar);
        self
    }

    /// State before the run starts; always [`RunState::Idle`].
    ///
    /// [`run`](Self::run) consumes the coordinator, so the later states are
    /// only visible as `trace`-level log lines.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Execute the run and return the final snapshot.
    ///
    /// Startup problems (bad pattern, unknown model, missing directory) fail
    /// before any file is read. A traversal error stops the walk, lets the
    /// already-spawned tasks finish, and is then returned.
    pub fn run(mut self) -> Result<Snapshot> {
        let mime_filter = compile_mime_pattern(&self.config.match_mime)?;
        let tokenizer: Arc<dyn TokenCounter> = match self.tokenizer.take() {
            Some(tokenizer) => tokenizer,
            None => Arc::new(BpeTokenizer::for_model(&self.config.model)?),
        };
        if !self.root.is_dir() {
            return Err(CountError::NotADirectory { path: self.root.clone() });
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.jobs)
            .thread_name(|i| format!("tokencount-{}", i))
            .build()?;
        let filter = IgnoreFilter::load_or_none(&self.root, &self.config.ignore_file);

        let root = self.root.clone();
        let classifier = Arc::clone(&self.classifier);
        let progress = self.progress.take();
        let aggregator = Aggregator::new();
        let dispatcher = Dispatcher::new(
            &root,
            classifier.as_ref(),
            tokenizer.as_ref(),
            &mime_filter,
            &aggregator,
        )
        .milestone_every(self.config.milestone_every)
        .progress(progress.as_ref());

        self.advance(RunState::Walking);
        tracing::debug!(
            "walking {} with {} workers",
            root.display(),
            pool.current_num_threads()
        );

        // The scope returns only after every spawned task has completed.
        let walked = pool.in_place_scope(|scope| {
            let mut spawned = 0u64;
            let mut result = Ok(());
            for entry in Walker::new(&root, &filter).files() {
                let path = match entry {
                    Ok(path) => path,
                    Err(err) => {
                        result = Err(err);
                        break;
                    }
                };
                let dispatcher = &dispatcher;
                scope.spawn(move |_| {
                    dispatcher.process(&path);
                });
                spawned += 1;
                if let Some(bar) = &progress {
                    bar.set_message(format!("{} files found", spawned));
                }
            }
            self.advance(RunState::Draining);
            tracing::info!("waiting for processing to finish");
            result
        });

        self.advance(RunState::Done);
        if let Some(bar) = &progress {
            bar.finish_and_clear();
        }
        walked?;

        Ok(aggregator.snapshot())
    }

    fn advance(&mut self, next: RunState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "invalid run transition {} -> {}",
            self.state,
            next
        );
        tracing::trace!("run state {} -> {}", self.state, next);
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_transitions() {
        assert!(RunState::Idle.can_advance_to(RunState::Walking));
        assert!(RunState::Walking.can_advance_to(RunState::Draining));
        assert!(RunState::Draining.can_advance_to(RunState::Done));
        assert!(!RunState::Done.can_advance_to(RunState::Walking));
        assert!(!RunState::Idle.can_advance_to(RunState::Draining));
    }

    #[test]
    fn test_invalid_pattern_is_fatal() {
        let err = compile_mime_pattern("text/(").unwrap_err();
        assert!(matches!(err, CountError::InvalidMimePattern { .. }));
    }

    #[test]
    fn test_new_coordinator_is_idle() {
        let coordinator = RunCoordinator::new(".", Config::default());
        assert_eq!(coordinator.state(), RunState::Idle);

        let configured = coordinator.classifier(Arc::new(MimeSniffer)).progress(ProgressBar::hidden());
        assert_eq!(configured.state(), RunState::Idle);
    }
}
