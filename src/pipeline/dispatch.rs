//! Per-file work: read, classify, filter, tokenize, report.

use indicatif::ProgressBar;
use regex::Regex;
use std::fs;
use std::path::Path;

use super::Aggregator;
use crate::utils::{decode_text, relative_display, ContentClassifier, TokenCounter};

/// What happened to a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// The file could not be read; nothing was counted.
    Unreadable,
    /// Content type did not match the filter.
    Skipped { label: String },
    /// Content type matched and the file was tokenized.
    Handled { label: String, tokens: u64 },
}

/// Everything a file task needs, shared by reference across the worker pool.
pub struct Dispatcher<'a> {
    root: &'a Path,
    classifier: &'a dyn ContentClassifier,
    tokenizer: &'a dyn TokenCounter,
    mime_filter: &'a Regex,
    aggregator: &'a Aggregator,
    milestone_every: u64,
    progress: Option<&'a ProgressBar>,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        root: &'a Path,
        classifier: &'a dyn ContentClassifier,
        tokenizer: &'a dyn TokenCounter,
        mime_filter: &'a Regex,
        aggregator: &'a Aggregator,
    ) -> Self {
        Self {
            root,
            classifier,
            tokenizer,
            mime_filter,
            aggregator,
            milestone_every: 100,
            progress: None,
        }
    }

    /// Log a milestone every `every` handled files of one content type (0 disables)
    pub fn milestone_every(mut self, every: u64) -> Self {
        self.milestone_every = every;
        self
    }

    pub fn progress(mut self, bar: Option<&'a ProgressBar>) -> Self {
        self.progress = bar;
        self
    }

    /// Run one file task to completion.
    ///
    /// Never fails: a read error is logged and contained here so that the
    /// remaining files and the run itself are unaffected.
    pub fn process(&self, path: &Path) -> FileOutcome {
        let outcome = self.process_inner(path);
        if let Some(bar) = self.progress {
            bar.inc(1);
        }
        outcome
    }

    fn process_inner(&self, path: &Path) -> FileOutcome {
        let rel = relative_display(self.root, path);

        let content = match fs::read(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("error reading {}: {}", rel, err);
                return FileOutcome::Unreadable;
            }
        };

        let class = self.classifier.classify(&content);
        if !self.mime_filter.is_match(&class.label) {
            tracing::debug!("skipping {} ({})", rel, class.label);
            self.aggregator.increment_skipped(&class.label);
            return FileOutcome::Skipped { label: class.label };
        }

        let handled = self.aggregator.increment_handled(&class.label);
        // Advisory only: lines from concurrent tasks may be logged out of order.
        if self.milestone_every > 0 && handled % self.milestone_every == 0 {
            tracing::info!("processed {:?} {} times", class.label, handled);
        }

        tracing::debug!("tokenizing {} ({})", rel, class.label);
        let text = decode_text(&content, class.charset);
        let tokens = self.tokenizer.count(&text) as u64;
        self.aggregator.increment_total(tokens);

        FileOutcome::Handled { label: class.label, tokens }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::MimeSniffer;
    use std::fs;
    use tempfile::TempDir;

    /// Counts whitespace-separated words.
    struct WordCounter;

    impl TokenCounter for WordCounter {
        fn count(&self, text: &str) -> usize {
            text.split_whitespace().count()
        }
    }

    fn text_filter() -> Regex {
        Regex::new("text/.*").unwrap()
    }

    #[test]
    fn test_text_file_is_handled() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("notes.md");
        fs::write(&path, "one two three").unwrap();

        let agg = Aggregator::new();
        let filter = text_filter();
        let dispatcher = Dispatcher::new(tmp.path(), &MimeSniffer, &WordCounter, &filter, &agg);

        let outcome = dispatcher.process(&path);
        assert_eq!(
            outcome,
            FileOutcome::Handled { label: "text/plain; charset=utf-8".to_string(), tokens: 3 }
        );

        let snapshot = agg.snapshot();
        assert_eq!(snapshot.total_tokens, 3);
        assert_eq!(snapshot.handled_by_type["text/plain; charset=utf-8"], 1);
        assert!(snapshot.skipped_by_type.is_empty());
    }

    #[test]
    fn test_binary_file_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("blob.bin");
        fs::write(&path, [0u8, 1, 2, 3, 4, 5, 6, 7]).unwrap();

        let agg = Aggregator::new();
        let filter = text_filter();
        let dispatcher = Dispatcher::new(tmp.path(), &MimeSniffer, &WordCounter, &filter, &agg);

        assert!(matches!(dispatcher.process(&path), FileOutcome::Skipped { .. }));
        let snapshot = agg.snapshot();
        assert_eq!(snapshot.total_tokens, 0);
        assert_eq!(snapshot.skipped_by_type["application/octet-stream"], 1);
    }

    #[test]
    fn test_missing_file_counts_nothing() {
        let tmp = TempDir::new().unwrap();

        let agg = Aggregator::new();
        let filter = text_filter();
        let dispatcher = Dispatcher::new(tmp.path(), &MimeSniffer, &WordCounter, &filter, &agg);

        assert_eq!(dispatcher.process(&tmp.path().join("gone.txt")), FileOutcome::Unreadable);
        assert_eq!(agg.snapshot().files_read(), 0);
    }

    #[test]
    fn test_filter_matching_nothing_skips_text() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.txt");
        fs::write(&path, "words here").unwrap();

        let agg = Aggregator::new();
        let filter = Regex::new("^nothing$").unwrap();
        let dispatcher = Dispatcher::new(tmp.path(), &MimeSniffer, &WordCounter, &filter, &agg)
            .milestone_every(0);

        dispatcher.process(&path);
        let snapshot = agg.snapshot();
        assert_eq!(snapshot.total_tokens, 0);
        assert_eq!(snapshot.files_skipped(), 1);
        assert!(snapshot.handled_by_type.is_empty());
    }
}
