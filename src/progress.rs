//! Progress streaming for research sessions.
//!
//! The coordinator reports two kinds of text while it runs: log lines
//! (section headers, scores, picks, decisions) and thoughts (rationale the
//! models volunteer). Both go through one [`ProgressObserver`], in the order
//! they happen, with no delivery guarantee beyond that.

use std::sync::Mutex;

use tokio::sync::mpsc::UnboundedSender;

/// One progress notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Log(String),
    Thought(String),
}

/// Receives progress notifications. Implementations must not block for long;
/// the research loop waits on every call.
pub trait ProgressObserver: Send + Sync {
    fn notify(&self, event: ProgressEvent);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn notify(&self, _event: ProgressEvent) {}
}

impl<F> ProgressObserver for F
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    fn notify(&self, event: ProgressEvent) {
        self(event)
    }
}

/// Forwards events to a channel; a dropped receiver is ignored.
impl ProgressObserver for UnboundedSender<ProgressEvent> {
    fn notify(&self, event: ProgressEvent) {
        let _ = self.send(event);
    }
}

/// Records the session's log lines and distinct thoughts for later export.
///
/// Log lines of the form `Reasoning: ...` are also collected as thoughts, so
/// the strategist's rationale shows up in the thinking log.
#[derive(Debug, Default)]
pub struct TranscriptObserver {
    inner: Mutex<Transcript>,
}

#[derive(Debug, Default, Clone)]
pub struct Transcript {
    pub logs: Vec<String>,
    pub thoughts: Vec<String>,
}

impl TranscriptObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Transcript {
        self.inner
            .lock()
            .map(|t| t.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl ProgressObserver for TranscriptObserver {
    fn notify(&self, event: ProgressEvent) {
        let mut transcript = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match event {
            ProgressEvent::Log(line) => {
                for reasoning in line.lines().filter_map(reasoning_text) {
                    transcript.push_thought(reasoning);
                }
                transcript.logs.push(line);
            }
            ProgressEvent::Thought(text) => transcript.push_thought(&text),
        }
    }
}

impl Transcript {
    fn push_thought(&mut self, text: &str) {
        let text = text.trim();
        if !text.is_empty() && !self.thoughts.iter().any(|t| t == text) {
            self.thoughts.push(text.to_string());
        }
    }
}

/// The text after a leading `Reasoning:` label, matched case-insensitively.
fn reasoning_text(line: &str) -> Option<&str> {
    const LABEL: &str = "reasoning:";
    let line = line.trim();
    let head = line.get(..LABEL.len())?;
    head.eq_ignore_ascii_case(LABEL).then(|| &line[LABEL.len()..])
}

/// Fans one event out to several observers, in order.
pub struct MultiObserver(pub Vec<std::sync::Arc<dyn ProgressObserver>>);

impl ProgressObserver for MultiObserver {
    fn notify(&self, event: ProgressEvent) {
        for observer in &self.0 {
            observer.notify(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_closure_observer() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let observer = move |event: ProgressEvent| sink.lock().unwrap().push(event);

        observer.notify(ProgressEvent::Log("hello".into()));
        assert_eq!(*seen.lock().unwrap(), vec![ProgressEvent::Log("hello".into())]);
    }

    #[test]
    fn test_transcript_dedupes_thoughts() {
        let observer = TranscriptObserver::new();
        observer.notify(ProgressEvent::Thought("split by region".into()));
        observer.notify(ProgressEvent::Log("line".into()));
        observer.notify(ProgressEvent::Thought(" split by region ".into()));
        observer.notify(ProgressEvent::Thought("".into()));

        let transcript = observer.snapshot();
        assert_eq!(transcript.logs, vec!["line"]);
        assert_eq!(transcript.thoughts, vec!["split by region"]);
    }

    #[test]
    fn test_transcript_collects_reasoning_lines_as_thoughts() {
        let observer = TranscriptObserver::new();
        observer.notify(ProgressEvent::Log(
            "Reasoning: Sources agree on the census figure".into(),
        ));
        observer.notify(ProgressEvent::Thought("Sources agree on the census figure".into()));
        observer.notify(ProgressEvent::Log("  REASONING:  check provinces ".into()));
        observer.notify(ProgressEvent::Log("Reasoning:".into()));
        observer.notify(ProgressEvent::Log("Decision: Research complete".into()));

        let transcript = observer.snapshot();
        assert_eq!(
            transcript.thoughts,
            vec!["Sources agree on the census figure", "check provinces"]
        );
        assert_eq!(transcript.logs.len(), 4);
        assert_eq!(transcript.logs[0], "Reasoning: Sources agree on the census figure");
    }

    #[test]
    fn test_reasoning_text() {
        assert_eq!(reasoning_text("Reasoning: gaps remain"), Some(" gaps remain"));
        assert_eq!(reasoning_text("Decision: done"), None);
        assert_eq!(reasoning_text("Reason"), None);
        assert_eq!(reasoning_text("Résumé: non-ascii head"), None);
    }

    #[tokio::test]
    async fn test_channel_observer_ignores_closed_receiver() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        tx.notify(ProgressEvent::Log("first".into()));
        assert_eq!(rx.recv().await, Some(ProgressEvent::Log("first".into())));

        drop(rx);
        tx.notify(ProgressEvent::Log("lost".into()));
    }

    #[test]
    fn test_multi_observer_fans_out() {
        let a = Arc::new(TranscriptObserver::new());
        let b = Arc::new(TranscriptObserver::new());
        let observers: Vec<Arc<dyn ProgressObserver>> = vec![a.clone(), b.clone()];
        let multi = MultiObserver(observers);
        multi.notify(ProgressEvent::Log("x".into()));
        assert_eq!(a.snapshot().logs, vec!["x"]);
        assert_eq!(b.snapshot().logs, vec!["x"]);
    }
}
