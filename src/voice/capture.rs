use std::collections::VecDeque;
use std::time::Duration;

use crate::foundation::error::{MalathError, MalathResult};

/// Microphone capture plus speech-to-text, seen from the session.
///
/// `capture` blocks until a transcript is available, the window of `timeout` elapses
/// without speech ([`MalathError::AudioTimeout`]), or transcription fails
/// ([`MalathError::Transcription`]).
pub trait SpeechCapture {
    /// Listen for one utterance and return its transcript.
    fn capture(&mut self, timeout: Duration, locale: &str) -> MalathResult<String>;
}

/// Replays a fixed queue of capture results.
///
/// Once the queue is drained every call reports an audio timeout.
#[derive(Debug, Default)]
pub struct ScriptedCapture {
    queue: VecDeque<MalathResult<String>>,
    calls: usize,
}

impl ScriptedCapture {
    /// Script that yields each transcript in turn.
    pub fn transcripts(items: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            queue: items.into_iter().map(|s| Ok(s.into())).collect(),
            calls: 0,
        }
    }

    /// Append a successful transcript.
    pub fn push_transcript(&mut self, text: impl Into<String>) -> &mut Self {
        self.queue.push_back(Ok(text.into()));
        self
    }

    /// Append a failure.
    pub fn push_failure(&mut self, err: MalathError) -> &mut Self {
        self.queue.push_back(Err(err));
        self
    }

    /// Number of `capture` calls so far.
    pub fn calls(&self) -> usize {
        self.calls
    }

    /// Results not yet consumed.
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl SpeechCapture for ScriptedCapture {
    fn capture(&mut self, timeout: Duration, _locale: &str) -> MalathResult<String> {
        self.calls += 1;
        self.queue.pop_front().unwrap_or_else(|| {
            Err(MalathError::AudioTimeout {
                secs: timeout.as_secs(),
            })
        })
    }
}
