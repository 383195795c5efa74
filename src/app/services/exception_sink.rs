//! Sinks for recoverable parsing failures
//!
//! A parser reports each malformed frame to an [`ExceptionSink`] synchronously,
//! before it moves on to the next frame. Sinks only observe; nothing they do
//! can stop the parse.

use crate::app::services::dcl_full_parser::RecoverableParseError;

/// Receiver of recoverable parsing failures
pub trait ExceptionSink {
    fn on_exception(&mut self, error: RecoverableParseError);
}

impl<S: ExceptionSink + ?Sized> ExceptionSink for &mut S {
    fn on_exception(&mut self, error: RecoverableParseError) {
        (**self).on_exception(error);
    }
}

impl ExceptionSink for Vec<RecoverableParseError> {
    fn on_exception(&mut self, error: RecoverableParseError) {
        self.push(error);
    }
}

/// Sink that discards every failure
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ExceptionSink for NullSink {
    fn on_exception(&mut self, _error: RecoverableParseError) {}
}

/// Adapter turning a closure into a sink
pub struct FnSink<F>(pub F);

impl<F> ExceptionSink for FnSink<F>
where
    F: FnMut(RecoverableParseError),
{
    fn on_exception(&mut self, error: RecoverableParseError) {
        (self.0)(error);
    }
}

/// Counts failures and keeps the most recent one
#[derive(Debug, Default)]
pub struct ExceptionRecorder {
    count: usize,
    history: Vec<RecoverableParseError>,
}

impl ExceptionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of failures seen so far
    pub fn count(&self) -> usize {
        self.count
    }

    /// Most recent failure
    pub fn last(&self) -> Option<&RecoverableParseError> {
        self.history.last()
    }

    /// Every failure in the order it was reported
    pub fn history(&self) -> &[RecoverableParseError] {
        &self.history
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl ExceptionSink for ExceptionRecorder {
    fn on_exception(&mut self, error: RecoverableParseError) {
        self.count += 1;
        self.history.push(error);
    }
}
