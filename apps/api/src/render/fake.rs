//! Scripted in-memory `Engine` for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::render::engine::{Engine, EngineError, EngineOutput, OutputFormat};

/// Counters shared with the test after the engine is moved into a `Compiler`.
#[derive(Debug, Default)]
pub struct FakeEngineProbe {
    pub init_calls: AtomicUsize,
    pub compile_calls: AtomicUsize,
    pub resets: AtomicUsize,
    pub last_source: Mutex<Option<(String, String)>>,
}

impl FakeEngineProbe {
    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    pub fn compile_calls(&self) -> usize {
        self.compile_calls.load(Ordering::SeqCst)
    }
}

pub struct FakeEngine {
    pub probe: Arc<FakeEngineProbe>,
    init_delay: Duration,
    init_failure: Option<String>,
    /// Popped per compile; when empty, compiles echo the source back as the artifact.
    outputs: VecDeque<Result<EngineOutput, EngineError>>,
}

impl Default for FakeEngine {
    fn default() -> Self {
        Self {
            probe: Arc::new(FakeEngineProbe::default()),
            init_delay: Duration::ZERO,
            init_failure: None,
            outputs: VecDeque::new(),
        }
    }
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_init_delay(mut self, delay: Duration) -> Self {
        self.init_delay = delay;
        self
    }

    pub fn failing_init(mut self, message: &str) -> Self {
        self.init_failure = Some(message.to_string());
        self
    }

    pub fn then(mut self, output: Result<EngineOutput, EngineError>) -> Self {
        self.outputs.push_back(output);
        self
    }
}

#[async_trait]
impl Engine for FakeEngine {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn init(&mut self) -> Result<(), EngineError> {
        self.probe.init_calls.fetch_add(1, Ordering::SeqCst);
        if !self.init_delay.is_zero() {
            tokio::time::sleep(self.init_delay).await;
        }
        match &self.init_failure {
            Some(message) => Err(EngineError::Protocol(message.clone())),
            None => Ok(()),
        }
    }

    fn reset(&mut self) {
        self.probe.resets.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.probe.last_source.lock() {
            *last = None;
        }
    }

    fn add_source(&mut self, path: &str, text: &str) {
        if let Ok(mut last) = self.probe.last_source.lock() {
            *last = Some((path.to_string(), text.to_string()));
        }
    }

    async fn compile(&mut self, _format: OutputFormat) -> Result<EngineOutput, EngineError> {
        self.probe.compile_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(output) = self.outputs.pop_front() {
            return output;
        }
        let source = self
            .probe
            .last_source
            .lock()
            .ok()
            .and_then(|last| last.as_ref().map(|(_, text)| text.clone()))
            .unwrap_or_default();
        Ok(EngineOutput::artifact(source.into_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_engine_echoes_source() {
        let mut engine = FakeEngine::default();
        engine.init().await.unwrap();
        engine.add_source("/main.typ", "= Hi");
        let output = engine.compile(OutputFormat::Pdf).await.unwrap();
        assert_eq!(output.artifact, Some(b"= Hi".to_vec()));
        assert_eq!(engine.probe.init_calls(), 1);
    }
}
