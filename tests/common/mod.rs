//! Shared test utilities
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use inner_voice::api::ApiServerBuilder;
use inner_voice::client::{GatewayApi, GatewayReply, Recognizer, Synthesizer, Utterance, Voice};
use inner_voice::{Error, GatewaySettings, GenerationRequest, Generator, InnerVoice, Result};

/// Generator that records every request and answers from a script
pub struct MockGenerator {
    reply: std::result::Result<String, String>,
    calls: Mutex<Vec<GenerationRequest>>,
}

impl MockGenerator {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<GenerationRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        self.calls.lock().unwrap().push(request.clone());
        self.reply.clone().map_err(Error::Upstream)
    }
}

/// Build the full gateway router around a generator
pub fn test_router(generator: Arc<MockGenerator>) -> axum::Router {
    let service = InnerVoice::new(generator, GatewaySettings::default());
    ApiServerBuilder::new(service, 0).build().router()
}

/// Serve the gateway on an ephemeral local port, returning its base URL
pub async fn spawn_gateway(generator: Arc<MockGenerator>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let addr = listener.local_addr().expect("no local addr");
    let router = test_router(generator);
    tokio::spawn(async move { axum::serve(listener, router).await });
    format!("http://{addr}")
}

/// Ordered log of platform calls shared by the mock recognizer and synthesizer
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn new_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Recognizer that only records what the controller asked of it
pub struct MockRecognizer {
    pub log: CallLog,
    pub refuse_start: bool,
}

impl Recognizer for MockRecognizer {
    fn start(&mut self) -> Result<()> {
        if self.refuse_start {
            return Err(Error::Recognition("InvalidStateError".to_string()));
        }
        self.log.lock().unwrap().push("recognizer.start".to_string());
        Ok(())
    }

    fn stop(&mut self) {
        self.log.lock().unwrap().push("recognizer.stop".to_string());
    }

    fn abort(&mut self) {
        self.log.lock().unwrap().push("recognizer.abort".to_string());
    }
}

/// Synthesizer that records cancels and utterances
pub struct MockSynthesizer {
    pub log: CallLog,
    pub voices: Vec<Voice>,
    pub voice_loads: Arc<Mutex<usize>>,
    pub spoken: Arc<Mutex<Vec<Utterance>>>,
}

impl MockSynthesizer {
    pub fn new(log: CallLog, voices: Vec<Voice>) -> Self {
        Self {
            log,
            voices,
            voice_loads: Arc::new(Mutex::new(0)),
            spoken: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl Synthesizer for MockSynthesizer {
    async fn voices(&self) -> Vec<Voice> {
        // Simulate the platform loading its list late
        tokio::task::yield_now().await;
        *self.voice_loads.lock().unwrap() += 1;
        self.voices.clone()
    }

    fn cancel(&self) {
        self.log.lock().unwrap().push("synth.cancel".to_string());
    }

    fn speak(&self, utterance: Utterance) {
        self.log
            .lock()
            .unwrap()
            .push(format!("synth.speak:{}", utterance.text));
        self.spoken.lock().unwrap().push(utterance);
    }
}

/// Gateway that returns a canned outcome and remembers what it was sent
pub struct StubGateway {
    pub outcome: fn() -> Result<GatewayReply>,
    pub sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl StubGateway {
    pub fn new(outcome: fn() -> Result<GatewayReply>) -> Self {
        Self {
            outcome,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl GatewayApi for StubGateway {
    async fn process_text(&self, text: &str, persona: &str) -> Result<GatewayReply> {
        self.sent
            .lock()
            .unwrap()
            .push((text.to_string(), persona.to_string()));
        (self.outcome)()
    }
}

/// Gateway whose calls never settle
#[derive(Default)]
pub struct PendingGateway {
    pub sent: Arc<Mutex<Vec<(String, String)>>>,
}

#[async_trait]
impl GatewayApi for PendingGateway {
    async fn process_text(&self, text: &str, persona: &str) -> Result<GatewayReply> {
        self.sent
            .lock()
            .unwrap()
            .push((text.to_string(), persona.to_string()));
        std::future::pending().await
    }
}

pub fn english_voice() -> Voice {
    Voice {
        name: "Daniel".to_string(),
        lang: "en-GB".to_string(),
    }
}
