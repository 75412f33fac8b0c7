//! Terminal front end for the controller
//!
//! Each line typed on stdin stands in for one recognized utterance and each
//! answer is "spoken" by printing it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

use super::{
    Controller, ControllerEvent, ControllerState, GatewayApi, Recognizer, SpeechOutput,
    Synthesizer, Utterance, Voice,
};
use crate::{Error, Result};

type StdinLines = Arc<Mutex<Lines<BufReader<Stdin>>>>;

/// Reads one line of stdin per recognition session
pub struct ConsoleRecognizer {
    lines: StdinLines,
    events: mpsc::UnboundedSender<ControllerEvent>,
    reader: Option<JoinHandle<()>>,
    closed: Arc<AtomicBool>,
}

impl ConsoleRecognizer {
    /// Create a recognizer that reports into `events`
    #[must_use]
    pub fn new(events: mpsc::UnboundedSender<ControllerEvent>) -> Self {
        Self {
            lines: Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines())),
            events,
            reader: None,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag raised once stdin reaches end of input
    #[must_use]
    pub fn closed_flag(&self) -> Arc<AtomicBool> {
        self.closed.clone()
    }
}

impl Recognizer for ConsoleRecognizer {
    fn start(&mut self) -> Result<()> {
        let lines = self.lines.clone();
        let events = self.events.clone();
        let closed = self.closed.clone();

        self.reader = Some(tokio::spawn(async move {
            let next = lines.lock().await.next_line().await;
            let event = match next {
                Ok(Some(line)) => ControllerEvent::Recognized(line),
                Ok(None) => {
                    closed.store(true, Ordering::SeqCst);
                    ControllerEvent::RecognitionFailed("aborted".to_string())
                }
                Err(e) => ControllerEvent::RecognitionFailed(format!("audio-capture ({e})")),
            };
            // Receiver gone means the chat loop has exited
            let _ = events.send(event);
        }));

        Ok(())
    }

    fn stop(&mut self) {
        // A line is already the complete utterance
    }

    fn abort(&mut self) {
        if let Some(handle) = self.reader.take() {
            handle.abort();
        }
    }
}

/// Prints answers instead of playing audio
#[derive(Debug, Default)]
pub struct ConsoleSynthesizer;

#[async_trait]
impl Synthesizer for ConsoleSynthesizer {
    async fn voices(&self) -> Vec<Voice> {
        vec![Voice {
            name: "terminal".to_string(),
            lang: "en-US".to_string(),
        }]
    }

    fn cancel(&self) {}

    fn speak(&self, utterance: Utterance) {
        println!("🔊 {}", utterance.text);
    }
}

/// Run an interactive session until stdin closes
///
/// # Errors
///
/// Returns error if the event channel closes unexpectedly
pub async fn run_chat<G: GatewayApi>(gateway: G, persona: String) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let recognizer = ConsoleRecognizer::new(tx);
    let closed = recognizer.closed_flag();
    let mut controller = Controller::new(
        recognizer,
        SpeechOutput::new(ConsoleSynthesizer),
        gateway,
        persona,
    );

    println!(
        "Inner Voice ({}). Type a thought and press Enter; Ctrl-D to quit.",
        controller.persona()
    );

    loop {
        controller.handle(ControllerEvent::TriggerPressed).await;

        while controller.state() == ControllerState::Listening {
            let event = rx
                .recv()
                .await
                .ok_or_else(|| Error::Recognition("recognizer channel closed".to_string()))?;
            controller.handle(event).await;
        }

        if closed.load(Ordering::SeqCst) {
            return Ok(());
        }

        let ui = controller.ui();
        if ui.response.is_empty() || ui.response.starts_with("Error:") {
            println!("{}", ui.status);
            if !ui.response.is_empty() {
                println!("{}", ui.response);
            }
        }
    }
}
