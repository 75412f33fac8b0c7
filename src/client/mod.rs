//! Client controller: one spoken thought in, one spoken answer out
//!
//! The controller is an explicit state machine driven by named events. The
//! platform capabilities it drives (speech recognition, speech synthesis and
//! the gateway call) sit behind traits so any front end can host it.
//!
//! ```text
//!            TriggerPressed              Recognized(text)
//!   Idle ─────────────────▶ Listening ─────────────────▶ Processing
//!    ▲  ▲                    │    │                          │
//!    │  └──── Cancel ────────┘    │ RecognitionFailed /      │ reply settles
//!    │                            ▼ RecognitionEnded         │
//!    │   TriggerPressed         Error                        │
//!    │  (back to Listening) ◀───┘                            │
//!    └───────────────────────────────────────────────────────┘
//! ```

use tokio::sync::watch;

pub mod console;
mod recognition;
mod speech;
mod transport;

pub use recognition::{RecognitionFailure, Recognizer};
pub use speech::{SpeechOutput, Synthesizer, Utterance, Voice, select_voice};
pub use transport::{GatewayApi, GatewayReply, HttpGateway};

/// Trigger label while ready to record
pub const LABEL_START: &str = "Start Recording";
/// Trigger label while recording
pub const LABEL_STOP: &str = "Stop Listening";
/// Trigger label while waiting on the recognizer or the gateway
pub const LABEL_PROCESSING: &str = "Processing...";

/// Status left behind when a gateway call is dropped before it settles
pub const STATUS_INTERRUPTED: &str = "Request interrupted. Try again.";

/// Where the controller is in an interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Ready for the user to start recording
    Idle,
    /// Recognition session active
    Listening,
    /// Transcript sent, waiting on the gateway
    Processing,
    /// Recognition failed; ready to try again
    Error,
}

/// Inputs to the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    /// User activated the trigger control
    TriggerPressed,
    /// User abandoned the recording
    Cancel,
    /// Recognizer produced a final transcript
    Recognized(String),
    /// Recognizer reported an error code
    RecognitionFailed(String),
    /// Recognition session closed
    RecognitionEnded,
}

/// What the user sees
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ui {
    pub trigger_enabled: bool,
    pub trigger_label: &'static str,
    pub status: String,
    pub transcript: String,
    pub response: String,
}

impl Ui {
    fn restore_trigger(&mut self) {
        self.trigger_enabled = true;
        self.trigger_label = LABEL_START;
    }
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            trigger_enabled: true,
            trigger_label: LABEL_START,
            status: "Press the button and share a thought.".to_string(),
            transcript: String::new(),
            response: String::new(),
        }
    }
}

/// State and UI as published to subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub state: ControllerState,
    pub ui: Ui,
}

/// Returns the controller to `Idle` once a gateway call ends, including
/// when the `handle` future is dropped mid-call
struct InFlight<'a> {
    state: &'a mut ControllerState,
    ui: &'a mut Ui,
    updates: &'a watch::Sender<Snapshot>,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.state = ControllerState::Idle;
        self.ui.restore_trigger();

        if !self.settled {
            tracing::warn!("gateway call dropped before it settled");
            self.ui.status = STATUS_INTERRUPTED.to_string();
            let snapshot = Snapshot {
                state: *self.state,
                ui: self.ui.clone(),
            };
            self.updates.send_modify(|current| *current = snapshot);
        }
    }
}

/// Drives one interaction at a time
pub struct Controller<R, S, G> {
    recognizer: R,
    speech: SpeechOutput<S>,
    gateway: G,
    persona: String,
    state: ControllerState,
    ui: Ui,
    updates: watch::Sender<Snapshot>,
}

impl<R, S, G> Controller<R, S, G>
where
    R: Recognizer,
    S: Synthesizer,
    G: GatewayApi,
{
    /// Create an idle controller
    #[must_use]
    pub fn new(recognizer: R, speech: SpeechOutput<S>, gateway: G, persona: impl Into<String>) -> Self {
        let (updates, _) = watch::channel(Snapshot {
            state: ControllerState::Idle,
            ui: Ui::default(),
        });

        Self {
            recognizer,
            speech,
            gateway,
            persona: persona.into(),
            state: ControllerState::Idle,
            ui: Ui::default(),
            updates,
        }
    }

    /// Follow state and UI changes, including while a gateway call is pending
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.updates.subscribe()
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> ControllerState {
        self.state
    }

    /// Current UI snapshot
    #[must_use]
    pub const fn ui(&self) -> &Ui {
        &self.ui
    }

    /// Persona sent with the next transcript
    #[must_use]
    pub fn persona(&self) -> &str {
        &self.persona
    }

    /// Change the persona used for the next transcript
    pub fn set_persona(&mut self, persona: impl Into<String>) {
        self.persona = persona.into();
    }

    /// Speech output, for front ends that replay answers
    #[must_use]
    pub const fn speech(&self) -> &SpeechOutput<S> {
        &self.speech
    }

    /// Apply one event
    ///
    /// Events with no transition from the current state are ignored. A
    /// transcript event awaits the gateway call before returning.
    pub async fn handle(&mut self, event: ControllerEvent) {
        use ControllerEvent as Ev;
        use ControllerState as St;

        match (self.state, event) {
            (St::Idle | St::Error, Ev::TriggerPressed) => self.start_listening(),
            (St::Listening, Ev::TriggerPressed) => {
                // Finalize; the outcome arrives as a later event
                self.recognizer.stop();
                self.ui.trigger_enabled = false;
                self.ui.trigger_label = LABEL_PROCESSING;
            }
            (St::Listening, Ev::Cancel) => {
                self.recognizer.abort();
                self.state = St::Idle;
                self.ui.status = "Recording cancelled.".to_string();
                self.restore_trigger();
            }
            (St::Listening, Ev::Recognized(transcript)) => {
                if transcript.trim().is_empty() {
                    self.fail(&RecognitionFailure::NoSpeech);
                } else {
                    self.submit(transcript).await;
                }
            }
            (St::Listening, Ev::RecognitionFailed(code)) => {
                self.fail(&RecognitionFailure::from_code(&code));
            }
            (St::Listening, Ev::RecognitionEnded) => self.fail(&RecognitionFailure::NoSpeech),
            (state, event) => {
                tracing::debug!(?state, ?event, "event ignored");
                return;
            }
        }

        self.publish();
    }

    fn publish(&self) {
        let snapshot = Snapshot {
            state: self.state,
            ui: self.ui.clone(),
        };
        self.updates.send_modify(|current| *current = snapshot);
    }

    fn start_listening(&mut self) {
        self.speech.cancel();
        self.ui.transcript.clear();
        self.ui.response.clear();

        if let Err(e) = self.recognizer.start() {
            tracing::warn!(error = %e, "recognizer failed to start");
            self.fail(&RecognitionFailure::Other(e.to_string()));
            return;
        }

        self.state = ControllerState::Listening;
        self.ui.trigger_enabled = true;
        self.ui.trigger_label = LABEL_STOP;
        self.ui.status = "Listening... Speak now.".to_string();
    }

    fn fail(&mut self, failure: &RecognitionFailure) {
        tracing::info!(?failure, "recognition failed");
        self.state = ControllerState::Error;
        self.ui.status = failure.message();
        self.restore_trigger();
    }

    fn restore_trigger(&mut self) {
        self.ui.restore_trigger();
    }

    async fn submit(&mut self, transcript: String) {
        self.state = ControllerState::Processing;
        self.ui.trigger_enabled = false;
        self.ui.trigger_label = LABEL_PROCESSING;
        self.ui.status = "Transcription complete. Generating AI response...".to_string();
        self.ui.transcript.clone_from(&transcript);
        self.publish();

        let mut in_flight = InFlight {
            state: &mut self.state,
            ui: &mut self.ui,
            updates: &self.updates,
            settled: false,
        };
        let outcome = self.gateway.process_text(&transcript, &self.persona).await;
        in_flight.settled = true;
        drop(in_flight);

        let answer = match outcome {
            Ok(GatewayReply::Answer(text)) => {
                self.ui.response.clone_from(&text);
                self.ui.status = "Processing complete. Inner Voice Response:".to_string();
                Some(text)
            }
            Ok(GatewayReply::Rejected {
                status,
                error,
                details,
            }) => {
                tracing::error!(status, ?details, %error, "gateway returned an error");
                self.ui.response = format!("Error: {error}");
                self.ui.status = "Error. Check the server log and your Gemini API key.".to_string();
                None
            }
            Err(e) => {
                tracing::error!(error = %e, "error sending/receiving data");
                self.ui.status = "An error occurred. Details in the log.".to_string();
                None
            }
        };

        self.publish();

        if let Some(text) = answer {
            self.speech.speak(&text).await;
        }
    }
}
