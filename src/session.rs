use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use log::{debug, trace, error, info};

use crate::clipboard::Clipboard;
use crate::config::HumanizerConfig;
use crate::providers::Humanize;
use crate::request::SamplingConfig;
use crate::view::{
  Effect, Event, Screen, ViewModel,
  COPY_FAILED_MESSAGE, PASTE_FAILED_MESSAGE,
};
use crate::SessionFoot;

/// Knobs for one interactive session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions
{   /// Sampling the sliders start at
    pub sampling: SamplingConfig
  , /// How long "Copied!" stays up
    pub copy_feedback: Duration
}

impl Default for SessionOptions
{   fn default() -> Self
    {   SessionOptions
        {   sampling: SamplingConfig::default()
          , copy_feedback: Duration::from_millis(
              crate::config::DEFAULT_COPY_FEEDBACK_MS
            )
        }
    }
}

impl SessionOptions
{   pub fn from_config(config: &HumanizerConfig) -> Self
    {   SessionOptions
        {   sampling: SamplingConfig::default()
          , copy_feedback: Duration::from_millis(config.copy_feedback_ms)
        }
    }
}

/// State owned by the session task
pub struct SessionState
{   view: ViewModel
  , generator: Arc<dyn Humanize>
  , clipboard: Arc<dyn Clipboard>
  , copy_feedback: Duration
  , completion_tx: mpsc::UnboundedSender<Event>
  , screen_tx: mpsc::UnboundedSender<Screen>
  , last_screen: Option<Screen>
}

impl SessionState
{   fn new(
      generator: Arc<dyn Humanize>
    , clipboard: Arc<dyn Clipboard>
    , options: SessionOptions
    , completion_tx: mpsc::UnboundedSender<Event>
    , screen_tx: mpsc::UnboundedSender<Screen>
    ) -> Self
    {   debug!("Initializing SessionState");
        SessionState
        {   view: ViewModel::new(options.sampling)
          , generator
          , clipboard
          , copy_feedback: options.copy_feedback
          , completion_tx
          , screen_tx
          , last_screen: None
        }
    }

    /// Apply one event, start whatever it asks for, publish the screen
    fn handle(&mut self, event: Event)
    {   if let Some(effect) = self.view.apply(event)
        {   self.run_effect(effect);
        }
        self.publish();
    }

    fn publish(&mut self)
    {   let screen = self.view.screen();
        if self.last_screen.as_ref() == Some(&screen)
        {   return;
        }
        trace!("Publishing screen: {:?}", screen.output);
        let _ = self.screen_tx.send(screen.clone());
        self.last_screen = Some(screen);
    }

    /// Effects run off the loop; their outcome re-enters as an event
    fn run_effect(&self, effect: Effect)
    {   let tx = self.completion_tx.clone();
        match effect
        {   Effect::Generate { token, request } => {
              debug!("Starting generation {}", token);
              let generator = Arc::clone(&self.generator);
              tokio::spawn(async move {
                let event = match generator.humanize(&request).await
                {   Ok(text) => Event::CallSucceeded { token, text }
                  , Err(e) => {
                      error!("Generation {} failed: {}", token, e);
                      Event::CallFailed
                      {   token
                        , message: e.user_message()
                      }
                    }
                };
                let _ = tx.send(event);
              });
            }
          , Effect::ReadClipboard => {
              let clipboard = Arc::clone(&self.clipboard);
              tokio::spawn(async move {
                let event = match clipboard.read_text().await
                {   Ok(text) => Event::PasteSucceeded(text)
                  , Err(e) => {
                      error!("Failed to read clipboard contents: {}", e);
                      Event::PasteFailed(PASTE_FAILED_MESSAGE.to_string())
                    }
                };
                let _ = tx.send(event);
              });
            }
          , Effect::WriteClipboard { token, text } => {
              let clipboard = Arc::clone(&self.clipboard);
              tokio::spawn(async move {
                let event = match clipboard.write_text(&text).await
                {   Ok(()) => Event::CopySucceeded { token }
                  , Err(e) => {
                      error!("Failed to write clipboard: {}", e);
                      Event::CopyFailed(COPY_FAILED_MESSAGE.to_string())
                    }
                };
                let _ = tx.send(event);
              });
            }
          , Effect::ExpireCopy { ticket } => {
              let wait = self.copy_feedback;
              tokio::spawn(async move {
                tokio::time::sleep(wait).await;
                let _ = tx.send(Event::CopyExpired { ticket });
              });
            }
        }
    }
}

/// Public API for a humanizer session - owns the task
pub struct Session
{   hand: crate::SessionHand
  , _task_handle: tokio::task::JoinHandle<()>
}

impl Session
{   /// Spawn a session task.
    /// Returns the handle and the stream of rendered screens; the first
    /// screen is published immediately.
    pub fn new(
      generator: Arc<dyn Humanize>
    , clipboard: Arc<dyn Clipboard>
    , options: SessionOptions
    ) -> (Self, mpsc::UnboundedReceiver<Screen>)
    {   debug!("Creating Session with task ownership");

        let (event_tx, event_rx)
          = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx)
          = mpsc::unbounded_channel();
        let (screen_tx, screen_rx)
          = mpsc::unbounded_channel();
        let (completion_tx, completion_rx)
          = mpsc::unbounded_channel();

        let hand = crate::SessionHand
        {   event_tx
          , shutdown_tx
        };

        let foot = crate::SessionFoot
        {   event_rx
          , shutdown_rx
        };

        let state = SessionState::new(
          generator,
          clipboard,
          options,
          completion_tx,
          screen_tx
        );

        let _task_handle = tokio::spawn(async move {
          run_session_loop(foot, completion_rx, state).await
        });

        (Session { hand, _task_handle }, screen_rx)
    }

    /// Queue a user event - returns immediately
    pub fn send(&self, event: Event) -> Result<(), crate::error::Error>
    {   trace!("Queuing event: {:?}", event);
        self.hand.event_tx
          .send(event)
          .map_err(|_| {
            error!("Session channel closed");
            crate::error::Error::from("Session disconnected")
          })
    }

    /// Gracefully stop the session task
    pub async fn shutdown(self)
      -> Result<(), crate::error::Error>
    {   debug!("Shutting down Session");
        let (reply_tx, mut reply_rx)
          = mpsc::unbounded_channel();

        let cmd = crate::ShutdownArgs
        {   reply: reply_tx
        };

        self.hand.shutdown_tx
          .send(cmd)
          .map_err(|_| {
            error!("Session channel already closed");
            crate::error::Error::from("Session already shutdown")
          })?;

        if let Some(result) = reply_rx.recv().await
        {   debug!("Session shutdown confirmed");
            result
        } else
        {   error!("Session ended before confirming shutdown");
            Err(crate::error::Error::from(
              "Session ended before confirming shutdown"
            ))
        }
    }
}

/// Main session event loop
///
/// User events and effect completions are handled one at a time, so the
/// view model only ever changes on this task.
async fn run_session_loop(
  foot: SessionFoot
, mut completion_rx: mpsc::UnboundedReceiver<Event>
, mut state: SessionState
)
{   debug!("Starting Session event loop");
    let SessionFoot
    {   mut event_rx
      , mut shutdown_rx
    } = foot;

    state.publish();

    loop
    { tokio::select!
      { event = event_rx.recv() => {
          match event
          {   Some(event) => state.handle(event)
            , None => {
                debug!("Event channel closed");
                break;
              }
          }
        }
      , Some(event) = completion_rx.recv() => {
          state.handle(event);
        }
      , Some(cmd) = shutdown_rx.recv() => {
          let _ = cmd.reply.send(Ok(()));
          info!("Session shutting down");
          break;
        }
      }
    }
}
