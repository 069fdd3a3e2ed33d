//! Finite-state view model for the humanizer screen.
//!
//! `ViewModel::apply` is the only way state changes. It returns the side
//! effect the runtime should perform, if any; completions of those effects
//! come back in as further events. `ViewModel::screen` renders the current
//! state and never mutates it.

use log::{debug, trace};

use crate::error::{EMPTY_INPUT_MESSAGE, GENERATION_FAILED_MESSAGE};
use crate::request::{HumanizeRequest, SamplingConfig};

pub const PASTE_FAILED_MESSAGE: &str
  = "Failed to paste from clipboard. Please paste manually.";

pub const COPY_FAILED_MESSAGE: &str = "Failed to copy to clipboard.";

/// Which generation call a completion belongs to
pub type GenerationToken = u64;

/// Which copy confirmation a timer belongs to
pub type CopyTicket = u64;

/// Output-side state. Exactly one is current.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState
{   Idle
  , Loading
  , Error(String)
  , Result(String)
}

/// Discrete inputs to the view model
#[derive(Debug, Clone, PartialEq)]
pub enum Event
{   /// Replace the input text
    EditInput(String)
  , /// Add a line to the end of the input text
    AppendLine(String)
  , SetTemperature(f32)
  , SetTopP(f32)
  , Submit
  , /// Same as submit; offered from the error panel
    Retry
  , Paste
  , PasteSucceeded(String)
  , PasteFailed(String)
  , Clear
  , Copy
  , /// Clipboard write finished for the result of `token`
    CopySucceeded { token: GenerationToken }
  , CopyFailed(String)
  , CopyExpired { ticket: CopyTicket }
  , CallSucceeded { token: GenerationToken, text: String }
  , CallFailed { token: GenerationToken, message: String }
}

/// Work the runtime must do on behalf of the view model
#[derive(Debug, Clone, PartialEq)]
pub enum Effect
{   Generate
    {   token: GenerationToken
      , request: HumanizeRequest
    }
  , ReadClipboard
  , WriteClipboard
    {   token: GenerationToken
      , text: String
    }
  , /// Fire `CopyExpired { ticket }` after the feedback window
    ExpireCopy { ticket: CopyTicket }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel
{   input: String
  , sampling: SamplingConfig
  , state: ViewState
  , notice: Option<String>
  , latest_token: GenerationToken
  , copied: Option<CopyTicket>
  , latest_ticket: CopyTicket
}

impl Default for ViewModel
{   fn default() -> Self
    {   ViewModel::new(SamplingConfig::default())
    }
}

impl ViewModel
{   pub fn new(sampling: SamplingConfig) -> Self
    {   ViewModel
        {   input: String::new()
          , sampling
          , state: ViewState::Idle
          , notice: None
          , latest_token: 0
          , copied: None
          , latest_ticket: 0
        }
    }

    pub fn input(&self) -> &str
    {   &self.input
    }

    pub fn sampling(&self) -> SamplingConfig
    {   self.sampling
    }

    pub fn state(&self) -> &ViewState
    {   &self.state
    }

    pub fn notice(&self) -> Option<&str>
    {   self.notice.as_deref()
    }

    pub fn is_loading(&self) -> bool
    {   self.state == ViewState::Loading
    }

    /// Token of the most recently issued generation call
    pub fn latest_token(&self) -> GenerationToken
    {   self.latest_token
    }

    pub fn apply(&mut self, event: Event) -> Option<Effect>
    {   trace!("View event: {:?}", event);
        match event
        {   Event::EditInput(text) => {
              if !self.is_loading()
              {   self.input = text;
              }
              None
            }
          , Event::AppendLine(line) => {
              if !self.is_loading()
              {   if !self.input.is_empty()
                  {   self.input.push('\n');
                  }
                  self.input.push_str(&line);
              }
              None
            }
          , Event::SetTemperature(value) => {
              if !self.is_loading()
              {   self.sampling.set_temperature(value);
              }
              None
            }
          , Event::SetTopP(value) => {
              if !self.is_loading()
              {   self.sampling.set_top_p(value);
              }
              None
            }
          , Event::Submit | Event::Retry => self.submit()
          , Event::Paste => {
              if self.is_loading()
              {   None
              } else
              {   Some(Effect::ReadClipboard)
              }
            }
          , Event::PasteSucceeded(text) => {
              if !self.is_loading()
              {   self.input = text;
                  self.notice = None;
              }
              None
            }
          , Event::PasteFailed(message) => {
              self.notice = Some(message);
              None
            }
          , Event::Clear => {
              self.clear();
              None
            }
          , Event::Copy => {
              match &self.state
              {   ViewState::Result(text) if !text.is_empty() => {
                    Some(Effect::WriteClipboard
                    {   token: self.latest_token
                      , text: text.clone()
                    })
                  }
                , _ => None
              }
            }
          , Event::CopySucceeded { token } => {
              let showing = matches!(self.state, ViewState::Result(_));
              if !showing || token != self.latest_token
              {   debug!("Discarding stale copy confirmation {}", token);
                  return None;
              }
              self.latest_ticket += 1;
              self.copied = Some(self.latest_ticket);
              Some(Effect::ExpireCopy { ticket: self.latest_ticket })
            }
          , Event::CopyFailed(message) => {
              self.notice = Some(message);
              None
            }
          , Event::CopyExpired { ticket } => {
              if self.copied == Some(ticket)
              {   self.copied = None;
              }
              None
            }
          , Event::CallSucceeded { token, text } => {
              if self.accepts(token)
              {   self.state = if text.is_empty()
                  {   ViewState::Idle
                  } else
                  {   ViewState::Result(text)
                  };
              }
              None
            }
          , Event::CallFailed { token, message } => {
              if self.accepts(token)
              {   self.state = ViewState::Error(message);
              }
              None
            }
        }
    }

    fn submit(&mut self) -> Option<Effect>
    {   if self.is_loading()
        {   debug!("Submit ignored while a call is in flight");
            return None;
        }
        if self.input.trim().is_empty()
        {   self.state = ViewState::Error(EMPTY_INPUT_MESSAGE.to_string());
            return None;
        }

        self.latest_token += 1;
        self.state = ViewState::Loading;
        self.notice = None;
        self.copied = None;
        debug!("Issuing generation {}", self.latest_token);

        Some(Effect::Generate
        {   token: self.latest_token
          , request: HumanizeRequest::new(self.input.clone(), self.sampling)
        })
    }

    fn clear(&mut self)
    {   if self.is_loading()
        {   // abandon the in-flight call
            self.latest_token += 1;
        }
        self.input.clear();
        self.state = ViewState::Idle;
        self.notice = None;
        self.copied = None;
    }

    fn accepts(&self, token: GenerationToken) -> bool
    {   let fresh = token == self.latest_token && self.is_loading();
        if !fresh
        {   debug!(
              "Discarding stale completion {} (latest {})",
              token, self.latest_token
            );
        }
        fresh
    }

    /// Render the current state
    pub fn screen(&self) -> Screen
    {   let loading = self.is_loading();
        let output = match &self.state
        {   ViewState::Loading => OutputView::Loading
          , ViewState::Error(message) => OutputView::Error
            {   message: message.clone()
            }
          , ViewState::Result(text) if !text.is_empty() => OutputView::Result
            {   text: text.clone()
              , word_count: word_count(text)
            }
          , _ => OutputView::Placeholder
        };
        let copy_label = match &output
        {   OutputView::Result { .. } => Some(
              if self.copied.is_some() { "Copied!" } else { "Copy" }
            )
          , _ => None
        };

        Screen
        {   input: InputPanel
            {   text: self.input.clone()
              , word_count: word_count(&self.input)
              , temperature: format!("{:.2}", self.sampling.temperature)
              , top_p: format!("{:.2}", self.sampling.top_p)
              , editable: !loading
              , can_paste: !loading
              , can_clear: !loading && !self.input.is_empty()
              , can_submit: !loading && !self.input.trim().is_empty()
              , submit_label: if loading { "Humanizing..." } else { "Humanize" }
              , notice: self.notice.clone()
            }
          , output
          , copy_label
        }
    }
}

/// Whitespace-separated words of the trimmed text
pub fn word_count(text: &str) -> usize
{   text.split_whitespace().count()
}

/// Everything the presentation shows, derived from `ViewModel`
#[derive(Debug, Clone, PartialEq)]
pub struct Screen
{   pub input: InputPanel
  , pub output: OutputView
  , /// Present only alongside a result
    pub copy_label: Option<&'static str>
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputPanel
{   pub text: String
  , pub word_count: usize
  , pub temperature: String
  , pub top_p: String
  , pub editable: bool
  , pub can_paste: bool
  , pub can_clear: bool
  , pub can_submit: bool
  , pub submit_label: &'static str
  , pub notice: Option<String>
}

/// The output panel shows exactly one of these
#[derive(Debug, Clone, PartialEq)]
pub enum OutputView
{   Loading
  , Error { message: String }
  , Placeholder
  , Result { text: String, word_count: usize }
}

impl OutputView
{   /// Retry is offered only from the error panel
    pub fn can_retry(&self) -> bool
    {   matches!(self, OutputView::Error { .. })
    }

    pub fn is_generation_failure(&self) -> bool
    {   matches!(
          self,
          OutputView::Error { message } if message == GENERATION_FAILED_MESSAGE
        )
    }
}
