use std::fmt;

/// Shown for any failed generation call, whatever the cause
pub const GENERATION_FAILED_MESSAGE: &str
  = "Failed to humanize text. The API might be temporarily unavailable.";

/// Shown when submit is pressed with blank input
pub const EMPTY_INPUT_MESSAGE: &str
  = "Please enter some text to humanize.";

/// Custom error type for humanizer operations
/// Implements Clone for sending through channels
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// API key is missing at startup
    MissingApiKey(String)
  , /// Invalid configuration value
    InvalidConfiguration(String)
  , /// HTTP request error
    HttpError(String)
  , /// API returned a non-success status
    ApiError
    {   status: u16
      , message: String
    }
  , /// Failed to parse API response
    ParseError(String)
  , /// Response carried no candidate text
    EmptyResponse
  , /// Request timed out
    Timeout
  , /// Platform clipboard failed
    ClipboardError(String)
  , /// Input trimmed to nothing
    EmptyInput
  , /// Any generation failure, as surfaced to the user
    GenerationFailed
  , /// Generic error
    Other(String)
}

impl Error
{   /// The message the presentation layer shows for a failed generation.
    ///
    /// Causes are deliberately collapsed: only validation keeps its own
    /// wording, everything else reads as the generic failure.
    pub fn user_message(&self) -> String
    {   match self
        {   Error::EmptyInput => EMPTY_INPUT_MESSAGE.to_string()
          , _ => GENERATION_FAILED_MESSAGE.to_string()
        }
    }
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::MissingApiKey(name) => {
              write!(f, "Missing API key: {} is not set", name)
            }
          , Error::InvalidConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
          , Error::HttpError(msg) => {
              write!(f, "HTTP error: {}", msg)
            }
          , Error::ApiError { status, message } => {
              write!(f, "API error ({}): {}", status, message)
            }
          , Error::ParseError(msg) => {
              write!(f, "Parse error: {}", msg)
            }
          , Error::EmptyResponse => {
              write!(f, "API response contained no text")
            }
          , Error::Timeout => {
              write!(f, "Request timed out")
            }
          , Error::ClipboardError(msg) => {
              write!(f, "Clipboard error: {}", msg)
            }
          , Error::EmptyInput => {
              write!(f, "{}", EMPTY_INPUT_MESSAGE)
            }
          , Error::GenerationFailed => {
              write!(f, "{}", GENERATION_FAILED_MESSAGE)
            }
          , Error::Other(msg) => {
              write!(f, "Error: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<String> for Error
{   fn from(s: String) -> Self
    {   Error::Other(s)
    }
}

impl From<&str> for Error
{   fn from(s: &str) -> Self
    {   Error::Other(s.to_string())
    }
}
