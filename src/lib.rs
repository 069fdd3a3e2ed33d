pub mod error;
pub mod config;
pub mod providers;
pub mod request;
pub mod clipboard;
pub mod view;
pub mod session;
pub mod terminal;

/*

humanizer rewrites pasted AI-sounding text into natural prose with one
call to the Gemini generateContent API, driven by a small interactive
front-end.

humanizer/
├── Cargo.toml
├── src/
│   ├── lib.rs          # Re-exports and session channel plumbing
│   ├── main.rs         # Composition root: config, client, terminal loop
│   ├── error.rs        # Error type and user-facing messages
│   ├── config.rs       # Startup configuration from the environment
│   ├── request.rs      # Sampling knobs and the humanize request
│   ├── providers/      # Generation client(s)
│   │   ├── mod.rs      # Humanize trait
│   │   └── gemini.rs   # Gemini API client
│   ├── clipboard.rs    # Platform clipboard for paste/copy
│   ├── view.rs         # Finite-state view model and screen
│   ├── session.rs      # Task that owns the view model, runs effects
│   └── terminal.rs     # Command parsing and text rendering
└── tests/

*/

pub use error::Error;
pub use config::HumanizerConfig;
pub use request::{HumanizeRequest, SamplingConfig};
pub use providers::{GeminiClient, Humanize};
pub use clipboard::{Clipboard, SystemClipboard};
pub use view::{Effect, Event, OutputView, Screen, ViewModel, ViewState};
pub use session::{Session, SessionOptions};

/// SESSION API INTERFACE:

// ===== Shutdown =====

pub type ShutdownReply = Result<(), crate::error::Error>;
pub type ShutdownReplySender
  = tokio::sync::mpsc::UnboundedSender<ShutdownReply>;

pub struct ShutdownArgs
{   pub reply: ShutdownReplySender
}

// ===== SessionHand (sender side) =====

pub struct SessionHand
{   pub event_tx
      : tokio::sync::mpsc::UnboundedSender<view::Event>
  , pub shutdown_tx
      : tokio::sync::mpsc::UnboundedSender<ShutdownArgs>
}

// ===== SessionFoot (receiver side) =====

pub struct SessionFoot
{   pub event_rx
      : tokio::sync::mpsc::UnboundedReceiver<view::Event>
  , pub shutdown_rx
      : tokio::sync::mpsc::UnboundedReceiver<ShutdownArgs>
}
