//! Line-oriented terminal front-end: command parsing and screen text

use std::fmt::Write;

use crate::view::{Event, OutputView, Screen};

pub const TITLE: &str = "AI Humanizer Pro";
pub const FOOTER: &str
  = "Powered by Gemini API. Built for exceptional content creation.";

pub const HELP: &str = "\
Type or paste text; each line is added to the input.
  :go              humanize the input
  :retry           re-send after an error
  :paste           replace the input with the clipboard
  :copy            copy the result to the clipboard
  :clear           reset input and output
  :temp <0..1>     set creativity (temperature)
  :top-p <0..1>    set consistency (top-p)
  :help            show this help
  :quit            exit
  ::text           add a line that starts with ':'";

/// What one line of terminal input asks for
#[derive(Debug, Clone, PartialEq)]
pub enum Command
{   Event(Event)
  , Help
  , Quit
  , Invalid(String)
}

/// Plain lines become input; `:`-prefixed lines are controls.
/// A doubled `::` escapes to one literal `:`.
pub fn parse_line(line: &str) -> Command
{   if let Some(literal) = line.strip_prefix("::")
    {   return Command::Event(Event::AppendLine(format!(":{}", literal)));
    }
    let Some(rest) = line.strip_prefix(':')
    else
    {   return Command::Event(Event::AppendLine(line.to_string()));
    };

    let mut words = rest.split_whitespace();
    let name = words.next().unwrap_or("");
    let arg = words.next();

    match (name, arg)
    {   ("go" | "humanize" | "submit", None) => Command::Event(Event::Submit)
      , ("retry", None) => Command::Event(Event::Retry)
      , ("paste", None) => Command::Event(Event::Paste)
      , ("copy", None) => Command::Event(Event::Copy)
      , ("clear", None) => Command::Event(Event::Clear)
      , ("temp" | "temperature", Some(v)) => {
          parse_unit(v).map_or_else(
            || Command::Invalid(format!("not a number: {}", v)),
            |x| Command::Event(Event::SetTemperature(x))
          )
        }
      , ("top-p" | "topp", Some(v)) => {
          parse_unit(v).map_or_else(
            || Command::Invalid(format!("not a number: {}", v)),
            |x| Command::Event(Event::SetTopP(x))
          )
        }
      , ("help" | "h", None) => Command::Help
      , ("quit" | "q" | "exit", None) => Command::Quit
      , _ => Command::Invalid(format!("unknown command: {}", line.trim()))
    }
}

fn parse_unit(raw: &str) -> Option<f32>
{   raw.parse::<f32>().ok().filter(|v| v.is_finite())
}

fn button(label: &str, enabled: bool) -> String
{   if enabled
    {   format!("[{}]", label)
    } else
    {   format!("({})", label)
    }
}

/// Render a screen as plain text
pub fn render(screen: &Screen) -> String
{   let mut out = String::new();
    let input = &screen.input;

    let _ = writeln!(out, "=== {} ===", TITLE);
    let _ = writeln!(out, "--- Your Text ---");
    if input.text.is_empty()
    {   let _ = writeln!(out, "Start by pasting or typing your text...");
    } else
    {   let _ = writeln!(out, "{}", input.text);
    }
    let _ = writeln!(
      out,
      "Creativity (Temperature) {}   Consistency (Top-P) {}",
      input.temperature, input.top_p
    );
    let _ = writeln!(
      out,
      "{} {}   {} words   {}",
      button("Paste", input.can_paste),
      button("Clear", input.can_clear),
      input.word_count,
      button(input.submit_label, input.can_submit)
    );
    if let Some(notice) = &input.notice
    {   let _ = writeln!(out, "! {}", notice);
    }

    let _ = write!(out, "--- Humanized Output ---");
    if let Some(label) = screen.copy_label
    {   let _ = write!(out, " {}", button(label, true));
    }
    let _ = writeln!(out);

    match &screen.output
    {   OutputView::Loading => {
          let _ = writeln!(out, "Crafting the perfect text...");
          let _ = writeln!(out, "This may take a moment.");
        }
      , OutputView::Error { message } => {
          let _ = writeln!(out, "An Error Occurred");
          let _ = writeln!(out, "{}", message);
          let _ = writeln!(out, "{}", button("Retry", true));
        }
      , OutputView::Placeholder => {
          let _ = writeln!(out, "Your humanized text will appear here.");
        }
      , OutputView::Result { text, word_count } => {
          let _ = writeln!(out, "{}", text);
          let _ = writeln!(out, "{} words", word_count);
        }
    }

    let _ = write!(out, "--- {} ---", FOOTER);
    out
}
