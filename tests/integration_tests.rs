use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

use humanizer::error::{EMPTY_INPUT_MESSAGE, GENERATION_FAILED_MESSAGE};
use humanizer::view::PASTE_FAILED_MESSAGE;
use humanizer::{
  Clipboard, Error, Event, Humanize, HumanizeRequest, OutputView, Screen,
  Session, SessionOptions,
};

/// Humanizer that replays scripted replies, each after its own delay
struct ScriptedHumanizer
{   replies: Mutex<Vec<(Duration, Result<String, Error>)>>
  , calls: Mutex<Vec<HumanizeRequest>>
}

impl ScriptedHumanizer
{   fn new(replies: Vec<(Duration, Result<String, Error>)>) -> Arc<Self>
    {   Arc::new(ScriptedHumanizer
        {   replies: Mutex::new(replies)
          , calls: Mutex::new(Vec::new())
        })
    }

    fn immediate(replies: Vec<Result<String, Error>>) -> Arc<Self>
    {   Self::new(
          replies.into_iter().map(|r| (Duration::ZERO, r)).collect()
        )
    }

    fn calls(&self) -> Vec<HumanizeRequest>
    {   self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Humanize for ScriptedHumanizer
{   async fn humanize(
      &self
    , request: &HumanizeRequest
    ) -> Result<String, Error>
    {   self.calls.lock().unwrap().push(request.clone());
        let (delay, reply) =
        {   let mut queue = self.replies.lock().unwrap();
            if queue.is_empty()
            {   (Duration::ZERO, Err(Error::Other("script exhausted".into())))
            } else
            {   queue.remove(0)
            }
        };
        tokio::time::sleep(delay).await;
        reply
    }
}

/// In-memory clipboard; optionally broken
struct MemoryClipboard
{   contents: Mutex<Option<String>>
  , broken: bool
}

impl MemoryClipboard
{   fn holding(text: Option<&str>) -> Arc<Self>
    {   Arc::new(MemoryClipboard
        {   contents: Mutex::new(text.map(str::to_string))
          , broken: false
        })
    }

    fn broken() -> Arc<Self>
    {   Arc::new(MemoryClipboard
        {   contents: Mutex::new(None)
          , broken: true
        })
    }

    fn contents(&self) -> Option<String>
    {   self.contents.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard
{   async fn read_text(&self) -> Result<String, Error>
    {   if self.broken
        {   return Err(Error::ClipboardError("denied".to_string()));
        }
        Ok(self.contents().unwrap_or_default())
    }

    async fn write_text(&self, text: &str) -> Result<(), Error>
    {   if self.broken
        {   return Err(Error::ClipboardError("denied".to_string()));
        }
        *self.contents.lock().unwrap() = Some(text.to_string());
        Ok(())
    }
}

fn start(
  humanizer: Arc<ScriptedHumanizer>
, clipboard: Arc<MemoryClipboard>
) -> (Session, mpsc::UnboundedReceiver<Screen>)
{   let options = SessionOptions
    {   copy_feedback: Duration::from_millis(100)
      , ..SessionOptions::default()
    };
    Session::new(humanizer, clipboard, options)
}

/// Next published screen satisfying `pred`
async fn wait_for<F>(
  screens: &mut mpsc::UnboundedReceiver<Screen>
, pred: F
) -> Screen
  where F: Fn(&Screen) -> bool
{   let search = async {
      while let Some(screen) = screens.recv().await
      {   if pred(&screen)
          {   return screen;
          }
      }
      panic!("screen stream ended");
    };
    tokio::time::timeout(Duration::from_secs(5), search)
      .await
      .expect("timed out waiting for screen")
}

fn is_result(screen: &Screen) -> bool
{   matches!(screen.output, OutputView::Result { .. })
}

fn is_error(screen: &Screen) -> bool
{   matches!(screen.output, OutputView::Error { .. })
}

#[tokio::test]
async fn test_whitespace_submit_never_calls_the_client()
{   let humanizer = ScriptedHumanizer::immediate(vec![]);
    let (session, mut screens)
      = start(humanizer.clone(), MemoryClipboard::holding(None));

    tokio_test::assert_ok!(session.send(Event::EditInput("  ".to_string())));
    tokio_test::assert_ok!(session.send(Event::Submit));

    let screen = wait_for(&mut screens, is_error).await;
    assert_eq!(
      screen.output,
      OutputView::Error { message: EMPTY_INPUT_MESSAGE.to_string() }
    );
    assert!(humanizer.calls().is_empty());

    tokio_test::assert_ok!(session.shutdown().await);
}

#[tokio::test]
async fn test_successful_call_shows_result_and_word_count()
{   let humanizer = ScriptedHumanizer::immediate(vec![
      Ok("Cats love mats.".to_string())
    ]);
    let (session, mut screens)
      = start(humanizer.clone(), MemoryClipboard::holding(None));

    session.send(Event::EditInput("The cat sat on the mat.".to_string()))
      .unwrap();
    session.send(Event::Submit).unwrap();

    wait_for(&mut screens, |s| s.output == OutputView::Loading).await;
    let screen = wait_for(&mut screens, is_result).await;
    assert_eq!(
      screen.output,
      OutputView::Result
      {   text: "Cats love mats.".to_string()
        , word_count: 3
      }
    );
    assert_eq!(screen.copy_label, Some("Copy"));

    let calls = humanizer.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].text, "The cat sat on the mat.");
    assert!((calls[0].sampling.temperature - 0.8).abs() < 1e-6);
    assert!((calls[0].sampling.top_p - 0.9).abs() < 1e-6);

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_any_failure_shows_generic_message_and_retry_resends()
{   let humanizer = ScriptedHumanizer::immediate(vec![
      Err(Error::HttpError("connection reset".to_string()))
    , Err(Error::ApiError { status: 401, message: "bad key".to_string() })
    ]);
    let (session, mut screens)
      = start(humanizer.clone(), MemoryClipboard::holding(None));

    session.send(Event::EditInput("Rewrite me.".to_string())).unwrap();
    session.send(Event::Submit).unwrap();

    let screen = wait_for(&mut screens, is_error).await;
    assert_eq!(
      screen.output,
      OutputView::Error { message: GENERATION_FAILED_MESSAGE.to_string() }
    );
    assert!(screen.output.can_retry());

    session.send(Event::Retry).unwrap();
    wait_for(&mut screens, |s| s.output == OutputView::Loading).await;
    let screen = wait_for(&mut screens, is_error).await;
    assert!(screen.output.is_generation_failure());

    let calls = humanizer.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], calls[1]);

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_copy_writes_result_and_label_reverts()
{   let clipboard = MemoryClipboard::holding(None);
    let humanizer = ScriptedHumanizer::immediate(vec![
      Ok("Cats love mats.".to_string())
    ]);
    let (session, mut screens) = start(humanizer, clipboard.clone());

    session.send(Event::EditInput("The cat sat on the mat.".to_string()))
      .unwrap();
    session.send(Event::Submit).unwrap();
    wait_for(&mut screens, is_result).await;

    session.send(Event::Copy).unwrap();
    wait_for(&mut screens, |s| s.copy_label == Some("Copied!")).await;
    assert_eq!(clipboard.contents().as_deref(), Some("Cats love mats."));

    let reverted
      = wait_for(&mut screens, |s| s.copy_label == Some("Copy")).await;
    assert!(is_result(&reverted));

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_paste_fills_input_and_failure_is_a_notice()
{   let (session, mut screens) = start(
      ScriptedHumanizer::immediate(vec![]),
      MemoryClipboard::holding(Some("from the clipboard"))
    );
    session.send(Event::Paste).unwrap();
    let screen = wait_for(
      &mut screens,
      |s| s.input.text == "from the clipboard"
    ).await;
    assert_eq!(screen.input.word_count, 3);
    session.shutdown().await.unwrap();

    let (session, mut screens) = start(
      ScriptedHumanizer::immediate(vec![]),
      MemoryClipboard::broken()
    );
    session.send(Event::Paste).unwrap();
    let screen = wait_for(&mut screens, |s| s.input.notice.is_some()).await;
    assert_eq!(screen.input.notice.as_deref(), Some(PASTE_FAILED_MESSAGE));
    assert_eq!(screen.output, OutputView::Placeholder);
    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_superseded_call_never_overwrites_newer_result()
{   let humanizer = ScriptedHumanizer::new(vec![
      (Duration::from_millis(300), Ok("old answer".to_string()))
    , (Duration::ZERO, Ok("new answer".to_string()))
    ]);
    let (session, mut screens)
      = start(humanizer.clone(), MemoryClipboard::holding(None));

    session.send(Event::EditInput("first".to_string())).unwrap();
    session.send(Event::Submit).unwrap();
    wait_for(&mut screens, |s| s.output == OutputView::Loading).await;

    session.send(Event::Clear).unwrap();
    session.send(Event::EditInput("second".to_string())).unwrap();
    session.send(Event::Submit).unwrap();

    let screen = wait_for(&mut screens, is_result).await;
    assert_eq!(
      screen.output,
      OutputView::Result
      {   text: "new answer".to_string()
        , word_count: 2
      }
    );

    tokio::time::sleep(Duration::from_millis(500)).await;
    while let Ok(late) = screens.try_recv()
    {   assert_ne!(
          late.output,
          OutputView::Result
          {   text: "old answer".to_string()
            , word_count: 2
          }
        );
    }
    assert_eq!(humanizer.calls().len(), 2);

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_clear_resets_everything()
{   let humanizer = ScriptedHumanizer::immediate(vec![
      Ok("done".to_string())
    ]);
    let (session, mut screens)
      = start(humanizer, MemoryClipboard::holding(None));

    session.send(Event::EditInput("some text".to_string())).unwrap();
    session.send(Event::Submit).unwrap();
    wait_for(&mut screens, is_result).await;

    session.send(Event::Clear).unwrap();
    let screen = wait_for(
      &mut screens,
      |s| s.output == OutputView::Placeholder
    ).await;
    assert_eq!(screen.input.text, "");
    assert_eq!(screen.input.notice, None);
    assert_eq!(screen.copy_label, None);

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_session_initialization()
{   let (session, mut screens) = start(
      ScriptedHumanizer::immediate(vec![]),
      MemoryClipboard::holding(None)
    );
    let first = wait_for(&mut screens, |_| true).await;
    assert_eq!(first.output, OutputView::Placeholder);
    assert_eq!(first.input.temperature, "0.80");
    assert_eq!(first.input.top_p, "0.90");
    assert!(!first.input.can_submit);

    tokio_test::assert_ok!(session.shutdown().await);
}
