use std::sync::Arc;
use log::{debug, error, info};
use tokio::io::{AsyncBufReadExt, BufReader};

use humanizer::terminal::{self, Command};
use humanizer::{
  GeminiClient, HumanizerConfig, Session, SessionOptions, SystemClipboard,
};

#[tokio::main]
async fn main()
{   env_logger::init();

    let config = match HumanizerConfig::from_env()
    {   Ok(config) => config
      , Err(e) => {
          error!("Startup failed: {}", e);
          eprintln!("{}", e);
          std::process::exit(1);
        }
    };

    let client = match GeminiClient::new(&config)
    {   Ok(client) => client
      , Err(e) => {
          error!("Startup failed: {}", e);
          eprintln!("{}", e);
          std::process::exit(1);
        }
    };
    info!("Using model {}", client.model());

    let (session, mut screens) = Session::new(
      Arc::new(client),
      Arc::new(SystemClipboard::detect()),
      SessionOptions::from_config(&config)
    );

    let printer = tokio::spawn(async move {
      while let Some(screen) = screens.recv().await
      {   println!("\n{}", terminal::render(&screen));
      }
    });

    println!("{}", terminal::HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop
    { let line = match lines.next_line().await
      {   Ok(Some(line)) => line
        , Ok(None) => break
        , Err(e) => {
            error!("Failed to read stdin: {}", e);
            break;
          }
      };

      match terminal::parse_line(&line)
      {   Command::Event(event) => {
            if session.send(event).is_err()
            {   break;
            }
          }
        , Command::Help => println!("{}", terminal::HELP)
        , Command::Invalid(reason) => println!("{}", reason)
        , Command::Quit => break
      }
    }

    debug!("Leaving terminal loop");
    if let Err(e) = session.shutdown().await
    {   error!("Session shutdown failed: {}", e);
    }
    let _ = printer.await;
}
