//! Terminal chat with the KOS assistant.
//!
//! Needs `KOS_GEMINI_API_KEY`; history lives under the system temp dir for the lifetime of the
//! process. Type `/clear` to start over and an empty line or Ctrl-D to quit.

use std::sync::Arc;

use kos_chatbot::app::{get_default_app_config, initialize_app, FirebaseOptions};
use kos_chatbot::auth::get_auth;
use kos_chatbot::chat::{Chatbot, ChatbotConfig, FileSessionStorage, API_KEY_ENV_VAR};
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ChatbotConfig::from_env()
        .ok_or_else(|| format!("set {API_KEY_ENV_VAR} to a Gemini API key"))?;

    let options = get_default_app_config()
        .unwrap_or_else(|| FirebaseOptions::kos_defaults(config.api_key.clone()));
    let app = initialize_app(options, None)?;
    let auth = get_auth(&app)?;

    let session_dir = std::env::temp_dir().join(format!("kos-chat-{}", std::process::id()));
    let chatbot = Chatbot::builder(config)
        .with_storage(Arc::new(FileSessionStorage::new(&session_dir)))
        .with_auth(auth)
        .build()?;

    for message in chatbot.messages() {
        print_message(message.is_bot(), &message.text);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if line == "/clear" {
            chatbot.clear()?;
            println!("(conversation cleared)");
            continue;
        }

        let reply = chatbot.send_message(line).await?;
        print_message(true, &reply.text);
        for source in &reply.sources {
            println!("    source: {} <{}>", source.title, source.uri);
        }
    }

    let _ = std::fs::remove_dir_all(session_dir);
    Ok(())
}

fn print_message(is_bot: bool, text: &str) {
    let who = if is_bot { "KOS" } else { "you" };
    println!("{who}> {text}");
}
