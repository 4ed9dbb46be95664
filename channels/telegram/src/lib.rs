use async_trait::async_trait;
use common::notify::{Notifier, NotifyError};
use teloxide::prelude::*;
use teloxide::types::{ChatId, Recipient};
use tracing::info;

/// Sends plain-text messages to one fixed Telegram chat.
pub struct TelegramNotifier {
    bot: Bot,
    recipient: Recipient,
}

impl TelegramNotifier {
    pub fn new(token: &str, chat_id: &str) -> Self {
        Self {
            bot: Bot::new(token),
            recipient: parse_recipient(chat_id),
        }
    }
}

/// Numeric ids address users and groups; anything else is treated as `@channel`.
fn parse_recipient(chat_id: &str) -> Recipient {
    let chat_id = chat_id.trim();
    match chat_id.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) => Recipient::ChannelUsername(chat_id.to_string()),
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn deliver(&self, text: &str) -> Result<(), NotifyError> {
        self.bot
            .send_message(self.recipient.clone(), text)
            .await
            .map_err(|e| NotifyError(e.to_string()))?;
        info!("Message sent to Telegram");
        Ok(())
    }
}
