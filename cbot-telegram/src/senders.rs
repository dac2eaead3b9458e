//! Output senders: one per response kind, each a thin wrapper over a shared
//! teloxide `Bot`. The response router picks the sender by declared kind.

use async_trait::async_trait;
use cbot_core::{
    BotResponse, CbotError, DocumentResponse, KeyboardEditResponse, ResponseKind,
    ResponseSender, Result, TextResponse,
};
use teloxide::payloads::{EditMessageReplyMarkupSetters, SendDocumentSetters, SendMessageSetters};
use teloxide::prelude::*;
use teloxide::types::{
    ChatId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, InputMedia,
    InputMediaDocument, MessageId, ReplyParameters,
};

fn send_error(e: teloxide::RequestError) -> CbotError {
    CbotError::Sender(e.to_string())
}

/// Refuses a response of the wrong shape; the router only hands a sender
/// the kinds it declared, so reaching this is a wiring bug.
fn wrong_kind(kind: ResponseKind) -> CbotError {
    CbotError::Sender(format!("sender received unsupported response kind {}", kind))
}

pub struct TelegramTextSender {
    bot: Bot,
}

impl TelegramTextSender {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    async fn send_text(&self, text: &TextResponse) -> Result<()> {
        let mut request = self.bot.send_message(ChatId(text.chat.id), &text.text);
        if let Some(reply_to) = text.reply_to {
            request = request.reply_parameters(ReplyParameters::new(MessageId(reply_to)));
        }
        request.await.map_err(send_error)?;
        Ok(())
    }
}

#[async_trait]
impl ResponseSender for TelegramTextSender {
    fn kinds(&self) -> &[ResponseKind] {
        &[ResponseKind::Text]
    }

    async fn send(&self, response: &BotResponse) -> Result<()> {
        match response {
            BotResponse::Text(text) => self.send_text(text).await,
            other => Err(wrong_kind(other.kind())),
        }
    }
}

pub struct TelegramDocumentSender {
    bot: Bot,
}

impl TelegramDocumentSender {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    async fn send_document(&self, document: &DocumentResponse) -> Result<()> {
        let file = InputFile::memory(document.bytes.clone()).file_name(document.file_name.clone());
        let mut request = self.bot.send_document(ChatId(document.chat.id), file);
        if let Some(caption) = &document.caption {
            request = request.caption(caption);
        }
        request.await.map_err(send_error)?;
        Ok(())
    }
}

#[async_trait]
impl ResponseSender for TelegramDocumentSender {
    fn kinds(&self) -> &[ResponseKind] {
        &[ResponseKind::Document]
    }

    async fn send(&self, response: &BotResponse) -> Result<()> {
        match response {
            BotResponse::Document(document) => self.send_document(document).await,
            other => Err(wrong_kind(other.kind())),
        }
    }
}

/// Delivers a whole document bundle with one `sendMediaGroup` call.
pub struct TelegramDocumentGroupSender {
    bot: Bot,
}

impl TelegramDocumentGroupSender {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    async fn send_group(&self, documents: &[DocumentResponse]) -> Result<()> {
        let chat = match documents.first() {
            Some(first) => ChatId(first.chat.id),
            None => return Ok(()),
        };
        let media: Vec<InputMedia> = documents
            .iter()
            .map(|document| {
                let file = InputFile::memory(document.bytes.clone())
                    .file_name(document.file_name.clone());
                let mut item = InputMediaDocument::new(file);
                item.caption = document.caption.clone();
                InputMedia::Document(item)
            })
            .collect();
        self.bot
            .send_media_group(chat, media)
            .await
            .map_err(send_error)?;
        Ok(())
    }
}

#[async_trait]
impl ResponseSender for TelegramDocumentGroupSender {
    fn kinds(&self) -> &[ResponseKind] {
        &[ResponseKind::DocumentGroup]
    }

    async fn send(&self, response: &BotResponse) -> Result<()> {
        match response {
            BotResponse::DocumentGroup(documents) => self.send_group(documents).await,
            other => Err(wrong_kind(other.kind())),
        }
    }
}

pub struct TelegramLocationSender {
    bot: Bot,
}

impl TelegramLocationSender {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ResponseSender for TelegramLocationSender {
    fn kinds(&self) -> &[ResponseKind] {
        &[ResponseKind::Location]
    }

    async fn send(&self, response: &BotResponse) -> Result<()> {
        match response {
            BotResponse::Location(location) => {
                self.bot
                    .send_location(
                        ChatId(location.chat.id),
                        location.latitude,
                        location.longitude,
                    )
                    .await
                    .map_err(send_error)?;
                Ok(())
            }
            other => Err(wrong_kind(other.kind())),
        }
    }
}

/// Replaces the inline keyboard on an already-sent message.
pub struct TelegramKeyboardEditSender {
    bot: Bot,
}

impl TelegramKeyboardEditSender {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    async fn edit_keyboard(&self, edit: &KeyboardEditResponse) -> Result<()> {
        let rows = edit.rows.iter().map(|row| {
            row.iter()
                .map(|button| {
                    InlineKeyboardButton::callback(
                        button.label.clone(),
                        button.callback_data.clone(),
                    )
                })
                .collect::<Vec<_>>()
        });
        let markup = InlineKeyboardMarkup::new(rows);
        self.bot
            .edit_message_reply_markup(ChatId(edit.chat.id), MessageId(edit.message_id))
            .reply_markup(markup)
            .await
            .map_err(send_error)?;
        Ok(())
    }
}

#[async_trait]
impl ResponseSender for TelegramKeyboardEditSender {
    fn kinds(&self) -> &[ResponseKind] {
        &[ResponseKind::EditKeyboard]
    }

    async fn send(&self, response: &BotResponse) -> Result<()> {
        match response {
            BotResponse::EditKeyboard(edit) => self.edit_keyboard(edit).await,
            other => Err(wrong_kind(other.kind())),
        }
    }
}
