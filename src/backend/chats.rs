//! Chat endpoints. Chats and messages carry their aliases as serde
//! attributes, so these payloads go through `serde_json` after the envelope
//! check.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::{
    domain::{chat::Chat, message::Message},
    usecases::{
        contracts::SourceError, list_chats::ChatsSource, load_messages::MessagesSource,
        mark_read::ReadReceipts, send_message::MessageSender,
    },
};

use super::{
    client::{ApiClient, ApiRequest},
    error::ApiError,
    lenient::{check_error_envelope, decode_list, DecodeError},
};

fn typed<T: DeserializeOwned>(expected: &'static str) -> impl Fn(&Value) -> Result<T, DecodeError> {
    move |value| {
        check_error_envelope(value)?;
        T::deserialize(value).map_err(|error| {
            tracing::debug!(expected, error = %error, "payload did not match model");
            DecodeError::Shape {
                expected,
                found: "incompatible payload",
            }
        })
    }
}

impl ApiClient {
    pub async fn fetch_chats(&self, project_id: Option<&str>) -> Result<Vec<Chat>, ApiError> {
        let mut request = ApiRequest::get("/chats");
        if let Some(project_id) = project_id {
            request = request.query("project_id", project_id);
        }

        let value = self.send(request).await?;
        Ok(decode_list(&value, typed::<Chat>("chat"))?)
    }

    pub async fn fetch_chat(&self, chat_id: &str) -> Result<Chat, ApiError> {
        let value = self.send(ApiRequest::get(format!("/chats/{chat_id}"))).await?;
        Ok(typed::<Chat>("chat")(&value)?)
    }

    pub async fn fetch_messages(&self, chat_id: &str, limit: usize) -> Result<Vec<Message>, ApiError> {
        let request = ApiRequest::get(format!("/chats/{chat_id}/messages")).query("limit", limit.to_string());

        let value = self.send(request).await?;
        Ok(decode_list(&value, typed::<Message>("message"))?)
    }

    pub async fn post_message(
        &self,
        chat_id: &str,
        text: &str,
        from_specialist: bool,
    ) -> Result<Message, ApiError> {
        let request = ApiRequest::post(
            format!("/chats/{chat_id}/messages"),
            json!({ "text": text, "isFromSpecialist": from_specialist }),
        );

        let value = self.send(request).await?;
        Ok(typed::<Message>("message")(&value)?)
    }

    pub async fn post_read(&self, chat_id: &str) -> Result<(), ApiError> {
        let value = self
            .send(ApiRequest::post(format!("/chats/{chat_id}/read"), json!({})))
            .await?;
        check_error_envelope(&value)?;
        Ok(())
    }
}

#[async_trait]
impl ChatsSource for ApiClient {
    async fn list_chats(&self, project_id: Option<&str>) -> Result<Vec<Chat>, SourceError> {
        Ok(self.fetch_chats(project_id).await?)
    }
}

#[async_trait]
impl MessagesSource for ApiClient {
    async fn chat(&self, chat_id: &str) -> Result<Chat, SourceError> {
        Ok(self.fetch_chat(chat_id).await?)
    }

    async fn messages(&self, chat_id: &str, limit: usize) -> Result<Vec<Message>, SourceError> {
        Ok(self.fetch_messages(chat_id, limit).await?)
    }
}

#[async_trait]
impl MessageSender for ApiClient {
    async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        from_specialist: bool,
    ) -> Result<Message, SourceError> {
        Ok(self.post_message(chat_id, text, from_specialist).await?)
    }
}

#[async_trait]
impl ReadReceipts for ApiClient {
    async fn mark_as_read(&self, chat_id: &str) -> Result<(), SourceError> {
        Ok(self.post_read(chat_id).await?)
    }
}
