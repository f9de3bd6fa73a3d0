//! Backend plumbing: HTTP client, chat endpoint contract, logging.

pub mod endpoint;
pub mod http;
pub mod logging;

pub use endpoint::{
    CHAT_MESSAGE_PATH, ChatEndpoint, ChatReply, ChatRequest, EndpointConfig, HttpChatEndpoint,
};
