//! Request contract of the publish proxy

use crate::pinterest::PinData;
use serde::{Deserialize, Serialize};

/// Body accepted by the proxy endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin_data: Option<PinData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_id: Option<String>,
}

/// Actions the proxy relays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyAction {
    GetBoards,
    CreatePin,
}

impl ProxyAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ProxyAction::GetBoards => "get_boards",
            ProxyAction::CreatePin => "create_pin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "get_boards" => Some(ProxyAction::GetBoards),
            "create_pin" => Some(ProxyAction::CreatePin),
            _ => None,
        }
    }
}

impl ProxyRequest {
    /// A `get_boards` request
    pub fn get_boards(access_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            action: Some(ProxyAction::GetBoards.as_str().to_string()),
            ..Default::default()
        }
    }

    /// A `create_pin` request
    pub fn create_pin(
        access_token: impl Into<String>,
        board_id: impl Into<String>,
        pin_data: PinData,
    ) -> Self {
        Self {
            access_token: Some(access_token.into()),
            action: Some(ProxyAction::CreatePin.as_str().to_string()),
            pin_data: Some(pin_data),
            board_id: Some(board_id.into()),
        }
    }
}
