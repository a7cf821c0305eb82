//! Relay channel names and payload shapes
//! These are the wire types exchanged between host and joiner

use serde::{Deserialize, Serialize};

use crate::game::body::{Actions, Body, WireBody};
use crate::game::world::World;

/// Named relay channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// joiner → relay
    ClientPayload,
    /// relay → host
    ClientPayloadFromServer,
    /// host → relay
    HostPayload,
    /// relay → joiner
    HostPayloadFromServer,
}

impl Channel {
    pub fn event_name(self) -> &'static str {
        match self {
            Channel::ClientPayload => "Client payload",
            Channel::ClientPayloadFromServer => "Client payload from server",
            Channel::HostPayload => "Host payload",
            Channel::HostPayloadFromServer => "Host payload from server",
        }
    }

    /// Channel the relay delivers an outbound event on, if it is outbound
    pub fn relayed(self) -> Option<Channel> {
        match self {
            Channel::ClientPayload => Some(Channel::ClientPayloadFromServer),
            Channel::HostPayload => Some(Channel::HostPayloadFromServer),
            Channel::ClientPayloadFromServer | Channel::HostPayloadFromServer => None,
        }
    }
}

/// A single value or a list of them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

/// Joiner → host payload: a debris spawn request or the joiner's actions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debris: Option<OneOrMany<WireBody>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<Actions>>,
}

impl ClientPayload {
    pub fn actions(actions: Actions) -> Self {
        Self {
            debris: None,
            actions: Some(vec![actions]),
        }
    }

    pub fn debris(body: &Body) -> Self {
        Self {
            debris: Some(OneOrMany::One(WireBody::from(body))),
            actions: None,
        }
    }
}

/// Host → joiner payload: the whole authoritative body set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostPayload {
    pub all_objects: Vec<WireBody>,
}

impl HostPayload {
    pub fn from_world(world: &World) -> Self {
        Self {
            all_objects: world.bodies().iter().map(WireBody::from).collect(),
        }
    }
}

/// Protocol encoding errors
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("malformed {channel} payload: {source}")]
    Malformed {
        channel: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}

pub fn encode<T: Serialize>(payload: &T) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(payload)?)
}

pub fn decode<'a, T: Deserialize<'a>>(channel: Channel, text: &'a str) -> Result<T, ProtocolError> {
    serde_json::from_str(text).map_err(|source| ProtocolError::Malformed {
        channel: channel.event_name(),
        source,
    })
}
