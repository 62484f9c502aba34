//! Engine.IO v4 / Socket.IO v5 packet codec
//!
//! Engine.IO frames carry a one-digit type followed by data; a polling
//! response concatenates several frames separated by `0x1e`. A Socket.IO
//! packet rides inside an Engine.IO `message` (type `4`) frame:
//!
//! ```text
//! <type>[<attachments>-][<namespace>,][<ack id>][<json>]
//! 42/board,["card.new",{"id":3,...}]
//! ```

use crate::shared::error::SharedError;
use serde::Deserialize;
use serde_json::Value;

/// Record separator between frames of a polling payload
pub const RECORD_SEPARATOR: char = '\x1e';

/// Body of the Engine.IO `open` frame
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    pub sid: String,
    #[serde(default)]
    pub upgrades: Vec<String>,
    pub ping_interval: u64,
    pub ping_timeout: u64,
    #[serde(default)]
    pub max_payload: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnginePacket {
    Open(Handshake),
    Close,
    Ping,
    Pong,
    Message(String),
    Upgrade,
    Noop,
}

impl EnginePacket {
    pub fn decode(frame: &str) -> Result<Self, SharedError> {
        let mut chars = frame.chars();
        let kind = chars
            .next()
            .ok_or_else(|| SharedError::protocol("empty Engine.IO frame"))?;
        let data = chars.as_str();
        match kind {
            '0' => Ok(EnginePacket::Open(serde_json::from_str(data)?)),
            '1' => Ok(EnginePacket::Close),
            '2' => Ok(EnginePacket::Ping),
            '3' => Ok(EnginePacket::Pong),
            '4' => Ok(EnginePacket::Message(data.to_string())),
            '5' => Ok(EnginePacket::Upgrade),
            '6' => Ok(EnginePacket::Noop),
            'b' => Err(SharedError::protocol("binary Engine.IO frames are not supported")),
            other => Err(SharedError::protocol(format!(
                "unknown Engine.IO packet type '{}'",
                other
            ))),
        }
    }

    /// Client-to-server frames only carry text
    pub fn encode(&self) -> String {
        match self {
            EnginePacket::Open(_) => "0".to_string(),
            EnginePacket::Close => "1".to_string(),
            EnginePacket::Ping => "2".to_string(),
            EnginePacket::Pong => "3".to_string(),
            EnginePacket::Message(data) => format!("4{}", data),
            EnginePacket::Upgrade => "5".to_string(),
            EnginePacket::Noop => "6".to_string(),
        }
    }
}

/// Split a polling response into frames
pub fn decode_payload(body: &str) -> Vec<Result<EnginePacket, SharedError>> {
    body.split(RECORD_SEPARATOR)
        .filter(|frame| !frame.is_empty())
        .map(EnginePacket::decode)
        .collect()
}

pub fn encode_payload(packets: &[EnginePacket]) -> String {
    packets
        .iter()
        .map(EnginePacket::encode)
        .collect::<Vec<_>>()
        .join(&RECORD_SEPARATOR.to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    Connect {
        namespace: String,
        data: Option<Value>,
    },
    Disconnect {
        namespace: String,
    },
    Event {
        namespace: String,
        ack_id: Option<u64>,
        name: String,
        payload: Value,
    },
    Ack {
        namespace: String,
        ack_id: u64,
        data: Value,
    },
    ConnectError {
        namespace: String,
        data: Value,
    },
    /// Binary events and acks; their attachments are not fetched
    Binary {
        namespace: String,
    },
}

impl SocketPacket {
    pub fn connect(namespace: &str) -> Self {
        SocketPacket::Connect {
            namespace: namespace.to_string(),
            data: None,
        }
    }

    pub fn event(namespace: &str, name: &str, payload: Value) -> Self {
        SocketPacket::Event {
            namespace: namespace.to_string(),
            ack_id: None,
            name: name.to_string(),
            payload,
        }
    }

    pub fn namespace(&self) -> &str {
        match self {
            SocketPacket::Connect { namespace, .. }
            | SocketPacket::Disconnect { namespace }
            | SocketPacket::Event { namespace, .. }
            | SocketPacket::Ack { namespace, .. }
            | SocketPacket::ConnectError { namespace, .. }
            | SocketPacket::Binary { namespace } => namespace,
        }
    }

    pub fn decode(data: &str) -> Result<Self, SharedError> {
        let mut chars = data.chars();
        let kind = chars
            .next()
            .ok_or_else(|| SharedError::protocol("empty Socket.IO packet"))?;
        let mut rest = chars.as_str();

        if matches!(kind, '5' | '6') {
            // "<attachments>-" precedes the namespace
            rest = rest.split_once('-').map(|(_, tail)| tail).unwrap_or(rest);
        }

        let (namespace, rest) = if rest.starts_with('/') {
            match rest.split_once(',') {
                Some((namespace, tail)) => (namespace.to_string(), tail),
                None => (rest.to_string(), ""),
            }
        } else {
            ("/".to_string(), rest)
        };

        let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
        let ack_id = if digits > 0 {
            rest[..digits].parse::<u64>().ok()
        } else {
            None
        };
        let body = &rest[digits..];
        let json = || -> Result<Value, SharedError> {
            if body.is_empty() {
                Ok(Value::Null)
            } else {
                Ok(serde_json::from_str(body)?)
            }
        };

        match kind {
            '0' => Ok(SocketPacket::Connect {
                namespace,
                data: Some(json()?).filter(|value| !value.is_null()),
            }),
            '1' => Ok(SocketPacket::Disconnect { namespace }),
            '2' => {
                let (name, payload) = split_event(json()?)?;
                Ok(SocketPacket::Event {
                    namespace,
                    ack_id,
                    name,
                    payload,
                })
            }
            '3' => Ok(SocketPacket::Ack {
                namespace,
                ack_id: ack_id.ok_or_else(|| SharedError::protocol("ack without id"))?,
                data: json()?,
            }),
            '4' => Ok(SocketPacket::ConnectError {
                namespace,
                data: json()?,
            }),
            '5' | '6' => Ok(SocketPacket::Binary { namespace }),
            other => Err(SharedError::protocol(format!(
                "unknown Socket.IO packet type '{}'",
                other
            ))),
        }
    }

    pub fn encode(&self) -> String {
        let prefix = |kind: u8, namespace: &str| {
            if namespace == "/" {
                kind.to_string()
            } else {
                format!("{}{},", kind, namespace)
            }
        };
        match self {
            SocketPacket::Connect { namespace, data } => {
                let mut out = prefix(0, namespace);
                if let Some(data) = data {
                    out.push_str(&data.to_string());
                }
                out
            }
            SocketPacket::Disconnect { namespace } => prefix(1, namespace),
            SocketPacket::Event {
                namespace,
                ack_id,
                name,
                payload,
            } => {
                let mut out = prefix(2, namespace);
                if let Some(id) = ack_id {
                    out.push_str(&id.to_string());
                }
                out.push_str(&Value::Array(vec![Value::String(name.clone()), payload.clone()]).to_string());
                out
            }
            SocketPacket::Ack {
                namespace,
                ack_id,
                data,
            } => format!("{}{}{}", prefix(3, namespace), ack_id, data),
            SocketPacket::ConnectError { namespace, data } => {
                format!("{}{}", prefix(4, namespace), data)
            }
            SocketPacket::Binary { namespace } => prefix(5, namespace),
        }
    }
}

/// `["name", payload, ...]` into its name and first argument
fn split_event(value: Value) -> Result<(String, Value), SharedError> {
    let Value::Array(mut args) = value else {
        return Err(SharedError::protocol("event data is not an array"));
    };
    if args.is_empty() {
        return Err(SharedError::protocol("event without a name"));
    }
    let name = match args.remove(0) {
        Value::String(name) => name,
        _ => return Err(SharedError::protocol("event name is not a string")),
    };
    let payload = if args.is_empty() {
        Value::Null
    } else {
        args.swap_remove(0)
    };
    Ok((name, payload))
}
