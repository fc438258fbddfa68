//! HTTP transport envelope.
//!
//! Consensus messages travel as JSON bodies POSTed to `/pacemaker`:
//! `{"peer_ip": "...", "peer_port": "...", "message": "<hex>"}`. The
//! payload is the hex encoding of the opaque consensus message bytes.

use crate::error::MessageError;
use crate::MAX_MSG_SIZE;
use serde::{Deserialize, Serialize};
use volta_types::NetAddress;

/// The `/pacemaker` request body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportEnvelope {
    pub peer_ip: String,
    pub peer_port: String,
    pub message: String,
}

impl TransportEnvelope {
    /// Wrap an encoded consensus message, stamping the sender's address.
    pub fn wrap(sender: &NetAddress, message: &[u8]) -> Result<Self, MessageError> {
        if message.len() > MAX_MSG_SIZE {
            return Err(MessageError::TooLarge {
                size: message.len(),
                max: MAX_MSG_SIZE,
            });
        }
        Ok(Self {
            peer_ip: sender.ip.to_string(),
            peer_port: sender.port.to_string(),
            message: hex::encode(message),
        })
    }

    /// Recover the sender address and the opaque message bytes.
    pub fn unwrap(&self) -> Result<(NetAddress, Vec<u8>), MessageError> {
        let ip = self
            .peer_ip
            .parse()
            .map_err(|_| MessageError::BadEnvelope(format!("peer_ip {:?}", self.peer_ip)))?;
        // A malformed port degrades to 0, matching the tolerant peer parse.
        let port: u16 = self.peer_port.parse().unwrap_or(0);
        let bytes = hex::decode(&self.message)
            .map_err(|e| MessageError::BadEnvelope(format!("message hex: {e}")))?;
        if bytes.len() > MAX_MSG_SIZE {
            return Err(MessageError::TooLarge {
                size: bytes.len(),
                max: MAX_MSG_SIZE,
            });
        }
        Ok((NetAddress::new(ip, port), bytes))
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("envelope is always encodable")
    }

    pub fn from_json(raw: &str) -> Result<Self, MessageError> {
        serde_json::from_str(raw).map_err(|e| MessageError::BadEnvelope(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_unwrap_roundtrip() {
        let sender = NetAddress::v4(192, 168, 1, 7, 8670);
        let payload = vec![1u8, 2, 3, 0xFF];
        let env = TransportEnvelope::wrap(&sender, &payload).unwrap();
        let (addr, bytes) = env.unwrap().unwrap();
        assert_eq!(addr, sender);
        assert_eq!(bytes, payload);
    }

    #[test]
    fn json_roundtrip() {
        let sender = NetAddress::v4(10, 1, 2, 3, 9000);
        let env = TransportEnvelope::wrap(&sender, b"hello").unwrap();
        let parsed = TransportEnvelope::from_json(&env.to_json()).unwrap();
        assert_eq!(parsed, env);
    }

    #[test]
    fn bad_port_degrades_to_zero() {
        let env = TransportEnvelope {
            peer_ip: "10.0.0.1".into(),
            peer_port: "not-a-port".into(),
            message: hex::encode(b"x"),
        };
        let (addr, _) = env.unwrap().unwrap();
        assert_eq!(addr.port, 0);
    }

    #[test]
    fn bad_ip_rejected() {
        let env = TransportEnvelope {
            peer_ip: "nope".into(),
            peer_port: "1".into(),
            message: String::new(),
        };
        assert!(env.unwrap().is_err());
    }

    #[test]
    fn bad_hex_rejected() {
        let env = TransportEnvelope {
            peer_ip: "10.0.0.1".into(),
            peer_port: "1".into(),
            message: "zz".into(),
        };
        assert!(env.unwrap().is_err());
    }

    #[test]
    fn bad_json_rejected() {
        assert!(TransportEnvelope::from_json("{").is_err());
    }
}
