//! Minimal OSC 1.0 client for the chatbox input address.
//!
//! Only the argument types the chatbox needs are encoded: strings and the
//! `T`/`F` booleans (which carry no payload).

use std::net::UdpSocket;

use crate::core::status::{Endpoint, MessageSink};
use crate::error::{ChatlineError, Result};

pub const CHATBOX_ADDRESS: &str = "/chatbox/input";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OscArg {
    Str(String),
    Bool(bool),
}

impl OscArg {
    fn type_tag(&self) -> char {
        match self {
            OscArg::Str(_) => 's',
            OscArg::Bool(true) => 'T',
            OscArg::Bool(false) => 'F',
        }
    }
}

/// Encode an OSC message: padded address, padded type tag string, then payloads
pub fn encode_message(address: &str, args: &[OscArg]) -> Vec<u8> {
    let mut packet = Vec::with_capacity(64);
    push_padded_str(&mut packet, address);

    let tags: String = std::iter::once(',').chain(args.iter().map(OscArg::type_tag)).collect();
    push_padded_str(&mut packet, &tags);

    for arg in args {
        if let OscArg::Str(s) = arg {
            push_padded_str(&mut packet, s);
        }
    }

    packet
}

/// NUL-terminate and pad to a multiple of four bytes
fn push_padded_str(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(s.as_bytes());
    let padding = 4 - (s.len() % 4);
    buf.extend(std::iter::repeat(0u8).take(padding));
}

/// UDP sender bound once to an ephemeral local port
pub struct OscClient {
    socket: UdpSocket,
}

impl OscClient {
    pub fn bind() -> Result<Self> {
        let socket = UdpSocket::bind(("0.0.0.0", 0))
            .map_err(|e| ChatlineError::osc(format!("Failed to bind UDP socket: {}", e)))?;
        Ok(Self { socket })
    }

    pub fn send_message(&self, endpoint: &Endpoint, address: &str, args: &[OscArg]) -> Result<()> {
        let packet = encode_message(address, args);
        self.socket
            .send_to(&packet, (endpoint.host.as_str(), endpoint.port))
            .map_err(|e| ChatlineError::osc(format!("Failed to send to {}: {}", endpoint, e)))?;
        Ok(())
    }
}

impl MessageSink for OscClient {
    /// Send `text` to the chatbox immediately, without the notification sound
    fn send(&self, endpoint: &Endpoint, text: &str) -> Result<()> {
        log::debug!("Sending to {}: {:?}", endpoint, text);
        self.send_message(
            endpoint,
            CHATBOX_ADDRESS,
            &[OscArg::Str(text.to_string()), OscArg::Bool(true), OscArg::Bool(false)],
        )
    }
}
