use std::io;

use hickory_proto::error::ProtoError;
use thiserror::Error;

// every variant is terminal for one datagram and nothing else
// causes are folded into the message, none of them is exposed as source()
#[derive(Error, Debug)]
pub enum Error {
	#[error("malformed message: {0}")]
	Decode(ProtoError),

	#[error("no question in message")]
	EmptyQuestion,

	#[error("no record for {0}")]
	LookupMiss(String),

	#[error("failed to encode response: {0}")]
	Encode(ProtoError),

	#[error("udp send error: {0}")]
	Send(io::Error),
}
