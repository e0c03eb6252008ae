//! # Framing
//!
//! Length-prefixed frames and the subscription commands a subscriber sends
//! upstream to its publishers.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::TransportError;
use crate::MAX_FRAME_LEN;

const SUBSCRIBE_TAG: u8 = 1;
const UNSUBSCRIBE_TAG: u8 = 0;

/// Write one frame and flush it.
pub async fn write_frame<W>(writer: &mut W, body: &[u8]) -> Result<(), TransportError>
where
    W: AsyncWrite + Unpin,
{
    if body.len() > MAX_FRAME_LEN {
        return Err(TransportError::FrameTooLarge(body.len()));
    }
    let len = u32::try_from(body.len()).map_err(|_| TransportError::FrameTooLarge(body.len()))?;
    writer.write_all(&len.to_be_bytes()).await?;
    writer.write_all(body).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one frame.
///
/// Returns `Ok(None)` when the peer closed the connection cleanly at a
/// frame boundary.
pub async fn read_frame<R>(reader: &mut R) -> Result<Option<Vec<u8>>, TransportError>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; 4];
    match reader.read_exact(&mut header).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    }

    let len = u32::from_be_bytes(header) as usize;
    if len > MAX_FRAME_LEN {
        return Err(TransportError::FrameTooLarge(len));
    }

    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).await?;
    Ok(Some(body))
}

/// Filter change sent from a subscriber to a publisher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionCommand {
    /// Start receiving messages starting with this prefix.
    Subscribe(String),
    /// Stop receiving messages starting with this prefix.
    Unsubscribe(String),
}

impl SubscriptionCommand {
    /// One tag byte followed by the UTF-8 prefix.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let (tag, prefix) = match self {
            Self::Subscribe(p) => (SUBSCRIBE_TAG, p),
            Self::Unsubscribe(p) => (UNSUBSCRIBE_TAG, p),
        };
        let mut out = Vec::with_capacity(1 + prefix.len());
        out.push(tag);
        out.extend_from_slice(prefix.as_bytes());
        out
    }

    /// Inverse of [`Self::encode`]; `None` for an unknown tag or bad UTF-8.
    #[must_use]
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        let (&tag, rest) = bytes.split_first()?;
        let prefix = std::str::from_utf8(rest).ok()?.to_string();
        match tag {
            SUBSCRIBE_TAG => Some(Self::Subscribe(prefix)),
            UNSUBSCRIBE_TAG => Some(Self::Unsubscribe(prefix)),
            _ => None,
        }
    }
}
