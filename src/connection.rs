// ABOUTME: Provides TCP connection management for SMPP v3.4 protocol communication
// ABOUTME: Implements frame-based I/O with buffering over a single TcpStream

use crate::codec::{CodecError, Frame};
use bytes::{Buf, BytesMut};
use std::io::{self, Cursor};
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;

/// Frame-level I/O for one SMPP session.
///
/// `Connection` handles the transport layer only. It does not track session
/// state; `DefaultClient` drives it from a single I/O task and decides which
/// PDUs are legal when.
#[derive(Debug)]
pub struct Connection {
    // The `TcpStream`, decorated with a `BufWriter` for write level buffering.
    stream: BufWriter<TcpStream>,

    // The buffer for reading frames.
    buffer: BytesMut,
}

impl Connection {
    /// Create a new `Connection`, backed by `socket`. Read and write buffers
    /// are initialized.
    pub fn new(socket: TcpStream) -> Connection {
        Connection {
            stream: BufWriter::new(socket),
            // SMPP PDUs are small; 4KB holds several submit_sm_resp at once.
            buffer: BytesMut::with_capacity(4 * 1024),
        }
    }

    /// Read a single `Frame` value from the underlying stream.
    ///
    /// The function waits until it has retrieved enough data to parse a frame.
    /// Any data remaining in the read buffer after the frame has been parsed is
    /// kept there for the next call to `read_frame`. Cancelling the returned
    /// future loses no data, so it can sit in a `tokio::select!`.
    ///
    /// # Returns
    ///
    /// On success, the received frame is returned. If the `TcpStream`
    /// is closed in a way that doesn't break a frame in half, it returns
    /// `None`. Otherwise, an error is returned.
    pub async fn read_frame(&mut self) -> crate::Result<Option<Frame>> {
        loop {
            if let Some(frame) = self.parse_frame()? {
                return Ok(Some(frame));
            }

            // `0` indicates "end of stream".
            if 0 == self.stream.read_buf(&mut self.buffer).await? {
                // For this to be a clean shutdown, there should be no data in
                // the read buffer. If there is, the peer closed the socket
                // while sending a frame.
                return self
                    .buffer
                    .is_empty()
                    .then_some(None)
                    .ok_or_else(|| "connection reset by peer".into());
            }
        }
    }

    /// Tries to parse a frame from the buffer. If the buffer contains enough
    /// data, the frame is returned and the data removed from the buffer. If not
    /// enough data has been buffered yet, `Ok(None)` is returned. If the
    /// buffered data does not represent a valid frame, `Err` is returned.
    fn parse_frame(&mut self) -> crate::Result<Option<Frame>> {
        let mut buf = Cursor::new(&self.buffer[..]);

        // Checking is much cheaper than a full parse and lets us skip
        // allocating until the whole frame has arrived.
        match Frame::check(&mut buf) {
            Ok(len) => {
                buf.set_position(0);

                // An invalid frame terminates this connection only.
                let frame = Frame::parse(&mut buf)?;

                self.buffer.advance(len);

                Ok(Some(frame))
            }
            // Not an error: wait for more data from the socket.
            Err(CodecError::Incomplete) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write a single `Frame` value to the underlying stream and flush it.
    pub async fn write_frame(&mut self, frame: &Frame) -> io::Result<()> {
        let bytes = frame
            .to_bytes()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        self.stream.write_all(&bytes).await?;
        self.stream.flush().await
    }

    /// Flush and shut down the write half of the socket.
    pub async fn shutdown(&mut self) -> io::Result<()> {
        self.stream.shutdown().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Encodable;
    use crate::datatypes::{EnquireLink, SubmitSmResponse};
    use tokio::net::TcpListener;

    async fn pair() -> (Connection, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let client = TcpStream::connect(addr).await.unwrap();
        let (server, _) = listener.accept().await.unwrap();
        (Connection::new(client), server)
    }

    #[tokio::test]
    async fn reads_frames_split_across_writes() {
        let (mut conn, mut peer) = pair().await;

        let first = EnquireLink::new(1).to_bytes().unwrap();
        let second = SubmitSmResponse::new(2, 0, "abc").to_bytes().unwrap();
        let mut wire = first.to_vec();
        wire.extend_from_slice(&second);

        peer.write_all(&wire[..20]).await.unwrap();
        let frame = conn.read_frame().await.unwrap().unwrap();
        assert_eq!(frame, Frame::EnquireLink(EnquireLink::new(1)));

        peer.write_all(&wire[20..]).await.unwrap();
        let frame = conn.read_frame().await.unwrap().unwrap();
        assert_eq!(frame, Frame::SubmitSmResp(SubmitSmResponse::new(2, 0, "abc")));
    }

    #[tokio::test]
    async fn clean_eof_returns_none() {
        let (mut conn, peer) = pair().await;
        drop(peer);
        assert!(conn.read_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn eof_mid_frame_is_an_error() {
        let (mut conn, mut peer) = pair().await;
        let bytes = EnquireLink::new(1).to_bytes().unwrap();
        peer.write_all(&bytes[..8]).await.unwrap();
        drop(peer);
        assert!(conn.read_frame().await.is_err());
    }

    #[tokio::test]
    async fn oversized_length_is_rejected() {
        let (mut conn, mut peer) = pair().await;
        let mut header = Vec::new();
        header.extend_from_slice(&0x0100_0000u32.to_be_bytes());
        header.extend_from_slice(&[0u8; 12]);
        peer.write_all(&header).await.unwrap();
        assert!(conn.read_frame().await.is_err());
    }
}
