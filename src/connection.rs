// ABOUTME: Provides TCP connection management for SMPP v3.4 protocol communication
// ABOUTME: Implements frame-based I/O with buffering and a single-reader/single-writer split

use crate::frame::{self, Frame};
use bytes::{Buf, BytesMut};
use std::io::{self, Cursor};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

/// Owns the one TCP socket of a session, from `connect` until it is split
/// into its reader and writer halves.
///
/// The SMPP session has exactly one reader (the receive loop) and one writer
/// (the loop draining the send channel); `into_split` hands each side its
/// half so neither can touch the other's, which is what makes the
/// single-reader/single-writer discipline hold by construction.
#[derive(Debug)]
pub struct Connection {
    socket: TcpStream,
}

impl Connection {
    /// Open a TCP connection to the SMSC, bounded by `timeout`.
    pub async fn connect(host: &str, port: u16, timeout: Duration) -> io::Result<Connection> {
        let socket = tokio::time::timeout(timeout, TcpStream::connect((host, port)))
            .await
            .map_err(|_| {
                io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("connecting to {host}:{port} timed out after {timeout:?}"),
                )
            })??;
        Ok(Connection { socket })
    }

    /// Wrap an already-open socket. Used by tests that stand up an
    /// in-process SMSC.
    pub fn new(socket: TcpStream) -> Connection {
        Connection { socket }
    }

    /// Split into the read half and the write half.
    pub fn into_split(self) -> (FrameReader, FrameWriter) {
        let (read, write) = self.socket.into_split();
        (
            FrameReader {
                stream: read,
                // 4KB covers any PDU this client exchanges; the buffer grows
                // on demand for oversized vendor traffic.
                buffer: BytesMut::with_capacity(4 * 1024),
            },
            FrameWriter {
                stream: BufWriter::new(write),
            },
        )
    }
}

/// The read half: buffers socket bytes and yields whole frames.
#[derive(Debug)]
pub struct FrameReader {
    stream: OwnedReadHalf,
    buffer: BytesMut,
}

impl FrameReader {
    /// Read a single `Frame` from the underlying stream.
    ///
    /// Waits until enough data has arrived to parse a whole frame. Any bytes
    /// remaining in the read buffer afterwards belong to the next frame and
    /// are kept for the next call.
    ///
    /// Returns `None` when the peer closed the connection on a frame
    /// boundary; a close mid-frame is an error.
    pub async fn read_frame(&mut self) -> crate::Result<Option<Frame>> {
        loop {
            // Attempt to parse a frame from the buffered data. If enough data
            // has been buffered, the frame is returned.
            if let Some(frame) = self.parse_frame()? {
                return Ok(Some(frame));
            }

            // Not enough buffered data; read more from the socket. `0` means
            // end of stream.
            if 0 == self.stream.read_buf(&mut self.buffer).await? {
                return self
                    .buffer
                    .is_empty()
                    .then_some(None)
                    .ok_or_else(|| "connection reset by peer mid-frame".into());
            }
        }
    }

    /// Tries to parse a frame from the buffer. `Ok(None)` means more bytes
    /// are needed; `Err` means the buffered data is not a valid frame and
    /// the connection must be torn down.
    fn parse_frame(&mut self) -> crate::Result<Option<Frame>> {
        let mut buf = Cursor::new(&self.buffer[..]);

        // `check` is a cheap length probe: it avoids allocating frame
        // structures until the whole PDU has been buffered.
        match Frame::check(&mut buf) {
            Ok(command_length) => {
                buf.set_position(0);
                let frame = Frame::parse(&mut buf)?;

                // Discard the parsed bytes from the read buffer.
                self.buffer.advance(command_length);
                Ok(Some(frame))
            }
            Err(frame::Error::Incomplete) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// The write half: whole-PDU writes with flush.
#[derive(Debug)]
pub struct FrameWriter {
    stream: BufWriter<OwnedWriteHalf>,
}

impl FrameWriter {
    /// Write one serialized PDU and flush it to the socket. The await on
    /// flush is the backpressure point: it parks the writer while the OS
    /// send buffer is above its high-water mark.
    pub async fn write_pdu(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.stream.write_all(bytes).await?;
        self.stream.flush().await
    }

    /// Close the write side. The peer observes EOF on its next read.
    pub async fn shutdown(&mut self) -> io::Result<()> {
        self.stream.shutdown().await
    }
}
