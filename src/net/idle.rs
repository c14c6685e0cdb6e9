//! Idle-connection watchdog.
//!
//! # Responsibilities
//! - Track read/write activity on a connection
//! - Fail the connection with `TimedOut` once it sits idle past the limit
//!
//! # Design Decisions
//! - The deadline resets on every successful read or write, so it bounds
//!   inactivity rather than total connection lifetime
//! - Flush and shutdown are passed through untimed; they complete as part of
//!   closing, which the drain deadline already bounds

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::time::{Instant, Sleep};

/// Stream wrapper that errors out after a period of inactivity.
pub struct IdleTimeout<S> {
    inner: S,
    idle: Duration,
    deadline: Pin<Box<Sleep>>,
}

impl<S> IdleTimeout<S> {
    /// Wrap `inner`, closing it after `idle` of no read/write activity.
    pub fn new(inner: S, idle: Duration) -> Self {
        Self {
            inner,
            idle,
            deadline: Box::pin(tokio::time::sleep(idle)),
        }
    }

    fn bump(&mut self) {
        let next = Instant::now() + self.idle;
        self.deadline.as_mut().reset(next);
    }

    fn expired(&mut self, cx: &mut Context<'_>) -> Option<io::Error> {
        if self.deadline.as_mut().poll(cx).is_ready() {
            Some(io::Error::new(
                io::ErrorKind::TimedOut,
                "connection idle timeout",
            ))
        } else {
            None
        }
    }
}

impl<S: AsyncRead + Unpin> AsyncRead for IdleTimeout<S> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        match Pin::new(&mut this.inner).poll_read(cx, buf) {
            Poll::Ready(result) => {
                this.bump();
                Poll::Ready(result)
            }
            Poll::Pending => match this.expired(cx) {
                Some(err) => Poll::Ready(Err(err)),
                None => Poll::Pending,
            },
        }
    }
}

impl<S: AsyncWrite + Unpin> AsyncWrite for IdleTimeout<S> {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        match Pin::new(&mut this.inner).poll_write(cx, buf) {
            Poll::Ready(result) => {
                this.bump();
                Poll::Ready(result)
            }
            Poll::Pending => match this.expired(cx) {
                Some(err) => Poll::Ready(Err(err)),
                None => Poll::Pending,
            },
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_shutdown(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{duplex, AsyncReadExt, AsyncWriteExt};

    #[tokio::test(start_paused = true)]
    async fn read_times_out_when_idle() {
        let (client, server) = duplex(64);
        // Keep the client end alive so the stream does not reach EOF.
        let _client = client;
        let mut wrapped = IdleTimeout::new(server, Duration::from_secs(60));

        let mut buf = [0u8; 8];
        let err = wrapped
            .read(&mut buf)
            .await
            .expect_err("idle read should time out");
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn activity_resets_the_deadline() {
        let (mut client, server) = duplex(64);
        let mut wrapped = IdleTimeout::new(server, Duration::from_secs(60));
        let mut buf = [0u8; 8];

        tokio::time::advance(Duration::from_secs(30)).await;
        client.write_all(b"ping").await.unwrap();
        let n = wrapped.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"ping");

        // 45s of further silence stays under the refreshed 60s window.
        tokio::time::advance(Duration::from_secs(45)).await;
        client.write_all(b"pong").await.unwrap();
        let n = wrapped.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"pong");
    }

    #[tokio::test(start_paused = true)]
    async fn write_times_out_when_peer_stalls() {
        let (client, server) = duplex(4);
        // The client never reads, so the 4-byte buffer fills and writes stall.
        let _client = client;
        let mut wrapped = IdleTimeout::new(server, Duration::from_secs(60));

        let err = wrapped
            .write_all(&[0u8; 64])
            .await
            .expect_err("stalled write should time out");
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
    }
}
