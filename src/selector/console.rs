//! 控制台输入
//!
//! tokio 的 stdin 在阻塞线程池里做读取，等待中的读无法被中断，取消后运行时关闭会一直卡住。
//! 这里改由独立的系统线程逐行读 stdin，经 mpsc 通道交给异步端；异步端的读取只是等通道，
//! 随时可以丢弃，进程退出时读线程随之结束。

use std::io;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use tokio::io::{AsyncBufRead, AsyncRead, ReadBuf};
use tokio::sync::mpsc;

/// 读线程与异步端之间缓冲的行数
const LINE_BUFFER: usize = 16;

/// 通道驱动的行输入：实现 AsyncBufRead，可直接交给 LinePrompt
pub struct ConsoleInput {
    rx: mpsc::Receiver<io::Result<Vec<u8>>>,
    buf: Vec<u8>,
    pos: usize,
}

impl ConsoleInput {
    /// 从通道读取；发送端全部关闭即视为输入结束
    pub fn new(rx: mpsc::Receiver<io::Result<Vec<u8>>>) -> Self {
        Self {
            rx,
            buf: Vec::new(),
            pos: 0,
        }
    }

    /// 启动 stdin 读线程（不 join，随进程退出）
    pub fn stdin() -> Self {
        let (tx, rx) = mpsc::channel(LINE_BUFFER);
        let spawned = std::thread::Builder::new()
            .name("scout-stdin".to_string())
            .spawn(move || pump_lines(io::stdin().lock(), tx));
        if let Err(e) = spawned {
            tracing::error!(error = %e, "failed to start stdin reader, input will read as closed");
        }
        Self::new(rx)
    }
}

/// 逐行转发，直到 EOF、读错误或接收端被丢弃
pub fn pump_lines<R: io::BufRead>(mut reader: R, tx: mpsc::Sender<io::Result<Vec<u8>>>) {
    loop {
        let mut line = Vec::new();
        match reader.read_until(b'\n', &mut line) {
            Ok(0) => break,
            Ok(_) => {
                if tx.blocking_send(Ok(line)).is_err() {
                    break;
                }
            }
            Err(e) => {
                let _ = tx.blocking_send(Err(e));
                break;
            }
        }
    }
}

impl AsyncBufRead for ConsoleInput {
    fn poll_fill_buf(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<&[u8]>> {
        let this = self.get_mut();
        while this.pos >= this.buf.len() {
            match ready!(this.rx.poll_recv(cx)) {
                Some(Ok(bytes)) => {
                    this.buf = bytes;
                    this.pos = 0;
                }
                Some(Err(e)) => return Poll::Ready(Err(e)),
                None => return Poll::Ready(Ok(&[])),
            }
        }
        Poll::Ready(Ok(&this.buf[this.pos..]))
    }

    fn consume(self: Pin<&mut Self>, amt: usize) {
        let this = self.get_mut();
        this.pos = (this.pos + amt).min(this.buf.len());
    }
}

impl AsyncRead for ConsoleInput {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        out: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let available = ready!(self.as_mut().poll_fill_buf(cx))?;
        let n = available.len().min(out.remaining());
        out.put_slice(&available[..n]);
        self.consume(n);
        Poll::Ready(Ok(()))
    }
}
