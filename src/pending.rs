//! Single-fulfilment completion handle for engine calls running off-thread.
use crate::error::{Error, Result};
use flume::{Receiver, Sender};
use std::thread;

/// The eventual outcome of a solve or verify call.
///
/// Fulfilled exactly once, after all local validation has finished. Dropping the handle
/// abandons the result; the engine call itself is not interrupted.
#[derive(Debug)]
pub struct Pending<T> {
    rx: Receiver<Result<T>>,
}

impl<T: Send + 'static> Pending<T> {
    /// A handle that is already fulfilled with `result`.
    pub fn ready(result: Result<T>) -> Self {
        let (tx, rx) = flume::bounded(1);
        // capacity 1 and the receiver is still held, so this cannot fail
        let _ = tx.send(result);
        Self { rx }
    }

    /// Run `work` on a new thread and fulfil the handle with its result.
    pub fn spawn<F>(work: F) -> Self
    where
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let (tx, rx): (Sender<Result<T>>, Receiver<Result<T>>) = flume::bounded(1);
        thread::spawn(move || {
            // receiver gone means the caller stopped waiting
            let _ = tx.send(work());
        });
        Self { rx }
    }

    /// Block until the result is available.
    pub fn wait(self) -> Result<T> {
        self.rx.recv().map_err(|_| Error::ChannelClosed)?
    }

    /// Await the result from async code.
    pub async fn recv(self) -> Result<T> {
        self.rx
            .recv_async()
            .await
            .map_err(|_| Error::ChannelClosed)?
    }

    /// The result if it is already available, otherwise the handle back.
    pub fn try_take(self) -> std::result::Result<Result<T>, Self> {
        match self.rx.try_recv() {
            Ok(result) => Ok(result),
            Err(flume::TryRecvError::Empty) => Err(self),
            Err(flume::TryRecvError::Disconnected) => Ok(Err(Error::ChannelClosed)),
        }
    }

    /// Invoke `callback` exactly once with the result, from a background thread.
    pub fn then<F>(self, callback: F)
    where
        F: FnOnce(Result<T>) + Send + 'static,
    {
        thread::spawn(move || callback(self.wait()));
    }
}
