//! Stateless pub-sub event delivery.
//!
//! An [`EventHandler`] owns the receiving end of a bounded channel and a single async callback. Any number of
//! [`EventProducer`]s can publish into it. Each event is handled on its own task, so a slow subscriber never holds up
//! the request that produced the event. Handlers only ever see the event itself, never engine state.
use std::{future::Future, pin::Pin, sync::Arc};

use log::*;
use tokio::{sync::mpsc, task::JoinSet};

pub type Handler<E> = Arc<dyn Fn(E) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

pub struct EventHandler<E: Send + Sync + 'static> {
    name: &'static str,
    listener: mpsc::Receiver<E>,
    sender: mpsc::Sender<E>,
    handler: Handler<E>,
}

impl<E: Send + Sync + 'static> EventHandler<E> {
    pub fn new(name: &'static str, buffer_size: usize, handler: Handler<E>) -> Self {
        let (sender, listener) = mpsc::channel(buffer_size.max(1));
        Self { name, listener, sender, handler }
    }

    pub fn subscribe(&self) -> EventProducer<E> {
        EventProducer::new(self.sender.clone())
    }

    /// Runs until every producer has been dropped, then waits for in-flight events to finish.
    pub async fn start_handler(self) {
        let Self { name, mut listener, sender, handler } = self;
        debug!("📬️ Starting {name} event handler");
        // Only producers may keep the channel open
        drop(sender);
        let mut jobs = JoinSet::new();
        loop {
            tokio::select! {
                ev = listener.recv() => match ev {
                    Some(ev) => {
                        trace!("📬️ Handling {name} event");
                        let handler = Arc::clone(&handler);
                        jobs.spawn(async move { (handler)(ev).await });
                    },
                    None => break,
                },
                Some(result) = jobs.join_next(), if !jobs.is_empty() => log_job_result(name, result),
            }
        }
        while let Some(result) = jobs.join_next().await {
            log_job_result(name, result);
        }
        debug!("📬️ {name} event handler has shut down");
    }
}

fn log_job_result(name: &str, result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        warn!("📬️ A {name} event handler task failed: {e}");
    }
}

#[derive(Clone)]
pub struct EventProducer<E: Send + Sync> {
    sender: mpsc::Sender<E>,
}

impl<E: Send + Sync> EventProducer<E> {
    pub fn new(sender: mpsc::Sender<E>) -> Self {
        Self { sender }
    }

    pub async fn publish_event(&self, event: E) {
        if let Err(e) = self.sender.send(event).await {
            error!("📬️ Failed to send event: {e}");
        }
    }
}
