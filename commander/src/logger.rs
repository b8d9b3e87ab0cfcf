//! Non-blocking logger for the real-time threads.
//!
//! The producer and consumer contexts must never touch stdout; records
//! cross a bounded channel and a low-priority loop prints them. Records
//! are dropped rather than blocking when the channel is full.

use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::thread;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

struct QueuedRecord {
    timestamp: Instant,
    level: Level,
    thread: String,
    content: String,
}

pub struct Logger {
    sender: SyncSender<QueuedRecord>,
}

pub struct LogSink {
    receiver: Receiver<QueuedRecord>,
    start: Instant,
}

impl Logger {
    pub fn init() -> LogSink {
        let (sender, receiver) = sync_channel(32);
        let start = Instant::now();
        let logger = Box::new(Self {
            sender,
        });
        let _ = log::set_logger(Box::leak(logger)).map(|()| log::set_max_level(LevelFilter::Trace));
        LogSink {
            receiver,
            start,
        }
    }
}

impl Log for Logger {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let _ = self.sender.try_send(QueuedRecord {
                timestamp: Instant::now(),
                level: record.level(),
                thread: thread::current().name().unwrap_or("?").to_owned(),
                content: std::fmt::format(*record.args()),
            });
        }
    }

    fn flush(&self) {}
}

impl LogSink {
    pub fn handle_logs(&mut self) {
        for record in self.receiver.try_iter() {
            println!(
                "[{:<9.5}] {:<5} {:<10}: {}",
                record.timestamp.duration_since(self.start).as_secs_f32(),
                record.level,
                record.thread,
                record.content
            );
        }
    }
}
