//! Runners implement threading strategies for Servers.
use std::panic::{self, AssertUnwindSafe};
use std::thread;

use log::error;

use crate::recovery::panic_message;
use threadpool::ThreadPool;

mod threadpool;

/// Runs jobs inline. A panicking job is logged, not propagated.
pub struct SimpleRunner;

impl SimpleRunner {
    pub fn run<F>(&mut self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if let Err(cause) = panic::catch_unwind(AssertUnwindSafe(f)) {
            error!("job panicked: {}", panic_message(&*cause));
        }
    }
}

/// One thread per job. Finished threads are reaped whenever a new job is
/// started; the rest are joined on drop.
pub struct ThreadRunner {
    threads: Vec<thread::JoinHandle<()>>,
}

impl Default for ThreadRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreadRunner {
    pub fn new() -> Self {
        Self { threads: vec![] }
    }

    pub fn run<F>(&mut self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.threads.retain(|thread| !thread.is_finished());
        self.threads.push(thread::spawn(f));
    }

    pub fn active(&self) -> usize {
        self.threads.len()
    }
}

impl Drop for ThreadRunner {
    fn drop(&mut self) {
        for thread in self.threads.drain(..) {
            if let Err(e) = thread.join() {
                error!("Error joining thread: {:?}", e);
            }
        }
    }
}

pub struct ThreadPoolRunner {
    threadpool: ThreadPool,
}

impl ThreadPoolRunner {
    pub fn new(pool_size: usize) -> Self {
        Self {
            threadpool: ThreadPool::new(pool_size),
        }
    }
    pub fn run<F>(&mut self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if let Err(e) = self.threadpool.execute(f) {
            error!("thread pool error: {}", e);
        }
    }
}

pub enum Runner {
    Simple(SimpleRunner),
    Thread(ThreadRunner),
    ThreadPool(ThreadPoolRunner),
}

impl Runner {
    pub fn run<F>(&mut self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        match self {
            Self::Simple(runner) => runner.run(f),
            Self::Thread(runner) => runner.run(f),
            Self::ThreadPool(runner) => runner.run(f),
        }
    }

    /// Create a new runner using the specified number of threads.
    /// 0 is infinite, a new thread will be created for each job.
    /// 1 runs in the main thread.
    /// Any other number creates a thread pool of the specified size.
    pub fn new(n_threads: usize) -> Self {
        match n_threads {
            0 => Self::Thread(ThreadRunner::new()),
            1 => Self::Simple(SimpleRunner),
            n => Self::ThreadPool(ThreadPoolRunner::new(n)),
        }
    }
}
