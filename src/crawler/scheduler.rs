//! Paced dispatch loop
//!
//! This module handles:
//! - Pulling URLs from the frontier once per tick
//! - Limiting visits in flight with a fixed pool of slot permits
//! - Routing visit results back into the frontier and to user callbacks
//! - The start/pause lifecycle of the loop
//!
//! Each tick claims at most one URL per free slot. A slot is released when its
//! visit has finished and its results have been routed, so at most `workers`
//! visits are ever in flight, even when visits outlast the tick interval.

use crate::config::CrawlerConfig;
use crate::crawler::extract::Extraction;
use crate::crawler::frontier::{Frontier, FrontierStats};
use crate::crawler::handlers::CrawlHandlers;
use crate::crawler::pacer::Pacer;
use crate::crawler::visitor::PageVisitor;
use crate::state::CrawlPhase;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{watch, Semaphore};
use url::Url;

/// Lifecycle bookkeeping, guarded by one lock so start and loop exit never race
#[derive(Debug)]
struct Control {
    phase: CrawlPhase,
    loop_alive: bool,
}

/// Owns the frontier and drives visits through a fixed pool of worker slots
pub struct Scheduler {
    /// Only mutable shared state; every access goes through this lock
    frontier: Mutex<Frontier>,
    visitor: PageVisitor,
    handlers: CrawlHandlers,
    slots: Arc<Semaphore>,
    workers: usize,
    /// Held by the running loop; survives pause/resume
    pacer: tokio::sync::Mutex<Pacer>,
    debug: bool,
    stop_when_idle: bool,
    control: Mutex<Control>,
    loop_alive: watch::Sender<bool>,
    ticks: AtomicU64,
    failed: AtomicU64,
}

impl Scheduler {
    /// Creates a scheduler in the `Idle` phase
    pub fn new(
        config: &CrawlerConfig,
        frontier: Frontier,
        visitor: PageVisitor,
        handlers: CrawlHandlers,
    ) -> Self {
        let workers = config.workers.max(1) as usize;
        let (loop_alive, _) = watch::channel(false);

        Self {
            frontier: Mutex::new(frontier),
            visitor,
            handlers,
            slots: Arc::new(Semaphore::new(workers)),
            workers,
            pacer: tokio::sync::Mutex::new(Pacer::new(config.tick_interval())),
            debug: config.debug,
            stop_when_idle: config.stop_when_idle,
            control: Mutex::new(Control {
                phase: CrawlPhase::Idle,
                loop_alive: false,
            }),
            loop_alive,
            ticks: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    /// Moves to `Running` and spawns the dispatch loop if none is alive
    ///
    /// Re-entrant: starting a running scheduler keeps the existing loop and
    /// resets nothing. Must be called from within a Tokio runtime.
    pub fn start(self: &Arc<Self>) {
        let mut control = lock(&self.control);
        let previous = control.phase;
        control.phase = previous.on_start();

        if control.loop_alive {
            tracing::debug!("Dispatch loop already alive ({} -> running)", previous);
            return;
        }

        control.loop_alive = true;
        self.loop_alive.send_replace(true);
        drop(control);

        tracing::info!(
            "Starting dispatch loop ({} -> running, {} queued)",
            previous,
            self.frontier_len()
        );

        let scheduler = Arc::clone(self);
        tokio::spawn(async move { scheduler.run().await });
    }

    /// Stops scheduling new ticks
    ///
    /// Takes effect at the next tick boundary. Visits already in flight run to
    /// completion and their results are still routed.
    pub fn pause(&self) {
        let mut control = lock(&self.control);
        let previous = control.phase;
        control.phase = previous.on_pause();
        tracing::info!("Pause requested ({} -> {})", previous, control.phase);
    }

    /// Waits until the dispatch loop has exited
    ///
    /// Returns immediately if no loop is alive. In-flight visits may still be
    /// running; see [`Scheduler::drained`].
    pub async fn stopped(&self) {
        let mut rx = self.loop_alive.subscribe();
        let _ = rx.wait_for(|alive| !*alive).await;
    }

    /// Waits until the loop has exited and every in-flight visit has been routed
    pub async fn drained(&self) {
        self.stopped().await;
        // Acquiring every permit means no visit holds a slot
        if let Ok(permits) = self.slots.acquire_many(self.workers as u32).await {
            drop(permits);
        }
    }

    async fn run(self: Arc<Self>) {
        let mut pacer = self.pacer.lock().await;

        loop {
            pacer.tick().await;

            if !self.continue_running() {
                break;
            }

            let tick = self.ticks.fetch_add(1, Ordering::Relaxed) + 1;
            let dispatched = self.dispatch_tick();
            tracing::trace!(
                "Tick {}: dispatched {}, {} in flight, {} queued",
                tick,
                dispatched,
                self.in_flight(),
                self.frontier_len()
            );

            if dispatched == 0 && self.stop_when_idle && self.finish_if_drained() {
                break;
            }
        }
    }

    /// Checks the phase at a tick boundary; marks the loop dead if not running
    fn continue_running(&self) -> bool {
        let mut control = lock(&self.control);
        if control.phase.is_active() {
            return true;
        }

        control.loop_alive = false;
        self.loop_alive.send_replace(false);
        tracing::info!("Dispatch loop stopped ({})", control.phase);
        false
    }

    /// Ends the loop when nothing is queued and nothing is in flight
    fn finish_if_drained(&self) -> bool {
        let mut control = lock(&self.control);
        if self.in_flight() > 0 || !lock(&self.frontier).is_empty() {
            return false;
        }

        control.phase = control.phase.on_drained();
        control.loop_alive = false;
        self.loop_alive.send_replace(false);
        tracing::info!(
            "Frontier drained after {} visits, crawl finished",
            self.visitor.visited_count()
        );
        true
    }

    /// Claims one URL per free slot and spawns a visit for each
    fn dispatch_tick(self: &Arc<Self>) -> usize {
        let mut dispatched = 0;

        while dispatched < self.workers {
            let permit = match Arc::clone(&self.slots).try_acquire_owned() {
                Ok(permit) => permit,
                Err(_) => break,
            };

            let url = match lock(&self.frontier).take_next() {
                Some(url) => url,
                None => break,
            };

            dispatched += 1;
            let scheduler = Arc::clone(self);
            tokio::spawn(async move {
                scheduler.visit(url).await;
                drop(permit);
            });
        }

        dispatched
    }

    async fn visit(&self, url: Url) {
        match self.visitor.visit(&url).await {
            Ok(extraction) => self.route(extraction),
            Err(e) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                tracing::warn!("Dropping {} after failed visit: {}", url, e);
            }
        }
    }

    fn route(&self, extraction: Extraction) {
        let (admitted, queued) = {
            let mut frontier = lock(&self.frontier);
            let admitted = frontier.admit(extraction.hrefs());
            (admitted, frontier.len())
        };

        let visited = self.visitor.visited_count();
        if self.debug {
            tracing::info!(
                "Visited {} ({} pages so far): {} link elements, {} new, {} queued",
                extraction.url,
                visited,
                extraction.link_element_count(),
                admitted.len(),
                queued
            );
        } else {
            tracing::debug!(
                "Visited {} ({} pages so far): {} new links, {} queued",
                extraction.url,
                visited,
                admitted.len(),
                queued
            );
        }

        self.handlers.admitted(&admitted);
        self.handlers.links(&extraction.url, &extraction.links);
        self.handlers.content(&extraction.url, &extraction.content);
    }

    /// Admits candidate references directly (e.g. extra seeds)
    pub fn admit<I, S>(&self, candidates: I) -> Vec<Url>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        lock(&self.frontier).admit(candidates)
    }

    pub fn phase(&self) -> CrawlPhase {
        lock(&self.control).phase
    }

    /// Returns the number of visits currently holding a slot
    pub fn in_flight(&self) -> usize {
        self.workers - self.slots.available_permits().min(self.workers)
    }

    pub fn frontier_len(&self) -> usize {
        lock(&self.frontier).len()
    }

    pub fn frontier_stats(&self) -> FrontierStats {
        lock(&self.frontier).stats()
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn visited_count(&self) -> u64 {
        self.visitor.visited_count()
    }

    pub fn failed_count(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn tick_count(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("phase", &self.phase())
            .field("workers", &self.workers)
            .field("in_flight", &self.in_flight())
            .field("queued", &self.frontier_len())
            .finish_non_exhaustive()
    }
}

/// Locks a mutex, recovering the data if a callback panicked while it was held
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
