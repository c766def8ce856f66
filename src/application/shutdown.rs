use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::domains::agents::NodeRegistration;
use crate::domains::logger::DynLogger;

/// Deregisters the node at most once, whichever of the interrupt handler or
/// the normal completion path gets there first.
pub struct DeregisterOnce {
    registration: Arc<dyn NodeRegistration>,
    logger: DynLogger,
    done: AtomicBool,
}

impl DeregisterOnce {
    pub fn new(registration: Arc<dyn NodeRegistration>, logger: DynLogger) -> Self {
        Self {
            registration,
            logger,
            done: AtomicBool::new(false),
        }
    }

    /// Returns `true` only for the call that actually deregistered.
    pub async fn deregister(&self) -> bool {
        if self.done.swap(true, Ordering::SeqCst) {
            return false;
        }
        match self.registration.deregister().await {
            Ok(()) => self.logger.info(&format!(
                "Node {} deregistered",
                self.registration.node_name()
            )),
            Err(e) => self.logger.error(&format!(
                "Failed to deregister node {}: {}",
                self.registration.node_name(),
                e
            )),
        }
        true
    }

    pub fn is_deregistered(&self) -> bool {
        self.done.load(Ordering::SeqCst)
    }
}

/// Wait for `signal`, then raise the shutdown flag and deregister.
pub fn spawn_shutdown_on<F>(
    signal: F,
    guard: Arc<DeregisterOnce>,
    shutdown: watch::Sender<bool>,
    logger: DynLogger,
) -> JoinHandle<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        signal.await;
        logger.warn("Interrupt received, stopping stream");
        let _ = shutdown.send(true);
        guard.deregister().await;
    })
}

/// Ctrl-C flavour of [`spawn_shutdown_on`].
pub fn spawn_interrupt_handler(
    guard: Arc<DeregisterOnce>,
    shutdown: watch::Sender<bool>,
    logger: DynLogger,
) -> JoinHandle<()> {
    let signal_logger = logger.clone();
    let signal = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            signal_logger.error(&format!("Failed to listen for interrupt: {}", e));
            std::future::pending::<()>().await;
        }
    };
    spawn_shutdown_on(signal, guard, shutdown, logger)
}
