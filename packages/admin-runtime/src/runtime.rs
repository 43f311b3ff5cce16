//! Request worker loop.

use tokio::sync::mpsc;

use crate::api_handlers::ApiHandlers;
use crate::api_request::ApiRequest;
use crate::Result;

/// Single worker answering API requests in arrival order.
pub struct Runtime {
    /// API request receiver
    api_rx: mpsc::Receiver<ApiRequest>,
    /// API handlers
    api_handlers: ApiHandlers,
    /// Requests answered so far
    processed: u64,
}

impl Runtime {
    /// Create a new runtime
    pub fn new(api_handlers: ApiHandlers, api_rx: mpsc::Receiver<ApiRequest>) -> Self {
        Self {
            api_rx,
            api_handlers,
            processed: 0,
        }
    }

    pub fn handlers(&self) -> &ApiHandlers {
        &self.api_handlers
    }

    /// Number of requests answered so far
    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// Answers every request already queued, without waiting for more.
    ///
    /// # Returns
    /// Number of requests answered.
    pub async fn process_pending(&mut self) -> Result<usize> {
        let mut count = 0;
        while let Ok(req) = self.api_rx.try_recv() {
            self.api_handlers.handle_api_request(req).await?;
            count += 1;
        }
        self.processed += count as u64;
        Ok(count)
    }

    /// Answers requests until every sender is dropped.
    pub async fn serve(&mut self) -> Result<()> {
        tracing::info!("Runtime started with {} tables", self.api_handlers.registry().len());
        while let Some(req) = self.api_rx.recv().await {
            self.api_handlers.handle_api_request(req).await?;
            self.processed += 1;
        }
        tracing::info!("Runtime stopped after {} requests", self.processed);
        Ok(())
    }

    /// Run the runtime loop (blocking) on a dedicated single-threaded
    /// executor. Meant for its own thread.
    pub fn run(&mut self) -> Result<()> {
        let executor = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        executor.block_on(self.serve())
    }
}
