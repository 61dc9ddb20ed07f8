use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use voxrig_decode::parse_response;
use voxrig_model::Model;

use crate::service::{
    ConceptImage, ConceptRequest, GenerationError, GenerationRequest, GenerationService,
    assemble_model, now_ms,
};

#[derive(Clone, Debug)]
pub enum GenerationJob {
    Model(GenerationRequest),
    Concept(ConceptRequest),
}

#[derive(Debug)]
pub enum GenerationOutcome {
    Model(Result<Model, GenerationError>),
    Concept(Result<ConceptImage, GenerationError>),
}

/// Run one job to completion on the calling thread. A model outcome carries
/// a fully decoded buffer, never a partial one.
pub fn run_job(service: &dyn GenerationService, job: GenerationJob) -> GenerationOutcome {
    match job {
        GenerationJob::Model(req) => GenerationOutcome::Model(
            service
                .generate_model(&req)
                .and_then(|text| parse_response(&text).map_err(Into::into))
                .map(|resp| assemble_model(resp, &req, now_ms())),
        ),
        GenerationJob::Concept(req) => GenerationOutcome::Concept(service.generate_concept(&req)),
    }
}

/// Background thread that runs generation jobs one at a time.
///
/// Results come back tagged with the request id they were submitted under;
/// deciding whether a result is still wanted is the caller's job.
pub struct GenerationWorker {
    job_tx: Option<Sender<(u64, GenerationJob)>>,
    res_rx: Receiver<(u64, GenerationOutcome)>,
    handle: Option<JoinHandle<()>>,
}

impl GenerationWorker {
    pub fn spawn(service: Arc<dyn GenerationService>) -> Self {
        let (job_tx, job_rx) = unbounded::<(u64, GenerationJob)>();
        let (res_tx, res_rx) = unbounded();
        let handle = thread::spawn(move || {
            while let Ok((id, job)) = job_rx.recv() {
                log::debug!(target: "worker", "job {} start", id);
                let out = run_job(service.as_ref(), job);
                if res_tx.send((id, out)).is_err() {
                    break;
                }
                log::debug!(target: "worker", "job {} done", id);
            }
        });
        Self {
            job_tx: Some(job_tx),
            res_rx,
            handle: Some(handle),
        }
    }

    pub fn submit(&self, id: u64, job: GenerationJob) -> bool {
        match &self.job_tx {
            Some(tx) => tx.send((id, job)).is_ok(),
            None => false,
        }
    }

    /// Completed results, without blocking.
    pub fn drain(&self) -> Vec<(u64, GenerationOutcome)> {
        self.res_rx.try_iter().collect()
    }

    /// Block until one result arrives or `timeout` elapses.
    pub fn wait(&self, timeout: Duration) -> Option<(u64, GenerationOutcome)> {
        match self.res_rx.recv_timeout(timeout) {
            Ok(r) => Some(r),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Drop for GenerationWorker {
    fn drop(&mut self) {
        self.job_tx.take();
        if let Some(h) = self.handle.take() {
            let _ = h.join();
        }
    }
}
