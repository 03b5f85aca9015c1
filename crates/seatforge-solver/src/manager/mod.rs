//! Job controller for background planning runs.
//!
//! Provides the high-level API for:
//! - Submitting generation and diff jobs, each on its own thread
//! - Superseding: a new job for a project cancels that project's running jobs
//! - Polling, blocking waits and async subscriptions to job status
//! - Cancelling and removing jobs


use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, error, info};
use uuid::Uuid;

use seatforge_core::{
    DiffRequest, DiffResponse, GenerateRequest, GenerateResponse, PlanInput, SeatForgeError,
};

use crate::planner::{DiffOutcome, PlanOutcome, Planner};

/// Lifecycle of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Running,
    Completed,
    /// Stopped early by a cancel or a newer job; the best plan found is kept.
    Cancelled,
    /// The run hit an internal fault.
    Failed,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Running => "RUNNING",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Cancelled => "CANCELLED",
            JobStatus::Failed => "FAILED",
        }
    }

    pub fn is_finished(self) -> bool {
        self != JobStatus::Running
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobKind {
    Generate,
    Diff,
}

impl JobKind {
    pub fn as_str(self) -> &'static str {
        match self {
            JobKind::Generate => "GENERATE",
            JobKind::Diff => "DIFF",
        }
    }
}

/// What a finished job produced.
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutput {
    Plan(PlanOutcome),
    Diff(DiffOutcome),
}

impl JobOutput {
    /// The resulting plan, whichever kind of job produced it.
    pub fn plan(&self) -> &PlanOutcome {
        match self {
            JobOutput::Plan(plan) => plan,
            JobOutput::Diff(diff) => &diff.plan,
        }
    }
}

/// Point-in-time view of a job.
#[derive(Debug, Clone)]
pub struct JobSnapshot {
    pub status: JobStatus,
    pub output: Option<Arc<JobOutput>>,
    pub error: Option<String>,
}

impl JobSnapshot {
    fn running() -> Self {
        Self {
            status: JobStatus::Running,
            output: None,
            error: None,
        }
    }

    fn finished(job_id: &str, result: Result<JobOutput, SeatForgeError>) -> Self {
        match result {
            Ok(output) => {
                let status = if output.plan().is_cancelled() {
                    JobStatus::Cancelled
                } else {
                    JobStatus::Completed
                };
                Self {
                    status,
                    output: Some(Arc::new(output)),
                    error: None,
                }
            }
            Err(err) => {
                error!(event = "job_failed", job_id, code = err.code(), error = %err);
                Self {
                    status: JobStatus::Failed,
                    output: None,
                    error: Some(err.to_string()),
                }
            }
        }
    }
}

/// Listing entry of one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInfo {
    pub job_id: String,
    pub project_id: String,
    pub kind: JobKind,
    pub status: JobStatus,
}

/// Internal job state.
struct JobEntry {
    project_id: String,
    kind: JobKind,
    seq: u64,
    cancel: Arc<AtomicBool>,
    updates: watch::Receiver<JobSnapshot>,
    /// Taken by the first waiter, who holds the lock while joining.
    handle: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl JobEntry {
    fn status(&self) -> JobStatus {
        self.updates.borrow().status
    }
}

/// Runs planning jobs in the background and tracks their results.
///
/// At most one job per project is meant to run at a time: submitting a job
/// cancels the running jobs of the same project, which then finish with
/// [`JobStatus::Cancelled`] and their best plan so far. Jobs of that project
/// that had already finished are dropped. Other finished jobs stay listed
/// until [`remove`](JobController::remove) is called.
///
/// # Example
///
/// ```
/// use seatforge_core::{GenerateRequest, Guest, PlanInput, Table};
/// use seatforge_solver::{JobController, JobStatus, Planner};
///
/// let controller = JobController::new(Planner::default());
/// let input = PlanInput::new(vec![Guest::new("ann")], vec![Table::new("t1", 2)]);
///
/// let job_id = controller.submit_generate("wedding", input, GenerateRequest::default());
/// let snapshot = controller.wait(&job_id).unwrap();
///
/// assert_eq!(snapshot.status, JobStatus::Completed);
/// assert!(controller.response(&job_id).unwrap().summary.is_some());
/// ```
pub struct JobController {
    planner: Arc<Planner>,
    jobs: Mutex<HashMap<String, JobEntry>>,
    next_seq: AtomicU64,
}

impl JobController {
    pub fn new(planner: Planner) -> Self {
        Self {
            planner: Arc::new(planner),
            jobs: Mutex::new(HashMap::new()),
            next_seq: AtomicU64::new(0),
        }
    }

    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    /// Starts a full generation and returns its job id.
    pub fn submit_generate(
        &self,
        project_id: impl Into<String>,
        input: PlanInput,
        request: GenerateRequest,
    ) -> String {
        self.submit(project_id.into(), JobKind::Generate, move |planner, cancel| {
            planner
                .generate_with_cancel(&input, &request, cancel)
                .map(JobOutput::Plan)
        })
    }

    /// Starts a diff run and returns its job id.
    pub fn submit_diff(
        &self,
        project_id: impl Into<String>,
        input: PlanInput,
        request: DiffRequest,
    ) -> String {
        self.submit(project_id.into(), JobKind::Diff, move |planner, cancel| {
            planner
                .diff_with_cancel(&input, &request, cancel)
                .map(JobOutput::Diff)
        })
    }

    fn submit<F>(&self, project_id: String, kind: JobKind, run: F) -> String
    where
        F: FnOnce(&Planner, Arc<AtomicBool>) -> Result<JobOutput, SeatForgeError> + Send + 'static,
    {
        let job_id = Uuid::new_v4().to_string();
        let cancel = Arc::new(AtomicBool::new(false));
        let (sender, updates) = watch::channel(JobSnapshot::running());

        let mut jobs = self.jobs.lock();
        jobs.retain(|other_id, other| {
            if other.project_id != project_id {
                return true;
            }
            if other.status().is_finished() {
                debug!(event = "job_pruned", job_id = %other_id, by = %job_id);
                return false;
            }
            other.cancel.store(true, Ordering::SeqCst);
            info!(event = "job_superseded", job_id = %other_id, by = %job_id);
            true
        });

        let planner = Arc::clone(&self.planner);
        let run_cancel = Arc::clone(&cancel);
        let run_id = job_id.clone();
        let handle = thread::spawn(move || {
            let snapshot = JobSnapshot::finished(&run_id, run(planner.as_ref(), run_cancel));
            info!(
                event = "job_finished",
                job_id = %run_id,
                status = snapshot.status.as_str(),
            );
            sender.send_replace(snapshot);
        });

        info!(
            event = "job_submitted",
            job_id = %job_id,
            project_id = %project_id,
            kind = kind.as_str(),
        );
        jobs.insert(
            job_id.clone(),
            JobEntry {
                project_id,
                kind,
                seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
                cancel,
                updates,
                handle: Arc::new(Mutex::new(Some(handle))),
            },
        );
        job_id
    }

    pub fn status(&self, job_id: &str) -> Option<JobStatus> {
        self.jobs.lock().get(job_id).map(JobEntry::status)
    }

    pub fn snapshot(&self, job_id: &str) -> Option<JobSnapshot> {
        self.jobs
            .lock()
            .get(job_id)
            .map(|job| job.updates.borrow().clone())
    }

    /// Polling view: the summary is present once the job has finished.
    pub fn response(&self, job_id: &str) -> Option<GenerateResponse> {
        let snapshot = self.snapshot(job_id)?;
        Some(GenerateResponse {
            job_id: job_id.to_string(),
            summary: snapshot
                .output
                .as_ref()
                .map(|output| output.plan().summary.clone()),
        })
    }

    /// Result of a finished diff job.
    pub fn diff_response(&self, job_id: &str) -> Option<DiffResponse> {
        match self.snapshot(job_id)?.output.as_deref() {
            Some(JobOutput::Diff(diff)) => Some(diff.response()),
            _ => None,
        }
    }

    /// Receiver that observes every status change of the job.
    pub fn subscribe(&self, job_id: &str) -> Option<watch::Receiver<JobSnapshot>> {
        self.jobs.lock().get(job_id).map(|job| job.updates.clone())
    }

    /// Blocks until the job has finished and returns its final snapshot.
    ///
    /// Concurrent waiters on the same job all block until it finishes.
    pub fn wait(&self, job_id: &str) -> Result<JobSnapshot, SeatForgeError> {
        let (handle, updates) = {
            let jobs = self.jobs.lock();
            let job = jobs
                .get(job_id)
                .ok_or_else(|| SeatForgeError::Job(format!("unknown job {job_id}")))?;
            (Arc::clone(&job.handle), job.updates.clone())
        };

        {
            let mut slot = handle.lock();
            if let Some(running) = slot.take() {
                running
                    .join()
                    .map_err(|_| SeatForgeError::Job(format!("job {job_id} panicked")))?;
            }
        }

        let snapshot = updates.borrow().clone();
        if snapshot.status.is_finished() {
            Ok(snapshot)
        } else {
            Err(SeatForgeError::Job(format!(
                "job {job_id} stopped without a result"
            )))
        }
    }

    /// Requests early termination of a job.
    ///
    /// Returns `true` if the job was found and is still running.
    pub fn cancel(&self, job_id: &str) -> bool {
        let jobs = self.jobs.lock();
        match jobs.get(job_id) {
            Some(job) if !job.status().is_finished() => {
                job.cancel.store(true, Ordering::SeqCst);
                info!(event = "job_cancel_requested", job_id);
                true
            }
            _ => false,
        }
    }

    /// Forgets a job, cancelling it if it is still running.
    pub fn remove(&self, job_id: &str) -> Option<JobSnapshot> {
        let job = self.jobs.lock().remove(job_id)?;
        job.cancel.store(true, Ordering::SeqCst);
        let snapshot = job.updates.borrow().clone();
        Some(snapshot)
    }

    /// Lists all jobs in submission order.
    pub fn list_jobs(&self) -> Vec<JobInfo> {
        let jobs = self.jobs.lock();
        let mut entries: Vec<(&String, &JobEntry)> = jobs.iter().collect();
        entries.sort_by_key(|(_, job)| job.seq);
        entries
            .into_iter()
            .map(|(job_id, job)| JobInfo {
                job_id: job_id.clone(),
                project_id: job.project_id.clone(),
                kind: job.kind,
                status: job.status(),
            })
            .collect()
    }
}
