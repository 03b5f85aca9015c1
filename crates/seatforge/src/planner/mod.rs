//! Planner entry point that hides the job controller wiring.

use std::path::Path;

use seatforge_config::{ConfigError, PlannerConfig};
use seatforge_core::{
    DiffRequest, DiffResponse, GenerateRequest, GenerateResponse, PlanInput, SeatForgeError,
};
use seatforge_solver::{DiffOutcome, JobController, JobSnapshot, PlanOutcome, Planner, ValidationReport};
use tokio::sync::watch;


/// Synchronous runs plus background jobs over one [`PlannerConfig`].
pub struct SeatPlanner {
    jobs: JobController,
}

impl Default for SeatPlanner {
    fn default() -> Self {
        Self::new(PlannerConfig::default())
    }
}

impl SeatPlanner {
    pub fn new(config: PlannerConfig) -> Self {
        #[cfg(feature = "console")]
        seatforge_console::init();

        Self {
            jobs: JobController::new(Planner::new(config)),
        }
    }

    /// Reads the configuration from a TOML or YAML file.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(Self::new(PlannerConfig::from_file(path)?))
    }

    /// Reads `planner.toml` from the working directory, falling back to the
    /// defaults when it is missing or invalid.
    pub fn from_default_config() -> Self {
        Self::new(PlannerConfig::load("planner.toml").unwrap_or_default())
    }

    pub fn config(&self) -> &PlannerConfig {
        self.jobs.planner().config()
    }

    pub fn generate(
        &self,
        input: &PlanInput,
        request: &GenerateRequest,
    ) -> Result<PlanOutcome, SeatForgeError> {
        self.jobs.planner().generate(input, request)
    }

    pub fn diff(
        &self,
        input: &PlanInput,
        request: &DiffRequest,
    ) -> Result<DiffOutcome, SeatForgeError> {
        self.jobs.planner().diff(input, request)
    }

    pub fn validate(&self, input: &PlanInput) -> Result<ValidationReport, SeatForgeError> {
        self.jobs.planner().validate(input)
    }

    /// Starts a generation in the background. The response carries the job
    /// id; its summary stays empty until [`response`](Self::response) finds
    /// the job finished.
    pub fn submit_generate(
        &self,
        project_id: impl Into<String>,
        input: PlanInput,
        request: GenerateRequest,
    ) -> GenerateResponse {
        let job_id = self.jobs.submit_generate(project_id, input, request);
        GenerateResponse {
            job_id,
            summary: None,
        }
    }

    /// Starts a diff run in the background and returns its job id.
    pub fn submit_diff(
        &self,
        project_id: impl Into<String>,
        input: PlanInput,
        request: DiffRequest,
    ) -> String {
        self.jobs.submit_diff(project_id, input, request)
    }

    pub fn response(&self, job_id: &str) -> Option<GenerateResponse> {
        self.jobs.response(job_id)
    }

    pub fn diff_response(&self, job_id: &str) -> Option<DiffResponse> {
        self.jobs.diff_response(job_id)
    }

    /// Blocks until the job finishes.
    pub fn wait(&self, job_id: &str) -> Result<JobSnapshot, SeatForgeError> {
        self.jobs.wait(job_id)
    }

    pub fn subscribe(&self, job_id: &str) -> Option<watch::Receiver<JobSnapshot>> {
        self.jobs.subscribe(job_id)
    }

    pub fn cancel(&self, job_id: &str) -> bool {
        self.jobs.cancel(job_id)
    }

    pub fn jobs(&self) -> &JobController {
        &self.jobs
    }
}
