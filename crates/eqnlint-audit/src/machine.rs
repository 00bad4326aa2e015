//! Audit state machine
//!
//! Drives one audit from input loading to report emission. Each stage is a
//! single step that names its successor; the transition loop owns logging,
//! the error exit path and cancellation.

use crate::report::{self, AuditRecord, DryRunRecord};
use crate::{AuditError, AuditProfile, AuditSettings};
use eqnlint_domain::{AuditResult, Fragment, TargetExtractor};
use eqnlint_extractor::Extractor;
use eqnlint_llm::{BackendOptions, ModelBackend, ModelClient, UsageMeter};
use std::fmt;
use std::future::Future;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Workflow stages, in the order a successful run visits them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Validate settings
    Start,
    /// Read the document
    LoadInput,
    /// Construct the model client (skipped for dry runs)
    InitClient,
    /// Run the extractor
    ExtractTargets,
    /// Resolve instructions and few-shot turns
    SelectPromptTemplate,
    /// One model call per fragment
    InvokeModel,
    /// Render and write reports
    EmitReports,
    /// A stage failed
    Error,
    /// Terminal
    Shutdown,
}

impl Stage {
    /// Stage name for logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Start => "start",
            Stage::LoadInput => "load_input",
            Stage::InitClient => "init_client",
            Stage::ExtractTargets => "extract_targets",
            Stage::SelectPromptTemplate => "select_prompt_template",
            Stage::InvokeModel => "invoke_model",
            Stage::EmitReports => "emit_reports",
            Stage::Error => "error",
            Stage::Shutdown => "shutdown",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every fragment was sent and reports were written
    Completed,
    /// Extraction only
    DryRun,
    /// The shutdown signal fired before the run finished
    Cancelled,
}

/// Everything a finished run produced
#[derive(Debug)]
pub struct RunOutcome {
    /// How the run ended
    pub status: RunStatus,
    /// Stages visited, in order, ending with [`Stage::Shutdown`]
    pub stages: Vec<Stage>,
    /// Extracted fragments
    pub fragments: Vec<Fragment>,
    /// One result per processed fragment, in extraction order
    pub results: Vec<AuditResult>,
    /// Model usage, when a client was constructed
    pub usage: Option<UsageMeter>,
}

/// State machine for one audit run
///
/// # Examples
///
/// ```no_run
/// use eqnlint_audit::{AuditKind, AuditMachine, AuditSettings};
///
/// # async fn example() -> Result<(), eqnlint_audit::AuditError> {
/// let settings = AuditSettings::new("paper.tex").with_model("ollama:llama3");
/// let outcome = AuditMachine::new(AuditKind::Units.profile(), settings).run().await?;
/// println!("{} results", outcome.results.len());
/// # Ok(())
/// # }
/// ```
pub struct AuditMachine {
    profile: &'static AuditProfile,
    settings: AuditSettings,
    backend_options: BackendOptions,
    backend: Option<Box<dyn ModelBackend>>,
    stage: Stage,
    stages: Vec<Stage>,
    document: String,
    fragments: Vec<Fragment>,
    results: Vec<AuditResult>,
    client: Option<ModelClient>,
    last_error: Option<AuditError>,
}

impl AuditMachine {
    /// Machine for `profile`, with backend endpoints and credential taken
    /// from the environment
    pub fn new(profile: &'static AuditProfile, settings: AuditSettings) -> Self {
        Self {
            profile,
            settings,
            backend_options: BackendOptions::from_env(),
            backend: None,
            stage: Stage::Start,
            stages: vec![Stage::Start],
            document: String::new(),
            fragments: Vec::new(),
            results: Vec::new(),
            client: None,
            last_error: None,
        }
    }

    /// Override backend endpoints and credential
    pub fn with_backend_options(mut self, options: BackendOptions) -> Self {
        self.backend_options = options;
        self
    }

    /// Use an already constructed backend instead of selecting one by model id
    pub fn with_backend(mut self, backend: Box<dyn ModelBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Current stage
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Profile this machine runs
    pub fn profile(&self) -> &'static AuditProfile {
        self.profile
    }

    /// Run to completion, cancelling on Ctrl-C
    pub async fn run(self) -> Result<RunOutcome, AuditError> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Could not listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Run to completion, cancelling when `shutdown` resolves
    ///
    /// On cancellation the in-flight wait or call is dropped. If the model
    /// stage had started, the results gathered so far are written with
    /// `complete: false`.
    pub async fn run_until<F>(mut self, shutdown: F) -> Result<RunOutcome, AuditError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        info!(
            audit = self.profile.name(),
            file = %self.settings.file.display(),
            model = %self.settings.model_id,
            dry_run = self.settings.dry_run,
            "Audit started"
        );

        let mut status = RunStatus::Completed;
        while self.stage != Stage::Shutdown {
            let step = tokio::select! {
                biased;
                _ = &mut shutdown => None,
                next = self.step() => Some(next),
            };

            match step {
                Some(Ok(next)) => self.transition(next),
                Some(Err(e)) => {
                    error!(stage = %self.stage, error = %e, "Audit stage failed");
                    self.last_error = Some(e);
                    self.transition(Stage::Error);
                    self.transition(Stage::Shutdown);
                }
                None => {
                    warn!(stage = %self.stage, results = self.results.len(), "Shutdown signal received, cancelling audit");
                    status = RunStatus::Cancelled;
                    if matches!(self.stage, Stage::InvokeModel | Stage::EmitReports) {
                        if let Err(e) = self.emit_results(false) {
                            error!(error = %e, "Could not flush partial results");
                            self.last_error = Some(e);
                        }
                    }
                    self.transition(Stage::Shutdown);
                }
            }
        }

        if status == RunStatus::Completed && self.settings.dry_run {
            status = RunStatus::DryRun;
        }

        let usage = match self.client.take() {
            Some(client) => {
                let usage = client.usage();
                client.shutdown().await;
                Some(usage)
            }
            None => None,
        };

        if let Some(e) = self.last_error.take() {
            return Err(e);
        }

        info!(
            audit = self.profile.name(),
            status = ?status,
            fragments = self.fragments.len(),
            results = self.results.len(),
            "Audit finished"
        );

        Ok(RunOutcome {
            status,
            stages: self.stages,
            fragments: self.fragments,
            results: self.results,
            usage,
        })
    }

    fn transition(&mut self, next: Stage) {
        debug!(from = %self.stage, to = %next, "Stage transition");
        self.stage = next;
        self.stages.push(next);
    }

    async fn step(&mut self) -> Result<Stage, AuditError> {
        match self.stage {
            Stage::Start => {
                self.settings.validate()?;
                Ok(Stage::LoadInput)
            }
            Stage::LoadInput => {
                self.document = load_document(&self.settings.file).await?;
                debug!(chars = self.document.len(), "Document loaded");
                Ok(Stage::InitClient)
            }
            Stage::InitClient => {
                if !self.settings.dry_run {
                    self.client = Some(self.build_client()?);
                }
                Ok(Stage::ExtractTargets)
            }
            Stage::ExtractTargets => {
                let extractor = Extractor::with_config(self.profile.extraction, self.settings.extractor.clone())?;
                self.fragments = extractor.extract(&self.document);
                info!(count = self.fragments.len(), "Found {}(s)", self.profile.noun.to_lowercase());

                if self.settings.dry_run {
                    let text = report::render_dry_run(self.profile, &self.fragments);
                    report::write_outputs(&self.settings, &text, &DryRunRecord::new(self.profile, &self.fragments))?;
                    Ok(Stage::Shutdown)
                } else {
                    Ok(Stage::SelectPromptTemplate)
                }
            }
            Stage::SelectPromptTemplate => {
                debug!(
                    audit = self.profile.name(),
                    system = self.profile.system_instructions,
                    few_shots = self.profile.few_shots.len(),
                    "Prompt template selected"
                );
                Ok(Stage::InvokeModel)
            }
            Stage::InvokeModel => {
                self.invoke_model().await?;
                Ok(Stage::EmitReports)
            }
            Stage::EmitReports => {
                self.emit_results(true)?;
                Ok(Stage::Shutdown)
            }
            Stage::Error | Stage::Shutdown => Ok(Stage::Shutdown),
        }
    }

    fn build_client(&mut self) -> Result<ModelClient, AuditError> {
        let settings = &self.settings;
        let client = match self.backend.take() {
            Some(backend) => ModelClient::new(backend, settings.rate, settings.max_output_tokens),
            None => ModelClient::from_model_id(
                &settings.model_id,
                settings.rate,
                settings.max_output_tokens,
                &self.backend_options,
            )?,
        };
        Ok(client)
    }

    async fn invoke_model(&mut self) -> Result<(), AuditError> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("model client was not initialised"))?;
        let profile = self.profile;
        let total = self.fragments.len();

        for (index, fragment) in self.fragments.iter().enumerate() {
            info!("Auditing {} {}/{}", profile.noun.to_lowercase(), index + 1, total);
            let prompt = profile.build_prompt(fragment);
            debug!(index, prompt = %prompt, "Prompt built");

            let result = match client.complete(profile.system_instructions, &prompt, profile.few_shots).await {
                Ok(answer) => {
                    debug!(index, answer = %answer, "Model answered");
                    AuditResult::answered(index, fragment.text(), answer)
                }
                Err(e) => {
                    warn!(index, error = %e, "Model call failed");
                    AuditResult::failed(index, fragment.text(), e.to_string())
                }
            };
            self.results.push(result);
        }
        Ok(())
    }

    fn emit_results(&self, complete: bool) -> Result<(), AuditError> {
        let text = report::render_results(self.profile, &self.results, complete);
        let record = AuditRecord::new(self.profile, &self.results, complete);
        report::write_outputs(&self.settings, &text, &record)
    }
}

async fn load_document(path: &Path) -> Result<String, AuditError> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AuditError::InputNotFound {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(AuditError::InputRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}
