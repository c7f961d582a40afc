//! Build Runner
//!
//! Coordinates a multi-architecture build: validates the request, resolves
//! the strategy and context once, then builds every architecture in turn
//! inside its own working copy. The first failing architecture aborts the
//! remaining ones.

use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, Level};

use xcompile_android_toolchain::BuildEnvironment;
use xcompile_core::{Result, Settings, TargetRegistry, XcompileError};

use crate::context::BuildContext;
use crate::job::{BuildJob, BuildOutcome, BuildReport};
use crate::strategy::select_strategy;
use crate::workspace::WorkingCopy;

const BANNER_WIDTH: usize = 80;

/// Variables logged with `--verbose` before each architecture's build
const TOOLCHAIN_VARS: &[&str] = &[
    "PATH", "SYSROOT", "CC", "CXX", "AR", "LD", "CFLAGS", "LDFLAGS",
];

/// A `build` invocation
#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub target: String,
    /// Root of the per-architecture install trees
    pub output: PathBuf,
    pub source: PathBuf,
    /// Comma-separated architecture override
    pub architectures: Option<String>,
    /// Build strategy name override
    pub strategy: Option<String>,
}

impl BuildRequest {
    pub fn new(target: impl Into<String>, output: impl Into<PathBuf>, source: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            output: output.into(),
            source: source.into(),
            architectures: None,
            strategy: None,
        }
    }

    pub fn with_architectures(mut self, archs: impl Into<String>) -> Self {
        self.architectures = Some(archs.into());
        self
    }

    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }
}

/// Runs one architecture's build once its working copy is ready
#[allow(async_fn_in_trait)]
pub trait JobExecutor {
    async fn execute(&self, job: &BuildJob<'_>) -> Result<()>;
}

/// Executor running the job's build strategy
#[derive(Debug, Clone)]
pub struct StrategyExecutor {
    make_program: String,
}

impl StrategyExecutor {
    pub fn new(make_program: impl Into<String>) -> Self {
        Self {
            make_program: make_program.into(),
        }
    }
}

impl JobExecutor for StrategyExecutor {
    async fn execute(&self, job: &BuildJob<'_>) -> Result<()> {
        if tracing::enabled!(Level::DEBUG) {
            let env = job.environment()?;
            debug!(
                "{} build environment:\n{}",
                job.arch,
                env.shell_exports(TOOLCHAIN_VARS.iter().copied())
            );
        }
        job.strategy.run(job, &self.make_program).await
    }
}

/// Top-level build driver
pub struct BuildOrchestrator {
    registry: TargetRegistry,
    settings: Settings,
    base_env: BuildEnvironment,
}

impl BuildOrchestrator {
    /// Orchestrator over `registry`, inheriting the process environment
    pub fn new(registry: TargetRegistry, settings: Settings) -> Self {
        Self {
            registry,
            settings,
            base_env: BuildEnvironment::from_process(),
        }
    }

    /// Replace the base environment build environments derive from
    pub fn with_base_env(mut self, env: BuildEnvironment) -> Self {
        self.base_env = env;
        self
    }

    /// Comma-joined architectures of `target`
    pub fn list_architectures(&self, target: &str) -> Result<String> {
        Ok(self.registry.resolve(target)?.architecture_list())
    }

    /// Build with the configured native build tool
    pub async fn build(&self, request: &BuildRequest) -> Result<BuildReport> {
        let executor = StrategyExecutor::new(self.settings.build.make_program.clone());
        self.build_with(request, &executor).await
    }

    /// Build, handing each prepared job to `executor`
    pub async fn build_with<E: JobExecutor>(
        &self,
        request: &BuildRequest,
        executor: &E,
    ) -> Result<BuildReport> {
        let platform = self.registry.resolve(&request.target)?;
        let archs = platform.resolve_architectures(request.architectures.as_deref())?;

        let strategy = select_strategy(&request.source, request.strategy.as_deref())?;
        strategy.check_target(platform)?;

        let context = BuildContext::for_target(platform, &self.settings, &self.base_env)?;

        std::fs::create_dir_all(&request.output)
            .map_err(|e| XcompileError::io_at(&request.output, e))?;
        let output_root = std::fs::canonicalize(&request.output)
            .map_err(|e| XcompileError::io_at(&request.output, e))?;

        info!(
            "Building {} for {} with {} ({} architectures)",
            request.source.display(),
            platform.name(),
            strategy,
            archs.len()
        );

        let mut outcomes = Vec::with_capacity(archs.len());
        for arch in &archs {
            let copy = WorkingCopy::allocate(&self.settings.build.work_dir_prefix).map_err(
                |source| XcompileError::ArchitectureFailed {
                    arch: arch.clone(),
                    working_dir: std::env::temp_dir(),
                    source: Box::new(source),
                },
            )?;
            let working_dir = copy.source_dir().to_path_buf();

            println!("{}", "-".repeat(BANNER_WIDTH));
            println!("Building {} {} in {}", platform.name(), arch, working_dir.display());
            println!("{}", "-".repeat(BANNER_WIDTH));

            let started = Instant::now();
            let output_dir = output_root.join(arch);
            let job = BuildJob {
                target: platform.name(),
                arch,
                working_dir: &working_dir,
                output_dir: &output_dir,
                strategy,
                context: &context,
                base_env: &self.base_env,
            };

            self.run_job(&copy, &request.source, &output_root, &job, executor)
                .await
                .map_err(|source| XcompileError::ArchitectureFailed {
                    arch: arch.clone(),
                    working_dir: working_dir.clone(),
                    source: Box::new(source),
                })?;

            let duration = started.elapsed();
            info!("Built {} {} in {:.2}s", platform.name(), arch, duration.as_secs_f64());
            outcomes.push(BuildOutcome {
                arch: arch.clone(),
                working_dir,
                output_dir,
                duration,
            });
        }

        Ok(BuildReport {
            target: platform.name().to_string(),
            strategy,
            outcomes,
        })
    }

    async fn run_job<E: JobExecutor>(
        &self,
        copy: &WorkingCopy,
        source: &Path,
        output_root: &Path,
        job: &BuildJob<'_>,
        executor: &E,
    ) -> Result<()> {
        copy.populate(source, Some(output_root)).await?;
        job.context.prepare(job.arch).await?;

        std::fs::create_dir_all(job.output_dir)
            .map_err(|e| XcompileError::io_at(job.output_dir, e))?;

        debug!("Executing {} job for {}", job.strategy, job.arch);
        executor.execute(job).await
    }
}
