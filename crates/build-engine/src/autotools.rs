//! Autotools Build
//!
//! `./configure --host=<triple> --prefix <output>`, `make`, `make install`.

use xcompile_android_toolchain::ToolCommand;
use xcompile_core::Result;

use crate::job::BuildJob;

/// Script whose presence marks an autotools source tree
pub const CONFIGURE_SCRIPT: &str = "configure";

/// The configure, build and install commands for `job`
pub fn commands(job: &BuildJob<'_>, make: &str) -> Result<Vec<ToolCommand>> {
    let host = job.host_triple()?;
    let env = job.environment()?;
    let prefix = job.output_dir.to_string_lossy().into_owned();

    let configure = ToolCommand::new("configure", job.working_dir.join(CONFIGURE_SCRIPT))
        .arg(format!("--host={}", host))
        .args(["--prefix".to_string(), prefix])
        .current_dir(job.working_dir)
        .env(env.clone());

    let build = ToolCommand::new("build", make)
        .current_dir(job.working_dir)
        .env(env.clone());

    let install = ToolCommand::new("install", make)
        .arg("install")
        .current_dir(job.working_dir)
        .env(env);

    Ok(vec![configure, build, install])
}
