//! OpenSSL Build
//!
//! OpenSSL ships its own `Configure` which names Android targets
//! `android-<arch>`, and installs libraries and headers with `install_sw`.
//! Only meaningful with an Android build context.

use xcompile_android_toolchain::{AndroidBuildContext, ToolCommand};
use xcompile_core::Result;

use crate::job::BuildJob;

pub const CONFIGURE_SCRIPT: &str = "Configure";

/// The configure, build and install commands for `job`
pub fn commands(
    android: &AndroidBuildContext,
    job: &BuildJob<'_>,
    make: &str,
) -> Result<Vec<ToolCommand>> {
    let env = android.build_environment(job.arch, job.output_dir, job.base_env)?;

    let configure = ToolCommand::new("configure", job.working_dir.join(CONFIGURE_SCRIPT))
        .arg(format!("android-{}", job.arch))
        .arg(format!("--prefix={}", job.output_dir.display()))
        .current_dir(job.working_dir)
        .env(env.clone());

    let build = ToolCommand::new("build", make)
        .current_dir(job.working_dir)
        .env(env.clone());

    let install = ToolCommand::new("install", make)
        .args(["install_sw", "VERBOSE=1"])
        .current_dir(job.working_dir)
        .env(env);

    Ok(vec![configure, build, install])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use xcompile_android_toolchain::BuildEnvironment;
    use xcompile_core::AndroidSettings;

    use crate::context::BuildContext;
    use crate::strategy::BuildStrategy;

    #[test]
    fn test_openssl_commands() {
        let android = AndroidBuildContext::new("/ndk", &AndroidSettings::default());
        let context = BuildContext::Android(android.clone());
        let base = BuildEnvironment::default();
        let job = BuildJob {
            target: "android",
            arch: "arm64",
            working_dir: Path::new("/work/src"),
            output_dir: Path::new("/out/arm64"),
            strategy: BuildStrategy::OpenSsl,
            context: &context,
            base_env: &base,
        };

        let cmds = commands(&android, &job, "make").unwrap();
        assert_eq!(
            cmds[0].to_string(),
            "/work/src/Configure android-arm64 --prefix=/out/arm64"
        );
        assert_eq!(cmds[1].to_string(), "make");
        assert_eq!(cmds[2].to_string(), "make install_sw VERBOSE=1");
        assert_eq!(
            cmds[0].get_env().unwrap().get("ANDROID_NDK"),
            Some("/ndk")
        );
    }
}
