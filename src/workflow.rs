//! The sequential release workflow.
//!
//! Drives a release from validated preconditions to two emitted scripts.
//! The workflow itself never mutates remote state: remote mutation is
//! deferred into the generated `push` script, and everything executed
//! immediately (branch checkout, local commits, local clones) is safe to
//! undo locally via the generated `abort` script.
//!
//! Failure policy: precondition validation and version parsing are hard
//! failures. Once the execution sequence has started, a failing external
//! command does not stop the run; its captured error text stands in for the
//! expected output, a warning is printed, and later steps continue. The
//! operator reviews the generated scripts before anything is pushed.

use std::collections::HashMap;
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use console::style;

use crate::config::{CompanionConfig, Config, SiteConfig};
use crate::context::ReleaseContext;
use crate::error::{ReleaseError, Result};
use crate::manifest;
use crate::shell::Shell;
use crate::template;
use crate::ui::{self, formatter};
use crate::version::Version;

const ABORT_SCRIPT: &str = "abort";
const PUSH_SCRIPT: &str = "push";

/// How a workflow run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Scripts emitted; the release is ready to push or abort.
    Success,
    /// A precondition check failed; nothing was mutated.
    PreconditionFailed,
    /// The operator quit at the version prompt; nothing was mutated.
    Cancelled,
}

/// Sequential, single-threaded driver for one release run.
pub struct ReleaseWorkflow<'a, S: Shell> {
    shell: &'a S,
    config: &'a Config,
    dir: PathBuf,
    ctx: ReleaseContext,
}

impl<'a, S: Shell> ReleaseWorkflow<'a, S> {
    /// Creates a workflow for the repository in `dir`, reading the current
    /// version from its package manifest.
    pub fn new(shell: &'a S, config: &'a Config, dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let old_version = manifest::read_version(&dir.join(&config.manifest))?;
        Ok(ReleaseWorkflow {
            shell,
            config,
            dir,
            ctx: ReleaseContext::new(old_version),
        })
    }

    /// The accumulated release context.
    pub fn context(&self) -> &ReleaseContext {
        &self.ctx
    }

    /// Runs the workflow: validate, prompt, execute the release sequence,
    /// emit the `abort` and `push` scripts.
    pub fn run<R: BufRead, W: Write>(&mut self, input: &mut R, out: &mut W) -> Result<Outcome> {
        let config = self.config;

        if let Err(e) = self.validate() {
            writeln!(out, "{}", formatter::error_line(&e.to_string()))?;
            return Ok(Outcome::PreconditionFailed);
        }

        let Some(version) = ui::choose_version(&self.ctx.old_version, input, out)? else {
            writeln!(out, "Release cancelled.")?;
            return Ok(Outcome::Cancelled);
        };
        self.ctx.new_version = Some(version.clone());
        self.seed_commands();

        writeln!(out, "{}", formatter::rule())?;

        self.checkout_release_branch(out)?;
        self.update_manifest(out, &version)?;
        self.generate_changelog(out)?;
        self.commit_changes(out)?;
        self.tag_release();
        if let Some(companion) = config.companion.as_ref() {
            self.clone_repo(out, &companion.name, &companion.url)?;
            self.update_companion(out, companion, &version)?;
        }
        if let Some(site) = config.site.as_ref() {
            self.clone_repo(out, &site.name, &site.url)?;
            self.update_site(out, site, &version)?;
        }
        self.update_trunk();
        self.write_scripts()?;

        writeln!(out, "{}", formatter::rule())?;
        writeln!(out, "Your repo is ready to be pushed.")?;
        writeln!(
            out,
            "Please look over {} and make any changes.",
            style(&config.changelog).cyan()
        )?;
        writeln!(
            out,
            "When you are ready, run {} to finish the release.",
            style("./push").cyan()
        )?;
        writeln!(
            out,
            "If you would like to cancel this release, run {}.",
            style("./abort").cyan()
        )?;

        Ok(Outcome::Success)
    }

    /// Checks the publishing identity, the current branch, and that trunk
    /// is in sync with the remote. Fails before any side effect.
    fn validate(&self) -> Result<()> {
        let config = self.config;

        if config.registry_user.is_empty() {
            return Err(ReleaseError::precondition(
                "registry_user is not configured",
            ));
        }

        let identity = self
            .shell
            .run("npm whoami", Some(&self.dir))
            .map_err(|e| {
                ReleaseError::precondition(format!("unable to determine npm identity: {}", e))
            })?;
        if identity != config.registry_user {
            return Err(ReleaseError::precondition(format!(
                "you must be authenticated with npm as '{}' to perform a release (currently '{}')",
                config.registry_user, identity
            )));
        }

        let branch = self
            .shell
            .run("git rev-parse --abbrev-ref HEAD", Some(&self.dir))
            .map_err(|e| {
                ReleaseError::precondition(format!("unable to determine current branch: {}", e))
            })?;
        if branch != config.trunk {
            return Err(ReleaseError::precondition(format!(
                "releases can only be performed from {} (currently on {})",
                config.trunk, branch
            )));
        }

        let pull = format!("git pull -q --rebase {} {}", config.origin, config.trunk);
        self.shell.run(&pull, Some(&self.dir)).map_err(|_| {
            ReleaseError::precondition(format!(
                "please make sure your local branch is synced with {}/{}",
                config.origin, config.trunk
            ))
        })?;

        Ok(())
    }

    /// Seeds the command lists once a version has been chosen: both scripts
    /// remove themselves, and aborting returns to trunk.
    fn seed_commands(&mut self) {
        self.ctx.abort_cmds.extend([
            "git checkout {{trunk}}".to_string(),
            format!("rm {} {}", ABORT_SCRIPT, PUSH_SCRIPT),
        ]);
        self.ctx
            .push_cmds
            .push(format!("rm {} {}", ABORT_SCRIPT, PUSH_SCRIPT));
    }

    /// Template variables for this run: context versions plus origin/trunk.
    fn vars(&self) -> HashMap<String, String> {
        let mut vars = self.ctx.vars();
        vars.insert("origin".to_string(), self.config.origin.clone());
        vars.insert("trunk".to_string(), self.config.trunk.clone());
        vars
    }

    /// Fills and runs a command, tolerating failure: a failed command's
    /// error text is returned in place of its output after printing a
    /// warning, and the sequence continues.
    fn run_lax<W: Write>(&self, out: &mut W, command: &str, dir: &Path) -> Result<String> {
        let filled = template::fill(command, &self.vars())?;
        match self.shell.run(&filled, Some(dir)) {
            Ok(stdout) => Ok(stdout),
            Err(e) => {
                writeln!(out, "\n{}", formatter::warning(&e.to_string()))?;
                Ok(e.to_string())
            }
        }
    }

    fn checkout_release_branch<W: Write>(&mut self, out: &mut W) -> Result<()> {
        self.run_lax(out, "git checkout -q -b release/{{new_version}}", &self.dir)?;
        self.ctx
            .abort_cmds
            .push("git branch -D release/{{new_version}}".to_string());
        Ok(())
    }

    fn update_manifest<W: Write>(&mut self, out: &mut W, new: &Version) -> Result<()> {
        let config = self.config;
        write!(
            out,
            "{}",
            formatter::start(&format!(
                "Updating {} version from {} to {}...",
                style(&config.manifest).cyan(),
                style(&self.ctx.old_version).cyan(),
                style(new).cyan()
            ))
        )?;
        manifest::write_version(&self.dir.join(&config.manifest), new)?;
        writeln!(out, "{}", formatter::done())?;

        self.ctx
            .abort_cmds
            .push(format!("git checkout {}", config.manifest));
        self.ctx.push_cmds.push(format!("git add {}", config.manifest));
        Ok(())
    }

    fn generate_changelog<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let config = self.config;
        write!(
            out,
            "{}",
            formatter::start(&format!(
                "Generating changelog from {} to {}...",
                style(&self.ctx.old_version).cyan(),
                style(self.ctx.new_version.as_ref().unwrap_or(&self.ctx.old_version)).cyan()
            ))
        )?;
        self.run_lax(out, "git fetch --tags", &self.dir)?;
        self.run_lax(out, &config.changelog_command, &self.dir)?;
        writeln!(out, "{}", formatter::done())?;

        self.ctx
            .abort_cmds
            .push(format!("git checkout {}", config.changelog));
        self.ctx
            .push_cmds
            .push(format!("git add {}", config.changelog));
        Ok(())
    }

    fn commit_changes<W: Write>(&mut self, out: &mut W) -> Result<()> {
        write!(out, "{}", formatter::start("Committing changes..."))?;
        self.run_lax(
            out,
            "git commit -am \"release: version {{new_version}}\"",
            &self.dir,
        )?;
        writeln!(out, "{}", formatter::done())?;

        self.ctx
            .push_cmds
            .push("git commit --amend --no-edit".to_string());
        Ok(())
    }

    /// Tagging is deferred entirely: nothing is executed until the operator
    /// runs the push script.
    fn tag_release(&mut self) {
        self.ctx.push_cmds.extend([
            "git tag v{{new_version}}".to_string(),
            "git push {{origin}} HEAD".to_string(),
            "git push --tags".to_string(),
        ]);
    }

    fn clone_repo<W: Write>(&mut self, out: &mut W, name: &str, url: &str) -> Result<()> {
        write!(
            out,
            "{}",
            formatter::start(&format!("Cloning {}...", style(name).cyan()))
        )?;
        self.run_lax(out, &format!("git clone {} --depth=1", url), &self.dir)?;
        writeln!(out, "{}", formatter::done())?;

        self.ctx.cleanup_cmds.push(format!("rm -rf {}", name));
        Ok(())
    }

    fn update_companion<W: Write>(
        &mut self,
        out: &mut W,
        companion: &CompanionConfig,
        new: &Version,
    ) -> Result<()> {
        let config = self.config;
        let clone_dir = self.dir.join(&companion.name);

        write!(
            out,
            "{}",
            formatter::start(&format!(
                "Updating {} version...",
                style(&companion.name).cyan()
            ))
        )?;
        for manifest_name in &companion.manifests {
            manifest::write_version(&clone_dir.join(manifest_name), new)?;
        }
        writeln!(out, "{}", formatter::done())?;

        write!(out, "{}", formatter::start("Building release artifacts..."))?;
        for command in &config.build_commands {
            self.run_lax(out, command, &self.dir)?;
        }
        writeln!(out, "{}", formatter::done())?;

        write!(
            out,
            "{}",
            formatter::start(&format!(
                "Copying artifacts into {}...",
                style(&companion.name).cyan()
            ))
        )?;
        let copy_commands = [
            "cp -Rf ../dist/* ./",
            "git add -A",
            "git commit -m \"release: version {{new_version}}\"",
            "rm -rf ../dist",
        ];
        for command in copy_commands {
            self.run_lax(out, command, &clone_dir)?;
        }
        writeln!(out, "{}", formatter::done())?;

        self.ctx.push_cmds.extend([
            comment("push the companion package and publish"),
            format!("cd {}", companion.name),
            format!("cp ../{} .", config.changelog),
            format!("git add {}", config.changelog),
            "git commit --amend --no-edit".to_string(),
            "git tag -f v{{new_version}}".to_string(),
            "git push".to_string(),
            "git push --tags".to_string(),
            companion.publish_command.clone(),
            "cd ..".to_string(),
        ]);
        Ok(())
    }

    fn update_site<W: Write>(
        &mut self,
        out: &mut W,
        site: &SiteConfig,
        new: &Version,
    ) -> Result<()> {
        let clone_dir = self.dir.join(&site.name);

        write!(
            out,
            "{}",
            formatter::start(&format!(
                "Adding version {} to the docs site...",
                style(new).cyan()
            ))
        )?;
        manifest::promote_site_version(&clone_dir.join(&site.index), new)?;
        for command in &site.build_commands {
            self.run_lax(out, command, &self.dir)?;
        }
        let copy_commands = [
            "rm -rf latest",
            "cp -Rf ../dist/docs {{new_version}}",
            "cp -Rf ../dist/docs latest",
            "git add -A",
            "git commit -m \"release: version {{new_version}}\"",
            "rm -rf ../dist",
        ];
        for command in copy_commands {
            self.run_lax(out, command, &clone_dir)?;
        }
        writeln!(out, "{}", formatter::done())?;

        self.ctx.push_cmds.extend([
            comment("push the docs site"),
            format!("cd {}", site.name),
            "git push".to_string(),
            "cd ..".to_string(),
        ]);
        Ok(())
    }

    /// Push-time trunk update: pull the release changelog back onto trunk
    /// and bump the manifest there via a generated one-line script.
    fn update_trunk(&mut self) {
        let config = self.config;
        self.ctx.push_cmds.extend([
            comment("update the release manifest on trunk"),
            "git checkout {{trunk}}".to_string(),
            "git pull --rebase {{origin}} {{trunk}}".to_string(),
            format!("git checkout release/{{{{new_version}}}} -- {}", config.changelog),
            manifest_rewrite_script(&config.manifest),
            format!("git add {}", config.changelog),
            format!("git add {}", config.manifest),
            "git commit -m \"chore: update version number to {{new_version}}\"".to_string(),
            "git push {{origin}} {{trunk}}".to_string(),
        ]);
    }

    /// Emits the abort and push scripts, each followed by the cleanup
    /// commands, with every template resolved against the final context.
    fn write_scripts(&self) -> Result<()> {
        let vars = self.vars();
        self.write_script(
            ABORT_SCRIPT,
            self.ctx.abort_cmds.iter().chain(&self.ctx.cleanup_cmds),
            &vars,
        )?;
        self.write_script(
            PUSH_SCRIPT,
            self.ctx.push_cmds.iter().chain(&self.ctx.cleanup_cmds),
            &vars,
        )
    }

    fn write_script<'c>(
        &self,
        name: &str,
        commands: impl Iterator<Item = &'c String>,
        vars: &HashMap<String, String>,
    ) -> Result<()> {
        let mut body = String::from("#!/usr/bin/env bash\n\n");
        for command in commands {
            body.push_str(&template::fill(command, vars)?);
            body.push('\n');
        }

        let path = self.dir.join(name);
        fs::write(&path, body)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
        }
        Ok(())
    }
}

/// A blank-line-delimited comment for the generated scripts.
fn comment(message: &str) -> String {
    format!("\n# {}\n", message)
}

/// One-line script that rewrites the manifest version on trunk at push
/// time, when the new version is known to the script but trunk still
/// carries the old manifest.
fn manifest_rewrite_script(manifest: &str) -> String {
    format!(
        "node -e \"var fs = require('fs'); var pkg = JSON.parse(fs.readFileSync('{m}')); \
         pkg.version = '{{{{new_version}}}}'; \
         fs.writeFileSync('{m}', JSON.stringify(pkg, null, 2) + '\\n');\"",
        m = manifest
    )
}
