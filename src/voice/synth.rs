use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::stage::Stage;
use crate::media::ffmpeg::{describe, stderr_tail};

/// Text-to-speech backend.
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` into an audio file at `out`.
    fn synthesize(&self, text: &str, out: &Path) -> ReelResult<()>;
}

/// Runs an external TTS program.
///
/// The argv template may contain `{text}` and `{out}`, replaced per call with the narration and
/// the output path. Example: `["say", "-o", "{out}", "{text}"]`.
#[derive(Clone, Debug)]
pub struct CommandSynthesizer {
    argv: Vec<String>,
}

impl CommandSynthesizer {
    /// Synthesizer for an argv template. The template must name a program.
    pub fn new(argv: Vec<String>) -> ReelResult<Self> {
        match argv.first() {
            Some(program) if !program.trim().is_empty() => {}
            _ => return Err(ReelError::input("voice command must name a program")),
        }
        if !argv.iter().any(|a| a.contains("{out}")) {
            return Err(ReelError::input(
                "voice command must contain an `{out}` placeholder",
            ));
        }
        Ok(Self { argv })
    }

    fn expand(&self, text: &str, out: &Path) -> Vec<OsString> {
        let out = out.to_string_lossy();
        self.argv
            .iter()
            .map(|a| OsString::from(a.replace("{text}", text).replace("{out}", &out)))
            .collect()
    }
}

impl SpeechSynthesizer for CommandSynthesizer {
    #[tracing::instrument(skip(self, text), level = "debug")]
    fn synthesize(&self, text: &str, out: &Path) -> ReelResult<()> {
        let argv = self.expand(text, out);
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| ReelError::input("voice command must name a program"))?;
        let command = describe(Path::new(program), args);
        tracing::debug!(%command, "running speech synthesizer");

        let result = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .output();
        let failure = match result {
            Err(e) => Some((format!("failed to spawn: {e}"), String::new())),
            Ok(o) if !o.status.success() => Some((o.status.to_string(), stderr_tail(&o.stderr))),
            Ok(_) => match std::fs::metadata(out) {
                Ok(meta) if meta.len() > 0 => None,
                _ => Some((
                    "exited successfully".to_string(),
                    format!("output '{}' is missing or empty", out.display()),
                )),
            },
        };

        match failure {
            None => Ok(()),
            Some((status, stderr)) => {
                // A partial file would be picked up as a finished clip on the next run.
                let _ = std::fs::remove_file(out);
                Err(ReelError::media_tool(
                    Stage::Synthesize,
                    command,
                    status,
                    stderr,
                ))
            }
        }
    }
}
