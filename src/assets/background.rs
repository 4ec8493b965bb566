//! Background removal as a black box: encoded image in, encoded image with alpha out.

use std::io::{Read, Write};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use crate::{
    assets::decode::{PreparedImage, decode_image},
    foundation::error::{EzidError, EzidResult},
};

/// How long [`CommandRemover`] waits before killing the external program.
pub const DEFAULT_REMOVER_TIMEOUT: Duration = Duration::from_secs(120);

/// Anything that can strip the background from an encoded portrait.
pub trait BackgroundRemover: Send + Sync {
    /// Short name used in logs and notices.
    fn name(&self) -> &str;

    /// Returns encoded image bytes (typically PNG with transparency) for `image`.
    fn remove_background(&self, image: &[u8]) -> EzidResult<Vec<u8>>;
}

/// Pipes the portrait through an external program (for example `rembg i`) on stdin/stdout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandRemover {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandRemover {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: DEFAULT_REMOVER_TIMEOUT,
        }
    }

    /// Parse a whitespace-separated command line such as `"rembg i"`.
    pub fn from_command_line(line: &str) -> EzidResult<Self> {
        let mut parts = line.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| EzidError::validation("background remover command is empty"))?;
        Ok(Self::new(program).with_args(parts))
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl BackgroundRemover for CommandRemover {
    fn name(&self) -> &str {
        &self.program
    }

    fn remove_background(&self, image: &[u8]) -> EzidResult<Vec<u8>> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                EzidError::asset(format!("failed to spawn '{}': {e}", self.program))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| EzidError::asset("failed to open remover stdin (unexpected)"))?;
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| EzidError::asset("failed to open remover stdout (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| EzidError::asset("failed to open remover stderr (unexpected)"))?;

        let input = image.to_vec();
        let writer = std::thread::spawn(move || stdin.write_all(&input));
        let stdout_drain = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stdout.read_to_end(&mut bytes)?;
            Ok::<_, std::io::Error>(bytes)
        });
        let stderr_drain = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok::<_, std::io::Error>(bytes)
        });

        let started = Instant::now();
        let status = loop {
            if let Some(status) = child
                .try_wait()
                .map_err(|e| EzidError::asset(format!("failed to wait for remover: {e}")))?
            {
                break status;
            }
            if started.elapsed() >= self.timeout {
                let _ = child.kill();
                let _ = child.wait();
                return Err(EzidError::asset(format!(
                    "'{}' timed out after {:?}",
                    self.program, self.timeout
                )));
            }
            std::thread::sleep(Duration::from_millis(10));
        };

        if let Ok(Err(e)) = writer.join() {
            tracing::debug!(error = %e, "remover closed stdin early");
        }
        let stderr_bytes = stderr_drain
            .join()
            .map_err(|_| EzidError::asset("remover stderr drain thread panicked"))?
            .unwrap_or_default();
        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(EzidError::asset(format!(
                "'{}' exited with status {}: {}",
                self.program,
                status,
                stderr.trim()
            )));
        }

        let out = stdout_drain
            .join()
            .map_err(|_| EzidError::asset("remover stdout drain thread panicked"))?
            .map_err(|e| EzidError::asset(format!("remover stdout read failed: {e}")))?;
        if out.is_empty() {
            return Err(EzidError::asset(format!(
                "'{}' produced no output",
                self.program
            )));
        }
        Ok(out)
    }
}

/// A decoded portrait ready to be used as the bottom layer of a cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedPortrait {
    pub image: PreparedImage,
    /// `true` when `image` is the remover's output.
    pub background_removed: bool,
    /// Set when background removal was requested but the original portrait had to be used.
    pub notice: Option<String>,
}

/// Decode `bytes`, optionally passing them through `remover` first.
///
/// The portrait itself must decode. A remover failure, or remover output that does not decode,
/// falls back to the original image and reports why in `notice`.
pub fn prepare_portrait(
    bytes: &[u8],
    remover: Option<&dyn BackgroundRemover>,
) -> EzidResult<PreparedPortrait> {
    let original = decode_image(bytes)?;
    let Some(remover) = remover else {
        return Ok(PreparedPortrait {
            image: original,
            background_removed: false,
            notice: None,
        });
    };

    match remover
        .remove_background(bytes)
        .and_then(|out| decode_image(&out))
    {
        Ok(image) => Ok(PreparedPortrait {
            image,
            background_removed: true,
            notice: None,
        }),
        Err(e) => {
            tracing::warn!(
                remover = remover.name(),
                error = %e,
                "background removal failed, keeping original portrait"
            );
            Ok(PreparedPortrait {
                image: original,
                background_removed: false,
                notice: Some(format!(
                    "background removal failed ({e}); using the original portrait"
                )),
            })
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/background.rs"]
mod tests;
