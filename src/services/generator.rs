use crate::config::{DiagnosticsPolicy, GeneratorConfig};
use crate::error::{AppError, Result, GENERIC_FAILURE};
use crate::models::GenerationOutput;
use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, error, warn};

/// Environment variable carrying the mood text into the generator process.
pub const MOOD_TEXT_VAR: &str = "USER_TEXT";

/// Turns mood text into a playlist.
#[async_trait]
pub trait PlaylistGenerator: Send + Sync {
    async fn generate(&self, mood_text: &str) -> Result<GenerationOutput>;
}

/// Runs an external program once per call and reads its JSON from stdout.
pub struct ProcessGenerator {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
    timeout: Option<Duration>,
    diagnostics: DiagnosticsPolicy,
}

impl ProcessGenerator {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            working_dir: config.working_dir.clone(),
            timeout: config.timeout,
            diagnostics: config.diagnostics,
        }
    }

    async fn run(&self, mood_text: &str) -> Result<ProcessOutcome> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .env(MOOD_TEXT_VAR, mood_text)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // A timed out run drops the future, which must take the child with it
            .kill_on_drop(true);

        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        debug!("Spawning playlist generator: {} {:?}", self.program, self.args);

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, command.output())
                .await
                .map_err(|_| {
                    error!("Playlist generator did not finish within {:?}", limit);
                    AppError::Timeout(limit)
                })?,
            None => command.output().await,
        }
        .with_context(|| format!("failed to run playlist generator `{}`", self.program))?;

        Ok(ProcessOutcome::from(output))
    }
}

#[async_trait]
impl PlaylistGenerator for ProcessGenerator {
    async fn generate(&self, mood_text: &str) -> Result<GenerationOutput> {
        let outcome = self.run(mood_text).await?;
        outcome.into_generation(self.diagnostics)
    }
}

/// What a finished generator process left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl From<Output> for ProcessOutcome {
    fn from(output: Output) -> Self {
        Self {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

impl ProcessOutcome {
    /// Exit status and stderr are checked first, then stdout must be one JSON
    /// document. A truthy `error` field wins over everything else in it.
    pub fn into_generation(self, policy: DiagnosticsPolicy) -> Result<GenerationOutput> {
        let diagnostics_fail = policy == DiagnosticsPolicy::Strict && !self.stderr.is_empty();

        if !self.success || diagnostics_fail {
            error!(
                "Playlist generator failed (exit code {:?}): {}",
                self.code, self.stderr
            );
            let message = if self.stderr.is_empty() {
                GENERIC_FAILURE.to_string()
            } else {
                self.stderr
            };
            return Err(AppError::ExternalFailure(message));
        }

        if !self.stderr.is_empty() {
            warn!("Playlist generator wrote diagnostics: {}", self.stderr.trim_end());
        }

        let value: Value = serde_json::from_str(self.stdout.trim())
            .map_err(|e| AppError::MalformedOutput(e.to_string()))?;

        if let Some(message) = reported_error(&value) {
            return Err(AppError::Application(message));
        }

        serde_json::from_value(value).map_err(|e| AppError::MalformedOutput(e.to_string()))
    }
}

fn reported_error(value: &Value) -> Option<String> {
    match value.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(message) if message.is_empty() => None,
        Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn outcome(success: bool, stdout: &str, stderr: &str) -> ProcessOutcome {
        ProcessOutcome {
            success,
            code: Some(if success { 0 } else { 1 }),
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }
    }

    fn message(result: Result<GenerationOutput>) -> String {
        result.unwrap_err().user_message()
    }

    #[test]
    fn non_zero_exit_surfaces_stderr_verbatim() {
        let result =
            outcome(false, "", "Connection timed out").into_generation(DiagnosticsPolicy::Strict);
        assert!(matches!(result, Err(AppError::ExternalFailure(_))));
        assert_eq!(message(result), "Connection timed out");
    }

    #[test]
    fn non_zero_exit_without_stderr_uses_generic_message() {
        let result = outcome(false, r#"{"tracks": []}"#, "").into_generation(DiagnosticsPolicy::Strict);
        assert_eq!(message(result), GENERIC_FAILURE);

        let lenient = outcome(false, "", "").into_generation(DiagnosticsPolicy::Lenient);
        assert_eq!(message(lenient), GENERIC_FAILURE);
    }

    #[test]
    fn strict_policy_fails_on_any_stderr() {
        let result = outcome(true, r#"{"tracks": []}"#, "Warning: Cache file corrupted.\n")
            .into_generation(DiagnosticsPolicy::Strict);
        assert_eq!(message(result), "Warning: Cache file corrupted.\n");
    }

    #[test]
    fn lenient_policy_ignores_stderr_on_success() {
        let output = outcome(true, r#"{"tracks": [], "spotify_url": null}"#, "Warning\n")
            .into_generation(DiagnosticsPolicy::Lenient)
            .unwrap();
        assert!(output.tracks.is_empty());
    }

    #[test]
    fn non_json_stdout_is_malformed() {
        let result = outcome(true, "Traceback (most recent call last):", "")
            .into_generation(DiagnosticsPolicy::Strict);
        assert!(matches!(result, Err(AppError::MalformedOutput(_))));

        let empty = outcome(true, "", "").into_generation(DiagnosticsPolicy::Strict);
        assert!(matches!(empty, Err(AppError::MalformedOutput(_))));
    }

    #[test]
    fn tracks_missing_required_fields_are_malformed() {
        let result = outcome(true, r#"{"tracks": [{"id": "1"}]}"#, "")
            .into_generation(DiagnosticsPolicy::Strict);
        assert!(matches!(result, Err(AppError::MalformedOutput(_))));
    }

    #[test]
    fn local_tracks_without_an_id_pass_through() {
        let stdout = json!({
            "tracks": [
                {"id": null, "name": "Local Song", "artists": ["Me"], "album": "Demos", "albumImageUrl": null},
                {"id": "2", "name": "Song B", "artists": ["Artist Y"]}
            ],
            "spotify_url": "https://open.spotify.com/playlist/abc",
            "dominant_mood": "happy"
        })
        .to_string();

        let output = outcome(true, &stdout, "")
            .into_generation(DiagnosticsPolicy::Strict)
            .unwrap();

        assert_eq!(output.tracks.len(), 2);
        assert_eq!(output.tracks[0].id, None);
        assert_eq!(output.tracks[0].name, "Local Song");
        assert_eq!(output.tracks[0].key(0), "0");
        assert_eq!(output.tracks[1].key(1), "2");
        assert_eq!(output.dominant_mood(), Some("happy"));
    }

    #[test]
    fn reported_error_becomes_application_error() {
        let result = outcome(true, r#"{"error": "No mood text provided"}"#, "")
            .into_generation(DiagnosticsPolicy::Strict);
        assert!(matches!(result, Err(AppError::Application(_))));
        assert_eq!(message(result), "No mood text provided");

        let alongside_tracks = outcome(
            true,
            r#"{"tracks": [], "error": "Failed to create Spotify playlist."}"#,
            "",
        )
        .into_generation(DiagnosticsPolicy::Strict);
        assert_eq!(message(alongside_tracks), "Failed to create Spotify playlist.");
    }

    #[test]
    fn falsy_error_field_is_not_an_error() {
        let output = outcome(true, r#"{"tracks": [], "error": null}"#, "")
            .into_generation(DiagnosticsPolicy::Strict)
            .unwrap();
        assert!(output.tracks.is_empty());

        let output = outcome(true, r#"{"error": ""}"#, "")
            .into_generation(DiagnosticsPolicy::Strict)
            .unwrap();
        assert!(output.tracks.is_empty());

        for zero in ["0", "0.0", "false"] {
            let stdout = format!(r#"{{"tracks": [], "error": {}}}"#, zero);
            let output = outcome(true, &stdout, "")
                .into_generation(DiagnosticsPolicy::Strict)
                .unwrap();
            assert!(output.tracks.is_empty(), "error: {}", zero);
        }

        let numeric = outcome(true, r#"{"error": 42}"#, "")
            .into_generation(DiagnosticsPolicy::Strict);
        assert_eq!(message(numeric), "42");
    }

    #[test]
    fn success_reflects_tracks_in_order() {
        let stdout = json!({
            "tracks": [
                {"id": "2", "name": "Second", "artists": ["B"]},
                {"id": "1", "name": "First", "artists": ["A"], "album": "LP"}
            ],
            "spotify_url": "https://open.spotify.com/playlist/abc",
            "dominant_mood": "happy"
        })
        .to_string();

        let output = outcome(true, &format!("{}\n", stdout), "")
            .into_generation(DiagnosticsPolicy::Strict)
            .unwrap();

        let ids: Vec<&str> = output.tracks.iter().filter_map(|t| t.id.as_deref()).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert_eq!(output.tracks[1].album.as_deref(), Some("LP"));
        assert_eq!(
            output.spotify_url.as_deref(),
            Some("https://open.spotify.com/playlist/abc")
        );
        assert_eq!(output.dominant_mood(), Some("happy"));
    }

    #[cfg(unix)]
    fn shell(script: &str, timeout: Option<Duration>) -> ProcessGenerator {
        ProcessGenerator::new(&GeneratorConfig {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
            working_dir: None,
            timeout,
            diagnostics: DiagnosticsPolicy::Strict,
        })
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn mood_text_reaches_the_process_environment() {
        let generator = shell(
            r#"printf '{"tracks":[],"spotify_url":null,"echo":"%s"}' "$USER_TEXT""#,
            Some(Duration::from_secs(10)),
        );

        let output = generator.generate("I'm feeling energetic").await.unwrap();
        assert_eq!(output.extra.get("echo"), Some(&json!("I'm feeling energetic")));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn process_failure_carries_stderr() {
        let generator = shell(
            "printf 'Connection timed out' >&2; exit 1",
            Some(Duration::from_secs(10)),
        );

        let err = generator.generate("sad").await.unwrap_err();
        assert_eq!(err.user_message(), "Connection timed out");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn hung_process_hits_the_timeout() {
        let generator = shell("sleep 5", Some(Duration::from_millis(100)));

        let err = generator.generate("calm").await.unwrap_err();
        assert!(matches!(err, AppError::Timeout(_)));
    }

    #[tokio::test]
    async fn missing_program_is_internal() {
        let generator = ProcessGenerator::new(&GeneratorConfig {
            program: "moodify-generator-that-does-not-exist".to_string(),
            args: Vec::new(),
            working_dir: None,
            timeout: None,
            diagnostics: DiagnosticsPolicy::Strict,
        });

        let err = generator.generate("calm").await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
