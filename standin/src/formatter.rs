use crate::config::AppConfig;
use colored::*;
use standin_core::ApiError;
use standin_core::relay::Prompt;
use std::fmt::Display;

/// A wrapper struct for a formatted, colored string.
///
/// Implements `Display` so it can be printed directly.
pub struct FormattedString(pub String);

pub struct GenericError<T: Display>(pub &'static str, pub T);

/// The log of a failed exchange, opened from the debug prompt.
pub struct LogView(pub String);

/// Notice printed when the value shown is sample data.
pub struct SampleNotice;

/// Notice printed when a run ended without any callback.
pub struct Unresolved(pub &'static str);

impl std::fmt::Display for FormattedString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}", self.0)?;
        Ok(())
    }
}

impl From<serde_json::Value> for FormattedString {
    fn from(value: serde_json::Value) -> Self {
        FormattedString(serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string()))
    }
}

impl From<ApiError> for FormattedString {
    fn from(err: ApiError) -> Self {
        let title = match err {
            ApiError::Service => "Unexpected Response:",
            ApiError::Network => "Network Failure:",
            ApiError::Client { .. } => "Request Rejected:",
        };
        FormattedString(format!("{}\n\n'{}'", title.red().bold(), err))
    }
}

impl From<anyhow::Error> for FormattedString {
    fn from(err: anyhow::Error) -> Self {
        FormattedString(format!("{}\n\n'{:#}'", "Error:".red().bold(), err))
    }
}

impl<T: Display> From<GenericError<T>> for FormattedString {
    fn from(GenericError(msg, err): GenericError<T>) -> Self {
        FormattedString(format!("{}:\n\n'{}'", msg.red().bold(), err))
    }
}

impl From<&Prompt> for FormattedString {
    fn from(prompt: &Prompt) -> Self {
        FormattedString(format!(
            "{}\n{}",
            prompt.title.red().bold(),
            prompt.message.yellow()
        ))
    }
}

impl From<LogView> for FormattedString {
    fn from(LogView(log): LogView) -> Self {
        FormattedString(format!("{}\n\n{}", "Error Log:".cyan().bold(), log))
    }
}

impl From<SampleNotice> for FormattedString {
    fn from(_: SampleNotice) -> Self {
        FormattedString("Showing sample data, the real response was not used.".yellow().to_string())
    }
}

impl From<Unresolved> for FormattedString {
    fn from(Unresolved(reason): Unresolved) -> Self {
        FormattedString(format!("{} {}", "No result:".yellow().bold(), reason))
    }
}

impl From<&AppConfig> for FormattedString {
    fn from(config: &AppConfig) -> Self {
        let timeout = config
            .timeout_secs
            .map(|secs| format!("{secs}s"))
            .unwrap_or_else(|| "none".to_string());

        let mut out = String::new();
        out.push_str(&format!("{:<14}{}\n", "mode".cyan(), config.mode.to_string().green()));
        out.push_str(&format!("{:<14}{}\n", "code key".cyan(), config.envelope.code));
        out.push_str(&format!("{:<14}{}\n", "data key".cyan(), config.envelope.data));
        out.push_str(&format!("{:<14}{}\n", "msg key".cyan(), config.envelope.msg));
        out.push_str(&format!(
            "{:<14}{}\n",
            "success code".cyan(),
            config.envelope.success_code
        ));
        out.push_str(&format!("{:<14}{}", "timeout".cyan(), timeout));
        FormattedString(out)
    }
}
