use std::time::Duration;

use crate::PaperweaveError;

/// Run-scoped configuration. Built once per run and never mutated afterwards;
/// every node reads it through the shared pipeline state.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Budget for a single agent call. Clamped to at least one second.
    pub timeout: Duration,
    /// Upper bound on critic-driven summarizer retries.
    pub max_critic_loops: u32,
    /// Optional hard cap on the raw input before cleanup.
    pub truncate_chars: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_tokens: 256,
            temperature: 0.1,
            timeout: Duration::from_secs(45),
            max_critic_loops: 1,
            truncate_chars: None,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), PaperweaveError> {
        if self.model.trim().is_empty() {
            return Err(PaperweaveError::InvalidConfig(
                "model name must not be empty".to_string(),
            ));
        }
        if self.max_tokens == 0 {
            return Err(PaperweaveError::InvalidConfig(
                "max_tokens must be at least 1".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(PaperweaveError::InvalidConfig(format!(
                "temperature {} outside [0, 2]",
                self.temperature
            )));
        }
        if self.timeout < Duration::from_secs(1) {
            return Err(PaperweaveError::InvalidConfig(
                "timeout must be at least one second".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_sub_second_timeout() {
        let config = PipelineConfig {
            timeout: Duration::from_millis(200),
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_empty_model() {
        let config = PipelineConfig {
            model: "  ".to_string(),
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
