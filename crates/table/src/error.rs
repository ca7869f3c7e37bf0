// ---------------------------------------------------------------------------
// ConfiguratorError: setup and configuration failures
// ---------------------------------------------------------------------------

use std::fmt;

/// Errors that stop the configurator from starting or from reading its
/// configuration.
///
/// Asset-load failures are deliberately absent: those are tolerated and
/// only logged, leaving the affected texture slot empty.
#[derive(Debug)]
pub enum ConfiguratorError {
    /// No canvas / window to render into.
    MissingRenderTarget(String),
    /// The config file could not be read.
    Io(std::io::Error),
    /// The config file is not valid JSON for `TableParams`.
    ConfigParse(serde_json::Error),
}

impl fmt::Display for ConfiguratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfiguratorError::MissingRenderTarget(target) => {
                write!(f, "Render target \"{target}\" not found")
            }
            ConfiguratorError::Io(e) => write!(f, "I/O error: {e}"),
            ConfiguratorError::ConfigParse(e) => write!(f, "Invalid configuration: {e}"),
        }
    }
}

impl std::error::Error for ConfiguratorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfiguratorError::Io(e) => Some(e),
            ConfiguratorError::ConfigParse(e) => Some(e),
            ConfiguratorError::MissingRenderTarget(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfiguratorError {
    fn from(e: std::io::Error) -> Self {
        ConfiguratorError::Io(e)
    }
}

impl From<serde_json::Error> for ConfiguratorError {
    fn from(e: serde_json::Error) -> Self {
        ConfiguratorError::ConfigParse(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_render_target_display() {
        let err = ConfiguratorError::MissingRenderTarget("canvas.webgl".to_string());
        let msg = format!("{err}");
        assert!(msg.contains("canvas.webgl"), "got: {msg}");
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn test_io_error_keeps_source() {
        let err: ConfiguratorError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file").into();
        assert!(format!("{err}").contains("no such file"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
