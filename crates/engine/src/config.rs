//! Engine configuration loaded from environment variables.

/// Default length of generated entry passwords.
const DEFAULT_ENTRY_PASSWORD_LEN: usize = 6;

/// Engine configuration.
///
/// All fields have defaults suitable for local development; override
/// via environment variables in production.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Length of generated entry passwords (default: `6`).
    pub entry_password_len: usize,
    /// Whether completions revise dish prep estimates (default: `true`).
    pub adaptive_prep: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            entry_password_len: DEFAULT_ENTRY_PASSWORD_LEN,
            adaptive_prep: true,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default |
    /// |----------------------|---------|
    /// | `ENTRY_PASSWORD_LEN` | `6`     |
    /// | `ADAPTIVE_PREP`      | `true`  |
    pub fn from_env() -> Self {
        let entry_password_len: usize = std::env::var("ENTRY_PASSWORD_LEN")
            .unwrap_or_else(|_| DEFAULT_ENTRY_PASSWORD_LEN.to_string())
            .parse()
            .expect("ENTRY_PASSWORD_LEN must be a valid usize");

        let adaptive_prep: bool = std::env::var("ADAPTIVE_PREP")
            .unwrap_or_else(|_| "true".into())
            .parse()
            .expect("ADAPTIVE_PREP must be `true` or `false`");

        Self {
            entry_password_len,
            adaptive_prep,
        }
    }
}
