use std::env;

/// Source of environment variables.
///
/// Does **not** require `Send + Sync`; configuration is resolved once at
/// startup.
pub trait ReadEnv {
    fn var(&self, key: &str) -> Result<String, env::VarError>;
}

/// Reads the process environment.
pub struct SystemEnv;

impl ReadEnv for SystemEnv {
    #[inline]
    fn var(&self, key: &str) -> Result<String, env::VarError> {
        env::var(key)
    }
}

#[cfg(test)]
pub use in_memory::InMemoryEnv;
