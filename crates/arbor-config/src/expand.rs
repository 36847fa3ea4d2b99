//! `${VAR}` expansion for string settings.
//!
//! Only the braced form is recognised. `${VAR:-fallback}` uses the fallback
//! when `VAR` is unset; a bare `${VAR}` that is unset is an error naming the
//! offending field.

use crate::ConfigError;

/// Lookup failure carried out of the `shellexpand` callback.
struct UnsetVar(String);

/// Expand variable references in `value`, reporting failures against `field`.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |name| -> Result<Option<String>, UnsetVar> {
        std::env::var(name)
            .map(Some)
            .map_err(|_| UnsetVar(name.to_owned()))
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

/// Expand `value` in place.
pub(crate) fn expand_in_place(value: &mut String, field: &str) -> Result<(), ConfigError> {
    let expanded = expand_env(value, field)?;
    *value = expanded;
    Ok(())
}
