use std::sync::Arc;

use crate::error::ResolveError;
use crate::id::FacebookId;
use crate::lookup::{Credentials, Lookup};
use crate::normalize::{extract_profile_id, normalize, profile_url};
use crate::overrides::OverrideTable;
use crate::unpack_error;

/// Settings the resolver receives from its caller. The resolver never reads
/// the environment itself.
#[derive(Debug, Clone, Default)]
pub struct ResolverConfig {
    pub app_id: String,
    pub app_secret: String,
    pub dev_mode_enabled: bool,
}

impl ResolverConfig {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.app_id, &self.app_secret)
    }
}

/// Resolves a raw profile reference to a numeric Facebook ID.
///
/// Order, first success wins:
/// 1. override table (dev mode only), raw input then normalized form
/// 2. the normalized form is itself an ID
/// 3. an `id` query parameter embedded in the normalized form
/// 4. the external lookup
pub async fn resolve(
    raw: &str,
    lookup: &dyn Lookup,
    config: &ResolverConfig,
    overrides: Option<&OverrideTable>,
) -> Result<FacebookId, ResolveError> {
    let input = raw.trim();
    if input.is_empty() {
        return Err(ResolveError::MissingInput);
    }

    let normalized = normalize(input);

    if config.dev_mode_enabled {
        if let Some(id) = overrides.and_then(|table| table.get(input, &normalized)) {
            tracing::warn!(input, id = %id, "dev mode active, resolved from override table");
            return Ok(id.clone());
        }
    }

    if let Some(id) = FacebookId::parse(&normalized) {
        tracing::info!(input, id = %id, "input is already a facebook id");
        return Ok(id);
    }

    if let Some(param) = extract_profile_id(&normalized) {
        match FacebookId::parse(&param) {
            Some(id) => {
                tracing::info!(input, id = %id, "resolved from id query parameter");
                return Ok(id);
            }
            None => {
                tracing::info!(input, param = %param, "ignoring id query parameter that is not a facebook id");
            }
        }
    }

    let url = profile_url(&normalized);
    let payload = match lookup.lookup(&url, &config.credentials()).await {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!(input, profile_url = %url, error = %unpack_error(&e), "lookup failed");
            return Err(ResolveError::ResolutionFailed);
        }
    };

    match payload.id {
        Some(raw_id) => match FacebookId::parse(&raw_id) {
            Some(id) => {
                tracing::info!(input, id = %id, "resolved via lookup");
                Ok(id)
            }
            None => {
                tracing::warn!(input, returned_id = %raw_id, "lookup returned an id that is not a facebook id");
                Err(ResolveError::NotFound)
            }
        },
        None => {
            tracing::info!(input, profile_url = %url, "lookup found no id");
            Err(ResolveError::NotFound)
        }
    }
}

/// A resolver bundled with its collaborators, shared through the app state.
pub struct Resolver {
    lookup: Arc<dyn Lookup>,
    config: ResolverConfig,
    overrides: Option<OverrideTable>,
}

impl Resolver {
    pub fn new(
        lookup: Arc<dyn Lookup>,
        config: ResolverConfig,
        overrides: Option<OverrideTable>,
    ) -> Self {
        Resolver {
            lookup,
            config,
            overrides,
        }
    }

    pub async fn resolve(&self, raw: &str) -> Result<FacebookId, ResolveError> {
        resolve(raw, self.lookup.as_ref(), &self.config, self.overrides.as_ref()).await
    }
}
