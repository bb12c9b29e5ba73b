//! Backend registry.
//!
//! Maps each configured [`BackendName`] to its adapter. Built once at
//! startup and shared read-only; resolution never substitutes one backend
//! for another.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;

use super::rig::{AnthropicAdapter, CallSettings, GeminiAdapter, OpenAiAdapter};
use super::{ProviderAdapter, ProviderError};
use crate::config::Config;
use crate::models::BackendName;

/// Capability entry for one configured backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendInfo {
    pub id: &'static str,
    pub display_name: &'static str,
    pub supported_models: Vec<&'static str>,
    pub is_default: bool,
}

/// Immutable set of configured adapters.
pub struct ProviderRegistry {
    adapters: IndexMap<BackendName, Arc<dyn ProviderAdapter>>,
    default: BackendName,
}

impl ProviderRegistry {
    /// Build every backend that has a credential in `config`.
    ///
    /// Backends without a credential are skipped silently. A backend whose
    /// client cannot be constructed is logged and skipped.
    pub fn from_config(config: &Config) -> Self {
        let mut adapters: Vec<Arc<dyn ProviderAdapter>> = Vec::new();

        for backend in BackendName::ALL {
            let settings = config.providers.backend(backend);
            let Some(api_key) = settings.credential() else {
                tracing::debug!(%backend, "no credential configured; backend disabled");
                continue;
            };
            let call = CallSettings::for_backend(backend, settings.model.as_deref());

            let built: Result<Arc<dyn ProviderAdapter>, ProviderError> = match backend {
                BackendName::Gemini => GeminiAdapter::new(api_key, call)
                    .map(|a| Arc::new(a) as Arc<dyn ProviderAdapter>),
                BackendName::OpenAI => {
                    OpenAiAdapter::new(api_key, settings.base_url.as_deref(), call)
                        .map(|a| Arc::new(a) as Arc<dyn ProviderAdapter>)
                }
                BackendName::Anthropic => AnthropicAdapter::new(api_key, call)
                    .map(|a| Arc::new(a) as Arc<dyn ProviderAdapter>),
            };

            match built {
                Ok(adapter) => adapters.push(adapter),
                Err(e) => tracing::warn!(%backend, error = %e, "failed to initialize backend"),
            }
        }

        Self::with_adapters(config.providers.default_backend(), adapters)
    }

    /// Build a registry from explicit adapters.
    ///
    /// Adapters are kept in catalog order regardless of the order given. A
    /// later adapter for the same backend replaces an earlier one.
    pub fn with_adapters(
        default: BackendName,
        adapters: impl IntoIterator<Item = Arc<dyn ProviderAdapter>>,
    ) -> Self {
        let mut by_name: IndexMap<BackendName, Arc<dyn ProviderAdapter>> = adapters
            .into_iter()
            .map(|adapter| (adapter.backend(), adapter))
            .collect();
        by_name.sort_by(|a, _, b, _| catalog_rank(*a).cmp(&catalog_rank(*b)));

        Self {
            adapters: by_name,
            default,
        }
    }

    /// Resolve a backend by name, or the default backend when `name` is absent.
    pub fn resolve(&self, name: Option<&str>) -> Result<Arc<dyn ProviderAdapter>, ProviderError> {
        let requested = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(raw) => raw
                .parse::<BackendName>()
                .map_err(|_| self.unavailable(raw))?,
            None => self.default,
        };

        self.adapters
            .get(&requested)
            .cloned()
            .ok_or_else(|| self.unavailable(requested.id()))
    }

    /// Configured backends in catalog order. Makes no network calls.
    pub fn list_available(&self) -> Vec<BackendInfo> {
        self.adapters
            .keys()
            .map(|&backend| BackendInfo {
                id: backend.id(),
                display_name: backend.display_name(),
                supported_models: backend.supported_models().to_vec(),
                is_default: backend == self.default,
            })
            .collect()
    }

    pub fn default_backend(&self) -> BackendName {
        self.default
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    fn unavailable(&self, name: &str) -> ProviderError {
        ProviderError::Unavailable {
            name: name.to_string(),
            available: self.adapters.keys().map(|b| b.id().to_string()).collect(),
        }
    }
}

fn catalog_rank(backend: BackendName) -> usize {
    BackendName::ALL
        .iter()
        .position(|b| *b == backend)
        .unwrap_or(BackendName::ALL.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FakeAdapter(BackendName);

    #[async_trait]
    impl ProviderAdapter for FakeAdapter {
        fn backend(&self) -> BackendName {
            self.0
        }

        fn model(&self) -> &str {
            "fake"
        }

        async fn invoke(&self, _prompt: &str) -> Result<String, ProviderError> {
            Ok("{}".into())
        }
    }

    fn fake(backend: BackendName) -> Arc<dyn ProviderAdapter> {
        Arc::new(FakeAdapter(backend))
    }

    #[test]
    fn resolve_default_when_name_absent() {
        let registry = ProviderRegistry::with_adapters(
            BackendName::OpenAI,
            [fake(BackendName::Gemini), fake(BackendName::OpenAI)],
        );
        assert_eq!(registry.resolve(None).unwrap().backend(), BackendName::OpenAI);
        assert_eq!(registry.resolve(Some("")).unwrap().backend(), BackendName::OpenAI);
    }

    #[test]
    fn resolve_is_case_insensitive() {
        let registry =
            ProviderRegistry::with_adapters(BackendName::Gemini, [fake(BackendName::Anthropic)]);
        assert_eq!(
            registry.resolve(Some("Anthropic")).unwrap().backend(),
            BackendName::Anthropic
        );
    }

    #[test]
    fn resolve_unknown_backend_is_unavailable() {
        let registry =
            ProviderRegistry::with_adapters(BackendName::Gemini, [fake(BackendName::Gemini)]);
        match registry.resolve(Some("unknown-backend")) {
            Err(ProviderError::Unavailable { name, available }) => {
                assert_eq!(name, "unknown-backend");
                assert_eq!(available, vec!["gemini"]);
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("unknown backend resolved"),
        }
    }

    #[test]
    fn resolve_unconfigured_backend_does_not_substitute() {
        let registry =
            ProviderRegistry::with_adapters(BackendName::Gemini, [fake(BackendName::Gemini)]);
        let err = registry.resolve(Some("openai")).err().unwrap();
        assert!(matches!(err, ProviderError::Unavailable { ref name, .. } if name == "openai"));
    }

    #[test]
    fn unconfigured_default_is_unavailable() {
        let registry =
            ProviderRegistry::with_adapters(BackendName::Anthropic, [fake(BackendName::OpenAI)]);
        assert!(registry.resolve(None).is_err());
    }

    #[test]
    fn list_available_in_catalog_order() {
        let registry = ProviderRegistry::with_adapters(
            BackendName::Anthropic,
            [fake(BackendName::Anthropic), fake(BackendName::Gemini)],
        );
        let list = registry.list_available();
        let ids: Vec<_> = list.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec!["gemini", "anthropic"]);
        assert!(!list[0].is_default);
        assert!(list[1].is_default);
        assert_eq!(list[1].display_name, "Anthropic Claude");
        assert_eq!(list[1].supported_models, vec!["claude-3-sonnet", "claude-3-opus"]);
    }

    #[test]
    fn from_config_omits_backends_without_credentials() {
        let mut config = Config::default();
        config.providers.openai.api_key = Some("sk-test".into());
        config.providers.anthropic.api_key = Some("   ".into());

        let registry = ProviderRegistry::from_config(&config);
        let ids: Vec<_> = registry.list_available().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec!["openai"]);
        assert_eq!(registry.resolve(Some("openai")).unwrap().model(), "gpt-4");
    }

    #[test]
    fn from_config_applies_model_override() {
        let mut config = Config::default();
        config.providers.gemini.api_key = Some("g-key".into());
        config.providers.gemini.model = Some("gemini-1.5-flash".into());

        let registry = ProviderRegistry::from_config(&config);
        assert_eq!(registry.resolve(None).unwrap().model(), "gemini-1.5-flash");
    }

    #[test]
    fn empty_config_yields_empty_registry() {
        let registry = ProviderRegistry::from_config(&Config::default());
        assert!(registry.is_empty());
        assert!(registry.list_available().is_empty());
    }
}
