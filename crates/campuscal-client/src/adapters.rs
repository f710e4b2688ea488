//! Source adapter construction from configuration.

use std::sync::Arc;

use tracing::{debug, warn};

use campuscal_engine::AdapterRef;
use campuscal_providers::{
    ApiClient, ApiConfig, AssignmentAdapter, ClassDayAdapter, ErrorAdapter, GenericEventAdapter,
    HolidayAdapter, ProviderError, SourceKind,
};

use crate::config::ClientConfig;
use crate::error::ClientResult;

/// Builds the enabled source adapters.
///
/// A source whose client cannot be set up (bad URL, unresolvable token) is
/// replaced with an [`ErrorAdapter`], so it shows up as a failed source at
/// fetch time and the other sources still load.
pub fn build_adapters(config: &ClientConfig) -> Vec<AdapterRef> {
    let mut adapters: Vec<AdapterRef> = Vec::new();

    if config.holidays.enabled {
        let year = config.holidays.year_or_current();
        match client_for(config.holidays.to_api_config(config.api.timeout_secs)) {
            Ok(client) => adapters.push(Arc::new(HolidayAdapter::new(
                client,
                &config.holidays.country,
                year,
            ))),
            Err(e) => adapters.push(unavailable("holidays", SourceKind::Holiday, e)),
        }
    }

    let sources = &config.sources;
    if !(sources.class_days || sources.assignments || sources.events) {
        return adapters;
    }

    match client_for(config.api.to_api_config()) {
        Ok(client) => {
            if sources.class_days {
                adapters.push(Arc::new(ClassDayAdapter::new(client.clone())));
            }
            if sources.assignments {
                adapters.push(Arc::new(
                    AssignmentAdapter::new(client.clone()).with_path(&sources.assignments_path),
                ));
            }
            if sources.events {
                adapters.push(Arc::new(
                    GenericEventAdapter::new(client).with_path(&sources.events_path),
                ));
            }
        }
        Err(e) => {
            let message = e.message().to_string();
            for (enabled, name, kind) in [
                (sources.class_days, "class-days", SourceKind::ClassDay),
                (sources.assignments, "assignments", SourceKind::Assignment),
                (sources.events, "events", SourceKind::GenericEvent),
            ] {
                if enabled {
                    adapters.push(unavailable(
                        name,
                        kind,
                        ProviderError::configuration(message.as_str()),
                    ));
                }
            }
        }
    }

    debug!(count = adapters.len(), "source adapters ready");
    adapters
}

fn client_for(config: ClientResult<ApiConfig>) -> Result<ApiClient, ProviderError> {
    let config = config.map_err(|e| ProviderError::configuration(e.to_string()))?;
    ApiClient::new(config)
}

fn unavailable(name: &str, kind: SourceKind, error: ProviderError) -> AdapterRef {
    warn!(source = %name, error = %error, "source unavailable");
    Arc::new(ErrorAdapter::new(name, kind, error))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(adapters: &[AdapterRef]) -> Vec<&str> {
        adapters.iter().map(|a| a.name()).collect()
    }

    #[test]
    fn default_config_builds_all_sources() {
        let adapters = build_adapters(&ClientConfig::default());
        assert_eq!(
            names(&adapters),
            ["holidays", "class-days", "assignments", "events"]
        );
    }

    #[test]
    fn disabled_sources_are_skipped() {
        let mut config = ClientConfig::default();
        config.holidays.enabled = false;
        config.sources.class_days = false;
        config.sources.events = false;

        let adapters = build_adapters(&config);
        assert_eq!(names(&adapters), ["assignments"]);
        assert_eq!(adapters[0].kind(), SourceKind::Assignment);
    }

    #[tokio::test]
    async fn unusable_api_settings_become_failing_sources() {
        let mut config = ClientConfig::default();
        config.holidays.enabled = false;
        config.api.token = Some("env::_CAMPUSCAL_ADAPTERS_UNSET_TOKEN".into());

        let adapters = build_adapters(&config);
        assert_eq!(names(&adapters), ["class-days", "assignments", "events"]);
        for adapter in &adapters {
            assert!(adapter.fetch().await.is_empty());
        }
    }
}
