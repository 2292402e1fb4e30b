use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::infra_http::*;
use crate::infra_store::*;
use crate::logger::*;
use crate::settings::Settings;
use chrono::Duration as SlotTtl;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// Fully wired client: transport, token store, pipeline and auth flows.
pub struct Client {
    pub auth_service: Arc<dyn AuthService>,
    pub pipeline: Arc<RequestPipeline>,
    pub routes: ApiRoutes,
}

impl Client {
    pub fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new(
            &settings.api.base_url,
            Duration::from_secs(settings.api.timeout_secs),
        )?);

        let ttl = SlotTtl::days(settings.store.slot_ttl_days);
        let store: Arc<dyn TokenStore> = match settings.store.backend.as_str() {
            "memory" => Arc::new(MemoryTokenStore::new(ttl)),
            "file" => {
                let path = settings.store.resolved_path()?;
                debug!(path = %path.display(), "using file token store");
                Arc::new(FileTokenStore::new(path, ttl))
            }
            other => return Err(anyhow::anyhow!("Unknown store backend: {}", other)),
        };

        Ok(Self::with_parts(
            transport,
            store,
            ApiRoutes::new(settings.api.prefix.clone()),
        ))
    }

    pub fn with_parts(
        transport: Arc<dyn HttpTransport>,
        store: Arc<dyn TokenStore>,
        routes: ApiRoutes,
    ) -> Self {
        let pipeline = Arc::new(RequestPipeline::new(transport, store, &routes));
        let auth_service: Arc<dyn AuthService> =
            Arc::new(HttpAuthService::new(pipeline.clone(), routes.clone()));

        Self {
            auth_service,
            pipeline,
            routes,
        }
    }

    pub fn session_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.pipeline.subscribe()
    }

    /// Resolves a path relative to the API prefix, leaving absolute API
    /// paths untouched.
    pub fn api_path(&self, path: &str) -> String {
        if path.starts_with(&self.routes.path("")) {
            path.to_string()
        } else {
            self.routes.path(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Api, Log, Store};

    fn settings(backend: &str) -> Settings {
        Settings {
            api: Api {
                base_url: "http://localhost:4000".into(),
                prefix: "/api/v0".into(),
                timeout_secs: 5,
            },
            store: Store {
                backend: backend.into(),
                path: Some(std::env::temp_dir().join("flashcards-client-test.json")),
                slot_ttl_days: 7,
            },
            log: Log {
                filter: "info".into(),
            },
        }
    }

    #[tokio::test]
    async fn builds_from_settings() {
        let client = Client::try_new(&settings("memory")).unwrap();
        assert_eq!(client.auth_service.current_user_id().await, None);
        assert!(Client::try_new(&settings("file")).is_ok());
    }

    #[test]
    fn unknown_store_backend_is_rejected() {
        assert!(Client::try_new(&settings("cookies")).is_err());
    }

    #[test]
    fn api_path_prefixes_relative_paths() {
        let client = Client::try_new(&settings("memory")).unwrap();
        assert_eq!(client.api_path("cards"), "/api/v0/cards");
        assert_eq!(client.api_path("/sets/1"), "/api/v0/sets/1");
        assert_eq!(client.api_path("/api/v0/languages"), "/api/v0/languages");
    }
}
