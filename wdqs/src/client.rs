//! Transport HTTP vers le Wikidata Query Service

use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::error::WdqsError;
use crate::types::SparqlResults;

/// Endpoint public du Wikidata Query Service
pub const DEFAULT_ENDPOINT: &str = "https://query.wikidata.org/sparql";

/// User-Agent par défaut (la politique Wikimedia impose un agent descriptif)
pub const DEFAULT_USER_AGENT: &str = concat!(
    "cjk-pg/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/DoFabien/cjk-pg)"
);

const SPARQL_JSON: &str = "application/sparql-results+json";

/// Exécute des requêtes SPARQL SELECT
#[async_trait]
pub trait SparqlClient: Send + Sync {
    /// Soumet `query` et décode la réponse JSON
    async fn select(&self, query: &str) -> Result<SparqlResults, WdqsError>;
}

/// Implémentation HTTP de [`SparqlClient`]
///
/// Une requête GET par appel, sans retry ni cache.
#[derive(Debug, Clone)]
pub struct HttpSparqlClient {
    client: Client,
    endpoint: Url,
    user_agent: String,
}

impl HttpSparqlClient {
    /// Client pointant sur [`DEFAULT_ENDPOINT`]
    pub fn new() -> Result<Self, WdqsError> {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Client pointant sur un endpoint SPARQL arbitraire
    pub fn with_endpoint(endpoint: &str) -> Result<Self, WdqsError> {
        let endpoint = Url::parse(endpoint).map_err(|source| WdqsError::InvalidEndpoint {
            url: endpoint.to_string(),
            source,
        })?;
        let client = Client::builder()
            .build()
            .map_err(|e| WdqsError::from_reqwest(e, endpoint.as_str()))?;

        Ok(Self {
            client,
            endpoint,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    /// Remplace le User-Agent par défaut
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn request_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("query", query)
            .append_pair("format", "json");
        url
    }
}

#[async_trait]
impl SparqlClient for HttpSparqlClient {
    async fn select(&self, query: &str) -> Result<SparqlResults, WdqsError> {
        let url = self.request_url(query);
        let endpoint = self.endpoint.as_str();
        debug!(endpoint = %endpoint, bytes = query.len(), "Sending SPARQL query");

        let body = self
            .client
            .get(url)
            .header(ACCEPT, SPARQL_JSON)
            .header(USER_AGENT, self.user_agent.as_str())
            .send()
            .await
            .map_err(|e| WdqsError::from_reqwest(e, endpoint))?
            .error_for_status()
            .map_err(|e| WdqsError::from_reqwest(e, endpoint))?
            .text()
            .await
            .map_err(|e| WdqsError::from_reqwest(e, endpoint))?;

        debug!(bytes = body.len(), "SPARQL response received");
        SparqlResults::from_json(&body)
    }
}
