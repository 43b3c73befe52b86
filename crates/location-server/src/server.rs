//! MCP tools over the location directory: lookup by code, search by name,
//! list by state. Each tool answers with plain text, including failures.

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{Implementation, ServerCapabilities, ServerInfo};
use rmcp::{ServerHandler, schemars, tool, tool_handler, tool_router};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::client::LocationClient;
use crate::format::{Listing, format_location, format_locations, is_blank};

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LocationIdQuery {
    /// Location identifier (e.g. QIM4, ABC1)
    pub location_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct NameQuery {
    /// Location name to search for (e.g. Manheim)
    pub name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct StateQuery {
    /// Two-letter state code (e.g. MS, FL, CA)
    pub state: String,
}

#[derive(Clone)]
pub struct LocationServer {
    client: LocationClient,
    tool_router: ToolRouter<LocationServer>,
}

#[tool_router]
impl LocationServer {
    pub fn new(client: LocationClient) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Get location information by location ID/code.")]
    async fn get_location_by_id(
        &self,
        Parameters(LocationIdQuery { location_id }): Parameters<LocationIdQuery>,
    ) -> String {
        info!(%location_id, "get_location_by_id");
        match self.fetch(&self.client.by_id_url(&location_id)).await {
            Some(body) if !is_blank(&body) => format_location(&body),
            _ => "Unable to fetch location data for this ID.".to_string(),
        }
    }

    #[tool(description = "Search for locations by name.")]
    async fn search_locations_by_name(
        &self,
        Parameters(NameQuery { name }): Parameters<NameQuery>,
    ) -> String {
        info!(%name, "search_locations_by_name");
        let body = self.fetch(&self.client.by_name_url(&name)).await;
        match Listing::from_response(body.as_ref()) {
            Listing::Unavailable => "Unable to fetch locations or no locations found.".to_string(),
            Listing::Empty => format!("No locations found matching '{name}'."),
            Listing::Found(items) => format_locations(items),
        }
    }

    #[tool(description = "Get locations in a specific state.")]
    async fn get_locations_by_state(
        &self,
        Parameters(StateQuery { state }): Parameters<StateQuery>,
    ) -> String {
        info!(%state, "get_locations_by_state");
        let body = self.fetch(&self.client.by_state_url(&state)).await;
        match Listing::from_response(body.as_ref()) {
            Listing::Unavailable => format!("Unable to fetch locations for state '{state}'."),
            Listing::Empty => format!("No locations found in state '{state}'."),
            Listing::Found(items) => format_locations(items),
        }
    }
}

impl LocationServer {
    /// Failed requests are logged and reported as `None`.
    async fn fetch(&self, url: &str) -> Option<Value> {
        match self.client.get(url).await {
            Ok(body) => Some(body),
            Err(e) => {
                warn!(%url, error = %e, "error fetching location data");
                None
            }
        }
    }
}

#[tool_handler]
impl ServerHandler for LocationServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Auction location directory. Use get_location_by_id for a location code \
                 (e.g. QIM4), search_locations_by_name for a name fragment, and \
                 get_locations_by_state for a two-letter state code."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }
}
