//! REST client for MiR robots (API v2.0.0).

use crate::{
    Catalog, CatalogEntry, Catalogs, ClientError, FleetConfig, Result, RobotClient, RobotProfile,
};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Built-in action list that drives to a plain position.
const GOTO_GUID: &str = "mirconst-guid-0000-0001-actionlist00";
/// Built-in action list that docks at a charging station.
const GOTO_CHARGER_GUID: &str = "mirconst-guid-0000-0004-actionlist00";

pub struct MirHttpClient {
    fleet: FleetConfig,
    active: RobotProfile,
    client: Client,
    cache: Catalogs,
}

#[derive(Debug, Deserialize)]
struct PositionRecord {
    guid: String,
    name: String,
    #[serde(default)]
    map: Option<String>,
    type_id: u32,
}

#[derive(Debug, Deserialize)]
struct MissionRecord {
    guid: String,
    name: String,
}

#[derive(Debug, Serialize)]
struct MissionParameter<'a> {
    id: &'a str,
    value: &'a str,
}

#[derive(Debug, Serialize)]
struct QueueRequest<'a> {
    mission_id: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    parameters: Vec<MissionParameter<'a>>,
}

impl MirHttpClient {
    pub fn new(fleet: FleetConfig) -> Result<Self> {
        let active = fleet
            .initial_robot()
            .cloned()
            .ok_or_else(|| ClientError::UnknownRobot("<none configured>".to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let language = HeaderValue::from_str(&fleet.language)
            .map_err(|e| ClientError::Transport(format!("bad language header: {e}")))?;
        headers.insert("Accept-Language", language.clone());
        headers.insert("Language", language);
        if let Some(auth) = &fleet.authorization {
            let value = HeaderValue::from_str(auth)
                .map_err(|e| ClientError::Transport(format!("bad authorization header: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(fleet.timeout_ms))
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        tracing::info!("MiR client targeting {} at {}", active.name, active.base_url);
        Ok(Self {
            fleet,
            active,
            client,
            cache: Catalogs::default(),
        })
    }

    fn url(&self, endpoint: &str) -> Result<Url> {
        let base = if self.active.base_url.ends_with('/') {
            self.active.base_url.clone()
        } else {
            format!("{}/", self.active.base_url)
        };
        Url::parse(&base)
            .and_then(|u| u.join(endpoint))
            .map_err(|e| ClientError::InvalidUrl(format!("{}{}: {}", base, endpoint, e)))
    }

    fn send(&self, request: RequestBuilder, endpoint: &str) -> Result<reqwest::blocking::Response> {
        let resp = request
            .send()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(ClientError::Http {
                status: resp.status().as_u16(),
                endpoint: endpoint.to_string(),
            });
        }
        Ok(resp)
    }

    fn queue(&self, body: &QueueRequest<'_>) -> Result<()> {
        let url = self.url("mission_queue")?;
        self.send(self.client.post(url).json(body), "mission_queue")?;
        Ok(())
    }
}

impl RobotClient for MirHttpClient {
    fn robots(&self) -> &[RobotProfile] {
        &self.fleet.robots
    }

    fn active_robot(&self) -> &str {
        &self.active.name
    }

    fn select_robot(&mut self, name: &str) -> Result<()> {
        let profile = self
            .fleet
            .find_robot(name)
            .cloned()
            .ok_or_else(|| ClientError::UnknownRobot(name.to_string()))?;
        if profile.name != self.active.name {
            tracing::info!("switching robot {} -> {}", self.active.name, profile.name);
            self.active = profile;
            self.cache = Catalogs::default();
        }
        Ok(())
    }

    fn list_positions(&mut self) -> Result<Catalog> {
        let url = self.url("positions")?;
        let resp = self.send(self.client.get(url), "positions")?;
        let records: Vec<PositionRecord> = resp
            .json()
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        let total = records.len();
        let catalog = Catalog::from_entries(
            records
                .into_iter()
                .filter(|p| self.active.accepts_position(p.type_id, p.map.as_deref()))
                .map(|p| {
                    let entry = CatalogEntry::new(p.name, p.guid).with_type_id(p.type_id);
                    match p.map {
                        Some(map) => entry.with_map(map),
                        None => entry,
                    }
                }),
        );
        tracing::debug!(
            "{}: {} of {} positions usable",
            self.active.name,
            catalog.len(),
            total
        );
        self.cache.positions = catalog.clone();
        Ok(catalog)
    }

    fn list_missions(&mut self) -> Result<Catalog> {
        let url = self.url("missions")?;
        let resp = self.send(self.client.get(url), "missions")?;
        let records: Vec<MissionRecord> = resp
            .json()
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        let catalog =
            Catalog::from_entries(records.into_iter().map(|m| CatalogEntry::new(m.name, m.guid)));
        self.cache.missions = catalog.clone();
        Ok(catalog)
    }

    fn navigate_to(&mut self, position: &str) -> Result<()> {
        let entry = self
            .cache
            .positions
            .get(position)
            .ok_or_else(|| ClientError::UnknownEntity {
                kind: "position",
                name: position.to_string(),
            })?;

        let (mission_id, parameter_id) = match entry.type_id.unwrap_or(0) {
            0 => (GOTO_GUID, "Position"),
            _ => (GOTO_CHARGER_GUID, "chargingStationPosition"),
        };
        let body = QueueRequest {
            mission_id,
            parameters: vec![MissionParameter {
                id: parameter_id,
                value: &entry.guid,
            }],
        };
        self.queue(&body)?;
        tracing::info!("robot {} sent to position '{}'", self.active.name, position);
        Ok(())
    }

    fn execute_mission(&mut self, mission: &str) -> Result<()> {
        let guid = self
            .cache
            .missions
            .guid(mission)
            .ok_or_else(|| ClientError::UnknownEntity {
                kind: "mission",
                name: mission.to_string(),
            })?;
        let body = QueueRequest {
            mission_id: guid,
            parameters: Vec::new(),
        };
        self.queue(&body)?;
        tracing::info!("mission '{}' queued on {}", mission, self.active.name);
        Ok(())
    }

    fn catalogs(&self) -> &Catalogs {
        &self.cache
    }
}
