use crate::{
    Catalog, CatalogEntry, Catalogs, ClientError, FleetConfig, Result, RobotClient, RobotProfile,
};

/// A dispatch the mock accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    NavigateTo { robot: String, position: String },
    ExecuteMission { robot: String, mission: String },
}

/// An in-process robot. Every robot in the fleet shares the same catalogs.
pub struct MockRobot {
    robots: Vec<RobotProfile>,
    active: String,
    positions: Catalog,
    missions: Catalog,
    cache: Catalogs,
    calls: Vec<MockCall>,
    refreshes: usize,
    fail_refresh: bool,
    fail_missions: bool,
    reject_dispatch: bool,
}

impl MockRobot {
    pub fn new(fleet: &FleetConfig) -> Self {
        let active = fleet
            .initial_robot()
            .map(|r| r.name.clone())
            .unwrap_or_else(|| "mock".to_string());
        Self {
            robots: fleet.robots.clone(),
            active,
            positions: Catalog::default(),
            missions: Catalog::default(),
            cache: Catalogs::default(),
            calls: Vec::new(),
            refreshes: 0,
            fail_refresh: false,
            fail_missions: false,
            reject_dispatch: false,
        }
    }

    /// A mock with a couple of positions and missions for demos.
    pub fn demo() -> Self {
        Self::demo_with(&FleetConfig::default())
    }

    /// Demo catalogs on every robot of `fleet`.
    pub fn demo_with(fleet: &FleetConfig) -> Self {
        Self::new(fleet)
            .with_positions(&["POS1", "position A", "position B", "charger"])
            .with_missions(&["footprint", "patrol", "clean_a", "clean_b"])
    }

    pub fn with_positions(mut self, names: &[&str]) -> Self {
        self.positions = Self::catalog_of("pos", names);
        self
    }

    pub fn with_missions(mut self, names: &[&str]) -> Self {
        self.missions = Self::catalog_of("mis", names);
        self
    }

    /// Make every listing fail with a transport error.
    pub fn failing_refresh(mut self) -> Self {
        self.fail_refresh = true;
        self
    }

    /// Make only the mission listing fail.
    pub fn failing_missions(mut self) -> Self {
        self.fail_missions = true;
        self
    }

    /// Make every dispatch fail as if the robot refused it.
    pub fn rejecting_dispatch(mut self) -> Self {
        self.reject_dispatch = true;
        self
    }

    pub fn calls(&self) -> &[MockCall] {
        &self.calls
    }

    pub fn refresh_count(&self) -> usize {
        self.refreshes
    }

    fn catalog_of(prefix: &str, names: &[&str]) -> Catalog {
        Catalog::from_entries(names.iter().enumerate().map(|(i, name)| {
            CatalogEntry::new(*name, format!("mock-{}-{:04}", prefix, i)).with_type_id(0)
        }))
    }
}

impl RobotClient for MockRobot {
    fn robots(&self) -> &[RobotProfile] {
        &self.robots
    }

    fn active_robot(&self) -> &str {
        &self.active
    }

    fn select_robot(&mut self, name: &str) -> Result<()> {
        let profile = self
            .robots
            .iter()
            .find(|r| r.matches(name))
            .ok_or_else(|| ClientError::UnknownRobot(name.to_string()))?;
        self.active = profile.name.clone();
        Ok(())
    }

    fn list_positions(&mut self) -> Result<Catalog> {
        if self.fail_refresh {
            return Err(ClientError::Transport("mock robot unreachable".to_string()));
        }
        self.refreshes += 1;
        self.cache.positions = self.positions.clone();
        Ok(self.positions.clone())
    }

    fn list_missions(&mut self) -> Result<Catalog> {
        if self.fail_refresh || self.fail_missions {
            return Err(ClientError::Transport("mock robot unreachable".to_string()));
        }
        self.cache.missions = self.missions.clone();
        Ok(self.missions.clone())
    }

    fn navigate_to(&mut self, position: &str) -> Result<()> {
        if !self.cache.positions.contains(position) {
            return Err(ClientError::UnknownEntity {
                kind: "position",
                name: position.to_string(),
            });
        }
        if self.reject_dispatch {
            return Err(ClientError::Rejected("mission queue is locked".to_string()));
        }
        self.calls.push(MockCall::NavigateTo {
            robot: self.active.clone(),
            position: position.to_string(),
        });
        Ok(())
    }

    fn execute_mission(&mut self, mission: &str) -> Result<()> {
        if !self.cache.missions.contains(mission) {
            return Err(ClientError::UnknownEntity {
                kind: "mission",
                name: mission.to_string(),
            });
        }
        if self.reject_dispatch {
            return Err(ClientError::Rejected("mission queue is locked".to_string()));
        }
        self.calls.push(MockCall::ExecuteMission {
            robot: self.active.clone(),
            mission: mission.to_string(),
        });
        Ok(())
    }

    fn catalogs(&self) -> &Catalogs {
        &self.cache
    }
}
