use crate::{Catalog, Catalogs, Result, RobotProfile};

/// A minimal blocking robot interface.
///
/// Implementations cache the catalogs from their last listing so that dispatch
/// calls can translate names into robot identifiers.
pub trait RobotClient {
    /// Profiles of every robot this client can switch to.
    fn robots(&self) -> &[RobotProfile];

    /// Name of the robot requests currently go to.
    fn active_robot(&self) -> &str;

    /// Switch the active robot by name or alias.
    fn select_robot(&mut self, name: &str) -> Result<()>;

    /// Fetch the navigable positions of the active robot.
    fn list_positions(&mut self) -> Result<Catalog>;

    /// Fetch the missions of the active robot.
    fn list_missions(&mut self) -> Result<Catalog>;

    /// Queue a move to a named position.
    fn navigate_to(&mut self, position: &str) -> Result<()>;

    /// Queue a named mission.
    fn execute_mission(&mut self, mission: &str) -> Result<()>;

    /// Catalogs as of the last listing.
    fn catalogs(&self) -> &Catalogs;

    /// Re-list both catalogs and return a snapshot of them.
    ///
    /// A catalog that fails to list is left empty so the other stays usable;
    /// only when both fail is the error returned.
    fn refresh(&mut self) -> Result<Catalogs> {
        let positions = self.list_positions();
        let missions = self.list_missions();
        match (positions, missions) {
            (Err(e), Err(_)) => Err(e),
            (positions, missions) => Ok(Catalogs {
                positions: positions.unwrap_or_else(|e| {
                    tracing::warn!("listing positions failed: {}", e);
                    Catalog::default()
                }),
                missions: missions.unwrap_or_else(|e| {
                    tracing::warn!("listing missions failed: {}", e);
                    Catalog::default()
                }),
            }),
        }
    }
}

impl<T: RobotClient + ?Sized> RobotClient for Box<T> {
    fn robots(&self) -> &[RobotProfile] {
        (**self).robots()
    }

    fn active_robot(&self) -> &str {
        (**self).active_robot()
    }

    fn select_robot(&mut self, name: &str) -> Result<()> {
        (**self).select_robot(name)
    }

    fn list_positions(&mut self) -> Result<Catalog> {
        (**self).list_positions()
    }

    fn list_missions(&mut self) -> Result<Catalog> {
        (**self).list_missions()
    }

    fn navigate_to(&mut self, position: &str) -> Result<()> {
        (**self).navigate_to(position)
    }

    fn execute_mission(&mut self, mission: &str) -> Result<()> {
        (**self).execute_mission(mission)
    }

    fn catalogs(&self) -> &Catalogs {
        (**self).catalogs()
    }

    fn refresh(&mut self) -> Result<Catalogs> {
        (**self).refresh()
    }
}
