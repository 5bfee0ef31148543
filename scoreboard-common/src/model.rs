use derivative::Derivative;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use time::OffsetDateTime;

pub type TeamId = u32;
pub type ServiceId = u32;

/// Width of the team column when the controller doesn't provide one
pub const DEFAULT_TEAM_WIDTH: f32 = 550.0;
/// Width of a single service column when the controller doesn't provide one
pub const DEFAULT_ONE_SERVICE_WIDTH: f32 = 150.0;

fn default_team_width() -> f32 {
    DEFAULT_TEAM_WIDTH
}

fn default_one_service_width() -> f32 {
    DEFAULT_ONE_SERVICE_WIDTH
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamServiceScore {
    pub service_id: ServiceId,
    pub score: f64,
    #[serde(default)]
    pub stolen: u32,
    #[serde(default)]
    pub lost: u32,
}

/// One line of the scoreboard. The controller sends these already ranked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamScore {
    pub team_id: TeamId,
    pub name: String,
    pub score: f64,
    #[serde(default)]
    pub services: Vec<TeamServiceScore>,
}

impl TeamScore {
    pub fn service(&self, service_id: ServiceId) -> Option<&TeamServiceScore> {
        self.services.iter().find(|s| s.service_id == service_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
}

#[derive(Derivative, Serialize, Deserialize)]
#[derivative(Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServicePhase {
    NotReleased,
    Heating,
    Cooling,
    Dying,
    Removed,
    #[serde(other)]
    Unknown,
}

impl core::fmt::Display for ServicePhase {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match *self {
            Self::NotReleased => write!(f, "NOT_RELEASED"),
            Self::Heating => write!(f, "HEATING"),
            Self::Cooling => write!(f, "COOLING"),
            Self::Dying => write!(f, "DYING"),
            Self::Removed => write!(f, "REMOVED"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Lifecycle information the controller attaches to a service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    #[serde(default)]
    pub phase: Option<ServicePhase>,
    /// Seconds since the current phase began
    #[serde(default)]
    pub phase_duration: Option<u64>,
    /// Seconds until a dying service is removed
    #[serde(default)]
    pub disable_interval: Option<u64>,
}

#[derive(Derivative, Serialize, Deserialize)]
#[derivative(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContestInfo {
    #[serde(with = "time::serde::timestamp")]
    #[derivative(Default(value = "OffsetDateTime::UNIX_EPOCH"))]
    pub start: OffsetDateTime,
    #[serde(with = "time::serde::timestamp")]
    #[derivative(Default(value = "OffsetDateTime::UNIX_EPOCH"))]
    pub end: OffsetDateTime,
}

impl ContestInfo {
    /// Fraction of the contest that has elapsed at `now`, always within `[0, 1]`
    pub fn progress(&self, now: OffsetDateTime) -> f32 {
        let total = (self.end - self.start).as_seconds_f32();
        if total <= 0.0 {
            return if now >= self.end { 1.0 } else { 0.0 };
        }
        ((now - self.start).as_seconds_f32() / total).clamp(0.0, 1.0)
    }
}

/// The state of the contest as last reported by the controller.
///
/// `scoreboard` stays `None` between `start` and the first scoreboard frame, and the display
/// doesn't lay anything out until it is filled.
#[derive(Derivative, Serialize, Deserialize)]
#[derivative(Debug, Clone, PartialEq, Default)]
pub struct GameModel {
    #[serde(default)]
    pub scoreboard: Option<Vec<TeamScore>>,
    #[serde(default)]
    pub services: Vec<Service>,
    /// How many entries of `services` are shown, all of them when absent
    #[serde(default)]
    pub services_count: Option<usize>,
    #[serde(default)]
    pub active_services: Vec<ServiceId>,
    /// Indexed the same way as `services`
    #[serde(default)]
    pub service_index_to_attacks_in_round: Vec<u32>,
    #[serde(default)]
    pub service_infos: HashMap<ServiceId, ServiceInfo>,
    #[serde(default)]
    pub info: ContestInfo,
    #[serde(default = "default_team_width")]
    #[derivative(Default(value = "DEFAULT_TEAM_WIDTH"))]
    pub team_width: f32,
    #[serde(default = "default_one_service_width")]
    #[derivative(Default(value = "DEFAULT_ONE_SERVICE_WIDTH"))]
    pub one_service_width: f32,
    /// CSS style colors, indexed the same way as `services`
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub rounds_count: u32,
    /// Stolen flags per round, each round indexed the same way as `services`
    #[serde(default)]
    pub attacks_history: Vec<Vec<u32>>,
}

impl GameModel {
    pub fn has_scoreboard(&self) -> bool {
        self.scoreboard.is_some()
    }

    pub fn scoreboard(&self) -> &[TeamScore] {
        self.scoreboard.as_deref().unwrap_or_default()
    }

    /// The leading part of `services` that is eligible for display
    pub fn shown_services(&self) -> &[Service] {
        let count = self
            .services_count
            .unwrap_or(self.services.len())
            .min(self.services.len());
        &self.services[..count]
    }

    pub fn is_active(&self, service_id: ServiceId) -> bool {
        self.active_services.contains(&service_id)
    }

    pub fn service_info(&self, service_id: ServiceId) -> Option<&ServiceInfo> {
        self.service_infos.get(&service_id)
    }

    pub fn color(&self, service_index: usize) -> Option<&str> {
        self.colors.get(service_index).map(String::as_str)
    }

    pub fn attacks_in_round(&self, service_index: usize) -> u32 {
        self.service_index_to_attacks_in_round
            .get(service_index)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_attacks_in_round(&self) -> u32 {
        self.service_index_to_attacks_in_round.iter().sum()
    }

    /// Attacks per round, either for a single service or summed over all of them
    pub fn attacks_graph(&self, service_index: Option<usize>) -> Vec<u32> {
        self.attacks_history
            .iter()
            .map(|round| match service_index {
                Some(i) => round.get(i).copied().unwrap_or(0),
                None => round.iter().sum(),
            })
            .collect()
    }

    /// Refreshes the model in place with a scoreboard frame. Fields the frame omits keep their
    /// previous values.
    pub fn apply_scoreboard(&mut self, frame: ScoreboardFrame) {
        let ScoreboardFrame {
            scoreboard,
            active_services,
            service_index_to_attacks_in_round,
            service_infos,
        } = frame;

        self.scoreboard = Some(scoreboard);
        if let Some(active_services) = active_services {
            self.active_services = active_services;
        }
        if let Some(attacks) = service_index_to_attacks_in_round {
            self.service_index_to_attacks_in_round = attacks;
        }
        if let Some(service_infos) = service_infos {
            self.service_infos = service_infos;
        }
    }

    pub fn apply_history(&mut self, frame: HistoryFrame) {
        self.rounds_count = frame
            .rounds_count
            .unwrap_or(frame.attacks_history.len() as u32);
        self.attacks_history = frame.attacks_history;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreboardFrame {
    pub scoreboard: Vec<TeamScore>,
    #[serde(default)]
    pub active_services: Option<Vec<ServiceId>>,
    #[serde(default)]
    pub service_index_to_attacks_in_round: Option<Vec<u32>>,
    #[serde(default)]
    pub service_infos: Option<HashMap<ServiceId, ServiceInfo>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryFrame {
    pub attacks_history: Vec<Vec<u32>>,
    #[serde(default)]
    pub rounds_count: Option<u32>,
}
