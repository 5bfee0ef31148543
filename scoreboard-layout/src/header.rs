use crate::service_window::ServiceWindow;
use scoreboard_common::model::{GameModel, Service, ServiceInfo, ServicePhase};

/// The clock shown next to a service's phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseTimer {
    /// Counts up from the start of the phase, in seconds
    Elapsed(u64),
    /// Counts down to the service disappearing, in seconds
    Remaining(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseBadge {
    pub phase: ServicePhase,
    pub timer: PhaseTimer,
}

impl PhaseBadge {
    pub fn from_info(info: &ServiceInfo) -> Option<Self> {
        let phase = info.phase?;
        let timer = match phase {
            ServicePhase::Dying => PhaseTimer::Remaining(info.disable_interval.unwrap_or(0)),
            _ => PhaseTimer::Elapsed(info.phase_duration.unwrap_or(0)),
        };
        Some(Self { phase, timer })
    }
}

/// A service column that made it through the window, with what its header shows
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceColumn<'a> {
    /// Position in the model's service list, which also indexes colors and attack counts
    pub index: usize,
    pub service: &'a Service,
    pub color: Option<&'a str>,
    pub attacks_in_round: u32,
    pub phase: Option<PhaseBadge>,
}

/// The service columns to draw, in display order.
///
/// A service's rank is its position among the active services of the shown part of the
/// service list; inactive services neither show up nor take a rank.
pub fn visible_columns<'a>(model: &'a GameModel, window: &ServiceWindow) -> Vec<ServiceColumn<'a>> {
    let total = model.active_services.len();
    model
        .shown_services()
        .iter()
        .enumerate()
        .filter(|(_, service)| model.is_active(service.id))
        .enumerate()
        .filter(|(rank, _)| window.contains_rank(*rank, total))
        .map(|(_, (index, service))| ServiceColumn {
            index,
            service,
            color: model.color(index),
            attacks_in_round: model.attacks_in_round(index),
            phase: model.service_info(service.id).and_then(PhaseBadge::from_info),
        })
        .collect()
}
