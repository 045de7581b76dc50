// src/ui/state.rs
// UI state structure and action enum definitions

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::engine::{EngineCommand, EngineEvent, StatsSnapshot, WorkState};
use crate::error::EngineError;
use crate::units::{Unit, DEFAULT_UNIT};

/// Which statistic a unit selector drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSelector {
    CurrentSpeed,
    AverageSpeed,
    TotalVolume,
}

/// UI Actions represent all possible UI interactions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    Start,
    Stop,
    CycleUnit(UnitSelector),
    DismissError,
    Quit,
    None,
}

impl UiAction {
    pub fn from_key(key: KeyEvent) -> Self {
        if key.kind != KeyEventKind::Press {
            return UiAction::None;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return UiAction::Quit;
        }
        match key.code {
            KeyCode::Char('s') => UiAction::Start,
            KeyCode::Char('x') => UiAction::Stop,
            KeyCode::Char('1') => UiAction::CycleUnit(UnitSelector::CurrentSpeed),
            KeyCode::Char('2') => UiAction::CycleUnit(UnitSelector::AverageSpeed),
            KeyCode::Char('3') => UiAction::CycleUnit(UnitSelector::TotalVolume),
            KeyCode::Enter => UiAction::DismissError,
            KeyCode::Char('q') | KeyCode::Esc => UiAction::Quit,
            _ => UiAction::None,
        }
    }
}

/// UI State contains all the data needed by the dashboard
#[derive(Debug)]
pub struct UiState {
    pub snapshot: StatsSnapshot,
    pub progress: u8,
    pub current_speed_unit: Unit,
    pub average_speed_unit: Unit,
    pub total_volume_unit: Unit,
    /// Blocking notice; while set, only dismiss and quit are honoured.
    pub error: Option<EngineError>,
    pub should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        let unit = Unit::from_index(DEFAULT_UNIT).unwrap_or(Unit::Megabytes);
        Self {
            snapshot: StatsSnapshot::default(),
            progress: 0,
            current_speed_unit: unit,
            average_speed_unit: unit,
            total_volume_unit: unit,
            error: None,
            should_quit: false,
        }
    }
}

impl UiState {
    pub fn new(current_speed_unit: usize, average_speed_unit: usize, total_volume_unit: usize) -> Self {
        let pick = |i: usize| Unit::from_index(i).unwrap_or(Unit::Megabytes);
        Self {
            current_speed_unit: pick(current_speed_unit),
            average_speed_unit: pick(average_speed_unit),
            total_volume_unit: pick(total_volume_unit),
            ..Default::default()
        }
    }

    pub fn is_running(&self) -> bool {
        self.snapshot.state == WorkState::Running
    }

    /// Fold an engine event into the state. Returns a command to send back,
    /// used to force a stop when the engine reports an error.
    pub fn apply_event(&mut self, event: EngineEvent) -> Option<EngineCommand> {
        match event {
            EngineEvent::Progress(p) => {
                self.progress = p;
                None
            }
            EngineEvent::TickCompleted(snapshot) | EngineEvent::StateChanged(snapshot) => {
                self.snapshot = snapshot;
                None
            }
            EngineEvent::Error(err) => {
                self.error = Some(err);
                Some(EngineCommand::Stop)
            }
        }
    }

    /// Apply a user action. Returns the command it maps to, if any.
    pub fn apply_action(&mut self, action: UiAction) -> Option<EngineCommand> {
        if self.error.is_some() && !matches!(action, UiAction::DismissError | UiAction::Quit) {
            return None;
        }
        match action {
            UiAction::Start if !self.is_running() => {
                self.progress = 0;
                Some(EngineCommand::Start)
            }
            UiAction::Stop if self.is_running() => Some(EngineCommand::Stop),
            UiAction::CycleUnit(selector) => {
                let unit = match selector {
                    UnitSelector::CurrentSpeed => &mut self.current_speed_unit,
                    UnitSelector::AverageSpeed => &mut self.average_speed_unit,
                    UnitSelector::TotalVolume => &mut self.total_volume_unit,
                };
                *unit = unit.next();
                None
            }
            UiAction::DismissError => {
                self.error = None;
                None
            }
            UiAction::Quit => {
                self.should_quit = true;
                Some(EngineCommand::Shutdown)
            }
            _ => None,
        }
    }

    /// Unit selector indices, in the order they are persisted.
    pub fn unit_indices(&self) -> (usize, usize, usize) {
        (
            self.current_speed_unit.index(),
            self.average_speed_unit.index(),
            self.total_volume_unit.index(),
        )
    }
}
