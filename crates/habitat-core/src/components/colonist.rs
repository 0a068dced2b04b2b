//! Colonist components: needs, morale, goals, actions, movement state.

use super::common::{Facing, GridPos, ModuleId};
use serde::{Deserialize, Serialize};

/// Marker component identifying an entity as a colonist.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Colonist;

/// Stable colonist identifier, independent of ECS entity ids so module
/// crew lists survive save/load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColonistId(pub u32);

/// Physiological needs. Values rise over time and are paid down by
/// consume/rest actions. Integer units: one unit of need is relieved by
/// one unit of resource (or one minute of the matching action).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Needs {
    pub water: u32,
    pub food: u32,
    pub rest: u32,
}

/// Per-colonist thresholds at which a need starts driving goal selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeedThresholds {
    pub water: u32,
    pub food: u32,
    pub rest: u32,
}

impl Default for NeedThresholds {
    fn default() -> Self {
        Self {
            water: 4,
            food: 8,
            rest: 16,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NeedKind {
    Water,
    Food,
    Rest,
}

impl NeedKind {
    /// Fixed tie-break order among simultaneous threshold crossings:
    /// most lethal first. Goal selection iterates this, never a map.
    pub const PRIORITY: [NeedKind; 3] = [NeedKind::Water, NeedKind::Food, NeedKind::Rest];
}

impl Needs {
    pub fn value(&self, kind: NeedKind) -> u32 {
        match kind {
            NeedKind::Water => self.water,
            NeedKind::Food => self.food,
            NeedKind::Rest => self.rest,
        }
    }

    fn value_mut(&mut self, kind: NeedKind) -> &mut u32 {
        match kind {
            NeedKind::Water => &mut self.water,
            NeedKind::Food => &mut self.food,
            NeedKind::Rest => &mut self.rest,
        }
    }

    /// Pay down a need; saturates at zero.
    pub fn satisfy(&mut self, kind: NeedKind, amount: u32) {
        let v = self.value_mut(kind);
        *v = v.saturating_sub(amount);
    }

    pub fn raise(&mut self, kind: NeedKind, amount: u32) {
        *self.value_mut(kind) += amount;
    }

    /// First need at or over its threshold, in [`NeedKind::PRIORITY`] order.
    pub fn first_over_threshold(&self, thresholds: &NeedThresholds) -> Option<NeedKind> {
        NeedKind::PRIORITY.into_iter().find(|&kind| {
            let limit = match kind {
                NeedKind::Water => thresholds.water,
                NeedKind::Food => thresholds.food,
                NeedKind::Rest => thresholds.rest,
            };
            self.value(kind) >= limit
        })
    }
}

/// Morale, 0 (miserable) to 100 (elated). Modulates work and rest
/// durations: a happy colonist works faster and needs less sleep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Morale(pub i32);

impl Default for Morale {
    fn default() -> Self {
        Morale(50)
    }
}

/// Work jobs never shrink below this many minutes.
pub const WORK_DURATION_FLOOR: u32 = 10;

/// Rest never shrinks below this many minutes.
pub const REST_DURATION_FLOOR: u32 = 60;

impl Morale {
    pub fn gain(&mut self, amount: i32) {
        self.0 = (self.0 + amount).clamp(0, 100);
    }

    pub fn lose(&mut self, amount: i32) {
        self.gain(-amount);
    }

    /// Work duration in minutes: one minute shaved per full 10-point band
    /// above 50 (capped at 100), one added per full band below.
    pub fn work_duration(&self, base_minutes: u32) -> u32 {
        let morale = self.0.clamp(0, 100);
        let adjusted = if morale >= 50 {
            base_minutes as i64 - ((morale - 50) / 10) as i64
        } else {
            base_minutes as i64 + ((50 - morale) / 10) as i64
        };
        (adjusted.max(0) as u32).max(WORK_DURATION_FLOOR)
    }

    /// Rest duration in minutes: low morale requires more sleep. One hour
    /// added per full 25-point band below 50 (max two hours at 0), one
    /// hour shaved per full band above.
    pub fn rest_duration(&self, base_minutes: u32) -> u32 {
        let morale = self.0.clamp(0, 100);
        let adjusted = if morale >= 50 {
            base_minutes as i64 - 60 * ((morale - 50) / 25) as i64
        } else {
            base_minutes as i64 + 60 * ((50 - morale) / 25) as i64
        };
        (adjusted.max(0) as u32).max(REST_DURATION_FLOOR)
    }
}

/// Occupational role; determines which jobs the colonist takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Farmer,
    Miner,
}

/// Kinds of unit-of-work the job board hands out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobType {
    Farm,
    Mine,
}

/// High-level objective driving action-stack construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Goal {
    Explore,
    GetNeed(NeedKind),
    Work(JobType),
}

/// A primitive step a colonist executes. Each variant carries only the
/// fields that kind needs; durations are minutes, 0 = instantaneous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColonistAction {
    Move {
        dest: GridPos,
    },
    Climb {
        dest: GridPos,
    },
    Eat {
        dest: GridPos,
        duration: u32,
        module_id: ModuleId,
    },
    Drink {
        dest: GridPos,
        duration: u32,
        module_id: ModuleId,
    },
    Rest {
        dest: GridPos,
        duration: u32,
        module_id: ModuleId,
    },
    Farm {
        dest: GridPos,
        duration: u32,
        module_id: ModuleId,
    },
    Mine {
        dest: GridPos,
        duration: u32,
        module_id: ModuleId,
    },
}

impl ColonistAction {
    pub fn dest(&self) -> GridPos {
        match self {
            ColonistAction::Move { dest }
            | ColonistAction::Climb { dest }
            | ColonistAction::Eat { dest, .. }
            | ColonistAction::Drink { dest, .. }
            | ColonistAction::Rest { dest, .. }
            | ColonistAction::Farm { dest, .. }
            | ColonistAction::Mine { dest, .. } => *dest,
        }
    }

    pub fn is_climb(&self) -> bool {
        matches!(self, ColonistAction::Climb { .. })
    }

    /// Actions that resolve by elapsed time rather than by position.
    pub fn duration(&self) -> Option<u32> {
        match self {
            ColonistAction::Move { .. } | ColonistAction::Climb { .. } => None,
            ColonistAction::Eat { duration, .. }
            | ColonistAction::Drink { duration, .. }
            | ColonistAction::Rest { duration, .. }
            | ColonistAction::Farm { duration, .. }
            | ColonistAction::Mine { duration, .. } => Some(*duration),
        }
    }

    /// Module the action enters/consumes from, if any.
    pub fn module_id(&self) -> Option<ModuleId> {
        match self {
            ColonistAction::Move { .. } | ColonistAction::Climb { .. } => None,
            ColonistAction::Eat { module_id, .. }
            | ColonistAction::Drink { module_id, .. }
            | ColonistAction::Rest { module_id, .. }
            | ColonistAction::Farm { module_id, .. }
            | ColonistAction::Mine { module_id, .. } => Some(*module_id),
        }
    }
}

/// LIFO plan of pending actions. The planner pushes steps in *reverse*
/// execution order, so the first step to run ends up on top; the executor
/// only ever calls [`ActionStack::pop_next`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionStack(Vec<ColonistAction>);

impl ActionStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a step on top of the stack. Callers build plans terminal
    /// action first.
    pub fn push_step(&mut self, action: ColonistAction) {
        self.0.push(action);
    }

    /// Pop the next step to execute.
    pub fn pop_next(&mut self) -> Option<ColonistAction> {
        self.0.pop()
    }

    pub fn peek_next(&self) -> Option<&ColonistAction> {
        self.0.last()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Steps in pop (execution) order, for UI display.
    pub fn iter_execution_order(&self) -> impl Iterator<Item = &ColonistAction> {
        self.0.iter().rev()
    }
}

/// The popped head of the action stack, kept outside the stack while in
/// progress. `elapsed` drives duration-based resolution and the stall
/// guard; `granted` records the truncated quantity a consume action got.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAction {
    pub action: ColonistAction,
    pub elapsed: u32,
    /// Effective duration after morale/truncation adjustments.
    pub duration: u32,
    pub granted: u32,
}

impl CurrentAction {
    pub fn new(action: ColonistAction) -> Self {
        let duration = action.duration().unwrap_or(0);
        Self {
            action,
            elapsed: 0,
            duration,
            granted: 0,
        }
    }
}

/// Goal bookkeeping: the current objective, its plan, and the per-hour
/// "gave up on this" flags that stop a colonist hammering an
/// unsatisfiable need every tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalState {
    pub goal: Option<Goal>,
    pub stack: ActionStack,
    pub current: Option<CurrentAction>,
    /// Needs flagged unobtainable until the next hourly tick.
    pub unavailable: Vec<NeedKind>,
    /// Role jobs flagged unobtainable until the next hourly tick.
    pub job_unavailable: bool,
}

impl GoalState {
    /// Setting a new goal cancels whatever was going on, unconditionally.
    pub fn set_goal(&mut self, goal: Goal) {
        self.goal = Some(goal);
        self.stack.clear();
        self.current = None;
    }

    pub fn mark_unavailable(&mut self, kind: NeedKind) {
        if !self.unavailable.contains(&kind) {
            self.unavailable.push(kind);
        }
    }

    pub fn is_unavailable(&self, kind: NeedKind) -> bool {
        self.unavailable.contains(&kind)
    }

    /// Hourly reset: failed needs and jobs become fair game again.
    pub fn reset_availability(&mut self) {
        self.unavailable.clear();
        self.job_unavailable = false;
    }

    pub fn is_idle(&self) -> bool {
        self.current.is_none() && self.stack.is_empty()
    }

    pub fn mid_climb(&self) -> bool {
        self.current
            .as_ref()
            .map(|c| c.action.is_climb())
            .unwrap_or(false)
    }
}

/// How a colonist is currently moving, consumed by the renderer to pick
/// sprites and easing. One step = one terrain column (or one cell of
/// ladder).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementKind {
    Standing,
    Walk,
    SmallClimb,
    BigClimb,
    SmallDrop,
    BigDrop,
    ClimbUp,
    ClimbDown,
}

impl MovementKind {
    /// Minutes to traverse one step of this kind.
    pub fn cost(&self) -> u32 {
        match self {
            MovementKind::Standing => 0,
            MovementKind::Walk => 1,
            MovementKind::SmallClimb | MovementKind::SmallDrop => 2,
            MovementKind::BigClimb | MovementKind::BigDrop => 3,
            MovementKind::ClimbUp | MovementKind::ClimbDown => 1,
        }
    }

    /// Kind of horizontal step given the height delta to the next column
    /// (positive delta = next column is lower, y grows downward).
    pub fn from_height_delta(delta: i32) -> Self {
        match delta {
            0 => MovementKind::Walk,
            1 => MovementKind::SmallDrop,
            -1 => MovementKind::SmallClimb,
            d if d >= 2 => MovementKind::BigDrop,
            _ => MovementKind::BigClimb,
        }
    }
}

/// Per-tick movement state published for the renderer/animator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementState {
    pub kind: MovementKind,
    /// Progress through the current step, 0.0..1.0.
    pub progress: f32,
    pub facing: Facing,
}

impl Default for MovementState {
    fn default() -> Self {
        Self {
            kind: MovementKind::Standing,
            progress: 0.0,
            facing: Facing::Right,
        }
    }
}
