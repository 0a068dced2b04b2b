//! Job board - generates and hands out unit-of-work descriptors per
//! occupational role from eligible production modules.
//!
//! Jobs are transient: the board is rebuilt every simulated hour (and
//! after a work action completes) from whatever is eligible right then.
//! Nothing here is persisted.

use crate::components::{GridPos, JobType, ModuleId, Role};
use crate::economy::{ModuleRegistry, ResourceKind};
use serde::{Deserialize, Serialize};

/// Static description of what a role does and produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleInfo {
    pub job_type: JobType,
    pub resource_produced: ResourceKind,
    /// Base work duration in minutes, before morale adjustment.
    pub base_duration: u32,
}

pub const ALL_ROLES: [Role; 2] = [Role::Farmer, Role::Miner];

pub fn role_info(role: Role) -> RoleInfo {
    match role {
        Role::Farmer => RoleInfo {
            job_type: JobType::Farm,
            resource_produced: ResourceKind::Food,
            base_duration: 30,
        },
        Role::Miner => RoleInfo {
            job_type: JobType::Mine,
            resource_produced: ResourceKind::Minerals,
            base_duration: 40,
        },
    }
}

/// One unit of work at a module: go there, do the thing for `duration`
/// minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub job_type: JobType,
    pub coords: GridPos,
    pub duration: u32,
    pub module_id: ModuleId,
}

/// Open jobs, refreshed from the module registry on the hourly cadence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobBoard {
    jobs: Vec<Job>,
}

impl JobBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the whole board from eligible modules.
    pub fn refresh(&mut self, registry: &ModuleRegistry) {
        self.jobs.clear();
        for role in ALL_ROLES {
            self.generate_for_role(role, registry);
        }
    }

    /// Rebuild only one role's jobs (used after a work action resolves).
    pub fn refresh_role(&mut self, role: Role, registry: &ModuleRegistry) {
        let job_type = role_info(role).job_type;
        self.jobs.retain(|j| j.job_type != job_type);
        self.generate_for_role(role, registry);
    }

    fn generate_for_role(&mut self, role: Role, registry: &ModuleRegistry) {
        let info = role_info(role);
        for module in registry.modules() {
            if !module
                .info
                .production_outputs
                .iter()
                .any(|(kind, _)| *kind == info.resource_produced)
            {
                continue;
            }
            if !module.is_maintained || !module.has_production_inputs() {
                continue;
            }
            // One job per free crew slot, offset across the footprint so
            // workers spread out instead of stacking on one column.
            let standing_y = module.position.y + module.info.height - 1;
            for slot in 0..module.free_crew_slots() {
                let offset = slot as i32 % module.info.width.max(1);
                self.jobs.push(Job {
                    job_type: info.job_type,
                    coords: GridPos::new(module.position.x + offset, standing_y),
                    duration: info.base_duration,
                    module_id: module.id,
                });
            }
        }
    }

    /// Remove and return the open job of this role nearest (by horizontal
    /// distance) to the requester. `None` when the board has nothing for
    /// the role.
    pub fn get_job(&mut self, role: Role, requester_x: i32) -> Option<Job> {
        let job_type = role_info(role).job_type;
        let index = self
            .jobs
            .iter()
            .enumerate()
            .filter(|(_, j)| j.job_type == job_type)
            .min_by_key(|(_, j)| j.coords.x_distance(requester_x))
            .map(|(i, _)| i)?;
        Some(self.jobs.remove(index))
    }

    pub fn has_job(&self, role: Role) -> bool {
        let job_type = role_info(role).job_type;
        self.jobs.iter().any(|j| j.job_type == job_type)
    }

    pub fn open_jobs(&self) -> &[Job] {
        &self.jobs
    }
}
