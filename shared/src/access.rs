//! Role to capability mapping
//!
//! Roles and capabilities are closed sets. A matrix built from string
//! tags is checked at construction: unknown tags and roles without an
//! entry are rejected, so lookups never fall through to a default.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Admin,
    Doctor,
    Nurse,
    Dispatcher,
    Paramedic,
    Receptionist,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Admin,
        Role::Doctor,
        Role::Nurse,
        Role::Dispatcher,
        Role::Paramedic,
        Role::Receptionist,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Doctor => "doctor",
            Role::Nurse => "nurse",
            Role::Dispatcher => "dispatcher",
            Role::Paramedic => "paramedic",
            Role::Receptionist => "receptionist",
        }
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| CoreError::invalid(format!("unknown role {:?}", s)))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    ViewTriageQueue,
    UpdateTriageStatus,
    RegisterIntake,
    ViewUnits,
    DispatchUnits,
    ManageStaff,
    RequestTransfer,
    ScheduleTelemedicine,
}

impl Capability {
    pub const ALL: [Capability; 8] = [
        Capability::ViewTriageQueue,
        Capability::UpdateTriageStatus,
        Capability::RegisterIntake,
        Capability::ViewUnits,
        Capability::DispatchUnits,
        Capability::ManageStaff,
        Capability::RequestTransfer,
        Capability::ScheduleTelemedicine,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ViewTriageQueue => "view-triage-queue",
            Capability::UpdateTriageStatus => "update-triage-status",
            Capability::RegisterIntake => "register-intake",
            Capability::ViewUnits => "view-units",
            Capability::DispatchUnits => "dispatch-units",
            Capability::ManageStaff => "manage-staff",
            Capability::RequestTransfer => "request-transfer",
            Capability::ScheduleTelemedicine => "schedule-telemedicine",
        }
    }
}

impl FromStr for Capability {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Capability::ALL
            .into_iter()
            .find(|cap| cap.as_str() == s)
            .ok_or_else(|| CoreError::invalid(format!("unknown capability {:?}", s)))
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const STANDARD_TABLE: &[(&str, &[&str])] = &[
    (
        "admin",
        &[
            "view-triage-queue",
            "update-triage-status",
            "register-intake",
            "view-units",
            "dispatch-units",
            "manage-staff",
            "request-transfer",
            "schedule-telemedicine",
        ],
    ),
    (
        "doctor",
        &[
            "view-triage-queue",
            "update-triage-status",
            "view-units",
            "request-transfer",
            "schedule-telemedicine",
        ],
    ),
    (
        "nurse",
        &["view-triage-queue", "update-triage-status", "register-intake", "view-units"],
    ),
    ("dispatcher", &["view-units", "dispatch-units", "request-transfer"]),
    ("paramedic", &["view-units", "register-intake"]),
    ("receptionist", &["view-triage-queue", "register-intake", "schedule-telemedicine"]),
];

#[derive(Debug, Clone)]
pub struct CapabilityMatrix {
    grants: HashMap<Role, BTreeSet<Capability>>,
}

impl CapabilityMatrix {
    /// Parse a `(role, [capability])` table. Every role must appear exactly once.
    pub fn from_table(table: &[(&str, &[&str])]) -> Result<Self, CoreError> {
        let mut grants = HashMap::new();

        for (role_tag, capability_tags) in table {
            let role: Role = role_tag.parse()?;
            let capabilities = capability_tags
                .iter()
                .map(|tag| tag.parse::<Capability>())
                .collect::<Result<BTreeSet<_>, _>>()?;

            if grants.insert(role, capabilities).is_some() {
                return Err(CoreError::invalid(format!("role {} listed twice", role)));
            }
        }

        if let Some(missing) = Role::ALL.iter().find(|role| !grants.contains_key(*role)) {
            return Err(CoreError::invalid(format!("role {} has no capability entry", missing)));
        }

        Ok(Self { grants })
    }

    pub fn standard() -> Self {
        match Self::from_table(STANDARD_TABLE) {
            Ok(matrix) => matrix,
            Err(e) => unreachable!("built-in capability table is invalid: {}", e),
        }
    }

    pub fn allows(&self, role: Role, capability: Capability) -> bool {
        self.grants
            .get(&role)
            .map(|caps| caps.contains(&capability))
            .unwrap_or(false)
    }

    pub fn capabilities(&self, role: Role) -> impl Iterator<Item = Capability> + '_ {
        self.grants.get(&role).into_iter().flat_map(|caps| caps.iter().copied())
    }
}

impl Default for CapabilityMatrix {
    fn default() -> Self {
        Self::standard()
    }
}
