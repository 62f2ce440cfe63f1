//! Workspace aggregate as seen by the orchestration core.

use super::{AgentId, AgentMember, UserId, WorkspaceDomainError, WorkspaceId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// A multi-agent workspace.
///
/// The roster is ordered and unique by agent identifier. Instances are
/// read-only snapshots handed to the core on every call.
///
/// # Examples
///
/// ```
/// use conclave::workspace::domain::{AgentId, AgentMember, AgentName, Workspace, WorkspaceId};
///
/// let sales = AgentMember::new(AgentName::new("Sales").unwrap(), AgentId::new());
/// let workspace = Workspace::new(WorkspaceId::new(), "Front desk", vec![sales], [], false).unwrap();
/// assert!(workspace.find_by_name("sales").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    id: WorkspaceId,
    display_name: String,
    members: Vec<AgentMember>,
    authorized_users: BTreeSet<UserId>,
    group_chat_enabled: bool,
}

impl Workspace {
    /// Creates a workspace snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::EmptyDisplayName`] when the display
    /// name is blank or [`WorkspaceDomainError::DuplicateMember`] when two
    /// roster entries share an agent identifier.
    pub fn new(
        id: WorkspaceId,
        display_name: impl Into<String>,
        members: Vec<AgentMember>,
        authorized_users: impl IntoIterator<Item = UserId>,
        group_chat_enabled: bool,
    ) -> Result<Self, WorkspaceDomainError> {
        let normalized_name = display_name.into().trim().to_owned();
        if normalized_name.is_empty() {
            return Err(WorkspaceDomainError::EmptyDisplayName);
        }

        let mut seen = HashSet::with_capacity(members.len());
        for member in &members {
            if !seen.insert(member.id()) {
                return Err(WorkspaceDomainError::DuplicateMember(member.id()));
            }
        }

        Ok(Self {
            id,
            display_name: normalized_name,
            members,
            authorized_users: authorized_users.into_iter().collect(),
            group_chat_enabled,
        })
    }

    /// Returns the workspace identifier.
    #[must_use]
    pub const fn id(&self) -> WorkspaceId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the roster in configured order.
    #[must_use]
    pub fn members(&self) -> &[AgentMember] {
        &self.members
    }

    /// Returns whether several agents may be addressed in one run.
    #[must_use]
    pub const fn group_chat_enabled(&self) -> bool {
        self.group_chat_enabled
    }

    /// Finds a member by display name, ignoring case.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&AgentMember> {
        self.members.iter().find(|member| member.name().matches(name))
    }

    /// Finds a member by agent identifier.
    #[must_use]
    pub fn find_by_id(&self, agent_id: AgentId) -> Option<&AgentMember> {
        self.members.iter().find(|member| member.id() == agent_id)
    }

    /// Returns `true` when the agent is currently on the roster.
    #[must_use]
    pub fn contains(&self, agent_id: AgentId) -> bool {
        self.find_by_id(agent_id).is_some()
    }

    /// Returns `true` when the user may converse in this workspace.
    #[must_use]
    pub fn is_authorized(&self, user: &UserId) -> bool {
        self.authorized_users.contains(user)
    }
}
