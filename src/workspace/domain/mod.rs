//! Domain model for workspaces and their member agents.

mod error;
mod ids;
mod member;
mod name;
mod workspace;

pub use error::WorkspaceDomainError;
pub use ids::{AgentId, UserId, WorkspaceId};
pub use member::AgentMember;
pub use name::AgentName;
pub use workspace::Workspace;
