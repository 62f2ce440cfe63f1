//! Workspace roster types shared by the orchestration core.
//!
//! Workspaces are created and edited by management collaborators outside this
//! crate. The core only reads them: the roster of member agents, the set of
//! authorized users, and whether group chat is enabled.

pub mod domain;
