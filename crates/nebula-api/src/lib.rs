//! # nebula-api
//!
//! Typed client for the Nebula cluster-management REST API.
//!
//! The API is scoped by organization and cluster:
//!
//! ```text
//! /orgs/                                        organizations
//! /orgs/{provider}/{org}/vc                     clusters
//! /orgs/{provider}/{org}/vc/{cid}/instance      namespaces
//! /namespace/{name}                             namespace resources
//! ```
//!
//! [`ApiClient`] issues the HTTP calls; [`OrgScope`] and [`ClusterScope`]
//! carry the validated path parameters. Namespace lifecycle transitions
//! happen server-side and are observed through [`poll::wait_for`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod auth;
pub mod client;
pub mod commit;
pub mod constants;
pub mod error;
pub mod poll;
pub mod types;

pub use auth::Credentials;
pub use client::{ApiClient, ClusterScope, OrgScope};
pub use commit::CommitRef;
pub use error::ApiError;
pub use poll::{wait_for, WaitOutcome};
pub use types::{Cluster, Namespace, NamespaceResources, Org, Phase, Service, Ske, Status};
