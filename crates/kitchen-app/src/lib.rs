//! # Kitchen Front of House
//!
//! Client side of a restaurant's order flow: the kitchen board that follows live
//! orders, the salon screen that submits them, and catalog management.
//!
//! Nothing here owns durable state. The REST API is the system of record and the
//! hub pushes changes; each screen is a replica kept by a
//! [`ReplicaActor`](replica_actor::ReplicaActor).
//!
//! - [`api`] - REST client and the in-memory stand-in
//! - [`hub`] - real-time push channel
//! - [`board_actor`] / [`card_actor`] - the replicas
//! - [`clients`] - typed handles that raise toasts
//! - [`lifecycle`] - [`FrontOfHouse`](lifecycle::FrontOfHouse) wiring and shutdown
//! - [`countdown`], [`catalog`], [`notify`], [`terminal`] - view helpers

pub mod api;
pub mod board_actor;
pub mod card_actor;
pub mod catalog;
pub mod clients;
pub mod config;
pub mod countdown;
pub mod hub;
pub mod lifecycle;
pub mod model;
pub mod notify;
pub mod terminal;
