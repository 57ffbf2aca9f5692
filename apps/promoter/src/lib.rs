//! # promoter
//!
//! Registers a trained run artifact as a new model version in an MLflow
//! registry and moves that version to a lifecycle stage.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    apps/promoter (THE BINARY)                │
//! │                                                              │
//! │  ┌───────────┐    ┌─────────────┐    ┌──────────────────┐   │
//! │  │   CLI     │───▶│  Registrar  │───▶│  MlflowClient    │───┼──▶ registry
//! │  │  (clap)   │    │             │    │  (reqwest)       │   │
//! │  └─────┬─────┘    └─────────────┘    └──────────────────┘   │
//! │        │                                                     │
//! │        ▼                                                     │
//! │  ┌───────────────┐                                           │
//! │  │ promoter-core │  ModelInfo, locator, Stage, Settings      │
//! │  └───────────────┘                                           │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod client;
pub mod logging;
pub mod registrar;
