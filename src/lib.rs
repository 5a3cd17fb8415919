//! Lead Scoring API Library
//!
//! This library provides the core functionality for the Lead Scoring API:
//! parsing uploaded CSVs, mapping arbitrary column headers onto the
//! canonical lead schema, normalizing rows into lead records, and assigning
//! each lead a priority score from its job title.
//!
//! # Modules
//!
//! - `config`: Configuration management.
//! - `csv_parser`: CSV text into headers and row objects.
//! - `errors`: Error handling types.
//! - `export`: JSON export and sorting helpers for scored leads.
//! - `handlers`: HTTP request handlers.
//! - `mapping`: Header-to-field mapping and its confirmation state machine.
//! - `models`: Core data models.
//! - `normalize`: Confirmed mapping applied to parsed rows.
//! - `scoring`: Title-based rule scoring.

pub mod config;
pub mod csv_parser;
pub mod errors;
pub mod export;
pub mod handlers;
pub mod mapping;
pub mod models;
pub mod normalize;
pub mod scoring;
