// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::BTreeSet;
use std::path::Path;

use capstan_types::SchemaVersion;
use serde_derive::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoEnumIterator};
use thiserror::Error;

/// Configuration for the conversion and admission engine.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub conversion: ConversionConfig,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ConversionConfig {
    /// Schema versions accepted as input or requested as output. The hub is
    /// served whether or not it is listed.
    #[serde(default = "all_versions")]
    pub served_versions: Vec<SchemaVersion>,

    /// The version every other version converts through. Only one hub is
    /// compiled in; this exists so a deployment states the hub it expects.
    #[serde(default = "hub_version")]
    pub hub_version: SchemaVersion,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self { served_versions: all_versions(), hub_version: hub_version() }
    }
}

fn all_versions() -> Vec<SchemaVersion> {
    SchemaVersion::iter().collect()
}

fn hub_version() -> SchemaVersion {
    SchemaVersion::HUB
}

#[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct LogConfig {
    #[serde(default)]
    pub level: LogLevel,
}

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogLevel {
    Critical,
    Error,
    Warning,
    #[default]
    Info,
    Debug,
    Trace,
}

/// Errors which may be returned when loading the configuration.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Cannot parse toml: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("hub version {configured} does not match built-in hub {builtin}")]
    HubMismatch { configured: SchemaVersion, builtin: SchemaVersion },

    #[error("schema version {0} is listed more than once")]
    DuplicateVersion(SchemaVersion),
}

impl Config {
    /// Checks the semantic constraints TOML parsing alone cannot express.
    pub fn validate(&self) -> Result<(), ParseError> {
        let conversion = &self.conversion;
        if conversion.hub_version != SchemaVersion::HUB {
            return Err(ParseError::HubMismatch {
                configured: conversion.hub_version,
                builtin: SchemaVersion::HUB,
            });
        }

        let mut seen = BTreeSet::new();
        for v in &conversion.served_versions {
            if !seen.insert(*v) {
                return Err(ParseError::DuplicateVersion(*v));
            }
        }

        Ok(())
    }
}

/// Parses a TOML string into a validated configuration object.
pub fn parse_str(contents: &str) -> Result<Config, ParseError> {
    let cfg = toml::from_str::<Config>(contents)?;
    cfg.validate()?;
    Ok(cfg)
}

/// Parses a TOML file into a validated configuration object.
pub fn parse<P: AsRef<Path>>(path: P) -> Result<Config, ParseError> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    parse_str(&contents)
}
