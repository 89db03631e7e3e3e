//! Parameter set for one chart generation run
//!
//! A [`ParameterSet`] holds the chart name and which optional resource kinds
//! are enabled. It can only be obtained through [`ParameterSetBuilder::build`],
//! which validates it, and it cannot be changed afterwards.

use crate::error::{GenerationError, Result};
use crate::version::{parse_chart_version, DEFAULT_APP_VERSION, DEFAULT_CHART_VERSION};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// Optional resource categories a chart can include
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceKind {
    Deployment,
    StatefulSet,
    DaemonSet,
    CronJob,
    ConfigMap,
    Service,
    ServiceAccount,
    Ingress,
    Volumes,
    HorizontalAutoscaler,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 10] = [
        ResourceKind::Deployment,
        ResourceKind::StatefulSet,
        ResourceKind::DaemonSet,
        ResourceKind::CronJob,
        ResourceKind::ConfigMap,
        ResourceKind::Service,
        ResourceKind::ServiceAccount,
        ResourceKind::Ingress,
        ResourceKind::Volumes,
        ResourceKind::HorizontalAutoscaler,
    ];

    /// Field name of this kind in the render context
    pub fn key(&self) -> &'static str {
        match self {
            ResourceKind::Deployment => "deployment",
            ResourceKind::StatefulSet => "statefulset",
            ResourceKind::DaemonSet => "daemonset",
            ResourceKind::CronJob => "cronjob",
            ResourceKind::ConfigMap => "configmap",
            ResourceKind::Service => "service",
            ResourceKind::ServiceAccount => "serviceaccount",
            ResourceKind::Ingress => "ingress",
            ResourceKind::Volumes => "volumes",
            ResourceKind::HorizontalAutoscaler => "hpa",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ResourceKind::Deployment => "Deployment",
            ResourceKind::StatefulSet => "StatefulSet",
            ResourceKind::DaemonSet => "DaemonSet",
            ResourceKind::CronJob => "CronJob",
            ResourceKind::ConfigMap => "ConfigMap",
            ResourceKind::Service => "Service",
            ResourceKind::ServiceAccount => "ServiceAccount",
            ResourceKind::Ingress => "Ingress",
            ResourceKind::Volumes => "Volumes",
            ResourceKind::HorizontalAutoscaler => "HorizontalPodAutoscaler",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Validated, immutable inputs of a generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSet {
    name: String,
    enabled: BTreeSet<ResourceKind>,
    chart_version: String,
    app_version: String,
}

impl ParameterSet {
    /// Start building a parameter set for the chart `name`
    pub fn builder(name: impl Into<String>) -> ParameterSetBuilder {
        ParameterSetBuilder {
            name: name.into(),
            enabled: BTreeSet::new(),
            chart_version: DEFAULT_CHART_VERSION.to_string(),
            app_version: DEFAULT_APP_VERSION.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_enabled(&self, kind: ResourceKind) -> bool {
        self.enabled.contains(&kind)
    }

    /// Enabled kinds in [`ResourceKind::ALL`] order
    pub fn enabled_kinds(&self) -> impl Iterator<Item = ResourceKind> + '_ {
        self.enabled.iter().copied()
    }

    pub fn chart_version(&self) -> &str {
        &self.chart_version
    }

    pub fn app_version(&self) -> &str {
        &self.app_version
    }
}

/// Render context: chart metadata plus one boolean per resource kind
impl Serialize for ParameterSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3 + ResourceKind::ALL.len()))?;
        map.serialize_entry("chart_name", &self.name)?;
        map.serialize_entry("chart_version", &self.chart_version)?;
        map.serialize_entry("app_version", &self.app_version)?;
        for kind in ResourceKind::ALL {
            map.serialize_entry(kind.key(), &self.is_enabled(kind))?;
        }
        map.end()
    }
}

/// Builder for [`ParameterSet`]
#[derive(Debug, Clone)]
pub struct ParameterSetBuilder {
    name: String,
    enabled: BTreeSet<ResourceKind>,
    chart_version: String,
    app_version: String,
}

impl ParameterSetBuilder {
    pub fn enable(mut self, kind: ResourceKind) -> Self {
        self.enabled.insert(kind);
        self
    }

    pub fn set(mut self, kind: ResourceKind, enabled: bool) -> Self {
        if enabled {
            self.enabled.insert(kind);
        } else {
            self.enabled.remove(&kind);
        }
        self
    }

    pub fn chart_version(mut self, version: impl Into<String>) -> Self {
        self.chart_version = version.into();
        self
    }

    pub fn app_version(mut self, version: impl Into<String>) -> Self {
        self.app_version = version.into();
        self
    }

    /// Validate and freeze the parameters
    pub fn build(self) -> Result<ParameterSet> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(
                GenerationError::validation("validate-config", "chart name is required")
                    .with_flag("-n"),
            );
        }
        if let Some(bad) = name
            .chars()
            .find(|c| c.is_whitespace() || *c == '/' || *c == '\\')
        {
            return Err(GenerationError::validation(
                "validate-config",
                format!("chart name '{}' contains invalid character {:?}", name, bad),
            )
            .with_flag("-n"));
        }

        let chart_version = parse_chart_version(&self.chart_version)
            .map_err(|e| e.with_flag("--chart-version"))?;

        let app_version = self.app_version.trim();
        if app_version.is_empty() {
            return Err(
                GenerationError::validation("validate-config", "app version must not be empty")
                    .with_flag("--app-version"),
            );
        }

        Ok(ParameterSet {
            name: name.to_string(),
            enabled: self.enabled,
            chart_version: chart_version.to_string(),
            app_version: app_version.to_string(),
        })
    }
}
