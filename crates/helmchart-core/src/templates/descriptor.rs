//! Static tables mapping catalog templates to output paths

use crate::params::ResourceKind;

/// How a template reaches its output file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Rendered with the parameter set, output file truncated first
    Render,
    /// Raw bytes written as-is
    Copy,
    /// Raw bytes appended to an existing (or new) file
    Append,
}

/// One template instantiation: catalog source, output path relative to the chart root, mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateDescriptor {
    pub source: &'static str,
    pub output: &'static str,
    pub mode: Mode,
}

impl TemplateDescriptor {
    pub const fn new(source: &'static str, output: &'static str, mode: Mode) -> Self {
        Self {
            source,
            output,
            mode,
        }
    }
}

/// Base templates directory, relative to the chart root
pub const TEMPLATES_DIR: &str = "templates";

/// Helm test hooks directory, created only when a Service is generated
pub const TESTS_DIR: &str = "templates/tests";

/// Files every chart gets
pub static MANDATORY: [TemplateDescriptor; 4] = [
    TemplateDescriptor::new("templates/helpers.tpl", "templates/_helpers.tpl", Mode::Copy),
    TemplateDescriptor::new("helmignore", ".helmignore", Mode::Copy),
    TemplateDescriptor::new("Chart.yaml", "Chart.yaml", Mode::Render),
    TemplateDescriptor::new("values.yaml", "values.yaml", Mode::Render),
];

pub static CONNECTION_TEST: TemplateDescriptor = TemplateDescriptor::new(
    "templates/tests/test-connection.yaml",
    "templates/tests/test-connection.yaml",
    Mode::Render,
);

/// Conditional resources, processed in this order
///
/// Volumes has no entry: it only shapes the workload templates and values.
pub static RESOURCES: [(ResourceKind, TemplateDescriptor); 9] = [
    (
        ResourceKind::CronJob,
        TemplateDescriptor::new(
            "templates/cronjob.yaml",
            "templates/cronjob.yaml",
            Mode::Render,
        ),
    ),
    (
        ResourceKind::Deployment,
        TemplateDescriptor::new(
            "templates/deployment.yaml",
            "templates/deployment.yaml",
            Mode::Render,
        ),
    ),
    (
        ResourceKind::DaemonSet,
        TemplateDescriptor::new(
            "templates/daemonset.yaml",
            "templates/daemonset.yaml",
            Mode::Render,
        ),
    ),
    (
        ResourceKind::Service,
        TemplateDescriptor::new(
            "templates/service.yaml",
            "templates/service.yaml",
            Mode::Render,
        ),
    ),
    (
        ResourceKind::Ingress,
        TemplateDescriptor::new(
            "templates/ingress.yaml",
            "templates/ingress.yaml",
            Mode::Render,
        ),
    ),
    (
        ResourceKind::ConfigMap,
        TemplateDescriptor::new(
            "templates/configmap.yaml",
            "templates/configmap.yaml",
            Mode::Render,
        ),
    ),
    (
        ResourceKind::ServiceAccount,
        TemplateDescriptor::new(
            "templates/serviceaccount.yaml",
            "templates/serviceaccount.yaml",
            Mode::Render,
        ),
    ),
    (
        ResourceKind::StatefulSet,
        TemplateDescriptor::new(
            "templates/statefulset.yaml",
            "templates/statefulset.yaml",
            Mode::Render,
        ),
    ),
    (
        ResourceKind::HorizontalAutoscaler,
        TemplateDescriptor::new("templates/hpa.yaml", "templates/hpa.yaml", Mode::Render),
    ),
];

pub static NOTES_OBJECTS: TemplateDescriptor = TemplateDescriptor::new(
    "templates/NOTES-objects-created.txt",
    "templates/NOTES.txt",
    Mode::Render,
);

pub static NOTES_DEFAULT: TemplateDescriptor = TemplateDescriptor::new(
    "templates/NOTES-DEFAULT.txt",
    "templates/NOTES.txt",
    Mode::Append,
);

pub static NOTES_INGRESS: TemplateDescriptor = TemplateDescriptor::new(
    "templates/NOTES-INGRESS.txt",
    "templates/NOTES.txt",
    Mode::Append,
);

pub static NOTES_SERVICE: TemplateDescriptor = TemplateDescriptor::new(
    "templates/NOTES-SERVICE.txt",
    "templates/NOTES.txt",
    Mode::Append,
);
