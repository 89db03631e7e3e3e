//! Built-in chart template catalog
//!
//! Templates are embedded at compile time with [`include_str!`] and rendered
//! with minijinja. Helm's own `{{ ... }}` expressions live inside
//! `{% raw %}` sections so they pass through rendering untouched; the
//! chart name placeholder (`example`) is left for the rewrite pass.

use super::TemplateSource;
use crate::error::TemplateError;
use crate::params::ParameterSet;
use minijinja::{AutoEscape, Environment, UndefinedBehavior};

/// Catalog entries: source name -> template text
const CHART_TEMPLATES: &[(&str, &str)] = &[
    ("Chart.yaml", include_str!("../../templates/chart/Chart.yaml")),
    ("values.yaml", include_str!("../../templates/chart/values.yaml")),
    ("helmignore", include_str!("../../templates/chart/helmignore")),
    (
        "templates/helpers.tpl",
        include_str!("../../templates/chart/templates/helpers.tpl"),
    ),
    (
        "templates/deployment.yaml",
        include_str!("../../templates/chart/templates/deployment.yaml"),
    ),
    (
        "templates/statefulset.yaml",
        include_str!("../../templates/chart/templates/statefulset.yaml"),
    ),
    (
        "templates/daemonset.yaml",
        include_str!("../../templates/chart/templates/daemonset.yaml"),
    ),
    (
        "templates/cronjob.yaml",
        include_str!("../../templates/chart/templates/cronjob.yaml"),
    ),
    (
        "templates/configmap.yaml",
        include_str!("../../templates/chart/templates/configmap.yaml"),
    ),
    (
        "templates/service.yaml",
        include_str!("../../templates/chart/templates/service.yaml"),
    ),
    (
        "templates/serviceaccount.yaml",
        include_str!("../../templates/chart/templates/serviceaccount.yaml"),
    ),
    (
        "templates/ingress.yaml",
        include_str!("../../templates/chart/templates/ingress.yaml"),
    ),
    (
        "templates/hpa.yaml",
        include_str!("../../templates/chart/templates/hpa.yaml"),
    ),
    (
        "templates/tests/test-connection.yaml",
        include_str!("../../templates/chart/templates/tests/test-connection.yaml"),
    ),
    (
        "templates/NOTES-objects-created.txt",
        include_str!("../../templates/chart/templates/NOTES-objects-created.txt"),
    ),
    (
        "templates/NOTES-DEFAULT.txt",
        include_str!("../../templates/chart/templates/NOTES-DEFAULT.txt"),
    ),
    (
        "templates/NOTES-INGRESS.txt",
        include_str!("../../templates/chart/templates/NOTES-INGRESS.txt"),
    ),
    (
        "templates/NOTES-SERVICE.txt",
        include_str!("../../templates/chart/templates/NOTES-SERVICE.txt"),
    ),
];

/// Template source backed by a static table of named templates
pub struct EmbeddedCatalog {
    env: Environment<'static>,
    entries: &'static [(&'static str, &'static str)],
}

impl EmbeddedCatalog {
    /// The chart catalog shipped with the binary
    pub fn new() -> Self {
        Self::from_entries(CHART_TEMPLATES)
    }

    /// A catalog over a custom table
    pub fn from_entries(entries: &'static [(&'static str, &'static str)]) -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        Self { env, entries }
    }

    fn lookup(&self, name: &str) -> Result<&'static str, TemplateError> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, content)| *content)
            .ok_or_else(|| TemplateError::NotFound {
                name: name.to_string(),
            })
    }
}

impl Default for EmbeddedCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateSource for EmbeddedCatalog {
    fn fetch_raw(&self, name: &str) -> Result<Vec<u8>, TemplateError> {
        self.lookup(name).map(|content| content.as_bytes().to_vec())
    }

    fn render(&self, name: &str, params: &ParameterSet) -> Result<Vec<u8>, TemplateError> {
        let source = self.lookup(name)?;
        // Parsed on every call; a broken template surfaces here rather than at startup
        let template =
            self.env
                .template_from_named_str(name, source)
                .map_err(|e| TemplateError::Parse {
                    name: name.to_string(),
                    source: Box::new(e),
                })?;
        let rendered = template
            .render(params)
            .map_err(|e| TemplateError::Execution {
                name: name.to_string(),
                source: Box::new(e),
            })?;
        Ok(rendered.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ResourceKind;
    use crate::templates::descriptor::{self, Mode};

    fn params(kinds: &[ResourceKind]) -> ParameterSet {
        kinds
            .iter()
            .fold(ParameterSet::builder("web-app"), |b, k| b.enable(*k))
            .build()
            .unwrap()
    }

    fn render_str(catalog: &EmbeddedCatalog, name: &str, p: &ParameterSet) -> String {
        String::from_utf8(catalog.render(name, p).unwrap()).unwrap()
    }

    #[test]
    fn test_every_descriptor_resolves() {
        let catalog = EmbeddedCatalog::new();
        let all = descriptor::MANDATORY
            .iter()
            .chain(descriptor::RESOURCES.iter().map(|(_, d)| d))
            .chain([
                &descriptor::CONNECTION_TEST,
                &descriptor::NOTES_OBJECTS,
                &descriptor::NOTES_DEFAULT,
                &descriptor::NOTES_INGRESS,
                &descriptor::NOTES_SERVICE,
            ]);
        for d in all {
            assert!(catalog.fetch_raw(d.source).is_ok(), "{}", d.source);
        }
    }

    #[test]
    fn test_every_render_template_renders_with_all_flags() {
        let catalog = EmbeddedCatalog::new();
        let everything = params(&ResourceKind::ALL);
        let nothing = params(&[]);
        let renders = descriptor::MANDATORY
            .iter()
            .chain(descriptor::RESOURCES.iter().map(|(_, d)| d))
            .chain([&descriptor::CONNECTION_TEST, &descriptor::NOTES_OBJECTS])
            .filter(|d| d.mode == Mode::Render);
        for d in renders {
            assert!(catalog.render(d.source, &everything).is_ok(), "{}", d.source);
            assert!(catalog.render(d.source, &nothing).is_ok(), "{}", d.source);
        }
    }

    #[test]
    fn test_unknown_template() {
        let catalog = EmbeddedCatalog::new();
        let err = catalog.fetch_raw("templates/pdb.yaml").unwrap_err();
        assert!(matches!(err, TemplateError::NotFound { .. }));
        let err = catalog.render("templates/pdb.yaml", &params(&[])).unwrap_err();
        assert!(matches!(err, TemplateError::NotFound { .. }));
    }

    #[test]
    fn test_chart_metadata_uses_parameters() {
        let catalog = EmbeddedCatalog::new();
        let p = ParameterSet::builder("web-app")
            .chart_version("1.4.2")
            .app_version("2.0")
            .build()
            .unwrap();
        let chart = render_str(&catalog, "Chart.yaml", &p);
        assert!(chart.contains("name: example\n"));
        assert!(chart.contains("version: 1.4.2"));
        assert!(chart.contains("appVersion: \"2.0\""));
    }

    #[test]
    fn test_helm_expressions_survive_rendering() {
        let catalog = EmbeddedCatalog::new();
        let out = render_str(&catalog, "templates/service.yaml", &params(&[ResourceKind::Service]));
        assert!(out.contains("{{ include \"example.fullname\" . }}"));
        assert!(out.contains("{{ .Values.service.port }}"));
    }

    #[test]
    fn test_values_sections_follow_flags() {
        let catalog = EmbeddedCatalog::new();
        let bare = render_str(&catalog, "values.yaml", &params(&[]));
        assert!(!bare.contains("ingress:"));
        assert!(!bare.contains("autoscaling:"));

        let full = render_str(
            &catalog,
            "values.yaml",
            &params(&[ResourceKind::Ingress, ResourceKind::HorizontalAutoscaler]),
        );
        assert!(full.contains("ingress:"));
        assert!(full.contains("autoscaling:"));
    }

    #[test]
    fn test_deployment_service_account_is_conditional() {
        let catalog = EmbeddedCatalog::new();
        let without = render_str(
            &catalog,
            "templates/deployment.yaml",
            &params(&[ResourceKind::Deployment]),
        );
        assert!(!without.contains("serviceAccountName"));

        let with = render_str(
            &catalog,
            "templates/deployment.yaml",
            &params(&[ResourceKind::Deployment, ResourceKind::ServiceAccount]),
        );
        assert!(with.contains("serviceAccountName"));
    }

    #[test]
    fn test_parse_error() {
        static BROKEN: &[(&str, &str)] = &[("broken.yaml", "{% if service %}never closed")];
        let catalog = EmbeddedCatalog::from_entries(BROKEN);
        let err = catalog.render("broken.yaml", &params(&[])).unwrap_err();
        assert!(matches!(err, TemplateError::Parse { .. }));
        // Raw access does not parse
        assert!(catalog.fetch_raw("broken.yaml").is_ok());
    }

    #[test]
    fn test_execution_error_on_undefined_field() {
        static UNDEFINED: &[(&str, &str)] = &[("bad.yaml", "name: {{ missing.field }}")];
        let catalog = EmbeddedCatalog::from_entries(UNDEFINED);
        let err = catalog.render("bad.yaml", &params(&[])).unwrap_err();
        assert!(matches!(err, TemplateError::Execution { .. }));
    }

    #[test]
    fn test_rendering_never_writes_chart_name() {
        let catalog = EmbeddedCatalog::new();
        let p = ResourceKind::ALL
            .iter()
            .fold(ParameterSet::builder("example-app"), |b, k| b.enable(*k))
            .build()
            .unwrap();
        let renders = descriptor::MANDATORY
            .iter()
            .chain(descriptor::RESOURCES.iter().map(|(_, d)| d))
            .chain([&descriptor::CONNECTION_TEST, &descriptor::NOTES_OBJECTS])
            .filter(|d| d.mode == Mode::Render);
        for d in renders {
            let out = render_str(&catalog, d.source, &p);
            assert!(!out.contains("example-app"), "{}", d.source);
        }
    }
}
