//! Configuration resolution and precondition checks.

use tracing::{debug, instrument};

use crate::{
    application::{ApplicationError, ports::ToolProbe},
    domain::{Configuration, RequiredTool, ScaffoldOptions},
    error::TrestleResult,
};

/// Turns raw options into a [`Configuration`] the pipeline may run with.
pub struct ConfigurationResolver<'a> {
    probe: &'a dyn ToolProbe,
}

impl<'a> ConfigurationResolver<'a> {
    pub fn new(probe: &'a dyn ToolProbe) -> Self {
        Self { probe }
    }

    /// Validate options and check every required tool is installed.
    #[instrument(skip_all, fields(app = %options.app_name))]
    pub fn resolve(&self, options: ScaffoldOptions) -> TrestleResult<Configuration> {
        let config = Configuration::from_options(options)?;
        self.check_preconditions(&config)?;
        Ok(config)
    }

    /// Fails on the first missing tool, in declaration order.
    pub fn check_preconditions(&self, config: &Configuration) -> TrestleResult<()> {
        match self.missing_tools(config).into_iter().next() {
            Some(tool) => Err(ApplicationError::PreconditionFailed {
                tool: tool.name.to_string(),
                reason: tool.reason.to_string(),
            }
            .into()),
            None => Ok(()),
        }
    }

    pub fn missing_tools(&self, config: &Configuration) -> Vec<RequiredTool> {
        config
            .required_tools()
            .into_iter()
            .filter(|tool| {
                let found = self.probe.is_available(tool.name);
                debug!(tool = tool.name, found, "probed tool");
                !found
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockToolProbe;
    use crate::error::TrestleError;

    fn options(f: impl FnOnce(&mut ScaffoldOptions)) -> ScaffoldOptions {
        let mut options = ScaffoldOptions::new("shop");
        f(&mut options);
        options
    }

    #[test]
    fn webpack_without_yarn_fails_before_anything_else() {
        let mut probe = MockToolProbe::new();
        probe
            .expect_is_available()
            .returning(|tool: &str| tool != "yarn");

        let err = ConfigurationResolver::new(&probe)
            .resolve(options(|o| o.webpack = true))
            .unwrap_err();

        assert!(matches!(
            err,
            TrestleError::Application(ApplicationError::PreconditionFailed { ref tool, .. })
                if tool == "yarn"
        ));
    }

    #[test]
    fn skipped_integrations_need_no_tools() {
        let mut probe = MockToolProbe::new();
        probe.expect_is_available().never();

        let config = ConfigurationResolver::new(&probe)
            .resolve(options(|o| {
                o.skip_vcs = true;
                o.skip_deploy_provisioning = true;
            }))
            .unwrap();
        assert!(config.skip_vcs());
    }

    #[test]
    fn invalid_options_surface_as_domain_errors() {
        let probe = MockToolProbe::new();
        let err = ConfigurationResolver::new(&probe)
            .resolve(options(|o| o.app_name = "9lives".into()))
            .unwrap_err();
        assert!(matches!(err, TrestleError::Domain(_)));
    }

    #[test]
    fn missing_tools_lists_every_absent_tool() {
        let mut probe = MockToolProbe::new();
        probe.expect_is_available().return_const(false);

        let config = Configuration::from_options(options(|_| {})).unwrap();
        let missing: Vec<_> = ConfigurationResolver::new(&probe)
            .missing_tools(&config)
            .iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(missing, vec!["git", "heroku"]);
    }
}
