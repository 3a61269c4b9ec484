use clap::{Arg, ArgAction, ArgMatches, Command};
use logging::trace_config;

use super::directive::WALK_DIRECTIVES;
use super::Config;
use crate::{BuildFile, ConfigError};

/// Name of the repeatable flag registered by [`WalkConfigurer`].
pub const EXCLUDE_FLAG: &str = "exclude";

/// Participant in the configuration chain.
///
/// Configurers declare command-line flags, validate them into the root
/// [`Config`], name the directives they understand and are called once per
/// entered directory, parents before children, during the configure pass.
pub trait Configurer {
    /// Adds this configurer's flags to `command`.
    fn register_flags(&self, command: Command) -> Command {
        command
    }

    /// Applies parsed flags to the root configuration.
    fn check_flags(&self, _matches: &ArgMatches, _config: &mut Config) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Directive names this configurer handles.
    fn known_directives(&self) -> &[&'static str] {
        &[]
    }

    /// Updates `config` for directory `rel`.
    ///
    /// `config` starts as a clone of the parent directory's configuration
    /// with the directory's own [`WalkConfig`](super::WalkConfig) already in
    /// place. The walker's directives are applied by the directory loader
    /// before any configurer runs, so changes made here through
    /// [`Config::walk_mut`] do not affect which children are enumerated.
    fn configure(&self, config: &mut Config, rel: &str, file: Option<&BuildFile>);
}

/// Configurer for the walker's own flag and directives.
///
/// Directive effects are resolved by the directory loader, which needs them
/// before a directory's contents can be classified, so
/// [`configure`](Configurer::configure) has nothing left to apply.
#[derive(Clone, Copy, Debug, Default)]
pub struct WalkConfigurer;

impl Configurer for WalkConfigurer {
    fn register_flags(&self, command: Command) -> Command {
        command.arg(
            Arg::new(EXCLUDE_FLAG)
                .long(EXCLUDE_FLAG)
                .value_name("PATTERN")
                .action(ArgAction::Append)
                .help("pattern that should be ignored (may be repeated)"),
        )
    }

    fn check_flags(&self, matches: &ArgMatches, config: &mut Config) -> Result<(), ConfigError> {
        let Ok(Some(patterns)) = matches.try_get_many::<String>(EXCLUDE_FLAG) else {
            return Ok(());
        };
        for pattern in patterns {
            config
                .walk_mut()
                .push_exclude(pattern)
                .map_err(ConfigError::InvalidExcludeFlag)?;
        }
        Ok(())
    }

    fn known_directives(&self) -> &[&'static str] {
        &WALK_DIRECTIVES
    }

    fn configure(&self, config: &mut Config, rel: &str, _file: Option<&BuildFile>) {
        trace_config!(
            "//{rel}: update_only={} ignore={}",
            config.walk().update_only(),
            config.walk().ignore()
        );
    }
}
