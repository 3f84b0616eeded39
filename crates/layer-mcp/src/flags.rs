use std::ffi::OsString;

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, CommandFactory, FromArgMatches, Parser};
use layer_core::{AuthFlag, ConfigFile, LayerEnvironment, Overrides};

/// Built-in options. Auth flags from the config are added at runtime.
#[derive(Parser, Debug)]
#[command(name = "layer-mcp", version, about = "Start an MCP server for the Layer API")]
pub struct Cli {
    /// Layer API key
    #[arg(long, env = "LAYER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
    /// Layer deployment: development, staging or production
    #[arg(long, env = "LAYER_ENVIRONMENT")]
    pub environment: Option<LayerEnvironment>,
    /// Override the API root URL
    #[arg(long, env = "LAYER_BASE_URL")]
    pub base_url: Option<String>,
    /// HTTP request timeout in seconds
    #[arg(long, default_value = "30", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,
}

/// Auth flags declared by the discovered config. A config that failed to
/// load contributes none, so `--help` and `--version` still work and the
/// load error is reported after parsing.
pub fn auth_flags_of(discovered: &layer_core::Result<ConfigFile>) -> &[AuthFlag] {
    match discovered {
        Ok(config) => config.auth_flags.as_slice(),
        Err(_) => &[],
    }
}

/// Parse `args` with one extra `--<name> <value>` option per auth flag.
///
/// Returns the built-in options and the override map built from the auth
/// flags that were actually given.
pub fn parse_args<I, T>(auth_flags: &[AuthFlag], args: I) -> Result<(Cli, Overrides), clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut command = Cli::command();

    for flag in auth_flags {
        let taken = matches!(flag.name.as_str(), "help" | "version")
            || command
                .get_arguments()
                .any(|a| a.get_id() == flag.name.as_str() || a.get_long() == Some(flag.name.as_str()));
        if taken {
            return Err(command.error(
                ErrorKind::ArgumentConflict,
                format!("auth flag '{}' collides with a built-in option", flag.name),
            ));
        }

        let mut arg = Arg::new(flag.name.clone())
            .long(flag.name.clone())
            .value_name("VALUE")
            .action(ArgAction::Set)
            .required(false);
        if let Some(description) = &flag.description {
            arg = arg.help(description.clone());
        }
        command = command.arg(arg);
    }

    let matches = command.try_get_matches_from(args)?;
    let cli = Cli::from_arg_matches(&matches)?;

    let overrides = auth_flags
        .iter()
        .filter_map(|flag| {
            matches
                .get_one::<String>(&flag.name)
                .map(|value| (flag.name.clone(), value.clone()))
        })
        .collect();

    Ok((cli, overrides))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flag(name: &str) -> AuthFlag {
        AuthFlag {
            name: name.to_string(),
            description: Some(format!("{name} for the upstream API")),
        }
    }

    #[test]
    fn supplied_auth_flags_become_overrides() {
        let flags = [flag("x-checkly-account"), flag("Authorization")];
        let (cli, overrides) = parse_args(
            &flags,
            ["layer-mcp", "--api-key", "k", "--x-checkly-account", "0123456789"],
        )
        .unwrap();

        assert_eq!(cli.api_key.as_deref(), Some("k"));
        assert_eq!(cli.timeout, 30);
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides["x-checkly-account"], "0123456789");
    }

    #[test]
    fn environment_is_parsed() {
        let (cli, overrides) =
            parse_args(&[], ["layer-mcp", "--environment", "staging", "--timeout", "5"]).unwrap();
        assert_eq!(cli.environment, Some(LayerEnvironment::Staging));
        assert_eq!(cli.timeout, 5);
        assert!(overrides.is_empty());

        assert!(parse_args(&[], ["layer-mcp", "--environment", "qa"]).is_err());
    }

    #[test]
    fn unknown_flags_are_rejected() {
        let err = parse_args(&[], ["layer-mcp", "--x-checkly-account", "1"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = parse_args(&[], ["layer-mcp", "--timeout", "0"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn broken_config_still_allows_help() {
        let discovered: layer_core::Result<ConfigFile> =
            Err(layer_core::LayerError::Config("bad config".into()));
        assert!(auth_flags_of(&discovered).is_empty());

        let err = parse_args(auth_flags_of(&discovered), ["layer-mcp", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        let err = parse_args(auth_flags_of(&discovered), ["layer-mcp", "--version"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
    }

    #[test]
    fn colliding_auth_flag_is_rejected() {
        for name in ["api-key", "timeout", "help"] {
            let err = parse_args(&[flag(name)], ["layer-mcp"]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
        }
    }
}
