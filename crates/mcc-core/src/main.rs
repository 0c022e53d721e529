//! mcc - ml-container-creator CLI entry point.
//!
//! stdout carries the command payload; logs, warnings and errors go to stderr.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use mcc_common::{Error, OutputFormat};
use mcc_compat::{AcceleratorRequirement, EnvVarOptions, ValidationResult};
use mcc_config::{params, CliInputs, EnvSnapshot, Value, ValueMap};
use mcc_core::exit_codes::ExitCode;
use mcc_core::logging::{generate_run_id, init_logging, run_span, LogConfig, LogFormat, LogLevel};
use mcc_core::output;
use mcc_core::pipeline::{GenerateRequest, Pipeline};
use mcc_core::prompt::{DialoguerPrompter, NoPrompter, Prompter};
use mcc_core::schema;
use tracing::debug;

/// Resolve and validate ml-container-creator project parameters
#[derive(Parser, Debug)]
#[command(name = "mcc", author, version, about, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

#[derive(Args, Debug)]
struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Catalog of serving frameworks and instance profiles (replaces the built-in one)
    #[arg(long, global = true, env = "MCC_CATALOG", value_name = "PATH")]
    catalog: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    /// Log format on stderr (human, jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors and suppress warnings
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

impl GlobalOpts {
    fn cli_log_level(&self) -> Option<LogLevel> {
        if self.log_level.is_some() {
            return self.log_level;
        }
        if self.quiet {
            return Some(LogLevel::Error);
        }
        match self.verbose {
            0 => None,
            1 => Some(LogLevel::Info),
            2 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    }

    fn use_color(&self) -> bool {
        !self.no_color && std::io::stderr().is_terminal()
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve, check and finalize a project configuration
    Generate(GenerateArgs),
    /// Show resolved values and the source each came from
    Resolve(ResolveArgs),
    /// Check one accelerator requirement against one instance
    CheckCompat(CheckCompatArgs),
    /// List catalog instance types that satisfy an accelerator requirement
    #[command(disable_version_flag = true)]
    Recommend(RecommendArgs),
    /// Validate container environment variables for a model server
    ValidateEnv(ValidateEnvArgs),
    /// List the recognized parameters
    Params,
    /// Print JSON schemas for output types
    Schema(SchemaArgs),
}

/// One flag per parameter, named after the parameter's CLI flag.
#[derive(Args, Debug, Default)]
struct ParamArgs {
    /// Project name (same as --project-name, lower precedence)
    #[arg(value_name = "PROJECT_NAME")]
    project: Option<String>,

    #[arg(long)]
    project_name: Option<String>,

    /// Output directory
    #[arg(long)]
    project_dir: Option<String>,

    /// ML framework (sklearn, xgboost, tensorflow, transformers)
    #[arg(long)]
    framework: Option<String>,

    /// Serving stack (flask, fastapi, vllm, sglang, tensorrt-llm, lmi, djl)
    #[arg(long)]
    model_server: Option<String>,

    #[arg(long)]
    model_format: Option<String>,

    /// Hugging Face model identifier
    #[arg(long)]
    model_name: Option<String>,

    /// Bundle the sample model (--include-sample or --include-sample=false)
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    include_sample: Option<String>,

    /// Generate test scripts (--include-testing or --include-testing=false)
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    include_testing: Option<String>,

    /// Comma-separated test types
    #[arg(long)]
    test_types: Option<String>,

    /// sagemaker or codebuild
    #[arg(long)]
    deploy_target: Option<String>,

    #[arg(long)]
    codebuild_compute_type: Option<String>,

    #[arg(long)]
    codebuild_project_name: Option<String>,

    /// cpu-optimized, gpu-enabled or custom
    #[arg(long)]
    instance_type: Option<String>,

    /// Explicit instance type when --instance-type=custom
    #[arg(long)]
    custom_instance_type: Option<String>,

    #[arg(long)]
    region: Option<String>,

    /// IAM execution role ARN
    #[arg(long)]
    role_arn: Option<String>,

    /// Hugging Face token; `$NAME` reads the variable NAME
    #[arg(long)]
    hf_token: Option<String>,

    /// Never prompt
    #[arg(long)]
    skip_prompts: bool,

    /// External configuration document (JSON, YAML or TOML)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

impl ParamArgs {
    fn to_cli_inputs(&self) -> CliInputs {
        let flags = [
            (params::PROJECT_NAME, &self.project_name),
            (params::DESTINATION_DIR, &self.project_dir),
            (params::FRAMEWORK, &self.framework),
            (params::MODEL_SERVER, &self.model_server),
            (params::MODEL_FORMAT, &self.model_format),
            (params::MODEL_NAME, &self.model_name),
            (params::INCLUDE_SAMPLE_MODEL, &self.include_sample),
            (params::INCLUDE_TESTING, &self.include_testing),
            (params::TEST_TYPES, &self.test_types),
            (params::DEPLOY_TARGET, &self.deploy_target),
            (params::CODEBUILD_COMPUTE_TYPE, &self.codebuild_compute_type),
            (params::CODEBUILD_PROJECT_NAME, &self.codebuild_project_name),
            (params::INSTANCE_TYPE, &self.instance_type),
            (params::CUSTOM_INSTANCE_TYPE, &self.custom_instance_type),
            (params::AWS_REGION, &self.region),
            (params::AWS_ROLE_ARN, &self.role_arn),
            (params::HF_TOKEN, &self.hf_token),
        ];

        let mut options: ValueMap = flags
            .into_iter()
            .filter_map(|(name, value)| {
                value
                    .as_ref()
                    .map(|v| (name.to_string(), Value::String(v.clone())))
            })
            .collect();
        if self.skip_prompts {
            options.insert(params::SKIP_PROMPTS.to_string(), Value::Bool(true));
        }

        CliInputs {
            options,
            positional: self.project.clone(),
            config_path: self.config.clone(),
        }
    }
}

#[derive(Args, Debug, Default)]
struct EnvStrategyArgs {
    /// Skip the declared-flag checks (type, bounds, deprecation)
    #[arg(long)]
    no_known_flags: bool,

    /// Skip community report lookups
    #[arg(long)]
    no_community: bool,

    /// Enable the experimental introspection strategy
    #[arg(long)]
    introspection: bool,

    /// Disable environment-variable validation entirely
    #[arg(long = "disable", visible_alias = "no-env-validation")]
    disable: bool,
}

impl EnvStrategyArgs {
    fn options(&self) -> EnvVarOptions {
        EnvVarOptions {
            enabled: !self.disable,
            known_flags: !self.no_known_flags,
            community_reports: !self.no_community,
            introspection: self.introspection,
        }
    }
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    params: ParamArgs,

    /// Container environment variable to validate (repeatable)
    #[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    env: Vec<(String, String)>,

    #[command(flatten)]
    strategies: EnvStrategyArgs,

    /// Report accelerator incompatibility as a warning instead of failing
    #[arg(long)]
    ignore_compat: bool,

    /// Exit with code 2 when warnings were produced
    #[arg(long)]
    strict: bool,

    /// Seed for generated values
    #[arg(long, hide = true)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct ResolveArgs {
    #[command(flatten)]
    params: ParamArgs,

    /// Only show explicitly supplied values
    #[arg(long)]
    explicit: bool,
}

#[derive(Args, Debug)]
struct CheckCompatArgs {
    /// Required accelerator
    #[arg(
        long,
        value_name = "FAMILY:VERSION",
        value_parser = parse_requirement,
        required_unless_present = "server"
    )]
    framework_accel: Option<AcceleratorRequirement>,

    /// Take the requirement from a catalog model server
    #[arg(long, conflicts_with = "framework_accel")]
    server: Option<String>,

    /// Instance type or instance class
    #[arg(long)]
    instance: String,

    /// Instance type used when --instance=custom
    #[arg(long)]
    custom_instance_type: Option<String>,

    /// Exit with code 2 when the result carries a warning
    #[arg(long)]
    strict: bool,
}

#[derive(Args, Debug)]
struct RecommendArgs {
    /// Accelerator family (cuda, neuron, rocm, cpu)
    #[arg(long, required_unless_present = "server", requires = "version")]
    family: Option<String>,

    /// Minimum accelerator version
    #[arg(long)]
    version: Option<String>,

    /// Take the requirement from a catalog model server
    #[arg(long, conflicts_with = "family")]
    server: Option<String>,
}

#[derive(Args, Debug)]
struct ValidateEnvArgs {
    /// Model server whose declared flags apply
    #[arg(long)]
    server: Option<String>,

    /// Variable to validate (repeatable)
    #[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    env: Vec<(String, String)>,

    #[command(flatten)]
    strategies: EnvStrategyArgs,

    /// Exit with code 2 when warnings were produced
    #[arg(long)]
    strict: bool,
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Type to print
    name: Option<String>,

    /// List available types
    #[arg(long, conflicts_with_all = ["name", "all"])]
    list: bool,

    /// Print every schema keyed by type name
    #[arg(long, conflicts_with = "name")]
    all: bool,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty variable name in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

fn parse_requirement(s: &str) -> Result<AcceleratorRequirement, String> {
    match s.split_once(':') {
        Some((family, version)) if !family.trim().is_empty() && !version.trim().is_empty() => {
            Ok(AcceleratorRequirement::new(family.trim(), version.trim()))
        }
        _ => Err(format!("expected FAMILY:VERSION (e.g. cuda:12.1), got '{}'", s)),
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if !err.use_stderr() {
                err.exit();
            }
            let _ = err.print();
            std::process::exit(ExitCode::ArgsError.as_i32());
        }
    };

    let log_config = LogConfig::from_env(cli.global.cli_log_level(), cli.global.log_format);
    init_logging(&log_config);

    let run_id = generate_run_id();
    let span = run_span(&run_id, command_name(&cli.command));
    let _guard = span.enter();

    let exit_code = match &cli.command {
        Commands::Generate(args) => run_generate(&cli.global, args, &run_id),
        Commands::Resolve(args) => run_resolve(&cli.global, args),
        Commands::CheckCompat(args) => run_check_compat(&cli.global, args),
        Commands::Recommend(args) => run_recommend(&cli.global, args),
        Commands::ValidateEnv(args) => run_validate_env(&cli.global, args),
        Commands::Params => run_params(&cli.global),
        Commands::Schema(args) => run_schema(&cli.global, args),
    };

    debug!(exit_code = exit_code.as_i32(), "done");
    std::process::exit(exit_code.as_i32());
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Generate(_) => "generate",
        Commands::Resolve(_) => "resolve",
        Commands::CheckCompat(_) => "check-compat",
        Commands::Recommend(_) => "recommend",
        Commands::ValidateEnv(_) => "validate-env",
        Commands::Params => "params",
        Commands::Schema(_) => "schema",
    }
}

/// Print an error to stderr and map it to an exit code.
fn fail(global: &GlobalOpts, err: &Error) -> ExitCode {
    eprintln!("{}", output::render_error(err, global.format, global.use_color()));
    ExitCode::from(err)
}

/// Print a rendered payload, or fail if rendering did.
fn emit(global: &GlobalOpts, rendered: Result<String, Error>, code: ExitCode) -> ExitCode {
    match rendered {
        Ok(text) => {
            println!("{}", text);
            code
        }
        Err(err) => fail(global, &err),
    }
}

fn warn_stderr(global: &GlobalOpts, message: &str) {
    if !global.quiet {
        eprintln!("warning: {}", message);
    }
}

fn load_pipeline(global: &GlobalOpts) -> Result<Pipeline, Error> {
    Pipeline::load(global.catalog.as_deref())
}

fn run_generate(global: &GlobalOpts, args: &GenerateArgs, run_id: &str) -> ExitCode {
    let pipeline = match load_pipeline(global) {
        Ok(p) => p,
        Err(e) => return fail(global, &e),
    };
    let pipeline = match args.seed {
        Some(seed) => pipeline.with_seed(seed),
        None => pipeline,
    };
    let working_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => return fail(global, &Error::Io(e)),
    };

    let request = GenerateRequest {
        cli: args.params.to_cli_inputs(),
        working_dir,
        env: EnvSnapshot::from_process(),
        env_overrides: args.env.iter().cloned().collect(),
        env_options: args.strategies.options(),
        ignore_compat: args.ignore_compat,
        run_id: Some(run_id.to_string()),
    };

    let interactive = !args.params.skip_prompts
        && std::io::stdin().is_terminal()
        && std::io::stderr().is_terminal();
    let mut prompter: Box<dyn Prompter> = if interactive {
        Box::new(DialoguerPrompter::new())
    } else {
        Box::new(NoPrompter)
    };

    let report = match pipeline.generate(&request, prompter.as_mut()) {
        Ok(report) => report,
        Err(e) => return fail(global, &e),
    };

    for warning in &report.warnings {
        warn_stderr(global, warning);
    }
    if let Some(env) = &report.environment {
        for finding in &env.warnings {
            warn_stderr(global, &finding.message);
        }
    }

    let code = if args.strict && report.has_soft_findings() {
        ExitCode::SoftFindings
    } else {
        ExitCode::Clean
    };
    let shown = report.redacted(pipeline.matrix());
    emit(global, output::render_generate(&shown, global.format), code)
}

fn run_resolve(global: &GlobalOpts, args: &ResolveArgs) -> ExitCode {
    let pipeline = match load_pipeline(global) {
        Ok(p) => p,
        Err(e) => return fail(global, &e),
    };
    let working_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => return fail(global, &Error::Io(e)),
    };

    let cli = args.params.to_cli_inputs();
    let env = EnvSnapshot::from_process();
    let (raw, resolved) = match pipeline.resolve(&cli, &working_dir, &env) {
        Ok(pair) => pair,
        Err(e) => return fail(global, &e),
    };

    let report = pipeline.resolve_report(&raw, &resolved, args.explicit);
    emit(global, output::render_resolve(&report, global.format), ExitCode::Clean)
}

fn run_check_compat(global: &GlobalOpts, args: &CheckCompatArgs) -> ExitCode {
    let pipeline = match load_pipeline(global) {
        Ok(p) => p,
        Err(e) => return fail(global, &e),
    };

    let requirement = match (&args.framework_accel, &args.server) {
        (Some(requirement), _) => requirement.clone(),
        (None, Some(server)) => {
            let Some(profile) = pipeline.catalog().framework(server) else {
                return fail(
                    global,
                    &Error::Config(format!("model server '{}' is not in the catalog", server)),
                );
            };
            match &profile.accelerator {
                Some(requirement) => requirement.clone(),
                None => {
                    let result = ValidationResult::info(format!(
                        "{} has no accelerator requirement",
                        server
                    ));
                    return emit(global, output::render_validation(&result, global.format), ExitCode::Clean);
                }
            }
        }
        (None, None) => {
            return fail(
                global,
                &Error::Config("either --framework-accel or --server is required".to_string()),
            )
        }
    };

    let Some(instance) = pipeline
        .catalog()
        .instance_for(&args.instance, args.custom_instance_type.as_deref())
    else {
        let shown = args.custom_instance_type.as_deref().unwrap_or(&args.instance);
        return fail(
            global,
            &Error::Config(format!("instance type '{}' is not in the catalog", shown)),
        );
    };

    let result = pipeline
        .compat_validator()
        .check_compatibility(&requirement, &instance.accelerator);
    let code = if !result.compatible {
        ExitCode::CompatError
    } else if args.strict && result.warning.is_some() {
        ExitCode::SoftFindings
    } else {
        ExitCode::Clean
    };
    emit(global, output::render_validation(&result, global.format), code)
}

fn run_recommend(global: &GlobalOpts, args: &RecommendArgs) -> ExitCode {
    let pipeline = match load_pipeline(global) {
        Ok(p) => p,
        Err(e) => return fail(global, &e),
    };

    let requirement = match (&args.family, &args.version, &args.server) {
        (Some(family), Some(version), _) => AcceleratorRequirement::new(family.as_str(), version.as_str()),
        (_, _, Some(server)) => match pipeline
            .catalog()
            .framework(server)
            .and_then(|fw| fw.accelerator.clone())
        {
            Some(requirement) => requirement,
            None => {
                return fail(
                    global,
                    &Error::Config(format!(
                        "model server '{}' is not in the catalog or declares no accelerator",
                        server
                    )),
                )
            }
        },
        _ => {
            return fail(
                global,
                &Error::Config("--family and --version, or --server, are required".to_string()),
            )
        }
    };

    let recommendations = pipeline.recommend(&requirement);
    emit(
        global,
        output::render_recommendations(&requirement, &recommendations, global.format),
        ExitCode::Clean,
    )
}

fn run_validate_env(global: &GlobalOpts, args: &ValidateEnvArgs) -> ExitCode {
    let pipeline = match load_pipeline(global) {
        Ok(p) => p,
        Err(e) => return fail(global, &e),
    };
    if let Some(server) = &args.server {
        if pipeline.catalog().framework(server).is_none() {
            warn_stderr(
                global,
                &format!("model server '{}' is not in the catalog; only community reports apply", server),
            );
        }
    }

    let env = args.env.iter().cloned().collect();
    let result = pipeline.validate_env(args.server.as_deref(), &env, &args.strategies.options());
    let code = if !result.errors.is_empty() {
        ExitCode::Violations
    } else if args.strict && !result.warnings.is_empty() {
        ExitCode::SoftFindings
    } else {
        ExitCode::Clean
    };
    emit(global, output::render_env(&result, global.format), code)
}

fn run_params(global: &GlobalOpts) -> ExitCode {
    let info = mcc_config::ParameterMatrix::builtin().info();
    emit(global, output::render_params(&info, global.format), ExitCode::Clean)
}

fn run_schema(global: &GlobalOpts, args: &SchemaArgs) -> ExitCode {
    if args.all {
        let rendered = schema::generate_all_schemas()
            .and_then(|all| serde_json::to_string_pretty(&all).map_err(Error::from));
        return emit(global, rendered, ExitCode::Clean);
    }

    match (&args.name, args.list) {
        (Some(name), false) => match schema::generate_schema(name) {
            Some(schema) => {
                let rendered =
                    schema.and_then(|s| serde_json::to_string_pretty(&s).map_err(Error::from));
                emit(global, rendered, ExitCode::Clean)
            }
            None => fail(
                global,
                &Error::Config(format!(
                    "unknown schema type '{}'; run 'mcc schema --list'",
                    name
                )),
            ),
        },
        _ => {
            let available = schema::available_schemas();
            let rendered = match global.format {
                OutputFormat::Json => {
                    let list: Vec<_> = available
                        .iter()
                        .map(|(name, description)| {
                            serde_json::json!({ "name": name, "description": description })
                        })
                        .collect();
                    serde_json::to_string_pretty(&list).map_err(Error::from)
                }
                _ => Ok(available
                    .iter()
                    .map(|(name, description)| format!("{:<24} {}", name, description))
                    .collect::<Vec<_>>()
                    .join("\n")),
            };
            emit(global, rendered, ExitCode::Clean)
        }
    }
}
