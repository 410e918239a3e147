use clap::Parser;
use contact_normalizer::app::commands;
use contact_normalizer::config::{Command, ServiceCommand, UrlCommand};
use contact_normalizer::core::{ConfigProvider, Pipeline};
use contact_normalizer::utils::{logger, validation::Validate};
use contact_normalizer::{
    CliConfig, FixEngine, FixPipeline, HttpPhotoResolver, LocalStorage, Result, ServiceRegistry,
    TomlConfig,
};
use serde_json::{json, Value};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    match run(cli).await {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("❌ Failed to render output: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            tracing::error!(
                "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}

fn load_config(cli: &CliConfig) -> Result<TomlConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            TomlConfig::from_file(path)?
        }
        None => TomlConfig::default(),
    };

    if let Some(prefix) = &cli.country_prefix {
        config.normalizer.default_country_prefix = prefix.clone();
        tracing::debug!("Country prefix overridden to: {}", prefix);
    }

    config.validate()?;
    Ok(config)
}

async fn run(cli: CliConfig) -> Result<Value> {
    let mut config = load_config(&cli)?;
    let registry = ServiceRegistry::builtin();

    match cli.command {
        Command::Phone { raw } => Ok(commands::phone(&raw, config.default_country_prefix())),
        Command::Service(ServiceCommand::Show { name }) => {
            Ok(serde_json::to_value(commands::service_show(registry, &name)?)?)
        }
        Command::Service(ServiceCommand::List { native, photos }) => {
            Ok(serde_json::to_value(commands::service_list(registry, native, photos))?)
        }
        Command::Url(UrlCommand::Resolve { url }) => Ok(commands::url_resolve(registry, &url)),
        Command::Url(UrlCommand::Build { service, username }) => {
            commands::url_build(registry, &service, &username)
        }
        Command::Url(UrlCommand::Label { url }) => Ok(commands::url_label(registry, &url)),
        Command::Photo { url, fetch } => {
            let resolver = HttpPhotoResolver::new(config.photo_timeout())?;
            commands::photo(registry, &resolver, &url, fetch).await
        }
        Command::Repair {
            service,
            username,
            url,
        } => Ok(commands::repair(
            registry,
            config.repair_options(),
            service.as_deref(),
            username.as_deref(),
            url.as_deref(),
        )),
        Command::Fix {
            input,
            output,
            contact,
            dry_run,
        } => {
            if let Some(output) = output {
                config.load.output_path = output;
            }
            let pipeline =
                FixPipeline::new(LocalStorage::default(), config, input).with_contact(contact);

            if dry_run {
                tracing::info!("🔍 DRY RUN MODE - nothing will be written");
                let contacts = pipeline.extract().await?;
                let result = pipeline.transform(contacts).await?;
                return Ok(serde_json::to_value(&result.report)?);
            }

            let output_path = FixEngine::new(pipeline).run().await?;
            tracing::info!("✅ Fix completed successfully!");
            Ok(json!({ "outputPath": output_path }))
        }
        Command::Migrate {
            input,
            to,
            output,
            dry_run,
        } => {
            let output_dir = output.unwrap_or_else(|| config.load.output_path.clone());
            let reports = commands::migrate_file(
                &LocalStorage::default(),
                registry,
                &input,
                &output_dir,
                to,
                dry_run,
            )
            .await?;
            Ok(serde_json::to_value(reports)?)
        }
    }
}
