use clap::Parser;
use token_login::config::OutputFormat;
use token_login::utils::error::{ErrorSeverity, LoginError};
use token_login::utils::{logger, validation::Validate};
use token_login::{
    CliConfig, ConfigProvider, FormInterceptor, HttpCredentialExchanger, LoginConfig,
    MemoryDocument, MemoryForm, SubmitEvent, TokenResponse,
};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(exit_code(&e));
        }
    };

    logger::init_cli_logger(
        config.logging.verbose.unwrap_or(false),
        config.logging.level.as_deref(),
        config.logging.format.unwrap_or_default(),
    );
    tracing::debug!("CLI config: {:?}", cli);

    match run(&cli, &config).await {
        Ok(token) => {
            if let Err(e) = print_token(&token, cli.output) {
                report_failure(&e);
            }
        }
        Err(e) => report_failure(&e),
    }
}

async fn run(cli: &CliConfig, config: &LoginConfig) -> Result<TokenResponse, LoginError> {
    config.validate()?;

    let exchanger = HttpCredentialExchanger::from_config(config)?;
    tracing::info!("Logging in via {}", exchanger.token_url());

    // The terminal plays the part of the login form.
    let mut form = MemoryForm::new(config.form_id());
    if let Some(username) = &cli.username {
        form = form.with_field(config.username_field(), username.clone());
    }
    if let Some(password) = &cli.password {
        form = form.with_field(config.password_field(), password.clone());
    }
    let document = MemoryDocument::new().with_form(form);

    let interceptor = FormInterceptor::attach_with_config(&document, config, exchanger)
        .ok_or_else(|| LoginError::FormNotFound {
            form_id: config.form_id().to_string(),
        })?;

    let mut event = SubmitEvent::new();
    let outcome = interceptor
        .handle_submit(&mut event)
        .await
        .into_result()
        .ok_or_else(|| LoginError::SubmitInProgress {
            form_id: interceptor.form_id().to_string(),
        })?;
    Ok(outcome?)
}

fn print_token(token: &TokenResponse, output: OutputFormat) -> Result<(), LoginError> {
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(token)?),
        OutputFormat::Text => {
            println!("access: {}", token.access);
            if let Some(refresh) = &token.refresh {
                println!("refresh: {}", refresh);
            }
        }
    }
    Ok(())
}

fn report_failure(e: &LoginError) -> ! {
    tracing::error!(
        "❌ Login failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(exit_code(e));
}

fn exit_code(e: &LoginError) -> i32 {
    match e.severity() {
        ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    }
}
