use flashcards_client::application_port::*;
use flashcards_client::client::*;
use flashcards_client::domain_model::*;
use flashcards_client::logger::*;
use flashcards_client::settings::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logger = Logger::new_bootstrap();

    let project_settings = parse_settings(cli.settings.as_deref())?;
    debug!(?project_settings);
    let logger_config = LogConfig {
        filter: project_settings.log.filter.clone(),
    };
    logger.reload_from_config(&logger_config)?;

    let client = Client::try_new(&project_settings)?;

    let mut events = client.session_events();
    let result = run(&client, cli.command).await;

    // events are published before the call that caused them returns
    while let Ok(event) = events.try_recv() {
        match event {
            SessionEvent::Started { user_id } => info!(%user_id, "signed in"),
            SessionEvent::Terminated {
                reason: TerminationReason::AuthFailure(reason),
            } => warn!(%reason, "session expired, run `flashcards login` to sign in again"),
            SessionEvent::Terminated { .. } => info!("signed out"),
        }
    }

    result
}

async fn run(client: &Client, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login { email, password } => {
            let user = client
                .auth_service
                .login(LoginInput { email, password })
                .await?;
            print_json(&serde_json::to_value(&user)?)
        }
        Command::Register {
            email,
            password,
            first_name,
            last_name,
        } => {
            let user = client
                .auth_service
                .register(RegisterInput {
                    email,
                    password,
                    first_name,
                    last_name,
                })
                .await?;
            print_json(&serde_json::to_value(&user)?)
        }
        Command::Logout => Ok(client.auth_service.logout().await?),
        Command::Whoami => {
            match client.auth_service.current_user_id().await {
                Some(user_id) => println!("{}", user_id),
                None => println!("not signed in"),
            }
            Ok(())
        }
        Command::Get { path } => send(client, ApiRequest::get(client.api_path(&path))).await,
        Command::Delete { path } => send(client, ApiRequest::delete(client.api_path(&path))).await,
        Command::Post { path, body } => {
            send(client, ApiRequest::post(client.api_path(&path), serde_json::from_str(&body)?)).await
        }
        Command::Put { path, body } => {
            send(client, ApiRequest::put(client.api_path(&path), serde_json::from_str(&body)?)).await
        }
        Command::Patch { path, body } => {
            send(client, ApiRequest::patch(client.api_path(&path), serde_json::from_str(&body)?)).await
        }
    }
}

async fn send(client: &Client, request: ApiRequest) -> anyhow::Result<()> {
    let response = match client.pipeline.send(request).await {
        Ok(response) => response,
        Err(PipelineError::Status(response)) => {
            let message = response
                .error_message()
                .unwrap_or_else(|| String::from_utf8_lossy(&response.body).into_owned());
            return Err(anyhow::anyhow!("{}: {}", response.status, message));
        }
        Err(e) => return Err(e.into()),
    };

    match response.json::<serde_json::Value>() {
        Ok(value) => print_json(&value),
        Err(_) => {
            println!("{}", String::from_utf8_lossy(&response.body));
            Ok(())
        }
    }
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
