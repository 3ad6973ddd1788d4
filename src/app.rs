use std::{
    fs,
    io::{self, Write},
};

use anyhow::{anyhow, Context, Result};

use crate::{
    backend,
    cli::{Cli, Command},
    domain::{self, list_state::ListScreenState},
    infra::{
        self,
        storage_layout::StorageLayout,
        token_store::{FileTokenStore, TokenStore},
    },
    ui::{self, views},
    usecases::{
        self, bootstrap,
        context::AppContext,
        list_chats::{list_chats, ListChatsQuery},
        login::{run_login, RetryPolicy, StdTerminal},
        logout::logout,
        open_chat::ChatScreen,
        projects::{
            camera_stream, list_cameras, list_projects, list_sites, project_cover,
            project_details, ProjectsError,
        },
        send_message::{send_message, SendMessageCommand},
    },
};

pub fn run(cli: Cli) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let result = runtime.block_on(dispatch(cli));
    // The chat screen's stdin reader may still be parked in a blocking read.
    runtime.shutdown_background();
    result
}

async fn dispatch(cli: Cli) -> Result<()> {
    let command = cli.command_or_default();

    let context = match bootstrap::bootstrap(cli.config.as_deref()) {
        Ok(context) => context,
        Err(error) if matches!(command, Command::Logout) => {
            tracing::warn!(
                error = ?error,
                "logout fallback: bootstrap failed, clearing the default token file"
            );
            let layout = StorageLayout::resolve()?;
            let store = FileTokenStore::new(layout.token_file(), layout.token_lock_file());
            return print_logout(&store, &mut io::stdout());
        }
        Err(error) => return Err(error.into()),
    };

    tracing::debug!(
        ui = ui::module_name(),
        domain = domain::module_name(),
        backend = backend::module_name(),
        usecases = usecases::module_name(),
        infra = infra::module_name(),
        "module boundaries loaded"
    );

    execute(&context, command, &mut io::stdout()).await
}

/// Runs one command against a ready context, writing its output to `out`.
pub(crate) async fn execute(
    context: &AppContext,
    command: Command,
    out: &mut dyn Write,
) -> Result<()> {
    if matches!(command, Command::Logout) {
        return print_logout(context.tokens.as_ref(), out);
    }

    let api = context.api_client()?;

    match command {
        Command::Logout => {}
        Command::Login => {
            let mut terminal = StdTerminal;
            run_login(
                &mut terminal,
                &api,
                context.tokens.as_ref(),
                &RetryPolicy::default(),
            )
            .await?;
        }
        Command::Projects => {
            let mut state = ListScreenState::default();
            state.apply(list_projects(&api).await, ProjectsError::user_message);
            print_list(out, &state, "No projects yet.", views::projects_table)?;
        }
        Command::Project { id } => {
            let details = project_details(&api, &id)
                .await
                .map_err(|error| anyhow!(error.user_message()))?;
            print_lines(out, &views::project_details_lines(&details))?;
        }
        Command::Cameras { project } => {
            let mut state = ListScreenState::default();
            state.apply(
                list_cameras(&api, &project).await,
                ProjectsError::user_message,
            );
            print_list(out, &state, "No cameras in this project.", views::cameras_table)?;
        }
        Command::Play { project, camera } => {
            let camera = camera_stream(&api, &project, &camera)
                .await
                .map_err(|error| anyhow!(error.user_message()))?;

            if context.player.play(&camera.stream_url)? {
                writeln!(out, "Playing {}.", camera.name)?;
            } else {
                writeln!(out, "{}", camera.stream_url)?;
            }
        }
        Command::Sites { project } => {
            let mut state = ListScreenState::default();
            state.apply(
                list_sites(&api, project.as_deref()).await,
                ProjectsError::user_message,
            );
            print_list(out, &state, "No construction sites.", views::sites_table)?;
        }
        Command::Cover { project, out: path } => {
            let images = context.image_loader(&api);
            let image = project_cover(&api, &images, &project)
                .await
                .map_err(|error| anyhow!(error.user_message()))?;

            fs::write(&path, &image.bytes)
                .with_context(|| format!("failed to write cover to {}", path.display()))?;
            writeln!(
                out,
                "Saved cover to {} ({} bytes, {}).",
                path.display(),
                image.bytes.len(),
                image.content_type.as_deref().unwrap_or("unknown type")
            )?;
        }
        Command::Chats { project } => {
            let mut state = ListScreenState::default();
            state.apply(
                list_chats(&api, ListChatsQuery { project_id: project }).await,
                |error| error.user_message(),
            );
            print_list(out, &state, "No chats yet.", views::chats_table)?;
        }
        Command::Chat { id } => {
            let mut screen =
                ChatScreen::new(api, context.chat_channel(), context.chat_options());
            ui::chat_screen::run(&mut screen, &id).await?;
        }
        Command::Send { chat, text } => {
            let message = send_message(
                &api,
                SendMessageCommand {
                    chat_id: chat,
                    text,
                    from_specialist: context.chat_options().from_specialist,
                },
            )
            .await
            .map_err(|error| anyhow!(error.user_message()))?;
            writeln!(out, "Sent message {}.", message.id)?;
        }
    }

    Ok(())
}

/// Logout only touches local state, so it also runs when the config is broken.
fn print_logout(tokens: &dyn TokenStore, out: &mut dyn Write) -> Result<()> {
    let outcome = logout(tokens)?;
    tracing::info!(session_removed = outcome.session_removed, "logout completed");

    if outcome.session_removed {
        writeln!(out, "Signed out. Run `siteadmin login` to sign in again.")?;
    } else {
        writeln!(out, "No stored session. Run `siteadmin login` to sign in.")?;
    }
    Ok(())
}

fn print_list<T>(
    out: &mut dyn Write,
    state: &ListScreenState<T>,
    empty_text: &str,
    render: impl Fn(&[T]) -> Vec<String>,
) -> Result<()> {
    print_lines(out, &views::list_lines(state, empty_text, render))?;

    match state.error() {
        Some(error) => Err(anyhow!(error.to_owned())),
        None => Ok(()),
    }
}

fn print_lines(out: &mut dyn Write, lines: &[String]) -> Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}
