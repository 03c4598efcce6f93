use std::fs;
use std::io;
use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use lms_client::models::{CreateCommunityRequest, CreatePostRequest, UpdateCommunityRequest};
use lms_client::{DEFAULT_PAGE_LIMIT, LmsClient, LmsClientError};
use lms_core::membership::Membership;
use lms_core::transcript::Transcript;
use tracing::debug;

mod logging;
mod output;
mod settings;

use settings::{Settings, non_blank, parse_token_content};

const TOKEN_FILE: &str = ".lms_token";

#[derive(Debug, Parser)]
#[command(name = "lms-cli", version, about = "CLI клиент для LMS API")]
struct Cli {
    /// Адрес API (по умолчанию `LMS_API_URL` или http://127.0.0.1:8000).
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Сохраняет токен доступа в `.lms_token` и показывает пользователя.
    Login {
        #[arg(long)]
        token: String,
    },
    /// Удаляет сохранённый токен.
    Logout,
    /// Текущий пользователь.
    Whoami,
    /// Чат с ассистентом.
    Chat {
        #[command(subcommand)]
        command: ChatCommand,
    },
    /// Сообщества.
    Community {
        #[command(subcommand)]
        command: CommunityCommand,
    },
    /// Посты и комментарии.
    Post {
        #[command(subcommand)]
        command: PostCommand,
    },
    /// Аналитика преподавателя.
    Instructor {
        #[command(subcommand)]
        command: InstructorCommand,
    },
}

#[derive(Debug, Subcommand)]
enum ChatCommand {
    /// Список сессий.
    List,
    /// Новая сессия.
    New,
    /// Сессия с сообщениями.
    Show {
        #[arg(long)]
        id: i64,
    },
    /// Отправка сообщения и ответ ассистента.
    Send {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        message: String,
    },
    /// Переименование сессии.
    Rename {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        title: String,
    },
    /// Удаление сессии.
    Delete {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
enum CommunityCommand {
    /// Список сообществ.
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Создание сообщества.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        private: bool,
    },
    /// Сообщество по id.
    Show {
        #[arg(long)]
        id: i64,
    },
    /// Вступление.
    Join {
        #[arg(long)]
        id: i64,
    },
    /// Выход.
    Leave {
        #[arg(long)]
        id: i64,
    },
    /// Частичное обновление (администратор или создатель).
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        private: Option<bool>,
    },
    /// Удаление (администратор или создатель).
    Delete {
        #[arg(long)]
        id: i64,
    },
    /// Посты сообщества.
    Posts {
        #[arg(long)]
        id: i64,
        #[arg(long, default_value_t = 0)]
        skip: u32,
        #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT)]
        limit: u32,
    },
}

#[derive(Debug, Subcommand)]
enum PostCommand {
    /// Новый пост в сообществе.
    Create {
        #[arg(long)]
        community: i64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        media_url: Option<String>,
    },
    /// Пост по id.
    Show {
        #[arg(long)]
        id: i64,
    },
    /// Переключение лайка.
    Like {
        #[arg(long)]
        id: i64,
    },
    /// Комментарии поста.
    Comments {
        #[arg(long)]
        id: i64,
    },
    /// Новый комментарий.
    Comment {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        content: String,
    },
}

#[derive(Debug, Subcommand)]
enum InstructorCommand {
    /// Сводка: курсы, студенты, выручка, ближайшие занятия.
    Dashboard,
    /// Успеваемость по курсам и анализ отзывов.
    Performance,
    /// Обзор курса.
    Course {
        #[arg(long)]
        id: i64,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Ошибка: {err:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let settings = Settings::from_env(cli.server)?;
    logging::init_logging(&settings.log_level)?;
    debug!(api_url = %settings.api_url, "starting");

    let mut client = LmsClient::with_timeout(&settings.api_url, settings.http_timeout)
        .map_err(map_client_error)?;

    let token = match settings.token {
        Some(token) => Some(token),
        None => load_token().context("не удалось прочитать .lms_token")?,
    };
    if let Some(token) = token {
        client.set_token(token);
    }

    match cli.command {
        Command::Login { token } => {
            let token =
                parse_token_content(&token).context("токен не должен быть пустым")?;
            client.set_token(token);
            let user = client.current_user().await.map_err(map_client_error)?;
            persist_token(&client).context("не удалось сохранить токен")?;
            println!("Вход выполнен");
            output::print_user(&user);
        }
        Command::Logout => {
            remove_token().context("не удалось удалить .lms_token")?;
            println!("Токен удалён");
        }
        Command::Whoami => {
            let user = client.current_user().await.map_err(map_client_error)?;
            output::print_user(&user);
        }
        Command::Chat { command } => run_chat(&client, command).await?,
        Command::Community { command } => run_community(&client, command).await?,
        Command::Post { command } => run_post(&client, command).await?,
        Command::Instructor { command } => run_instructor(&client, command).await?,
    }

    Ok(())
}

async fn run_chat(client: &LmsClient, command: ChatCommand) -> Result<()> {
    match command {
        ChatCommand::List => {
            let sessions = client.list_sessions().await.map_err(map_client_error)?;
            output::print_sessions(&sessions);
        }
        ChatCommand::New => {
            let session = client.create_session().await.map_err(map_client_error)?;
            output::print_session("Сессия создана", &session);
        }
        ChatCommand::Show { id } => {
            let session = client.get_session(id).await.map_err(map_client_error)?;
            output::print_session("Сессия", &session);
        }
        ChatCommand::Send { id, message } => {
            let session = client.get_session(id).await.map_err(map_client_error)?;
            let first_message = session.messages.is_empty();
            let mut transcript = Transcript::from_session(&session);
            let provisional = transcript.push_provisional(&message, Utc::now());

            let reply = client
                .send_message(id, &message)
                .await
                .map_err(map_client_error)?;
            transcript.confirm(provisional, reply)?;
            for entry in transcript.entries().iter().rev().take(2).rev() {
                output::print_entry(entry);
            }

            // Заголовок сессии сервер выставляет после первого сообщения.
            if first_message {
                let sessions = client.list_sessions().await.map_err(map_client_error)?;
                if let Some(updated) = sessions.iter().find(|s| s.id == id) {
                    println!("Заголовок сессии: {}", updated.display_title());
                }
            }
        }
        ChatCommand::Rename { id, title } => {
            let title = non_blank(&title).context("заголовок не должен быть пустым")?;
            let session = client
                .rename_session(id, &title)
                .await
                .map_err(map_client_error)?;
            println!("Сессия переименована: [{}] {}", session.id, session.display_title());
        }
        ChatCommand::Delete { id } => {
            client.delete_session(id).await.map_err(map_client_error)?;
            println!("Сессия удалена: id={id}");
        }
    }
    Ok(())
}

async fn run_community(client: &LmsClient, command: CommunityCommand) -> Result<()> {
    match command {
        CommunityCommand::List { search } => {
            let search = search.as_deref().map(str::trim).filter(|s| !s.is_empty());
            let communities = client
                .list_communities(search)
                .await
                .map_err(map_client_error)?;
            output::print_communities(&communities);
        }
        CommunityCommand::Create {
            name,
            description,
            private,
        } => {
            let payload = CreateCommunityRequest {
                name,
                description,
                is_private: Some(private),
            };
            let community = client
                .create_community(&payload)
                .await
                .map_err(map_client_error)?;
            output::print_community("Сообщество создано", &community);
        }
        CommunityCommand::Show { id } => {
            let community = client.get_community(id).await.map_err(map_client_error)?;
            output::print_community("Сообщество", &community);
        }
        CommunityCommand::Join { id } => match client.join_community(id).await {
            Ok(()) => println!("Joined community successfully"),
            Err(err) => report_membership(Membership::Unknown.after_join_failure(message_of(&err)), err)?,
        },
        CommunityCommand::Leave { id } => match client.leave_community(id).await {
            Ok(()) => println!("Left community successfully"),
            Err(err) => report_membership(Membership::Unknown.after_leave_failure(message_of(&err)), err)?,
        },
        CommunityCommand::Update {
            id,
            name,
            description,
            private,
        } => {
            let payload = UpdateCommunityRequest {
                name,
                description,
                is_private: private,
            };
            let community = client
                .update_community(id, &payload)
                .await
                .map_err(map_client_error)?;
            output::print_community("Сообщество обновлено", &community);
        }
        CommunityCommand::Delete { id } => {
            client.delete_community(id).await.map_err(map_client_error)?;
            println!("Сообщество удалено: id={id}");
        }
        CommunityCommand::Posts { id, skip, limit } => {
            match client.list_community_posts(id, skip, limit).await {
                Ok(posts) if posts.is_empty() => println!("No posts yet"),
                Ok(posts) => posts.iter().for_each(output::print_post),
                Err(LmsClientError::Unauthorized) => {
                    println!("Посты доступны только участникам сообщества")
                }
                Err(err) => return Err(map_client_error(err)),
            }
        }
    }
    Ok(())
}

async fn run_post(client: &LmsClient, command: PostCommand) -> Result<()> {
    match command {
        PostCommand::Create {
            community,
            title,
            content,
            media_url,
        } => {
            let payload = CreatePostRequest {
                community_id: community,
                title,
                content,
                media_url,
            };
            let post = client.create_post(&payload).await.map_err(map_client_error)?;
            println!("Пост создан");
            output::print_post(&post);
        }
        PostCommand::Show { id } => {
            let post = client.get_post(id).await.map_err(map_client_error)?;
            output::print_post(&post);
        }
        PostCommand::Like { id } => {
            let mut post = client.get_post(id).await.map_err(map_client_error)?;
            let response = client.like_post(id).await.map_err(map_client_error)?;
            post.apply_like(&response);
            output::print_post(&post);
        }
        PostCommand::Comments { id } => {
            let comments = client.list_comments(id).await.map_err(map_client_error)?;
            output::print_comments(&comments);
        }
        PostCommand::Comment { id, content } => {
            let content = non_blank(&content).context("комментарий не должен быть пустым")?;
            let comment = client
                .create_comment(id, &content)
                .await
                .map_err(map_client_error)?;
            println!("Комментарий добавлен: id={}", comment.id);
        }
    }
    Ok(())
}

async fn run_instructor(client: &LmsClient, command: InstructorCommand) -> Result<()> {
    match command {
        InstructorCommand::Dashboard => {
            let dashboard = client
                .instructor_dashboard()
                .await
                .map_err(map_client_error)?;
            output::print_dashboard(&dashboard);
        }
        InstructorCommand::Performance => {
            let performance = client
                .instructor_performance()
                .await
                .map_err(map_client_error)?;
            output::print_performance(&performance);
        }
        InstructorCommand::Course { id } => {
            let overview = client.course_overview(id).await.map_err(map_client_error)?;
            output::print_course_overview(&overview);
        }
    }
    Ok(())
}

fn message_of(err: &LmsClientError) -> &str {
    err.server_message().unwrap_or_default()
}

/// Отказ сервера, который сам говорит о членстве, не считается ошибкой.
fn report_membership(resolved: Membership, err: LmsClientError) -> Result<()> {
    if resolved == Membership::Unknown {
        return Err(map_client_error(err));
    }
    println!("{}", resolved.label());
    Ok(())
}

fn load_token() -> io::Result<Option<String>> {
    if !Path::new(TOKEN_FILE).exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(TOKEN_FILE)?;
    Ok(parse_token_content(&raw))
}

fn persist_token(client: &LmsClient) -> io::Result<()> {
    if let Some(token) = client.get_token() {
        fs::write(TOKEN_FILE, token)?;
    }
    Ok(())
}

fn remove_token() -> io::Result<()> {
    if Path::new(TOKEN_FILE).exists() {
        fs::remove_file(TOKEN_FILE)?;
    }
    Ok(())
}

fn map_client_error(err: LmsClientError) -> anyhow::Error {
    let message = match err {
        LmsClientError::Unauthorized => {
            "требуется авторизация: выполните `lms-cli login --token ...` или проверьте права"
                .to_string()
        }
        LmsClientError::NotFound => "ресурс не найден".to_string(),
        LmsClientError::InvalidRequest(message) => format!("некорректный запрос: {message}"),
        LmsClientError::Http(err) => format!("ошибка HTTP: {err}"),
    };
    anyhow::anyhow!(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_nested_chat_command() {
        let cli = Cli::try_parse_from(["lms-cli", "chat", "rename", "--id", "5", "--title", "Algebra help"])
            .expect("valid args");
        match cli.command {
            Command::Chat {
                command: ChatCommand::Rename { id, title },
            } => {
                assert_eq!(id, 5);
                assert_eq!(title, "Algebra help");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn community_posts_default_page() {
        let cli = Cli::try_parse_from(["lms-cli", "community", "posts", "--id", "3"])
            .expect("valid args");
        match cli.command {
            Command::Community {
                command: CommunityCommand::Posts { id, skip, limit },
            } => {
                assert_eq!((id, skip, limit), (3, 0, DEFAULT_PAGE_LIMIT));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_server_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["lms-cli", "chat", "list", "--server", "localhost:9000"])
            .expect("valid args");
        assert_eq!(cli.server.as_deref(), Some("localhost:9000"));
    }

    #[test]
    fn already_member_is_reported_not_failed() {
        let err = LmsClientError::InvalidRequest("Already a member".to_string());
        let resolved = Membership::Unknown.after_join_failure(message_of(&err));
        assert!(report_membership(resolved, err).is_ok());
    }

    #[test]
    fn unrelated_join_failure_is_an_error() {
        let err = LmsClientError::InvalidRequest("Community is archived".to_string());
        let resolved = Membership::Unknown.after_join_failure(message_of(&err));
        assert!(report_membership(resolved, err).is_err());
    }

    #[test]
    fn map_client_error_mentions_login() {
        let err = map_client_error(LmsClientError::Unauthorized);
        assert!(err.to_string().contains("login"));
    }
}
