//! CLI commands

use anyhow::{Context as _, Result, anyhow, bail};
use clap::{Args, Subcommand};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use stockroom_core::{
    DASHBOARD_ROUTE, Navigation, NavigationGuard, SIGNIN_ROUTE, SIGNUP_ROUTE, SessionStore,
};
use stockroom_http::{ClientError, Credentials, ListParams, Payload, StockMovement, StockroomClient};
use tracing::{info, warn};

/// Everything a command needs: the API client, the guard and the session
/// they share
pub struct Context {
    pub client: StockroomClient,
    pub guard: NavigationGuard,
    pub session: Arc<SessionStore>,
}

impl Context {
    pub fn new(client: StockroomClient) -> Self {
        let session = client.session().clone();
        Self {
            guard: NavigationGuard::new(session.clone()),
            client,
            session,
        }
    }

    /// Navigate to the route backing a command, refusing if the guard
    /// redirects elsewhere
    fn enter(&self, route: &str) -> Result<()> {
        match self.guard.navigate(route)? {
            Navigation::Allow => Ok(()),
            Navigation::Redirect(SIGNIN_ROUTE) => {
                bail!("Not signed in; run `stockroom signin` first")
            }
            Navigation::Redirect(DASHBOARD_ROUTE) => {
                bail!("Already signed in; run `stockroom logout` first")
            }
            Navigation::Redirect(other) => bail!("Redirected to {other}"),
        }
    }

    /// Await an authenticated call, signing out if the backend rejects the
    /// token
    async fn call<F>(&self, request: F) -> Result<Payload>
    where
        F: Future<Output = Result<Payload, ClientError>>,
    {
        match request.await {
            Ok(payload) => Ok(payload),
            Err(e) if e.is_auth_failure() => {
                warn!("Backend rejected the stored token, signing out");
                if let Err(clear_err) = self.session.clear() {
                    warn!("Failed to clear session: {clear_err}");
                }
                Err(anyhow!(e).context("Session is no longer valid; sign in again"))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the issued token
    Signin {
        #[arg(long)]
        email: String,

        #[arg(long, env = "STOCKROOM_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Register a new user and company
    Signup {
        /// Sign-up form as JSON
        #[arg(long)]
        data: String,
    },

    /// Sign out and forget the stored token
    Logout,

    /// Show whether a session is active
    Status,

    /// Manage sessions
    Sessions {
        #[command(subcommand)]
        command: SessionCommands,
    },

    /// Manage inventory items and stock
    Inventory {
        #[command(subcommand)]
        command: InventoryCommands,
    },

    /// Manage users
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },
}

/// Paging and search flags shared by list commands
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    #[arg(long)]
    pub page: Option<u32>,

    #[arg(long)]
    pub limit: Option<u32>,

    #[arg(long)]
    pub search: Option<String>,

    #[arg(long)]
    pub filter: Option<String>,
}

impl From<ListArgs> for ListParams {
    fn from(args: ListArgs) -> Self {
        Self {
            page: args.page,
            limit: args.limit,
            search: args.search,
            filter: args.filter,
        }
    }
}

/// Stock movement flags
#[derive(Args, Debug, Clone)]
pub struct MovementArgs {
    /// Inventory item id
    pub id: String,

    #[arg(long)]
    pub quantity: i64,

    /// Free-text note stored with the movement
    #[arg(long)]
    pub obs: Option<String>,
}

impl MovementArgs {
    fn into_parts(self) -> (String, StockMovement) {
        (
            self.id,
            StockMovement {
                quantity: self.quantity,
                obs: self.obs,
            },
        )
    }
}

#[derive(Subcommand)]
pub enum SessionCommands {
    /// List sessions
    List(ListArgs),
    /// Create a session from JSON
    Create {
        #[arg(long)]
        data: String,
    },
    /// Delete a session
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum InventoryCommands {
    /// List inventory items
    List(ListArgs),
    /// Create an inventory item from JSON
    Create {
        #[arg(long)]
        data: String,
    },
    /// Delete an inventory item
    Delete { id: String },
    /// Record incoming stock
    AddStock(MovementArgs),
    /// Record outgoing stock
    RemoveStock(MovementArgs),
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// List users
    List(ListArgs),
    /// Create a user from JSON
    Create {
        #[arg(long)]
        data: String,
    },
    /// Update a user from JSON
    Update {
        id: String,
        #[arg(long)]
        data: String,
    },
    /// Delete a user
    Delete { id: String },
}

impl Commands {
    pub async fn execute(self, ctx: &Context) -> Result<()> {
        match self {
            Commands::Signin { email, password } => signin(ctx, email, password).await,
            Commands::Signup { data } => {
                ctx.enter(SIGNUP_ROUTE)?;
                let payload = parse_json(&data)?;
                print_payload(&ctx.client.signup(&payload).await?)
            }
            Commands::Logout => {
                ctx.session.logout()?;
                info!("Signed out");
                println!("Signed out");
                Ok(())
            }
            Commands::Status => {
                if ctx.session.is_authenticated() {
                    println!("Signed in ({})", ctx.client.base_url());
                } else {
                    println!("Signed out");
                }
                Ok(())
            }
            Commands::Sessions { command } => command.execute(ctx).await,
            Commands::Inventory { command } => command.execute(ctx).await,
            Commands::Users { command } => command.execute(ctx).await,
        }
    }
}

async fn signin(ctx: &Context, email: String, password: String) -> Result<()> {
    ctx.enter(SIGNIN_ROUTE)?;

    let response = ctx
        .client
        .signin_for_token(&Credentials { email, password })
        .await?;
    ctx.session
        .set_token(&response.token)
        .context("Failed to store session token")?;

    info!("Signed in");
    println!("Signed in");
    Ok(())
}

impl SessionCommands {
    pub async fn execute(self, ctx: &Context) -> Result<()> {
        ctx.enter("/sessions")?;
        let client = &ctx.client;

        let payload = match self {
            SessionCommands::List(args) => {
                ctx.call(client.get_sessions(&ListParams::from(args))).await?
            }
            SessionCommands::Create { data } => {
                let data = parse_json(&data)?;
                ctx.call(client.create_session(&data)).await?
            }
            SessionCommands::Delete { id } => ctx.call(client.delete_session(&id)).await?,
        };
        print_payload(&payload)
    }
}

impl InventoryCommands {
    pub async fn execute(self, ctx: &Context) -> Result<()> {
        ctx.enter("/inventory")?;
        let client = &ctx.client;

        let payload = match self {
            InventoryCommands::List(args) => {
                ctx.call(client.get_inventory(&ListParams::from(args))).await?
            }
            InventoryCommands::Create { data } => {
                let data = parse_json(&data)?;
                ctx.call(client.create_inventory_item(&data)).await?
            }
            InventoryCommands::Delete { id } => ctx.call(client.delete_inventory_item(&id)).await?,
            InventoryCommands::AddStock(args) => {
                let (id, movement) = args.into_parts();
                ctx.call(client.add_stock(&id, &movement)).await?
            }
            InventoryCommands::RemoveStock(args) => {
                let (id, movement) = args.into_parts();
                ctx.call(client.remove_stock(&id, &movement)).await?
            }
        };
        print_payload(&payload)
    }
}

impl UserCommands {
    pub async fn execute(self, ctx: &Context) -> Result<()> {
        ctx.enter(DASHBOARD_ROUTE)?;
        let client = &ctx.client;

        let payload = match self {
            UserCommands::List(args) => ctx.call(client.get_users(&ListParams::from(args))).await?,
            UserCommands::Create { data } => {
                let data = parse_json(&data)?;
                ctx.call(client.create_user(&data)).await?
            }
            UserCommands::Update { id, data } => {
                let data = parse_json(&data)?;
                ctx.call(client.update_user(&id, &data)).await?
            }
            UserCommands::Delete { id } => ctx.call(client.delete_user(&id)).await?,
        };
        print_payload(&payload)
    }
}

fn parse_json(data: &str) -> Result<Value> {
    serde_json::from_str(data).context("--data must be valid JSON")
}

fn print_payload(payload: &Payload) -> Result<()> {
    match payload {
        Some(value) => println!("{}", serde_json::to_string_pretty(value)?),
        None => println!("Done"),
    }
    Ok(())
}
